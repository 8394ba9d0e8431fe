use anyhow::{Context, Result};
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed serializing output as JSON")
}

#[cfg(test)]
mod tests {
    use super::render_json;
    use crate::data::CandidateCount;

    #[test]
    fn renders_slices_pretty() {
        let out = render_json(
            &[CandidateCount {
                candidate: "Alice".to_string(),
                endorsements: 501,
            }][..],
        )
        .expect("json");
        assert!(out.starts_with("[\n"));
        assert!(out.contains("\"endorsements\": 501"));
    }
}
