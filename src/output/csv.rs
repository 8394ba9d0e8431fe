use anyhow::Result;

use crate::aggregate::LongRow;
use crate::data::CandidateCount;

pub fn series_to_csv(rows: &[LongRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["date", "Catégorie", "y"])?;
    for row in rows {
        writer.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            row.category.clone(),
            row.value.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn candidates_to_csv(candidates: &[CandidateCount]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["rank", "candidat", "parrainages"])?;
    for (idx, candidate) in candidates.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            candidate.candidate.clone(),
            candidate.endorsements.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn series_csv_has_long_format_header() {
        let rows = vec![LongRow {
            date: NaiveDate::from_ymd_opt(2022, 1, 1).expect("date"),
            category: "Parrainages".to_string(),
            value: 2,
        }];
        let out = series_to_csv(&rows).expect("csv");
        assert_eq!(out, "date,Catégorie,y\n2022-01-01,Parrainages,2\n");
    }

    #[test]
    fn candidate_csv_quotes_names_with_commas() {
        let out = candidates_to_csv(&[CandidateCount {
            candidate: "Doe, Jane".to_string(),
            endorsements: 612,
        }])
        .expect("csv");
        assert!(out.ends_with("1,\"Doe, Jane\",612\n"));
    }
}
