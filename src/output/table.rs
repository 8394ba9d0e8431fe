use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::aggregate::DailySeries;
use crate::data::CandidateCount;

pub fn render_candidates_table(candidates: &[CandidateCount]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rank", "Candidat", "Parrainages"]);

    for (idx, c) in candidates.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&c.candidate),
            Cell::new(c.endorsements).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

pub fn render_series_table(series: &DailySeries) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Date de publication",
        "Parrainages",
        "Parrainages total",
    ]);

    for p in &series.points {
        table.add_row(vec![
            Cell::new(p.date.format("%d/%m/%Y")),
            Cell::new(p.count).set_alignment(CellAlignment::Right),
            Cell::new(p.cumulative).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::aggregate::DailyPoint;

    #[test]
    fn series_table_uses_day_first_dates() {
        let series = DailySeries {
            candidate: "Alice".to_string(),
            points: vec![DailyPoint {
                date: NaiveDate::from_ymd_opt(2022, 2, 3).expect("date"),
                count: 4,
                cumulative: 9,
            }],
        };
        let out = render_series_table(&series);
        assert!(out.contains("03/02/2022"));
        assert!(out.contains("Parrainages total"));
    }

    #[test]
    fn candidates_table_ranks_rows() {
        let out = render_candidates_table(&[CandidateCount {
            candidate: "Alice".to_string(),
            endorsements: 700,
        }]);
        assert!(out.contains("Alice"));
        assert!(out.contains("700"));
    }
}
