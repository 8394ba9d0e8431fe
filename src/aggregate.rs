use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::EndorsementTable;

pub const DAILY_LABEL: &str = "Parrainages";
pub const CUMULATIVE_LABEL: &str = "Parrainages total";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub count: u64,
    pub cumulative: u64,
}

/// Per-date counts for one candidate, ascending by date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailySeries {
    pub candidate: String,
    pub points: Vec<DailyPoint>,
}

/// One row of the tidy table fed to the chart: `(date, category, value)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LongRow {
    pub date: NaiveDate,
    #[serde(rename = "Catégorie")]
    pub category: String,
    #[serde(rename = "y")]
    pub value: u64,
}

impl DailySeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.points.last().map(|p| p.cumulative).unwrap_or(0)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Melts the two series into long format: every daily row, then every cumulative row.
    pub fn to_long_format(&self) -> Vec<LongRow> {
        let daily = self.points.iter().map(|p| LongRow {
            date: p.date,
            category: DAILY_LABEL.to_string(),
            value: p.count,
        });
        let cumulative = self.points.iter().map(|p| LongRow {
            date: p.date,
            category: CUMULATIVE_LABEL.to_string(),
            value: p.cumulative,
        });
        daily.chain(cumulative).collect()
    }
}

pub fn daily_series(table: &EndorsementTable, candidate: &str) -> DailySeries {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in table.for_candidate(candidate) {
        *by_date.entry(record.publication_date).or_insert(0) += 1;
    }

    let mut running = 0u64;
    let points = by_date
        .into_iter()
        .map(|(date, count)| {
            running += count;
            DailyPoint {
                date,
                count,
                cumulative: running,
            }
        })
        .collect();

    DailySeries {
        candidate: candidate.to_string(),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EndorsementRecord;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sample() -> EndorsementTable {
        vec![
            EndorsementRecord::new("Alice", day(2022, 1, 2)),
            EndorsementRecord::new("Bob", day(2022, 1, 1)),
            EndorsementRecord::new("Alice", day(2022, 1, 1)),
            EndorsementRecord::new("Alice", day(2022, 1, 1)),
            EndorsementRecord::new("Bob", day(2022, 1, 5)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn counts_and_accumulates_per_date() {
        let series = daily_series(&sample(), "Alice");
        assert_eq!(
            series.points,
            vec![
                DailyPoint {
                    date: day(2022, 1, 1),
                    count: 2,
                    cumulative: 2
                },
                DailyPoint {
                    date: day(2022, 1, 2),
                    count: 1,
                    cumulative: 3
                },
            ]
        );
    }

    #[test]
    fn cumulative_is_monotonic_and_ends_at_total() {
        let table = sample();
        for name in ["Alice", "Bob"] {
            let series = daily_series(&table, name);
            assert!(series
                .points
                .windows(2)
                .all(|w| w[0].cumulative <= w[1].cumulative && w[0].date < w[1].date));
            assert_eq!(series.total(), table.for_candidate(name).count() as u64);
        }
    }

    #[test]
    fn unknown_candidate_yields_empty_series() {
        let series = daily_series(&sample(), "Nobody");
        assert!(series.is_empty());
        assert_eq!(series.total(), 0);
        assert!(series.to_long_format().is_empty());
    }

    #[test]
    fn long_format_has_two_rows_per_date() {
        let series = daily_series(&sample(), "Alice");
        let rows = series.to_long_format();
        assert_eq!(rows.len(), 2 * series.dates().count());
        assert_eq!(rows[0].category, DAILY_LABEL);
        assert_eq!(rows[0].value, 2);
        assert_eq!(rows[3].category, CUMULATIVE_LABEL);
        assert_eq!(rows[3].value, 3);
    }

    #[test]
    fn later_selection_does_not_see_earlier_one() {
        let table = sample();
        let _ = daily_series(&table, "Alice");
        let bob = daily_series(&table, "Bob");
        assert_eq!(bob, daily_series(&table, "Bob"));
        assert_eq!(bob.candidate, "Bob");
        assert_eq!(bob.total(), 2);
    }

    #[test]
    fn long_rows_serialize_with_category_column() {
        let rows = daily_series(&sample(), "Bob").to_long_format();
        let json = serde_json::to_value(&rows[0]).expect("json");
        assert_eq!(json["date"], "2022-01-01");
        assert_eq!(json["Catégorie"], "Parrainages");
        assert_eq!(json["y"], 1);
    }
}
