use crate::codec::{read_raw_trips, RawTrip};
use crate::schema::{coerce_cost, day_number, parse_flexible_date};
use crate::validate::is_ascending;
use chrono::{Days, NaiveDate};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Rows grouped into one day when the source omits day labels.
pub const ACTIVITIES_PER_DAY: usize = 4;

/// Aggregation settings. The trip start date anchors synthesized dates when
/// the source table carries none.
#[derive(Debug, Clone)]
pub struct BudgetConfig {
    pub trip_start: NaiveDate,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            trip_start: NaiveDate::from_ymd_opt(2025, 7, 20).unwrap(),
        }
    }
}

/// Per-day roll-up: the day's date, its activities as `"name: $cost"`
/// strings in source order, and the running cost total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub activities: Vec<String>,
    pub total_cost: f64,
}

/// Either a full per-day summary or the error list — never both. Callers
/// check for errors before reading the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryExport {
    Errors { errors: Vec<String> },
    Summary(BTreeMap<u32, DaySummary>),
}

impl SummaryExport {
    pub fn errors(&self) -> Option<&[String]> {
        match self {
            SummaryExport::Errors { errors } => Some(errors),
            SummaryExport::Summary(_) => None,
        }
    }

    pub fn summary(&self) -> Option<&BTreeMap<u32, DaySummary>> {
        match self {
            SummaryExport::Errors { .. } => None,
            SummaryExport::Summary(days) => Some(days),
        }
    }
}

#[derive(Debug, Clone)]
struct TripRow {
    day: Option<u32>,
    date: Option<String>,
    activity: String,
    cost: f64,
}

/// Groups a tabular itinerary by day and sums its costs.
///
/// Loading is forgiving about missing day/date metadata (synthesis and
/// forward-fill below), but any structural or per-row error anywhere makes
/// the final summary errors-only; a partial summary is never returned next
/// to errors.
pub struct BudgetAggregator {
    config: BudgetConfig,
    trips: Vec<TripRow>,
    errors: Vec<String>,
}

impl BudgetAggregator {
    pub fn new(config: BudgetConfig) -> Self {
        Self {
            config,
            trips: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn loaded_rows(&self) -> usize {
        self.trips.len()
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => match read_raw_trips(file) {
                Ok(rows) => self.load_rows(rows),
                Err(e) => self.errors.push(format!("An error occurred: {}", e)),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.errors.push(format!("File not found: {}", path.display()));
            }
            Err(e) => self.errors.push(format!("An error occurred: {}", e)),
        }
    }

    pub fn load_from_str(&mut self, csv_data: &str) {
        match read_raw_trips(csv_data.as_bytes()) {
            Ok(rows) => self.load_rows(rows),
            Err(e) => self.errors.push(format!("An error occurred: {}", e)),
        }
    }

    fn load_rows(&mut self, mut rows: Vec<RawTrip>) {
        info!("Loading {} itinerary rows for budget aggregation", rows.len());

        // No day labels anywhere: synthesize both day and date, one day per
        // fixed-size chunk of consecutive rows, dates counted from the
        // configured trip start.
        if rows.iter().all(|row| row.day.is_none()) {
            for (i, row) in rows.iter_mut().enumerate() {
                let chunk = i / ACTIVITIES_PER_DAY;
                row.day = Some((chunk + 1).to_string());
                let date = self
                    .config
                    .trip_start
                    .checked_add_days(Days::new(chunk as u64))
                    .unwrap_or(self.config.trip_start);
                row.date = Some(date.format("%Y-%m-%d").to_string());
            }
            debug!("Synthesized day/date labels for {} rows", rows.len());
        }

        // Forward-fill day and date gaps from the nearest preceding row.
        let mut last_day: Option<u32> = None;
        let mut last_date: Option<String> = None;
        let mut filled: Vec<(usize, RawTrip, Option<u32>)> = Vec::new();
        for (i, mut row) in rows.into_iter().enumerate() {
            let day = row.day.as_deref().and_then(parse_day_cell).or(last_day);
            last_day = day.or(last_day);
            if row.date.is_none() {
                row.date = last_date.clone();
            } else {
                last_date = row.date.clone();
            }
            filled.push((i, row, day));
        }

        for (i, row, day) in filled {
            // Rows without an activity or a cost carry nothing to sum.
            let (activity, cost_text) = match (row.activity, row.cost) {
                (Some(activity), Some(cost)) => (activity, cost),
                _ => continue,
            };

            match coerce_cost(&cost_text) {
                Ok(Some(cost)) => self.trips.push(TripRow {
                    day,
                    date: row.date,
                    activity,
                    cost,
                }),
                Ok(None) => {
                    debug!("Row {}: cost is variable/unknown, excluded from totals", i + 2);
                }
                Err(message) => {
                    self.errors.push(format!("Row {}: {}", i + 2, message));
                }
            }
        }
    }

    /// Loose ordering pass over the loaded rows: days must be ascending and
    /// dates chronological; unreadable dates are reported individually.
    pub fn validate(&mut self) {
        if self.trips.is_empty() {
            return;
        }

        let days: Vec<u32> = self.trips.iter().filter_map(|trip| trip.day).collect();
        if !is_ascending(&days) {
            self.errors
                .push("Day sequence is not in ascending order.".to_string());
        }

        let mut dates = Vec::new();
        for (i, text) in self
            .trips
            .iter()
            .filter_map(|trip| trip.date.as_deref())
            .enumerate()
        {
            match parse_flexible_date(text) {
                Some(date) => dates.push(date),
                None => self
                    .errors
                    .push(format!("Invalid date format at index {}: {}", i, text)),
            }
        }
        if !is_ascending(&dates) {
            self.errors
                .push("Date sequence is not in chronological order.".to_string());
        }
    }

    /// Builds the per-day summary, rebuilt from scratch on every call. Any
    /// accumulated error short-circuits into an errors-only result.
    pub fn summary(&self) -> SummaryExport {
        if !self.errors.is_empty() {
            return SummaryExport::Errors {
                errors: self.errors.clone(),
            };
        }

        let mut days: BTreeMap<u32, DaySummary> = BTreeMap::new();
        for trip in &self.trips {
            let Some(day) = trip.day else { continue };
            let entry = days.entry(day).or_insert_with(|| DaySummary {
                date: trip.date.clone().unwrap_or_default(),
                activities: Vec::new(),
                total_cost: 0.0,
            });
            entry
                .activities
                .push(format!("{}: ${:.2}", trip.activity, trip.cost));
            entry.total_cost += trip.cost;
        }
        SummaryExport::Summary(days)
    }
}

fn parse_day_cell(text: &str) -> Option<u32> {
    let text = text.trim();
    day_number(text).or_else(|| text.parse().ok())
}

/// One-shot load → validate → summarize over CSV text.
pub fn summarize_csv(csv_data: &str, config: &BudgetConfig) -> SummaryExport {
    let mut aggregator = BudgetAggregator::new(config.clone());
    aggregator.load_from_str(csv_data);
    aggregator.validate();
    aggregator.summary()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Day,Date,Activity,Description,Location,Cost,Travel Distance to Next Location\n";

    fn aggregator_for(csv_data: &str) -> BudgetAggregator {
        let mut aggregator = BudgetAggregator::new(BudgetConfig::default());
        aggregator.load_from_str(csv_data);
        aggregator
    }

    #[test]
    fn test_summary_totals_by_day() {
        let csv_data = format!(
            "{}1,2024-01-01,Museum,,,20,\n1,2024-01-01,Lunch,,,15,\n2,2024-01-02,Train,,,50,\n",
            HEADER
        );
        let mut aggregator = aggregator_for(&csv_data);
        aggregator.validate();
        let export = aggregator.summary();
        let summary = export.summary().expect("expected a summary");
        assert_eq!(summary.len(), 2);
        assert!((summary[&1].total_cost - 35.0).abs() < f64::EPSILON);
        assert!((summary[&2].total_cost - 50.0).abs() < f64::EPSILON);
        assert_eq!(
            summary[&1].activities,
            vec!["Museum: $20.00".to_string(), "Lunch: $15.00".to_string()]
        );
        assert_eq!(summary[&1].date, "2024-01-01");
    }

    #[test]
    fn test_day_labels_are_accepted() {
        let csv_data = format!(
            "{}Day 1,\"July 20, 2025\",Museum,,,$20.00,\nDay 2,\"July 21, 2025\",Train,,,$50.00,\n",
            HEADER
        );
        let mut aggregator = aggregator_for(&csv_data);
        aggregator.validate();
        let export = aggregator.summary();
        let summary = export.summary().expect("expected a summary");
        assert!((summary[&2].total_cost - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_cost_is_a_row_error() {
        let csv_data = format!(
            "{}1,2024-01-01,Museum,,,20,\n1,2024-01-01,Gift shop,,,invalid,\n",
            HEADER
        );
        let aggregator = aggregator_for(&csv_data);
        assert_eq!(aggregator.loaded_rows(), 1);
        assert_eq!(aggregator.errors(), ["Row 3: Invalid cost format"]);
    }

    #[test]
    fn test_errors_short_circuit_the_summary() {
        let csv_data = format!(
            "{}1,2024-01-01,Museum,,,20,\n1,2024-01-01,Gift shop,,,invalid,\n",
            HEADER
        );
        let mut aggregator = aggregator_for(&csv_data);
        aggregator.validate();
        let export = aggregator.summary();
        assert!(export.summary().is_none());
        assert_eq!(export.errors().unwrap().len(), 1);
    }

    #[test]
    fn test_out_of_order_dates_are_reported_once() {
        let csv_data = format!(
            "{}1,2024-01-01,Museum,,,20,\n2,2024-01-03,Train,,,50,\n3,2024-01-02,Hotel,,,150,\n",
            HEADER
        );
        let mut aggregator = aggregator_for(&csv_data);
        aggregator.validate();
        assert_eq!(
            aggregator.errors(),
            ["Date sequence is not in chronological order."]
        );
    }

    #[test]
    fn test_day_regression_is_reported_once() {
        let csv_data = format!(
            "{}2,2024-01-01,Museum,,,20,\n1,2024-01-01,Train,,,50,\n",
            HEADER
        );
        let mut aggregator = aggregator_for(&csv_data);
        aggregator.validate();
        assert!(aggregator
            .errors()
            .contains(&"Day sequence is not in ascending order.".to_string()));
    }

    #[test]
    fn test_day_synthesis_in_chunks_of_four() {
        let rows: String = (1..=6).map(|i| format!(",,Stop {},,,10,\n", i)).collect();
        let csv_data = format!("{}{}", HEADER, rows);
        let mut aggregator = aggregator_for(&csv_data);
        aggregator.validate();
        let export = aggregator.summary();
        let summary = export.summary().expect("expected a summary");
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[&1].activities.len(), 4);
        assert_eq!(summary[&2].activities.len(), 2);
        assert_eq!(summary[&1].date, "2025-07-20");
        assert_eq!(summary[&2].date, "2025-07-21");
        assert!((summary[&1].total_cost - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_forward_fill_of_day_and_date() {
        let csv_data = format!(
            "{}1,2024-01-01,Museum,,,20,\n,,Lunch,,,15,\n2,2024-01-02,Train,,,50,\n",
            HEADER
        );
        let mut aggregator = aggregator_for(&csv_data);
        aggregator.validate();
        let export = aggregator.summary();
        let summary = export.summary().expect("expected a summary");
        assert!((summary[&1].total_cost - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rows_missing_essentials_are_dropped() {
        let csv_data = format!(
            "{}1,2024-01-01,Museum,,,20,\n1,2024-01-01,,,,15,\n1,2024-01-01,Snack,,,,\n",
            HEADER
        );
        let aggregator = aggregator_for(&csv_data);
        assert_eq!(aggregator.loaded_rows(), 1);
        assert!(aggregator.errors().is_empty());
    }

    #[test]
    fn test_variable_cost_rows_are_excluded_without_error() {
        let csv_data = format!(
            "{}1,2024-01-01,Museum,,,20,\n1,2024-01-01,Dinner,,,Variable,\n",
            HEADER
        );
        let mut aggregator = aggregator_for(&csv_data);
        aggregator.validate();
        let export = aggregator.summary();
        let summary = export.summary().expect("expected a summary");
        assert!((summary[&1].total_cost - 20.0).abs() < f64::EPSILON);
        assert_eq!(summary[&1].activities.len(), 1);
    }

    #[test]
    fn test_missing_file_is_a_single_error() {
        let mut aggregator = BudgetAggregator::new(BudgetConfig::default());
        aggregator.load_from_path("definitely/not/here.csv");
        aggregator.validate();
        let export = aggregator.summary();
        let errors = export.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("File not found:"));
    }

    #[test]
    fn test_summarize_csv_one_shot() {
        let csv_data = format!("{}1,2024-01-01,Museum,,,$20,\n", HEADER);
        let export = summarize_csv(&csv_data, &BudgetConfig::default());
        let summary = export.summary().expect("expected a summary");
        assert!((summary[&1].total_cost - 20.0).abs() < f64::EPSILON);
    }
}
