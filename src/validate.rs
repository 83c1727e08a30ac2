use crate::schema::{coerce_cost, day_number, ParsedEntry};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Outcome of a validation pass. An empty error list is the success state;
/// any error is treated as a blocking failure downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub(crate) fn is_ascending<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

/// Loose ordering check over a parsed entry sequence: day numbers and dates
/// must each already be in sorted order. A break anywhere is one error for
/// the whole list, not one per offending pair.
///
/// This is deliberately weaker than [`evaluate_csv`]: aggregation inputs
/// only need to be sorted, while exported CSV is held to the strict
/// day-by-day progression rule.
pub fn check_entry_order(entries: &[ParsedEntry]) -> Vec<String> {
    let mut errors = Vec::new();

    let days: Vec<u32> = entries
        .iter()
        .filter_map(ParsedEntry::entry)
        .filter_map(|entry| day_number(&entry.day))
        .collect();
    if !is_ascending(&days) {
        errors.push("Day sequence is not in ascending order.".to_string());
    }

    let dates: Vec<NaiveDate> = entries
        .iter()
        .filter_map(ParsedEntry::entry)
        .map(|entry| entry.date)
        .collect();
    if !is_ascending(&dates) {
        errors.push("Date sequence is not in chronological order.".to_string());
    }

    errors
}

/// Strict row-by-row guardrail over exported CSV text.
///
/// Expects a header row plus 7-column data rows. For every data row
/// (numbered from 2, header = row 1): the day label must read `Day N`; the
/// day may only repeat or advance by one; the date (`Month DD, YYYY`) must
/// advance exactly one calendar day when the day advances and stay put when
/// it repeats; and the final row must leave the travel-distance column
/// empty. Every violation is collected — the pass always runs to the end of
/// the file so all problems are visible at once.
pub fn evaluate_csv(csv_data: &str) -> ValidationReport {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let mut valid_rows = 0usize;
    let mut invalid_rows = 0usize;
    let mut errors = Vec::new();

    let records: Vec<_> = reader.records().collect();
    let row_count = records.len();

    let mut previous_day_num = 0u32;
    let mut previous_date: Option<NaiveDate> = None;

    for (i, record) in records.into_iter().enumerate() {
        let row_num = i + 2;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                errors.push(format!("Row {}: Unreadable CSV row: {}", row_num, e));
                invalid_rows += 1;
                continue;
            }
        };

        if record.len() < 7 {
            errors.push(format!(
                "Row {}: Insufficient columns. Expected 7, got {}.",
                row_num,
                record.len()
            ));
            invalid_rows += 1;
            continue;
        }

        let day = record[0].trim().to_string();
        let date = record[1].trim().to_string();
        let cost = record[5].trim();
        let travel_distance = record[6].trim();

        if let Err(message) = coerce_cost(cost) {
            errors.push(format!("Row {} invalid: cost: {}", row_num, message));
            invalid_rows += 1;
            continue;
        }
        valid_rows += 1;

        let mut current_day_num = 0u32;
        match day_number(&day) {
            Some(n) => current_day_num = n,
            None => errors.push(format!(
                "Row {}: Invalid Day format: {}. Expected 'Day X'.",
                row_num, day
            )),
        }
        if i > 0 && current_day_num != previous_day_num && current_day_num != previous_day_num + 1 {
            errors.push(format!(
                "Row {}: Day sequence error. Expected Day {} or {}, got {}.",
                row_num,
                previous_day_num + 1,
                previous_day_num,
                day
            ));
        }

        match NaiveDate::parse_from_str(&date, "%B %d, %Y") {
            Ok(current_date) => {
                if let Some(prev) = previous_date {
                    let advanced = (current_date - prev).num_days();
                    if current_day_num == previous_day_num + 1 && advanced != 1 {
                        errors.push(format!(
                            "Row {}: Date chronology error. Expected date to be one day after {}, got {}.",
                            row_num,
                            prev.format("%B %d, %Y"),
                            date
                        ));
                    } else if current_day_num == previous_day_num && current_date != prev {
                        errors.push(format!(
                            "Row {}: Date mismatch for same day. Expected {}, got {}.",
                            row_num,
                            prev.format("%B %d, %Y"),
                            date
                        ));
                    }
                }
                previous_date = Some(current_date);
            }
            Err(_) => errors.push(format!(
                "Row {}: Invalid date format: {}. Expected 'Month Day, Year'.",
                row_num, date
            )),
        }

        previous_day_num = current_day_num;

        if i == row_count - 1 && !travel_distance.is_empty() {
            errors.push(format!(
                "Row {}: Travel Distance to Next Location should be empty for the last activity of the trip.",
                row_num
            ));
        }
    }

    info!(
        "CSV guardrail: {} rows checked, {} problems found",
        valid_rows + invalid_rows,
        errors.len()
    );
    for error in &errors {
        debug!("{}", error);
    }

    ValidationReport {
        total_rows: valid_rows + invalid_rows,
        valid_rows,
        invalid_rows,
        errors,
    }
}
