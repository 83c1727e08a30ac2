use crate::error::{ItineraryError, Result};
use crate::schema::{format_long_date, ItineraryEntry, ParsedEntry, RawEntryFields};
use csv::ReaderBuilder;
use log::debug;
use std::io::Read;

/// Header written by the itinerary exporter.
pub const EXPORT_HEADER: [&str; 7] = [
    "Day",
    "Date",
    "Activity",
    "Description",
    "Location",
    "Cost",
    "Travel Distance to Location",
];

/// Header variant used by validation-side files. Only the column count is
/// ever enforced, never the header text.
pub const VALIDATION_HEADER: [&str; 7] = [
    "Day",
    "Date",
    "Activity",
    "Description",
    "Location",
    "Cost",
    "Travel Distance to Next Location",
];

/// Marker written into the description column for rows that failed entry
/// validation; the location column then carries the explanation. External
/// consumers key off this exact string.
pub const VALIDATION_SENTINEL: &str = "VALIDATION_ERROR";

/// One positional CSV row, still raw text. Empty and missing trailing
/// columns both come back as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTrip {
    pub day: Option<String>,
    pub date: Option<String>,
    pub activity: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub cost: Option<String>,
    pub travel_distance_to_next: Option<String>,
    pub field_count: usize,
}

/// Serializes entries to CSV text. Absent optional fields render as empty
/// strings, costs to two decimal places. Invalid entries keep their row:
/// the description column gets the sentinel marker and the location column
/// the error explanation, so row numbers in downstream reports still line
/// up with the source.
pub fn entries_to_csv(entries: &[ParsedEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for entry in entries {
        match entry {
            ParsedEntry::Valid(entry) => {
                let date = format_long_date(entry.date);
                let cost = entry
                    .cost
                    .map(|cost| format!("{:.2}", cost))
                    .unwrap_or_default();
                let travel = entry
                    .travel_distance_to_next
                    .map(|minutes| minutes.to_string())
                    .unwrap_or_default();
                writer.write_record([
                    entry.day.as_str(),
                    date.as_str(),
                    entry.activity.as_str(),
                    entry.description.as_deref().unwrap_or(""),
                    entry.location.as_deref().unwrap_or(""),
                    cost.as_str(),
                    travel.as_str(),
                ])?;
            }
            ParsedEntry::Invalid(invalid) => {
                let explanation = invalid.error_text();
                writer.write_record([
                    invalid.day.as_str(),
                    invalid.date.as_str(),
                    invalid.activity.as_str(),
                    VALIDATION_SENTINEL,
                    explanation.as_str(),
                    "",
                    "",
                ])?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ItineraryError::CsvStructure(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ItineraryError::CsvStructure(e.to_string()))
}

/// Reads CSV rows positionally into raw trips. Short rows are tolerated
/// here; callers that care about the 7-column contract check
/// [`RawTrip::field_count`] themselves.
pub fn read_raw_trips<R: Read>(reader: R) -> Result<Vec<RawTrip>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut trips = Vec::new();

    for record in reader.records() {
        let record = record?;
        let column = |i: usize| -> Option<String> {
            record
                .get(i)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        };
        trips.push(RawTrip {
            day: column(0),
            date: column(1),
            activity: column(2),
            description: column(3),
            location: column(4),
            cost: column(5),
            travel_distance_to_next: column(6),
            field_count: record.len(),
        });
    }

    debug!("Read {} CSV rows", trips.len());
    Ok(trips)
}

/// Deserializes CSV text back into parsed entries, re-running the entry
/// constructor on every row so the result carries the same valid/invalid
/// split a fresh parse would.
pub fn csv_to_entries(csv_data: &str) -> Result<Vec<ParsedEntry>> {
    let trips = read_raw_trips(csv_data.as_bytes())?;
    let entries = trips
        .into_iter()
        .map(|trip| {
            let fields = RawEntryFields {
                day: trip.day.clone(),
                date: trip.date.clone(),
                activity: trip.activity.clone(),
                description: trip.description,
                location: trip.location,
                cost: trip.cost,
                travel_distance_to_next: trip.travel_distance_to_next,
            };
            match ItineraryEntry::from_fields(&fields) {
                Ok(entry) => ParsedEntry::Valid(entry),
                Err(errors) => ParsedEntry::Invalid(crate::schema::InvalidEntry {
                    day: trip.day.unwrap_or_default(),
                    date: trip.date.unwrap_or_default(),
                    activity: trip.activity.unwrap_or_default(),
                    errors,
                }),
            }
        })
        .collect();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_itinerary;
    use crate::schema::{FieldError, InvalidEntry};

    #[test]
    fn test_entries_to_csv_layout() {
        let text = "\
**Day 1: July 20, 2025:**
* Colosseum Tour (Includes underground and arena floor access) @ Colosseum $75.00 (2.5)
* Roman Forum & Palatine Hill (Explore the ancient ruins) @ Roman Forum $30.00
";
        let entries = parse_itinerary(text);
        let csv_output = entries_to_csv(&entries).unwrap();
        let expected = "\
Day,Date,Activity,Description,Location,Cost,Travel Distance to Location
Day 1,\"July 20, 2025\",Colosseum Tour,Includes underground and arena floor access,Colosseum,75.00,2.5
Day 1,\"July 20, 2025\",Roman Forum & Palatine Hill,Explore the ancient ruins,Roman Forum,30.00,
";
        assert_eq!(csv_output, expected);
    }

    #[test]
    fn test_invalid_entry_renders_sentinel_row() {
        let entries = vec![ParsedEntry::Invalid(InvalidEntry {
            day: "Day 1".to_string(),
            date: "July 20, 2025".to_string(),
            activity: "Broken".to_string(),
            errors: vec![FieldError::new("cost", "Invalid cost format")],
        })];
        let csv_output = entries_to_csv(&entries).unwrap();
        let row = csv_output.lines().nth(1).unwrap();
        assert!(row.contains("VALIDATION_ERROR"));
        assert!(row.contains("cost: Invalid cost format"));
        assert!(row.ends_with(",,"));
    }

    #[test]
    fn test_cost_round_trip_within_a_cent() {
        let text = "**Day 1: July 20, 2025:**\n* Activity @ Location $1,234.56\n* Dinner $9.99";
        let entries = parse_itinerary(text);
        let csv_output = entries_to_csv(&entries).unwrap();
        let restored = csv_to_entries(&csv_output).unwrap();
        assert_eq!(restored.len(), entries.len());
        for (before, after) in entries.iter().zip(&restored) {
            let before = before.entry().unwrap().cost.unwrap();
            let after = after.entry().unwrap().cost.unwrap();
            assert!((before - after).abs() < 0.01);
        }
    }

    #[test]
    fn test_short_rows_read_as_absent_fields() {
        let csv_data = "Day,Date,Activity\nDay 1,\"July 20, 2025\",Walk\n";
        let trips = read_raw_trips(csv_data.as_bytes()).unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].activity.as_deref(), Some("Walk"));
        assert_eq!(trips[0].cost, None);
        assert_eq!(trips[0].travel_distance_to_next, None);
        assert_eq!(trips[0].field_count, 3);
    }

    #[test]
    fn test_headers_share_a_column_count() {
        assert_eq!(EXPORT_HEADER.len(), VALIDATION_HEADER.len());
    }
}
