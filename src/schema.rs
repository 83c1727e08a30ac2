use chrono::NaiveDate;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date formats accepted on input, tried in order. Month-first wins for
/// ambiguous slash dates.
const DATE_FORMATS: [&str; 5] = ["%B %d, %Y", "%b %d, %Y", "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// One structured activity record within a day of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryEntry {
    #[schemars(description = "The day label, e.g. 'Day 1'")]
    pub day: String,

    #[schemars(description = "The calendar date of the day this activity belongs to")]
    pub date: NaiveDate,

    #[schemars(description = "The main activity for this entry")]
    pub activity: String,

    #[schemars(description = "A brief description of the activity")]
    pub description: Option<String>,

    #[schemars(description = "The place where the activity happens")]
    pub location: Option<String>,

    #[schemars(
        description = "Estimated cost as a plain decimal. Absent when the cost is variable or unknown"
    )]
    pub cost: Option<f64>,

    #[schemars(
        description = "Travel time in minutes from this activity to the next one. Empty for the last activity of the day or trip"
    )]
    pub travel_distance_to_next: Option<f64>,
}

/// Raw field set handed to the entry constructor, all values still text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntryFields {
    pub day: Option<String>,
    pub date: Option<String>,
    pub activity: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub cost: Option<String>,
    pub travel_distance_to_next: Option<String>,
}

/// A single field-level coercion or requirement failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// An activity line that failed entry validation. The row is retained in
/// sequence so positional diagnostics stay aligned with the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidEntry {
    pub day: String,
    pub date: String,
    pub activity: String,
    pub errors: Vec<FieldError>,
}

impl InvalidEntry {
    /// Human-readable explanation, one clause per failed field.
    pub fn error_text(&self) -> String {
        self.errors
            .iter()
            .map(FieldError::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Parser output: either a well-formed entry or an invalid row kept in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParsedEntry {
    Valid(ItineraryEntry),
    Invalid(InvalidEntry),
}

impl ParsedEntry {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedEntry::Valid(_))
    }

    pub fn entry(&self) -> Option<&ItineraryEntry> {
        match self {
            ParsedEntry::Valid(entry) => Some(entry),
            ParsedEntry::Invalid(_) => None,
        }
    }
}

impl ItineraryEntry {
    /// Builds an entry from raw text fields, coercing each field and
    /// aggregating every failure before deciding validity. Required fields
    /// are `day`, `date` and a non-empty `activity`; everything else is
    /// optional and defaults to absent.
    pub fn from_fields(fields: &RawEntryFields) -> std::result::Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let day = match fields.day.as_deref().map(str::trim) {
            Some(day) if !day.is_empty() => day.to_string(),
            _ => {
                errors.push(FieldError::new("day", "A day label is required."));
                String::new()
            }
        };

        let date = match fields.date.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => match parse_flexible_date(text) {
                Some(date) => Some(date),
                None => {
                    errors.push(FieldError::new(
                        "date",
                        format!("Unrecognized date: {}", text),
                    ));
                    None
                }
            },
            _ => {
                errors.push(FieldError::new("date", "A date is required."));
                None
            }
        };

        let activity = match fields.activity.as_deref().map(str::trim) {
            Some(activity) if !activity.is_empty() => activity.to_string(),
            _ => {
                errors.push(FieldError::new("activity", "An activity is required."));
                String::new()
            }
        };

        let cost = match fields.cost.as_deref() {
            None => None,
            Some(raw) => match coerce_cost(raw) {
                Ok(cost) => cost,
                Err(message) => {
                    errors.push(FieldError::new("cost", message));
                    None
                }
            },
        };

        let travel_distance_to_next = fields
            .travel_distance_to_next
            .as_deref()
            .and_then(coerce_travel_distance);

        match (errors.is_empty(), date) {
            (true, Some(date)) => Ok(Self {
                day,
                date,
                activity,
                description: fields.description.clone(),
                location: fields.location.clone(),
                cost,
                travel_distance_to_next,
            }),
            _ => Err(errors),
        }
    }
}

/// Parses a date in any of the accepted textual formats.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Renders a date in the long form used by itinerary headers and CSV
/// exports, e.g. "July 20, 2025".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Extracts the numeric part of a "Day N" label.
pub fn day_number(label: &str) -> Option<u32> {
    let pattern = Regex::new(r"^Day\s+(\d+)").unwrap();
    let caps = pattern.captures(label.trim())?;
    caps[1].parse().ok()
}

/// Coerces a cost string to a plain decimal. Currency symbols and thousands
/// separators are stripped first; a "variable" cost means the amount is
/// unknown, which is not an error.
pub fn coerce_cost(raw: &str) -> std::result::Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.to_lowercase().contains("variable") {
        return Ok(None);
    }

    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value >= 0.0 => Ok(Some(value)),
        _ => Err("Invalid cost format".to_string()),
    }
}

/// Coerces a travel-distance string to minutes. Hour figures are converted
/// to minutes; a bare number is taken as-is. Never fails: unparsable text
/// simply means the distance is absent.
pub fn coerce_travel_distance(raw: &str) -> Option<f64> {
    let text = raw.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    let minutes = Regex::new(r"(\d[\d,.]*)\s*min").unwrap();
    if let Some(caps) = minutes.captures(&text) {
        return parse_separated_number(&caps[1]);
    }

    let hours = Regex::new(r"(\d[\d,.]*)\s*hour").unwrap();
    if let Some(caps) = hours.captures(&text) {
        return parse_separated_number(&caps[1]).map(|h| h * 60.0);
    }

    let bare = Regex::new(r"(\d[\d,.]*)").unwrap();
    if let Some(caps) = bare.captures(&text) {
        return parse_separated_number(&caps[1]);
    }

    None
}

fn parse_separated_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(day: &str, date: &str, activity: &str) -> RawEntryFields {
        RawEntryFields {
            day: Some(day.to_string()),
            date: Some(date.to_string()),
            activity: Some(activity.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_coerce_cost_plain_and_decorated() {
        assert_eq!(coerce_cost("75.00"), Ok(Some(75.0)));
        assert_eq!(coerce_cost("$50"), Ok(Some(50.0)));
        assert_eq!(coerce_cost("$1,234.56"), Ok(Some(1234.56)));
        assert_eq!(coerce_cost(""), Ok(None));
    }

    #[test]
    fn test_coerce_cost_variable_means_unknown() {
        assert_eq!(coerce_cost("Variable"), Ok(None));
        assert_eq!(coerce_cost("variable"), Ok(None));
        assert_eq!(coerce_cost("VARIABLE (depends on season)"), Ok(None));
    }

    #[test]
    fn test_coerce_cost_rejects_garbage() {
        assert!(coerce_cost("abc").is_err());
        assert!(coerce_cost("-5.00").is_err());
    }

    #[test]
    fn test_coerce_travel_distance_units() {
        assert_eq!(coerce_travel_distance("30 min travel time"), Some(30.0));
        assert_eq!(coerce_travel_distance("45 minutes"), Some(45.0));
        assert_eq!(coerce_travel_distance("1 hour travel time"), Some(60.0));
        assert_eq!(coerce_travel_distance("1.5 hours"), Some(90.0));
        assert_eq!(coerce_travel_distance("2.5"), Some(2.5));
        assert_eq!(coerce_travel_distance("15 min walk"), Some(15.0));
        assert_eq!(coerce_travel_distance("no idea"), None);
        assert_eq!(coerce_travel_distance(""), None);
    }

    #[test]
    fn test_parse_flexible_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        assert_eq!(parse_flexible_date("July 20, 2025"), Some(expected));
        assert_eq!(parse_flexible_date("Jul 20, 2025"), Some(expected));
        assert_eq!(parse_flexible_date("2025-07-20"), Some(expected));
        assert_eq!(parse_flexible_date("07/20/2025"), Some(expected));
        assert_eq!(parse_flexible_date("20/07/2025"), Some(expected));
        assert_eq!(parse_flexible_date("someday soon"), None);
    }

    #[test]
    fn test_format_long_date_round_trips() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        let text = format_long_date(date);
        assert_eq!(text, "July 20, 2025");
        assert_eq!(parse_flexible_date(&text), Some(date));
    }

    #[test]
    fn test_day_number() {
        assert_eq!(day_number("Day 1"), Some(1));
        assert_eq!(day_number("Day 12"), Some(12));
        assert_eq!(day_number("day 1"), None);
        assert_eq!(day_number("First day"), None);
    }

    #[test]
    fn test_from_fields_minimal_entry() {
        let entry = ItineraryEntry::from_fields(&fields("Day 1", "July 20, 2025", "Colosseum Tour"))
            .unwrap();
        assert_eq!(entry.day, "Day 1");
        assert_eq!(entry.activity, "Colosseum Tour");
        assert_eq!(entry.cost, None);
        assert_eq!(entry.travel_distance_to_next, None);
    }

    #[test]
    fn test_from_fields_bad_cost_is_a_field_error() {
        let mut raw = fields("Day 1", "July 20, 2025", "Activity");
        raw.cost = Some("abc".to_string());
        let errors = ItineraryEntry::from_fields(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "cost");
    }

    #[test]
    fn test_from_fields_aggregates_all_errors() {
        let raw = RawEntryFields {
            cost: Some("abc".to_string()),
            ..Default::default()
        };
        let errors = ItineraryEntry::from_fields(&raw).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["day", "date", "activity", "cost"]);
    }

    #[test]
    fn test_invalid_entry_error_text() {
        let invalid = InvalidEntry {
            day: "Day 1".to_string(),
            date: "July 20, 2025".to_string(),
            activity: "Activity".to_string(),
            errors: vec![
                FieldError::new("cost", "Invalid cost format"),
                FieldError::new("activity", "An activity is required."),
            ],
        };
        assert_eq!(
            invalid.error_text(),
            "cost: Invalid cost format; activity: An activity is required."
        );
    }
}
