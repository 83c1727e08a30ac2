use crate::extract::FieldExtractor;
use crate::schema::{parse_flexible_date, InvalidEntry, ItineraryEntry, ParsedEntry, RawEntryFields};
use log::{debug, warn};
use regex::Regex;

/// Scans LLM-generated itinerary markdown into an ordered entry sequence.
///
/// The scan is best-effort by design: generated text is noisy, and a line
/// that is neither a day header nor an activity bullet is dropped without
/// comment. Parsing never fails; at worst it yields zero entries.
pub struct ItineraryParser {
    day_header: Regex,
    bullet: Regex,
    extractor: FieldExtractor,
}

impl ItineraryParser {
    pub fn new() -> Self {
        Self {
            day_header: Regex::new(r"^(?:##|\*\*)?\s*Day\s+(\d+):\s*([^:]+):(.*)$").unwrap(),
            bullet: Regex::new(r"^\*\s*(.*)$").unwrap(),
            extractor: FieldExtractor::new(),
        }
    }

    /// Parses the full markdown text of an itinerary.
    ///
    /// Day headers (`Day N: <date>: ...`, with or without `##`/`**`
    /// markers) set the day/date context for the bullets below them.
    /// Activity lines that fail entry validation are retained in place as
    /// invalid entries so row positions stay stable for later row-indexed
    /// diagnostics.
    pub fn parse(&self, text: &str) -> Vec<ParsedEntry> {
        let mut entries = Vec::new();
        let mut current_day: Option<String> = None;
        let mut current_date: Option<String> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = self.day_header.captures(line) {
                let date_text = caps[2].trim().to_string();
                if parse_flexible_date(&date_text).is_some() {
                    current_day = Some(format!("Day {}", &caps[1]));
                    current_date = Some(date_text);
                } else {
                    debug!("Skipping day header with unreadable date: {}", line);
                }
                continue;
            }

            let (day, date) = match (&current_day, &current_date) {
                (Some(day), Some(date)) => (day, date),
                _ => continue,
            };

            if !line.starts_with('*') {
                debug!("Skipping unrecognized line: {}", line);
                continue;
            }
            let payload = match self.bullet.captures(line) {
                Some(caps) => caps[1].trim().to_string(),
                None => continue,
            };
            if payload.is_empty() {
                continue;
            }

            let parts = self.extractor.split(&payload);
            let fields = RawEntryFields {
                day: Some(day.clone()),
                date: Some(date.clone()),
                activity: Some(parts.activity.clone()),
                description: parts.description,
                location: parts.location,
                cost: parts.cost,
                travel_distance_to_next: parts.travel_distance,
            };

            match ItineraryEntry::from_fields(&fields) {
                Ok(entry) => entries.push(ParsedEntry::Valid(entry)),
                Err(errors) => {
                    let invalid = InvalidEntry {
                        day: day.clone(),
                        date: date.clone(),
                        activity: parts.activity,
                        errors,
                    };
                    warn!(
                        "Keeping invalid activity line in place ({}): {}",
                        invalid.error_text(),
                        line
                    );
                    entries.push(ParsedEntry::Invalid(invalid));
                }
            }
        }

        entries
    }
}

impl Default for ItineraryParser {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience over [`ItineraryParser`].
pub fn parse_itinerary(text: &str) -> Vec<ParsedEntry> {
    ItineraryParser::new().parse(text)
}
