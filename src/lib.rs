//! # Travel Itinerary Builder
//!
//! A library for turning LLM-generated travel itineraries (semi-structured
//! markdown) into validated structured records with budget summation and
//! CSV export.
//!
//! ## Core Concepts
//!
//! - **Entry**: one structured activity record within a day of an itinerary
//! - **Best-effort parsing**: generated text is noisy; unrecognized lines
//!   are skipped, and invalid activity lines are kept in place so row
//!   positions stay meaningful
//! - **Guardrail check**: strict per-row CSV validation enforcing day/date
//!   progression and the last-row travel-distance rule
//! - **Loose ordering check**: the weaker ascending-order rule used on
//!   aggregation inputs
//! - **Budget summary**: per-day activity lists and cost totals, or an
//!   error list — never both
//!
//! ## Example
//!
//! ```rust,ignore
//! use travel_itinerary_builder::*;
//!
//! let markdown = "\
//! **Day 1: July 20, 2025:**
//! * Colosseum Tour (Skip the line) @ Colosseum $75.00 (2.5)
//! * Roman Forum (Ancient ruins) @ Roman Forum $30.00
//! ";
//!
//! let entries = parse_itinerary(markdown);
//! let csv_text = entries_to_csv(&entries)?;
//!
//! let report = evaluate_csv(&csv_text);
//! assert!(report.is_clean());
//!
//! let summary = summarize_csv(&csv_text, &BudgetConfig::default());
//! ```

pub mod budget;
pub mod codec;
pub mod error;
pub mod extract;
pub mod geo;
pub mod parser;
pub mod schema;
pub mod validate;

#[cfg(feature = "gemini")]
pub mod llm;

pub use budget::{
    summarize_csv, BudgetAggregator, BudgetConfig, DaySummary, SummaryExport, ACTIVITIES_PER_DAY,
};
pub use codec::{
    csv_to_entries, entries_to_csv, read_raw_trips, RawTrip, EXPORT_HEADER, VALIDATION_HEADER,
    VALIDATION_SENTINEL,
};
pub use error::{ItineraryError, Result};
pub use extract::{ExtractedActivity, FieldExtractor};
pub use geo::{haversine_miles, LocationVerifier, VerifiedLocation};
pub use parser::{parse_itinerary, ItineraryParser};
pub use schema::{
    coerce_cost, coerce_travel_distance, day_number, format_long_date, parse_flexible_date,
    FieldError, InvalidEntry, ItineraryEntry, ParsedEntry, RawEntryFields,
};
pub use validate::{check_entry_order, evaluate_csv, ValidationReport};

use log::{debug, info};

/// End-to-end convenience over the parsing/validation/aggregation core.
pub struct ItineraryPipeline;

impl ItineraryPipeline {
    /// Parses itinerary markdown and runs the loose ordering check over the
    /// result. Returns the entries together with any ordering errors; the
    /// entries are returned even when ordering is broken, since callers may
    /// still want to show them.
    pub fn process(markdown: &str) -> (Vec<ParsedEntry>, Vec<String>) {
        info!("Parsing itinerary markdown ({} bytes)", markdown.len());
        let entries = parse_itinerary(markdown);
        let invalid = entries.iter().filter(|e| !e.is_valid()).count();
        debug!(
            "Parsed {} entries ({} invalid, kept in place)",
            entries.len(),
            invalid
        );
        let errors = check_entry_order(&entries);
        (entries, errors)
    }

    /// Exports entries to CSV and runs the strict guardrail over the result.
    pub fn export_and_check(entries: &[ParsedEntry]) -> Result<(String, ValidationReport)> {
        let csv_text = entries_to_csv(entries)?;
        let report = evaluate_csv(&csv_text);
        Ok((csv_text, report))
    }

    /// Validates CSV itinerary text and builds its budget summary: the
    /// counterpart of handing an exported file back to the assistant.
    pub fn summarize(csv_data: &str, config: &BudgetConfig) -> SummaryExport {
        summarize_csv(csv_data, config)
    }
}
