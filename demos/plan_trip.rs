use dotenv::dotenv;
use std::error::Error;
use std::fs;
use travel_itinerary_builder::llm::{GeminiClient, TripPlanner};
use travel_itinerary_builder::{
    entries_to_csv, evaluate_csv, parse_itinerary, summarize_csv, BudgetConfig,
};

const TRIP_REQUEST: &str =
    "We'd like 3 days in Rome in July as a couple, mostly history and food, budget around $2000.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let api_key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");

    let client = GeminiClient::new(api_key);
    let planner = TripPlanner::new(client, "gemini-1.5-flash");

    println!("🧳 Extracting trip parameters...");
    let plan = planner.extract_plan(TRIP_REQUEST).await?;
    let missing = plan.missing_fields();
    if !missing.is_empty() {
        println!("Still missing: {}", missing.join(", "));
        return Ok(());
    }

    println!("🗺️  Generating itinerary for {}...", plan.destination.as_deref().unwrap_or("?"));
    let markdown = planner.generate_itinerary(&plan).await?;

    let entries = parse_itinerary(&markdown);
    println!("📋 Parsed {} activities.", entries.len());

    let csv_text = entries_to_csv(&entries)?;
    fs::write("itinerary.csv", &csv_text)?;
    println!("💾 Itinerary saved to itinerary.csv");

    let report = evaluate_csv(&csv_text);
    if report.is_clean() {
        println!("✅ Guardrail checks passed ({} rows).", report.total_rows);
    } else {
        println!("⚠️  Guardrail findings:");
        for error in &report.errors {
            println!("   - {}", error);
        }
    }

    let export = summarize_csv(&csv_text, &BudgetConfig::default());
    match export.summary() {
        Some(summary) => {
            for (day, data) in summary {
                println!("Day {} ({}):", day, data.date);
                for activity in &data.activities {
                    println!("  - {}", activity);
                }
                println!("  Total Cost: ${:.2}", data.total_cost);
            }
        }
        None => {
            for error in export.errors().unwrap_or_default() {
                println!("{}", error);
            }
        }
    }

    Ok(())
}
