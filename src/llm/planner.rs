use crate::error::{ItineraryError, Result};
use crate::llm::client::GeminiClient;
use crate::llm::prompts;
use crate::llm::types::{Content, TripPlan};
use log::{debug, info};

/// Drives trip planning against the text generator: parameter extraction
/// from free text, itinerary generation, and trip titling.
///
/// The planner only produces raw text. Whether the generated itinerary is
/// actually parseable is the entry parser's problem, by design.
pub struct TripPlanner {
    client: GeminiClient,
    model: String,
}

impl TripPlanner {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Extracts trip parameters from a user message as a structured
    /// `TripPlan`. Values the message doesn't mention come back unset.
    pub async fn extract_plan(&self, user_input: &str) -> Result<TripPlan> {
        let schema = TripPlan::response_schema()?;
        let raw = self
            .client
            .generate_content(
                &self.model,
                prompts::EXTRACTION_SYSTEM_PROMPT,
                vec![Content::user(prompts::plan_extraction_prompt(user_input))],
                Some(schema),
                "application/json",
            )
            .await?;

        let cleaned = clean_json_output(&raw);
        let plan: TripPlan = serde_json::from_str(&cleaned).map_err(|e| {
            ItineraryError::GenerationFailed(format!("Plan extraction returned bad JSON: {}", e))
        })?;
        debug!("Extracted plan: {:?}", plan);
        Ok(plan)
    }

    /// Requests the day-by-day markdown itinerary for a plan.
    pub async fn generate_itinerary(&self, plan: &TripPlan) -> Result<String> {
        info!(
            "Generating itinerary for {}",
            plan.destination.as_deref().unwrap_or("unknown destination")
        );
        self.client
            .generate_content(
                &self.model,
                prompts::PLANNER_SYSTEM_PROMPT,
                vec![Content::user(prompts::itinerary_prompt(plan))],
                None,
                "text/plain",
            )
            .await
    }

    /// Generates a short trip title, preferring the user's original query
    /// when one is available.
    pub async fn trip_title(&self, plan: &TripPlan, initial_query: Option<&str>) -> Result<String> {
        let raw = self
            .client
            .generate_content(
                &self.model,
                prompts::PLANNER_SYSTEM_PROMPT,
                vec![Content::user(prompts::trip_title_prompt(plan, initial_query))],
                None,
                "text/plain",
            )
            .await?;

        let title: String = raw.trim().replace(['"', '\''], "");
        if title.is_empty() {
            Ok("Untitled Trip".to_string())
        } else {
            Ok(title)
        }
    }
}

/// Strips markdown code fences and surrounding chatter from a JSON reply,
/// keeping the outermost object or array.
fn clean_json_output(raw: &str) -> String {
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            return raw[start..=end].to_string();
        }
    }
    if let (Some(start), Some(end)) = (raw.find('['), raw.rfind(']')) {
        if start < end {
            return raw[start..=end].to_string();
        }
    }
    raw.trim().to_string()
}
