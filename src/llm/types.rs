use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One conversational turn in a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::Text { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    pub parts: Vec<Part>,
}

/// The travel parameters extracted from a user's free-text request. Every
/// field is optional: the planner keeps asking until nothing is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TripPlan {
    #[schemars(description = "Destination city or region, e.g. 'Rome'")]
    pub destination: Option<String>,

    #[schemars(description = "Trip length in days")]
    pub duration: Option<u32>,

    #[schemars(description = "Month of travel, e.g. 'July'")]
    pub month: Option<String>,

    #[schemars(description = "Who is travelling, e.g. 'a couple' or 'family with kids'")]
    pub traveler_type: Option<String>,

    #[schemars(description = "Interests to build the itinerary around")]
    #[serde(default)]
    pub interests: Vec<String>,

    #[schemars(description = "Total trip budget as a plain dollar amount")]
    pub budget: Option<f64>,
}

impl TripPlan {
    /// Names the parameters the user still has to supply before an
    /// itinerary can be generated.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.destination.is_none() {
            missing.push("destination");
        }
        if self.duration.is_none() {
            missing.push("duration");
        }
        if self.month.is_none() {
            missing.push("month");
        }
        if self.traveler_type.is_none() {
            missing.push("traveler type");
        }
        if self.interests.is_empty() {
            missing.push("interests");
        }
        if self.budget.is_none() {
            missing.push("budget");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Overlays newly extracted values onto an existing plan, keeping
    /// anything the update leaves unset.
    pub fn merge(&mut self, update: TripPlan) {
        if update.destination.is_some() {
            self.destination = update.destination;
        }
        if update.duration.is_some() {
            self.duration = update.duration;
        }
        if update.month.is_some() {
            self.month = update.month;
        }
        if update.traveler_type.is_some() {
            self.traveler_type = update.traveler_type;
        }
        if !update.interests.is_empty() {
            self.interests = update.interests;
        }
        if update.budget.is_some() {
            self.budget = update.budget;
        }
    }

    /// Gemini-compatible response schema for structured plan extraction.
    pub fn response_schema() -> serde_json::Result<serde_json::Value> {
        let root = schemars::schema_for!(TripPlan);
        let mut value = serde_json::to_value(root)?;
        if let Some(object) = value.as_object_mut() {
            object.remove("$schema");
            object.remove("title");
        }
        Ok(value)
    }
}
