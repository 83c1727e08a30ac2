use crate::llm::types::TripPlan;

pub const PLANNER_SYSTEM_PROMPT: &str =
    "You are a travel planning assistant. Follow the requested output format exactly.";

pub const EXTRACTION_SYSTEM_PROMPT: &str =
    "You extract structured travel parameters from user messages. Return ONLY valid JSON.";

/// Prompt for pulling trip parameters out of a free-text request.
pub fn plan_extraction_prompt(user_input: &str) -> String {
    format!(
        "Extract the following travel planning parameters from the user's input.\n\
        Return the information as a JSON object with the keys:\n\
        'destination', 'duration', 'month', 'traveler_type', 'interests', 'budget'.\n\
        If a value is not present, set it to null.\n\n\
        User Input: '{}'",
        user_input
    )
}

/// Prompt for the day-by-day markdown itinerary. The format contract here
/// is what the entry parser expects back: bold day headers with a date,
/// then one `*` bullet per activity carrying description, location, cost
/// and travel distance in a fixed shape.
pub fn itinerary_prompt(plan: &TripPlan) -> String {
    let destination = plan.destination.as_deref().unwrap_or("the destination");
    let duration = plan.duration.unwrap_or(3);
    let month = plan.month.as_deref().unwrap_or("any month");
    let traveler_type = plan.traveler_type.as_deref().unwrap_or("travelers");
    let interests = if plan.interests.is_empty() {
        "general sightseeing".to_string()
    } else {
        plan.interests.join(", ")
    };
    let budget = plan.budget.unwrap_or(1000.0);

    format!(
        "Generate a {duration}-day itinerary for a trip to {destination} in {month} \
        for {traveler_type} interested in {interests}. The budget is around ${budget}. \
        For each day, include a specific date (e.g., July 17, 2025).\n\n\
        For each activity, include: Activity Name (Description) @ Location $Cost \
        (Travel Distance to Next Location). Leave Travel Distance empty for the last \
        activity of the day or trip.\n\n\
        **Day 1: [Date]: ...**\n\
        * ...\n\n\
        **Day 2: [Date]: ...**\n\
        * ..."
    )
}

/// Prompt for a short, human-friendly trip title.
pub fn trip_title_prompt(plan: &TripPlan, initial_query: Option<&str>) -> String {
    match initial_query {
        Some(query) => format!(
            "Generate a concise and descriptive title for a trip based on the \
            following user query:\n'{}'\n\n\
            Return only the title, without any additional text or punctuation.",
            query
        ),
        None => format!(
            "Generate a concise and descriptive title for a trip based on the following details:\n\
            Destination: {}\n\
            Duration: {} days\n\
            Month: {}\n\
            Traveler Type: {}\n\
            Interests: {}\n\
            Budget: ${}\n\n\
            Return only the title, without any additional text or punctuation.",
            plan.destination.as_deref().unwrap_or("unknown"),
            plan.duration.unwrap_or(0),
            plan.month.as_deref().unwrap_or("unknown"),
            plan.traveler_type.as_deref().unwrap_or("unknown"),
            plan.interests.join(", "),
            plan.budget.unwrap_or(0.0),
        ),
    }
}
