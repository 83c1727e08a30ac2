use regex::Regex;

/// The pieces peeled out of one activity line, all still raw text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedActivity {
    pub activity: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub cost: Option<String>,
    pub travel_distance: Option<String>,
}

/// Splits a free-text activity line into its fields.
///
/// Extraction is order-sensitive and destructive: each step removes its
/// match before the next step runs, so a travel parenthetical at the end
/// of the line can never be mistaken for a description, and a `$` inside
/// a description can never be mistaken for a cost.
pub struct FieldExtractor {
    trailing_parenthetical: Regex,
    travel_keyword: Regex,
    bare_number: Regex,
    location: Regex,
    cost: Regex,
    parenthetical: Regex,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            trailing_parenthetical: Regex::new(r"\s*\(([^)]*)\)\s*$").unwrap(),
            travel_keyword: Regex::new(r"(?i)min|hour|walk|travel time").unwrap(),
            bare_number: Regex::new(r"^\d[\d,.]*$").unwrap(),
            location: Regex::new(r"\s*@\s*([^($]*)").unwrap(),
            cost: Regex::new(r"\s*\$([\w,.]+)(?:\s*per\s+person)?").unwrap(),
            parenthetical: Regex::new(r"\s*\(([^)]*)\)").unwrap(),
        }
    }

    pub fn split(&self, line: &str) -> ExtractedActivity {
        let mut remaining = line.trim().to_string();

        // 1. Travel distance: a trailing parenthesized group that carries a
        // time/travel keyword or is a bare number. Anchored at the end of
        // the line, so it is removed before description extraction can see it.
        let mut travel_distance = None;
        if let Some(caps) = self.trailing_parenthetical.captures(&remaining) {
            let content = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if self.travel_keyword.is_match(content) || self.bare_number.is_match(content) {
                travel_distance = Some(content.to_string());
                let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                remaining.truncate(start);
            }
        }

        // 2. Location: an @-prefixed token run, up to the next `$`, `(` or
        // the end of the line.
        let mut location = None;
        if let Some(caps) = self.location.captures(&remaining) {
            let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if !name.is_empty() {
                location = Some(name.to_string());
            }
            remaining = splice_out(&remaining, caps.get(0).map(|m| m.range()).unwrap_or(0..0));
        }

        // 3. Cost: a $-prefixed token, optionally "per person". The token
        // is kept as text so the entry constructor can report coercion
        // failures against the cost field.
        let mut cost = None;
        if let Some(caps) = self.cost.captures(&remaining) {
            cost = caps.get(1).map(|m| m.as_str().trim().to_string());
            remaining = splice_out(&remaining, caps.get(0).map(|m| m.range()).unwrap_or(0..0));
        }

        // 4. Description: whatever parenthesized groups are left, joined.
        let mut descriptions = Vec::new();
        for caps in self.parenthetical.captures_iter(&remaining) {
            if let Some(group) = caps.get(1) {
                descriptions.push(group.as_str().trim().to_string());
            }
        }
        let description = if descriptions.is_empty() {
            None
        } else {
            Some(descriptions.join(" "))
        };
        let remaining = self.parenthetical.replace_all(&remaining, "").to_string();

        // 5. The rest is the activity label.
        ExtractedActivity {
            activity: remaining.trim().to_string(),
            description,
            location,
            cost,
            travel_distance,
        }
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn splice_out(text: &str, range: std::ops::Range<usize>) -> String {
    let mut result = String::with_capacity(text.len());
    result.push_str(&text[..range.start]);
    result.push_str(&text[range.end..]);
    result
}
