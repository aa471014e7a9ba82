//! Validation of incoming article search parameters
//!
//! Raw query-string values are checked against a fixed set of rules and turned
//! into an `ArticleQuery`. Every field is checked so a single response can
//! report all of the violations at once.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Search term used when the request does not supply `q`
pub const DEFAULT_QUERY: &str = "technology";

/// Article count used when the request does not supply `max`
pub const DEFAULT_MAX: u32 = 10;

/// Smallest accepted `max`
pub const MIN_MAX: u32 = 1;

/// Largest accepted `max`
pub const MAX_MAX: u32 = 100;

/// News categories supported by the GNews API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    World,
    Nation,
    Business,
    Technology,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl Category {
    /// All categories, in the order GNews documents them
    pub const ALL: [Category; 9] = [
        Category::General,
        Category::World,
        Category::Nation,
        Category::Business,
        Category::Technology,
        Category::Entertainment,
        Category::Sports,
        Category::Science,
        Category::Health,
    ];

    /// The wire name of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::World => "world",
            Category::Nation => "nation",
            Category::Business => "business",
            Category::Technology => "technology",
            Category::Entertainment => "entertainment",
            Category::Sports => "sports",
            Category::Science => "science",
            Category::Health => "health",
        }
    }

    /// Parses a category from its exact wire name
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated article search request with defaults applied
///
/// Serializes to the `requestParams` object echoed back to clients, with
/// absent optional fields omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleQuery {
    /// Search keywords
    pub q: String,
    /// Maximum number of articles to request from upstream
    pub max: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Source-name filter applied locally after the upstream call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Earliest publication time, ISO 8601 in UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Latest publication time, ISO 8601 in UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            q: DEFAULT_QUERY.to_string(),
            max: DEFAULT_MAX,
            category: None,
            author: None,
            from: None,
            to: None,
        }
    }
}

/// Field-level validation failures, keyed by parameter name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages reported for `field`, empty if the field was valid
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join("; ")))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ArticleQuery {
    /// Validates raw query parameters
    ///
    /// Unknown parameters are ignored. Missing `q` and `max` take their defaults.
    ///
    /// # Returns
    /// * `Ok(ArticleQuery)` if every supplied parameter is valid
    /// * `Err(ValidationErrors)` listing every violation otherwise
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let mut query = ArticleQuery::default();

        if let Some(q) = params.get("q") {
            if q.is_empty() {
                errors.add("q", "Query parameter 'q' cannot be empty.");
            } else {
                query.q = q.clone();
            }
        }

        if let Some(raw) = params.get("max") {
            match parse_max(raw) {
                Ok(max) => query.max = max,
                Err(messages) => {
                    for message in messages {
                        errors.add("max", message);
                    }
                }
            }
        }

        if let Some(raw) = params.get("category") {
            match Category::from_str(raw) {
                Some(category) => query.category = Some(category),
                None => errors.add("category", invalid_category_message(raw)),
            }
        }

        query.author = params.get("author").cloned();

        for (field, slot) in [("from", &mut query.from), ("to", &mut query.to)] {
            if let Some(raw) = params.get(field) {
                if is_iso_datetime(raw) {
                    *slot = Some(raw.clone());
                } else {
                    errors.add(
                        field,
                        format!("Invalid '{}' date format. Use ISO 8601.", field),
                    );
                }
            }
        }

        if errors.is_empty() {
            Ok(query)
        } else {
            Err(errors)
        }
    }
}

/// Coerces `max` the way a numeric query parameter is read: surrounding
/// whitespace is ignored and an empty value counts as zero.
fn parse_max(raw: &str) -> Result<u32, Vec<String>> {
    let trimmed = raw.trim();
    let value = if trimmed.is_empty() {
        0.0
    } else {
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    };

    if value.is_nan() {
        return Err(vec!["Expected number, received nan".to_string()]);
    }

    let mut messages = Vec::new();
    if !value.is_finite() || value.fract() != 0.0 {
        messages.push("Expected integer, received float".to_string());
    }
    if value < f64::from(MIN_MAX) {
        messages.push(format!("Number must be greater than or equal to {}", MIN_MAX));
    }
    if value > f64::from(MAX_MAX) {
        messages.push(format!("Number must be less than or equal to {}", MAX_MAX));
    }

    if messages.is_empty() {
        Ok(value as u32)
    } else {
        Err(messages)
    }
}

fn invalid_category_message(received: &str) -> String {
    let expected: Vec<String> = Category::ALL
        .iter()
        .map(|category| format!("'{}'", category))
        .collect();
    format!(
        "Invalid enum value. Expected {}, received '{}'",
        expected.join(" | "),
        received
    )
}

/// Accepts UTC timestamps such as `2024-07-15T05:30:00Z` or `2024-07-15T05:30:00.123Z`
fn is_iso_datetime(value: &str) -> bool {
    let Some(naive) = value.strip_suffix('Z') else {
        return false;
    };
    // Reject signed or extended years that chrono would otherwise accept
    if naive.len() < 19 || !naive.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
        return false;
    }
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}
