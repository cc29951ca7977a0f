// ABOUTME: Client profile model captured by the dietitian and sent to the AI generator
// ABOUTME: Mirrors the stored client document with camelCase wire names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder used in prompts for profile fields the dietitian left empty
pub const NOT_SPECIFIED: &str = "Not specified";

/// A dietitian's client
///
/// Measurements are kept as free text (`"172 cm"`, `"68kg"`) because they are
/// entered by hand and only ever echoed back into prompts and documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientProfile {
    /// Document ID (empty until stored)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Owning dietitian
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dietitian_id: String,
    /// Client full name
    pub full_name: String,
    /// Age as entered
    #[serde(deserialize_with = "text_or_number")]
    pub age: String,
    /// Gender as entered
    pub gender: String,
    /// Height as entered
    #[serde(deserialize_with = "text_or_number")]
    pub height: String,
    /// Weight as entered
    #[serde(deserialize_with = "text_or_number")]
    pub weight: String,
    /// Known medical conditions
    pub medical_conditions: Vec<String>,
    /// Food allergies
    pub allergies: Vec<String>,
    /// Nutrition goals
    pub goals: String,
    /// Dietitian's private notes
    pub notes: String,
    /// Creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ClientProfile {
    /// Name to show in prompts and documents
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_empty_or(&self.full_name, "Client")
    }

    /// Field value, or [`NOT_SPECIFIED`] when blank
    #[must_use]
    pub fn field_or_unspecified(value: &str) -> &str {
        non_empty_or(value, NOT_SPECIFIED)
    }
}

/// Accept `"34"`, `34` or `null` for hand-entered measurement fields
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_profile() {
        let client: ClientProfile =
            serde_json::from_str(r#"{"fullName":"Ana","allergies":["peanuts"]}"#).unwrap();
        assert_eq!(client.display_name(), "Ana");
        assert_eq!(client.allergies, vec!["peanuts"]);
        assert!(client.medical_conditions.is_empty());
        assert_eq!(ClientProfile::field_or_unspecified(&client.age), NOT_SPECIFIED);
    }

    #[test]
    fn test_blank_name_falls_back() {
        let client = ClientProfile {
            full_name: "  ".into(),
            ..ClientProfile::default()
        };
        assert_eq!(client.display_name(), "Client");
    }

    #[test]
    fn test_numeric_measurements_become_text() {
        let client: ClientProfile =
            serde_json::from_str(r#"{"age":34,"height":"170 cm","weight":null}"#).unwrap();
        assert_eq!(client.age, "34");
        assert_eq!(client.height, "170 cm");
        assert_eq!(client.weight, "");
    }
}
