//! Projection of a parsed model result into the flattened record fields.
//!
//! The flattened fields (`condition`, `confidence`, `advice`, `urgency`,
//! `medications`) are a cache for aggregation queries; the parsed `result`
//! value stays the source of truth. The projection is computed exactly once,
//! at record creation, and must be deterministic.

use serde_json::Value;

/// Numeric values for the qualitative confidence levels some prompt versions
/// return (`"HIGH"` / `"MEDIUM"` / `"LOW"` inside `possible_conditions`).
///
/// The mapping is a policy choice, not a derived fact, so it is carried as
/// explicit configuration rather than a constant buried in the parser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceLevels {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for ConfidenceLevels {
    fn default() -> Self {
        Self {
            high: 0.9,
            medium: 0.6,
            low: 0.3,
        }
    }
}

impl ConfidenceLevels {
    /// Map a qualitative level name to its numeric confidence.
    /// Unknown labels yield `None`.
    pub fn numeric(&self, level: &str) -> Option<f64> {
        match level.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Some(self.high),
            "MEDIUM" => Some(self.medium),
            "LOW" => Some(self.low),
            _ => None,
        }
    }
}

/// The flattened query fields derived from a parsed model result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assessment {
    pub condition: String,
    pub confidence: Option<f64>,
    pub advice: String,
    pub urgency: String,
    pub medications: Option<Value>,
}

impl Assessment {
    /// Derive the flattened fields from a parsed result, if any.
    ///
    /// Two response schemas are handled:
    ///
    /// - flat: top-level `condition` (string) and `confidence` (number);
    /// - nested: `possible_conditions: [{name, confidence: "HIGH"|..}, ..]`,
    ///   where the first entry wins and its qualitative level is mapped
    ///   through `levels`.
    ///
    /// Missing or mistyped fields project to empty/`None`; `project(None, _)`
    /// is the all-empty assessment stored when parsing failed.
    pub fn project(result: Option<&Value>, levels: &ConfidenceLevels) -> Self {
        let Some(result) = result else {
            return Self::default();
        };

        let mut condition = string_field(result, "condition");
        let mut confidence = result.get("confidence").and_then(Value::as_f64);

        if condition.is_empty() {
            if let Some(first) = result
                .get("possible_conditions")
                .and_then(Value::as_array)
                .and_then(|list| list.first())
            {
                condition = string_field(first, "name");
                if condition.is_empty() {
                    condition = string_field(first, "condition");
                }
                confidence = match first.get("confidence") {
                    Some(Value::Number(n)) => n.as_f64(),
                    Some(Value::String(level)) => levels.numeric(level),
                    _ => None,
                };
            }
        }

        Self {
            condition,
            confidence,
            advice: string_field(result, "advice"),
            urgency: string_field(result, "urgency"),
            medications: result
                .get("medications")
                .filter(|m| !m.is_null())
                .cloned(),
        }
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
