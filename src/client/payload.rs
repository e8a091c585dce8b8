//! Wire types for the ensemble `generate` endpoint.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Token generation budget used when the caller does not pass one.
pub const DEFAULT_MAX_TOKENS: u32 = 250;

/// Padding and end-of-sequence token id expected by the ensemble model.
pub const SPECIAL_TOKEN_ID: u32 = 2;

/// JSON body POSTed to the generate endpoint.
///
/// Field order matches what the server expects to see on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferenceRequest {
    pub text_input: String,
    pub max_tokens: u32,
    pub bad_words: String,
    pub stop_words: String,
    pub pad_id: u32,
    pub end_id: u32,
}

impl InferenceRequest {
    pub fn new(text_input: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            text_input: text_input.into(),
            max_tokens,
            bad_words: String::new(),
            stop_words: String::new(),
            pad_id: SPECIAL_TOKEN_ID,
            end_id: SPECIAL_TOKEN_ID,
        }
    }
}

/// Response body. Everything except `text_output` is ignored.
///
/// The body must be a JSON object. A missing `text_output` reads as empty;
/// any other type in that field is rejected.
#[derive(Debug, Clone, Default)]
pub struct InferenceResponse {
    pub text_output: String,
}

impl<'de> Deserialize<'de> for InferenceResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Map only accepts objects; a derived impl would also take arrays.
        let mut body = Map::<String, Value>::deserialize(deserializer)?;
        let text_output = match body.remove("text_output") {
            None => String::new(),
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "invalid type for text_output: {}, expected a string",
                    json_type(&other)
                )))
            }
        };
        Ok(Self { text_output })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl InferenceResponse {
    /// Generated text with surrounding whitespace removed.
    pub fn into_text(self) -> String {
        self.text_output.trim().to_string()
    }
}
