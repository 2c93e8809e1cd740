use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw output of the entity recognition service. The `entities` tree mirrors
/// the service response, including the `$instance` index of matched spans.
/// Entity types the service did not recognize are simply absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub text: String,
    pub top_intent: Option<String>,
    pub entities: Value,
}

impl RecognitionResult {
    pub fn new(text: impl Into<String>, entities: Value) -> Self {
        Self {
            text: text.into(),
            top_intent: None,
            entities,
        }
    }

    pub fn instance(&self) -> &Value {
        &self.entities["$instance"]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OriginInfo {
    pub city: String,
    pub airport: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DestinationInfo {
    pub city: String,
    pub airport: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DirectionInfo {
    pub direction: String,
}
