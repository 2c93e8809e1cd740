use serde_json::Value;

use crate::models::{DestinationInfo, DirectionInfo, OriginInfo, RecognitionResult};

// The service omits keys for entity types it did not find, so every lookup
// below probes and falls back to an empty string. Indexing a serde_json
// `Value` yields `Null` for missing keys and out-of-range indexes.

pub fn extract_origin(result: &RecognitionResult) -> OriginInfo {
    let (city, airport) = city_and_airport(result, "From");
    OriginInfo { city, airport }
}

pub fn extract_destination(result: &RecognitionResult) -> DestinationInfo {
    let (city, airport) = city_and_airport(result, "To");
    DestinationInfo { city, airport }
}

pub fn extract_direction(result: &RecognitionResult) -> DirectionInfo {
    DirectionInfo {
        direction: text_or_empty(&result.instance()["direction"][0]["text"]),
    }
}

fn city_and_airport(result: &RecognitionResult, entity: &str) -> (String, String) {
    let city = text_or_empty(&result.instance()[entity][0]["text"]);
    if city.is_empty() {
        return (city, String::new());
    }

    let airport = text_or_empty(&result.entities[entity][0]["Airport"][0][0]);
    (city, airport)
}

fn text_or_empty(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}
