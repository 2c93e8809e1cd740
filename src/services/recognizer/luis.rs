use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::RecognitionService;
use crate::models::RecognitionResult;

/// LUIS v3 prediction endpoint client.
pub struct LuisService {
    app_id: String,
    api_key: String,
    host_name: String,
    client: reqwest::Client,
}

impl LuisService {
    pub fn new(app_id: String, api_key: String, host_name: String) -> Self {
        Self {
            app_id,
            api_key,
            host_name,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        // The setting is a host name; tolerate a pasted URL with any scheme.
        let host = self.host_name.trim();
        let host = host
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(host)
            .trim_end_matches('/');
        format!(
            "https://{}/luis/prediction/v3.0/apps/{}/slots/production/predict",
            host, self.app_id
        )
    }
}

#[async_trait]
impl RecognitionService for LuisService {
    async fn recognize(&self, utterance: &str) -> anyhow::Result<RecognitionResult> {
        let body = json!({
            "query": utterance,
            "options": {
                "includeInstanceData": true,
                "includeAllIntents": true,
            },
        });

        let resp = self
            .client
            .post(self.endpoint())
            .query(&[("verbose", "true"), ("log", "true")])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call LUIS API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse LUIS response")?;

        if !status.is_success() {
            anyhow::bail!("LUIS API error ({}): {}", status, data);
        }

        parse_prediction(utterance, data)
    }
}

fn parse_prediction(utterance: &str, data: serde_json::Value) -> anyhow::Result<RecognitionResult> {
    let prediction = data
        .get("prediction")
        .ok_or_else(|| anyhow::anyhow!("missing prediction in LUIS response"))?;

    Ok(RecognitionResult {
        text: data["query"].as_str().unwrap_or(utterance).to_string(),
        top_intent: prediction["topIntent"].as_str().map(|s| s.to_string()),
        entities: prediction
            .get("entities")
            .cloned()
            .unwrap_or_else(|| json!({})),
    })
}
