pub mod entities;
pub mod luis;

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::config::AppConfig;
use crate::models::RecognitionResult;

pub use entities::{extract_destination, extract_direction, extract_origin};

#[async_trait]
pub trait RecognitionService: Send + Sync {
    async fn recognize(&self, utterance: &str) -> anyhow::Result<RecognitionResult>;
}

/// Front for the optional recognition service. Built without a service when
/// the configuration is incomplete, in which case callers skip recognition.
pub struct EntityRecognizer {
    service: Option<Box<dyn RecognitionService>>,
    timeout: Duration,
}

impl EntityRecognizer {
    pub fn from_config(config: &AppConfig) -> Self {
        let service: Option<Box<dyn RecognitionService>> = if config.luis_configured() {
            Some(Box::new(luis::LuisService::new(
                config.luis_app_id.clone(),
                config.luis_api_key.clone(),
                config.luis_api_host_name.clone(),
            )))
        } else {
            None
        };

        Self {
            service,
            timeout: Duration::from_secs(config.recognizer_timeout_secs),
        }
    }

    pub fn with_service(service: Box<dyn RecognitionService>, timeout: Duration) -> Self {
        Self {
            service: Some(service),
            timeout,
        }
    }

    pub fn disabled() -> Self {
        Self {
            service: None,
            timeout: Duration::from_secs(0),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.service.is_some()
    }

    pub async fn recognize(&self, utterance: &str) -> anyhow::Result<RecognitionResult> {
        let service = self
            .service
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("entity recognizer is not configured"))?;

        tokio::time::timeout(self.timeout, service.recognize(utterance))
            .await
            .context("entity recognition timed out")?
    }
}
