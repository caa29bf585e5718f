/// Machine translation via the Microsoft Translator v3 API
use serde_json::json;
use uuid::Uuid;

use crate::config::TranslatorConfig;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct TranslatorClient {
    http: reqwest::Client,
    key: Option<String>,
    endpoint: String,
}

impl TranslatorClient {
    pub fn new(config: &TranslatorConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            key: config.key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Translate `text` from `src_lang` to `dest_lang`
    pub async fn translate(&self, text: &str, src_lang: &str, dest_lang: &str) -> Result<String> {
        let Some(key) = &self.key else {
            return Err(AppError::Translation(
                "the translation service is not configured".to_string(),
            ));
        };

        let url = format!("{}/translate", self.endpoint);
        let response = self
            .http
            .post(&url)
            .query(&[
                ("api-version", "3.0"),
                ("from", src_lang),
                ("to", dest_lang),
            ])
            .header("Ocp-Apim-Subscription-Key", key)
            .header("X-ClientTraceId", Uuid::new_v4().to_string())
            .json(&json!([{ "text": text }]))
            .send()
            .await
            .map_err(|e| AppError::Translation(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Translation(format!(
                "the translation service failed with status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Translation(format!("invalid response: {e}")))?;

        body[0]["translations"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::Translation("unexpected response shape".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_key_yields_typed_error() {
        let client = TranslatorClient::new(&TranslatorConfig {
            key: None,
            endpoint: "https://api.cognitive.microsofttranslator.com".to_string(),
        });

        let err = client.translate("hola", "es", "en").await.unwrap_err();
        assert!(matches!(err, AppError::Translation(_)));
    }
}
