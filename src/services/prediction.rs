//! Remote stress prediction. Any failure yields [`DEFAULT_STATUS`].

use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_STATUS: &str = "Mixed Mood";

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    overall_status: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PredictionClient {
    client: reqwest::Client,
    url: Option<String>,
}

impl PredictionClient {
    pub fn new(url: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub async fn predict(&self, user_id: &str) -> String {
        let Some(url) = self.url.as_deref() else {
            return DEFAULT_STATUS.to_string();
        };

        match self.request(url, user_id).await {
            Ok(Some(status)) if !status.trim().is_empty() => status,
            Ok(_) => DEFAULT_STATUS.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Stress prediction unavailable, using default status");
                DEFAULT_STATUS.to_string()
            }
        }
    }

    async fn request(&self, url: &str, user_id: &str) -> anyhow::Result<Option<String>> {
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "user_id": user_id }))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("prediction API error {}", response.status());
        }

        let body = response.text().await?;
        let parsed: PredictionResponse = serde_json::from_str(&body)?;
        Ok(parsed.overall_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(url: Option<String>) -> PredictionClient {
        PredictionClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn predict_returns_overall_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_json(serde_json::json!({ "user_id": "u-1" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "overall_status": "Low Stress" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let status = client(Some(format!("{}/predict", server.uri())))
            .predict("u-1")
            .await;

        assert_eq!(status, "Low Stress");
    }

    #[tokio::test]
    async fn missing_field_uses_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let status = client(Some(server.uri())).predict("u-1").await;

        assert_eq!(status, DEFAULT_STATUS);
    }

    #[tokio::test]
    async fn parse_failure_uses_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let status = client(Some(server.uri())).predict("u-1").await;

        assert_eq!(status, DEFAULT_STATUS);
    }

    #[tokio::test]
    async fn error_status_uses_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let status = client(Some(server.uri())).predict("u-1").await;

        assert_eq!(status, DEFAULT_STATUS);
    }

    #[tokio::test]
    async fn unconfigured_url_uses_default() {
        assert_eq!(client(None).predict("u-1").await, DEFAULT_STATUS);
    }
}
