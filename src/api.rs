use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::data::model::AnalysisResult;
use crate::error::SubmitError;

/// Something that turns flattened monthly observations into harmonics.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, observations: &[f64]) -> Result<AnalysisResult, SubmitError>;
}

/// Client for the remote analysis service.
///
/// Sends `POST {base}/` with the observations as a JSON array and a bearer
/// token, expecting `{"frequencies": [...], "amplitudes": [...], "phases": [...]}`.
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpAnalysisClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, observations: &[f64]) -> Result<AnalysisResult, SubmitError> {
        let url = self.config.endpoint();
        log::debug!("POST {url} with {} observations", observations.len());

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(observations)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    let e = anyhow::Error::from(e);
                    log::warn!("Could not read body of HTTP {status} response: {e:#}");
                    format!("<unreadable response body: {e:#}>")
                }
            };
            return Err(SubmitError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<AnalysisResult>().await?)
    }
}
