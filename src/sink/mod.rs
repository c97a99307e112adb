use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// One line of the submitted answer sheet. `selected` is the chosen label, or
/// empty when the question was left unanswered.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AnswerDetail {
    pub id: String,
    pub selected: String,
}

/// The structured outcome of a submitted session, built once at submission
/// and delivered to the remote sink as JSON.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ResultPayload {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub score: u32,
    pub total: usize,
    pub answers: Vec<AnswerDetail>,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not reach the result endpoint")]
    Unreachable(#[source] anyhow::Error),
    #[error("result endpoint rejected the payload with status {0}")]
    Rejected(u16),
}

/// Receives a finished result payload for off-device storage. Delivery is
/// fire-and-forget with a single attempt; a failure never blocks the local
/// score display.
pub trait ResultSink {
    fn deliver(&mut self, payload: &ResultPayload) -> Result<(), SinkError>;
}

/// POSTs the payload as JSON to a fixed endpoint.
pub struct HttpResultSink {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpResultSink {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SinkError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SinkError::Unreachable(e.into()))?;
        Ok(HttpResultSink {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl ResultSink for HttpResultSink {
    fn deliver(&mut self, payload: &ResultPayload) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .map_err(|e| SinkError::Unreachable(e.into()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected(status.as_u16()));
        }
        match response.json::<serde_json::Value>() {
            Ok(body) => debug!("result endpoint acknowledged: {}", body),
            Err(error) => debug!("result endpoint sent a non-JSON response: {}", error),
        }
        Ok(())
    }
}
