// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the grievance API.

use async_trait::async_trait;
use grievance_core::{GrievanceError, GrievanceRecord, GrievanceRequest};
use reqwest::{Response, Url};
use serde::Deserialize;
use tracing::debug;

/// Sends a filled-in form to the server.
#[async_trait]
pub trait Submitter: Send + Sync {
    /// On failure the error's message is what the user should see.
    async fn submit(&self, request: &GrievanceRequest) -> Result<GrievanceRecord, GrievanceError>;
}

/// Error body shape returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// reqwest-backed client for `/api/grievances`.
#[derive(Debug, Clone)]
pub struct HttpPortalClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpPortalClient {
    pub fn new(server_url: &str) -> Result<Self, GrievanceError> {
        let mut endpoint = Url::parse(server_url).map_err(|e| {
            GrievanceError::Config(format!("invalid server url `{server_url}`: {e}"))
        })?;
        endpoint
            .path_segments_mut()
            .map_err(|()| {
                GrievanceError::Config(format!("server url `{server_url}` cannot carry a path"))
            })?
            .pop_if_empty()
            .push("api")
            .push("grievances");

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Every stored grievance, newest first.
    pub async fn list(&self) -> Result<Vec<GrievanceRecord>, GrievanceError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response).await?;
        response.json().await.map_err(transport)
    }
}

#[async_trait]
impl Submitter for HttpPortalClient {
    async fn submit(&self, request: &GrievanceRequest) -> Result<GrievanceRecord, GrievanceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(transport)?;
        let response = ensure_success(response).await?;
        let record: GrievanceRecord = response.json().await.map_err(transport)?;
        debug!(id = %record.id, "grievance submitted");
        Ok(record)
    }
}

/// Non-2xx responses become errors carrying the server's `message` when it
/// sent one, otherwise the status line.
async fn ensure_success(response: Response) -> Result<Response, GrievanceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => format!("request failed with status {status}"),
    };
    Err(GrievanceError::Transport {
        message,
        source: None,
    })
}

fn transport(e: reqwest::Error) -> GrievanceError {
    GrievanceError::Transport {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}
