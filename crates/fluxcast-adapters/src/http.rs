// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use crate::errors::{AdapterError, AdapterResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Shared JSON-over-HTTP client with retry and exponential backoff
#[derive(Debug, Clone)]
pub struct JsonHttpClient {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl JsonHttpClient {
    pub fn new(timeout: Duration) -> AdapterResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
        })
    }

    /// Override the retry policy (tests use a zero delay)
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// GET `url` with query parameters and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> AdapterResult<T> {
        debug!("🔍 [{}] GET {} {:?}", service, url, query);

        let response = self
            .retry_request(|| async { self.client.get(url).query(query).send().await })
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                error!("❌ [{}] Status {}: {}", service, status, message);
                Err(AdapterError::ApiError {
                    service,
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn retry_request<F, Fut>(&self, mut request_fn: F) -> AdapterResult<reqwest::Response>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay;

        loop {
            attempts += 1;
            match request_fn().await {
                Ok(response) => return Ok(response),
                Err(e) if attempts >= self.max_retries => {
                    error!("Request failed after {} attempts: {}", attempts, e);
                    return Err(AdapterError::HttpError(e));
                }
                Err(e) => {
                    warn!(
                        "Request failed (attempt {}/{}): {}. Retrying in {:?}",
                        attempts, self.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2; // Exponential backoff
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Echo {
        value: f64,
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/echo")
            .match_query(Matcher::UrlEncoded("year".into(), "2025".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"value": 4.5}"#)
            .create_async()
            .await;

        let client = JsonHttpClient::new(Duration::from_secs(5)).unwrap();
        let echo: Echo = client
            .get_json(
                "test",
                &format!("{}/echo", server.url()),
                &[("year", "2025".to_owned())],
            )
            .await
            .unwrap();

        assert!((echo.value - 4.5).abs() < f64::EPSILON);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_json_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/echo")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let client = JsonHttpClient::new(Duration::from_secs(5)).unwrap();
        let result: AdapterResult<Echo> = client
            .get_json("test", &format!("{}/echo", server.url()), &[])
            .await;

        match result {
            Err(AdapterError::ApiError {
                status, message, ..
            }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_failure_after_retries() {
        // Nothing listens on port 9 of localhost
        let client = JsonHttpClient::new(Duration::from_millis(200))
            .unwrap()
            .with_retries(2, Duration::from_millis(1));
        let result: AdapterResult<Echo> = client.get_json("test", "http://127.0.0.1:9/echo", &[]).await;
        assert!(matches!(result, Err(AdapterError::HttpError(_))));
    }
}
