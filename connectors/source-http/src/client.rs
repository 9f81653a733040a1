//! Blocking HTTP client for the upstream API.

use std::time::Duration;

use conveyor_sdk::errors::ConnectorError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::HttpConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub userid: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub userid: i64,
    #[serde(rename = "paymentAmount")]
    pub payment_amount: i64,
}

pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(config: &HttpConfig) -> Result<Self, ConnectorError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConnectorError::internal("CLIENT_BUILD_FAILED", e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Verify the API key against the ping endpoint.
    pub fn ping(&self) -> Result<(), ConnectorError> {
        self.get::<serde_json::Value>("/ping", None).map(|_| ())
    }

    /// Users changed since `since` (epoch millis), or all users.
    pub fn users(&self, since: Option<i64>) -> Result<Vec<User>, ConnectorError> {
        self.get("/users", since)
    }

    /// Payments changed since `since` (epoch millis), or all payments.
    pub fn payments(&self, since: Option<i64>) -> Result<Vec<Payment>, ConnectorError> {
        self.get("/payments", since)
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        since: Option<i64>,
    ) -> Result<T, ConnectorError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.get(&url).query(&[("key", self.api_key.as_str())]);
        if let Some(since) = since {
            request = request.query(&[("since", since)]);
        }

        let response = request.send().map_err(|e| {
            ConnectorError::transient_network("REQUEST_FAILED", format!("GET {url}: {e}"))
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, &url));
        }
        response.json().map_err(|e| {
            ConnectorError::data("INVALID_RESPONSE_BODY", format!("GET {url}: {e}"))
        })
    }
}

fn classify_status(status: reqwest::StatusCode, url: &str) -> ConnectorError {
    match status.as_u16() {
        401 => ConnectorError::auth("UNAUTHORIZED", format!("GET {url}: api key rejected")),
        403 => ConnectorError::permission("FORBIDDEN", format!("GET {url}: access denied")),
        429 => ConnectorError::rate_limit("TOO_MANY_REQUESTS", format!("GET {url}: rate limited")),
        _ => ConnectorError::transient_network(
            "UNEXPECTED_STATUS",
            format!("GET {url}: HTTP {status}"),
        ),
    }
}
