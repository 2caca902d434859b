// API client module: a small blocking HTTP client that posts GraphQL
// documents to the nutrition-labeling endpoint. One call, one outcome; no
// retries and no pooling guarantees beyond reqwest's defaults.

use crate::config::ApiSettings;
use crate::error::RequestFailure;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

/// Anything that can run a GraphQL document. The orchestrators are generic
/// over this so tests can record calls instead of hitting the network.
pub trait GraphQl {
    fn execute(&self, document: &str, variables: Value) -> Result<Value, RequestFailure>;
}

/// Request body sent to the endpoint.
#[derive(Serialize, Debug)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: &'a Value,
}

/// Holds a reqwest blocking client, the endpoint URL and the fixed
/// authentication headers.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

impl ApiClient {
    /// Build a client from the `[api]` settings section.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(&settings.api_key).context("API key is not a valid header value")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn log_failure(&self, document: &str, variables: &Value, failure: &RequestFailure) {
        error!("{}", failure);
        error!("Endpoint: {}", self.endpoint);
        error!("Query: {} \r\n Variables: {}", document.trim(), variables);
    }
}

impl GraphQl for ApiClient {
    /// POST `{query, variables}`. Only HTTP 200 counts as success; a GraphQL
    /// `errors` payload inside a 200 is returned as-is.
    fn execute(&self, document: &str, variables: Value) -> Result<Value, RequestFailure> {
        let body = GraphQlRequest {
            query: document,
            variables: &variables,
        };
        let outcome = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| RequestFailure::Transport(e.to_string()))
            .and_then(|res| {
                let status = res.status();
                if status != StatusCode::OK {
                    let txt = res.text().unwrap_or_else(|_| "".into());
                    return Err(RequestFailure::Status {
                        status: status.as_u16(),
                        body: txt,
                    });
                }
                res.json::<Value>()
                    .map_err(|e| RequestFailure::Decode(e.to_string()))
            });
        if let Err(failure) = &outcome {
            self.log_failure(document, &variables, failure);
        }
        outcome
    }
}
