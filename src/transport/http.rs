//! reqwest-backed transport.
//!
//! # Example
//!
//! ```ignore
//! use bigmachines_client::transport::{HttpTransport, SoapRequest, Transport};
//!
//! let transport = HttpTransport::new(None)?;
//! let response = transport.send(request).await?;
//! ```

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::{BoxFuture, RawResponse, SoapRequest, Transport};
use crate::error::Result;

/// Content type of outgoing SOAP 1.1 requests.
pub const SOAP_CONTENT_TYPE: &str = "text/xml;charset=UTF-8";

/// HTTP transport posting envelopes with reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with an optional per-request timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an already configured reqwest client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: SoapRequest) -> BoxFuture<'_, Result<RawResponse>> {
        Box::pin(async move {
            let response = self
                .client
                .post(&request.endpoint)
                .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
                .header("SOAPAction", format!("\"{}\"", request.soap_action))
                .body(request.body)
                .send()
                .await?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response.bytes().await?;

            Ok(RawResponse {
                status,
                headers,
                body,
            })
        })
    }
}
