//! Outbound side of the tool: the fixed batch request, the [`Transport`]
//! seam and its reqwest-backed implementation.

pub mod payload;

use crate::error::Error;
use serde_json::json;
use std::{
    future::Future,
    pin::Pin,
    time::Duration,
};
use tracing::debug;

/// Fixed fetch endpoint of the Longview API.
pub const ENDPOINT: &str = "https://longview.linode.com/fetch";

/// Per-request deadline. The upstream API answers in well under a second
/// when healthy; anything past this is reported as [`Error::Timeout`].
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Metric subtrees requested from every host. `Packages.*` is only
/// answered by hosts running a recent agent; its absence is tolerated.
pub const METRIC_KEYS: [&str; 10] = [
    "SysInfo.hostname",
    "SysInfo.cpu.type",
    "SysInfo.os.*",
    "CPU.*",
    "Load.*",
    "Memory.*",
    "Uptime",
    "Disk.*",
    "Network.Interface.*",
    "Packages.*",
];

/// Sections of the reply that record construction dereferences and that
/// must therefore be present for the full request above.
pub const REQUIRED_SECTIONS: &[&str] = &[
    "Memory", "Uptime", "Disk", "Load", "CPU", "Network", "SysInfo",
];

/// The `api_requestArray` form field: last-updated timestamp plus the
/// latest value for every requested metric subtree, bundled into one call.
pub fn request_array() -> String {
    json!([
        { "api_action": "lastUpdated" },
        { "api_action": "getLatestValue", "keys": METRIC_KEYS },
    ])
    .to_string()
}

/// External collaborator issuing one batch request per API key and
/// returning the raw response body. Abstracted so tests can substitute a
/// canned reply for the network.
pub trait Transport {
    fn fetch<'a>(
        &'a self,
        api_key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, Error>> + Send + 'a>>;
}

/// Production transport: HTTP POST with a form-encoded body.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: ENDPOINT.to_owned(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    async fn post(&self, api_key: &str) -> Result<String, Error> {
        // Keys are credentials; log a fingerprint, never the full value.
        debug!(key_len = api_key.len(), endpoint = %self.endpoint, "issuing batch request");

        let request_array = request_array();
        let form = [
            ("api_key", api_key),
            ("api_action", "batch"),
            ("api_requestArray", request_array.as_str()),
        ];
        let response = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .form(&form)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| {
                if source.is_timeout() {
                    Error::Timeout {
                        key: api_key.to_owned(),
                        timeout: self.timeout,
                    }
                } else {
                    Error::transport(api_key, source)
                }
            })?;

        response
            .text()
            .await
            .map_err(|source| Error::transport(api_key, source))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn fetch<'a>(
        &'a self,
        api_key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, Error>> + Send + 'a>> {
        Box::pin(self.post(api_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_array_bundles_both_sub_requests() {
        let parsed: serde_json::Value = serde_json::from_str(&request_array()).unwrap();
        assert_eq!(parsed[0]["api_action"], "lastUpdated");
        assert_eq!(parsed[1]["api_action"], "getLatestValue");
        let keys = parsed[1]["keys"].as_array().unwrap();
        assert_eq!(keys.len(), METRIC_KEYS.len());
        assert!(keys.iter().any(|key| key == "Network.Interface.*"));
    }

    #[test]
    fn every_required_section_is_requested() {
        for section in REQUIRED_SECTIONS {
            assert!(
                METRIC_KEYS.iter().any(|key| key.starts_with(section)),
                "`{section}` is validated but never requested"
            );
        }
    }
}
