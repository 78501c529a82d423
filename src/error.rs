use std::time::Duration;

/// Errors surfaced by one fetch-and-print cycle.
///
/// Any of these aborts the whole invocation; there is no partial-success
/// output mode.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no Longview API key provided; pass keys as arguments or load them with -f")]
    NoApiKeysConfigured,

    #[error("request for API key `{key}` failed")]
    Transport {
        key: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for API key `{key}` timed out after {timeout:?}")]
    Timeout { key: String, timeout: Duration },

    #[error("malformed response for API key `{key}`")]
    MalformedResponse {
        key: String,
        #[source]
        source: PayloadError,
    },
}

/// Shape violations detected while decoding an API response body.
#[derive(thiserror::Error, Debug)]
pub enum PayloadError {
    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a batch reply with at least two elements")]
    NotABatchReply,

    #[error("missing field `{0}`")]
    MissingField(String),
}

impl Error {
    pub(crate) fn transport(key: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            key: key.to_owned(),
            source,
        }
    }

    pub(crate) fn malformed(key: &str, source: PayloadError) -> Self {
        Self::MalformedResponse {
            key: key.to_owned(),
            source,
        }
    }
}
