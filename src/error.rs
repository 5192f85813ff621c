use thiserror::Error;

/// Failure modes of a single analysis run. None of these are retried
/// automatically except `Transport`, and only when the retry flag is on.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("transport failure talking to the inference endpoint: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("inference endpoint rejected the credential ({status}): {body}")]
    Auth {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("inference endpoint error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not read image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected model reply: {0}")]
    UnexpectedReply(String),
}
