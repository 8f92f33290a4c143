use reqwest::StatusCode;
use serde::Serialize;

pub const RECOVERABLE_MESSAGE: &str = "Search failed, try again.";
pub const FATAL_MESSAGE: &str = "Search failed: unexpected response from GitHub.";
const RATE_LIMIT_HINT: &str = "GitHub may be rate limiting requests; wait a minute.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Worth re-submitting as-is.
    Recoverable,
    /// The session is reset; a new query is needed.
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFailure {
    pub kind: FailureKind,
    pub message: String,
    pub detail: String,
}

/// Sorts a failed search into [`FailureKind`] by walking the error chain.
pub fn classify_failure(err: &anyhow::Error) -> SearchFailure {
    let detail = format!("{:#}", err);
    let mut kind = FailureKind::Fatal;
    let mut rate_limited = false;

    for cause in err.chain() {
        if let Some(http) = cause.downcast_ref::<reqwest::Error>() {
            if let Some(status) = http.status() {
                rate_limited = status == StatusCode::FORBIDDEN
                    || status == StatusCode::TOO_MANY_REQUESTS;
                if status.is_server_error() || rate_limited {
                    kind = FailureKind::Recoverable;
                }
            } else if http.is_timeout()
                || http.is_connect()
                || http.is_request()
                || http.is_body()
            {
                kind = FailureKind::Recoverable;
            }
            break;
        }
        if cause.is::<serde_json::Error>() {
            break;
        }
        if cause.is::<std::io::Error>() {
            kind = FailureKind::Recoverable;
            break;
        }
    }

    let message = match (kind, rate_limited) {
        (FailureKind::Recoverable, true) => format!("{} {}", RECOVERABLE_MESSAGE, RATE_LIMIT_HINT),
        (FailureKind::Recoverable, false) => RECOVERABLE_MESSAGE.to_string(),
        (FailureKind::Fatal, _) => FATAL_MESSAGE.to_string(),
    };

    log::warn!("[search_error] {:?} search failure: {}", kind, detail);
    SearchFailure {
        kind,
        message,
        detail,
    }
}

#[cfg(test)]
#[path = "tests/search_error.rs"]
mod tests;
