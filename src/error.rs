//! Error classification for upstream API failures
//!
//! Raw failures from the HTTP layer are first adapted into a [`Failure`]
//! tag, then classified into an [`ApiError`] record carrying a symbolic
//! code, a user-presentable message, and retry-relevant flags. The
//! classifier is pure; deciding what to do with the classification is the
//! retry engine's job, and rendering it is the caller's.

use serde::Serialize;

/// Symbolic code for an error that did not reach the server.
pub const NETWORK_ERROR_CODE: &str = "NETWORK_ERROR";
/// Symbolic code for an error with no recognizable shape.
pub const GENERIC_ERROR_CODE: &str = "GENERIC_ERROR";

const NETWORK_MESSAGE: &str =
    "Network connection failed. Please check your internet connection.";
const GENERIC_MESSAGE: &str = "An unexpected error occurred";

/// The shape of a raw failure, stripped down to what classification needs.
///
/// This is the adapter seam between a concrete HTTP client's error type and
/// the classifier: implement [`Classify`] for the error type, producing one
/// of these tags, and the classifier pattern-matches the tag instead of
/// probing the error's structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The request never completed; no response was received.
    Network,
    /// The server answered with a non-success HTTP status.
    Http { status: u16 },
    /// Anything else (serialization failures, invalid payloads, ...).
    Unknown { message: String },
}

/// Adapter from a concrete error type to its [`Failure`] tag.
pub trait Classify {
    /// Reduces this error to the shape the classifier cares about.
    fn failure(&self) -> Failure;
}

impl Classify for reqwest::Error {
    fn failure(&self) -> Failure {
        // A status takes precedence only when a response actually arrived;
        // connect and timeout errors never carry one.
        if let Some(status) = self.status() {
            Failure::Http {
                status: status.as_u16(),
            }
        } else if self.is_connect() || self.is_timeout() {
            Failure::Network
        } else {
            Failure::Unknown {
                message: self.to_string(),
            }
        }
    }
}

impl Classify for Failure {
    fn failure(&self) -> Failure {
        self.clone()
    }
}

/// A classified error record
///
/// Constructed fresh for every caught failure and consumed immediately by
/// the retry decision or surfaced to the user; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Human-readable description, safe to show to the user
    pub message: String,
    /// Symbolic code: `NETWORK_ERROR`, `HTTP_<status>`, or `GENERIC_ERROR`
    pub code: String,
    /// HTTP status code, when one was received
    pub status: Option<u16>,
    /// The request never reached the server
    pub is_network_error: bool,
    /// The server rejected the request (4xx)
    pub is_client_error: bool,
    /// The server failed to handle the request (5xx)
    pub is_server_error: bool,
}

impl ApiError {
    /// Classifies any error that can describe its failure shape.
    pub fn classify<E: Classify + ?Sized>(error: &E) -> Self {
        Self::from_failure(error.failure())
    }

    /// Classifies a [`Failure`] tag into a full record.
    ///
    /// Exactly one classification path wins: network failures (no response
    /// received) take precedence over status-code classification, which
    /// takes precedence over the generic fallback.
    pub fn from_failure(failure: Failure) -> Self {
        match failure {
            Failure::Network => Self {
                message: NETWORK_MESSAGE.to_string(),
                code: NETWORK_ERROR_CODE.to_string(),
                status: None,
                is_network_error: true,
                is_client_error: false,
                is_server_error: false,
            },
            Failure::Http { status } => Self {
                message: status_message(status).to_string(),
                code: format!("HTTP_{}", status),
                status: Some(status),
                is_network_error: false,
                is_client_error: (400..=499).contains(&status),
                is_server_error: (500..=599).contains(&status),
            },
            Failure::Unknown { message } => Self {
                message: if message.is_empty() {
                    GENERIC_MESSAGE.to_string()
                } else {
                    message
                },
                code: GENERIC_ERROR_CODE.to_string(),
                status: None,
                is_network_error: false,
                is_client_error: false,
                is_server_error: false,
            },
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Maps an HTTP status to its user-facing message.
///
/// A handful of statuses get specific wording; the rest fall back to a
/// generic message for their range.
fn status_message(status: u16) -> &'static str {
    match status {
        400 => "Invalid request. Please check your input.",
        404 => "The requested resource was not found.",
        429 => "Too many requests. Please wait a moment and try again.",
        401..=499 => "Request failed. Please check your input and try again.",
        500..=599 => "Server error. Please try again later.",
        _ => GENERIC_MESSAGE,
    }
}

/// Visual treatment for an error toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Destructive,
}

/// Presentation data for a user-facing error notification
///
/// This is the contract the UI layer consumes; nothing here performs any
/// rendering or I/O.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorToast {
    pub title: &'static str,
    pub description: String,
    /// How long the toast stays on screen, in milliseconds
    pub duration_ms: u64,
    pub variant: ToastVariant,
}

/// Builds the toast payload for a classified error.
///
/// Network errors get a longer duration since connectivity guidance takes
/// more time to read.
pub fn toast(error: &ApiError) -> ErrorToast {
    let (title, duration_ms) = if error.is_network_error {
        ("Connection Error", 5000)
    } else {
        ("Error", 4000)
    };
    ErrorToast {
        title,
        description: error.message.clone(),
        duration_ms,
        variant: ToastVariant::Destructive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_failure_classification() {
        let error = ApiError::from_failure(Failure::Network);

        assert!(error.is_network_error);
        assert!(!error.is_client_error);
        assert!(!error.is_server_error);
        assert_eq!(error.code, "NETWORK_ERROR");
        assert_eq!(error.status, None);
        assert_eq!(
            error.message,
            "Network connection failed. Please check your internet connection."
        );
    }

    #[test]
    fn test_status_message_table() {
        let cases = [
            (400, "Invalid request. Please check your input."),
            (404, "The requested resource was not found."),
            (429, "Too many requests. Please wait a moment and try again."),
            (500, "Server error. Please try again later."),
            (503, "Server error. Please try again later."),
        ];

        for (status, expected) in cases {
            let error = ApiError::from_failure(Failure::Http { status });
            assert_eq!(error.message, expected, "message for status {}", status);
            assert_eq!(error.code, format!("HTTP_{}", status));
            assert_eq!(error.status, Some(status));
        }
    }

    #[test]
    fn test_client_and_server_ranges() {
        let client = ApiError::from_failure(Failure::Http { status: 404 });
        assert!(client.is_client_error);
        assert!(!client.is_server_error);
        assert!(!client.is_network_error);

        let server = ApiError::from_failure(Failure::Http { status: 502 });
        assert!(server.is_server_error);
        assert!(!server.is_client_error);

        // 3xx is neither client nor server fault
        let redirect = ApiError::from_failure(Failure::Http { status: 301 });
        assert!(!redirect.is_client_error);
        assert!(!redirect.is_server_error);
    }

    #[test]
    fn test_unknown_failure_keeps_its_message() {
        let error = ApiError::from_failure(Failure::Unknown {
            message: "timings array was empty".to_string(),
        });

        assert_eq!(error.code, "GENERIC_ERROR");
        assert_eq!(error.message, "timings array was empty");
        assert!(!error.is_network_error);
        assert!(!error.is_client_error);
        assert!(!error.is_server_error);
    }

    #[test]
    fn test_unknown_failure_without_message_gets_default() {
        let error = ApiError::from_failure(Failure::Unknown {
            message: String::new(),
        });

        assert_eq!(error.message, "An unexpected error occurred");
    }

    #[test]
    fn test_toast_for_network_error() {
        let error = ApiError::from_failure(Failure::Network);
        let toast = toast(&error);

        assert_eq!(toast.title, "Connection Error");
        assert_eq!(toast.duration_ms, 5000);
        assert_eq!(toast.description, error.message);
        assert_eq!(toast.variant, ToastVariant::Destructive);
    }

    #[test]
    fn test_toast_for_other_errors() {
        let error = ApiError::from_failure(Failure::Http { status: 404 });
        let toast = toast(&error);

        assert_eq!(toast.title, "Error");
        assert_eq!(toast.duration_ms, 4000);
        assert_eq!(toast.description, "The requested resource was not found.");
    }

    #[test]
    fn test_toast_serializes_for_the_ui_layer() {
        let toast = toast(&ApiError::from_failure(Failure::Network));
        let json = serde_json::to_value(&toast).expect("Failed to serialize toast");

        assert_eq!(
            json,
            serde_json::json!({
                "title": "Connection Error",
                "description": "Network connection failed. Please check your internet connection.",
                "duration_ms": 5000,
                "variant": "destructive"
            })
        );
    }

    #[test]
    fn test_api_error_serializes_with_flags() {
        let error = ApiError::from_failure(Failure::Http { status: 404 });
        let json = serde_json::to_value(&error).expect("Failed to serialize error");

        assert_eq!(json["code"], "HTTP_404");
        assert_eq!(json["status"], 404);
        assert_eq!(json["is_client_error"], true);
        assert_eq!(json["is_network_error"], false);
        assert_eq!(json["is_server_error"], false);
    }

    #[test]
    fn test_display_includes_code_and_message() {
        let error = ApiError::from_failure(Failure::Http { status: 429 });
        let rendered = error.to_string();

        assert!(rendered.contains("HTTP_429"));
        assert!(rendered.contains("Too many requests"));
    }
}
