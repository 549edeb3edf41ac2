use thiserror::Error;

/// Everything that can end a submission attempt.
///
/// The `Display` text is exactly what the error banner shows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// `submit()` was called before a file was picked.
    #[error("Please select a file first.")]
    NoFileSelected,

    /// The selected file could not be read or parsed.
    #[error("Error: {0}")]
    File(String),

    /// The endpoint answered with a non-2xx status.
    #[error("Error: {status} - {body}")]
    Http { status: u16, body: String },

    /// No usable response: connection failure or undecodable body.
    #[error("Error: {0}")]
    Network(String),
}

impl From<anyhow::Error> for SubmitError {
    fn from(err: anyhow::Error) -> Self {
        SubmitError::File(format!("{err:#}"))
    }
}

impl From<reqwest::Error> for SubmitError {
    /// Keeps the whole source chain; reqwest's own text omits the root cause.
    fn from(err: reqwest::Error) -> Self {
        SubmitError::Network(format!("{:#}", anyhow::Error::from(err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_selected_message() {
        assert_eq!(
            SubmitError::NoFileSelected.to_string(),
            "Please select a file first."
        );
    }

    #[test]
    fn test_http_error_embeds_status_and_body() {
        let err = SubmitError::Http {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Error: 500 - boom");
    }

    #[test]
    fn test_network_error_embeds_description() {
        let err = SubmitError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Error: connection refused");
    }

    #[test]
    fn test_from_anyhow_keeps_context_chain() {
        let inner = anyhow::anyhow!("no such file");
        let err: SubmitError = inner.context("opening CSV").into();
        let msg = err.to_string();
        assert!(msg.contains("opening CSV"));
        assert!(msg.contains("no such file"));
    }
}
