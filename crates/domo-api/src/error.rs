use thiserror::Error;

/// Top-level error type for the `domo-api` crate.
///
/// Every gateway failure is normalized to one of three kinds before it
/// crosses the crate boundary. Consumers (the sync controllers) never
/// branch on the kind -- only the Display text reaches the user, so the
/// `#[error]` strings here ARE the user-facing failure messages.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport failure: connection refused, DNS, timeout.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Error {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("malformed response body: {message}")]
    Decode { message: String },
}

impl Error {
    /// Build a `Server` error from a status code, using the canonical
    /// reason phrase as the message ("Error 500: Internal Server Error").
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Server {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_owned(),
        }
    }
}
