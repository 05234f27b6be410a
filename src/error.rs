use thiserror::Error;

/// The volley `Result` type
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// Possible errors when building or dispatching a batch of requests
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The given string is not a valid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
    /// The given string can not be parsed into a valid URL
    #[error("Cannot parse {0} as URL: {1}")]
    ParseUrl(String, url::ParseError),
    /// The given header name could not be parsed
    #[error("Header name could not be parsed")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),
    /// The given header value could not be parsed
    #[error("Header value could not be parsed")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
    /// The request body could not be encoded
    #[error("Cannot encode request body as JSON")]
    EncodeBody(#[source] serde_json::Error),
    /// The request client could not be created
    #[error("Failed to build request client")]
    BuildRequestClient(#[source] reqwest::Error),
    /// Network error while executing a request
    #[error("Network error while sending request")]
    NetworkRequest(#[source] reqwest::Error),
    /// Error while reading a response body
    #[error("Error while reading response body")]
    ReadResponseBody(#[source] reqwest::Error),
}

impl ErrorKind {
    /// Return the underlying `reqwest` error (if any)
    #[must_use]
    pub const fn reqwest_error(&self) -> Option<&reqwest::Error> {
        match self {
            Self::BuildRequestClient(e) | Self::NetworkRequest(e) | Self::ReadResponseBody(e) => {
                Some(e)
            }
            _ => None,
        }
    }
}
