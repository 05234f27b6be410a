use std::collections::BTreeMap;
use std::fmt::Display;

use http::{HeaderMap, StatusCode};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::ErrorKind;

/// Status of one completed exchange
#[derive(Debug)]
pub enum Status {
    /// Request was successful
    Ok(StatusCode),
    /// Got redirected to different resource
    Redirected(StatusCode),
    /// Request failed with HTTP error code
    Failed(StatusCode),
    /// The request never produced a response
    Error(ErrorKind),
}

impl Status {
    /// Classify a response status code
    #[must_use]
    pub fn new(code: StatusCode) -> Self {
        if code.is_success() {
            Self::Ok(code)
        } else if code.is_redirection() {
            Self::Redirected(code)
        } else {
            Self::Failed(code)
        }
    }

    /// Return the HTTP status code (if any)
    #[must_use]
    pub fn code(&self) -> Option<StatusCode> {
        match self {
            Self::Ok(code) | Self::Redirected(code) | Self::Failed(code) => Some(*code),
            Self::Error(kind) => kind.reqwest_error().and_then(reqwest::Error::status),
        }
    }

    #[inline]
    #[must_use]
    /// Returns `true` if the exchange was successful
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    #[inline]
    #[must_use]
    /// Returns `true` if the request never produced a response
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok(code) | Self::Redirected(code) | Self::Failed(code) => write!(f, "{code}"),
            Self::Error(e) => write!(f, "{e}"),
        }
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s;

        if let Some(code) = self.code() {
            s = serializer.serialize_struct("Status", 2)?;
            s.serialize_field("text", &self.to_string())?;
            s.serialize_field("code", &code.as_u16())?;
        } else {
            s = serializer.serialize_struct("Status", 1)?;
            s.serialize_field("text", &self.to_string())?;
        }

        s.end()
    }
}

impl From<ErrorKind> for Status {
    fn from(e: ErrorKind) -> Self {
        Self::Error(e)
    }
}

/// Caller-facing, flattened representation of one response.
///
/// Produced by [`Client::dispatch`](crate::Client::dispatch), one per input
/// request and in input order. A slot whose request never completed carries
/// the error in [`status`](Self::status) and leaves the other fields empty.
#[derive(Debug)]
pub struct SimplifiedResponse {
    /// Status of the exchange
    pub status: Status,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body, drained to text
    pub body: String,
    /// Length of the response content (if known)
    pub content_length: Option<u64>,
}

impl SimplifiedResponse {
    /// An empty slot for a request that never produced a response
    pub(crate) fn from_error(kind: ErrorKind) -> Self {
        SimplifiedResponse {
            status: Status::Error(kind),
            headers: HeaderMap::new(),
            body: String::new(),
            content_length: None,
        }
    }

    #[inline]
    #[must_use]
    /// Returns `true` if the exchange was successful
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl Display for SimplifiedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(length) = self.content_length {
            write!(f, " ({length} bytes)")?;
        }
        Ok(())
    }
}

impl Serialize for SimplifiedResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // HeaderMap is not serializable as-is; flatten it into an ordered
        // name -> values mapping first.
        let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for name in self.headers.keys() {
            let values = self
                .headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect();
            headers.insert(name.as_str().to_string(), values);
        }

        let mut s = serializer.serialize_struct("SimplifiedResponse", 4)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("headers", &headers)?;
        s.serialize_field("body", &self.body)?;
        s.serialize_field("content_length", &self.content_length)?;
        s.end()
    }
}
