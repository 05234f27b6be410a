use std::time::Duration;

use reqwest::Request;
use typed_builder::TypedBuilder;

use crate::{batch, build, ErrorKind, RequestDescription, Result, SimplifiedResponse};

/// Default user agent, `volley-<PKG_VERSION>`.
pub const DEFAULT_USER_AGENT: &str = concat!("volley/", env!("CARGO_PKG_VERSION"));

// Constants currently not configurable by the user.
/// A timeout for only the connect phase of a `Client`.
const CONNECT_TIMEOUT: u64 = 10;
/// TCP keepalive
/// See <https://tldp.org/HOWTO/TCP-Keepalive-HOWTO/overview.html> for more info
const TCP_KEEPALIVE: u64 = 60;

/// Builder for [`Client`].
///
/// See crate-level documentation for usage example.
#[derive(TypedBuilder, Debug, Clone)]
#[builder(field_defaults(default, setter(into)))]
pub struct ClientBuilder {
    /// Maximum number of requests in flight at any one time.
    ///
    /// `None` admits a whole batch at once: a batch of N requests runs
    /// under an admission gate of size N.
    max_concurrency: Option<usize>,

    /// User-agent used for requests.
    ///
    /// Only applies where a request description does not carry its own
    /// `user-agent` header.
    #[builder(default_code = "String::from(DEFAULT_USER_AGENT)")]
    user_agent: String,

    /// When `true`, accept invalid SSL certificates.
    allow_insecure: bool,

    /// Response timeout per request, enforced by the transport.
    timeout: Option<Duration>,
}

impl Default for ClientBuilder {
    #[must_use]
    #[inline]
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientBuilder {
    /// Instantiates a [`Client`].
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the underlying request client cannot be created.
    /// See [here](https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#errors).
    pub fn client(self) -> Result<Client> {
        let builder = reqwest::ClientBuilder::new()
            .gzip(true)
            .user_agent(self.user_agent)
            .danger_accept_invalid_certs(self.allow_insecure)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT))
            .tcp_keepalive(Duration::from_secs(TCP_KEEPALIVE));

        let reqwest_client = match self.timeout {
            Some(t) => builder.timeout(t),
            None => builder,
        }
        .build()
        .map_err(ErrorKind::BuildRequestClient)?;

        Ok(Client {
            reqwest_client,
            max_concurrency: self.max_concurrency,
        })
    }
}

/// Executes batches of requests through a shared transport.
///
/// See [`ClientBuilder`] which contains sane defaults for all configuration
/// options.
#[derive(Debug, Clone)]
pub struct Client {
    /// Shared HTTP transport.
    ///
    /// Safe to use from any number of concurrent tasks; clones share one
    /// connection pool.
    reqwest_client: reqwest::Client,

    /// Admission-gate size used by [`Client::dispatch`].
    max_concurrency: Option<usize>,
}

impl Client {
    /// Execute a single prepared request.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the network call fails.
    pub async fn execute(&self, request: Request) -> Result<reqwest::Response> {
        self.reqwest_client
            .execute(request)
            .await
            .map_err(ErrorKind::NetworkRequest)
    }

    /// Execute all `requests` concurrently and return one
    /// [`SimplifiedResponse`] per request, in the order the requests were
    /// given, regardless of the order in which they completed.
    ///
    /// Resolves only once every request has finished. A request that failed
    /// does not abort the batch; its slot carries the error in its status.
    pub async fn dispatch(&self, requests: Vec<Request>) -> Vec<SimplifiedResponse> {
        batch::dispatch(self, requests).await
    }

    pub(crate) fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }
}

/// Build and dispatch `descriptions` with a default [`Client`].
///
/// # Errors
///
/// Returns an `Err` if any description is malformed or the client cannot be
/// created; no network activity has happened in that case.
pub async fn send(descriptions: &[RequestDescription]) -> Result<Vec<SimplifiedResponse>> {
    let requests = build(descriptions)?;
    Ok(ClientBuilder::default().client()?.dispatch(requests).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_single_request() {
        let mock_server = mock_server!(http::StatusCode::OK);
        let description = RequestDescription {
            method: "GET".to_string(),
            url: mock_server.uri(),
            ..Default::default()
        };

        let client = ClientBuilder::default().client().unwrap();
        let response = client.execute((&description).try_into().unwrap()).await;
        assert_eq!(response.unwrap().status(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_client_timeout() {
        let mock_server = mock_server!(
            http::StatusCode::OK,
            set_delay(std::time::Duration::from_millis(100))
        );
        let description = RequestDescription {
            method: "GET".to_string(),
            url: mock_server.uri(),
            ..Default::default()
        };

        let client = ClientBuilder::builder()
            .timeout(std::time::Duration::from_millis(10))
            .build()
            .client()
            .unwrap();
        let result = client.execute((&description).try_into().unwrap()).await;
        assert!(matches!(result, Err(ErrorKind::NetworkRequest(_))));
    }
}
