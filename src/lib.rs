//! `volley` is a library for sending a batch of HTTP requests concurrently
//! and getting the responses back in the order the requests were given.
//!
//! "Hello world" example:
//! ```no_run
//! use volley::{RequestDescription, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!   let get = RequestDescription {
//!       method: "GET".to_string(),
//!       url: "https://httpbin.org/get".to_string(),
//!       ..Default::default()
//!   };
//!   let responses = volley::send(&[get]).await?;
//!   println!("{}", responses[0]);
//!   Ok(())
//! }
//! ```
//!
//! For more specific use-cases you can build a client yourself, using the
//! `ClientBuilder`, which grants full control over the transport and the
//! admission gate:
//!
//! ```no_run
//! use volley::{build, ClientBuilder, RequestDescription, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!   let descriptions = vec![RequestDescription {
//!       method: "GET".to_string(),
//!       url: "https://example.com".to_string(),
//!       ..Default::default()
//!   }];
//!   let client = ClientBuilder::builder()
//!       .max_concurrency(4usize)
//!       .build()
//!       .client()?;
//!   let responses = client.dispatch(build(&descriptions)?).await;
//!   assert_eq!(responses.len(), descriptions.len());
//!   Ok(())
//! }
//! ```

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

#[cfg(test)]
#[macro_use]
pub mod test_utils;

mod batch;
mod client;
mod error;
mod request;
mod response;

pub use client::{send, Client, ClientBuilder, DEFAULT_USER_AGENT};
pub use error::{ErrorKind, Result};
pub use request::{build, RequestDescription};
pub use response::{SimplifiedResponse, Status};
