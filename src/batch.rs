//! Concurrent dispatch of prepared requests.
//!
//! Every request runs in its own task behind an admission gate. Outcomes fan
//! back into a single channel tagged with their original position, and the
//! batch reassembles input order once the last outcome has arrived.

use std::sync::Arc;

use log::warn;
use reqwest::{Request, Response};
use tokio::sync::{mpsc, Semaphore};

use crate::client::Client;
use crate::{ErrorKind, Result, SimplifiedResponse, Status};

/// Index-tagged result of sending one request.
///
/// Created by a worker task, consumed once by the collector.
#[derive(Debug)]
struct Outcome {
    index: usize,
    result: Result<Response>,
}

/// Execute all `requests` and return their simplified responses in input
/// order.
///
/// Completion order over the wire is interleaved and non-deterministic; the
/// final ordering never is. The returned vector always has one slot per
/// request.
pub(crate) async fn dispatch(client: &Client, requests: Vec<Request>) -> Vec<SimplifiedResponse> {
    let total = requests.len();
    if total == 0 {
        return Vec::new();
    }

    // A gate of size N admits the whole batch at once. The floor of 1 keeps
    // a zero-sized gate from stalling a non-empty batch forever.
    let slots = client.max_concurrency().unwrap_or(total).max(1);
    let gate = Arc::new(Semaphore::new(slots));
    let (tx, mut rx) = mpsc::channel(total);

    for (index, request) in requests.into_iter().enumerate() {
        let gate = Arc::clone(&gate);
        let tx = tx.clone();
        let client = client.clone();
        tokio::spawn(async move {
            // The gate is never closed while outcomes are outstanding.
            let permit = gate
                .acquire_owned()
                .await
                .expect("admission gate closed mid-batch");
            let result = client.execute(request).await;
            tx.send(Outcome { index, result })
                .await
                .expect("Cannot send outcome to channel");
            drop(permit);
        });
    }
    drop(tx);

    // Collect until every request has produced its outcome. Arrival order is
    // unconstrained.
    let mut outcomes = Vec::with_capacity(total);
    while outcomes.len() < total {
        let outcome = rx
            .recv()
            .await
            .expect("Outcome channel closed before the batch completed");
        outcomes.push(outcome);
    }

    // Indices are unique, so the sort fully determines the final order.
    outcomes.sort_unstable_by_key(|outcome| outcome.index);

    let mut responses = Vec::with_capacity(total);
    for outcome in outcomes {
        responses.push(simplify(outcome).await);
    }
    responses
}

/// Flatten one outcome into its caller-facing form.
///
/// An errored outcome is never body-read; there is no response to read from.
/// The slot keeps the error in its status instead.
async fn simplify(outcome: Outcome) -> SimplifiedResponse {
    let response = match outcome.result {
        Ok(response) => response,
        Err(kind) => {
            warn!("request {} failed: {kind}", outcome.index);
            return SimplifiedResponse::from_error(kind);
        }
    };

    let status = Status::new(response.status());
    let headers = response.headers().clone();
    let content_length = response.content_length();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            // Scoped to this request: keep what was already observed and
            // leave the body empty.
            let kind = ErrorKind::ReadResponseBody(e);
            warn!("request {}: {kind}", outcome.index);
            String::new()
        }
    };

    SimplifiedResponse {
        status,
        headers,
        body,
        content_length,
    }
}
