//! Streaming element removal.
//!
//! Removes matching elements from an HTML byte stream as it flows through,
//! without buffering the document. Matching is per-element in the parse
//! tree: removing a parent removes its whole subtree, and bytes outside
//! matched element boundaries pass through untouched.
//!
//! lol_html's rewriter is not `Send`, so it runs on a blocking thread
//! bridged to the async body by two bounded channels. The bounded depth is
//! what carries consumer backpressure up to the origin stream; a consumer
//! that goes away tears the whole pipeline down, which stops origin reads.

use std::cell::Cell;

use axum::body::{Body, Bytes};
use axum::response::Response;
use futures_util::StreamExt;
use lol_html::{element, HtmlRewriter, Settings};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::transform::remover::{ElementRemover, RemovalRules};

/// Depth of both channels bridging the rewriter thread.
const CHANNEL_DEPTH: usize = 16;

/// A selector the streaming rewriter cannot compile.
#[derive(Debug, Error)]
#[error("selector {selector:?} is not supported by the streaming rewriter: {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

/// Streaming remover backed by lol_html.
#[derive(Debug)]
pub struct StreamingRemover {
    rules: RemovalRules,
}

impl StreamingRemover {
    /// Build the streaming remover, verifying every configured selector.
    ///
    /// A selector lol_html cannot parse makes the whole capability
    /// unavailable, so the dispatcher can fall back to buffered matching
    /// instead of failing at request time.
    pub fn new(rules: RemovalRules) -> Result<Self, SelectorError> {
        for selector in rules.selectors() {
            selector
                .parse::<lol_html::Selector>()
                .map_err(|e| SelectorError {
                    selector: selector.clone(),
                    message: e.to_string(),
                })?;
        }
        Ok(Self { rules })
    }
}

impl ElementRemover for StreamingRemover {
    fn rewrite(&self, response: Response) -> Response {
        let (parts, body) = response.into_parts();
        let rules = self.rules.clone();

        let (chunk_tx, chunk_rx) = mpsc::channel(CHANNEL_DEPTH);
        let (rewritten_tx, rewritten_rx) = mpsc::channel(CHANNEL_DEPTH);

        // Pump origin chunks towards the rewriter thread. Stops as soon as
        // the rewriter goes away, dropping the origin stream with it.
        let mut upstream = body.into_data_stream();
        tokio::spawn(async move {
            while let Some(chunk) = upstream.next().await {
                if chunk_tx.send(chunk).await.is_err() {
                    break;
                }
            }
        });

        tokio::task::spawn_blocking(move || run_rewriter(&rules, chunk_rx, rewritten_tx));

        let rewritten = futures_util::stream::unfold(rewritten_rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });

        Response::from_parts(parts, Body::from_stream(rewritten))
    }
}

/// Drive lol_html over incoming chunks until the stream or the consumer
/// ends.
fn run_rewriter(
    rules: &RemovalRules,
    mut chunks: mpsc::Receiver<Result<Bytes, axum::Error>>,
    rewritten: mpsc::Sender<Result<Bytes, axum::Error>>,
) {
    let consumer_gone = Cell::new(false);
    let sink = rewritten.clone();

    let handlers = rules
        .selectors()
        .iter()
        .map(|selector| {
            element!(selector.as_str(), |el| {
                el.remove();
                Ok(())
            })
        })
        .collect::<Vec<_>>();

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: handlers,
            ..Settings::new()
        },
        |chunk: &[u8]| {
            if sink
                .blocking_send(Ok(Bytes::copy_from_slice(chunk)))
                .is_err()
            {
                consumer_gone.set(true);
            }
        },
    );

    while let Some(item) = chunks.blocking_recv() {
        match item {
            Ok(chunk) => {
                if let Err(e) = rewriter.write(&chunk) {
                    let _ = rewritten.blocking_send(Err(axum::Error::new(e.to_string())));
                    return;
                }
            }
            // Origin read failures propagate to the client untouched.
            Err(e) => {
                let _ = rewritten.blocking_send(Err(e));
                return;
            }
        }
        if consumer_gone.get() {
            return;
        }
    }

    if let Err(e) = rewriter.end() {
        let _ = rewritten.blocking_send(Err(axum::Error::new(e.to_string())));
    }
}
