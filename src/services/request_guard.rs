//! Per-session request generations.
//!
//! Starting a request bumps the session's generation; older in-flight
//! requests observe the change, drop their work and discard their result.

use dashmap::DashMap;
use std::future::Future;
use tokio::sync::watch;
use tracing::debug;

/// Tracks the latest request generation per session.
#[derive(Default)]
pub struct RequestTracker {
    sessions: DashMap<String, watch::Sender<u64>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request for `session`, superseding any older one.
    pub fn begin(&self, session: &str) -> RequestToken {
        let sender = self
            .sessions
            .entry(session.to_string())
            .or_insert_with(|| watch::channel(0).0);
        let generation = *sender.borrow() + 1;
        sender.send_replace(generation);
        if generation > 1 {
            debug!("Session {} advanced to generation {}", session, generation);
        }

        RequestToken {
            session: session.to_string(),
            generation,
            receiver: sender.subscribe(),
        }
    }

    /// Forget the session if `token` is still its latest request.
    pub fn release(&self, token: &RequestToken) {
        self.sessions
            .remove_if(&token.session, |_, sender| *sender.borrow() == token.generation);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Handle for one request generation.
pub struct RequestToken {
    session: String,
    generation: u64,
    receiver: watch::Receiver<u64>,
}

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        *self.receiver.borrow() == self.generation
    }

    /// Resolves once a newer request has started for the session.
    pub async fn superseded(&mut self) {
        loop {
            if !self.is_current() {
                return;
            }
            if self.receiver.changed().await.is_err() {
                // Tracker dropped; nothing can supersede us any more.
                std::future::pending::<()>().await;
            }
        }
    }

    /// Drive `work` to completion unless the request is superseded first.
    pub async fn run<F: Future>(&mut self, work: F) -> Option<F::Output> {
        let output = tokio::select! {
            biased;
            _ = self.superseded() => None,
            output = work => Some(output),
        };
        output.filter(|_| self.is_current())
    }
}
