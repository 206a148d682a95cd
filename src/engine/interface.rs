use std::sync::mpsc::Sender;

use crate::types::{FetchError, FetchTicket, PullRequest, Query};

/// Handle to the backend engine held by the UI layer.
///
/// Cheaply cloneable. When the last handle is dropped the sender channel
/// closes, signalling the engine to shut down.
#[derive(Clone)]
pub struct EngineHandle {
    tx: tokio::sync::mpsc::UnboundedSender<Request>,
}

impl EngineHandle {
    pub(super) fn new(tx: tokio::sync::mpsc::UnboundedSender<Request>) -> Self {
        Self { tx }
    }

    /// Send a request to the engine. Non-blocking, returns immediately.
    pub fn send(&self, req: Request) {
        // Ignore errors: if the receiver is gone the engine has already shut down.
        let _ = self.tx.send(req);
    }
}

/// Trait implemented by both `GhEngine` and `StubEngine`.
pub trait Engine: Send + 'static {
    fn start(self) -> EngineHandle;
}

/// Operations the UI layer can send to the engine.
pub enum Request {
    /// Run one search. The reply carries the query's ticket back.
    FetchPrs {
        query: Query,
        reply_tx: Sender<Event>,
    },
    Shutdown,
}

/// Events the engine pushes back to the UI.
#[derive(Debug)]
pub enum Event {
    PrsFetched {
        ticket: FetchTicket,
        result: Result<Vec<PullRequest>, FetchError>,
    },
}
