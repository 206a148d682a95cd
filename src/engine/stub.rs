use tokio::sync::mpsc::UnboundedReceiver;

use crate::types::{FetchError, PullRequest};

use super::interface::{Engine, EngineHandle, Event, Request};

/// A stub engine that serves pre-loaded fixture data without running `gh`.
///
/// Useful for integration tests and UI demos that must not require an
/// authenticated GitHub CLI.
#[derive(Default)]
pub struct StubEngine {
    pub prs: Vec<PullRequest>,
    /// When set, every fetch fails with this GraphQL error message.
    pub error: Option<String>,
}

impl Engine for StubEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("stub tokio runtime");
            rt.block_on(self.run_loop(rx));
        });
        EngineHandle::new(tx)
    }
}

impl StubEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        while let Some(req) = rx.recv().await {
            match req {
                Request::FetchPrs { query, reply_tx } => {
                    let result = match &self.error {
                        Some(message) => Err(FetchError::GraphQl(message.clone())),
                        None => Ok(self.prs.clone()),
                    };
                    let _ = reply_tx.send(Event::PrsFetched {
                        ticket: query.ticket,
                        result,
                    });
                }
                Request::Shutdown => break,
            }
        }
    }
}
