//! Background writer for persisted scopes.
//!
//! Mutations queue [`SaveRequest`]s on an unbounded channel and return
//! immediately. The worker drains whatever is queued, keeps only the latest
//! request per scope, and writes them in order. Failures are broadcast as
//! [`PersistenceEvent::Error`] and never retried; the next write of the same
//! scope supersedes them.

use crate::repository::StateRepository;
use crate::traits::{PersistenceEvent, Scope};
use std::sync::Arc;
use taskflow_domain::{BoardId, Snapshot};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub enum SaveRequest {
    Projects(Arc<Snapshot>),
    ActiveBoard(Option<BoardId>),
}

impl SaveRequest {
    pub fn scope(&self) -> Scope {
        match self {
            SaveRequest::Projects(_) => Scope::Projects,
            SaveRequest::ActiveBoard(_) => Scope::ActiveBoardId,
        }
    }
}

/// Totals reported when the worker exits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub written: usize,
    pub coalesced: usize,
    pub failed: usize,
}

/// Keep the latest request per scope. Projects are written before the
/// active board so a stored board id never points ahead of the tree.
fn coalesce(pending: Vec<SaveRequest>) -> (Vec<SaveRequest>, usize) {
    let total = pending.len();
    let mut projects = None;
    let mut active_board = None;
    for request in pending {
        match request {
            SaveRequest::Projects(_) => projects = Some(request),
            SaveRequest::ActiveBoard(_) => active_board = Some(request),
        }
    }
    let batch: Vec<SaveRequest> = projects.into_iter().chain(active_board).collect();
    let dropped = total - batch.len();
    (batch, dropped)
}

async fn write(repository: &StateRepository, request: &SaveRequest) -> Result<PersistenceEvent, String> {
    let scope = request.scope();
    let result = match request {
        SaveRequest::Projects(snapshot) => repository
            .save_projects(snapshot)
            .await
            .map(|metadata| PersistenceEvent::Saved { scope, metadata }),
        SaveRequest::ActiveBoard(board_id) => repository
            .save_active_board(board_id.as_ref())
            .await
            .map(|metadata| match metadata {
                Some(metadata) => PersistenceEvent::Saved { scope, metadata },
                None => PersistenceEvent::Removed { scope },
            }),
    };
    result.map_err(|e| e.to_string())
}

/// Start the save worker. It runs until every sender is dropped and the
/// queue is empty.
pub fn spawn_save_worker(
    repository: StateRepository,
    events: broadcast::Sender<PersistenceEvent>,
) -> (mpsc::UnboundedSender<SaveRequest>, JoinHandle<SaveReport>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<SaveRequest>();

    let handle = tokio::spawn(async move {
        let mut report = SaveReport::default();

        while let Some(first) = rx.recv().await {
            let mut pending = vec![first];
            while let Ok(next) = rx.try_recv() {
                pending.push(next);
            }
            let (batch, dropped) = coalesce(pending);
            report.coalesced += dropped;

            for request in &batch {
                match write(&repository, request).await {
                    Ok(event) => {
                        report.written += 1;
                        // No subscribers is fine
                        let _ = events.send(event);
                    }
                    Err(message) => {
                        report.failed += 1;
                        tracing::error!("Failed to save {}: {}", request.scope(), message);
                        let _ = events.send(PersistenceEvent::Error {
                            scope: request.scope(),
                            message,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            "Save worker finished: {} written, {} coalesced, {} failed",
            report.written,
            report.coalesced,
            report.failed
        );
        report
    });

    (tx, handle)
}
