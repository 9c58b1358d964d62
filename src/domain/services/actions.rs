#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::models::Action;
use crate::domain::models::BackendBox;
use crate::domain::models::BackendResponse;
use crate::domain::models::Event;
use crate::domain::models::PendingRequest;

async fn complete(backend: BackendBox, request: PendingRequest) -> BackendResponse {
    let res = backend.send(&request.prompt).await;
    if let Err(err) = &res {
        tracing::error!(error = ?err, ticket = request.ticket, "Backend request failed");
    }

    return BackendResponse {
        ticket: request.ticket,
        result: res.map_err(|err| {
            return format!("The assistant is unavailable: {err}");
        }),
    };
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs backend requests off the UI loop. At most one request is in
    /// flight; `BackendAbort` kills it without emitting a response.
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        // Lazy default.
        let mut worker: JoinHandle<Result<()>> = tokio::spawn(async {
            return Ok(());
        });

        while let Some(action) = rx.recv().await {
            match action {
                Action::BackendAbort() => {
                    worker.abort();
                }
                Action::BackendRequest(request) => {
                    worker.abort();

                    let worker_tx = tx.clone();
                    let worker_backend = backend.clone();
                    worker = tokio::spawn(async move {
                        let res = complete(worker_backend, request).await;
                        worker_tx.send(Event::BackendResponse(res))?;
                        return Ok(());
                    });
                }
            }
        }

        worker.abort();
        return Ok(());
    }
}
