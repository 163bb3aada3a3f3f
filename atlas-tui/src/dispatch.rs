//! Hand-off between the view-state machine and the transport.
//!
//! `App::submit` produces a [`Dispatch`]; the event loop runs it on a spawned
//! task and the resulting [`Settlement`] comes back through the same channel
//! as key input, so the state container keeps a single writer.

use crate::events::TuiEvent;
use crate::nav::View;
use atlas_core::{EntityId, ErrorInfo, Request, Response, Transport};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Identifies the outstanding request and the view waiting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub request_id: EntityId,
    pub view: View,
}

/// A request accepted by `submit`, ready to send.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub ticket: Ticket,
    pub request: Request,
}

/// Outcome of a dispatched request.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub ticket: Ticket,
    pub outcome: Result<Response, ErrorInfo>,
}

impl Settlement {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Send the request and pair the outcome with its ticket.
pub async fn execute(transport: &dyn Transport, dispatch: Dispatch) -> Settlement {
    let Dispatch { ticket, request } = dispatch;
    let outcome = transport.send(request).await;
    Settlement { ticket, outcome }
}

/// Run `dispatch` on its own task and report back as [`TuiEvent::Settled`].
pub fn spawn_dispatch(
    transport: Arc<dyn Transport>,
    dispatch: Dispatch,
    sender: mpsc::Sender<TuiEvent>,
) {
    tokio::spawn(async move {
        let settlement = execute(transport.as_ref(), dispatch).await;
        if sender
            .send(TuiEvent::Settled(Box::new(settlement)))
            .await
            .is_err()
        {
            tracing::debug!("Event loop closed before request settled");
        }
    });
}

/// Probe the backend and report back as [`TuiEvent::Health`].
pub fn spawn_health_check(transport: Arc<dyn Transport>, sender: mpsc::Sender<TuiEvent>) {
    tokio::spawn(async move {
        let status = transport.status().await;
        let _ = sender.send(TuiEvent::Health(status)).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_test_utils::{analysis_report, MockTransport};

    #[tokio::test]
    async fn test_execute_pairs_outcome_with_ticket() {
        let mock = MockTransport::new().respond_with(analysis_report("done"));
        let request = atlas_core::Request::analyze("topic", atlas_core::ModelKey::Gemma);
        let ticket = Ticket {
            request_id: request.request_id(),
            view: View::Analysis,
        };
        let settlement = execute(&mock, Dispatch { ticket, request }).await;
        assert_eq!(settlement.ticket, ticket);
        assert!(settlement.is_success());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_spawned_dispatch_reports_through_channel() {
        let mock = Arc::new(MockTransport::new());
        let (tx, mut rx) = mpsc::channel(4);
        let request = atlas_core::Request::ask("hello");
        let ticket = Ticket {
            request_id: request.request_id(),
            view: View::AgentChat,
        };
        spawn_dispatch(mock.clone(), Dispatch { ticket, request }, tx);
        match rx.recv().await {
            Some(TuiEvent::Settled(settlement)) => assert_eq!(settlement.ticket, ticket),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
