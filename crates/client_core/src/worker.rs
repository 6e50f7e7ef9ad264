//! Background worker that performs submissions off the UI thread.
//!
//! The UI side keeps sole ownership of the [`WorkflowController`]; the worker
//! only ever sees [`PendingSubmission`]s and answers with [`WorkerEvent`]s.

use std::{
    sync::Arc,
    thread,
    time::Duration,
};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    controller::{
        execute, PendingSubmission, SubmissionId, SubmissionOutcome, WorkflowController,
    },
    transport::DetectionTransport,
};

const COMMAND_QUEUE_DEPTH: usize = 16;
const EVENT_QUEUE_DEPTH: usize = 64;

pub enum WorkerCommand {
    Submit(PendingSubmission),
    Shutdown,
}

#[derive(Debug)]
pub enum WorkerEvent {
    Ready,
    Completed {
        id: SubmissionId,
        outcome: SubmissionOutcome,
    },
    StartupFailed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("verification queue is full; please retry")]
    QueueFull,
    #[error("verification worker disconnected (possible startup failure)")]
    Disconnected,
}

pub struct WorkerHandle {
    commands: Sender<WorkerCommand>,
    events: Receiver<WorkerEvent>,
    thread: Option<thread::JoinHandle<()>>,
}

pub fn spawn_worker(transport: Arc<dyn DetectionTransport>) -> WorkerHandle {
    let (cmd_tx, cmd_rx) = bounded::<WorkerCommand>(COMMAND_QUEUE_DEPTH);
    let (event_tx, event_rx) = bounded::<WorkerEvent>(EVENT_QUEUE_DEPTH);
    let startup_tx = event_tx.clone();

    let thread = thread::Builder::new()
        .name("verify-worker".into())
        .spawn(move || run_worker(transport, cmd_rx, event_tx));
    let thread = match thread {
        Ok(handle) => Some(handle),
        Err(err) => {
            error!("failed to spawn verification worker: {err}");
            let _ = startup_tx.try_send(WorkerEvent::StartupFailed(format!(
                "failed to spawn verification worker: {err}"
            )));
            None
        }
    };

    WorkerHandle {
        commands: cmd_tx,
        events: event_rx,
        thread,
    }
}

fn run_worker(
    transport: Arc<dyn DetectionTransport>,
    cmd_rx: Receiver<WorkerCommand>,
    event_tx: Sender<WorkerEvent>,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("failed to build verification worker runtime: {err}");
            let _ = event_tx.send(WorkerEvent::StartupFailed(format!(
                "failed to build worker runtime: {err}"
            )));
            return;
        }
    };
    let _ = event_tx.send(WorkerEvent::Ready);

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::Submit(pending) => {
                let id = pending.id;
                let outcome = runtime.block_on(execute(transport.as_ref(), pending.request));
                if event_tx
                    .send(WorkerEvent::Completed { id, outcome })
                    .is_err()
                {
                    debug!(submission_id = %id, "event receiver gone; stopping worker");
                    break;
                }
            }
            WorkerCommand::Shutdown => break,
        }
    }
}

impl WorkerHandle {
    pub fn dispatch(&self, pending: PendingSubmission) -> Result<(), DispatchError> {
        let id = pending.id;
        match self.commands.try_send(WorkerCommand::Submit(pending)) {
            Ok(()) => {
                debug!(submission_id = %id, "queued submission for worker");
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(DispatchError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(DispatchError::Disconnected),
        }
    }

    /// Waits up to `timeout` for the next worker event.
    pub fn next_event(&self, timeout: Duration) -> Option<WorkerEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(WorkerEvent::StartupFailed(
                DispatchError::Disconnected.to_string(),
            )),
        }
    }

    /// Applies every event already queued. Returns how many were handled.
    pub fn pump(&self, controller: &mut WorkflowController) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            handle_event(controller, event);
            handled += 1;
        }
        handled
    }

    pub fn shutdown(mut self) {
        let _ = self.commands.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("verification worker panicked during shutdown");
            }
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.commands.try_send(WorkerCommand::Shutdown);
        }
    }
}

/// Hands `pending` to the worker. If it cannot be queued the submission is
/// failed on the spot so the controller never waits on a request nobody runs.
pub fn dispatch_submission(
    controller: &mut WorkflowController,
    worker: &WorkerHandle,
    pending: PendingSubmission,
) -> bool {
    let id = pending.id;
    match worker.dispatch(pending) {
        Ok(()) => true,
        Err(err) => {
            warn!(submission_id = %id, %err, "could not queue submission");
            controller.complete(id, SubmissionOutcome::TransportFailed(err.to_string()));
            false
        }
    }
}

pub fn handle_event(controller: &mut WorkflowController, event: WorkerEvent) {
    match event {
        WorkerEvent::Ready => debug!("verification worker ready"),
        WorkerEvent::Completed { id, outcome } => {
            controller.complete(id, outcome);
        }
        WorkerEvent::StartupFailed(message) => {
            error!("verification worker unavailable: {message}");
            if let Some(id) = controller.in_flight_id() {
                controller.complete(id, SubmissionOutcome::TransportFailed(message));
            }
        }
    }
}
