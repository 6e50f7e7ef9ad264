//! Verification workflow state machine: `Idle -> Submitting -> Result | Failed`.
//!
//! The controller is the single owner of the workflow state. Input widgets
//! feed it [`InputEvent`]s, the network side feeds it completions, and result
//! views only read [`WorkflowPhase`]. Every failure kind ends here; nothing is
//! propagated back to callers.

use std::fmt;

use serde_json::Value;
use shared::{
    domain::{BinaryPayload, DisplayModel, InputPayload, Modality},
    error::ApiError,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    normalize::{backend_failure, normalize, transport_failure},
    request::{build, RequestDescriptor},
    transport::{DetectionTransport, TransportError, TransportResponse},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    Submitting,
    Result(DisplayModel),
    Failed(DisplayModel),
}

impl WorkflowPhase {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowPhase::Idle => "idle",
            WorkflowPhase::Submitting => "submitting",
            WorkflowPhase::Result(_) => "result",
            WorkflowPhase::Failed(_) => "failed",
        }
    }

    /// Results and failures render through the same view.
    pub fn display_model(&self) -> Option<&DisplayModel> {
        match self {
            WorkflowPhase::Result(model) | WorkflowPhase::Failed(model) => Some(model),
            WorkflowPhase::Idle | WorkflowPhase::Submitting => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.display_model().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDraft {
    pub modality: Modality,
    pub text: String,
    pub selected_file: Option<BinaryPayload>,
}

impl InputDraft {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.selected_file.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    SelectModality(Modality),
    TextChanged(String),
    FileSelected(BinaryPayload),
    FileCleared,
    /// The recorder submits as soon as it stops.
    RecordingStopped(Vec<u8>),
}

/// A request the controller has accepted and now waits on.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub id: SubmissionId,
    pub modality: Modality,
    pub original_input: String,
    pub request: RequestDescriptor,
}

#[derive(Debug)]
pub enum SubmissionOutcome {
    Responded(TransportResponse),
    TransportFailed(String),
}

impl From<Result<TransportResponse, TransportError>> for SubmissionOutcome {
    fn from(result: Result<TransportResponse, TransportError>) -> Self {
        match result {
            Ok(response) => SubmissionOutcome::Responded(response),
            Err(err) => SubmissionOutcome::TransportFailed(err.to_string()),
        }
    }
}

pub async fn execute<T>(transport: &T, request: RequestDescriptor) -> SubmissionOutcome
where
    T: DetectionTransport + ?Sized,
{
    transport.send(request).await.into()
}

#[derive(Debug, Clone)]
struct InFlight {
    id: SubmissionId,
    original_input: String,
}

#[derive(Debug, Default)]
pub struct WorkflowState {
    phase: WorkflowPhase,
    draft: InputDraft,
    in_flight: Option<InFlight>,
}

#[derive(Debug, Default)]
pub struct WorkflowController {
    state: WorkflowState,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &WorkflowPhase {
        &self.state.phase
    }

    pub fn draft(&self) -> &InputDraft {
        &self.state.draft
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state.phase, WorkflowPhase::Submitting)
    }

    pub fn in_flight_id(&self) -> Option<SubmissionId> {
        self.state.in_flight.as_ref().map(|in_flight| in_flight.id)
    }

    /// Applies a widget event. Only `RecordingStopped` can start a submission.
    pub fn apply(&mut self, event: InputEvent) -> Option<PendingSubmission> {
        if !matches!(self.state.phase, WorkflowPhase::Idle) {
            debug!(phase = self.state.phase.name(), ?event, "ignoring input event outside idle");
            return None;
        }

        let draft = &mut self.state.draft;
        match event {
            InputEvent::SelectModality(modality) => {
                if draft.modality != modality {
                    draft.modality = modality;
                    draft.text.clear();
                    draft.selected_file = None;
                }
                None
            }
            InputEvent::TextChanged(text) => {
                draft.text = text;
                draft.selected_file = None;
                None
            }
            InputEvent::FileSelected(file) => {
                draft.selected_file = Some(file);
                draft.text.clear();
                None
            }
            InputEvent::FileCleared => {
                draft.selected_file = None;
                None
            }
            InputEvent::RecordingStopped(bytes) => {
                draft.modality = Modality::Voice;
                draft.text.clear();
                draft.selected_file = Some(BinaryPayload::voice_recording(bytes));
                self.submit()
            }
        }
    }

    /// Submits whatever the draft holds for the active modality.
    pub fn submit(&mut self) -> Option<PendingSubmission> {
        if !matches!(self.state.phase, WorkflowPhase::Idle) {
            warn!(phase = self.state.phase.name(), "ignoring submit while a submission is active");
            return None;
        }

        let draft = &mut self.state.draft;
        let payload = match draft.modality {
            Modality::Text => InputPayload::Text(draft.text.clone()),
            Modality::Url => InputPayload::Url(draft.text.clone()),
            Modality::Image | Modality::Voice => {
                if !draft.selected_file.as_ref().is_some_and(|file| !file.is_empty()) {
                    debug!(modality = %draft.modality, "submit ignored: no file selected");
                    return None;
                }
                let file = draft.selected_file.take()?;
                if draft.modality == Modality::Image {
                    InputPayload::Image(file)
                } else {
                    InputPayload::Voice(file)
                }
            }
        };
        self.submit_payload(payload)
    }

    /// Guarded entry point: a no-op unless idle and the payload has content.
    pub fn submit_payload(&mut self, payload: InputPayload) -> Option<PendingSubmission> {
        if !matches!(self.state.phase, WorkflowPhase::Idle) {
            warn!(phase = self.state.phase.name(), "ignoring submit while a submission is active");
            return None;
        }
        if !payload.is_ready() {
            debug!(modality = %payload.modality(), "submit ignored: input not ready");
            return None;
        }

        let modality = payload.modality();
        let original_input = payload.query_text().to_string();
        let request = match build(payload) {
            Ok(request) => request,
            Err(err) => {
                debug!(%err, "submit ignored: request could not be built");
                return None;
            }
        };

        let id = SubmissionId::new();
        self.state.phase = WorkflowPhase::Submitting;
        self.state.in_flight = Some(InFlight {
            id,
            original_input: original_input.clone(),
        });
        info!(
            submission_id = %id,
            %modality,
            route = request.route.path(),
            "submission started"
        );

        Some(PendingSubmission {
            id,
            modality,
            original_input,
            request,
        })
    }

    /// Settles the in-flight submission. Completions for any other id are
    /// dropped, so a late answer cannot overwrite a newer workflow.
    pub fn complete(&mut self, id: SubmissionId, outcome: SubmissionOutcome) -> bool {
        if self.in_flight_id() != Some(id) {
            warn!(submission_id = %id, "ignoring completion for a submission that is not in flight");
            return false;
        }
        let Some(in_flight) = self.state.in_flight.take() else {
            return false;
        };
        let input = in_flight.original_input.as_str();

        self.state.phase = match outcome {
            SubmissionOutcome::Responded(response) if response.is_success() => {
                match serde_json::from_slice::<Value>(&response.body) {
                    Ok(raw) => WorkflowPhase::Result(normalize(&raw, input)),
                    Err(err) => WorkflowPhase::Failed(transport_failure(
                        &format!("malformed response body: {err}"),
                        input,
                    )),
                }
            }
            SubmissionOutcome::Responded(response) => {
                let api_error = ApiError::from_body(response.status, &response.body);
                WorkflowPhase::Failed(backend_failure(&api_error.reason, input))
            }
            SubmissionOutcome::TransportFailed(message) => {
                WorkflowPhase::Failed(transport_failure(&message, input))
            }
        };

        match &self.state.phase {
            WorkflowPhase::Failed(model) => warn!(
                submission_id = %id,
                reason = model.explanation.reasons.first().map(String::as_str).unwrap_or_default(),
                "submission failed"
            ),
            phase => info!(submission_id = %id, phase = phase.name(), "submission completed"),
        }
        true
    }

    /// Back to `Idle` with every transient value cleared. There is no
    /// mid-flight cancel, so this does nothing while submitting.
    pub fn reset(&mut self) -> bool {
        if self.is_submitting() {
            debug!("ignoring reset while submitting");
            return false;
        }
        self.state = WorkflowState::default();
        true
    }

    /// Submits the current draft and waits for the answer on `transport`.
    pub async fn submit_and_wait<T>(&mut self, transport: &T) -> &WorkflowPhase
    where
        T: DetectionTransport + ?Sized,
    {
        if let Some(pending) = self.submit() {
            let outcome = execute(transport, pending.request).await;
            self.complete(pending.id, outcome);
        }
        self.phase()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
