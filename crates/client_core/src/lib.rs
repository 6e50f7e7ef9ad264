//! Client-side verification workflow: turns user input into detection
//! requests, drives the submit/result state machine, and normalizes whatever
//! the detection service answers into a [`shared::domain::DisplayModel`].

pub mod controller;
pub mod normalize;
pub mod progress;
pub mod request;
pub mod settings;
pub mod share;
pub mod transport;
pub mod worker;

pub use controller::{
    InputDraft, InputEvent, PendingSubmission, SubmissionId, SubmissionOutcome,
    WorkflowController, WorkflowPhase,
};
pub use normalize::normalize;
pub use request::{build, RequestDescriptor};
pub use settings::{load_settings, ClientSettings};
pub use transport::{DetectionTransport, HttpTransport, TransportError, TransportResponse};
pub use worker::{spawn_worker, WorkerEvent, WorkerHandle};
