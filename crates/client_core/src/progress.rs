//! Cosmetic step timeline shown while a submission is in flight.
//!
//! The timeline runs on a fixed clock and knows nothing about the real
//! request; it only needs to know whether the workflow is submitting.

use std::time::{Duration, Instant};

pub const STEP_DURATION: Duration = Duration::from_millis(1500);

pub const VERIFICATION_STEPS: [&str; 7] = [
    "ML Model Analysis",
    "Google Fact Check",
    "Twitter Verification",
    "Reddit Search",
    "News API Lookup",
    "Web Scraping",
    "AI Verdict Aggregation",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepView {
    pub name: &'static str,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub steps: Vec<StepView>,
    pub percent: u8,
}

impl ProgressSnapshot {
    /// Steps light up one per [`STEP_DURATION`]; the last one keeps running
    /// until the submission settles.
    pub fn at(elapsed: Duration) -> Self {
        let ticks = (elapsed.as_millis() / STEP_DURATION.as_millis()) as usize;
        let active = ticks.min(VERIFICATION_STEPS.len()).checked_sub(1);

        let steps = VERIFICATION_STEPS
            .iter()
            .enumerate()
            .map(|(idx, &name)| {
                let status = match active {
                    Some(active) if idx < active => StepStatus::Completed,
                    Some(active) if idx == active => StepStatus::Running,
                    _ => StepStatus::Pending,
                };
                StepView { name, status }
            })
            .collect();

        let total = STEP_DURATION.as_millis() * VERIFICATION_STEPS.len() as u128;
        let percent = (elapsed.as_millis() * 100 / total).min(100) as u8;

        Self { steps, percent }
    }

    pub fn completed(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.status == StepStatus::Completed)
            .count()
    }

    pub fn running(&self) -> Option<&StepView> {
        self.steps
            .iter()
            .find(|step| step.status == StepStatus::Running)
    }
}

#[derive(Debug, Default)]
pub struct ProgressTimeline {
    started_at: Option<Instant>,
}

impl ProgressTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock when submitting begins and clears it once it ends.
    pub fn observe(&mut self, submitting: bool, now: Instant) -> Option<ProgressSnapshot> {
        if !submitting {
            self.started_at = None;
            return None;
        }
        let started_at = *self.started_at.get_or_insert(now);
        Some(ProgressSnapshot::at(now.saturating_duration_since(started_at)))
    }
}
