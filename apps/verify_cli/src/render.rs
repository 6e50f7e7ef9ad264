use std::{fmt::Write as _, process::ExitCode};

use anyhow::Result;
use client_core::{
    progress::{ProgressSnapshot, VERIFICATION_STEPS},
    share::share_link,
    WorkflowPhase,
};
use shared::domain::DisplayModel;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub json: bool,
    pub progress: bool,
}

/// Prints the settled phase; failures exit with status 2.
pub fn phase(phase: &WorkflowPhase, options: &RenderOptions) -> Result<ExitCode> {
    let (model, code) = match phase {
        WorkflowPhase::Result(model) => (model, ExitCode::SUCCESS),
        WorkflowPhase::Failed(model) => (model, ExitCode::from(2)),
        WorkflowPhase::Idle | WorkflowPhase::Submitting => return Ok(ExitCode::FAILURE),
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(model)?);
    } else {
        print!("{}", report(model, matches!(phase, WorkflowPhase::Failed(_))));
    }
    Ok(code)
}

pub fn report(model: &DisplayModel, failed: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Verdict: {}  (fake {}% / real {}%)",
        model.verdict_label, model.confidence.fake, model.confidence.real
    );

    let mut query = String::new();
    for segment in &model.highlighted_query {
        if segment.is_suspicious {
            let _ = write!(query, ">>{}<<", segment.text);
        } else {
            query.push_str(&segment.text);
        }
    }
    let _ = writeln!(out, "Content: {query}");

    if !model.description.is_empty() {
        let _ = writeln!(out, "\n{}", model.description);
    }

    if !model.explanation.reasons.is_empty() {
        let _ = writeln!(out, "\n{}", if failed { "Details:" } else { "Key factors:" });
        for reason in &model.explanation.reasons {
            let _ = writeln!(out, "  - {reason}");
        }
    }

    if !model.related_articles.is_empty() {
        let _ = writeln!(out, "\nRelated articles:");
        for (idx, article) in model.related_articles.iter().enumerate() {
            let _ = writeln!(out, "  {}. {} ({})", idx + 1, article.title, article.source);
            if !article.url.is_empty() {
                let _ = writeln!(out, "     {}", article.url);
            }
        }
    }

    if let Some(metadata) = &model.metadata {
        if let (Some(ok), Some(checked)) = (metadata.services_successful, metadata.services_checked)
        {
            let _ = write!(out, "\nSources answered: {ok}/{checked}");
            if let Some(secs) = metadata.processing_time {
                let _ = write!(out, " in {secs:.1}s");
            }
            let _ = writeln!(out);
        }
    }

    if !failed {
        let _ = writeln!(out, "\nShare: {}", share_link(model));
    }
    out
}

/// Writes one stderr line each time the running step changes.
pub struct ProgressPrinter {
    enabled: bool,
    last_step: Option<usize>,
}

impl ProgressPrinter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_step: None,
        }
    }

    pub fn update(&mut self, snapshot: &ProgressSnapshot) {
        if !self.enabled {
            return;
        }
        let Some(running) = snapshot.running() else {
            if self.last_step.is_none() {
                eprintln!("Verifying...");
                self.last_step = Some(usize::MAX);
            }
            return;
        };
        let done = snapshot.completed();
        if self.last_step == Some(done) {
            return;
        }
        self.last_step = Some(done);
        eprintln!(
            "[{:>3}%] {} ({}/{} checks done)",
            snapshot.percent,
            running.name,
            done,
            VERIFICATION_STEPS.len()
        );
    }

    pub fn finish(&mut self) {
        self.last_step = None;
    }
}
