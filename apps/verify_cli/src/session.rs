//! Drives a [`WorkflowController`] from the terminal, with the network work
//! running on the background worker.

use std::{
    io::{self, BufRead, Write},
    path::Path,
    process::ExitCode,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use client_core::{
    progress::ProgressTimeline,
    share::share_link,
    spawn_worker,
    worker::{dispatch_submission, handle_event},
    HttpTransport, InputEvent, PendingSubmission, WorkerHandle, WorkflowController,
};
use shared::domain::Modality;

use crate::{
    read_upload,
    render::{self, ProgressPrinter, RenderOptions},
};

const PROGRESS_TICK: Duration = Duration::from_millis(250);

pub fn one_shot(
    transport: HttpTransport,
    events: Vec<InputEvent>,
    options: &RenderOptions,
) -> Result<ExitCode> {
    let worker = spawn_worker(Arc::new(transport));
    let mut controller = WorkflowController::new();

    let mut pending = None;
    for event in events {
        if let Some(submission) = controller.apply(event) {
            pending = Some(submission);
        }
    }
    let Some(pending) = pending.or_else(|| controller.submit()) else {
        bail!("nothing to verify: the input is empty");
    };

    wait_for_verdict(&mut controller, &worker, pending, options);
    let code = render::phase(controller.phase(), options)?;
    worker.shutdown();
    Ok(code)
}

pub fn health(transport: &HttpTransport, options: &RenderOptions) -> Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    let health = runtime
        .block_on(transport.health())
        .with_context(|| format!("health check against {} failed", transport.base_url()))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&health)?);
    } else {
        println!(
            "{}: {} (model loaded: {})",
            transport.base_url(),
            health.status,
            if health.model_loaded { "yes" } else { "no" }
        );
    }
    Ok(if health.is_healthy() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn interactive(transport: HttpTransport, options: &RenderOptions) -> Result<ExitCode> {
    let worker = spawn_worker(Arc::new(transport));
    let mut controller = WorkflowController::new();
    let stdin = io::stdin();

    print_help();
    prompt(&controller)?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();

        if controller.phase().is_terminal() && !matches!(line, ":reset" | ":share" | ":quit") {
            println!("Type :reset to check something else, :share for a share link.");
            prompt(&controller)?;
            continue;
        }

        let pending = match line.split_once(' ').unwrap_or((line, "")) {
            (":quit", _) => break,
            (":help", _) => {
                print_help();
                None
            }
            (":reset", _) => {
                controller.reset();
                None
            }
            (":share", _) => {
                match controller.phase().display_model() {
                    Some(model) => println!("{}", share_link(model)),
                    None => println!("Nothing to share yet."),
                }
                None
            }
            (":text", _) => controller.apply(InputEvent::SelectModality(Modality::Text)),
            (":url", _) => controller.apply(InputEvent::SelectModality(Modality::Url)),
            (":image", path) => select_file(&mut controller, Modality::Image, path)?,
            (":voice", path) => select_file(&mut controller, Modality::Voice, path)?,
            _ if line.starts_with(':') => {
                println!("Unknown command {line}; :help lists commands.");
                None
            }
            _ => {
                controller.apply(InputEvent::TextChanged(line.to_string()));
                controller.submit()
            }
        };

        if let Some(pending) = pending {
            wait_for_verdict(&mut controller, &worker, pending, options);
            render::phase(controller.phase(), options)?;
        }
        prompt(&controller)?;
    }

    worker.shutdown();
    Ok(ExitCode::SUCCESS)
}

fn select_file(
    controller: &mut WorkflowController,
    modality: Modality,
    path: &str,
) -> Result<Option<PendingSubmission>> {
    let path = path.trim();
    if path.is_empty() {
        println!("Usage: :{modality} <path>");
        return Ok(None);
    }
    let file = match read_upload(Path::new(path)) {
        Ok(file) => file,
        Err(err) => {
            println!("{err:#}");
            return Ok(None);
        }
    };
    controller.apply(InputEvent::SelectModality(modality));
    controller.apply(InputEvent::FileSelected(file));
    Ok(controller.submit())
}

fn wait_for_verdict(
    controller: &mut WorkflowController,
    worker: &WorkerHandle,
    pending: PendingSubmission,
    options: &RenderOptions,
) {
    if !dispatch_submission(controller, worker, pending) {
        return;
    }

    let mut timeline = ProgressTimeline::new();
    let mut printer = ProgressPrinter::new(options.progress && !options.json);
    while controller.is_submitting() {
        if let Some(snapshot) = timeline.observe(true, Instant::now()) {
            printer.update(&snapshot);
        }
        if let Some(event) = worker.next_event(PROGRESS_TICK) {
            handle_event(controller, event);
        }
    }
    timeline.observe(false, Instant::now());
    printer.finish();
}

fn prompt(controller: &WorkflowController) -> Result<()> {
    let draft = controller.draft();
    if controller.phase().is_terminal() {
        print!("[done] > ");
    } else {
        print!("[{}] {} > ", draft.modality, draft.modality.placeholder());
    }
    io::stdout().flush().context("failed to flush stdout")
}

fn print_help() {
    println!("Type or paste something and press Enter to verify it.");
    for line in modality_help() {
        println!("{line}");
    }
    println!("  :share                print a share link for the last result");
    println!("  :reset                check something else");
    println!("  :quit                 exit");
}

fn modality_help() -> Vec<String> {
    Modality::ALL
        .into_iter()
        .map(|modality| {
            let command = if modality.is_textual() {
                format!(":{modality}")
            } else {
                format!(":{modality} <path>")
            };
            format!("  {command:<22}{}", modality.placeholder())
        })
        .collect()
}
