use anyhow::{Context, Result};
use interactflow_common::{RecordingStore, SystemClock};
use interactflow_player::{DryRunInjector, InputInjector, PlaybackEngine, RdevInjector};
use interactflow_recorder::EventCapture;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::{signal, task, time};
use tracing::{info, warn};

use crate::context::AppContext;

/// Records until Ctrl+C (or until `limit` elapses), then saves.
pub async fn record(ctx: &AppContext, name: Option<String>, limit: Option<Duration>) -> Result<()> {
    let mut capture = EventCapture::new();
    capture
        .start()
        .context("failed to start input capture")?;
    info!("Starting recording... Press Ctrl+C to stop.");

    match limit {
        Some(limit) => tokio::select! {
            interrupted = signal::ctrl_c() => {
                interrupted.context("failed to listen for Ctrl+C")?;
                info!("Received interrupt signal. Stopping...");
            }
            _ = time::sleep(limit) => info!("Recording time limit reached. Stopping..."),
        },
        None => {
            signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl+C")?;
            info!("Received interrupt signal. Stopping...");
        }
    }

    match ctx.finish_recording(&mut capture, name.as_deref())? {
        Some(path) => info!("Recording saved to: {}", path.display()),
        None => warn!("Nothing was recorded"),
    }
    Ok(())
}

pub async fn play(ctx: &AppContext, file: &Path, speed: f64, dry_run: bool) -> Result<()> {
    let path = ctx.resolve_recording(file);
    let recording = ctx
        .store
        .load(&path)
        .with_context(|| format!("could not load recording {}", path.display()))?;

    let injector: Box<dyn InputInjector + Send + Sync> = if dry_run {
        Box::new(DryRunInjector)
    } else {
        Box::new(RdevInjector::new())
    };
    let mut engine = PlaybackEngine::with_injector(injector, SystemClock::new());
    engine.load(recording);
    let engine = Arc::new(engine);
    let handle = engine.stop_handle();

    info!("Playing recording at {}x speed...", speed);
    let mut playback = task::spawn_blocking({
        let engine = engine.clone();
        move || engine.play(speed)
    });

    let report = tokio::select! {
        finished = &mut playback => finished??,
        _ = signal::ctrl_c() => {
            info!("Received interrupt signal. Stopping...");
            handle.stop();
            playback.await??
        }
    };

    info!(
        "Replayed {} events ({} skipped, {} failed{})",
        report.injected,
        report.skipped,
        report.failed,
        if report.cancelled { ", cancelled" } else { "" }
    );
    Ok(())
}

pub fn list(ctx: &AppContext) -> Result<()> {
    let directory = ctx.store.directory();
    if !directory.exists() {
        info!("No recordings directory found at {}", directory.display());
        return Ok(());
    }

    let recordings = ctx.store.list()?;
    if recordings.is_empty() {
        info!("No recordings found.");
        return Ok(());
    }

    println!("Available recordings in {}:", directory.display());
    for recording in recordings {
        if let Some(name) = recording.file_name() {
            println!("- {}", name.to_string_lossy());
        }
    }
    Ok(())
}
