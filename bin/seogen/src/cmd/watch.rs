//! Watch command - regenerates outputs when the content tree changes

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::Local;
use color_eyre::eyre::{Result, WrapErr};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use seogen_core::Config;
use seogen_generator::Generator;
use tokio::{sync::mpsc, time::Instant};

use super::{generate::print_stats, load_config};
use crate::watcher::{ChangeFilter, UpdateScheduler};

/// Capacity of the event channel between the notify thread and the loop.
const EVENT_BUFFER: usize = 64;

/// Run the watch command.
///
/// Generates once, then regenerates after every burst of relevant changes
/// until interrupted.
pub async fn run(config_path: &Path) -> Result<()> {
    tracing::info!(?config_path, "Starting watch mode");

    let config = load_config(config_path)?;
    let generator = Generator::from_config(config.clone());

    println!();
    println!("  Running initial generation...");
    regenerate(&generator);

    let filter = ChangeFilter::new(&config.watch.extensions).with_file(&config.paths.board_config);
    let mut scheduler = UpdateScheduler::new(Duration::from_millis(config.watch.debounce_ms));

    let (tx, mut rx) = mpsc::channel::<Event>(EVENT_BUFFER);
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = tx.blocking_send(event);
            }
            Err(e) => tracing::warn!("Watch error: {e}"),
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    let watched = watch_targets(&mut watcher, &config)?;
    if watched == 0 {
        tracing::warn!("No watch targets exist, waiting for shutdown only");
    }

    println!();
    println!(
        "  Watching for changes ({}ms debounce)",
        config.watch.debounce_ms
    );
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let deadline = scheduler.deadline().map(Instant::from_std);

        tokio::select! {
            () = &mut shutdown => {
                if scheduler.cancel() {
                    tracing::info!("Cancelled pending update");
                }
                break;
            }
            event = rx.recv() => {
                let Some(event) = event else {
                    tracing::warn!("File watcher stopped");
                    break;
                };
                if let Some(path) = filter.relevant_path(&event) {
                    tracing::debug!(path = %path.display(), kind = ?event.kind, "Change detected");
                    scheduler.on_change(std::time::Instant::now());
                }
            }
            () = async {
                if let Some(deadline) = deadline {
                    tokio::time::sleep_until(deadline).await;
                }
            }, if deadline.is_some() => {
                if scheduler.begin_update() {
                    println!("  [{}] Change detected, regenerating...", Local::now().format("%H:%M:%S"));
                    regenerate(&generator);
                    scheduler.finish_update(std::time::Instant::now());
                }
            }
        }
    }

    drop(watcher);
    println!();
    println!("  Stopped watching");
    tracing::info!("Watch mode stopped");

    Ok(())
}

/// Register the content tree and the board configuration file.
///
/// Missing targets are skipped with a warning. Returns the number watched.
fn watch_targets(watcher: &mut RecommendedWatcher, config: &Config) -> Result<usize> {
    let targets: [(&PathBuf, RecursiveMode); 2] = [
        (&config.paths.content_dir, RecursiveMode::Recursive),
        (&config.paths.board_config, RecursiveMode::NonRecursive),
    ];

    let mut watched = 0;
    for (path, mode) in targets {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Watch target does not exist, skipping");
            continue;
        }
        watcher
            .watch(path, mode)
            .wrap_err_with(|| format!("Failed to watch {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?mode, "Watching");
        watched += 1;
    }
    Ok(watched)
}

/// Run one generation, reporting failures without stopping the watcher.
fn regenerate(generator: &Generator) {
    match generator.run() {
        Ok(stats) => {
            print_stats(&stats);
            println!("  Duration:  {:>4}ms", stats.duration_ms);
            println!();
        }
        Err(e) => {
            tracing::error!("Generation failed: {e}");
            eprintln!("  ✗ Generation failed: {e}");
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C"),
        () = terminate => tracing::info!("Received SIGTERM"),
    }
}
