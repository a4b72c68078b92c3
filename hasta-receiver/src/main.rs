//! Hasta receiver - shows remote hands from a hasta sender
//!
//! The receive loop runs on a background thread; hands are created, moved
//! and destroyed on the main thread at the consumer tick rate. Without a
//! scene to draw into, hands are rendered to the log.

use hasta_receiver::{
    Error, HandReconciler, HandoffSlot, LogRenderer, PoseReceiver, ReceiverConfig, Result,
};
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Parse config path from command line arguments.
///
/// Supports `hasta-receiver <path>`, `--config <path>` and `-c <path>`.
fn parse_config_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return Some(args[1].clone());
    }

    None
}

fn load_config() -> Result<ReceiverConfig> {
    match parse_config_path() {
        Some(path) => ReceiverConfig::from_file(path),
        None if Path::new("hasta-receiver.toml").exists() => {
            ReceiverConfig::from_file("hasta-receiver.toml")
        }
        None => Ok(ReceiverConfig::default()),
    }
}

fn main() -> Result<()> {
    let config = load_config()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("Hasta receiver v{} starting...", env!("CARGO_PKG_VERSION"));

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let slot = Arc::new(HandoffSlot::new());

    // Bind failure is fatal
    let receiver = PoseReceiver::bind(&config.network, Arc::clone(&slot), Arc::clone(&running))?;
    let stats = receiver.stats();
    let receiver_handle = receiver.spawn()?;

    let mut reconciler = HandReconciler::new(LogRenderer::new());

    let tick_hz = config.consumer.tick_hz.max(1.0);
    let tick_interval = Duration::from_secs_f32(1.0 / tick_hz);
    let stats_interval = Duration::from_secs(config.logging.stats_interval_secs);
    let mut last_stats = Instant::now();
    let mut next_tick = Instant::now();

    log::info!("Consumer tick @ {:.0}Hz", tick_hz);

    while running.load(Ordering::Relaxed) {
        if let Some(frame) = slot.take() {
            let report = reconciler.apply(&frame);
            if !report.lifecycle_unchanged() {
                log::debug!("Live hands: {}", reconciler.renderer().live());
            }
        }

        if !stats_interval.is_zero() && last_stats.elapsed() >= stats_interval {
            let s = stats.snapshot();
            log::info!(
                "Received {} datagrams ({} empty, {} malformed, {} overwritten)",
                s.datagrams,
                s.sentinels,
                s.decode_failures,
                slot.overwritten()
            );
            last_stats = Instant::now();
        }

        next_tick += tick_interval;
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        } else {
            next_tick = now;
        }
    }

    log::info!("Shutting down...");
    reconciler.clear();

    if receiver_handle.join().is_err() {
        log::error!("Receiver thread panicked");
    }

    let s = stats.snapshot();
    log::info!(
        "Received {} datagrams ({} empty, {} malformed, {} recv errors, {} overwritten)",
        s.datagrams,
        s.sentinels,
        s.decode_failures,
        s.recv_errors,
        slot.overwritten()
    );
    log::info!("Hasta receiver stopped");
    Ok(())
}
