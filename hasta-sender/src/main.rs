//! Hasta sender - streams tracked hand poses to a receiver over UDP
//!
//! One datagram per tick, fire-and-forget. Calibration offsets are adjusted
//! from the console while running:
//!
//! ```text
//! lx+ / lx-   nudge left hand X by one step (ly, lz, rx, ry, rz likewise)
//! reset       zero both offsets
//! show        print current offsets
//! ```

use crossbeam_channel::{Receiver, TryRecvError};
use hasta_sender::{
    Error, HandOffsets, OffsetCommand, PosePublisher, Result, SenderConfig, SimulatedHands,
    TrackingSource,
};
use std::env;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Parse config path from command line arguments.
///
/// Supports `hasta-sender <path>`, `--config <path>` and `-c <path>`.
/// Returns `None` to run with defaults.
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

fn load_config() -> Result<SenderConfig> {
    match parse_config_path() {
        Some(path) => SenderConfig::from_file(path),
        None if Path::new("hasta-sender.toml").exists() => {
            SenderConfig::from_file("hasta-sender.toml")
        }
        None => Ok(SenderConfig::default()),
    }
}

/// Read offset commands from stdin on a helper thread.
fn spawn_console() -> Result<Receiver<OffsetCommand>> {
    let (tx, rx) = crossbeam_channel::unbounded();

    thread::Builder::new()
        .name("offset-console".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<OffsetCommand>() {
                    Ok(command) => {
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("{}", e),
                }
            }
        })
        .map_err(|e| Error::Other(format!("Failed to spawn console thread: {}", e)))?;

    Ok(rx)
}

fn main() -> Result<()> {
    let config = load_config()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("Hasta sender v{} starting...", env!("CARGO_PKG_VERSION"));

    let offsets = match &config.offsets.file {
        Some(path) if path.exists() => {
            let offsets = HandOffsets::load(path)?;
            log::info!("Loaded offsets from {}: {}", path.display(), offsets);
            offsets
        }
        _ => HandOffsets::default(),
    };

    // Bind failure is fatal
    let mut publisher = PosePublisher::new(&config.network, offsets)?;

    let tick_hz = config.publisher.tick_hz.max(1.0);
    let mut tracker = SimulatedHands::new(config.simulation.clone(), tick_hz);
    log::info!("Tracking source: simulated hands @ {:.0}Hz", tick_hz);

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let commands = spawn_console()?;
    let tick_interval = Duration::from_secs_f32(1.0 / tick_hz);
    let mut offsets_changed = false;
    let mut console_open = true;
    let mut next_tick = Instant::now();

    while running.load(Ordering::Relaxed) {
        // Offset commands take effect from this tick on
        while console_open {
            match commands.try_recv() {
                Ok(OffsetCommand::Show) => log::info!("Offsets: {}", publisher.offsets()),
                Ok(command) => {
                    if publisher
                        .offsets_mut()
                        .apply(command, config.offsets.step)
                    {
                        offsets_changed = true;
                        log::info!("Offsets: {}", publisher.offsets());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Console closed");
                    console_open = false;
                }
            }
        }

        let hands = tracker.poll_hands();
        publisher.tick(&hands);

        next_tick += tick_interval;
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        } else {
            // Fell behind; don't burst to catch up
            next_tick = now;
        }
    }

    log::info!("Shutting down...");

    if let Some(path) = config.offsets.file.as_ref().filter(|_| offsets_changed) {
        match publisher.offsets().save(path) {
            Ok(()) => log::info!("Saved offsets to {}", path.display()),
            Err(e) => log::error!("Failed to save offsets: {}", e),
        }
    }

    let stats = publisher.stats();
    log::info!(
        "Sent {}/{} datagrams ({} failed, {} with no hands)",
        stats.sent,
        stats.ticks,
        stats.send_failures,
        stats.empty_ticks
    );
    log::info!("Hasta sender stopped");
    Ok(())
}
