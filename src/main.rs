use anyhow::Result;
use buds_config::{AppConfig, FilePrefs};
use buds_core::{Orientation, OrientationProcessor, OrientationSink};
use buds_osc::OscReceiver;
use glam::Quat;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Publishes delivered orientations on a watch channel for downstream
/// consumers (renderer, scene graph, recorder).
struct WatchSink {
    orientation_tx: watch::Sender<Orientation>,
}

impl OrientationSink for WatchSink {
    fn deliver(&mut self, orientation: Quat) {
        let _ = self.orientation_tx.send(Orientation {
            quaternion: orientation,
        });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buds_app=info,buds_core=info,buds_osc=info".into()),
        )
        .init();

    info!("Galaxy Buds orientation bridge starting");

    let config = buds_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    let prefs = FilePrefs::open(buds_config::prefs_path()?)?;
    let mut processor = OrientationProcessor::new(prefs);

    info!(mapping = processor.current_label(), "Active axis mapping");
    if !processor.is_calibrated() {
        info!("Not calibrated, output stays suppressed until 'c' is pressed");
    }
    info!("Keys (press Enter after each): 'c' calibrate, 'm' cycle mapping, 'v' commit mapping, 'q' quit");

    let mut receiver = OscReceiver::bind(
        &config.receiver.host,
        config.receiver.port,
        &config.receiver.address,
    )
    .await?;

    // Downstream consumers subscribe here; the held receiver keeps the
    // channel open for the lifetime of the loop.
    let (orientation_tx, _orientation_rx) = watch::channel(Orientation::default());
    let mut sink = WatchSink { orientation_tx };

    let mut keys = BufReader::new(tokio::io::stdin()).lines();
    let mut sample_count: u64 = 0;

    loop {
        tokio::select! {
            sample = receiver.recv() => {
                let Some(components) = sample else {
                    warn!("OSC receiver stopped");
                    break;
                };
                processor.process_sample(&components, Some(&mut sink));
                sample_count += 1;
                if sample_count % 1000 == 0 {
                    debug!(sample_count, "Samples processed");
                }
            }
            line = keys.next_line() => {
                match line?.as_deref().map(str::trim) {
                    Some("c") => processor.on_calibrate(),
                    Some("m") => processor.on_cycle_mapping(),
                    Some("v") => processor.on_commit_mapping(),
                    Some("q") | None => {
                        info!("Shutting down");
                        break;
                    }
                    Some("") => {}
                    Some(other) => warn!(key = other, "Unknown key"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}
