//! keybridge daemon — entry point.
//!
//! Claims a physical USB boot-protocol keyboard, remaps its keys through
//! hot-swappable layouts, and emits the result on a uinput virtual keyboard.
//! A reserved swap key cycles layouts at runtime; unplugging the keyboard
//! drops into a discovery loop that re-attaches on replug.
//!
//! # Usage
//!
//! ```text
//! keybridge [OPTIONS]
//!
//! Options:
//!   --config <PATH>            Config file [default: ~/.config/keybridge/config.toml]
//!   --default-mapping <NAME>   Layout active at startup
//!   --available <NAMES>        Comma-separated layout rotation
//!   --layout-swap-key <CODE>   Scan code of the swap key, e.g. 0x30
//!   --mapping-dir <DIR>        Directory of <name>.json layout files
//!   --brightness <0-10>        Indicator brightness
//! ```
//!
//! # Environment variable overrides
//!
//! Every option can also come from the environment; CLI args take precedence
//! when both are present.
//!
//! | Variable                   | Description                     |
//! |----------------------------|---------------------------------|
//! | `KEYBRIDGE_DEFAULT_MAPPING`| Layout active at startup        |
//! | `KEYBRIDGE_AVAILABLE`      | Comma-separated layout rotation |
//! | `KEYBRIDGE_SWAP_KEY`       | Swap key scan code              |
//! | `KEYBRIDGE_MAPPING_DIR`    | Layout resource directory       |
//! | `KEYBRIDGE_BRIGHTNESS`     | Indicator brightness (0-10)     |
//!
//! The daemon needs read access to the keyboard's USB device node and write
//! access to `/dev/uinput`; both are usually granted via udev rules rather
//! than running as root.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use keybridge::infrastructure::storage::config::{load_config, BridgeConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// USB HID key-remapping bridge.
///
/// Reads boot-protocol reports from a physical keyboard and re-emits them,
/// remapped through the active layout, on a virtual keyboard.
#[derive(Debug, Parser)]
#[command(name = "keybridge", about = "USB keyboard remapping bridge", version)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "KEYBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Layout active at startup.  Must appear in the rotation.
    #[arg(long, env = "KEYBRIDGE_DEFAULT_MAPPING")]
    default_mapping: Option<String>,

    /// Comma-separated layout rotation for the swap key.
    #[arg(long, env = "KEYBRIDGE_AVAILABLE", value_delimiter = ',')]
    available: Option<Vec<String>>,

    /// Scan code of the reserved layout-swap key, e.g. `0x30`.
    #[arg(long, env = "KEYBRIDGE_SWAP_KEY")]
    layout_swap_key: Option<String>,

    /// Directory holding `<name>.json` layout resources.
    #[arg(long, env = "KEYBRIDGE_MAPPING_DIR")]
    mapping_dir: Option<PathBuf>,

    /// Indicator brightness, 0 (off) to 10 (full).
    #[arg(long, env = "KEYBRIDGE_BRIGHTNESS")]
    brightness: Option<u8>,
}

impl Cli {
    /// Applies CLI/environment overrides on top of the file config.
    fn apply_to(&self, config: &mut BridgeConfig) {
        if let Some(mapping) = &self.default_mapping {
            config.default_mapping = mapping.clone();
        }
        if let Some(available) = &self.available {
            config.available = available.clone();
        }
        if let Some(swap_key) = &self.layout_swap_key {
            config.layout_swap_key = swap_key.clone();
        }
        if let Some(dir) = &self.mapping_dir {
            config.mapping_directory = dir.clone();
        }
        if let Some(brightness) = self.brightness {
            config.brightness = brightness;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    cli.apply_to(&mut config);

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("keybridge starting");
    run(config)
}

#[cfg(target_os = "linux")]
fn run(config: BridgeConfig) -> anyhow::Result<()> {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use std::time::Duration;

    use tracing::warn;

    use keybridge::application::{ConnectionSupervisor, LayoutManager, RemapEngine};
    use keybridge::infrastructure::indicator::TracingIndicator;
    use keybridge::infrastructure::output::uinput::UinputSink;
    use keybridge::infrastructure::storage::layout_store::JsonLayoutStore;
    use keybridge::infrastructure::transport::usb::UsbTransport;

    // How long to wait between discovery attempts while no keyboard is present.
    const REDISCOVERY_DELAY: Duration = Duration::from_millis(500);

    let swap_code = config.swap_code()?;

    let layouts = LayoutManager::new(
        &config.default_mapping,
        config.available.clone(),
        swap_code,
        config.brightness_level(),
        Box::new(JsonLayoutStore::new(&config.mapping_directory)),
        Arc::new(TracingIndicator),
    )
    .context("initialising layouts")?;

    let sink = UinputSink::new().context("creating virtual keyboard")?;
    let mut engine = RemapEngine::new(layouts, Arc::new(sink));

    let transport = UsbTransport::new().context("opening USB context")?;
    let mut supervisor = ConnectionSupervisor::new(Box::new(transport), config.read_timeout());

    // Shutdown flag flipped by Ctrl-C / SIGTERM.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::Relaxed);
    })
    .context("installing signal handler")?;

    info!(layout = engine.active_layout(), "keybridge ready.  Press Ctrl-C to exit.");

    let mut was_attached = false;
    while running.load(Ordering::Relaxed) {
        let report = supervisor.poll();
        let attached = supervisor.is_attached();

        // The keyboard vanished: it can no longer send release edges, so
        // release everything the virtual keyboard still holds.
        if was_attached && !attached {
            warn!("keyboard detached, releasing held keys");
            if let Err(e) = engine.release_all() {
                warn!(error = %e, "failed to release held keys");
            }
        }
        was_attached = attached;

        match report {
            Some(report) => {
                if let Err(e) = engine.process_frame(&report) {
                    warn!(error = %e, "frame processing failed, retrying next poll");
                }
            }
            None if !attached => std::thread::sleep(REDISCOVERY_DELAY),
            // Attached but idle: the poll timeout already paced the loop.
            None => {}
        }
    }

    info!("shutdown signal received, releasing held keys");
    if let Err(e) = engine.release_all() {
        warn!(error = %e, "failed to release held keys on shutdown");
    }
    info!("keybridge stopped");
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run(_config: BridgeConfig) -> anyhow::Result<()> {
    anyhow::bail!("virtual keyboard output requires Linux uinput")
}
