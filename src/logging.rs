use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, LevelFilter};

use crate::util::strip_file_url;

const LOG_FILE: &str = "simswitcher.log";

static STARTED: AtomicBool = AtomicBool::new(false);

/// The previous log file is removed on the first call only.
pub fn init(log_dir: &str, debug: bool) -> Result<(), fern::InitError> {
    let log_path = Path::new(strip_file_url(log_dir)).join(LOG_FILE);

    if !STARTED.swap(true, Ordering::Relaxed) {
        let _ = std::fs::remove_file(&log_path);
    }

    let crate_level = if debug {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };

    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Info)
        .level_for(env!("CARGO_PKG_NAME"), crate_level)
        .chain(std::io::stdout())
        .chain(fern::log_file(&log_path)?)
        .apply();

    // the logger failing to apply only means one is already installed
    if result.is_ok() {
        info!("Logger initialized at {}", log_path.display());
    }
    Ok(())
}
