//! Tracing subscriber installation.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// Always attaches a console layer. When `log_dir` is given, the directory is
/// created and a second plain-text layer writes the full run log to
/// `axp-<pid>.log` inside it, one file per process so concurrent runs never
/// interleave.
///
/// The level defaults to `info` and is overridable through `RUST_LOG`.
pub fn init(log_dir: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().with_target(false);
    let registry = tracing_subscriber::registry().with(filter).with(console);

    match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(format!("axp-{}.log", std::process::id()));
            let file = File::create(path)?;
            let file_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(file));
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }

    Ok(())
}
