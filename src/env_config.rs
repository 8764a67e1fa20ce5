//! Shared environment configuration for the advisor binaries.
//!
//! Reads `YATZY_BASE_PATH`, `RAYON_NUM_THREADS` (or `OMP_NUM_THREADS`),
//! `YATZY_STATE_MAP` and `RUST_LOG`.

use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Default state map location, relative to the base path.
pub const DEFAULT_STATE_MAP: &str = "data/statemap.json";

const DEFAULT_THREADS: usize = 8;

/// Install the fmt subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Read `YATZY_BASE_PATH` (default `"."`) and chdir into it. Exits on failure.
pub fn init_base_path() -> PathBuf {
    let base_path = std::env::var("YATZY_BASE_PATH").unwrap_or_else(|_| ".".to_string());
    let path = PathBuf::from(&base_path);
    if let Err(e) = std::env::set_current_dir(&path) {
        eprintln!("Failed to change directory to {}: {}", base_path, e);
        std::process::exit(1);
    }
    if let Ok(cwd) = std::env::current_dir() {
        info!(base_path = %base_path, cwd = %cwd.display(), "working directory");
    }
    path
}

/// Thread count from `RAYON_NUM_THREADS`, then `OMP_NUM_THREADS`, default 8.
pub fn rayon_threads() -> usize {
    std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_THREADS)
}

/// Build the rayon global pool with [`rayon_threads`] threads. Tolerates an
/// already-initialized pool. Returns the thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = rayon_threads();
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        warn!(error = %e, "rayon global pool already initialized");
        return rayon::current_num_threads();
    }
    info!(threads = num_threads, "rayon pool ready");
    num_threads
}

/// `YATZY_STATE_MAP`, or [`DEFAULT_STATE_MAP`].
pub fn state_map_path() -> PathBuf {
    std::env::var("YATZY_STATE_MAP")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_MAP))
}
