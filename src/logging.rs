//! Logger setup: elapsed-millis timestamp plus thread name on every line.

use std::io::Write;
use std::time::Instant;

/// Initialize `env_logger` with the trace-line shape used across the crate.
///
/// Defaults to `info` when `RUST_LOG` is unset. Safe to call more than once;
/// later calls are no-ops.
pub fn init() {
    let start = Instant::now();
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env)
        .format(move |buf, record| {
            let ts = start.elapsed().as_millis();
            let current = std::thread::current();
            let thread_name = current.name().unwrap_or("unnamed");
            writeln!(buf, "[{ts}ms][{thread_name}] {}", record.args())
        })
        .try_init();
}
