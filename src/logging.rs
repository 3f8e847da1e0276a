//! Tracing subscriber setup for dashboard hosts

use tracing_subscriber::EnvFilter;

/// Install a formatted tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (for example
/// `"paddock=debug"`) is used. Returns `false` if a global subscriber was
/// already installed, which makes repeated calls harmless.
pub fn init(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let _ = init("paddock=debug");
        assert!(!init("paddock=trace"));
    }
}
