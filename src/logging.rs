//! Tracing subscriber setup for hosts that do not install their own

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG` when set, otherwise `level` for this crate with
/// dependency noise turned down.
pub fn build_filter(level: &str) -> EnvFilter {
  if let Ok(directives) = std::env::var("RUST_LOG") {
    return EnvFilter::new(directives);
  }

  let mut filter = EnvFilter::new(level);
  for directive in ["sqlx=warn", "reqwest=warn", "hyper=warn"] {
    if let Ok(parsed) = directive.parse() {
      filter = filter.add_directive(parsed);
    }
  }
  filter
}

/// Install a global fmt subscriber. Returns false if one is already installed.
pub fn init_logging(level: &str) -> bool {
  tracing_subscriber::fmt()
    .with_env_filter(build_filter(level))
    .with_target(true)
    .try_init()
    .is_ok()
}
