/// Diagnostic logging via `tracing`, written to stderr.
///
/// `RUST_LOG` wins; otherwise `--verbose` means `info`, else the config's
/// `log_level`, else `warn`.
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "warn";

pub fn resolve_level(verbose: bool, configured: Option<&str>) -> String {
    if verbose {
        return "info".to_string();
    }
    configured.unwrap_or(DEFAULT_LEVEL).to_string()
}

pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_level() {
        assert_eq!(resolve_level(true, Some("error")), "info");
        assert_eq!(resolve_level(false, Some("debug")), "debug");
        assert_eq!(resolve_level(false, None), DEFAULT_LEVEL);
    }
}
