use once_cell::sync::OnceCell;

use crate::config::DEFAULT_LOG_FILTER;

static ACTIVE_FILTER: OnceCell<String> = OnceCell::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() -> bool {
    init_tracing_with(DEFAULT_LOG_FILTER)
}

/// Initializes the global tracing subscriber. `RUST_LOG` wins over `directives`;
/// an unparsable value falls back to the default filter.
///
/// Returns `true` only for the call that installed the subscriber. Later calls
/// keep the filter already in place.
pub fn init_tracing_with(directives: &str) -> bool {
    let mut installed = false;
    let active = ACTIVE_FILTER.get_or_init(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directives))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        let active = filter.to_string();

        // Another subscriber may already be installed by the host application.
        let _ = fmt().with_env_filter(filter).try_init();
        installed = true;
        active
    });
    if !installed && active != directives {
        tracing::warn!(%active, requested = directives, "tracing already initialized, log filter unchanged");
    }
    installed
}

/// Filter of the installed subscriber, once tracing is initialized.
pub fn active_filter() -> Option<&'static str> {
    ACTIVE_FILTER.get().map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_initialization_installs() {
        init_tracing_with("zbb_core=debug");
        assert!(!init_tracing_with("zbb_core=trace"));
        assert!(!init_tracing());
        assert!(active_filter().is_some());
    }
}
