use std::sync::Once;

/// Filter used when neither `LoggingConfig::env_filter` nor `RUST_LOG` is set.
///
/// wgpu logs adapter probing and shader translation at info; keep it at warn.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "debug",
/// "penumbra_engine=debug,wgpu_core=warn") and takes precedence over `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Resolves the filter string: explicit config, then `RUST_LOG`, then [`DEFAULT_FILTER`].
    pub fn resolved_filter(&self, rust_log: Option<String>) -> String {
        self.env_filter
            .clone()
            .or(rust_log)
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// Call early in `main`, before the runtime creates windows.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolved_filter(std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        // Tests or a host application may have installed a logger already.
        if builder.try_init().is_err() {
            log::warn!("logger already installed; penumbra logging config ignored");
            return;
        }

        log::debug!("logging initialized with filter `{filter}`");
    });
}
