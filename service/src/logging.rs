use crate::config::Config;
use log::LevelFilter;
use simplelog::{self, ConfigBuilder};

/// HTTP stack modules hidden below Trace level.
/// hyper and tower log every body chunk of a long-lived stream, which buries session logs.
const FILTERED_MODULES: &[&str] = &["tower", "tracing", "hyper", "axum", "mio"];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at the configured level.
    ///
    /// At Trace level the HTTP stack is shown alongside the per-frame session logs.
    /// At every other level it is filtered out.
    pub fn init_logger(config: &Config) {
        let log_config = Self::build_log_config(config.log_level_filter);

        simplelog::TermLogger::init(
            config.log_level_filter,
            log_config,
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
        .expect("Failed to start simplelog");
    }

    fn hides_http_stack(level: LevelFilter) -> bool {
        level < LevelFilter::Trace
    }

    fn build_log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder
            .set_time_format_rfc3339()
            .set_target_level(LevelFilter::Error)
            .set_thread_level(LevelFilter::Off);

        if Self::hides_http_stack(level) {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}
