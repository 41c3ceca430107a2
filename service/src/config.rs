use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::time::Duration;

/// Number of pacing cycles a stream may go without a write before a probe is sent.
pub const DEFAULT_PROBE_INTERVAL: u32 = 10;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Pacing cycles allowed without a frame before a liveness probe is written.
    /// Zero probes on every cycle.
    #[arg(long, env, default_value_t = DEFAULT_PROBE_INTERVAL)]
    pub probe_interval: u32,

    /// Seconds a stream sleeps between production cycles (fractions allowed)
    #[arg(
        long = "pace-sleep-secs",
        env = "PACE_SLEEP_SECS",
        default_value = "1",
        value_parser = parse_seconds
    )]
    pace_sleep: Duration,

    /// Seconds a stream may run past its last pacing cycle before it is cut off.
    /// Must be larger than the pace sleep.
    #[arg(
        long = "stream-time-limit-secs",
        env = "STREAM_TIME_LIMIT_SECS",
        default_value = "30",
        value_parser = parse_seconds
    )]
    stream_time_limit: Duration,

    /// Number of flushed frames that may wait for a slow client before writes block
    #[arg(long, env, default_value_t = 16)]
    pub stream_buffer_capacity: usize,

    /// Stop each demo stream after this many tick events. Unlimited when unset.
    #[arg(long, env)]
    pub max_ticks: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn interface(&self) -> &str {
        self.interface
            .as_deref()
            .expect("No interface provided")
    }

    pub fn pace_sleep(&self) -> Duration {
        self.pace_sleep
    }

    pub fn stream_time_limit(&self) -> Duration {
        self.stream_time_limit
    }

    /// A time limit that doesn't outlast the sleep lets the watchdog fire mid-sleep.
    pub fn time_limit_exceeds_sleep(&self) -> bool {
        self.stream_time_limit() > self.pace_sleep()
    }
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number of seconds"))?;

    Duration::try_from_secs_f64(seconds)
        .map_err(|e| format!("`{value}` is not a usable number of seconds: {e}"))
}
