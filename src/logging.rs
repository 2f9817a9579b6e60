use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `log` records from the core crate are
/// forwarded into it.
///
/// `level` wins over `RUST_LOG`; an invalid filter falls back to `info`.
pub fn init_logger(level: Option<&str>) {
    let default_level = LevelFilter::INFO;
    let directive = level.map(str::to_string).unwrap_or_else(|| {
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string())
    });
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("invalid log filter {directive:?}, falling back to '{default_level}' - {err}");
        EnvFilter::new(default_level.to_string())
    });

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("logger already initialized: {err}");
    }
}
