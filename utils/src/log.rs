use log::LevelFilter;

/// Installs the stderr logger. `RUST_LOG` overrides the default `info` level,
/// `verbose` bumps this workspace's crates to `debug`.
pub fn init(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if verbose {
        for module in ["epochval_aggregator", "epochval_utils", "epochval"] {
            builder.filter_module(module, LevelFilter::Debug);
        }
    }

    // alloy and hyper are chatty at debug
    if std::env::var("RUST_LOG").is_err() {
        builder.filter_module("hyper_util", LevelFilter::Warn);
        builder.filter_module("alloy_transport_http", LevelFilter::Warn);
    }

    // a second init (tests, embedding) is not an error worth surfacing
    let _ = builder
        .target(env_logger::Target::Stderr)
        .format_timestamp_millis()
        .try_init();
}
