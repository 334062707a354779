// src/log.rs
//
// Thin logging surface over `tracing`. Library code only emits events;
// the binary decides where they go via `init`.

/// Install the stderr subscriber. `RUST_LOG` wins when set;
/// otherwise `info`, or `debug` with `verbose`.
#[cfg(feature = "cli")]
pub fn init(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "paper_pack=debug" } else { "paper_pack=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Warning-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
