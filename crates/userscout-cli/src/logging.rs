use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "warn,userscout=info";
const VERBOSE_FILTER: &str = "info,userscout=debug";

/// Initialize tracing to stderr so stdout stays parseable.
///
/// `RUST_LOG` wins over the built-in defaults.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .with(filter)
        .init();
}
