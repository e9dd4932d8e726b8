use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use value_class_rules::config::LoggingConfig;

/// Installed subscriber. The filter can be replaced once the configuration
/// file has been read, unless `RUST_LOG` or `--log-level` already chose it.
pub struct Logging {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
    pinned: bool,
}

/// Installs the stderr subscriber before anything else runs.
///
/// Precedence: `RUST_LOG`, then `cli_level`, then the configured level
/// applied later through [`Logging::apply_configured_level`].
pub fn init(cli_level: Option<&str>) -> Logging {
    let from_env = EnvFilter::try_from_default_env().ok();
    let pinned = from_env.is_some() || cli_level.is_some();
    let filter = from_env.unwrap_or_else(|| {
        EnvFilter::new(cli_level.unwrap_or(&LoggingConfig::default().level))
    });

    let (filter, handle) = reload::Layer::new(filter);
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();

    match installed {
        Ok(()) => Logging {
            handle: Some(handle),
            pinned,
        },
        Err(err) => {
            eprintln!("Warning: logging is already initialized: {err}");
            Logging {
                handle: None,
                pinned,
            }
        }
    }
}

impl Logging {
    /// Switches to the level from the configuration file when nothing on the
    /// command line or in the environment overrides it.
    pub fn apply_configured_level(&self, level: &str) {
        let Some(handle) = &self.handle else {
            return;
        };
        if self.pinned {
            return;
        }
        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(err) = handle.reload(filter) {
                    tracing::warn!(error = %err, "failed to apply configured log level");
                }
            }
            Err(err) => tracing::warn!(level, error = %err, "invalid configured log level"),
        }
    }
}
