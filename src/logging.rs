/*!

Console logging through `log4rs`.

The crate logs through the `log` facade, whose macros are re-exported from the crate root.
Nothing is printed until `enable_logging()` or `set_log_level()` installs the console logger.
Afterwards the level and per-module filters can be changed at any time; each change rebuilds
the `log4rs` configuration and swaps it in through the retained handle.

```rust,no_run
use handshake_sir::logging::{set_log_level, set_module_filter, LevelFilter};

set_log_level(LevelFilter::Info).unwrap();
set_module_filter("handshake_sir::simulation", LevelFilter::Trace).unwrap();
```

*/

use crate::error::HandshakeError;
use log4rs::{
    Handle,
    append::console::ConsoleAppender,
    config::{Appender, Config, Logger, Root},
    encode::pattern::PatternEncoder,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

pub use log::LevelFilter;

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;
const DEFAULT_LOG_PATTERN: &str = "{h({l:<5})} {t} - {m}{n}";
const STDOUT_APPENDER: &str = "stdout";

struct LogConfiguration {
    level: LevelFilter,
    module_filters: BTreeMap<String, LevelFilter>,
    handle: Option<Handle>,
}

static LOG_CONFIGURATION: Mutex<LogConfiguration> = Mutex::new(LogConfiguration {
    level: LevelFilter::Off,
    module_filters: BTreeMap::new(),
    handle: None,
});

impl LogConfiguration {
    fn build(&self) -> Result<Config, HandshakeError> {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN)))
            .build();

        let mut builder =
            Config::builder().appender(Appender::builder().build(STDOUT_APPENDER, Box::new(stdout)));
        for (module, level) in &self.module_filters {
            builder = builder.logger(Logger::builder().build(module.as_str(), *level));
        }

        builder
            .build(Root::builder().appender(STDOUT_APPENDER).build(self.level))
            .map_err(|errors| HandshakeError::LoggerError(errors.to_string()))
    }

    /// Installs the logger on first use, otherwise swaps in the new configuration.
    fn apply(&mut self) -> Result<(), HandshakeError> {
        let config = self.build()?;
        if let Some(handle) = &self.handle {
            handle.set_config(config);
        } else {
            self.handle = Some(log4rs::init_config(config)?);
        }
        Ok(())
    }
}

fn with_configuration<T>(f: impl FnOnce(&mut LogConfiguration) -> T) -> T {
    let mut configuration = LOG_CONFIGURATION
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut configuration)
}

/// Turns on console logging at the default level (`Info`) unless a level was already chosen.
pub fn enable_logging() -> Result<(), HandshakeError> {
    with_configuration(|configuration| {
        if configuration.level == LevelFilter::Off {
            configuration.level = DEFAULT_LOG_LEVEL;
        }
        configuration.apply()
    })
}

pub fn disable_logging() -> Result<(), HandshakeError> {
    set_log_level(LevelFilter::Off)
}

pub fn set_log_level(level: LevelFilter) -> Result<(), HandshakeError> {
    with_configuration(|configuration| {
        configuration.level = level;
        configuration.apply()
    })
}

/// Sets the level for one module path, independent of the global level.
pub fn set_module_filter(module_path: &str, level: LevelFilter) -> Result<(), HandshakeError> {
    with_configuration(|configuration| {
        configuration
            .module_filters
            .insert(module_path.to_string(), level);
        configuration.apply()
    })
}

pub fn remove_module_filter(module_path: &str) -> Result<(), HandshakeError> {
    with_configuration(|configuration| {
        configuration.module_filters.remove(module_path);
        configuration.apply()
    })
}

#[must_use]
pub fn get_log_level() -> LevelFilter {
    with_configuration(|configuration| configuration.level)
}
