//! Demo error type

use std::path::PathBuf;

use thiserror::Error;

use avrio_core::config::ConfigError;
use avrio_core::event::DispatchError;
use avrio_core::isr::BindError;
use avrio_core::scheduler::ScheduleError;

/// Everything that can stop the demo
#[derive(Debug, Error)]
pub enum DemoError {
    /// The config file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`DemoConfig`](crate::config::DemoConfig)
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// The scheduler tick source is unusable
    #[error("invalid scheduler tick: {0:?}")]
    Tick(ConfigError),

    /// Any other inconsistent setting
    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("interrupt binding failed: {0:?}")]
    Bind(BindError),

    #[error("cannot schedule job: {0:?}")]
    Schedule(ScheduleError),

    #[error("cannot register event handler: {0:?}")]
    Dispatch(DispatchError),
}

// The core error enums are no_std and do not implement `Error`, so no
// `#[from]` for them.

impl From<ConfigError> for DemoError {
    fn from(e: ConfigError) -> Self {
        DemoError::Tick(e)
    }
}

impl From<BindError> for DemoError {
    fn from(e: BindError) -> Self {
        DemoError::Bind(e)
    }
}

impl From<ScheduleError> for DemoError {
    fn from(e: ScheduleError) -> Self {
        DemoError::Schedule(e)
    }
}

impl From<DispatchError> for DemoError {
    fn from(e: DispatchError) -> Self {
        DemoError::Dispatch(e)
    }
}
