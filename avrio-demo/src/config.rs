//! Demo configuration
//!
//! Read from a TOML file, or from the `demo.toml` compiled into the binary
//! when no file is given. Validated before anything is built from it.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use avrio_core::config::{SchedulerConfig, TickSource};
use avrio_core::sources::InterruptTrigger;

use crate::error::DemoError;
use crate::MAX_JOBS;

/// Embedded default configuration
pub const DEFAULT_CONFIG: &str = include_str!("../demo.toml");

/// Simulated run time when the config does not say
pub const DEFAULT_DURATION_MS: u32 = 5000;

/// Whole demo configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    /// Simulated milliseconds to run
    #[serde(default = "default_duration")]
    pub duration_ms: u32,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
    #[serde(default)]
    pub buttons: ButtonConfig,
    #[serde(default)]
    pub external: ExternalConfig,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MS
}

/// One LED-toggling job
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub name: String,
    /// Scheduler time of the first run
    #[serde(default)]
    pub start_ms: u32,
    /// 0 = run once
    pub period_ms: u32,
}

/// Buttons on port D, seen through pin-change interrupts
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ButtonConfig {
    /// Pins with pin-change interrupts enabled (PCMSK2)
    #[serde(default)]
    pub pins: u8,
    /// Scripted button presses
    #[serde(default)]
    pub presses: Vec<PressConfig>,
}

/// A press: the pin is pulled low at `at_ms` for `hold_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PressConfig {
    pub pin: u8,
    pub at_ms: u32,
    #[serde(default = "default_hold")]
    pub hold_ms: u32,
}

fn default_hold() -> u32 {
    50
}

/// External interrupt INT0 on PD2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalConfig {
    /// EIMSK.INT0
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub trigger: InterruptTrigger,
}

impl DemoConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self, DemoError> {
        let config: DemoConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or the embedded default when `None`
    pub fn load(path: Option<&Path>) -> Result<Self, DemoError> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| DemoError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text)
            }
            None => Self::from_toml(DEFAULT_CONFIG),
        }
    }

    pub fn validate(&self) -> Result<(), DemoError> {
        self.scheduler.validate()?;
        if let TickSource::Timer { period_ms } = self.scheduler.tick {
            if period_ms > u32::from(u16::MAX) {
                return Err(DemoError::Invalid(format!(
                    "timer period {period_ms} ms does not fit the tick divider"
                )));
            }
        }
        if self.duration_ms == 0 {
            return Err(DemoError::Invalid("duration_ms must not be 0".into()));
        }
        if self.jobs.len() > MAX_JOBS {
            return Err(DemoError::Invalid(format!(
                "{} jobs configured, at most {MAX_JOBS} supported",
                self.jobs.len()
            )));
        }
        for (i, job) in self.jobs.iter().enumerate() {
            if self.jobs[..i].iter().any(|other| other.name == job.name) {
                return Err(DemoError::Invalid(format!("duplicate job name '{}'", job.name)));
            }
        }
        for press in &self.buttons.presses {
            if press.pin > 7 {
                return Err(DemoError::Invalid(format!(
                    "button pin {} is not on an 8-bit port",
                    press.pin
                )));
            }
        }
        Ok(())
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            scheduler: SchedulerConfig::default(),
            jobs: Vec::new(),
            buttons: ButtonConfig::default(),
            external: ExternalConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avrio_core::sources::WatchdogTimeout;

    #[test]
    fn test_embedded_default_parses() {
        let config = DemoConfig::load(None).unwrap();
        assert_eq!(config.duration_ms, 5000);
        assert_eq!(
            config.scheduler.tick,
            TickSource::Watchdog(WatchdogTimeout::To64ms)
        );
        assert_eq!(config.jobs.len(), 3);
        assert_eq!(config.jobs[2].period_ms, 0);
        assert_eq!(config.buttons.pins, 0b111);
        assert_eq!(config.external.trigger, InterruptTrigger::FallingEdge);
    }

    #[test]
    fn test_rtt_and_timer_sources() {
        let config = DemoConfig::from_toml(
            r#"
            [scheduler.tick.rtt]
            period_ms = 256
            "#,
        )
        .unwrap();
        assert_eq!(config.scheduler.tick, TickSource::Rtt { period_ms: 256 });
        assert_eq!(config.duration_ms, DEFAULT_DURATION_MS);

        let config = DemoConfig::from_toml(
            r#"
            duration_ms = 1500
            [scheduler.tick.timer]
            period_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.scheduler.tick.tick_ms(), 250);
    }

    #[test]
    fn test_invalid_rtt_period() {
        let result = DemoConfig::from_toml(
            r#"
            [scheduler.tick.rtt]
            period_ms = 1000
            "#,
        );
        assert!(matches!(result, Err(DemoError::Tick(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = DemoConfig::from_toml("speed = 3");
        assert!(matches!(result, Err(DemoError::Toml(_))));
    }

    #[test]
    fn test_duplicate_job_names() {
        let result = DemoConfig::from_toml(
            r#"
            [[jobs]]
            name = "led"
            period_ms = 100
            [[jobs]]
            name = "led"
            period_ms = 200
            "#,
        );
        assert!(matches!(result, Err(DemoError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = DemoConfig::load(Some(Path::new("/nonexistent/avrio.toml")));
        assert!(matches!(result, Err(DemoError::Io { .. })));
    }
}
