//! Executor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::{ConfigError, RetryPolicy};

const DEFAULT_INTERVAL_MS: u64 = 100;
const DEFAULT_MAX_JOB_RESCHEDULE: u32 = 5;
const DEFAULT_MAX_NOTIFICATION_RESCHEDULE: u32 = 3;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

const fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

const fn default_max_job_reschedule() -> u32 {
    DEFAULT_MAX_JOB_RESCHEDULE
}

const fn default_max_notification_reschedule() -> u32 {
    DEFAULT_MAX_NOTIFICATION_RESCHEDULE
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings for notifying the scaling engine and re-arming failed firings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Base URL of the scaling engine.
    #[serde(alias = "scalingEngineUrl")]
    pub scaling_engine_url: String,
    /// Delay before a rescheduled firing, in milliseconds.
    #[serde(default = "default_interval_ms", alias = "jobRescheduleIntervalMilliSecond")]
    pub job_reschedule_interval_ms: u64,
    /// Cap for the active-schedule counter.
    #[serde(default = "default_max_job_reschedule", alias = "maxJobRescheduleCount")]
    pub max_job_reschedule_count: u32,
    /// Cap for the scaling-engine notification counter.
    #[serde(
        default = "default_max_notification_reschedule",
        alias = "maxScalingEngineNotificationRescheduleCount"
    )]
    pub max_scaling_engine_notification_reschedule_count: u32,
    /// Transport timeout for one notification call, in seconds.
    #[serde(default = "default_timeout_secs", alias = "notificationTimeoutSecs")]
    pub notification_timeout_secs: u64,
}

impl ExecutorConfig {
    /// Config with defaults for everything but the scaling engine URL.
    pub fn new(scaling_engine_url: impl Into<String>) -> Self {
        Self {
            scaling_engine_url: scaling_engine_url.into(),
            job_reschedule_interval_ms: DEFAULT_INTERVAL_MS,
            max_job_reschedule_count: DEFAULT_MAX_JOB_RESCHEDULE,
            max_scaling_engine_notification_reschedule_count: DEFAULT_MAX_NOTIFICATION_RESCHEDULE,
            notification_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scaling_engine_url.trim().is_empty() {
            return Err(ConfigError::Missing("scaling_engine_url".into()));
        }
        let url = Url::parse(&self.scaling_engine_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "scaling_engine_url `{}`: {e}",
                self.scaling_engine_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "scaling_engine_url must be http or https, got `{}`",
                url.scheme()
            )));
        }
        if self.job_reschedule_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "job_reschedule_interval_ms must be greater than 0".into(),
            ));
        }
        if self.notification_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "notification_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read configuration from the process environment, loading `.env` first
    /// when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::Parse(format!(".env: {e}")));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, keyed by environment variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("SCALING_ENGINE_URL")
            .ok_or_else(|| ConfigError::Missing("SCALING_ENGINE_URL".into()))?;
        let cfg = Self {
            scaling_engine_url: url,
            job_reschedule_interval_ms: parse_var(
                &lookup,
                "JOB_RESCHEDULE_INTERVAL_MS",
                DEFAULT_INTERVAL_MS,
            )?,
            max_job_reschedule_count: parse_var(
                &lookup,
                "MAX_JOB_RESCHEDULE_COUNT",
                DEFAULT_MAX_JOB_RESCHEDULE,
            )?,
            max_scaling_engine_notification_reschedule_count: parse_var(
                &lookup,
                "MAX_SCALING_ENGINE_NOTIFICATION_RESCHEDULE_COUNT",
                DEFAULT_MAX_NOTIFICATION_RESCHEDULE,
            )?,
            notification_timeout_secs: parse_var(
                &lookup,
                "NOTIFICATION_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Retry policy described by this configuration.
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_millis(self.job_reschedule_interval_ms),
            self.max_job_reschedule_count,
            self.max_scaling_engine_notification_reschedule_count,
        )
    }

    /// Transport timeout for one notification call.
    pub const fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("{key}=`{raw}`: {e}"))),
    }
}
