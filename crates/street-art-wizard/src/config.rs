/*
[INPUT]:  Optional YAML configuration file and STREET_ART__* environment variables
[OUTPUT]: Parsed wizard configuration and derived runtime settings
[POS]:    Configuration layer - backend credentials, buckets, timings
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use street_art_adapter::ClientConfig;

use crate::session::SessionOptions;
use crate::submission::SubmissionTargets;
use crate::wizard::WizardTiming;

pub const ENV_PREFIX: &str = "STREET_ART";

/// Top-level configuration for the submission wizard
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Supabase project connection
    pub supabase: SupabaseConfig,
    /// Storage buckets for the two image fields
    pub storage: StorageConfig,
    /// Table receiving submissions
    pub table: String,
    pub timing: TimingConfig,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            supabase: SupabaseConfig::default(),
            storage: StorageConfig::default(),
            table: "street_art_submission".to_string(),
            timing: TimingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project URL, e.g. https://xyz.supabase.co
    pub url: String,
    /// Public anon key sent as `apikey` and bearer token
    pub anon_key: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub artist_bucket: String,
    pub artwork_bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            artist_bucket: "artist-photos".to_string(),
            artwork_bucket: "artwork-images".to_string(),
        }
    }
}

/// Delays in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    pub transition_delay_ms: u64,
    pub reset_delay_ms: u64,
    pub identity_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: 500,
            reset_delay_ms: 2000,
            identity_debounce_ms: 300,
        }
    }
}

impl WizardConfig {
    /// Load from an optional YAML file layered with process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), reading variables from `env` instead of
    /// the process environment when given
    pub fn load_with_env(path: Option<&Path>, env: Option<config::Map<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings = builder.build().context("read configuration sources")?;
        settings
            .try_deserialize()
            .context("parse wizard configuration")
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("parse wizard configuration yaml")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to serialize config to YAML")
    }

    /// Check required values. Backend credentials are only needed when the
    /// wizard talks to Supabase.
    pub fn validate(&self, offline: bool) -> Result<()> {
        if !offline {
            ensure!(!self.supabase.url.trim().is_empty(), "supabase.url is required");
            ensure!(!self.supabase.anon_key.trim().is_empty(), "supabase.anon_key is required");
        }
        ensure!(!self.table.trim().is_empty(), "table must not be empty");
        ensure!(
            !self.storage.artist_bucket.trim().is_empty() && !self.storage.artwork_bucket.trim().is_empty(),
            "storage buckets must not be empty"
        );
        ensure!(self.supabase.timeout_secs > 0, "supabase.timeout_secs must be positive");
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.supabase.timeout_secs),
            connect_timeout: Duration::from_secs(self.supabase.connect_timeout_secs),
        }
    }

    pub fn timing(&self) -> WizardTiming {
        WizardTiming {
            transition_delay: Duration::from_millis(self.timing.transition_delay_ms),
            reset_delay: Duration::from_millis(self.timing.reset_delay_ms),
        }
    }

    pub fn submission_targets(&self) -> SubmissionTargets {
        SubmissionTargets {
            table: self.table.clone(),
            artist_bucket: self.storage.artist_bucket.clone(),
            artwork_bucket: self.storage.artwork_bucket.clone(),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            timing: self.timing(),
            targets: self.submission_targets(),
            identity_debounce: Duration::from_millis(self.timing.identity_debounce_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = WizardConfig::load_with_env(None, Some(env(&[]))).expect("load");
        assert_eq!(config, WizardConfig::default());
        assert_eq!(config.table, "street_art_submission");
        assert_eq!(config.timing().transition_delay, Duration::from_millis(500));
        assert!(config.validate(true).is_ok());
        assert!(config.validate(false).is_err());
    }

    #[test]
    fn test_file_with_env_override() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("tempfile");
        writeln!(
            file,
            "supabase:\n  url: https://demo.supabase.co\n  anon_key: file-key\nstorage:\n  artwork_bucket: murals\n"
        )
        .expect("write config");

        let config = WizardConfig::load_with_env(
            Some(file.path()),
            Some(env(&[
                ("STREET_ART__SUPABASE__ANON_KEY", "env-key"),
                ("STREET_ART__TIMING__RESET_DELAY_MS", "50"),
            ])),
        )
        .expect("load");

        assert_eq!(config.supabase.url, "https://demo.supabase.co");
        assert_eq!(config.supabase.anon_key, "env-key");
        assert_eq!(config.storage.artwork_bucket, "murals");
        assert_eq!(config.storage.artist_bucket, "artist-photos");
        assert_eq!(config.timing.reset_delay_ms, 50);
        assert!(config.validate(false).is_ok());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.yaml");
        assert!(WizardConfig::load_with_env(Some(&missing), Some(env(&[]))).is_err());
    }

    #[test]
    fn test_yaml_round_trip_and_partial_document() {
        let config = WizardConfig::from_yaml_str("table: submissions\n").expect("parse");
        assert_eq!(config.table, "submissions");
        assert_eq!(config.timing.identity_debounce_ms, 300);

        let yaml = config.to_yaml().expect("serialize");
        assert_eq!(WizardConfig::from_yaml_str(&yaml).expect("reparse"), config);
    }

    #[test]
    fn test_session_options_follow_config() {
        let mut config = WizardConfig::default();
        config.storage.artist_bucket = "faces".to_string();
        config.timing.identity_debounce_ms = 10;

        let options = config.session_options();
        assert_eq!(options.targets.artist_bucket, "faces");
        assert_eq!(options.identity_debounce, Duration::from_millis(10));
        assert_eq!(config.client_config().timeout, Duration::from_secs(30));
    }
}
