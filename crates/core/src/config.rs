//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services. Nothing in
//! this crate reads environment variables during request handling; binaries read the raw values
//! and hand them to the `*_from_env_value` parsers below.

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_EXPORT_DIR, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SESSION_TTL_SECS,
};
use crate::{LetterError, LetterResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Whether the wizard may be left with required fields missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WizardPolicy {
    /// Required markers are advisory; Next and export always proceed.
    #[default]
    Permissive,
    /// Leaving the final step and exporting are refused while required fields are missing.
    RequireComplete,
}

impl FromStr for WizardPolicy {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "require-complete" | "require_complete" | "strict" => Ok(Self::RequireComplete),
            other => Err(LetterError::InvalidInput(format!(
                "unknown wizard policy '{other}' (expected 'permissive' or 'require-complete')"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    api_base_url: String,
    request_timeout: Duration,
    use_mock_data: bool,
    wizard_policy: WizardPolicy,
    export_dir: PathBuf,
}

impl CoreConfig {
    pub fn new(
        api_base_url: String,
        request_timeout: Duration,
        use_mock_data: bool,
        wizard_policy: WizardPolicy,
        export_dir: PathBuf,
    ) -> LetterResult<Self> {
        let api_base_url = api_base_url.trim().trim_end_matches('/').to_string();
        if api_base_url.is_empty() {
            return Err(LetterError::InvalidInput(
                "api_base_url cannot be empty".into(),
            ));
        }
        if request_timeout.is_zero() {
            return Err(LetterError::InvalidInput(
                "request_timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            api_base_url,
            request_timeout,
            use_mock_data,
            wizard_policy,
            export_dir,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn use_mock_data(&self) -> bool {
        self.use_mock_data
    }

    pub fn wizard_policy(&self) -> WizardPolicy {
        self.wizard_policy
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            use_mock_data: true,
            wizard_policy: WizardPolicy::Permissive,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the wizard policy; unset or blank means [`WizardPolicy::Permissive`].
pub fn wizard_policy_from_env_value(value: Option<String>) -> LetterResult<WizardPolicy> {
    Ok(non_blank(value)
        .map(|v| v.parse::<WizardPolicy>())
        .transpose()?
        .unwrap_or_default())
}

/// Parse the mock-data switch; unset or blank means `true`.
pub fn use_mock_data_from_env_value(value: Option<String>) -> LetterResult<bool> {
    match non_blank(value).as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(true),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(LetterError::InvalidInput(format!(
            "LMN_USE_MOCK_DATA must be a boolean, got '{other}'"
        ))),
    }
}

fn positive_secs(name: &str, value: Option<String>, default_secs: u64) -> LetterResult<Duration> {
    let Some(raw) = non_blank(value) else {
        return Ok(Duration::from_secs(default_secs));
    };
    let secs = raw.parse::<u64>().map_err(|_| {
        LetterError::InvalidInput(format!("{name} must be an integer, got '{raw}'"))
    })?;
    if secs == 0 {
        return Err(LetterError::InvalidInput(format!(
            "{name} must be greater than zero"
        )));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse the request timeout in whole seconds; unset or blank means the 10 second default.
pub fn request_timeout_from_env_value(value: Option<String>) -> LetterResult<Duration> {
    positive_secs("LMN_REQUEST_TIMEOUT_SECS", value, DEFAULT_REQUEST_TIMEOUT_SECS)
}

/// Parse the REST session idle timeout in whole seconds; unset or blank means one hour.
pub fn session_ttl_from_env_value(value: Option<String>) -> LetterResult<Duration> {
    positive_secs("LMN_SESSION_TTL_SECS", value, DEFAULT_SESSION_TTL_SECS)
}
