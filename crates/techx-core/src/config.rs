use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_VADER_LEXICON_URL: &str =
    "https://raw.githubusercontent.com/cjhutto/vaderSentiment/master/vaderSentiment/vader_lexicon.txt";
const DEFAULT_POLARITY_LEXICON_URL: &str =
    "https://raw.githubusercontent.com/sloria/TextBlob/dev/src/textblob/en/en-sentiment.xml";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default; only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let log_level = or_default("TECHX_LOG_LEVEL", "warn");
    let classifier_url = or_default("TECHX_CLASSIFIER_URL", "http://localhost:8080");
    if !(classifier_url.starts_with("http://") || classifier_url.starts_with("https://")) {
        return Err(invalid(
            "TECHX_CLASSIFIER_URL",
            format!("expected an http(s) URL, got '{classifier_url}'"),
        ));
    }

    let parse_secs = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let optional_sha256 = |var: &str| -> Result<Option<String>, ConfigError> {
        match lookup(var) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => parse_sha256_hex(&raw).map(Some).map_err(|r| invalid(var, r)),
            Err(_) => Ok(None),
        }
    };

    let classifier_timeout_secs = parse_secs("TECHX_CLASSIFIER_TIMEOUT_SECS", "30")?;
    let lexicon_timeout_secs = parse_secs("TECHX_LEXICON_TIMEOUT_SECS", "60")?;

    let user_agent = or_default("TECHX_USER_AGENT", "techx-sentiment/0.1 (ensemble-voting)");
    let vader_lexicon_path = PathBuf::from(or_default(
        "TECHX_VADER_LEXICON_PATH",
        "./data/vader_lexicon.txt",
    ));
    let vader_lexicon_url = or_default("TECHX_VADER_LEXICON_URL", DEFAULT_VADER_LEXICON_URL);

    let vader_lexicon_sha256 = optional_sha256("TECHX_VADER_LEXICON_SHA256")?;

    let polarity_lexicon_path = PathBuf::from(or_default(
        "TECHX_POLARITY_LEXICON_PATH",
        "./data/en-sentiment.xml",
    ));
    let polarity_lexicon_url =
        or_default("TECHX_POLARITY_LEXICON_URL", DEFAULT_POLARITY_LEXICON_URL);
    let polarity_lexicon_sha256 = optional_sha256("TECHX_POLARITY_LEXICON_SHA256")?;

    let label_threshold = parse_threshold(&or_default("TECHX_LABEL_THRESHOLD", "0.1"))
        .map_err(|r| invalid("TECHX_LABEL_THRESHOLD", r))?;

    Ok(AppConfig {
        log_level,
        classifier_url,
        classifier_timeout_secs,
        user_agent,
        lexicon_timeout_secs,
        vader_lexicon_path,
        vader_lexicon_url,
        vader_lexicon_sha256,
        polarity_lexicon_path,
        polarity_lexicon_url,
        polarity_lexicon_sha256,
        label_threshold,
    })
}

/// Threshold must be a finite, non-negative number.
fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value = raw.trim().parse::<f64>().map_err(|e| e.to_string())?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("expected a finite non-negative number, got {raw}"));
    }
    Ok(value)
}

/// Normalize a SHA-256 pin to 64 lowercase hex characters.
fn parse_sha256_hex(raw: &str) -> Result<String, String> {
    let digest = raw.trim().to_ascii_lowercase();
    if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("expected 64 hex characters".to_string());
    }
    Ok(digest)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
