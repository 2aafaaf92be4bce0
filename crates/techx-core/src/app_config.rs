use std::path::PathBuf;

/// Runtime settings for one analysis run.
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub classifier_url: String,
    pub classifier_timeout_secs: u64,
    pub user_agent: String,
    /// Timeout for the one-time lexicon downloads.
    pub lexicon_timeout_secs: u64,
    pub vader_lexicon_path: PathBuf,
    pub vader_lexicon_url: String,
    pub vader_lexicon_sha256: Option<String>,
    pub polarity_lexicon_path: PathBuf,
    pub polarity_lexicon_url: String,
    pub polarity_lexicon_sha256: Option<String>,
    pub label_threshold: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("classifier_url", &redact_userinfo(&self.classifier_url))
            .field("classifier_timeout_secs", &self.classifier_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("lexicon_timeout_secs", &self.lexicon_timeout_secs)
            .field("vader_lexicon_path", &self.vader_lexicon_path)
            .field("vader_lexicon_url", &self.vader_lexicon_url)
            .field("vader_lexicon_sha256", &self.vader_lexicon_sha256)
            .field("polarity_lexicon_path", &self.polarity_lexicon_path)
            .field("polarity_lexicon_url", &self.polarity_lexicon_url)
            .field("polarity_lexicon_sha256", &self.polarity_lexicon_sha256)
            .field("label_threshold", &self.label_threshold)
            .finish()
    }
}

/// Hide `user:password@` credentials embedded in a URL.
fn redact_userinfo(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!("{scheme}://[redacted]@{}", &rest[at + 1..]),
        None => url.to_string(),
    }
}
