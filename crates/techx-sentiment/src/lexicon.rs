//! Lexicon loading for both lexicon scorers and the one-shot fetch-on-miss
//! download.
//!
//! The VADER lexicon is a tab-separated text file; the polarity lexicon is the
//! pattern `en-sentiment.xml` word list.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sha2::{Digest, Sha256};

use crate::error::SentimentError;

/// Where a lexicon file lives locally and where to fetch it from.
#[derive(Debug, Clone)]
pub struct LexiconSource {
    pub path: PathBuf,
    pub url: String,
    /// Expected lowercase hex SHA-256 of the downloaded file, if pinned.
    pub sha256: Option<String>,
}

impl LexiconSource {
    #[must_use]
    pub fn vader(config: &techx_core::AppConfig) -> Self {
        Self {
            path: config.vader_lexicon_path.clone(),
            url: config.vader_lexicon_url.clone(),
            sha256: config.vader_lexicon_sha256.clone(),
        }
    }

    #[must_use]
    pub fn polarity(config: &techx_core::AppConfig) -> Self {
        Self {
            path: config.polarity_lexicon_path.clone(),
            url: config.polarity_lexicon_url.clone(),
            sha256: config.polarity_lexicon_sha256.clone(),
        }
    }
}

/// Token-to-mean-valence map parsed from `vader_lexicon.txt`.
#[derive(Debug, Clone)]
pub struct VaderLexicon {
    valences: HashMap<String, f64>,
}

impl VaderLexicon {
    /// Parse tab-separated `token<TAB>mean<TAB>...` lines.
    ///
    /// Blank lines are ignored; malformed lines are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Lexicon`] if no valid entry is found.
    pub fn parse(text: &str) -> Result<Self, SentimentError> {
        let mut valences = HashMap::new();
        let mut skipped = 0usize;

        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default();
            let mean = fields.next().map(str::trim).map(str::parse::<f64>);
            match mean {
                Some(Ok(value)) if !token.is_empty() && value.is_finite() => {
                    valences.insert(token.to_string(), value);
                }
                _ => {
                    skipped += 1;
                    tracing::warn!(line = lineno + 1, "skipping malformed lexicon line");
                }
            }
        }

        if valences.is_empty() {
            return Err(SentimentError::Lexicon(
                "lexicon contains no valid entries".to_string(),
            ));
        }
        tracing::debug!(entries = valences.len(), skipped, "parsed VADER lexicon");
        Ok(Self { valences })
    }

    /// Read and parse a lexicon file.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Io`] if the file cannot be read, or
    /// [`SentimentError::Lexicon`] if it holds no valid entries.
    pub fn load(path: &Path) -> Result<Self, SentimentError> {
        let text = std::fs::read_to_string(path).map_err(|e| SentimentError::io(path, e))?;
        Self::parse(&text)
    }

    #[must_use]
    pub fn get(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

/// Scores for one word form, averaged over its senses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordPolarity {
    pub polarity: f64,
    pub intensity: f64,
    /// Listed as an adverb (`RB`), so it scales the next known word.
    pub modifier: bool,
}

/// One `<word>` element of `en-sentiment.xml`.
struct Sense {
    form: String,
    pos: Option<String>,
    polarity: f64,
    intensity: f64,
}

/// Word-form-to-polarity map parsed from `en-sentiment.xml`.
#[derive(Debug, Clone)]
pub struct PolarityLexicon {
    words: HashMap<String, WordPolarity>,
}

impl PolarityLexicon {
    /// Parse `<word form=".." pos=".." polarity=".." intensity=".."/>` entries.
    ///
    /// Senses are averaged per part of speech first, then across parts of
    /// speech. Missing `polarity` counts as 0.0 and missing `intensity` as
    /// 1.0; entries with unparseable numbers are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Xml`] for malformed XML, or
    /// [`SentimentError::Lexicon`] if no valid entry is found.
    pub fn parse(xml: &str) -> Result<Self, SentimentError> {
        let mut senses: HashMap<String, BTreeMap<Option<String>, Vec<(f64, f64)>>> =
            HashMap::new();
        let mut skipped = 0usize;

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        loop {
            match reader.read_event() {
                Ok(Event::Start(e) | Event::Empty(e)) if e.name().as_ref() == b"word" => {
                    match read_sense(&e)? {
                        Some(sense) => senses
                            .entry(sense.form)
                            .or_default()
                            .entry(sense.pos)
                            .or_default()
                            .push((sense.polarity, sense.intensity)),
                        None => skipped += 1,
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(SentimentError::Xml(e)),
                _ => {}
            }
        }

        if senses.is_empty() {
            return Err(SentimentError::Lexicon(
                "polarity lexicon contains no valid words".to_string(),
            ));
        }

        let words: HashMap<String, WordPolarity> = senses
            .into_iter()
            .map(|(form, by_pos)| {
                let modifier = by_pos.keys().any(|pos| pos.as_deref() == Some("RB"));
                let per_pos: Vec<(f64, f64)> = by_pos.values().map(|s| mean_pair(s)).collect();
                let (polarity, intensity) = mean_pair(&per_pos);
                let word = WordPolarity {
                    polarity,
                    intensity,
                    modifier,
                };
                (form, word)
            })
            .collect();
        tracing::debug!(words = words.len(), skipped, "parsed polarity lexicon");
        Ok(Self { words })
    }

    /// Read and parse an `en-sentiment.xml` file.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Io`] if the file cannot be read, otherwise
    /// see [`PolarityLexicon::parse`].
    pub fn load(path: &Path) -> Result<Self, SentimentError> {
        let xml = std::fs::read_to_string(path).map_err(|e| SentimentError::io(path, e))?;
        Self::parse(&xml)
    }

    #[must_use]
    pub fn get(&self, word: &str) -> Option<WordPolarity> {
        self.words.get(word).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn read_sense(e: &BytesStart<'_>) -> Result<Option<Sense>, SentimentError> {
    let mut form = None;
    let mut pos = None;
    let mut polarity = None;
    let mut intensity = None;
    for attr in e.attributes().flatten() {
        let slot = match attr.key.as_ref() {
            b"form" => &mut form,
            b"pos" => &mut pos,
            b"polarity" => &mut polarity,
            b"intensity" => &mut intensity,
            _ => continue,
        };
        *slot = Some(attr.unescape_value()?.into_owned());
    }

    let Some(form) = form.filter(|f| !f.is_empty()) else {
        return Ok(None);
    };
    let number = |raw: Option<String>, default: f64| {
        raw.map_or(Ok(default), |r| r.trim().parse::<f64>())
    };
    match (number(polarity, 0.0), number(intensity, 1.0)) {
        (Ok(polarity), Ok(intensity)) if polarity.is_finite() && intensity.is_finite() => {
            Ok(Some(Sense {
                form,
                pos,
                polarity,
                intensity,
            }))
        }
        _ => {
            tracing::warn!(form = %form, "skipping polarity entry with malformed scores");
            Ok(None)
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_pair(values: &[(f64, f64)]) -> (f64, f64) {
    let n = values.len().max(1) as f64;
    let (a, b) = values
        .iter()
        .fold((0.0, 0.0), |(sa, sb), (a, b)| (sa + a, sb + b));
    (a / n, b / n)
}

/// HTTP client for lexicon downloads.
///
/// # Errors
///
/// Returns [`SentimentError::Http`] if the `reqwest::Client` cannot be built.
pub fn download_client(
    timeout_secs: u64,
    user_agent: &str,
) -> Result<reqwest::Client, SentimentError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Make sure the lexicon file exists locally, downloading it once if absent.
///
/// An existing file is used as-is. Otherwise the file is fetched from
/// `source.url`, checked against the SHA-256 pin when one is set, and written
/// via a temporary file so a failed download never leaves a partial lexicon.
/// There is no retry beyond this single fetch.
///
/// # Errors
///
/// Returns [`SentimentError::Http`] on network failure or non-2xx status,
/// [`SentimentError::Lexicon`] for an empty body,
/// [`SentimentError::Checksum`] when the pin does not match, and
/// [`SentimentError::Io`] if the file cannot be written.
pub async fn ensure_lexicon(
    client: &reqwest::Client,
    source: &LexiconSource,
) -> Result<PathBuf, SentimentError> {
    if source.path.is_file() {
        tracing::debug!(path = %source.path.display(), "lexicon present");
        return Ok(source.path.clone());
    }

    tracing::info!(
        url = %source.url,
        path = %source.path.display(),
        "lexicon missing; downloading"
    );
    let body = client
        .get(&source.url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    if body.is_empty() {
        return Err(SentimentError::Lexicon(format!(
            "empty lexicon download from {}",
            source.url
        )));
    }

    if let Some(expected) = &source.sha256 {
        let actual = hex_digest(&body);
        if &actual != expected {
            return Err(SentimentError::Checksum {
                expected: expected.clone(),
                actual,
            });
        }
    }

    if let Some(parent) = source.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SentimentError::io(parent, e))?;
    }

    let tmp = source.path.with_extension("download");
    tokio::fs::write(&tmp, &body)
        .await
        .map_err(|e| SentimentError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, &source.path)
        .await
        .map_err(|e| SentimentError::io(&source.path, e))?;

    tracing::info!(bytes = body.len(), path = %source.path.display(), "lexicon saved");
    Ok(source.path.clone())
}

fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
