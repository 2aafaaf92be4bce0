//! VADER (Valence Aware Dictionary and sEntiment Reasoner) rule engine.
//!
//! Scores informal text against a valence lexicon, adjusting each word for
//! boosters, ALL-CAPS emphasis, negation, idioms, contrastive "but" and
//! punctuation. The summed valence is squashed into a compound score in
//! `[-1.0, 1.0]`.

mod constants;

use serde::Serialize;

use crate::label::ScoreResult;
use crate::lexicon::VaderLexicon;
use constants::{booster, special_case, ALPHA, B_DECR, C_INCR, NEGATE, N_SCALAR, PUNC_LIST};

/// Full VADER output for one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    /// Normalized sum of valences, rounded to 4 decimals.
    pub compound: f64,
}

/// Tokenized text plus the mixed-case flag used for ALL-CAPS emphasis.
struct SentiText<'a> {
    tokens: Vec<&'a str>,
    lower: Vec<String>,
    is_cap_diff: bool,
}

impl<'a> SentiText<'a> {
    fn new(text: &'a str) -> Self {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .filter(|t| t.chars().count() > 1)
            .map(strip_listed_punc)
            .collect();
        let lower = tokens.iter().map(|t| t.to_lowercase()).collect();
        let caps = tokens.iter().filter(|t| is_upper(t)).count();
        Self {
            is_cap_diff: caps > 0 && caps < tokens.len(),
            tokens,
            lower,
        }
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Drop a leading or trailing punctuation run when it is one of
/// [`PUNC_LIST`] and what remains is a plain word of two or more characters.
///
/// Emoticons such as `:)` and tokens like `good!!!!` are returned unchanged.
fn strip_listed_punc(token: &str) -> &str {
    let is_punc = |c: char| c.is_ascii_punctuation();
    let core = token.trim_matches(is_punc);
    if core.chars().count() <= 1 || core.contains(is_punc) {
        return token;
    }
    let lead = &token[..token.len() - token.trim_start_matches(is_punc).len()];
    let trail = &token[token.trim_end_matches(is_punc).len()..];
    match (lead.is_empty(), trail.is_empty()) {
        (true, false) if PUNC_LIST.contains(&trail) => core,
        (false, true) if PUNC_LIST.contains(&lead) => core,
        _ => token,
    }
}

/// At least one uppercase character and no lowercase ones.
fn is_upper(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

fn negated(word: &str) -> bool {
    NEGATE.contains(&word) || word.contains("n't")
}

/// Booster contribution of `word` towards a word with `valence`.
fn scalar_inc_dec(word: &str, valence: f64, is_cap_diff: bool) -> f64 {
    let Some(mut scalar) = booster(&word.to_lowercase()) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if is_upper(word) && is_cap_diff {
        if valence > 0.0 {
            scalar += C_INCR;
        } else {
            scalar -= C_INCR;
        }
    }
    scalar
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Emphasis added by exclamation marks (up to 4) and repeated question marks.
#[allow(clippy::cast_precision_loss)]
fn punctuation_emphasis(text: &str) -> f64 {
    let bangs = text.matches('!').count().min(4);
    let questions = text.matches('?').count();
    let qm_amplifier = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    bangs as f64 * 0.292 + qm_amplifier
}

/// VADER scorer bound to a loaded lexicon.
#[derive(Debug, Clone)]
pub struct VaderScorer {
    lexicon: VaderLexicon,
    threshold: f64,
}

impl VaderScorer {
    #[must_use]
    pub fn new(lexicon: VaderLexicon, threshold: f64) -> Self {
        Self { lexicon, threshold }
    }

    /// Label `text` by its compound score.
    #[must_use]
    pub fn score(&self, text: &str) -> ScoreResult {
        let scores = self.polarity_scores(text);
        tracing::debug!(
            compound = scores.compound,
            pos = scores.pos,
            neg = scores.neg,
            neu = scores.neu,
            "vader scorer"
        );
        ScoreResult::from_score(scores.compound, self.threshold)
    }

    /// Compute positive, negative, neutral proportions and the compound score.
    #[must_use]
    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let st = SentiText::new(text);
        let mut sentiments = Vec::with_capacity(st.len());

        for i in 0..st.len() {
            let item = st.lower[i].as_str();
            // Boosters and "kind of" modify neighbours but carry no valence.
            if booster(item).is_some()
                || (item == "kind" && st.lower.get(i + 1).is_some_and(|w| w == "of"))
            {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.sentiment_valence(&st, i));
        }

        but_check(&st.lower, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn sentiment_valence(&self, st: &SentiText<'_>, i: usize) -> f64 {
        let lower = &st.lower;
        let Some(mut valence) = self.lexicon.get(&lower[i]) else {
            return 0.0;
        };

        if is_upper(st.tokens[i]) && st.is_cap_diff {
            if valence > 0.0 {
                valence += C_INCR;
            } else {
                valence -= C_INCR;
            }
        }

        for start_i in 0..3 {
            if i <= start_i || self.lexicon.contains(&lower[i - (start_i + 1)]) {
                continue;
            }
            let mut s = scalar_inc_dec(st.tokens[i - (start_i + 1)], valence, st.is_cap_diff);
            if start_i == 1 && s != 0.0 {
                s *= 0.95;
            }
            if start_i == 2 && s != 0.0 {
                s *= 0.9;
            }
            valence += s;
            valence = negation_check(valence, lower, start_i, i);
            if start_i == 2 {
                valence = special_idioms_check(valence, lower, i);
            }
        }

        self.least_check(valence, lower, i)
    }

    fn least_check(&self, valence: f64, lower: &[String], i: usize) -> f64 {
        let least_before = |j: usize| lower[j] == "least" && !self.lexicon.contains(&lower[j]);
        if i > 1 && least_before(i - 1) {
            if lower[i - 2] != "at" && lower[i - 2] != "very" {
                return valence * N_SCALAR;
            }
        } else if i > 0 && least_before(i - 1) {
            return valence * N_SCALAR;
        }
        valence
    }
}

fn is_so_or_this(word: &str) -> bool {
    word == "so" || word == "this"
}

fn negation_check(valence: f64, lower: &[String], start_i: usize, i: usize) -> f64 {
    match start_i {
        0 => {
            if negated(&lower[i - 1]) {
                return valence * N_SCALAR;
            }
        }
        1 => {
            if lower[i - 2] == "never" && is_so_or_this(&lower[i - 1]) {
                return valence * 1.25;
            } else if negated(&lower[i - 2]) {
                return valence * N_SCALAR;
            }
        }
        2 => {
            // "so"/"this" right before the word amplifies it even without "never".
            if (lower[i - 3] == "never" && is_so_or_this(&lower[i - 2]))
                || is_so_or_this(&lower[i - 1])
            {
                return valence * 1.25;
            } else if negated(&lower[i - 3]) {
                return valence * N_SCALAR;
            }
        }
        _ => {}
    }
    valence
}

/// Idioms ending at (or starting at) position `i` override its valence;
/// multi-word boosters before it add to it. Requires `i >= 3`.
fn special_idioms_check(mut valence: f64, lower: &[String], i: usize) -> f64 {
    let onezero = format!("{} {}", lower[i - 1], lower[i]);
    let twoonezero = format!("{} {} {}", lower[i - 2], lower[i - 1], lower[i]);
    let twoone = format!("{} {}", lower[i - 2], lower[i - 1]);
    let threetwoone = format!("{} {} {}", lower[i - 3], lower[i - 2], lower[i - 1]);
    let threetwo = format!("{} {}", lower[i - 3], lower[i - 2]);

    if let Some(v) = [&onezero, &twoonezero, &twoone, &threetwoone, &threetwo]
        .into_iter()
        .find_map(|seq| special_case(seq))
    {
        valence = v;
    }

    if lower.len() - 1 > i {
        let zeroone = format!("{} {}", lower[i], lower[i + 1]);
        if let Some(v) = special_case(&zeroone) {
            valence = v;
        }
    }
    if lower.len() - 1 > i + 1 {
        let zeroonetwo = format!("{} {} {}", lower[i], lower[i + 1], lower[i + 2]);
        if let Some(v) = special_case(&zeroonetwo) {
            valence = v;
        }
    }

    // Multi-word dampeners such as "kind of" or "sort of".
    if booster(&threetwo).is_some() || booster(&twoone).is_some() {
        valence += B_DECR;
    }
    valence
}

/// Sentiment before the first "but" is halved; after it, boosted by half.
fn but_check(lower: &[String], sentiments: &mut [f64]) {
    let Some(bi) = lower.iter().position(|w| w == "but") else {
        return;
    };
    for (idx, sentiment) in sentiments.iter_mut().enumerate() {
        match idx.cmp(&bi) {
            std::cmp::Ordering::Less => *sentiment *= 0.5,
            std::cmp::Ordering::Greater => *sentiment *= 1.5,
            std::cmp::Ordering::Equal => {}
        }
    }
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    if sentiments.is_empty() {
        return PolarityScores {
            neg: 0.0,
            neu: 0.0,
            pos: 0.0,
            compound: 0.0,
        };
    }

    let punct = punctuation_emphasis(text);
    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = normalize(sum);

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count;
    PolarityScores {
        neg: round_to((neg_sum / total).abs(), 3),
        neu: round_to((neu_count / total).abs(), 3),
        pos: round_to((pos_sum / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}

#[cfg(test)]
#[path = "vader_test.rs"]
mod tests;
