//! Pattern-style adjective polarity scorer.
//!
//! Each word found in the pattern `en-sentiment.xml` lexicon produces an
//! assessment. Adverbs in the lexicon act as modifiers that scale the next
//! known word, negations flip and halve it, and a trailing `!` boosts it. The
//! text's polarity is the mean of all assessments.

use crate::label::ScoreResult;
use crate::lexicon::{PolarityLexicon, WordPolarity};

/// Words that negate the next known word.
const NEGATIONS: &[&str] = &["no", "not", "n't", "never"];

/// Emoticons with the polarity they contribute on their own.
const EMOTICONS: &[(f64, &[&str])] = &[
    (1.0, &["<3"]),
    (
        1.0,
        &[">:d", ":-d", ":d", "=-d", "=d", "x-d", "xd", "8-d"],
    ),
    (
        0.75,
        &[">:p", ":-p", ":p", ":-b", ":b", ":c)", ":o)", ":^)"],
    ),
    (
        0.5,
        &[">:)", ":-)", ":)", "=)", "=]", ":]", ":}", ":>", ":3", "8)", "8-)"],
    ),
    (0.25, &[">;]", ";-)", ";)", ";-]", ";]", ";d", ";^)", "*-)", "*)"]),
    (0.05, &[">:o", ":-o", ":o", "o_o", "o.o"]),
    (
        -0.25,
        &[">:/", ":-/", ":/", ":\\", ">:\\", ":-.", ":-s", ":s", ">.>"],
    ),
    (
        -0.75,
        &[">:[", ":-(", ":(", "=(", ":-[", ":[", ":{", ":-<", ":c", ":-c", "=/"],
    ),
    (-1.0, &[":'(", ":'''(", ";'("]),
];

fn emoticon_polarity(token: &str) -> Option<f64> {
    EMOTICONS
        .iter()
        .find(|(_, faces)| faces.contains(&token))
        .map(|(p, _)| *p)
}

#[derive(Debug, Clone, Copy)]
struct Assessment {
    polarity: f64,
    intensity: f64,
    negated: bool,
}

impl Assessment {
    fn new(polarity: f64, intensity: f64) -> Self {
        Self {
            polarity,
            intensity,
            negated: false,
        }
    }

    /// "not good" is slightly bad, "not bad" is slightly good.
    fn value(&self) -> f64 {
        if self.negated {
            self.polarity * -0.5
        } else {
            self.polarity
        }
    }
}

/// Split text into lowercase word, emoticon and `!` tokens.
///
/// Contractions ending in `n't` yield the stem and a separate `n't` token.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        let lower = chunk.replace('\u{2019}', "'").to_lowercase();
        if emoticon_polarity(&lower).is_some() {
            tokens.push(lower);
            continue;
        }

        let word = lower.trim_matches(|c: char| !c.is_alphanumeric());
        let leading_bangs = count_bangs(lower.chars());
        let trailing_bangs = count_bangs(lower.chars().rev());

        tokens.extend(std::iter::repeat_n("!".to_string(), leading_bangs));
        if !word.is_empty() {
            match word.strip_suffix("n't") {
                Some(stem) if !stem.is_empty() => {
                    tokens.push(stem.to_string());
                    tokens.push("n't".to_string());
                }
                _ => tokens.push(word.to_string()),
            }
        }
        if !word.is_empty() || leading_bangs == 0 {
            tokens.extend(std::iter::repeat_n("!".to_string(), trailing_bangs));
        }
    }
    tokens
}

/// Count `!` in the punctuation run at the start of `chars`.
fn count_bangs(chars: impl Iterator<Item = char>) -> usize {
    chars
        .take_while(|c| !c.is_alphanumeric())
        .filter(|&c| c == '!')
        .count()
}

/// Score every assessment in `text`.
fn assess(lexicon: &PolarityLexicon, text: &str) -> Vec<Assessment> {
    let mut assessments: Vec<Assessment> = Vec::new();
    // Pending modifier (a known adverb) and pending negation.
    let mut modifier: Option<WordPolarity> = None;
    let mut negation = false;

    for token in tokenize(text) {
        let is_negation = NEGATIONS.contains(&token.as_str());

        if let Some(entry) = lexicon.get(&token) {
            match (modifier, assessments.last_mut()) {
                (Some(_), Some(last)) => {
                    last.polarity = (entry.polarity * last.intensity).clamp(-1.0, 1.0);
                    last.intensity = entry.intensity;
                }
                _ => assessments.push(Assessment::new(entry.polarity, entry.intensity)),
            }
            if negation {
                if let Some(last) = assessments.last_mut() {
                    let divisor = if last.intensity == 0.0 { 1.0 } else { last.intensity };
                    last.intensity = 1.0 / divisor;
                    last.negated = true;
                }
            }
            modifier = entry.modifier.then_some(entry);
            negation = is_negation;
            continue;
        }

        if is_negation {
            negation = true;
        } else if negation && token.trim_matches('\'').chars().count() > 1 {
            // Negation survives short words ("not a good").
            negation = false;
        }

        // "really not good": the negation attaches to the modifier.
        if negation && modifier.is_some() {
            if let Some(last) = assessments.last_mut() {
                last.negated = true;
            }
            negation = false;
        } else if modifier.is_some() && token.chars().count() > 2 {
            modifier = None;
        }

        if token == "!" {
            if let Some(last) = assessments.last_mut() {
                last.polarity = (last.polarity * 1.25).clamp(-1.0, 1.0);
            }
        }

        if let Some(p) = emoticon_polarity(&token) {
            assessments.push(Assessment::new(p, 1.0));
        }
    }

    assessments
}

/// Lexicon polarity scorer.
#[derive(Debug, Clone)]
pub struct PolarityScorer {
    lexicon: PolarityLexicon,
    threshold: f64,
}

impl PolarityScorer {
    #[must_use]
    pub fn new(lexicon: PolarityLexicon, threshold: f64) -> Self {
        Self { lexicon, threshold }
    }

    /// Mean polarity of all assessments in `text`, in `[-1.0, 1.0]`.
    ///
    /// Returns `0.0` when no known word or emoticon is present.
    #[must_use]
    pub fn polarity(&self, text: &str) -> f64 {
        let assessments = assess(&self.lexicon, text);
        if assessments.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = assessments.len() as f64;
        let sum: f64 = assessments.iter().map(Assessment::value).sum();
        (sum / count).clamp(-1.0, 1.0)
    }

    #[must_use]
    pub fn score(&self, text: &str) -> ScoreResult {
        let score = self.polarity(text);
        tracing::debug!(score, "polarity scorer");
        ScoreResult::from_score(score, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{SentimentLabel, DEFAULT_THRESHOLD};

    const TEST_LEXICON: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<sentiment language="en">
    <word form="very" pos="RB" polarity="0.2" intensity="1.3" />
    <word form="good" pos="JJ" polarity="0.7" intensity="1.0" />
    <word form="great" pos="JJ" polarity="0.8" intensity="1.0" />
    <word form="perfect" pos="JJ" polarity="1.0" intensity="1.0" />
    <word form="best" pos="JJ" polarity="1.0" intensity="1.0" />
    <word form="new" pos="JJ" polarity="0.136" intensity="1.0" />
    <word form="pleasant" pos="JJ" polarity="0.733" intensity="1.0" />
    <word form="polite" pos="JJ" polarity="0.4" intensity="1.0" />
    <word form="bad" pos="JJ" polarity="-0.7" intensity="1.0" />
    <word form="terrible" pos="JJ" polarity="-1.0" intensity="1.0" />
    <word form="worst" pos="JJS" polarity="-1.0" intensity="1.0" />
    <word form="nasty" pos="JJ" polarity="-1.0" intensity="1.0" />
    <word form="dull" pos="JJ" polarity="-0.3" intensity="1.0" />
</sentiment>
"#;

    fn scorer() -> PolarityScorer {
        let lexicon = PolarityLexicon::parse(TEST_LEXICON).expect("test lexicon parses");
        PolarityScorer::new(lexicon, DEFAULT_THRESHOLD)
    }

    fn polarity(text: &str) -> f64 {
        scorer().polarity(text)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_string_returns_zero() {
        assert_eq!(polarity(""), 0.0);
        assert_eq!(polarity("   "), 0.0);
    }

    #[test]
    fn unknown_text_returns_zero() {
        assert_eq!(polarity("the quick brown fox"), 0.0);
    }

    #[test]
    fn single_known_word_uses_its_polarity() {
        assert!(approx(polarity("The food was good"), 0.7));
        assert!(approx(polarity("bad"), -0.7));
    }

    #[test]
    fn everyday_adjectives_from_loaded_lexicon_score() {
        assert!(approx(polarity("pleasant"), 0.733));
        assert!(approx(polarity("nasty"), -1.0));
        // (pleasant 0.733 + polite 0.4) / 2
        assert!(approx(
            polarity("The hotel was pleasant and the staff polite"),
            0.5665
        ));
        // (nasty -1.0 + dull -0.3) / 2
        assert!(approx(polarity("What a nasty, dull evening"), -0.65));
    }

    #[test]
    fn modifier_scales_next_word() {
        // very (intensity 1.3) * good (0.7)
        assert!(approx(polarity("very good"), 0.91));
    }

    #[test]
    fn negation_flips_and_halves() {
        assert!(approx(polarity("not good"), -0.35));
        assert!(approx(polarity("not bad"), 0.35));
    }

    #[test]
    fn contraction_negates() {
        assert!(approx(polarity("it isn't good"), -0.35));
        assert!(approx(polarity("it isn\u{2019}t good"), -0.35));
    }

    #[test]
    fn negation_survives_short_words() {
        assert!(approx(polarity("not a good day"), -0.35));
    }

    #[test]
    fn negation_dropped_after_long_unknown_word() {
        assert!(approx(polarity("not because good"), 0.7));
    }

    #[test]
    fn exclamation_boosts_previous_word() {
        assert!(approx(polarity("good!"), 0.875));
        assert!(approx(polarity("good !"), 0.875));
    }

    #[test]
    fn exclamation_boost_is_clamped() {
        assert!(approx(polarity("perfect!!"), 1.0));
    }

    #[test]
    fn emoticon_contributes_polarity() {
        assert!(approx(polarity(":)"), 0.5));
        assert!(approx(polarity("meh :("), -0.75));
    }

    #[test]
    fn mean_over_assessments() {
        // (great 0.8 + terrible -1.0) / 2
        assert!(approx(polarity("great start, terrible ending"), -0.1));
    }

    #[test]
    fn score_is_always_in_range() {
        for text in ["best best best!!!", "worst worst worst!!!", "not not not", "!!!"] {
            let s = polarity(text);
            assert!((-1.0..=1.0).contains(&s), "{text}: {s}");
        }
    }

    #[test]
    fn scorer_applies_threshold() {
        let scorer = scorer();
        assert_eq!(scorer.score("great").label, SentimentLabel::Positive);
        assert_eq!(scorer.score("terrible").label, SentimentLabel::Negative);
        assert_eq!(scorer.score("").label, SentimentLabel::Neutral);
        // new (0.136) clears 0.1 but not 0.2
        assert_eq!(scorer.score("new").label, SentimentLabel::Positive);
        let strict = PolarityScorer::new(PolarityLexicon::parse(TEST_LEXICON).unwrap(), 0.2);
        assert_eq!(strict.score("new").label, SentimentLabel::Neutral);
    }

    #[test]
    fn tokenize_splits_contractions_and_bangs() {
        assert_eq!(tokenize("Don't stop!"), vec!["do", "n't", "stop", "!"]);
        assert_eq!(tokenize("(:-) ok"), vec!["ok"]);
        assert_eq!(tokenize(":-) ok"), vec![":-)", "ok"]);
    }
}
