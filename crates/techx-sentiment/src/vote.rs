//! Majority vote over the three scorer labels.

use serde::{Serialize, Serializer};

use crate::label::SentimentLabel;

/// Label counts in the order each label first received a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTally {
    counts: Vec<(SentimentLabel, usize)>,
}

impl VoteTally {
    fn from_votes(votes: &[SentimentLabel]) -> Self {
        let mut counts: Vec<(SentimentLabel, usize)> = Vec::with_capacity(votes.len());
        for &vote in votes {
            match counts.iter_mut().find(|(label, _)| *label == vote) {
                Some((_, count)) => *count += 1,
                None => counts.push((vote, 1)),
            }
        }
        Self { counts }
    }

    /// Votes cast for `label`.
    #[must_use]
    pub fn count(&self, label: SentimentLabel) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| *l == label)
            .map_or(0, |(_, c)| *c)
    }

    /// Total votes cast.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    /// First label with the highest count.
    fn leader(&self) -> Option<(SentimentLabel, usize)> {
        self.counts
            .iter()
            .copied()
            .fold(None, |best, (label, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((label, count)),
            })
    }
}

impl std::fmt::Display for VoteTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (label, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{label}: {count}")?;
        }
        write!(f, "}}")
    }
}

impl Serialize for VoteTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (label, count) in &self.counts {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

/// Winning label, flagged when it came from the classifier tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalDecision {
    pub label: SentimentLabel,
    pub tie_break: bool,
}

impl std::fmt::Display for FinalDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.tie_break {
            write!(f, "{} (BERT Decision)", self.label)
        } else {
            write!(f, "{}", self.label)
        }
    }
}

/// Count the three votes and pick the winner.
///
/// A label with two or more votes wins outright. With three votes over three
/// labels the only other outcome is a full split, which `classifier_label`
/// decides.
#[must_use]
pub fn tally_votes(
    votes: [SentimentLabel; 3],
    classifier_label: SentimentLabel,
) -> (VoteTally, FinalDecision) {
    let tally = VoteTally::from_votes(&votes);
    let decision = match tally.leader() {
        Some((label, count)) if count >= 2 => FinalDecision {
            label,
            tie_break: false,
        },
        _ => FinalDecision {
            label: classifier_label,
            tie_break: true,
        },
    };
    debug_assert_eq!(tally.total(), 3);
    tracing::debug!(tally = %tally, decision = %decision, "votes counted");
    (tally, decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use SentimentLabel::{Negative, Neutral, Positive};

    #[test]
    fn unanimous_vote_wins_without_tie_break() {
        let (tally, decision) = tally_votes([Positive, Positive, Positive], Positive);
        assert_eq!(tally.count(Positive), 3);
        assert_eq!(
            decision,
            FinalDecision {
                label: Positive,
                tie_break: false
            }
        );
        assert_eq!(decision.to_string(), "Positive");
    }

    #[test]
    fn two_to_one_majority_wins() {
        let (tally, decision) = tally_votes([Positive, Positive, Negative], Negative);
        assert_eq!(tally.count(Positive), 2);
        assert_eq!(tally.count(Negative), 1);
        assert_eq!(tally.count(Neutral), 0);
        assert_eq!(decision.label, Positive);
        assert!(!decision.tie_break);
    }

    #[test]
    fn majority_overrules_classifier() {
        let (_, decision) = tally_votes([Neutral, Negative, Neutral], Negative);
        assert_eq!(decision.label, Neutral);
        assert!(!decision.tie_break);
    }

    #[test]
    fn three_way_split_defers_to_classifier() {
        let (tally, decision) = tally_votes([Positive, Negative, Neutral], Negative);
        assert_eq!(tally.count(Positive), 1);
        assert_eq!(tally.count(Negative), 1);
        assert_eq!(tally.count(Neutral), 1);
        assert_eq!(decision.label, Negative);
        assert!(decision.tie_break);
        assert_eq!(decision.to_string(), "Negative (BERT Decision)");
    }

    #[test]
    fn tally_always_sums_to_three() {
        let labels = [Positive, Negative, Neutral];
        for a in labels {
            for b in labels {
                for c in labels {
                    let (tally, _) = tally_votes([a, b, c], c);
                    assert_eq!(tally.total(), 3, "votes {a} {b} {c}");
                }
            }
        }
    }

    #[test]
    fn tally_display_keeps_first_seen_order() {
        let (tally, _) = tally_votes([Negative, Positive, Negative], Negative);
        assert_eq!(tally.to_string(), "{Negative: 2, Positive: 1}");
    }

    #[test]
    fn tally_serializes_as_map() {
        let (tally, _) = tally_votes([Neutral, Neutral, Positive], Positive);
        let json = serde_json::to_value(&tally).unwrap();
        assert_eq!(json, serde_json::json!({"Neutral": 2, "Positive": 1}));
    }
}
