//! Console report for an [`AnalysisResult`].

use crate::pipeline::AnalysisResult;

/// Render the multi-line report printed after each analysis.
///
/// Scores are shown to four decimal places next to each scorer's label.
#[must_use]
pub fn render_report(result: &AnalysisResult) -> String {
    let rows = [
        ("Polarity", &result.polarity),
        ("VADER", &result.vader),
        ("BERT", &result.classifier),
    ];

    let mut out = String::from("=== Ensemble Sentiment Analysis (Majority Voting) ===\n");
    for (name, r) in rows {
        out.push_str(&format!("{name:<9}: {:.4} [{}]\n", r.score, r.label));
    }
    out.push_str(&format!("Vote Tally: {}\n", result.tally));
    out.push_str(&format!("Final Sentiment: {}\n", result.decision));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{ScoreResult, SentimentLabel};
    use crate::vote::tally_votes;

    fn result(scores: [(f64, SentimentLabel); 3]) -> AnalysisResult {
        let [p, v, c] = scores.map(|(score, label)| ScoreResult { score, label });
        let (tally, decision) = tally_votes([p.label, v.label, c.label], c.label);
        AnalysisResult {
            polarity: p,
            vader: v,
            classifier: c,
            tally,
            decision,
        }
    }

    #[test]
    fn renders_majority_report() {
        let r = result([
            (0.5, SentimentLabel::Positive),
            (0.624_9, SentimentLabel::Positive),
            (-0.981_23, SentimentLabel::Negative),
        ]);
        let expected = "\
=== Ensemble Sentiment Analysis (Majority Voting) ===
Polarity : 0.5000 [Positive]
VADER    : 0.6249 [Positive]
BERT     : -0.9812 [Negative]
Vote Tally: {Positive: 2, Negative: 1}
Final Sentiment: Positive
";
        assert_eq!(render_report(&r), expected);
    }

    #[test]
    fn renders_tie_break_annotation() {
        let r = result([
            (0.3, SentimentLabel::Positive),
            (0.0, SentimentLabel::Neutral),
            (-0.7, SentimentLabel::Negative),
        ]);
        let report = render_report(&r);
        assert!(report.contains("Vote Tally: {Positive: 1, Neutral: 1, Negative: 1}"));
        assert!(report.ends_with("Final Sentiment: Negative (BERT Decision)\n"));
    }
}
