//! Selection request construction
//!
//! Builds the text sent to the AI collaborator. Output depends only on the
//! inputs, so the same request always renders the same way.

use std::fmt::Write;

use crate::domain::model::{Candidate, Constraints, Transcript};

/// Builder for selection and repair requests
pub struct PromptBuilder<'a> {
    transcript: &'a Transcript,
    intent: &'a str,
    constraints: &'a Constraints,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(transcript: &'a Transcript, intent: &'a str, constraints: &'a Constraints) -> Self {
        Self {
            transcript,
            intent,
            constraints,
        }
    }

    /// Initial request asking for every segment and its variations
    pub fn selection_request(&self) -> String {
        let c = self.constraints;
        let min = format_seconds(c.min_duration);
        let max = format_seconds(c.max_duration);

        let mut out = String::new();
        out.push_str("You are an expert AI video editor.\n");
        let _ = writeln!(
            out,
            "Your task: find {} * {} = {} timestamped clips from the transcript that best match the user's intent:",
            c.segment_count,
            c.variation_count,
            c.expected_total()
        );
        let _ = writeln!(out, "\"{}\"", self.intent.trim());
        out.push('\n');
        out.push_str("Rules:\n");
        let _ = writeln!(
            out,
            "- Return exactly {} clip groups, each with exactly {} variation(s), {} entries in total.",
            c.segment_count,
            c.variation_count,
            c.expected_total()
        );
        let _ = writeln!(
            out,
            "- Each clip MUST be between {}s and {}s long (inclusive).",
            min, max
        );
        let _ = writeln!(
            out,
            "- Aim for the upper part of that range (close to {}s) so the clip captures full context.",
            max
        );
        let _ = writeln!(
            out,
            "- Only make a clip shorter than {}s if the speaker clearly finishes a sentence or topic earlier.",
            max
        );
        out.push_str("- Never cut speech mid-sentence.\n");
        out.push_str(
            "- Each variation should adjust timing slightly but remain natural and relevant.\n",
        );
        out.push_str("- Give a short \"reason\" describing why the segment matches the intent.\n");
        out.push_str("- All timestamps are numbers in seconds, with end greater than start.\n");
        out.push_str("- Respond ONLY with valid JSON. No Markdown, no commentary.\n");
        out.push('\n');
        self.push_transcript(&mut out);
        out.push('\n');
        out.push_str("Return JSON strictly in this format:\n");
        out.push_str(&schema_example(c.variation_count));
        out
    }

    /// Narrower request for `needed` additional segments
    ///
    /// Already accepted ranges are listed so the collaborator can avoid them.
    pub fn repair_request(&self, needed: usize, accepted: &[Candidate]) -> String {
        let c = self.constraints;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "From the same transcript, find {} additional unique segments related to:",
            needed
        );
        let _ = writeln!(out, "\"{}\"", self.intent.trim());
        out.push('\n');
        out.push_str("Rules:\n");
        let _ = writeln!(
            out,
            "- Each segment must be between {}s and {}s long (inclusive).",
            format_seconds(c.min_duration),
            format_seconds(c.max_duration)
        );
        out.push_str("- Never cut speech mid-sentence.\n");
        out.push_str("- Do not repeat earlier timestamps.\n");
        if !accepted.is_empty() {
            out.push_str("- Already selected (do not reuse):\n");
            for candidate in accepted {
                let _ = writeln!(
                    out,
                    "  [{:.2}s - {:.2}s]",
                    candidate.start, candidate.end
                );
            }
        }
        out.push_str("- Respond ONLY with valid JSON. No Markdown, no commentary.\n");
        out.push('\n');
        self.push_transcript(&mut out);
        out.push('\n');
        out.push_str("Return JSON strictly in this format:\n");
        out.push_str(&schema_example(1));
        out
    }

    fn push_transcript(&self, out: &mut String) {
        out.push_str("Transcript:\n");
        for line in self.transcript.lines() {
            let _ = writeln!(
                out,
                "[{:.2}s - {:.2}s] {}",
                line.start,
                line.end,
                line.text.trim()
            );
        }
    }
}

fn schema_example(variation_count: u32) -> String {
    let variation = r#"        { "start": <float>, "end": <float>, "reason": "<string>" }"#;
    let variations = vec![variation; variation_count.max(1) as usize].join(",\n");

    format!(
        "{{\n  \"clips\": [\n    {{\n      \"clip_id\": 1,\n      \"variations\": [\n{}\n      ]\n    }}\n  ]\n}}\n",
        variations
    )
}

/// Render seconds without a trailing `.0` for whole values
fn format_seconds(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as i64)
    } else {
        format!("{}", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TranscriptLine;

    fn transcript() -> Transcript {
        Transcript::new(vec![
            TranscriptLine::new(0.0, 4.25, "Welcome back to the show."),
            TranscriptLine::new(4.25, 9.0, " Today we talk about rust. "),
        ])
    }

    #[test]
    fn test_selection_request_states_counts_and_bounds() {
        let constraints = Constraints::new(10.0, 30.0, 3, 2).unwrap();
        let t = transcript();
        let prompt = PromptBuilder::new(&t, "funny moments", &constraints).selection_request();

        assert!(prompt.contains("3 * 2 = 6"));
        assert!(prompt.contains("between 10s and 30s long (inclusive)"));
        assert!(prompt.contains("close to 30s"));
        assert!(prompt.contains("Never cut speech mid-sentence"));
        assert!(prompt.contains("ONLY with valid JSON"));
        assert!(prompt.contains("\"funny moments\""));
    }

    #[test]
    fn test_selection_request_renders_transcript_lines() {
        let constraints = Constraints::new(10.0, 30.0, 1, 1).unwrap();
        let t = transcript();
        let prompt = PromptBuilder::new(&t, "intro", &constraints).selection_request();

        assert!(prompt.contains("[0.00s - 4.25s] Welcome back to the show."));
        assert!(prompt.contains("[4.25s - 9.00s] Today we talk about rust."));
    }

    #[test]
    fn test_schema_lists_one_entry_per_variation() {
        let constraints = Constraints::new(10.0, 30.0, 1, 3).unwrap();
        let t = transcript();
        let prompt = PromptBuilder::new(&t, "intro", &constraints).selection_request();

        assert_eq!(prompt.matches("\"reason\": \"<string>\"").count(), 3);
        assert!(prompt.contains("\"clip_id\": 1"));
    }

    #[test]
    fn test_selection_request_is_deterministic() {
        let constraints = Constraints::new(12.5, 45.0, 2, 2).unwrap();
        let t = transcript();
        let builder = PromptBuilder::new(&t, "highlights", &constraints);

        assert_eq!(builder.selection_request(), builder.selection_request());
        assert!(builder.selection_request().contains("between 12.5s and 45s"));
    }

    #[test]
    fn test_repair_request_lists_prior_ranges() {
        let constraints = Constraints::new(10.0, 30.0, 2, 1).unwrap();
        let t = transcript();
        let accepted = vec![Candidate::new(12.0, 27.0, "earlier pick")];
        let prompt = PromptBuilder::new(&t, "highlights", &constraints).repair_request(1, &accepted);

        assert!(prompt.contains("find 1 additional unique segments"));
        assert!(prompt.contains("Do not repeat earlier timestamps"));
        assert!(prompt.contains("[12.00s - 27.00s]"));
        assert!(prompt.contains("between 10s and 30s"));
    }
}
