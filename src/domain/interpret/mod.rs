//! Interpretation of the AI collaborator's free-form answer
//!
//! The answer is expected to hold a JSON document shaped like
//! `{"clips":[{"clip_id":1,"variations":[{"start":..,"end":..,"reason":..}]}]}`
//! but is frequently wrapped in prose or Markdown fences. Decoding is tried
//! on the whole text first, then on each balanced top-level `{...}`/`[...]`
//! block in order of appearance. Scanning stops at the first top-level block
//! that never closes. Nothing is salvaged from a block that does not decode.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::model::Candidate;

/// Why an answer produced no candidates
#[derive(Debug, Error)]
pub enum InterpretationError {
    #[error("response is empty")]
    Empty,

    #[error("no JSON structure found in response")]
    NoStructure,

    #[error("response does not match the selection schema: {0}")]
    Schema(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Wrapped { clips: Vec<RawGroup> },
    Bare(Vec<RawGroup>),
}

impl Payload {
    fn into_groups(self) -> Vec<RawGroup> {
        match self {
            Payload::Wrapped { clips } => clips,
            Payload::Bare(clips) => clips,
        }
    }
}

/// A clip group, or a flat entry when `variations` is absent
#[derive(Deserialize)]
struct RawGroup {
    #[serde(default)]
    clip_id: Value,
    #[serde(default)]
    variations: Option<Vec<RawVariation>>,
    #[serde(default)]
    start: Value,
    #[serde(default)]
    end: Value,
    #[serde(default)]
    reason: Value,
}

#[derive(Deserialize)]
struct RawVariation {
    #[serde(default)]
    start: Value,
    #[serde(default)]
    end: Value,
    #[serde(default)]
    reason: Value,
}

/// Parser for selection answers
pub struct ResponseInterpreter;

impl ResponseInterpreter {
    /// Flatten every group's every variation into candidates, in order
    pub fn interpret(raw: &str) -> Result<Vec<Candidate>, InterpretationError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(InterpretationError::Empty);
        }

        let payload = Self::decode(text)?;
        Ok(Self::flatten(payload.into_groups()))
    }

    fn decode(text: &str) -> Result<Payload, InterpretationError> {
        let strict_error = match serde_json::from_str::<Payload>(text) {
            Ok(payload) => return Ok(payload),
            Err(e) => e,
        };

        let mut found_block = false;
        let mut rest = text;
        while let Some((block, after)) = next_balanced_block(rest) {
            found_block = true;
            if let Ok(payload) = serde_json::from_str::<Payload>(block) {
                return Ok(payload);
            }
            rest = after;
        }

        if found_block {
            Err(InterpretationError::Schema(strict_error))
        } else {
            Err(InterpretationError::NoStructure)
        }
    }

    fn flatten(groups: Vec<RawGroup>) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for group in groups {
            let clip_id = group.clip_id.as_i64();
            match group.variations {
                Some(variations) => {
                    candidates.extend(variations.into_iter().map(|v| {
                        Candidate::new(number(&v.start), number(&v.end), text(&v.reason))
                            .with_source_clip(clip_id)
                    }));
                }
                None if !group.start.is_null() || !group.end.is_null() => {
                    candidates.push(
                        Candidate::new(
                            number(&group.start),
                            number(&group.end),
                            text(&group.reason),
                        )
                        .with_source_clip(clip_id),
                    );
                }
                None => {}
            }
        }

        candidates
    }
}

/// Non-numeric timestamps become NaN so validation rejects them
fn number(value: &Value) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

fn text(value: &Value) -> String {
    value.as_str().unwrap_or_default().trim().to_string()
}

/// Find the next balanced top-level block and the text after it
///
/// Only the first opener in `text` is considered. Bracket matching skips
/// string literals and escapes. An opener that never closes, or closes with
/// the wrong bracket, ends the scan: inner blocks of a truncated answer are
/// never returned.
fn next_balanced_block(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(|b| *b == b'{' || *b == b'[')?;
    let end = matching_close(bytes, start)?;
    Some((&text[start..=end], &text[end + 1..]))
}

fn matching_close(bytes: &[u8], start: usize) -> Option<usize> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (index, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => stack.push(byte),
            b'}' | b']' => {
                let open = stack.pop()?;
                let expected = if open == b'{' { b'}' } else { b']' };
                if byte != expected {
                    return None;
                }
                if stack.is_empty() {
                    return Some(index);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_around_empty_clips_is_not_an_error() {
        let candidates = ResponseInterpreter::interpret("noise {\"clips\":[]} noise").unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_two_groups_three_variations_flatten_in_order() {
        let raw = r#"{"clips":[
            {"clip_id":1,"variations":[
                {"start":0,"end":10,"reason":"1a"},
                {"start":1,"end":11,"reason":"1b"},
                {"start":2,"end":12,"reason":"1c"}]},
            {"clip_id":2,"variations":[
                {"start":20,"end":30,"reason":"2a"},
                {"start":21,"end":31,"reason":"2b"},
                {"start":22,"end":32,"reason":"2c"}]}
        ]}"#;

        let candidates = ResponseInterpreter::interpret(raw).unwrap();
        let reasons: Vec<_> = candidates.iter().map(|c| c.reason.as_str()).collect();

        assert_eq!(reasons, vec!["1a", "1b", "1c", "2a", "2b", "2c"]);
        assert_eq!(candidates[0].source_clip_id, Some(1));
        assert_eq!(candidates[5].source_clip_id, Some(2));
        assert_eq!(candidates[4].start, 21.0);
    }

    #[test]
    fn test_markdown_fenced_answer() {
        let raw = "Sure! Here you go:\n```json\n{\"clips\":[{\"clip_id\":7,\"variations\":[{\"start\":3.5,\"end\":20.25,\"reason\":\"intro {not json}\"}]}]}\n```\nEnjoy.";
        let candidates = ResponseInterpreter::interpret(raw).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].start, 3.5);
        assert_eq!(candidates[0].end, 20.25);
        assert_eq!(candidates[0].reason, "intro {not json}");
        assert_eq!(candidates[0].source_clip_id, Some(7));
    }

    #[test]
    fn test_flat_entries_and_bare_array() {
        let raw = r#"[{"start": 5, "end": 25, "reason": "flat"}]"#;
        let candidates = ResponseInterpreter::interpret(raw).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].reason, "flat");
        assert_eq!(candidates[0].source_clip_id, None);
    }

    #[test]
    fn test_skips_unrelated_leading_block() {
        let raw = r#"Note [draft] -> {"clips":[{"start":1,"end":15,"reason":"x"}]}"#;
        let candidates = ResponseInterpreter::interpret(raw).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_non_numeric_timestamps_survive_as_nan() {
        let raw = r#"{"clips":[{"clip_id":1,"variations":[{"start":"abc","end":12}]}]}"#;
        let candidates = ResponseInterpreter::interpret(raw).unwrap();

        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].start.is_nan());
        assert_eq!(candidates[0].reason, "");
    }

    #[test]
    fn test_total_failure_modes() {
        assert!(matches!(
            ResponseInterpreter::interpret("   "),
            Err(InterpretationError::Empty)
        ));
        assert!(matches!(
            ResponseInterpreter::interpret("I could not find anything."),
            Err(InterpretationError::NoStructure)
        ));
        assert!(matches!(
            ResponseInterpreter::interpret("{\"clips\": [{\"start\": 1, "),
            Err(InterpretationError::NoStructure)
        ));
        assert!(matches!(
            ResponseInterpreter::interpret("here {\"answer\": 42}"),
            Err(InterpretationError::Schema(_))
        ));
    }

    #[test]
    fn test_truncated_answer_is_not_salvaged() {
        let raw = r#"{"clips":[{"clip_id":1,"variations":[{"start":10,"end":30,"reason":"a"}]}]"#;
        assert!(matches!(
            ResponseInterpreter::interpret(raw),
            Err(InterpretationError::NoStructure)
        ));

        let after_prose = r#"Here: [{"start":10,"end":30,"reason":"a"}"#;
        assert!(ResponseInterpreter::interpret(after_prose).is_err());
    }

    #[test]
    fn test_unclosed_block_stops_the_scan() {
        assert!(next_balanced_block(r#"{"clips": [1, 2]"#).is_none());
        assert!(next_balanced_block("[draft} {\"clips\":[]}").is_none());
    }

    #[test]
    fn test_balanced_block_ignores_brackets_in_strings() {
        let text = r#"x {"a": "}]\"{"} y"#;
        let (block, rest) = next_balanced_block(text).unwrap();
        assert_eq!(block, r#"{"a": "}]\"{"}"#);
        assert_eq!(rest, " y");
    }
}
