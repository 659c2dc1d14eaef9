// Repair controller - Fills candidate shortfalls with bounded retries

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::domain::interpret::ResponseInterpreter;
use crate::domain::model::*;
use crate::domain::prompt::PromptBuilder;
use crate::domain::rules::*;
use crate::ports::SelectionPort;

/// Repair calls allowed after the initial selection call
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Where a run stands after a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairState {
    /// Enough accepted candidates
    Sufficient,
    /// Short by `needed`, retries left
    Deficient { needed: usize },
    /// Short by `needed`, no retries left
    Exhausted { needed: usize },
}

impl RepairState {
    pub fn evaluate(accepted: usize, expected: usize, retries_used: u32, max_retries: u32) -> Self {
        if accepted >= expected {
            RepairState::Sufficient
        } else if retries_used < max_retries {
            RepairState::Deficient {
                needed: expected - accepted,
            }
        } else {
            RepairState::Exhausted {
                needed: expected - accepted,
            }
        }
    }
}

/// Retry budget and per-call deadline
#[derive(Debug, Clone)]
pub struct RepairPolicy {
    pub max_retries: u32,
    pub call_timeout: Duration,
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            call_timeout: Duration::from_secs(60),
        }
    }
}

/// Final candidate set of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    /// Exactly `expected_total` candidates
    pub candidates: Vec<Candidate>,
    pub retries_used: u32,
    pub synthesized: usize,
}

/// Ask the collaborator once and validate the answer
///
/// Transport failures, timeouts and uninterpretable answers all yield an
/// empty outcome.
pub async fn selection_round(
    selector: &dyn SelectionPort,
    request: &str,
    call_timeout: Duration,
    constraints: &Constraints,
) -> ValidationOutcome {
    let raw = match tokio::time::timeout(call_timeout, selector.complete(request)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            warn!(collaborator = selector.name(), error = %e, "Selection call failed");
            return ValidationOutcome::default();
        }
        Err(_) => {
            warn!(
                collaborator = selector.name(),
                timeout_secs = call_timeout.as_secs_f64(),
                "Selection call timed out"
            );
            return ValidationOutcome::default();
        }
    };

    let candidates = match ResponseInterpreter::interpret(&raw) {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(error = %e, answer_chars = raw.len(), "Could not interpret selection answer");
            return ValidationOutcome::default();
        }
    };

    let outcome = CandidateValidator::validate(&candidates, constraints);
    debug!(
        accepted = outcome.accepted.len(),
        rejected = outcome.rejected.len(),
        "Validated candidates"
    );
    outcome
}

/// Drives the sufficient / deficient / exhausted state machine
pub struct RepairController {
    selector: Arc<dyn SelectionPort>,
    policy: RepairPolicy,
}

impl RepairController {
    pub fn new(selector: Arc<dyn SelectionPort>, policy: RepairPolicy) -> Self {
        Self { selector, policy }
    }

    /// Bring `accepted` to exactly `constraints.expected_total()` candidates
    ///
    /// Makes at most `policy.max_retries` collaborator calls. Newly accepted
    /// candidates are appended, so earlier picks keep their position.
    pub async fn repair(
        &self,
        builder: &PromptBuilder<'_>,
        constraints: &Constraints,
        mut accepted: Vec<Candidate>,
        synthesizer: &FallbackSynthesizer,
        rng: &mut StdRng,
    ) -> RepairOutcome {
        let expected = constraints.expected_total();
        let mut retries_used = 0;

        loop {
            match RepairState::evaluate(accepted.len(), expected, retries_used, self.policy.max_retries)
            {
                RepairState::Sufficient => {
                    accepted.truncate(expected);
                    return RepairOutcome {
                        candidates: accepted,
                        retries_used,
                        synthesized: 0,
                    };
                }
                RepairState::Deficient { needed } => {
                    retries_used += 1;
                    info!(
                        needed,
                        attempt = retries_used,
                        max_retries = self.policy.max_retries,
                        "Requesting additional candidates"
                    );

                    let request = builder.repair_request(needed, &accepted);
                    let outcome = selection_round(
                        self.selector.as_ref(),
                        &request,
                        self.policy.call_timeout,
                        constraints,
                    )
                    .await;
                    accepted.extend(outcome.accepted);
                }
                RepairState::Exhausted { needed } => {
                    warn!(
                        needed,
                        retries_used, "Retry budget exhausted, synthesizing fallback clips"
                    );
                    accepted.extend(synthesizer.synthesize(constraints, needed, rng));
                    return RepairOutcome {
                        candidates: accepted,
                        retries_used,
                        synthesized: needed,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_evaluation() {
        assert_eq!(RepairState::evaluate(2, 2, 0, 2), RepairState::Sufficient);
        assert_eq!(RepairState::evaluate(5, 2, 2, 2), RepairState::Sufficient);
        assert_eq!(
            RepairState::evaluate(1, 2, 0, 2),
            RepairState::Deficient { needed: 1 }
        );
        assert_eq!(
            RepairState::evaluate(1, 2, 1, 2),
            RepairState::Deficient { needed: 1 }
        );
        assert_eq!(
            RepairState::evaluate(0, 3, 2, 2),
            RepairState::Exhausted { needed: 3 }
        );
        assert_eq!(
            RepairState::evaluate(0, 3, 0, 0),
            RepairState::Exhausted { needed: 3 }
        );
    }
}
