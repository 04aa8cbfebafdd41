//! Checkpoint-based intent verification
//!
//! A checkpoint names the movement intent the engine should hold at a given
//! scenario time, optionally with its destination or followed entity.

use serde::{Deserialize, Serialize};
use warden_core::engine::MovementIntent;
use warden_core::geometry::Vec3;

/// Expected intent at a checkpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectation {
    /// Scenario time in milliseconds when to check
    pub at_ms: u64,

    /// `none`, `stop`, `move_to` or `follow`
    pub intent: String,

    /// Expected destination of a `move_to`
    #[serde(default)]
    pub point: Option<Vec3>,

    /// Expected entity of a `follow`
    #[serde(default)]
    pub entity_id: Option<u64>,

    /// Distance tolerance for `point` (scenario default when omitted)
    #[serde(default)]
    pub tolerance: Option<f32>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Result of verifying a single checkpoint
#[derive(Debug, Clone)]
pub struct CheckpointResult {
    pub checkpoint_idx: usize,
    pub at_ms: u64,
    pub description: Option<String>,
    pub passed: bool,
    pub failures: Vec<String>,
}

/// Overall verification result
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub checkpoints_passed: u32,
    pub checkpoints_total: u32,
    pub results: Vec<CheckpointResult>,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.checkpoints_passed == self.checkpoints_total
    }
}

/// Verifies engine intents against expected checkpoints
#[derive(Debug)]
pub struct CheckpointVerifier {
    expectations: Vec<Expectation>,
    default_tolerance: f32,
    current_checkpoint_idx: usize,
    results: Vec<CheckpointResult>,
}

impl CheckpointVerifier {
    /// `expectations` must be sorted by `at_ms`
    pub fn new(expectations: Vec<Expectation>, default_tolerance: f32) -> Self {
        Self {
            expectations,
            default_tolerance,
            current_checkpoint_idx: 0,
            results: Vec::new(),
        }
    }

    /// Verify the next checkpoint if `elapsed_ms` has reached it. Call
    /// repeatedly until `None` to drain checkpoints sharing a tick.
    pub fn check_time(
        &mut self,
        elapsed_ms: u64,
        intent: &MovementIntent,
    ) -> Option<CheckpointResult> {
        let checkpoint = self.expectations.get(self.current_checkpoint_idx)?;
        if elapsed_ms < checkpoint.at_ms {
            return None;
        }

        let mut failures = Vec::new();

        if intent.kind() != checkpoint.intent {
            failures.push(format!(
                "expected intent '{}' but engine holds '{}'",
                checkpoint.intent, intent
            ));
        }

        if let Some(expected) = checkpoint.point {
            let tolerance = checkpoint.tolerance.unwrap_or(self.default_tolerance);
            match intent {
                MovementIntent::MoveTo { point, .. } => {
                    let off = point.distance_2d(expected);
                    if off > tolerance {
                        failures.push(format!(
                            "destination {} is {:.2} from expected {} (tolerance {:.2})",
                            point, off, expected, tolerance
                        ));
                    }
                }
                _ => failures.push(format!("expected a destination near {}", expected)),
            }
        }

        if let Some(expected) = checkpoint.entity_id {
            match intent {
                MovementIntent::Follow { entity_id, .. } if *entity_id == expected => {}
                _ => failures.push(format!("expected to follow entity {}", expected)),
            }
        }

        let result = CheckpointResult {
            checkpoint_idx: self.current_checkpoint_idx,
            at_ms: checkpoint.at_ms,
            description: checkpoint.description.clone(),
            passed: failures.is_empty(),
            failures,
        };

        self.results.push(result.clone());
        self.current_checkpoint_idx += 1;

        Some(result)
    }

    /// Get final verification result. Checkpoints never reached count as
    /// failures.
    pub fn finalize(mut self) -> VerificationResult {
        for (idx, missed) in self
            .expectations
            .iter()
            .enumerate()
            .skip(self.current_checkpoint_idx)
        {
            self.results.push(CheckpointResult {
                checkpoint_idx: idx,
                at_ms: missed.at_ms,
                description: missed.description.clone(),
                passed: false,
                failures: vec!["checkpoint never reached".to_string()],
            });
        }

        let passed = self.results.iter().filter(|r| r.passed).count() as u32;
        VerificationResult {
            checkpoints_passed: passed,
            checkpoints_total: self.results.len() as u32,
            results: self.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect(at_ms: u64, intent: &str) -> Expectation {
        Expectation {
            at_ms,
            intent: intent.to_string(),
            point: None,
            entity_id: None,
            tolerance: None,
            description: None,
        }
    }

    #[test]
    fn test_checkpoint_pass() {
        let mut follow = expect(1500, "follow");
        follow.entity_id = Some(2);
        let mut verifier = CheckpointVerifier::new(vec![expect(500, "none"), follow], 0.5);

        assert!(verifier.check_time(400, &MovementIntent::None).is_none());
        assert!(verifier.check_time(500, &MovementIntent::None).unwrap().passed);

        let intent = MovementIntent::Follow {
            entity_id: 2,
            distance: 2.0,
        };
        let r = verifier.check_time(1500, &intent).unwrap();
        assert!(r.passed, "Failures: {:?}", r.failures);
        assert!(verifier.finalize().passed());
    }

    #[test]
    fn test_checkpoint_fail_wrong_point() {
        let mut moving = expect(100, "move_to");
        moving.point = Some(Vec3::new(10.0, 0.0, 0.0));
        let mut verifier = CheckpointVerifier::new(vec![moving], 0.5);

        let intent = MovementIntent::MoveTo {
            point: Vec3::new(11.0, 0.0, 0.0),
            tolerance: 0.5,
        };
        let r = verifier.check_time(100, &intent).unwrap();
        assert!(!r.passed);
        assert!(r.failures.iter().any(|f| f.contains("from expected")));
    }

    #[test]
    fn test_checkpoint_fail_wrong_kind() {
        let mut verifier = CheckpointVerifier::new(vec![expect(0, "stop")], 0.5);
        let r = verifier.check_time(0, &MovementIntent::None).unwrap();
        assert!(!r.passed);
        assert!(r.failures[0].contains("expected intent 'stop'"));
    }

    #[test]
    fn test_unreached_checkpoint_fails() {
        let verifier = CheckpointVerifier::new(vec![expect(9000, "none")], 0.5);
        let result = verifier.finalize();
        assert!(!result.passed());
        assert_eq!(result.checkpoints_total, 1);
    }
}
