use crate::catalog::PipelineCatalog;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// What the simulator decided for one step: how long it "ran", what it
/// printed, and whether it failed.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub delay: Duration,
    pub output: String,
    pub failed: bool,
}

/// Draws step durations, synthetic output, and pass/fail verdicts from a
/// single seedable RNG. With a fixed seed the whole simulation replays
/// identically.
pub struct StepSimulator {
    catalog: Arc<PipelineCatalog>,
    rng: Mutex<ChaCha20Rng>,
}

impl StepSimulator {
    pub fn new(catalog: Arc<PipelineCatalog>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self {
            catalog,
            rng: Mutex::new(rng),
        }
    }

    pub fn simulate(&self, step: &str) -> StepOutcome {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let (tmin, tmax) = self.catalog.duration_range(step);
        let delay_s = if tmax > tmin {
            rng.gen_range(tmin..=tmax)
        } else {
            tmin
        };

        let output = Self::step_output(step, &mut rng);

        let fail_prob = self.catalog.failure_probability(step).clamp(0.0, 1.0);
        let failed = rng.gen_bool(fail_prob);

        StepOutcome {
            delay: Duration::from_secs_f64(delay_s.max(0.0)),
            output,
            failed,
        }
    }

    fn step_output(step: &str, rng: &mut ChaCha20Rng) -> String {
        match step {
            "lint" => "Lint: flake8 passed (0 errors)".to_string(),
            "unit-tests" => format!("Unit tests: {} passed", rng.gen_range(80..=220)),
            "integration-tests" => {
                format!("Integration tests: {} passed", rng.gen_range(25..=90))
            }
            "security-scan" => {
                // Weighted toward clean scans.
                let vulns = [0, 0, 1, 2, 3].choose(rng).copied().unwrap_or(0);
                format!("Security scan: found {} issues (sev: low/med/high mixed)", vulns)
            }
            "docker-build" => "Docker build: image tagged 'app:latest'".to_string(),
            "install-deps" => "Dependencies installed successfully".to_string(),
            "checkout" => "Checked out repository".to_string(),
            "build-artifact" => "Build artifact created: dist/app.zip".to_string(),
            step if step.starts_with("deploy") => {
                "Deploy: rollout completed, healthcheck OK".to_string()
            }
            _ => "Step completed".to_string(),
        }
    }
}
