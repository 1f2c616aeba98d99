use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_JOB: &str = "app-ci";

const FALLBACK_STEPS: [&str; 3] = ["checkout", "unit-tests", "deploy-staging"];
const DEFAULT_STEP_RANGE: (f64, f64) = (0.8, 1.8);
const DEFAULT_FAIL_PROB: f64 = 0.10;

/// Static job/step tables. Built once at startup and shared read-only with
/// the engine and simulator.
#[derive(Debug, Clone)]
pub struct PipelineCatalog {
    pipelines: HashMap<String, Vec<String>>,
    step_time: HashMap<String, (f64, f64)>,
    fail_prob: HashMap<String, f64>,
}

/// Optional catalog sections of the config file, merged over the built-in
/// tables before the catalog is frozen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogOverrides {
    #[serde(default)]
    pub pipelines: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub step_time: HashMap<String, (f64, f64)>,
    #[serde(default)]
    pub fail_prob: HashMap<String, f64>,
}

impl PipelineCatalog {
    pub fn new(
        pipelines: HashMap<String, Vec<String>>,
        step_time: HashMap<String, (f64, f64)>,
        fail_prob: HashMap<String, f64>,
    ) -> Self {
        Self {
            pipelines,
            step_time,
            fail_prob,
        }
    }

    pub fn builtin() -> Self {
        let pipelines = HashMap::from([
            (
                "app-ci".to_string(),
                vec![
                    "checkout".to_string(),
                    "install-deps".to_string(),
                    "lint".to_string(),
                    "unit-tests".to_string(),
                    "build-artifact".to_string(),
                    "deploy-staging".to_string(),
                ],
            ),
            (
                "api-ci".to_string(),
                vec![
                    "checkout".to_string(),
                    "install-deps".to_string(),
                    "unit-tests".to_string(),
                    "integration-tests".to_string(),
                    "security-scan".to_string(),
                    "docker-build".to_string(),
                    "deploy-prod".to_string(),
                ],
            ),
        ]);

        let step_time = HashMap::from([
            ("checkout".to_string(), (0.4, 0.9)),
            ("install-deps".to_string(), (0.8, 1.6)),
            ("lint".to_string(), (0.6, 1.4)),
            ("unit-tests".to_string(), (1.0, 2.5)),
            ("integration-tests".to_string(), (1.3, 3.0)),
            ("security-scan".to_string(), (1.0, 2.8)),
            ("build-artifact".to_string(), (0.8, 1.8)),
            ("docker-build".to_string(), (1.2, 3.2)),
            ("deploy-staging".to_string(), (0.9, 2.0)),
            ("deploy-prod".to_string(), (1.2, 2.6)),
        ]);

        let fail_prob = HashMap::from([
            ("checkout".to_string(), 0.01),
            ("install-deps".to_string(), 0.04),
            ("lint".to_string(), 0.10),
            ("unit-tests".to_string(), 0.12),
            ("integration-tests".to_string(), 0.18),
            ("security-scan".to_string(), 0.22),
            ("build-artifact".to_string(), 0.05),
            ("docker-build".to_string(), 0.08),
            ("deploy-staging".to_string(), 0.10),
            ("deploy-prod".to_string(), 0.16),
        ]);

        Self::new(pipelines, step_time, fail_prob)
    }

    pub fn with_overrides(mut self, overrides: CatalogOverrides) -> Self {
        self.pipelines.extend(overrides.pipelines);
        self.step_time.extend(overrides.step_time);
        self.fail_prob.extend(overrides.fail_prob);
        self
    }

    /// Ordered steps for a job. Unknown jobs degrade to a fixed fallback
    /// sequence instead of erroring.
    pub fn steps_for(&self, job: &str) -> Vec<String> {
        self.pipelines.get(job).cloned().unwrap_or_else(|| {
            FALLBACK_STEPS.iter().map(|s| s.to_string()).collect()
        })
    }

    pub fn duration_range(&self, step: &str) -> (f64, f64) {
        self.step_time
            .get(step)
            .copied()
            .unwrap_or(DEFAULT_STEP_RANGE)
    }

    pub fn failure_probability(&self, step: &str) -> f64 {
        self.fail_prob.get(step).copied().unwrap_or(DEFAULT_FAIL_PROB)
    }

    /// Known job names, sorted for a stable job picker.
    pub fn jobs(&self) -> Vec<String> {
        let mut jobs: Vec<String> = self.pipelines.keys().cloned().collect();
        jobs.sort();
        jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_job_keeps_configured_order() {
        let catalog = PipelineCatalog::builtin();
        let steps = catalog.steps_for("api-ci");
        assert_eq!(steps.first().map(String::as_str), Some("checkout"));
        assert_eq!(steps.last().map(String::as_str), Some("deploy-prod"));
        assert_eq!(steps.len(), 7);
    }

    #[test]
    fn unknown_job_falls_back_to_three_steps() {
        let catalog = PipelineCatalog::builtin();
        let steps = catalog.steps_for("no-such-job");
        assert_eq!(steps, vec!["checkout", "unit-tests", "deploy-staging"]);
    }

    #[test]
    fn unconfigured_step_uses_defaults() {
        let catalog = PipelineCatalog::builtin();
        assert_eq!(catalog.duration_range("made-up-step"), (0.8, 1.8));
        assert_eq!(catalog.failure_probability("made-up-step"), 0.10);
    }

    #[test]
    fn configured_step_uses_its_tables() {
        let catalog = PipelineCatalog::builtin();
        assert_eq!(catalog.duration_range("checkout"), (0.4, 0.9));
        assert_eq!(catalog.failure_probability("security-scan"), 0.22);
    }

    #[test]
    fn overrides_merge_over_builtin() {
        let overrides = CatalogOverrides {
            pipelines: HashMap::from([(
                "docs-ci".to_string(),
                vec!["checkout".to_string(), "build-artifact".to_string()],
            )]),
            step_time: HashMap::from([("checkout".to_string(), (0.1, 0.2))]),
            fail_prob: HashMap::from([("checkout".to_string(), 0.5)]),
        };
        let catalog = PipelineCatalog::builtin().with_overrides(overrides);

        assert_eq!(catalog.steps_for("docs-ci").len(), 2);
        assert_eq!(catalog.duration_range("checkout"), (0.1, 0.2));
        assert_eq!(catalog.failure_probability("checkout"), 0.5);
        assert_eq!(catalog.jobs(), vec!["api-ci", "app-ci", "docs-ci"]);
    }
}
