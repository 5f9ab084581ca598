use crate::configuration::RunnerSettings;
use crate::sequencer::Step;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Passed,
    Failed { reason: String },
    Skipped,
}

#[derive(Debug, serde::Serialize)]
pub struct StepReport {
    pub index: usize,
    pub name: &'static str,
    pub outcome: StepOutcome,
    pub elapsed_milliseconds: Option<u64>,
}

#[derive(Debug, serde::Serialize)]
pub struct RunReport {
    pub scenario: &'static str,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    fn count(&self, matches: impl Fn(&StepOutcome) -> bool) -> usize {
        self.steps.iter().filter(|step| matches(&step.outcome)).count()
    }

    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, StepOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, StepOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, StepOutcome::Skipped))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped() == 0
    }

    pub fn step(&self, name: &str) -> Option<&StepReport> {
        self.steps.iter().find(|step| step.name == name)
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "scenario {}", self.scenario)?;
        for step in &self.steps {
            match &step.outcome {
                StepOutcome::Passed => writeln!(f, "  [{:>2}] ok      {}", step.index, step.name)?,
                StepOutcome::Skipped => writeln!(f, "  [{:>2}] skipped {}", step.index, step.name)?,
                StepOutcome::Failed { reason } => {
                    writeln!(f, "  [{:>2}] FAILED  {}: {}", step.index, step.name, reason)?
                }
            }
        }
        write!(
            f,
            "{} passed, {} failed, {} skipped",
            self.passed(),
            self.failed(),
            self.skipped()
        )
    }
}

/// Executes a plan strictly one step after the other.
///
/// A failing step does not stop the run unless `fail_fast` is set; later
/// steps that needed its output fail on their own with a missing-state error.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    fail_fast: bool,
}

impl ScenarioRunner {
    pub fn new(fail_fast: bool) -> Self {
        Self { fail_fast }
    }

    pub fn from_settings(settings: &RunnerSettings) -> Self {
        Self::new(settings.fail_fast)
    }

    #[tracing::instrument(
        name = "Running scenario",
        skip(self, plan, context),
        fields(run_id = %Uuid::new_v4(), steps = plan.len())
    )]
    pub async fn run<C>(
        &self,
        scenario: &'static str,
        plan: Vec<Step<C>>,
        context: &mut C,
    ) -> RunReport {
        let mut steps = Vec::with_capacity(plan.len());
        let mut aborted = false;
        for step in &plan {
            if aborted {
                steps.push(StepReport {
                    index: step.index,
                    name: step.name,
                    outcome: StepOutcome::Skipped,
                    elapsed_milliseconds: None,
                });
                continue;
            }

            let span = tracing::info_span!(
                "Running step",
                step_index = step.index,
                step_name = step.name
            );
            let started = Instant::now();
            let result = step.run(context).instrument(span.clone()).await;
            let elapsed = started.elapsed();

            let outcome = match result {
                Ok(()) => {
                    tracing::info!(
                        parent: &span,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Step passed"
                    );
                    StepOutcome::Passed
                }
                Err(e) => {
                    tracing::error!(
                        parent: &span,
                        error.cause_chain = ?e,
                        error.message = %e,
                        "Step failed"
                    );
                    aborted = self.fail_fast;
                    StepOutcome::Failed {
                        reason: format!("{:#}", anyhow::Error::from(e)),
                    }
                }
            };
            steps.push(StepReport {
                index: step.index,
                name: step.name,
                outcome,
                elapsed_milliseconds: Some(elapsed.as_millis() as u64),
            });
        }

        RunReport { scenario, steps }
    }
}
