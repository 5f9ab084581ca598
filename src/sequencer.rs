//! Ordered execution of dependent steps.
//!
//! Steps of a scenario are not independent: a login step produces the
//! token a later step authenticates with. The [`Sequencer`] hands every
//! registered step a unique, increasing index so the runner executes them
//! exactly in the order they were declared.
use crate::api_client::ApiClientError;
use crate::utils::error_chain_fmt;
use std::future::Future;
use std::pin::Pin;

pub type StepFuture<'a> = Pin<Box<dyn Future<Output = Result<(), StepError>> + 'a>>;

/// A step borrows the shared context mutably for as long as it runs.
pub type StepFn<C> = for<'a> fn(&'a mut C) -> StepFuture<'a>;

#[derive(thiserror::Error)]
pub enum StepError {
    #[error("{0}")]
    Expectation(String),
    #[error("No earlier step produced the {0}.")]
    MissingState(&'static str),
    #[error("The request to the account API failed.")]
    Client(#[from] ApiClientError),
}

impl std::fmt::Debug for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub struct Step<C> {
    pub index: usize,
    pub name: &'static str,
    run: StepFn<C>,
}

impl<C> Step<C> {
    pub fn run<'a>(&self, context: &'a mut C) -> StepFuture<'a> {
        (self.run)(context)
    }
}

impl<C> std::fmt::Debug for Step<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("index", &self.index)
            .field("name", &self.name)
            .finish()
    }
}

pub struct Sequencer<C> {
    next_index: usize,
    steps: Vec<Step<C>>,
}

impl<C> Default for Sequencer<C> {
    fn default() -> Self {
        Self {
            next_index: 0,
            steps: Vec::new(),
        }
    }
}

impl<C> Sequencer<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `run` under the next free index and return that index.
    pub fn register(&mut self, name: &'static str, run: StepFn<C>) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        self.steps.push(Step { index, name, run });
        index
    }

    pub fn then(mut self, name: &'static str, run: StepFn<C>) -> Self {
        self.register(name, run);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The registered steps in execution order.
    pub fn into_plan(self) -> Vec<Step<C>> {
        let mut steps = self.steps;
        steps.sort_by_key(|step| step.index);
        steps
    }
}

/// Build a [`Sequencer`] from async step functions, in the order written.
///
/// ```ignore
/// let sequencer = ordered_steps![AccountContext; login_as_guardian, get_guardian_id];
/// ```
#[macro_export]
macro_rules! ordered_steps {
    ($context:ty; $($step:ident),+ $(,)?) => {{
        let mut sequencer = $crate::sequencer::Sequencer::<$context>::new();
        $(
            sequencer.register(stringify!($step), |context| Box::pin($step(context)));
        )+
        sequencer
    }};
}
