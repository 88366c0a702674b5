// Bounded concurrent execution of independent fetch operations.
//
// Purpose
// - Keep at most `limit` upstream calls in flight while preserving input order in the output.
//
// Responsibilities
// - Return one outcome per input position.
// - Apply the configured failure policy: abort the batch on the first error, or isolate errors per position.
// - No retries. Retrying is the caller's decision.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failing operation fails the whole batch; nothing else is admitted.
    #[default]
    #[serde(alias = "abort")]
    AbortOnFirstError,
    /// Every position reports its own outcome.
    Isolate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchAborted<E> {
    pub position: usize,
    pub error: E,
}

pub type Outcomes<T, E> = Vec<Result<T, E>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedFetch {
    limit: NonZeroUsize,
    policy: FailurePolicy,
}

impl BoundedFetch {
    pub fn new(limit: NonZeroUsize, policy: FailurePolicy) -> Self {
        Self { limit, policy }
    }

    pub fn with_policy(self, policy: FailurePolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Runs `op` for every input with at most `limit` calls outstanding.
    ///
    /// `outcomes[i]` belongs to the i-th input. Under
    /// [`FailurePolicy::AbortOnFirstError`] every returned outcome is `Ok`, and
    /// the first error (by completion) is returned instead; operations still in
    /// flight are dropped and pending ones never start.
    pub async fn run<I, T, E, F, Fut>(&self, inputs: I, op: F) -> Result<Outcomes<T, E>, BatchAborted<E>>
    where
        I: IntoIterator,
        F: Fn(I::Item) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let inputs: Vec<I::Item> = inputs.into_iter().collect();
        let mut slots: Vec<Option<Result<T, E>>> =
            std::iter::repeat_with(|| None).take(inputs.len()).collect();

        let op = &op;
        let mut in_flight = stream::iter(inputs.into_iter().enumerate())
            .map(|(position, input)| async move { (position, op(input).await) })
            .buffer_unordered(self.limit.get());

        while let Some((position, outcome)) = in_flight.next().await {
            match outcome {
                Err(error) if self.policy == FailurePolicy::AbortOnFirstError => {
                    return Err(BatchAborted { position, error });
                }
                outcome => slots[position] = Some(outcome),
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
