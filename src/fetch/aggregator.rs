//! Profile aggregation.
//!
//! Fires the account-summary and repository requests together, waits for
//! both, and reports a single outcome. Either request failing fails the
//! whole fetch; there is no partial result and no retry.

use crate::fetch::{FetchError, ProfileSource};
use crate::models::FetchOutcome;
use futures::future::try_join;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Fetches one account's profile and repositories.
pub struct ProfileAggregator<S: ?Sized> {
    source: Arc<S>,
    handle: String,
}

impl<S> ProfileAggregator<S>
where
    S: ProfileSource + ?Sized + 'static,
{
    /// Create an aggregator for `handle`, which must not be blank.
    pub fn new(source: Arc<S>, handle: impl Into<String>) -> Result<Self, FetchError> {
        let handle = handle.into().trim().to_string();
        if handle.is_empty() {
            return Err(FetchError::InvalidHandle);
        }
        Ok(Self { source, handle })
    }

    /// The account being fetched.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Run both requests concurrently and fold them into one outcome.
    pub async fn fetch(&self) -> FetchOutcome {
        let handle = self.handle.as_str();
        info!("Fetching profile and repositories for {}", handle);

        let joined = try_join(
            self.source.account_summary(handle),
            self.source.repositories(handle),
        )
        .await;

        match joined {
            Ok((summary, repos)) => {
                info!("Fetched {} with {} repositories", summary.handle, repos.len());
                FetchOutcome::Success { summary, repos }
            }
            Err(cause) => {
                error!(
                    kind = cause.kind(),
                    "Activity fetch for {} failed: {}",
                    handle,
                    cause.cause_chain()
                );
                FetchOutcome::Failure { cause }
            }
        }
    }

    /// Start a new activation: spawn the fetch and hand back its state.
    ///
    /// Must be called from within a tokio runtime.
    pub fn activate(&self) -> Activation {
        let (tx, rx) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let handle = self.handle.clone();

        let task = tokio::spawn(async move {
            let aggregator = ProfileAggregator { source, handle };
            let outcome = aggregator.fetch().await;
            publish(tx, outcome)
        });

        Activation {
            state: FetchOutcome::Loading,
            pending: Some(rx),
            task,
        }
    }
}

/// Deliver an outcome to its activation, unless the activation is gone.
fn publish(tx: oneshot::Sender<FetchOutcome>, outcome: FetchOutcome) -> bool {
    let label = outcome.label();
    match tx.send(outcome) {
        Ok(()) => {
            debug!("Delivered {} outcome", label);
            true
        }
        Err(_) => {
            debug!("Activation ended before the fetch settled; dropping {} outcome", label);
            false
        }
    }
}

/// State owned by one activation of the activity view.
///
/// Holds `Loading` until the spawned fetch reports back, then the final
/// outcome. Dropping the activation discards any late result.
pub struct Activation {
    state: FetchOutcome,
    pending: Option<oneshot::Receiver<FetchOutcome>>,
    task: JoinHandle<bool>,
}

impl Activation {
    /// Current state without waiting.
    pub fn current(&mut self) -> &FetchOutcome {
        if let Some(rx) = self.pending.as_mut() {
            match rx.try_recv() {
                Ok(outcome) => self.settle_with(outcome),
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => self.settle_with(FetchOutcome::Failure {
                    cause: FetchError::Interrupted,
                }),
            }
        }
        &self.state
    }

    /// Wait until the fetch settles and return the final outcome.
    pub async fn settle(&mut self) -> &FetchOutcome {
        if let Some(rx) = self.pending.as_mut() {
            let outcome = rx.await.unwrap_or(FetchOutcome::Failure {
                cause: FetchError::Interrupted,
            });
            self.settle_with(outcome);
        }
        &self.state
    }

    /// Wait for the final outcome and take ownership of it.
    pub async fn into_outcome(mut self) -> FetchOutcome {
        self.settle().await;
        std::mem::take(&mut self.state)
    }

    /// End the activation early.
    ///
    /// The in-flight fetch keeps running; the returned handle resolves to
    /// whether its result was delivered (always `false` once deactivated,
    /// unless it had already been sent).
    pub fn deactivate(self) -> JoinHandle<bool> {
        let Activation { task, .. } = self;
        task
    }

    fn settle_with(&mut self, outcome: FetchOutcome) {
        self.pending = None;
        self.state = outcome;
    }
}
