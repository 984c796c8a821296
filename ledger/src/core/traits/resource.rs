use crate::core::cloud::CloudProvider;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Resource trait
///
/// Common interface for provisioning an externally-owned resource: declare
/// it idempotently, check whether it exists, and wait until the backing
/// service reports it serviceable. Implementations only observe and request;
/// state transitions are driven entirely by the service.
#[async_trait]
pub trait Resource: Send + Sync {
    type SetupResult: Send + Sync;
    type SetupArgs: Send + Sync;
    type CheckArgs: Send + Sync;
    type Error: Send + Sync;

    /// create_setup - build an instance bound to the given cloud provider
    async fn create_setup(provider: Arc<CloudProvider>) -> Result<Self, Self::Error>
    where
        Self: Sized;

    /// setup - declare the resource: create it if absent, otherwise make
    /// sure its definition matches. Must be safe to call concurrently.
    async fn setup(&self, args: &Self::SetupArgs) -> Result<Self::SetupResult, Self::Error>;

    /// check - Check if the resource exists
    async fn check_if_exists(&self, args: &Self::CheckArgs) -> Result<bool, Self::Error>;

    /// ready - Check if the resource is created and ready to use
    async fn is_ready_to_use(&self, args: &Self::SetupArgs) -> Result<bool, Self::Error>;

    /// poll - Re-check readiness until it holds, sleeping `interval` between
    /// checks. Returns `Ok(false)` when `deadline` elapses first; with no
    /// deadline the wait is unbounded and cancellation is the caller's job.
    /// Check failures propagate instead of masquerading as "not ready".
    async fn poll(
        &self,
        args: &Self::SetupArgs,
        interval: Duration,
        deadline: Option<Duration>,
    ) -> Result<bool, Self::Error> {
        let started = tokio::time::Instant::now();
        loop {
            if self.is_ready_to_use(args).await? {
                return Ok(true);
            }
            if let Some(deadline) = deadline {
                if started.elapsed() >= deadline {
                    return Ok(false);
                }
            }
            tokio::time::sleep(interval).await;
        }
    }
}
