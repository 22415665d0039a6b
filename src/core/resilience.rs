use failsafe::futures::CircuitBreaker;
use failsafe::{backoff, failure_policy, Config, Error, StateMachine};
use std::future::Future;
use std::time::Duration;

/// Consecutive transport failures that open the circuit
pub const FAILURE_THRESHOLD: u32 = 5;

/// How long the circuit stays open before a trial call is let through
pub const OPEN_DURATION: Duration = Duration::from_secs(5);

/// Circuit breaker guarding the authority.
///
/// Policy:
/// - 5 consecutive failures triggers OPEN state
/// - 5 seconds cool-down period before HALF-OPEN (one trial call)
pub type AuthorityCircuitBreaker = StateMachine<
    failure_policy::ConsecutiveFailures<backoff::Constant>,
    ()
>;

/// Create a new circuit breaker with the standard policy
pub fn create_circuit_breaker() -> AuthorityCircuitBreaker {
    Config::new()
        .failure_policy(failure_policy::consecutive_failures(
            FAILURE_THRESHOLD,
            backoff::constant(OPEN_DURATION),
        ))
        .build()
}

/// Outcome of a breaker-guarded call
#[derive(Debug, PartialEq, Eq)]
pub enum Guarded<T, E> {
    Completed(T),
    Failed(E),
    /// Circuit open: the operation was not started
    Rejected,
}

/// Run `operation` once under the breaker.
///
/// `Err` results count towards opening the circuit; `Ok` results reset it.
/// Never retries.
pub async fn execute_with_cb<F, Fut, T, E>(
    cb: &AuthorityCircuitBreaker,
    operation: F,
) -> Guarded<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match cb.call(operation()).await {
        Ok(val) => Guarded::Completed(val),
        Err(Error::Inner(e)) => Guarded::Failed(e),
        Err(Error::Rejected) => Guarded::Rejected,
    }
}
