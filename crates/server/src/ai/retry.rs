//! Exponential backoff around a ranking gateway

use std::time::Duration;

use medifind_core::{Candidate, GatewayError, RankingEntry, RankingGateway};

/// Retries transient gateway failures with exponential backoff.
///
/// Sits outside the orchestrator: the orchestrator's deadline covers every
/// attempt and the sleeps between them, and dropping the future cancels
/// whichever is in flight.
#[derive(Clone)]
pub struct RetryingGateway<G> {
    inner: G,
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl<G> RetryingGateway<G> {
    pub fn new(inner: G, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(8),
        }
    }

    /// Delay before retry number `attempt` (0-based)
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

impl<G: RankingGateway> RankingGateway for RetryingGateway<G> {
    async fn rank(
        &self,
        symptoms: &str,
        candidates: &[Candidate],
    ) -> Result<Vec<RankingEntry>, GatewayError> {
        let mut attempt = 0;
        loop {
            match self.inner.rank(symptoms, candidates).await {
                Ok(entries) => return Ok(entries),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        error = %err,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Ranking attempt failed, retrying"
                    );
                    metrics::counter!("ranking_retries_total", "kind" => err.kind()).increment(1);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
