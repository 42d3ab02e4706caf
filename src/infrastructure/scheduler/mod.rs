use crate::domain::quota::{QuotaLedger, QuotaLedgerApi};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Zeroes every key counter at 00:00 UTC each day
pub struct KeyResetScheduler {
    quota_ledger: Arc<QuotaLedger>,
    cancel: CancellationToken,
}

impl KeyResetScheduler {
    pub fn new(quota_ledger: Arc<QuotaLedger>, cancel: CancellationToken) -> Self {
        Self {
            quota_ledger,
            cancel,
        }
    }

    /// Run until the token is cancelled. Meant to be spawned.
    pub async fn run(self) {
        tracing::info!("Key reset scheduler started");

        loop {
            let wait = until_next_midnight(Utc::now());
            tracing::debug!(wait_secs = wait.as_secs(), "Next key reset scheduled");

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("Key reset scheduler stopped");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    match self.quota_ledger.reset_all().await {
                        Ok(count) => tracing::info!(keys_reset = count, "Daily key reset completed"),
                        // Retried at the next midnight
                        Err(e) => tracing::error!(error = %e, "Daily key reset failed"),
                    }
                }
            }
        }
    }
}

/// Time left until the next 00:00 UTC, never zero
pub fn until_next_midnight(now: DateTime<Utc>) -> std::time::Duration {
    let tomorrow = now + Duration::days(1);
    let next_midnight = tomorrow
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or(tomorrow);

    (next_midnight - now)
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(1))
        .max(std::time::Duration::from_secs(1))
}
