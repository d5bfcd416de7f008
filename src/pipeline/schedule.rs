//! Daily scheduler loop.

use chrono::Utc;
use chrono_tz::Tz;

use crate::error::{AppError, Result};
use crate::models::SyncOutcome;
use crate::pipeline::sync::{SyncContext, run_sync};
use crate::utils::time::{next_midnight, until};

/// Run a single pass using the current time in the reference timezone.
pub async fn run_once(ctx: &SyncContext<'_>) -> Result<SyncOutcome> {
    let tz = ctx.config.source.timezone()?;
    run_sync(ctx, Utc::now().with_timezone(&tz)).await
}

/// Run a pass, sleep until the next local midnight, and repeat forever.
///
/// Missed midnights are not caught up; the next run is always the first
/// midnight after the current pass finishes. A failed pass ends the loop
/// unless `pipeline.exit_on_error` is off.
pub async fn run_forever(ctx: &SyncContext<'_>) -> Result<()> {
    let tz: Tz = ctx.config.source.timezone()?;
    let exit_on_error = ctx.config.pipeline.exit_on_error;

    loop {
        let pass = run_sync(ctx, Utc::now().with_timezone(&tz)).await;
        settle_pass(pass, exit_on_error)?;

        let now = Utc::now().with_timezone(&tz);
        let wake = next_midnight(now)
            .ok_or_else(|| AppError::config("cannot compute the next local midnight"))?;
        log::info!("Sleeping until {}", wake.to_rfc3339());
        tokio::time::sleep(until(now, wake)).await;
    }
}

/// Decide whether the daily loop survives a pass.
///
/// A failed pass is returned as-is when `exit_on_error` is set, otherwise it
/// is logged and the loop waits for the next midnight.
fn settle_pass(pass: Result<SyncOutcome>, exit_on_error: bool) -> Result<()> {
    match pass {
        Ok(outcome) => {
            log::info!(
                "Daily sync finished: {} of {} listed events published",
                outcome.published.len(),
                outcome.candidate_total
            );
            Ok(())
        }
        Err(e) if exit_on_error => Err(e),
        Err(e) => {
            log::error!("Daily sync failed: {e}");
            Ok(())
        }
    }
}
