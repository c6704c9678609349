use anchor_lang::prelude::*;

use crate::error::DrawError;
use crate::events::RollingStarted;
use crate::state::DrawSession;

/// Starts the rolling animation for the active tier.
///
/// A first name is sampled right away so a `stop_rolling` issued before the
/// first tick still has a name to draw.
pub fn process_start_rolling(session: &mut DrawSession, now: u64) -> Result<()> {
    require!(!session.ticker.is_running(), DrawError::AlreadyRolling);
    require!(!session.remaining.is_empty(), DrawError::EmptyPool);
    require!(
        session.pending_winner().is_none(),
        DrawError::CommitPending
    );

    let prize = session.active_tier().ok_or(DrawError::NoActiveTier)?;
    require!(
        session.ledger_count(&prize.prize_name) < prize.total_quota as usize,
        DrawError::QuotaExhausted
    );
    let prize_name = prize.prize_name.clone();

    session.ticker.start(now);
    session.sample_rolling_name();

    emit!(RollingStarted {
        prize_name,
        pool_size: session.remaining.len() as u32,
        started_at: now,
    });

    Ok(())
}

/// Advances the rolling animation to `now`. Returns the newly displayed name
/// when a tick fell due, `None` otherwise (including when not rolling).
pub fn process_tick(session: &mut DrawSession, now: u64) -> Option<String> {
    if session.ticker.poll(now) == 0 {
        return None;
    }
    session.sample_rolling_name()
}
