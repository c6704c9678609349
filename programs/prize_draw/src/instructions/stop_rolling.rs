use anchor_lang::prelude::*;

use crate::error::DrawError;
use crate::events::WinnerDrawn;
use crate::state::{DrawSession, UndoRecord};

/// Stops rolling and draws the displayed name into the active tier.
///
/// The ticker is cancelled first, so a failed stop still ends the animation.
/// On success the name is in the ledger, out of the pool, and on top of the
/// undo stack; the participant itself is only marked by `commit_winner`.
pub fn process_stop_rolling(session: &mut DrawSession) -> Result<String> {
    require!(session.ticker.cancel(), DrawError::NotRolling);

    let prize_index = session.current_prize_index;
    let prize = session.active_tier().ok_or(DrawError::NoActiveTier)?;
    require!(
        session.ledger_count(&prize.prize_name) < prize.total_quota as usize,
        DrawError::QuotaExhausted
    );
    let prize_name = prize.prize_name.clone();
    let drawn_count_before = prize.drawn_count;

    let winner_name = match &session.rolling_name {
        Some(name) if session.remaining.contains(name) => name.clone(),
        _ => return err!(DrawError::EmptyPool),
    };

    session
        .winners
        .entry(prize_name.clone())
        .or_default()
        .push(winner_name.clone());
    session.undo_stack.push(UndoRecord {
        prize_name: prize_name.clone(),
        prize_index: prize_index as u32,
        winner_name: winner_name.clone(),
        drawn_count_before,
    });
    session.remaining.retain(|name| name != &winner_name);

    msg!("Drew {} for {}", winner_name, prize_name);
    emit!(WinnerDrawn {
        prize_name,
        prize_index: prize_index as u32,
        winner_name: winner_name.clone(),
    });

    Ok(winner_name)
}
