use anchor_lang::prelude::*;

use crate::events::DrawReset;
use crate::state::DrawSession;

/// Returns the session to its pre-draw state. Activity, tiers and roster are
/// kept; everything the draw produced is cleared.
pub fn process_reset_draw(session: &mut DrawSession) {
    session.ticker.cancel();
    session.rolling_name = None;
    session.winners.clear();
    session.undo_stack.clear();

    for participant in session.participants.iter_mut() {
        participant.is_winner = false;
        participant.prize_name = None;
    }
    for prize in session.prizes.iter_mut() {
        prize.drawn_count = 0;
    }
    session.remaining = session
        .participants
        .iter()
        .map(|p| p.name.clone())
        .collect();
    // Index 0 unless the first tiers have a zero quota.
    session.recompute_prize_index();

    msg!("Draw reset, {} participants back in the pool", session.remaining.len());
    emit!(DrawReset {
        activity_id: session.activity.as_ref().map(|a| a.activity_id.clone()),
        participant_count: session.participants.len() as u32,
    });
}
