use anchor_lang::prelude::*;

use crate::error::DrawError;
use crate::events::WinnerUndone;
use crate::state::{DrawSession, UndoRecord};

/// Reverts the most recent draw, committed or not, and returns its record so
/// the caller can delete whatever it persisted for it.
///
/// The active index only ever moves back, to the undone tier.
pub fn process_undo_last_winner(session: &mut DrawSession) -> Result<UndoRecord> {
    let record = session
        .undo_stack
        .pop()
        .ok_or(DrawError::EmptyUndoHistory)?;

    if let Some(names) = session.winners.get_mut(&record.prize_name) {
        // Last occurrence by name.
        if let Some(position) = names.iter().rposition(|n| n == &record.winner_name) {
            names.remove(position);
        }
        if names.is_empty() {
            session.winners.remove(&record.prize_name);
        }
    }

    if let Some(participant) = session.participant_mut(&record.winner_name) {
        participant.is_winner = false;
        participant.prize_name = None;
    }
    session.restore_to_pool(&record.winner_name);

    if let Some(prize) = session
        .prizes
        .iter_mut()
        .find(|p| p.prize_name == record.prize_name)
    {
        prize.drawn_count = record.drawn_count_before;
    }

    let prize_index = record.prize_index as usize;
    if prize_index < session.current_prize_index {
        session.current_prize_index = prize_index;
    }

    msg!("Undid {} from {}", record.winner_name, record.prize_name);
    emit!(WinnerUndone {
        prize_name: record.prize_name.clone(),
        winner_name: record.winner_name.clone(),
        restored_drawn_count: record.drawn_count_before,
        prize_index: session.current_prize_index as u32,
    });

    Ok(record)
}
