use anchor_lang::prelude::*;

use crate::error::DrawError;
use crate::events::WinnerCommitted;
use crate::state::{DrawSession, WinnerRecord};

/// Commits a drawn name as a winner of the active tier.
///
/// Ensures:
/// 1. There is an active tier with quota left.
/// 2. The participant exists, has not won yet, and was drawn into this tier
///    by `stop_rolling`.
///
/// When the tier reaches its quota the active index moves to the next later
/// tier with room, staying on the last one once the list is exhausted.
pub fn process_commit_winner(session: &mut DrawSession, name: &str) -> Result<WinnerRecord> {
    let prize_index = session.current_prize_index;
    let prize = session.active_tier().ok_or(DrawError::NoActiveTier)?;
    let prize_name = prize.prize_name.clone();
    let gift_name = prize.gift_name.clone();
    require!(!prize.is_full(), DrawError::QuotaExhausted);

    let participant = session
        .participant(name)
        .ok_or(DrawError::UnknownParticipant)?;
    require!(!participant.is_winner, DrawError::AlreadyWinner);
    require!(
        session.winners_of(&prize_name).iter().any(|n| n == name),
        DrawError::WinnerNotDrawn
    );

    if let Some(participant) = session.participant_mut(name) {
        participant.is_winner = true;
        participant.prize_name = Some(prize_name.clone());
    }

    let prize = &mut session.prizes[prize_index];
    prize.drawn_count += 1;
    if prize.is_full() {
        let next_index = session.next_open_tier(prize_index + 1);
        if next_index != prize_index {
            session.current_prize_index = next_index;
            msg!(
                "{} is full, moving on to {}",
                prize_name,
                session.prizes[next_index].prize_name
            );
        }
    }

    let draw_sequence = session.committed_total();
    msg!("Committed {} as winner #{} of {}", name, draw_sequence, prize_name);
    emit!(WinnerCommitted {
        prize_name: prize_name.clone(),
        winner_name: name.to_string(),
        draw_sequence,
        next_prize_index: session.current_prize_index as u32,
    });

    Ok(WinnerRecord {
        activity_id: session.activity.as_ref().map(|a| a.activity_id.clone()),
        prize_name,
        gift_name,
        participant_name: name.to_string(),
        draw_sequence,
    })
}
