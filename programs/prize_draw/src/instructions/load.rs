use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::error::DrawError;
use crate::events::SnapshotLoaded;
use crate::snapshot::{sort_prizes, validate_draw_data, DrawSnapshot, WinnerEntry};
use crate::state::{DrawSession, Participant, PrizeTier};

/// Merges a snapshot into the session.
///
/// Steps performed:
/// 1. Convert the snapshot parts that are present (prizes sorted by
///    descending level, winner entries reduced to names).
/// 2. Merge them over the current state and validate the result.
/// 3. Store the merged parts, rebuild the remaining pool if the roster
///    changed, and recompute the active tier if prizes or winners changed.
///
/// Nothing is stored when validation fails. Loading is refused while rolling
/// and while a drawn name awaits its commit.
pub fn process_load(session: &mut DrawSession, snapshot: DrawSnapshot) -> Result<()> {
    require!(!session.ticker.is_running(), DrawError::RollingInProgress);
    if let Some(name) = session.pending_winner() {
        msg!("Cannot load while {} awaits commit", name);
        return err!(DrawError::CommitPending);
    }

    let DrawSnapshot {
        activity,
        prizes,
        participants,
        winners,
    } = snapshot;

    let new_prizes = prizes
        .map(|infos| {
            let mut tiers = infos
                .into_iter()
                .map(PrizeTier::try_from)
                .collect::<Result<Vec<_>>>()?;
            sort_prizes(&mut tiers);
            Ok::<_, anchor_lang::error::Error>(tiers)
        })
        .transpose()?;
    let new_participants =
        participants.map(|infos| infos.into_iter().map(Participant::from).collect::<Vec<_>>());
    let new_winners: Option<BTreeMap<String, Vec<String>>> = winners.map(|ledger| {
        ledger
            .into_iter()
            .map(|(prize_name, entries)| {
                let names = entries.into_iter().map(WinnerEntry::into_name).collect();
                (prize_name, names)
            })
            .collect()
    });

    let roster_changed = new_participants.is_some();
    let tiers_changed = new_prizes.is_some() || new_winners.is_some();

    let prizes = new_prizes.unwrap_or_else(|| session.prizes.clone());
    let mut participants = new_participants.unwrap_or_else(|| session.participants.clone());
    let winners = new_winners.unwrap_or_else(|| session.winners.clone());

    // Older services only flag winners; take the tier from the ledger.
    for participant in participants
        .iter_mut()
        .filter(|p| p.is_winner && p.prize_name.is_none())
    {
        participant.prize_name = winners
            .iter()
            .find(|(_, names)| names.contains(&participant.name))
            .map(|(prize_name, _)| prize_name.clone());
    }

    validate_draw_data(&prizes, &participants, &winners)?;

    if let Some(activity) = activity {
        session.activity = Some(activity);
    }
    session.prizes = prizes;
    session.participants = participants;
    session.winners = winners;

    if roster_changed {
        session.remaining = session
            .participants
            .iter()
            .filter(|p| !p.is_winner)
            .map(|p| p.name.clone())
            .collect();
        session.rolling_name = None;
    }
    if tiers_changed {
        session.recompute_prize_index();
    }
    if roster_changed || tiers_changed {
        session.undo_stack.clear();
    }

    msg!(
        "Loaded {} prizes, {} participants, {} remaining",
        session.prizes.len(),
        session.participants.len(),
        session.remaining.len()
    );
    emit!(SnapshotLoaded {
        activity_id: session.activity.as_ref().map(|a| a.activity_id.clone()),
        prize_count: session.prizes.len() as u32,
        participant_count: session.participants.len() as u32,
        remaining: session.remaining.len() as u32,
        prize_index: session.current_prize_index as u32,
    });

    Ok(())
}
