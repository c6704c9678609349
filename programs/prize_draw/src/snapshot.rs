use std::collections::{BTreeMap, HashSet};

use anchor_lang::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::DrawError;
use crate::state::{Activity, DrawSession, Participant, PrizeTier};

/// Input of `DrawSession::load`. Every field is optional; absent fields leave
/// the matching part of the session untouched.
#[derive(
    AnchorSerialize,
    AnchorDeserialize,
    Serialize,
    Deserialize,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct DrawSnapshot {
    pub activity: Option<Activity>,
    pub prizes: Option<Vec<PrizeInfo>>,
    pub participants: Option<Vec<ParticipantInfo>>,
    /// Tier name -> winners in draw order.
    pub winners: Option<BTreeMap<String, Vec<WinnerEntry>>>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrizeInfo {
    pub prize_id: Option<String>,
    pub prize_name: String,
    #[serde(default)]
    pub prize_level: i32,
    pub gift_name: Option<String>,
    /// Required; a tier without a quota is rejected at load.
    pub total_quota: Option<u32>,
    pub drawn_count: Option<u32>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub participant_id: Option<String>,
    pub name: String,
    pub employee_no: Option<String>,
    pub department: Option<String>,
    pub is_winner: Option<bool>,
    pub prize_name: Option<String>,
}

/// A ledger entry as the lottery service has shipped it over time: either a
/// bare name or a full winner record.
#[derive(AnchorSerialize, AnchorDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum WinnerEntry {
    Name(String),
    Record(WinnerInfo),
}

#[derive(AnchorSerialize, AnchorDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WinnerInfo {
    pub record_id: Option<String>,
    pub participant_id: Option<String>,
    pub participant_name: String,
    pub prize_name: Option<String>,
    pub gift_name: Option<String>,
    pub draw_sequence: Option<u32>,
}

impl WinnerEntry {
    pub fn into_name(self) -> String {
        match self {
            WinnerEntry::Name(name) => name,
            WinnerEntry::Record(info) => info.participant_name,
        }
    }
}

impl DrawSnapshot {
    /// Decodes the camelCase JSON served by the lottery API.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| {
            msg!("Malformed snapshot: {}", err);
            error!(DrawError::MalformedSnapshot)
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| {
            msg!("Snapshot encoding failed: {}", err);
            error!(DrawError::MalformedSnapshot)
        })
    }
}

impl TryFrom<PrizeInfo> for PrizeTier {
    type Error = anchor_lang::error::Error;

    fn try_from(info: PrizeInfo) -> Result<Self> {
        let Some(total_quota) = info.total_quota else {
            msg!("Prize {} has no total quota", info.prize_name);
            return err!(DrawError::MissingQuota);
        };

        Ok(PrizeTier {
            prize_id: info.prize_id,
            prize_name: info.prize_name,
            prize_level: info.prize_level,
            gift_name: info.gift_name,
            total_quota,
            drawn_count: info.drawn_count.unwrap_or(0),
        })
    }
}

impl From<ParticipantInfo> for Participant {
    fn from(info: ParticipantInfo) -> Self {
        let is_winner = info.is_winner.unwrap_or(false);
        Participant {
            participant_id: info.participant_id,
            name: info.name,
            employee_no: info.employee_no,
            department: info.department,
            is_winner,
            prize_name: info.prize_name.filter(|_| is_winner),
        }
    }
}

impl From<&PrizeTier> for PrizeInfo {
    fn from(prize: &PrizeTier) -> Self {
        PrizeInfo {
            prize_id: prize.prize_id.clone(),
            prize_name: prize.prize_name.clone(),
            prize_level: prize.prize_level,
            gift_name: prize.gift_name.clone(),
            total_quota: Some(prize.total_quota),
            drawn_count: Some(prize.drawn_count),
        }
    }
}

impl From<&Participant> for ParticipantInfo {
    fn from(participant: &Participant) -> Self {
        ParticipantInfo {
            participant_id: participant.participant_id.clone(),
            name: participant.name.clone(),
            employee_no: participant.employee_no.clone(),
            department: participant.department.clone(),
            is_winner: Some(participant.is_winner),
            prize_name: participant.prize_name.clone(),
        }
    }
}

/// Prize tiers sorted for drawing: highest `prize_level` first, ties keep
/// their input order.
pub fn sort_prizes(prizes: &mut [PrizeTier]) {
    prizes.sort_by(|a, b| b.prize_level.cmp(&a.prize_level));
}

/// Checks a merged tier list / roster / ledger before it replaces session
/// state.
pub fn validate_draw_data(
    prizes: &[PrizeTier],
    participants: &[Participant],
    winners: &BTreeMap<String, Vec<String>>,
) -> Result<()> {
    let mut prize_names = HashSet::new();
    for prize in prizes {
        if !prize_names.insert(prize.prize_name.as_str()) {
            msg!("Duplicate prize name: {}", prize.prize_name);
            return err!(DrawError::DuplicatePrizeName);
        }
        require!(
            prize.drawn_count <= prize.total_quota,
            DrawError::QuotaExceeded
        );
    }

    let mut participant_names = HashSet::new();
    for participant in participants {
        if !participant_names.insert(participant.name.as_str()) {
            msg!("Duplicate participant name: {}", participant.name);
            return err!(DrawError::DuplicateParticipantName);
        }
        if let Some(prize_name) = &participant.prize_name {
            require!(
                prize_names.contains(prize_name.as_str()),
                DrawError::UnknownPrize
            );
        }
    }

    let mut drawn_names = HashSet::new();
    for (prize_name, names) in winners {
        let prize = prizes
            .iter()
            .find(|p| &p.prize_name == prize_name)
            .ok_or(DrawError::UnknownPrize)?;
        require!(
            names.len() <= prize.total_quota as usize,
            DrawError::QuotaExceeded
        );

        for name in names {
            if !drawn_names.insert(name.as_str()) {
                msg!("{} is drawn more than once", name);
                return err!(DrawError::DuplicateLedgerEntry);
            }
            let participant = participants
                .iter()
                .find(|p| &p.name == name)
                .ok_or(DrawError::UnknownParticipant)?;
            if !participant.is_winner || participant.prize_name.as_ref() != Some(prize_name) {
                msg!("{} is in the {} ledger but not its winner", name, prize_name);
                return err!(DrawError::LedgerMismatch);
            }
        }
    }

    // Every winner sits in its tier's ledger, and the counts follow.
    for participant in participants.iter().filter(|p| p.is_winner) {
        require!(
            drawn_names.contains(participant.name.as_str()),
            DrawError::LedgerMismatch
        );
    }
    for prize in prizes {
        let ledger_len = winners.get(&prize.prize_name).map_or(0, Vec::len);
        if prize.drawn_count as usize != ledger_len {
            msg!(
                "{} has drawn count {} but {} ledger entries",
                prize.prize_name,
                prize.drawn_count,
                ledger_len
            );
            return err!(DrawError::LedgerMismatch);
        }
    }

    Ok(())
}

impl DrawSession {
    /// Snapshot of the session that `load` into a fresh session reproduces.
    /// Only committed winners are exported: a name drawn by `stop_rolling`
    /// and not yet committed goes back to the pool on reload.
    pub fn export_snapshot(&self) -> DrawSnapshot {
        DrawSnapshot {
            activity: self.activity.clone(),
            prizes: Some(self.prizes.iter().map(PrizeInfo::from).collect()),
            participants: Some(self.participants.iter().map(ParticipantInfo::from).collect()),
            winners: Some(
                self.winners
                    .iter()
                    .map(|(prize_name, names)| {
                        let entries: Vec<WinnerEntry> = names
                            .iter()
                            .filter(|name| self.participant(name).is_some_and(|p| p.is_winner))
                            .cloned()
                            .map(WinnerEntry::Name)
                            .collect();
                        (prize_name.clone(), entries)
                    })
                    .filter(|(_, entries)| !entries.is_empty())
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_accepts_both_winner_shapes() {
        let json = r#"{
            "activity": { "activityId": "a1", "activityName": "Annual Gala", "status": "ACTIVE" },
            "prizes": [
                { "prizeId": "p1", "prizeName": "First", "prizeLevel": 1, "totalQuota": 1, "drawnCount": 1, "drawOrder": 1 },
                { "prizeId": "p3", "prizeName": "Third", "prizeLevel": 3, "totalQuota": 5, "drawnCount": 1 }
            ],
            "participants": [
                { "participantId": "u1", "name": "Ann", "isWinner": true },
                { "participantId": "u2", "name": "Bob", "isWinner": true, "department": "Ops" },
                { "participantId": "u3", "name": "Cid", "isWinner": null }
            ],
            "winners": {
                "First": ["Ann"],
                "Third": [{ "recordId": "r2", "participantName": "Bob", "prizeName": "Third", "drawSequence": 2 }]
            }
        }"#;

        let snapshot = DrawSnapshot::from_json(json).unwrap();
        let activity = snapshot.activity.clone().unwrap();
        assert_eq!(activity.activity_name, "Annual Gala");
        assert_eq!(activity.total_winners, None);

        let winners = snapshot.winners.unwrap();
        let first: Vec<_> = winners["First"].iter().cloned().map(WinnerEntry::into_name).collect();
        let third: Vec<_> = winners["Third"].iter().cloned().map(WinnerEntry::into_name).collect();
        assert_eq!(first, vec!["Ann"]);
        assert_eq!(third, vec!["Bob"]);

        let participants = snapshot.participants.unwrap();
        assert_eq!(participants[2].is_winner, None);
        assert_eq!(participants[1].department.as_deref(), Some("Ops"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(DrawSnapshot::from_json("{ \"prizes\": 3 }").is_err());
        assert!(DrawSnapshot::from_json("not json").is_err());
    }

    #[test]
    fn test_prize_without_quota_is_rejected() {
        let info = PrizeInfo {
            prize_id: None,
            prize_name: "Mystery".to_string(),
            prize_level: 1,
            gift_name: None,
            total_quota: None,
            drawn_count: None,
        };
        assert!(PrizeTier::try_from(info).is_err());
    }

    #[test]
    fn test_sort_prizes_is_descending_and_stable() {
        let tier = |name: &str, level| PrizeTier {
            prize_id: None,
            prize_name: name.to_string(),
            prize_level: level,
            gift_name: None,
            total_quota: 1,
            drawn_count: 0,
        };
        let mut prizes = vec![tier("a", 3), tier("b", 1), tier("c", 2), tier("d", 1)];
        sort_prizes(&mut prizes);
        let order: Vec<_> = prizes.iter().map(|p| p.prize_name.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_snapshot_borsh_encoding() {
        let snapshot = DrawSnapshot {
            winners: Some(BTreeMap::from([(
                "Grand".to_string(),
                vec![WinnerEntry::Name("Ann".to_string())],
            )])),
            ..Default::default()
        };
        let mut bytes = Vec::new();
        AnchorSerialize::serialize(&snapshot, &mut bytes).unwrap();
        assert_eq!(DrawSnapshot::try_from_slice(&bytes).unwrap(), snapshot);
    }
}
