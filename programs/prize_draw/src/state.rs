use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ROLLING_INTERVAL;
use crate::error::DrawError;
use crate::ticker::{DrawSampler, RollingTicker};
use crate::utils::seed_from_clock;

#[derive(
    AnchorSerialize,
    AnchorDeserialize,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    Draft,
    #[default]
    Active,
    Completed,
    Archived,
}

/// The lottery event a session draws for. Supplied by the caller and never
/// modified by the draw.
#[derive(AnchorSerialize, AnchorDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Opaque identifier assigned by the lottery service.
    pub activity_id: String,

    /// Display name of the event.
    #[serde(default)]
    pub activity_name: String,

    #[serde(default)]
    pub status: ActivityStatus,

    /// Participant count as reported by the service, if any.
    #[serde(default)]
    pub total_participants: Option<u32>,

    /// Winner count as reported by the service, if any.
    #[serde(default)]
    pub total_winners: Option<u32>,
}

#[derive(
    AnchorSerialize, AnchorDeserialize, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrizeStatus {
    Pending,
    Drawing,
    Completed,
}

/// A prize category with a fixed winner quota.
#[derive(AnchorSerialize, AnchorDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrizeTier {
    pub prize_id: Option<String>,

    /// Unique within an activity; the key of the winners ledger.
    pub prize_name: String,

    /// Tiers are drawn from the highest level down.
    pub prize_level: i32,

    /// What the winner actually receives.
    pub gift_name: Option<String>,

    pub total_quota: u32,

    /// Winners committed so far. Never above `total_quota`.
    pub drawn_count: u32,
}

impl PrizeTier {
    pub fn is_full(&self) -> bool {
        self.drawn_count >= self.total_quota
    }

    pub fn remaining_quota(&self) -> u32 {
        self.total_quota.saturating_sub(self.drawn_count)
    }

    pub fn status(&self) -> PrizeStatus {
        if self.is_full() {
            PrizeStatus::Completed
        } else if self.drawn_count > 0 {
            PrizeStatus::Drawing
        } else {
            PrizeStatus::Pending
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub participant_id: Option<String>,

    /// Unique within an activity.
    pub name: String,

    pub employee_no: Option<String>,

    pub department: Option<String>,

    pub is_winner: bool,

    /// Tier won, set iff `is_winner`.
    pub prize_name: Option<String>,
}

/// One entry of the undo stack, pushed by `stop_rolling`.
#[derive(AnchorSerialize, AnchorDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UndoRecord {
    pub prize_name: String,
    pub prize_index: u32,
    pub winner_name: String,
    /// `drawn_count` of the tier before the draw was committed.
    pub drawn_count_before: u32,
}

/// What a caller hands to the lottery service to persist a commit.
#[derive(AnchorSerialize, AnchorDeserialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WinnerRecord {
    pub activity_id: Option<String>,
    pub prize_name: String,
    pub gift_name: Option<String>,
    pub participant_name: String,
    /// 1-based position of the commit across the whole activity.
    pub draw_sequence: u32,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub total_participants: u32,
    pub total_winners: u32,
    pub remaining: u32,
    /// Every tier has reached its quota.
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawConfig {
    /// Clock units between two rolling samples.
    pub rolling_interval: u64,
    /// Sampler seed. Fix it to replay a draw.
    pub seed: [u8; 32],
}

impl DrawConfig {
    pub fn new(rolling_interval: u64, seed: [u8; 32]) -> Self {
        Self {
            rolling_interval,
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(DEFAULT_ROLLING_INTERVAL, seed_from_clock())
    }
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Draw state of one lottery event.
///
/// A session is owned by whoever drives the draw (usually the console page)
/// and mutated only through the operations in `lib.rs`. All fields are
/// readable through accessors for rendering.
#[derive(Clone, Debug)]
pub struct DrawSession {
    pub(crate) activity: Option<Activity>,
    /// Sorted by descending `prize_level`.
    pub(crate) prizes: Vec<PrizeTier>,
    pub(crate) participants: Vec<Participant>,
    /// Names still eligible, in roster order.
    pub(crate) remaining: Vec<String>,
    /// Tier name -> winner names in draw order.
    pub(crate) winners: BTreeMap<String, Vec<String>>,
    pub(crate) undo_stack: Vec<UndoRecord>,
    pub(crate) current_prize_index: usize,
    pub(crate) rolling_name: Option<String>,
    pub(crate) ticker: RollingTicker,
    pub(crate) sampler: DrawSampler,
}

impl DrawSession {
    pub fn new(config: DrawConfig) -> Result<Self> {
        require_gt!(
            config.rolling_interval,
            0,
            DrawError::InvalidRollingInterval
        );

        Ok(Self {
            activity: None,
            prizes: Vec::new(),
            participants: Vec::new(),
            remaining: Vec::new(),
            winners: BTreeMap::new(),
            undo_stack: Vec::new(),
            current_prize_index: 0,
            rolling_name: None,
            ticker: RollingTicker::new(config.rolling_interval),
            sampler: DrawSampler::new(config.seed),
        })
    }

    pub fn activity(&self) -> Option<&Activity> {
        self.activity.as_ref()
    }

    pub fn prizes(&self) -> &[PrizeTier] {
        &self.prizes
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    pub fn remaining_pool(&self) -> &[String] {
        &self.remaining
    }

    pub fn winners(&self) -> &BTreeMap<String, Vec<String>> {
        &self.winners
    }

    pub fn winners_of(&self, prize_name: &str) -> &[String] {
        self.winners
            .get(prize_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Oldest first; the last element is what `undo_last_winner` pops.
    pub fn undo_history(&self) -> &[UndoRecord] {
        &self.undo_stack
    }

    /// Name drawn by the last `stop_rolling` that has not been committed.
    pub fn pending_winner(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .filter(|record| {
                self.participant(&record.winner_name)
                    .is_some_and(|p| !p.is_winner)
            })
            .map(|record| record.winner_name.as_str())
    }

    pub fn current_prize_index(&self) -> usize {
        self.current_prize_index
    }

    /// The tier currently accepting winners, `None` if the index is out of
    /// bounds (no tiers loaded).
    pub fn active_tier(&self) -> Option<&PrizeTier> {
        self.prizes.get(self.current_prize_index)
    }

    pub fn rolling_name(&self) -> Option<&str> {
        self.rolling_name.as_deref()
    }

    pub fn is_rolling(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn rolling_interval(&self) -> u64 {
        self.ticker.interval()
    }

    /// Committed winners, tier by tier in ledger order, numbered from 1.
    ///
    /// The numbering is local to this session: a `draw_sequence` carried by
    /// loaded `WinnerInfo` records is not kept.
    pub fn winner_records(&self) -> Vec<WinnerRecord> {
        let activity_id = self.activity.as_ref().map(|a| a.activity_id.clone());
        self.prizes
            .iter()
            .flat_map(|prize| {
                self.winners_of(&prize.prize_name)
                    .iter()
                    .filter(|name| self.participant(name).is_some_and(|p| p.is_winner))
                    .map(move |name| (prize, name))
            })
            .enumerate()
            .map(|(i, (prize, name))| WinnerRecord {
                activity_id: activity_id.clone(),
                prize_name: prize.prize_name.clone(),
                gift_name: prize.gift_name.clone(),
                participant_name: name.clone(),
                draw_sequence: i as u32 + 1,
            })
            .collect()
    }

    pub fn summary(&self) -> ActivitySummary {
        ActivitySummary {
            total_participants: self.participants.len() as u32,
            total_winners: self.participants.iter().filter(|p| p.is_winner).count() as u32,
            remaining: self.remaining.len() as u32,
            completed: !self.prizes.is_empty() && self.prizes.iter().all(PrizeTier::is_full),
        }
    }

    pub(crate) fn ledger_count(&self, prize_name: &str) -> usize {
        self.winners.get(prize_name).map_or(0, Vec::len)
    }

    pub(crate) fn committed_total(&self) -> u32 {
        self.prizes.iter().map(|p| p.drawn_count).sum()
    }

    pub(crate) fn participant_mut(&mut self, name: &str) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.name == name)
    }

    /// First tier at or after `from` whose ledger is below quota, else the
    /// last tier. Zero-quota tiers are skipped.
    pub(crate) fn next_open_tier(&self, from: usize) -> usize {
        self.prizes
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, p)| self.ledger_count(&p.prize_name) < p.total_quota as usize)
            .map_or(self.prizes.len().saturating_sub(1), |(i, _)| i)
    }

    pub(crate) fn recompute_prize_index(&mut self) {
        self.current_prize_index = self.next_open_tier(0);
    }

    /// Samples the pool and publishes the pick as the displayed name.
    pub(crate) fn sample_rolling_name(&mut self) -> Option<String> {
        let index = self.sampler.next_index(self.remaining.len())?;
        let name = self.remaining[index].clone();
        self.rolling_name = Some(name.clone());
        Some(name)
    }

    /// Puts `name` back into the pool at its roster position. No-op if it is
    /// already there.
    pub(crate) fn restore_to_pool(&mut self, name: &str) {
        if self.remaining.iter().any(|n| n == name) {
            return;
        }
        let roster_position =
            |candidate: &str| self.participants.iter().position(|p| p.name == candidate);
        let target = roster_position(name);
        let at = self
            .remaining
            .iter()
            .position(|n| roster_position(n) > target)
            .unwrap_or(self.remaining.len());
        self.remaining.insert(at, name.to_string());
    }
}
