// Structured records of every draw transition, for whoever indexes the
// session's log output.

use anchor_lang::prelude::*;

/// Emitted after a snapshot has been merged into the session.
#[event]
pub struct SnapshotLoaded {
    pub activity_id: Option<String>,
    pub prize_count: u32,
    pub participant_count: u32,
    pub remaining: u32,
    pub prize_index: u32,
}

#[event]
pub struct RollingStarted {
    pub prize_name: String,
    pub pool_size: u32,
    pub started_at: u64,
}

/// Emitted by `stop_rolling` once a name has been drawn into the ledger.
#[event]
pub struct WinnerDrawn {
    pub prize_name: String,
    pub prize_index: u32,
    pub winner_name: String,
}

/// Emitted by `commit_winner`.
#[event]
pub struct WinnerCommitted {
    pub prize_name: String,
    pub winner_name: String,
    /// Position of this commit across the whole activity (1-based)
    pub draw_sequence: u32,
    /// Tier index after quota evaluation
    pub next_prize_index: u32,
}

#[event]
pub struct WinnerUndone {
    pub prize_name: String,
    pub winner_name: String,
    pub restored_drawn_count: u32,
    pub prize_index: u32,
}

#[event]
pub struct DrawReset {
    pub activity_id: Option<String>,
    pub participant_count: u32,
}
