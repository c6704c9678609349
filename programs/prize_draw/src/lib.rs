//! Draw-session state machine for a lottery console.
//!
//! Logging goes through anchor's `msg!` and `emit!`, which off-chain print to
//! stdout through the solana syscall stubs: `msg!` writes the message line,
//! `emit!` writes `data: <base64>` holding the discriminated borsh encoding
//! of an [`events`] record. Every operation except `tick` emits one event.

use anchor_lang::prelude::*;
use instructions::*;

pub mod constants;
pub mod error;
pub mod events;
mod instructions;
pub mod snapshot;
pub mod state;
pub mod ticker;
pub mod utils;


pub use error::DrawError;
pub use snapshot::{DrawSnapshot, ParticipantInfo, PrizeInfo, WinnerEntry, WinnerInfo};
pub use state::{
    Activity, ActivityStatus, ActivitySummary, DrawConfig, DrawSession, Participant, PrizeStatus,
    PrizeTier, UndoRecord, WinnerRecord,
};

impl DrawSession {
    pub fn load(&mut self, snapshot: DrawSnapshot) -> Result<()> {
        process_load(self, snapshot)
    }

    pub fn start_rolling(&mut self, now: u64) -> Result<()> {
        process_start_rolling(self, now)
    }

    pub fn tick(&mut self, now: u64) -> Option<String> {
        process_tick(self, now)
    }

    pub fn stop_rolling(&mut self) -> Result<String> {
        process_stop_rolling(self)
    }

    pub fn commit_winner(&mut self, name: &str) -> Result<WinnerRecord> {
        process_commit_winner(self, name)
    }

    pub fn undo_last_winner(&mut self) -> Result<UndoRecord> {
        process_undo_last_winner(self)
    }

    pub fn reset_draw(&mut self) {
        process_reset_draw(self)
    }
}
