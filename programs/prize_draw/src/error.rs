use anchor_lang::prelude::*;

#[error_code]
pub enum DrawError {
    // Draw flow errors
    #[msg("No prize tier is currently accepting winners")]
    NoActiveTier,
    #[msg("The remaining pool is empty")]
    EmptyPool,
    #[msg("There is no commit to undo")]
    EmptyUndoHistory,
    #[msg("Rolling is already in progress")]
    AlreadyRolling,
    #[msg("Rolling has not been started")]
    NotRolling,
    #[msg("A drawn winner is still awaiting commit")]
    CommitPending,

    // Commit errors
    #[msg("Participant is not on the roster")]
    UnknownParticipant,
    #[msg("Participant has already won a prize")]
    AlreadyWinner,
    #[msg("Participant was not drawn for the active tier")]
    WinnerNotDrawn,
    #[msg("The active tier has no quota left")]
    QuotaExhausted,

    // Snapshot errors
    #[msg("Prize tier is missing its total quota")]
    MissingQuota,
    #[msg("Drawn winners exceed the tier quota")]
    QuotaExceeded,
    #[msg("Prize name appears more than once")]
    DuplicatePrizeName,
    #[msg("Participant name appears more than once")]
    DuplicateParticipantName,
    #[msg("Prize name does not match any tier")]
    UnknownPrize,
    #[msg("Cannot load data while rolling")]
    RollingInProgress,
    #[msg("Snapshot could not be decoded")]
    MalformedSnapshot,
    #[msg("Winners ledger disagrees with the roster or drawn counts")]
    LedgerMismatch,
    #[msg("Participant appears more than once in the winners ledger")]
    DuplicateLedgerEntry,

    // Config errors
    #[msg("Rolling interval must be greater than zero")]
    InvalidRollingInterval,
}
