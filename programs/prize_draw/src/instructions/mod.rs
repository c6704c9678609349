pub mod commit_winner;
pub mod load;
pub mod reset_draw;
pub mod start_rolling;
pub mod stop_rolling;
pub mod undo_last_winner;

pub use commit_winner::*;
pub use load::*;
pub use reset_draw::*;
pub use start_rolling::*;
pub use stop_rolling::*;
pub use undo_last_winner::*;
