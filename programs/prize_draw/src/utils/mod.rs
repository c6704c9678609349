pub mod draw_random;

pub use draw_random::*;
