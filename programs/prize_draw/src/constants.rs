/// Interval between two rolling samples, in the caller's clock units.
pub const DEFAULT_ROLLING_INTERVAL: u64 = 50;

/// Domain separator mixed into every sampler hash.
pub const SAMPLER_DOMAIN: &[u8] = b"prize_draw:rolling";
