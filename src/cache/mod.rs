//! Caching layers for catalog data
//!
//! `TtlCache` keeps recent responses in memory for ten minutes. `DiskCache`
//! persists snapshots to disk so that old data can stand in when TMDb is
//! unavailable.

mod disk;
mod memory;

pub use disk::{CachedData, DiskCache};
pub use memory::{TtlCache, DEFAULT_TTL};
