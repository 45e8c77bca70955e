//! Headless driver for `rockfield_core`: demos, tape replays, parallel seed
//! sweeps and JSON snapshots.

pub mod runner;
pub mod util;
