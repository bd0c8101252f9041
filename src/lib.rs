//! Splash overlay and simulated live-metrics panel.
//!
//! Every number the panel shows is synthesized locally by jitter around
//! fixed baselines; nothing is fetched or persisted. Time and randomness
//! are injected so runs can be replayed exactly.

pub mod clock;
pub mod config;
pub mod jitter;
pub mod logging;
pub mod overlay;
pub mod page;
pub mod panel;
pub mod random;
pub mod render;
pub mod scheduler;
