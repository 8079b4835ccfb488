//! slidecast: content production pipeline CLI.
//!
//! Tracks a fleet of image-generation API accounts with daily quotas and a
//! per-project inventory of production artifacts across the five-stage
//! pipeline (prompts → images → slides → audio → video).

pub mod cli;
pub mod config;
pub mod imagegen;
pub mod inventory;
pub mod pool;
pub mod producer;
