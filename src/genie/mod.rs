// Genie: prompt-to-config synthesis
//
// This module provides:
// - The SearchConfig model and the builder that guards its invariants
// - The deterministic local generator
// - The synthesizer that prefers an AI provider and falls back locally

pub mod config;
pub mod local;
pub mod synthesizer;

pub use config::{Criterion, GenieResult, Priority, SearchConfig, DEFAULT_NAME};
pub use local::LocalGenerator;
pub use synthesizer::{LocalReason, Synthesis, SynthesisMode, SynthesisPath, Synthesizer};
