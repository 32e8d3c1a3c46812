//! mail-triage — cache-aware email classification pipeline.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod fingerprint;
pub mod llm;
pub mod pipeline;
pub mod source;
