//! Email classification pipeline.
//!
//! Every batch flows through:
//! 1. `MailSource::list_recent_ids()` — provider I/O
//! 2. Cache-or-fetch per message id → normalized `Message`
//! 3. `Classifier::classify()` — cache-or-model, with repair/parse coercion
//!
//! Fetch and classify are sequential phases, not interleaved. The pipeline
//! holds no state across runs.

pub mod classifier;
pub mod processor;
pub mod types;

pub use classifier::Classifier;
pub use processor::Pipeline;
pub use types::{Analysis, Category, EnrichedMessage, Message, NeedsResponse, Priority};
