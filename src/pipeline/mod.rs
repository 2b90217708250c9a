//! Object-creation event pipeline.
//!
//! Every event flows through:
//! 1. `policy::evaluate()`: scope check and destination key (pure)
//! 2. Discovery notice to the chat channel
//! 3. Optional copy, delete and relay steps, each followed by its notice
//!
//! Steps run strictly in order. The first failure aborts the event and the
//! rest of the batch; completed steps are not rolled back.

pub mod notices;
pub mod policy;
pub mod processor;
pub mod types;

pub use policy::RelocationDecision;
pub use processor::EventPipeline;
pub use types::{EventOutcome, EventStage};
