pub mod envelope;

pub use envelope::{StatusEnvelope, SuccessEnvelope};
