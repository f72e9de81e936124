// Resume tailoring: per-section rewrites, cover letters and batch runs.
// All provider calls go through llm_client.

pub mod batch;
pub mod cover_letter;
pub mod handlers;
pub mod prompts;
pub mod tailor;
