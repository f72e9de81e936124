// Deterministic content checks that need no provider call.

pub mod bullet_ranker;
pub mod hallucination;
pub mod handlers;
