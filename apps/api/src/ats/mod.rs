// ATS compatibility scoring.
// The core (keywords, matcher, sections, scorer) is pure and synchronous;
// only handlers.rs touches HTTP.

pub mod handlers;
pub mod keywords;
pub mod matcher;
pub mod scorer;
pub mod sections;
