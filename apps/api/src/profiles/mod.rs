// Profile and AI-settings persistence plus their HTTP handlers.

pub mod handlers;
pub mod repository;
