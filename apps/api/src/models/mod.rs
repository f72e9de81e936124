pub mod ai_settings;
pub mod profile;
pub mod resume;
