// Shared prompt constants used across services.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Default persona for every tailoring call.
pub const RESUME_WRITER_SYSTEM: &str = "You are an expert resume writer and career advisor.";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are an expert resume writer and career advisor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Common instruction appended to every rewrite prompt.
pub const TRUTHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: Maintain truthfulness. Do NOT add employers, titles, dates, numbers, \
    or technologies that are not present in the candidate data.";
