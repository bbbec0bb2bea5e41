// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System instruction for every networking-message completion.
pub const NETWORKING_EXPERT_SYSTEM: &str =
    "You are an expert in professional networking and relationship building.";

/// Appended to prompts whose output is shown to the end user as-is.
pub const BODY_ONLY_INSTRUCTION: &str = "\
    Respond with the message text only. \
    Do NOT add a preamble, a title, a signature placeholder, or any explanation of your choices. \
    Do NOT wrap the message in quotes.";
