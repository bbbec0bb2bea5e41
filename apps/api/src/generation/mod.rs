// Profile-to-message generation: prompts, the message and voice script
// generators, industry classification, and the request pipeline tying them
// to the scraper and the connection store.
// All LLM calls go through llm_client::TextGenerator.

pub mod handlers;
pub mod industry;
pub mod message;
pub mod pipeline;
pub mod prompts;
