// Assistant: bounded-length prompts over stored documents, sent through llm_client.
// All completion calls go through llm_client::CompletionBackend.

pub mod chief;
pub mod handlers;
pub mod prompts;
pub mod truncate;
