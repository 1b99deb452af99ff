//! LLM completion clients.
//!
//! Each provider module exposes a small client with a single `ask` call; the
//! [`provider`] module holds the shared error type and explicit provider
//! dispatch.

/// Arli AI text-completion client.
pub mod arli;
pub(crate) mod chat_runtime;
/// Gemini `generateContent` text-completion client.
pub mod gemini;
/// OpenAI chat-completions client.
pub mod openai;
/// Provider selection, shared message and error types.
pub mod provider;

pub use provider::{LlmClient, Provider, ProviderError, ask};
