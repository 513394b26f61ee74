// src/ai/mod.rs
pub mod chat;
pub mod client;
pub mod search;

pub use chat::{ChatRequest, RoleBrief};
pub use client::{ChatMessage, Completer, CompletionRequest, OpenAiClient};
pub use search::{Insights, SearchRequest};
