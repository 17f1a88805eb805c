//! Symptom ranking powered by the Claude API

pub mod client;
pub mod ranking;
pub mod retry;

pub use client::ClaudeClient;
pub use ranking::ClaudeRanker;
pub use retry::RetryingGateway;
