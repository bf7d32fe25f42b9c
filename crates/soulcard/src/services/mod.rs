//! Service implementations (infrastructure adapters)

pub mod chat_completion;

// Re-exports
pub use chat_completion::{mask_api_key, ChatCompletionClient, CompletionConfig};
