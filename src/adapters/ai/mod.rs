//! AI Adapters.
//!
//! Implementations of the AIProvider and GroupingAdvisor ports.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat models
//! - `AnthropicProvider` - Anthropic Claude models
//! - `LlmGroupingAdvisor` - Grouping proposals on top of any provider

mod anthropic_provider;
mod llm_grouping_advisor;
mod mock_provider;
mod openai_provider;
mod retry;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use llm_grouping_advisor::LlmGroupingAdvisor;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
