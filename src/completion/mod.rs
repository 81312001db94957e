//! @ai:module:intent Text-completion provider access
//! @ai:module:layer infrastructure
//! @ai:module:public_api TextCompletion, CompletionError, GeminiClient, MockCompletionClient, ProviderGate

pub mod client;
pub mod mock;
pub mod rate_limiter;

pub use client::{CompletionError, GeminiClient, TextCompletion};
pub use mock::{sample_metrics_json, sample_narrative, MockCompletionClient, MockReply};
pub use rate_limiter::{ProviderGate, RequestWindow};
