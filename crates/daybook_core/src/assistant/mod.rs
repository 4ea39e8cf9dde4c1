//! Assistant: free text in, reply text and suggested action out.
//!
//! # Responsibility
//! - Rule-based intent classification (`intent`).
//! - Offline reply templates (`templates`).
//! - Hosted chat providers and their transport seam (`provider`).
//! - Request orchestration with model fallback (`pipeline`).

pub mod intent;
pub mod pipeline;
pub mod provider;
pub mod templates;

pub use intent::{classify, Classification};
pub use pipeline::{
    AssistantAction, AssistantPipeline, AssistantReply, DueHint, ReplySource, ResolveStage,
    APOLOGY, HISTORY_TURNS,
};
pub use provider::{
    ChatPrompt, ChatTransport, HttpTransport, PromptTurn, ProviderConfig, ProviderError,
    ProviderKind, Role, TransportError,
};
