//! Core services - the guard's decision logic.
//!
//! Services orchestrate between the host port and domain types. They don't
//! know about concrete host implementations.

mod cancellation;
mod initializer;
mod model_guard;
mod prompt_service;
mod session_manager;
mod token_accountant;

pub use cancellation::CancellationScope;
pub use initializer::{InitOptions, InitializeResult, Initializer, PendingDownload};
pub use model_guard::ModelGuard;
pub use prompt_service::PromptService;
pub use session_manager::{SessionManager, merge_session_options};
pub use token_accountant::TokenAccountant;
