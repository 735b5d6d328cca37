//! Domain types.
//!
//! Pure data types shared by the ports and services. Nothing in here talks to
//! the host capability.

pub mod availability;
pub mod chat;
pub mod instance;
pub mod options;
pub mod tokens;

pub use availability::{Availability, DownloadPolicy, DownloadProgress};
pub use chat::{ChatMessage, MessageRole};
pub use instance::Instance;
pub use options::{PromptOptions, SessionOptions};
pub use tokens::TokenUsageInfo;
