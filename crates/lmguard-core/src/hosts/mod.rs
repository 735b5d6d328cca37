//! Host implementations shipped with the core.
//!
//! Real hosts (browser bindings, native runtimes) live in their adapters.
//! The scripted host here is deterministic and in-process, for tests and
//! demos.

mod scripted;

pub use scripted::{Responder, ScriptedHost, ScriptedHostStats};
