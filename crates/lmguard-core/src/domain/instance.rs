//! The capability token handed out by a successful `initialize`.

use serde::Serialize;
use uuid::Uuid;

/// Proof that the host capability reported `available` when it was created.
///
/// An `Instance` holds no live handle to the host and owns no resources, so it
/// is never destroyed and can be shared freely. It cannot be constructed
/// outside this crate; the only way to obtain one is through initialization.
/// If the host later becomes unavailable the instance goes stale silently and
/// the next operation that uses it fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    id: Uuid,
    system_prompt: Option<String>,
}

impl Instance {
    /// Stamp a new instance with a fresh identifier.
    pub(crate) fn new(system_prompt: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            system_prompt,
        }
    }

    /// Opaque identifier, for external bookkeeping only.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The persistent system instruction applied to every session.
    #[must_use]
    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }
}
