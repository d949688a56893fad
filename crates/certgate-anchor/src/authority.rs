//! # Writer Authority
//!
//! Who may anchor state is an injected predicate rather than a property of
//! the anchor itself. [`SingleWriter`] is the usual choice: one designated
//! owner identity. Any `Fn(&ActorId) -> bool` also qualifies.

use certgate_core::ActorId;

/// Decides whether a caller may append to the anchor.
pub trait WriterAuthority: Send + Sync {
    /// `true` if `caller` is a privileged writer.
    fn is_authorized_writer(&self, caller: &ActorId) -> bool;
}

impl<F> WriterAuthority for F
where
    F: Fn(&ActorId) -> bool + Send + Sync,
{
    fn is_authorized_writer(&self, caller: &ActorId) -> bool {
        self(caller)
    }
}

/// Exactly one actor may write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleWriter {
    writer: ActorId,
}

impl SingleWriter {
    /// Authorize `writer` and nobody else.
    pub fn new(writer: ActorId) -> Self {
        Self { writer }
    }

    /// The privileged identity.
    pub fn writer(&self) -> &ActorId {
        &self.writer
    }
}

impl WriterAuthority for SingleWriter {
    fn is_authorized_writer(&self, caller: &ActorId) -> bool {
        *caller == self.writer
    }
}
