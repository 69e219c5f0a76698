//! Effects produced by state transitions

/// Side effects the runtime executes after a transition. The transition
/// itself never touches the store or the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a text reply to the originating chat.
    Reply(String),
    /// Persist the transition's merged record as a whole-record write.
    PersistRecord,
    /// Snapshot the live record into history and drop it (full reset).
    ResetRecord,
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply(text.into())
    }
}
