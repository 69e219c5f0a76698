//! Store seam for the chat workers
//!
//! Workers only need three operations, so they run against this trait and
//! tests can substitute doubles without touching the filesystem.

use crate::state_machine::ConversationRecord;
use crate::store::StateStore;
use std::sync::Arc;

/// The slice of the store a worker mutates while handling one message.
pub trait RecordStore: Send + Sync {
    fn get(&self, chat_id: &str) -> Option<ConversationRecord>;

    /// Whole-record write; the store stamps `lastUpdated`.
    fn set(&self, chat_id: &str, record: ConversationRecord);

    /// Archive the live record into history. False when the id is unknown.
    fn reset_one(&self, chat_id: &str) -> bool;
}

impl RecordStore for StateStore {
    fn get(&self, chat_id: &str) -> Option<ConversationRecord> {
        StateStore::get(self, chat_id)
    }

    fn set(&self, chat_id: &str, record: ConversationRecord) {
        StateStore::set(self, chat_id, record);
    }

    fn reset_one(&self, chat_id: &str) -> bool {
        StateStore::reset_one(self, chat_id)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    fn get(&self, chat_id: &str) -> Option<ConversationRecord> {
        (**self).get(chat_id)
    }

    fn set(&self, chat_id: &str, record: ConversationRecord) {
        (**self).set(chat_id, record);
    }

    fn reset_one(&self, chat_id: &str) -> bool {
        (**self).reset_one(chat_id)
    }
}
