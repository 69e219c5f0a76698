//! Per-chat message runtime
//!
//! Serializes handling per chat id: each chat gets its own queue and worker
//! task, so step ordering can never be violated by concurrent delivery for
//! the same chat, while different chats process in parallel.

mod traits;
mod worker;

pub use traits::RecordStore;
pub use worker::ChatWorker;

use crate::admission::{BusinessHours, RateLimiter};
use crate::state_machine::{InboundMessage, MessageOrigin};
use crate::store::StateStore;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot, RwLock};

/// Worker queue payload: the message plus the channel its outcome goes back
/// on.
pub(crate) type WorkItem = (InboundMessage, oneshot::Sender<Outcome>);

/// What handling one inbound message produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Zero or more texts for the transport to deliver to the chat.
    Replies(Vec<String>),
    /// The message was deliberately not auto-processed.
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Group or broadcast traffic; the bot only talks in direct chats.
    GroupOrigin,
    /// The chat is in the terminal hand-off state.
    HumanMode,
}

/// Handle to one chat's worker.
struct ChatHandle {
    work_tx: mpsc::Sender<WorkItem>,
}

/// Owns the store, the admission state, and one worker per active chat.
pub struct RuntimeManager {
    store: Arc<StateStore>,
    limiter: Arc<Mutex<RateLimiter>>,
    hours: BusinessHours,
    admins: Arc<HashSet<String>>,
    workers: RwLock<HashMap<String, ChatHandle>>,
}

impl RuntimeManager {
    pub fn new(store: Arc<StateStore>, hours: BusinessHours, admins: HashSet<String>) -> Self {
        Self {
            store,
            limiter: Arc::new(Mutex::new(RateLimiter::new())),
            hours,
            admins: Arc::new(admins),
            workers: RwLock::new(HashMap::new()),
        }
    }

    /// Handle one inbound message end to end and return its outcome.
    /// Messages for the same chat are answered strictly in arrival order.
    pub async fn handle_message(&self, message: InboundMessage) -> Result<Outcome, String> {
        if message.origin != MessageOrigin::Direct {
            tracing::debug!(chat_id = %message.chat_id, origin = ?message.origin, "Ignoring non-direct message");
            return Ok(Outcome::Ignored(IgnoreReason::GroupOrigin));
        }

        let work_tx = self.get_or_create(&message.chat_id).await;
        let (reply_tx, reply_rx) = oneshot::channel();
        work_tx
            .send((message, reply_tx))
            .await
            .map_err(|e| format!("Failed to queue message: {e}"))?;
        reply_rx
            .await
            .map_err(|e| format!("Worker dropped message: {e}"))
    }

    /// Get the sender for a chat's worker, spawning the worker on first
    /// contact.
    async fn get_or_create(&self, chat_id: &str) -> mpsc::Sender<WorkItem> {
        {
            let workers = self.workers.read().await;
            if let Some(handle) = workers.get(chat_id) {
                return handle.work_tx.clone();
            }
        }

        let mut workers = self.workers.write().await;
        // Another task may have raced us to the write lock.
        if let Some(handle) = workers.get(chat_id) {
            return handle.work_tx.clone();
        }

        let (work_tx, work_rx) = mpsc::channel(32);
        let chat_worker = ChatWorker::new(
            chat_id,
            Arc::clone(&self.store),
            Arc::clone(&self.limiter),
            self.hours.clone(),
            Arc::clone(&self.admins),
            work_rx,
        );
        tokio::spawn(chat_worker.run());

        workers.insert(
            chat_id.to_string(),
            ChatHandle {
                work_tx: work_tx.clone(),
            },
        );
        work_tx
    }

    /// The store handle, for the admin surface.
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::RATE_LIMIT_MAX;
    use crate::state_machine::{Step, Topic};
    use chrono::Weekday;

    fn always_open() -> BusinessHours {
        BusinessHours {
            weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ],
            start_hour: 0,
            end_hour: 24,
            holidays: Vec::new(),
        }
    }

    fn never_open() -> BusinessHours {
        BusinessHours {
            weekdays: Vec::new(),
            ..always_open()
        }
    }

    fn manager(hours: BusinessHours, admins: &[&str]) -> RuntimeManager {
        RuntimeManager::new(
            Arc::new(StateStore::in_memory()),
            hours,
            admins.iter().map(|s| s.to_string()).collect(),
        )
    }

    async fn say(manager: &RuntimeManager, chat_id: &str, body: &str) -> Outcome {
        manager
            .handle_message(InboundMessage::direct(chat_id, body))
            .await
            .unwrap()
    }

    fn replies(outcome: Outcome) -> Vec<String> {
        match outcome {
            Outcome::Replies(replies) => replies,
            other => panic!("expected replies, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn full_intake_flow_reaches_human_mode() {
        let mgr = manager(always_open(), &[]);

        let first = replies(say(&mgr, "U1", "1").await);
        assert!(first[0].contains("Bienvenido(a)"));

        let pitch = replies(say(&mgr, "U1", "1").await);
        assert!(pitch[0].contains("Licitaciones Públicas"));

        replies(say(&mgr, "U1", "si").await);
        replies(say(&mgr, "U1", "Jo").await);

        let rejected = replies(say(&mgr, "U1", "bad-email").await);
        assert!(rejected[0].contains("email válido"));
        assert_eq!(
            mgr.store().get("U1").unwrap().step,
            Step::AwaitEmail(Topic::Licitaciones)
        );

        replies(say(&mgr, "U1", "a@b.com").await);

        let short = replies(say(&mgr, "U1", "corta").await);
        assert!(short[0].contains("más detalle"));

        let done = replies(say(&mgr, "U1", "Consulta con suficiente detalle").await);
        assert!(done[0].contains("¡Perfecto, Jo!"));

        let record = mgr.store().get("U1").unwrap();
        assert_eq!(record.step, Step::Human);
        assert_eq!(record.email.as_deref(), Some("a@b.com"));

        // Once handed off, nothing is auto-processed.
        assert_eq!(
            say(&mgr, "U1", "¿hola?").await,
            Outcome::Ignored(IgnoreReason::HumanMode)
        );
    }

    #[tokio::test]
    async fn group_messages_are_dropped_without_side_effects() {
        let mgr = manager(always_open(), &[]);
        let outcome = mgr
            .handle_message(InboundMessage {
                chat_id: "grupo@g.us".to_string(),
                body: "hola".to_string(),
                origin: MessageOrigin::Group,
            })
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::GroupOrigin));
        assert!(mgr.store().get("grupo@g.us").is_none());
    }

    #[tokio::test]
    async fn rate_limited_chat_gets_the_warning_and_no_state_change() {
        let mgr = manager(always_open(), &[]);
        for _ in 0..RATE_LIMIT_MAX {
            say(&mgr, "U1", "opción?").await;
        }
        let before = mgr.store().get("U1");

        let over = replies(say(&mgr, "U1", "1").await);
        assert!(over[0].contains("demasiados mensajes"));
        assert_eq!(mgr.store().get("U1"), before);
    }

    #[tokio::test]
    async fn closed_hours_reply_without_touching_the_store() {
        let mgr = manager(never_open(), &[]);
        let out = replies(say(&mgr, "U1", "hola").await);
        assert!(out[0].contains("Horario de Atención"));
        assert!(mgr.store().get("U1").is_none());
    }

    #[tokio::test]
    async fn admins_bypass_the_hours_gate() {
        let mgr = manager(never_open(), &["admin@c.us"]);
        let out = replies(say(&mgr, "admin@c.us", "hola").await);
        assert!(out[0].contains("Bienvenido(a)"));
        assert!(mgr.store().get("admin@c.us").is_some());
    }

    #[tokio::test]
    async fn corrupted_step_resets_and_resends_the_menu() {
        let mgr = manager(always_open(), &[]);
        let mut record = crate::state_machine::ConversationRecord::fresh();
        record.step = Step::Unrecognized(77);
        record.nombre = Some("Resto".to_string());
        mgr.store().set("U9", record);

        let out = replies(say(&mgr, "U9", "hola").await);
        assert!(out[0].contains("Bienvenido(a)"));
        // Live record archived; the old state survives in history.
        assert!(mgr.store().get("U9").is_none());
        let history = mgr.store().history(5);
        assert_eq!(history[0].chat_id, "U9");
        assert_eq!(history[0].last_state.nombre.as_deref(), Some("Resto"));
    }
}
