//! Per-chat worker
//!
//! One worker owns one chat id and drains its queue in order, so every
//! message for a chat is fully handled (admission, transition, persistence)
//! before the next one starts. Workers for different chats run freely in
//! parallel; they only meet at the store and rate-limiter locks.

use super::traits::RecordStore;
use super::{IgnoreReason, Outcome, WorkItem};
use crate::admission::{BusinessHours, RateLimiter};
use crate::state_machine::{messages, transition, ChatContext, ConversationRecord, Effect, InboundMessage};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub struct ChatWorker<S: RecordStore> {
    chat_id: String,
    store: S,
    limiter: Arc<Mutex<RateLimiter>>,
    hours: BusinessHours,
    admins: Arc<HashSet<String>>,
    work_rx: mpsc::Receiver<WorkItem>,
}

impl<S: RecordStore> ChatWorker<S> {
    pub fn new(
        chat_id: impl Into<String>,
        store: S,
        limiter: Arc<Mutex<RateLimiter>>,
        hours: BusinessHours,
        admins: Arc<HashSet<String>>,
        work_rx: mpsc::Receiver<WorkItem>,
    ) -> Self {
        Self {
            chat_id: chat_id.into(),
            store,
            limiter,
            hours,
            admins,
            work_rx,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(chat_id = %self.chat_id, "Chat worker started");
        while let Some((message, reply_tx)) = self.work_rx.recv().await {
            let outcome = self.process(&message);
            // The caller may have given up waiting; that is its business.
            let _ = reply_tx.send(outcome);
        }
        tracing::debug!(chat_id = %self.chat_id, "Chat worker stopped");
    }

    fn process(&mut self, message: &InboundMessage) -> Outcome {
        if !self.limiter.lock().unwrap().check(&self.chat_id) {
            return Outcome::Replies(vec![messages::rate_limited()]);
        }

        let existing = self.store.get(&self.chat_id);

        // Terminal hand-off: a person owns this chat, the bot stays quiet.
        if existing.as_ref().is_some_and(ConversationRecord::is_human) {
            tracing::info!(chat_id = %self.chat_id, "Chat in human mode, not auto-processed");
            return Outcome::Ignored(IgnoreReason::HumanMode);
        }

        let within_hours = self.hours.is_open_now();
        if !within_hours && !self.admins.contains(&self.chat_id) {
            return Outcome::Replies(vec![messages::outside_business_hours()]);
        }

        let record = existing.unwrap_or_else(ConversationRecord::fresh);
        tracing::info!(
            chat_id = %self.chat_id,
            step = record.step.code(),
            len = message.body.len(),
            "Message received"
        );

        let result = transition(&record, &message.body, &ChatContext::new(within_hours));
        let next = result.record;
        let mut replies = Vec::new();
        for effect in result.effects {
            match effect {
                Effect::Reply(text) => replies.push(text),
                Effect::PersistRecord => self.store.set(&self.chat_id, next.clone()),
                Effect::ResetRecord => {
                    self.store.reset_one(&self.chat_id);
                }
            }
        }

        if next.is_human() {
            tracing::info!(chat_id = %self.chat_id, topic = ?next.topic, "Intake complete, handed off");
        }

        Outcome::Replies(replies)
    }
}
