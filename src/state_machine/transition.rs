//! Pure step transition function
//!
//! Given the current record and one inbound message body, computes the next
//! record and the effects to run. No I/O happens here: persistence and reply
//! delivery are the runtime's job, which makes every dialogue rule testable
//! with plain assertions.

use super::effect::Effect;
use super::event::ChatContext;
use super::messages;
use super::record::{ConversationRecord, Step, Topic};
use crate::validators::{is_valid_email, is_valid_text, sanitize_text};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;

/// Inquiry length bounds differ per flow: the consulting flows want a real
/// description, the representante flow accepts a short motive.
fn inquiry_bounds(topic: Topic) -> (usize, usize) {
    match topic {
        Topic::Licitaciones | Topic::Proyectos => (10, 1000),
        Topic::Representante => (2, 500),
    }
}

/// Result of a transition: the merged record plus ordered effects.
///
/// `record` is only written back when the effects contain
/// [`Effect::PersistRecord`]; a rejected input leaves the stored record
/// untouched.
#[derive(Debug)]
pub struct TransitionResult {
    pub record: ConversationRecord,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(record: ConversationRecord) -> Self {
        Self {
            record,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// The reply texts, in send order.
    #[allow(dead_code)] // Used by tests
    pub fn replies(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Reply(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[allow(dead_code)] // Used by tests
    pub fn persists(&self) -> bool {
        self.effects.contains(&Effect::PersistRecord)
    }
}

/// Pure transition: same record + same message + same context always produce
/// the same result.
pub fn transition(record: &ConversationRecord, body: &str, ctx: &ChatContext) -> TransitionResult {
    let body = body.trim();

    match record.step {
        // First contact: greet with the root menu and start waiting for a
        // choice. Any body text works as the opener.
        Step::Fresh => {
            let mut next = record.clone();
            next.step = Step::Menu;
            TransitionResult::new(next)
                .with_effect(Effect::reply(messages::root_menu()))
                .with_effect(Effect::PersistRecord)
        }

        Step::Menu => menu_choice(record, body, ctx),

        Step::ConfirmHandoff(line) => {
            let answer = body.to_lowercase();
            if answer == "si" || answer == "sí" {
                let mut next = record.clone();
                next.step = Step::AwaitName(line.topic());
                TransitionResult::new(next)
                    .with_effect(Effect::reply(messages::handoff_accepted_name_prompt()))
                    .with_effect(Effect::PersistRecord)
            } else if answer == "no" {
                let mut next = record.clone();
                next.step = Step::Menu;
                next.topic = None;
                TransitionResult::new(next)
                    .with_effect(Effect::reply(messages::back_to_menu()))
                    .with_effect(Effect::reply(messages::root_menu()))
                    .with_effect(Effect::PersistRecord)
            } else {
                TransitionResult::new(record.clone())
                    .with_effect(Effect::reply(messages::yes_no_reprompt()))
            }
        }

        Step::AwaitName(topic) => {
            let nombre = sanitize_text(body);
            if !is_valid_text(&nombre, NAME_MIN, NAME_MAX) {
                return TransitionResult::new(record.clone())
                    .with_effect(Effect::reply(messages::invalid_name()));
            }
            let mut next = record.clone();
            next.nombre = Some(nombre);
            next.step = Step::AwaitEmail(topic);
            TransitionResult::new(next)
                .with_effect(Effect::reply(messages::email_prompt(topic)))
                .with_effect(Effect::PersistRecord)
        }

        Step::AwaitEmail(topic) => {
            if !is_valid_email(body) {
                return TransitionResult::new(record.clone())
                    .with_effect(Effect::reply(messages::invalid_email()));
            }
            let mut next = record.clone();
            next.email = Some(body.to_string());
            next.step = Step::AwaitInquiry(topic);
            TransitionResult::new(next)
                .with_effect(Effect::reply(messages::inquiry_prompt(topic)))
                .with_effect(Effect::PersistRecord)
        }

        Step::AwaitInquiry(topic) => {
            let consulta = sanitize_text(body);
            let (min, max) = inquiry_bounds(topic);
            if !is_valid_text(&consulta, min, max) {
                return TransitionResult::new(record.clone())
                    .with_effect(Effect::reply(messages::invalid_inquiry(topic)));
            }
            let mut next = record.clone();
            next.consulta = Some(consulta);
            next.step = Step::Human;

            // A record restored into this step without the earlier prompts
            // may lack a name; render it empty rather than reject.
            let nombre = next.nombre.as_deref().unwrap_or("");
            let consulta = next.consulta.as_deref().unwrap_or("");
            let confirmation = match topic {
                Topic::Licitaciones | Topic::Proyectos => {
                    messages::inquiry_received(nombre, consulta)
                }
                Topic::Representante => {
                    messages::representante_confirmation(nombre, consulta, ctx.within_hours)
                }
            };
            TransitionResult::new(next)
                .with_effect(Effect::reply(confirmation))
                .with_effect(Effect::PersistRecord)
        }

        // Terminal: a person owns this chat now. The runtime short-circuits
        // before calling us, but stay total.
        Step::Human => TransitionResult::new(record.clone()),

        // Corrupted or hand-edited record: archive it and start over.
        Step::Unrecognized(_) => TransitionResult::new(record.clone())
            .with_effect(Effect::ResetRecord)
            .with_effect(Effect::reply(messages::root_menu())),
    }
}

fn menu_choice(record: &ConversationRecord, body: &str, ctx: &ChatContext) -> TransitionResult {
    use super::record::ServiceLine;

    match body {
        "1" => {
            let mut next = record.clone();
            next.topic = Some(Topic::Licitaciones);
            next.step = Step::ConfirmHandoff(ServiceLine::Licitaciones);
            TransitionResult::new(next)
                .with_effect(Effect::reply(messages::licitaciones_pitch()))
                .with_effect(Effect::PersistRecord)
        }
        "2" => {
            let mut next = record.clone();
            next.topic = Some(Topic::Proyectos);
            next.step = Step::ConfirmHandoff(ServiceLine::Proyectos);
            TransitionResult::new(next)
                .with_effect(Effect::reply(messages::proyectos_pitch()))
                .with_effect(Effect::PersistRecord)
        }
        "3" => {
            let mut next = record.clone();
            next.topic = Some(Topic::Representante);
            next.step = Step::AwaitName(Topic::Representante);
            TransitionResult::new(next)
                .with_effect(Effect::reply(messages::hours_status(ctx.within_hours)))
                .with_effect(Effect::reply(messages::representante_name_prompt()))
                .with_effect(Effect::PersistRecord)
        }
        _ => TransitionResult::new(record.clone())
            .with_effect(Effect::reply(messages::unrecognized_option())),
    }
}
