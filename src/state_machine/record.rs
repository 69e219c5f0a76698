//! Per-chat conversation state types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire code for the terminal hand-off step.
pub const HUMAN_STEP_CODE: u32 = 999;

/// Which intake flow the user picked from the root menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Licitaciones,
    Proyectos,
    Representante,
}

/// The two consulting lines that pitch before asking for contact data.
/// `Topic::Representante` skips the pitch and goes straight to the name
/// prompt, so it never appears at the confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLine {
    Licitaciones,
    Proyectos,
}

impl ServiceLine {
    pub fn topic(self) -> Topic {
        match self {
            ServiceLine::Licitaciones => Topic::Licitaciones,
            ServiceLine::Proyectos => Topic::Proyectos,
        }
    }
}

/// Position in the dialogue graph for one chat.
///
/// Persisted as the integer codes the state file has always used
/// (0, 1, 10..13, 20..23, 40..42, 999). Any other code loads as
/// `Unrecognized` and is recovered by a full reset on next contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Step {
    /// No message handled yet; the next message gets the root menu.
    Fresh,
    /// Root menu sent; awaiting a 1/2/3 choice.
    Menu,
    /// Pitch sent; awaiting a yes/no on talking to a representative.
    ConfirmHandoff(ServiceLine),
    /// Awaiting the user's full name.
    AwaitName(Topic),
    /// Awaiting the user's email address.
    AwaitEmail(Topic),
    /// Awaiting the free-text inquiry.
    AwaitInquiry(Topic),
    /// Terminal: a person has taken over; no automated processing.
    Human,
    /// Corrupted or hand-edited record; forces a full reset.
    Unrecognized(u32),
}

impl Step {
    pub fn is_human(self) -> bool {
        matches!(self, Step::Human)
    }

    /// The integer code written to the state file.
    pub fn code(self) -> u32 {
        u32::from(self)
    }
}

impl From<u32> for Step {
    fn from(code: u32) -> Self {
        match code {
            0 => Step::Fresh,
            1 => Step::Menu,
            10 => Step::ConfirmHandoff(ServiceLine::Licitaciones),
            20 => Step::ConfirmHandoff(ServiceLine::Proyectos),
            11 => Step::AwaitName(Topic::Licitaciones),
            21 => Step::AwaitName(Topic::Proyectos),
            40 => Step::AwaitName(Topic::Representante),
            12 => Step::AwaitEmail(Topic::Licitaciones),
            22 => Step::AwaitEmail(Topic::Proyectos),
            41 => Step::AwaitEmail(Topic::Representante),
            13 => Step::AwaitInquiry(Topic::Licitaciones),
            23 => Step::AwaitInquiry(Topic::Proyectos),
            42 => Step::AwaitInquiry(Topic::Representante),
            HUMAN_STEP_CODE => Step::Human,
            other => Step::Unrecognized(other),
        }
    }
}

impl From<Step> for u32 {
    fn from(step: Step) -> Self {
        match step {
            Step::Fresh => 0,
            Step::Menu => 1,
            Step::ConfirmHandoff(ServiceLine::Licitaciones) => 10,
            Step::ConfirmHandoff(ServiceLine::Proyectos) => 20,
            Step::AwaitName(Topic::Licitaciones) => 11,
            Step::AwaitName(Topic::Proyectos) => 21,
            Step::AwaitName(Topic::Representante) => 40,
            Step::AwaitEmail(Topic::Licitaciones) => 12,
            Step::AwaitEmail(Topic::Proyectos) => 22,
            Step::AwaitEmail(Topic::Representante) => 41,
            Step::AwaitInquiry(Topic::Licitaciones) => 13,
            Step::AwaitInquiry(Topic::Proyectos) => 23,
            Step::AwaitInquiry(Topic::Representante) => 42,
            Step::Human => HUMAN_STEP_CODE,
            Step::Unrecognized(code) => code,
        }
    }
}

/// Everything tracked for one chat identifier.
///
/// Field names match the persisted JSON produced since the first
/// deployment, so existing state files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub step: Step,
    #[serde(default)]
    pub topic: Option<Topic>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub consulta: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl ConversationRecord {
    /// A brand-new record for a chat seen for the first time.
    pub fn fresh() -> Self {
        Self {
            step: Step::Fresh,
            topic: None,
            nombre: None,
            email: None,
            consulta: None,
            last_updated: Utc::now(),
        }
    }

    pub fn is_human(&self) -> bool {
        self.step.is_human()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_codes_round_trip() {
        for code in [0u32, 1, 10, 11, 12, 13, 20, 21, 22, 23, 40, 41, 42, 999] {
            assert_eq!(Step::from(code).code(), code);
        }
    }

    #[test]
    fn unknown_codes_survive_as_unrecognized() {
        assert_eq!(Step::from(7), Step::Unrecognized(7));
        assert_eq!(Step::from(7).code(), 7);
        assert_eq!(Step::from(30), Step::Unrecognized(30));
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let record = ConversationRecord {
            step: Step::ConfirmHandoff(ServiceLine::Licitaciones),
            topic: Some(Topic::Licitaciones),
            nombre: None,
            email: None,
            consulta: None,
            last_updated: Utc::now(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["step"], 10);
        assert_eq!(value["topic"], "licitaciones");
        assert!(value.get("lastUpdated").is_some());
    }

    #[test]
    fn record_loads_with_missing_optional_fields() {
        let raw = r#"{"step": 1, "lastUpdated": "2025-03-01T12:00:00Z"}"#;
        let record: ConversationRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.step, Step::Menu);
        assert_eq!(record.topic, None);
        assert_eq!(record.nombre, None);
    }
}
