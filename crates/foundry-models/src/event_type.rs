//! Timeline event types: the configuration that classifies submissions.

use serde::{Deserialize, Serialize};

use crate::founder::StartupLinkField;
use crate::ids::TimelineEventTypeId;

pub const KEY_NEW_DECK: &str = "new_deck";
pub const KEY_NEW_WIREFRAME: &str = "new_wireframe";
pub const KEY_NEW_PROTOTYPE: &str = "new_prototype";
pub const KEY_NEW_VIDEO: &str = "new_video";
pub const KEY_END_ITERATION: &str = "end_iteration";
pub const KEY_JOINED: &str = "joined_svco";

/// Who an event type speaks for. `Founder` events are personal and hidden
/// from everyone but the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventTypeRole {
    Founder,
    #[default]
    Product,
    Engineering,
    Design,
    Marketing,
    Governance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEventType {
    pub id: TimelineEventTypeId,
    pub key: String,
    pub title: String,

    #[serde(default)]
    pub role: EventTypeRole,

    /// Verified events of this type move the startup to a new stage.
    #[serde(default)]
    pub stage_change: bool,
}

impl TimelineEventType {
    pub fn new(key: impl Into<String>, title: impl Into<String>, role: EventTypeRole) -> Self {
        Self {
            id: TimelineEventTypeId::new(),
            key: key.into(),
            title: title.into(),
            role,
            stage_change: false,
        }
    }

    /// Marks the type as stage-changing.
    pub fn with_stage_change(mut self) -> Self {
        self.stage_change = true;
        self
    }

    pub fn founder_event(&self) -> bool {
        self.role == EventTypeRole::Founder
    }

    pub fn end_iteration(&self) -> bool {
        self.key == KEY_END_ITERATION
    }

    /// The startup field a verified event of this type fills in, if any.
    pub fn startup_link_field(&self) -> Option<StartupLinkField> {
        match self.key.as_str() {
            KEY_NEW_DECK => Some(StartupLinkField::Presentation),
            KEY_NEW_WIREFRAME => Some(StartupLinkField::Wireframe),
            KEY_NEW_PROTOTYPE => Some(StartupLinkField::Prototype),
            KEY_NEW_VIDEO => Some(StartupLinkField::ProductVideo),
            _ => None,
        }
    }

    /// Description used for system-generated events left blank.
    pub fn description_template(&self) -> Option<&'static str> {
        match self.key.as_str() {
            KEY_JOINED => Some(
                "We just registered our startup on SV.CO. Looking forward to an amazing learning experience!",
            ),
            _ => None,
        }
    }
}
