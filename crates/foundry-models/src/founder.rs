//! Founders and the startups they belong to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{BatchId, FounderId, LevelId, StartupId};

/// Role tags a founder can carry within their team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FounderRole {
    Product,
    Engineering,
    Design,
    Marketing,
    Governance,
}

/// A person enrolled in the programme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Founder {
    pub id: FounderId,
    pub name: String,
    pub email: String,

    #[serde(default)]
    pub roles: Vec<FounderRole>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,

    /// The startup this founder belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_id: Option<StartupId>,

    pub created_at: DateTime<Utc>,
}

impl Founder {
    /// Creates a founder without a startup.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: FounderId::new(),
            name: name.into(),
            email: email.into(),
            roles: Vec::new(),
            tags: Vec::new(),
            college: None,
            startup_id: None,
            created_at: Utc::now(),
        }
    }

    /// Returns this founder attached to the given startup.
    pub fn in_startup(mut self, startup_id: StartupId) -> Self {
        self.startup_id = Some(startup_id);
        self
    }

    /// Returns true if the founder is a member of the given startup.
    pub fn belongs_to(&self, startup_id: &StartupId) -> bool {
        self.startup_id.as_ref() == Some(startup_id)
    }
}

/// Intake cohort a startup was admitted with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub name: String,
    pub batch_number: u32,
}

/// Startup fields that verified timeline events can fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupLinkField {
    Presentation,
    Wireframe,
    Prototype,
    ProductVideo,
}

/// A team going through the accelerator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Startup {
    pub id: StartupId,
    pub product_name: String,
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<BatchId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_id: Option<LevelId>,

    /// Key of the event type that last moved the startup to a new stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wireframe_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prototype_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_video_link: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Startup {
    /// Creates a startup with no derived links.
    pub fn new(product_name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: StartupId::new(),
            product_name: product_name.into(),
            slug: slug.into(),
            batch_id: None,
            level_id: None,
            stage: None,
            presentation_link: None,
            wireframe_link: None,
            prototype_link: None,
            product_video_link: None,
            created_at: Utc::now(),
        }
    }

    /// Returns the current value of a derived link field.
    pub fn link(&self, field: StartupLinkField) -> Option<&str> {
        match field {
            StartupLinkField::Presentation => self.presentation_link.as_deref(),
            StartupLinkField::Wireframe => self.wireframe_link.as_deref(),
            StartupLinkField::Prototype => self.prototype_link.as_deref(),
            StartupLinkField::ProductVideo => self.product_video_link.as_deref(),
        }
    }

    /// Overwrites a derived link field.
    pub fn set_link(&mut self, field: StartupLinkField, url: impl Into<String>) {
        let slot = match field {
            StartupLinkField::Presentation => &mut self.presentation_link,
            StartupLinkField::Wireframe => &mut self.wireframe_link,
            StartupLinkField::Prototype => &mut self.prototype_link,
            StartupLinkField::ProductVideo => &mut self.product_video_link,
        };
        *slot = Some(url.into());
    }
}
