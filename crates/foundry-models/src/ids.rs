//! Type-safe ID wrappers for Foundry records.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generates an ID newtype with a record-specific prefix.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random ID.
            pub fn new() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4()))
            }

            /// Creates an ID from an existing string (for deserialization/testing).
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(FounderId, "founder");
define_id!(StartupId, "startup");
define_id!(BatchId, "batch");
define_id!(CourseId, "course");
define_id!(LevelId, "level");
define_id!(FacultyId, "faculty");
define_id!(TargetId, "target");
define_id!(EvaluationCriterionId, "criterion");
define_id!(TimelineEventTypeId, "tetype");
define_id!(TimelineEventId, "tevent");
define_id!(TimelineEventFileId, "tefile");
define_id!(FeedbackId, "feedback");
define_id!(CalendarEventId, "calevent");
