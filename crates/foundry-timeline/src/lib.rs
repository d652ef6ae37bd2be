//! Timeline event workflow for Foundry.
//!
//! This crate provides the `TimelineWorkflow` through which founders
//! submit progress updates and staff review them:
//! - Status transitions (Pending, Verified, Needs Improvement, Not Accepted)
//! - Grading against a target's rubric
//! - Attachment bookkeeping applied as one transaction
//! - Startup fields derived from verified events (links, stage)
//! - Visibility of founder-scoped events and private attachments
//!
//! It also hosts the `CalendarRegistry` for community calendar events.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use url::Url;
//! use foundry_models::{Link, TimelineEventStatus};
//! use foundry_persistence::Store;
//! use foundry_timeline::{
//!     TimelineEventFilter, TimelineEventSubmission, TimelineWorkflow, Uploads, WorkflowConfig,
//! };
//!
//! let store = Arc::new(Store::open("/tmp/foundry").unwrap());
//! let workflow = TimelineWorkflow::new(
//!     store,
//!     WorkflowConfig::new(Url::parse("https://www.example.com").unwrap()),
//! );
//!
//! // Founder submits an update
//! let founder = "founder-1".into();
//! let submission = TimelineEventSubmission::new("tetype-1", "New deck", NaiveDate::from_ymd_opt(2024, 3, 1))
//!     .with_links(vec![Link::public("https://deck.example.com")]);
//! let event = workflow.submit(&founder, submission, &Uploads::new()).unwrap();
//!
//! // Staff verify it
//! workflow.verify(&event.id).unwrap();
//!
//! // List what the founder can see
//! let filter = TimelineEventFilter::new().with_status(TimelineEventStatus::Verified);
//! let events = workflow.list(&filter, Some(&founder), Some(20)).unwrap();
//! ```

pub mod attachments;
pub mod calendar;
pub mod derived;
pub mod error;
pub mod filter;
pub mod notify;
pub mod submission;
pub mod workflow;

pub use calendar::{CalendarEventRegistration, CalendarRegistry};
pub use error::{Result, TimelineError, ValidationError};
pub use filter::TimelineEventFilter;
pub use notify::{LogNotifier, Notifier, NotifyError, RecordingNotifier};
pub use submission::{CriterionGrade, TimelineEventChanges, TimelineEventSubmission, Uploads};
pub use workflow::{TimelineEventDetail, TimelineWorkflow, WorkflowConfig};
