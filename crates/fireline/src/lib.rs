//! `fireline` - Incident intake and record keeping for fire-department
//! operations
//!
//! This library implements the multi-step incident intake flow: a basic form
//! creates a pending record in the local store, and a nature-specific
//! follow-up form is expanded from flat dotted-key entries into a nested
//! payload, normalized against the nature's schema, and merged to complete
//! the record.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod report;
pub mod schema;
pub mod store;
pub mod tree;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{IncidentRecord, IncidentStatus, Nature};
pub use store::{Store, StoreStats};
pub use tree::ConflictPolicy;
