//! Project database integration and project layout definitions.
//!
//! This module wraps a SQLite database storing:
//! - Scanned source files and their content hashes
//! - Extracted test cases with their assigned categories
//! - Scan run histories
//!
//! It also defines:
//! - `DbConfig`: simple DB path wrapper.
//! - `ProjectConfig`: serializable project metadata.
//! - `ProjectLayout`: computed paths for project directories/files.
//! - `ProjectDb`: a small SQLite wrapper with versioned schema.

pub mod config;
pub mod context;
pub mod layout;
pub mod models;
pub mod project_db;
pub mod util;

pub use config::*;
pub use context::*;
pub use layout::*;
pub use models::*;
pub use project_db::*;
pub use util::*;
