//! Textpatch: transactional multi-edit text engine
//!
//! Given a file and an ordered list of find/replace operations, either every
//! operation applies and the result is persisted atomically, or nothing
//! changes at all.
//!
//! # Architecture
//!
//! A session runs the same pure transformation chain twice: a dry-run pass
//! that must fully succeed before anything touches the filesystem, then a
//! commit pass whose output is fingerprint-checked against the dry run and
//! written via temp-file + rename. Matching is literal, non-overlapping
//! substring scanning; a search text that matches more than once must opt
//! into `replace_all` or the session fails as ambiguous.
//!
//! # Safety
//!
//! - Operations are validated at construction; invalid ones cannot exist
//! - Atomic file writes (tempfile + fsync + rename)
//! - Absolute-path targets only, traversal segments rejected
//! - Every failure is terminal: no retries, no partial application
//!
//! # Example
//!
//! ```no_run
//! use textpatch::{EditOperation, EditSession};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = EditSession::new(
//!     "/srv/app/config.ini",
//!     vec![EditOperation::new("port = 8080", "port = 9090", false)?],
//! )?;
//!
//! let result = session.run()?;
//! println!("replaced {} occurrences", result.total_replaced);
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod error;
pub mod operation;
pub mod persist;
pub mod plan;
pub mod resolve;
pub mod safety;
pub mod session;

// Re-exports
pub use diff::{diff_report, DiffStats};
pub use error::EngineError;
pub use operation::{EditOperation, EditSession, OperationError};
pub use plan::{load_from_path, load_from_str, ConfigError, PlanConfig};
pub use resolve::{resolve, Resolution, ResolveError};
pub use safety::{validate_target, PathError};
pub use session::{apply_chain, EditOutcome, SessionResult};
