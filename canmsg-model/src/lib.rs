//! CAN Message Definition Model
//!
//! A small, pure library for CAN message definition files: messages made
//! of bit-level points (raw wire fields) and net fields (named signals
//! derived from one or more points, with units and declared values).
//!
//! # Architecture
//!
//! The library is intentionally minimal and side-effect free:
//! - Parses and validates message definition files (JSON)
//! - Decodes/encodes raw point bit patterns (sign, byte order, scaling,
//!   IEEE-754 single precision)
//! - Validates and samples simulation descriptors
//! - Resolves `{k}` placeholder tokens in net field names
//! - Builds the field/point cross-reference index used for highlighting
//!
//! The library does NOT:
//! - Fetch files from anywhere (a collaborator delivers JSON)
//! - Render anything or track UI state
//! - Persist edits
//!
//! All operations work on immutable inputs and return new values, so
//! concurrent callers need no coordination.
//!
//! # Example Usage
//!
//! ```
//! use canmsg_model::{CanFile, CrossRefIndex};
//!
//! let json = r#"[{
//!     "id": "0x100",
//!     "desc": "drive state",
//!     "points": [{"size": 8}, {"size": 16, "endianness": "big"}],
//!     "fields": [{"name": "Drive/State/{1}", "unit": "", "values": [2]}]
//! }]"#;
//!
//! let file = CanFile::parse("drive.json", json).unwrap();
//! let index = CrossRefIndex::build(&file.content[0]);
//! let refs = index.point_indices_for_field("Drive/State/{1}");
//! assert!(refs.contains(&1) && refs.contains(&2));
//! ```

// Public modules
pub mod codec;
pub mod file;
pub mod placeholder;
pub mod sim;
pub mod types;
pub mod xref;

// Re-export main types for convenience
pub use file::parse_can_id;
pub use placeholder::resolve_references;
pub use sim::{SimViolation, Sweeper};
pub use types::{
    CanFile, CanMessage, CanPoint, Endianness, ModelError, NetField, Result, Sim,
};
pub use xref::CrossRefIndex;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
