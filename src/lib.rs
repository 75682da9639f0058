//! Parser for permission-to-method maps used by static taint analysis.
//!
//! A map assigns each API method the permissions a caller must hold and,
//! optionally, a taint role (`_SOURCE_`, `_SINK_` or `_NONE_`). See
//! [`parser`] for the line format.

pub mod config;
pub mod error;
pub mod formats;
pub mod method;
pub mod parser;
pub mod writer;

pub use config::{Config, DuplicatePolicy, ParserConfig};
pub use error::{PermapError, Result};
pub use method::{AndroidMethod, MethodSignature, Role};
pub use parser::{ParsedMap, PermissionMethodParser, SkippedLine};
