//! Declarative BGP intent model, device snapshots and line-oriented
//! configuration diffing shared by the compiler front-ends.

pub mod device;
pub mod diff;
pub mod format;
pub mod model;
pub mod parser;

pub use device::{DeviceSnapshot, ExistingNamedObjects, InstalledNeighbor, SessionState};
pub use diff::{diff, diff_with_options, DiffEntry, DiffOptions};
pub use format::{format_json, format_summary, format_text};
pub use model::Document;
pub use parser::{parse, parse_file, parse_snapshot_file, ParseError};
