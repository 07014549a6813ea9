#![forbid(unsafe_code)]

//! Schedule model, snapshot access and next-session resolution for pitwall.

pub mod json_path;
pub mod model;
pub mod resolve;
pub mod snapshot;
pub mod time;

pub use model::*;
pub use resolve::{next_session, resolve_next_session};
pub use snapshot::{parse_snapshot, FileSnapshot, InMemorySnapshot, SnapshotError, SnapshotSource};
pub use time::{combine_date_time, now, to_iso_utc};
