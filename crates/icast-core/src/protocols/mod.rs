//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: field positions and wire geometry (source of truth)
//! - `reader`/`writer`: byte-level conventions of the wire encoding
//! - `parser`: structural decoding and arity checks (no direct byte access)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O; sources and the receiver handle
//! sockets and files.

pub(crate) mod common;
pub mod icast;
