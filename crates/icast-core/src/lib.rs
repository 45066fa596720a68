//! iCast core library: scoreboard broadcast decoding and snapshot publishing.
//!
//! This crate implements the receive pipeline used by the CLI: a datagram
//! source feeds the receiver, which drives the protocol decoder
//! (layout/reader/parser/normalize) and hands each complete record to the
//! snapshot publisher. Decoding is byte-oriented and side-effect free; socket
//! I/O is isolated in `source` and file I/O in `publish`.
//!
//! Invariants:
//! - Every record is built from exactly one datagram; nothing is merged
//!   across packets.
//! - A message with fewer than 13 fields never reaches normalization.
//! - The published snapshot is replaced atomically; readers never see a
//!   partial file.
//!
//! # Examples
//! ```
//! use icast_core::{decode_datagram, encode_message};
//!
//! let raw = encode_message("12:34;2;1;2;;;;;;;Lions;Tigers;GAME TIME")?;
//! let facts = decode_datagram(&raw)?;
//! assert_eq!(facts.score, "2\u{a0}:\u{a0}1");
//! assert_eq!(facts.home_team_name, "Lions");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod protocols;
mod publish;
mod receiver;
mod source;

pub use protocols::common::hex::{FromHexError, decode_hex, encode_hex};
pub use protocols::icast::error::{ArityError, DecodeError, EncodeError};
pub use protocols::icast::{
    FieldList, Period, TimeType, decode_message, encode_message, extract_penalty, normalize,
    parse_fields, time_period_label,
};
pub use publish::{PublishError, SnapshotPublisher, write_atomic};
pub use receiver::{
    MAX_CONSECUTIVE_TRANSPORT_ERRORS, ReceiveError, ReceiveStats, Receiver, ReceiverConfig,
};
pub use source::{Datagram, DatagramSource, TransportError, UdpDatagramSource};

/// UDP port the scoreboard broadcasts on.
pub const DEFAULT_PORT: u16 = 50078;
/// Snapshot file written when no output path is configured.
pub const DEFAULT_OUTPUT: &str = "match-facts.json";
/// Receive buffer size; longer datagrams are truncated by the transport.
pub const RECV_BUFFER_LEN: usize = 1024;

/// Scoreboard state decoded from one datagram.
///
/// Optional fields are omitted from the JSON snapshot when absent.
///
/// # Examples
/// ```
/// use icast_core::ScoreboardFacts;
///
/// let facts = ScoreboardFacts {
///     time: "15:00".to_string(),
///     score_home: "0".to_string(),
///     score_guest: "0".to_string(),
///     score: "0\u{a0}:\u{a0}0".to_string(),
///     period: "1".to_string(),
///     time_period: Some("15:00 Pause".to_string()),
///     home_penalty_1: None,
///     home_penalty_2: None,
///     guest_penalty_1: None,
///     guest_penalty_2: None,
///     home_team_name: "Lions".to_string(),
///     guest_team_name: "Tigers".to_string(),
///     time_type: "INTERMISSION".to_string(),
/// };
/// let value = serde_json::to_value(&facts)?;
/// assert!(value.get("home_penalty_1").is_none());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardFacts {
    /// Game clock as sent by the scoreboard.
    pub time: String,
    pub score_home: String,
    pub score_guest: String,
    /// `home : guest`, separated by non-breaking spaces.
    pub score: String,
    /// Raw period token.
    pub period: String,
    /// Clock label derived from the time type and period, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_period: Option<String>,
    /// Remaining penalty time, present only for an active penalty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_penalty_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_penalty_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_penalty_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_penalty_2: Option<String>,
    pub home_team_name: String,
    pub guest_team_name: String,
    /// Match state token (`GAME TIME`, `INTERMISSION`, `TIME-OUT`, ...).
    pub time_type: String,
}

/// Run the full decode pipeline on one raw datagram.
///
/// # Examples
/// ```
/// use icast_core::{ReceiveError, decode_datagram, encode_message};
///
/// let raw = encode_message("12:34;2;1")?;
/// let err = decode_datagram(&raw).unwrap_err();
/// assert!(matches!(err, ReceiveError::Arity(_)));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode_datagram(raw: &[u8]) -> Result<ScoreboardFacts, ReceiveError> {
    let message = decode_message(raw)?;
    let fields = parse_fields(&message)?;
    Ok(normalize(&fields))
}
