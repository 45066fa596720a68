//! iCast scoreboard protocol decoding.
//!
//! A datagram carries one ASCII message, byte-expanded so that every
//! character occupies four bytes with the code in the last one. The message
//! is a `;`-separated positional field list; at least 13 fields are required
//! and positions 0-7 and 10-12 are consumed. Positions 8, 9 and 13-20 are
//! reserved and passed over.
//!
//! Layering follows the other decoders: `layout` holds positions and wire
//! geometry, `reader`/`writer` handle the byte expansion, `parser` enforces
//! arity, and `normalize` builds the published record without I/O.

pub mod error;
pub mod layout;
pub mod normalize;
pub mod parser;
pub mod reader;
pub mod writer;

pub use normalize::{Period, TimeType, extract_penalty, normalize, time_period_label};
pub use parser::{FieldList, decode_message, parse_fields};
pub use writer::encode_message;
