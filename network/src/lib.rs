//! # C-Gate Line Transport
//!
//! TCP line transport for the gateway's two text channels: the status port
//! that streams events and the command port that accepts command lines and
//! answers with response lines. One connection each, lines delivered in
//! order, no reordering or coalescing.
//!
//! Parsing happens here at the channel boundary so that consumers only ever
//! see typed commands; what to do with a line the grammar rejects is this
//! layer's [`ParsePolicy`], not the codec's.

pub mod command;
pub mod connector;
pub mod error;
pub mod status;

pub use command::{pump_response_lines, CommandChannel, CommandWriter};
pub use connector::Backoff;
pub use error::{TransportError, TransportResult};
pub use status::{pump_status_lines, ParsePolicy, StatusChannel};
