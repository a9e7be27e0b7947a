//! # C-Gate Command Types
//!
//! Pure data structures for the C-Gate protocol front end: the typed command
//! values produced by the codec and the canonical wire-text rendering the
//! gateway accepts on its command channel.
//!
//! ## What This Crate Contains
//! - `Address`: opaque canonical bus address text
//! - `Command`: the tagged command value with its `Display` wire rendering
//!
//! ## What This Crate Does NOT Contain
//! - Grammar or parsing logic (belongs in `cgate-codec`)
//! - Network transport logic (belongs in `cgate-network`)
//!
//! ## Architecture Role
//!
//! ```text
//! cgate-types → cgate-codec → cgate-network
//!     ↑             ↓              ↓
//! Pure Data    Protocol Rules   Transport
//! Structures   Parse/Render     Connections
//! ```

pub mod address;
pub mod command;

pub use address::Address;
pub use command::{Command, LEVEL_MAX};
