//! Typed command values and their canonical wire rendering.
//!
//! The wire protocol has no distinct on/off opcode: ON and OFF are ramps to
//! full and zero level with no transition time, so they are constructors on
//! the `Ramp` shape rather than variants of their own. `Display` renders the
//! exact text the gateway accepts on its command channel.

use crate::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Full brightness / "sealed" level on the bus.
pub const LEVEL_MAX: u16 = 255;

/// One decoded gateway command.
///
/// A value is produced by the codec from exactly one status line (or built
/// locally for outbound traffic) and is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Set a group to `level` over `time` seconds.
    Ramp {
        address: Address,
        level: u16,
        time: u32,
    },
    /// Fire an action selector on a trigger group.
    Trigger { address: Address, level: u16 },
    /// Security zone state; `level` is `LEVEL_MAX` for sealed, 0 for unsealed.
    ZoneSealed { address: Address, level: u16 },
    /// Security system armed with the given arm-type code.
    SystemArmed { address: Address, level: u16 },
}

impl Command {
    pub fn ramp(address: Address, level: u16, time: u32) -> Self {
        Command::Ramp {
            address,
            level,
            time,
        }
    }

    /// Switch a group fully on: a ramp to `LEVEL_MAX` with no transition.
    pub fn on(address: Address) -> Self {
        Command::Ramp {
            address,
            level: LEVEL_MAX,
            time: 0,
        }
    }

    /// Switch a group fully off: a ramp to 0 with no transition.
    pub fn off(address: Address) -> Self {
        Command::Ramp {
            address,
            level: 0,
            time: 0,
        }
    }

    pub fn address(&self) -> &Address {
        match self {
            Command::Ramp { address, .. }
            | Command::Trigger { address, .. }
            | Command::ZoneSealed { address, .. }
            | Command::SystemArmed { address, .. } => address,
        }
    }

    /// The reported level, whatever it means for the variant (target level,
    /// action selector, seal state, arm type).
    pub fn level(&self) -> u16 {
        match self {
            Command::Ramp { level, .. }
            | Command::Trigger { level, .. }
            | Command::ZoneSealed { level, .. }
            | Command::SystemArmed { level, .. } => *level,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Ramp {
                address,
                level,
                time,
            } => write!(f, "RAMP {address} {level} {time}"),
            Command::Trigger { address, level } => {
                write!(f, "TRIGGER EVENT {address} {level}")
            }
            Command::ZoneSealed { address, level } => {
                if *level == LEVEL_MAX {
                    write!(f, "# security zone_sealed {address}")
                } else {
                    write!(f, "# security zone_unsealed {address}")
                }
            }
            Command::SystemArmed { address, level } => {
                write!(f, "# security system_arm {address} {level}")
            }
        }
    }
}
