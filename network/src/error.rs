//! Transport error types.

use cgate_codec::GrammarError;
use thiserror::Error;

/// Main transport error type.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Dialing a channel endpoint failed.
    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure on an established channel.
    #[error("i/o failure on the {channel} channel: {source}")]
    Io {
        channel: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The consumer side of a channel queue went away.
    #[error("{channel} channel consumer dropped")]
    ChannelClosed { channel: &'static str },

    /// A status line the grammar rejects, surfaced only under the strict
    /// parse policy.
    #[error("status line rejected: {0}")]
    Grammar(#[from] GrammarError),
}

pub type TransportResult<T> = Result<T, TransportError>;
