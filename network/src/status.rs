//! Status channel: inbound gateway events, one per line.

use crate::error::{TransportError, TransportResult};
use cgate_codec::parse;
use cgate_types::Command;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

/// What to do with a line the grammar rejects. The codec itself never makes
/// this call; it is the transport owner's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Log and drop unparseable lines, keep the channel alive.
    #[default]
    Lenient,
    /// Surface the grammar error and tear the channel down.
    Strict,
}

/// One connection to the gateway's status port.
pub struct StatusChannel {
    addr: String,
    policy: ParsePolicy,
}

impl StatusChannel {
    pub fn new(addr: impl Into<String>, policy: ParsePolicy) -> Self {
        Self {
            addr: addr.into(),
            policy,
        }
    }

    /// Connect and pump decoded commands into `commands` until the peer
    /// closes the connection or the policy stops us.
    pub async fn run(&self, commands: mpsc::Sender<Command>) -> TransportResult<()> {
        let stream =
            TcpStream::connect(&self.addr)
                .await
                .map_err(|source| TransportError::Connect {
                    addr: self.addr.clone(),
                    source,
                })?;
        info!(addr = %self.addr, "connected to status channel");
        pump_status_lines(BufReader::new(stream), self.policy, commands).await
    }
}

/// Read status lines from `reader`, parse each one and forward the decoded
/// commands. Lines that parse to nothing (comments, unmapped events) are
/// dropped silently; grammar failures go through the policy.
pub async fn pump_status_lines<R>(
    reader: R,
    policy: ParsePolicy,
    commands: mpsc::Sender<Command>,
) -> TransportResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|source| TransportError::Io {
            channel: "status",
            source,
        })?
    {
        match parse(&line) {
            Ok(Some(command)) => {
                debug!(%command, "status line decoded");
                commands
                    .send(command)
                    .await
                    .map_err(|_| TransportError::ChannelClosed { channel: "status" })?;
            }
            Ok(None) => trace!(%line, "status line carries no command"),
            Err(err) => match policy {
                ParsePolicy::Lenient => warn!(%line, %err, "dropping unparseable status line"),
                ParsePolicy::Strict => return Err(err.into()),
            },
        }
    }
    info!("status channel closed by peer");
    Ok(())
}
