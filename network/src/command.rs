//! Command channel: outbound command lines and their response stream.

use crate::error::{TransportError, TransportResult};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

/// One connection to the gateway's command port.
pub struct CommandChannel {
    addr: String,
}

impl CommandChannel {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Connect and split into a writer for outbound commands and a buffered
    /// reader carrying the gateway's response lines.
    pub async fn connect(&self) -> TransportResult<(CommandWriter, BufReader<OwnedReadHalf>)> {
        let stream =
            TcpStream::connect(&self.addr)
                .await
                .map_err(|source| TransportError::Connect {
                    addr: self.addr.clone(),
                    source,
                })?;
        info!(addr = %self.addr, "connected to command channel");
        let (read, write) = stream.into_split();
        Ok((CommandWriter::new(write), BufReader::new(read)))
    }
}

/// Write half of the command channel. The CRLF terminator belongs to the
/// transport, not to the rendered command text.
pub struct CommandWriter {
    inner: Box<dyn AsyncWrite + Send + Unpin>,
}

impl CommandWriter {
    pub fn new(writer: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            inner: Box::new(writer),
        }
    }

    pub async fn send_line(&mut self, line: &str) -> TransportResult<()> {
        let io = |source| TransportError::Io {
            channel: "command",
            source,
        };
        self.inner.write_all(line.as_bytes()).await.map_err(io)?;
        self.inner.write_all(b"\r\n").await.map_err(io)?;
        self.inner.flush().await.map_err(io)?;
        debug!(line, "command sent");
        Ok(())
    }
}

/// Forward raw response lines until the peer closes the connection. The
/// session layer picks level reports out of them.
pub async fn pump_response_lines<R>(
    reader: R,
    responses: mpsc::Sender<String>,
) -> TransportResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|source| TransportError::Io {
            channel: "command",
            source,
        })?
    {
        trace!(line = %line, "command channel response");
        responses
            .send(line)
            .await
            .map_err(|_| TransportError::ChannelClosed { channel: "command" })?;
    }
    info!("command channel closed by peer");
    Ok(())
}
