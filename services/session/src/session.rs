//! The gateway session: both channels, the level cache, and polling.

use crate::config::SessionConfig;
use cgate_network::{
    pump_response_lines, CommandChannel, CommandWriter, StatusChannel, TransportError,
};
use cgate_types::{Address, Command};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

/// Level report line on the command channel, e.g.
/// `300-//HOME/254/56/1: level=0`.
static LEVEL_REPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^300-([/\w]*):\W?LEVEL=(\d+)").expect("level report pattern"));

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("command channel is not connected")]
    NotConnected,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// One logical gateway session over the two channels.
///
/// Every inbound command refreshes the last-known level for its address;
/// outbound convenience operations consult that cache (the `on` operation
/// only fires for a dark group unless forced). Shortly after the command
/// channel connects, the session polls the gateway for current group levels
/// and folds the reports into the cache.
pub struct CGateSession {
    config: SessionConfig,
    levels: DashMap<Address, u16>,
    writer: Mutex<Option<CommandWriter>>,
    polling: AtomicBool,
}

impl CGateSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            levels: DashMap::new(),
            writer: Mutex::new(None),
            polling: AtomicBool::new(false),
        }
    }

    /// Last-known level for an address, if any report or command carried one.
    pub fn level(&self, address: &Address) -> Option<u16> {
        self.levels.get(address).map(|entry| *entry)
    }

    /// Write one raw line to the command channel.
    pub async fn send(&self, line: &str) -> Result<(), SessionError> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(SessionError::NotConnected)?;
        writer.send_line(line).await?;
        Ok(())
    }

    pub async fn ramp(&self, address: &Address, level: u16) -> Result<(), SessionError> {
        self.send(&format!("RAMP {address} {level}")).await
    }

    /// Switch a group on. Skipped when the cache says it is already lit,
    /// unless `force`.
    pub async fn on(&self, address: &Address, force: bool) -> Result<(), SessionError> {
        if force || self.level(address).unwrap_or(0) == 0 {
            self.send(&format!("ON {address}")).await
        } else {
            debug!(%address, "group already lit, not sending ON");
            Ok(())
        }
    }

    pub async fn off(&self, address: &Address) -> Result<(), SessionError> {
        self.send(&format!("OFF {address}")).await
    }

    pub async fn trigger_event(&self, address: &Address, selector: u16) -> Result<(), SessionError> {
        self.send(&format!("TRIGGER EVENT {address} {selector}")).await
    }

    /// Run the status channel: reconnect forever, cache levels from every
    /// decoded command and forward it to `events`. Returns when the events
    /// consumer goes away, or with the grammar error under strict parsing.
    pub async fn run_status(&self, events: mpsc::Sender<Command>) -> Result<(), SessionError> {
        let mut backoff = self.config.backoff();
        loop {
            let channel =
                StatusChannel::new(self.config.status_addr.clone(), self.config.parse_policy());
            let (tx, mut rx) = mpsc::channel::<Command>(64);
            let connection = channel.run(tx);
            tokio::pin!(connection);
            let result = loop {
                tokio::select! {
                    result = &mut connection => break result,
                    Some(command) = rx.recv() => {
                        self.record_status(&command);
                        if events.send(command).await.is_err() {
                            return Ok(());
                        }
                    }
                }
            };
            // Commands the pump buffered before the connection ended.
            while let Ok(command) = rx.try_recv() {
                self.record_status(&command);
                let _ = events.send(command).await;
            }
            match result {
                Ok(()) => {
                    backoff.reset();
                    warn!("status channel closed, reconnecting");
                }
                Err(TransportError::Grammar(err)) => {
                    return Err(TransportError::Grammar(err).into());
                }
                Err(err @ TransportError::Connect { .. }) => {
                    warn!(%err, "status channel connect failed");
                }
                Err(err) => {
                    backoff.reset();
                    warn!(%err, "status channel failed");
                }
            }
            tokio::time::sleep(backoff.next_delay()).await;
        }
    }

    /// Run the command channel: reconnect forever, keep the writer slot
    /// fresh, open a poll window per connection and absorb level reports.
    pub async fn run_command(self: Arc<Self>) {
        let mut backoff = self.config.backoff();
        loop {
            let channel = CommandChannel::new(self.config.command_addr.clone());
            match channel.connect().await {
                Ok((writer, reader)) => {
                    backoff.reset();
                    *self.writer.lock().await = Some(writer);
                    Self::open_poll_window(&self);
                    let (tx, mut rx) = mpsc::channel::<String>(64);
                    let pump = pump_response_lines(reader, tx);
                    tokio::pin!(pump);
                    let result = loop {
                        tokio::select! {
                            result = &mut pump => break result,
                            Some(line) = rx.recv() => self.absorb_response(&line),
                        }
                    };
                    while let Ok(line) = rx.try_recv() {
                        self.absorb_response(&line);
                    }
                    if let Err(err) = result {
                        warn!(%err, "command channel failed");
                    } else {
                        warn!("command channel closed, reconnecting");
                    }
                    *self.writer.lock().await = None;
                    self.polling.store(false, Ordering::Relaxed);
                }
                Err(err) => warn!(%err, "command channel connect failed"),
            }
            tokio::time::sleep(backoff.next_delay()).await;
        }
    }

    fn record_status(&self, command: &Command) {
        let level = command.level();
        debug!(address = %command.address(), level, "caching reported level");
        self.levels.insert(command.address().clone(), level);
    }

    fn absorb_response(&self, line: &str) {
        if !self.polling.load(Ordering::Relaxed) {
            return;
        }
        if let Some(caps) = LEVEL_REPORT.captures(line) {
            if let Ok(level) = caps[2].parse::<u16>() {
                let address = Address::new(&caps[1]);
                debug!(%address, level, "polled level");
                self.levels.insert(address, level);
            }
        }
    }

    /// Poll timing per connection: the report window opens at connect, the
    /// GET goes out after the poll delay, the window closes at the end.
    fn open_poll_window(session: &Arc<Self>) {
        session.polling.store(true, Ordering::Relaxed);
        let session = Arc::clone(session);
        let delay = session.config.poll_delay();
        let window = session.config.poll_window();
        let network = session.config.network;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = session.send(&format!("GET {network}/56/* LEVEL")).await {
                warn!(%err, "level poll failed");
            }
            tokio::time::sleep(window.saturating_sub(delay)).await;
            session.polling.store(false, Ordering::Relaxed);
        });
    }
}
