//! IRC transport implementation.
//!
//! Implements [`ChatTransport`] and [`Channel`] for a plaintext IRC
//! connection. Sends never touch the socket directly: they are queued and
//! written by the connection task, so request handlers return as soon as a
//! line is queued.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use webrelay_types::config::IrcConfig;
use webrelay_types::config::irc::{sanitize_channel_name, validate_config};
use webrelay_types::error::ChannelError;

use super::protocol::{Message, normalize_channel, privmsg_lines, same_nick};
use super::roster::Roster;
use crate::traits::{Channel, ChatTransport};

/// Capacity of the outbound line queue.
const OUTBOUND_QUEUE: usize = 256;

/// Per-connection state owned by the session loop.
#[derive(Debug)]
struct SessionState {
    nick: String,
    registered: bool,
}

/// IRC chat transport.
pub struct IrcTransport {
    config: IrcConfig,
    roster: Roster,
    connected: Arc<AtomicBool>,
    outbound_tx: mpsc::Sender<String>,
    outbound_rx: Mutex<Option<mpsc::Receiver<String>>>,
}

impl IrcTransport {
    /// Create a new IRC transport with the given configuration.
    pub fn new(config: IrcConfig) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE);
        Self {
            config,
            roster: Roster::new(),
            connected: Arc::new(AtomicBool::new(false)),
            outbound_tx,
            outbound_rx: Mutex::new(Some(outbound_rx)),
        }
    }

    /// The live joined-channel roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Whether the connection is registered with the server.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn validate(&self) -> Result<(), ChannelError> {
        validate_config(&self.config).map_err(ChannelError::Other)
    }

    /// Resolve the server password from the configured env var.
    fn password(&self) -> Result<Option<String>, ChannelError> {
        let Some(var) = &self.config.password_env else {
            return Ok(None);
        };
        match std::env::var(var) {
            Ok(pass) if !pass.is_empty() => Ok(Some(pass)),
            _ => Err(ChannelError::Other(format!(
                "irc: password env var {var} is not set"
            ))),
        }
    }

    fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.roster.clear();
    }

    /// Drive one connection until it fails or `cancel` fires.
    async fn run_session<S>(
        &self,
        stream: S,
        outbound: &mut mpsc::Receiver<String>,
        password: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), ChannelError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (read_half, mut writer) = tokio::io::split(stream);
        let mut reader = BufReader::new(read_half);
        let mut buf = Vec::with_capacity(512);
        let mut state = SessionState {
            nick: self.config.nickname.clone(),
            registered: false,
        };

        if let Some(pass) = password {
            write_line(&mut writer, &format!("PASS {pass}")).await?;
        }
        write_line(&mut writer, &format!("NICK {}", state.nick)).await?;
        write_line(
            &mut writer,
            &format!(
                "USER {} 0 * :{}",
                self.config.username(),
                self.config.realname
            ),
        )
        .await?;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = write_line(&mut writer, "QUIT :shutting down").await;
                    return Ok(());
                }
                // Partial reads stay in `buf` if another branch wins.
                read = reader.read_until(b'\n', &mut buf) => {
                    let n = read
                        .map_err(|e| ChannelError::ConnectionFailed(format!("read failed: {e}")))?;
                    if n == 0 {
                        return Err(ChannelError::ConnectionFailed(
                            "server closed the connection".into(),
                        ));
                    }
                    // Other clients may send any encoding; never fail on it.
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    buf.clear();
                    let Some(msg) = Message::parse(&line) else {
                        continue;
                    };
                    for reply in self.handle_message(&msg, &mut state)? {
                        write_line(&mut writer, &reply).await?;
                    }
                }
                Some(out) = outbound.recv(), if state.registered => {
                    write_line(&mut writer, &out).await?;
                }
            }
        }
    }

    /// React to one server line, returning the lines to write back.
    fn handle_message(
        &self,
        msg: &Message,
        state: &mut SessionState,
    ) -> Result<Vec<String>, ChannelError> {
        let from_self = msg.nick().is_some_and(|n| same_nick(n, &state.nick));

        match msg.command.as_str() {
            "PING" => Ok(vec![format!("PONG :{}", msg.param(0).unwrap_or_default())]),
            "001" => {
                state.registered = true;
                if let Some(nick) = msg.param(0) {
                    state.nick = nick.to_string();
                }
                self.connected.store(true, Ordering::SeqCst);
                info!(nick = %state.nick, "registered with IRC server");
                Ok(self
                    .config
                    .channels
                    .iter()
                    .map(|ch| format!("JOIN {ch}"))
                    .collect())
            }
            "433" if !state.registered => {
                state.nick.push('_');
                warn!(nick = %state.nick, "nickname in use, retrying");
                Ok(vec![format!("NICK {}", state.nick)])
            }
            "JOIN" if from_self => {
                if let Some(channel) = msg.param(0) {
                    self.roster.insert(channel);
                    info!(channel, "joined channel");
                }
                Ok(Vec::new())
            }
            "PART" if from_self => {
                if let Some(channel) = msg.param(0) {
                    self.roster.remove(channel);
                    info!(channel, "left channel");
                }
                Ok(Vec::new())
            }
            "KICK" => {
                if let (Some(channel), Some(target)) = (msg.param(0), msg.param(1))
                    && same_nick(target, &state.nick)
                {
                    self.roster.remove(channel);
                    warn!(channel, by = msg.nick().unwrap_or("?"), "kicked from channel");
                }
                Ok(Vec::new())
            }
            "NICK" if from_self => {
                if let Some(nick) = msg.param(0) {
                    state.nick = nick.to_string();
                    info!(nick, "nickname changed");
                }
                Ok(Vec::new())
            }
            "403" | "405" | "471" | "473" | "474" | "475" => {
                warn!(
                    channel = msg.param(1).unwrap_or("?"),
                    reason = msg.param(2).unwrap_or(""),
                    "cannot join channel"
                );
                Ok(Vec::new())
            }
            "ERROR" => Err(ChannelError::ConnectionFailed(format!(
                "server error: {}",
                msg.param(0).unwrap_or_default()
            ))),
            "PRIVMSG" | "NOTICE" => {
                debug!(
                    from = msg.nick().unwrap_or("?"),
                    target = msg.param(0).unwrap_or("?"),
                    "ignoring inbound message"
                );
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }
}

async fn write_line<W>(writer: &mut W, line: &str) -> Result<(), ChannelError>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(format!("{line}\r\n").as_bytes())
        .await
        .map_err(|e| ChannelError::ConnectionFailed(format!("write failed: {e}")))
}

#[async_trait]
impl ChatTransport for IrcTransport {
    fn joined_channels(&self) -> HashSet<String> {
        self.roster.snapshot()
    }

    fn normalize_channel_name(&self, raw: &str) -> String {
        normalize_channel(raw)
    }

    async fn send_text(&self, channel: &str, text: &str) -> Result<(), ChannelError> {
        let target = normalize_channel(channel);
        sanitize_channel_name(&target).map_err(ChannelError::InvalidTarget)?;
        if !self.is_connected() {
            return Err(ChannelError::NotConnected);
        }

        let lines = privmsg_lines(&target, text);
        if lines.is_empty() {
            return Ok(());
        }
        // Reserve every slot up front so a message is queued whole or not at all.
        let permits = self
            .outbound_tx
            .try_reserve_many(lines.len())
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(()) => {
                    ChannelError::SendFailed("outbound queue full".into())
                }
                mpsc::error::TrySendError::Closed(()) => ChannelError::NotConnected,
            })?;
        debug!(to = %target, lines = lines.len(), "queueing PRIVMSG");
        for (permit, line) in permits.zip(lines) {
            permit.send(line);
        }
        Ok(())
    }
}

#[async_trait]
impl Channel for IrcTransport {
    fn name(&self) -> &str {
        "irc"
    }

    async fn start(&self, cancel: CancellationToken) -> Result<(), ChannelError> {
        info!("IRC transport starting");
        self.validate()?;
        let password = self.password()?;
        let mut outbound = self
            .outbound_rx
            .lock()
            .await
            .take()
            .ok_or_else(|| ChannelError::Other("irc transport already started".into()))?;
        let delay = Duration::from_secs(self.config.reconnect_delay_secs);
        let addr = self.config.address();

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => break,
                conn = TcpStream::connect(&addr) => match conn {
                    Ok(stream) => {
                        info!(server = %addr, "connected to IRC server");
                        self.run_session(stream, &mut outbound, password.as_deref(), &cancel)
                            .await
                    }
                    Err(e) => Err(ChannelError::ConnectionFailed(format!("{addr}: {e}"))),
                },
            };
            self.mark_disconnected();
            if cancel.is_cancelled() {
                break;
            }
            if let Err(e) = result {
                warn!(error = %e, "IRC connection lost");
            }

            // Lines queued for the old connection target channels we no
            // longer belong to.
            let mut dropped = 0usize;
            while outbound.try_recv().is_ok() {
                dropped += 1;
            }
            if dropped > 0 {
                debug!(dropped, "discarded queued lines after disconnect");
            }

            info!(delay_secs = delay.as_secs(), "reconnecting to IRC server");
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.mark_disconnected();
        info!("IRC transport shut down");
        Ok(())
    }
}
