//! IRC connection configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the IRC transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrcConfig {
    /// IRC server hostname (e.g. `"irc.libera.chat"`).
    #[serde(default)]
    pub server: String,

    /// IRC server port (plaintext).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bot nickname on the IRC network.
    #[serde(default)]
    pub nickname: String,

    /// Username sent in the `USER` command. Defaults to the nickname.
    #[serde(default)]
    pub username: Option<String>,

    /// Real name sent in the `USER` command.
    #[serde(default = "default_realname")]
    pub realname: String,

    /// Channels to join on connect (e.g. `["#ops", "#deploys"]`).
    #[serde(default)]
    pub channels: Vec<String>,

    /// Environment variable name that holds the server password.
    ///
    /// Only the variable name lives in configuration, never the password.
    #[serde(default, alias = "passwordEnv")]
    pub password_env: Option<String>,

    /// Delay in seconds before reconnecting after a disconnect.
    #[serde(default = "default_reconnect_delay_secs", alias = "reconnectDelaySecs")]
    pub reconnect_delay_secs: u64,
}

fn default_port() -> u16 {
    6667
}

fn default_realname() -> String {
    "webrelay".into()
}

fn default_reconnect_delay_secs() -> u64 {
    5
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: default_port(),
            nickname: String::new(),
            username: None,
            realname: default_realname(),
            channels: Vec::new(),
            password_env: None,
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

impl IrcConfig {
    /// Username for registration, falling back to the nickname.
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.nickname)
    }

    /// `host:port` string for the TCP connection.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }
}

/// Validate the IRC configuration.
///
/// Checks:
/// - `server` is non-empty and free of protocol-injection characters
/// - `nickname` is non-empty and free of protocol-injection characters
/// - `username` and `realname`, if set, carry no line breaks
/// - Channel names start with `#` or `&`
pub fn validate_config(config: &IrcConfig) -> Result<(), String> {
    if config.server.is_empty() {
        return Err("irc: server is required".into());
    }
    sanitize_irc_argument(&config.server).map_err(|e| format!("irc: invalid server: {e}"))?;

    if config.nickname.is_empty() {
        return Err("irc: nickname is required".into());
    }
    sanitize_irc_argument(&config.nickname)
        .map_err(|e| format!("irc: invalid nickname: {e}"))?;
    if config.nickname.contains(' ') {
        return Err("irc: invalid nickname: contains a space".into());
    }

    if let Some(user) = &config.username {
        sanitize_irc_argument(user).map_err(|e| format!("irc: invalid username: {e}"))?;
    }
    if config.realname.contains(['\r', '\n', '\0']) {
        return Err("irc: invalid realname: contains a line break".into());
    }

    for ch in &config.channels {
        if !ch.starts_with('#') && !ch.starts_with('&') {
            return Err(format!(
                "irc: channel name must start with '#' or '&', got {:?}",
                ch
            ));
        }
        sanitize_channel_name(ch).map_err(|e| format!("irc: invalid channel name: {e}"))?;
    }

    Ok(())
}

/// Sanitize an IRC channel name.
///
/// Channel names may begin with `#` or `&`, but the remainder must not
/// contain protocol injection characters, list separators, or spaces.
pub fn sanitize_channel_name(name: &str) -> Result<&str, String> {
    let Some(first) = name.chars().next() else {
        return Err("empty channel name".into());
    };

    const BANNED_CHARS: &[char] = &['\n', '\r', '\0', ' ', ',', '\x07'];

    let body = &name[first.len_utf8()..];
    if body.is_empty() && (first == '#' || first == '&') {
        return Err("channel name has no body after the prefix".into());
    }
    for ch in BANNED_CHARS {
        if name.contains(*ch) {
            return Err(format!(
                "channel name contains forbidden character: {:?}",
                ch
            ));
        }
    }

    Ok(name)
}

/// Sanitize a string argument for safe use in IRC commands.
///
/// Rejects arguments containing characters that could terminate the
/// current protocol line (newlines, carriage returns, null bytes).
pub fn sanitize_irc_argument(arg: &str) -> Result<&str, String> {
    if arg.is_empty() {
        return Err("empty argument".into());
    }

    const BANNED_CHARS: &[char] = &['\n', '\r', '\0'];

    for ch in BANNED_CHARS {
        if arg.contains(*ch) {
            return Err(format!("argument contains forbidden character: {:?}", ch));
        }
    }

    Ok(arg)
}
