//! IRC line parsing and command construction (RFC 1459 subset).

use crate::format::COLOR_CODE;

/// Maximum IRC line length including the trailing CRLF.
pub const MAX_LINE: usize = 512;

/// Room left for the `:nick!user@host ` prefix the server prepends when it
/// forwards our PRIVMSG to other clients.
const PREFIX_ALLOWANCE: usize = 100;

/// A parsed IRC protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Source prefix without the leading `:` (e.g. `nick!user@host`).
    pub prefix: Option<String>,
    /// Command or three-digit numeric, uppercased.
    pub command: String,
    /// Parameters; a trailing `:` parameter is stored without the colon.
    pub params: Vec<String>,
}

impl Message {
    /// Parse one line (without CRLF). Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']);
        if rest.is_empty() {
            return None;
        }

        let prefix = if let Some(stripped) = rest.strip_prefix(':') {
            let (prefix, tail) = stripped.split_once(' ')?;
            rest = tail;
            Some(prefix.to_string())
        } else {
            None
        };

        rest = rest.trim_start_matches(' ');
        let (command, mut tail) = match rest.split_once(' ') {
            Some((cmd, tail)) => (cmd, tail),
            None => (rest, ""),
        };
        if command.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        loop {
            tail = tail.trim_start_matches(' ');
            if tail.is_empty() {
                break;
            }
            if let Some(trailing) = tail.strip_prefix(':') {
                params.push(trailing.to_string());
                break;
            }
            match tail.split_once(' ') {
                Some((param, next)) => {
                    params.push(param.to_string());
                    tail = next;
                }
                None => {
                    params.push(tail.to_string());
                    break;
                }
            }
        }

        Some(Self {
            prefix,
            command: command.to_ascii_uppercase(),
            params,
        })
    }

    /// Nickname portion of the prefix, if any.
    pub fn nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        Some(prefix.split(['!', '@']).next().unwrap_or(prefix))
    }

    /// Parameter at `idx`, if present.
    pub fn param(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }
}

/// Lowercase `s` under the `rfc1459` casemapping.
///
/// Besides ASCII letters, `[]\~` fold to `{}|^`, so `#Ops[1]` and
/// `#ops{1}` name the same channel.
pub fn irc_lowercase(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '[' => '{',
            ']' => '}',
            '\\' => '|',
            '~' => '^',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Convert a bare or prefixed channel name into its canonical identifier.
///
/// `ops` becomes `#ops`; names that already carry a `#` or `&` prefix keep
/// it. The result is folded with [`irc_lowercase`], since IRC channel names
/// compare case-insensitively.
pub fn normalize_channel(raw: &str) -> String {
    let lowered = irc_lowercase(raw.trim());
    if lowered.starts_with('#') || lowered.starts_with('&') {
        lowered
    } else {
        format!("#{lowered}")
    }
}

/// Compare two nicknames under the `rfc1459` casemapping.
pub fn same_nick(a: &str, b: &str) -> bool {
    irc_lowercase(a) == irc_lowercase(b)
}

/// Build `PRIVMSG` lines carrying `text` to `target`.
///
/// `text` is split on newlines; empty lines are dropped and `\r`/`\0` are
/// removed so that relayed content can never start a new protocol line.
/// Long lines are chunked on character boundaries to stay within
/// [`MAX_LINE`]. A colour open at a chunk boundary is re-opened at the
/// start of the next chunk, since clients reset formatting per message.
pub fn privmsg_lines(target: &str, text: &str) -> Vec<String> {
    let overhead = "PRIVMSG ".len() + target.len() + " :".len() + "\r\n".len();
    let budget = MAX_LINE
        .saturating_sub(overhead + PREFIX_ALLOWANCE)
        .max(1);

    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let clean: String = raw.chars().filter(|c| *c != '\r' && *c != '\0').collect();
        if clean.is_empty() {
            continue;
        }
        for chunk in chunk_colored(&clean, budget) {
            lines.push(format!("PRIVMSG {target} :{chunk}"));
        }
    }
    lines
}

/// Longest re-opening prefix: colour code plus the comma guard.
const REOPEN_MAX: usize = 5;

/// Split `s` into pieces of at most `max_bytes`, never inside a character
/// or a colour code, carrying the active colour across pieces.
fn chunk_colored(s: &str, max_bytes: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut active: Option<u8> = None;
    let mut rest = s;
    loop {
        let reopen = reopen_prefix(active, rest);
        if reopen.len() + rest.len() <= max_bytes {
            chunks.push(format!("{reopen}{rest}"));
            break;
        }
        let room = max_bytes.saturating_sub(REOPEN_MAX).max(1);
        let mut cut = room.min(rest.len());
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        cut = step_back_from_color_code(rest.as_bytes(), cut);
        if cut == 0 {
            // A single character (or code) wider than the budget.
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (head, tail) = rest.split_at(cut);
        chunks.push(format!("{reopen}{head}"));
        active = color_after(active, head);
        rest = tail;
        if rest.is_empty() {
            break;
        }
    }
    chunks
}

/// Colour code to prepend to a continuation piece.
fn reopen_prefix(active: Option<u8>, rest: &str) -> String {
    let Some(code) = active else {
        return String::new();
    };
    let mut prefix = format!("{COLOR_CODE}{code:02}");
    // A leading ",NN" would be read as a background colour.
    if rest.starts_with(',') {
        prefix.push_str("\x02\x02");
    }
    prefix
}

/// Move `cut` back so it does not fall between `\x03` and its digits.
fn step_back_from_color_code(bytes: &[u8], cut: usize) -> usize {
    let color = COLOR_CODE as u8;
    if cut >= 1 && bytes[cut - 1] == color {
        return cut - 1;
    }
    if cut >= 2 && bytes[cut - 2] == color && bytes[cut - 1].is_ascii_digit() {
        return cut - 2;
    }
    cut
}

/// Foreground colour in effect after `text`, starting from `active`.
fn color_after(mut active: Option<u8>, text: &str) -> Option<u8> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b if b == COLOR_CODE as u8 => {
                let digits = bytes[i + 1..]
                    .iter()
                    .take(2)
                    .take_while(|b| b.is_ascii_digit())
                    .count();
                active = if digits == 0 {
                    None
                } else {
                    text[i + 1..i + 1 + digits].parse().ok()
                };
                i += 1 + digits;
            }
            0x0f => {
                active = None;
                i += 1;
            }
            _ => i += 1,
        }
    }
    active
}
