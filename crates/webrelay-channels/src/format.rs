//! IRC inline colour formatting.
//!
//! Colours use the mIRC control sequence: `\x03` followed by a two-digit
//! palette index, closed by a bare `\x03`.

use webrelay_types::config::Color;

/// Colour control character.
pub const COLOR_CODE: char = '\x03';

/// Bold toggle, emitted twice as an empty separator.
const BOLD: char = '\x02';

/// Wrap `text` in the colour control sequence for `color`.
pub fn colorize(text: &str, color: Color) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    out.push(COLOR_CODE);
    out.push_str(&format!("{:02}", color.code()));
    // A leading ",NN" would be read as a background colour.
    if text.starts_with(',') {
        out.push(BOLD);
        out.push(BOLD);
    }
    out.push_str(text);
    out.push(COLOR_CODE);
    out
}

/// Build a relayed line: `(label) body`, label and body in their colours.
///
/// Each line of a multi-line body is coloured on its own, since clients
/// reset formatting at the end of every message. Empty lines stay empty.
pub fn format_line(label: &str, label_color: Color, body: &str, body_color: Color) -> String {
    let body = body
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                colorize(line, body_color)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("({}) {}", colorize(label, label_color), body)
}

/// Remove colour and formatting control codes from `text`.
pub fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            COLOR_CODE => {
                let mut digits = 0;
                while digits < 2 && chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                    chars.next();
                    digits += 1;
                }
            }
            '\x02' | '\x0f' | '\x16' | '\x1d' | '\x1f' => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorize_wraps_with_two_digit_code() {
        assert_eq!(colorize("web", Color::Red), "\x0304web\x03");
        assert_eq!(colorize("x", Color::LightGrey), "\x0315x\x03");
    }

    #[test]
    fn colorize_guards_leading_comma() {
        assert_eq!(colorize(",12 done", Color::Cyan), "\x0310\x02\x02,12 done\x03");
    }

    #[test]
    fn colorize_leading_digit_is_unambiguous() {
        let s = colorize("5 errors", Color::Red);
        assert!(s.starts_with("\x03045 errors"));
        assert_eq!(strip_formatting(&s), "5 errors");
    }

    #[test]
    fn format_line_single() {
        let line = format_line("web", Color::Red, "hello", Color::Cyan);
        assert_eq!(line, "(\x0304web\x03) \x0310hello\x03");
        assert!(line.contains("hello"));
        assert!(line.contains("web"));
        assert_eq!(strip_formatting(&line), "(web) hello");
    }

    #[test]
    fn format_line_uses_two_distinct_colors() {
        let line = format_line("web", Color::Red, "body", Color::Cyan);
        assert!(line.contains("\x0304"));
        assert!(line.contains("\x0310"));
    }

    #[test]
    fn format_line_multiline() {
        let line = format_line("web", Color::Red, "one\r\n\ntwo", Color::Cyan);
        assert_eq!(line, "(\x0304web\x03) \x0310one\x03\n\n\x0310two\x03");
    }

    #[test]
    fn format_line_empty_body() {
        let line = format_line("web", Color::Red, "", Color::Cyan);
        assert_eq!(line, "(\x0304web\x03) ");
    }

    #[test]
    fn strip_formatting_removes_controls() {
        assert_eq!(strip_formatting("\x02bold\x02 \x1fu\x1f \x0f"), "bold u ");
    }
}
