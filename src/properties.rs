//! Lossless `.properties` document model.
//!
//! Parses Java properties text into logical lines so values can be looked up
//! and replaced while comments, blank lines, key order and untouched entries
//! render back exactly as they were read.

use std::collections::HashMap;

/// The only characters Java treats as whitespace in a properties file.
const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Blank line or comment, kept as-is.
    Verbatim(String),
    Entry(EntryLine),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EntryLine {
    /// Physical lines making up the logical line (more than one when continued).
    physical: Vec<String>,
    key: String,
    value: String,
    /// Leading whitespace, escaped key text and separator used when the value is rewritten.
    prefix: String,
}

/// A parsed `.properties` file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertiesDocument {
    lines: Vec<Line>,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl PropertiesDocument {
    pub fn parse(text: &str) -> Self {
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = text.ends_with('\n');

        let body = text.strip_suffix('\n').unwrap_or(text);
        let physical: Vec<&str> = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line))
                .collect()
        };
        let mut physical = physical.into_iter();

        let mut lines = Vec::new();
        while let Some(first) = physical.next() {
            let trimmed = first.trim_start_matches(WHITESPACE);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                lines.push(Line::Verbatim(first.to_string()));
                continue;
            }

            let mut parts = vec![first.to_string()];
            while is_continued(parts.last().map(String::as_str).unwrap_or_default()) {
                match physical.next() {
                    Some(next) => parts.push(next.to_string()),
                    None => break,
                }
            }
            lines.push(Line::Entry(EntryLine::parse(parts)));
        }

        Self {
            lines,
            line_ending,
            trailing_newline,
        }
    }

    /// Effective value of `key`. Later definitions override earlier ones.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry_lines()
            .filter(|entry| entry.key == key)
            .last()
            .map(|entry| entry.value.as_str())
    }

    /// Unique keys in first-definition order, each with its effective value.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut order: Vec<&str> = Vec::new();
        let mut values: HashMap<&str, &str> = HashMap::new();
        for entry in self.entry_lines() {
            if values.insert(&entry.key, &entry.value).is_none() {
                order.push(&entry.key);
            }
        }
        order
            .into_iter()
            .map(|key| (key, values[key]))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_lines().next().is_none()
    }

    /// Replace the effective definition of `key`, or append a new entry.
    pub fn set(&mut self, key: &str, value: &str) {
        let position = self
            .lines
            .iter()
            .rposition(|line| matches!(line, Line::Entry(entry) if entry.key == key));

        match position {
            Some(index) => {
                if let Line::Entry(entry) = &mut self.lines[index] {
                    entry.physical = vec![format!("{}{}", entry.prefix, escape_value(value))];
                    entry.value = value.to_string();
                }
            }
            None => {
                let prefix = format!("{}=", escape_key(key));
                self.lines.push(Line::Entry(EntryLine {
                    physical: vec![format!("{}{}", prefix, escape_value(value))],
                    key: key.to_string(),
                    value: value.to_string(),
                    prefix,
                }));
                if self.line_ending.is_empty() {
                    self.line_ending = "\n";
                }
                self.trailing_newline = true;
            }
        }
    }

    pub fn render(&self) -> String {
        let line_ending = if self.line_ending.is_empty() {
            "\n"
        } else {
            self.line_ending
        };
        let mut physical: Vec<&str> = Vec::new();
        for line in &self.lines {
            match line {
                Line::Verbatim(text) => physical.push(text),
                Line::Entry(entry) => physical.extend(entry.physical.iter().map(String::as_str)),
            }
        }

        let mut out = physical.join(line_ending);
        if self.trailing_newline && !physical.is_empty() {
            out.push_str(line_ending);
        }
        out
    }

    fn entry_lines(&self) -> impl Iterator<Item = &EntryLine> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry(entry) => Some(entry),
            Line::Verbatim(_) => None,
        })
    }
}

impl EntryLine {
    fn parse(physical: Vec<String>) -> Self {
        let indent_len = physical[0].len() - physical[0].trim_start_matches(WHITESPACE).len();
        let indent = &physical[0][..indent_len];

        // Join continuation lines into one logical line.
        let mut logical = String::new();
        let last = physical.len() - 1;
        for (index, part) in physical.iter().enumerate() {
            let part = part.trim_start_matches(WHITESPACE);
            if index < last || is_continued(part) {
                logical.push_str(&part[..part.len() - 1]);
            } else {
                logical.push_str(part);
            }
        }

        let (key_raw, separator, value_raw) = split_key_value(&logical);
        let separator = if separator.is_empty() { "=" } else { separator };

        Self {
            key: unescape(key_raw),
            value: unescape(value_raw),
            prefix: format!("{}{}{}", indent, key_raw, separator),
            physical,
        }
    }
}

/// True when the line ends with an odd number of backslashes.
fn is_continued(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Split a logical line into raw key, separator (with surrounding whitespace) and raw value.
fn split_key_value(logical: &str) -> (&str, &str, &str) {
    let mut key_end = logical.len();
    let mut escaped = false;
    for (index, c) in logical.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = index;
                break;
            }
            _ => {}
        }
    }

    let rest = &logical[key_end..];
    let after_ws = rest.trim_start_matches(WHITESPACE);
    let after_sep = after_ws
        .strip_prefix(['=', ':'])
        .map(|s| s.trim_start_matches(WHITESPACE))
        .unwrap_or(after_ws);
    let value_start = logical.len() - after_sep.len();

    (
        &logical[..key_end],
        &logical[key_end..value_start],
        &logical[value_start..],
    )
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut pending_high: Option<u32> = None;

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_surrogate(&mut out, &mut pending_high);
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        if escaped != 'u' {
            flush_surrogate(&mut out, &mut pending_high);
            out.push(match escaped {
                't' => '\t',
                'n' => '\n',
                'r' => '\r',
                'f' => '\x0c',
                other => other,
            });
            continue;
        }

        let hex: String = chars.clone().take(4).collect();
        let code = (hex.len() == 4)
            .then(|| u32::from_str_radix(&hex, 16).ok())
            .flatten();
        let Some(code) = code else {
            // Malformed \u escape: keep the text rather than failing the whole file.
            flush_surrogate(&mut out, &mut pending_high);
            out.push_str("\\u");
            continue;
        };
        for _ in 0..4 {
            chars.next();
        }

        match code {
            0xD800..=0xDBFF => {
                flush_surrogate(&mut out, &mut pending_high);
                pending_high = Some(code);
            }
            0xDC00..=0xDFFF => match pending_high.take() {
                Some(high) => {
                    let combined = 0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00);
                    out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                None => out.push(char::REPLACEMENT_CHARACTER),
            },
            _ => {
                flush_surrogate(&mut out, &mut pending_high);
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }
    flush_surrogate(&mut out, &mut pending_high);
    out
}

fn flush_surrogate(out: &mut String, pending_high: &mut Option<u32>) {
    if pending_high.take().is_some() {
        out.push(char::REPLACEMENT_CHARACTER);
    }
}

fn escape_common(c: char, out: &mut String) -> bool {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\x0c' => out.push_str("\\f"),
        _ => return false,
    }
    true
}

/// Escape a value for writing. Non-ASCII text stays UTF-8.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (index, c) in value.chars().enumerate() {
        if escape_common(c, &mut out) {
            continue;
        }
        if index == 0 && c == ' ' {
            out.push_str("\\ ");
        } else {
            out.push(c);
        }
    }
    out
}

pub fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (index, c) in key.chars().enumerate() {
        if escape_common(c, &mut out) {
            continue;
        }
        match c {
            '=' | ':' | ' ' => {
                out.push('\\');
                out.push(c);
            }
            '#' | '!' if index == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_entries_in_order() {
        let doc = PropertiesDocument::parse("greeting=Hello\nfarewell = Bye\nname:World\n");
        assert_eq!(
            doc.entries(),
            vec![("greeting", "Hello"), ("farewell", "Bye"), ("name", "World")]
        );
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_whitespace_separator_and_key_only() {
        let doc = PropertiesDocument::parse("title  Main page\nempty\nblank=\n");
        assert_eq!(doc.get("title"), Some("Main page"));
        assert_eq!(doc.get("empty"), Some(""));
        assert_eq!(doc.get("blank"), Some(""));
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let doc = PropertiesDocument::parse("# header\n\n! other comment\n  key=value\n");
        assert_eq!(doc.entries(), vec![("key", "value")]);
    }

    #[test]
    fn test_continuation_lines() {
        let doc = PropertiesDocument::parse("long=first \\\n     second \\\n  third\nnext=1\n");
        assert_eq!(doc.get("long"), Some("first second third"));
        assert_eq!(doc.get("next"), Some("1"));
    }

    #[test]
    fn test_only_java_whitespace_is_skipped() {
        let doc = PropertiesDocument::parse(
            "\u{3000}wide=value\nnbsp=\\\n\u{a0}kept\n\tplain=\u{3000}x\n",
        );
        assert_eq!(doc.get("\u{3000}wide"), Some("value"));
        assert_eq!(doc.get("wide"), None);
        assert_eq!(doc.get("nbsp"), Some("\u{a0}kept"));
        assert_eq!(doc.get("plain"), Some("\u{3000}x"));
    }

    #[test]
    fn test_even_backslashes_do_not_continue() {
        let doc = PropertiesDocument::parse("path=C:\\\\\nnext=1\n");
        assert_eq!(doc.get("path"), Some("C:\\"));
        assert_eq!(doc.get("next"), Some("1"));
    }

    #[test]
    fn test_escapes_and_unicode() {
        let doc = PropertiesDocument::parse(
            "tab=a\\tb\nnl=line\\nbreak\nkey\\ with\\ spaces=v\nu=caf\\u00e9\nemoji=\\uD83D\\uDE00\n",
        );
        assert_eq!(doc.get("tab"), Some("a\tb"));
        assert_eq!(doc.get("nl"), Some("line\nbreak"));
        assert_eq!(doc.get("key with spaces"), Some("v"));
        assert_eq!(doc.get("u"), Some("café"));
        assert_eq!(doc.get("emoji"), Some("😀"));
    }

    #[test]
    fn test_malformed_unicode_escape_is_kept() {
        let doc = PropertiesDocument::parse("bad=\\uZZ\n");
        assert_eq!(doc.get("bad"), Some("\\uZZ"));
    }

    #[test]
    fn test_later_definition_wins() {
        let doc = PropertiesDocument::parse("a=1\nb=2\na=3\n");
        assert_eq!(doc.get("a"), Some("3"));
        assert_eq!(doc.entries(), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_render_untouched_is_identical() {
        let text = "# comment\r\n\r\ngreeting = Hello\r\nlong=a \\\r\n  b\r\n";
        assert_eq!(PropertiesDocument::parse(text).render(), text);

        let no_trailing = "a=1\nb=2";
        assert_eq!(PropertiesDocument::parse(no_trailing).render(), no_trailing);
    }

    #[test]
    fn test_set_replaces_value_keeping_layout() {
        let mut doc = PropertiesDocument::parse("# fr\ngreeting = \nfarewell=Au revoir\n");
        doc.set("greeting", "Bonjour");
        assert_eq!(doc.render(), "# fr\ngreeting = Bonjour\nfarewell=Au revoir\n");
        assert_eq!(doc.get("greeting"), Some("Bonjour"));
    }

    #[test]
    fn test_set_on_key_only_line_adds_separator() {
        let mut doc = PropertiesDocument::parse("greeting\n");
        doc.set("greeting", "Hallo");
        assert_eq!(doc.render(), "greeting=Hallo\n");
    }

    #[test]
    fn test_set_replaces_continued_entry() {
        let mut doc = PropertiesDocument::parse("long=a \\\n  b\nnext=1\n");
        doc.set("long", "c");
        assert_eq!(doc.render(), "long=c\nnext=1\n");
    }

    #[test]
    fn test_set_appends_missing_key() {
        let mut doc = PropertiesDocument::parse("a=1");
        doc.set("b", "2");
        assert_eq!(doc.render(), "a=1\nb=2\n");

        let mut empty = PropertiesDocument::parse("");
        assert!(empty.is_empty());
        empty.set("key with space", "x");
        assert_eq!(empty.render(), "key\\ with\\ space=x\n");
    }

    #[test]
    fn test_set_escapes_special_characters() {
        let mut doc = PropertiesDocument::parse("msg=\n");
        doc.set("msg", " two\nlines\\");
        assert_eq!(doc.render(), "msg=\\ two\\nlines\\\\\n");

        let reparsed = PropertiesDocument::parse(&doc.render());
        assert_eq!(reparsed.get("msg"), Some(" two\nlines\\"));
    }

    #[test]
    fn test_non_ascii_written_as_utf8() {
        let mut doc = PropertiesDocument::parse("greeting=\n");
        doc.set("greeting", "こんにちは");
        assert_eq!(doc.render(), "greeting=こんにちは\n");
    }

    #[test]
    fn test_escape_key() {
        assert_eq!(escape_key("a=b:c d"), "a\\=b\\:c\\ d");
        assert_eq!(escape_key("#hash"), "\\#hash");
    }
}
