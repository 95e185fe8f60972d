use super::{Printer, QuoteStyle};
use rejs_common::format_js_number;
use rejs_parser::node::NumericLiteralData;
use rejs_parser::{NodeData, NodeIndex};
use std::fmt::Write;

impl<'a> Printer<'a> {
    // =========================================================================
    // Literals
    // =========================================================================

    pub(super) fn emit_string_literal(&mut self, idx: NodeIndex) {
        let Some(NodeData::StringLiteral(literal)) = self.arena.data(idx) else {
            return;
        };
        match &literal.raw {
            Some(raw) => self.write(raw),
            None => {
                let quoted = quote_string(&literal.value, self.options.quote_style);
                self.write(&quoted);
            }
        }
    }

    pub(super) fn emit_numeric_literal(&mut self, idx: NodeIndex) {
        let Some(NodeData::NumericLiteral(literal)) = self.arena.data(idx) else {
            return;
        };
        let text = self.numeric_literal_text(literal);
        self.write(&text);
    }

    pub(super) fn numeric_literal_text(&self, literal: &NumericLiteralData) -> String {
        match &literal.raw {
            Some(raw) => raw.clone(),
            None => format_js_number(literal.value),
        }
    }
}

/// Escape `value` for use between `quote` characters.
///
/// This is the canonical form: only backslash, the quote, line
/// terminators and control characters are escaped.
pub fn escape_string(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            '\0' => {
                // `\0` followed by a digit would read as a legacy octal escape.
                if chars.peek().is_some_and(|next| next.is_ascii_digit()) {
                    out.push_str("\\x00");
                } else {
                    out.push_str("\\0");
                }
            }
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// `value` as a complete string literal in the given quote style.
pub fn quote_string(value: &str, style: QuoteStyle) -> String {
    let quote = style.quote_char();
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    out.push_str(&escape_string(value, quote));
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_string_canonical_form() {
        assert_eq!(escape_string("a\"b", '"'), "a\\\"b");
        assert_eq!(escape_string("a\"b", '\''), "a\"b");
        assert_eq!(escape_string("it's", '\''), "it\\'s");
        assert_eq!(escape_string("line\nbreak\t", '"'), "line\\nbreak\\t");
        assert_eq!(escape_string("\u{1}", '"'), "\\x01");
        assert_eq!(escape_string("\01", '"'), "\\x001");
        assert_eq!(escape_string("\0a", '"'), "\\0a");
        assert_eq!(escape_string("caf\u{e9}", '"'), "caf\u{e9}");
    }

    #[test]
    fn test_quote_string_styles() {
        assert_eq!(quote_string("x", QuoteStyle::Double), "\"x\"");
        assert_eq!(quote_string("x", QuoteStyle::Single), "'x'");
    }
}
