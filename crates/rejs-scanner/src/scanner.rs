//! Scanner state machine.
//!
//! `ScannerState` turns source text into one token at a time. The parser
//! drives it with `scan()`, peeks with `snapshot()`/`restore()`, and asks
//! for `re_scan_slash_token()` when a `/` appears where an expression must
//! start (regular expression literals cannot be told apart from division
//! without parser context).
//!
//! Template literals need no parser help: the scanner keeps a brace depth
//! per open `${` and resumes the template at the `}` that closes it.

use crate::SyntaxKind;
use crate::char_codes::{
    is_identifier_part, is_identifier_start, is_line_break, is_octal_digit,
    is_white_space_single_line,
};
use crate::syntax_kind::text_to_keyword;

/// Punctuation sorted longest-first so that `starts_with` picks the
/// maximal munch.
const PUNCTUATION: &[(&str, SyntaxKind)] = &[
    (">>>=", SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
    ("===", SyntaxKind::EqualsEqualsEqualsToken),
    ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
    ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
    ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
    (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
    (">>>", SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
    ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
    ("||=", SyntaxKind::BarBarEqualsToken),
    ("??=", SyntaxKind::QuestionQuestionEqualsToken),
    ("=>", SyntaxKind::EqualsGreaterThanToken),
    ("==", SyntaxKind::EqualsEqualsToken),
    ("!=", SyntaxKind::ExclamationEqualsToken),
    ("<=", SyntaxKind::LessThanEqualsToken),
    (">=", SyntaxKind::GreaterThanEqualsToken),
    ("**", SyntaxKind::AsteriskAsteriskToken),
    ("++", SyntaxKind::PlusPlusToken),
    ("--", SyntaxKind::MinusMinusToken),
    ("<<", SyntaxKind::LessThanLessThanToken),
    (">>", SyntaxKind::GreaterThanGreaterThanToken),
    ("&&", SyntaxKind::AmpersandAmpersandToken),
    ("||", SyntaxKind::BarBarToken),
    ("??", SyntaxKind::QuestionQuestionToken),
    ("+=", SyntaxKind::PlusEqualsToken),
    ("-=", SyntaxKind::MinusEqualsToken),
    ("*=", SyntaxKind::AsteriskEqualsToken),
    ("%=", SyntaxKind::PercentEqualsToken),
    ("&=", SyntaxKind::AmpersandEqualsToken),
    ("|=", SyntaxKind::BarEqualsToken),
    ("^=", SyntaxKind::CaretEqualsToken),
    ("(", SyntaxKind::OpenParenToken),
    (")", SyntaxKind::CloseParenToken),
    ("[", SyntaxKind::OpenBracketToken),
    ("]", SyntaxKind::CloseBracketToken),
    (";", SyntaxKind::SemicolonToken),
    (",", SyntaxKind::CommaToken),
    ("?", SyntaxKind::QuestionToken),
    (":", SyntaxKind::ColonToken),
    ("<", SyntaxKind::LessThanToken),
    (">", SyntaxKind::GreaterThanToken),
    ("=", SyntaxKind::EqualsToken),
    ("+", SyntaxKind::PlusToken),
    ("-", SyntaxKind::MinusToken),
    ("*", SyntaxKind::AsteriskToken),
    ("%", SyntaxKind::PercentToken),
    ("&", SyntaxKind::AmpersandToken),
    ("|", SyntaxKind::BarToken),
    ("^", SyntaxKind::CaretToken),
    ("!", SyntaxKind::ExclamationToken),
    ("~", SyntaxKind::TildeToken),
];

/// First lexical error encountered by the scanner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerError {
    pub message: String,
    pub pos: u32,
}

struct EscapeError {
    message: &'static str,
    pos: usize,
}

/// Saved scanner position for speculative parsing.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    number_value: f64,
    preceding_line_break: bool,
    lone_surrogate: bool,
    identifier_escaped: bool,
    template_raw: String,
    template_invalid_escape: bool,
    template_depths: Vec<u32>,
}

pub struct ScannerState {
    text: String,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    /// Decoded value for strings and identifiers, raw text otherwise.
    token_value: String,
    number_value: f64,
    preceding_line_break: bool,
    /// Set when a string escape produced an unpaired UTF-16 surrogate.
    lone_surrogate: bool,
    /// The identifier just scanned was spelled with `\u` escapes.
    identifier_escaped: bool,
    /// Raw text of a template piece, line endings normalized to `\n`.
    template_raw: String,
    /// The template piece has an escape with no cooked value (only legal
    /// in tagged templates).
    template_invalid_escape: bool,
    /// Open `{` count inside each enclosing template substitution.
    template_depths: Vec<u32>,
    error: Option<ScannerError>,
}

impl ScannerState {
    pub fn new(text: String) -> Self {
        ScannerState {
            text,
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            number_value: 0.0,
            preceding_line_break: false,
            lone_surrogate: false,
            identifier_escaped: false,
            template_raw: String::new(),
            template_invalid_escape: false,
            template_depths: Vec::new(),
            error: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    #[inline]
    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source slice of the current token.
    pub fn token_text(&self) -> &str {
        self.text.get(self.token_start..self.pos).unwrap_or("")
    }

    pub fn number_value(&self) -> f64 {
        self.number_value
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    pub fn has_lone_surrogate(&self) -> bool {
        self.lone_surrogate
    }

    pub fn has_escaped_identifier(&self) -> bool {
        self.identifier_escaped
    }

    /// Raw text of the current template piece, without its delimiters.
    pub fn template_raw(&self) -> &str {
        &self.template_raw
    }

    /// The current template piece has no cooked value.
    pub fn has_invalid_template_escape(&self) -> bool {
        self.template_invalid_escape
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn take_error(&mut self) -> Option<ScannerError> {
        self.error.take()
    }

    pub fn snapshot(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            number_value: self.number_value,
            preceding_line_break: self.preceding_line_break,
            lone_surrogate: self.lone_surrogate,
            identifier_escaped: self.identifier_escaped,
            template_raw: self.template_raw.clone(),
            template_invalid_escape: self.template_invalid_escape,
            template_depths: self.template_depths.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value = snapshot.token_value;
        self.number_value = snapshot.number_value;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.lone_surrogate = snapshot.lone_surrogate;
        self.identifier_escaped = snapshot.identifier_escaped;
        self.template_raw = snapshot.template_raw;
        self.template_invalid_escape = snapshot.template_invalid_escape;
        self.template_depths = snapshot.template_depths;
    }

    // =========================================================================
    // Character helpers
    // =========================================================================

    #[inline]
    fn current(&self) -> Option<char> {
        self.text.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn peek(&self, offset: usize) -> Option<char> {
        self.text
            .get(self.pos..)
            .and_then(|rest| rest.chars().nth(offset))
    }

    #[inline]
    fn advance(&mut self) -> Option<char> {
        let ch = self.current()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn error(&mut self, message: impl Into<String>, pos: usize) -> SyntaxKind {
        if self.error.is_none() {
            self.error = Some(ScannerError {
                message: message.into(),
                pos: pos as u32,
            });
        }
        self.token = SyntaxKind::Unknown;
        self.token
    }

    // =========================================================================
    // Main scan loop
    // =========================================================================

    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.lone_surrogate = false;
        self.identifier_escaped = false;
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            let Some(ch) = self.current() else {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };

            if is_line_break(ch) {
                self.preceding_line_break = true;
                self.advance();
                continue;
            }
            if is_white_space_single_line(ch) {
                self.advance();
                continue;
            }

            self.token = match ch {
                '/' => match self.peek(1) {
                    Some('/') => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some('*') => {
                        if !self.skip_block_comment() {
                            return self.error("'*/' expected", self.token_start);
                        }
                        continue;
                    }
                    Some('=') => {
                        self.pos += 2;
                        SyntaxKind::SlashEqualsToken
                    }
                    _ => {
                        self.pos += 1;
                        SyntaxKind::SlashToken
                    }
                },
                '"' | '\'' => self.scan_string(ch),
                '`' => self.scan_template(true),
                '0'..='9' => self.scan_number(),
                '.' => {
                    if self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
                        self.scan_number()
                    } else if self.peek(1) == Some('.') && self.peek(2) == Some('.') {
                        self.pos += 3;
                        SyntaxKind::DotDotDotToken
                    } else {
                        self.pos += 1;
                        SyntaxKind::DotToken
                    }
                }
                // `a?.5:b` is a conditional, not an optional chain.
                '?' if self.peek(1) == Some('.')
                    && !self.peek(2).is_some_and(|c| c.is_ascii_digit()) =>
                {
                    self.pos += 2;
                    SyntaxKind::QuestionDotToken
                }
                '{' => {
                    if let Some(depth) = self.template_depths.last_mut() {
                        *depth += 1;
                    }
                    self.pos += 1;
                    SyntaxKind::OpenBraceToken
                }
                '}' => match self.template_depths.last().copied() {
                    Some(0) => {
                        self.template_depths.pop();
                        self.scan_template(false)
                    }
                    Some(open) => {
                        if let Some(depth) = self.template_depths.last_mut() {
                            *depth = open - 1;
                        }
                        self.pos += 1;
                        SyntaxKind::CloseBraceToken
                    }
                    None => {
                        self.pos += 1;
                        SyntaxKind::CloseBraceToken
                    }
                },
                '#' if self.pos == 0 && self.peek(1) == Some('!') => {
                    self.skip_line_comment();
                    continue;
                }
                '#' => self.scan_private_identifier(),
                c if c == '\\' || is_identifier_start(c) => self.scan_identifier(),
                _ => self.scan_punctuation(),
            };
            return self.token;
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.current() {
            if is_line_break(ch) {
                break;
            }
            self.advance();
        }
    }

    /// Returns false when the comment is unterminated.
    fn skip_block_comment(&mut self) -> bool {
        self.pos += 2;
        while let Some(ch) = self.current() {
            if ch == '*' && self.peek(1) == Some('/') {
                self.pos += 2;
                return true;
            }
            if is_line_break(ch) {
                self.preceding_line_break = true;
            }
            self.advance();
        }
        false
    }

    fn scan_punctuation(&mut self) -> SyntaxKind {
        let rest = self.text.get(self.pos..).unwrap_or("");
        for &(text, kind) in PUNCTUATION {
            if rest.starts_with(text) {
                self.pos += text.len();
                return kind;
            }
        }
        let ch = self.current().unwrap_or('\0');
        self.error(format!("Invalid character '{ch}'"), self.pos)
    }

    /// Identifier or keyword. Names spelled with `\\u` escapes are always
    /// identifiers; the parser decides whether the decoded word is allowed.
    fn scan_identifier(&mut self) -> SyntaxKind {
        let mut value = String::new();
        loop {
            let Some(ch) = self.current() else {
                break;
            };
            let first = value.is_empty();
            let accepts = |c: char| {
                if first {
                    is_identifier_start(c)
                } else {
                    is_identifier_part(c)
                }
            };
            if ch == '\\' {
                let escape_pos = self.pos;
                if self.peek(1) != Some('u') {
                    return self.error("Invalid character '\\'", escape_pos);
                }
                self.pos += 2;
                match self.scan_unicode_escape().and_then(char::from_u32) {
                    Some(decoded) if accepts(decoded) => value.push(decoded),
                    _ => return self.error("Invalid Unicode escape sequence", escape_pos),
                }
                self.identifier_escaped = true;
                continue;
            }
            if !accepts(ch) {
                break;
            }
            value.push(ch);
            self.advance();
        }
        let kind = if self.identifier_escaped {
            SyntaxKind::Identifier
        } else {
            text_to_keyword(&value).unwrap_or(SyntaxKind::Identifier)
        };
        self.token_value = value;
        kind
    }

    fn scan_private_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.advance();
        let starts_name = self
            .current()
            .is_some_and(|c| c == '\\' || is_identifier_start(c));
        if !starts_name {
            return self.error("Invalid character '#'", start);
        }
        match self.scan_identifier() {
            SyntaxKind::Unknown => SyntaxKind::Unknown,
            _ => SyntaxKind::PrivateIdentifier,
        }
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;

        let radix = match (self.current(), self.peek(1)) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('o' | 'O')) => Some(8),
            (Some('0'), Some('b' | 'B')) => Some(2),
            _ => None,
        };

        let mut integer_form = true;
        let value = if let Some(radix) = radix {
            self.pos += 2;
            let Some(value) = self.scan_radix_digits(radix) else {
                return self.error("Digit expected", self.pos);
            };
            value
        } else if self.current() == Some('0') && self.peek(1).is_some_and(|c| c.is_ascii_digit())
        {
            integer_form = false;
            self.scan_legacy_octal_or_decimal()
        } else {
            self.scan_decimal_digits();
            if self.current() == Some('.') {
                integer_form = false;
                self.advance();
                self.scan_decimal_digits();
            }
            if matches!(self.current(), Some('e' | 'E')) {
                integer_form = false;
                let save = self.pos;
                self.advance();
                if matches!(self.current(), Some('+' | '-')) {
                    self.advance();
                }
                if !self.current().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos = save;
                    return self.error("Digit expected", self.pos);
                }
                self.scan_decimal_digits();
            }
            let cleaned: String = self.text[start..self.pos]
                .chars()
                .filter(|&c| c != '_')
                .collect();
            match cleaned.parse::<f64>() {
                Ok(value) => value,
                Err(_) => return self.error("Invalid numeric literal", start),
            }
        };

        let is_bigint = integer_form && self.current() == Some('n');
        if is_bigint {
            self.advance();
        }

        if self
            .current()
            .is_some_and(|c| is_identifier_start(c) || c.is_ascii_digit())
        {
            return self.error(
                "An identifier or keyword cannot immediately follow a numeric literal",
                self.pos,
            );
        }

        self.number_value = value;
        let raw = &self.text[start..self.pos];
        self.token_value.push_str(raw);
        if is_bigint {
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        }
    }

    fn scan_decimal_digits(&mut self) {
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() || (ch == '_' && self.peek(1).is_some_and(|c| c.is_ascii_digit()))
            {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_radix_digits(&mut self, radix: u32) -> Option<f64> {
        let mut value = 0f64;
        let mut digits = 0usize;
        while let Some(ch) = self.current() {
            if ch == '_' && digits > 0 {
                self.advance();
                continue;
            }
            let Some(digit) = ch.to_digit(radix) else {
                break;
            };
            value = value * radix as f64 + digit as f64;
            digits += 1;
            self.advance();
        }
        (digits > 0).then_some(value)
    }

    /// `017` is octal in sloppy mode, `089` is decimal.
    fn scan_legacy_octal_or_decimal(&mut self) -> f64 {
        let start = self.pos;
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let digits = &self.text[start..self.pos];
        if digits.chars().all(is_octal_digit) {
            digits
                .chars()
                .fold(0f64, |acc, c| acc * 8.0 + c.to_digit(8).unwrap_or(0) as f64)
        } else {
            digits.parse::<f64>().unwrap_or(f64::NAN)
        }
    }

    // =========================================================================
    // Strings
    // =========================================================================

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.advance();
        let mut value = String::new();

        loop {
            let Some(ch) = self.current() else {
                return self.error("Unterminated string literal", start);
            };
            if ch == quote {
                self.advance();
                break;
            }
            if ch == '\n' || ch == '\r' {
                return self.error("Unterminated string literal", start);
            }
            if ch == '\\' {
                self.advance();
                if let Err(error) = self.scan_escape(&mut value, false) {
                    return self.error(error.message, error.pos);
                }
                continue;
            }
            value.push(ch);
            self.advance();
        }

        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    /// Decode one escape sequence (the backslash is already consumed).
    /// Templates have no legacy octal escapes.
    fn scan_escape(&mut self, value: &mut String, in_template: bool) -> Result<(), EscapeError> {
        let escape_start = self.pos;
        let Some(ch) = self.advance() else {
            return Err(EscapeError {
                message: "Unterminated string literal",
                pos: escape_start,
            });
        };

        match ch {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{0008}'),
            'f' => value.push('\u{000C}'),
            'v' => value.push('\u{000B}'),
            '0' if !self.current().is_some_and(|c| c.is_ascii_digit()) => value.push('\0'),
            '0'..='9' if in_template => {
                return Err(EscapeError {
                    message: "Octal escape sequences are not allowed in template strings",
                    pos: escape_start,
                });
            }
            '0'..='7' => {
                let max_len = if ch <= '3' { 3 } else { 2 };
                let mut code = ch.to_digit(8).unwrap_or(0);
                let mut len = 1;
                while len < max_len {
                    match self.current().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            self.advance();
                            len += 1;
                        }
                        None => break,
                    }
                }
                value.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            'x' => {
                let Some(code) = self.scan_hex_digits(2, 2) else {
                    return Err(EscapeError {
                        message: "Hexadecimal digit expected",
                        pos: self.pos,
                    });
                };
                value.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            'u' => {
                let Some(unit) = self.scan_unicode_escape() else {
                    return Err(EscapeError {
                        message: "Hexadecimal digit expected",
                        pos: self.pos,
                    });
                };
                self.push_code_point(unit, value);
            }
            '\r' => {
                if self.current() == Some('\n') {
                    self.advance();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => value.push(other),
        }
        Ok(())
    }

    fn scan_hex_digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let mut code = 0u32;
        let mut count = 0;
        while count < max {
            let Some(digit) = self.current().and_then(|c| c.to_digit(16)) else {
                break;
            };
            code = code.checked_mul(16)?.checked_add(digit)?;
            self.advance();
            count += 1;
        }
        (count >= min).then_some(code)
    }

    fn scan_unicode_escape(&mut self) -> Option<u32> {
        if self.current() == Some('{') {
            self.advance();
            let code = self.scan_hex_digits(1, 6)?;
            if self.current() != Some('}') || code > 0x10FFFF {
                return None;
            }
            self.advance();
            Some(code)
        } else {
            self.scan_hex_digits(4, 4)
        }
    }

    /// Push a code point, pairing `\uD8xx\uDCxx` surrogate escapes.
    fn push_code_point(&mut self, code: u32, value: &mut String) {
        if (0xD800..=0xDBFF).contains(&code) {
            let rest = self.text.get(self.pos..).unwrap_or("");
            if rest.starts_with("\\u") {
                let save = self.pos;
                self.pos += 2;
                if let Some(low) = self.scan_hex_digits(4, 4) {
                    if (0xDC00..=0xDFFF).contains(&low) {
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        value.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                        return;
                    }
                }
                self.pos = save;
            }
        }
        match char::from_u32(code) {
            Some(c) => value.push(c),
            None => {
                self.lone_surrogate = true;
                value.push('\u{FFFD}');
            }
        }
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// Scan a template piece starting at its opening `` ` `` or at the `}`
    /// closing a substitution.
    fn scan_template(&mut self, at_backtick: bool) -> SyntaxKind {
        let start = self.pos;
        self.advance();
        let content_start = self.pos;
        let mut cooked = String::new();
        let mut invalid_escape = false;

        let (kind, content_end) = loop {
            let Some(ch) = self.current() else {
                return self.error("Unterminated template literal", start);
            };
            match ch {
                '`' => {
                    let content_end = self.pos;
                    self.advance();
                    let kind = if at_backtick {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                    break (kind, content_end);
                }
                '$' if self.peek(1) == Some('{') => {
                    let content_end = self.pos;
                    self.pos += 2;
                    self.template_depths.push(0);
                    let kind = if at_backtick {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                    break (kind, content_end);
                }
                '\\' => {
                    self.advance();
                    if self.scan_escape(&mut cooked, true).is_err() {
                        invalid_escape = true;
                    }
                }
                '\r' => {
                    self.advance();
                    if self.current() == Some('\n') {
                        self.advance();
                    }
                    cooked.push('\n');
                }
                _ => {
                    cooked.push(ch);
                    self.advance();
                }
            }
        };

        self.template_raw = self.text[content_start..content_end]
            .replace("\r\n", "\n")
            .replace('\r', "\n");
        self.template_invalid_escape = invalid_escape;
        self.token_value = if invalid_escape { String::new() } else { cooked };
        kind
    }

    // =========================================================================
    // Regular expressions
    // =========================================================================

    /// Rescan the current `/` or `/=` token as a regular expression literal.
    pub fn re_scan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(
            self.token,
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken
        ) {
            return self.token;
        }

        self.pos = self.token_start + 1;
        let mut in_class = false;
        loop {
            let Some(ch) = self.current() else {
                return self.error("Unterminated regular expression literal", self.token_start);
            };
            if is_line_break(ch) {
                return self.error("Unterminated regular expression literal", self.token_start);
            }
            self.advance();
            match ch {
                '\\' => {
                    if self.current().is_some_and(|c| !is_line_break(c)) {
                        self.advance();
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        while self.current().is_some_and(is_identifier_part) {
            self.advance();
        }

        self.token_value = self.text[self.token_start..self.pos].to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }
}
