//! Scanner for the declaration subset of TypeScript.
//!
//! The whole file is tokenized up front. Comments are collected as trivia
//! (`CommentRange`) and line breaks are recorded on the following token, which
//! is all the parser needs for automatic semicolon insertion.

use memchr::{memchr2, memmem};
use tsreveal_common::diagnostics::diagnostic_codes;
use tsreveal_common::{CommentRange, Diagnostic, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,
    Identifier,
    PrivateIdentifier,
    StringLiteral,
    NumericLiteral,
    BigIntLiteral,
    TemplateLiteral,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    LessThanToken,
    GreaterThanToken,
    EqualsToken,
    EqualsGreaterThanToken,
    BarToken,
    AmpersandToken,
    QuestionToken,
    ColonToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    AtToken,
    ExclamationToken,
    /// Any operator character the declaration grammar never inspects.
    OtherPunctuation,

    // Reserved words
    ClassKeyword,
    ConstKeyword,
    DefaultKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FunctionKeyword,
    ImportKeyword,
    InKeyword,
    NewKeyword,
    NullKeyword,
    ThisKeyword,
    TrueKeyword,
    TypeofKeyword,
    VarKeyword,
    VoidKeyword,

    // Contextual keywords
    AbstractKeyword,
    AnyKeyword,
    AssertsKeyword,
    BigIntKeyword,
    BooleanKeyword,
    DeclareKeyword,
    GetKeyword,
    GlobalKeyword,
    InferKeyword,
    InterfaceKeyword,
    IsKeyword,
    KeyofKeyword,
    LetKeyword,
    ModuleKeyword,
    NamespaceKeyword,
    NeverKeyword,
    NumberKeyword,
    ObjectKeyword,
    OutKeyword,
    ReadonlyKeyword,
    SetKeyword,
    StringKeyword,
    SymbolKeyword,
    TypeKeyword,
    UndefinedKeyword,
    UniqueKeyword,
    UnknownKeyword,
}

impl SyntaxKind {
    /// Reserved words can never be used as a type name.
    pub fn is_reserved_word(self) -> bool {
        (self as u16) >= (SyntaxKind::ClassKeyword as u16)
            && (self as u16) <= (SyntaxKind::VoidKeyword as u16)
    }

    pub fn is_contextual_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::AbstractKeyword as u16)
    }

    pub fn is_keyword(self) -> bool {
        self.is_reserved_word() || self.is_contextual_keyword()
    }

    /// Identifiers plus contextual keywords, i.e. anything usable as a binding name.
    pub fn is_identifier(self) -> bool {
        self == SyntaxKind::Identifier || self.is_contextual_keyword()
    }

    /// Anything usable as a property name without quotes.
    pub fn is_identifier_or_keyword(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }
}

pub fn text_to_keyword(text: &str) -> Option<SyntaxKind> {
    let kind = match text {
        "class" => SyntaxKind::ClassKeyword,
        "const" => SyntaxKind::ConstKeyword,
        "default" => SyntaxKind::DefaultKeyword,
        "enum" => SyntaxKind::EnumKeyword,
        "export" => SyntaxKind::ExportKeyword,
        "extends" => SyntaxKind::ExtendsKeyword,
        "false" => SyntaxKind::FalseKeyword,
        "function" => SyntaxKind::FunctionKeyword,
        "import" => SyntaxKind::ImportKeyword,
        "in" => SyntaxKind::InKeyword,
        "new" => SyntaxKind::NewKeyword,
        "null" => SyntaxKind::NullKeyword,
        "this" => SyntaxKind::ThisKeyword,
        "true" => SyntaxKind::TrueKeyword,
        "typeof" => SyntaxKind::TypeofKeyword,
        "var" => SyntaxKind::VarKeyword,
        "void" => SyntaxKind::VoidKeyword,
        "abstract" => SyntaxKind::AbstractKeyword,
        "any" => SyntaxKind::AnyKeyword,
        "asserts" => SyntaxKind::AssertsKeyword,
        "bigint" => SyntaxKind::BigIntKeyword,
        "boolean" => SyntaxKind::BooleanKeyword,
        "declare" => SyntaxKind::DeclareKeyword,
        "get" => SyntaxKind::GetKeyword,
        "global" => SyntaxKind::GlobalKeyword,
        "infer" => SyntaxKind::InferKeyword,
        "interface" => SyntaxKind::InterfaceKeyword,
        "is" => SyntaxKind::IsKeyword,
        "keyof" => SyntaxKind::KeyofKeyword,
        "let" => SyntaxKind::LetKeyword,
        "module" => SyntaxKind::ModuleKeyword,
        "namespace" => SyntaxKind::NamespaceKeyword,
        "never" => SyntaxKind::NeverKeyword,
        "number" => SyntaxKind::NumberKeyword,
        "object" => SyntaxKind::ObjectKeyword,
        "out" => SyntaxKind::OutKeyword,
        "readonly" => SyntaxKind::ReadonlyKeyword,
        "set" => SyntaxKind::SetKeyword,
        "string" => SyntaxKind::StringKeyword,
        "symbol" => SyntaxKind::SymbolKeyword,
        "type" => SyntaxKind::TypeKeyword,
        "undefined" => SyntaxKind::UndefinedKeyword,
        "unique" => SyntaxKind::UniqueKeyword,
        "unknown" => SyntaxKind::UnknownKeyword,
        _ => return None,
    };
    Some(kind)
}

/// A scanned token. Text is recovered by slicing the source with `range`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub has_preceding_line_break: bool,
    /// Template literal containing `${...}` substitutions.
    pub has_substitutions: bool,
}

/// Output of [`scan`].
#[derive(Debug, Default)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub comments: Vec<CommentRange>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Tokenize `text`. The returned token list always ends with `EndOfFileToken`.
pub fn scan(file_name: &str, text: &str) -> ScanResult {
    let mut scanner = Scanner {
        file_name,
        bytes: text.as_bytes(),
        text,
        pos: 0,
        line_break: false,
        result: ScanResult::default(),
    };
    scanner.run();
    scanner.result
}

struct Scanner<'a> {
    file_name: &'a str,
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line_break: bool,
    result: ScanResult,
}

impl<'a> Scanner<'a> {
    fn run(&mut self) {
        if self.bytes.starts_with(b"#!") {
            self.pos = memchr2(b'\n', b'\r', self.bytes).unwrap_or(self.bytes.len());
        }
        loop {
            self.skip_trivia();
            let start = self.pos;
            if start >= self.bytes.len() {
                self.push(SyntaxKind::EndOfFileToken, start, false);
                return;
            }
            let (kind, has_substitutions) = self.scan_token();
            self.push(kind, start, has_substitutions);
        }
    }

    fn push(&mut self, kind: SyntaxKind, start: usize, has_substitutions: bool) {
        self.result.tokens.push(Token {
            kind,
            range: TextRange::new(start as u32, self.pos as u32),
            has_preceding_line_break: self.line_break,
            has_substitutions,
        });
        self.line_break = false;
    }

    fn error(&mut self, start: usize, end: usize, message: &str, code: u32) {
        self.result.diagnostics.push(Diagnostic::error(
            self.file_name,
            start as u32,
            (end - start) as u32,
            message,
            code,
        ));
    }

    fn skip_trivia(&mut self) {
        let len = self.bytes.len();
        while self.pos < len {
            match self.bytes[self.pos] {
                b'\n' | b'\r' => {
                    self.line_break = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | 0x0B | 0x0C => self.pos += 1,
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                    let start = self.pos;
                    let end = memchr2(b'\n', b'\r', &self.bytes[start..])
                        .map_or(len, |offset| start + offset);
                    self.pos = end;
                    self.result.comments.push(CommentRange::new(
                        start as u32,
                        end as u32,
                        false,
                        end < len,
                    ));
                }
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'*') => {
                    let start = self.pos;
                    let end = match memmem::find(&self.bytes[start + 2..], b"*/") {
                        Some(offset) => start + 2 + offset + 2,
                        None => {
                            self.error(start, len, "'*/' expected.", diagnostic_codes::UNTERMINATED_COMMENT);
                            len
                        }
                    };
                    if self.bytes[start..end].iter().any(|&b| b == b'\n' || b == b'\r') {
                        self.line_break = true;
                    }
                    self.pos = end;
                    let trailing = matches!(self.bytes.get(end), Some(b'\n' | b'\r'));
                    self.result
                        .comments
                        .push(CommentRange::new(start as u32, end as u32, true, trailing));
                }
                b if b >= 0x80 => {
                    let ch = self.current_char();
                    if ch == '\u{2028}' || ch == '\u{2029}' {
                        self.line_break = true;
                        self.pos += ch.len_utf8();
                    } else if ch.is_whitespace() || ch == '\u{FEFF}' {
                        self.pos += ch.len_utf8();
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    fn current_char(&self) -> char {
        self.text[self.pos..].chars().next().unwrap_or('\0')
    }

    fn scan_token(&mut self) -> (SyntaxKind, bool) {
        let ch = self.bytes[self.pos];
        let next = self.bytes.get(self.pos + 1).copied();
        let single = |kind| (kind, 1usize);
        let (kind, width) = match ch {
            b'{' => single(SyntaxKind::OpenBraceToken),
            b'}' => single(SyntaxKind::CloseBraceToken),
            b'(' => single(SyntaxKind::OpenParenToken),
            b')' => single(SyntaxKind::CloseParenToken),
            b'[' => single(SyntaxKind::OpenBracketToken),
            b']' => single(SyntaxKind::CloseBracketToken),
            b';' => single(SyntaxKind::SemicolonToken),
            b',' => single(SyntaxKind::CommaToken),
            b'<' => single(SyntaxKind::LessThanToken),
            b'>' => single(SyntaxKind::GreaterThanToken),
            b'|' => single(SyntaxKind::BarToken),
            b'&' => single(SyntaxKind::AmpersandToken),
            b'?' => single(SyntaxKind::QuestionToken),
            b':' => single(SyntaxKind::ColonToken),
            b'+' => single(SyntaxKind::PlusToken),
            b'-' => single(SyntaxKind::MinusToken),
            b'*' => single(SyntaxKind::AsteriskToken),
            b'/' => single(SyntaxKind::SlashToken),
            b'@' => single(SyntaxKind::AtToken),
            b'!' => single(SyntaxKind::ExclamationToken),
            b'=' if next == Some(b'>') => (SyntaxKind::EqualsGreaterThanToken, 2),
            b'=' => single(SyntaxKind::EqualsToken),
            b'.' if next.is_some_and(|b| b.is_ascii_digit()) => return (self.scan_number(), false),
            b'.' if self.bytes[self.pos..].starts_with(b"...") => (SyntaxKind::DotDotDotToken, 3),
            b'.' => single(SyntaxKind::DotToken),
            b'"' | b'\'' => return (self.scan_string(ch), false),
            b'`' => return (SyntaxKind::TemplateLiteral, self.scan_template()),
            b'0'..=b'9' => return (self.scan_number(), false),
            b'#' => {
                self.pos += 1;
                if self.pos < self.bytes.len() && is_identifier_start(self.current_char()) {
                    self.scan_identifier_rest();
                    return (SyntaxKind::PrivateIdentifier, false);
                }
                return (SyntaxKind::OtherPunctuation, false);
            }
            b'%' | b'^' | b'~' => single(SyntaxKind::OtherPunctuation),
            _ => {
                let c = self.current_char();
                if is_identifier_start(c) || c == '\\' {
                    let start = self.pos;
                    self.pos += c.len_utf8();
                    self.scan_identifier_rest();
                    let kind = text_to_keyword(&self.text[start..self.pos])
                        .unwrap_or(SyntaxKind::Identifier);
                    return (kind, false);
                }
                let start = self.pos;
                self.pos += c.len_utf8();
                self.error(
                    start,
                    self.pos,
                    "Invalid character.",
                    diagnostic_codes::INVALID_CHARACTER,
                );
                return (SyntaxKind::Unknown, false);
            }
        };
        self.pos += width;
        (kind, false)
    }

    fn scan_identifier_rest(&mut self) {
        while self.pos < self.bytes.len() {
            let c = self.current_char();
            if is_identifier_part(c) {
                self.pos += c.len_utf8();
            } else if c == '\\' {
                // unicode escapes are kept verbatim
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let bytes = self.bytes;
        if bytes[self.pos] == b'0'
            && matches!(
                bytes.get(self.pos + 1),
                Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O')
            )
        {
            self.pos += 2;
            while self.pos < bytes.len() && (bytes[self.pos].is_ascii_hexdigit() || bytes[self.pos] == b'_') {
                self.pos += 1;
            }
        } else {
            self.eat_digits();
            if bytes.get(self.pos) == Some(&b'.') {
                self.pos += 1;
                self.eat_digits();
            }
            if matches!(bytes.get(self.pos), Some(b'e' | b'E')) {
                let save = self.pos;
                self.pos += 1;
                if matches!(bytes.get(self.pos), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                if bytes.get(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                    self.eat_digits();
                } else {
                    self.pos = save;
                }
            }
        }
        if bytes.get(self.pos) == Some(&b'n') {
            self.pos += 1;
            return SyntaxKind::BigIntLiteral;
        }
        SyntaxKind::NumericLiteral
    }

    fn eat_digits(&mut self) {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_digit() || self.bytes[self.pos] == b'_')
        {
            self.pos += 1;
        }
    }

    fn scan_string(&mut self, quote: u8) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'\n' | b'\r' => break,
                b if b == quote => {
                    self.pos += 1;
                    return SyntaxKind::StringLiteral;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
        self.error(
            start,
            self.pos,
            "Unterminated string literal.",
            diagnostic_codes::UNTERMINATED_STRING_LITERAL,
        );
        SyntaxKind::StringLiteral
    }

    /// Scan a whole template literal, returning whether it has substitutions.
    fn scan_template(&mut self) -> bool {
        let start = self.pos;
        self.pos += 1;
        let mut has_substitutions = false;
        let mut brace_depth = 0usize;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if brace_depth > 0 {
                match b {
                    b'{' => brace_depth += 1,
                    b'}' => brace_depth -= 1,
                    _ => {}
                }
                self.pos += 1;
                continue;
            }
            match b {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return has_substitutions;
                }
                b'$' if self.bytes.get(self.pos + 1) == Some(&b'{') => {
                    has_substitutions = true;
                    brace_depth = 1;
                    self.pos += 2;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.bytes.len();
        self.error(
            start,
            self.pos,
            "Unterminated template literal.",
            diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL,
        );
        has_substitutions
    }
}

pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

pub fn is_identifier_part(c: char) -> bool {
    c == '_' || c == '$' || c == '\u{200C}' || c == '\u{200D}' || c.is_alphanumeric()
}

/// Whether `text` can be written as a bare identifier.
pub fn is_identifier_text(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}

/// Decode the contents of a quoted string literal token (quotes included).
pub fn cook_string_literal(raw: &str) -> String {
    let inner = if raw.len() >= 2 && raw.ends_with(&raw[..1]) {
        &raw[1..raw.len() - 1]
    } else {
        raw.get(1..).unwrap_or("")
    };
    unescape(inner)
}

/// Decode a template literal without substitutions (backticks included).
pub fn cook_template_literal(raw: &str) -> String {
    let inner = raw
        .strip_prefix('`')
        .map(|s| s.strip_suffix('`').unwrap_or(s))
        .unwrap_or(raw);
    unescape(inner)
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('v') => out.push('\u{000B}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if let Some(ch) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(ch);
                }
            }
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                if let Some(ch) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(ch);
                }
            }
            // line continuation
            Some('\n') => {}
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Numeric value of a numeric literal token, honouring radix prefixes and
/// `_` separators.
pub fn parse_numeric_literal(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let radix = match lower.get(..2) {
        Some("0x") => 16,
        Some("0b") => 2,
        Some("0o") => 8,
        _ => return cleaned.parse::<f64>().unwrap_or(f64::NAN),
    };
    u64::from_str_radix(&lower[2..], radix).map_or(f64::NAN, |v| v as f64)
}

/// Render a number the way JavaScript's `Number.prototype.toString` does.
pub fn format_js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();
    let sign = if value < 0.0 { "-" } else { "" };
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        format!("{}.{}", &digits[..n as usize], &digits[n as usize..])
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let exp_sign = if n - 1 >= 0 { "+" } else { "-" };
        let (head, tail) = digits.split_at(1);
        if tail.is_empty() {
            format!("{head}e{exp_sign}{}", (n - 1).abs())
        } else {
            format!("{head}.{tail}e{exp_sign}{}", (n - 1).abs())
        }
    };
    format!("{sign}{body}")
}
