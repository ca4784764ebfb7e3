//! Statement-level parsing.
//!
//! Only declarations that introduce types are parsed structurally. Everything
//! else is skipped with bracket balancing so that its contents can never be
//! mistaken for declarations.

use std::sync::Arc;

use smallvec::SmallVec;
use tsreveal_common::diagnostics::diagnostic_codes;

use super::ParserState;
use crate::ast::{
    ClassDeclaration, EnumDeclaration, Identifier, InterfaceDeclaration, ModifierFlags,
    ModuleDeclaration, Statement, StatementKind, TypeAliasDeclaration,
};
use crate::scanner::{SyntaxKind, cook_string_literal};

impl ParserState {
    pub(crate) fn parse_statements(&mut self, in_block: bool) -> Vec<Statement> {
        let mut statements = Vec::new();
        loop {
            match self.kind() {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::CloseBraceToken if in_block => break,
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                    continue;
                }
                _ => {}
            }
            let before = self.pos;
            statements.push(self.parse_statement());
            if self.pos == before {
                self.error_at_current(
                    "Declaration or statement expected.",
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                self.next_token();
            }
        }
        statements
    }

    fn parse_statement(&mut self) -> Statement {
        let start = self.token_start();
        let save = self.pos;
        let modifiers = self.parse_declaration_modifiers();

        let next = *self.peek_token(1);
        let same_line_name = !next.has_preceding_line_break;
        let kind = match self.kind() {
            SyntaxKind::TypeKeyword if next.kind.is_identifier() && same_line_name => {
                StatementKind::TypeAlias(Arc::new(self.parse_type_alias(start, modifiers)))
            }
            SyntaxKind::InterfaceKeyword if next.kind.is_identifier() && same_line_name => {
                StatementKind::Interface(Arc::new(self.parse_interface(start, modifiers)))
            }
            SyntaxKind::NamespaceKeyword if next.kind.is_identifier() && same_line_name => {
                StatementKind::Module(self.parse_module(start, modifiers))
            }
            SyntaxKind::ModuleKeyword
                if (next.kind.is_identifier() || next.kind == SyntaxKind::StringLiteral)
                    && same_line_name =>
            {
                StatementKind::Module(self.parse_module(start, modifiers))
            }
            SyntaxKind::GlobalKeyword if next.kind == SyntaxKind::OpenBraceToken => {
                StatementKind::Module(self.parse_module(start, modifiers))
            }
            SyntaxKind::ClassKeyword if next.kind.is_identifier() => {
                StatementKind::Class(Arc::new(self.parse_class(start, modifiers)))
            }
            SyntaxKind::EnumKeyword if next.kind.is_identifier() => {
                StatementKind::Enum(Arc::new(self.parse_enum(start, modifiers)))
            }
            _ => {
                self.pos = save;
                self.skip_statement();
                StatementKind::Other
            }
        };

        Statement {
            range: self.range_from(start),
            kind,
        }
    }

    /// `export`, `export default` and `declare` prefixes on a declaration.
    fn parse_declaration_modifiers(&mut self) -> ModifierFlags {
        let mut flags = ModifierFlags::empty();
        loop {
            let next = *self.peek_token(1);
            match self.kind() {
                SyntaxKind::ExportKeyword
                    if !matches!(
                        next.kind,
                        SyntaxKind::EqualsToken
                            | SyntaxKind::OpenBraceToken
                            | SyntaxKind::AsteriskToken
                    ) =>
                {
                    flags |= ModifierFlags::EXPORT;
                    self.next_token();
                    if self.kind() == SyntaxKind::DefaultKeyword {
                        flags |= ModifierFlags::DEFAULT;
                        self.next_token();
                    }
                }
                SyntaxKind::DeclareKeyword
                    if next.kind.is_identifier_or_keyword() && !next.has_preceding_line_break =>
                {
                    flags |= ModifierFlags::DECLARE;
                    self.next_token();
                }
                SyntaxKind::AbstractKeyword if next.kind == SyntaxKind::ClassKeyword => {
                    flags |= ModifierFlags::ABSTRACT;
                    self.next_token();
                }
                SyntaxKind::ConstKeyword if next.kind == SyntaxKind::EnumKeyword => {
                    flags |= ModifierFlags::CONST;
                    self.next_token();
                }
                _ => return flags,
            }
        }
    }

    fn parse_type_alias(&mut self, start: u32, modifiers: ModifierFlags) -> TypeAliasDeclaration {
        self.next_token(); // `type`
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken, "=");
        let ty = self.parse_type();
        self.parse_semicolon();
        TypeAliasDeclaration {
            range: self.range_from(start),
            modifiers,
            name,
            type_parameters,
            ty,
        }
    }

    fn parse_interface(&mut self, start: u32, modifiers: ModifierFlags) -> InterfaceDeclaration {
        self.next_token(); // `interface`
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();

        let mut heritage = Vec::new();
        loop {
            let is_extends = self.kind() == SyntaxKind::ExtendsKeyword;
            let is_implements = self.kind() == SyntaxKind::Identifier && self.token_text() == "implements";
            if !is_extends && !is_implements {
                break;
            }
            self.next_token();
            loop {
                let reference = self.parse_type_reference();
                if is_extends {
                    heritage.push(reference);
                }
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }

        let members = self.parse_object_type_members();
        InterfaceDeclaration {
            range: self.range_from(start),
            modifiers,
            name,
            type_parameters,
            heritage,
            members,
        }
    }

    fn parse_module(&mut self, start: u32, modifiers: ModifierFlags) -> ModuleDeclaration {
        let keyword = self.kind();
        let keyword_range = self.token().range;
        self.next_token();

        let mut name: SmallVec<[Identifier; 2]> = SmallVec::new();
        if keyword == SyntaxKind::GlobalKeyword {
            name.push(Identifier {
                text: "global".to_string(),
                range: keyword_range,
            });
        } else if self.kind() == SyntaxKind::StringLiteral {
            let range = self.token().range;
            name.push(Identifier {
                text: cook_string_literal(self.token_text()),
                range,
            });
            self.next_token();
        } else {
            name.push(self.parse_identifier());
            while self.parse_optional(SyntaxKind::DotToken) {
                name.push(self.parse_identifier());
            }
        }

        let body = if self.parse_optional(SyntaxKind::OpenBraceToken) {
            let body = self.parse_statements(true);
            self.parse_expected(SyntaxKind::CloseBraceToken, "}");
            body
        } else {
            self.parse_semicolon();
            Vec::new()
        };

        ModuleDeclaration {
            range: self.range_from(start),
            modifiers,
            name: name.into_vec(),
            body,
        }
    }

    fn parse_class(&mut self, start: u32, modifiers: ModifierFlags) -> ClassDeclaration {
        self.next_token(); // `class`
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.skip_block_declaration();
        ClassDeclaration {
            range: self.range_from(start),
            modifiers,
            name,
            type_parameters,
        }
    }

    fn parse_enum(&mut self, start: u32, modifiers: ModifierFlags) -> EnumDeclaration {
        self.next_token(); // `enum`
        let name = self.parse_identifier();
        let mut members = Vec::new();
        if self.parse_expected(SyntaxKind::OpenBraceToken, "{") {
            while !matches!(
                self.kind(),
                SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
            ) {
                let token = *self.token();
                if token.kind.is_identifier_or_keyword() {
                    members.push(Identifier {
                        text: self.token_text().to_string(),
                        range: token.range,
                    });
                } else if token.kind == SyntaxKind::StringLiteral {
                    members.push(Identifier {
                        text: cook_string_literal(self.token_text()),
                        range: token.range,
                    });
                }
                self.skip_enum_initializer();
                self.parse_optional(SyntaxKind::CommaToken);
            }
            self.parse_expected(SyntaxKind::CloseBraceToken, "}");
        }
        EnumDeclaration {
            range: self.range_from(start),
            modifiers,
            name,
            members,
        }
    }

    /// Skip an enum member's name and initializer up to its `,` or the
    /// closing `}`.
    fn skip_enum_initializer(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.kind() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken if depth == 0 => return,
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next_token();
        }
    }

    /// Skip heritage clauses and a braced body through its closing `}`.
    fn skip_block_declaration(&mut self) {
        // Heritage clauses may hold type arguments with object literals.
        let mut depth = 0usize;
        loop {
            match self.kind() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::CloseBraceToken if depth == 0 => return,
                SyntaxKind::SemicolonToken if depth == 0 => {
                    self.next_token();
                    return;
                }
                SyntaxKind::OpenBraceToken if depth == 0 => break,
                SyntaxKind::LessThanToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::GreaterThanToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next_token();
        }
        loop {
            match self.kind() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBraceToken if depth == 1 => {
                    self.next_token();
                    return;
                }
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next_token();
        }
    }

    /// Skip a statement the type resolver has no use for.
    ///
    /// Stops at a `;` or an unmatched `}` at bracket depth zero, or at a line
    /// break that follows a closed block or precedes a declaration keyword.
    pub(crate) fn skip_statement(&mut self) {
        let mut depth = 0usize;
        let mut first = true;
        loop {
            let token = *self.token();
            if token.kind == SyntaxKind::EndOfFileToken {
                return;
            }
            if depth == 0 && !first {
                if token.kind == SyntaxKind::CloseBraceToken {
                    return;
                }
                if token.has_preceding_line_break {
                    let prev = self.tokens[self.pos - 1].kind;
                    if prev == SyntaxKind::CloseBraceToken || starts_declaration(token.kind) {
                        return;
                    }
                }
            }
            match token.kind {
                SyntaxKind::SemicolonToken if depth == 0 => {
                    self.next_token();
                    return;
                }
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => depth = depth.saturating_sub(1),
                _ => {}
            }
            first = false;
            self.next_token();
        }
    }
}

fn starts_declaration(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::TypeKeyword
            | SyntaxKind::InterfaceKeyword
            | SyntaxKind::ExportKeyword
            | SyntaxKind::DeclareKeyword
            | SyntaxKind::NamespaceKeyword
            | SyntaxKind::ModuleKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::VarKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::ImportKeyword
    )
}
