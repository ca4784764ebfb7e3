//! Type grammar.
//!
//! Precedence, loosest first: conditional, function/constructor, union,
//! intersection, type operator (`keyof`, `readonly`, `unique`, `infer`),
//! postfix (`[]`, `[K]`), primary.

use smallvec::SmallVec;
use tsreveal_common::diagnostics::diagnostic_codes;
use tsreveal_common::limits::MAX_TYPE_NODE_DEPTH;

use super::ParserState;
use crate::ast::{
    ConditionalTypeNode, EntityName, FunctionTypeNode, Identifier, KeywordType, LiteralType,
    MappedModifier, MappedTypeNode, Parameter, PropertyName, PropertyNameKind, Signature,
    TupleElement, TypeMember, TypeMemberKind, TypeNode, TypeNodeKind, TypeOperator, TypeParameter,
};
use crate::scanner::{
    SyntaxKind, cook_string_literal, cook_template_literal, format_js_number,
    parse_numeric_literal,
};

impl ParserState {
    pub(crate) fn parse_type(&mut self) -> TypeNode {
        self.with_conditional_extends(false, Self::parse_type_worker)
    }

    fn with_conditional_extends(
        &mut self,
        value: bool,
        f: impl FnOnce(&mut Self) -> TypeNode,
    ) -> TypeNode {
        if self.depth >= MAX_TYPE_NODE_DEPTH {
            self.error_at_current("Type expected.", diagnostic_codes::TYPE_EXPECTED);
            return TypeNode::missing(self.token_start());
        }
        let saved = self.in_conditional_extends;
        self.in_conditional_extends = value;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        self.in_conditional_extends = saved;
        result
    }

    fn parse_type_worker(&mut self) -> TypeNode {
        if self.is_start_of_function_or_constructor_type() {
            return self.parse_function_or_constructor_type();
        }
        let start = self.token_start();
        let ty = self.parse_union_type();
        if self.in_conditional_extends
            || self.kind() != SyntaxKind::ExtendsKeyword
            || self.has_line_break_before()
        {
            return ty;
        }

        self.next_token(); // `extends`
        let extends_type = self.with_conditional_extends(true, Self::parse_type_worker);
        self.parse_expected(SyntaxKind::QuestionToken, "?");
        let true_type = self.parse_type();
        self.parse_expected(SyntaxKind::ColonToken, ":");
        let false_type = self.parse_type();
        TypeNode::new(
            self.range_from(start),
            TypeNodeKind::Conditional(Box::new(ConditionalTypeNode {
                check_type: ty,
                extends_type,
                true_type,
                false_type,
            })),
        )
    }

    // =========================================================================
    // Function and constructor types
    // =========================================================================

    fn is_start_of_function_or_constructor_type(&self) -> bool {
        match self.kind() {
            SyntaxKind::LessThanToken | SyntaxKind::NewKeyword => true,
            SyntaxKind::AbstractKeyword => self.peek_kind(1) == SyntaxKind::NewKeyword,
            SyntaxKind::OpenParenToken => self.is_arrow_after_parameter_list(),
            _ => false,
        }
    }

    /// From a `(`, find its matching `)` and check whether `=>` follows.
    fn is_arrow_after_parameter_list(&self) -> bool {
        let mut depth = 0usize;
        let mut i = 0usize;
        loop {
            match self.peek_kind(i) {
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.peek_kind(i + 1) == SyntaxKind::EqualsGreaterThanToken;
                    }
                }
                SyntaxKind::EndOfFileToken => return false,
                _ => {}
            }
            i += 1;
        }
    }

    fn parse_function_or_constructor_type(&mut self) -> TypeNode {
        let start = self.token_start();
        self.parse_optional(SyntaxKind::AbstractKeyword);
        let is_constructor = self.parse_optional(SyntaxKind::NewKeyword);
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters();
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken, "=>");
        let return_type = Some(self.parse_return_type());
        TypeNode::new(
            self.range_from(start),
            TypeNodeKind::Function(Box::new(FunctionTypeNode {
                is_constructor,
                signature: Signature {
                    type_parameters,
                    parameters,
                    return_type,
                },
            })),
        )
    }

    /// Return position type, which additionally admits type predicates.
    fn parse_return_type(&mut self) -> TypeNode {
        let start = self.token_start();
        let asserts = self.kind() == SyntaxKind::AssertsKeyword
            && (self.peek_kind(1).is_identifier() || self.peek_kind(1) == SyntaxKind::ThisKeyword)
            && !self.peek_token(1).has_preceding_line_break;
        if asserts {
            self.next_token();
        }
        let is_predicate_subject =
            self.kind().is_identifier() || self.kind() == SyntaxKind::ThisKeyword;
        if asserts || (is_predicate_subject && self.peek_kind(1) == SyntaxKind::IsKeyword) {
            let parameter = self.token_text().to_string();
            self.next_token();
            let ty = if self.parse_optional(SyntaxKind::IsKeyword) {
                Some(Box::new(self.parse_type()))
            } else {
                None
            };
            return TypeNode::new(
                self.range_from(start),
                TypeNodeKind::Predicate {
                    asserts,
                    parameter,
                    ty,
                },
            );
        }
        self.parse_type()
    }

    fn parse_parameters(&mut self) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenParenToken, "(") {
            return parameters;
        }
        while !matches!(
            self.kind(),
            SyntaxKind::CloseParenToken | SyntaxKind::EndOfFileToken
        ) {
            let before = self.pos;
            parameters.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) && self.pos == before {
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken, ")");
        parameters
    }

    fn parse_parameter(&mut self) -> Parameter {
        let start = self.token_start();
        // accessibility / readonly modifiers on constructor parameters
        while matches!(self.token_text(), "public" | "private" | "protected" | "readonly")
            && self.peek_kind(1).is_identifier()
        {
            self.next_token();
        }
        let rest = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = match self.kind() {
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken => self.skip_balanced(),
            SyntaxKind::ThisKeyword => {
                self.next_token();
                "this".to_string()
            }
            _ => self.parse_identifier().text,
        };
        let optional = self.parse_optional(SyntaxKind::QuestionToken);
        let ty = if self.parse_optional(SyntaxKind::ColonToken) {
            Some(self.parse_type())
        } else {
            None
        };
        if self.parse_optional(SyntaxKind::EqualsToken) {
            self.skip_initializer();
        }
        Parameter {
            range: self.range_from(start),
            name,
            optional,
            rest,
            ty,
        }
    }

    /// Skip a parameter default value up to the next `,` or `)`.
    fn skip_initializer(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.kind() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::CommaToken | SyntaxKind::CloseParenToken if depth == 0 => return,
                SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::CloseBraceToken => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next_token();
        }
    }

    // =========================================================================
    // Union / intersection / operators / postfix
    // =========================================================================

    fn parse_union_type(&mut self) -> TypeNode {
        self.parse_list_type(SyntaxKind::BarToken, Self::parse_intersection_type, TypeNodeKind::Union)
    }

    fn parse_intersection_type(&mut self) -> TypeNode {
        self.parse_list_type(
            SyntaxKind::AmpersandToken,
            Self::parse_type_operator_or_higher,
            TypeNodeKind::Intersection,
        )
    }

    fn parse_list_type(
        &mut self,
        separator: SyntaxKind,
        parse_constituent: fn(&mut Self) -> TypeNode,
        make: fn(Vec<TypeNode>) -> TypeNodeKind,
    ) -> TypeNode {
        let start = self.token_start();
        let has_leading = self.parse_optional(separator);
        let first = if has_leading && self.is_start_of_function_or_constructor_type() {
            self.parse_function_or_constructor_type()
        } else {
            parse_constituent(self)
        };
        if self.kind() != separator {
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(separator) {
            if self.is_start_of_function_or_constructor_type() {
                types.push(self.parse_function_or_constructor_type());
            } else {
                types.push(parse_constituent(self));
            }
        }
        TypeNode::new(self.range_from(start), make(types))
    }

    fn parse_type_operator_or_higher(&mut self) -> TypeNode {
        let start = self.token_start();
        let operator = match self.kind() {
            SyntaxKind::KeyofKeyword => Some(TypeOperator::Keyof),
            SyntaxKind::UniqueKeyword => Some(TypeOperator::Unique),
            SyntaxKind::ReadonlyKeyword => Some(TypeOperator::Readonly),
            SyntaxKind::InferKeyword => {
                self.next_token();
                let name = self.parse_identifier();
                let range = self.range_from(start);
                return TypeNode::new(
                    range,
                    TypeNodeKind::Infer(Box::new(TypeParameter {
                        range,
                        name,
                        constraint: None,
                        default: None,
                    })),
                );
            }
            _ => None,
        };
        match operator {
            Some(operator) => {
                self.next_token();
                let ty = self.parse_type_operator_or_higher();
                TypeNode::new(
                    self.range_from(start),
                    TypeNodeKind::TypeOperator {
                        operator,
                        ty: Box::new(ty),
                    },
                )
            }
            None => self.parse_postfix_type(),
        }
    }

    fn parse_postfix_type(&mut self) -> TypeNode {
        let start = self.token_start();
        let mut ty = self.parse_non_array_type();
        while !self.has_line_break_before() {
            match self.kind() {
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    if self.parse_optional(SyntaxKind::CloseBracketToken) {
                        ty = TypeNode::new(self.range_from(start), TypeNodeKind::Array(Box::new(ty)));
                    } else {
                        let index = self.parse_type();
                        self.parse_expected(SyntaxKind::CloseBracketToken, "]");
                        ty = TypeNode::new(
                            self.range_from(start),
                            TypeNodeKind::IndexedAccess {
                                object: Box::new(ty),
                                index: Box::new(index),
                            },
                        );
                    }
                }
                _ => break,
            }
        }
        ty
    }

    // =========================================================================
    // Primary types
    // =========================================================================

    fn parse_non_array_type(&mut self) -> TypeNode {
        let start = self.token_start();
        let keyword = match self.kind() {
            SyntaxKind::AnyKeyword => Some(KeywordType::Any),
            SyntaxKind::UnknownKeyword => Some(KeywordType::Unknown),
            SyntaxKind::NeverKeyword => Some(KeywordType::Never),
            SyntaxKind::VoidKeyword => Some(KeywordType::Void),
            SyntaxKind::UndefinedKeyword => Some(KeywordType::Undefined),
            SyntaxKind::NullKeyword => Some(KeywordType::Null),
            SyntaxKind::BooleanKeyword => Some(KeywordType::Boolean),
            SyntaxKind::NumberKeyword => Some(KeywordType::Number),
            SyntaxKind::StringKeyword => Some(KeywordType::String),
            SyntaxKind::BigIntKeyword => Some(KeywordType::BigInt),
            SyntaxKind::SymbolKeyword => Some(KeywordType::Symbol),
            SyntaxKind::ObjectKeyword => Some(KeywordType::Object),
            _ => None,
        };
        // `string.Foo` would be a namespace access, not the keyword type.
        if let Some(keyword) = keyword
            && self.peek_kind(1) != SyntaxKind::DotToken
        {
            self.next_token();
            return TypeNode::new(self.range_from(start), TypeNodeKind::Keyword(keyword));
        }

        match self.kind() {
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let value = self.kind() == SyntaxKind::TrueKeyword;
                self.next_token();
                TypeNode::new(
                    self.range_from(start),
                    TypeNodeKind::Literal(LiteralType::Boolean(value)),
                )
            }
            SyntaxKind::ThisKeyword => {
                self.next_token();
                TypeNode::new(self.range_from(start), TypeNodeKind::This)
            }
            SyntaxKind::StringLiteral => {
                let value = cook_string_literal(self.token_text());
                self.next_token();
                TypeNode::new(
                    self.range_from(start),
                    TypeNodeKind::Literal(LiteralType::String(value)),
                )
            }
            SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => self.parse_numeric_literal_type(false),
            SyntaxKind::MinusToken
                if matches!(
                    self.peek_kind(1),
                    SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral
                ) =>
            {
                self.next_token();
                self.parse_numeric_literal_type(true)
            }
            SyntaxKind::TemplateLiteral => {
                let cooked = (!self.token().has_substitutions)
                    .then(|| cook_template_literal(self.token_text()));
                self.next_token();
                TypeNode::new(self.range_from(start), TypeNodeKind::TemplateLiteral { cooked })
            }
            SyntaxKind::TypeofKeyword => {
                self.next_token();
                if self.kind() == SyntaxKind::ImportKeyword {
                    return self.parse_import_type(start);
                }
                let name = self.parse_entity_name();
                if self.kind() == SyntaxKind::LessThanToken && !self.has_line_break_before() {
                    self.parse_type_arguments();
                }
                TypeNode::new(self.range_from(start), TypeNodeKind::TypeQuery(name))
            }
            SyntaxKind::ImportKeyword => self.parse_import_type(start),
            SyntaxKind::OpenBraceToken => {
                if self.is_start_of_mapped_type() {
                    self.parse_mapped_type()
                } else {
                    let members = self.parse_object_type_members();
                    TypeNode::new(self.range_from(start), TypeNodeKind::TypeLiteral(members))
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let inner = self.parse_type();
                self.parse_expected(SyntaxKind::CloseParenToken, ")");
                TypeNode::new(
                    self.range_from(start),
                    TypeNodeKind::Parenthesized(Box::new(inner)),
                )
            }
            kind if kind.is_identifier() => self.parse_type_reference(),
            _ => {
                self.error_at_current("Type expected.", diagnostic_codes::TYPE_EXPECTED);
                TypeNode::missing(start)
            }
        }
    }

    fn parse_numeric_literal_type(&mut self, negative: bool) -> TypeNode {
        let start = if negative {
            self.prev_end() - 1
        } else {
            self.token_start()
        };
        let text = self.token_text().to_string();
        let is_bigint = self.kind() == SyntaxKind::BigIntLiteral;
        self.next_token();
        let literal = if is_bigint {
            let digits = text.trim_end_matches('n').replace('_', "");
            LiteralType::BigInt(if negative { format!("-{digits}") } else { digits })
        } else {
            let value = parse_numeric_literal(&text);
            LiteralType::Number(if negative { -value } else { value })
        };
        TypeNode::new(self.range_from(start), TypeNodeKind::Literal(literal))
    }

    /// `import("mod").A.B<T>`; only the syntax is consumed.
    fn parse_import_type(&mut self, start: u32) -> TypeNode {
        self.next_token(); // `import`
        if self.kind() == SyntaxKind::OpenParenToken {
            self.skip_balanced();
        }
        while self.parse_optional(SyntaxKind::DotToken) {
            self.parse_identifier();
        }
        if self.kind() == SyntaxKind::LessThanToken && !self.has_line_break_before() {
            self.parse_type_arguments();
        }
        TypeNode::new(self.range_from(start), TypeNodeKind::Import)
    }

    pub(crate) fn parse_type_reference(&mut self) -> TypeNode {
        let start = self.token_start();
        let name = self.parse_entity_name();
        let type_arguments =
            if self.kind() == SyntaxKind::LessThanToken && !self.has_line_break_before() {
                self.parse_type_arguments()
            } else {
                Vec::new()
            };
        TypeNode::new(
            self.range_from(start),
            TypeNodeKind::Reference {
                name,
                type_arguments,
            },
        )
    }

    fn parse_entity_name(&mut self) -> EntityName {
        let mut segments: SmallVec<[Identifier; 2]> = SmallVec::new();
        segments.push(self.parse_identifier_or_this());
        while self.kind() == SyntaxKind::DotToken && self.peek_kind(1).is_identifier_or_keyword() {
            self.next_token();
            let token = *self.token();
            self.next_token();
            segments.push(Identifier {
                text: token.range.slice(&self.text).to_string(),
                range: token.range,
            });
        }
        EntityName { segments }
    }

    fn parse_identifier_or_this(&mut self) -> Identifier {
        if self.kind() == SyntaxKind::ThisKeyword {
            let range = self.token().range;
            self.next_token();
            return Identifier {
                text: "this".to_string(),
                range,
            };
        }
        self.parse_identifier()
    }

    fn parse_type_arguments(&mut self) -> Vec<TypeNode> {
        let mut arguments = Vec::new();
        self.next_token(); // `<`
        while !matches!(
            self.kind(),
            SyntaxKind::GreaterThanToken | SyntaxKind::EndOfFileToken
        ) {
            let before = self.pos;
            arguments.push(self.parse_type());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                if self.pos == before {
                    self.next_token();
                }
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken, ">");
        arguments
    }

    pub(crate) fn parse_type_parameters(&mut self) -> Vec<TypeParameter> {
        let mut parameters = Vec::new();
        if !self.parse_optional(SyntaxKind::LessThanToken) {
            return parameters;
        }
        while !matches!(
            self.kind(),
            SyntaxKind::GreaterThanToken | SyntaxKind::EndOfFileToken
        ) {
            let start = self.token_start();
            // variance / const modifiers
            while matches!(
                self.kind(),
                SyntaxKind::ConstKeyword | SyntaxKind::InKeyword | SyntaxKind::OutKeyword
            ) && self.peek_kind(1).is_identifier()
            {
                self.next_token();
            }
            let before = self.pos;
            let name = self.parse_identifier();
            let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
                Some(self.parse_type())
            } else {
                None
            };
            let default = if self.parse_optional(SyntaxKind::EqualsToken) {
                Some(self.parse_type())
            } else {
                None
            };
            parameters.push(TypeParameter {
                range: self.range_from(start),
                name,
                constraint,
                default,
            });
            if !self.parse_optional(SyntaxKind::CommaToken) {
                if self.pos == before {
                    self.next_token();
                }
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken, ">");
        parameters
    }

    // =========================================================================
    // Tuples
    // =========================================================================

    fn parse_tuple_type(&mut self) -> TypeNode {
        let start = self.token_start();
        self.next_token(); // `[`
        let mut elements = Vec::new();
        while !matches!(
            self.kind(),
            SyntaxKind::CloseBracketToken | SyntaxKind::EndOfFileToken
        ) {
            let before = self.pos;
            elements.push(self.parse_tuple_element());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                if self.pos == before {
                    self.next_token();
                }
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken, "]");
        TypeNode::new(self.range_from(start), TypeNodeKind::Tuple(elements))
    }

    fn parse_tuple_element(&mut self) -> TupleElement {
        let start = self.token_start();
        let mut rest = self.parse_optional(SyntaxKind::DotDotDotToken);
        let is_named = self.kind().is_identifier_or_keyword()
            && (self.peek_kind(1) == SyntaxKind::ColonToken
                || (self.peek_kind(1) == SyntaxKind::QuestionToken
                    && self.peek_kind(2) == SyntaxKind::ColonToken));
        let mut optional = false;
        let name = if is_named {
            let name = self.token_text().to_string();
            self.next_token();
            optional = self.parse_optional(SyntaxKind::QuestionToken);
            self.next_token(); // `:`
            if !rest {
                rest = self.parse_optional(SyntaxKind::DotDotDotToken);
            }
            Some(name)
        } else {
            None
        };
        let ty = self.parse_type();
        if name.is_none() {
            optional = self.parse_optional(SyntaxKind::QuestionToken);
        }
        TupleElement {
            range: self.range_from(start),
            name,
            optional,
            rest,
            ty,
        }
    }

    // =========================================================================
    // Object types
    // =========================================================================

    fn is_start_of_mapped_type(&self) -> bool {
        let mut i = 1;
        if matches!(self.peek_kind(i), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            i += 1;
            if self.peek_kind(i) != SyntaxKind::ReadonlyKeyword {
                return false;
            }
        }
        if self.peek_kind(i) == SyntaxKind::ReadonlyKeyword {
            i += 1;
        }
        self.peek_kind(i) == SyntaxKind::OpenBracketToken
            && self.peek_kind(i + 1).is_identifier_or_keyword()
            && self.peek_kind(i + 2) == SyntaxKind::InKeyword
    }

    fn parse_mapped_modifier(&mut self, keyword: SyntaxKind) -> Option<MappedModifier> {
        let modifier = match self.kind() {
            SyntaxKind::PlusToken if self.peek_kind(1) == keyword => MappedModifier::Add,
            SyntaxKind::MinusToken if self.peek_kind(1) == keyword => MappedModifier::Remove,
            kind if kind == keyword => {
                self.next_token();
                return Some(MappedModifier::Add);
            }
            _ => return None,
        };
        self.next_token();
        self.next_token();
        Some(modifier)
    }

    fn parse_mapped_type(&mut self) -> TypeNode {
        let start = self.token_start();
        self.next_token(); // `{`
        let readonly = self.parse_mapped_modifier(SyntaxKind::ReadonlyKeyword);
        self.parse_expected(SyntaxKind::OpenBracketToken, "[");
        let token = *self.token();
        self.next_token();
        let type_parameter = Identifier {
            text: token.range.slice(&self.text).to_string(),
            range: token.range,
        };
        self.parse_expected(SyntaxKind::InKeyword, "in");
        let constraint = self.parse_type();
        let name_type = if self.kind() == SyntaxKind::Identifier && self.token_text() == "as" {
            self.next_token();
            Some(self.parse_type())
        } else {
            None
        };
        self.parse_expected(SyntaxKind::CloseBracketToken, "]");
        let optional = self.parse_mapped_modifier(SyntaxKind::QuestionToken);
        let ty = if self.parse_optional(SyntaxKind::ColonToken) {
            Some(self.parse_type())
        } else {
            None
        };
        if !self.parse_optional(SyntaxKind::SemicolonToken) {
            self.parse_optional(SyntaxKind::CommaToken);
        }
        self.parse_expected(SyntaxKind::CloseBraceToken, "}");
        TypeNode::new(
            self.range_from(start),
            TypeNodeKind::Mapped(Box::new(MappedTypeNode {
                readonly,
                type_parameter,
                constraint,
                name_type,
                optional,
                ty,
            })),
        )
    }

    /// `{ member; member }`, shared by type literals and interface bodies.
    pub(crate) fn parse_object_type_members(&mut self) -> Vec<TypeMember> {
        let mut members = Vec::new();
        if !self.parse_expected(SyntaxKind::OpenBraceToken, "{") {
            return members;
        }
        while !matches!(
            self.kind(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            let before = self.pos;
            if let Some(member) = self.parse_type_member() {
                members.push(member);
            }
            if !self.parse_optional(SyntaxKind::SemicolonToken)
                && !self.parse_optional(SyntaxKind::CommaToken)
                && !self.can_parse_semicolon()
            {
                self.parse_expected(SyntaxKind::SemicolonToken, ";");
            }
            if self.pos == before {
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken, "}");
        members
    }

    fn parse_type_member(&mut self) -> Option<TypeMember> {
        let start = self.token_start();
        let kind = match self.kind() {
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => {
                TypeMemberKind::Call(self.parse_signature(SyntaxKind::ColonToken))
            }
            SyntaxKind::NewKeyword
                if matches!(
                    self.peek_kind(1),
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                ) =>
            {
                self.next_token();
                TypeMemberKind::Construct(self.parse_signature(SyntaxKind::ColonToken))
            }
            _ => {
                let readonly = self.kind() == SyntaxKind::ReadonlyKeyword
                    && self.is_property_name_start(self.peek_kind(1));
                if readonly {
                    self.next_token();
                }
                if self.is_index_signature() {
                    self.parse_index_signature(readonly)
                } else if matches!(self.kind(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
                    && self.is_property_name_start(self.peek_kind(1))
                {
                    self.parse_accessor(readonly)
                } else {
                    let name = self.parse_property_name()?;
                    let optional = self.parse_optional(SyntaxKind::QuestionToken);
                    if matches!(
                        self.kind(),
                        SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                    ) {
                        TypeMemberKind::Method {
                            name,
                            optional,
                            signature: self.parse_signature(SyntaxKind::ColonToken),
                        }
                    } else {
                        let ty = if self.parse_optional(SyntaxKind::ColonToken) {
                            Some(self.parse_type())
                        } else {
                            None
                        };
                        TypeMemberKind::Property {
                            name,
                            optional,
                            readonly,
                            ty,
                        }
                    }
                }
            }
        };
        Some(TypeMember {
            range: self.range_from(start),
            kind,
        })
    }

    fn is_property_name_start(&self, kind: SyntaxKind) -> bool {
        kind.is_identifier_or_keyword()
            || matches!(
                kind,
                SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::OpenBracketToken
                    | SyntaxKind::PrivateIdentifier
            )
    }

    fn is_index_signature(&self) -> bool {
        self.kind() == SyntaxKind::OpenBracketToken
            && self.peek_kind(1).is_identifier_or_keyword()
            && self.peek_kind(2) == SyntaxKind::ColonToken
    }

    fn parse_index_signature(&mut self, readonly: bool) -> TypeMemberKind {
        self.next_token(); // `[`
        let token = *self.token();
        self.next_token();
        let parameter = Identifier {
            text: token.range.slice(&self.text).to_string(),
            range: token.range,
        };
        self.next_token(); // `:`
        let key_type = self.parse_type();
        self.parse_expected(SyntaxKind::CloseBracketToken, "]");
        let ty = if self.parse_optional(SyntaxKind::ColonToken) {
            Some(self.parse_type())
        } else {
            None
        };
        TypeMemberKind::Index {
            readonly,
            parameter,
            key_type,
            ty,
        }
    }

    /// `get name(): T` and `set name(value: T)` both describe a property.
    fn parse_accessor(&mut self, readonly: bool) -> TypeMemberKind {
        let is_getter = self.kind() == SyntaxKind::GetKeyword;
        self.next_token();
        let name = self.parse_property_name().unwrap_or(PropertyName {
            kind: PropertyNameKind::Identifier,
            text: String::new(),
        });
        let signature = self.parse_signature(SyntaxKind::ColonToken);
        let ty = if is_getter {
            signature.return_type
        } else {
            signature.parameters.into_iter().next().and_then(|p| p.ty)
        };
        TypeMemberKind::Property {
            name,
            optional: false,
            readonly,
            ty,
        }
    }

    fn parse_property_name(&mut self) -> Option<PropertyName> {
        let token = *self.token();
        let raw = token.range.slice(&self.text);
        let name = match token.kind {
            SyntaxKind::StringLiteral => PropertyName {
                kind: PropertyNameKind::String,
                text: cook_string_literal(raw),
            },
            SyntaxKind::NumericLiteral => PropertyName {
                kind: PropertyNameKind::Number,
                text: format_js_number(parse_numeric_literal(raw)),
            },
            SyntaxKind::PrivateIdentifier => PropertyName {
                kind: PropertyNameKind::Identifier,
                text: raw.to_string(),
            },
            SyntaxKind::OpenBracketToken => {
                let text = self.skip_balanced();
                return Some(PropertyName {
                    kind: PropertyNameKind::Computed,
                    text: normalize_computed_name(&text),
                });
            }
            kind if kind.is_identifier_or_keyword() => PropertyName {
                kind: PropertyNameKind::Identifier,
                text: raw.to_string(),
            },
            _ => {
                self.error_at_current(
                    "Property or signature expected.",
                    diagnostic_codes::IDENTIFIER_EXPECTED,
                );
                return None;
            }
        };
        self.next_token();
        Some(name)
    }

    /// Type parameters, parameter list and an optional return annotation
    /// introduced by `return_token` (`:` for members).
    fn parse_signature(&mut self, return_token: SyntaxKind) -> Signature {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameters();
        let return_type = if self.parse_optional(return_token) {
            Some(self.parse_return_type())
        } else {
            None
        };
        Signature {
            type_parameters,
            parameters,
            return_type,
        }
    }
}

/// Collapse whitespace inside `[ Symbol . iterator ]` to `[Symbol.iterator]`.
fn normalize_computed_name(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
