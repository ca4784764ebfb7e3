//! Syntax tree to [`Doc`] conversion.
//!
//! Declarations and types are rebuilt from the tree rather than copied from
//! the source, so spacing, quotes and separators come out canonical. Only
//! text the tree does not model (template literals, `import(...)` types,
//! value statements) is taken verbatim from the source.

use tsreveal_common::comments::comments_in_range;
use tsreveal_common::{CommentRange, TextRange};
use tsreveal_parser::ast::{
    ConditionalTypeNode, InterfaceDeclaration, LiteralType, MappedModifier, MappedTypeNode,
    ModifierFlags, ModuleDeclaration, Parameter, PropertyName, PropertyNameKind, Signature,
    SourceFile, Statement, StatementKind, TupleElement, TypeAliasDeclaration, TypeMember,
    TypeMemberKind, TypeNode, TypeNodeKind, TypeOperator, TypeParameter,
};
use tsreveal_parser::scanner::is_identifier_text;

use crate::FormatOptions;
use crate::doc::{Doc, align, concat, group, if_break, indent, join, text};

pub(crate) struct DocEmitter<'a> {
    source: &'a SourceFile,
    options: &'a FormatOptions,
}

impl<'a> DocEmitter<'a> {
    pub(crate) fn new(source: &'a SourceFile, options: &'a FormatOptions) -> Self {
        DocEmitter { source, options }
    }

    /// The whole file.
    pub(crate) fn emit_file(&self) -> Doc {
        let end = self.source.text.len() as u32;
        self.statement_list(&self.source.statements, 0, end)
    }

    fn slice(&self, range: TextRange) -> &'a str {
        range.slice(&self.source.text)
    }

    fn comment_text(&self, comment: &CommentRange) -> &'a str {
        comment.get_text(&self.source.text)
    }

    fn semi(&self) -> Doc {
        if self.options.semi { text(";") } else { Doc::Nil }
    }

    // =========================================================================
    // Statements and comments
    // =========================================================================

    /// Statements of a file or block body, with the comments between them.
    /// At most one blank line is kept wherever the source had one.
    fn statement_list(&self, statements: &[Statement], start: u32, end: u32) -> Doc {
        let mut parts = Vec::new();
        let mut prev_end: Option<u32> = None;
        let mut cursor = start;
        for statement in statements {
            for comment in comments_in_range(&self.source.comments, cursor, statement.range.start) {
                self.push_separator(&mut parts, prev_end, comment.pos, true);
                parts.push(text(self.comment_text(comment)));
                prev_end = Some(comment.end);
                cursor = comment.end;
            }
            self.push_separator(&mut parts, prev_end, statement.range.start, false);
            parts.push(self.statement(statement));
            prev_end = Some(statement.range.end);
            cursor = statement.range.end;
        }
        for comment in comments_in_range(&self.source.comments, cursor, end) {
            self.push_separator(&mut parts, prev_end, comment.pos, true);
            parts.push(text(self.comment_text(comment)));
            prev_end = Some(comment.end);
        }
        concat(parts)
    }

    /// Line break (or blank line) between two items. A comment on the same
    /// line as what precedes it stays on that line.
    fn push_separator(&self, parts: &mut Vec<Doc>, prev_end: Option<u32>, next: u32, is_comment: bool) {
        let Some(prev_end) = prev_end else {
            return;
        };
        let gap = self.slice(TextRange::new(prev_end, next));
        let newlines = gap.matches('\n').count();
        if newlines == 0 && is_comment {
            parts.push(text(" "));
            return;
        }
        parts.push(Doc::HardLine);
        if newlines >= 2 {
            parts.push(Doc::HardLine);
        }
    }

    fn statement(&self, statement: &Statement) -> Doc {
        match &statement.kind {
            StatementKind::TypeAlias(alias) => self.type_alias(alias),
            StatementKind::Interface(interface) => {
                let hoisted = self.hoisted_comments(interface.range, None);
                concat([hoisted, self.interface(interface)])
            }
            StatementKind::Module(module) => self.module(module),
            // Class and enum bodies are not parsed, so they keep their layout.
            StatementKind::Class(_) | StatementKind::Enum(_) | StatementKind::Other => {
                text(self.slice(statement.range).trim())
            }
        }
    }

    /// Comments inside `range` (other than `keep`), each on its own line.
    fn hoisted_comments(&self, range: TextRange, keep: Option<&CommentRange>) -> Doc {
        let comments = comments_in_range(&self.source.comments, range.start, range.end);
        concat(
            comments
                .iter()
                .filter(|c| Some(*c) != keep)
                .map(|c| concat([text(self.comment_text(c)), Doc::HardLine])),
        )
    }

    /// A single-line block comment directly after the `=` of an alias.
    fn inline_comment(&self, alias: &TypeAliasDeclaration) -> Option<&'a CommentRange> {
        let comments = comments_in_range(&self.source.comments, alias.range.start, alias.ty.range.start);
        comments.iter().find(|c| {
            let body = self.comment_text(c);
            let before = self.slice(TextRange::new(alias.range.start, c.pos));
            let after = self.slice(TextRange::new(c.end, alias.ty.range.start));
            c.is_multi_line
                && !body.contains('\n')
                && before.trim_end().ends_with('=')
                && after.trim().is_empty()
        })
    }

    fn modifiers(&self, flags: ModifierFlags) -> Doc {
        let mut parts = Vec::new();
        if flags.contains(ModifierFlags::EXPORT) {
            parts.push(text("export "));
        }
        if flags.contains(ModifierFlags::DEFAULT) {
            parts.push(text("default "));
        }
        if flags.contains(ModifierFlags::DECLARE) {
            parts.push(text("declare "));
        }
        if flags.contains(ModifierFlags::ABSTRACT) {
            parts.push(text("abstract "));
        }
        concat(parts)
    }

    fn type_alias(&self, alias: &TypeAliasDeclaration) -> Doc {
        let inline = self.inline_comment(alias);
        let hoisted = self.hoisted_comments(alias.range, inline);
        let equals = match inline {
            Some(comment) => text(format!(" = {}", self.comment_text(comment))),
            None => text(" ="),
        };
        concat([
            hoisted,
            self.modifiers(alias.modifiers),
            text("type "),
            text(alias.name.text.as_str()),
            self.type_parameters(&alias.type_parameters),
            self.assignment(equals, &alias.ty),
            self.semi(),
        ])
    }

    fn interface(&self, interface: &InterfaceDeclaration) -> Doc {
        let heritage = if interface.heritage.is_empty() {
            Doc::Nil
        } else {
            concat([
                text(" extends "),
                join(text(", "), interface.heritage.iter().map(|h| self.ty(h))),
            ])
        };
        concat([
            self.modifiers(interface.modifiers),
            text("interface "),
            text(interface.name.text.as_str()),
            self.type_parameters(&interface.type_parameters),
            heritage,
            text(" "),
            self.members_block(&interface.members),
        ])
    }

    fn module(&self, module: &ModuleDeclaration) -> Doc {
        let Some(first) = module.name.first() else {
            return text(self.slice(module.range).trim());
        };
        let head = self.slice(TextRange::new(module.range.start, first.range.start));
        let keyword = match head.split_whitespace().last() {
            Some(word @ ("namespace" | "module")) => text(format!("{word} ")),
            _ => Doc::Nil,
        };
        let name = if self.slice(first.range).starts_with(['"', '\'']) {
            text(self.quote(&first.text))
        } else {
            text(
                module
                    .name
                    .iter()
                    .map(|segment| segment.text.as_str())
                    .collect::<Vec<_>>()
                    .join("."),
            )
        };

        let name_end = module.name.last().map_or(first.range.end, |s| s.range.end);
        let rest = self.slice(TextRange::new(name_end, module.range.end));
        let Some(brace) = rest.find('{') else {
            return concat([self.modifiers(module.modifiers), keyword, name, self.semi()]);
        };
        let body_start = name_end + brace as u32 + 1;
        let body_end = module.range.end.saturating_sub(1).max(body_start);
        let hoisted = self.hoisted_comments(TextRange::new(module.range.start, body_start), None);
        let body = self.statement_list(&module.body, body_start, body_end);
        let block = if body == Doc::Nil {
            text(" {}")
        } else {
            concat([
                text(" {"),
                indent(concat([Doc::HardLine, body])),
                Doc::HardLine,
                text("}"),
            ])
        };
        concat([hoisted, self.modifiers(module.modifiers), keyword, name, block])
    }

    // =========================================================================
    // Assignment-like positions
    // =========================================================================

    /// `prefix` followed by a type on the right of `=` or `:`. A union that
    /// does not fit moves below the prefix with one member per line.
    fn assignment(&self, prefix: Doc, ty: &TypeNode) -> Doc {
        match &ty.kind {
            TypeNodeKind::Union(types) => concat([
                prefix,
                group(indent(concat([
                    Doc::Line,
                    if_break(text("| "), Doc::Nil),
                    self.union_members(types),
                ]))),
            ]),
            _ => concat([prefix, text(" "), self.ty(ty)]),
        }
    }

    fn union_members(&self, types: &[TypeNode]) -> Doc {
        join(
            concat([Doc::Line, text("| ")]),
            types.iter().map(|t| align(2, self.ty(t))),
        )
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn ty(&self, node: &TypeNode) -> Doc {
        match &node.kind {
            TypeNodeKind::Keyword(keyword) => text(keyword.as_str()),
            TypeNodeKind::Literal(LiteralType::String(value)) => text(self.quote(value)),
            TypeNodeKind::Literal(LiteralType::Boolean(value)) => {
                text(if *value { "true" } else { "false" })
            }
            // Numbers keep their spelling, e.g. `0x10` or `1_000`.
            TypeNodeKind::Literal(LiteralType::Number(_) | LiteralType::BigInt(_)) => {
                text(self.slice(node.range).split_whitespace().collect::<String>())
            }
            TypeNodeKind::TemplateLiteral { .. } | TypeNodeKind::Import => {
                text(self.slice(node.range))
            }
            TypeNodeKind::This => text("this"),
            TypeNodeKind::Reference {
                name,
                type_arguments,
            } => concat([text(name.text()), self.type_arguments(type_arguments)]),
            TypeNodeKind::TypeLiteral(members) => self.members_block(members),
            TypeNodeKind::Array(element) => concat([self.ty(element), text("[]")]),
            TypeNodeKind::Tuple(elements) => self.tuple(elements),
            TypeNodeKind::Union(types) => group(concat([
                if_break(text("| "), Doc::Nil),
                self.union_members(types),
            ])),
            TypeNodeKind::Intersection(types) => self.intersection(types),
            TypeNodeKind::Function(function) => {
                let is_abstract = self.slice(node.range).starts_with("abstract");
                concat([
                    text(if is_abstract { "abstract " } else { "" }),
                    text(if function.is_constructor { "new " } else { "" }),
                    self.signature(&function.signature, " => "),
                ])
            }
            TypeNodeKind::Parenthesized(inner) => group(concat([
                text("("),
                indent(concat([Doc::SoftLine, self.ty(inner)])),
                Doc::SoftLine,
                text(")"),
            ])),
            TypeNodeKind::TypeOperator { operator, ty } => {
                let keyword = match operator {
                    TypeOperator::Keyof => "keyof ",
                    TypeOperator::Readonly => "readonly ",
                    TypeOperator::Unique => "unique ",
                };
                concat([text(keyword), self.ty(ty)])
            }
            TypeNodeKind::IndexedAccess { object, index } => {
                concat([self.ty(object), text("["), self.ty(index), text("]")])
            }
            TypeNodeKind::Mapped(mapped) => self.mapped(mapped),
            TypeNodeKind::Conditional(conditional) => self.conditional(conditional),
            TypeNodeKind::Infer(param) => concat([text("infer "), self.type_parameter(param)]),
            TypeNodeKind::TypeQuery(name) => text(format!("typeof {}", name.text())),
            TypeNodeKind::Predicate {
                asserts,
                parameter,
                ty,
            } => concat([
                text(if *asserts { "asserts " } else { "" }),
                text(parameter.as_str()),
                match ty {
                    Some(ty) => concat([text(" is "), self.ty(ty)]),
                    None => Doc::Nil,
                },
            ]),
            TypeNodeKind::Missing => Doc::Nil,
        }
    }

    fn intersection(&self, types: &[TypeNode]) -> Doc {
        let has_object = types
            .iter()
            .any(|t| matches!(t.kind, TypeNodeKind::TypeLiteral(_) | TypeNodeKind::Mapped(_)));
        if has_object {
            return join(text(" & "), types.iter().map(|t| self.ty(t)));
        }
        let mut rest = types.iter().map(|t| self.ty(t));
        let first = rest.next().unwrap_or(Doc::Nil);
        group(concat([
            first,
            indent(concat(rest.map(|doc| concat([text(" &"), Doc::Line, doc])))),
        ]))
    }

    fn tuple(&self, elements: &[TupleElement]) -> Doc {
        if elements.is_empty() {
            return text("[]");
        }
        let items = elements.iter().map(|element| {
            let rest = text(if element.rest { "..." } else { "" });
            match &element.name {
                Some(name) => concat([
                    rest,
                    text(name.as_str()),
                    text(if element.optional { "?: " } else { ": " }),
                    self.ty(&element.ty),
                ]),
                None => concat([
                    rest,
                    self.ty(&element.ty),
                    text(if element.optional { "?" } else { "" }),
                ]),
            }
        });
        let trailing = elements.last().is_some_and(|e| !e.rest);
        self.bracketed("[", items, trailing, "]")
    }

    /// `open items close`, broken one item per line when too long.
    fn bracketed(
        &self,
        open: &str,
        items: impl IntoIterator<Item = Doc>,
        allow_trailing_comma: bool,
        close: &str,
    ) -> Doc {
        let trailing = if allow_trailing_comma && self.options.trailing_comma {
            if_break(text(","), Doc::Nil)
        } else {
            Doc::Nil
        };
        group(concat([
            text(open),
            indent(concat([
                Doc::SoftLine,
                join(concat([text(","), Doc::Line]), items),
                trailing,
            ])),
            Doc::SoftLine,
            text(close),
        ]))
    }

    fn type_arguments(&self, args: &[TypeNode]) -> Doc {
        match args {
            [] => Doc::Nil,
            // A lone object literal hugs the brackets.
            [only @ TypeNode {
                kind: TypeNodeKind::TypeLiteral(_),
                ..
            }] => concat([text("<"), self.ty(only), text(">")]),
            _ => self.bracketed("<", args.iter().map(|a| self.ty(a)), true, ">"),
        }
    }

    fn type_parameters(&self, params: &[TypeParameter]) -> Doc {
        if params.is_empty() {
            return Doc::Nil;
        }
        self.bracketed("<", params.iter().map(|p| self.type_parameter(p)), true, ">")
    }

    fn type_parameter(&self, param: &TypeParameter) -> Doc {
        concat([
            text(param.name.text.as_str()),
            match &param.constraint {
                Some(constraint) => concat([text(" extends "), self.ty(constraint)]),
                None => Doc::Nil,
            },
            match &param.default {
                Some(default) => concat([text(" = "), self.ty(default)]),
                None => Doc::Nil,
            },
        ])
    }

    /// Type parameters, parameters and return type. `arrow` is `" => "` for
    /// function types and `": "` for signature members.
    fn signature(&self, signature: &Signature, arrow: &str) -> Doc {
        let params = if signature.parameters.is_empty() {
            text("()")
        } else {
            let trailing = signature.parameters.last().is_some_and(|p| !p.rest);
            self.bracketed(
                "(",
                signature.parameters.iter().map(|p| self.parameter(p)),
                trailing,
                ")",
            )
        };
        let return_type = match &signature.return_type {
            Some(ty) => concat([text(arrow), self.ty(ty)]),
            None if arrow == " => " => text(" => any"),
            None => Doc::Nil,
        };
        concat([self.type_parameters(&signature.type_parameters), params, return_type])
    }

    fn parameter(&self, param: &Parameter) -> Doc {
        concat([
            text(if param.rest { "..." } else { "" }),
            text(param.name.as_str()),
            text(if param.optional { "?" } else { "" }),
            match &param.ty {
                Some(ty) => concat([text(": "), self.ty(ty)]),
                None => Doc::Nil,
            },
        ])
    }

    fn mapped(&self, mapped: &MappedTypeNode) -> Doc {
        let readonly = match mapped.readonly {
            Some(MappedModifier::Add) => "readonly ",
            Some(MappedModifier::Remove) => "-readonly ",
            None => "",
        };
        let optional = match mapped.optional {
            Some(MappedModifier::Add) => "?",
            Some(MappedModifier::Remove) => "-?",
            None => "",
        };
        let key = concat([
            text(format!("{readonly}[{} in ", mapped.type_parameter.text)),
            self.ty(&mapped.constraint),
            match &mapped.name_type {
                Some(name) => concat([text(" as "), self.ty(name)]),
                None => Doc::Nil,
            },
            text(format!("]{optional}")),
        ]);
        let member = match &mapped.ty {
            Some(ty) => self.assignment(concat([key, text(":")]), ty),
            None => key,
        };
        group(concat([
            text("{"),
            indent(concat([Doc::Line, member, self.semi()])),
            Doc::Line,
            text("}"),
        ]))
    }

    fn conditional(&self, conditional: &ConditionalTypeNode) -> Doc {
        group(concat([
            self.ty(&conditional.check_type),
            text(" extends "),
            self.ty(&conditional.extends_type),
            indent(concat([
                Doc::Line,
                text("? "),
                self.ty(&conditional.true_type),
                Doc::Line,
                text(": "),
                self.ty(&conditional.false_type),
            ])),
        ]))
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Object members, always one per line.
    fn members_block(&self, members: &[TypeMember]) -> Doc {
        if members.is_empty() {
            return text("{}");
        }
        let items = members.iter().map(|m| concat([self.member(m), self.semi()]));
        concat([
            text("{"),
            indent(concat([Doc::HardLine, join(Doc::HardLine, items)])),
            Doc::HardLine,
            text("}"),
        ])
    }

    fn member(&self, member: &TypeMember) -> Doc {
        match &member.kind {
            TypeMemberKind::Property {
                name,
                optional,
                readonly,
                ty,
            } => {
                let key = concat([
                    text(if *readonly { "readonly " } else { "" }),
                    self.property_name(name),
                    text(if *optional { "?:" } else { ":" }),
                ]);
                match ty {
                    Some(ty) => self.assignment(key, ty),
                    None => concat([
                        text(if *readonly { "readonly " } else { "" }),
                        self.property_name(name),
                        text(if *optional { "?" } else { "" }),
                    ]),
                }
            }
            TypeMemberKind::Method {
                name,
                optional,
                signature,
            } => concat([
                self.property_name(name),
                text(if *optional { "?" } else { "" }),
                self.signature(signature, ": "),
            ]),
            TypeMemberKind::Call(signature) => self.signature(signature, ": "),
            TypeMemberKind::Construct(signature) => {
                concat([text("new "), self.signature(signature, ": ")])
            }
            TypeMemberKind::Index {
                readonly,
                parameter,
                key_type,
                ty,
            } => {
                let key = concat([
                    text(if *readonly { "readonly " } else { "" }),
                    text(format!("[{}: ", parameter.text)),
                    self.ty(key_type),
                    text("]:"),
                ]);
                match ty {
                    Some(ty) => self.assignment(key, ty),
                    None => concat([key, text(" any")]),
                }
            }
        }
    }

    /// Property names are quoted only when they are not identifiers.
    fn property_name(&self, name: &PropertyName) -> Doc {
        match name.kind {
            PropertyNameKind::String if !is_identifier_text(&name.text) => text(self.quote(&name.text)),
            _ => text(name.text.as_str()),
        }
    }

    // =========================================================================
    // Strings
    // =========================================================================

    /// Quote `value` with the preferred quote, unless the other one needs
    /// fewer escapes.
    fn quote(&self, value: &str) -> String {
        let (preferred, alternate) = if self.options.single_quote {
            ('\'', '"')
        } else {
            ('"', '\'')
        };
        let preferred_count = value.matches(preferred).count();
        let alternate_count = value.matches(alternate).count();
        let quote = if preferred_count > alternate_count {
            alternate
        } else {
            preferred
        };

        let mut out = String::with_capacity(value.len() + 2);
        out.push(quote);
        for ch in value.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '\0' => out.push_str("\\0"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
                c => out.push(c),
            }
        }
        out.push(quote);
        out
    }
}
