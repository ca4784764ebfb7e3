//! Syntax tree for declaration-level TypeScript.
//!
//! Only the constructs that participate in type resolution get a real shape:
//! type aliases, interfaces, namespaces and the type grammar. Classes and
//! enums keep just their names. Every other statement is kept as an opaque
//! `StatementKind::Other` span.

use std::sync::Arc;

use bitflags::bitflags;
use smallvec::SmallVec;
use tsreveal_common::{CommentRange, Diagnostic, TextRange};

/// A parsed file plus everything the scanner collected alongside it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub file_name: String,
    pub text: Arc<str>,
    pub statements: Vec<Statement>,
    pub comments: Vec<CommentRange>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SourceFile {
    /// Source text covered by `range`.
    pub fn text_of(&self, range: TextRange) -> &str {
        range.slice(&self.text)
    }

    /// Type-alias declarations among the file's own statements, in textual
    /// order. Aliases inside namespace blocks are reached through qualified
    /// references only.
    pub fn type_aliases(&self) -> Vec<&Arc<TypeAliasDeclaration>> {
        self.statements
            .iter()
            .filter_map(|statement| match &statement.kind {
                StatementKind::TypeAlias(alias) => Some(alias),
                _ => None,
            })
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub range: TextRange,
    pub kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    TypeAlias(Arc<TypeAliasDeclaration>),
    Interface(Arc<InterfaceDeclaration>),
    Module(ModuleDeclaration),
    Class(Arc<ClassDeclaration>),
    Enum(Arc<EnumDeclaration>),
    /// Any statement without type-level meaning, such as values and imports.
    Other,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u8 {
        const EXPORT = 1 << 0;
        const DECLARE = 1 << 1;
        const DEFAULT = 1 << 2;
        const ABSTRACT = 1 << 3;
        const CONST = 1 << 4;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub text: String,
    pub range: TextRange,
}

/// `type Name<T> = Type`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDeclaration {
    pub range: TextRange,
    pub modifiers: ModifierFlags,
    pub name: Identifier,
    pub type_parameters: Vec<TypeParameter>,
    pub ty: TypeNode,
}

/// `interface Name<T> extends Base { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub range: TextRange,
    pub modifiers: ModifierFlags,
    pub name: Identifier,
    pub type_parameters: Vec<TypeParameter>,
    pub heritage: Vec<TypeNode>,
    pub members: Vec<TypeMember>,
}

/// `class Name<T> ...`; the heritage clauses and body are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub range: TextRange,
    pub modifiers: ModifierFlags,
    pub name: Identifier,
    pub type_parameters: Vec<TypeParameter>,
}

/// `enum Name { A, B = 2 }`; initializers are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDeclaration {
    pub range: TextRange,
    pub modifiers: ModifierFlags,
    pub name: Identifier,
    pub members: Vec<Identifier>,
}

/// `namespace A.B { ... }`, `module "m" { ... }` or `declare global { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDeclaration {
    pub range: TextRange,
    pub modifiers: ModifierFlags,
    /// Dotted name segments; a quoted module name is a single segment.
    pub name: Vec<Identifier>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub range: TextRange,
    pub name: Identifier,
    pub constraint: Option<TypeNode>,
    pub default: Option<TypeNode>,
}

/// A possibly-qualified name such as `Foo` or `NS.Inner.Foo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityName {
    pub segments: SmallVec<[Identifier; 2]>,
}

impl EntityName {
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&segment.text);
        }
        out
    }

    /// Last segment, i.e. the declared name being referenced.
    pub fn simple_name(&self) -> &str {
        self.segments.last().map_or("", |s| s.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub range: TextRange,
    pub kind: TypeNodeKind,
}

impl TypeNode {
    pub fn new(range: TextRange, kind: TypeNodeKind) -> Self {
        TypeNode { range, kind }
    }

    pub fn missing(pos: u32) -> Self {
        TypeNode {
            range: TextRange::empty(pos),
            kind: TypeNodeKind::Missing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordType {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    BigInt,
    Symbol,
    Object,
}

impl KeywordType {
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordType::Any => "any",
            KeywordType::Unknown => "unknown",
            KeywordType::Never => "never",
            KeywordType::Void => "void",
            KeywordType::Undefined => "undefined",
            KeywordType::Null => "null",
            KeywordType::Boolean => "boolean",
            KeywordType::Number => "number",
            KeywordType::String => "string",
            KeywordType::BigInt => "bigint",
            KeywordType::Symbol => "symbol",
            KeywordType::Object => "object",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralType {
    String(String),
    Number(f64),
    BigInt(String),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOperator {
    Keyof,
    Readonly,
    Unique,
}

/// `+`/`-` prefix on a mapped type modifier; a bare modifier means `Add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappedModifier {
    Add,
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNodeKind {
    Keyword(KeywordType),
    Literal(LiteralType),
    /// Template literal type. Without substitutions it is a string literal.
    TemplateLiteral {
        cooked: Option<String>,
    },
    This,
    Reference {
        name: EntityName,
        type_arguments: Vec<TypeNode>,
    },
    TypeLiteral(Vec<TypeMember>),
    Array(Box<TypeNode>),
    Tuple(Vec<TupleElement>),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Function(Box<FunctionTypeNode>),
    Parenthesized(Box<TypeNode>),
    TypeOperator {
        operator: TypeOperator,
        ty: Box<TypeNode>,
    },
    IndexedAccess {
        object: Box<TypeNode>,
        index: Box<TypeNode>,
    },
    Mapped(Box<MappedTypeNode>),
    Conditional(Box<ConditionalTypeNode>),
    Infer(Box<TypeParameter>),
    /// `typeof value`; values are outside what the checker resolves.
    TypeQuery(EntityName),
    /// `x is T` / `asserts x is T` in a return position.
    Predicate {
        asserts: bool,
        parameter: String,
        ty: Option<Box<TypeNode>>,
    },
    /// `import("mod").Name`; other files are never loaded.
    Import,
    /// Error recovery placeholder where a type was expected.
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleElement {
    pub range: TextRange,
    pub name: Option<String>,
    pub optional: bool,
    pub rest: bool,
    pub ty: TypeNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeNode {
    pub is_constructor: bool,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedTypeNode {
    pub readonly: Option<MappedModifier>,
    pub type_parameter: Identifier,
    pub constraint: TypeNode,
    pub name_type: Option<TypeNode>,
    pub optional: Option<MappedModifier>,
    pub ty: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalTypeNode {
    pub check_type: TypeNode,
    pub extends_type: TypeNode,
    pub true_type: TypeNode,
    pub false_type: TypeNode,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub range: TextRange,
    /// Binding name; destructuring patterns keep their source text.
    pub name: String,
    pub optional: bool,
    pub rest: bool,
    pub ty: Option<TypeNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyNameKind {
    Identifier,
    String,
    Number,
    /// `[expr]`; the text keeps its brackets.
    Computed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyName {
    pub kind: PropertyNameKind,
    /// Identifier text, cooked string value, numeric text, or bracketed source.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeMember {
    pub range: TextRange,
    pub kind: TypeMemberKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeMemberKind {
    Property {
        name: PropertyName,
        optional: bool,
        readonly: bool,
        ty: Option<TypeNode>,
    },
    Method {
        name: PropertyName,
        optional: bool,
        signature: Signature,
    },
    Call(Signature),
    Construct(Signature),
    Index {
        readonly: bool,
        parameter: Identifier,
        key_type: TypeNode,
        ty: Option<TypeNode>,
    },
}
