//! Structural type representation.
//!
//! Every type is interned in a [`TypeInterner`](crate::TypeInterner) and
//! referred to by a [`TypeId`], so structural equality is `TypeId` equality.

use crate::def::DefId;

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const VOID: TypeId = TypeId(3);
    pub const UNDEFINED: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const BOOLEAN: TypeId = TypeId(6);
    pub const NUMBER: TypeId = TypeId(7);
    pub const STRING: TypeId = TypeId(8);
    pub const BIGINT: TypeId = TypeId(9);
    pub const SYMBOL: TypeId = TypeId(10);
    pub const OBJECT: TypeId = TypeId(11);
    /// Result of anything the checker cannot resolve. Prints as `any`.
    pub const ERROR: TypeId = TypeId(12);
    pub const TRUE: TypeId = TypeId(13);
    pub const FALSE: TypeId = TypeId(14);
    /// The polymorphic `this` type.
    pub const THIS: TypeId = TypeId(15);
    /// `{}`
    pub const EMPTY_OBJECT: TypeId = TypeId(16);

    /// Number of ids pre-allocated by the interner.
    pub const FIRST_DYNAMIC: u32 = 17;

    pub fn is_intrinsic(self) -> bool {
        self.0 <= TypeId::ERROR.0
    }
}

/// Interned list of types, used for type argument lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

impl TypeListId {
    pub const EMPTY: TypeListId = TypeListId(0);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
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
    Error,
}

impl IntrinsicKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IntrinsicKind::Any | IntrinsicKind::Error => "any",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Number => "number",
            IntrinsicKind::String => "string",
            IntrinsicKind::BigInt => "bigint",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Object => "object",
        }
    }
}

/// Literal value of a unit type. Numbers are stored as their bit pattern so
/// the type stays `Eq + Hash`; see [`LiteralValue::number`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    String(String),
    Number(u64),
    BigInt(String),
    Boolean(bool),
}

impl LiteralValue {
    pub fn number(value: f64) -> Self {
        // -0 and 0 are the same literal type
        let value = if value == 0.0 { 0.0 } else { value };
        LiteralValue::Number(value.to_bits())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            LiteralValue::Number(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// The primitive this literal widens to.
    pub fn primitive(&self) -> TypeId {
        match self {
            LiteralValue::String(_) => TypeId::STRING,
            LiteralValue::Number(_) => TypeId::NUMBER,
            LiteralValue::BigInt(_) => TypeId::BIGINT,
            LiteralValue::Boolean(_) => TypeId::BOOLEAN,
        }
    }
}

/// How a property name is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKeyKind {
    /// Identifier or string name.
    Named,
    /// Numeric name such as `0` or `1.5`.
    Numeric,
    /// Computed name kept as source text, e.g. `[Symbol.iterator]`.
    Computed,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: String,
    pub key_kind: PropertyKeyKind,
    pub ty: TypeId,
    pub optional: bool,
    pub readonly: bool,
    /// Declared with method syntax; `ty` is then a callable object type.
    pub is_method: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexInfo {
    pub parameter_name: String,
    pub key_type: TypeId,
    pub value_type: TypeId,
    pub readonly: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    pub name: String,
    pub constraint: Option<TypeId>,
    pub default: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: String,
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SignatureInfo {
    pub type_params: Vec<TypeParamInfo>,
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
}

/// Members of an object type, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub properties: Vec<PropertyInfo>,
    pub index_signatures: Vec<IndexInfo>,
    pub call_signatures: Vec<SignatureInfo>,
    pub construct_signatures: Vec<SignatureInfo>,
}

impl ObjectShape {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.index_signatures.is_empty()
            && self.call_signatures.is_empty()
            && self.construct_signatures.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// A shape consisting of exactly one call or construct signature, which
    /// prints as a function or constructor type.
    pub fn as_function(&self) -> Option<(&SignatureInfo, bool)> {
        if !self.properties.is_empty() || !self.index_signatures.is_empty() {
            return None;
        }
        match (
            self.call_signatures.as_slice(),
            self.construct_signatures.as_slice(),
        ) {
            ([signature], []) => Some((signature, false)),
            ([], [signature]) => Some((signature, true)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleElementInfo {
    pub name: Option<String>,
    pub ty: TypeId,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MappedModifier {
    Add,
    Remove,
}

/// A mapped type whose key constraint is still generic.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MappedInfo {
    pub type_param: TypeParamInfo,
    pub constraint: TypeId,
    pub name_type: Option<TypeId>,
    pub template: TypeId,
    pub readonly: Option<MappedModifier>,
    pub optional: Option<MappedModifier>,
}

/// A conditional type whose check type is still generic.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConditionalInfo {
    pub check_type: TypeId,
    pub extends_type: TypeId,
    pub true_type: TypeId,
    pub false_type: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    ThisType,
    Object(ObjectShape),
    Array {
        element: TypeId,
        readonly: bool,
    },
    Tuple {
        elements: Vec<TupleElementInfo>,
        readonly: bool,
    },
    /// Normalized union; see `TypeInterner::union`.
    Union(Vec<TypeId>),
    /// Intersection that could not be merged into a single object.
    Intersection(Vec<TypeId>),
    TypeParameter(TypeParamInfo),
    /// A named type printed by name: recursion cut points and opaque
    /// library interfaces such as `Promise<T>`.
    Reference {
        def: DefId,
        args: TypeListId,
    },
    KeyOf(TypeId),
    IndexedAccess {
        object: TypeId,
        index: TypeId,
    },
    Mapped(Box<MappedInfo>),
    Conditional(Box<ConditionalInfo>),
}
