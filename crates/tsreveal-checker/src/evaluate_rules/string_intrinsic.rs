//! `Uppercase`, `Lowercase`, `Capitalize` and `Uncapitalize`.

use tracing::debug;

use crate::checker::TypeChecker;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StringMapping {
    Uppercase,
    Lowercase,
    Capitalize,
    Uncapitalize,
}

impl StringMapping {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Uppercase" => StringMapping::Uppercase,
            "Lowercase" => StringMapping::Lowercase,
            "Capitalize" => StringMapping::Capitalize,
            "Uncapitalize" => StringMapping::Uncapitalize,
            _ => return None,
        })
    }

    fn apply(self, text: &str) -> String {
        match self {
            StringMapping::Uppercase => text.to_uppercase(),
            StringMapping::Lowercase => text.to_lowercase(),
            StringMapping::Capitalize | StringMapping::Uncapitalize => {
                let mut chars = text.chars();
                let Some(first) = chars.next() else {
                    return String::new();
                };
                let head: String = if self == StringMapping::Capitalize {
                    first.to_uppercase().collect()
                } else {
                    first.to_lowercase().collect()
                };
                head + chars.as_str()
            }
        }
    }
}

impl TypeChecker<'_> {
    /// Apply an intrinsic string mapping alias to `operand`.
    pub(crate) fn evaluate_string_mapping(&mut self, alias: &str, operand: TypeId) -> TypeId {
        let Some(mapping) = StringMapping::from_name(alias) else {
            debug!(alias, "unknown intrinsic alias");
            return TypeId::ERROR;
        };
        match self.interner.lookup(operand).clone() {
            TypeData::Literal(LiteralValue::String(text)) => self.interner.literal_string(mapping.apply(&text)),
            TypeData::Union(members) => {
                let mapped = members
                    .iter()
                    .map(|&m| self.evaluate_string_mapping(alias, m))
                    .collect();
                self.interner.union(mapped)
            }
            // Generic and non-literal operands have no finite image.
            _ if operand == TypeId::NEVER => TypeId::NEVER,
            _ if operand == TypeId::ANY || operand == TypeId::ERROR => operand,
            _ => TypeId::STRING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StringMapping;

    #[test]
    fn capitalize_only_touches_first_char() {
        assert_eq!(StringMapping::Capitalize.apply("hello world"), "Hello world");
        assert_eq!(StringMapping::Uncapitalize.apply("ABC"), "aBC");
        assert_eq!(StringMapping::Capitalize.apply(""), "");
    }

    #[test]
    fn upper_and_lower_map_every_char() {
        assert_eq!(StringMapping::Uppercase.apply("get-id"), "GET-ID");
        assert_eq!(StringMapping::Lowercase.apply("Ab\u{C9}"), "ab\u{E9}");
    }
}
