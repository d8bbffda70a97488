//! The parse tree produced by [`parser::parse_file`](crate::parser::parse_file).
//!
//! These types are immutable records: they are built once while parsing,
//! consumed once by [`codegen`](crate::codegen), and then discarded. There is
//! exactly one [`Struct`] per source file (see `spec.md` §1, Non-goals).

use std::fmt::{self, Display, Formatter};

/// The nine built-in LCM primitive types.
///
/// Each has a fixed encoded size in bytes, except `String`, whose encoded
/// size depends on the runtime length of the string.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Double,
    Float,
    Int8,
    Int16,
    Int32,
    Int64,
    String,
}

impl PrimitiveType {
    /// The LCM source spelling of this type, e.g. `int32_t`.
    pub fn lcm_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Double => "double",
            PrimitiveType::Float => "float",
            PrimitiveType::Int8 => "int8_t",
            PrimitiveType::Int16 => "int16_t",
            PrimitiveType::Int32 => "int32_t",
            PrimitiveType::Int64 => "int64_t",
            PrimitiveType::String => "string",
        }
    }

    /// Parses the LCM source spelling of a primitive type, if `name` names one.
    pub fn from_lcm_name(name: &str) -> Option<PrimitiveType> {
        Some(match name {
            "boolean" => PrimitiveType::Boolean,
            "byte" => PrimitiveType::Byte,
            "double" => PrimitiveType::Double,
            "float" => PrimitiveType::Float,
            "int8_t" => PrimitiveType::Int8,
            "int16_t" => PrimitiveType::Int16,
            "int32_t" => PrimitiveType::Int32,
            "int64_t" => PrimitiveType::Int64,
            "string" => PrimitiveType::String,
            _ => return None,
        })
    }

    /// The fixed encoded size in bytes, or `None` for `string` (variable size).
    pub fn fixed_encoded_size(self) -> Option<usize> {
        match self {
            PrimitiveType::Boolean => Some(1),
            PrimitiveType::Byte => Some(1),
            PrimitiveType::Double => Some(8),
            PrimitiveType::Float => Some(4),
            PrimitiveType::Int8 => Some(1),
            PrimitiveType::Int16 => Some(2),
            PrimitiveType::Int32 => Some(4),
            PrimitiveType::Int64 => Some(8),
            PrimitiveType::String => None,
        }
    }

    /// The C++ spelling of this type, e.g. `int32_t` -> `int32_t`, `string` ->
    /// `std::string`.
    pub fn cpp_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "bool",
            PrimitiveType::Byte => "uint8_t",
            PrimitiveType::Double => "double",
            PrimitiveType::Float => "float",
            PrimitiveType::Int8 => "int8_t",
            PrimitiveType::Int16 => "int16_t",
            PrimitiveType::Int32 => "int32_t",
            PrimitiveType::Int64 => "int64_t",
            PrimitiveType::String => "std::string",
        }
    }
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.lcm_name())
    }
}

/// A reference to a struct defined elsewhere, e.g. `foo.bar_t` or `bar_t`.
///
/// `package == None` means the implicit root package (no `package`
/// declaration was in scope when the reference was parsed).
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct UserType {
    pub package: Option<String>,
    pub name: String,
}

impl Display for UserType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.package {
            Some(ref package) => write!(f, "{}.{}", package, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A field's type: either one of the nine primitives, or a reference to
/// another message struct.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Primitive(PrimitiveType),
    User(UserType),
}

/// One dimension of a (possibly multi-dimensional) array field.
///
/// Declared left to right in source order; see [`Field::array_dims`] for the
/// row-major memory layout this implies.
#[derive(Clone, Debug, PartialEq)]
pub enum Multiplicity {
    /// A fixed-size dimension, e.g. `[16]`.
    Constant(i64),
    /// A dimension whose size is given at runtime by another field of the
    /// same struct, e.g. `[num_points]`.
    Variable(String),
}

/// A member field of a [`Struct`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    /// Array dimensions in source (row-major) order; empty for scalar fields.
    pub array_dims: Vec<Multiplicity>,
}

impl Field {
    pub fn is_array(&self) -> bool {
        !self.array_dims.is_empty()
    }
}

/// A `const` declaration inside a struct body.
///
/// `value_str` preserves the original source lexeme (including any leading
/// `+`/`-`) byte for byte, since emission must reproduce it verbatim rather
/// than reformat the parsed numeric value (`spec.md` §9).
#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    pub name: String,
    pub ty: PrimitiveType,
    pub value_str: String,
}

/// The parse tree for a single LCM message definition.
///
/// Exactly one `Struct` is produced per source file (`spec.md` §3).
#[derive(Clone, Debug, PartialEq)]
pub struct Struct {
    pub typ: UserType,
    pub fields: Vec<Field>,
    pub constants: Vec<Constant>,
}

impl Struct {
    /// Names of fields that are used as the runtime size of some array
    /// dimension elsewhere in this struct ("size variables", `spec.md` §9).
    ///
    /// Order follows first appearance, matching the original tool so that
    /// generated guard clauses come out in a stable, predictable order.
    pub fn size_variables(&self) -> Vec<String> {
        let mut result = Vec::new();
        for field in &self.fields {
            for dim in &field.array_dims {
                if let Multiplicity::Variable(ref name) = *dim {
                    if !result.contains(name) {
                        result.push(name.clone());
                    }
                }
            }
        }
        result
    }

    /// Distinct [`UserType`]s referenced by this struct's fields, in source
    /// order (used by §4.D's composite hash, which sums over "distinct child
    /// UserTypes in source order").
    pub fn distinct_child_types(&self) -> Vec<&UserType> {
        let mut seen = Vec::new();
        let mut result = Vec::new();
        for field in &self.fields {
            if let Type::User(ref user_type) = field.ty {
                if !seen.contains(&user_type) {
                    seen.push(user_type);
                    result.push(user_type);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_display() {
        let with_package = UserType {
            package: Some("exlcm".into()),
            name: "point2d_t".into(),
        };
        assert_eq!(with_package.to_string(), "exlcm.point2d_t");

        let without_package = UserType {
            package: None,
            name: "point2d_t".into(),
        };
        assert_eq!(without_package.to_string(), "point2d_t");
    }

    #[test]
    fn size_variables_collects_unique_names_in_first_appearance_order() {
        let s = Struct {
            typ: UserType {
                package: None,
                name: "point_list_t".into(),
            },
            fields: vec![
                Field {
                    name: "n".into(),
                    ty: Type::Primitive(PrimitiveType::Int32),
                    array_dims: vec![],
                },
                Field {
                    name: "xs".into(),
                    ty: Type::Primitive(PrimitiveType::Double),
                    array_dims: vec![Multiplicity::Variable("n".into())],
                },
                Field {
                    name: "ys".into(),
                    ty: Type::Primitive(PrimitiveType::Double),
                    array_dims: vec![Multiplicity::Variable("n".into())],
                },
            ],
            constants: vec![],
        };
        assert_eq!(s.size_variables(), vec!["n".to_string()]);
    }

    #[test]
    fn distinct_child_types_preserves_source_order() {
        let inner = UserType {
            package: None,
            name: "inner_t".into(),
        };
        let other = UserType {
            package: Some("pkg".into()),
            name: "other_t".into(),
        };
        let s = Struct {
            typ: UserType {
                package: None,
                name: "outer_t".into(),
            },
            fields: vec![
                Field {
                    name: "a".into(),
                    ty: Type::User(inner.clone()),
                    array_dims: vec![],
                },
                Field {
                    name: "b".into(),
                    ty: Type::User(other.clone()),
                    array_dims: vec![],
                },
                Field {
                    name: "c".into(),
                    ty: Type::User(inner.clone()),
                    array_dims: vec![],
                },
            ],
            constants: vec![],
        };
        assert_eq!(s.distinct_child_types(), vec![&inner, &other]);
    }
}
