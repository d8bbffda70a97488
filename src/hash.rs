//! The LCM "base hash" algorithm (`spec.md` §4.C), bit-for-bit compatible
//! with the canonical LCM specification.
//!
//! Grounded directly on `original_source`'s `CppGen._fill_base_hash`: build a
//! flat sequence of field metadata, flatten it to bytes, then mix the bytes
//! through a 64-bit running hash using signed arithmetic at every step.

use crate::ast::{Multiplicity, Struct, Type};

enum HashItem {
    Int(i64),
    Str(String),
}

/// Builds the ordered sequence of metadata items to be hashed for `s`,
/// per `spec.md` §4.C point 1.
fn hash_items(s: &Struct) -> Vec<HashItem> {
    let mut items = Vec::new();
    for field in &s.fields {
        items.push(HashItem::Str(field.name.clone()));
        if let Type::Primitive(primitive) = field.ty {
            items.push(HashItem::Str(primitive.lcm_name().to_string()));
        }
        items.push(HashItem::Int(field.array_dims.len() as i64));
        for dim in &field.array_dims {
            match *dim {
                Multiplicity::Variable(ref name) => {
                    items.push(HashItem::Int(1));
                    items.push(HashItem::Str(name.clone()));
                }
                Multiplicity::Constant(value) => {
                    items.push(HashItem::Int(0));
                    items.push(HashItem::Str(value.to_string()));
                }
            }
        }
    }
    items
}

/// Flattens `items` into the byte sequence the mixing loop consumes.
///
/// Integers are truncated to one byte (`value mod 256`); strings contribute
/// one length byte (`len mod 256`) followed by one byte per character (the
/// low 8 bits of its code point).
fn flatten(items: &[HashItem]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for item in items {
        match item {
            HashItem::Int(value) => {
                bytes.push((value.rem_euclid(256)) as u8);
            }
            HashItem::Str(s) => {
                bytes.push((s.chars().count() % 256) as u8);
                for ch in s.chars() {
                    bytes.push((ch as u32 & 0xFF) as u8);
                }
            }
        }
    }
    bytes
}

/// Computes the 64-bit base hash of `s`'s field metadata.
///
/// The mixing loop is specified in terms of signed 64-bit wraparound
/// arithmetic with a sign-reinterpretation after every step (`spec.md`
/// §4.C). Using Rust's `i64` wrapping operators directly reproduces this
/// exactly: an `i64` *is* a 64-bit two's-complement word, so no explicit
/// mod-2^64/sign-cast dance (as the Python reference needs, since Python
/// integers are arbitrary precision) is required.
pub fn base_hash(s: &Struct) -> u64 {
    let bytes = flatten(&hash_items(s));
    let mut value: i64 = 0x1234_5678;
    for byte in bytes {
        let c = byte as i8 as i64;
        value = (value.wrapping_shl(8) ^ (value >> 55)).wrapping_add(c);
    }
    value as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Field, PrimitiveType, UserType};

    fn empty_struct(name: &str) -> Struct {
        Struct {
            typ: UserType {
                package: None,
                name: name.into(),
            },
            fields: vec![],
            constants: vec![],
        }
    }

    #[test]
    fn empty_struct_has_a_fixed_base_hash() {
        // Regression fixture: the hash of a struct with no fields is just the
        // mixing loop's seed value, since there are no bytes to mix in.
        assert_eq!(base_hash(&empty_struct("empty_t")), 0x1234_5678);
    }

    #[test]
    fn hash_is_deterministic_across_calls() {
        let mut s = empty_struct("point2d_t");
        s.fields.push(Field {
            name: "x".into(),
            ty: Type::Primitive(PrimitiveType::Double),
            array_dims: vec![],
        });
        s.fields.push(Field {
            name: "y".into(),
            ty: Type::Primitive(PrimitiveType::Double),
            array_dims: vec![],
        });
        let first = base_hash(&s);
        let second = base_hash(&s);
        assert_eq!(first, second);
    }

    #[test]
    fn hash_depends_on_field_order() {
        let mut a = empty_struct("s");
        a.fields.push(Field {
            name: "x".into(),
            ty: Type::Primitive(PrimitiveType::Int32),
            array_dims: vec![],
        });
        a.fields.push(Field {
            name: "y".into(),
            ty: Type::Primitive(PrimitiveType::Int32),
            array_dims: vec![],
        });

        let mut b = empty_struct("s");
        b.fields.push(a.fields[1].clone());
        b.fields.push(a.fields[0].clone());

        assert_ne!(base_hash(&a), base_hash(&b));
    }

    #[test]
    fn hash_ignores_user_type_name_but_counts_dims() {
        let mut s = empty_struct("outer_t");
        s.fields.push(Field {
            name: "inner".into(),
            ty: Type::User(UserType {
                package: None,
                name: "inner_t".into(),
            }),
            array_dims: vec![],
        });
        // User-typed fields contribute their field name and dimension count,
        // but (per spec.md 4.C point 2) nothing for the type itself.
        let mut items = hash_items(&s);
        assert_eq!(items.len(), 2);
        match items.remove(0) {
            HashItem::Str(name) => assert_eq!(name, "inner"),
            _ => panic!("expected field name"),
        }
        match items.remove(0) {
            HashItem::Int(n) => assert_eq!(n, 0),
            _ => panic!("expected dim count"),
        }
    }
}
