extern crate lcm_gen_cpp;
#[macro_use]
extern crate pretty_assertions;

use lcm_gen_cpp::ast::{Constant, Field, Multiplicity, PrimitiveType, Struct, Type, UserType};
use lcm_gen_cpp::parser::parse_file;

#[test]
fn parses_point2d_t_into_the_expected_struct() {
    let data = include_str!("data/point2d_t.lcm");
    let s = parse_file("point2d_t.lcm", data).expect("failed to parse file");

    assert_eq!(
        s,
        Struct {
            typ: UserType {
                package: Some("exlcm".into()),
                name: "point2d_t".into(),
            },
            fields: vec![
                Field {
                    name: "x".into(),
                    ty: Type::Primitive(PrimitiveType::Double),
                    array_dims: vec![],
                },
                Field {
                    name: "y".into(),
                    ty: Type::Primitive(PrimitiveType::Double),
                    array_dims: vec![],
                },
            ],
            constants: vec![],
        }
    );
}

#[test]
fn parses_constants_preserving_source_lexemes() {
    let data = include_str!("data/constants_t.lcm");
    let s = parse_file("constants_t.lcm", data).expect("failed to parse file");

    assert_eq!(
        s.constants,
        vec![
            Constant {
                name: "NEG".into(),
                ty: PrimitiveType::Int32,
                value_str: "-1".into(),
            },
            Constant {
                name: "POS".into(),
                ty: PrimitiveType::Int32,
                value_str: "+2".into(),
            },
            Constant {
                name: "PI".into(),
                ty: PrimitiveType::Double,
                value_str: "3.14159".into(),
            },
        ]
    );
    assert_eq!(s.fields[0].name, "dummy");
}

#[test]
fn resolves_qualified_and_unqualified_user_types_against_the_enclosing_package() {
    let data = include_str!("data/qualified_t.lcm");
    let s = parse_file("qualified_t.lcm", data).expect("failed to parse file");

    assert_eq!(
        s.fields[0].ty,
        Type::User(UserType {
            package: Some("mycorp".into()),
            name: "inner_t".into(),
        })
    );
    assert_eq!(
        s.fields[1].ty,
        Type::User(UserType {
            package: Some("jpeg".into()),
            name: "image_t".into(),
        })
    );
}

#[test]
fn size_variables_and_distinct_child_types_are_derived_from_the_parsed_struct() {
    let data = include_str!("data/qualified_t.lcm");
    let s = parse_file("qualified_t.lcm", data).expect("failed to parse file");
    assert!(s.size_variables().is_empty());

    let mut with_array = s.clone();
    with_array.fields.push(Field {
        name: "n".into(),
        ty: Type::Primitive(PrimitiveType::Int32),
        array_dims: vec![],
    });
    with_array.fields.push(Field {
        name: "data".into(),
        ty: Type::Primitive(PrimitiveType::Byte),
        array_dims: vec![Multiplicity::Variable("n".into())],
    });
    assert_eq!(with_array.size_variables(), vec!["n".to_string()]);
}
