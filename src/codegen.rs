//! The C++ emitter (`spec.md` §4.D).
//!
//! `CppGen` fills in the fixed template from [`crate::cpp_template`] one
//! placeholder at a time, following the *shape* of the teacher's
//! `CodeGenerator` (one `fill_*`/`generate_*` method per syntactic concern)
//! while keeping the *substitution* model mandated by `spec.md` §4.D and
//! grounded in `original_source`'s `CppGen`: an opaque template string, and
//! an assertion that every placeholder is replaced exactly once.

use crate::ast::{Constant, Field, Multiplicity, PrimitiveType, Struct, Type, UserType};
use crate::cpp_template::CPP_TEMPLATE;
use crate::hash;
use itertools::Itertools;

/// Produces the C++ header text for `s`.
pub fn generate(s: &Struct) -> String {
    CppGen::new(s).generate()
}

struct CppGen<'a> {
    s: &'a Struct,
    result: String,
    size_variables: Vec<String>,
}

impl<'a> CppGen<'a> {
    fn new(s: &'a Struct) -> CppGen<'a> {
        CppGen {
            s,
            result: CPP_TEMPLATE.to_string(),
            size_variables: s.size_variables(),
        }
    }

    fn generate(mut self) -> String {
        self.fill_includes();
        self.fill_names();
        self.fill_member_constants();
        self.fill_member_fields();
        self.fill_encoded_size();
        self.fill_encode();
        self.fill_decode();
        self.fill_base_hash();
        self.fill_get_hash();
        self.result
    }

    /// Replaces the first (and only) occurrence of `old` with `new`.
    ///
    /// Every placeholder in [`CPP_TEMPLATE`] must be hit exactly once; a
    /// miss means the template and the emitter have drifted apart, which is
    /// a bug in the generator, not a user error (`spec.md` §4.D, §7).
    fn replace(&mut self, old: &str, new: &str) {
        let updated = self.result.replacen(old, new, 1);
        assert_ne!(
            updated, self.result,
            "emitter placeholder {:?} not found in template",
            old
        );
        self.result = updated;
    }

    fn full_typename(&self, typ: &Type) -> String {
        match typ {
            Type::Primitive(p) => p.cpp_name().to_string(),
            Type::User(u) => full_user_typename(u),
        }
    }

    fn fill_includes(&mut self) {
        let mut filenames: Vec<String> = self
            .s
            .fields
            .iter()
            .filter_map(|field| match &field.ty {
                Type::User(u) => Some(include_filename(u)),
                Type::Primitive(_) => None,
            })
            .collect();
        filenames.sort();
        filenames.dedup();

        let mut includes = String::new();
        for filename in &filenames {
            includes.push_str(&format!("#include \"{}\"\n", filename));
        }
        if !includes.is_empty() {
            includes.push('\n');
        }
        self.replace("@@SUBSTRUCT_INCLUDES@@\n\n", &includes);
    }

    fn fill_names(&mut self) {
        let (namespace_begin, namespace_end) = self.namespace_begin_end();
        self.replace("@@NAMESPACE_BEGIN@@\n\n", &namespace_begin);
        self.replace("\n@@NAMESPACE_END@@\n", &namespace_end);
        self.replace("@@STRUCT_NAME@@", &self.s.typ.name.clone());
    }

    fn namespace_begin_end(&self) -> (String, String) {
        match &self.s.typ.package {
            None => (String::new(), String::new()),
            Some(package) => (
                format!("namespace {} {{\n\n", package),
                format!("\n}}  // namespace {}\n", package),
            ),
        }
    }

    fn fill_member_constants(&mut self) {
        let mut content = String::new();
        for constant in &self.s.constants {
            content.push_str(&self.one_member_constant(constant));
        }
        if !content.is_empty() {
            content.push('\n');
        }
        self.replace("@@MEMBER_CONSTANTS@@\n", &content);
    }

    fn one_member_constant(&self, constant: &Constant) -> String {
        format!(
            "  static constexpr {typ} {name} = {value};\n",
            typ = constant.ty.cpp_name(),
            name = constant.name,
            value = constant.value_str,
        )
    }

    fn fill_member_fields(&mut self) {
        let mut content = String::new();
        for field in &self.s.fields {
            content.push_str(&format!(
                "  {} {};\n",
                self.member_field_type(field),
                field.name
            ));
        }
        if !content.is_empty() {
            content.push('\n');
        }
        self.replace("@@MEMBER_FIELDS@@\n", &content);
    }

    fn member_field_type(&self, field: &Field) -> String {
        let mut result = self.full_typename(&field.ty);
        for dim in field.array_dims.iter().rev() {
            result = match dim {
                Multiplicity::Constant(n) => format!("std::array<{}, {}>", result, n),
                Multiplicity::Variable(_) => format!("std::vector<{}>", result),
            };
        }
        result
    }

    fn fill_encoded_size(&mut self) {
        let pad = "    ";
        let mut content = String::new();
        for name in &self.size_variables {
            content.push_str(&format!("{pad}if ({name} < 0) {{\n", pad = pad, name = name));
            content.push_str(&format!("{pad}  return _result;\n", pad = pad));
            content.push_str(&format!("{pad}}}\n", pad = pad));
        }
        for field in &self.s.fields {
            for line in self.one_encoded_size(field).lines() {
                content.push_str(&format!("{pad}{line}\n", pad = pad, line = line));
            }
        }
        self.replace("@@GET_ENCODED_SIZE_NO_HASH@@\n", &content);
    }

    fn one_encoded_size(&self, field: &Field) -> String {
        if let Some(known) = self.known_encoded_size(field) {
            return format!("_result += {};  // {}\n", known, field.name);
        }

        let mut content = String::new();
        let mut pad = String::new();
        let mut var = field.name.clone();
        for (i, _) in field.array_dims.iter().enumerate() {
            let new_var = format!("_{}_{}", field.name, i);
            content.push_str(&format!(
                "{pad}for (const auto& {new_var} : {var}) {{\n",
                pad = pad,
                new_var = new_var,
                var = var
            ));
            var = new_var;
            pad.push_str("  ");
        }
        if matches!(field.ty, Type::Primitive(PrimitiveType::String)) {
            content.push_str(&format!(
                "{pad}_result += sizeof(int32_t) + {var}.size() + 1;\n",
                pad = pad,
                var = var
            ));
        } else {
            content.push_str(&format!(
                "{pad}_result += {var}._getEncodedSizeNoHash();\n",
                pad = pad,
                var = var
            ));
        }
        for _ in &field.array_dims {
            pad.truncate(pad.len() - 2);
            content.push_str(&format!("{pad}}}\n", pad = pad));
        }
        content
    }

    /// If `field`'s element has a known per-element size expression, returns
    /// the C++ expression for the total; otherwise `None` (strings and
    /// sub-structs have no fixed per-element size and need a runtime loop
    /// calling `_getEncodedSizeNoHash()` instead, see [`Self::one_encoded_size`]).
    ///
    /// A variable dimension still folds into the multiplication here: its
    /// runtime value is just another factor in the product, not a reason to
    /// fall back to a loop (only the *element* type decides that).
    fn known_encoded_size(&self, field: &Field) -> Option<String> {
        let primitive_size = match field.ty {
            Type::Primitive(p) => p.fixed_encoded_size()?,
            Type::User(_) => return None,
        };
        let mut result = primitive_size.to_string();
        for dim in &field.array_dims {
            match dim {
                Multiplicity::Constant(n) => result.push_str(&format!(" * {}", n)),
                Multiplicity::Variable(name) => result.push_str(&format!(" * {}", name)),
            }
        }
        Some(result)
    }

    fn fill_encode(&mut self) {
        let mut operations: Vec<String> = self
            .size_variables
            .iter()
            .map(|dim| format!("({} >= 0)", dim))
            .collect();
        operations.push("(with_hash ? _encode_field(_hash, _cursor, _end) : true)".to_string());
        for field in &self.s.fields {
            operations.push(self.one_encode(field));
        }
        let content = operations
            .iter()
            .map(|op| format!("        {}", op))
            .join(" &&\n")
            + ";\n";
        self.replace("@@ENCODE@@\n", &content);
    }

    fn one_encode(&self, field: &Field) -> String {
        format!(
            "_encode_field({}, _cursor, _end{})",
            field.name,
            array_dims_arg(field)
        )
    }

    fn fill_decode(&mut self) {
        let mut operations = vec![
            "(with_hash ? _decode_field(&_hash, _cursor, _end) : true)".to_string(),
            "(_hash == _expected_hash)".to_string(),
        ];
        for field in &self.s.fields {
            operations.extend(self.one_decode(field));
        }
        let content = operations
            .iter()
            .map(|op| format!("        {}", op))
            .join(" &&\n")
            + ";\n";
        self.replace("@@DECODE@@\n", &content);
    }

    fn one_decode(&self, field: &Field) -> Vec<String> {
        let mut operations = vec![format!(
            "_decode_field(&{}, _cursor, _end{})",
            field.name,
            array_dims_arg(field)
        )];
        if self.size_variables.iter().any(|n| n == &field.name) {
            operations.push(format!("({} >= 0)", field.name));
        }
        operations
    }

    fn fill_base_hash(&mut self) {
        let value = hash::base_hash(self.s);
        self.replace("@@BASE_HASH@@", &format!("0x{:016x}ull", value));
    }

    fn fill_get_hash(&mut self) {
        let pad = "    ";
        let mut content = format!("{}const uint64_t composite_hash = base_hash", pad);
        let child_types = self.s.distinct_child_types();
        for child in &child_types {
            let child_type = full_user_typename(child);
            content.push_str(&format!(
                "\n{pad}    + {child_type}::_get_hash_impl(new_parents)",
                pad = pad,
                child_type = child_type
            ));
        }
        content.push(';');
        self.replace("@@COMPOSITE_HASH@@", &content);

        let has_any_user_types = !child_types.is_empty();
        if has_any_user_types {
            self.replace(
                "@@GET_HASH_DECLARE_NEW_PARENTS@@",
                &format!(
                    "{}std::array<uint64_t, N + 1> new_parents{{base_hash}};",
                    pad
                ),
            );
            self.replace(
                "@@GET_HASH_UPDATE_NEW_PARENT@@",
                &format!("{}  new_parents[n + 1] = parents[n];", pad),
            );
        } else {
            self.replace("@@GET_HASH_DECLARE_NEW_PARENTS@@\n", "");
            self.replace("@@GET_HASH_UPDATE_NEW_PARENT@@\n", "");
        }
    }
}

fn array_dims_arg(field: &Field) -> String {
    if field.array_dims.is_empty() {
        return String::new();
    }
    let dims: Vec<String> = field
        .array_dims
        .iter()
        .map(|dim| match dim {
            Multiplicity::Constant(n) => n.to_string(),
            Multiplicity::Variable(name) => name.clone(),
        })
        .collect();
    format!(", ArrayDims<{}>{{{}}}", dims.len(), dims.join(", "))
}

/// The C++ spelling of a reference to a user-defined struct type.
fn full_user_typename(u: &UserType) -> String {
    match &u.package {
        Some(package) => format!("{}::{}", package, u.name),
        None => u.name.clone(),
    }
}

/// The `#include` path for a nested message type: `<package>/<name>.hpp`, or
/// just `<name>.hpp` when the type has no package (`spec.md` §8, scenario 5).
fn include_filename(u: &UserType) -> String {
    match &u.package {
        Some(package) => format!("{}/{}.hpp", package, u.name),
        None => format!("{}.hpp", u.name),
    }
}
