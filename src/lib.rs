//! A standalone LCM IDL compiler that emits bit-exact C++ message headers.
//!
//! This crate implements the pipeline described in `spec.md`: a hand-written
//! lexer and recursive-descent parser ([`parser::parse_file`]) build an
//! in-memory [`ast::Struct`], [`hash::base_hash`] computes its LCM type hash,
//! and [`codegen::generate`] substitutes both into a fixed C++ template to
//! produce one header per input file.
//!
//! The functions in this module are the driver (`spec.md` §4.E): given a
//! source path (or source text) they parse, generate, and optionally write
//! the result to `<outdir>/<StructName>.hpp`.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

use std::fs;
use std::path::{Path, PathBuf};

pub mod ast;
pub mod codegen;
pub mod cpp_template;
pub mod error;
pub mod hash;
pub mod lexer;
pub mod parser;

use error::{Error, IoResultExt};

/// Parses `source` (the contents of `filename`) and emits its C++ header.
///
/// Returns the struct's name (used to name the output file) alongside the
/// generated header text. This is the hidden "two-phase" core that
/// [`generate_file`] and [`generate`] build on; it's exposed directly so
/// callers that already have source text in memory (e.g. tests) don't need
/// to round-trip through the filesystem.
pub fn generate_string(filename: &str, source: &str) -> Result<(String, String), Error> {
    let s = parser::parse_file(filename, source)?;
    let header = codegen::generate(&s);
    Ok((s.typ.name.clone(), header))
}

/// Parses and generates `input`, writing `<StructName>.hpp` into `outdir`.
///
/// Returns the path written to. This does the file I/O described in
/// `spec.md` §4.E steps 1–4 for a single input.
pub fn generate_file(input: &Path, outdir: &Path) -> Result<PathBuf, Error> {
    let filename = input.to_string_lossy().into_owned();
    let source = fs::read_to_string(input).with_path(input)?;
    debug!("parsing {}", filename);

    let (struct_name, header) = generate_string(&filename, &source)?;

    let output_path = outdir.join(format!("{}.hpp", struct_name));
    fs::write(&output_path, &header).with_path(&output_path)?;
    debug!("wrote {}", output_path.display());

    Ok(output_path)
}

/// Processes every file in `inputs` independently, writing each one's header
/// into `outdir`.
///
/// One file's failure does not stop the others from being processed
/// (`spec.md` §4.E, §5): every input is attempted, and every failure is
/// collected. `Ok(())` means every input succeeded; otherwise the returned
/// `Vec` holds one error per failed input, in input order.
pub fn generate<P: AsRef<Path>>(inputs: &[P], outdir: &Path) -> Result<(), Vec<Error>> {
    let mut errors = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if let Err(e) = generate_file(input, outdir) {
            warn!("failed to generate {}: {}", input.display(), e);
            errors.push(e);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_string_returns_struct_name_and_header() {
        let (name, header) =
            generate_string("empty_t.lcm", "struct empty_t {\n}\n").unwrap();
        assert_eq!(name, "empty_t");
        assert!(header.contains("class empty_t {"));
    }

    #[test]
    fn generate_string_propagates_syntax_errors() {
        let err = generate_string("bad.lcm", "struct bad_t {\n  int32_t x\n}\n").unwrap_err();
        assert!(err.to_string().contains("bad.lcm"));
    }
}
