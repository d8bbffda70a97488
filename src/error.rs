//! Error types for the generator (`spec.md` §7).
//!
//! Three kinds of failure are distinguished, matching §7 exactly: a syntax
//! error while parsing one file, an I/O error while reading or writing one
//! file, and an internal error (a broken invariant in the generator itself,
//! as opposed to bad user input). Styled after the `#[derive(Fail)]` +
//! `#[fail(display = "...")]` pattern used throughout the sibling `lcm`
//! crate's `error.rs`, rather than the ad hoc `format_err!`/`ensure!` calls
//! in the teacher's original `lcm-gen` binary.

use std::io;
use std::path::PathBuf;

/// A syntax error encountered while parsing a single LCM source file.
///
/// Carries everything `spec.md` §4.B requires: the source filename, the
/// 1-based line number of the offending token, and a human-readable message.
#[derive(Debug, Fail)]
#[fail(display = "{}:{}: {}", filename, line, message)]
pub struct SyntaxError {
    pub filename: String,
    pub line: usize,
    pub message: String,
}

/// Top-level error type returned by this crate's public API.
#[derive(Debug, Fail)]
pub enum Error {
    /// Parsing failed; see [`SyntaxError`].
    #[fail(display = "{}", _0)]
    Syntax(#[cause] SyntaxError),

    /// Reading or writing a file failed.
    #[fail(display = "I/O error on {:?}: {}", path, source)]
    Io {
        path: PathBuf,
        #[cause]
        source: io::Error,
    },

    /// A generator invariant was violated. This indicates a bug in the
    /// generator, not a problem with the input file.
    #[fail(display = "internal error: {}", _0)]
    Internal(String),
}

impl From<SyntaxError> for Error {
    fn from(err: SyntaxError) -> Self {
        Error::Syntax(err)
    }
}

/// Attaches a path to an [`io::Error`], wrapping it into [`Error::Io`].
pub(crate) trait IoResultExt<T> {
    fn with_path(self, path: &std::path::Path) -> Result<T, Error>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path(self, path: &std::path::Path) -> Result<T, Error> {
        self.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
