//! Comment stripping and tokenizing for the LCM IDL (`spec.md` §4.A).
//!
//! Two passes run over the raw source text before tokenization: C-style
//! `/* ... */` comments are blanked out (preserving embedded newlines so
//! that line numbers stay accurate), then C++-style `//` comments are
//! deleted to end of line. What's left is split into a flat token stream
//! with one token of lookahead, which [`crate::parser`] consumes directly.

/// A lexical token category.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// An identifier or keyword, e.g. `struct`, `package`, `foo_t`.
    Name,
    /// An integer or floating point literal, e.g. `16`, `3.14`, `1e6`.
    Number,
    /// A single-character punctuation mark: `;` `,` `{` `}` `[` `]` `.` `=` `+` `-`.
    Op,
    /// The synthetic end-of-input token.
    EndMarker,
}

/// A single token, with the 1-based source line it started on.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

/// Replaces C-style block comments with whitespace, keeping any newlines
/// they contained so downstream line numbers are unaffected.
fn strip_block_comments(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '/' && i + 1 < chars.len() && chars[i + 1] == '*' {
            let mut j = i + 2;
            while j + 1 < chars.len() && !(chars[j] == '*' && chars[j + 1] == '/') {
                j += 1;
            }
            // j + 1 now indexes the closing '/', or we ran off the end of input.
            let end = if j + 1 < chars.len() { j + 2 } else { chars.len() };
            for &c in &chars[i..end] {
                out.push(if c == '\n' { '\n' } else { ' ' });
            }
            i = end;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Deletes C++-style `//` line comments, keeping the newline that ends them.
fn strip_line_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for line in input.split_inclusive('\n') {
        let (code, rest) = match line.find("//") {
            Some(idx) => (&line[..idx], &line[idx..]),
            None => (line, ""),
        };
        out.push_str(code);
        if rest.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Lexes `input` into a flat token stream, terminated by [`TokenKind::EndMarker`].
pub fn tokenize(input: &str) -> Vec<Token> {
    let stripped = strip_line_comments(&strip_block_comments(input));

    let mut tokens = Vec::new();
    let mut line = 1usize;
    let chars: Vec<char> = stripped.chars().collect();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            line += 1;
            i += 1;
        } else if c.is_whitespace() {
            i += 1;
        } else if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Name,
                text: chars[start..i].iter().collect(),
                line,
            });
        } else if c.is_ascii_digit() {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_digit()
                    || chars[i] == '.'
                    || chars[i] == 'e'
                    || chars[i] == 'E'
                    || ((chars[i] == '+' || chars[i] == '-')
                        && i > start
                        && (chars[i - 1] == 'e' || chars[i - 1] == 'E')))
            {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                text: chars[start..i].iter().collect(),
                line,
            });
        } else if ";,{}[].=+-".contains(c) {
            tokens.push(Token {
                kind: TokenKind::Op,
                text: c.to_string(),
                line,
            });
            i += 1;
        } else {
            // Unrecognized characters (stray punctuation) are skipped; the
            // parser will report a syntax error when it fails to find the
            // token it expects.
            i += 1;
        }
    }

    tokens.push(Token {
        kind: TokenKind::EndMarker,
        text: String::new(),
        line,
    });

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn strips_block_comments_but_keeps_newlines() {
        let input = "a /* one\ntwo */ b";
        let stripped = strip_block_comments(input);
        assert_eq!(stripped, "a         \n       b");
    }

    #[test]
    fn strips_unterminated_block_comment_to_end_of_input() {
        let input = "a /* oops";
        let stripped = strip_block_comments(input);
        assert_eq!(stripped, "a        ");
    }

    #[test]
    fn strips_line_comments_to_end_of_line() {
        let input = "struct foo_t { // a field\n  int32_t x;\n}\n";
        let stripped = strip_line_comments(input);
        assert!(!stripped.contains("a field"));
        assert!(stripped.contains("int32_t x;"));
    }

    #[test]
    fn tokenizes_struct_decl() {
        let tokens = tokenize("struct foo_t { int32_t x; }");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Name,
                TokenKind::Name,
                TokenKind::Op,
                TokenKind::Name,
                TokenKind::Name,
                TokenKind::Op,
                TokenKind::Op,
                TokenKind::EndMarker,
            ]
        );
    }

    #[test]
    fn recognizes_signed_number_tokens_with_explicit_sign_token() {
        let tokens = tokenize("const int32_t X = -5;");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["const", "int32_t", "X", "=", "-", "5", ";", ""]
        );
    }

    #[test]
    fn comment_stripping_preserves_line_numbers_of_surviving_tokens() {
        let input = "struct foo_t {\n  /* a\n  multi\n  line */ int32_t x;\n  int32_t y; // trailing\n}\n";
        let tokens = tokenize(input);
        let by_text: Vec<(String, usize)> =
            tokens.into_iter().map(|t| (t.text, t.line)).collect();
        assert!(by_text.contains(&("x".to_string(), 4)));
        assert!(by_text.contains(&("y".to_string(), 5)));
    }

    #[test]
    fn float_literal_with_exponent() {
        let tokens = tokenize("1e6");
        assert_eq!(tokens[0].text, "1e6");
        assert_eq!(tokens[0].kind, TokenKind::Number);
    }

    #[test]
    fn block_comment_stripping_does_not_corrupt_multibyte_utf8() {
        // A non-ASCII comment body must not get mangled into stray
        // replacement bytes, and surviving tokens after it must still lex
        // cleanly (spec.md §4.E/§6: sources are read as UTF-8).
        let input = "struct foo_t {\n  /* comment with \u{00e9}\u{00e9}\u{00e9} and \u{4e2d}\u{6587} */ int32_t x;\n}\n";
        let tokens = tokenize(input);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["struct", "foo_t", "{", "int32_t", "x", ";", "}", ""]
        );
    }

    #[test]
    fn line_comment_with_multibyte_utf8_is_stripped_cleanly() {
        let input = "int32_t x; // \u{4e2d}\u{6587} trailing\nint32_t y;\n";
        let tokens = tokenize(input);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["int32_t", "x", ";", "int32_t", "y", ";", ""]
        );
    }
}
