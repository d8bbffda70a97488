//! A recursive-descent parser for the LCM IDL, with one token of lookahead
//! (`spec.md` §4.B).
//!
//! Grammar (EBNF, reproduced from `spec.md`):
//!
//! ```text
//! root           := package_decl? struct_decl ENDMARKER
//! package_decl   := "package" NAME ";"
//! struct_decl    := "struct" NAME "{" struct_stmt* "}"
//! struct_stmt    := const_stmt | field_stmt
//! const_stmt     := "const" NAME const_def ("," const_def)* ";"
//! const_def      := NAME "=" sign? NUMBER
//! field_stmt     := qualified_type NAME array_dim* ";"
//! qualified_type := NAME ("." NAME)?
//! array_dim      := "[" (NUMBER | NAME) "]"
//! sign           := "+" | "-"
//! ```
//!
//! The parser halts at the first syntax error; there is no error recovery
//! (`spec.md` §4.B, §7). This crate only accepts files with exactly one
//! `struct_decl` (`spec.md` §1, Non-goals), unlike the teacher's `lcm-gen`,
//! which builds a whole module tree out of many structs across many files.

use crate::ast::{Constant, Field, Multiplicity, PrimitiveType, Struct, Type, UserType};
use crate::error::SyntaxError;
use crate::lexer::{self, Token, TokenKind};

type Result<T> = std::result::Result<T, SyntaxError>;

struct Parser<'a> {
    filename: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// Set once the struct's name (and hence its package) is known; `const`
    /// and `field` statements need it to resolve unqualified user types.
    package: Option<String>,
}

/// Parses a complete LCM source file into its single [`Struct`].
pub fn parse_file(filename: &str, input: &str) -> Result<Struct> {
    let tokens = lexer::tokenize(input);
    let mut parser = Parser {
        filename,
        tokens,
        pos: 0,
        package: None,
    };
    parser.root()
}

impl<'a> Parser<'a> {
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            filename: self.filename.to_string(),
            line: self.current().line,
            message: message.into(),
        }
    }

    /// Consumes the current token if it matches `kind` (and `text`, if
    /// given), returning its text. Otherwise raises a syntax error.
    fn consume(&mut self, kind: TokenKind, text: Option<&str>) -> Result<String> {
        let actual = self.current().clone();
        if actual.kind != kind {
            return Err(self.error(format!(
                "expected {:?} but got {:?} ('{}')",
                kind, actual.kind, actual.text
            )));
        }
        if let Some(expected) = text {
            if actual.text != expected {
                return Err(self.error(format!(
                    "expected '{}' but got '{}'",
                    expected, actual.text
                )));
            }
        }
        if kind != TokenKind::EndMarker {
            self.pos += 1;
        }
        Ok(actual.text)
    }

    fn peek_is(&self, text: &str) -> bool {
        self.current().text == text
    }

    fn root(&mut self) -> Result<Struct> {
        if self.peek_is("package") {
            self.package_decl()?;
        }
        let result = self.struct_decl()?;
        self.consume(TokenKind::EndMarker, None)?;
        Ok(result)
    }

    fn package_decl(&mut self) -> Result<()> {
        self.consume(TokenKind::Name, Some("package"))?;
        let package = self.consume(TokenKind::Name, None)?;
        self.consume(TokenKind::Op, Some(";"))?;
        self.package = Some(package);
        Ok(())
    }

    fn struct_decl(&mut self) -> Result<Struct> {
        self.consume(TokenKind::Name, Some("struct"))?;
        let name = self.consume(TokenKind::Name, None)?;
        let mut result = Struct {
            typ: UserType {
                package: self.package.clone(),
                name,
            },
            fields: Vec::new(),
            constants: Vec::new(),
        };
        self.consume(TokenKind::Op, Some("{"))?;
        loop {
            if self.current().kind != TokenKind::Name {
                break;
            } else if self.peek_is("const") {
                self.const_stmt(&mut result)?;
            } else {
                self.field_stmt(&mut result)?;
            }
        }
        self.consume(TokenKind::Op, Some("}"))?;
        Ok(result)
    }

    fn const_stmt(&mut self, result: &mut Struct) -> Result<()> {
        self.consume(TokenKind::Name, Some("const"))?;
        let typ_str = self.consume(TokenKind::Name, None)?;
        let typ = match PrimitiveType::from_lcm_name(&typ_str) {
            Some(PrimitiveType::String) | None => {
                return Err(self.error(format!(
                    "expected a primitive type name but got '{}'",
                    typ_str
                )));
            }
            Some(typ) => typ,
        };
        result.constants.push(self.const_def(typ)?);
        while self.peek_is(",") {
            self.consume(TokenKind::Op, Some(","))?;
            result.constants.push(self.const_def(typ)?);
        }
        self.consume(TokenKind::Op, Some(";"))?;
        Ok(())
    }

    fn const_def(&mut self, typ: PrimitiveType) -> Result<Constant> {
        let name = self.consume(TokenKind::Name, None)?;
        self.consume(TokenKind::Op, Some("="))?;
        let mut value_str = String::new();
        if self.peek_is("+") || self.peek_is("-") {
            value_str.push_str(&self.consume(TokenKind::Op, None)?);
        }
        value_str.push_str(&self.consume(TokenKind::Number, None)?);

        let valid = if matches!(typ, PrimitiveType::Float | PrimitiveType::Double) {
            value_str.parse::<f64>().is_ok()
        } else {
            value_str.parse::<i64>().is_ok()
        };
        if !valid {
            return Err(self.error(format!(
                "invalid constant value '{}' for {}",
                value_str, typ
            )));
        }

        Ok(Constant {
            name,
            ty: typ,
            value_str,
        })
    }

    fn field_stmt(&mut self, result: &mut Struct) -> Result<()> {
        let ty = self.qualified_identifier(result)?;
        let name = self.consume(TokenKind::Name, None)?;
        let mut array_dims = Vec::new();
        while self.peek_is("[") {
            self.consume(TokenKind::Op, Some("["))?;
            let dim = if self.current().kind == TokenKind::Name {
                Multiplicity::Variable(self.consume(TokenKind::Name, None)?)
            } else {
                // The grammar's `array_dim` only allows a bare NUMBER, but the
                // lexer never fuses a leading '-' into the literal (unlike
                // `const_def`'s explicit `sign?`), so a negative dimension
                // arrives as two tokens. Accept the sign here purely so the
                // negative value can be rejected with a proper, localized
                // syntax error instead of a generic "expected Number" one
                // (`spec.md` §9's redesigned negative-dimension behavior).
                let negative = self.peek_is("-");
                if negative {
                    self.consume(TokenKind::Op, Some("-"))?;
                }
                let text = self.consume(TokenKind::Number, None)?;
                let mut value: i64 = text
                    .parse()
                    .map_err(|_| self.error(format!("invalid array dimension '{}'", text)))?;
                if negative {
                    value = -value;
                }
                if value < 0 {
                    return Err(self.error(format!("array dimension must not be negative: {}", value)));
                }
                Multiplicity::Constant(value)
            };
            self.consume(TokenKind::Op, Some("]"))?;
            array_dims.push(dim);
        }
        self.consume(TokenKind::Op, Some(";"))?;
        result.fields.push(Field {
            name,
            ty,
            array_dims,
        });
        Ok(())
    }

    fn qualified_identifier(&mut self, result: &Struct) -> Result<Type> {
        let name1 = self.consume(TokenKind::Name, None)?;
        if let Some(primitive) = PrimitiveType::from_lcm_name(&name1) {
            return Ok(Type::Primitive(primitive));
        }
        if self.peek_is(".") {
            self.consume(TokenKind::Op, Some("."))?;
            let name2 = self.consume(TokenKind::Name, None)?;
            return Ok(Type::User(UserType {
                package: Some(name1),
                name: name2,
            }));
        }
        Ok(Type::User(UserType {
            package: result.typ.package.clone(),
            name: name1,
        }))
    }
}
