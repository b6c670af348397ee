//! nom grammar for the expression subset handled by the frontend.
//!
//! Covers the operand forms that occur in boolean positions: literals, paths,
//! parens, tuples, arrays, struct literals, member access, calls, indexing,
//! `?`, unary and binary operators with Rust-like precedence, ranges and the
//! jump expressions (`return`/`break`/`continue`). Control-flow forms such as
//! `if` or `match` are constructed through the tree API instead.

use crate::ast::{BinaryOperator, Span, UnaryOperator};
use crate::error::{ErrorKind, Result};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, digit1, multispace0};
use nom::combinator::{all_consuming, map, opt, recognize};
use nom::multi::separated_list;
use nom::sequence::{pair, terminated};
use nom::IResult;

mod ast;

pub use self::ast::{Expr, ExprKind};

/// Parses a single expression, requiring the entire input to be consumed.
pub fn parse_expression(source: &str) -> Result<Expr> {
    let parser = Parser { source };
    let result = match all_consuming(terminated(|i| parser.expr(i), multispace0))(source) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error((rest, _))) | Err(nom::Err::Failure((rest, _))) => {
            Err(ErrorKind::Parse(format!(
                "unexpected input at byte {}",
                source.len() - rest.len()
            ))
            .into())
        }
        Err(nom::Err::Incomplete(_)) => {
            Err(ErrorKind::Parse("incomplete expression".to_string()).into())
        }
    };
    result
}

enum StructItem {
    Field(String, Expr),
    Base(Expr),
}

struct Parser<'a> {
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn offset(&self, rest: &str) -> usize {
        self.source.len() - rest.len()
    }

    /// A token preceded by optional whitespace.
    fn symbol(&self, i: &'a str, token: &'static str) -> IResult<&'a str, &'a str> {
        let (i, _) = multispace0(i)?;
        tag(token)(i)
    }

    /// A token preceded by optional whitespace that must not run into one of
    /// the forbidden characters (`&` vs `&&`, `|` vs `||`).
    fn operator(
        &self,
        i: &'a str,
        token: &'static str,
        forbidden: &'static str,
    ) -> IResult<&'a str, &'a str> {
        let (i, _) = multispace0(i)?;
        let (rest, op) = tag(token)(i)?;
        if rest.chars().next().map_or(false, |c| forbidden.contains(c)) {
            Err(nom::Err::Error((i, nom::error::ErrorKind::Tag)))
        } else {
            Ok((rest, op))
        }
    }

    fn expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        alt((|i| self.jump_expr(i), |i| self.range_expr(i)))(i)
    }

    /// `return`/`break` with an optional trailing operand, or `continue`.
    fn jump_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let (i, _) = multispace0(i)?;
        let start = self.offset(i);
        let (i, word) = identifier(i)?;
        match word {
            "return" => {
                let (i, value) = opt(|i| self.expr(i))(i)?;
                let end = value.as_ref().map_or(start + word.len(), |v| v.span.end());
                Ok((
                    i,
                    Expr::new(ExprKind::Return(value.map(Box::new)), Span::new(start, end)),
                ))
            }
            "break" => {
                let (i, value) = opt(|i| self.expr(i))(i)?;
                let end = value.as_ref().map_or(start + word.len(), |v| v.span.end());
                Ok((
                    i,
                    Expr::new(ExprKind::Break(value.map(Box::new)), Span::new(start, end)),
                ))
            }
            "continue" => Ok((
                i,
                Expr::new(ExprKind::Continue, Span::new(start, start + word.len())),
            )),
            _ => Err(nom::Err::Error((i, nom::error::ErrorKind::Tag))),
        }
    }

    fn range_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let (i, _) = multispace0(i)?;
        let start = self.offset(i);

        if let Ok((rest, _)) = self.symbol(i, "..") {
            let (rest, end) = opt(|i| self.or_expr(i))(rest)?;
            let end_offset = end.as_ref().map_or(self.offset(rest), |e| e.span.end());
            return Ok((
                rest,
                Expr::new(
                    ExprKind::Range {
                        start: None,
                        end: end.map(Box::new),
                    },
                    Span::new(start, end_offset),
                ),
            ));
        }

        let (i, lhs) = self.or_expr(i)?;
        if let Ok((rest, _)) = self.symbol(i, "..") {
            let (rest, end) = opt(|i| self.or_expr(i))(rest)?;
            let end_offset = end.as_ref().map_or(self.offset(rest), |e| e.span.end());
            let span = Span::new(lhs.span.start(), end_offset);
            return Ok((
                rest,
                Expr::new(
                    ExprKind::Range {
                        start: Some(Box::new(lhs)),
                        end: end.map(Box::new),
                    },
                    span,
                ),
            ));
        }

        Ok((i, lhs))
    }

    /// Left-associative fold of one precedence level.
    fn binary_level<F, G>(&self, i: &'a str, operand: F, op: G) -> IResult<&'a str, Expr>
    where
        F: Fn(&'a str) -> IResult<&'a str, Expr>,
        G: Fn(&'a str) -> IResult<&'a str, BinaryOperator>,
    {
        let (mut rest, mut lhs) = operand(i)?;
        loop {
            let (after_op, operator) = match op(rest) {
                Ok(parsed) => parsed,
                Err(_) => break,
            };
            let (after_rhs, rhs) = match operand(after_op) {
                Ok(parsed) => parsed,
                Err(_) => break,
            };
            let span = Span::new(lhs.span.start(), rhs.span.end());
            lhs = Expr::new(
                ExprKind::Binary {
                    op: operator,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
            rest = after_rhs;
        }
        Ok((rest, lhs))
    }

    fn or_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        self.binary_level(
            i,
            |i| self.and_expr(i),
            |i| map(|i| self.symbol(i, "||"), |_| BinaryOperator::LogicOr)(i),
        )
    }

    fn and_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        self.binary_level(
            i,
            |i| self.cmp_expr(i),
            |i| map(|i| self.symbol(i, "&&"), |_| BinaryOperator::LogicAnd)(i),
        )
    }

    /// Comparisons do not associate.
    fn cmp_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let (i, lhs) = self.bitor_expr(i)?;
        match self.cmp_op(i) {
            Ok((rest, op)) => {
                let (rest, rhs) = self.bitor_expr(rest)?;
                let span = Span::new(lhs.span.start(), rhs.span.end());
                Ok((
                    rest,
                    Expr::new(
                        ExprKind::Binary {
                            op,
                            lhs: Box::new(lhs),
                            rhs: Box::new(rhs),
                        },
                        span,
                    ),
                ))
            }
            Err(_) => Ok((i, lhs)),
        }
    }

    fn cmp_op(&self, i: &'a str) -> IResult<&'a str, BinaryOperator> {
        alt((
            map(|i| self.symbol(i, "=="), |_| BinaryOperator::Eq),
            map(|i| self.symbol(i, "!="), |_| BinaryOperator::NotEq),
            map(|i| self.symbol(i, "<="), |_| BinaryOperator::LtEq),
            map(|i| self.symbol(i, ">="), |_| BinaryOperator::GtEq),
            map(|i| self.operator(i, "<", "<"), |_| BinaryOperator::Lt),
            map(|i| self.operator(i, ">", ">"), |_| BinaryOperator::Gt),
        ))(i)
    }

    fn bitor_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        self.binary_level(
            i,
            |i| self.bitxor_expr(i),
            |i| map(|i| self.operator(i, "|", "|"), |_| BinaryOperator::BitOr)(i),
        )
    }

    fn bitxor_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        self.binary_level(
            i,
            |i| self.bitand_expr(i),
            |i| map(|i| self.symbol(i, "^"), |_| BinaryOperator::Xor)(i),
        )
    }

    fn bitand_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        self.binary_level(
            i,
            |i| self.shift_expr(i),
            |i| map(|i| self.operator(i, "&", "&"), |_| BinaryOperator::BitAnd)(i),
        )
    }

    fn shift_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        self.binary_level(
            i,
            |i| self.add_expr(i),
            |i| {
                alt((
                    map(|i| self.symbol(i, "<<"), |_| BinaryOperator::Shl),
                    map(|i| self.symbol(i, ">>"), |_| BinaryOperator::Shr),
                ))(i)
            },
        )
    }

    fn add_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        self.binary_level(
            i,
            |i| self.mul_expr(i),
            |i| {
                alt((
                    map(|i| self.symbol(i, "+"), |_| BinaryOperator::Add),
                    map(|i| self.symbol(i, "-"), |_| BinaryOperator::Sub),
                ))(i)
            },
        )
    }

    fn mul_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        self.binary_level(
            i,
            |i| self.unary_expr(i),
            |i| {
                alt((
                    map(|i| self.symbol(i, "*"), |_| BinaryOperator::Mul),
                    map(|i| self.symbol(i, "/"), |_| BinaryOperator::Div),
                    map(|i| self.symbol(i, "%"), |_| BinaryOperator::Rem),
                ))(i)
            },
        )
    }

    fn unary_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let (i, _) = multispace0(i)?;
        let start = self.offset(i);
        match self.unary_op(i) {
            Ok((i, op)) => {
                let (i, operand) = self.unary_expr(i)?;
                let span = Span::new(start, operand.span.end());
                Ok((
                    i,
                    Expr::new(
                        ExprKind::Unary {
                            op,
                            operand: Box::new(operand),
                        },
                        span,
                    ),
                ))
            }
            Err(_) => self.postfix_expr(i),
        }
    }

    fn unary_op(&self, i: &'a str) -> IResult<&'a str, UnaryOperator> {
        alt((
            map(|i| self.ref_mut(i), |_| UnaryOperator::RefMut),
            map(char('&'), |_| UnaryOperator::Ref),
            map(char('!'), |_| UnaryOperator::Not),
            map(char('-'), |_| UnaryOperator::Neg),
            map(char('*'), |_| UnaryOperator::Deref),
        ))(i)
    }

    fn ref_mut(&self, i: &'a str) -> IResult<&'a str, ()> {
        let (after_amp, _) = char('&')(i)?;
        let (after_ws, _) = multispace0(after_amp)?;
        match identifier(after_ws) {
            Ok((rest, "mut")) => Ok((rest, ())),
            _ => Err(nom::Err::Error((i, nom::error::ErrorKind::Tag))),
        }
    }

    fn postfix_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let (i, _) = multispace0(i)?;
        let start = self.offset(i);
        let (mut rest, mut expr) = self.primary_expr(i)?;
        loop {
            if let Ok((after, _)) = self.symbol(rest, "?") {
                expr = Expr::new(
                    ExprKind::Try(Box::new(expr)),
                    Span::new(start, self.offset(after)),
                );
                rest = after;
                continue;
            }
            if let Ok((after, (name, arguments))) = self.member_access(rest) {
                let span = Span::new(start, self.offset(after));
                expr = match arguments {
                    Some(arguments) => Expr::new(
                        ExprKind::MethodCall {
                            receiver: Box::new(expr),
                            method: name,
                            arguments,
                        },
                        span,
                    ),
                    None => Expr::new(
                        ExprKind::Field {
                            base: Box::new(expr),
                            name,
                        },
                        span,
                    ),
                };
                rest = after;
                continue;
            }
            if let Ok((after, arguments)) = self.argument_list(rest) {
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        arguments,
                    },
                    Span::new(start, self.offset(after)),
                );
                rest = after;
                continue;
            }
            if let Ok((after, index)) = self.index_suffix(rest) {
                expr = Expr::new(
                    ExprKind::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                    Span::new(start, self.offset(after)),
                );
                rest = after;
                continue;
            }
            break;
        }
        Ok((rest, expr))
    }

    /// `.name` or `.name(args)`; `..` belongs to ranges and is rejected.
    fn member_access(&self, i: &'a str) -> IResult<&'a str, (String, Option<Vec<Expr>>)> {
        let (after_dot, _) = self.symbol(i, ".")?;
        if after_dot.starts_with('.') {
            return Err(nom::Err::Error((i, nom::error::ErrorKind::Tag)));
        }
        let (after_ws, _) = multispace0(after_dot)?;
        let (rest, name) = member_name(after_ws)?;
        match self.argument_list(rest) {
            Ok((rest, arguments)) => Ok((rest, (name.to_string(), Some(arguments)))),
            Err(_) => Ok((rest, (name.to_string(), None))),
        }
    }

    fn argument_list(&self, i: &'a str) -> IResult<&'a str, Vec<Expr>> {
        let (i, _) = self.symbol(i, "(")?;
        let (i, arguments) = separated_list(|i| self.symbol(i, ","), |i| self.expr(i))(i)?;
        let (i, _) = self.symbol(i, ")")?;
        Ok((i, arguments))
    }

    fn index_suffix(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let (i, _) = self.symbol(i, "[")?;
        let (i, index) = self.expr(i)?;
        let (i, _) = self.symbol(i, "]")?;
        Ok((i, index))
    }

    fn primary_expr(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let (i, _) = multispace0(i)?;
        alt((
            |i| self.paren_or_tuple(i),
            |i| self.array(i),
            |i| self.string_literal(i),
            |i| self.integer_literal(i),
            |i| self.path_or_struct(i),
        ))(i)
    }

    /// `()`, `(expr)` or `(a, b, ...)`.
    fn paren_or_tuple(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let start = self.offset(i);
        let (i, _) = char('(')(i)?;

        if let Ok((rest, _)) = self.symbol(i, ")") {
            return Ok((
                rest,
                Expr::new(ExprKind::Unit, Span::new(start, self.offset(rest))),
            ));
        }

        let (i, first) = self.expr(i)?;
        if let Ok((after_comma, _)) = self.symbol(i, ",") {
            let (i, mut elements) =
                separated_list(|i| self.symbol(i, ","), |i| self.expr(i))(after_comma)?;
            let (i, _) = opt(|i| self.symbol(i, ","))(i)?;
            let (i, _) = self.symbol(i, ")")?;
            elements.insert(0, first);
            return Ok((
                i,
                Expr::new(
                    ExprKind::Tuple(elements),
                    Span::new(start, self.offset(i)),
                ),
            ));
        }

        let (i, _) = self.symbol(i, ")")?;
        Ok((
            i,
            Expr::new(
                ExprKind::Paren(Box::new(first)),
                Span::new(start, self.offset(i)),
            ),
        ))
    }

    /// `[]`, `[a, b, ...]` or `[value; length]`.
    fn array(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let start = self.offset(i);
        let (i, _) = char('[')(i)?;

        if let Ok((rest, _)) = self.symbol(i, "]") {
            return Ok((
                rest,
                Expr::new(
                    ExprKind::Array(Vec::new()),
                    Span::new(start, self.offset(rest)),
                ),
            ));
        }

        let (i, first) = self.expr(i)?;
        if let Ok((after_semi, _)) = self.symbol(i, ";") {
            let (i, length) = self.expr(after_semi)?;
            let (i, _) = self.symbol(i, "]")?;
            return Ok((
                i,
                Expr::new(
                    ExprKind::Repeat {
                        value: Box::new(first),
                        length: Box::new(length),
                    },
                    Span::new(start, self.offset(i)),
                ),
            ));
        }

        let mut elements = vec![first];
        let i = if let Ok((after_comma, _)) = self.symbol(i, ",") {
            let (i, tail) =
                separated_list(|i| self.symbol(i, ","), |i| self.expr(i))(after_comma)?;
            elements.extend(tail);
            let (i, _) = opt(|i| self.symbol(i, ","))(i)?;
            i
        } else {
            i
        };
        let (i, _) = self.symbol(i, "]")?;
        Ok((
            i,
            Expr::new(ExprKind::Array(elements), Span::new(start, self.offset(i))),
        ))
    }

    fn string_literal(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let start = self.offset(i);
        let (i, _) = char('"')(i)?;
        let (i, content) = take_while(|c| c != '"')(i)?;
        let (i, _) = char('"')(i)?;
        Ok((
            i,
            Expr::new(
                ExprKind::Str(content.to_string()),
                Span::new(start, self.offset(i)),
            ),
        ))
    }

    fn integer_literal(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let start = self.offset(i);
        let (i, digits) = digit1(i)?;
        let value = digits
            .parse::<u64>()
            .map_err(|_| nom::Err::Error((i, nom::error::ErrorKind::Digit)))?;
        Ok((
            i,
            Expr::new(
                ExprKind::Integer(value),
                Span::new(start, self.offset(i)),
            ),
        ))
    }

    /// A (possibly `::`-separated) path, a boolean literal, or a struct
    /// literal when the path is followed by a brace.
    fn path_or_struct(&self, i: &'a str) -> IResult<&'a str, Expr> {
        let start = self.offset(i);
        let (i, first) = identifier(i)?;
        match first {
            "true" => {
                return Ok((
                    i,
                    Expr::new(ExprKind::Bool(true), Span::new(start, self.offset(i))),
                ))
            }
            "false" => {
                return Ok((
                    i,
                    Expr::new(ExprKind::Bool(false), Span::new(start, self.offset(i))),
                ))
            }
            // Keywords never start a primary expression.
            "return" | "break" | "continue" | "mut" => {
                return Err(nom::Err::Error((i, nom::error::ErrorKind::Tag)))
            }
            _ => {}
        }

        let mut path = first.to_string();
        let mut rest = i;
        while let Ok((after, segment)) = path_segment(rest) {
            path.push_str("::");
            path.push_str(segment);
            rest = after;
        }
        let path_end = self.offset(rest);

        if let Ok((after_brace, _)) = self.symbol(rest, "{") {
            let (after, (fields, base)) = self.struct_body(after_brace)?;
            return Ok((
                after,
                Expr::new(
                    ExprKind::Struct {
                        path,
                        fields,
                        base: base.map(Box::new),
                    },
                    Span::new(start, self.offset(after)),
                ),
            ));
        }

        Ok((
            rest,
            Expr::new(ExprKind::Path(path), Span::new(start, path_end)),
        ))
    }

    fn struct_body(
        &self,
        i: &'a str,
    ) -> IResult<&'a str, (Vec<(String, Expr)>, Option<Expr>)> {
        let (i, items) = separated_list(|i| self.symbol(i, ","), |i| self.struct_item(i))(i)?;
        let (i, _) = opt(|i| self.symbol(i, ","))(i)?;
        let (i, _) = self.symbol(i, "}")?;

        let mut fields = Vec::new();
        let mut base = None;
        for item in items {
            match item {
                StructItem::Field(name, value) => fields.push((name, value)),
                StructItem::Base(expr) => base = Some(expr),
            }
        }
        Ok((i, (fields, base)))
    }

    /// `name: value`, shorthand `name`, or the spread base `..expr`.
    fn struct_item(&self, i: &'a str) -> IResult<&'a str, StructItem> {
        if let Ok((rest, _)) = self.symbol(i, "..") {
            let (rest, expr) = self.expr(rest)?;
            return Ok((rest, StructItem::Base(expr)));
        }
        let (i, _) = multispace0(i)?;
        let name_start = self.offset(i);
        let (i, name) = identifier(i)?;
        let name_end = self.offset(i);
        match self.symbol(i, ":") {
            Ok((after, _)) => {
                let (after, value) = self.expr(after)?;
                Ok((after, StructItem::Field(name.to_string(), value)))
            }
            Err(_) => {
                // Shorthand `Foo { a }` desugars to `a: a`.
                let value = Expr::new(
                    ExprKind::Path(name.to_string()),
                    Span::new(name_start, name_end),
                );
                Ok((i, StructItem::Field(name.to_string(), value)))
            }
        }
    }
}

fn identifier(i: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(i)
}

fn member_name(i: &str) -> IResult<&str, &str> {
    alt((identifier, digit1))(i)
}

fn path_segment(i: &str) -> IResult<&str, &str> {
    let (i, _) = tag("::")(i)?;
    identifier(i)
}
