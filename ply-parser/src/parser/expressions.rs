// Expression parsing module
// Handles operator precedence, postfix chains (calls, selectors, indexing)
// and primary expressions

use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::ast::*;
use crate::error::*;
use crate::parser::{FileParser, Rule};

impl FileParser<'_> {
    /// Binary operator precedence parser, lowest precedence first (Go levels 1-5)
    fn pratt_parser() -> PrattParser<Rule> {
        PrattParser::new()
            .op(Op::infix(Rule::op_or, Assoc::Left))
            .op(Op::infix(Rule::op_and, Assoc::Left))
            .op(Op::infix(Rule::op_eq, Assoc::Left)
                | Op::infix(Rule::op_ne, Assoc::Left)
                | Op::infix(Rule::op_lt, Assoc::Left)
                | Op::infix(Rule::op_le, Assoc::Left)
                | Op::infix(Rule::op_gt, Assoc::Left)
                | Op::infix(Rule::op_ge, Assoc::Left))
            .op(Op::infix(Rule::op_add, Assoc::Left) | Op::infix(Rule::op_sub, Assoc::Left))
            .op(Op::infix(Rule::op_mul, Assoc::Left)
                | Op::infix(Rule::op_div, Assoc::Left)
                | Op::infix(Rule::op_rem, Assoc::Left))
            .op(Op::prefix(Rule::op_neg) | Op::prefix(Rule::op_pos) | Op::prefix(Rule::op_not))
    }

    /// Parse an `expr` or `hdr_expr` pair (or a wrapper holding one)
    pub(crate) fn parse_expr(&self, pair: Pair<Rule>) -> ParseResult<Expr> {
        match pair.as_rule() {
            Rule::expr | Rule::hdr_expr => self.parse_with_precedence(pair.into_inner()),
            Rule::element_key | Rule::slice_low | Rule::slice_high => {
                self.parse_expr(pair.into_inner().next().unwrap())
            }
            rule => unreachable!("Unexpected expression rule: {:?}", rule),
        }
    }

    fn parse_with_precedence(&self, pairs: Pairs<Rule>) -> ParseResult<Expr> {
        Self::pratt_parser()
            .map_primary(|primary| self.parse_postfix_expr(primary))
            .map_prefix(|op, operand: ParseResult<Expr>| {
                let operand = operand?;
                let op_span = Self::span_from_pair(&op);
                let op = match op.as_rule() {
                    Rule::op_neg => UnaryOp::Neg,
                    Rule::op_pos => UnaryOp::Plus,
                    Rule::op_not => UnaryOp::Not,
                    rule => unreachable!("Unexpected unary operator: {:?}", rule),
                };
                let span = Span::new(op_span.start, operand.span.end);
                Ok(self.expr(
                    ExprKind::Unary(UnaryExpr {
                        op,
                        operand: Box::new(operand),
                    }),
                    span,
                ))
            })
            .map_infix(|left: ParseResult<Expr>, op, right: ParseResult<Expr>| {
                let left = left?;
                let right = right?;
                let op = match op.as_rule() {
                    Rule::op_or => BinaryOp::Or,
                    Rule::op_and => BinaryOp::And,
                    Rule::op_eq => BinaryOp::Eq,
                    Rule::op_ne => BinaryOp::Ne,
                    Rule::op_lt => BinaryOp::Lt,
                    Rule::op_le => BinaryOp::Le,
                    Rule::op_gt => BinaryOp::Gt,
                    Rule::op_ge => BinaryOp::Ge,
                    Rule::op_add => BinaryOp::Add,
                    Rule::op_sub => BinaryOp::Sub,
                    Rule::op_mul => BinaryOp::Mul,
                    Rule::op_div => BinaryOp::Div,
                    Rule::op_rem => BinaryOp::Rem,
                    rule => unreachable!("Unexpected binary operator: {:?}", rule),
                };
                let span = Span::new(left.span.start, right.span.end);
                Ok(self.expr(
                    ExprKind::Binary(BinaryExpr {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    }),
                    span,
                ))
            })
            .parse(pairs)
    }

    /// Parse a primary followed by any number of call/selector/index/slice suffixes
    fn parse_postfix_expr(&self, pair: Pair<Rule>) -> ParseResult<Expr> {
        let mut inner = pair.into_inner();
        let mut expr = self.parse_primary(inner.next().unwrap())?;

        for suffix in inner {
            let end = suffix.as_span().end();
            let span = Span::new(expr.span.start, end);
            let kind = match suffix.as_rule() {
                Rule::call_suffix => {
                    let mut args = Vec::new();
                    let mut ellipsis = false;
                    for arg in suffix.into_inner() {
                        match arg.as_rule() {
                            Rule::ellipsis => ellipsis = true,
                            _ => args.push(self.parse_expr(arg)?),
                        }
                    }
                    ExprKind::Call(CallExpr {
                        func: Box::new(expr),
                        args,
                        ellipsis,
                    })
                }
                Rule::selector_suffix => {
                    let field = Self::parse_ident(suffix.into_inner().next().unwrap());
                    ExprKind::Selector(SelectorExpr {
                        operand: Box::new(expr),
                        field,
                    })
                }
                Rule::index_suffix => {
                    let index = self.parse_expr(suffix.into_inner().next().unwrap())?;
                    ExprKind::Index(IndexExpr {
                        operand: Box::new(expr),
                        index: Box::new(index),
                    })
                }
                Rule::slice_suffix => {
                    let mut low = None;
                    let mut high = None;
                    for bound in suffix.into_inner() {
                        let parsed = Box::new(self.parse_expr(bound.clone())?);
                        match bound.as_rule() {
                            Rule::slice_low => low = Some(parsed),
                            _ => high = Some(parsed),
                        }
                    }
                    ExprKind::Slice(SliceExpr {
                        operand: Box::new(expr),
                        low,
                        high,
                    })
                }
                rule => unreachable!("Unexpected postfix rule: {:?}", rule),
            };
            expr = self.expr(kind, span);
        }

        Ok(expr)
    }

    fn parse_primary(&self, pair: Pair<Rule>) -> ParseResult<Expr> {
        let span = Self::span_from_pair(&pair);

        let kind = match pair.as_rule() {
            Rule::ident => ExprKind::Ident(pair.as_str().to_string()),
            Rule::int_lit => ExprKind::Int(self.parse_int_lit(&pair)?),
            Rule::float_lit => ExprKind::Float(self.parse_float_lit(&pair)?),
            Rule::string_lit | Rule::raw_string_lit => {
                ExprKind::String(self.parse_string_lit(pair)?)
            }
            Rule::paren_expr => {
                let inner = self.parse_expr(pair.into_inner().next().unwrap())?;
                ExprKind::Paren(Box::new(inner))
            }
            Rule::func_lit => {
                let mut inner = Self::significant(pair);
                let signature = self.parse_signature(inner.next().unwrap())?;
                let body = self.parse_block(inner.next().unwrap())?;
                ExprKind::FuncLit(FuncLit { signature, body })
            }
            Rule::composite_lit | Rule::hdr_composite_lit => {
                let mut inner = pair.into_inner();
                let ty = self.parse_type_expr(inner.next().unwrap())?;
                let body = inner.next().unwrap();
                let mut elements = Vec::new();
                for element in body.into_inner() {
                    let mut parts: Vec<_> = element.into_inner().collect();
                    let value = self.parse_expr(parts.pop().unwrap())?;
                    let key = match parts.pop() {
                        Some(key) => Some(self.parse_expr(key)?),
                        None => None,
                    };
                    elements.push(Element { key, value });
                }
                ExprKind::Composite(CompositeLit { ty, elements })
            }
            Rule::type_operand => {
                ExprKind::Type(self.parse_type_expr(pair.into_inner().next().unwrap())?)
            }
            rule => unreachable!("Unexpected primary rule: {:?}", rule),
        };

        Ok(self.expr(kind, span))
    }
}
