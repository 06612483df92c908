// Type parsing module
// Handles slice, map, func, struct, interface and named type syntax

use crate::ast::*;
use crate::error::*;
use crate::parser::{FileParser, Rule};
use pest::iterators::Pair;

impl FileParser<'_> {
    /// Parse a type expression; accepts `type_expr` or any concrete type rule
    pub(crate) fn parse_type_expr(&self, pair: Pair<Rule>) -> ParseResult<TypeExpr> {
        let span = Self::span_from_pair(&pair);

        let kind = match pair.as_rule() {
            Rule::type_expr => {
                let inner = pair.into_inner().next().unwrap();
                return self.parse_type_expr(inner);
            }
            Rule::type_name => {
                let ident = pair.into_inner().next().unwrap();
                TypeExprKind::Name(ident.as_str().to_string())
            }
            Rule::slice_type => {
                let elem = pair.into_inner().next().unwrap();
                TypeExprKind::Slice(Box::new(self.parse_type_expr(elem)?))
            }
            Rule::map_type => {
                let mut inner = Self::significant(pair);
                let key = self.parse_type_expr(inner.next().unwrap())?;
                let value = self.parse_type_expr(inner.next().unwrap())?;
                TypeExprKind::Map(Box::new(key), Box::new(value))
            }
            Rule::func_type => {
                let mut params = Vec::new();
                let mut variadic = false;
                let mut result = None;
                for part in Self::significant(pair) {
                    match part.as_rule() {
                        Rule::param_type => {
                            for piece in part.into_inner() {
                                match piece.as_rule() {
                                    Rule::variadic => variadic = true,
                                    _ => params.push(self.parse_type_expr(piece)?),
                                }
                            }
                        }
                        Rule::type_expr => result = Some(Box::new(self.parse_type_expr(part)?)),
                        rule => unreachable!("Unexpected func type rule: {:?}", rule),
                    }
                }
                TypeExprKind::Func(FuncTypeExpr {
                    params,
                    variadic,
                    result,
                })
            }
            Rule::struct_type => {
                let mut fields = Vec::new();
                for field in Self::significant(pair) {
                    let mut inner = field.into_inner();
                    let name = Self::parse_ident(inner.next().unwrap());
                    let ty = self.parse_type_expr(inner.next().unwrap())?;
                    fields.push(FieldDecl { name, ty });
                }
                TypeExprKind::Struct(fields)
            }
            Rule::interface_type => TypeExprKind::Interface,
            rule => unreachable!("Unexpected type rule: {:?}", rule),
        };

        Ok(TypeExpr { kind, span })
    }
}
