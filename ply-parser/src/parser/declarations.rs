// Declaration parsing module
// Handles functions, methods, type, const and var declarations

use crate::ast::*;
use crate::error::*;
use crate::parser::{FileParser, Rule};
use pest::iterators::Pair;

impl FileParser<'_> {
    /// Parse one top-level declaration
    pub(crate) fn parse_decl(&self, pair: Pair<Rule>) -> ParseResult<Decl> {
        match pair.as_rule() {
            Rule::func_decl => Ok(Decl::Func(self.parse_func_decl(pair)?)),
            Rule::type_decl => Ok(Decl::Type(self.parse_type_decl(pair)?)),
            Rule::const_decl => Ok(Decl::Const(self.parse_const_decl(pair)?)),
            Rule::var_decl => Ok(Decl::Var(self.parse_var_decl(pair)?)),
            rule => unreachable!("Unexpected declaration rule: {:?}", rule),
        }
    }

    fn parse_func_decl(&self, pair: Pair<Rule>) -> ParseResult<FuncDecl> {
        let span = Self::span_from_pair(&pair);
        let mut inner = Self::significant(pair).peekable();

        let receiver = if inner.peek().map(|p| p.as_rule()) == Some(Rule::receiver) {
            let mut parts = inner.next().unwrap().into_inner();
            let name = Self::parse_ident(parts.next().unwrap());
            let ty = self.parse_type_expr(parts.next().unwrap())?;
            Some(Receiver { name, ty })
        } else {
            None
        };

        let name = Self::parse_ident(inner.next().unwrap());
        let signature = self.parse_signature(inner.next().unwrap())?;
        let body = self.parse_block(inner.next().unwrap())?;

        Ok(FuncDecl {
            receiver,
            name,
            signature,
            body,
            span,
        })
    }

    pub(crate) fn parse_signature(&self, pair: Pair<Rule>) -> ParseResult<Signature> {
        let mut inner = pair.into_inner();
        let params_pair = inner.next().unwrap();

        let mut params = Vec::new();
        for group in params_pair.into_inner() {
            let mut names = Vec::new();
            let mut variadic = false;
            let mut ty = None;
            for part in group.into_inner() {
                match part.as_rule() {
                    Rule::ident => names.push(Self::parse_ident(part)),
                    Rule::variadic => variadic = true,
                    Rule::type_expr => ty = Some(self.parse_type_expr(part)?),
                    rule => unreachable!("Unexpected parameter rule: {:?}", rule),
                }
            }
            let ty = ty.unwrap();
            for name in names {
                params.push(Param {
                    name,
                    ty: ty.clone(),
                    variadic,
                });
            }
        }

        let result = match inner.next() {
            Some(result) => Some(self.parse_type_expr(result.into_inner().next().unwrap())?),
            None => None,
        };

        Ok(Signature { params, result })
    }

    fn parse_type_decl(&self, pair: Pair<Rule>) -> ParseResult<TypeDecl> {
        let span = Self::span_from_pair(&pair);
        let mut inner = Self::significant(pair);
        let name = Self::parse_ident(inner.next().unwrap());
        let ty = self.parse_type_expr(inner.next().unwrap())?;
        Ok(TypeDecl { name, ty, span })
    }

    pub(crate) fn parse_const_decl(&self, pair: Pair<Rule>) -> ParseResult<ConstDecl> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut ty = None;
        let mut value = None;
        for part in Self::significant(pair) {
            match part.as_rule() {
                Rule::ident => name = Some(Self::parse_ident(part)),
                Rule::type_expr => ty = Some(self.parse_type_expr(part)?),
                Rule::expr => value = Some(self.parse_expr(part)?),
                rule => unreachable!("Unexpected const rule: {:?}", rule),
            }
        }
        Ok(ConstDecl {
            name: name.unwrap(),
            ty,
            value: value.unwrap(),
            span,
        })
    }

    pub(crate) fn parse_var_decl(&self, pair: Pair<Rule>) -> ParseResult<VarDecl> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut ty = None;
        let mut value = None;
        for part in Self::significant(pair) {
            match part.as_rule() {
                Rule::ident => name = Some(Self::parse_ident(part)),
                Rule::type_expr => ty = Some(self.parse_type_expr(part)?),
                Rule::expr => value = Some(self.parse_expr(part)?),
                rule => unreachable!("Unexpected var rule: {:?}", rule),
            }
        }
        Ok(VarDecl {
            name: name.unwrap(),
            ty,
            value,
            span,
        })
    }
}
