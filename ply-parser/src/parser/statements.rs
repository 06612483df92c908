// Statement parsing module
// Handles blocks, assignments, control flow and loops

use crate::ast::*;
use crate::error::*;
use crate::parser::{FileParser, Rule};
use pest::iterators::Pair;

impl FileParser<'_> {
    pub(crate) fn parse_block(&self, pair: Pair<Rule>) -> ParseResult<Block> {
        let span = Self::span_from_pair(&pair);
        let mut stmts = Vec::new();
        for stmt in pair.into_inner() {
            stmts.push(self.parse_stmt(stmt)?);
        }
        Ok(Block { stmts, span })
    }

    pub(crate) fn parse_stmt(&self, pair: Pair<Rule>) -> ParseResult<Stmt> {
        let span = Self::span_from_pair(&pair);

        let kind = match pair.as_rule() {
            Rule::return_stmt => {
                let value = match Self::significant(pair).next() {
                    Some(expr) => Some(self.parse_expr(expr)?),
                    None => None,
                };
                StmtKind::Return(value)
            }
            Rule::break_stmt => StmtKind::Break,
            Rule::continue_stmt => StmtKind::Continue,
            Rule::var_stmt => {
                StmtKind::Var(self.parse_var_decl(pair.into_inner().next().unwrap())?)
            }
            Rule::const_stmt => {
                StmtKind::Const(self.parse_const_decl(pair.into_inner().next().unwrap())?)
            }
            Rule::block => StmtKind::Block(self.parse_block(pair)?),
            Rule::if_stmt => StmtKind::If(self.parse_if(pair)?),
            Rule::for_stmt => return self.parse_for(pair),
            Rule::for_init | Rule::for_post => {
                return self.parse_stmt(pair.into_inner().next().unwrap());
            }
            Rule::short_var_decl => {
                let mut inner = pair.into_inner();
                let name = Self::parse_ident(inner.next().unwrap());
                let value = self.parse_expr(inner.next().unwrap())?;
                StmtKind::ShortVar { name, value }
            }
            Rule::assign_stmt | Rule::hdr_assign_stmt => {
                let mut inner = pair.into_inner();
                let target = self.parse_expr(inner.next().unwrap())?;
                let op = match inner.next().unwrap().as_str() {
                    "=" => AssignOp::Assign,
                    "+=" => AssignOp::Add,
                    "-=" => AssignOp::Sub,
                    "*=" => AssignOp::Mul,
                    "/=" => AssignOp::Div,
                    "%=" => AssignOp::Rem,
                    op => unreachable!("Unexpected assignment operator: {:?}", op),
                };
                let value = self.parse_expr(inner.next().unwrap())?;
                StmtKind::Assign { target, op, value }
            }
            Rule::inc_dec_stmt | Rule::hdr_inc_dec_stmt => {
                let mut inner = pair.into_inner();
                let target = self.parse_expr(inner.next().unwrap())?;
                let increment = inner.next().unwrap().as_str() == "++";
                StmtKind::IncDec { target, increment }
            }
            Rule::expr_stmt => StmtKind::Expr(self.parse_expr(pair.into_inner().next().unwrap())?),
            rule => unreachable!("Unexpected statement rule: {:?}", rule),
        };

        Ok(Stmt { kind, span })
    }

    fn parse_if(&self, pair: Pair<Rule>) -> ParseResult<IfStmt> {
        let mut inner = Self::significant(pair);
        let cond = self.parse_expr(inner.next().unwrap())?;
        let then_block = self.parse_block(inner.next().unwrap())?;
        let else_branch = match inner.next() {
            Some(branch) if branch.as_rule() == Rule::if_stmt => {
                Some(Box::new(ElseBranch::If(self.parse_if(branch)?)))
            }
            Some(branch) => Some(Box::new(ElseBranch::Block(self.parse_block(branch)?))),
            None => None,
        };
        Ok(IfStmt {
            cond,
            then_block,
            else_branch,
        })
    }

    fn parse_for(&self, pair: Pair<Rule>) -> ParseResult<Stmt> {
        let span = Self::span_from_pair(&pair);
        let parts: Vec<_> = Self::significant(pair).collect();
        let (header, body) = match parts.as_slice() {
            [body] => (None, body.clone()),
            [header, body] => (Some(header.clone()), body.clone()),
            _ => unreachable!("Unexpected for statement shape"),
        };
        let body = self.parse_block(body)?;

        let kind = match header {
            None => StmtKind::For(ForStmt {
                init: None,
                cond: None,
                post: None,
                body,
            }),
            Some(header) => match header.as_rule() {
                Rule::range_clause => {
                    let mut names = Vec::new();
                    let mut iterable = None;
                    for part in Self::significant(header) {
                        match part.as_rule() {
                            Rule::ident => names.push(Self::parse_ident(part)),
                            _ => iterable = Some(self.parse_expr(part)?),
                        }
                    }
                    let mut names = names.into_iter();
                    StmtKind::Range(RangeStmt {
                        key: names.next(),
                        value: names.next(),
                        iterable: iterable.unwrap(),
                        body,
                    })
                }
                Rule::for_clause => {
                    let mut init = None;
                    let mut cond = None;
                    let mut post = None;
                    for part in header.into_inner() {
                        match part.as_rule() {
                            Rule::for_init => init = Some(Box::new(self.parse_stmt(part)?)),
                            Rule::for_post => post = Some(Box::new(self.parse_stmt(part)?)),
                            _ => cond = Some(self.parse_expr(part)?),
                        }
                    }
                    StmtKind::For(ForStmt {
                        init,
                        cond,
                        post,
                        body,
                    })
                }
                _ => StmtKind::For(ForStmt {
                    init: None,
                    cond: Some(self.parse_expr(header)?),
                    post: None,
                    body,
                }),
            },
        };

        Ok(Stmt { kind, span })
    }
}
