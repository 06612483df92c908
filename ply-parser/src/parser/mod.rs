// Ply Parser
// Pest-based parser producing the AST in `crate::ast`

use crate::ast::*;
use crate::error::*;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use std::cell::Cell;

mod declarations;
mod expressions;
mod literals;
mod statements;
mod types;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct PlyParser;

/// Converts pest pairs for one file into AST nodes.
///
/// Every expression gets the next [`ExprId`] for the file; ids are unique
/// within the file.
pub struct FileParser<'src> {
    file: FileId,
    name: String,
    source: &'src str,
    next_expr: Cell<u32>,
}

impl<'src> FileParser<'src> {
    pub fn new(source: &'src str, file: FileId, name: impl Into<String>) -> Self {
        Self {
            file,
            name: name.into(),
            source,
            next_expr: Cell::new(0),
        }
    }

    /// Parse a complete file (package clause, imports, declarations)
    pub fn parse_file(self) -> ParseResult<File> {
        let pairs = PlyParser::parse(Rule::file, self.source)
            .map_err(|e| ParseError::from_pest_error(e, &self.name, self.source))?;
        let file_pair = pairs.into_iter().next().unwrap();
        let span = Self::span_from_pair(&file_pair);

        let mut package = None;
        let mut imports = Vec::new();
        let mut decls = Vec::new();

        for pair in file_pair.into_inner() {
            match pair.as_rule() {
                Rule::package_clause => {
                    let ident = Self::significant(pair).next().unwrap();
                    package = Some(Self::parse_ident(ident));
                }
                Rule::import_decl => {
                    for spec in pair.into_inner() {
                        if spec.as_rule() == Rule::import_spec {
                            imports.push(self.parse_import_spec(spec)?);
                        }
                    }
                }
                Rule::EOI => {}
                _ => decls.push(self.parse_decl(pair)?),
            }
        }

        Ok(File {
            id: self.file,
            name: Some(self.name),
            source: self.source.to_string(),
            package: package.unwrap(),
            imports,
            decls,
            span,
        })
    }

    /// Parse a standalone expression (used by tests and tooling)
    pub fn parse_expression(self) -> ParseResult<Expr> {
        let pairs = PlyParser::parse(Rule::expr, self.source)
            .map_err(|e| ParseError::from_pest_error(e, &self.name, self.source))?;
        let pair = pairs.into_iter().next().unwrap();
        if pair.as_span().end() != self.source.trim_end().len() {
            let end = pair.as_span().end();
            let error = pest::error::Error::new_from_pos(
                pest::error::ErrorVariant::CustomError {
                    message: "unexpected trailing input".to_string(),
                },
                pest::Position::new(self.source, end).unwrap(),
            );
            return Err(ParseError::from_pest_error(error, &self.name, self.source));
        }
        self.parse_expr(pair)
    }

    fn parse_import_spec(&self, pair: Pair<Rule>) -> ParseResult<Import> {
        let span = Self::span_from_pair(&pair);
        let lit = pair.into_inner().next().unwrap();
        let path = self.parse_string_lit(lit)?;
        Ok(Import {
            path: path.value,
            span,
        })
    }

    pub(crate) fn next_id(&self) -> ExprId {
        let index = self.next_expr.get();
        self.next_expr.set(index + 1);
        ExprId::new(self.file, index)
    }

    pub(crate) fn expr(&self, kind: ExprKind, span: Span) -> Expr {
        Expr {
            id: self.next_id(),
            kind,
            span,
        }
    }

    /// Inner pairs without the keyword tokens the grammar emits.
    pub(crate) fn significant(pair: Pair<'_, Rule>) -> impl Iterator<Item = Pair<'_, Rule>> {
        pair.into_inner().filter(|p| !is_keyword(p.as_rule()))
    }

    pub(crate) fn parse_ident(pair: Pair<Rule>) -> Ident {
        Ident::new(pair.as_str(), Self::span_from_pair(&pair))
    }

    pub(crate) fn span_from_pair(pair: &Pair<Rule>) -> Span {
        let span = pair.as_span();
        Span::new(span.start(), span.end())
    }

    pub(crate) fn source_span(span: Span) -> miette::SourceSpan {
        miette::SourceSpan::new(span.start.into(), span.len())
    }

    pub(crate) fn named_source(&self) -> miette::NamedSource<String> {
        miette::NamedSource::new(&self.name, self.source.to_string())
    }

    pub(crate) fn file_name(&self) -> &str {
        &self.name
    }
}

fn is_keyword(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::kw_break
            | Rule::kw_const
            | Rule::kw_continue
            | Rule::kw_else
            | Rule::kw_for
            | Rule::kw_func
            | Rule::kw_if
            | Rule::kw_import
            | Rule::kw_interface
            | Rule::kw_map
            | Rule::kw_package
            | Rule::kw_range
            | Rule::kw_return
            | Rule::kw_struct
            | Rule::kw_type
            | Rule::kw_var
    )
}
