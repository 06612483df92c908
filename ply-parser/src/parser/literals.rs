// Literal parsing module
// Handles integer, float and string literals (escapes resolved here)

use crate::ast::*;
use crate::error::*;
use crate::parser::{FileParser, Rule};
use pest::iterators::Pair;

impl FileParser<'_> {
    pub(crate) fn parse_int_lit(&self, pair: &Pair<Rule>) -> ParseResult<i64> {
        let text = pair.as_str();
        text.parse::<i64>()
            .map_err(|_| ParseError::InvalidInteger {
                file: self.file_name().to_string(),
                src: self.named_source(),
                span: Self::source_span(Self::span_from_pair(pair)),
                found: text.to_string(),
            })
    }

    pub(crate) fn parse_float_lit(&self, pair: &Pair<Rule>) -> ParseResult<FloatLiteral> {
        let text = pair.as_str();
        let value = text.parse::<f64>().map_err(|_| ParseError::InvalidFloat {
            file: self.file_name().to_string(),
            src: self.named_source(),
            span: Self::source_span(Self::span_from_pair(pair)),
            found: text.to_string(),
        })?;
        Ok(FloatLiteral {
            value,
            raw: text.to_string(),
        })
    }

    pub(crate) fn parse_string_lit(&self, pair: Pair<Rule>) -> ParseResult<StringLiteral> {
        let text = pair.as_str();
        let inner = &text[1..text.len() - 1];

        if pair.as_rule() == Rule::raw_string_lit {
            return Ok(StringLiteral {
                value: inner.to_string(),
                format: StringFormat::Raw,
            });
        }

        let span = Self::span_from_pair(&pair);
        let mut value = String::with_capacity(inner.len());
        let mut chars = inner.char_indices();
        while let Some((offset, ch)) = chars.next() {
            if ch != '\\' {
                value.push(ch);
                continue;
            }
            let escaped = match chars.next() {
                Some((_, 'n')) => '\n',
                Some((_, 't')) => '\t',
                Some((_, 'r')) => '\r',
                Some((_, '\\')) => '\\',
                Some((_, '"')) => '"',
                Some((_, '\'')) => '\'',
                Some((_, '0')) => '\0',
                Some((_, 'x')) => {
                    let hex: String = chars.by_ref().take(2).map(|(_, c)| c).collect();
                    match u8::from_str_radix(&hex, 16) {
                        Ok(byte) => byte as char,
                        Err(_) => return Err(self.invalid_escape(span, offset, &hex)),
                    }
                }
                Some((_, other)) => return Err(self.invalid_escape(span, offset, &other.to_string())),
                None => return Err(self.invalid_escape(span, offset, "")),
            };
            value.push(escaped);
        }

        Ok(StringLiteral {
            value,
            format: StringFormat::Interpreted,
        })
    }

    fn invalid_escape(&self, literal: Span, offset: usize, found: &str) -> ParseError {
        // +1 skips the opening quote
        let start = literal.start + 1 + offset;
        ParseError::InvalidStringEscape {
            file: self.file_name().to_string(),
            src: self.named_source(),
            span: Self::source_span(Span::new(start, start + 2 + found.len())),
            found: format!("\\{}", found),
        }
    }
}
