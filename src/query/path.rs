//! Query path parsing.
//!
//! Paths are dot separated, with optional brackets for positions:
//! `outputs.0.address`, `outputs[0].address` and `outputs[*].amount.coin`
//! all walk the same way. Numeric segments also address stringified CBOR map
//! keys, so `witnesses.0` selects the vkey witnesses and `metadata.674` a
//! metadata label.

use crate::error::{Error, Result};
use std::fmt;

/// One step of a query path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key.
    Field(String),
    /// Array position, or a numeric map key.
    Index(usize),
    /// Every element of an array, or every value of a map.
    Wildcard,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(idx) => write!(f, "{}", idx),
            PathSegment::Wildcard => f.write_str("*"),
        }
    }
}

/// A parsed query path.
#[derive(Debug, Clone, Default)]
pub struct QueryPath {
    pub segments: Vec<PathSegment>,
}

impl QueryPath {
    /// Parse a query path.
    ///
    /// - `"body.fee"` → `[Field("body"), Field("fee")]`
    /// - `"outputs[1].address"` → `[Field("outputs"), Index(1), Field("address")]`
    /// - `"certs.*.type"` → `[Field("certs"), Wildcard, Field("type")]`
    pub fn parse(input: &str) -> Result<Self> {
        let mut segments = Vec::new();
        if input.is_empty() {
            return Ok(QueryPath { segments });
        }

        for part in input.split('.') {
            parse_part(part, &mut segments)?;
        }

        Ok(QueryPath { segments })
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.contains(&PathSegment::Wildcard)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for QueryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Parse one dot-separated part: a name followed by any number of `[..]`.
fn parse_part(part: &str, segments: &mut Vec<PathSegment>) -> Result<()> {
    let (head, mut rest) = part.split_at(part.find('[').unwrap_or(part.len()));

    if head.is_empty() && rest.is_empty() {
        return Err(Error::InvalidQuery(
            "Empty path segment (consecutive dots?)".to_string(),
        ));
    }
    if !head.is_empty() {
        segments.push(parse_segment(head)?);
    }

    while let Some(bracketed) = rest.strip_prefix('[') {
        let end = bracketed
            .find(']')
            .ok_or_else(|| Error::InvalidQuery(format!("Unclosed '[' in '{}'", part)))?;
        let inner = &bracketed[..end];
        if inner.is_empty() {
            return Err(Error::InvalidQuery(format!("Empty brackets in '{}'", part)));
        }
        segments.push(parse_segment(inner)?);
        rest = &bracketed[end + 1..];
    }

    if !rest.is_empty() {
        return Err(Error::InvalidQuery(format!(
            "Unexpected '{}' after brackets in '{}'",
            rest, part
        )));
    }

    Ok(())
}

fn parse_segment(s: &str) -> Result<PathSegment> {
    if s == "*" {
        return Ok(PathSegment::Wildcard);
    }

    // Only canonical decimals are positions; "01" stays a key
    match s.parse::<usize>() {
        Ok(idx) if idx.to_string() == s => Ok(PathSegment::Index(idx)),
        _ => Ok(PathSegment::Field(s.to_string())),
    }
}
