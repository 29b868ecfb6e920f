//! A tiny stand-in for the query backend. It reads the `or=(...)` predicate
//! grammar from scratch and evaluates it over fixture records with SQL null
//! semantics, so compiled predicates can be checked end to end without a
//! database.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::cmp::Ordering;
use thiserror::Error;

const OPERATORS: [&str; 9] = ["eq", "gt", "lt", "gte", "lte", "ilike", "in", "ov", "is"];

#[derive(Debug, Error, PartialEq)]
pub enum BackendError {
    #[error("unbalanced predicate: {0}")]
    Unbalanced(String),
    #[error("malformed condition: {0}")]
    Malformed(String),
    #[error("bad literal for '{op}': {raw}")]
    BadLiteral { op: String, raw: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Scalar(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub path: String,
    pub negate: bool,
    pub op: String,
    pub value: Literal,
}

pub struct FixtureBackend {
    records: Vec<Value>,
}

impl FixtureBackend {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }

    /// Rows matching `predicate`; `None` returns every row.
    pub fn query(&self, predicate: Option<&str>) -> Result<Vec<&Value>, BackendError> {
        let Some(predicate) = predicate else {
            return Ok(self.records.iter().collect());
        };

        let clauses = parse(predicate)?;
        Ok(self
            .records
            .iter()
            .filter(|record| {
                clauses
                    .iter()
                    .any(|clause| clause.iter().all(|p| holds(p, record)))
            })
            .collect())
    }
}

/// Parse a predicate body into clauses of conditions.
pub fn parse(input: &str) -> Result<Vec<Vec<Predicate>>, BackendError> {
    split_top(input)?.into_iter().map(parse_clause).collect()
}

fn parse_clause(item: &str) -> Result<Vec<Predicate>, BackendError> {
    match item.strip_prefix("and(").and_then(|r| r.strip_suffix(')')) {
        Some(inner) => split_top(inner)?.into_iter().map(parse_condition).collect(),
        None => Ok(vec![parse_condition(item)?]),
    }
}

fn split_top(input: &str) -> Result<Vec<&str>, BackendError> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quoted = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if quoted {
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => quoted = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => quoted = true,
            '(' | '{' => depth += 1,
            ')' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        if depth < 0 {
            return Err(BackendError::Unbalanced(input.to_string()));
        }
    }

    if quoted || depth != 0 {
        return Err(BackendError::Unbalanced(input.to_string()));
    }
    parts.push(&input[start..]);
    Ok(parts)
}

/// `path.[not.]op.value`, where the path may itself contain dots.
fn parse_condition(input: &str) -> Result<Predicate, BackendError> {
    for (i, _) in input.match_indices('.') {
        let rest = &input[i + 1..];
        let (negate, rest) = match rest.strip_prefix("not.") {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        if let Some((op, raw)) = rest.split_once('.')
            && OPERATORS.contains(&op)
        {
            return Ok(Predicate {
                path: input[..i].to_string(),
                negate,
                op: op.to_string(),
                value: parse_literal(op, raw)?,
            });
        }
    }
    Err(BackendError::Malformed(input.to_string()))
}

fn parse_literal(op: &str, raw: &str) -> Result<Literal, BackendError> {
    let bad = || BackendError::BadLiteral {
        op: op.to_string(),
        raw: raw.to_string(),
    };

    match op {
        "is" if raw == "null" => Ok(Literal::Null),
        "is" => Err(bad()),
        "in" | "ov" => {
            let (open, close) = if op == "in" { ('(', ')') } else { ('{', '}') };
            let inner = raw
                .strip_prefix(open)
                .and_then(|r| r.strip_suffix(close))
                .ok_or_else(bad)?;
            Ok(Literal::List(
                split_top(inner)?.into_iter().map(unquote).collect(),
            ))
        }
        _ => Ok(Literal::Scalar(unquote(raw))),
    }
}

fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn lookup<'a>(path: &str, record: &'a Value) -> Option<&'a Value> {
    let found = if let Some((base, key)) = path.split_once("->>") {
        record.get(base)?.get(key.trim_matches('\''))?
    } else if let Some((entity, field)) = path.split_once('.') {
        record.get(entity)?.get(field)?
    } else {
        record.get(path)?
    };
    (!found.is_null()).then_some(found)
}

/// SQL evaluation: anything compared with NULL is unknown, and unknown
/// rows are filtered out whether or not the comparison is negated.
pub fn holds(predicate: &Predicate, record: &Value) -> bool {
    let value = lookup(&predicate.path, record);
    match (&predicate.value, value) {
        (Literal::Null, value) => value.is_none() != predicate.negate,
        (_, None) => false,
        (literal, Some(value)) => compare(&predicate.op, value, literal)
            .is_some_and(|held| held != predicate.negate),
    }
}

fn compare(op: &str, value: &Value, literal: &Literal) -> Option<bool> {
    match (op, literal) {
        ("ilike", Literal::Scalar(pattern)) => {
            let text: Vec<char> = as_text(value)?.to_lowercase().chars().collect();
            let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
            Some(like(&text, &pattern))
        }
        ("in", Literal::List(items)) => Some(items.contains(&as_text(value)?)),
        ("ov", Literal::List(items)) => value.as_array().map(|array| {
            array
                .iter()
                .filter_map(as_text)
                .any(|item| items.contains(&item))
        }),
        (op, Literal::Scalar(raw)) => {
            let ordering = order(value, raw)?;
            match op {
                "eq" => Some(ordering == Ordering::Equal),
                "gt" => Some(ordering == Ordering::Greater),
                "lt" => Some(ordering == Ordering::Less),
                "gte" => Some(ordering != Ordering::Less),
                "lte" => Some(ordering != Ordering::Greater),
                _ => None,
            }
        }
        _ => None,
    }
}

fn order(value: &Value, raw: &str) -> Option<Ordering> {
    match value {
        Value::Number(n) => n.as_f64()?.partial_cmp(&raw.parse::<f64>().ok()?),
        Value::String(text) => match (date(text), date(raw)) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => Some(text.as_str().cmp(raw)),
        },
        Value::Bool(b) => Some(b.to_string().as_str().cmp(raw)),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn like(text: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('%', rest)) => (0..=text.len()).any(|i| like(&text[i..], rest)),
        Some(('_', rest)) => !text.is_empty() && like(&text[1..], rest),
        Some(('\\', rest)) if !rest.is_empty() => {
            text.first() == rest.first() && like(&text[1..], &rest[1..])
        }
        Some((c, rest)) => text.first() == Some(c) && like(&text[1..], rest),
    }
}
