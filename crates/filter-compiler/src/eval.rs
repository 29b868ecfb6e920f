use model::{
    Clause, Condition, ConditionOp, Dnf, Operand,
    core::value::{Value, parse_timestamp},
};
use std::cmp::Ordering;

/// Whether `condition` holds for `record`.
///
/// A missing or null value fails every comparison regardless of `negate`,
/// the same way SQL `NULL` fails both `x > 1` and `NOT (x > 1)` once the
/// negation has been pushed into the operator. Only `is null` observes
/// nulls. A value that cannot be coerced to the operand's type fails too.
pub fn condition_holds(condition: &Condition, record: &serde_json::Value) -> bool {
    let actual = condition
        .column
        .lookup(record)
        .map_or(Value::Null, Value::from_json);

    if matches!(condition.value, Operand::Null) {
        return actual.is_null() != condition.negate;
    }
    if actual.is_null() {
        return false;
    }

    compare(condition.op, &actual, &condition.value).is_some_and(|held| held != condition.negate)
}

pub fn clause_holds(clause: &Clause, record: &serde_json::Value) -> bool {
    clause.iter().all(|condition| condition_holds(condition, record))
}

/// Whether any clause of `dnf` holds. An empty DNF constrains nothing.
pub fn dnf_holds(dnf: &Dnf, record: &serde_json::Value) -> bool {
    dnf.is_empty() || dnf.iter().any(|clause| clause_holds(clause, record))
}

fn compare(op: ConditionOp, actual: &Value, operand: &Operand) -> Option<bool> {
    match (op, operand) {
        (ConditionOp::Ilike, Operand::Text(pattern)) => {
            actual.as_text().map(|text| ilike(&text, pattern))
        }
        (ConditionOp::In, Operand::List(options)) => actual
            .as_text()
            .map(|text| options.iter().any(|option| *option == text)),
        (ConditionOp::Overlap, Operand::List(options)) => actual.as_list().map(|items| {
            items
                .iter()
                .filter_map(Value::as_text)
                .any(|item| options.contains(&item))
        }),
        (ConditionOp::Ilike | ConditionOp::In | ConditionOp::Overlap, _) => None,
        (op, operand) => {
            let (actual, expected) = coerce(actual, operand)?;
            ordering_holds(op, actual.compare(&expected)?)
        }
    }
}

/// Bring the record value and a scalar operand to the same `Value` shape.
fn coerce(actual: &Value, operand: &Operand) -> Option<(Value, Value)> {
    match operand {
        Operand::Number(expected) => {
            Some((Value::Number(actual.as_f64()?), Value::Number(*expected)))
        }
        Operand::Date(raw) => Some((
            Value::Timestamp(actual.as_timestamp()?),
            Value::Timestamp(parse_timestamp(raw)?),
        )),
        Operand::Text(expected) => {
            Some((Value::Text(actual.as_text()?), Value::Text(expected.clone())))
        }
        Operand::List(_) | Operand::Null => None,
    }
}

fn ordering_holds(op: ConditionOp, ordering: Ordering) -> Option<bool> {
    match op {
        ConditionOp::Eq => Some(ordering == Ordering::Equal),
        ConditionOp::Gt => Some(ordering == Ordering::Greater),
        ConditionOp::Lt => Some(ordering == Ordering::Less),
        ConditionOp::Gte => Some(ordering != Ordering::Less),
        ConditionOp::Lte => Some(ordering != Ordering::Greater),
        ConditionOp::Ilike | ConditionOp::In | ConditionOp::Overlap => None,
    }
}

/// Case-insensitive SQL `LIKE`: `%` matches any run, `_` one character,
/// `\` escapes the next pattern character.
pub fn ilike(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    let (mut t, mut p) = (0, 0);
    // Position of the last `%` and the text index it currently absorbs up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() {
            match pattern[p] {
                '%' => {
                    backtrack = Some((p, t));
                    p += 1;
                    continue;
                }
                '_' => {
                    t += 1;
                    p += 1;
                    continue;
                }
                '\\' if p + 1 < pattern.len() => {
                    if pattern[p + 1] == text[t] {
                        t += 1;
                        p += 2;
                        continue;
                    }
                }
                c if c == text[t] => {
                    t += 1;
                    p += 1;
                    continue;
                }
                _ => {}
            }
        }

        match backtrack {
            Some((star, absorbed)) => {
                p = star + 1;
                t = absorbed + 1;
                backtrack = Some((star, absorbed + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}
