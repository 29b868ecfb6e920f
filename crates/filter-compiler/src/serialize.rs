use model::{Clause, Condition, ConditionOp, Dnf, Operand};

/// Render a DNF as the backend's `or=(...)` predicate body. `None` when the
/// DNF places no constraint.
pub fn serialize(dnf: &Dnf) -> Option<String> {
    if dnf.is_empty() {
        return None;
    }

    let clauses = dnf.iter().map(render_clause).collect::<Vec<_>>();
    Some(clauses.join(","))
}

pub fn render_clause(clause: &Clause) -> String {
    match clause.conditions.as_slice() {
        [single] => render_condition(single),
        conditions => {
            let parts = conditions.iter().map(render_condition).collect::<Vec<_>>();
            format!("and({})", parts.join(","))
        }
    }
}

pub fn render_condition(condition: &Condition) -> String {
    let column = &condition.column;
    let not = if condition.negate { "not." } else { "" };
    let op = condition.op;

    match &condition.value {
        Operand::Null => format!("{column}.{not}is.null"),
        Operand::Text(value) | Operand::Date(value) => {
            format!("{column}.{not}{op}.{}", quote(value))
        }
        Operand::Number(value) => format!("{column}.{not}{op}.{value}"),
        Operand::List(values) => {
            let items = values.iter().map(|v| quote(v)).collect::<Vec<_>>().join(",");
            match op {
                ConditionOp::Overlap => format!("{column}.{not}{op}.{{{items}}}"),
                _ => format!("{column}.{not}{op}.({items})"),
            }
        }
    }
}

/// Quote a value that would otherwise break the predicate grammar.
pub fn quote(value: &str) -> String {
    let reserved = |c: char| matches!(c, ',' | '(' | ')' | '{' | '}' | '"' | '\\');
    let padded = value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace);

    if !padded && !value.chars().any(reserved) {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
