use crate::{
    emit::DnfEmitter,
    resolve::{LeafTarget, resolve_target},
};
use model::{
    ActiveFilter, ColumnPath, Condition, ConditionOp, CustomResolver, Dnf, FieldConfigMap,
    FieldType, Operand, Operator,
    core::value::{parse_number, parse_timestamp},
};
use tracing::{debug, warn};

/// Sink for the primitive conditions a leaf lowers to. The DNF compiler
/// collects them into clauses; the record matcher evaluates them on the spot.
pub trait Emitter {
    type Output;

    fn condition(&self, condition: Condition) -> Self::Output;

    fn all_of(&self, parts: Vec<Self::Output>) -> Self::Output;

    fn any_of(&self, parts: Vec<Self::Output>) -> Self::Output;
}

/// Lower one leaf into `emitter` under the ambient negation.
///
/// Returns `None` when the leaf places no constraint: missing values, a
/// `between` with a single bound, unparsable numbers or dates, or a
/// type/operator pair with no lowering.
pub fn lower_leaf<E: Emitter>(
    filter: &ActiveFilter,
    field_type: FieldType,
    is_array: bool,
    column: &ColumnPath,
    negate: bool,
    emitter: &E,
) -> Option<E::Output> {
    if filter.operator == Operator::Unknown || field_type == FieldType::Unknown {
        warn!(
            field = %filter.field_id,
            "Unrecognised operator or field type, skipping filter"
        );
        return None;
    }

    let values = filter.present_values();
    if values.is_empty() || values.len() < filter.operator.required_values() {
        debug!(
            field = %filter.field_id,
            operator = %filter.operator,
            "Filter has no usable values, skipping"
        );
        return None;
    }

    let first = values[0];
    let emit = |op: ConditionOp, value: Operand, negate: bool| {
        emitter.condition(Condition::new(column.clone(), op, value).with_negate(negate))
    };

    let output = match (field_type, filter.operator) {
        (FieldType::Text, Operator::Contains) => {
            emit(ConditionOp::Ilike, Operand::Text(format!("%{first}%")), negate)
        }
        (FieldType::Text, Operator::NotContains) => {
            emit(ConditionOp::Ilike, Operand::Text(format!("%{first}%")), !negate)
        }
        (FieldType::Text, Operator::Equals) => {
            emit(ConditionOp::Ilike, Operand::Text(first.to_string()), negate)
        }
        (FieldType::Text, Operator::NotEquals) => {
            emit(ConditionOp::Ilike, Operand::Text(first.to_string()), !negate)
        }

        (FieldType::Number, Operator::Equals) => {
            emit(ConditionOp::Eq, number(filter, first)?, negate)
        }
        (FieldType::Number, Operator::NotEquals) => {
            emit(ConditionOp::Eq, number(filter, first)?, !negate)
        }
        (FieldType::Number, Operator::GreaterThan) => emit(
            range(ConditionOp::Gt, negate),
            number(filter, first)?,
            false,
        ),
        (FieldType::Number, Operator::LessThan) => emit(
            range(ConditionOp::Lt, negate),
            number(filter, first)?,
            false,
        ),

        (FieldType::Date, Operator::Equals) => emit(ConditionOp::Eq, date(filter, first)?, negate),
        (FieldType::Date, Operator::Before) => {
            emit(range(ConditionOp::Lt, negate), date(filter, first)?, false)
        }
        (FieldType::Date, Operator::After) => {
            emit(range(ConditionOp::Gt, negate), date(filter, first)?, false)
        }
        (FieldType::Date, Operator::Between) => {
            let start = date(filter, values[0])?;
            let end = date(filter, values[1])?;
            if negate {
                emitter.any_of(vec![
                    emit(ConditionOp::Lt, start, false),
                    emit(ConditionOp::Gt, end, false),
                ])
            } else {
                emitter.all_of(vec![
                    emit(ConditionOp::Gte, start, false),
                    emit(ConditionOp::Lte, end, false),
                ])
            }
        }

        (FieldType::Select | FieldType::Multiselect, op @ (Operator::Is | Operator::IsNot)) => {
            let negate = negate != (op == Operator::IsNot);
            let owned = || values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
            if is_array {
                emit(ConditionOp::Overlap, Operand::List(owned()), negate)
            } else if values.len() == 1 {
                emit(ConditionOp::Eq, Operand::Text(first.to_string()), negate)
            } else {
                emit(ConditionOp::In, Operand::List(owned()), negate)
            }
        }

        (field_type, operator) => {
            debug!(
                field = %filter.field_id,
                %field_type,
                %operator,
                "Unsupported operator for field type, skipping"
            );
            return None;
        }
    };

    Some(output)
}

/// Resolve a leaf to its DNF fragment. An empty fragment means the leaf
/// does not constrain the result.
pub fn resolve_leaf(filter: &ActiveFilter, negate: bool, configs: &FieldConfigMap) -> Dnf {
    match resolve_target(filter, configs) {
        LeafTarget::Custom(resolver) => custom_fragment(&resolver, filter, negate),
        LeafTarget::Column {
            column,
            field_type,
            is_array,
        } => lower_leaf(filter, field_type, is_array, &column, negate, &DnfEmitter)
            .unwrap_or_default(),
    }
}

pub(crate) fn custom_fragment(
    resolver: &CustomResolver,
    filter: &ActiveFilter,
    negate: bool,
) -> Dnf {
    let mut fragment = resolver.resolve(filter, negate);
    let stripped = fragment.strip_empty_clauses();
    if stripped > 0 {
        warn!(
            field = %filter.field_id,
            stripped,
            "Custom resolver returned empty clauses, dropping them"
        );
    }
    fragment
}

/// Flip a range comparison into its complement when negated.
fn range(op: ConditionOp, negate: bool) -> ConditionOp {
    if !negate {
        return op;
    }
    match op {
        ConditionOp::Gt => ConditionOp::Lte,
        ConditionOp::Lt => ConditionOp::Gte,
        ConditionOp::Gte => ConditionOp::Lt,
        ConditionOp::Lte => ConditionOp::Gt,
        other => other,
    }
}

fn number(filter: &ActiveFilter, raw: &str) -> Option<Operand> {
    match parse_number(raw) {
        Some(n) => Some(Operand::Number(n)),
        None => {
            warn!(
                field = %filter.field_id,
                value = raw,
                "Value is not a number, skipping filter"
            );
            None
        }
    }
}

fn date(filter: &ActiveFilter, raw: &str) -> Option<Operand> {
    match parse_timestamp(raw) {
        Some(_) => Some(Operand::Date(raw.to_string())),
        None => {
            warn!(
                field = %filter.field_id,
                value = raw,
                "Value is not a date, skipping filter"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Clause, FieldFilterConfig};
    use tracing_test::traced_test;

    fn leaf(field: &str, ty: FieldType, op: Operator, values: &[&str]) -> ActiveFilter {
        ActiveFilter::new(field, ty, op, values.iter().copied())
    }

    fn cond(column: &str, op: ConditionOp, value: Operand, negate: bool) -> Condition {
        Condition::new(ColumnPath::direct(column), op, value).with_negate(negate)
    }

    fn resolve(filter: &ActiveFilter, negate: bool) -> Dnf {
        resolve_leaf(filter, negate, &FieldConfigMap::new())
    }

    #[test]
    fn test_text_operators() {
        let contains = leaf("city", FieldType::Text, Operator::Contains, &["tel"]);
        let pattern = Operand::Text("%tel%".into());
        assert_eq!(
            resolve(&contains, false),
            Dnf::single(cond("city", ConditionOp::Ilike, pattern.clone(), false))
        );
        assert_eq!(
            resolve(&contains, true),
            Dnf::single(cond("city", ConditionOp::Ilike, pattern, true))
        );

        let not_equals = leaf("city", FieldType::Text, Operator::NotEquals, &["Paris"]);
        assert_eq!(
            resolve(&not_equals, false),
            Dnf::single(cond(
                "city",
                ConditionOp::Ilike,
                Operand::Text("Paris".into()),
                true
            ))
        );
    }

    #[test]
    fn test_range_flips_under_negation() {
        let gt = leaf("age", FieldType::Number, Operator::GreaterThan, &["30"]);
        assert_eq!(
            resolve(&gt, true),
            Dnf::single(cond("age", ConditionOp::Lte, Operand::Number(30.0), false))
        );

        let before = leaf("created", FieldType::Date, Operator::Before, &["2024-01-01"]);
        assert_eq!(
            resolve(&before, true),
            Dnf::single(cond(
                "created",
                ConditionOp::Gte,
                Operand::Date("2024-01-01".into()),
                false
            ))
        );
    }

    #[test]
    fn test_between() {
        let between = leaf(
            "created",
            FieldType::Date,
            Operator::Between,
            &["2024-01-01", "2024-12-31"],
        );
        let start = Operand::Date("2024-01-01".into());
        let end = Operand::Date("2024-12-31".into());

        assert_eq!(
            resolve(&between, false),
            Dnf::from_clauses(vec![Clause::new(vec![
                cond("created", ConditionOp::Gte, start.clone(), false),
                cond("created", ConditionOp::Lte, end.clone(), false),
            ])])
        );
        assert_eq!(
            resolve(&between, true),
            Dnf::from_clauses(vec![
                Clause::single(cond("created", ConditionOp::Lt, start, false)),
                Clause::single(cond("created", ConditionOp::Gt, end, false)),
            ])
        );

        let half_open = leaf(
            "created",
            FieldType::Date,
            Operator::Between,
            &["2024-01-01", " "],
        );
        assert!(resolve(&half_open, false).is_empty());
    }

    #[test]
    fn test_select_scalar_and_array() {
        let is = leaf("status", FieldType::Select, Operator::Is, &["a", "b", "c"]);
        let list = Operand::List(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(
            resolve(&is, false),
            Dnf::single(cond("status", ConditionOp::In, list.clone(), false))
        );

        let mut configs = FieldConfigMap::new();
        configs.insert("status".into(), FieldFilterConfig::column("status").array());
        assert_eq!(
            resolve_leaf(&is, false, &configs),
            Dnf::single(cond("status", ConditionOp::Overlap, list, false))
        );

        let is_not = leaf("status", FieldType::Select, Operator::IsNot, &["a"]);
        assert_eq!(
            resolve(&is_not, true),
            Dnf::single(cond(
                "status",
                ConditionOp::Eq,
                Operand::Text("a".into()),
                false
            ))
        );
    }

    #[test]
    fn test_unsupported_pair_is_inert() {
        let odd = leaf("age", FieldType::Number, Operator::Contains, &["3"]);
        assert!(resolve(&odd, false).is_empty());

        let blank = leaf("city", FieldType::Text, Operator::Contains, &["", "  "]);
        assert!(resolve(&blank, false).is_empty());
    }

    #[test]
    #[traced_test]
    fn test_unrecognised_operator_and_type_are_inert() {
        let starts_with = leaf("name", FieldType::Text, Operator::Unknown, &["Da"]);
        assert!(resolve(&starts_with, false).is_empty());
        assert!(resolve(&starts_with, true).is_empty());

        let currency = leaf("price", FieldType::Unknown, Operator::Equals, &["10"]);
        assert!(resolve(&currency, false).is_empty());
        assert!(logs_contain("Unrecognised operator or field type"));
    }

    #[test]
    #[traced_test]
    fn test_malformed_values_are_logged() {
        let bad_number = leaf("age", FieldType::Number, Operator::Equals, &["thirty"]);
        assert!(resolve(&bad_number, false).is_empty());
        assert!(logs_contain("Value is not a number"));

        let bad_date = leaf("created", FieldType::Date, Operator::After, &["yesterday"]);
        assert!(resolve(&bad_date, false).is_empty());
        assert!(logs_contain("Value is not a date"));
    }

    #[test]
    #[traced_test]
    fn test_custom_resolver_receives_negation() {
        let mut configs = FieldConfigMap::new();
        configs.insert(
            "overdue".into(),
            FieldFilterConfig::custom(|_, negate| {
                Dnf::from_clauses(vec![
                    Clause::new(vec![]),
                    Clause::single(
                        Condition::is_null(ColumnPath::direct("paid_at")).with_negate(negate),
                    ),
                ])
            }),
        );
        let filter = leaf("overdue", FieldType::Select, Operator::Is, &["yes"]);

        let fragment = resolve_leaf(&filter, true, &configs);
        assert_eq!(
            fragment,
            Dnf::single(Condition::is_null(ColumnPath::direct("paid_at")).with_negate(true))
        );
        assert!(logs_contain("Custom resolver returned empty clauses"));
    }
}
