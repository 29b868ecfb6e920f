use model::{ActiveFilter, FieldType, FilterGroup, Operator};

/// Merge a free-text search into `tree`: an OR of `contains` leaves, one
/// per searchable field, AND-ed with whatever the tree already requires.
/// Blank text or no fields leaves the tree untouched.
pub fn with_search<S: AsRef<str>>(
    tree: Option<FilterGroup>,
    field_ids: &[S],
    text: &str,
) -> Option<FilterGroup> {
    let text = text.trim();
    if text.is_empty() || field_ids.is_empty() {
        return tree;
    }

    let search = FilterGroup::or(
        field_ids
            .iter()
            .map(|id| {
                ActiveFilter::new(id.as_ref(), FieldType::Text, Operator::Contains, [text]).into()
            })
            .collect(),
    );

    match tree {
        Some(tree) if !tree.is_empty() => Some(FilterGroup::and(vec![tree.into(), search.into()])),
        _ => Some(search),
    }
}
