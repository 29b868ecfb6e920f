use model::{
    ActiveFilter, ColumnPath, Condition, Dnf, FieldConfigMap, FieldFilterConfig, FieldType,
    FilterField, JoinType, Operator,
};
use serde_json::{Value, json};

/// Customer records as the backend would return them.
pub fn records() -> Vec<Value> {
    vec![
        json!({
            "id": 1, "name": "Dana Levi", "city": "Tel Aviv", "age": 34,
            "status": "active", "tags": ["vip", "eu"], "created_at": "2024-01-15",
            "customer_data": { "tier": "gold" }, "team": { "name": "Platform" },
            "meta": { "region": "north" }, "paid_at": null,
        }),
        json!({
            "id": 2, "name": "Omer Katz", "city": "Haifa, North", "age": 41,
            "status": "pending", "tags": ["us"], "created_at": "2024-02-20T09:30:00",
            "customer_data": { "tier": "silver" }, "team": { "name": "Billing" },
            "meta": { "region": "north" }, "paid_at": "2024-02-21",
        }),
        json!({
            "id": 3, "name": "Noa Ben David", "city": "Eilat", "age": 22,
            "status": "archived", "tags": [], "created_at": "2023-12-31",
            "customer_data": { "tier": "gold" }, "team": { "name": "Platform" },
            "meta": { "region": "south" }, "paid_at": "2024-01-02",
        }),
        json!({
            "id": 4, "name": "Yossi Tal", "city": "Tel Mond", "age": null,
            "status": "active", "tags": null, "created_at": "2024-03-05",
            "customer_data": {}, "team": null, "paid_at": null,
        }),
        json!({
            "id": 5, "name": "Maya Cohen", "city": null, "age": 30,
            "status": "pending", "tags": ["eu"], "created_at": null,
            "customer_data": { "tier": "bronze" }, "team": { "name": "Growth" },
            "meta": { "region": "center" },
        }),
        json!({
            "id": 6, "name": "Ari Stern", "age": 58,
            "status": "active", "tags": ["vip", "us"], "created_at": "2024-02-28",
            "team": { "name": "platform ops" }, "meta": {}, "paid_at": "2024-03-01",
        }),
    ]
}

pub fn ids<'a>(records: impl IntoIterator<Item = &'a Value>) -> Vec<i64> {
    records
        .into_iter()
        .filter_map(|record| record["id"].as_i64())
        .collect()
}

/// The field catalog the filter builder offers for customers.
pub fn fields() -> Vec<FilterField> {
    vec![
        FilterField::new("name", "Name", FieldType::Text),
        FilterField::new("city", "City", FieldType::Text),
        FilterField::new("age", "Age", FieldType::Number),
        FilterField::new("status", "Status", FieldType::Select)
            .with_options(["active", "pending", "archived"]),
        FilterField::new("tags", "Tags", FieldType::Multiselect)
            .with_options(["vip", "eu", "us"]),
        FilterField::new("created", "Created", FieldType::Date),
        FilterField::new("customer.tier", "Tier", FieldType::Select)
            .with_options(["gold", "silver", "bronze"]),
        FilterField::new("team.name", "Team", FieldType::Text)
            .with_operators([Operator::Contains, Operator::Equals]),
        FilterField::new("region", "Region", FieldType::Select),
        FilterField::new("unpaid", "Unpaid", FieldType::Select).with_options(["yes"]),
    ]
}

pub fn configs() -> FieldConfigMap {
    let mut configs = FieldConfigMap::new();
    configs.insert(
        "tags".into(),
        FieldFilterConfig::column("tags")
            .with_type(FieldType::Multiselect)
            .array(),
    );
    configs.insert("created".into(), FieldFilterConfig::column("created_at"));
    configs.insert(
        "customer.tier".into(),
        FieldFilterConfig::related("customer", JoinType::Jsonb),
    );
    configs.insert(
        "team.name".into(),
        FieldFilterConfig::related("team", JoinType::Through),
    );
    configs.insert(
        "region".into(),
        FieldFilterConfig::default().with_related_path("meta->>'region'"),
    );
    configs.insert(
        "unpaid".into(),
        FieldFilterConfig::custom(|_, negate| {
            Dnf::single(Condition::is_null(ColumnPath::direct("paid_at")).with_negate(negate))
        }),
    );
    configs
}

fn leaf(field: &str, ty: FieldType, op: Operator, values: &[&str]) -> ActiveFilter {
    ActiveFilter::new(field, ty, op, values.iter().copied())
}

/// Leaves covering every lowering, including a few that constrain nothing.
pub fn leaf_pool() -> Vec<ActiveFilter> {
    use FieldType::*;
    use Operator::*;

    vec![
        leaf("name", Text, Contains, &["an"]),
        leaf("name", Text, NotContains, &["le"]),
        leaf("name", Text, Equals, &["dana levi"]),
        leaf("name", Text, NotEquals, &["Omer Katz"]),
        leaf("name", Text, Contains, &[" "]),
        leaf("city", Text, Contains, &["tel"]),
        leaf("city", Text, Contains, &["a, n"]),
        leaf("city", Text, Equals, &["eilat"]),
        leaf("age", Number, GreaterThan, &["30"]),
        leaf("age", Number, LessThan, &["25"]),
        leaf("age", Number, Equals, &["34"]),
        leaf("age", Number, NotEquals, &["41"]),
        leaf("age", Number, GreaterThan, &["old"]),
        leaf("status", Select, Is, &["active"]),
        leaf("status", Select, Is, &["active", "pending"]),
        leaf("status", Select, IsNot, &["archived"]),
        leaf("tags", Multiselect, Is, &["vip"]),
        leaf("tags", Multiselect, IsNot, &["eu", "us"]),
        leaf("created", Date, Before, &["2024-03-01"]),
        leaf("created", Date, After, &["2024-02-01"]),
        leaf("created", Date, Equals, &["2024-01-15"]),
        leaf("created", Date, Between, &["2024-01-01", "2024-02-28"]),
        leaf("created", Date, Between, &["2024-01-01"]),
        leaf("customer.tier", Select, Is, &["gold"]),
        leaf("customer.tier", Select, IsNot, &["silver"]),
        leaf("team.name", Text, Contains, &["plat"]),
        leaf("region", Select, Is, &["north"]),
        leaf("unpaid", Select, Is, &["yes"]),
    ]
}
