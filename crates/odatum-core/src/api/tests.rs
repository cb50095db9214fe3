use super::*;
use odatum_schema::node::{
    ContainerConfig, EntityConfig, EnumConfig, FieldConfig, SchemaConfig,
};
use serde_json::json;

fn demo_config() -> ApiConfig {
    ApiConfig::new("https://host/svc", ProtocolVersion::V4)
        .with_options(ParseOptions {
            string_as_enum: true,
            decimal_compat: false,
        })
        .schema(
            SchemaConfig::new("Demo.Model")
                .with_alias("Demo")
                .entity(
                    EntityConfig::new("Person")
                        .open()
                        .field(FieldConfig::new("Id", "Edm.Int32").key())
                        .field(FieldConfig::new("Name", "Edm.String"))
                        .field(FieldConfig::new("Shade", "Demo.Color"))
                        .field(FieldConfig::new("Tags", "Edm.String").collection())
                        .field(
                            FieldConfig::new("Friends", "Demo.Model.Person")
                                .collection()
                                .navigation(),
                        ),
                )
                .entity(
                    EntityConfig::new("Employee")
                        .with_base("Demo.Person")
                        .field(FieldConfig::new("Salary", "Edm.Decimal")),
                )
                .enumeration(
                    EnumConfig::new("Color")
                        .with_flags()
                        .member("Red", 1)
                        .member("Green", 2)
                        .member("Blue", 4),
                )
                .container(ContainerConfig::new("Container").entity_set("People", "Demo.Model.Person")),
        )
}

fn demo_api() -> Api {
    Api::build(&demo_config()).expect("demo config must build")
}

#[test]
fn inherited_fields_come_first_and_in_order() {
    let api = demo_api();
    let employee = api.entity_type("Demo.Model.Employee").unwrap();

    let names: Vec<&str> = employee
        .fields(&api, true)
        .iter()
        .map(|f| f.name())
        .collect();

    assert_eq!(names, ["Id", "Name", "Shade", "Tags", "Friends", "Salary"]);

    let own: Vec<&str> = employee
        .fields(&api, false)
        .iter()
        .map(|f| f.name())
        .collect();
    assert_eq!(own, ["Salary"]);
}

#[test]
fn namespace_and_alias_resolve_the_same_instance() {
    let api = demo_api();

    let by_namespace = api.entity_type("Demo.Model.Person").unwrap();
    let by_alias = api.entity_type("Demo.Person").unwrap();

    assert!(
        std::ptr::eq(by_namespace, by_alias),
        "both qualified forms must reach one runtime object"
    );
}

#[test]
fn longest_namespace_wins_on_ambiguous_prefixes() {
    let config = ApiConfig::new("https://host/svc", ProtocolVersion::V4)
        .schema(
            SchemaConfig::new("Demo.Model")
                .with_alias("D")
                .entity(EntityConfig::new("Extra.Thing")),
        )
        .schema(SchemaConfig::new("D.Extra").entity(EntityConfig::new("Thing")));

    let api = Api::build(&config).unwrap();

    // "D." matches the first schema's alias, but "D.Extra" is the longer
    // namespace match
    let resolved = api.entity_type("D.Extra.Thing").unwrap();
    assert_eq!(resolved.qualified_name(), "D.Extra.Thing");
    assert_eq!(resolved.name(), "Thing");

    let via_alias = api.entity_type("D.Extra.Thing.Hmm");
    assert!(via_alias.is_none(), "no schema declares that local name");
}

#[test]
fn person_payload_coerces_and_resolves_scalar_key() {
    let api = demo_api();
    let person = api.entity_type("Demo.Person").unwrap();

    let value = person.deserialize(&api, &json!({"Id": "1", "Name": "Ada"}));

    assert_eq!(value.get("Id"), Some(&Value::Int(1)), "string Id must coerce to int");
    assert_eq!(value.get("Name"), Some(&Value::Text("Ada".to_string())));

    let key = person.resolve_key(&api, &value).unwrap();
    assert_eq!(key, crate::key::KeyValue::Single(Value::Int(1)));
}

#[test]
fn flags_enum_decodes_names_and_reencodes_them() {
    let api = demo_api();
    let color = api.enum_type("Demo.Color").unwrap();

    assert_eq!(color.deserialize(&json!("Red, Blue")), Value::Int(5));
    assert_eq!(color.deserialize(&json!("Red Blue")), Value::Int(5));
    assert_eq!(color.deserialize(&json!(5)), Value::Int(5));
    assert_eq!(color.deserialize(&json!("Demo.Color'Red,Blue'")), Value::Int(5));

    assert_eq!(color.serialize(&Value::Int(5)), json!("Red, Blue"));
    assert_eq!(color.serialize(&Value::Int(64)), json!(64), "unknown bits stay numeric");
}

#[test]
fn flags_round_trip_ignores_member_declaration_order() {
    let config = ApiConfig::new("https://host/svc", ProtocolVersion::V4)
        .with_options(ParseOptions {
            string_as_enum: true,
            decimal_compat: false,
        })
        .schema(
            SchemaConfig::new("Demo").enumeration(
                EnumConfig::new("Color")
                    .with_flags()
                    .member("Blue", 4)
                    .member("Red", 1)
                    .member("Green", 2),
            ),
        );

    let api = Api::build(&config).unwrap();
    let color = api.enum_type("Demo.Color").unwrap();

    for bits in [1, 2, 3, 4, 5, 6, 7] {
        let wire = color.serialize(&Value::Int(bits));
        assert_eq!(
            color.deserialize(&wire),
            Value::Int(bits),
            "bitmask {bits} must survive the round trip"
        );
    }
}

#[test]
fn enum_numeric_mode_emits_numbers() {
    let mut config = demo_config();
    config.options.string_as_enum = false;
    let api = Api::build(&config).unwrap();

    let color = api.enum_type("Demo.Color").unwrap();
    assert_eq!(color.serialize(&Value::Int(5)), json!(5));
    assert_eq!(color.serialize(&Value::Text("Red, Blue".to_string())), json!(5));
}

#[test]
fn entity_deserialize_applies_enum_fields_through_the_graph() {
    let api = demo_api();
    let person = api.entity_type("Demo.Person").unwrap();

    let value = person.deserialize(&api, &json!({"Id": 1, "Shade": "Red, Blue"}));
    assert_eq!(value.get("Shade"), Some(&Value::Int(5)));
}

#[test]
fn self_referential_collections_map_element_wise() {
    let api = demo_api();
    let person = api.entity_type("Demo.Person").unwrap();

    let value = person.deserialize(
        &api,
        &json!({
            "Id": 1,
            "Friends": [
                {"Id": "2", "Name": "Grace"},
                {"Id": "3"}
            ]
        }),
    );

    let friends = value.get("Friends").and_then(Value::as_list).unwrap();
    assert_eq!(friends.len(), 2);
    assert_eq!(friends[0].get("Id"), Some(&Value::Int(2)), "nested entities recurse");
    assert_eq!(friends[1].get("Id"), Some(&Value::Int(3)));
}

#[test]
fn unknown_keys_and_unknown_types_pass_through() {
    let api = demo_api();
    let person = api.entity_type("Demo.Person").unwrap();

    let value = person.deserialize(&api, &json!({"Id": 1, "Extra": "kept"}));
    assert_eq!(
        value.get("Extra"),
        Some(&Value::Text("kept".to_string())),
        "open-type keys the model does not declare must survive"
    );

    // a field whose type never resolves behaves the same way
    let config = ApiConfig::new("https://host/svc", ProtocolVersion::V4).schema(
        SchemaConfig::new("Demo").entity(
            EntityConfig::new("Thing").field(FieldConfig::new("Mystery", "Demo.Missing")),
        ),
    );
    let api = Api::build(&config).unwrap();
    let thing = api.entity_type("Demo.Thing").unwrap();

    let value = thing.deserialize(&api, &json!({"Mystery": {"deep": [1]}}));
    assert_eq!(
        value.get("Mystery"),
        Some(&Value::object([("deep", Value::list([1i64]))]))
    );
}

#[test]
fn audit_reports_every_unresolved_reference() {
    let config = ApiConfig::new("https://host/svc", ProtocolVersion::V4).schema(
        SchemaConfig::new("Demo")
            .entity(
                EntityConfig::new("Thing")
                    .with_base("Demo.Gone")
                    .field(FieldConfig::new("Mystery", "Demo.Missing")),
            )
            .container(ContainerConfig::new("C").entity_set("Things", "Demo.Thing")),
    );

    let api = Api::build(&config).unwrap();
    let unresolved = api.audit();

    let contexts: Vec<&str> = unresolved.iter().map(|u| u.context.as_str()).collect();
    assert_eq!(contexts, ["Demo.Thing (base type)", "Demo.Thing/Mystery"]);
}

#[test]
fn parser_overrides_replace_resolution_for_named_types() {
    let config = ApiConfig::new("https://host/svc", ProtocolVersion::V4)
        .with_override("Demo.Weight", "Edm.Double")
        .schema(
            SchemaConfig::new("Demo").entity(
                EntityConfig::new("Parcel")
                    .field(FieldConfig::new("Id", "Edm.Int32").key())
                    .field(FieldConfig::new("Grams", "Demo.Weight")),
            ),
        );

    let api = Api::build(&config).unwrap();
    let parcel = api.entity_type("Demo.Parcel").unwrap();

    let value = parcel.deserialize(&api, &json!({"Grams": "12.5"}));
    assert_eq!(value.get("Grams"), Some(&Value::Float(12.5)));
}

#[test]
fn primitive_names_resolve_to_parsers_directly() {
    let api = demo_api();

    let parser = api.parser_for_type("Edm.Int32").unwrap();
    assert_eq!(parser.deserialize(&json!("7")), Value::Int(7));

    assert!(api.parser_for_type("Demo.Nope").is_none());
}

#[test]
fn duplicate_type_names_fail_the_build() {
    let config = ApiConfig::new("https://host/svc", ProtocolVersion::V4).schema(
        SchemaConfig::new("Demo")
            .entity(EntityConfig::new("Thing"))
            .enumeration(EnumConfig::new("Thing")),
    );

    assert!(matches!(
        Api::build(&config),
        Err(BuildError::DuplicateType { qualified }) if qualified == "Demo.Thing"
    ));
}

#[test]
fn inheritance_cycles_fail_the_build() {
    let config = ApiConfig::new("https://host/svc", ProtocolVersion::V4).schema(
        SchemaConfig::new("Demo")
            .entity(EntityConfig::new("A").with_base("Demo.B"))
            .entity(EntityConfig::new("B").with_base("Demo.A")),
    );

    assert!(matches!(
        Api::build(&config),
        Err(BuildError::InheritanceCycle { .. })
    ));
}

#[test]
fn redeclared_field_names_are_preserved_not_deduplicated() {
    let config = ApiConfig::new("https://host/svc", ProtocolVersion::V4).schema(
        SchemaConfig::new("Demo")
            .entity(
                EntityConfig::new("Base")
                    .field(FieldConfig::new("Id", "Edm.Int32").key())
                    .field(FieldConfig::new("Label", "Edm.String")),
            )
            .entity(
                EntityConfig::new("Derived")
                    .with_base("Demo.Base")
                    .field(FieldConfig::new("Label", "Edm.Int32")),
            ),
    );

    let api = Api::build(&config).unwrap();
    let derived = api.entity_type("Demo.Derived").unwrap();

    let names: Vec<&str> = derived.fields(&api, true).iter().map(|f| f.name()).collect();
    assert_eq!(names, ["Id", "Label", "Label"], "both declarations stay visible");

    // the subtype's declaration applies last during deserialize
    let value = derived.deserialize(&api, &json!({"Label": "7"}));
    assert_eq!(value.get("Label"), Some(&Value::Int(7)));
}

#[test]
fn entity_sets_resolve_to_their_entity_type() {
    let api = demo_api();
    let set = api.entity_set("People").unwrap();

    let entity = set.entity().map(|idx| api.entity_at(idx)).unwrap();
    assert_eq!(entity.qualified_name(), "Demo.Model.Person");
}

#[test]
fn bound_callables_resolve_parameters_and_returns() {
    use odatum_schema::node::{CallableConfig, ParameterConfig, ReturnConfig};

    let config = demo_config().schema(
        SchemaConfig::new("Demo.Ops")
            .callable(
                CallableConfig::function("Nearest")
                    .bound()
                    .composable()
                    .parameter(ParameterConfig::new(BINDING_PARAMETER, "Demo.Person"))
                    .parameter(ParameterConfig::new("radius", "Edm.Double"))
                    .returns(ReturnConfig::new("Demo.Person").collection()),
            ),
    );

    let api = Api::build(&config).unwrap();
    let nearest = api.callable("Demo.Ops.Nearest").unwrap();

    assert!(nearest.is_bound());
    assert_eq!(
        nearest.binding_parameter().map(CallableParameter::name),
        Some(BINDING_PARAMETER)
    );
    assert_eq!(
        nearest
            .invocation_parameters()
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>(),
        ["radius"]
    );

    let body = nearest.serialize_arguments(
        &api,
        &Value::object([("radius", Value::Float(1.5))]),
    );
    assert_eq!(body, json!({"radius": 1.5}));

    let result = nearest.deserialize_return(
        &api,
        &json!([{"Id": "1"}, {"Id": "2"}]),
    );
    let people = result.as_list().unwrap();
    assert_eq!(people[0].get("Id"), Some(&Value::Int(1)), "returns recurse through the graph");
}

#[test]
fn singletons_resolve_like_entity_sets() {
    let mut config = demo_config();
    config.schemas[0].containers[0] = ContainerConfig::new("Container")
        .entity_set("People", "Demo.Model.Person")
        .singleton("Me", "Demo.Person");

    let api = Api::build(&config).unwrap();
    let schema = &api.schemas()[0];

    let me = schema.singleton("Me").unwrap();
    let entity = me.entity().map(|idx| api.entity_at(idx)).unwrap();
    assert_eq!(entity.qualified_name(), "Demo.Model.Person");
}

#[test]
fn decimal_compat_formats_through_field_facets() {
    let config = ApiConfig::new("https://host/svc", ProtocolVersion::V4)
        .with_options(ParseOptions {
            string_as_enum: false,
            decimal_compat: true,
        })
        .schema(
            SchemaConfig::new("Demo").entity(
                EntityConfig::new("Account").field(
                    FieldConfig::new("Balance", "Edm.Decimal").with_facets(Some(5), Some(2)),
                ),
            ),
        );

    let api = Api::build(&config).unwrap();
    let account = api.entity_type("Demo.Account").unwrap();

    let wire = account.serialize(
        &api,
        &Value::object([("Balance", Value::Decimal("123.456".parse().unwrap()))]),
    );
    assert_eq!(wire, json!({"Balance": "123.46"}));
}

#[test]
fn serialize_mirrors_deserialize() {
    let api = demo_api();
    let person = api.entity_type("Demo.Person").unwrap();

    let state = Value::object([
        ("Id", Value::Int(1)),
        ("Name", Value::Text("Ada".to_string())),
        ("Shade", Value::Int(5)),
    ]);

    let wire = person.serialize(&api, &state);
    assert_eq!(
        wire,
        json!({"Id": 1, "Name": "Ada", "Shade": "Red, Blue"}),
    );
}
