use super::*;
use uuid::Uuid;

#[test]
fn scenario_people_key_navigate_top() {
    let resource = Resource::entity_set("People")
        .filter_raw("Age gt 30")
        .key(1)
        .navigate("Friends")
        .top(10);

    assert_eq!(resource.path(ProtocolVersion::V4), "People(1)/Friends");

    let query = resource.query(ProtocolVersion::V4).unwrap();
    assert_eq!(
        query,
        vec![("$top".to_string(), "10".to_string())],
        "the filter must be gone once a single entity is addressed"
    );
}

#[test]
fn navigation_clears_inherited_projection() {
    let resource = Resource::entity_set("People")
        .select(["Name"])
        .expand_name("Friends")
        .key(1)
        .navigate("Friends")
        .select(["Id"]);

    let query = resource.query(ProtocolVersion::V4).unwrap();
    assert_eq!(query, vec![("$select".to_string(), "Id".to_string())]);
}

#[test]
fn clone_mutation_leaves_the_original_untouched() {
    let base = Resource::entity_set("People").top(20);

    let page_two = base.clone().skip(20).skip_token("abc");

    assert_eq!(
        base.query(ProtocolVersion::V4).unwrap(),
        vec![("$top".to_string(), "20".to_string())],
        "mutating the clone must never leak into the base query"
    );
    assert_eq!(
        page_two.query(ProtocolVersion::V4).unwrap(),
        vec![
            ("$top".to_string(), "20".to_string()),
            ("$skip".to_string(), "20".to_string()),
            ("$skiptoken".to_string(), "abc".to_string()),
        ]
    );
}

#[test]
fn encoding_is_deterministic() {
    let resource = Resource::entity_set("People")
        .filter(Filter::All(vec![
            ("Name".to_string(), Value::Text("Ada".to_string())),
            ("Age".to_string(), Value::Int(36)),
        ]))
        .select(["Name", "Age"])
        .custom("zeta", "1")
        .custom("alpha", "2")
        .top(5);

    let first = resource.query(ProtocolVersion::V4).unwrap();
    let second = resource.query(ProtocolVersion::V4).unwrap();

    assert_eq!(first, second, "same option set must encode byte-identically");
    assert_eq!(
        first,
        vec![
            ("$filter".to_string(), "Name eq 'Ada' and Age eq 36".to_string()),
            ("$select".to_string(), "Name,Age".to_string()),
            ("$top".to_string(), "5".to_string()),
            ("alpha".to_string(), "2".to_string()),
            ("zeta".to_string(), "1".to_string()),
        ]
    );
}

#[test]
fn nested_expand_renders_parenthesized_subqueries() {
    let inner = Expand::new("Friends").with_options(QueryOptions {
        select: vec!["Name".to_string()],
        top: Some(2),
        ..QueryOptions::default()
    });

    let resource = Resource::entity_set("People").expand(inner).expand_name("Photos");

    let query = resource.query(ProtocolVersion::V4).unwrap();
    assert_eq!(
        query,
        vec![(
            "$expand".to_string(),
            "Friends($select=Name;$top=2),Photos".to_string()
        )]
    );
}

#[test]
fn custom_options_lose_collisions_with_normal_options() {
    let resource = Resource::entity_set("People")
        .top(3)
        .custom("$top", "999")
        .custom("x-trace", "on");

    let query = resource.query(ProtocolVersion::V4).unwrap();
    assert_eq!(
        query,
        vec![
            ("$top".to_string(), "3".to_string()),
            ("x-trace".to_string(), "on".to_string()),
        ]
    );
}

#[test]
fn malformed_filter_values_fail_fast() {
    let resource = Resource::entity_set("People").filter(Filter::All(vec![(
        "Tags".to_string(),
        Value::list(["a", "b"]),
    )]));

    assert_eq!(
        resource.query(ProtocolVersion::V4),
        Err(EncodingError::NonScalarFilter {
            field: "Tags".to_string()
        })
    );
}

#[test]
fn empty_expand_names_fail_fast() {
    let resource = Resource::entity_set("People").expand_name("");

    assert_eq!(
        resource.query(ProtocolVersion::V4),
        Err(EncodingError::EmptyExpandName)
    );
}

#[test]
fn key_literals_follow_the_dialect() {
    let text_key = Resource::entity_set("People").key("O'Brien");
    assert_eq!(
        text_key.path(ProtocolVersion::V4),
        "People('O''Brien')",
        "embedded quotes double"
    );

    let guid: Uuid = "f89dee73-af9f-4cd4-b330-db93c25ff3c7".parse().unwrap();
    let guid_key = Resource::entity_set("People").key(Value::Guid(guid));
    assert_eq!(
        guid_key.path(ProtocolVersion::V4),
        "People(f89dee73-af9f-4cd4-b330-db93c25ff3c7)"
    );
    assert_eq!(
        guid_key.path(ProtocolVersion::V2),
        "People(guid'f89dee73-af9f-4cd4-b330-db93c25ff3c7')"
    );

    let composite = Resource::entity_set("Lines")
        .key(KeyValue::composite([("OrderId", 1i64), ("LineNo", 2i64)]));
    assert_eq!(
        composite.path(ProtocolVersion::V4),
        "Lines(OrderId=1,LineNo=2)"
    );
}

#[test]
fn synthetic_segments_wrap_what_precedes_them() {
    assert_eq!(
        Resource::entity_set("People").key(1).navigate("Photo").as_raw_value()
            .path(ProtocolVersion::V4),
        "People(1)/Photo/$value"
    );
    assert_eq!(
        Resource::entity_set("People").key(1).navigate("Friends").as_ref_segment()
            .path(ProtocolVersion::V4),
        "People(1)/Friends/$ref"
    );
    assert_eq!(
        Resource::entity_set("People").as_count().path(ProtocolVersion::V4),
        "People/$count"
    );
    assert_eq!(Resource::metadata().path(ProtocolVersion::V4), "$metadata");
    assert_eq!(Resource::batch().path(ProtocolVersion::V4), "$batch");
    assert_eq!(
        Resource::singleton("Me").navigate("Photo").path(ProtocolVersion::V4),
        "Me/Photo"
    );
}

#[test]
fn function_arguments_move_with_the_dialect() {
    let resource = Resource::entity_set("People")
        .key(1)
        .function("Demo.Nearest", [("radius", Value::Float(1.5))]);

    assert_eq!(
        resource.path(ProtocolVersion::V4),
        "People(1)/Demo.Nearest(radius=1.5)"
    );
    assert!(resource.query(ProtocolVersion::V4).unwrap().is_empty());

    // the older dialects pass arguments through the query string
    assert_eq!(resource.path(ProtocolVersion::V2), "People(1)/Demo.Nearest");
    assert_eq!(
        resource.query(ProtocolVersion::V2).unwrap(),
        vec![("radius".to_string(), "1.5".to_string())]
    );
}

#[test]
fn inline_count_spelling_differs_by_dialect() {
    let resource = Resource::entity_set("People").inline_count();

    assert_eq!(
        resource.query(ProtocolVersion::V4).unwrap(),
        vec![("$count".to_string(), "true".to_string())]
    );
    assert_eq!(
        resource.query(ProtocolVersion::V2).unwrap(),
        vec![("$inlinecount".to_string(), "allpages".to_string())]
    );
}

#[test]
fn url_glues_root_path_and_escaped_query() {
    let resource = Resource::entity_set("People")
        .filter_raw("Name eq 'A B'")
        .top(2);

    let url = resource
        .url("https://host/svc/", ProtocolVersion::V4)
        .unwrap();

    assert_eq!(
        url,
        "https://host/svc/People?$filter=Name%20eq%20'A%20B'&$top=2"
    );
}
