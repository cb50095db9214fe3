use super::*;
use serde_json::json;

#[test]
fn v4_reads_at_prefixed_annotations() {
    let payload = json!({
        "@odata.context": "https://host/svc/$metadata#People",
        "@odata.etag": "W/\"1\"",
        "@odata.count": 42,
        "@odata.nextLink": "People?$skiptoken=8",
        "value": [{"Id": 1}]
    });

    let d = dialect_for(ProtocolVersion::V4);
    assert_eq!(d.context(&payload), Some("https://host/svc/$metadata#People"));
    assert_eq!(d.etag(&payload), Some("W/\"1\""));
    assert_eq!(d.count(&payload), Some(42));
    assert_eq!(d.next_link(&payload), Some("People?$skiptoken=8"));
    assert_eq!(d.collection_items(&payload).map(<[_]>::len), Some(1));
}

#[test]
fn v3_reads_bare_prefixed_annotations() {
    let payload = json!({
        "odata.metadata": "https://host/svc/$metadata#People",
        "odata.count": "17",
        "value": []
    });

    let d = dialect_for(ProtocolVersion::V3);
    assert_eq!(d.context(&payload), Some("https://host/svc/$metadata#People"));
    assert_eq!(d.count(&payload), Some(17), "string counts must parse");
    assert!(d.collection_items(&payload).unwrap().is_empty());
}

#[test]
fn v2_unwraps_the_d_envelope() {
    let payload = json!({
        "d": {
            "results": [{"Id": 1}, {"Id": 2}],
            "__count": "2",
            "__next": "Orders?$skiptoken=2"
        }
    });

    let d = dialect_for(ProtocolVersion::V2);
    assert_eq!(d.collection_items(&payload).map(<[_]>::len), Some(2));
    assert_eq!(d.count(&payload), Some(2));
    assert_eq!(d.next_link(&payload), Some("Orders?$skiptoken=2"));
}

#[test]
fn v2_reads_metadata_block_and_bare_array_bodies() {
    let entity = json!({
        "d": {
            "__metadata": {
                "uri": "https://host/svc/Orders(1)",
                "etag": "abc",
                "type": "Legacy.Order"
            },
            "Id": 1
        }
    });

    let d = dialect_for(ProtocolVersion::V2);
    assert_eq!(d.entity_id(&entity), Some("https://host/svc/Orders(1)"));
    assert_eq!(d.etag(&entity), Some("abc"));
    assert_eq!(d.type_name(&entity), Some("Legacy.Order"));
    assert_eq!(d.unwrap_entity(&entity).get("Id"), Some(&json!(1)));

    let bare = json!({"d": [{"Id": 1}]});
    assert_eq!(d.collection_items(&bare).map(<[_]>::len), Some(1));
}

#[test]
fn absent_accessors_return_none_not_panic() {
    let payload = json!({"value": []});

    let v2 = dialect_for(ProtocolVersion::V2);
    assert_eq!(v2.context(&payload), None);
    assert_eq!(v2.delta_link(&payload), None);
    assert_eq!(v2.count(&payload), None);

    let v4 = dialect_for(ProtocolVersion::V4);
    assert_eq!(v4.etag(&payload), None);
}

#[test]
fn annotation_key_classification_follows_the_dialect() {
    let v4 = dialect_for(ProtocolVersion::V4);
    assert!(v4.is_annotation("@odata.id"));
    assert!(v4.is_annotation("Name@odata.type"));
    assert!(!v4.is_annotation("Name"));

    let v3 = dialect_for(ProtocolVersion::V3);
    assert!(v3.is_annotation("odata.id"));
    assert!(!v3.is_annotation("Name"));

    let v2 = dialect_for(ProtocolVersion::V2);
    assert!(v2.is_annotation("__metadata"));
    assert!(!v2.is_annotation("Name"));
}
