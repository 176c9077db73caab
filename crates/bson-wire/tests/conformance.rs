//! Decode encoder output with the reference `bson` crate and compare.

use bson::Bson;
use bson_wire::{Document, ObjectId, Value, WireEncoder};
use std::io::Cursor;

fn decode(bytes: &[u8]) -> bson::Document {
    bson::Document::from_reader(&mut Cursor::new(bytes)).expect("valid BSON")
}

#[test]
fn test_round_trip_preserves_names_types_and_order() {
    let mut inner = Document::new();
    inner.add_string("city", "Paris");
    inner.add_int32("zip", 75001);

    let mut doc = Document::new();
    doc.add_int32("id", 42);
    doc.add_int64("big", 1 << 40);
    doc.add_double("price", 9.99);
    doc.add_string("name", "Hello, wörld");
    doc.add_bool("explicit", false);
    doc.add_datetime("released", 1_700_000_000_000);
    doc.add_null("missing");
    doc.add_object_id("_id", ObjectId::from_bytes([0x5f; 12]));
    doc.add_document("address", inner);
    doc.add_array(
        "genres",
        Document::array_from([
            Value::String("rock".to_string()),
            Value::String("pop".to_string()),
        ]),
    );

    let encoded = WireEncoder::default().encode(&doc).unwrap();
    let decoded = decode(encoded.as_slice());

    let keys: Vec<&str> = decoded.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "id", "big", "price", "name", "explicit", "released", "missing", "_id", "address",
            "genres"
        ]
    );

    assert_eq!(decoded.get("id"), Some(&Bson::Int32(42)));
    assert_eq!(decoded.get("big"), Some(&Bson::Int64(1 << 40)));
    assert_eq!(decoded.get("price"), Some(&Bson::Double(9.99)));
    assert_eq!(
        decoded.get("name"),
        Some(&Bson::String("Hello, wörld".to_string()))
    );
    assert_eq!(decoded.get("explicit"), Some(&Bson::Boolean(false)));
    assert_eq!(decoded.get("missing"), Some(&Bson::Null));

    match decoded.get("released") {
        Some(Bson::DateTime(dt)) => assert_eq!(dt.timestamp_millis(), 1_700_000_000_000),
        other => panic!("Expected DateTime, got {other:?}"),
    }
    match decoded.get("_id") {
        Some(Bson::ObjectId(oid)) => assert_eq!(oid.bytes(), [0x5f; 12]),
        other => panic!("Expected ObjectId, got {other:?}"),
    }
    match decoded.get("address") {
        Some(Bson::Document(address)) => {
            assert_eq!(address.get_str("city").unwrap(), "Paris");
            assert_eq!(address.get_i32("zip").unwrap(), 75001);
        }
        other => panic!("Expected Document, got {other:?}"),
    }
    match decoded.get("genres") {
        Some(Bson::Array(genres)) => assert_eq!(
            genres,
            &vec![
                Bson::String("rock".to_string()),
                Bson::String("pop".to_string())
            ]
        ),
        other => panic!("Expected Array, got {other:?}"),
    }
}

#[test]
fn test_deeply_nested_documents_decode() {
    let mut doc = Document::new();
    doc.add_string("leaf", "bottom");
    for depth in 0..10 {
        let mut parent = Document::new();
        parent.add_int32("depth", depth);
        parent.add_document("child", doc);
        doc = parent;
    }

    let encoded = WireEncoder::with_growth_increment(32).encode(&doc).unwrap();
    let mut current = decode(encoded.as_slice());
    for depth in (0..10).rev() {
        assert_eq!(current.get_i32("depth").unwrap(), depth);
        current = current.get_document("child").unwrap().clone();
    }
    assert_eq!(current.get_str("leaf").unwrap(), "bottom");
}

#[test]
fn test_concatenated_documents_are_self_delimiting() {
    let encoder = WireEncoder::default();
    let mut stream = Vec::new();
    for i in 0..3 {
        let mut doc = Document::new();
        doc.add_int32("n", i);
        stream.extend_from_slice(encoder.encode(&doc).unwrap().as_slice());
    }

    let mut cursor = Cursor::new(stream.as_slice());
    for i in 0..3 {
        let doc = bson::Document::from_reader(&mut cursor).unwrap();
        assert_eq!(doc.get_i32("n").unwrap(), i);
    }
    assert_eq!(cursor.position() as usize, stream.len());
}
