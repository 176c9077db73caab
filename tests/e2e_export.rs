use bson::Bson;
use epf2bson::{run, Config, IndexMetadata};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

const APPLICATION_EPF: &[u8] = b"#export_date\x01application_id\x01title\x01price\x01released\x01explicit\x01downloads\x02\n\
#primaryKey:application_id\x02\n\
#dbTypes:BIGINT\x01INTEGER\x01VARCHAR(1000)\x01DECIMAL(9,3)\x01DATETIME\x01BOOLEAN\x01BIGINT\x02\n\
#exportMode:FULL\x02\n\
##legal:Copyright Apple\x02\n\
1700000000000\x01284882215\x01Some App\x019.99\x011700000000\x010\x015000000000\x02\n\
1700000000000\x01not-a-number\x01Broken\x01\x01\x01\x01\x02\n\
1700000000000\x01284882218\x01Truncated\x02\n\
1700000000000\x01284882219\x01Line\nbreak\x01\x01\x011\x01\x02\n";

const GENRE_EPF: &[u8] = b"#genre_id\x01parent_id\x01name\x02\n\
#primaryKey:genre_id\x01parent_id\x02\n\
#dbTypes:INTEGER\x01INTEGER\x01VARCHAR(200)\x02\n\
#exportMode:INCREMENTAL\x02\n\
34\x01\x01Music\x02\n\
21\x0134\x01Rock\x02\n";

fn write_feed(dir: &Path) {
    std::fs::write(dir.join("application"), APPLICATION_EPF).unwrap();
    std::fs::write(dir.join("genre"), GENRE_EPF).unwrap();
}

fn read_dump(path: &Path) -> Vec<bson::Document> {
    let bytes = std::fs::read(path).unwrap();
    let len = bytes.len() as u64;
    let mut cursor = Cursor::new(bytes);
    let mut docs = Vec::new();
    while cursor.position() < len {
        docs.push(bson::Document::from_reader(&mut cursor).unwrap());
    }
    docs
}

fn config(epf_dir: &Path, dump_dir: &Path) -> Config {
    Config {
        epf_dir: epf_dir.to_path_buf(),
        db_name: "itunes".to_string(),
        dump_dir: dump_dir.to_path_buf(),
        ..Config::default()
    }
}

/// End-to-end test for EPF to BSON dump export
#[test]
fn test_epf_export_e2e() {
    tracing_subscriber::fmt()
        .with_env_filter("epf2bson=debug,epf_source=debug")
        .try_init()
        .ok();

    let temp_dir = TempDir::new().unwrap();
    let epf_dir = temp_dir.path().join("epf");
    std::fs::create_dir(&epf_dir).unwrap();
    write_feed(&epf_dir);
    let dump_dir = temp_dir.path().join("dump");

    let summaries = run(&config(&epf_dir, &dump_dir)).unwrap();

    // Files are exported in sorted order
    let collections: Vec<&str> = summaries.iter().map(|s| s.collection.as_str()).collect();
    assert_eq!(collections, vec!["application", "genre"]);

    let application = &summaries[0];
    assert_eq!(application.entries, 2);
    assert_eq!(application.skipped, 2);
    assert_eq!(application.indexes, 1);

    let db_dir = dump_dir.join("itunes");
    let docs = read_dump(&db_dir.join("application.bson"));
    assert_eq!(docs.len(), 2);

    let first = &docs[0];
    let keys: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "export_date",
            "application_id",
            "title",
            "price",
            "released",
            "explicit",
            "downloads"
        ]
    );
    assert_eq!(first.get_i64("export_date").unwrap(), 1_700_000_000_000);
    assert_eq!(first.get_i32("application_id").unwrap(), 284_882_215);
    assert_eq!(first.get_str("title").unwrap(), "Some App");
    assert_eq!(first.get_f64("price").unwrap(), 9.99);
    assert_eq!(
        first.get_datetime("released").unwrap().timestamp_millis(),
        1_700_000_000_000
    );
    assert!(!first.get_bool("explicit").unwrap());
    assert_eq!(first.get_i64("downloads").unwrap(), 5_000_000_000);

    // Line feeds inside a field are data, empty fields are null
    let second = &docs[1];
    assert_eq!(second.get_str("title").unwrap(), "Line\nbreak");
    assert_eq!(second.get("price"), Some(&Bson::Null));
    assert_eq!(second.get("released"), Some(&Bson::Null));
    assert!(second.get_bool("explicit").unwrap());
    assert_eq!(second.get("downloads"), Some(&Bson::Null));

    let metadata: IndexMetadata = serde_json::from_str(
        &std::fs::read_to_string(db_dir.join("application.metadata.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(metadata.indexes.len(), 1);
    assert_eq!(metadata.indexes[0].ns, "itunes.application");
    assert_eq!(metadata.indexes[0].name, "_EPF2Bson_application_id_");

    let genres = read_dump(&db_dir.join("genre.bson"));
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[0].get("parent_id"), Some(&Bson::Null));
    assert_eq!(genres[1].get_i32("parent_id").unwrap(), 34);

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(db_dir.join("genre.metadata.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        raw,
        serde_json::json!({
            "indexes": [
                {"ns": "itunes.genre", "name": "_EPF2Bson_genre_id_", "v": 1, "key": {"genre_id": 1}},
                {"ns": "itunes.genre", "name": "_EPF2Bson_parent_id_", "v": 1, "key": {"parent_id": 1}}
            ]
        })
    );
}

#[test]
fn test_include_list_limits_export() {
    let temp_dir = TempDir::new().unwrap();
    let epf_dir = temp_dir.path().join("epf");
    std::fs::create_dir(&epf_dir).unwrap();
    write_feed(&epf_dir);
    let dump_dir = temp_dir.path().join("dump");

    let config = Config {
        include: Some(vec!["genre".to_string()]),
        ..config(&epf_dir, &dump_dir)
    };
    let summaries = run(&config).unwrap();

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].collection, "genre");
    assert!(dump_dir.join("itunes/genre.bson").is_file());
    assert!(!dump_dir.join("itunes/application.bson").exists());
}

#[test]
fn test_existing_dump_dir_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let epf_dir = temp_dir.path().join("epf");
    std::fs::create_dir(&epf_dir).unwrap();
    write_feed(&epf_dir);
    let dump_dir = temp_dir.path().join("dump");
    std::fs::create_dir(&dump_dir).unwrap();

    let err = run(&config(&epf_dir, &dump_dir)).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert!(!dump_dir.join("itunes").exists());
}

#[test]
fn test_invalid_db_name_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let epf_dir = temp_dir.path().join("epf");
    std::fs::create_dir(&epf_dir).unwrap();
    write_feed(&epf_dir);
    let dump_dir = temp_dir.path().join("dump");

    let config = Config {
        db_name: "it.unes".to_string(),
        ..config(&epf_dir, &dump_dir)
    };
    assert!(run(&config).is_err());
    assert!(!dump_dir.exists());
}

#[test]
fn test_no_matching_files() {
    let temp_dir = TempDir::new().unwrap();
    let epf_dir = temp_dir.path().join("epf");
    std::fs::create_dir(&epf_dir).unwrap();
    write_feed(&epf_dir);
    let dump_dir = temp_dir.path().join("dump");

    let config = Config {
        include: Some(vec!["artist".to_string()]),
        ..config(&epf_dir, &dump_dir)
    };
    let err = run(&config).unwrap_err();
    assert!(err.to_string().contains("seems empty"));
    assert!(!dump_dir.exists());
}
