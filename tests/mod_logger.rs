use bson::doc;
use docquery::logger;
use docquery::update::UpdateOptions;

// One logger per process, so this file holds a single test.
#[test]
fn yaml_config_routes_audit_records() {
    let dir = tempfile::tempdir().unwrap();
    let audit = dir.path().join("audit.log");
    let config = dir.path().join("log4rs.yaml");
    std::fs::write(
        &config,
        format!(
            "appenders:\n  audit:\n    kind: file\n    path: \"{}\"\n    encoder:\n      pattern: \"{{l}} {{t}} {{m}}{{n}}\"\nroot:\n  level: warn\n  appenders: []\nloggers:\n  docquery::audit:\n    level: info\n    appenders:\n      - audit\n    additive: false\n",
            audit.display()
        ),
    )
    .unwrap();
    logger::init_path(&config).unwrap();

    let mut d = doc! {"n": 1};
    docquery::run(&mut d, &doc! {}, &doc! {"$inc": {"n": 1}}, &UpdateOptions::default()).unwrap();

    let written = std::fs::read_to_string(&audit).unwrap();
    assert!(written.contains("INFO docquery::audit update applied: 1 change(s)"), "{written}");
    assert!(logger::init_path(&config).is_err(), "a second logger cannot be installed");
}
