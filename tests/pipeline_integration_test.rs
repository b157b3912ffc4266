//! Integration tests for the full migration pipeline
//!
//! Each test lays out a small dbexport directory in a temp dir (manifest plus
//! `<database>.exp/` with CP850 data files), runs the coordinator and checks
//! the UTF-16 CSV files and the load script.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use unl2csv::config::{AppConfig, OutputEncoding};
use unl2csv::core::catalog::{DefaultValue, SchemaRegistry, TableSchema};
use unl2csv::core::export::MigrationCoordinator;
use unl2csv::domain::MigrationError;

const MANIFEST: &str = r#"{ DATABASE orveus  delimiter | }

grant dba to "informix";

{ TABLE "orveus".person row size = 60 number of columns = 3 index size = 9 }
{ unload file name = perso00100.unl number of rows = 2 }

create table "orveus".person
  (
    pe_id serial not null ,
    pe_vorname char(25),
    pe_nachname char(25)
  );
revoke all on "orveus".person from "public" as "informix";

{ TABLE "orveus".termin row size = 80 number of columns = 3 index size = 0 }
{ unload file name = termi00101.unl number of rows = 2 }

create table "orveus".termin
  (
    te_id integer,
    te_datum date,
    te_text varchar(60)
  );

{ TABLE "orveus".v_kostet_ka row size = 8 number of columns = 2 index size = 0 }
{ unload file name = v_kos00102.unl number of rows = 3 }

create table "orveus".v_kostet_ka
  (
    v_id integer,
    ka_id integer
  );
"#;

const CATALOG: &str = r#"
[tables.person]
column_order = ["pe_id", "pe_nachname", "pe_vorname", "deleted"]
defaults = { deleted = { constant = "" } }

[tables.termin]
formatters = { te_datum = "date" }

[tables.v_kostet_ka]
target_schema = "informix"
column_order = ["id", "v_id", "ka_id"]
defaults = { id = { auto_increment = 1 } }
"#;

struct Export {
    dir: TempDir,
    manifest: PathBuf,
}

impl Export {
    fn new(manifest: &str, files: &[(&str, &[u8])]) -> Self {
        let dir = TempDir::new().unwrap();
        let manifest_path = dir.path().join("orveus.sql");
        fs::write(&manifest_path, manifest).unwrap();

        let data_dir = dir.path().join("orveus.exp");
        fs::create_dir(&data_dir).unwrap();
        for (name, bytes) in files {
            fs::write(data_dir.join(name), bytes).unwrap();
        }

        Self {
            dir,
            manifest: manifest_path,
        }
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }
}

fn standard_files() -> Vec<(&'static str, &'static [u8])> {
    vec![
        (
            "perso00100.unl",
            b"1|Anna|M\x81ller|\n2|Jos\x82|O\"Brien|\n".as_slice(),
        ),
        (
            "termi00101.unl",
            b"1|01.02.2020|Kick\\|off|\n2||zwei\\\nZeilen\r\n".as_slice(),
        ),
        ("v_kos00102.unl", b"10|20|\n11|21|\n12|22|\n".as_slice()),
    ]
}

fn coordinator(config: AppConfig) -> MigrationCoordinator {
    MigrationCoordinator::new(config, SchemaRegistry::from_toml_str(CATALOG).unwrap())
}

fn read_utf16be(path: &Path) -> String {
    let bytes = fs::read(path).unwrap();
    assert_eq!(&bytes[..2], &[0xFE, 0xFF], "missing big endian BOM");
    let units: Vec<u16> = bytes[2..]
        .chunks(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).unwrap()
}

fn read_utf16le(path: &Path) -> String {
    let bytes = fs::read(path).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xFE], "missing little endian BOM");
    let units: Vec<u16> = bytes[2..]
        .chunks(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).unwrap()
}

#[test]
fn test_full_migration() {
    let export = Export::new(MANIFEST, &standard_files());
    let summary = coordinator(AppConfig::default())
        .run(&export.manifest, &export.out())
        .unwrap();

    assert_eq!(summary.database, "orveus");
    let targets: Vec<&str> = summary
        .tables
        .iter()
        .map(|t| t.target_table.as_str())
        .collect();
    assert_eq!(
        targets,
        vec!["orveus.person", "orveus.termin", "informix.v_kostet_ka"]
    );
    assert_eq!(summary.total_rows(), 7);
    assert_eq!(summary.total_shape_mismatches(), 0);

    let out = export.out();
    assert_eq!(
        read_utf16be(&out.join("orveus.person.csv")),
        "\"1\",\"Müller\",\"Anna\",\"\"\n\"2\",\"O\"\"Brien\",\"José\",\"\"\n"
    );
    assert_eq!(
        read_utf16be(&out.join("orveus.termin.csv")),
        "\"1\",\"2020-02-01\",\"Kick|off\"\n\"2\",\"\",\"zwei\nZeilen\"\n"
    );
    assert_eq!(
        read_utf16be(&out.join("informix.v_kostet_ka.csv")),
        "\"1\",\"10\",\"20\"\n\"2\",\"11\",\"21\"\n\"3\",\"12\",\"22\"\n"
    );
}

#[test]
fn test_load_script_lists_tables_in_manifest_order() {
    let export = Export::new(MANIFEST, &standard_files());
    let summary = coordinator(AppConfig::default())
        .run(&export.manifest, &export.out())
        .unwrap();

    let script_path = summary.load_script.unwrap();
    assert_eq!(script_path, export.out().join("import.mssql.sql"));
    let script = fs::read_to_string(&script_path).unwrap();

    let expected_head = "BULK INSERT orveus.person\n FROM '/var/opt/mssql/backups/init/orveus.person.csv'\n WITH (FORMAT = \"CSV\", ROWTERMINATOR = \"\\n\", KEEPIDENTITY);\n\n\
BULK INSERT orveus.termin\n FROM '/var/opt/mssql/backups/init/orveus.termin.csv'\n WITH (FORMAT = \"CSV\", ROWTERMINATOR = \"\\n\", KEEPIDENTITY);\n\n\
BULK INSERT informix.v_kostet_ka\n FROM '/var/opt/mssql/backups/init/informix.v_kostet_ka.csv'\n WITH (FORMAT = \"CSV\", ROWTERMINATOR = \"\\n\", KEEPIDENTITY);\n\n";
    assert!(script.starts_with(expected_head));
    assert!(script[expected_head.len()..].starts_with("EXEC sp_msforeachtable"));
}

#[test]
fn test_auto_increment_has_no_gaps() {
    let manifest = "{ DATABASE orveus }\n\
{ TABLE \"orveus\".v_kostet_ka row size = 8 }\n\
{ unload file name = v_kos00102.unl number of rows = 50 }\n\
create table \"orveus\".v_kostet_ka (v_id integer, ka_id integer);\n";
    let data: String = (0..50).map(|i| format!("{i}|{i}|\n")).collect();
    let export = Export::new(manifest, &[("v_kos00102.unl", data.as_bytes())]);

    let registry = SchemaRegistry::new(BTreeMap::from([(
        "v_kostet_ka".to_string(),
        TableSchema {
            column_order: Some(vec!["ka_id".to_string(), "id".to_string(), "flag".to_string()]),
            defaults: BTreeMap::from([
                ("id".to_string(), DefaultValue::AutoIncrement(100)),
                ("flag".to_string(), DefaultValue::Constant("J".to_string())),
            ]),
            ..Default::default()
        },
    )]));
    MigrationCoordinator::new(AppConfig::default(), registry)
        .run(&export.manifest, &export.out())
        .unwrap();

    let csv = read_utf16be(&export.out().join("orveus.v_kostet_ka.csv"));
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 50);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(*line, format!("\"{i}\",\"{}\",\"J\"", 100 + i));
    }
}

#[test]
fn test_manifest_delimiter_and_little_endian_output() {
    let manifest = "{ DATABASE orveus delimiter ; }\n\
{ TABLE \"orveus\".termin row size = 8 }\n\
{ unload file name = termi00101.unl number of rows = 1 }\n\
create table \"orveus\".termin (te_id integer, te_datum date, te_text varchar(60));\n";
    let export = Export::new(
        manifest,
        &[("termi00101.unl", b"1;24.12.2019;a\\;b|c;\n".as_slice())],
    );

    let mut config = AppConfig::default();
    config.output.encoding = OutputEncoding::Utf16Le;
    coordinator(config)
        .run(&export.manifest, &export.out())
        .unwrap();

    assert_eq!(
        read_utf16le(&export.out().join("orveus.termin.csv")),
        "\"1\",\"2019-12-24\",\"a;b|c\"\n"
    );
}

#[test]
fn test_positional_shape_mismatch_is_reported() {
    let manifest = "{ DATABASE orveus }\n\
{ TABLE \"orveus\".termin row size = 8 }\n\
{ unload file name = termi00101.unl number of rows = 2 }\n\
create table \"orveus\".termin (te_id integer, te_datum date, te_text varchar(60));\n";
    let export = Export::new(
        manifest,
        &[("termi00101.unl", b"1|01.01.2000|ok|\n2|02.01.2000|\n".as_slice())],
    );

    let summary = coordinator(AppConfig::default())
        .run(&export.manifest, &export.out())
        .unwrap();
    assert_eq!(summary.tables[0].rows_written, 2);
    assert_eq!(summary.tables[0].shape_mismatches, 1);
}

#[test]
fn test_undeclared_column_aborts_run() {
    let export = Export::new(MANIFEST, &standard_files());
    let catalog = CATALOG.replace(
        "column_order = [\"pe_id\", \"pe_nachname\", \"pe_vorname\", \"deleted\"]",
        "column_order = [\"pe_id\", \"pe_geburt\"]",
    );
    let registry = SchemaRegistry::from_toml_str(&catalog).unwrap();

    let err = MigrationCoordinator::new(AppConfig::default(), registry)
        .run(&export.manifest, &export.out())
        .unwrap_err();
    match err {
        MigrationError::UndeclaredColumn { table, column } => {
            assert_eq!(table, "orveus.person");
            assert_eq!(column, "pe_geburt");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!export.out().join("orveus.person.csv").exists());
    assert!(!export.out().join("import.mssql.sql").exists());
}

#[test]
fn test_truncated_record_leaves_no_partial_file() {
    let mut files = standard_files();
    files[1] = ("termi00101.unl", b"1|01.02.2020|ok|\n2||open\\\n".as_slice());
    let export = Export::new(MANIFEST, &files);

    let err = coordinator(AppConfig::default())
        .run(&export.manifest, &export.out())
        .unwrap_err();
    assert!(matches!(
        err,
        MigrationError::TruncatedRecord { ref file, line: 2 } if file == "termi00101.unl"
    ));

    let out = export.out();
    assert!(out.join("orveus.person.csv").exists());
    assert!(!out.join("orveus.termin.csv").exists());
    assert!(!out.join("orveus.termin.csv.partial").exists());
    assert!(!out.join("import.mssql.sql").exists());
}

#[test]
fn test_missing_create_table_is_manifest_error() {
    let manifest = "{ DATABASE orveus }\n\
{ TABLE \"orveus\".ghost row size = 8 }\n\
{ unload file name = ghost00100.unl number of rows = 0 }\n";
    let export = Export::new(manifest, &[("ghost00100.unl", b"".as_slice())]);

    let err = coordinator(AppConfig::default())
        .run(&export.manifest, &export.out())
        .unwrap_err();
    assert!(matches!(err, MigrationError::ManifestFormat(_)));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_bad_date_aborts_with_cell_format_error() {
    let mut files = standard_files();
    files[1] = ("termi00101.unl", b"1|2020-02-01|iso|\n".as_slice());
    let export = Export::new(MANIFEST, &files);

    let err = coordinator(AppConfig::default())
        .run(&export.manifest, &export.out())
        .unwrap_err();
    match err {
        MigrationError::CellFormat { column, value, .. } => {
            assert_eq!(column, "te_datum");
            assert_eq!(value, "2020-02-01");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_empty_manifest_writes_template_only_script() {
    let export = Export::new("{ DATABASE orveus }\n", &[]);
    let summary = coordinator(AppConfig::default())
        .run(&export.manifest, &export.out())
        .unwrap();

    assert!(summary.tables.is_empty());
    let script = fs::read_to_string(export.out().join("import.mssql.sql")).unwrap();
    assert!(script.starts_with("EXEC sp_msforeachtable"));
}

#[test]
fn test_schema_rename_collision_aborts_before_output() {
    let manifest = format!(
        "{MANIFEST}\n\
{{ TABLE \"informix\".v_kostet_ka row size = 8 number of columns = 2 index size = 0 }}\n\
{{ unload file name = v_kos00103.unl number of rows = 1 }}\n\
create table \"informix\".v_kostet_ka (v_id integer, ka_id integer);\n"
    );
    let mut files = standard_files();
    files.push(("v_kos00103.unl", b"13|23|\n".as_slice()));
    let export = Export::new(&manifest, &files);

    let err = coordinator(AppConfig::default())
        .run(&export.manifest, &export.out())
        .unwrap_err();

    assert!(matches!(err, MigrationError::Configuration(_)));
    assert!(err.to_string().contains("informix.v_kostet_ka"));
    assert_eq!(err.exit_code(), 2);
    assert!(!export.out().exists());
}

#[test]
fn test_reserved_manifest_delimiter_aborts_run() {
    for declared in ['\\', '"'] {
        let manifest = MANIFEST.replacen("delimiter |", &format!("delimiter {declared}"), 1);
        let export = Export::new(&manifest, &standard_files());

        let err = coordinator(AppConfig::default())
            .run(&export.manifest, &export.out())
            .unwrap_err();

        assert!(matches!(err, MigrationError::ManifestFormat(_)), "accepted {declared}");
        assert_eq!(err.exit_code(), 3);
        assert!(!export.out().exists());
    }
}
