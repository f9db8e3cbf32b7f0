//! Integration tests for the pgweave binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

fn pgweave_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pgweave"))
}

fn write_file(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("failed to write fixture");
}

const FLOWERS_YAML: &str = r#"
enums:
  - name: color
    comment: flower colors
    items: [red, green, blue]
tables:
  - name: flowers
    columns:
      - { name: id, type: int }
      - { name: color, type: $public.color }
"#;

const ORDERS_YAML: &str = r#"
composites:
  - schema: sales
    name: address
    columns:
      - { name: city, type: text }
tables:
  - schema: sales
    name: orders
    columns:
      - { name: id, type: bigint }
      - { name: shipping, type: $sales.address }
"#;

fn definitions_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "flowers.yaml", FLOWERS_YAML);
    write_file(dir.path(), "orders.yaml", ORDERS_YAML);
    dir
}

#[test]
fn test_generate_produces_ordered_script() {
    let defs = definitions_dir();
    let out = TempDir::new().unwrap();
    let script_path = out.path().join("schema.sql");

    let output = Command::new(pgweave_bin())
        .args(["generate", "--definitions"])
        .arg(defs.path())
        .arg("--output")
        .arg(&script_path)
        .output()
        .expect("failed to run pgweave");
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let script = fs::read_to_string(&script_path).unwrap();
    assert!(script.starts_with("-- Generated by pgweave. Do not edit.\n"));

    // Referenced objects come before their dependents.
    let schema_pos = script.find("CREATE SCHEMA IF NOT EXISTS public;").unwrap();
    let enum_pos = script.find("CREATE TYPE public.color AS ENUM").unwrap();
    let composite_pos = script.find("CREATE TYPE sales.address AS").unwrap();
    let flowers_pos = script
        .find("CREATE TABLE IF NOT EXISTS public.flowers")
        .unwrap();
    let orders_pos = script
        .find("CREATE TABLE IF NOT EXISTS sales.orders")
        .unwrap();
    assert!(schema_pos < enum_pos);
    assert!(enum_pos < flowers_pos);
    assert!(composite_pos < orders_pos);

    // Each object appears exactly once.
    assert_eq!(script.matches("CREATE TYPE public.color").count(), 1);
    assert!(script.contains("COMMENT ON TYPE public.color IS 'flower colors';"));
}

#[test]
fn test_generate_drop_schemas_precede_creates() {
    let defs = definitions_dir();
    let out = TempDir::new().unwrap();
    let script_path = out.path().join("schema.sql");

    let output = Command::new(pgweave_bin())
        .args(["generate", "--drop-schemas", "--definitions"])
        .arg(defs.path())
        .arg("--output")
        .arg(&script_path)
        .output()
        .expect("failed to run pgweave");
    assert!(output.status.success());

    let script = fs::read_to_string(&script_path).unwrap();
    let drop_public = script.find("DROP SCHEMA IF EXISTS public CASCADE;").unwrap();
    let drop_sales = script.find("DROP SCHEMA IF EXISTS sales CASCADE;").unwrap();
    let first_create = script.find("CREATE").unwrap();
    assert!(drop_public < first_create);
    assert!(drop_sales < first_create);
}

#[test]
fn test_generate_from_config_file() {
    let defs = definitions_dir();
    let out = TempDir::new().unwrap();
    let script_path = out.path().join("from-config.sql");
    let config_path = out.path().join("pgweave.yaml");
    fs::write(
        &config_path,
        format!(
            "definitions: {}\noutput: {}\nheader: '-- team schema'\n",
            defs.path().display(),
            script_path.display()
        ),
    )
    .unwrap();

    let output = Command::new(pgweave_bin())
        .args(["generate", "--config"])
        .arg(&config_path)
        .output()
        .expect("failed to run pgweave");
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let script = fs::read_to_string(&script_path).unwrap();
    assert!(script.starts_with("-- team schema\n"));
}

#[test]
fn test_render_enum_to_stdout() {
    let defs = definitions_dir();

    let output = Command::new(pgweave_bin())
        .args(["render", "--enum", "public.color", "--definitions"])
        .arg(defs.path())
        .output()
        .expect("failed to run pgweave");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "CREATE TYPE public.color AS ENUM\n\t('red','green','blue');\nCOMMENT ON TYPE public.color IS 'flower colors';\n"
    );
}

#[test]
fn test_render_table_with_dependencies() {
    let defs = definitions_dir();

    let output = Command::new(pgweave_bin())
        .args([
            "render",
            "--table",
            "sales.orders",
            "--with-dependencies",
            "--definitions",
        ])
        .arg(defs.path())
        .output()
        .expect("failed to run pgweave");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let composite_pos = stdout.find("CREATE TYPE sales.address AS").unwrap();
    let table_pos = stdout
        .find("CREATE TABLE IF NOT EXISTS sales.orders")
        .unwrap();
    assert!(composite_pos < table_pos);
}

#[test]
fn test_render_unknown_object_fails() {
    let defs = definitions_dir();

    let output = Command::new(pgweave_bin())
        .args(["render", "--table", "public.missing", "--definitions"])
        .arg(defs.path())
        .output()
        .expect("failed to run pgweave");
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("No matching object")
    );
}

#[test]
fn test_validate_reports_every_broken_file() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "broken.yaml", "tables: [\n");
    write_file(
        dir.path(),
        "empty-enum.yaml",
        "enums:\n  - name: color\n    items: []\n",
    );

    let output = Command::new(pgweave_bin())
        .arg("validate")
        .arg(dir.path())
        .output()
        .expect("failed to run pgweave");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.yaml"));
    assert!(stderr.contains("empty-enum.yaml"));
}

#[test]
fn test_validate_accepts_good_definitions() {
    let defs = definitions_dir();

    let output = Command::new(pgweave_bin())
        .arg("validate")
        .arg(defs.path())
        .output()
        .expect("failed to run pgweave");
    assert!(
        output.status.success(),
        "validate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("2 definition file(s) OK"));
}

#[test]
fn test_validate_catches_duplicates_across_files() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "one.yaml", FLOWERS_YAML);
    write_file(dir.path(), "two.yaml", FLOWERS_YAML);

    let output = Command::new(pgweave_bin())
        .arg("validate")
        .arg(dir.path())
        .output()
        .expect("failed to run pgweave");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate"));
}

#[test]
fn test_list_json_output() {
    let defs = definitions_dir();

    let output = Command::new(pgweave_bin())
        .args(["list", "--format", "json", "--definitions"])
        .arg(defs.path())
        .output()
        .expect("failed to run pgweave");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let listing: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{stdout}"));
    assert_eq!(listing["enums"][0]["name"], "public.color");
    assert_eq!(listing["tables"].as_array().unwrap().len(), 2);
    assert_eq!(
        listing["schemas"],
        serde_json::json!(["public", "sales"])
    );
}
