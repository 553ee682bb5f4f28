//! Black-box tests for the `unigen` binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const API: &str = r#"{
  "models": {
    "Animal": {
      "name": "Animal",
      "discriminatorField": "petType",
      "properties": [
        { "baseName": "petType", "typeName": "string" },
        { "baseName": "nick_name", "typeName": "string", "validationPattern": "/^[a-z]+$/i" }
      ]
    },
    "Dog": {
      "name": "Dog",
      "parentName": "Animal",
      "properties": [{ "baseName": "petType", "typeName": "string" }]
    }
  },
  "operations": [
    { "operationId": "listDogs", "returnTypeName": "List<Dog>" }
  ]
}"#;

fn unigen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_unigen"))
        .args(args)
        .env_remove("UNIGEN_LOG")
        .output()
        .expect("failed to run unigen")
}

fn write_input(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("api.json");
    fs::write(&path, contents).unwrap();
    path_str(&path)
}

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_transform_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, API);

    let output = unigen(&["transform", "--input", &input]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    let dog = &json["models"]["Dog"];
    assert_eq!(dog["properties"][0]["name"], "PetType");
    assert_eq!(dog["properties"][0]["defaultValue"], "\"Dog\"");
    assert_eq!(dog["parentVars"][0]["name"], "NickName");
    assert_eq!(dog["parentVars"][0]["vendorExtensions"]["x-regex"], "^[a-z]+$");
    assert_eq!(json["operations"][0]["returnTypeName"], "List<Dog>");
    assert_eq!(json["rendererFlags"]["modelPropertyNaming"], "PascalCase");
    assert_eq!(json["report"]["modelsReconciled"], 1);
}

#[test]
fn test_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, API);
    let config = dir.path().join("unigen.toml");
    fs::write(&config, "namingPolicy = \"camelCase\"\nincludeTests = false\n").unwrap();
    let out = dir.path().join("out.json");

    let output = unigen(&[
        "transform",
        "--input",
        &input,
        "--config",
        &path_str(&config),
        "--naming-policy",
        "snake_case",
        "--collapse-returns",
        "--output",
        &path_str(&out),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let json: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["models"]["Animal"]["properties"][1]["name"], "nick_name");
    assert_eq!(json["rendererFlags"]["modelPropertyNaming"], "snake_case");
    assert_eq!(json["rendererFlags"]["excludeTests"], true);
    assert_eq!(json["operations"][0]["returnTypeName"], "ICollection<Dog>");
    assert_eq!(json["operations"][0]["returnContainer"], "List<Dog>");
}

#[test]
fn test_invalid_pattern_fails_unless_skipped() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &API.replace("/^[a-z]+$/i", "^[a-z]+$"));

    let output = unigen(&["transform", "--input", &input]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Animal.nick_name"), "{stderr}");

    let output = unigen(&["transform", "--input", &input, "--skip-invalid-patterns"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["report"]["skippedPatterns"][0]["property"], "nick_name");
}

#[test]
fn test_inheritance_cycle_fails() {
    let dir = TempDir::new().unwrap();
    let cyclic = API.replace(
        r#""discriminatorField": "petType","#,
        r#""discriminatorField": "petType", "parentName": "Dog","#,
    );
    let input = write_input(&dir, &cyclic);

    let output = unigen(&["transform", "--input", &input]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("inheritance cycle detected"), "{stderr}");
}

#[test]
fn test_unknown_naming_policy_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, API);

    let output = unigen(&["transform", "--input", &input, "--naming-policy", "kebab"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("kebab"), "{stderr}");
}

#[test]
fn test_missing_input_reported() {
    let dir = TempDir::new().unwrap();
    let missing = path_str(&dir.path().join("nope.json"));

    let output = unigen(&["transform", "--input", &missing]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read"), "{stderr}");
}
