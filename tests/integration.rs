use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_dscdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// -- direct path identifiers --

#[test]
fn module_path_produces_expected_blocks() {
    let expected = std::fs::read_to_string(fixture_path("Widget.expected.txt")).unwrap();

    let assert = cmd().arg(fixture_path("Widget.psm1")).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn schema_path_resolves_the_same_pair() {
    let expected = std::fs::read_to_string(fixture_path("Widget.expected.txt")).unwrap();

    let assert = cmd()
        .arg(fixture_path("Widget.schema.mof"))
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn missing_sibling_fails() {
    let dir = TempDir::new().unwrap();
    let module = dir.path().join("Lonely.psm1");
    std::fs::write(&module, "function Get-TargetResource { param($A) }\n").unwrap();

    cmd()
        .arg(module.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// -- directory identifiers --

#[test]
fn directory_with_one_pair_succeeds() {
    let dir = TempDir::new().unwrap();
    copy_fixture_pair(dir.path());

    cmd()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains(".PARAMETER Ensure"));
}

#[test]
fn directory_with_two_schemas_fails() {
    let dir = TempDir::new().unwrap();
    copy_fixture_pair(dir.path());
    std::fs::write(dir.path().join("Other.schema.mof"), "class X {\n};\n").unwrap();

    cmd()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one"));
}

// -- catalog identifiers --

#[test]
fn catalog_name_with_root() {
    let root = TempDir::new().unwrap();
    let entry = root.path().join("Widget");
    std::fs::create_dir(&entry).unwrap();
    copy_fixture_pair(&entry);

    cmd()
        .arg("Widget")
        .args(["--catalog-root", root.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Widget name."));
}

#[test]
fn unknown_identifier_fails() {
    cmd()
        .arg("NoSuchResource")
        .assert()
        .failure()
        .stderr(predicate::str::contains("resource not found"));
}

// -- target function selection --

#[test]
fn function_override_limits_output() {
    let assert = cmd()
        .arg(fixture_path("Widget.psm1"))
        .args(["-f", "Get-TargetResource"])
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output.matches("<#").count(), 1);
    assert!(output.contains(".PARAMETER Id"));
}

#[test]
fn partial_match_warns_but_succeeds() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("Widget.psm1"),
        "function Get-TargetResource { param([System.String] $Name) }\n",
    )
    .unwrap();
    std::fs::copy(
        fixture_path("Widget.schema.mof"),
        dir.path().join("Widget.schema.mof"),
    )
    .unwrap();

    cmd()
        .arg(dir.path().join("Widget.psm1").to_str().unwrap())
        .assert()
        .success()
        .stderr(
            predicate::str::contains("warning:")
                .and(predicate::str::contains("Set-TargetResource"))
                .and(predicate::str::contains("Test-TargetResource")),
        );
}

#[test]
fn no_target_functions_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("Widget.psm1"),
        "function Invoke-Helper { param($X) }\n",
    )
    .unwrap();
    std::fs::copy(
        fixture_path("Widget.schema.mof"),
        dir.path().join("Widget.schema.mof"),
    )
    .unwrap();

    cmd()
        .arg(dir.path().join("Widget.psm1").to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("none of the target functions"));
}

#[test]
fn parameterless_function_warns() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("Widget.psm1"),
        "function Test-TargetResource {\n    return $true\n}\n",
    )
    .unwrap();
    std::fs::copy(
        fixture_path("Widget.schema.mof"),
        dir.path().join("Widget.schema.mof"),
    )
    .unwrap();

    cmd()
        .arg(dir.path().join("Widget.psm1").to_str().unwrap())
        .args(["-f", "Test-TargetResource"])
        .assert()
        .success()
        .stderr(predicate::str::contains("declares no parameters"));
}

// -- malformed inputs --

#[test]
fn malformed_module_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("Widget.psm1"),
        "function Get-TargetResource {\n    param($Name)\n",
    )
    .unwrap();
    std::fs::copy(
        fixture_path("Widget.schema.mof"),
        dir.path().join("Widget.schema.mof"),
    )
    .unwrap();

    cmd()
        .arg(dir.path().join("Widget.psm1").to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse module"));
}

#[test]
fn malformed_schema_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::copy(fixture_path("Widget.psm1"), dir.path().join("Widget.psm1")).unwrap();
    std::fs::write(dir.path().join("Widget.schema.mof"), "not a schema\n").unwrap();

    cmd()
        .arg(dir.path().join("Widget.psm1").to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse schema"));
}

// -- output directory mode --

#[test]
fn output_directory_writes_one_file_per_block() {
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-o", out.path().to_str().unwrap()])
        .arg(fixture_path("Widget.psm1"))
        .assert()
        .success();

    for func in [
        "Get-TargetResource",
        "Set-TargetResource",
        "Test-TargetResource",
    ] {
        let path = out.path().join(format!("Widget.{func}.help.txt"));
        assert!(path.exists(), "missing {}", path.display());
    }
    let get = std::fs::read_to_string(out.path().join("Widget.Get-TargetResource.help.txt")).unwrap();
    assert!(get.starts_with("<#\n"));
    assert!(get.contains("Widget name."));
}

fn copy_fixture_pair(dest: &std::path::Path) {
    std::fs::copy(fixture_path("Widget.psm1"), dest.join("Widget.psm1")).unwrap();
    std::fs::copy(
        fixture_path("Widget.schema.mof"),
        dest.join("Widget.schema.mof"),
    )
    .unwrap();
}
