use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use mockito::Server;
use tempfile::TempDir;
use tfmodcheck::{
    checker::{FileProcessor, Granularity, ReferenceMatcher},
    model::{CheckReport, PatchReport},
    registry::{load_index, HttpRegistry},
    scanner::FileScanner,
};

const INDEX_JSON: &str = r#"{
    "Modules": [
        {
            "ID": "platform/vpc/aws/2.3",
            "Namespace": "platform",
            "Provider": "aws",
            "Version": "2.3",
            "Name": "vpc",
            "Source": "https://example/vpc/2.3.zip"
        }
    ]
}"#;

const MAIN_TF: &str = "module \"network\" {\n  source = \"https://example/vpc/2.0.zip\"\n  cidr   = \"10.0.0.0/16\"\n}\n";

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("config")).unwrap();
    fs::create_dir_all(dir.path().join("infra")).unwrap();
    fs::write(dir.path().join("infra/main.tf"), MAIN_TF).unwrap();
    dir
}

fn tfmodcheck(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tfmodcheck"))
        .args(args)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[tokio::test]
async fn check_and_patch_against_http_registry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/modules.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(INDEX_JSON)
        .create_async()
        .await;

    let dir = workspace();
    let file = dir.path().join("infra/main.tf");

    let index = load_index(&HttpRegistry::new(format!("{}/modules.json", server.url())))
        .await
        .unwrap();
    mock.assert_async().await;

    let discovery = FileScanner::new("tf").scan(&[dir.path().join("infra")]);
    assert_eq!(discovery.files, vec![file.clone()]);

    let matcher = ReferenceMatcher::new("https://example/").unwrap();
    let processor = FileProcessor::new(&index, matcher, Granularity::Any);

    let mut check = CheckReport::new(server.url(), Granularity::Any);
    processor.check_files(&discovery.files, &mut check);
    assert_eq!(check.stale.len(), 1);
    assert_eq!(check.stale[0].line_number, 2);
    assert_eq!(check.stale[0].module_name, "vpc");
    assert_eq!(check.stale[0].referenced_version, "2.0");
    assert_eq!(check.stale[0].latest_version, "2.3");
    assert_eq!(fs::read_to_string(&file).unwrap(), MAIN_TF);

    let mut patch = PatchReport::new(server.url(), Granularity::Any);
    processor.patch_files(&discovery.files, &mut patch);
    assert_eq!(patch.files_patched, 1);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        MAIN_TF.replace("vpc/2.0.zip", "vpc/2.3.zip")
    );
}

#[test]
fn cli_check_prints_stale_references() {
    let dir = workspace();
    let index = dir.path().join("modules.json");
    fs::write(&index, INDEX_JSON).unwrap();
    let infra = dir.path().join("infra");

    let output = tfmodcheck(
        dir.path(),
        &[
            "check",
            "-c",
            "all",
            "--registry",
            "https://example/",
            "--index-file",
            index.to_str().unwrap(),
            infra.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!(
            "{}:2 `vpc` version 2.0 (latest 2.3)\n",
            infra.join("main.tf").display()
        )
    );
    assert_eq!(fs::read_to_string(infra.join("main.tf")).unwrap(), MAIN_TF);
}

#[test]
fn cli_check_fail_on_stale() {
    let dir = workspace();
    let index = dir.path().join("modules.json");
    fs::write(&index, INDEX_JSON).unwrap();
    let infra = dir.path().join("infra");

    let output = tfmodcheck(
        dir.path(),
        &[
            "check",
            "--fail-on-stale",
            "--registry",
            "https://example/",
            "--index-file",
            index.to_str().unwrap(),
            infra.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn cli_patch_rewrites_only_the_stale_line() {
    let dir = workspace();
    let index = dir.path().join("modules.json");
    fs::write(&index, INDEX_JSON).unwrap();
    let infra = dir.path().join("infra");

    let output = tfmodcheck(
        dir.path(),
        &[
            "patch",
            "--registry",
            "https://example/",
            "--index-file",
            index.to_str().unwrap(),
            infra.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        fs::read_to_string(infra.join("main.tf")).unwrap(),
        "module \"network\" {\n  source = \"https://example/vpc/2.3.zip\"\n  cidr   = \"10.0.0.0/16\"\n}\n"
    );
}

#[test]
fn cli_malformed_index_touches_nothing() {
    let dir = workspace();
    let index = dir.path().join("modules.json");
    fs::write(&index, "{\"Modules\": [").unwrap();
    let infra = dir.path().join("infra");

    let output = tfmodcheck(
        dir.path(),
        &[
            "patch",
            "--registry",
            "https://example/",
            "--index-file",
            index.to_str().unwrap(),
            infra.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to decode module index"));
    assert_eq!(fs::read_to_string(infra.join("main.tf")).unwrap(), MAIN_TF);
}

#[test]
fn cli_unknown_selector_is_a_usage_error() {
    let dir = workspace();
    let infra = dir.path().join("infra");

    let output = tfmodcheck(dir.path(), &["check", "-c", "patchlevel", infra.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown report selector"));
}

#[test]
fn cli_unreadable_file_is_reported_and_others_continue() {
    let dir = workspace();
    let index = dir.path().join("modules.json");
    fs::write(&index, INDEX_JSON).unwrap();
    let infra = dir.path().join("infra");
    let missing = dir.path().join("missing");

    let output = tfmodcheck(
        dir.path(),
        &[
            "check",
            "--registry",
            "https://example/",
            "--index-file",
            index.to_str().unwrap(),
            missing.to_str().unwrap(),
            infra.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stdout).contains("`vpc` version 2.0 (latest 2.3)"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}
