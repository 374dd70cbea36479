use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const MARKER: &str =
    "//this is autogenerated code with default service loading configuration. Please review it";

const CONFIG: &str = r#"
[service_loading]
imports = ["example.com/config/loader"]
instructions = ['loader.Load("config.yaml")']

[[go_mod.require]]
path = "example.com/config"
version = "v1.2.0"
"#;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn setup_module(root: &Path) {
    write(root, "go.mod", "module example.com/app\n\ngo 1.21\n");
    write(
        root,
        "main.go",
        "package main\n\nimport (\n\t\"fmt\"\n)\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}\n",
    );
}

#[allow(deprecated)]
fn goinject(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("goinject").expect("binary");
    cmd.current_dir(workdir).env("RUST_LOG", "warn");
    cmd
}

#[test]
fn updates_entry_file_and_go_mod() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    setup_module(root);
    write(root, "goinject.toml", CONFIG);

    goinject(root).assert().success();

    let main = fs::read_to_string(root.join("main.go")).unwrap();
    assert_eq!(
        main,
        format!(
            "package main\n\nimport (\n\t\"fmt\"\n\t\"example.com/config/loader\"\n)\n\nfunc init() {{\n\t{MARKER}\n\tloader.Load(\"config.yaml\")\n}}\n\nfunc main() {{\n\tfmt.Println(\"hi\")\n}}\n"
        )
    );

    let go_mod = fs::read_to_string(root.join("go.mod")).unwrap();
    assert!(go_mod.ends_with("require (\n\texample.com/config v1.2.0\n)\n"));
}

#[test]
fn json_report_lists_module() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    setup_module(root);
    let config = root.join("custom.toml");
    fs::write(&config, CONFIG).unwrap();

    let output = goinject(root)
        .arg("--config")
        .arg(&config)
        .arg("--json")
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let modules = body["modules"].as_array().expect("modules array");
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0]["status"], "updated");
    assert_eq!(modules[0]["injection"]["import_mode"], "append_to_existing_block");
    assert_eq!(modules[0]["injection"]["init_mode"], "create_new_block");
    assert_eq!(modules[0]["go_mod_edits"][0]["action"], "added");
}

#[test]
fn rejects_directory_without_go_mod() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "goinject.toml", CONFIG);
    write(root, "main.go", "package main\n\nfunc main() {}\n");

    goinject(root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a go module"));
    assert_eq!(
        fs::read_to_string(root.join("main.go")).unwrap(),
        "package main\n\nfunc main() {}\n"
    );
}

#[test]
fn missing_config_is_an_error() {
    let temp = tempdir().unwrap();
    setup_module(temp.path());

    goinject(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("goinject.toml"));
}

#[test]
fn recursive_run_isolates_broken_module() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "goinject.toml", CONFIG);
    setup_module(&root.join("svc/good"));
    write(root, "svc/broken/go.mod", "module example.com/broken\n");
    write(root, "svc/broken/main.go", "package main\n\nfunc main() {\n");
    write(root, "svc/lib/go.mod", "module example.com/lib\n");
    write(root, "svc/lib/lib.go", "package lib\n");

    let output = goinject(root)
        .args(["--recursive", "--json"])
        .output()
        .expect("command run");
    assert!(!output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let statuses: Vec<(String, String)> = body["modules"]
        .as_array()
        .expect("modules array")
        .iter()
        .map(|m| {
            let dir = m["dir"].as_str().unwrap_or_default();
            let name = Path::new(dir)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            (name, m["status"].as_str().unwrap_or_default().to_string())
        })
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("broken".to_string(), "failed".to_string()),
            ("good".to_string(), "updated".to_string()),
            ("lib".to_string(), "no_entry_file".to_string()),
        ]
    );

    assert!(fs::read_to_string(root.join("svc/good/main.go"))
        .unwrap()
        .contains(MARKER));
    assert_eq!(
        fs::read_to_string(root.join("svc/broken/main.go")).unwrap(),
        "package main\n\nfunc main() {\n"
    );
}
