use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

/// The binary with its data and config directories inside `home`.
fn adminkit(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("adminkit").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("share"))
        .env_remove("ADMINKIT_DATA")
        .env_remove("ADMINKIT_WEB_ROOT")
        .env_remove("ADMINKIT_UPLOADS_FOLDER")
        .env_remove("ADMINKIT_DATE_TIME_FORMAT")
        .arg("--no-color")
        .arg("--data-dir")
        .arg(home.join("data"));
    cmd
}

#[test]
fn naked_invocation_lists_models() {
    let temp_dir = tempfile::tempdir().unwrap();
    adminkit(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ForumSettings"))
        .stdout(predicate::str::contains("ForumAdminUser"))
        .stdout(predicate::str::contains("adminkit list Role"));
}

#[test]
fn settings_edit_persists() {
    let temp_dir = tempfile::tempdir().unwrap();

    adminkit(temp_dir.path())
        .args(["settings", "IsSiteLocked=true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved: IsSiteLocked"));

    adminkit(temp_dir.path())
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Is Site Locked\s+true").unwrap());

    assert!(temp_dir.path().join("data").join("ForumSettings.json").exists());
}

#[test]
fn invalid_setting_fails_without_writing() {
    let temp_dir = tempfile::tempdir().unwrap();

    adminkit(temp_dir.path())
        .args(["settings", "PostsPerPage=500"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: "))
        .stderr(predicate::str::contains("PostsPerPage"));

    assert!(!temp_dir.path().join("data").join("ForumSettings.json").exists());
}

#[test]
fn json_output_for_scripts() {
    let temp_dir = tempfile::tempdir().unwrap();

    let output = adminkit(temp_dir.path())
        .args(["--output", "json", "create", "ForumAdminUser"])
        .args(["UserName=ada", "Email=ada@example.com", "Roles=Editor"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = value["records"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(value["records"][0]["values"]["Roles"], serde_json::json!(["Editor"]));
    assert_eq!(value["messages"][0]["level"], "success");

    adminkit(temp_dir.path())
        .args(["show", "ForumAdminUser", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Identity"))
        .stdout(predicate::str::contains("ada@example.com"));
}

#[test]
fn projection_through_the_mapper() {
    let temp_dir = tempfile::tempdir().unwrap();

    adminkit(temp_dir.path())
        .args(["-o", "json", "project", "ForumSettings", "PublicSiteInfo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Status\": \"open\""));
}

#[test]
fn routes_and_login_pages() {
    let temp_dir = tempfile::tempdir().unwrap();

    adminkit(temp_dir.path())
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("records.detail"))
        .stdout(predicate::str::contains("adminkit show {model} {id}"));

    adminkit(temp_dir.path())
        .arg("login")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sign in"))
        .stdout(predicate::str::contains("©"));
}

#[test]
fn resolve_uses_web_root() {
    let temp_dir = tempfile::tempdir().unwrap();
    let web_root = temp_dir.path().join("www");

    adminkit(temp_dir.path())
        .arg("--web-root")
        .arg(&web_root)
        .args(["-o", "json", "resolve", "~/uploads/logo.png"])
        .assert()
        .success()
        .stdout(predicate::str::contains("logo.png"))
        .stdout(predicate::str::contains("www"));
}

#[test]
fn config_template_is_toml() {
    let temp_dir = tempfile::tempdir().unwrap();

    adminkit(temp_dir.path())
        .args(["config", "--template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[api]"));
}

#[test]
fn project_config_file_is_read() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    std::fs::write(
        data_dir.join("adminkit.toml"),
        "[api]\nuploads_folder = \"~/media\"\n",
    )
    .unwrap();

    adminkit(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("~/media"));
}

#[test]
fn unknown_model_exits_with_error() {
    let temp_dir = tempfile::tempdir().unwrap();

    adminkit(temp_dir.path())
        .args(["list", "Post"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Model not found: Post"));
}

#[test]
fn settings_cannot_be_created_as_records() {
    let temp_dir = tempfile::tempdir().unwrap();

    adminkit(temp_dir.path())
        .args(["create", "ForumSettings", "SiteName=Dup"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("edit it with `settings`"));

    assert!(!temp_dir.path().join("data").join("ForumSettings.json").exists());
}

#[test]
fn bad_date_format_fails_at_startup() {
    let temp_dir = tempfile::tempdir().unwrap();

    adminkit(temp_dir.path())
        .env("ADMINKIT_DATE_TIME_FORMAT", "%Q")
        .arg("settings")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: Config error"))
        .stderr(predicate::str::contains("date_time_string_format"))
        .stderr(predicate::str::contains("panicked").not());
}
