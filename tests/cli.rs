use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const SNAPSHOT: &str = r#"{
  "generatedAt": "2026-01-05T10:00:00Z",
  "profileUrl": "https://www.behance.net/someone",
  "projects": [
    {
      "id": "201",
      "title": "Heritage Sweets",
      "url": "https://www.behance.net/gallery/201/Heritage-Sweets",
      "slug": "201-heritage-sweets",
      "fields": ["Packaging"],
      "appreciations": 1500
    }
  ]
}"#;

/// `folio` isolated from the caller's environment and home config
fn folio(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("folio"));
    cmd.env("FOLIO_CONFIG", dir.join("missing-config.yaml"))
        .env_remove("FOLIO_PROFILE_URL")
        .env_remove("FOLIO_STATIC_CACHE")
        .env_remove("FOLIO_PUBLIC_DIR")
        .env_remove("FOLIO_FORMAT")
        .env_remove("FOLIO_DEBUG")
        .arg("--public-dir")
        .arg(dir.join("public"));
    cmd
}

fn write_snapshot(dir: &Path) {
    let public = dir.join("public");
    fs::create_dir_all(&public).expect("failed to create public dir");
    fs::write(public.join("behance-cache.json"), SNAPSHOT).expect("failed to write snapshot");
}

fn write_meta(dir: &Path, slug: &str, body: &str) {
    let project_dir = dir.join("public").join("projects").join(slug);
    fs::create_dir_all(&project_dir).expect("failed to create project dir");
    fs::write(project_dir.join("meta.json"), body).expect("failed to write meta");
}

#[test]
fn snapshot_show_prints_projects() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    write_snapshot(temp.path());

    folio(temp.path())
        .args(["snapshot", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Heritage Sweets"))
        .stdout(predicate::str::contains("https://www.behance.net/someone"))
        .stdout(predicate::str::contains("1.5k"));

    Ok(())
}

#[test]
fn snapshot_show_without_snapshot_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    folio(temp.path())
        .args(["snapshot", "show"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No snapshot at"));

    Ok(())
}

#[test]
fn static_cache_projects_served_from_snapshot() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    write_snapshot(temp.path());

    let assert = folio(temp.path())
        .args(["projects", "--static-cache", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(parsed["meta"]["source"], "static snapshot");
    assert_eq!(parsed["data"][0]["slug"], "201-heritage-sweets");
    assert_eq!(parsed["data"].as_array().map(Vec::len), Some(1));

    Ok(())
}

#[test]
fn static_cache_env_var_is_honoured() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    write_snapshot(temp.path());

    folio(temp.path())
        .env("FOLIO_STATIC_CACHE", "true")
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("Heritage Sweets"))
        .stderr(predicate::str::contains("static snapshot"));

    Ok(())
}

#[test]
fn static_cache_env_var_accepts_numeric_flag() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    write_snapshot(temp.path());

    folio(temp.path())
        .env("FOLIO_STATIC_CACHE", "1")
        .env("FOLIO_DEBUG", "0")
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("Heritage Sweets"))
        .stderr(predicate::str::contains("static snapshot"));

    Ok(())
}

#[test]
fn detail_served_from_local_meta() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    write_meta(
        temp.path(),
        "201-heritage-sweets",
        r#"{
            "id": "201",
            "title": "Heritage Sweets",
            "url": "https://www.behance.net/gallery/201/Heritage-Sweets",
            "slug": "201-heritage-sweets",
            "fields": ["Packaging"],
            "localCoverPath": "/projects/201-heritage-sweets/cover.jpg",
            "localGalleryPaths": ["/projects/201-heritage-sweets/gallery-01.jpg"]
        }"#,
    );

    let assert = folio(temp.path())
        .args([
            "detail",
            "https://www.behance.net/gallery/201/Heritage-Sweets",
            "--slug",
            "201-heritage-sweets",
            "--static-cache",
            "--format",
            "json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(parsed["meta"]["source"], "local metadata");
    assert_eq!(parsed["data"]["title"], "Heritage Sweets");
    assert_eq!(
        parsed["data"]["localImages"][0],
        "/projects/201-heritage-sweets/gallery-01.jpg"
    );

    Ok(())
}

#[test]
fn detail_served_from_meta_with_numeric_id() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    write_meta(
        temp.path(),
        "123-poster",
        r#"{"id":123,"title":"Poster","url":"https://www.behance.net/gallery/123/Poster","slug":"123-poster","localGalleryPaths":["/projects/123-poster/gallery-01.jpg"]}"#,
    );

    let assert = folio(temp.path())
        .env("FOLIO_STATIC_CACHE", "1")
        .args([
            "detail",
            "https://www.behance.net/gallery/123/Poster",
            "--slug",
            "123-poster",
            "--format",
            "json",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(parsed["meta"]["source"], "local metadata");
    assert_eq!(parsed["data"]["title"], "Poster");

    Ok(())
}

#[test]
fn snapshot_rebuild_from_meta_files() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    write_meta(
        temp.path(),
        "10-older",
        r#"{"id":"10","title":"Link to project - Older","url":"https://www.behance.net/gallery/10/Older","slug":"10-older","localGalleryPaths":["/projects/10-older/gallery-01.png"]}"#,
    );
    write_meta(
        temp.path(),
        "99-newer",
        r#"{"id":"99","title":"Newer","url":"https://www.behance.net/gallery/99/Newer","slug":"99-newer","localCoverPath":"/projects/99-newer/cover.jpg"}"#,
    );
    write_meta(temp.path(), "broken", "{ nope");

    folio(temp.path())
        .args(["--profile-url", "https://www.behance.net/someone/"])
        .args(["snapshot", "rebuild"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 2 projects"));

    let raw = fs::read_to_string(temp.path().join("public").join("behance-cache.json"))?;
    let snapshot: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(snapshot["profileUrl"], "https://www.behance.net/someone");
    assert_eq!(snapshot["projects"][0]["title"], "Newer");
    assert_eq!(snapshot["projects"][1]["title"], "Older");
    assert_eq!(
        snapshot["projects"][1]["coverImageUrl"],
        "/projects/10-older/gallery-01.png"
    );

    Ok(())
}

#[test]
fn completion_generates_script() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    folio(temp.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("folio"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn projects_scraped_from_profile() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let profile_url = format!("{}/someone", server.url());

    let _profile = server
        .mock("GET", "/someone")
        .with_status(200)
        .with_body(
            r#"<html><body>
                 <a href="/gallery/301/Poster-Series" title="Poster Series">Poster Series</a>
                 <a href="/gallery/302/Type-Study" title="Type Study">Type Study</a>
               </body></html>"#,
        )
        .create();

    let temp = tempdir()?;
    let assert = folio(temp.path())
        .args(["--profile-url", &profile_url, "--format", "json", "projects"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(parsed["meta"]["source"], "live scrape");
    assert_eq!(parsed["data"][0]["id"], "301");
    assert_eq!(parsed["data"][1]["slug"], "302-type-study");

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn projects_fall_back_to_manual_dataset() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let profile_url = format!("{}/someone", server.url());

    let _profile = server
        .mock("GET", "/someone")
        .with_status(503)
        .create();

    let temp = tempdir()?;
    let assert = folio(temp.path())
        .args(["--profile-url", &profile_url, "--format", "json", "projects"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(parsed["meta"]["source"], "manual fallback");
    assert_eq!(parsed["data"].as_array().map(Vec::len), Some(6));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn detail_unavailable_exits_cleanly() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let url = format!("{}/gallery/404/Gone", server.url());

    let _page = server
        .mock("GET", "/gallery/404/Gone")
        .with_status(404)
        .create();

    let temp = tempdir()?;
    folio(temp.path())
        .args(["detail", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains("unavailable"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn snapshot_build_writes_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let profile_url = format!("{}/someone", server.url());

    let _profile = server
        .mock("GET", "/someone")
        .with_status(200)
        .with_body(r#"<a href="/gallery/5/Five" title="Five">Five</a>"#)
        .create();

    let temp = tempdir()?;
    folio(temp.path())
        .args(["--profile-url", &profile_url, "snapshot", "build"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 1 projects"));

    let raw = fs::read_to_string(temp.path().join("public").join("behance-cache.json"))?;
    assert!(raw.contains("\"5-five\""));

    Ok(())
}
