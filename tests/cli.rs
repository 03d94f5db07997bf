use std::fs;
use std::process::Command;

fn bin_path() -> String {
    std::env::var("CARGO_BIN_EXE_folio").expect("CARGO_BIN_EXE_folio is set by cargo test")
}

const PORTFOLIO: &str = r#"
profile:
  name: "Sam Lee"
  email: "sam@example.com"
achievements:
  - { title: "Hackathon winner", issuer: "Example Corp", date: "2024" }
contact:
  resume: "/resume.pdf"
"#;

#[test]
fn test_export_prints_builtin_json() {
    let output = Command::new(bin_path())
        .arg("export")
        .output()
        .expect("run folio export");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value["profile"]["name"], "Alex Morgan");
    assert_eq!(value["site"]["default_theme"], "light");
}

#[test]
fn test_export_reads_content_file() {
    let tmp = tempfile::tempdir().expect("create tempdir");
    let content = tmp.path().join("portfolio.yml");
    fs::write(&content, PORTFOLIO).expect("write portfolio");

    let output = Command::new(bin_path())
        .arg("export")
        .arg("--content")
        .arg(&content)
        .output()
        .expect("run folio export");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value["profile"]["name"], "Sam Lee");
    assert_eq!(value["achievements"][0]["issuer"], "Example Corp");
}

#[test]
fn test_missing_content_file_exits_nonzero() {
    let tmp = tempfile::tempdir().expect("create tempdir");
    let missing = tmp.path().join("nope.yml");

    let output = Command::new(bin_path())
        .arg("export")
        .arg("--content")
        .arg(&missing)
        .output()
        .expect("run folio export");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Error: file not found") && stderr.contains("nope.yml"),
        "stderr:\n{stderr}"
    );
}

#[test]
fn test_invalid_content_names_field() {
    let tmp = tempfile::tempdir().expect("create tempdir");
    let content = tmp.path().join("portfolio.yml");
    fs::write(
        &content,
        "profile: { name: Sam, email: s@example.com }\nskills:\n  levels:\n    - { name: Rust, percent: 140 }\n",
    )
    .expect("write portfolio");

    let output = Command::new(bin_path())
        .arg("export")
        .arg("--content")
        .arg(&content)
        .output()
        .expect("run folio export");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skills.levels[0].percent"), "stderr:\n{stderr}");
}

#[test]
fn test_build_writes_site() {
    let tmp = tempfile::tempdir().expect("create tempdir");
    let content = tmp.path().join("portfolio.yml");
    fs::write(&content, PORTFOLIO).expect("write portfolio");
    let public = tmp.path().join("public");
    fs::create_dir_all(public.join("img")).expect("create public dir");
    fs::write(public.join("resume.pdf"), b"%PDF").expect("write resume");
    fs::write(public.join("img/me.png"), b"png").expect("write image");
    let out = tmp.path().join("dist");

    let output = Command::new(bin_path())
        .arg("build")
        .arg("--content")
        .arg(&content)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("run folio build");
    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wrote 6 files (2 copied)"), "stdout:\n{stdout}");

    let page = fs::read_to_string(out.join("index.html")).expect("read index.html");
    assert!(page.contains("<section id=\"achievements\""));
    assert!(!page.contains("<section id=\"projects\""));
    assert!(out.join("assets/folio.css").is_file());
    assert!(out.join("assets/folio.js").is_file());
    assert!(out.join("content.json").is_file());
    assert_eq!(fs::read(out.join("resume.pdf")).expect("read resume"), b"%PDF");
    assert!(out.join("img/me.png").is_file());
}

#[test]
fn test_build_requires_out() {
    let output = Command::new(bin_path())
        .arg("build")
        .output()
        .expect("run folio build");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--out"), "stderr:\n{stderr}");
}
