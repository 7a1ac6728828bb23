use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn nfprep() -> Command {
    let mut cmd = Command::cargo_bin("nfprep").expect("binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn process_writes_every_artifact() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("amf01.yaml");
    let out = temp.path().join("out");
    fs::write(
        &input,
        "amf:\n  name: amf01\n  password: secret123\n  sbi: 10.1.2.3\n",
    )
    .unwrap();

    nfprep()
        .arg("process")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 succeeded, 0 failed"));

    for name in [
        "amf01_unified.json",
        "amf01_desensitized.txt",
        "amf01_desensitize_mapping.json",
        "amf01_metadata.json",
        "amf01_report.json",
        "amf01_chunks/chunk_0000.txt",
        "amf01_chunks/chunks_index.yaml",
        "processing_summary.json",
    ] {
        assert!(out.join(name).is_file(), "missing {name}");
    }

    let masked = fs::read_to_string(out.join("amf01_desensitized.txt")).unwrap();
    assert_eq!(
        masked,
        "amf:\n  name: amf01\n  password=********\n  sbi: 10.1.xxx.xxx\n"
    );
    let chunk = fs::read_to_string(out.join("amf01_chunks/chunk_0000.txt")).unwrap();
    assert!(!chunk.contains("secret123"));

    let report: Value =
        serde_json::from_str(&fs::read_to_string(out.join("amf01_report.json")).unwrap())
            .unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["format"], "yaml");
    assert_eq!(report["network_functions"][0], "AMF");
}

#[test]
fn json_summary_and_stage_switches() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("configs");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("a.ini"), "[smf]\nip = 10.9.8.7\n").unwrap();
    fs::write(dir.join("b.ini"), "[upf]\nn3 = 10.9.8.8\n").unwrap();
    fs::write(dir.join("skip.md"), "# notes\n").unwrap();
    let out = temp.path().join("out");

    let output = nfprep()
        .arg("process")
        .arg(&dir)
        .arg("--output")
        .arg(&out)
        .args(["--pattern", "*.ini", "--no-chunk", "--no-unify", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(summary["total_files"], 2);
    assert_eq!(summary["successful"], 2);
    assert_eq!(summary["reports"][0]["statistics"]["total_desensitized"], 1);

    assert!(out.join("a_desensitized.txt").is_file());
    assert!(!out.join("a_unified.json").exists());
    assert!(!out.join("a_chunks").exists());
    assert!(!out.join("skip_report.json").exists());
}

#[test]
fn failed_file_sets_exit_status() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("blob.bin");
    fs::write(&input, [0x00u8, 0xff, 0xfe, 0x00, 0x81]).unwrap();

    nfprep()
        .arg("process")
        .arg(&input)
        .arg("--output")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("1 of 1 files failed"));

    let report: Value = serde_json::from_str(
        &fs::read_to_string(temp.path().join("out/blob_report.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(report["errors"][0]["kind"], "UnreadableInputError");
    assert_eq!(report["errors"][0]["stage"], "decode");
}

#[test]
fn invalid_overlap_is_rejected_before_processing() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("a.yaml");
    fs::write(&input, "a: 1\n").unwrap();

    nfprep()
        .arg("process")
        .arg(&input)
        .arg("--output")
        .arg(temp.path().join("out"))
        .args(["--max-lines", "10", "--overlap-lines", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlap"));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn detect_prints_format_and_encoding() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("nrf.json");
    fs::write(&input, "{\n  \"nrf\": {\"port\": 8080}\n}\n").unwrap();

    let output = nfprep().arg("detect").arg(&input).output().unwrap();
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["format"], "json");
    assert_eq!(body["method"], "extension");
    assert_eq!(body["encoding"], "utf-8");
    assert_eq!(body["line_count"], 3);
}

#[test]
fn patterns_reflect_the_settings_file() {
    let temp = tempdir().unwrap();
    let settings = temp.path().join("nfprep.toml");
    fs::write(
        &settings,
        "[desensitization]\ndisable = [\"customers\", \"urls\"]\n\n[[desensitization.patterns]]\nname = \"hosts\"\nkeywords = [\"core-1\"]\nstrategy = { kind = \"full\" }\n",
    )
    .unwrap();

    let output = nfprep()
        .arg("--config")
        .arg(&settings)
        .arg("patterns")
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["passwords", "imsi", "imei", "phone_numbers", "ip_addresses", "hosts"]
    );
    assert_eq!(body[0]["strategy"], "key_value");
    assert_eq!(body[5]["strategy"], "full");
}

#[test]
fn same_named_inputs_keep_separate_artifacts() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("in");
    fs::create_dir_all(input.join("a")).unwrap();
    fs::create_dir_all(input.join("b")).unwrap();
    fs::write(input.join("a/amf.yaml"), "amf:\n  ip: 10.1.2.3\n").unwrap();
    fs::write(input.join("b/amf.yaml"), "smf:\n  ip: 10.9.9.9\n").unwrap();
    let out = temp.path().join("out");

    nfprep()
        .arg("process")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let first = fs::read_to_string(out.join("a__amf_yaml_desensitized.txt")).unwrap();
    let second = fs::read_to_string(out.join("b__amf_yaml_desensitized.txt")).unwrap();
    assert_eq!(first, "amf:\n  ip: 10.1.xxx.xxx\n");
    assert_eq!(second, "smf:\n  ip: 10.9.xxx.xxx\n");
    assert!(!out.join("amf_desensitized.txt").exists());
}

#[test]
fn rerun_replaces_stale_chunks() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("upf.yaml");
    fs::write(&input, "a: 1\nb: 2\nc: 3\nd: 4\ne: 5\nf: 6\n").unwrap();
    let out = temp.path().join("out");
    let chunk_dir = out.join("upf_chunks");

    let run = |max_lines: &str| {
        nfprep()
            .arg("process")
            .arg(&input)
            .arg("--output")
            .arg(&out)
            .args(["--max-lines", max_lines, "--overlap-lines", "0"])
            .assert()
            .success();
    };

    run("2");
    assert!(chunk_dir.join("chunk_0002.txt").is_file());

    run("10");
    assert!(chunk_dir.join("chunk_0000.txt").is_file());
    assert!(!chunk_dir.join("chunk_0001.txt").exists());
    assert!(!chunk_dir.join("chunk_0002.txt").exists());
    let index = fs::read_to_string(chunk_dir.join("chunks_index.yaml")).unwrap();
    assert!(index.starts_with("total_chunks: 1\n"));
}
