use std::{path::PathBuf, process::Command};

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_symbol-swap"))
}

#[test]
fn cli_generate_writes_task_directories() {
    let out = PathBuf::from("target").join("cli_smoke").join("generate");
    let _ = std::fs::remove_dir_all(&out);

    let status = bin()
        .args(["generate", "--num-samples", "2", "--seed", "11", "--no-videos"])
        .arg("--output")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let root = out.join("symbol_worlds_symbol_editing_task");
    for index in 0..2 {
        let dir = root.join(format!("symbol_worlds_symbol_editing_{index:08}"));
        for file in [
            "first_frame.png",
            "final_frame.png",
            "prompt.txt",
            "metadata.json",
        ] {
            assert!(dir.join(file).is_file(), "missing {}", dir.join(file).display());
        }
        assert!(!dir.join("ground_truth.mp4").exists());

        let meta: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("metadata.json")).unwrap())
                .unwrap();
        let desc = &meta["description"];
        let replacement = format!(
            "{} {}",
            desc["replacement_identity"]["color"].as_str().unwrap(),
            desc["replacement_identity"]["shape"].as_str().unwrap()
        );
        let prompt = std::fs::read_to_string(dir.join("prompt.txt")).unwrap();
        assert!(prompt.contains(&replacement), "{prompt}");
        assert_eq!(meta["video"], serde_json::Value::Null);
    }
}

#[test]
fn cli_frame_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("preview.png");
    let _ = std::fs::remove_file(&out_path);

    let status = bin()
        .args(["frame", "--seed", "3", "--which", "final", "--out"])
        .arg(&out_path)
        .status()
        .unwrap();
    assert!(status.success());

    let img = image::open(&out_path).unwrap();
    assert_eq!((img.width(), img.height()), (512, 512));
}

#[test]
fn cli_rejects_invalid_config() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let cfg_path = dir.join("bad_config.json");
    std::fs::write(&cfg_path, r#"{ "max_sequence_length": 49 }"#).unwrap();

    let output = bin()
        .args(["generate", "--num-samples", "1", "--no-videos", "--config"])
        .arg(&cfg_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("configuration error"), "{stderr}");
}
