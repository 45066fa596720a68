use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use icast_core::{decode_datagram, decode_hex, write_atomic};

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("input.hex");
        if !input.exists() {
            continue;
        }
        let output = path.join("expected_facts.json");
        regenerate_one(&input, &output)?;
    }

    Ok(())
}

fn regenerate_one(input: &Path, output: &Path) -> Result<(), String> {
    let text = fs::read_to_string(input)
        .map_err(|err| format!("failed to read {}: {}", input.display(), err))?;
    let raw = decode_hex(&text)
        .map_err(|err| format!("invalid hex in {}: {}", input.display(), err))?;
    let facts = decode_datagram(&raw)
        .map_err(|err| format!("decode failed for {}: {}", input.display(), err))?;
    let json = serde_json::to_string(&facts)
        .map_err(|err| format!("JSON serialization failed: {}", err))?;
    write_atomic(output, json.as_bytes())
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
