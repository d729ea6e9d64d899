//! Golden-file runner: renders every `<name>.json` in a fixture directory and
//! compares it with the sibling `<name>.md`.
//!
//! An optional `<name>.options.json` holds `AssembleOptions` overrides.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use swagger_md::{render_document, AssembleOptions, Document};

static LINE_ENDINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").expect("static regex"));

const DEFAULT_FIXTURE_DIR: &str = "tests/fixtures";

/// compare rendered fixtures against their golden markdown
#[derive(Parser, Debug)]
struct RunnerArgs {
    /// directory holding `<name>.json` inputs and `<name>.md` goldens
    #[arg(default_value = DEFAULT_FIXTURE_DIR)]
    fixture_dir: PathBuf,

    /// rewrite the golden files instead of comparing
    #[arg(long, default_value_t = false)]
    bless: bool,
}

#[derive(Debug, Default, Deserialize)]
struct FixtureOptions {
    #[serde(default)]
    assemble: AssembleOptions,
}

enum Outcome {
    Pass,
    Blessed,
    Mismatch { first_diff_line: usize },
    Failed(String),
}

fn main() -> ExitCode {
    let RunnerArgs { fixture_dir: dir, bless } = RunnerArgs::parse();

    let fixtures = match fixture_inputs(&dir) {
        Ok(xs) => xs,
        Err(error) => {
            eprintln!("❌ cannot read {}: {error}", dir.display());
            return ExitCode::FAILURE;
        }
    };

    let mut failures = 0usize;
    for input in &fixtures {
        let name = input.display();
        match run_fixture(input, bless) {
            Outcome::Pass => eprintln!("✅ {name}"),
            Outcome::Blessed => eprintln!("📝 {name} (golden updated)"),
            Outcome::Mismatch { first_diff_line } => {
                failures += 1;
                eprintln!("❌ {name}: output differs from golden at line {first_diff_line}");
            }
            Outcome::Failed(reason) => {
                failures += 1;
                eprintln!("❌ {name}: {reason}");
            }
        }
    }

    eprintln!("{} fixtures, {failures} failed", fixtures.len());
    if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn fixture_inputs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_input = path.extension().is_some_and(|ext| ext == "json")
            && !path.to_string_lossy().ends_with(".options.json");
        if is_input {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

fn run_fixture(input: &Path, bless: bool) -> Outcome {
    let golden_path = input.with_extension("md");
    let options = match load_options(input) {
        Ok(x) => x,
        Err(reason) => return Outcome::Failed(reason),
    };
    let rendered = match std::fs::read_to_string(input)
        .map_err(|e| e.to_string())
        .and_then(|src| Document::from_json(&src).map_err(|e| e.to_string()))
        .and_then(|doc| render_document(&doc, &options.assemble).map_err(|e| e.to_string()))
    {
        Ok(x) => x,
        Err(reason) => return Outcome::Failed(reason),
    };

    if bless {
        return match std::fs::write(&golden_path, &rendered) {
            Ok(()) => Outcome::Blessed,
            Err(error) => Outcome::Failed(format!("cannot write golden: {error}")),
        };
    }

    let golden = match std::fs::read_to_string(&golden_path) {
        Ok(x) => LINE_ENDINGS.replace_all(&x, "\n").into_owned(),
        Err(error) => return Outcome::Failed(format!("missing golden {}: {error}", golden_path.display())),
    };
    if golden == rendered {
        return Outcome::Pass;
    }
    let first_diff_line = golden
        .lines()
        .zip(rendered.lines())
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| golden.lines().count().min(rendered.lines().count()))
        + 1;
    Outcome::Mismatch { first_diff_line }
}

fn load_options(input: &Path) -> Result<FixtureOptions, String> {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let path = input.with_file_name(format!("{stem}.options.json"));
    if !path.exists() {
        return Ok(FixtureOptions::default());
    }
    let src = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
    swagger_md::path_de::from_str_with_path(&src).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_fixture_dir() {
        let args = RunnerArgs::try_parse_from(["dev-test-runner"]).unwrap();
        assert_eq!(args.fixture_dir, PathBuf::from(DEFAULT_FIXTURE_DIR));
        assert!(!args.bless);
    }

    #[test]
    fn accepts_dir_and_bless() {
        let args = RunnerArgs::try_parse_from(["dev-test-runner", "--bless", "other/fixtures"]).unwrap();
        assert_eq!(args.fixture_dir, PathBuf::from("other/fixtures"));
        assert!(args.bless);
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(RunnerArgs::try_parse_from(["dev-test-runner", "--blss"]).is_err());
    }
}
