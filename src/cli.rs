//! Minimal CLI: load → (markdown | operations)
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use swagger_md::{render_document, walk, AssembleOptions, Document};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// render Swagger / OpenAPI documents into tag-grouped markdown pseudocode
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// log progress (overridden by RUST_LOG)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// render the markdown document
    Markdown(MarkdownOut),
    /// print the extracted operation records as JSON
    Operations(OperationsOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select the API document inside each input (e.g. /data/spec)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each input; must yield exactly one document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// output file (stdout if omitted); single input only
    #[arg(short, long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// write one file per input into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct MarkdownOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// section name for operations without tags
    #[arg(long, default_value = "Default")]
    default_tag: String,

    /// omit the leading [TOC] marker
    #[arg(long, default_value_t = false)]
    no_toc: bool,
}

#[derive(clap::Parser, Debug)]
struct OperationsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    output_settings: OutputSettings,
}

/// One loaded input.
struct Source {
    path: PathBuf,
    document: Document,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> anyhow::Result<Vec<Source>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        source_paths
            .into_iter()
            .map(|path| {
                let document = self
                    .load_document(&path)
                    .with_context(|| format!("failed to load {}", path.display()))?;
                Ok(Source { path, document })
            })
            .collect()
    }

    fn load_document(&self, path: &Path) -> anyhow::Result<Document> {
        let source = std::fs::read_to_string(path).context("failed to read source file")?;
        let mut value = serde_json::from_str::<serde_json::Value>(&source)
            .context("failed to parse JSON source file")?;
        if let Some(pointer) = self.json_pointer.as_deref() {
            value = match value.pointer_mut(pointer) {
                Some(selected) => selected.take(),
                None => bail!("JSON pointer {pointer} selects nothing"),
            };
        }
        if let Some(jq_expr) = self.jq_expr.as_deref() {
            value = swagger_md::jq_exec::select_one(jq_expr, &value)?;
        }
        Ok(Document::from_value(value)?)
    }
}

impl OutputSettings {
    /// Render every source (in parallel when writing one file per input) and
    /// write the results.
    fn emit<F>(&self, sources: &[Source], extension: &str, render: F) -> anyhow::Result<()>
    where
        F: Fn(&Document) -> anyhow::Result<String> + Sync,
    {
        if let Some(out_dir) = self.out_dir.as_ref() {
            std::fs::create_dir_all(out_dir)
                .with_context(|| format!("failed to create {}", out_dir.display()))?;
            return sources.par_iter().try_for_each(|source| {
                let rendered = render(&source.document)
                    .with_context(|| format!("failed to render {}", source.path.display()))?;
                let stem = source.path.file_stem().unwrap_or(source.path.as_os_str());
                let target = out_dir.join(format!("{}.{extension}", stem.to_string_lossy()));
                write_output(&target, &rendered)
            });
        }

        let rendered = sources
            .iter()
            .map(|source| {
                render(&source.document)
                    .with_context(|| format!("failed to render {}", source.path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        match self.out.as_ref() {
            Some(out) => {
                if rendered.len() != 1 {
                    bail!("--out takes a single input ({} given); use --out-dir", rendered.len());
                }
                write_output(out, &rendered[0])
            }
            None => {
                println!("{}", rendered.join("\n\n"));
                Ok(())
            }
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Markdown(target) => {
                let sources = target.input_settings.load()?;
                let options = AssembleOptions {
                    default_tag: target.default_tag.clone(),
                    table_of_contents: !target.no_toc,
                };
                target.output_settings.emit(&sources, "md", |document| {
                    Ok(render_document(document, &options)?)
                })
            }
            Command::Operations(target) => {
                let sources = target.input_settings.load()?;
                target.output_settings.emit(&sources, "json", |document| {
                    let operations = walk(document)?;
                    Ok(serde_json::to_string_pretty(&operations)?)
                })
            }
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), "wrote output");
    eprintln!("{} {}", "wrote".green(), out.display());
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
            }
            if out.len() == before {
                // explicit glob that matched nothing
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
