//! `vanishing-fields`: load an element tree, register its collapsible fields and
//! drive them interactively or from a script, then report every field's state.

use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use vanishing_fields::{
    Document, DocumentFormat, GlobalOptions, OutputDestination, OutputOptions, Script, Session,
    VanishingUi, emit, parse_with_fallback,
};

#[derive(Debug, Parser)]
#[command(
    name = "vanishing-fields",
    version,
    about = "Collapsible form fields that swap between a summary label and their inputs"
)]
struct Cli {
    /// Document spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'd', long = "document", value_name = "SPEC")]
    document: String,

    /// Global field options: file path, inline payload, or "-" for stdin
    #[arg(short = 'c', long = "options", value_name = "SPEC")]
    options: Option<String>,

    /// Replay these steps headlessly instead of starting the terminal UI
    #[arg(short = 's', long = "script", value_name = "SPEC")]
    script: Option<String>,

    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.script.is_some())?;

    let mut diagnostics = DiagnosticCollector::default();

    let sources: Vec<Source<'_>> = [
        ("document", Some(cli.document.as_str())),
        ("options", cli.options.as_deref()),
        ("script", cli.script.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, spec)| spec.map(|spec| Source { label, spec }))
    .collect();

    let stdin_users: Vec<&str> = sources
        .iter()
        .filter(|source| source.spec == "-")
        .map(|source| source.label)
        .collect();
    if stdin_users.len() > 1 {
        diagnostics.push_input(
            &stdin_users.join("/"),
            "cannot read more than one input from stdin; provide inline content or files",
        );
    }
    let stdin_conflict = stdin_users.len() > 1;

    let mut document_extension = None;
    let mut document = None;
    let mut options = Some(GlobalOptions::default());
    let mut script = None;
    for source in &sources {
        let format = match extension_format(Path::new(source.spec)) {
            Ok(format) => format,
            Err(feature) => {
                diagnostics.push_input(
                    source.label,
                    format!(
                        "'{}' needs this build to enable the '{feature}' feature",
                        source.spec
                    ),
                );
                continue;
            }
        };
        if stdin_conflict && source.spec == "-" {
            continue;
        }
        let value = match source.load(format.unwrap_or_default()) {
            Ok(value) => value,
            Err(err) => {
                diagnostics.push_input(source.label, format!("{err:#}"));
                continue;
            }
        };
        let decoded = match source.label {
            "document" => {
                document_extension = format;
                Document::from_value(value)
                    .map(|loaded| document = Some(loaded))
                    .map_err(|err| format!("{err:#}"))
            }
            "options" => serde_json::from_value::<GlobalOptions>(value)
                .map(|loaded| options = Some(loaded))
                .map_err(|err| format!("invalid field options: {err}")),
            _ => Script::from_value(value)
                .map(|loaded| script = Some(loaded))
                .map_err(|err| format!("{err:#}")),
        };
        if let Err(err) = decoded {
            if source.label == "options" {
                options = None;
            }
            diagnostics.push_input(source.label, err);
        }
    }

    let (output_settings, output_paths) =
        build_output_options(&cli, document_extension, &mut diagnostics);
    ensure_output_paths_available(&output_paths, cli.force, &mut diagnostics);

    diagnostics.into_result()?;

    let (Some(document), Some(options)) = (document, options) else {
        return Err(eyre!("document and options failed to load"));
    };

    let mut session = Session::new(document, &options);
    for skipped in &session.registration().skipped {
        tracing::info!(
            position = skipped.position,
            reason = ?skipped.reason,
            "field element skipped"
        );
    }

    let session = match script {
        Some(script) => {
            session
                .run_script(&script)
                .wrap_err("script step failed")?;
            session
        }
        None => {
            if !io::stdout().is_terminal() {
                return Err(eyre!(
                    "stdout is not a terminal; pass --script to run headlessly"
                ));
            }
            VanishingUi::new(session).run().map_err(Report::msg)?
        }
    };

    if let Some(options) = output_settings {
        emit(&session.report(), &options).map_err(Report::msg)?;
    }

    Ok(())
}

/// Headless runs log to stderr; the terminal UI only logs when given a file.
fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None if headless => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
        None => {}
    }
    Ok(())
}

/// One `--document`/`--options`/`--script` argument.
struct Source<'a> {
    label: &'static str,
    spec: &'a str,
}

impl Source<'_> {
    /// Reads `-` from stdin, otherwise the named file; a spec that names no
    /// existing file is parsed as inline content.
    fn load(&self, format: DocumentFormat) -> Result<Value> {
        let (contents, origin) = if self.spec == "-" {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            (buffer, "stdin")
        } else {
            match fs::read_to_string(self.spec) {
                Ok(contents) => (contents, "file"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    (self.spec.to_string(), "inline")
                }
                Err(err) => {
                    return Err(Report::new(err)
                        .wrap_err(format!("failed to read {} from {}", self.label, self.spec)));
                }
            }
        };
        parse_with_fallback(&contents, format)
            .map_err(|err| eyre!("failed to parse {origin} {}: {err:#}", self.label))
    }
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn len(&self) -> usize {
        self.messages.len()
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn build_output_options(
    cli: &Cli,
    document_hint: Option<DocumentFormat>,
    diagnostics: &mut DiagnosticCollector,
) -> (Option<OutputOptions>, Vec<PathBuf>) {
    let mut destinations = Vec::new();

    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            destinations.push(OutputDestination::file(raw));
        }
    }

    if destinations.is_empty() {
        if !cli.outputs.is_empty() {
            return (None, Vec::new());
        }
        destinations.push(OutputDestination::Stdout);
    }

    let file_paths: Vec<PathBuf> = destinations
        .iter()
        .filter_map(|dest| match dest {
            OutputDestination::File(path) => Some(path.clone()),
            OutputDestination::Stdout => None,
        })
        .collect();

    let start = diagnostics.len();
    let format = if file_paths.is_empty() {
        document_hint.unwrap_or_default()
    } else {
        infer_format_from_files(&file_paths, diagnostics).unwrap_or_default()
    };

    if diagnostics.len() > start {
        return (None, file_paths);
    }

    (
        Some(OutputOptions {
            format,
            pretty: !cli.no_pretty,
            destinations,
        }),
        file_paths,
    )
}

fn infer_format_from_files(
    file_paths: &[PathBuf],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for path in file_paths {
        match extension_format(path) {
            Ok(Some(format)) => match detected {
                Some(existing) if existing != format => diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                Some(_) => {}
                None => detected = Some(format),
            },
            Ok(None) => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use .json/.yaml/.toml",
                path.display()
            )),
            Err(feature) => diagnostics.push_output(format!(
                "output file {} needs this build to enable the '{feature}' feature",
                path.display()
            )),
        }
    }
    detected
}

/// Format named by a path's extension. `Err` carries the cargo feature a
/// recognised but disabled format needs.
fn extension_format(path: &Path) -> std::result::Result<Option<DocumentFormat>, &'static str> {
    let Some(ext) = path.extension() else {
        return Ok(None);
    };
    let normalized = ext.to_string_lossy().to_ascii_lowercase();
    if let Some(format) = DocumentFormat::from_extension(&normalized) {
        return Ok(Some(format));
    }
    match normalized.as_str() {
        "yaml" | "yml" => Err("yaml"),
        "toml" => Err("toml"),
        _ => Ok(None),
    }
}

fn ensure_output_paths_available(
    paths: &[PathBuf],
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for path in paths {
        if path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_resolve_to_formats() {
        assert_eq!(
            extension_format(Path::new("doc.JSON")),
            Ok(Some(DocumentFormat::Json))
        );
        assert_eq!(extension_format(Path::new("doc.txt")), Ok(None));
        assert_eq!(extension_format(Path::new("inline [1, 2]")), Ok(None));
    }

    #[test]
    fn diagnostics_are_numbered() {
        let mut diagnostics = DiagnosticCollector::default();
        diagnostics.push_input("document", "missing");
        diagnostics.push_output("taken");
        let err = diagnostics.into_result().unwrap_err().to_string();
        assert!(err.contains("1. input (document): missing"));
        assert!(err.contains("2. output: taken"));
    }
}
