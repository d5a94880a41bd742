mod atomic_write;
mod config;
mod document;
mod path_utils;
mod terminal_host;
mod workspace;

use std::io::IsTerminal as _;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use clap::ValueEnum;
use md_img_paster_core::DEFAULT_IMAGE_FOLDER;
use md_img_paster_core::ErrorClass;
use md_img_paster_core::NameStyle;
use md_img_paster_core::PasteError;
use md_img_paster_core::PasteOutcome;
use md_img_paster_core::PasteRequest;
use md_img_paster_core::Platform;
use md_img_paster_core::Position;
use md_img_paster_core::ProcessClipboard;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::terminal_host::TerminalHost;

const LOG_ENV: &str = "MD_IMG_PASTER_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "kebab-case")]
enum CliNameStyle {
    Random,
    Timestamp,
}

impl CliNameStyle {
    fn as_core(self) -> NameStyle {
        match self {
            CliNameStyle::Random => NameStyle::Random,
            CliNameStyle::Timestamp => NameStyle::Timestamp,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Save the clipboard image under the project and insert a Markdown reference to it"
)]
struct Cli {
    /// Project root. Defaults to the enclosing git checkout, else the current directory.
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Document that receives the image reference.
    #[arg(long)]
    document: Option<PathBuf>,

    /// Caret position as LINE:COLUMN (1-based). Defaults to the end of the document.
    #[arg(long, value_parser = parse_position)]
    cursor: Option<Position>,

    /// Other end of the selection as LINE:COLUMN (1-based); the selection is replaced.
    #[arg(long, value_parser = parse_position, requires = "cursor")]
    selection_end: Option<Position>,

    /// Filename to use instead of prompting for one.
    #[arg(long)]
    name: Option<String>,

    /// Continue without asking when the document is not Markdown.
    #[arg(long, short = 'y')]
    yes: bool,

    /// Folder under the project root that receives images.
    #[arg(long)]
    folder: Option<String>,

    /// How the suggested filename is generated.
    #[arg(long, value_enum)]
    name_style: Option<CliNameStyle>,

    /// Alternate configuration file.
    #[arg(long, env = "MD_IMG_PASTER_CONFIG")]
    config: Option<PathBuf>,
}

fn parse_position(value: &str) -> Result<Position, String> {
    let (line, column) = value
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COLUMN, got `{value}`"))?;
    let line = line
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("invalid line `{line}`: {err}"))?;
    let column = column
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("invalid column `{column}`: {err}"))?;
    if line == 0 || column == 0 {
        return Err("LINE and COLUMN start at 1".to_string());
    }
    Ok(Position::new(line - 1, column - 1))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

/// Whether the process should exit non-zero for this result.
fn is_failure(result: &Result<PasteOutcome, PasteError>) -> bool {
    match result {
        Ok(_) => false,
        Err(err) => matches!(
            err.class(),
            ErrorClass::GuardError | ErrorClass::Operational
        ),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("resolve current directory")?;
    let config_store = match &cli.config {
        Some(path) => config::ConfigStore::new(path_utils::absolutize(path, &cwd)),
        None => config::ConfigStore::new_default()?,
    };
    let settings = config_store.load().unwrap_or_else(|err| {
        tracing::warn!("failed to load config: {err:#}");
        config::Settings::default()
    });

    let folder = cli
        .folder
        .or(settings.image_folder)
        .unwrap_or_else(|| DEFAULT_IMAGE_FOLDER.to_string());
    let name_style = cli
        .name_style
        .map(CliNameStyle::as_core)
        .or(settings.name_style)
        .unwrap_or_default();

    let workspace_root = workspace::resolve_workspace_root(cli.workspace.as_deref(), &cwd);
    let document = cli
        .document
        .as_deref()
        .map(|path| {
            document::describe_document(
                &path_utils::absolutize(path, &cwd),
                cli.cursor,
                cli.selection_end,
            )
        })
        .transpose()
        .context("open document")?;

    let request = PasteRequest {
        platform: Platform::current(),
        folder: PathBuf::from(folder),
        default_name: md_img_paster_core::generate_default_name(name_style, Local::now()),
    };
    tracing::debug!(?request, "starting paste");

    let mut host = TerminalHost::new(
        workspace_root,
        document,
        BufReader::new(tokio::io::stdin()),
        std::io::stderr(),
    )
    .with_preset_name(cli.name)
    .with_assume_continue(cli.yes);
    let clipboard = ProcessClipboard::macos();

    let result = md_img_paster_core::paste_image(&mut host, &clipboard, &request).await;
    md_img_paster_core::report(&mut host, &result);

    if let Ok(outcome) = &result {
        println!("{}", outcome.image_path.display());
    }
    if is_failure(&result) {
        std::process::exit(1);
    }
    Ok(())
}
