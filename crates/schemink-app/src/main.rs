//! `schemink` command-line entry point.

use clap::{ArgAction, Parser, Subcommand};
use kurbo::Size;
use schemink_app::{
    AppConfig, AppResult, DocumentInfo, RenderOptions, catalog_table, print_shortcuts, read_scene,
    render_svg, write_output,
};
use schemink_core::catalog::Catalog;
use schemink_core::session::Session;
use schemink_core::storage::{DEFAULT_DOCUMENT_KEY, Storage};
use schemink_render::GridStyle;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "SchemInk schematic documents from the command line",
    long_about = None
)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a document to SVG
    Render {
        #[arg(value_name = "DOC")]
        document: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Keep the default view instead of zooming to fit
        #[arg(long)]
        no_fit: bool,
        /// Grid style: none, lines or dots
        #[arg(long)]
        grid: Option<String>,
    },
    /// Summarize a document
    Info {
        #[arg(value_name = "DOC")]
        document: PathBuf,
    },
    /// List the symbol catalog
    Catalog,
    /// List keyboard shortcuts
    Shortcuts,
    /// Copy a document into the document store
    Store {
        #[arg(value_name = "DOC")]
        document: PathBuf,
        #[arg(long, default_value = DEFAULT_DOCUMENT_KEY)]
        key: String,
    },
    /// Write a stored document back out as JSON
    Fetch {
        #[arg(long, default_value = DEFAULT_DOCUMENT_KEY)]
        key: String,
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
    /// List stored documents
    List,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(path: Option<&Path>) -> AppResult<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::default()),
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render {
            document,
            output,
            width,
            height,
            no_fit,
            grid,
        } => {
            let scene = read_scene(&document)?;
            let mut options = RenderOptions::from_config(&config);
            options.viewport = Size::new(
                f64::from(width.unwrap_or(config.width)),
                f64::from(height.unwrap_or(config.height)),
            );
            options.fit = !no_fit;
            if let Some(name) = grid {
                match GridStyle::from_name(&name) {
                    Some(style) => options.grid = style,
                    None => {
                        let fallback = options.grid.name();
                        log::warn!("Unknown grid style {name:?}, using {fallback}");
                    }
                }
            }
            let svg = render_svg(scene, &config.editor, &options)?;
            write_output(output.as_deref(), &svg)?;
        }
        Command::Info { document } => {
            let scene = read_scene(&document)?;
            let info = DocumentInfo::from_scene(&scene, &Catalog::builtin());
            print!("{info}");
        }
        Command::Catalog => print!("{}", catalog_table(&Catalog::builtin())),
        Command::Shortcuts => print_shortcuts(),
        Command::Store { document, key } => {
            let storage = config.storage()?;
            let session = Session::with_scene(config.editor.clone(), read_scene(&document)?);
            session.save_to_storage(&storage, &key)?;
            log::info!(
                "Stored {} as {key:?} in {}",
                document.display(),
                storage.base_path().display()
            );
        }
        Command::Fetch { key, output } => {
            let storage = config.storage()?;
            let mut session = Session::new(config.editor.clone());
            session.load_from_storage(&storage, &key)?;
            write_output(output.as_deref(), &session.export_json()?)?;
        }
        Command::List => {
            let storage = config.storage()?;
            for key in storage.list()? {
                println!("{key}");
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
