use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use reportcard_cli::commands::{self, ConfigKey, Workspace};
use reportcard_cli::config;
use reportcard_core::models::language::Language;
use reportcard_core::models::record::{Field, SectionId};
use reportcard_core::state::Action;
use reportcard_enhance::client::EnhanceClient;
use reportcard_export::styles::DocumentStyles;

#[derive(Parser)]
#[command(name = "reportcard")]
#[command(about = "Compose tutorial progress reports and export them as PDF or LaTeX")]
#[command(version)]
struct Cli {
    /// Configuration directory (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Directory holding the saved session
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the report has every required field
    Validate {
        /// Read the report from a JSON file instead of the session
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Render the HTML preview
    Preview {
        #[arg(long)]
        record: Option<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Export LaTeX source (and the logo) for offline typesetting
    Latex {
        #[arg(long)]
        record: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Export a paginated A4 PDF
    Pdf {
        #[arg(long)]
        record: Option<PathBuf>,

        /// Paginate a pre-rendered PNG/JPEG of the report instead of laying out text
        #[arg(long)]
        raster: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Rewrite a section with the language model
    Enhance {
        /// Section to enhance (section1..section4 or its name)
        section: SectionId,

        /// Write the result back into the session
        #[arg(long)]
        apply: bool,
    },

    /// Edit the saved report session
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Print the current report
    Show {
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a field or section
    Set {
        field: Field,
        value: String,

        /// Store a section value as markup rather than plain text
        #[arg(long)]
        html: bool,
    },

    /// Set the logo image, or remove it when no path is given
    Logo { path: Option<PathBuf> },

    /// Switch report language, filling empty sections with defaults
    Language { language: Language },

    /// Replace the session with a record read from a JSON file
    Import { path: PathBuf },

    /// Clear the form back to defaults dated today
    Reset,

    /// Delete the saved session
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the configuration with secrets redacted
    Show,

    /// Set a configuration value (empty value clears optional keys)
    Set { key: ConfigKey, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    run(cli).await.inspect_err(|e| tracing::error!(error = %e, "command failed"))
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => config::default_config_dir()?,
    };
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => config::default_data_dir()?,
    };
    let mut ws = Workspace::open(config_dir, data_dir)?;
    let today = commands::today();
    let styles = DocumentStyles::default();

    match cli.command {
        Commands::Validate { record } => {
            let state = ws.load_state(record.as_deref(), today)?;
            commands::validate(state.record())?;
            println!("ok");
        }
        Commands::Preview { record, out } => {
            let state = ws.load_state(record.as_deref(), today)?;
            if let Some(path) = commands::preview(state.record(), out.as_deref(), today)? {
                println!("{}", path.display());
            }
        }
        Commands::Latex { record, out_dir } => {
            ws.output_dir = out_dir;
            let state = ws.load_state(record.as_deref(), today)?;
            let path = commands::latex(state.record(), &ws.output_dir())?;
            println!("{}", path.display());
        }
        Commands::Pdf {
            record,
            raster,
            out_dir,
        } => {
            ws.output_dir = out_dir;
            let state = ws.load_state(record.as_deref(), today)?;
            let (path, output) =
                commands::pdf(state.record(), raster.as_deref(), &styles, &ws.output_dir())?;
            println!("{} ({} pages)", path.display(), output.page_count);
        }
        Commands::Enhance { section, apply } => {
            let state = ws.load_state(None, today)?;
            let client = EnhanceClient::new(ws.config.enhance_config());
            let enhanced = commands::enhance(&client, state.record(), section).await?;
            println!("{enhanced}");
            if apply {
                ws.update(Action::ApplyEnhancement(section, enhanced), today)?;
                tracing::info!(%section, "enhancement applied");
            }
        }
        Commands::Session { command } => run_session(&ws, command, today)?,
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let info = commands::config_show(&ws);
                println!("{}", serde_json::to_string_pretty(&info)?);
            }
            ConfigCommands::Set { key, value } => {
                commands::config_set(&mut ws.config, key, &value)?;
                config::save_config(&ws.config_dir, &ws.config)?;
            }
        },
    }

    Ok(())
}

fn run_session(ws: &Workspace, command: SessionCommands, today: jiff::civil::Date) -> Result<()> {
    let action = match command {
        SessionCommands::Show { json } => {
            let state = ws.load_state(None, today)?;
            if json {
                println!("{}", serde_json::to_string_pretty(state.record())?);
            } else {
                print!("{}", commands::summarize(state.record()));
            }
            return Ok(());
        }
        SessionCommands::Clear => {
            ws.session.clear()?;
            return Ok(());
        }
        SessionCommands::Set { field, value, html } => commands::set_action(field, &value, html),
        SessionCommands::Logo { path } => commands::logo_action(path.as_deref())?,
        SessionCommands::Language { language } => Action::SwitchLanguage(language),
        SessionCommands::Import { path } => commands::import_action(&path)?,
        SessionCommands::Reset => Action::Reset { today },
    };

    ws.update(action, today)?;
    Ok(())
}
