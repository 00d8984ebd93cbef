//! pasteroute CLI and TUI
//!
//! Manage paste rules and route pasted text into new notes of a vault.

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pasteroute::host::{ActiveDocument, DocumentInserter, FsVault, Selection, SystemClipboard};
use pasteroute::{Config, Decision, PasteApp, PasteOutcome, PasteSource, Rule, Theme, datetime, notifications};

#[derive(Parser, Debug)]
#[command(name = "pasteroute")]
#[command(author, version, about = "Route pasted text into new notes using regex rules")]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the rule editor (default)
    Ui {
        /// Color theme, e.g. dracula or nord
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// List all rules in priority order
    List,

    /// Validate config file and rule patterns
    Check,

    /// Paste text into a note (dry-run by default)
    Paste(PasteArgs),

    /// Add, rename, remove or show rules
    #[command(subcommand)]
    Rule(RuleCommand),

    /// Show or set the date format used by ${date}
    Format {
        /// New format, e.g. YYYY-MM-DD
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct PasteArgs {
    /// Vault root directory
    #[arg(long, value_name = "DIR")]
    vault: PathBuf,

    /// Active note, relative to the vault root
    #[arg(long, value_name = "PATH")]
    note: Option<String>,

    /// Text being pasted (otherwise the clipboard is read)
    #[arg(long, conflicts_with = "stdin")]
    text: Option<String>,

    /// Read the pasted text from stdin
    #[arg(long)]
    stdin: bool,

    /// Byte range selected in the note, START..END or a cursor offset
    #[arg(long, value_name = "S..E")]
    selection: Option<Selection>,

    /// Actually create the note and edit the active note
    #[arg(long)]
    apply: bool,

    /// Show desktop notifications
    #[arg(long)]
    notify: bool,
}

#[derive(clap::Subcommand, Debug)]
enum RuleCommand {
    /// Add a rule at the lowest priority, or replace one with the same name
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        desc: Option<String>,

        /// Regex tested against the pasted text
        #[arg(long, default_value = "")]
        pattern: String,

        /// Target folder; ./ is relative to the active note
        #[arg(long)]
        folder: String,

        /// New note name without extension
        #[arg(long)]
        filename_format: String,

        /// Content template; ${content} is the pasted text
        #[arg(long)]
        template: Option<String>,
    },

    /// Rename a rule (it moves to the lowest priority)
    Rename { old: String, new: String },

    /// Remove a rule
    Remove {
        name: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Print a rule as JSON
    Show { name: String },
}

/// Log file used while the TUI owns the terminal
fn log_file_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("pasteroute")
        .join("pasteroute.log")
}

fn init_logging(verbose: bool, tui: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::new(
        std::env::var("PASTEROUTE_LOG").unwrap_or_else(|_| log_level.to_string()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if tui {
        let path = log_file_path();
        let file = path
            .parent()
            .map(std::fs::create_dir_all)
            .transpose()
            .and_then(|_| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
            })
            .ok();
        let layer = file.map(|f| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(f))
        });
        registry.with(layer).init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let tui = matches!(cli.command, None | Some(Commands::Ui { .. }));
    init_logging(cli.verbose, tui);

    let config_path = cli.config.as_deref();

    match cli.command {
        None => {
            pasteroute::app::run(cli.config, Theme::default()).await?;
        }
        Some(Commands::Ui { theme }) => {
            pasteroute::app::run(cli.config, Theme::from_name(theme.as_deref())).await?;
        }
        Some(Commands::List) => {
            let config = Config::load(config_path)?;
            println!("Rules:");
            for (i, rule) in config.user_rules.iter().enumerate() {
                let status = if rule.validate().is_ok() { "✓" } else { "✗" };
                println!(
                    "  {} [{}] {}  /{}/ -> {}/{}",
                    status,
                    i + 1,
                    rule.name,
                    rule.pattern,
                    rule.folder,
                    rule.filename_format
                );
            }
        }
        Some(Commands::Check) => match Config::load(config_path).and_then(|c| c.validate().map(|_| c)) {
            Ok(config) => {
                println!("✓ Config is valid");
                println!("  {} rules", config.user_rules.len());
                println!("  date format: {}", config.datetime_format);
            }
            Err(e) => {
                eprintln!("✗ Config error: {:#}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Paste(args)) => {
            let config = Config::load(config_path)?;
            paste(config, args).await?;
        }
        Some(Commands::Rule(command)) => {
            let mut config = Config::load(config_path)?;
            edit_rules(&mut config, config_path, command)?;
        }
        Some(Commands::Format { format }) => {
            let mut config = Config::load(config_path)?;
            if let Some(format) = format {
                config.datetime_format = format;
                config.save(config_path)?;
            }
            println!(
                "{}  (e.g. {})",
                config.datetime_format,
                datetime::format(&Local::now(), &config.datetime_format)
            );
        }
    }

    Ok(())
}

async fn paste(config: Config, args: PasteArgs) -> Result<()> {
    notifications::init(args.notify);

    let vault = FsVault::new(&args.vault);
    let active = args.note.as_deref().map(ActiveDocument::from_vault_path);
    let note_file = vault.resolve(args.note.as_deref().unwrap_or_default());
    let inserter = DocumentInserter::new(note_file, args.selection);

    let source = if let Some(text) = args.text {
        PasteSource::Event(Some(text))
    } else if args.stdin {
        PasteSource::Event(std::io::read_to_string(std::io::stdin()).ok())
    } else {
        PasteSource::Command
    };

    let mut app = PasteApp::new(
        config,
        Box::new(SystemClipboard::new()),
        Box::new(vault),
        Box::new(inserter),
        active,
    );
    let now = Local::now();

    if args.apply {
        match app.paste(source, now).await {
            Ok(PasteOutcome::Embedded(plan)) => {
                let path = plan.file_path();
                notifications::notify_created(&path);
                println!("Created {} via rule '{}'", path, plan.rule);
            }
            Ok(PasteOutcome::Default(text)) => {
                println!("No rule matched, pasted {} bytes as is", text.len());
            }
            Ok(PasteOutcome::Aborted) => println!("Nothing to paste"),
            Err(e) => {
                notifications::report(&e);
                return Err(e.into());
            }
        }
        return Ok(());
    }

    // Dry run: decide only
    let Some(active) = app.active_document() else {
        let e = pasteroute::PasteError::NoActiveDocument;
        notifications::report(&e);
        return Err(e.into());
    };
    println!("[dry-run] active note: {}", active.path);

    let decision = match app.read(source).await {
        Ok(text) => app.decide(&text, now),
        Err(pasteroute::PasteError::NoPlainText) => {
            println!("[dry-run] nothing to paste");
            return Ok(());
        }
        Err(e) => Err(e),
    };

    match decision {
        Ok(Decision::Plan(plan)) => {
            println!("[dry-run] rule:   {}", plan.rule);
            println!("[dry-run] create: {}", plan.file_path());
            println!("[dry-run] insert: {}", plan.embed.trim_end());
            println!("{}", plan.content);
        }
        Ok(Decision::NoMatch) => println!("[dry-run] no rule matched, text pasted as is"),
        Err(e) => {
            notifications::report(&e);
            return Err(e.into());
        }
    }

    Ok(())
}

fn edit_rules(config: &mut Config, config_path: Option<&Path>, command: RuleCommand) -> Result<()> {
    match command {
        RuleCommand::Add {
            name,
            desc,
            pattern,
            folder,
            filename_format,
            template,
        } => {
            let mut rule = Rule::new(name, pattern, folder, filename_format);
            rule.description = desc.filter(|d| !d.is_empty());
            rule.template = template.filter(|t| !t.is_empty());
            if let Err(e) = rule.validate() {
                eprintln!("warning: {}", e);
            }

            let name = rule.name.clone();
            let replaced = config.user_rules.insert(rule).is_some();
            config.save(config_path)?;
            if replaced {
                println!("Updated rule '{}'", name);
            } else {
                println!("Added rule '{}'", name);
            }
        }
        RuleCommand::Rename { old, new } => {
            if old != new && config.user_rules.get(&new).is_some() {
                bail!("A rule named '{}' already exists", new);
            }
            if !config.user_rules.rename(&old, &new) {
                bail!("No rule named '{}'", old);
            }
            config.save(config_path)?;
            println!("Renamed '{}' to '{}'", old, new);
        }
        RuleCommand::Remove { name, yes } => {
            if config.user_rules.get(&name).is_none() {
                bail!("No rule named '{}'", name);
            }
            if !yes && !confirm(&format!("Delete rule '{}'?", name))? {
                println!("Cancelled");
                return Ok(());
            }
            config.user_rules.remove(&name);
            config.save(config_path)?;
            println!("Deleted rule '{}'", name);
        }
        RuleCommand::Show { name } => {
            let rule = config
                .user_rules
                .get(&name)
                .with_context(|| format!("No rule named '{}'", name))?;
            println!("{}", serde_json::to_string_pretty(rule)?);
        }
    }

    Ok(())
}
