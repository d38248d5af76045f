use bmi_core::config::DataConfig;
use bmi_core::preferences::{HEIGHT_KEY, RESULTS_KEY};
use bmi_core::*;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bmi")]
#[command(about = "Body mass index calculator with history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep history from previous launches instead of clearing it
    #[arg(long, global = true)]
    keep_history: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Session,

    /// Compute BMI once and record it
    Compute {
        /// Weight in pounds
        #[arg(long, allow_hyphen_values = true)]
        weight: String,

        /// Height in inches (defaults to the last height used)
        #[arg(long, allow_hyphen_values = true)]
        height: Option<String>,
    },

    /// Show recorded history
    History {
        /// Print as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Delete a history entry
    Delete {
        /// Entry id as shown by `history`
        id: EntryId,
    },

    /// Show the remembered height and last result
    Last,
}

fn main() -> Result<ExitCode> {
    bmi_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let reset_history = config.history.reset_on_startup && !cli.keep_history;

    tracing::info!(
        "Using data directory {:?} (reset history: {})",
        config.data.data_dir,
        reset_history
    );

    match cli.command {
        Some(Commands::Session) | None => cmd_session(&config.data, reset_history)?,
        Some(Commands::Compute { weight, height }) => {
            return cmd_compute(&config.data, reset_history, weight, height)
        }
        Some(Commands::History { csv }) => cmd_history(&config.data, csv)?,
        Some(Commands::Delete { id }) => cmd_delete(&config.data, id)?,
        Some(Commands::Last) => cmd_last(&config.data)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn open_app(data: &DataConfig) -> Result<App<JsonPreferences, SqliteHistory>> {
    let prefs = JsonPreferences::new(data.preferences_path());
    let history = SqliteHistory::open(&data.history_db_path())?;
    Ok(App::new(prefs, history))
}

fn cmd_session(data: &DataConfig, reset_history: bool) -> Result<()> {
    let mut app = open_app(data)?;
    show_alerts(&app.startup(reset_history));

    println!("Enter '<weight> [height]' to compute, '?' for help.");

    let stdin = io::stdin();
    let mut rendered = None;

    loop {
        if rendered != Some(app.state().version) {
            render(app.state());
            rendered = Some(app.state().version);
        }

        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_session_command(&line) {
            SessionCommand::Quit => break,
            SessionCommand::Compute { weight, height } => {
                app.set_weight(weight);
                if let Some(height) = height {
                    app.set_height(height);
                }
                show_alerts(&app.calculate().alerts);
            }
            SessionCommand::SetWeight(text) => app.set_weight(text),
            SessionCommand::SetHeight(text) => app.set_height(text),
            SessionCommand::Calculate => show_alerts(&app.calculate().alerts),
            SessionCommand::Delete(id) => show_alerts(&app.delete_entry(id)),
            SessionCommand::List => rendered = None,
            SessionCommand::Help => print_session_help(),
            SessionCommand::Unknown(input) => {
                println!("Unrecognized input: {:?} ('?' for help)", input)
            }
        }
    }

    Ok(())
}

fn cmd_compute(
    data: &DataConfig,
    reset_history: bool,
    weight: String,
    height: Option<String>,
) -> Result<ExitCode> {
    let mut app = open_app(data)?;
    show_alerts(&app.startup(reset_history));

    app.set_weight(weight);
    if let Some(height) = height {
        app.set_height(height);
    }

    let outcome = app.calculate();
    render(app.state());
    show_alerts(&outcome.alerts);

    match outcome.result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::debug!("Computation rejected: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_history(data: &DataConfig, csv: bool) -> Result<()> {
    let history = SqliteHistory::open(&data.history_db_path())?;
    let entries = history.list()?;

    if csv {
        bmi_core::history::write_csv(&entries, io::stdout().lock())?;
    } else if entries.is_empty() {
        println!("No history recorded.");
    } else {
        render_history(&entries);
    }
    Ok(())
}

fn cmd_delete(data: &DataConfig, id: EntryId) -> Result<()> {
    let mut history = SqliteHistory::open(&data.history_db_path())?;
    history.remove(id)?;
    tracing::info!("Deleted history entry {}", id);
    println!("✓ Deleted entry {}", id);
    Ok(())
}

fn cmd_last(data: &DataConfig) -> Result<()> {
    let prefs = JsonPreferences::new(data.preferences_path());
    let height = prefs.get(HEIGHT_KEY)?;
    let results = prefs.get(RESULTS_KEY)?;

    if height.is_none() && results.is_none() {
        println!("No saved values.");
        return Ok(());
    }

    println!("Height: {}", height.unwrap_or_default());
    if let Some(results) = results {
        println!("Last result:");
        println!("{}", results);
    }
    Ok(())
}

fn render(state: &ViewState) {
    println!();
    println!("  Weight (lb): {}", state.weight);
    println!("  Height (in): {}", state.height);

    if !state.results.is_empty() {
        println!();
        let marker = if state.danger { "! " } else { "" };
        for line in state.results.lines() {
            println!("  {}{}", marker, line);
        }
    }

    if !state.entries.is_empty() {
        println!();
        render_history(&state.entries);
    }
    println!();
}

fn render_history(entries: &[HistoryEntry]) {
    println!("BMI History");
    for entry in entries {
        let marker = if entry.done { "*" } else { " " };
        println!("  #{}{} {}:  {}", entry.id, marker, entry.date, entry.value);
    }
}

fn show_alerts(alerts: &[Alert]) {
    for alert in alerts {
        println!("{}: {}", alert.title(), alert.message());
    }
}

fn print_session_help() {
    println!("  <weight> [height]  compute BMI (height defaults to the current field)");
    println!("  w <text>           set weight field");
    println!("  h <text>           set height field");
    println!("  c                  compute with current fields");
    println!("  d <id>             delete history entry");
    println!("  l                  show fields and history");
    println!("  q                  quit");
}

#[derive(Debug, PartialEq)]
enum SessionCommand {
    Compute {
        weight: String,
        height: Option<String>,
    },
    SetWeight(String),
    SetHeight(String),
    Calculate,
    Delete(EntryId),
    List,
    Help,
    Quit,
    Unknown(String),
}

fn parse_session_command(line: &str) -> SessionCommand {
    let input = line.trim();
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    };

    match head {
        "q" | "quit" | "exit" => SessionCommand::Quit,
        "l" | "list" => SessionCommand::List,
        "c" | "compute" => SessionCommand::Calculate,
        "?" | "help" => SessionCommand::Help,
        "w" => SessionCommand::SetWeight(rest.to_string()),
        "h" => SessionCommand::SetHeight(rest.to_string()),
        "d" => match rest.parse() {
            Ok(id) => SessionCommand::Delete(id),
            Err(_) => SessionCommand::Unknown(input.to_string()),
        },
        "" => SessionCommand::Help,
        _ => {
            let mut tokens = input.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(weight), height, None) => SessionCommand::Compute {
                    weight: weight.to_string(),
                    height: height.map(str::to_string),
                },
                _ => SessionCommand::Unknown(input.to_string()),
            }
        }
    }
}
