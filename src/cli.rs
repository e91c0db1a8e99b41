use anyhow::Context;
use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::draft::DraftUpdate;
use crate::kv::SqliteKv;
use crate::logging;
use crate::output::{self, OutputMode};
use crate::session::SessionId;
use crate::theme::Theme;
use crate::time_utils::format_currency;
use crate::tracker::Tracker;

mod commands {
    pub(crate) mod config_command;
    pub(crate) mod invoice_command;
    pub(crate) mod screenshot_command;
}

#[derive(Parser)]
#[command(name = "billtime")]
#[command(version)]
#[command(about = "Track billable time and turn it into invoices")]
#[command(long_about = "billtime times work sessions against a project and hourly rate, \
    keeps a local history of finished sessions and renders printable invoices.\n\n\
    Run without arguments for the interactive timer.\n\n\
    Examples:\n  \
    billtime start --project Acme --rate 85   # Start timing a new session\n  \
    billtime pause                            # Pause; 'start' resumes\n  \
    billtime stop                             # Save the session to history\n  \
    billtime history                          # List saved sessions\n  \
    billtime invoice --client-name \"Acme Co\"  # Invoice every saved session")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding the session database (overrides config)
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a new session, or resume a paused one
    Start {
        /// Project name for the new session
        #[arg(short = 'p', long, value_name = "NAME")]
        project: Option<String>,

        /// Hourly rate for the new session (empty means 0)
        #[arg(short = 'r', long, value_name = "RATE")]
        rate: Option<String>,

        /// Notes for the new session
        #[arg(short = 'n', long, value_name = "TEXT")]
        notes: Option<String>,
    },

    /// Pause the running session
    Pause,

    /// Stop the current session and save it to history
    Stop,

    /// Show the current timer
    #[command(visible_alias = "st")]
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List saved sessions with totals
    #[command(visible_alias = "h")]
    History {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved session by id
    Delete {
        /// Session id as shown by `history`
        id: String,
    },

    /// Change project, rate or notes for the next session
    Set {
        #[arg(short = 'p', long, value_name = "NAME")]
        project: Option<String>,

        /// Hourly rate; empty means 0, non-numeric input is ignored
        #[arg(short = 'r', long, value_name = "RATE")]
        rate: Option<String>,

        #[arg(short = 'n', long, value_name = "TEXT")]
        notes: Option<String>,
    },

    /// Attach screenshots to the current session
    Screenshot {
        #[command(subcommand)]
        action: ScreenshotAction,
    },

    /// Render an HTML invoice from saved sessions
    Invoice {
        /// Include only these session ids (repeatable; default: all)
        #[arg(short = 's', long = "session", value_name = "ID")]
        sessions: Vec<String>,

        /// Output file [default: invoice-<number>.html]
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Invoice number [default: generated]
        #[arg(long, value_name = "NUMBER")]
        number: Option<String>,

        #[arg(long, value_name = "NAME")]
        client_name: Option<String>,

        #[arg(long, value_name = "EMAIL")]
        client_email: Option<String>,

        #[arg(long, value_name = "ADDRESS")]
        client_address: Option<String>,

        /// Additional notes printed on the invoice
        #[arg(long, value_name = "TEXT")]
        notes: Option<String>,

        /// Days until payment is due (overrides config)
        #[arg(long, value_name = "DAYS")]
        due_days: Option<i64>,
    },

    /// View or modify configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,

        /// Print the config file location
        #[arg(long)]
        path: bool,
    },

    /// Launch the interactive timer
    Tui,
}

#[derive(Subcommand)]
pub enum ScreenshotAction {
    /// Attach an image file
    Add {
        file: PathBuf,

        /// Caption [default: file name]
        #[arg(short = 'c', long, default_value = "")]
        caption: String,
    },

    /// Remove an attached screenshot by id
    Remove { id: String },

    /// List screenshots on the current session
    List,
}

/// Open the tracker backed by the on-disk database
pub fn open_tracker(config: &Config, data_dir: Option<PathBuf>) -> anyhow::Result<Tracker> {
    let dir = config.data_dir(data_dir)?;
    let kv = SqliteKv::open_in(&dir)
        .with_context(|| format!("Failed to open session database in {}", dir.display()))?;
    Ok(Tracker::load(Box::new(kv), config.default_draft()))
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose >= 2 {
            OutputMode::VeryVerbose
        } else if self.verbose == 1 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let output_mode = self.output_mode();

        let command = match self.command {
            Some(Commands::Tui) | None => return crate::tui::run(self.data_dir),
            Some(command) => command,
        };

        logging::init(output_mode);

        if let Commands::Config { show, reset, path } = command {
            return commands::config_command::handle_config(show, reset, path);
        }

        let config = Config::load();
        let mut tracker = open_tracker(&config, self.data_dir)?;
        run_tracker_command(command, &mut tracker, &config, output_mode)
    }
}

/// Run a command that reads or changes the timer and history
fn run_tracker_command(
    command: Commands,
    tracker: &mut Tracker,
    config: &Config,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let now = Utc::now();

    match command {
        Commands::Start {
            project,
            rate,
            notes,
        } => {
            tracker.update_draft(DraftUpdate {
                project_name: project,
                rate_input: rate,
                notes,
            })?;
            let was_paused = tracker.timer().current_session().is_some();
            tracker.start(now)?;
            if output_mode != OutputMode::Quiet {
                let verb = if was_paused { "Resumed" } else { "Started" };
                println!(
                    "{} {} at {}/hour",
                    Theme::success(verb),
                    Theme::project(
                        tracker
                            .timer()
                            .current_session()
                            .map(|s| s.display_name())
                            .unwrap_or("Unnamed Project")
                    ),
                    format_currency(tracker.effective_rate())
                );
            }
            Ok(())
        }
        Commands::Pause => {
            if !tracker.timer().is_running() {
                eprintln!("{} The timer is not running.", Theme::warning("Warning:"));
                return Ok(());
            }
            tracker.pause(now)?;
            output::print_status(tracker, now, output_mode);
            Ok(())
        }
        Commands::Stop => {
            let finalized = tracker.stop(now)?;
            output::print_stopped(finalized.as_ref(), output_mode);
            Ok(())
        }
        Commands::Status { json } => {
            if json {
                output::print_status_json(tracker, now)
            } else {
                output::print_status(tracker, now, output_mode);
                Ok(())
            }
        }
        Commands::History { json } => {
            if json {
                output::print_history_json(tracker.store().list())
            } else {
                output::print_history(tracker.store().list(), output_mode);
                Ok(())
            }
        }
        Commands::Delete { id } => {
            let id = SessionId::new(id);
            if tracker.delete_session(&id)? {
                if output_mode != OutputMode::Quiet {
                    println!("{} session {}", Theme::success("Deleted"), id);
                }
            } else {
                eprintln!("{} No session with id {}", Theme::warning("Warning:"), id);
            }
            Ok(())
        }
        Commands::Set {
            project,
            rate,
            notes,
        } => {
            let update = DraftUpdate {
                project_name: project,
                rate_input: rate,
                notes,
            };
            if update.is_empty() {
                eprintln!("Nothing to change. Use --project, --rate or --notes.");
                return Ok(());
            }
            tracker.update_draft(update)?;
            output::print_status(tracker, now, output_mode);
            Ok(())
        }
        Commands::Screenshot { action } => {
            commands::screenshot_command::handle_screenshot(tracker, action, now, output_mode)
        }
        Commands::Invoice {
            sessions,
            output,
            number,
            client_name,
            client_email,
            client_address,
            notes,
            due_days,
        } => commands::invoice_command::handle_invoice(
            tracker,
            config,
            commands::invoice_command::InvoiceArgs {
                sessions,
                output,
                number,
                client_name,
                client_email,
                client_address,
                notes,
                due_days,
            },
            now,
            output_mode,
        ),
        // Dispatched by `Cli::run` before the tracker is opened
        Commands::Config { .. } | Commands::Tui => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_start_with_overrides() {
        let cli = Cli::try_parse_from(["billtime", "start", "-p", "Acme", "--rate", "85"]).unwrap();
        match cli.command {
            Some(Commands::Start { project, rate, notes }) => {
                assert_eq!(project.as_deref(), Some("Acme"));
                assert_eq!(rate.as_deref(), Some("85"));
                assert!(notes.is_none());
            }
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["billtime"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_verbosity_maps_to_output_mode() {
        let cli = Cli::try_parse_from(["billtime", "-vv", "history"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::VeryVerbose);
        let cli = Cli::try_parse_from(["billtime", "history", "-q"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn test_invoice_repeatable_sessions() {
        let cli = Cli::try_parse_from([
            "billtime", "invoice", "-s", "1", "--session", "2", "--client-name", "Acme",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Invoice {
                sessions,
                client_name,
                ..
            }) => {
                assert_eq!(sessions, ["1", "2"]);
                assert_eq!(client_name.as_deref(), Some("Acme"));
            }
            _ => panic!("expected invoice"),
        }
    }
}
