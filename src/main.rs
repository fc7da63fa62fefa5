/*!
# Vellum — a single-user encrypted journal

The binary entrypoint: initializes logging, parses arguments, obtains the
passphrase, opens the journal, dispatches the requested command, and always
closes (flushes) the journal before exiting — the entrypoint owns the journal
handle for the whole invocation, so no state can be left dirty on any exit
path.

## Usage

```text
vellum [OPTIONS] <COMMAND>

Commands:
  add     Add a new entry, timestamped now (reads stdin if TEXT is omitted)
  list    List all entries in timestamp order
  show    Decrypt and print the entry at a timestamp
  latest  Decrypt and print the most recent entry
  delete  Delete the entry at a timestamp

Options:
  -f, --file <FILE>  Path of the journal file (overrides VELLUM_JOURNAL)
  -v, --verbose      Print verbose output
```

## Configuration

- `VELLUM_JOURNAL`: the journal file path (defaults to `~/.vellum/journal`)
- `VELLUM_PASSPHRASE`: passphrase for non-interactive use
*/

use std::io::Read;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vellum::cli::{CliArgs, Command};
use vellum::config::Config;
use vellum::crypto::{obtain_passphrase, Passphrase};
use vellum::errors::{AppResult, JournalError};
use vellum::journal::{ensure_parent_directory_exists, Entry, Journal};

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "vellum=debug" } else { "vellum=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> AppResult<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);
    debug!("CLI arguments: {:?}", args);

    let config = Config::load(args.file.clone())?;
    ensure_parent_directory_exists(&config.journal_path)?;

    let journal_exists = config.journal_path.is_file();
    let passphrase = obtain_passphrase(journal_exists)?;

    let mut journal = Journal::open(&config.journal_path, &passphrase)?;
    let outcome = run_command(&args.command, &mut journal, &passphrase);

    // Close flushes pending changes; it must run even when the command
    // failed, and its own failure matters too.
    let closed = journal.close();
    outcome.and(closed)
}

fn run_command(command: &Command, journal: &mut Journal, passphrase: &Passphrase) -> AppResult<()> {
    match command {
        Command::Add { text } => {
            let text = match text {
                Some(text) => text.clone(),
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let entry = Entry::encrypt(&text, passphrase)?;
            let timestamp = entry.timestamp();
            journal.add_entry(entry)?;
            info!(timestamp, "entry added");
            println!("Added entry {}", timestamp);
            Ok(())
        }
        Command::List => {
            let mut timestamps = journal.entries();
            timestamps.sort_unstable();
            if timestamps.is_empty() {
                println!("The journal is empty.");
                return Ok(());
            }
            for ts in timestamps {
                println!("{:>20}  {}", ts, format_timestamp(ts));
            }
            Ok(())
        }
        Command::Show { timestamp } => show_entry(journal, *timestamp, passphrase),
        Command::Latest => {
            let latest = journal.latest_entry();
            if latest == 0 {
                println!("The journal is empty.");
                return Ok(());
            }
            show_entry(journal, latest, passphrase)
        }
        Command::Delete { timestamp } => {
            journal.delete_entry(*timestamp)?;
            info!(timestamp, "entry deleted");
            println!("Deleted entry {}", timestamp);
            Ok(())
        }
    }
}

fn show_entry(journal: &Journal, timestamp: u64, passphrase: &Passphrase) -> AppResult<()> {
    let entry = journal
        .entry(timestamp)
        .ok_or(JournalError::EntryNotFound(timestamp))?;
    let text = entry.decrypt(passphrase)?;
    println!("{} ({})", format_timestamp(timestamp), timestamp);
    println!("{}", text);
    Ok(())
}

fn format_timestamp(timestamp: u64) -> String {
    match chrono::DateTime::from_timestamp_micros(timestamp as i64) {
        Some(datetime) => datetime
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "<invalid timestamp>".to_string(),
    }
}
