use std::{error::Error, path::Path, process::exit, str::FromStr};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use time::macros::format_description;

use econo::{Feedback, FeedbackStatus, list_feedback, set_feedback_status};

/// A utility for reviewing the feedback users sent from the profile tab.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List feedback, newest first.
    List {
        /// Only list feedback with this status: pendente, lido or resolvido.
        #[arg(long)]
        status: Option<String>,
    },
    /// Change the status of one feedback entry.
    SetStatus {
        /// The ID shown by `list`.
        id: i64,
        /// The new status: pendente, lido or resolvido.
        status: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);

    if !db_path.is_file() {
        eprintln!("File does not exist at {db_path:#?}!");
        exit(1);
    }

    let conn = Connection::open(db_path)?;

    match args.command {
        Command::List { status } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let feedback = list_feedback(status, &conn)?;

            if feedback.is_empty() {
                println!("No feedback found.");
            }

            for entry in &feedback {
                print_feedback(entry)?;
            }
        }
        Command::SetStatus { id, status } => {
            let status = parse_status(&status)?;
            set_feedback_status(id, status, &conn)?;
            println!("Feedback {id} is now {status}.");
        }
    }

    Ok(())
}

fn parse_status(raw: &str) -> Result<FeedbackStatus, Box<dyn Error>> {
    FeedbackStatus::from_str(&raw.trim().to_lowercase()).map_err(|_| {
        format!("unknown status \"{raw}\", expected pendente, lido or resolvido").into()
    })
}

fn print_feedback(feedback: &Feedback) -> Result<(), Box<dyn Error>> {
    let created_at = feedback
        .created_at
        .format(format_description!("[day]/[month]/[year] [hour]:[minute]"))?;

    println!(
        "#{} [{}] {} - {} ({}, {})",
        feedback.id,
        feedback.status,
        feedback.kind.label(),
        feedback.user_name,
        feedback.user_id,
        created_at
    );
    println!("    {}", feedback.message.replace('\n', "\n    "));
    println!();

    Ok(())
}
