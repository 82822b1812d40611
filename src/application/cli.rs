use crate::application::{Config, JournalApp, Theme, check_terminal, init_logging};
use crate::domain::{Mood, parse_key, today};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "moodjournal")]
#[command(about = "A terminal mood journal with a month calendar")]
#[command(version)]
pub struct Cli {
    /// Journal service base URL (overrides JOURNAL_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session cookie value (overrides JOURNAL_SESSION)
    #[arg(long, global = true)]
    pub session: Option<String>,

    /// Color theme: dark or light (overrides JOURNAL_THEME)
    #[arg(long, global = true)]
    pub theme: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive calendar
    Tui {
        /// Date to select first (YYYY-MM-DD format, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Print every entry, newest first
    List,
    /// Print one entry
    Show {
        #[arg(short, long)]
        date: String,
    },
    /// Create or replace the entry for a date
    Write {
        /// YYYY-MM-DD format, defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        content: String,
        /// happy, sad, angry, worried, anxious or neutral; keeps the stored
        /// mood when omitted
        #[arg(short, long)]
        mood: Option<Mood>,
    },
    /// Delete the entry for a date
    Delete {
        #[arg(short, long)]
        date: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the month calendar
    Month {
        /// Any date in the month (YYYY-MM-DD format, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Check that the terminal supports the interactive calendar
    CheckTerminal,
}

impl Cli {
    pub fn run() -> Result<()> {
        let cli = Self::parse();
        let config = Config::from_env().with_overrides(cli.api_url, cli.session, cli.theme);
        init_logging(&config);

        if let Some(Commands::CheckTerminal) = cli.command {
            check_terminal(&Theme::by_name(&config.theme))?;
            return Ok(());
        }

        let app = JournalApp::with_default_plugins(config)?;
        let mut out = io::stdout().lock();

        match cli.command {
            Some(Commands::Tui { date }) => app.run_tui(Some(date_or_today(date)?))?,
            None => app.run_tui(None)?,
            Some(Commands::List) => app.list(&mut out)?,
            Some(Commands::Show { date }) => app.show(parse_date(&date)?, &mut out)?,
            Some(Commands::Write {
                date,
                content,
                mood,
            }) => app.write(date_or_today(date)?, &content, mood, &mut out)?,
            Some(Commands::Delete { date, yes }) => {
                let date = parse_date(&date)?;
                if yes || confirm(&format!("Delete the entry for {date}?"))? {
                    app.delete(date, &mut out)?;
                }
            }
            Some(Commands::Month { date }) => app.month(date_or_today(date)?, &mut out)?,
            Some(Commands::CheckTerminal) => {}
        }

        Ok(())
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    Ok(parse_key(raw)?)
}

fn date_or_today(raw: Option<String>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => parse_date(&raw),
        None => Ok(today()),
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
