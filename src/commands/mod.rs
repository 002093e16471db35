use crate::components::gmail::GmailClient;
use crate::components::google_api::GoogleApiClient;
use crate::components::google_calendar::{GoogleCalendarHandle, MeetingManager, MeetingType};
use crate::config::Config;
use crate::error::AppResult;
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};

// Export submodules
pub mod draft;
pub mod meetings;

/// List, cancel and reschedule Google Calendar meetings
#[derive(Debug, Parser)]
#[command(name = "meetings", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the meetings of a week, classified as recurring or one-off
    List {
        /// Any date inside the week (YYYY-MM-DD), defaults to this week
        #[arg(long)]
        week: Option<NaiveDate>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Delete the meetings matching the filters
    Cancel(CancelArgs),
    /// Delete all recurring meetings of a week
    CancelRecurring {
        /// Any date inside the week (YYYY-MM-DD), defaults to this week
        #[arg(long)]
        week: Option<NaiveDate>,
        /// Only show what would be cancelled
        #[arg(long)]
        dry_run: bool,
    },
    /// Create a Gmail draft for attendees (never sent)
    Draft {
        /// Recipient address, repeatable
        #[arg(long = "to", required = true)]
        to: Vec<String>,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        body: String,
    },
}

#[derive(Debug, Args)]
pub struct CancelArgs {
    /// Event id to cancel, repeatable
    #[arg(long = "id")]
    pub ids: Vec<String>,
    /// Cancel within the week containing this date
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub date: Option<NaiveDate>,
    /// First date of a range
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,
    /// Last date of a range
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
    /// Only cancel meetings of this type (recurring, one-off)
    #[arg(long = "type")]
    pub meeting_type: Option<MeetingType>,
    /// Summary keyword, repeatable; any match selects the meeting
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,
    /// Only show what would be cancelled
    #[arg(long)]
    pub dry_run: bool,
}

/// Shared context for all commands
pub struct CommandContext {
    pub config: Config,
    pub timezone: Tz,
    pub calendar: GoogleCalendarHandle,
    pub meetings: MeetingManager<GoogleCalendarHandle>,
    pub gmail: GmailClient,
}

impl CommandContext {
    /// Build the API clients and spawn the calendar actor
    pub fn new(config: Config) -> AppResult<Self> {
        let timezone = config.tz()?;
        let api = GoogleApiClient::from_config(&config)?;

        let calendar = GoogleCalendarHandle::new(api.clone());
        let meetings = MeetingManager::new(calendar.clone(), config.google_calendar_id.clone(), timezone);
        let gmail = GmailClient::new(api, config.gmail_user_id.clone());

        Ok(Self {
            config,
            timezone,
            calendar,
            meetings,
            gmail,
        })
    }

    /// Stop the calendar actor
    pub async fn shutdown(&self) -> AppResult<()> {
        self.calendar.shutdown().await
    }
}

/// Type alias for command result
pub type CommandResult = AppResult<()>;

/// Run one command to completion
pub async fn run(ctx: &CommandContext, command: Command) -> CommandResult {
    match command {
        Command::List { week, json } => meetings::list(ctx, week, json).await,
        Command::Cancel(args) => meetings::cancel(ctx, args).await,
        Command::CancelRecurring { week, dry_run } => {
            meetings::cancel_recurring(ctx, week, dry_run).await
        }
        Command::Draft { to, subject, body } => draft::create(ctx, to, subject, body).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cancel() {
        let cli = Cli::try_parse_from([
            "meetings", "cancel", "--id", "a", "--id", "b", "--from", "2024-03-01", "--to",
            "2024-03-20", "--type", "recurring", "--keyword", "standup",
        ])
        .unwrap();

        match cli.command {
            Command::Cancel(args) => {
                assert_eq!(args.ids, vec!["a", "b"]);
                assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 3, 1));
                assert_eq!(args.meeting_type, Some(MeetingType::Recurring));
                assert_eq!(args.keywords, vec!["standup"]);
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_date_conflicts_with_range() {
        let result = Cli::try_parse_from([
            "meetings", "cancel", "--date", "2024-03-01", "--from", "2024-03-01", "--to",
            "2024-03-02",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["meetings", "cancel", "--from", "2024-03-01"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["meetings", "cancel", "--type", "weekly"]);
        assert!(result.is_err());
    }
}
