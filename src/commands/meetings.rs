use super::{CancelArgs, CommandContext, CommandResult};
use crate::components::google_calendar::{
    CancellationResult, DateWindow, MeetingRecord, MeetingType, SelectionCriteria, TracingLog,
};
use crate::error::invalid_input;
use crate::utils::time::format_event_time;
use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::info;

/// Print the meetings of one week
pub async fn list(ctx: &CommandContext, week: Option<NaiveDate>, json: bool) -> CommandResult {
    let date = week.unwrap_or_else(|| ctx.meetings.today());
    let meetings = ctx.meetings.fetch_week(date).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meetings)?);
    } else {
        println!(
            "Meetings in {} for the week of {}:",
            ctx.config.google_calendar_id, date
        );
        print!("{}", format_meetings(&meetings, &ctx.timezone));
    }

    Ok(())
}

/// Cancel the meetings selected by the arguments
pub async fn cancel(ctx: &CommandContext, args: CancelArgs) -> CommandResult {
    let dry_run = args.dry_run;
    let criteria = criteria_from_args(args)?;
    run_cancellation(ctx, &criteria, dry_run).await
}

/// Cancel the recurring meetings of one week
pub async fn cancel_recurring(ctx: &CommandContext, week: Option<NaiveDate>, dry_run: bool) -> CommandResult {
    let date = week.unwrap_or_else(|| ctx.meetings.today());

    if dry_run {
        let criteria = SelectionCriteria::new()
            .on_week_of(date)
            .of_type(MeetingType::Recurring);
        return run_cancellation(ctx, &criteria, true).await;
    }

    let results = ctx.meetings.cancel_recurring_for_week(date, Some(&TracingLog)).await?;
    print!("{}", format_results(&results));
    Ok(())
}

async fn run_cancellation(ctx: &CommandContext, criteria: &SelectionCriteria, dry_run: bool) -> CommandResult {
    if dry_run {
        let meetings = ctx.meetings.resolve_meetings(criteria).await?;
        println!("Would cancel {} meeting(s):", meetings.len());
        print!("{}", format_meetings(&meetings, &ctx.timezone));
        return Ok(());
    }

    let results = ctx.meetings.cancel(criteria, Some(&TracingLog)).await?;
    let failed = results.iter().filter(|r| !r.is_cancelled()).count();
    info!(
        "Cancellation finished: {} cancelled, {} failed",
        results.len() - failed,
        failed
    );
    print!("{}", format_results(&results));
    Ok(())
}

/// Turn command line filters into selection criteria
pub fn criteria_from_args(args: CancelArgs) -> crate::error::AppResult<SelectionCriteria> {
    let window = match (args.date, args.from, args.to) {
        (Some(date), None, None) => DateWindow::Week(date),
        (None, Some(start), Some(end)) => DateWindow::Range { start, end },
        (None, None, None) => DateWindow::CurrentWeek,
        _ => {
            return Err(invalid_input(
                "Use either --date or both --from and --to",
            ))
        }
    };

    Ok(SelectionCriteria {
        ids: args.ids,
        window,
        meeting_type: args.meeting_type,
        keywords: args.keywords,
    })
}

/// One line per meeting
pub fn format_meetings(meetings: &[MeetingRecord], tz: &Tz) -> String {
    if meetings.is_empty() {
        return "  (none)\n".to_string();
    }

    let mut out = String::new();
    for meeting in meetings {
        let start = meeting
            .start
            .as_deref()
            .map(|s| format_event_time(s, tz))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<18} {:<9} {} [{}]",
            start, meeting.meeting_type, meeting.summary, meeting.id
        ));
        if !meeting.attendees.is_empty() {
            out.push_str(&format!(" with {}", meeting.attendees.join(", ")));
        }
        out.push('\n');
    }
    out
}

/// One line per cancellation outcome
pub fn format_results(results: &[CancellationResult]) -> String {
    if results.is_empty() {
        return "No meetings matched.\n".to_string();
    }

    let mut out = String::new();
    for result in results {
        match &result.error {
            None => out.push_str(&format!("  cancelled  {} ({})\n", result.summary, result.id)),
            Some(error) => out.push_str(&format!(
                "  error      {} ({}): {}\n",
                result.summary, result.id, error
            )),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::CancellationStatus;

    fn args() -> CancelArgs {
        CancelArgs {
            ids: Vec::new(),
            date: None,
            from: None,
            to: None,
            meeting_type: None,
            keywords: Vec::new(),
            dry_run: false,
        }
    }

    #[test]
    fn test_criteria_windows() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();

        let criteria = criteria_from_args(args()).unwrap();
        assert_eq!(criteria.window, DateWindow::CurrentWeek);

        let criteria = criteria_from_args(CancelArgs { date: Some(date), ..args() }).unwrap();
        assert_eq!(criteria.window, DateWindow::Week(date));

        let criteria = criteria_from_args(CancelArgs {
            from: Some(date),
            to: Some(date),
            ..args()
        })
        .unwrap();
        assert_eq!(criteria.window, DateWindow::Range { start: date, end: date });

        assert!(criteria_from_args(CancelArgs { from: Some(date), ..args() }).is_err());
    }

    #[test]
    fn test_format_meetings() {
        let meetings = vec![
            MeetingRecord {
                id: "a".to_string(),
                summary: "Daily Standup".to_string(),
                start: Some("2024-03-04T08:00:00Z".to_string()),
                end: None,
                meeting_type: MeetingType::Recurring,
                attendees: vec!["x@example.com".to_string()],
            },
            MeetingRecord::placeholder("missing-1"),
        ];

        let out = format_meetings(&meetings, &chrono_tz::UTC);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("2024-03-04 08:00"));
        assert!(lines[0].contains("recurring"));
        assert!(lines[0].ends_with("Daily Standup [a] with x@example.com"));
        assert!(lines[1].contains("(Unknown) [missing-1]"));

        assert_eq!(format_meetings(&[], &chrono_tz::UTC), "  (none)\n");
    }

    #[test]
    fn test_format_results() {
        let results = vec![
            CancellationResult {
                id: "a".to_string(),
                summary: "Sync".to_string(),
                status: CancellationStatus::Cancelled,
                error: None,
            },
            CancellationResult {
                id: "b".to_string(),
                summary: "Review".to_string(),
                status: CancellationStatus::Error,
                error: Some("HTTP 404".to_string()),
            },
        ];

        let out = format_results(&results);
        assert_eq!(out, "  cancelled  Sync (a)\n  error      Review (b): HTTP 404\n");
    }
}
