//! Plain-text timesheet rendering.

use chrono::NaiveDateTime;

use crate::activity::{ActivityMap, ReportOptions};
use crate::filter::ProjectFilter;

/// Width of the `=` and `-` rules.
const RULE_WIDTH: usize = 80;

/// Column width for project names; longer names are truncated.
const NAME_WIDTH: usize = 60;

/// Describes how far back the report reaches, e.g. `LAST 7 DAYS`.
pub fn range_label(cutoff: NaiveDateTime, now: NaiveDateTime) -> String {
    let days_ago = (now - cutoff).num_days();
    if days_ago <= 1 {
        "TODAY".to_string()
    } else if days_ago <= 7 {
        format!("LAST {days_ago} DAYS")
    } else {
        format!("SINCE {}", cutoff.format("%B %d, %Y").to_string().to_uppercase())
    }
}

fn title(cutoff: NaiveDateTime, options: &ReportOptions, now: NaiveDateTime) -> String {
    let mut title = format!("CLAUDE CODE TIMESHEET - {}", range_label(cutoff, now));
    if let Some(include) = options.filter.include() {
        title.push_str(&format!(" - FILTER: {include}"));
    }
    if let Some(exclude) = options.filter.exclude() {
        title.push_str(&format!(" - EXCLUDE: {exclude}"));
    }
    if options.merge {
        title.push_str(" - GROUPED TIME");
    }
    title
}

fn hours_line(label: &str, hours: f64) -> String {
    let label: String = label.chars().take(NAME_WIDTH).collect();
    format!("  {label:<NAME_WIDTH$} {hours:>6.2} hrs")
}

/// Renders the timesheet.
///
/// Days run from most recent to oldest; within a day projects are ordered by
/// descending hours.
pub fn render(
    activity: &ActivityMap,
    cutoff: NaiveDateTime,
    options: &ReportOptions,
    now: NaiveDateTime,
) -> String {
    let heavy_rule = "=".repeat(RULE_WIDTH);
    let light_rule = "-".repeat(RULE_WIDTH);

    let mut lines = vec![
        heavy_rule.clone(),
        title(cutoff, options, now),
        heavy_rule.clone(),
        String::new(),
    ];

    let mut grand_total = 0.0;
    for (date, day) in activity.days_descending() {
        lines.push(date.format("%A, %B %d, %Y").to_string());
        lines.push(light_rule.clone());

        let mut day_total = 0.0;
        for project in day.by_hours() {
            let hours = project.hours();
            lines.push(hours_line(&project.name, hours));
            day_total += hours;
        }

        lines.push(String::new());
        lines.push(hours_line("Daily Total:", day_total));
        lines.push(String::new());

        grand_total += day_total;
    }

    lines.push(heavy_rule.clone());
    lines.push(hours_line("TOTAL HOURS:", grand_total));
    lines.push(heavy_rule);

    lines.join("\n")
}

/// Message shown when no stored messages reach the cutoff.
pub fn no_messages_message(cutoff: NaiveDateTime) -> String {
    format!("No messages found since {}.", cutoff.format("%Y-%m-%d"))
}

/// Message shown when messages exist but none survive bucketing and filtering.
pub fn no_matches_message(filter: &ProjectFilter) -> String {
    let mut parts = Vec::new();
    if let Some(include) = filter.include() {
        parts.push(format!("filter '{include}'"));
    }
    if let Some(exclude) = filter.exclude() {
        parts.push(format!("exclude '{exclude}'"));
    }
    if parts.is_empty() {
        "No messages found.".to_string()
    } else {
        format!("No messages found matching {}.", parts.join(" and "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, TimeDelta};
    use insta::assert_snapshot;

    use crate::bucket::TimeBucket;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn record(activity: &mut ActivityMap, project: &str, times: &[&str]) {
        for time in times {
            activity.record(project, TimeBucket::containing(at(time)));
        }
    }

    fn sample_activity() -> ActivityMap {
        let mut activity = ActivityMap::default();
        record(&mut activity, "myproj/api", &["2025-01-13 09:00", "2025-01-13 09:20"]);
        record(&mut activity, "~/notes", &["2025-01-13 09:05"]);
        record(
            &mut activity,
            "acme/backend",
            &["2025-01-14 10:00", "2025-01-14 10:15", "2025-01-14 10:30", "2025-01-14 11:45"],
        );
        record(&mut activity, "myproj/api", &["2025-01-14 10:20"]);
        activity
    }

    #[test]
    fn test_range_label_today_within_a_day() {
        let now = at("2025-01-15 12:00");
        assert_eq!(range_label(now, now), "TODAY");
        assert_eq!(range_label(now - TimeDelta::hours(47), now), "TODAY");
        assert_eq!(range_label(now + TimeDelta::days(2), now), "TODAY");
    }

    #[test]
    fn test_range_label_last_n_days_up_to_a_week() {
        let now = at("2025-01-15 12:00");
        assert_eq!(range_label(now - TimeDelta::days(2), now), "LAST 2 DAYS");
        assert_eq!(range_label(now - TimeDelta::days(7), now), "LAST 7 DAYS");
    }

    #[test]
    fn test_range_label_since_date_beyond_a_week() {
        let now = at("2025-01-15 12:00");
        let cutoff = NaiveDate::from_ymd_opt(2025, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(range_label(cutoff, now), "SINCE JANUARY 05, 2025");
    }

    #[test]
    fn test_renders_days_descending_with_totals() {
        let output = render(
            &sample_activity(),
            at("2025-01-01 00:00"),
            &ReportOptions::default(),
            at("2025-01-15 12:00"),
        );

        assert_snapshot!(output, @r"
        ================================================================================
        CLAUDE CODE TIMESHEET - SINCE JANUARY 01, 2025
        ================================================================================

        Tuesday, January 14, 2025
        --------------------------------------------------------------------------------
          acme/backend                                                   1.00 hrs
          myproj/api                                                     0.25 hrs

          Daily Total:                                                   1.25 hrs

        Monday, January 13, 2025
        --------------------------------------------------------------------------------
          myproj/api                                                     0.50 hrs
          ~/notes                                                        0.25 hrs

          Daily Total:                                                   0.75 hrs

        ================================================================================
          TOTAL HOURS:                                                   2.00 hrs
        ================================================================================
        ");
    }

    #[test]
    fn test_header_names_active_options() {
        let options = ReportOptions {
            filter: ProjectFilter::new(Some("*proj*"), Some("*test*")).unwrap(),
            merge: true,
        };
        let now = at("2025-01-15 12:00");

        let output = render(&ActivityMap::default(), now - TimeDelta::days(3), &options, now);

        assert_eq!(
            output.lines().nth(1).unwrap(),
            "CLAUDE CODE TIMESHEET - LAST 3 DAYS - FILTER: *proj* - EXCLUDE: *test* - GROUPED TIME"
        );
    }

    #[test]
    fn test_long_names_are_truncated_to_the_column() {
        let name = "x".repeat(75);
        let line = hours_line(&name, 1.5);
        assert_eq!(line, format!("  {} {:>6} hrs", "x".repeat(60), "1.50"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let now = at("2025-01-15 12:00");
        let first = render(&sample_activity(), at("2025-01-10 00:00"), &ReportOptions::default(), now);
        let second = render(&sample_activity(), at("2025-01-10 00:00"), &ReportOptions::default(), now);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_state_messages() {
        assert_eq!(
            no_messages_message(at("2025-01-08 14:30")),
            "No messages found since 2025-01-08."
        );
        assert_eq!(no_matches_message(&ProjectFilter::default()), "No messages found.");
        assert_eq!(
            no_matches_message(&ProjectFilter::new(Some("*acme*"), None).unwrap()),
            "No messages found matching filter '*acme*'."
        );
        assert_eq!(
            no_matches_message(&ProjectFilter::new(Some("a*"), Some("*b")).unwrap()),
            "No messages found matching filter 'a*' and exclude '*b'."
        );
    }
}
