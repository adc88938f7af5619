//! Aggregation of messages into per-day, per-project activity buckets.
//!
//! Aggregation runs in three passes:
//! 1. Bucketing: every message lands in the 15-minute bucket of its timestamp,
//!    under its calendar day and project display name.
//! 2. Filtering: projects are kept or dropped by display name.
//! 3. Merging (optional): each day's surviving projects collapse into one
//!    entry whose buckets are the union of theirs.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::bucket::{TimeBucket, hours, parse_timestamp};
use crate::filter::ProjectFilter;
use crate::message::Message;
use crate::project::ProjectNamer;

/// Prefix of the synthetic project produced by merging.
pub const COMBINED_PREFIX: &str = "Combined: ";

/// Report-shaping options shared by aggregation and rendering.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub filter: ProjectFilter,
    /// Union all projects of a day into a single entry.
    pub merge: bool,
}

/// The buckets a project was active in on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectActivity {
    pub name: String,
    pub buckets: BTreeSet<TimeBucket>,
}

impl ProjectActivity {
    pub fn hours(&self) -> f64 {
        hours(self.buckets.len())
    }
}

/// Projects active on one day, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayActivity {
    projects: Vec<ProjectActivity>,
}

impl DayActivity {
    fn record(&mut self, project: &str, bucket: TimeBucket) {
        if let Some(existing) = self.projects.iter_mut().find(|p| p.name == project) {
            existing.buckets.insert(bucket);
        } else {
            self.projects.push(ProjectActivity {
                name: project.to_string(),
                buckets: BTreeSet::from([bucket]),
            });
        }
    }

    pub fn projects(&self) -> &[ProjectActivity] {
        &self.projects
    }

    /// Projects by descending hours; equal hours keep first-seen order.
    pub fn by_hours(&self) -> Vec<&ProjectActivity> {
        let mut sorted: Vec<_> = self.projects.iter().collect();
        sorted.sort_by_key(|p| Reverse(p.buckets.len()));
        sorted
    }

    /// Sum of the projects' hours.
    pub fn hours(&self) -> f64 {
        self.projects.iter().map(ProjectActivity::hours).sum()
    }

    fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Day → project → bucket set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityMap {
    days: BTreeMap<NaiveDate, DayActivity>,
}

impl ActivityMap {
    /// Adds `bucket` to `project` on the bucket's day. Re-adding is a no-op.
    pub fn record(&mut self, project: &str, bucket: TimeBucket) {
        self.days
            .entry(bucket.date())
            .or_default()
            .record(project, bucket);
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayActivity> {
        self.days.get(&date)
    }

    /// Days from most recent to oldest.
    pub fn days_descending(&self) -> impl Iterator<Item = (NaiveDate, &DayActivity)> {
        self.days.iter().rev().map(|(date, day)| (*date, day))
    }

    pub fn total_hours(&self) -> f64 {
        self.days.values().map(DayActivity::hours).sum()
    }

    /// Keeps only projects the filter allows. Days left without projects are dropped.
    #[must_use]
    pub fn filter(self, filter: &ProjectFilter) -> Self {
        let days = self
            .days
            .into_iter()
            .filter_map(|(date, day)| {
                let projects: Vec<_> = day
                    .projects
                    .into_iter()
                    .filter(|p| filter.allows(&p.name))
                    .collect();
                let day = DayActivity { projects };
                (!day.is_empty()).then_some((date, day))
            })
            .collect();
        Self { days }
    }

    /// Replaces each day's projects with one `Combined: a, b, ...` entry holding
    /// the union of their buckets.
    #[must_use]
    pub fn merge_projects(self) -> Self {
        let days = self
            .days
            .into_iter()
            .map(|(date, day)| {
                let mut names: Vec<String> = Vec::with_capacity(day.projects.len());
                let mut buckets = BTreeSet::new();
                for project in day.projects {
                    names.push(project.name);
                    buckets.extend(project.buckets);
                }
                names.sort();
                let combined = ProjectActivity {
                    name: format!("{COMBINED_PREFIX}{}", names.join(", ")),
                    buckets,
                };
                (date, DayActivity {
                    projects: vec![combined],
                })
            })
            .collect();
        Self { days }
    }
}

/// Builds the activity map for `messages`.
///
/// Messages whose timestamp cannot be parsed are logged and skipped.
pub fn aggregate<'a, I>(messages: I, namer: &ProjectNamer, options: &ReportOptions) -> ActivityMap
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut activity = ActivityMap::default();
    for message in messages {
        let dt = match parse_timestamp(&message.timestamp) {
            Ok(dt) => dt,
            Err(e) => {
                tracing::warn!(
                    timestamp = %message.timestamp,
                    session_id = %message.session_id,
                    error = %e,
                    "skipping message with unparseable timestamp"
                );
                continue;
            }
        };
        let project = namer.display_name(&message.project_name);
        activity.record(&project, TimeBucket::containing(dt));
    }

    let activity = activity.filter(&options.filter);
    if options.merge {
        activity.merge_projects()
    } else {
        activity
    }
}
