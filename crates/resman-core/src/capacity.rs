//! Capacity accounting: every allocation, capacity and progress figure the
//! API reports is computed here.
//!
//! All functions are pure and total. Engineer capacity always follows the
//! same order: keep `active` assignments, then keep those overlapping the
//! requested range, then sum. Project figures cover every assignment of
//! the project regardless of status, because hours logged on completed
//! work still count toward progress.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ResmanError, ResmanResult};
use crate::models::assignment::Assignment;
use crate::models::project::Project;
use crate::models::user::User;

/// Full capacity of one engineer, in percent.
pub const FULL_CAPACITY: f64 = 100.0;

/// Engineers with more free capacity than this are underutilized.
pub const UNDERUTILIZED_THRESHOLD: f64 = 50.0;

/// Timeline progress reported for a project whose end equals its start.
pub const ZERO_DURATION_TIMELINE_PROGRESS: f64 = 100.0;

/// Inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ResmanResult<Self> {
        if end < start {
            return Err(ResmanError::validation(
                "endDate must not be before startDate",
            ));
        }
        Ok(Self { start, end })
    }

    /// Builds a range from optional query bounds. Both bounds must be
    /// present for a range to apply; a lone bound is ignored.
    pub fn from_bounds(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ResmanResult<Option<Self>> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            _ => Ok(None),
        }
    }

    /// True when `[start, end]` intersects this range, ends included.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.end && end >= self.start
    }
}

/// Keeps the assignments whose interval intersects `range`. With no range
/// the input is returned as is.
pub fn overlap_filter<'a, I>(assignments: I, range: Option<&DateRange>) -> Vec<&'a Assignment>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    assignments
        .into_iter()
        .filter(|a| range.is_none_or(|r| r.overlaps(a.start_date, a.end_date)))
        .collect()
}

/// Sum of allocation percentages. Does not filter.
pub fn total_allocation<'a, I>(assignments: I) -> f64
where
    I: IntoIterator<Item = &'a Assignment>,
{
    assignments
        .into_iter()
        .map(|a| a.allocation_percentage)
        .sum()
}

/// Free capacity left by `total_allocation`. Never negative; an
/// over-allocated engineer has zero capacity, and the excess is reported
/// through `total_allocation` itself.
pub fn available_capacity(total_allocation: f64) -> f64 {
    (FULL_CAPACITY - total_allocation).max(0.0)
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Active assignments overlapping `range`.
pub fn active_in_range<'a, I>(assignments: I, range: Option<&DateRange>) -> Vec<&'a Assignment>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    overlap_filter(assignments.into_iter().filter(|a| a.is_active()), range)
}

/// Capacity figures for one engineer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerCapacity {
    pub total_allocation: f64,
    pub available_capacity: f64,
    /// The assignments that contributed to `total_allocation`.
    pub assignments: Vec<Assignment>,
}

impl EngineerCapacity {
    pub fn is_overallocated(&self) -> bool {
        self.total_allocation > FULL_CAPACITY
    }

    pub fn is_underutilized(&self) -> bool {
        self.available_capacity > UNDERUTILIZED_THRESHOLD
    }
}

/// Capacity of one engineer over `range`, from that engineer's
/// assignments in any status.
pub fn engineer_capacity<'a, I>(assignments: I, range: Option<&DateRange>) -> EngineerCapacity
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let counted = active_in_range(assignments, range);
    let total = total_allocation(counted.iter().copied());
    EngineerCapacity {
        total_allocation: total,
        available_capacity: available_capacity(total),
        assignments: counted.into_iter().cloned().collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerUtilization {
    pub engineer_id: Uuid,
    #[serde(flatten)]
    pub capacity: EngineerCapacity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationSummary {
    pub engineers: Vec<EngineerUtilization>,
    pub total_engineers: usize,
    pub average_utilization: f64,
    pub underutilized_engineers: usize,
    pub overutilized_engineers: usize,
}

/// Fleet-wide utilization. Engineers missing from
/// `assignments_by_engineer` count as fully available.
pub fn utilization_summary(
    engineers: &[User],
    assignments_by_engineer: &HashMap<Uuid, Vec<Assignment>>,
    range: Option<&DateRange>,
) -> UtilizationSummary {
    let rows: Vec<EngineerUtilization> = engineers
        .iter()
        .map(|engineer| {
            let assignments = assignments_by_engineer
                .get(&engineer.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            EngineerUtilization {
                engineer_id: engineer.id,
                capacity: engineer_capacity(assignments, range),
            }
        })
        .collect();

    let sum: f64 = rows.iter().map(|r| r.capacity.total_allocation).sum();
    let denominator = rows.len().max(1) as f64;

    UtilizationSummary {
        total_engineers: rows.len(),
        average_utilization: round2(sum / denominator),
        underutilized_engineers: rows.iter().filter(|r| r.capacity.is_underutilized()).count(),
        overutilized_engineers: rows.iter().filter(|r| r.capacity.is_overallocated()).count(),
        engineers: rows,
    }
}

/// Groups assignments by engineer.
pub fn group_by_engineer(assignments: Vec<Assignment>) -> HashMap<Uuid, Vec<Assignment>> {
    let mut grouped: HashMap<Uuid, Vec<Assignment>> = HashMap::new();
    for assignment in assignments {
        grouped
            .entry(assignment.engineer_id)
            .or_default()
            .push(assignment);
    }
    grouped
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub total_engineers: usize,
    pub total_allocation: f64,
    pub total_hours_allocated: f64,
    pub total_hours_worked: f64,
    /// Hours worked over hours allocated, in percent; 0 when nothing is
    /// allocated.
    pub progress_percentage: f64,
    /// Elapsed share of the project timeline, clamped to 0..=100.
    pub timeline_progress: f64,
}

pub fn project_progress(
    project: &Project,
    assignments: &[Assignment],
    now: DateTime<Utc>,
) -> ProjectProgress {
    let hours_allocated: f64 = assignments.iter().map(|a| a.hours_allocated).sum();
    let hours_worked: f64 = assignments.iter().map(|a| a.hours_worked).sum();

    let progress = if hours_allocated > 0.0 {
        hours_worked / hours_allocated * 100.0
    } else {
        0.0
    };

    ProjectProgress {
        total_engineers: assignments.len(),
        total_allocation: total_allocation(assignments),
        total_hours_allocated: hours_allocated,
        total_hours_worked: hours_worked,
        progress_percentage: round2(progress),
        timeline_progress: round2(timeline_progress(
            project.start_date,
            project.end_date,
            now,
        )),
    }
}

/// Elapsed share of `[start, end]` at `now`, in percent.
pub fn timeline_progress(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let total = (end - start).num_milliseconds();
    if total <= 0 {
        return ZERO_DURATION_TIMELINE_PROGRESS;
    }
    let elapsed = (now - start).num_milliseconds();
    (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Counts occurrences of each key.
pub fn distribution<K, I>(keys: I) -> HashMap<K, usize>
where
    K: std::hash::Hash + Eq,
    I: IntoIterator<Item = K>,
{
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}
