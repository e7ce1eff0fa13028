//! Duration check between exams and the timeslots their periods map to.
//!
//! Each scheduled course is compared against the timeslot whose id equals
//! its period. Problems are reported as rows, never raised.

use crate::types::{Course, CourseId, Period, PeriodAssignment, Timeslot};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationStatus {
    Ok,
    /// Exam is longer than the timeslot.
    TooLong,
    /// No timeslot exists for the assigned period.
    InvalidPeriod,
    /// Course has no duration record.
    UnknownCourse,
}

impl fmt::Display for DurationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationStatus::Ok => write!(f, "OK"),
            DurationStatus::TooLong => write!(f, "Too long"),
            DurationStatus::InvalidPeriod => write!(f, "Invalid period"),
            DurationStatus::UnknownCourse => write!(f, "Unknown course"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationCheck {
    pub course: CourseId,
    pub period: Period,
    pub required_min: Option<u32>,
    pub available_min: Option<u32>,
    pub status: DurationStatus,
}

impl DurationCheck {
    pub fn is_ok(&self) -> bool {
        self.status == DurationStatus::Ok
    }
}

/// One row per scheduled course, in course id order.
pub fn validate_durations(
    periods: &PeriodAssignment,
    courses: &[Course],
    timeslots: &[Timeslot],
) -> Vec<DurationCheck> {
    let required: AHashMap<&CourseId, u32> =
        courses.iter().map(|c| (&c.id, c.duration_min)).collect();
    let available: AHashMap<Period, u32> =
        timeslots.iter().map(|t| (t.id, t.duration_min)).collect();

    let checks: Vec<DurationCheck> = periods
        .iter()
        .map(|(course, &period)| {
            let required_min = required.get(course).copied();
            let available_min = available.get(&period).copied();

            let status = match (available_min, required_min) {
                (None, _) => DurationStatus::InvalidPeriod,
                (Some(_), None) => DurationStatus::UnknownCourse,
                (Some(slot), Some(exam)) if exam > slot => DurationStatus::TooLong,
                _ => DurationStatus::Ok,
            };

            DurationCheck {
                course: course.clone(),
                period,
                required_min,
                available_min,
                status,
            }
        })
        .collect();

    let flagged = checks.iter().filter(|c| !c.is_ok()).count();
    if flagged > 0 {
        warn!("{} of {} exams failed the duration check", flagged, checks.len());
    }
    checks
}
