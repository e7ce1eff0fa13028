use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Normalized course identifier (trimmed, upper-cased).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CourseId(String);

impl CourseId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for CourseId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for CourseId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<CourseId> for String {
    fn from(id: CourseId) -> Self {
        id.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized student identifier (trimmed; case preserved).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }
}

impl From<String> for StudentId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for StudentId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<StudentId> for String {
    fn from(id: StudentId) -> Self {
        id.0
    }
}

/// Room identifier. `RoomId::UNASSIGNED` (-1) marks an exhausted period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl RoomId {
    pub const UNASSIGNED: RoomId = RoomId(-1);

    pub fn is_unassigned(&self) -> bool {
        *self == Self::UNASSIGNED
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exam period index, 1-based.
pub type Period = u32;

/// Total map from course to period.
pub type PeriodAssignment = BTreeMap<CourseId, Period>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Required exam duration in minutes.
    pub duration_min: u32,
}

impl Course {
    pub fn new(id: impl Into<CourseId>, duration_min: u32) -> Self {
        Self {
            id: id.into(),
            duration_min,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub student: StudentId,
    pub course: CourseId,
}

impl Enrollment {
    pub fn new(student: impl Into<StudentId>, course: impl Into<CourseId>) -> Self {
        Self {
            student: student.into(),
            course: course.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub capacity: u32,
}

impl Room {
    pub fn new(id: i64, capacity: u32) -> Self {
        Self {
            id: RoomId(id),
            capacity,
        }
    }
}

/// Exam window; its id is the period index it provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeslot {
    pub id: Period,
    pub duration_min: u32,
}

impl Timeslot {
    pub fn new(id: Period, duration_min: u32) -> Self {
        Self { id, duration_min }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAssignment {
    pub course: CourseId,
    pub period: Period,
    pub room: RoomId,
}

/// Fallback placement where the room is smaller than the exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityShortfall {
    pub course: CourseId,
    pub period: Period,
    pub room: RoomId,
    pub required: u32,
    pub capacity: u32,
}

/// Immutable input of one scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub timeslots: Vec<Timeslot>,
}

impl Snapshot {
    pub fn roster(&self) -> Vec<CourseId> {
        self.courses.iter().map(|c| c.id.clone()).collect()
    }
}
