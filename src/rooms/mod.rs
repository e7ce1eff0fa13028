use crate::types::{
    CapacityShortfall, CourseId, Enrollment, Period, PeriodAssignment, Room, RoomAssignment,
    RoomId, StudentId,
};
use ahash::{AHashMap, AHashSet};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Distinct students per course.
pub fn course_sizes(enrollments: &[Enrollment]) -> BTreeMap<CourseId, u32> {
    let mut students: AHashMap<&CourseId, AHashSet<&StudentId>> = AHashMap::new();
    for e in enrollments.iter().filter(|e| !e.course.is_empty()) {
        students.entry(&e.course).or_default().insert(&e.student);
    }
    students
        .into_iter()
        .map(|(course, set)| (course.clone(), set.len() as u32))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAllocation {
    /// One row per (course, period), ordered by period then placement.
    pub assignments: Vec<RoomAssignment>,
    /// Placements where the room is smaller than the exam. These are
    /// valid rows, surfaced for the caller to act on.
    pub shortfalls: Vec<CapacityShortfall>,
}

impl RoomAllocation {
    pub fn unassigned(&self) -> impl Iterator<Item = &RoomAssignment> {
        self.assignments.iter().filter(|a| a.room.is_unassigned())
    }

    pub fn unassigned_count(&self) -> usize {
        self.unassigned().count()
    }

    pub fn room_of(&self, course: &CourseId) -> Option<RoomId> {
        self.assignments
            .iter()
            .find(|a| &a.course == course)
            .map(|a| a.room)
    }
}

/// Best-fit room placement per period.
///
/// The inventory is shuffled once with a seeded generator and then
/// stably sorted by capacity, so equal-capacity rooms are ordered
/// reproducibly without always favoring the same room id.
#[derive(Debug, Clone)]
pub struct RoomAllocator {
    rooms: Vec<Room>,
}

impl RoomAllocator {
    /// Rooms whose id collides with [`RoomId::UNASSIGNED`] are dropped
    /// from the inventory.
    pub fn new<R: Rng>(rooms: &[Room], rng: &mut R) -> Self {
        let mut rooms: Vec<Room> = rooms
            .iter()
            .filter(|r| {
                if r.id.is_unassigned() {
                    warn!("Ignoring room {} (capacity {}): id is reserved", r.id, r.capacity);
                }
                !r.id.is_unassigned()
            })
            .cloned()
            .collect();
        rooms.shuffle(rng);
        rooms.sort_by_key(|r| r.capacity);
        Self { rooms }
    }

    pub fn with_seed(rooms: &[Room], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(rooms, &mut rng)
    }

    /// Rooms in placement order (ascending capacity).
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Place every scheduled course. Courses absent from `sizes` have size 0.
    pub fn allocate(
        &self,
        periods: &PeriodAssignment,
        sizes: &BTreeMap<CourseId, u32>,
    ) -> RoomAllocation {
        let mut by_period: BTreeMap<Period, Vec<(&CourseId, u32)>> = BTreeMap::new();
        for (course, &period) in periods {
            let size = sizes.get(course).copied().unwrap_or(0);
            by_period.entry(period).or_default().push((course, size));
        }

        let mut allocation = RoomAllocation::default();
        for (period, mut exams) in by_period {
            // Largest first; equal sizes stay in course id order.
            exams.sort_by_key(|&(_, size)| Reverse(size));
            self.allocate_period(period, &exams, &mut allocation);
        }

        debug!(
            "Allocated {} exams over {} rooms: {} unassigned, {} under capacity",
            allocation.assignments.len(),
            self.rooms.len(),
            allocation.unassigned_count(),
            allocation.shortfalls.len()
        );
        allocation
    }

    fn allocate_period(
        &self,
        period: Period,
        exams: &[(&CourseId, u32)],
        allocation: &mut RoomAllocation,
    ) {
        let mut used: AHashSet<RoomId> = AHashSet::new();

        for &(course, size) in exams {
            let best_fit = self
                .rooms
                .iter()
                .find(|r| !used.contains(&r.id) && r.capacity >= size);
            let fallback = || self.rooms.iter().rev().find(|r| !used.contains(&r.id));

            let room = match best_fit.or_else(fallback) {
                Some(room) => {
                    used.insert(room.id);
                    if room.capacity < size {
                        warn!(
                            "Course {} (size {}) placed in room {} with capacity {} in period {}",
                            course, size, room.id, room.capacity, period
                        );
                        allocation.shortfalls.push(CapacityShortfall {
                            course: course.clone(),
                            period,
                            room: room.id,
                            required: size,
                            capacity: room.capacity,
                        });
                    }
                    room.id
                }
                None => {
                    warn!("No room left for course {} in period {}", course, period);
                    RoomId::UNASSIGNED
                }
            };

            allocation.assignments.push(RoomAssignment {
                course: course.clone(),
                period,
                room,
            });
        }
    }
}
