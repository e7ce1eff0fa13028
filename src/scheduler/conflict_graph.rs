use crate::types::{CourseId, Enrollment, StudentId};
use ahash::{AHashMap, AHashSet};
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;
use tracing::{debug, warn};

/// Conflict graph over courses; an edge means two courses share a student.
///
/// Nodes are stored in canonical order (ascending normalized course id),
/// and that index is the deterministic tie-break key used by the
/// coloring algorithms. Two builds over equivalent data therefore yield
/// the same node order no matter which input path produced them.
#[derive(Debug, Clone, Default)]
pub struct ConflictGraph {
    courses: Vec<CourseId>,
    index: AHashMap<CourseId, usize>,
    edges: Vec<AHashSet<usize>>,
    /// Distinct students per node.
    students: Vec<u32>,
}

impl PartialEq for ConflictGraph {
    fn eq(&self, other: &Self) -> bool {
        self.courses == other.courses
            && self.students == other.students
            && self.edges() == other.edges()
    }
}

impl Eq for ConflictGraph {}

impl ConflictGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (student, course) pairs.
    ///
    /// Every course seen in `enrollments` becomes a node, as does every
    /// course in `roster` even when nobody is enrolled in it. Each
    /// student's course list of length k contributes its k*(k-1)/2 pairs,
    /// so the cost is bounded by the per-student load rather than by the
    /// total course count.
    pub fn build(enrollments: &[Enrollment], roster: Option<&[CourseId]>) -> Self {
        let mut by_student: AHashMap<&StudentId, Vec<CourseId>> = AHashMap::new();
        let mut skipped = 0usize;

        for enrollment in enrollments {
            if enrollment.course.is_empty() {
                skipped += 1;
                continue;
            }
            by_student
                .entry(&enrollment.student)
                .or_default()
                .push(enrollment.course.clone());
        }

        if skipped > 0 {
            warn!("Skipped {} enrollment rows with an empty course id", skipped);
        }

        Self::from_groups(by_student.into_iter().map(|(_, courses)| courses), roster)
    }

    /// Build from a line-oriented student file: each line lists one
    /// student's course ids separated by whitespace. Every non-empty line
    /// counts as one student towards the course sizes.
    pub fn from_student_lines<R: BufRead>(
        reader: R,
        roster: Option<&[CourseId]>,
    ) -> std::io::Result<Self> {
        let mut groups = Vec::new();
        for line in reader.lines() {
            groups.push(Self::parse_line(&line?));
        }
        Ok(Self::from_groups(groups, roster))
    }

    pub fn from_student_text(text: &str, roster: Option<&[CourseId]>) -> Self {
        Self::from_groups(text.lines().map(Self::parse_line), roster)
    }

    fn parse_line(line: &str) -> Vec<CourseId> {
        line.split_whitespace().map(CourseId::new).collect()
    }

    fn from_groups<I>(groups: I, roster: Option<&[CourseId]>) -> Self
    where
        I: IntoIterator<Item = Vec<CourseId>>,
    {
        let groups: Vec<Vec<CourseId>> = groups.into_iter().collect();

        let mut ids: BTreeSet<CourseId> = groups.iter().flatten().cloned().collect();
        if let Some(roster) = roster {
            ids.extend(roster.iter().filter(|c| !c.is_empty()).cloned());
        }

        let courses: Vec<CourseId> = ids.into_iter().collect();
        let index: AHashMap<CourseId, usize> = courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        let mut graph = Self {
            edges: vec![AHashSet::new(); courses.len()],
            students: vec![0; courses.len()],
            courses,
            index,
        };

        for group in &groups {
            let mut members: Vec<usize> = group
                .iter()
                .filter_map(|c| graph.index.get(c).copied())
                .collect();
            members.sort_unstable();
            members.dedup();

            for &m in &members {
                graph.students[m] += 1;
            }
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    graph.add_edge(a, b);
                }
            }
        }

        debug!(
            "Built conflict graph: {} courses, {} edges from {} students",
            graph.node_count(),
            graph.edge_count(),
            groups.len()
        );
        graph
    }

    fn add_edge(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.edges[a].insert(b);
        self.edges[b].insert(a);
    }

    pub fn node_count(&self) -> usize {
        self.courses.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(|s| s.len()).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Courses in canonical node order.
    pub fn courses(&self) -> &[CourseId] {
        &self.courses
    }

    pub fn course(&self, node: usize) -> &CourseId {
        &self.courses[node]
    }

    pub fn index_of(&self, course: &CourseId) -> Option<usize> {
        self.index.get(course).copied()
    }

    pub fn contains(&self, course: &CourseId) -> bool {
        self.index.contains_key(course)
    }

    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges[node].iter().copied()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.edges[node].len()
    }

    /// Number of distinct students sitting this course's exam.
    pub fn student_count(&self, node: usize) -> u32 {
        self.students[node]
    }

    /// Exam size per course, the room allocator's input. Roster-only
    /// courses have size 0.
    pub fn course_sizes(&self) -> BTreeMap<CourseId, u32> {
        self.courses
            .iter()
            .cloned()
            .zip(self.students.iter().copied())
            .collect()
    }

    pub fn max_degree(&self) -> usize {
        self.edges.iter().map(|s| s.len()).max().unwrap_or(0)
    }

    pub fn avg_degree(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        2.0 * self.edge_count() as f64 / self.node_count() as f64
    }

    pub fn has_conflict(&self, a: &CourseId, b: &CourseId) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a), Some(b)) => self.edges[a].contains(&b),
            _ => false,
        }
    }

    /// Each edge once as (lower, higher) node index, sorted.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .edges
            .iter()
            .enumerate()
            .flat_map(|(a, set)| set.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn course_edges(&self) -> Vec<(CourseId, CourseId)> {
        self.edges()
            .into_iter()
            .map(|(a, b)| (self.courses[a].clone(), self.courses[b].clone()))
            .collect()
    }

    /// Fraction of possible course pairs that conflict.
    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n <= 1 {
            return 0.0;
        }
        let possible = n * (n - 1) / 2;
        self.edge_count() as f64 / possible as f64
    }
}
