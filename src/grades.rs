use crate::assignment::TeacherId;
use crate::student::StudentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const EPSILON: f64 = 1e-9;

/// Grades a teacher may record: 1 to 5 in half steps.
pub const ALLOWED_GRADES: [f64; 9] = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];

pub fn is_allowed_grade(value: f64) -> bool {
    value.is_finite() && ALLOWED_GRADES.iter().any(|g| (g - value).abs() <= EPSILON)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    First,
    Second,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::First => "first",
            Semester::Second => "second",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grades one teacher gave one student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    #[serde(default)]
    pub first: Option<f64>,
    #[serde(default)]
    pub second: Option<f64>,
}

impl GradeEntry {
    pub fn new(first: Option<f64>, second: Option<f64>) -> Self {
        Self { first, second }
    }

    pub fn get(&self, semester: Semester) -> Option<f64> {
        match semester {
            Semester::First => self.first,
            Semester::Second => self.second,
        }
    }

    fn slot_mut(&mut self, semester: Semester) -> &mut Option<f64> {
        match semester {
            Semester::First => &mut self.first,
            Semester::Second => &mut self.second,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeError {
    pub student_id: StudentId,
    pub teacher_id: TeacherId,
    pub value: f64,
}

impl fmt::Display for GradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grade {} for student {} by teacher {} is not one of 1, 1.5, ..., 5",
            self.value, self.student_id, self.teacher_id
        )
    }
}

impl std::error::Error for GradeError {}

/// student id → teacher id → grades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeTable {
    entries: BTreeMap<StudentId, BTreeMap<TeacherId, GradeEntry>>,
}

impl GradeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores one grade. This is the write point where the allowed grade set
    /// is enforced; reading never re-checks it.
    pub fn record(
        &mut self,
        student_id: StudentId,
        teacher_id: TeacherId,
        semester: Semester,
        value: Option<f64>,
    ) -> Result<(), GradeError> {
        if let Some(value) = value {
            if !is_allowed_grade(value) {
                return Err(GradeError {
                    student_id,
                    teacher_id,
                    value,
                });
            }
        }
        let entry = self
            .entries
            .entry(student_id)
            .or_default()
            .entry(teacher_id)
            .or_default();
        *entry.slot_mut(semester) = value;
        Ok(())
    }

    pub fn entry(&self, student_id: StudentId, teacher_id: TeacherId) -> Option<&GradeEntry> {
        self.entries.get(&student_id)?.get(&teacher_id)
    }

    pub fn student_ids(&self) -> impl Iterator<Item = StudentId> + '_ {
        self.entries.keys().copied()
    }

    /// Every stored grade that is outside the allowed set.
    pub fn invalid_grades(&self) -> Vec<GradeError> {
        let mut invalid = Vec::new();
        for (student_id, by_teacher) in &self.entries {
            for (teacher_id, entry) in by_teacher {
                for value in [entry.first, entry.second].into_iter().flatten() {
                    if !is_allowed_grade(value) {
                        invalid.push(GradeError {
                            student_id: *student_id,
                            teacher_id: *teacher_id,
                            value,
                        });
                    }
                }
            }
        }
        invalid
    }

    pub fn average_for(&self, student_id: StudentId, semester: Semester) -> Option<f64> {
        average_for(student_id, semester, self)
    }

    /// Averages of every student that has at least one entry, by student id.
    pub fn averages(&self) -> Vec<StudentAverage> {
        self.student_ids()
            .map(|student_id| StudentAverage::compute(student_id, self))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rounded mean of the student's `semester` grades over all teachers, or
/// `None` when no teacher recorded one.
pub fn average_for(student_id: StudentId, semester: Semester, table: &GradeTable) -> Option<f64> {
    let by_teacher = table.entries.get(&student_id)?;
    let (sum, count) = by_teacher
        .values()
        .filter_map(|entry| entry.get(semester))
        .fold((0.0, 0usize), |(sum, count), grade| (sum + grade, count + 1));
    if count == 0 {
        return None;
    }
    Some(round_one_decimal(sum / count as f64))
}

/// `round(x * 10) / 10`, halves away from zero (2.75 → 2.8).
pub fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// `-` for a missing average, one decimal otherwise.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{value:.1}"),
        None => "-".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudentAverage {
    pub student_id: StudentId,
    pub first: Option<f64>,
    pub second: Option<f64>,
}

impl StudentAverage {
    pub fn compute(student_id: StudentId, table: &GradeTable) -> Self {
        Self {
            student_id,
            first: average_for(student_id, Semester::First, table),
            second: average_for(student_id, Semester::Second, table),
        }
    }

    pub fn get(&self, semester: Semester) -> Option<f64> {
        match semester {
            Semester::First => self.first,
            Semester::Second => self.second,
        }
    }
}
