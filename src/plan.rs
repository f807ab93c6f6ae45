use crate::assignment::{Assignment, Period};
use crate::calendar::{ResolvedTurn, TurnCalendar};
use crate::grades::{GradeTable, StudentAverage};
use crate::metadata::PlanMetadata;
use crate::plan_validation::{self, PlanValidationError};
use crate::rotation::{self, RotationGrid};
use crate::student::{Group, GroupId, Student};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the overview page and the exporters need for one class,
/// already loaded into memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassPlan {
    pub metadata: PlanMetadata,
    /// Rotation base order.
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Students of the class that are not in any group yet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unassigned: Vec<Student>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub turns: TurnCalendar,
    #[serde(default)]
    pub grades: GradeTable,
}

/// What one group does during one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTurn {
    pub turn: ResolvedTurn,
    pub morning: Option<Assignment>,
    pub afternoon: Option<Assignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOverview {
    pub metadata: PlanMetadata,
    pub turns: Vec<ResolvedTurn>,
    pub morning: RotationGrid,
    pub afternoon: RotationGrid,
    pub averages: Vec<StudentAverage>,
}

impl PlanOverview {
    pub fn grid(&self, period: Period) -> &RotationGrid {
        match period {
            Period::Am => &self.morning,
            Period::Pm => &self.afternoon,
        }
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("class={}", self.metadata.class_name));
        parts.push(format!("turns={}", self.turns.len()));
        let empty_turns = self.turns.iter().filter(|t| t.window.is_empty()).count();
        if empty_turns > 0 {
            parts.push(format!("empty_turns={empty_turns}"));
        }
        parts.push(format!("am_teachers={}", self.morning.rows.len()));
        parts.push(format!("pm_teachers={}", self.afternoon.rows.len()));
        let graded = self
            .averages
            .iter()
            .filter(|avg| avg.first.is_some() || avg.second.is_some())
            .count();
        parts.push(format!("graded_students={graded}"));
        parts.join(", ")
    }
}

impl ClassPlan {
    pub fn new(metadata: PlanMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// Splits a class roster into groups `1..=group_count` by each
    /// student's `group_id`; everyone else ends up in `unassigned`.
    pub fn from_roster(metadata: PlanMetadata, students: &[Student], group_count: GroupId) -> Self {
        let groups = Group::from_students(students, group_count);
        let unassigned = students
            .iter()
            .filter(|s| !matches!(s.group_id, Some(id) if id >= 1 && id <= group_count))
            .cloned()
            .collect();
        Self {
            metadata,
            groups,
            unassigned,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PlanValidationError> {
        plan_validation::validate_class_plan(self)
    }

    /// Grouped students in group order, then the unassigned ones.
    pub fn roster(&self) -> impl Iterator<Item = &Student> {
        self.groups
            .iter()
            .flat_map(|group| group.students.iter())
            .chain(self.unassigned.iter())
    }

    pub fn find_group(&self, group_id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    /// The period's assignments in column order.
    pub fn assignments_for(&self, period: Period) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|assignment| assignment.period == period)
            .collect()
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn ordered_turns(&self) -> Vec<ResolvedTurn> {
        self.turns.ordered_turns()
    }

    pub fn current_turn(&self, date: NaiveDate) -> Option<ResolvedTurn> {
        self.turns.current_turn(date)
    }

    /// Group met by the `teacher_index`-th teacher of `period` in turn
    /// `turn_index`. `None` past the end of the period's teacher list.
    pub fn group_for(
        &self,
        period: Period,
        teacher_index: usize,
        turn_index: usize,
    ) -> Option<&Group> {
        if teacher_index >= self.assignments_for(period).len() {
            return None;
        }
        rotation::assign_group(&self.groups, teacher_index, turn_index)
    }

    pub fn grid(&self, period: Period) -> RotationGrid {
        rotation::build_grid(period, &self.groups, &self.assignments, self.turn_count())
    }

    /// Per-turn timetable of one group: which morning and afternoon
    /// assignment it meets. Empty when the group does not exist.
    pub fn schedule_for_group(&self, group_id: GroupId) -> Vec<GroupTurn> {
        if self.find_group(group_id).is_none() {
            return Vec::new();
        }
        let morning = self.assignments_for(Period::Am);
        let afternoon = self.assignments_for(Period::Pm);
        self.ordered_turns()
            .into_iter()
            .map(|turn| {
                let index = turn.index;
                GroupTurn {
                    morning: rotation::teacher_for_group(&self.groups, &morning, group_id, index)
                        .cloned(),
                    afternoon: rotation::teacher_for_group(
                        &self.groups,
                        &afternoon,
                        group_id,
                        index,
                    )
                    .cloned(),
                    turn,
                }
            })
            .collect()
    }

    /// Semester averages for every student on the roster, in roster order.
    pub fn student_averages(&self) -> Vec<StudentAverage> {
        self.roster()
            .map(|student| StudentAverage::compute(student.id, &self.grades))
            .collect()
    }

    pub fn overview(&self) -> PlanOverview {
        let overview = PlanOverview {
            metadata: self.metadata.clone(),
            turns: self.ordered_turns(),
            morning: self.grid(Period::Am),
            afternoon: self.grid(Period::Pm),
            averages: self.student_averages(),
        };
        debug!(
            class_id = self.metadata.class_id,
            summary = %overview.to_cli_summary(),
            "built plan overview"
        );
        overview
    }
}

/// Overviews for many classes at once, e.g. for a department-wide export.
pub fn build_overviews(plans: &[ClassPlan]) -> Vec<PlanOverview> {
    plans.par_iter().map(ClassPlan::overview).collect()
}
