use crate::assignment::{Assignment, Period};
use crate::student::{Group, GroupId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Copy of `items` left-rotated by `turn_index` positions: the first
/// `turn_index mod len` elements move to the back in order.
pub fn rotate_left<T: Clone>(items: &[T], turn_index: usize) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    let shift = turn_index % items.len();
    let mut rotated = Vec::with_capacity(items.len());
    rotated.extend_from_slice(&items[shift..]);
    rotated.extend_from_slice(&items[..shift]);
    rotated
}

/// Position in the un-rotated list that lands at `teacher_index` after a
/// left rotation by `turn_index`.
fn rotated_position(len: usize, teacher_index: usize, turn_index: usize) -> Option<usize> {
    if teacher_index >= len {
        return None;
    }
    Some((teacher_index + turn_index % len) % len)
}

/// The group paired with the teacher at `teacher_index` during turn
/// `turn_index`. `None` when there are no groups or the teacher position has
/// no group to meet.
pub fn assign_group(groups: &[Group], teacher_index: usize, turn_index: usize) -> Option<&Group> {
    rotated_position(groups.len(), teacher_index, turn_index).map(|idx| &groups[idx])
}

/// The assignment (teacher column) that meets `group_id` during
/// `turn_index`, given the period's assignments in column order.
pub fn teacher_for_group<'a>(
    groups: &[Group],
    assignments: &[&'a Assignment],
    group_id: GroupId,
    turn_index: usize,
) -> Option<&'a Assignment> {
    assignments
        .iter()
        .enumerate()
        .find(|(teacher_index, _)| {
            assign_group(groups, *teacher_index, turn_index).map(|group| group.id) == Some(group_id)
        })
        .map(|(_, assignment)| *assignment)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationRow {
    pub assignment: Assignment,
    /// Group id per turn, `None` where the teacher has no group that turn.
    pub groups: Vec<Option<GroupId>>,
}

/// Group-per-teacher-per-turn table for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationGrid {
    pub period: Period,
    pub turn_count: usize,
    pub rows: Vec<RotationRow>,
}

impl RotationGrid {
    pub fn cell(&self, teacher_index: usize, turn_index: usize) -> Option<GroupId> {
        self.rows
            .get(teacher_index)
            .and_then(|row| row.groups.get(turn_index))
            .copied()
            .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the grid for `period` from the assignments of that period in list
/// order. Assignments of the other period are skipped.
pub fn build_grid(
    period: Period,
    groups: &[Group],
    assignments: &[Assignment],
    turn_count: usize,
) -> RotationGrid {
    let rows: Vec<RotationRow> = assignments
        .iter()
        .filter(|assignment| assignment.period == period)
        .enumerate()
        .map(|(teacher_index, assignment)| RotationRow {
            assignment: assignment.clone(),
            groups: (0..turn_count)
                .map(|turn_index| {
                    assign_group(groups, teacher_index, turn_index).map(|group| group.id)
                })
                .collect(),
        })
        .collect();

    debug!(
        %period,
        teachers = rows.len(),
        groups = groups.len(),
        turn_count,
        "built rotation grid"
    );

    RotationGrid {
        period,
        turn_count,
        rows,
    }
}
