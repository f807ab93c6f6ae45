use crate::assignment::Period;
use crate::plan::ClassPlan;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct PlanValidationError {
    message: String,
}

impl PlanValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PlanValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PlanValidationError {}

fn validate_groups(plan: &ClassPlan) -> Result<(), PlanValidationError> {
    let mut group_ids = HashSet::with_capacity(plan.groups.len());
    for group in &plan.groups {
        if group.id == 0 {
            return Err(PlanValidationError::new(
                "group ids are 1-based; found group 0",
            ));
        }
        if !group_ids.insert(group.id) {
            return Err(PlanValidationError::new(format!(
                "duplicate group id {}",
                group.id
            )));
        }
        for student in &group.students {
            if let Some(member_of) = student.group_id {
                if member_of != group.id {
                    return Err(PlanValidationError::new(format!(
                        "student {} is listed in group {} but belongs to group {}",
                        student.id, group.id, member_of
                    )));
                }
            }
        }
    }

    let group_count = plan.groups.len() as u32;
    if let Some(gap) = (1..=group_count).find(|id| !group_ids.contains(id)) {
        return Err(PlanValidationError::new(format!(
            "group ids must be dense from 1 to {group_count}; group {gap} is missing"
        )));
    }
    Ok(())
}

fn validate_students(plan: &ClassPlan) -> Result<(), PlanValidationError> {
    let mut seen_ids = HashSet::new();
    for student in plan.roster() {
        if !seen_ids.insert(student.id) {
            return Err(PlanValidationError::new(format!(
                "duplicate student id {}",
                student.id
            )));
        }
    }
    Ok(())
}

fn validate_assignments(plan: &ClassPlan) -> Result<(), PlanValidationError> {
    for period in Period::ALL {
        let mut teachers = HashSet::new();
        for (idx, assignment) in plan.assignments_for(period).into_iter().enumerate() {
            if assignment.teacher_name.trim().is_empty() {
                return Err(PlanValidationError::new(format!(
                    "{period} assignment #{idx} requires a non-empty teacher_name"
                )));
            }
            if !teachers.insert(assignment.teacher_id) {
                return Err(PlanValidationError::new(format!(
                    "teacher {} is assigned twice in period {period}",
                    assignment.teacher_id
                )));
            }
        }
    }
    Ok(())
}

fn validate_turns(plan: &ClassPlan) -> Result<(), PlanValidationError> {
    for (key, _) in plan.turns.iter() {
        if key.trim().is_empty() {
            return Err(PlanValidationError::new("turn keys must not be blank"));
        }
    }
    Ok(())
}

fn validate_grades(plan: &ClassPlan) -> Result<(), PlanValidationError> {
    match plan.grades.invalid_grades().into_iter().next() {
        Some(err) => Err(PlanValidationError::new(err.to_string())),
        None => Ok(()),
    }
}

pub fn validate_class_plan(plan: &ClassPlan) -> Result<(), PlanValidationError> {
    validate_groups(plan)?;
    validate_students(plan)?;
    validate_assignments(plan)?;
    validate_turns(plan)?;
    validate_grades(plan)?;
    Ok(())
}
