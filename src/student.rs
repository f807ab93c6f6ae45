use serde::{Deserialize, Serialize};

pub type StudentId = i64;
pub type GroupId = u32;

/// A student of the class. Only carried through the engine for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    /// Group membership, if the student has been placed into a group yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

impl Student {
    pub fn new(id: StudentId, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            group_id: None,
        }
    }

    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    /// "Last, First" as printed on rosters.
    pub fn display_name(&self) -> String {
        match (self.last_name.trim(), self.first_name.trim()) {
            ("", first) => first.to_string(),
            (last, "") => last.to_string(),
            (last, first) => format!("{last}, {first}"),
        }
    }
}

/// A subset of a class's students that rotates between teachers as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    #[serde(default)]
    pub students: Vec<Student>,
}

impl Group {
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            students: Vec::new(),
        }
    }

    pub fn with_students(id: GroupId, students: Vec<Student>) -> Self {
        Self { id, students }
    }

    /// Builds groups `1..=group_count` from the students' `group_id`, keeping
    /// roster order inside each group. Students without a group, or with a
    /// group id outside the range, are left out.
    pub fn from_students(students: &[Student], group_count: GroupId) -> Vec<Group> {
        (1..=group_count)
            .map(|id| {
                let members = students
                    .iter()
                    .filter(|student| student.group_id == Some(id))
                    .cloned()
                    .collect();
                Group::with_students(id, members)
            })
            .collect()
    }

    pub fn label(&self) -> String {
        format!("Gruppe {}", self.id)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
