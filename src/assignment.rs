use serde::{Deserialize, Serialize};
use std::fmt;

pub type TeacherId = i64;

/// Half of the school day. Rotation is computed independently per period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "AM", alias = "am")]
    Am,
    #[serde(rename = "PM", alias = "pm")]
    Pm,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::Am, Period::Pm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One teacher's slot in a class for a period. The descriptive fields are
/// carried through to renderers untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub period: Period,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_content: Option<String>,
}

impl Assignment {
    pub fn new(teacher_id: TeacherId, teacher_name: impl Into<String>, period: Period) -> Self {
        Self {
            teacher_id,
            teacher_name: teacher_name.into(),
            period,
            subject: None,
            room: None,
            learning_content: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn with_learning_content(mut self, content: impl Into<String>) -> Self {
        self.learning_content = Some(content.into());
        self
    }
}
