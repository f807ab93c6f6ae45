use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub class_id: i64,
    pub class_name: String,
    pub school_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl PlanMetadata {
    pub fn new(class_id: i64, class_name: impl Into<String>) -> Self {
        Self {
            class_id,
            class_name: class_name.into(),
            ..Self::default()
        }
    }
}

impl Default for PlanMetadata {
    fn default() -> Self {
        Self {
            class_id: 0,
            class_name: "New Class".to_string(),
            school_year: "2024/25".to_string(),
            department: None,
        }
    }
}
