use crate::ClassPlan;
use crate::plan_validation::PlanValidationError;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    Csv(csv::Error),
    InvalidData(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Serialization(err) => Some(err),
            PersistenceError::Io(err) => Some(err),
            PersistenceError::Csv(err) => Some(err),
            PersistenceError::InvalidData(_) => None,
        }
    }
}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<PlanValidationError> for PersistenceError {
    fn from(value: PlanValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage for class plans, one per class id.
pub trait PlanStore {
    fn save_plan(&self, plan: &ClassPlan) -> PersistenceResult<()>;
    fn load_plan(&self, class_id: i64) -> PersistenceResult<Option<ClassPlan>>;
    fn list_class_ids(&self) -> PersistenceResult<Vec<i64>>;
}

pub fn validate_plan(plan: &ClassPlan) -> PersistenceResult<()> {
    plan.validate().map_err(PersistenceError::from)
}

pub mod file;

pub use file::{
    DirectoryPlanStore, export_overview_to_csv, load_plan_from_json, save_plan_to_json,
    write_overview_csv,
};
