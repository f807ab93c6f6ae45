pub mod assignment;
pub mod calendar;
pub mod grades;
pub mod metadata;
pub mod persistence;
pub mod plan;
pub(crate) mod plan_validation;
pub mod rotation;
pub mod student;

pub use assignment::{Assignment, Period, TeacherId};
pub use calendar::{
    ResolvedTurn, TurnCalendar, TurnWindow, Week, format_week_date, parse_week_date, resolve_turn,
};
pub use grades::{
    GradeEntry, GradeError, GradeTable, Semester, StudentAverage, average_for, format_average,
    round_one_decimal,
};
pub use metadata::PlanMetadata;
pub use persistence::{
    DirectoryPlanStore, PersistenceError, PlanStore, export_overview_to_csv, load_plan_from_json,
    save_plan_to_json, validate_plan, write_overview_csv,
};
pub use plan::{ClassPlan, GroupTurn, PlanOverview, build_overviews};
pub use plan_validation::PlanValidationError;
pub use rotation::{
    RotationGrid, RotationRow, assign_group, build_grid, rotate_left, teacher_for_group,
};
pub use student::{Group, GroupId, Student, StudentId};
