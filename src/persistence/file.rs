use super::{PersistenceError, PersistenceResult, PlanStore};
use crate::assignment::Period;
use crate::calendar::ResolvedTurn;
use crate::plan::{ClassPlan, PlanOverview};
use crate::rotation::RotationRow;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const FIXED_COLUMNS: [&str; 5] = ["period", "position", "teacher", "subject", "room"];

pub fn save_plan_to_json<P: AsRef<Path>>(plan: &ClassPlan, path: P) -> PersistenceResult<()> {
    super::validate_plan(plan)?;
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, plan)?;
    writer.flush()?;
    debug!(
        class_id = plan.metadata.class_id,
        path = %path.as_ref().display(),
        "saved plan"
    );
    Ok(())
}

/// Reads a plan snapshot and validates it before handing it to the engine.
pub fn load_plan_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<ClassPlan> {
    let file = File::open(path.as_ref())?;
    let plan: ClassPlan = serde_json::from_reader(BufReader::new(file))?;
    super::validate_plan(&plan)?;
    debug!(
        class_id = plan.metadata.class_id,
        groups = plan.groups.len(),
        turns = plan.turn_count(),
        path = %path.as_ref().display(),
        "loaded plan"
    );
    Ok(plan)
}

fn header_row(turns: &[ResolvedTurn]) -> Vec<String> {
    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(
        turns
            .iter()
            .map(|turn| format!("{} ({})", turn.key, turn.window.label())),
    );
    header
}

fn grid_row(period: Period, position: usize, row: &RotationRow) -> Vec<String> {
    let mut record = vec![
        period.as_str().to_string(),
        (position + 1).to_string(),
        row.assignment.teacher_name.clone(),
        row.assignment.subject.clone().unwrap_or_default(),
        row.assignment.room.clone().unwrap_or_default(),
    ];
    record.extend(
        row.groups
            .iter()
            .map(|group| group.map(|id| id.to_string()).unwrap_or_default()),
    );
    record
}

/// Writes the rotation table: one row per period and teacher column, one
/// column per turn holding the group id (blank when no group).
pub fn write_overview_csv<W: Write>(overview: &PlanOverview, writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(header_row(&overview.turns))?;
    for period in Period::ALL {
        for (position, row) in overview.grid(period).rows.iter().enumerate() {
            writer.write_record(grid_row(period, position, row))?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn export_overview_to_csv<P: AsRef<Path>>(
    overview: &PlanOverview,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    write_overview_csv(overview, file)
}

/// Keeps one `class-<id>.json` snapshot per class in a directory.
pub struct DirectoryPlanStore {
    root: PathBuf,
}

impl DirectoryPlanStore {
    pub fn new<P: AsRef<Path>>(root: P) -> PersistenceResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, class_id: i64) -> PathBuf {
        self.root.join(format!("class-{class_id}.json"))
    }

    fn class_id_from_file_name(name: &str) -> Option<i64> {
        name.strip_prefix("class-")?
            .strip_suffix(".json")?
            .parse()
            .ok()
    }
}

impl PlanStore for DirectoryPlanStore {
    fn save_plan(&self, plan: &ClassPlan) -> PersistenceResult<()> {
        save_plan_to_json(plan, self.path_for(plan.metadata.class_id))
    }

    fn load_plan(&self, class_id: i64) -> PersistenceResult<Option<ClassPlan>> {
        let path = self.path_for(class_id);
        if !path.exists() {
            return Ok(None);
        }
        let plan = load_plan_from_json(&path)?;
        if plan.metadata.class_id != class_id {
            return Err(PersistenceError::InvalidData(format!(
                "{} holds class {} instead of {class_id}",
                path.display(),
                plan.metadata.class_id
            )));
        }
        Ok(Some(plan))
    }

    fn list_class_ids(&self) -> PersistenceResult<Vec<i64>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(Self::class_id_from_file_name)
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}
