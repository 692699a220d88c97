use std::path::Path;

use anyhow::Context as _;
use preemptviz_report::dataset::ExperimentTable;
use preemptviz_trajectory::record::PositionRecord;

pub(crate) fn load_results(path: &Path) -> anyhow::Result<ExperimentTable> {
    let table = ExperimentTable::from_path(path)
        .with_context(|| format!("failed to read results table {}", path.display()))?;
    if table.rows.is_empty() {
        anyhow::bail!("{} holds no data rows", path.display());
    }
    Ok(table)
}

pub(crate) fn load_positions(path: &Path) -> anyhow::Result<Vec<PositionRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open position table {}", path.display()))?;
    let rows = reader
        .deserialize()
        .collect::<csv::Result<Vec<_>>>()
        .with_context(|| format!("failed to parse position table {}", path.display()))?;
    if rows.is_empty() {
        anyhow::bail!("{} holds no position rows", path.display());
    }
    Ok(rows)
}
