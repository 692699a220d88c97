use std::{collections::BTreeMap, io, path::Path};

use serde::Deserialize;

/// Metric key of time-loss over actual travel time, derived on demand from
/// the `tl` and `ttt` columns.
pub const DERIVED_TL_TTT: &str = "tl-ttt";

/// One row of the experiment results table.
///
/// The identifying columns are typed; every other column stays as text and
/// is parsed on demand, since the metric set varies between experiment
/// batches. Columns absent from a table default to the empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperimentRow {
    /// Scenario key, when the table spans several scenarios.
    #[serde(default)]
    pub scenario: String,
    /// Entity (vehicle) id.
    #[serde(default)]
    pub ev: String,
    /// Preemption algorithm id.
    #[serde(default)]
    pub alg: String,
    /// Remaining columns, keyed by header name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl ExperimentRow {
    /// Returns the named metric value, or `None` when the cell is absent,
    /// empty, or not numeric.
    ///
    /// The [`DERIVED_TL_TTT`] key is computed as `tl / ttt * 100`.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<f64> {
        if name == DERIVED_TL_TTT {
            let time_loss = self.raw_metric("tl")?;
            let travel_time = self.raw_metric("ttt")?;
            return Some(time_loss / travel_time * 100.0);
        }
        self.raw_metric(name)
    }

    fn raw_metric(&self, name: &str) -> Option<f64> {
        self.extra.get(name)?.trim().parse().ok()
    }

    /// `true` when the row's `teleported` column is truthy. Teleported runs
    /// are excluded from the instance-scaled graphs.
    #[must_use]
    pub fn teleported(&self) -> bool {
        self.extra
            .get("teleported")
            .is_some_and(|cell| matches!(cell.trim(), "True" | "true" | "1"))
    }

    /// Simulation instance number, when the table carries one.
    #[must_use]
    pub fn instance(&self) -> Option<u32> {
        self.extra.get("instance")?.trim().parse().ok()
    }
}

/// The experiment results table, one [`ExperimentRow`] per CSV record.
#[derive(Debug, Clone, Default)]
pub struct ExperimentTable {
    pub rows: Vec<ExperimentRow>,
}

impl ExperimentTable {
    /// Reads a headered CSV table.
    ///
    /// # Errors
    ///
    /// Returns the underlying CSV error on malformed input.
    pub fn from_reader<R>(reader: R) -> csv::Result<Self>
    where
        R: io::Read,
    {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let rows = csv_reader.deserialize().collect::<csv::Result<_>>()?;
        Ok(Self { rows })
    }

    /// Reads a headered CSV table from a file.
    ///
    /// # Errors
    ///
    /// Returns the underlying CSV error when the file cannot be opened or
    /// parsed.
    pub fn from_path<P>(path: P) -> csv::Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut csv_reader = csv::Reader::from_path(path)?;
        let rows = csv_reader.deserialize().collect::<csv::Result<_>>()?;
        Ok(Self { rows })
    }

    /// Rows restricted to one scenario.
    ///
    /// Rows with an empty scenario cell are kept: single-scenario tables
    /// usually omit the column entirely.
    #[must_use]
    pub fn for_scenario(&self, scenario: &str) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|row| row.scenario.is_empty() || row.scenario == scenario)
            .cloned()
            .collect();
        Self { rows }
    }

    /// Distinct entity ids, sorted.
    #[must_use]
    pub fn sorted_evs(&self) -> Vec<String> {
        let mut evs: Vec<String> = vec![];
        for row in &self.rows {
            if !row.ev.is_empty() && !evs.contains(&row.ev) {
                evs.push(row.ev.clone());
            }
        }
        evs.sort();
        evs
    }

    /// Distinct algorithm ids in first-appearance order.
    #[must_use]
    pub fn algs(&self) -> Vec<String> {
        let mut algs: Vec<String> = vec![];
        for row in &self.rows {
            if !row.alg.is_empty() && !algs.contains(&row.alg) {
                algs.push(row.alg.clone());
            }
        }
        algs
    }

    /// Non-null metric values of one (algorithm, entity) cell.
    #[must_use]
    pub fn metric_values(&self, alg: &str, ev: &str, metric: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|row| row.alg == alg && row.ev == ev)
            .filter_map(|row| row.metric(metric))
            .collect()
    }
}

/// Sample selection applied to every (algorithm, entity) group before
/// summarization: keeps the `n - 1` largest observations, dropping the
/// single smallest one.
#[must_use]
pub fn without_lowest(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    if !sorted.is_empty() {
        sorted.remove(0);
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
scenario,ev,alg,instance,tl,ttt,teleported
turin,vehev1,rfid,1,10.5,100.0,False
turin,vehev1,rfid,2,,90.0,False
turin,vehev2,fuzzy,1,8.0,80.0,True
cologne,vehev1,rfid,1,12.0,60.0,False
";

    fn table() -> ExperimentTable {
        ExperimentTable::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn metric_parsing_skips_empty_cells() {
        let table = table();
        assert_eq!(table.rows[0].metric("tl"), Some(10.5));
        assert_eq!(table.rows[1].metric("tl"), None);
        assert_eq!(table.rows[0].metric("missing"), None);
    }

    #[test]
    fn derived_tl_ttt_is_a_percentage() {
        let table = table();
        assert_eq!(table.rows[0].metric(DERIVED_TL_TTT), Some(10.5));
        // Missing tl makes the derived metric missing too.
        assert_eq!(table.rows[1].metric(DERIVED_TL_TTT), None);
    }

    #[test]
    fn teleported_rows_are_detected() {
        let table = table();
        assert!(!table.rows[0].teleported());
        assert!(table.rows[2].teleported());
    }

    #[test]
    fn scenario_filter_keeps_blank_cells() {
        let mut table = table();
        assert_eq!(table.for_scenario("turin").rows.len(), 3);
        table.rows[0].scenario = String::new();
        assert_eq!(table.for_scenario("cologne").rows.len(), 2);
    }

    #[test]
    fn distinct_ids_are_collected() {
        let table = table();
        assert_eq!(table.sorted_evs(), vec!["vehev1", "vehev2"]);
        assert_eq!(table.algs(), vec!["rfid", "fuzzy"]);
    }

    #[test]
    fn cell_values_are_filtered_by_alg_and_ev() {
        let table = table();
        assert_eq!(table.metric_values("rfid", "vehev1", "tl"), vec![10.5, 12.0]);
        assert_eq!(table.metric_values("fuzzy", "vehev1", "tl"), Vec::<f64>::new());
    }

    #[test]
    fn without_lowest_drops_exactly_one_observation() {
        assert_eq!(without_lowest(&[3.0, 1.0, 2.0]), vec![2.0, 3.0]);
        // Duplicates keep their multiplicity.
        assert_eq!(without_lowest(&[1.0, 1.0, 2.0]), vec![1.0, 2.0]);
        assert_eq!(without_lowest(&[7.0]), Vec::<f64>::new());
        assert_eq!(without_lowest(&[]), Vec::<f64>::new());
    }
}
