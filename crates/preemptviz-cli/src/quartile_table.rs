use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use preemptviz_report::{boxplot, table};
use tracing::info;

use crate::{data, options::LabelOpt};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct QuartileTableArg {
    /// Experiment results CSV file
    data_file: PathBuf,
    /// Metric column to summarize
    #[arg(long)]
    metric: String,
    /// Restrict the rows to a single algorithm
    #[arg(long)]
    alg: Option<String>,
    #[command(flatten)]
    labels: LabelOpt,
}

pub(crate) fn run(arg: &QuartileTableArg) -> anyhow::Result<()> {
    let catalog = arg.labels.catalog()?;
    let results = data::load_results(&arg.data_file)?;
    info!(rows = results.rows.len(), "loaded experiment table");

    let fmt = arg.labels.number_format();
    let mut out = io::stdout().lock();

    if let Some(alg) = &arg.alg {
        let figure =
            boxplot::box_plot(&results, &catalog, &arg.metric, alg, String::new())?;
        let summaries: Vec<_> = figure.summaries().cloned().collect();
        table::write_quartile_table(&mut out, &summaries, fmt)?;
        return Ok(());
    }

    let figure = boxplot::grouped_box_plot(&results, &catalog, &arg.metric, String::new())?;
    for trace in &figure.traces {
        writeln!(out, "{}:", trace.name)?;
        let summaries: Vec<_> = trace.boxes.iter().flatten().cloned().collect();
        table::write_quartile_table(&mut out, &summaries, fmt)?;
        writeln!(out)?;
    }

    Ok(())
}
