use std::{fs, path::PathBuf};

use anyhow::Context as _;
use preemptviz_report::{graph, render};
use tracing::info;

use crate::{
    data,
    options::{CountsOpt, FigureOpt, LabelOpt},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LineGraphArg {
    /// Experiment results CSV file
    data_file: PathBuf,
    /// Metric columns to plot, one series each (repeatable)
    #[arg(long = "metric", required = true)]
    metrics: Vec<String>,
    /// Scenario key selecting the rows and the figure title
    #[arg(long)]
    scenario: String,
    /// Title template key from the label catalog
    #[arg(long, default_value = "tl-no-preemption")]
    title_key: String,
    #[command(flatten)]
    counts: CountsOpt,
    #[command(flatten)]
    labels: LabelOpt,
    #[command(flatten)]
    figure: FigureOpt,
}

pub(crate) fn run(arg: &LineGraphArg) -> anyhow::Result<()> {
    let catalog = arg.labels.catalog()?;
    let counts = arg.counts.counts()?;
    let results = data::load_results(&arg.data_file)?.for_scenario(&arg.scenario);
    info!(rows = results.rows.len(), "loaded scenario rows");

    let title = catalog.title(&arg.title_key, &arg.scenario)?;
    let metrics: Vec<&str> = arg.metrics.iter().map(String::as_str).collect();
    let figure = graph::line_graph(&results, &catalog, &counts, &metrics, title)?;

    fs::create_dir_all(&arg.figure.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            arg.figure.output_dir.display()
        )
    })?;
    render::render_line_graph(&figure, &arg.figure.render_spec())?;
    info!(figname = %arg.figure.figname, "line graph written");

    Ok(())
}
