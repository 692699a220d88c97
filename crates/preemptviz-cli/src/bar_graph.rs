use std::{fs, path::PathBuf};

use anyhow::Context as _;
use preemptviz_report::{graph, render};
use tracing::info;

use crate::{
    data,
    options::{CountsOpt, FigureOpt, LabelOpt},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BarGraphArg {
    /// Experiment results CSV file
    data_file: PathBuf,
    /// Metric column the bars aggregate
    #[arg(long, default_value = "perc")]
    metric: String,
    /// Scenario key selecting the rows and the figure title
    #[arg(long)]
    scenario: String,
    /// Title template key from the label catalog
    #[arg(long, default_value = "tl-perc")]
    title_key: String,
    #[command(flatten)]
    counts: CountsOpt,
    #[command(flatten)]
    labels: LabelOpt,
    #[command(flatten)]
    figure: FigureOpt,
}

pub(crate) fn run(arg: &BarGraphArg) -> anyhow::Result<()> {
    let catalog = arg.labels.catalog()?;
    let counts = arg.counts.counts()?;
    let results = data::load_results(&arg.data_file)?.for_scenario(&arg.scenario);
    info!(rows = results.rows.len(), "loaded scenario rows");

    let title = catalog.title(&arg.title_key, &arg.scenario)?;
    let figure = graph::bar_graph(&results, &catalog, &counts, &arg.metric, title)?;
    info!(series = figure.series.len(), "algorithms with plottable bars");

    fs::create_dir_all(&arg.figure.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            arg.figure.output_dir.display()
        )
    })?;
    render::render_bar_graph(&figure, &arg.figure.render_spec())?;
    info!(figname = %arg.figure.figname, "bar graph written");

    Ok(())
}
