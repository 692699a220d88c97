use std::{fs, io, path::PathBuf};

use anyhow::Context as _;
use preemptviz_report::{boxplot, render, table};
use tracing::info;

use crate::{
    data,
    options::{FigureOpt, LabelOpt},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BoxPlotArg {
    /// Experiment results CSV file
    data_file: PathBuf,
    /// Metric column to plot
    #[arg(long)]
    metric: String,
    /// Scenario key for the figure title
    #[arg(long)]
    scenario: String,
    /// Title template key from the label catalog
    #[arg(long, default_value = "tl-no-preemption")]
    title_key: String,
    /// Algorithm whose runs are plotted
    #[arg(long, default_value = "no-preemption")]
    alg: String,
    #[command(flatten)]
    labels: LabelOpt,
    #[command(flatten)]
    figure: FigureOpt,
}

pub(crate) fn run(arg: &BoxPlotArg) -> anyhow::Result<()> {
    let catalog = arg.labels.catalog()?;
    let results = data::load_results(&arg.data_file)?;
    info!(rows = results.rows.len(), "loaded experiment table");

    let title = catalog.title(&arg.title_key, &arg.scenario)?;
    let figure = boxplot::box_plot(&results, &catalog, &arg.metric, &arg.alg, title)?;

    // Quartile rows accompany every box plot, ready for the LaTeX tables.
    let summaries: Vec<_> = figure.summaries().cloned().collect();
    table::write_quartile_table(
        &mut io::stdout().lock(),
        &summaries,
        arg.labels.number_format(),
    )?;

    fs::create_dir_all(&arg.figure.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            arg.figure.output_dir.display()
        )
    })?;
    render::render_box_plot(&figure, &arg.figure.render_spec())?;
    info!(figname = %arg.figure.figname, "box plot written");

    Ok(())
}
