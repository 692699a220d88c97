use std::{
    fs,
    io::{self, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use preemptviz_report::{boxplot, render, table};
use tracing::info;

use crate::{
    data,
    options::{FigureOpt, LabelOpt},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GroupedBoxPlotArg {
    /// Experiment results CSV file
    data_file: PathBuf,
    /// Metric column to plot
    #[arg(long)]
    metric: String,
    /// Scenario key for the figure title
    #[arg(long)]
    scenario: String,
    /// Title template key from the label catalog
    #[arg(long, default_value = "tl-algs")]
    title_key: String,
    #[command(flatten)]
    labels: LabelOpt,
    #[command(flatten)]
    figure: FigureOpt,
}

pub(crate) fn run(arg: &GroupedBoxPlotArg) -> anyhow::Result<()> {
    let catalog = arg.labels.catalog()?;
    let results = data::load_results(&arg.data_file)?;
    info!(rows = results.rows.len(), "loaded experiment table");

    let title = catalog.title(&arg.title_key, &arg.scenario)?;
    let figure = boxplot::grouped_box_plot(&results, &catalog, &arg.metric, title)?;

    // One block of quartile rows per algorithm trace.
    let fmt = arg.labels.number_format();
    let mut out = io::stdout().lock();
    for trace in &figure.traces {
        writeln!(out, "{}:", trace.name)?;
        let summaries: Vec<_> = trace.boxes.iter().flatten().cloned().collect();
        table::write_quartile_table(&mut out, &summaries, fmt)?;
        writeln!(out)?;
    }

    fs::create_dir_all(&arg.figure.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            arg.figure.output_dir.display()
        )
    })?;
    render::render_grouped_box_plot(&figure, &arg.figure.render_spec())?;
    info!(figname = %arg.figure.figname, "grouped box plot written");

    Ok(())
}
