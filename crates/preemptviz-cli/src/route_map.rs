use std::{fs, path::PathBuf};

use anyhow::Context as _;
use preemptviz_report::{map, render};
use preemptviz_trajectory::{builder::DegeneratePolicy, view::BOUNDARY_EV};
use tracing::info;

use crate::{
    data,
    options::{FigureOpt, LabelOpt},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RouteMapArg {
    /// Vehicle position CSV file (scenario, ev, lon, lat)
    positions_file: PathBuf,
    /// Scenario key selecting the rows and the figure title
    #[arg(long)]
    scenario: String,
    /// Title template key from the label catalog
    #[arg(long, default_value = "route")]
    title_key: String,
    /// Map zoom level centered on the boundary entity
    #[arg(long, default_value_t = 12.0)]
    zoom: f64,
    /// Entity id marking the boundary reference points
    #[arg(long, default_value = BOUNDARY_EV)]
    boundary: String,
    /// Fail on one-point trajectory groups instead of skipping them
    #[arg(long)]
    strict: bool,
    #[command(flatten)]
    labels: LabelOpt,
    #[command(flatten)]
    figure: FigureOpt,
}

pub(crate) fn run(arg: &RouteMapArg) -> anyhow::Result<()> {
    let catalog = arg.labels.catalog()?;
    let mut rows = data::load_positions(&arg.positions_file)?;
    rows.retain(|row| row.scenario.is_empty() || row.scenario == arg.scenario);
    info!(rows = rows.len(), "loaded scenario position rows");

    let policy = if arg.strict {
        DegeneratePolicy::Fail
    } else {
        DegeneratePolicy::Skip
    };
    let title = catalog.title(&arg.title_key, &arg.scenario)?;
    let figure = map::route_map(&rows, &catalog, &arg.boundary, policy, arg.zoom, title)?;
    info!(paths = figure.paths.len(), "trajectories to draw");

    fs::create_dir_all(&arg.figure.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            arg.figure.output_dir.display()
        )
    })?;
    render::render_route_map(&figure, &arg.figure.render_spec())?;
    info!(figname = %arg.figure.figname, "route map written");

    Ok(())
}
