use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{bar_graph, box_plot, grouped_box_plot, line_graph, quartile_table, route_map};

#[derive(Debug, Parser)]
#[command(
    name = "preemptviz",
    about = "Charts, tables and route maps for the traffic-signal preemption study"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Per-entity box plot of one metric for a single algorithm
    BoxPlot(box_plot::BoxPlotArg),
    /// Grouped box plot of one metric across algorithms and entities
    GroupedBoxPlot(grouped_box_plot::GroupedBoxPlotArg),
    /// Line graph of per-instance means with confidence intervals
    LineGraph(line_graph::LineGraphArg),
    /// Grouped bar graph of per-instance means with confidence intervals
    BarGraph(bar_graph::BarGraphArg),
    /// Route map built from vehicle position samples
    RouteMap(route_map::RouteMapArg),
    /// LaTeX quartile table rows for one metric, without rendering
    QuartileTable(quartile_table::QuartileTableArg),
}

pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::BoxPlot(arg) => box_plot::run(&arg),
        Command::GroupedBoxPlot(arg) => grouped_box_plot::run(&arg),
        Command::LineGraph(arg) => line_graph::run(&arg),
        Command::BarGraph(arg) => bar_graph::run(&arg),
        Command::RouteMap(arg) => route_map::run(&arg),
        Command::QuartileTable(arg) => quartile_table::run(&arg),
    }
}
