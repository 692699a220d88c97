mod bar_graph;
mod box_plot;
mod command;
mod data;
mod grouped_box_plot;
mod line_graph;
mod options;
mod quartile_table;
mod route_map;

fn main() -> anyhow::Result<()> {
    command::run()
}
