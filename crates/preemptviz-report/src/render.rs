use std::{
    fmt::Display,
    ops::Range,
    path::{Path, PathBuf},
};

use plotters::{
    coord::{Shift, cartesian::Cartesian2d, types::RangedCoordf64},
    drawing::DrawingAreaErrorKind,
    prelude::*,
};
use preemptviz_stats::quartiles::QuartileSummary;

use crate::{
    boxplot::{BoxPlotFigure, GroupedBoxPlotFigure},
    graph::{BarGraphFigure, LineGraphFigure, SeriesPoint},
    map::RouteMapFigure,
};

/// Output geometry and destination of one rendered figure.
///
/// Every figure is written twice: `<output_dir>/<figname>.svg` for print and
/// `<output_dir>/<figname>.png` for preview.
#[derive(Debug, Clone)]
pub struct RenderSpec {
    pub output_dir: PathBuf,
    pub figname: String,
    pub width: u32,
    pub height: u32,
}

impl RenderSpec {
    #[must_use]
    pub fn new(output_dir: &Path, figname: &str, width: u32, height: u32) -> Self {
        Self {
            output_dir: output_dir.to_owned(),
            figname: figname.to_owned(),
            width,
            height,
        }
    }

    fn target(&self, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{extension}", self.figname))
    }
}

/// Error from the drawing backend while rendering one figure.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("failed to render figure '{figname}': {message}")]
pub struct RenderError {
    pub figname: String,
    pub message: String,
}

impl RenderError {
    fn new<E>(figname: &str, source: &E) -> Self
    where
        E: Display,
    {
        Self {
            figname: figname.to_owned(),
            message: source.to_string(),
        }
    }
}

/// Expands to one draw run per backend; the closure literal is re-typed for
/// each expansion, which keeps the draw functions generic over the backend.
macro_rules! render_to_backends {
    ($spec:expr, $draw:expr) => {{
        let spec: &RenderSpec = $spec;
        let svg_target = spec.target("svg");
        {
            let root = SVGBackend::new(&svg_target, (spec.width, spec.height)).into_drawing_area();
            $draw(&root).map_err(|e| RenderError::new(&spec.figname, &e))?;
            root.present().map_err(|e| RenderError::new(&spec.figname, &e))?;
        }
        let png_target = spec.target("png");
        {
            let root =
                BitMapBackend::new(&png_target, (spec.width, spec.height)).into_drawing_area();
            $draw(&root).map_err(|e| RenderError::new(&spec.figname, &e))?;
            root.present().map_err(|e| RenderError::new(&spec.figname, &e))?;
        }
        Ok(())
    }};
}

/// Renders a box plot figure to SVG and PNG.
///
/// # Errors
///
/// Returns [`RenderError`] on any backend failure; nothing is retried.
pub fn render_box_plot(figure: &BoxPlotFigure, spec: &RenderSpec) -> Result<(), RenderError> {
    render_to_backends!(spec, |root| draw_box_plot(root, figure))
}

/// Renders a grouped box plot figure to SVG and PNG.
///
/// # Errors
///
/// Returns [`RenderError`] on any backend failure.
pub fn render_grouped_box_plot(
    figure: &GroupedBoxPlotFigure,
    spec: &RenderSpec,
) -> Result<(), RenderError> {
    render_to_backends!(spec, |root| draw_grouped_box_plot(root, figure))
}

/// Renders a line graph figure to SVG and PNG.
///
/// # Errors
///
/// Returns [`RenderError`] on any backend failure.
pub fn render_line_graph(figure: &LineGraphFigure, spec: &RenderSpec) -> Result<(), RenderError> {
    render_to_backends!(spec, |root| draw_line_graph(root, figure))
}

/// Renders a bar graph figure to SVG and PNG.
///
/// # Errors
///
/// Returns [`RenderError`] on any backend failure.
pub fn render_bar_graph(figure: &BarGraphFigure, spec: &RenderSpec) -> Result<(), RenderError> {
    render_to_backends!(spec, |root| draw_bar_graph(root, figure))
}

/// Renders a route map figure to SVG and PNG.
///
/// # Errors
///
/// Returns [`RenderError`] on any backend failure.
pub fn render_route_map(figure: &RouteMapFigure, spec: &RenderSpec) -> Result<(), RenderError> {
    render_to_backends!(spec, |root| draw_route_map(root, figure))
}

type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_box_plot<DB>(
    root: &DrawingArea<DB, Shift>,
    figure: &BoxPlotFigure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE)?;

    let summaries: Vec<&QuartileSummary> = figure.summaries().collect();
    let y_range = value_range(&summaries);
    let categories: Vec<String> = figure
        .boxes
        .iter()
        .map(|labeled| labeled.category.clone())
        .collect();

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(category_range(categories.len()), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(categories.len().max(1))
        .x_label_formatter(&|x| category_label(&categories, *x))
        .y_desc(&figure.y_label)
        .label_style(("sans-serif", 14))
        .draw()?;

    for (index, labeled) in figure.boxes.iter().enumerate() {
        let color = Palette99::pick(index).mix(1.0);
        draw_box(&mut chart, index_to_f64(index), 0.3, &labeled.summary, color)?;
    }

    Ok(())
}

fn draw_grouped_box_plot<DB>(
    root: &DrawingArea<DB, Shift>,
    figure: &GroupedBoxPlotFigure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE)?;

    let summaries: Vec<&QuartileSummary> = figure.summaries().collect();
    let y_range = value_range(&summaries);

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(category_range(figure.categories.len()), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(figure.categories.len().max(1))
        .x_label_formatter(&|x| category_label(&figure.categories, *x))
        .y_desc(&figure.y_label)
        .label_style(("sans-serif", 14))
        .draw()?;

    let trace_count = figure.traces.len().max(1);
    let slot = 0.8 / index_to_f64(trace_count);
    let half_width = slot * 0.4;
    for (trace_index, trace) in figure.traces.iter().enumerate() {
        let color = Palette99::pick(trace_index).mix(1.0);
        let offset = -0.4 + slot * (index_to_f64(trace_index) + 0.5);
        for (category_index, summary) in trace.boxes.iter().enumerate() {
            if let Some(summary) = summary {
                let center = index_to_f64(category_index) + offset;
                draw_box(&mut chart, center, half_width, summary, color)?;
            }
        }
        chart
            .draw_series(std::iter::once(PathElement::new(
                Vec::<(f64, f64)>::new(),
                color.stroke_width(2),
            )))?
            .label(trace.name.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 4), (x + 12, y + 4)], color.filled())
            });
    }

    if !figure.traces.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_line_graph<DB>(
    root: &DrawingArea<DB, Shift>,
    figure: &LineGraphFigure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE)?;

    let points: Vec<SeriesPoint> = figure
        .series
        .iter()
        .flat_map(|series| series.points.iter().copied())
        .collect();
    let x_range = padded_range(
        fold_min(points.iter().map(|p| p.x)),
        fold_max(points.iter().map(|p| p.x)),
    );
    let y_range = padded_range(
        fold_min(points.iter().map(|p| p.mean - p.half_width)),
        fold_max(points.iter().map(|p| p.mean + p.half_width)),
    );

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(&figure.x_label)
        .y_desc(&figure.y_label)
        .label_style(("sans-serif", 14))
        .draw()?;

    for (index, series) in figure.series.iter().enumerate() {
        let color = Palette99::pick(index).mix(1.0);
        chart
            .draw_series(
                LineSeries::new(
                    series.points.iter().map(|point| (point.x, point.mean)),
                    color.stroke_width(2),
                )
                .point_size(3),
            )?
            .label(series.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
        chart.draw_series(series.points.iter().map(|point| {
            ErrorBar::new_vertical(
                point.x,
                point.mean - point.half_width,
                point.mean,
                point.mean + point.half_width,
                color.stroke_width(1),
                6,
            )
        }))?;
    }

    if !figure.series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_bar_graph<DB>(
    root: &DrawingArea<DB, Shift>,
    figure: &BarGraphFigure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE)?;

    // Bars sit at category slots, one slot per distinct vehicle count.
    let mut counts: Vec<f64> = figure
        .series
        .iter()
        .flat_map(|series| series.points.iter().map(|point| point.x))
        .collect();
    counts.sort_by(f64::total_cmp);
    counts.dedup();

    let lowest = fold_min(
        figure
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.mean - p.half_width)),
    )
    .min(0.0);
    let highest = fold_max(
        figure
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.mean + p.half_width)),
    )
    .max(0.0);
    let y_range = padded_range(lowest, highest);

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(category_range(counts.len()), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(counts.len().max(1))
        .x_label_formatter(&|x| count_label(&counts, *x))
        .x_desc(&figure.x_label)
        .y_desc(&figure.y_label)
        .label_style(("sans-serif", 14))
        .draw()?;

    let series_count = figure.series.len().max(1);
    let slot = 0.8 / index_to_f64(series_count);
    let half_width = slot * 0.4;
    for (series_index, series) in figure.series.iter().enumerate() {
        let color = Palette99::pick(series_index).mix(1.0);
        let offset = -0.4 + slot * (index_to_f64(series_index) + 0.5);
        for point in &series.points {
            let Some(position) = counts.iter().position(|count| *count == point.x) else {
                continue;
            };
            let center = index_to_f64(position) + offset;
            let (bottom, top) = if point.mean < 0.0 {
                (point.mean, 0.0)
            } else {
                (0.0, point.mean)
            };
            chart.draw_series(std::iter::once(Rectangle::new(
                [(center - half_width, bottom), (center + half_width, top)],
                color.filled(),
            )))?;
            chart.draw_series(std::iter::once(ErrorBar::new_vertical(
                center,
                point.mean - point.half_width,
                point.mean,
                point.mean + point.half_width,
                BLACK.stroke_width(1),
                5,
            )))?;
        }
        chart
            .draw_series(std::iter::once(PathElement::new(
                Vec::<(f64, f64)>::new(),
                color.stroke_width(2),
            )))?
            .label(series.name.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 4), (x + 12, y + 4)], color.filled())
            });
    }

    if !figure.series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_route_map<DB>(
    root: &DrawingArea<DB, Shift>,
    figure: &RouteMapFigure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE)?;

    let (x_range, y_range) = map_view(figure);

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", 16))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .label_style(("sans-serif", 14))
        .draw()?;

    for (index, path) in figure.paths.iter().enumerate() {
        let color = Palette99::pick(index).mix(1.0);
        for (segment_index, segment) in split_segments(&path.points).into_iter().enumerate() {
            let anno =
                chart.draw_series(LineSeries::new(segment, color.stroke_width(2)))?;
            if segment_index == 0 {
                anno.label(path.name.clone()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                });
            }
        }
    }

    if !figure.paths.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_box<DB>(
    chart: &mut Chart2d<'_, DB>,
    center_x: f64,
    half_width: f64,
    summary: &QuartileSummary,
    color: RGBAColor,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    let stroke = color.stroke_width(2);
    let cap = half_width / 2.0;

    chart.draw_series(std::iter::once(Rectangle::new(
        [
            (center_x - half_width, summary.q1),
            (center_x + half_width, summary.q3),
        ],
        color.mix(0.25).filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [
            (center_x - half_width, summary.q1),
            (center_x + half_width, summary.q3),
        ],
        stroke,
    )))?;

    let lines = [
        vec![(center_x, summary.lower_fence), (center_x, summary.q1)],
        vec![(center_x, summary.q3), (center_x, summary.upper_fence)],
        vec![
            (center_x - cap, summary.lower_fence),
            (center_x + cap, summary.lower_fence),
        ],
        vec![
            (center_x - cap, summary.upper_fence),
            (center_x + cap, summary.upper_fence),
        ],
        vec![
            (center_x - half_width, summary.median),
            (center_x + half_width, summary.median),
        ],
    ];
    chart.draw_series(
        lines
            .into_iter()
            .map(|points| PathElement::new(points, stroke)),
    )?;

    let outliers = [
        summary.min_is_outlier.then_some((center_x, summary.min)),
        summary.max_is_outlier.then_some((center_x, summary.max)),
    ];
    chart.draw_series(
        outliers
            .into_iter()
            .flatten()
            .map(|point| Circle::new(point, 3, color.filled())),
    )?;

    Ok(())
}

/// Category axis spanning `count` unit-wide slots centered on 0, 1, 2, ...
fn category_range(count: usize) -> Range<f64> {
    -0.5..index_to_f64(count.max(1)) - 0.5
}

fn category_label(categories: &[String], x: f64) -> String {
    nearest_index(categories.len(), x)
        .and_then(|index| categories.get(index).cloned())
        .unwrap_or_default()
}

fn count_label(counts: &[f64], x: f64) -> String {
    nearest_index(counts.len(), x)
        .and_then(|index| counts.get(index))
        .map(|count| format!("{count:.0}"))
        .unwrap_or_default()
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn nearest_index(len: usize, x: f64) -> Option<usize> {
    let rounded = x.round();
    if rounded < 0.0 || rounded >= index_to_f64(len) {
        return None;
    }
    Some(rounded as usize)
}

#[expect(clippy::cast_precision_loss)]
fn index_to_f64(index: usize) -> f64 {
    index as f64
}

/// Value range covering the observed extremes of all summaries, padded so
/// whiskers and outlier marks stay inside the plot area.
fn value_range(summaries: &[&QuartileSummary]) -> Range<f64> {
    padded_range(
        fold_min(summaries.iter().map(|s| s.min)),
        fold_max(summaries.iter().map(|s| s.max)),
    )
}

fn padded_range(min: f64, max: f64) -> Range<f64> {
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let spread = max - min;
    if spread <= f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = spread * 0.05;
    (min - pad)..(max + pad)
}

fn fold_min<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(f64::INFINITY, f64::min)
}

fn fold_max<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(f64::NEG_INFINITY, f64::max)
}

/// View window of the map: a zoom-derived span around the boundary center
/// when a positive zoom is given, the padded data bounding box otherwise.
fn map_view(figure: &RouteMapFigure) -> (Range<f64>, Range<f64>) {
    if figure.zoom > 0.0 {
        let half_span = 360.0 / 2.0_f64.powf(figure.zoom) / 2.0;
        let x_range = (figure.center.lon - half_span)..(figure.center.lon + half_span);
        let y_range = (figure.center.lat - half_span)..(figure.center.lat + half_span);
        return (x_range, y_range);
    }

    let points: Vec<(f64, f64)> = figure
        .paths
        .iter()
        .flat_map(|path| path.points.iter().flatten().copied())
        .collect();
    (
        padded_range(
            fold_min(points.iter().map(|p| p.0)),
            fold_max(points.iter().map(|p| p.0)),
        ),
        padded_range(
            fold_min(points.iter().map(|p| p.1)),
            fold_max(points.iter().map(|p| p.1)),
        ),
    )
}

/// Splits a pen-up coordinate stream into drawable polyline segments.
fn split_segments(points: &[Option<(f64, f64)>]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = vec![];
    let mut current: Vec<(f64, f64)> = vec![];
    for point in points {
        match point {
            Some(point) => current.push(*point),
            None => {
                if current.len() > 1 {
                    segments.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
        }
    }
    if current.len() > 1 {
        segments.push(current);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_split_on_pen_up_markers() {
        let stream = vec![
            Some((0.0, 0.0)),
            Some((1.0, 1.0)),
            None,
            Some((5.0, 5.0)),
            Some((6.0, 6.0)),
            None,
        ];
        let segments = split_segments(&stream);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], vec![(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(segments[1], vec![(5.0, 5.0), (6.0, 6.0)]);
    }

    #[test]
    fn single_point_segments_are_not_drawable() {
        let stream = vec![Some((0.0, 0.0)), None, Some((1.0, 1.0)), Some((2.0, 2.0))];
        let segments = split_segments(&stream);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 2);
    }

    #[test]
    fn padded_ranges_never_collapse() {
        let range = padded_range(5.0, 5.0);
        assert!(range.start < range.end);
        let empty = padded_range(f64::INFINITY, f64::NEG_INFINITY);
        assert_eq!(empty, 0.0..1.0);
    }

    #[test]
    fn category_labels_round_to_the_nearest_slot() {
        let categories = vec!["a".to_owned(), "b".to_owned()];
        assert_eq!(category_label(&categories, 0.1), "a");
        assert_eq!(category_label(&categories, 0.9), "b");
        assert_eq!(category_label(&categories, 2.4), "");
        assert_eq!(category_label(&categories, -0.8), "");
    }
}
