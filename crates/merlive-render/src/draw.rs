//! Plotters drawing routines for the three artifacts

use crate::error::RenderError;
use crate::geometry::{pie_slices, polar, value_axis_max, wedge_polygon};
use crate::layout::{spring_layout, Point};
use merlive_core::style::{
    HAS_PERMISSION_COLOR, HAS_ROLE_COLOR, PERMISSION_COLOR, ROLE_COLOR, USER_COLOR,
};
use merlive_core::{AllocationGraph, Color as CoreColor, Series};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const FONT: &str = "sans-serif";

/// Slice colors for the pie chart, cycled
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Padding around the graph drawing, in pixels
const GRAPH_MARGIN: i32 = 60;

fn rgb(color: CoreColor) -> RGBColor {
    let (r, g, b) = color.rgb();
    RGBColor(r, g, b)
}

/// Marker radius in pixels for a node of the given area size
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn node_radius(size: u32) -> i32 {
    (f64::from(size).sqrt() * 0.9).round() as i32
}

fn centered(size: u32) -> TextStyle<'static> {
    (FONT, size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center))
}

/// "No data" in the middle of `area`
pub(crate) fn draw_placeholder<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
) -> Result<(), RenderError>
where
    DB::ErrorType: 'static,
{
    let (w, h) = area.dim_in_pixel();
    let (cx, cy) = (half(w), half(h));
    area.draw(&Text::new(title.to_string(), (cx, 30), centered(22)))?;
    area.draw(&Text::new("No data", (cx, cy), centered(20)))?;
    Ok(())
}

#[allow(clippy::cast_possible_wrap)]
fn half(v: u32) -> i32 {
    (v / 2) as i32
}

fn to_pixel(point: Point, width: u32, height: u32) -> (i32, i32) {
    let usable_w = f64::from(width) - 2.0 * f64::from(GRAPH_MARGIN);
    let usable_h = f64::from(height) - 2.0 * f64::from(GRAPH_MARGIN);
    #[allow(clippy::cast_possible_truncation)]
    (
        GRAPH_MARGIN + (point.0 * usable_w).round() as i32,
        GRAPH_MARGIN + (point.1 * usable_h).round() as i32,
    )
}

/// Endpoints of an edge trimmed to the node rims, plus the arrowhead
#[allow(clippy::cast_possible_truncation)]
fn arrow(from: (i32, i32), to: (i32, i32), from_r: i32, to_r: i32) -> Option<([(i32, i32); 2], [(i32, i32); 3])> {
    let dx = f64::from(to.0 - from.0);
    let dy = f64::from(to.1 - from.1);
    let len = dx.hypot(dy);
    if len <= f64::from(from_r + to_r) {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let at = |base: (i32, i32), dist: f64| {
        (
            base.0 + (ux * dist).round() as i32,
            base.1 + (uy * dist).round() as i32,
        )
    };
    let start = at(from, f64::from(from_r));
    let tip = at(to, -f64::from(to_r));
    let head = 12.0;
    let back = (f64::from(tip.0) - ux * head, f64::from(tip.1) - uy * head);
    let wing = |sign: f64| {
        (
            (back.0 - uy * head * 0.45 * sign).round() as i32,
            (back.1 + ux * head * 0.45 * sign).round() as i32,
        )
    };
    Some(([start, tip], [tip, wing(1.0), wing(-1.0)]))
}

/// Node-link diagram with arrows, bold labels and a category legend
pub(crate) fn draw_graph<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    graph: &AllocationGraph,
    iterations: usize,
) -> Result<(), RenderError>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    if graph.is_empty() {
        return draw_placeholder(root, "Allocation Graph");
    }

    let area = root.titled("Allocation Graph", (FONT, 28))?;
    let (w, h) = area.dim_in_pixel();
    let positions: Vec<_> = spring_layout(graph, iterations)
        .into_iter()
        .map(|p| to_pixel(p, w, h))
        .collect();
    let radii: Vec<_> = graph.nodes().map(|n| node_radius(n.style().size)).collect();

    for (source, target, edge) in graph.links() {
        let color = rgb(edge.style().color).mix(0.7);
        if let Some((line, head)) = arrow(positions[source], positions[target], radii[source], radii[target]) {
            area.draw(&PathElement::new(line.to_vec(), color.stroke_width(2)))?;
            area.draw(&Polygon::new(head.to_vec(), color.filled()))?;
        }
    }

    for (i, node) in graph.nodes().enumerate() {
        let color = rgb(node.style().color).mix(0.85);
        area.draw(&Circle::new(positions[i], radii[i], color.filled()))?;
    }

    let label_style = (FONT, 14)
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for (i, node) in graph.nodes().enumerate() {
        area.draw(&Text::new(node.label.clone(), positions[i], label_style.clone()))?;
    }

    draw_legend(&area)
}

fn draw_legend<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> Result<(), RenderError>
where
    DB::ErrorType: 'static,
{
    let nodes = [("User", USER_COLOR), ("Role", ROLE_COLOR), ("Permission", PERMISSION_COLOR)];
    let edges = [("has role", HAS_ROLE_COLOR), ("has permission", HAS_PERMISSION_COLOR)];
    let text = (FONT, 14).into_font().color(&BLACK).pos(Pos::new(HPos::Left, VPos::Center));

    let (x, mut y) = (16, 16);
    for (label, color) in nodes {
        area.draw(&Circle::new((x + 7, y), 7, rgb(color).filled()))?;
        area.draw(&Text::new(label, (x + 22, y), text.clone()))?;
        y += 22;
    }
    for (label, color) in edges {
        area.draw(&PathElement::new(vec![(x, y), (x + 14, y)], rgb(color).stroke_width(3)))?;
        area.draw(&Text::new(label, (x + 22, y), text.clone()))?;
        y += 22;
    }
    Ok(())
}

/// Pie chart with percentage labels inside and role names outside
pub(crate) fn draw_pie<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, series: &Series) -> Result<(), RenderError>
where
    DB::ErrorType: 'static,
{
    let slices = pie_slices(series);
    if slices.is_empty() {
        return draw_placeholder(area, &series.title);
    }

    let titled = area.titled(&series.title, (FONT, 22))?;
    let (w, h) = titled.dim_in_pixel();
    let center = (half(w), half(h));
    let radius = f64::from(w.min(h)) * 0.33;

    for slice in slices.iter().filter(|s| s.share > 0.0) {
        let color = PALETTE[slice.index % PALETTE.len()];
        titled.draw(&Polygon::new(wedge_polygon(center, radius, slice), color.filled()))?;
    }

    for slice in slices.iter().filter(|s| s.share > 0.0) {
        let label = &series.points[slice.index].0;
        let mid = slice.mid_angle();
        titled.draw(&Text::new(label.clone(), polar(center, radius * 1.18, mid), centered(14)))?;
        titled.draw(&Text::new(slice.percent_label(), polar(center, radius * 0.6, mid), centered(13)))?;
    }
    Ok(())
}

/// Vertical bar chart with the value printed above each bar
pub(crate) fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    series: &Series,
    x_desc: &str,
    y_desc: &str,
    colors: &[RGBColor],
) -> Result<(), RenderError>
where
    DB::ErrorType: 'static,
{
    if series.is_empty() {
        return draw_placeholder(area, &series.title);
    }

    let labels: Vec<String> = series.labels().map(str::to_string).collect();
    #[allow(clippy::cast_possible_truncation)]
    let count = labels.len() as u32;
    let y_max = value_axis_max(series.max_value());

    let mut chart = ChartBuilder::on(area)
        .caption(&series.title, (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(bar_slots(count).into_segmented(), 0u64..y_max)?;

    let formatter = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&formatter)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    let color_of = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => colors[*i as usize % colors.len()],
        SegmentValue::Last => colors[0],
    };
    chart.draw_series(
        Histogram::vertical(&chart)
            .style_func(|x, _| color_of(x).filled())
            .margin(12)
            .data(series.values().enumerate().map(|(i, v)| (index(i), v))),
    )?;

    let value_style = (FONT, 14)
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(series.values().enumerate().map(|(i, v)| {
        Text::new(v.to_string(), (SegmentValue::CenterOf(index(i)), v), value_style.clone())
    }))?;
    Ok(())
}

/// Category range holding exactly `count` bars
///
/// Segmented ranges include their end, so `0..count` would add an empty slot.
fn bar_slots(count: u32) -> std::ops::Range<u32> {
    0..count.saturating_sub(1)
}

#[allow(clippy::cast_possible_truncation)]
fn index(i: usize) -> u32 {
    i as u32
}

/// Users-per-role pie next to permissions-per-role bars
pub(crate) fn draw_role_stats<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    users: &Series,
    permissions: &Series,
) -> Result<(), RenderError>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));
    draw_pie(&panels[0], users)?;
    draw_bars(&panels[1], permissions, "Role", "Permissions", &[rgb(ROLE_COLOR)])
}

/// Totals bar chart in node category colors
pub(crate) fn draw_summary<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, summary: &Series) -> Result<(), RenderError>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let colors = [rgb(USER_COLOR), rgb(ROLE_COLOR), rgb(PERMISSION_COLOR)];
    draw_bars(root, summary, "", "Count", &colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_radius_orders_categories() {
        assert!(node_radius(800) > node_radius(500));
        assert!(node_radius(500) > node_radius(300));
        assert_eq!(node_radius(0), 0);
    }

    #[test]
    fn test_to_pixel_respects_margin() {
        assert_eq!(to_pixel((0.0, 0.0), 400, 300), (GRAPH_MARGIN, GRAPH_MARGIN));
        assert_eq!(to_pixel((1.0, 1.0), 400, 300), (400 - GRAPH_MARGIN, 300 - GRAPH_MARGIN));
    }

    #[test]
    fn test_arrow_trims_to_rims() {
        let (line, head) = arrow((0, 0), (100, 0), 10, 20).unwrap();
        assert_eq!(line, [(10, 0), (80, 0)]);
        assert_eq!(head[0], (80, 0));
        assert!(head[1].0 < 80 && head[2].0 < 80);
    }

    #[test]
    fn test_bar_slots_match_bar_count() {
        assert_eq!(bar_slots(1), 0..0);
        assert_eq!(bar_slots(3), 0..2);
        assert_eq!(bar_slots(0), 0..0);
    }

    #[test]
    fn test_arrow_skipped_for_overlapping_nodes() {
        assert!(arrow((0, 0), (10, 0), 10, 10).is_none());
    }
}
