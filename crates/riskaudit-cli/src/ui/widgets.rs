use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType, Paragraph, Widget},
};

use super::figure::{BarFigure, Figure, ScatterFigure};

/// Bar heights are integers; values are stored with three decimals.
const BAR_SCALE: f64 = 1000.0;

const SERIES_COLORS: [Color; 2] = [Color::Cyan, Color::Yellow];

pub(super) struct FigureView<'a> {
    figure: &'a Figure,
}

impl<'a> FigureView<'a> {
    pub(super) fn new(figure: &'a Figure) -> Self {
        Self { figure }
    }
}

impl Widget for FigureView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        match self.figure {
            Figure::Bars(bars) => render_bars(bars, main_area, buf),
            Figure::Scatter(scatter) => render_scatter(scatter, main_area, buf),
        }
        Widget::render(Line::raw(" q/Esc: close"), help_area, buf);
    }
}

fn series_style(index: usize) -> Style {
    Style::default().fg(SERIES_COLORS[index % SERIES_COLORS.len()])
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_height(value: f64) -> u64 {
    (value.max(0.0) * BAR_SCALE).round() as u64
}

fn render_bars(figure: &BarFigure, area: Rect, buf: &mut Buffer) {
    let legend = figure
        .series
        .iter()
        .enumerate()
        .map(|(i, name)| Span::styled(format!(" ■ {name}"), series_style(i)))
        .collect::<Vec<_>>();
    let block = Block::bordered()
        .title(figure.title.as_str())
        .title_bottom(Line::from(legend));

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(7)
        .bar_gap(1)
        .group_gap(3)
        .max(bar_height(figure.max_value()).max(1));
    for group in &figure.groups {
        let bars = group
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                Bar::default()
                    .value(bar_height(*value))
                    .text_value(format!("{value:.3}"))
                    .style(series_style(i))
            })
            .collect::<Vec<_>>();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(group.label.as_str()))
                .bars(&bars),
        );
    }

    Widget::render(chart, area, buf);
}

fn render_scatter(figure: &ScatterFigure, area: Rect, buf: &mut Buffer) {
    let [chart_area, list_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(26)]).areas(area);

    let data = figure.points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>();
    let highlighted = figure
        .highlight
        .and_then(|i| data.get(i))
        .copied()
        .into_iter()
        .collect::<Vec<_>>();
    let (x_bounds, y_bounds) = figure.bounds();

    let datasets = vec![
        Dataset::default()
            .name("thresholds")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(series_style(0))
            .data(&data),
        Dataset::default()
            .name("best")
            .marker(Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(series_style(1))
            .data(&highlighted),
    ];
    let axis = |title: &str, bounds: [f64; 2]| {
        Axis::default()
            .title(title.to_owned())
            .bounds(bounds)
            .labels([
                format!("{:.0}", bounds[0]),
                format!("{:.0}", f64::midpoint(bounds[0], bounds[1])),
                format!("{:.0}", bounds[1]),
            ])
    };
    let chart = Chart::new(datasets)
        .block(Block::bordered().title(figure.title.as_str()))
        .x_axis(axis(&figure.x_label, x_bounds))
        .y_axis(axis(&figure.y_label, y_bounds));

    let lines = figure
        .points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let line = Line::raw(format!(
                " {:<6} FP {:>6} FN {:>6}",
                point.label, point.x, point.y
            ));
            if figure.highlight == Some(i) {
                line.style(series_style(1).add_modifier(Modifier::BOLD))
            } else {
                line
            }
        })
        .collect::<Vec<_>>();
    let list = Paragraph::new(lines).block(Block::bordered().title("Points"));

    Widget::render(chart, chart_area, buf);
    Widget::render(list, list_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_height_keeps_three_decimals() {
        assert_eq!(bar_height(2.6667), 2667);
        assert_eq!(bar_height(0.0), 0);
        assert_eq!(bar_height(-1.0), 0);
    }
}
