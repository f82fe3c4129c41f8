use std::io::Write;

use self::figure::Figure;

pub mod figure;
mod viewer;
mod widgets;

/// Destination of the charts produced by the analyzer.
pub trait RenderSink {
    fn render(&mut self, figure: &Figure) -> anyhow::Result<()>;
}

/// Shows each figure full-screen until `q` or `Esc` is pressed.
#[derive(Debug, Default)]
pub struct TuiSink;

impl RenderSink for TuiSink {
    fn render(&mut self, figure: &Figure) -> anyhow::Result<()> {
        viewer::show(figure)
    }
}

/// Prints the series of each figure as plain text.
#[derive(Debug)]
pub struct TextSink<W> {
    writer: W,
}

impl<W> TextSink<W>
where
    W: Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> RenderSink for TextSink<W>
where
    W: Write,
{
    fn render(&mut self, figure: &Figure) -> anyhow::Result<()> {
        let w = &mut self.writer;
        writeln!(w, "{}", figure.title())?;
        match figure {
            Figure::Bars(bars) => {
                let header = bars
                    .series
                    .iter()
                    .map(|name| format!("{name:>12}"))
                    .collect::<String>();
                writeln!(w, "  {:<24} {header}", bars.y_label)?;
                for group in &bars.groups {
                    let values = group
                        .values
                        .iter()
                        .map(|value| format!("{value:>12.3}"))
                        .collect::<String>();
                    writeln!(w, "  {:<24} {values}", group.label)?;
                }
            }
            Figure::Scatter(scatter) => {
                writeln!(w, "  {:<8} {:>12} {:>12}", "", scatter.x_label, scatter.y_label)?;
                for (i, point) in scatter.points.iter().enumerate() {
                    let mark = if scatter.highlight == Some(i) { " *" } else { "" };
                    writeln!(
                        w,
                        "  {:<8} {:>12} {:>12}{mark}",
                        point.label, point.x, point.y
                    )?;
                }
            }
        }
        w.flush()?;
        Ok(())
    }
}
