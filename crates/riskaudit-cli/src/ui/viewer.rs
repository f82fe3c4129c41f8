use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use super::{figure::Figure, widgets::FigureView};

pub(super) fn show(figure: &Figure) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let result = run(&mut terminal, figure);
    ratatui::restore();
    result
}

fn run(terminal: &mut DefaultTerminal, figure: &Figure) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| frame.render_widget(FigureView::new(figure), frame.area()))?;
        if let Event::Key(key_event) = event::read()?
            && key_event.kind == KeyEventKind::Press
            && matches!(key_event.code, KeyCode::Char('q') | KeyCode::Esc)
        {
            return Ok(());
        }
    }
}
