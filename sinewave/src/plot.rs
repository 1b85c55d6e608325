//! Terminal chart of an [Evaluation]: ground truth and prediction over the
//! same x-coordinates.

use std::io::{self, IsTerminal};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame, Terminal,
};
use tracing::warn;

use crate::eval::Evaluation;

/// RAII guard to ensure terminal state is restored even on panic.
struct TerminalCleanup;

impl Drop for TerminalCleanup {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Axis bounds covering `values`, padded by 10% so curves don't touch the
/// frame.
fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return [-1.0, 1.0];
    }
    let pad = ((hi - lo) * 0.1).max(1e-3);
    [lo - pad, hi + pad]
}

/// Draws the chart over the whole frame.
pub fn render(frame: &mut Frame, eval: &Evaluation) {
    let labels = eval.label_points();
    let predictions = eval.prediction_points();
    let [x_min, x_max] = bounds(labels.iter().map(|p| p.0));
    let [y_min, y_max] = bounds(labels.iter().chain(predictions.iter()).map(|p| p.1));

    let datasets = vec![
        Dataset::default()
            .name("label")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&labels),
        Dataset::default()
            .name("prediction")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&predictions),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" loss: {} (q to quit) ", eval.loss)),
        )
        .x_axis(
            Axis::default()
                .title("x")
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{:.2}", x_min)),
                    Span::raw(format!("{:.2}", x_max)),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.2}", y_min)),
                    Span::raw(format!("{:.2}", y_max)),
                ]),
        );

    frame.render_widget(chart, frame.area());
}

/// Shows the chart on the alternate screen until `q` or `Esc` is pressed.
///
/// Does nothing but log a warning when stdout is not a terminal.
pub fn show(eval: &Evaluation) -> anyhow::Result<()> {
    if !io::stdout().is_terminal() {
        warn!("stdout is not a terminal, skipping the plot");
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _cleanup = TerminalCleanup;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    loop {
        terminal.draw(|f| render(f, eval))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                break;
            }
        }
    }
    Ok(())
}
