//! Knob gauges and the derived-parameter readout

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use drift_looper::{AnalogInput, Channel, DerivedParams};

use crate::panel::Panel;

pub fn render_controls(frame: &mut Frame, area: Rect, panel: &Panel, selected: usize) {
    let block = Block::default().title(" Controls ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); AnalogInput::COUNT])
        .split(inner);

    for (i, input) in AnalogInput::ALL.iter().enumerate() {
        let value = panel.analog(*input);
        let style = if i == selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Blue)
        };
        let gauge = Gauge::default()
            .gauge_style(style)
            .ratio(value.clamp(0.0, 1.0) as f64)
            .label(format!("{:<12}{:.2}", input.label(), value));
        frame.render_widget(gauge, rows[i]);
    }
}

pub fn render_params(frame: &mut Frame, area: Rect, params: &DerivedParams) {
    let block = Block::default().title(" Derived ").borders(Borders::ALL);

    let mut lines: Vec<Line> = Channel::ALL
        .iter()
        .map(|&channel| {
            let i = channel.index();
            Line::from(vec![
                Span::styled(
                    format!("{:<6}", channel.name()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(format!(
                    "decay {:.3}  cutoff {:>7.0}Hz  q {:.2}  rate {:.4}",
                    params.decay[i], params.cutoff[i], params.resonance[i], params.rate[i]
                )),
            ])
        })
        .collect();

    let offset = params
        .read_offset
        .map_or_else(|| "-".to_string(), |samples| samples.to_string());
    lines.push(Line::from(Span::styled(
        format!("slip  {:.4}  offset {}", params.slip, offset),
        Style::default().fg(Color::White),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
