//! Stereo output scope
//!
//! Left and right are drawn as two traces on one chart, so slip and detune
//! show up as the traces sliding apart.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition},
    Frame,
};

fn trace(samples: &[f32]) -> Vec<(f64, f64)> {
    let len = samples.len().max(1) as f64;
    samples
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / len, sample.clamp(-1.0, 1.0) as f64))
        .collect()
}

pub fn render_waveform(frame: &mut Frame, area: Rect, left: &[f32], right: &[f32]) {
    let block = Block::default().title(" Output ").borders(Borders::ALL);

    let left_points = trace(left);
    let right_points = trace(right);

    let datasets = vec![
        Dataset::default()
            .name("L")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&left_points),
        Dataset::default()
            .name("R")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&right_points),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopRight))
        .x_axis(Axis::default().bounds([0.0, 1.0]))
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels([Span::raw("-1"), Span::raw("0"), Span::raw("1")])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
