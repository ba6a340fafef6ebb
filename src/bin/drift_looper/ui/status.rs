//! Status bar widget - recording LED, speed, switches and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Peak and RMS per output channel
pub struct AudioStats {
    pub peak: [f32; 2],
    pub rms: [f32; 2],
}

fn peak_rms(buffer: &[f32]) -> (f32, f32) {
    if buffer.is_empty() {
        return (0.0, 0.0);
    }
    let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
    (peak, rms)
}

impl AudioStats {
    pub fn from_channels(left: &[f32], right: &[f32]) -> Self {
        let (peak_l, rms_l) = peak_rms(left);
        let (peak_r, rms_r) = peak_rms(right);
        Self {
            peak: [peak_l, peak_r],
            rms: [rms_l, rms_r],
        }
    }
}

pub struct StatusInfo {
    pub sample_rate: f32,
    pub status_volts: f32,
    pub half_speed: bool,
    pub button: bool,
    pub toggle: bool,
}

/// LED colour for the status voltage: off, one channel, both channels.
fn led_color(volts: f32) -> Color {
    if volts >= 4.5 {
        Color::Red
    } else if volts > 0.0 {
        Color::LightRed
    } else {
        Color::DarkGray
    }
}

pub fn render_status(frame: &mut Frame, area: Rect, info: &StatusInfo, audio_stats: &AudioStats) {
    let block = Block::default().title(" drift-looper ").borders(Borders::ALL);

    let speed = if info.half_speed { "½ speed" } else { "1× speed" };
    let line = Line::from(vec![
        Span::styled(
            format!(" ● {:.1}V  ", info.status_volts),
            Style::default().fg(led_color(info.status_volts)),
        ),
        Span::styled(
            format!("{}  ", speed),
            Style::default().fg(if info.half_speed {
                Color::Yellow
            } else {
                Color::Green
            }),
        ),
        Span::styled(
            format!(
                "button {}  toggle {}  ",
                if info.button { "down" } else { "up" },
                if info.toggle { "up" } else { "down" }
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:.1}kHz  ", info.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "Peak L/R: {:.2}/{:.2}  RMS L/R: {:.2}/{:.2}",
                audio_stats.peak[0], audio_stats.peak[1], audio_stats.rms[0], audio_stats.rms[1]
            ),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
