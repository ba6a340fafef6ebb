//! TUI for drift-looper
//!
//! Knobs, switches and gates are driven from the keyboard; the status line,
//! derived parameters and an output scope are redrawn at ~60fps.

mod controls;
mod status;
mod waveform;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use tracing::debug;

use drift_looper::{AnalogInput, Channel, DerivedParams, LooperConfig};

use super::panel::Panel;
use controls::{render_controls, render_params};
use status::{render_status, AudioStats, StatusInfo};
use waveform::render_waveform;

/// Frames shown on the scope
const VIS_BUFFER_SIZE: usize = 1024;
/// How far one arrow press moves a knob.
const KNOB_STEP: f32 = 0.05;
/// A tap has to outlast the switch debouncer by a comfortable margin.
const TAP: Duration = Duration::from_millis(40);

pub struct UiApp {
    panel: Arc<Panel>,
    scope_rx: Consumer<[f32; 2]>,
    params_rx: Consumer<DerivedParams>,

    params: DerivedParams,
    /// Latest output frames, left and right
    scope: [Vec<f32>; 2],
    selected: usize,
    sample_rate: f32,
    clear_hold: Duration,

    /// Terminals report presses, not releases, so held inputs are timed.
    button_release_at: Option<Instant>,
    gate_release_at: [Option<Instant>; 2],
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        panel: Arc<Panel>,
        scope_rx: Consumer<[f32; 2]>,
        params_rx: Consumer<DerivedParams>,
        config: &LooperConfig,
    ) -> Self {
        Self {
            panel,
            scope_rx,
            params_rx,
            params: DerivedParams::default(),
            scope: [vec![0.0; VIS_BUFFER_SIZE], vec![0.0; VIS_BUFFER_SIZE]],
            selected: 0,
            sample_rate: config.sample_rate,
            clear_hold: Duration::from_secs_f32(config.clear_hold_ms / 1000.0),
            button_release_at: None,
            gate_release_at: [None; 2],
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_params();
            self.release_expired(Instant::now());

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Drain scope frames, keeping the last VIS_BUFFER_SIZE per side
    fn poll_audio(&mut self) {
        while let Ok([left, right]) = self.scope_rx.pop() {
            self.scope[0].push(left);
            self.scope[1].push(right);
        }
        for side in &mut self.scope {
            if side.len() > VIS_BUFFER_SIZE {
                let excess = side.len() - VIS_BUFFER_SIZE;
                side.drain(0..excess);
            }
        }
    }

    /// Keep only the latest parameter snapshot
    fn poll_params(&mut self) {
        while let Ok(params) = self.params_rx.pop() {
            self.params = params;
        }
    }

    fn release_expired(&mut self, now: Instant) {
        if self.button_release_at.is_some_and(|at| now >= at) {
            self.panel.set_button(false);
            self.button_release_at = None;
        }
        for channel in Channel::ALL {
            let slot = &mut self.gate_release_at[channel.index()];
            if slot.is_some_and(|at| now >= at) {
                self.panel.set_gate(channel, false);
                *slot = None;
            }
        }
    }

    fn press_button(&mut self, hold: Duration) {
        self.panel.set_button(true);
        self.button_release_at = Some(Instant::now() + hold);
    }

    fn pulse_gate(&mut self, channel: Channel) {
        self.panel.set_gate(channel, true);
        self.gate_release_at[channel.index()] = Some(Instant::now() + TAP);
    }

    fn handle_key(&mut self, key: KeyCode) {
        let selected = AnalogInput::ALL[self.selected];
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.selected = (self.selected + AnalogInput::COUNT - 1) % AnalogInput::COUNT;
            }
            KeyCode::Down => self.selected = (self.selected + 1) % AnalogInput::COUNT,
            KeyCode::Left => self.panel.nudge(selected, -KNOB_STEP),
            KeyCode::Right => self.panel.nudge(selected, KNOB_STEP),
            KeyCode::Char('0') => self.panel.set_analog(selected, 0.0),
            KeyCode::Char(' ') => self.press_button(TAP),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                // Hold just past the clear threshold.
                self.press_button(self.clear_hold + Duration::from_millis(100));
            }
            KeyCode::Char('1') => self.pulse_gate(Channel::Left),
            KeyCode::Char('2') => self.pulse_gate(Channel::Right),
            KeyCode::Char('t') | KeyCode::Char('T') => {
                let up = self.panel.flip_toggle();
                debug!(up, "toggle flipped");
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Min(10),    // Controls and derived params
                Constraint::Length(8),  // Waveform
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let info = StatusInfo {
            sample_rate: self.sample_rate,
            status_volts: self.panel.status_volts(),
            half_speed: self.params.half_speed,
            button: self.panel.button(),
            toggle: self.panel.toggle(),
        };
        let stats = AudioStats::from_channels(&self.scope[0], &self.scope[1]);
        render_status(frame, chunks[0], &info, &stats);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);
        render_controls(frame, middle[0], &self.panel, self.selected);
        render_params(frame, middle[1], &self.params);

        render_waveform(frame, chunks[2], &self.scope[0], &self.scope[1]);

        let help = Paragraph::new(
            " [Q] Quit  [↑↓] Select  [←→] Adjust  [0] Zero  [Space] Record  [C] Clear  [1/2] Gate  [T] Toggle",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
