//! Audio device wiring and the control thread

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{info, warn};

use drift_looper::{
    dsp::{Looper, SVFilter},
    AudioProcessor, ControlLoop, ControlSurface, DerivedParams, LooperConfig, Supervisor,
    MAX_BLOCK_SIZE,
};

use super::{panel::Panel, ui::UiApp};

/// Seconds of interleaved input the capture ring can hold.
const CAPTURE_SECONDS: f32 = 0.5;
/// Output frames kept for the scope.
const SCOPE_CAPACITY: usize = 4096;
/// Control ticks between parameter snapshots for the UI.
const SNAPSHOT_EVERY: u64 = 16;

pub struct App {
    config: LooperConfig,
    seed: u64,
}

impl App {
    pub fn new(config: LooperConfig, seed: u64) -> Self {
        Self { config, seed }
    }

    /// Open the devices, start both timing domains and hand the terminal to
    /// the UI until it quits.
    pub fn run(mut self) -> EyreResult<()> {
        let host = cpal::default_host();
        let output = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let output_config = output
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        self.config.sample_rate = output_config.sample_rate().0 as f32;
        let out_channels = output_config.channels() as usize;

        let supervisor =
            Supervisor::new(self.config, self.seed).wrap_err("invalid looper configuration")?;
        let (control, audio) = supervisor.split();

        let panel = Arc::new(Panel::new());
        let running = Arc::new(AtomicBool::new(true));

        let capacity = (self.config.sample_rate * CAPTURE_SECONDS) as usize * 2;
        let (capture_tx, capture_rx) = RingBuffer::<f32>::new(capacity);
        let (scope_tx, scope_rx) = RingBuffer::<[f32; 2]>::new(SCOPE_CAPACITY);
        let (params_tx, params_rx) = RingBuffer::<DerivedParams>::new(64);

        // Input is optional: without a capture device the looper hears silence.
        let input_stream = match host.default_input_device() {
            Some(device) => Some(build_input_stream(&device, capture_tx)?),
            None => {
                warn!("no default input device, running on silence");
                None
            }
        };

        let in_channels = input_stream.as_ref().map_or(1, |(_, channels)| *channels);
        let output_stream = build_output_stream(
            &output,
            &output_config.into(),
            OutputState::new(audio, capture_rx, in_channels, out_channels, panel.clone(), scope_tx),
            self.config.block_size,
        )?;

        if let Some((stream, _)) = &input_stream {
            stream.play().wrap_err("failed to start input stream")?;
        }
        output_stream
            .play()
            .wrap_err("failed to start output stream")?;
        info!(
            sample_rate = self.config.sample_rate,
            in_channels, out_channels, "audio running"
        );

        let control_thread = spawn_control(
            control,
            panel.clone(),
            params_tx,
            running.clone(),
            self.config.control_rate_hz,
        );

        let mut terminal = ratatui::init();
        let result = UiApp::new(panel, scope_rx, params_rx, &self.config).run(&mut terminal);
        ratatui::restore();

        running.store(false, Ordering::Relaxed);
        if control_thread.join().is_err() {
            warn!("control thread panicked");
        }
        result
    }
}

fn spawn_control(
    mut control: ControlLoop,
    panel: Arc<Panel>,
    mut params_tx: Producer<DerivedParams>,
    running: Arc<AtomicBool>,
    rate_hz: f32,
) -> thread::JoinHandle<()> {
    let period = Duration::from_secs_f32(1.0 / rate_hz);
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            let params = *control.tick(&panel.read_controls());
            if control.ticks() % SNAPSHOT_EVERY == 0 {
                // The UI only wants the latest; a full ring just skips one.
                let _ = params_tx.push(params);
            }
            thread::sleep(period);
        }
        info!(ticks = control.ticks(), "control loop stopped");
    })
}

fn build_input_stream(
    device: &cpal::Device,
    mut capture_tx: Producer<f32>,
) -> EyreResult<(cpal::Stream, usize)> {
    let config = device
        .default_input_config()
        .wrap_err("failed to fetch default input config")?;
    let channels = config.channels() as usize;

    let stream = device.build_input_stream(
        &config.into(),
        move |data: &[f32], _| {
            for &sample in data {
                if capture_tx.push(sample).is_err() {
                    break;
                }
            }
        },
        |err| warn!("input stream error: {}", err),
        None,
    )?;
    Ok((stream, channels))
}

/// Everything the output callback owns.
struct OutputState {
    audio: AudioProcessor<Looper, SVFilter>,
    capture_rx: Consumer<f32>,
    in_channels: usize,
    out_channels: usize,
    panel: Arc<Panel>,
    scope_tx: Producer<[f32; 2]>,

    in_l: Vec<f32>,
    in_r: Vec<f32>,
    out_l: Vec<f32>,
    out_r: Vec<f32>,
}

impl OutputState {
    fn new(
        audio: AudioProcessor<Looper, SVFilter>,
        capture_rx: Consumer<f32>,
        in_channels: usize,
        out_channels: usize,
        panel: Arc<Panel>,
        scope_tx: Producer<[f32; 2]>,
    ) -> Self {
        Self {
            audio,
            capture_rx,
            in_channels,
            out_channels,
            panel,
            scope_tx,
            in_l: vec![0.0; MAX_BLOCK_SIZE],
            in_r: vec![0.0; MAX_BLOCK_SIZE],
            out_l: vec![0.0; MAX_BLOCK_SIZE],
            out_r: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Pop one interleaved input frame. Mono input feeds both sides.
    fn next_input_frame(&mut self) -> (f32, f32) {
        let left = self.capture_rx.pop().unwrap_or(0.0);
        let right = if self.in_channels > 1 {
            self.capture_rx.pop().unwrap_or(0.0)
        } else {
            left
        };
        for _ in 2..self.in_channels {
            let _ = self.capture_rx.pop();
        }
        (left, right)
    }

    fn render(&mut self, data: &mut [f32], block_size: usize) {
        let channels = self.out_channels;
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(block_size);

            for i in 0..frames {
                let (left, right) = self.next_input_frame();
                self.in_l[i] = left;
                self.in_r[i] = right;
            }

            let controls = self.panel.read_controls();
            let status = self.audio.process_block(
                &controls,
                [&self.in_l[..frames], &self.in_r[..frames]],
                [&mut self.out_l[..frames], &mut self.out_r[..frames]],
            );
            self.panel.write_status(status.status_volts);

            let offset = frames_written * channels;
            for i in 0..frames {
                let frame = &mut data[offset + i * channels..offset + (i + 1) * channels];
                for (ch, sample) in frame.iter_mut().enumerate() {
                    *sample = if ch % 2 == 0 { self.out_l[i] } else { self.out_r[i] };
                }
                let _ = self.scope_tx.push([self.out_l[i], self.out_r[i]]);
            }

            frames_written += frames;
        }
    }
}

fn build_output_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut state: OutputState,
    block_size: usize,
) -> EyreResult<cpal::Stream> {
    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _| state.render(data, block_size),
        |err| warn!("output stream error: {}", err),
        None,
    )?;
    Ok(stream)
}
