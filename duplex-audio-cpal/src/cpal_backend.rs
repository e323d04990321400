//! cpal duplex backend.
//!
//! Opens a mono i16 capture stream and a mono i16 render stream with a
//! fixed block size and feeds them through the engine callbacks as
//! little-endian bytes.

use std::sync::mpsc;
use std::thread;

use cpal::traits::{DeviceTrait, StreamTrait};
use parking_lot::Mutex;

use duplex_audio_core::models::audio_models::{CallbackInfo, DeviceInfo, StreamDirection};
use duplex_audio_core::models::config::DuplexConfig;
use duplex_audio_core::models::error::DuplexError;
use duplex_audio_core::models::frame::BYTES_PER_SAMPLE;
use duplex_audio_core::traits::audio_backend::{AudioBackend, CaptureCallback, RenderCallback};

use crate::device_enumerator::DeviceEnumerator;

/// Commands sent to the stream thread.
enum StreamCommand {
    /// Pause and drop both streams, then acknowledge.
    Stop(mpsc::SyncSender<()>),
    /// Release the devices and exit.
    Close,
}

/// Duplex backend over the default cpal host.
///
/// cpal streams are not `Send` on every platform, so both streams are built
/// and owned by a dedicated thread that lives from `start` to `close`.
pub struct CpalDuplexBackend {
    capture_device: Option<String>,
    playback_device: Option<String>,
    commands: Mutex<Option<mpsc::Sender<StreamCommand>>>,
    stream_handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CpalDuplexBackend {
    /// Use the devices named in the engine config, or the host defaults.
    pub fn default_devices() -> Self {
        Self {
            capture_device: None,
            playback_device: None,
            commands: Mutex::new(None),
            stream_handle: Mutex::new(None),
        }
    }

    /// Pin specific devices by name, overriding the engine config.
    pub fn with_devices(capture: Option<String>, playback: Option<String>) -> Self {
        Self {
            capture_device: capture,
            playback_device: playback,
            commands: Mutex::new(None),
            stream_handle: Mutex::new(None),
        }
    }

    fn is_running(&self) -> bool {
        self.stream_handle.lock().is_some()
    }
}

impl Default for CpalDuplexBackend {
    fn default() -> Self {
        Self::default_devices()
    }
}

impl AudioBackend for CpalDuplexBackend {
    fn is_available(&self) -> bool {
        let enumerator = DeviceEnumerator::new();
        enumerator.capture_device(self.capture_device.as_deref()).is_ok()
            && enumerator.render_device(self.playback_device.as_deref()).is_ok()
    }

    fn start(
        &mut self,
        config: &DuplexConfig,
        capture: CaptureCallback,
        render: RenderCallback,
    ) -> Result<(), DuplexError> {
        if self.is_running() {
            return Err(DuplexError::InvalidState("cpal streams already running".into()));
        }

        let mut params = config.clone();
        if self.capture_device.is_some() {
            params.capture_device = self.capture_device.clone();
        }
        if self.playback_device.is_some() {
            params.playback_device = self.playback_device.clone();
        }

        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), DuplexError>>(1);
        let (command_tx, command_rx) = mpsc::channel::<StreamCommand>();

        let handle = thread::Builder::new()
            .name("duplex-audio-streams".into())
            .spawn(move || stream_thread(params, capture, render, ready_tx, command_rx))
            .map_err(|e| DuplexError::StreamFailed(format!("failed to spawn stream thread: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                *self.commands.lock() = Some(command_tx);
                *self.stream_handle.lock() = Some(handle);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(DuplexError::StreamFailed(
                    "stream thread exited during startup".into(),
                ))
            }
        }
    }

    fn stop(&mut self) -> Result<(), DuplexError> {
        let commands = self.commands.lock();
        let Some(commands) = commands.as_ref() else {
            return Ok(());
        };

        let (ack_tx, ack_rx) = mpsc::sync_channel(1);
        commands
            .send(StreamCommand::Stop(ack_tx))
            .map_err(|_| DuplexError::StreamFailed("stream thread is gone".into()))?;
        ack_rx
            .recv()
            .map_err(|_| DuplexError::StreamFailed("stream thread exited while stopping".into()))
    }

    fn close(&mut self) {
        if let Some(commands) = self.commands.lock().take() {
            let _ = commands.send(StreamCommand::Close);
        }
        if let Some(handle) = self.stream_handle.lock().take() {
            if handle.join().is_err() {
                log::error!("cpal stream thread panicked");
            }
        }
    }

    fn device_info(&self) -> Vec<DeviceInfo> {
        vec![
            DeviceInfo {
                name: self.capture_device.clone().unwrap_or_else(|| "default".into()),
                direction: StreamDirection::Capture,
                is_default: self.capture_device.is_none(),
            },
            DeviceInfo {
                name: self.playback_device.clone().unwrap_or_else(|| "default".into()),
                direction: StreamDirection::Render,
                is_default: self.playback_device.is_none(),
            },
        ]
    }
}

impl Drop for CpalDuplexBackend {
    fn drop(&mut self) {
        self.close();
    }
}

/// Owns the devices and streams for the lifetime of one start/close cycle.
///
/// Sequence:
/// 1. Resolve capture and render devices
/// 2. Build the i16 mono streams with a fixed block size
/// 3. Play capture, then render; report readiness
/// 4. On `Stop`: pause and drop both streams (cpal joins its callback
///    threads on drop), acknowledge
/// 5. On `Close` or a dropped sender: release the devices and exit
fn stream_thread(
    params: DuplexConfig,
    capture: CaptureCallback,
    render: RenderCallback,
    ready: mpsc::SyncSender<Result<(), DuplexError>>,
    commands: mpsc::Receiver<StreamCommand>,
) {
    let enumerator = DeviceEnumerator::new();
    let opened = open_devices(&enumerator, &params)
        .and_then(|(input, output)| {
            let streams = build_streams(&input, &output, &params, capture, render)?;
            Ok((input, output, streams))
        });

    let (input, output, streams) = match opened {
        Ok(opened) => opened,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    if let Err(e) = streams.play() {
        let _ = ready.send(Err(e));
        return;
    }
    let _ = ready.send(Ok(()));

    let mut streams = Some(streams);
    loop {
        match commands.recv() {
            Ok(StreamCommand::Stop(ack)) => {
                if let Some(streams) = streams.take() {
                    streams.halt();
                }
                let _ = ack.send(());
            }
            Ok(StreamCommand::Close) | Err(_) => break,
        }
    }

    if let Some(streams) = streams.take() {
        streams.halt();
    }
    log::debug!(
        "Releasing audio devices: capture={:?}, render={:?}",
        input.name().ok(),
        output.name().ok()
    );
}

fn open_devices(
    enumerator: &DeviceEnumerator,
    params: &DuplexConfig,
) -> Result<(cpal::Device, cpal::Device), DuplexError> {
    let input = enumerator.capture_device(params.capture_device.as_deref())?;
    let output = enumerator.render_device(params.playback_device.as_deref())?;
    log::info!(
        "Using audio devices: capture=\"{}\", render=\"{}\"",
        input.name().unwrap_or_else(|_| "unknown".into()),
        output.name().unwrap_or_else(|_| "unknown".into()),
    );
    Ok((input, output))
}

/// Mono stream config with a fixed block size.
pub(crate) fn stream_config(params: &DuplexConfig) -> cpal::StreamConfig {
    cpal::StreamConfig {
        channels: 1,
        sample_rate: cpal::SampleRate(params.sample_rate),
        buffer_size: cpal::BufferSize::Fixed(params.frames_per_buffer),
    }
}

struct DuplexStreams {
    capture: cpal::Stream,
    render: cpal::Stream,
}

impl DuplexStreams {
    fn play(&self) -> Result<(), DuplexError> {
        self.capture
            .play()
            .map_err(|e| DuplexError::StreamFailed(format!("failed to start capture stream: {}", e)))?;
        self.render
            .play()
            .map_err(|e| DuplexError::StreamFailed(format!("failed to start render stream: {}", e)))?;
        log::info!("cpal capture and render streams playing");
        Ok(())
    }

    /// Pause both streams, then drop them.
    fn halt(self) {
        if let Err(e) = self.capture.pause() {
            log::warn!("Failed to pause capture stream: {}", e);
        }
        if let Err(e) = self.render.pause() {
            log::warn!("Failed to pause render stream: {}", e);
        }
        drop(self.capture);
        drop(self.render);
        log::info!("cpal capture and render streams stopped");
    }
}

fn build_streams(
    input: &cpal::Device,
    output: &cpal::Device,
    params: &DuplexConfig,
    capture: CaptureCallback,
    render: RenderCallback,
) -> Result<DuplexStreams, DuplexError> {
    let config = stream_config(params);
    let block_bytes = params.bytes_per_buffer();

    log::debug!(
        "Building cpal streams: {} ch, {}Hz, {:?}",
        config.channels,
        config.sample_rate.0,
        config.buffer_size
    );

    let capture_stream = {
        let mut scratch: Vec<u8> = Vec::with_capacity(block_bytes);
        let mut first_instant: Option<cpal::StreamInstant> = None;
        input
            .build_input_stream(
                &config,
                move |data: &[i16], info: &cpal::InputCallbackInfo| {
                    let instant = info.timestamp().capture;
                    let origin = *first_instant.get_or_insert(instant);

                    samples_to_bytes(data, &mut scratch);
                    let block_info = CallbackInfo {
                        frame_count: data.len(),
                        timestamp_secs: instant.duration_since(&origin).map(|d| d.as_secs_f64()),
                        status_flagged: false,
                    };
                    // cpal has no per-callback stop signal; the engine always continues.
                    let _ = capture(scratch.as_slice(), &block_info);
                },
                |err| log::error!("Capture stream error: {}", err),
                None,
            )
            .map_err(|e| DuplexError::StreamFailed(format!("failed to build capture stream: {}", e)))?
    };

    let render_stream = {
        let mut scratch: Vec<u8> = vec![0; block_bytes];
        let mut first_instant: Option<cpal::StreamInstant> = None;
        output
            .build_output_stream(
                &config,
                move |data: &mut [i16], info: &cpal::OutputCallbackInfo| {
                    let instant = info.timestamp().playback;
                    let origin = *first_instant.get_or_insert(instant);

                    let needed = data.len() * BYTES_PER_SAMPLE;
                    if scratch.len() < needed {
                        scratch.resize(needed, 0);
                    }
                    let block = &mut scratch[..needed];
                    let block_info = CallbackInfo {
                        frame_count: data.len(),
                        timestamp_secs: instant.duration_since(&origin).map(|d| d.as_secs_f64()),
                        status_flagged: false,
                    };
                    let _ = render(block, &block_info);
                    bytes_to_samples(block, data);
                },
                |err| log::error!("Render stream error: {}", err),
                None,
            )
            .map_err(|e| DuplexError::StreamFailed(format!("failed to build render stream: {}", e)))?
    };

    Ok(DuplexStreams {
        capture: capture_stream,
        render: render_stream,
    })
}

/// Encode samples as little-endian bytes into `out`, reusing its allocation.
pub(crate) fn samples_to_bytes(samples: &[i16], out: &mut Vec<u8>) {
    out.clear();
    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
}

/// Decode little-endian bytes into `out`. Samples without a full byte pair
/// are zeroed.
pub(crate) fn bytes_to_samples(bytes: &[u8], out: &mut [i16]) {
    let mut pairs = bytes.chunks_exact(BYTES_PER_SAMPLE);
    for sample in out.iter_mut() {
        *sample = match pairs.next() {
            Some(pair) => i16::from_le_bytes([pair[0], pair[1]]),
            None => 0,
        };
    }
}
