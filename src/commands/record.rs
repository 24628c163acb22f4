//! Audio recording and transcription.
//!
//! Records from the microphone until the user stops the capture, then sends
//! the finalized buffer to the transcription service. Supports an external
//! stop-and-transcribe trigger via SIGUSR1.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::capture::{MicrophoneSource, Recorder};
use crate::config::MurmurConfig;
use crate::transcription::{RequestState, TranscriptionClient, TranscriptionOrchestrator};

/// What the user asked for when the capture loop ended.
enum LoopOutcome {
    Transcribe,
    Cancel,
}

/// Handles audio recording and transcription.
///
/// Press Enter (or send SIGUSR1) to stop and transcribe, Escape or q to
/// cancel and discard the capture.
pub async fn handle_record(output: Option<String>) -> Result<(), anyhow::Error> {
    tracing::info!("=== murmur recorder started ===");

    let config = MurmurConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {e}");
        anyhow!("Configuration error: {e}")
    })?;

    tracing::info!(
        "Configuration loaded: device={}, sample_rate={}Hz, endpoint={}",
        config.audio.device,
        config.audio.sample_rate,
        config.service.endpoint
    );

    let client = TranscriptionClient::new(
        &config.service.endpoint,
        Duration::from_secs(config.service.timeout_secs),
    )?;
    let orchestrator = TranscriptionOrchestrator::new(client);

    let source = MicrophoneSource::new(config.audio.device.clone(), config.audio.sample_rate);
    let mut recorder = Recorder::new(Box::new(source));

    if let Err(e) = recorder.start_recording() {
        eprintln!("Error: {e}");
        return Err(anyhow!("Failed to start recording: {e}"));
    }

    let outcome = match run_capture_loop(&recorder) {
        Ok(outcome) => outcome,
        Err(e) => {
            recorder.clear_recording();
            return Err(e);
        }
    };

    recorder.stop_recording();

    match outcome {
        LoopOutcome::Cancel => {
            recorder.clear_recording();
            orchestrator.clear();
            tracing::info!("Recording cancelled by user");
            return Ok(());
        }
        LoopOutcome::Transcribe => {}
    }

    let result = match recorder.buffer() {
        Some(buffer) if !buffer.is_empty() => {
            eprintln!("Transcribing...");
            match orchestrator.transcribe(Some(buffer)).await {
                RequestState::Succeeded(text) => {
                    super::write_transcription(&text, output)?;
                    Ok(())
                }
                RequestState::Failed(e) => {
                    tracing::error!("Transcription failed: {e}");
                    eprintln!("Error: {e}");
                    Err(anyhow!("Transcription failed: {e}"))
                }
                state => {
                    tracing::warn!("Unexpected request state after resolution: {state:?}");
                    Ok(())
                }
            }
        }
        _ => {
            eprintln!("No audio captured.");
            Ok(())
        }
    };

    recorder.clear_recording();
    tracing::info!("=== murmur recorder exited ===");
    result
}

/// Runs the interactive capture loop until the user stops it.
///
/// Key handling uses raw mode; raw mode is always disabled before returning.
fn run_capture_loop(recorder: &Recorder) -> anyhow::Result<LoopOutcome> {
    let external_trigger = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, external_trigger.clone())
        .map_err(|e| anyhow!("Failed to register signal handler: {e}"))?;

    eprintln!("Recording... press Enter to transcribe, Escape or q to cancel.");

    terminal::enable_raw_mode().map_err(|e| anyhow!("Failed to enter raw mode: {e}"))?;
    let outcome = capture_loop_inner(recorder, &external_trigger);
    terminal::disable_raw_mode().map_err(|e| anyhow!("Failed to leave raw mode: {e}"))?;

    outcome
}

fn capture_loop_inner(
    recorder: &Recorder,
    external_trigger: &AtomicBool,
) -> anyhow::Result<LoopOutcome> {
    let mut last_progress = Instant::now();

    loop {
        if external_trigger.load(Ordering::Relaxed) {
            tracing::info!("Received SIGUSR1: transcribing via external trigger");
            return Ok(LoopOutcome::Transcribe);
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => return Ok(LoopOutcome::Transcribe),
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(LoopOutcome::Cancel),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(LoopOutcome::Cancel)
                    }
                    _ => {}
                }
            }
        }

        if last_progress.elapsed() >= Duration::from_secs(2) {
            let samples = recorder.captured_len() / 2;
            let rate = recorder.sample_rate().max(1);
            tracing::debug!(
                "Recording: {:.1}s captured",
                samples as f32 / rate as f32
            );
            last_progress = Instant::now();
        }
    }
}
