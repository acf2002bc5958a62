//! App runners for the encode, send, record and inspect commands

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration as StdDuration;

use crate::application::ports::ConfigStore;
use crate::application::{
    AudioSource, CaptureSession, ConverseCallbacks, ConverseInput, ConverseUseCase, WavConverter,
};
use crate::domain::audio::{QuantizeMode, WavHeader, BITS_PER_SAMPLE};
use crate::domain::config::{AppConfig, PersonaConfig};
use crate::domain::error::{DurationParseError, InvalidQuantizeModeError};
use crate::domain::recording::Duration;
use crate::domain::transcription::{AudioData, AudioMimeType};
use crate::infrastructure::{
    create_capture, HttpTranscriber, ScriptedResponder, SymphoniaDecoder, XdgConfigStore,
};

use super::args::{EncodeOptions, RecordOptions, SendOptions, DEFAULT_RECORDING_FILE};
use super::presenter::Presenter;
use super::signals::{ShutdownSignal, StopReason};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the transcription endpoint
pub const ENV_TRANSCRIBE_URL: &str = "VOICE_TELLER_TRANSCRIBE_URL";

/// How often the recording progress is redrawn
const PROGRESS_INTERVAL: StdDuration = StdDuration::from_millis(100);

/// Decode a file and write it back as 16-bit PCM WAV
pub async fn run_encode(options: EncodeOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let audio = match read_audio_file(&options.input).await {
        Ok(audio) => audio,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.start_spinner(&format!("Encoding {}...", options.input.display()));

    let converter = WavConverter::new(SymphoniaDecoder::new(), options.quantize);
    let wav = match converter.convert(AudioSource::Compressed(audio)).await {
        Ok(wav) => wav,
        Err(e) => {
            presenter.spinner_fail("Encoding failed");
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = write_wav(&options.output, &wav).await {
        presenter.spinner_fail("Write failed");
        presenter.error(&e);
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.spinner_success(&format!(
        "Wrote {} ({})",
        options.output.display(),
        wav.human_readable_size()
    ));
    presenter.output(&options.output.to_string_lossy());

    ExitCode::from(EXIT_SUCCESS)
}

/// Encode a file, upload it and print the teller's reply
pub async fn run_send(options: SendOptions, persona: PersonaConfig) -> ExitCode {
    let presenter = Presenter::new();

    let audio = match read_audio_file(&options.input).await {
        Ok(audio) => audio,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let input = ConverseInput::Source(AudioSource::Compressed(audio));
    converse(presenter, input, &options.url, options.quantize, &persona).await
}

/// Record from the microphone, then save and/or upload the take
pub async fn run_record(options: RecordOptions, persona: PersonaConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    let session = CaptureSession::new(create_capture(), options.quantize);
    if let Err(e) = session.start().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.start_spinner("Recording... (Ctrl+C to stop)");
    let total_ms = options.duration.as_millis();
    let reason = shutdown
        .wait_for_stop(options.duration.as_std(), PROGRESS_INTERVAL, |elapsed| {
            presenter.update_recording_progress(elapsed.as_millis() as u64, total_ms);
        })
        .await;

    if reason == StopReason::Interrupted {
        log::info!("recording stopped by Ctrl+C after {} ms", session.elapsed_ms());
    }

    presenter.update_spinner("Encoding...");
    let wav = match session.stop().await {
        Ok(wav) => wav,
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };
    presenter.spinner_success(&format!("Recorded {}", wav.human_readable_size()));

    let output = match (&options.output, options.upload) {
        (Some(path), _) => Some(path.clone()),
        (None, false) => Some(DEFAULT_RECORDING_FILE.into()),
        (None, true) => None,
    };
    if let Some(path) = output {
        if let Err(e) = write_wav(&path, &wav).await {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
        presenter.info(&format!("Saved {}", path.display()));
    }

    if !options.upload {
        return ExitCode::from(EXIT_SUCCESS);
    }

    let take = match session.begin_upload().await {
        Ok(take) => take,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let code = converse(
        presenter,
        ConverseInput::Wav(take),
        &options.url,
        options.quantize,
        &persona,
    )
    .await;

    if let Err(e) = session.complete_upload().await {
        log::warn!("failed to reset session after upload: {}", e);
    }

    code
}

/// Print a WAV header and check its size fields against the file
pub async fn run_inspect(path: &Path) -> ExitCode {
    let presenter = Presenter::new();

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            presenter.error(&format!("Failed to read {}: {}", path.display(), e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let header = match WavHeader::parse(&bytes) {
        Ok(header) => header,
        Err(e) => {
            presenter.error(&format!("Not a 16-bit PCM WAV file: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let frames = header.frame_count();
    let duration_ms = if header.sample_rate > 0 {
        u64::from(frames) * 1000 / u64::from(header.sample_rate)
    } else {
        0
    };

    presenter.key_value("channels", &header.channels.to_string());
    presenter.key_value("sample_rate", &header.sample_rate.to_string());
    presenter.key_value("byte_rate", &header.byte_rate.to_string());
    presenter.key_value("block_align", &header.block_align.to_string());
    presenter.key_value("bits_per_sample", &BITS_PER_SAMPLE.to_string());
    presenter.key_value("data_size", &header.data_len.to_string());
    presenter.key_value("frames", &frames.to_string());
    presenter.key_value("duration_ms", &duration_ms.to_string());

    let problems = header.size_mismatches(bytes.len());
    if problems.is_empty() {
        presenter.success("Header is consistent with the file size");
        ExitCode::from(EXIT_SUCCESS)
    } else {
        for problem in &problems {
            presenter.warn(problem);
        }
        ExitCode::from(EXIT_ERROR)
    }
}

/// Upload a take, print the transcript and the persona's answer
async fn converse(
    mut presenter: Presenter,
    input: ConverseInput,
    url: &str,
    quantize: QuantizeMode,
    persona: &PersonaConfig,
) -> ExitCode {
    let use_case = ConverseUseCase::new(
        WavConverter::new(SymphoniaDecoder::new(), quantize),
        HttpTranscriber::new(url),
        ScriptedResponder::from_config(persona),
    );

    presenter.start_spinner("Encoding...");
    let spinner = presenter.spinner_handle();
    let on_encoded = spinner.clone();
    let on_transcribed = spinner;

    let callbacks = ConverseCallbacks {
        on_encoded: Some(Box::new(move |size: &str| {
            if let Some(ref s) = on_encoded {
                s.set_message(format!("Uploading {}...", size));
            }
        })),
        on_uploading_start: None,
        on_transcribed: Some(Box::new(move |_: &str| {
            if let Some(ref s) = on_transcribed {
                s.set_message("Answering...");
            }
        })),
    };

    match use_case.execute(input, callbacks).await {
        Ok(output) => {
            presenter.spinner_success(&format!("Transcribed ({})", output.audio_size));
            presenter.conversation(&output.transcript, &output.reply);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail("Request failed");
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Read an input file, guessing its type from the extension
async fn read_audio_file(path: &Path) -> Result<AudioData, String> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let mime_type = AudioMimeType::from_path(path).unwrap_or_default();
    log::debug!("read {} ({} bytes, {})", path.display(), data.len(), mime_type);

    Ok(AudioData::new(data, mime_type))
}

async fn write_wav(path: &Path, wav: &AudioData) -> Result<(), String> {
    tokio::fs::write(path, wav.data())
        .await
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Parse the merged duration setting
pub fn resolve_duration(config: &AppConfig) -> Result<Duration, DurationParseError> {
    match config.duration.as_deref() {
        Some(s) => s.parse(),
        None => Ok(Duration::default_duration()),
    }
}

/// Parse the merged quantize setting
pub fn resolve_quantize(config: &AppConfig) -> Result<QuantizeMode, InvalidQuantizeModeError> {
    match config.quantize.as_deref() {
        Some(s) => s.parse(),
        None => Ok(QuantizeMode::default()),
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        log::warn!("ignoring config file: {}", e);
        AppConfig::empty()
    });

    // Build env config
    let env_config = AppConfig {
        transcribe_url: env::var(ENV_TRANSCRIBE_URL).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_defaults_when_unset() {
        let config = AppConfig::empty();
        assert_eq!(resolve_duration(&config).unwrap().as_secs(), 10);
        assert_eq!(resolve_quantize(&config).unwrap(), QuantizeMode::Wrap);
    }

    #[test]
    fn resolve_rejects_invalid_values() {
        let config = AppConfig {
            duration: Some("soon".to_string()),
            quantize: Some("round".to_string()),
            ..Default::default()
        };
        assert!(resolve_duration(&config).is_err());
        assert!(resolve_quantize(&config).is_err());
    }

    #[tokio::test]
    async fn read_audio_file_guesses_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp3");
        tokio::fs::write(&path, [1u8, 2, 3]).await.unwrap();

        let audio = read_audio_file(&path).await.unwrap();
        assert_eq!(audio.mime_type(), AudioMimeType::Mp3);
        assert_eq!(audio.size_bytes(), 3);
    }

    #[tokio::test]
    async fn read_audio_file_missing() {
        let err = read_audio_file(Path::new("/definitely/not/here.wav"))
            .await
            .unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}
