//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::audio::QuantizeMode;
use crate::domain::recording::Duration;

/// Voice teller - speak to a scripted bank teller
#[derive(Parser, Debug)]
#[command(name = "voice-teller")]
#[command(version)]
#[command(about = "Encode audio as 16-bit PCM WAV, transcribe it and answer as a bank teller")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode an audio file and write it as 16-bit PCM WAV
    Encode {
        /// Input audio file (wav, webm, ogg, mp3, m4a, flac)
        input: PathBuf,

        /// Output WAV path (defaults to the input name with .wav)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// How out-of-range samples are quantized
        #[arg(short = 'q', long, value_name = "MODE")]
        quantize: Option<QuantizeArg>,
    },
    /// Encode an audio file, upload it for transcription and print the reply
    Send {
        /// Input audio file
        input: PathBuf,

        /// Transcription endpoint
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// How out-of-range samples are quantized
        #[arg(short = 'q', long, value_name = "MODE")]
        quantize: Option<QuantizeArg>,
    },
    /// Record from the microphone until the duration elapses or Ctrl+C
    Record {
        /// Recording duration (e.g., 10s, 1m, 2m30s)
        #[arg(short = 'd', long, value_name = "TIME")]
        duration: Option<String>,

        /// Also save the WAV take to this path
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Only record and save, do not upload
        #[arg(long)]
        no_upload: bool,

        /// Transcription endpoint
        #[arg(long, value_name = "URL", conflicts_with = "no_upload")]
        url: Option<String>,

        /// How out-of-range samples are quantized
        #[arg(short = 'q', long, value_name = "MODE")]
        quantize: Option<QuantizeArg>,
    },
    /// Print the header of a WAV file and check its sizes
    Inspect {
        /// WAV file to inspect
        input: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Quantize mode argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QuantizeArg {
    Wrap,
    Clamp,
    Strict,
}

impl From<QuantizeArg> for QuantizeMode {
    fn from(arg: QuantizeArg) -> Self {
        match arg {
            QuantizeArg::Wrap => QuantizeMode::Wrap,
            QuantizeArg::Clamp => QuantizeMode::Clamp,
            QuantizeArg::Strict => QuantizeMode::Strict,
        }
    }
}

/// Parsed options for `encode`
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub quantize: QuantizeMode,
}

/// Parsed options for `send`
#[derive(Debug, Clone)]
pub struct SendOptions {
    pub input: PathBuf,
    pub url: String,
    pub quantize: QuantizeMode,
}

/// Parsed options for `record`
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub duration: Duration,
    pub output: Option<PathBuf>,
    pub upload: bool,
    pub url: String,
    pub quantize: QuantizeMode,
}

/// File written by `record --no-upload` when no output is given
pub const DEFAULT_RECORDING_FILE: &str = "recording.wav";

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "transcribe_url",
    "duration",
    "quantize",
    "persona.institution",
    "persona.greeting",
    "persona.balance",
    "persona.transfer",
    "persona.card",
    "persona.loan",
    "persona.hours",
    "persona.fallback",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

/// Default `encode` output: the input with a `.wav` extension, or
/// `<stem>.pcm16.wav` when the input already is a WAV file
pub fn default_encode_output(input: &std::path::Path) -> PathBuf {
    let candidate = input.with_extension("wav");
    if candidate == input {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        input.with_file_name(format!("{}.pcm16.wav", stem))
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn cli_parses_encode() {
        let cli = Cli::parse_from(["voice-teller", "encode", "in.webm", "-o", "out.wav"]);
        match cli.command {
            Commands::Encode {
                input,
                output,
                quantize,
            } => {
                assert_eq!(input, PathBuf::from("in.webm"));
                assert_eq!(output, Some(PathBuf::from("out.wav")));
                assert!(quantize.is_none());
            }
            other => panic!("Expected Encode command, got {:?}", other),
        }
    }

    #[test]
    fn cli_parses_quantize() {
        let cli = Cli::parse_from(["voice-teller", "encode", "in.mp3", "--quantize", "clamp"]);
        if let Commands::Encode { quantize, .. } = cli.command {
            assert_eq!(quantize, Some(QuantizeArg::Clamp));
        } else {
            panic!("Expected Encode command");
        }
    }

    #[test]
    fn cli_rejects_unknown_quantize() {
        assert!(Cli::try_parse_from(["voice-teller", "encode", "a.mp3", "-q", "round"]).is_err());
    }

    #[test]
    fn cli_parses_send_with_url() {
        let cli = Cli::parse_from(["voice-teller", "send", "in.ogg", "--url", "http://x/t"]);
        if let Commands::Send { url, .. } = cli.command {
            assert_eq!(url.as_deref(), Some("http://x/t"));
        } else {
            panic!("Expected Send command");
        }
    }

    #[test]
    fn cli_parses_record() {
        let cli = Cli::parse_from(["voice-teller", "record", "-d", "30s", "--no-upload"]);
        if let Commands::Record {
            duration,
            no_upload,
            output,
            ..
        } = cli.command
        {
            assert_eq!(duration, Some("30s".to_string()));
            assert!(no_upload);
            assert!(output.is_none());
        } else {
            panic!("Expected Record command");
        }
    }

    #[test]
    fn record_url_conflicts_with_no_upload() {
        assert!(Cli::try_parse_from([
            "voice-teller",
            "record",
            "--no-upload",
            "--url",
            "http://x"
        ])
        .is_err());
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["voice-teller", "config", "set", "quantize", "strict"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "quantize");
            assert_eq!(value, "strict");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["voice-teller"]).is_err());
    }

    #[test]
    fn quantize_arg_converts_to_mode() {
        assert_eq!(QuantizeMode::from(QuantizeArg::Wrap), QuantizeMode::Wrap);
        assert_eq!(QuantizeMode::from(QuantizeArg::Strict), QuantizeMode::Strict);
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("transcribe_url"));
        assert!(is_valid_config_key("persona.hours"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn encode_output_defaults() {
        assert_eq!(
            default_encode_output(Path::new("/tmp/clip.webm")),
            PathBuf::from("/tmp/clip.wav")
        );
        assert_eq!(
            default_encode_output(Path::new("/tmp/clip.wav")),
            PathBuf::from("/tmp/clip.pcm16.wav")
        );
    }

    #[test]
    fn verify_cli() {
        // Verify the CLI definition is valid
        Cli::command().debug_assert();
    }
}
