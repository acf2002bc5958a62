//! Voice teller CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_teller::cli::{
    app::{load_merged_config, resolve_duration, resolve_quantize, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{default_encode_output, Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    run_encode, run_inspect, run_record, run_send, EncodeOptions, RecordOptions, SendOptions,
};
use voice_teller::domain::audio::QuantizeMode;
use voice_teller::domain::config::AppConfig;
use voice_teller::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    let command = match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Commands::Inspect { input } => return run_inspect(&input).await,
        other => other,
    };

    // Build CLI config from args
    let cli_config = match &command {
        Commands::Encode { quantize, .. } => AppConfig {
            quantize: quantize.map(|q| QuantizeMode::from(q).to_string()),
            ..Default::default()
        },
        Commands::Send { url, quantize, .. } => AppConfig {
            transcribe_url: url.clone(),
            quantize: quantize.map(|q| QuantizeMode::from(q).to_string()),
            ..Default::default()
        },
        Commands::Record {
            duration,
            url,
            quantize,
            ..
        } => AppConfig {
            transcribe_url: url.clone(),
            duration: duration.clone(),
            quantize: quantize.map(|q| QuantizeMode::from(q).to_string()),
            ..Default::default()
        },
        Commands::Inspect { .. } | Commands::Config { .. } => AppConfig::empty(),
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    let quantize = match resolve_quantize(&config) {
        Ok(mode) => mode,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let url = config.transcribe_url_or_default().to_string();
    let persona = config.persona_or_default();

    match command {
        Commands::Encode { input, output, .. } => {
            let output = output.unwrap_or_else(|| default_encode_output(&input));
            run_encode(EncodeOptions {
                input,
                output,
                quantize,
            })
            .await
        }
        Commands::Send { input, .. } => {
            run_send(
                SendOptions {
                    input,
                    url,
                    quantize,
                },
                persona,
            )
            .await
        }
        Commands::Record {
            output, no_upload, ..
        } => {
            let duration = match resolve_duration(&config) {
                Ok(d) => d,
                Err(e) => {
                    presenter.error(&e.to_string());
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
            };

            run_record(
                RecordOptions {
                    duration,
                    output,
                    upload: !no_upload,
                    url,
                    quantize,
                },
                persona,
            )
            .await
        }
        Commands::Inspect { .. } | Commands::Config { .. } => ExitCode::SUCCESS,
    }
}
