//! Speech synthesis commands.

use clap::Args;

use camb::{AudioFile, TranslatedTtsRequest, TtsRequest};
use camb_cli_core::format_bytes;

use super::{
    load_request, output_result, output_submitted, prepare, print_success, print_verbose,
    require_input_file, wait_and_fetch, TaskArgs,
};
use crate::Cli;

/// Synthesize speech from text.
///
/// The request file holds `text`, `voice_id`, `language` and optionally
/// `gender` (0, 1, 2 or 9) and `age`. Audio is written to
/// `<output-dir>/tts_stream_<run_id>.wav`.
#[derive(Args)]
pub struct TtsCommand {
    #[command(flatten)]
    args: TaskArgs,
}

impl TtsCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let (client, opts) = prepare(cli, &self.args.wait)?;
        let speech = client.speech();

        let task = match &self.args.task_id {
            Some(id) => speech.task(id.as_str()),
            None => {
                let req: TtsRequest = load_request(require_input_file(cli)?)?;
                print_verbose(cli, &format!("Voice: {}", req.voice_id));
                print_verbose(cli, &format!("Text length: {} chars", req.text.chars().count()));

                let task = speech.create(&req).await?;
                print_success(&format!("TTS task submitted: {}", task.id()));
                task
            }
        };

        if self.args.no_wait {
            return output_submitted(cli, task.id());
        }

        let (_, audio) = wait_and_fetch(cli, &task, &opts).await?;
        output_audio(cli, task.id(), &audio)
    }
}

/// Translate a text and synthesize the translation.
///
/// The request file holds `text`, `voice_id`, `source_language`,
/// `target_language` and optionally `formality` (1 or 2), `gender` and `age`.
#[derive(Args)]
pub struct TranslatedTtsCommand {
    #[command(flatten)]
    args: TaskArgs,
}

impl TranslatedTtsCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let (client, opts) = prepare(cli, &self.args.wait)?;
        let speech = client.translated_speech();

        let task = match &self.args.task_id {
            Some(id) => speech.task(id.as_str()),
            None => {
                let req: TranslatedTtsRequest = load_request(require_input_file(cli)?)?;
                print_verbose(
                    cli,
                    &format!("Languages: {} -> {}", req.source_language, req.target_language),
                );

                let task = speech.create(&req).await?;
                print_success(&format!("Translated TTS task submitted: {}", task.id()));
                task
            }
        };

        if self.args.no_wait {
            return output_submitted(cli, task.id());
        }

        let (_, audio) = wait_and_fetch(cli, &task, &opts).await?;
        output_audio(cli, task.id(), &audio)
    }
}

fn output_audio(cli: &Cli, task_id: &str, audio: &AudioFile) -> anyhow::Result<()> {
    print_success(&format!(
        "Audio saved to {} ({})",
        audio.path.display(),
        format_bytes(audio.bytes)
    ));

    output_result(
        cli,
        &serde_json::json!({
            "task_id": task_id,
            "run_id": audio.run_id,
            "path": audio.path,
            "bytes": audio.bytes,
        }),
    )
}
