//! Transcription command.

use clap::Args;

use camb::TranscriptionRequest;

use super::{
    load_request, output_result, output_submitted, prepare, print_success, print_verbose,
    require_input_file, wait_and_fetch, TaskArgs,
};
use crate::Cli;

/// Transcribe an audio or video file.
///
/// The request file holds `language` and `media_file`, a local mp3, wav,
/// aac, flac, m4a, ogg, webm or mp4 file.
#[derive(Args)]
pub struct TranscribeCommand {
    #[command(flatten)]
    args: TaskArgs,
}

impl TranscribeCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let (client, opts) = prepare(cli, &self.args.wait)?;
        let transcription = client.transcription();

        let task = match &self.args.task_id {
            Some(id) => transcription.task(id.as_str()),
            None => {
                let req: TranscriptionRequest = load_request(require_input_file(cli)?)?;
                print_verbose(cli, &format!("Media file: {}", req.media_file.display()));

                let task = transcription.create(&req).await?;
                print_success(&format!("Transcription task submitted: {}", task.id()));
                task
            }
        };

        if self.args.no_wait {
            return output_submitted(cli, task.id());
        }

        let (_, transcript) = wait_and_fetch(cli, &task, &opts).await?;
        print_success(&format!("Transcribed {} segments", transcript.len()));

        output_result(cli, &transcript)
    }
}
