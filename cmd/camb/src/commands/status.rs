//! Task status command.

use clap::{Args, ValueEnum};

use camb::TaskStatusResponse;

use super::{create_client, get_context, output_result};
use crate::Cli;

/// Show the current status of a submitted task without waiting.
#[derive(Args)]
pub struct StatusCommand {
    /// Kind of task
    #[arg(value_enum)]
    kind: KindArg,

    /// Task id returned on submission
    task_id: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Dub,
    Tts,
    Transcribe,
    Translate,
    TranslatedTts,
}

impl StatusCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(ctx.as_ref(), None)?;
        let id = self.task_id.as_str();

        let status: TaskStatusResponse = match self.kind {
            KindArg::Dub => client.dubbing().task(id).status().await?,
            KindArg::Tts => client.speech().task(id).status().await?,
            KindArg::Transcribe => client.transcription().task(id).status().await?,
            KindArg::Translate => client.translation().task(id).status().await?,
            KindArg::TranslatedTts => client.translated_speech().task(id).status().await?,
        };

        output_result(
            cli,
            &serde_json::json!({
                "task_id": id,
                "status": status.status,
                "run_id": status.run_id,
            }),
        )
    }
}
