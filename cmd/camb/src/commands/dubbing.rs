//! End-to-end dubbing command.

use clap::Args;

use camb::DubbingRequest;

use super::{
    load_request, output_result, output_submitted, prepare, print_success, print_verbose,
    require_input_file, wait_and_fetch, TaskArgs,
};
use crate::Cli;

/// Dub a video end to end.
///
/// The request file holds `video_url`, `target_language` and optionally
/// `source_language` (default 1, English).
#[derive(Args)]
pub struct DubCommand {
    #[command(flatten)]
    args: TaskArgs,
}

impl DubCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let (client, opts) = prepare(cli, &self.args.wait)?;
        let dubbing = client.dubbing();

        let task = match &self.args.task_id {
            Some(id) => dubbing.task(id.as_str()),
            None => {
                let req: DubbingRequest = load_request(require_input_file(cli)?)?;
                print_verbose(cli, &format!("Video: {}", req.video_url));
                print_verbose(
                    cli,
                    &format!("Languages: {} -> {}", req.source_language, req.target_language),
                );

                let task = dubbing.create(&req).await?;
                print_success(&format!("Dubbing task submitted: {}", task.id()));
                task
            }
        };

        if self.args.no_wait {
            return output_submitted(cli, task.id());
        }

        let (run_id, info) = wait_and_fetch(cli, &task, &opts).await?;
        print_success("Dubbing finished");

        output_result(
            cli,
            &serde_json::json!({
                "task_id": task.id(),
                "run_id": run_id,
                "video_url": info.video_url,
                "audio_url": info.audio_url,
            }),
        )
    }
}
