//! Text translation command.

use clap::Args;

use camb::TranslationRequest;

use super::{
    load_request, output_result, output_submitted, prepare, print_success, print_verbose,
    require_input_file, wait_and_fetch, TaskArgs,
};
use crate::Cli;

/// Translate texts.
///
/// The request file holds `source_language`, `target_language`, `texts` and
/// optionally `formality`, `gender` and `age`.
#[derive(Args)]
pub struct TranslateCommand {
    #[command(flatten)]
    args: TaskArgs,
}

impl TranslateCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let (client, opts) = prepare(cli, &self.args.wait)?;
        let translation = client.translation();

        let task = match &self.args.task_id {
            Some(id) => translation.task(id.as_str()),
            None => {
                let req: TranslationRequest = load_request(require_input_file(cli)?)?;
                print_verbose(cli, &format!("Texts: {}", req.texts.len()));

                let task = translation.create(&req).await?;
                print_success(&format!("Translation task submitted: {}", task.id()));
                task
            }
        };

        if self.args.no_wait {
            return output_submitted(cli, task.id());
        }

        let (_, result) = wait_and_fetch(cli, &task, &opts).await?;
        output_result(cli, &result)
    }
}
