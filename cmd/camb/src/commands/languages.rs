//! Language listing commands.

use clap::{Args, Subcommand};

use super::{create_client, get_context, output_result, print_verbose};
use crate::Cli;

/// List languages supported by the API.
///
/// Language ids from these lists are used in every request's
/// `source_language`, `target_language` and `language` fields.
#[derive(Args)]
pub struct LanguagesCommand {
    #[command(subcommand)]
    command: LanguagesSubcommand,
}

#[derive(Subcommand)]
enum LanguagesSubcommand {
    /// Languages accepted as input
    Source,
    /// Languages available as output
    Target,
}

impl LanguagesCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(ctx.as_ref(), None)?;

        let languages = match self.command {
            LanguagesSubcommand::Source => client.languages().source().await?,
            LanguagesSubcommand::Target => client.languages().target().await?,
        };
        print_verbose(cli, &format!("{} languages", languages.len()));

        output_result(cli, &languages)
    }
}
