//! Voice management commands.

use clap::{Args, Subcommand};

use camb::CustomVoiceRequest;

use super::{
    create_client, get_context, load_request, output_result, print_success, print_verbose,
    require_input_file,
};
use crate::Cli;

/// Manage voices.
#[derive(Args)]
pub struct VoicesCommand {
    #[command(subcommand)]
    command: VoicesSubcommand,
}

#[derive(Subcommand)]
enum VoicesSubcommand {
    /// List available voices
    List,
    /// Create a custom voice from a WAV sample (-f request file)
    Create,
}

impl VoicesCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            VoicesSubcommand::List => self.list(cli).await,
            VoicesSubcommand::Create => self.create(cli).await,
        }
    }

    async fn list(&self, cli: &Cli) -> anyhow::Result<()> {
        let ctx = get_context(cli)?;
        let client = create_client(ctx.as_ref(), None)?;

        let voices = client.voices().list().await?;
        print_verbose(cli, &format!("{} voices", voices.len()));

        output_result(cli, &voices)
    }

    async fn create(&self, cli: &Cli) -> anyhow::Result<()> {
        let input_file = require_input_file(cli)?;
        let req: CustomVoiceRequest = load_request(input_file)?;

        print_verbose(cli, &format!("Voice name: {}", req.voice_name));
        print_verbose(cli, &format!("Sample: {}", req.file.display()));

        let ctx = get_context(cli)?;
        let client = create_client(ctx.as_ref(), None)?;
        let voice = client.voices().create_custom(&req).await?;

        print_success(&format!("Custom voice created: {}", voice.voice_id));
        output_result(cli, &voice)
    }
}
