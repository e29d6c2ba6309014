//! Configuration management commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use camb_cli_core::config::{mask_api_key, Config, Context as CliContext};

use super::{get_config, output_result, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Contexts hold an API key plus optional endpoint, timeout, polling and
/// output settings. Select one with `use-context` or per call with `-c`.
///
/// Configuration is stored in ~/.camb/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a new context, replacing one with the same name
    #[command(name = "add-context")]
    AddContext {
        /// Context name
        name: String,
        #[command(flatten)]
        fields: ContextFields,
    },
    /// Change settings of an existing context
    #[command(name = "set-context")]
    SetContext {
        /// Context name
        name: String,
        #[command(flatten)]
        fields: ContextFields,
    },
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Display the current context
    #[command(name = "get-context")]
    GetContext,
    /// List all contexts
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// Print the configuration with API keys masked (YAML, or JSON with --json)
    View,
}

/// Context settings given on the command line.
#[derive(Args, Debug, Clone, Default)]
struct ContextFields {
    /// API key (required for add-context)
    #[arg(long)]
    api_key: Option<String>,
    /// API base URL
    #[arg(long)]
    base_url: Option<String>,
    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    /// Seconds between status polls
    #[arg(long, value_name = "SECS")]
    polling_interval: Option<u64>,
    /// Directory for downloaded audio
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,
}

impl ContextFields {
    /// Overwrites the fields of `ctx` that were given.
    fn apply(&self, ctx: &mut CliContext) {
        if let Some(key) = &self.api_key {
            ctx.api_key = key.clone();
        }
        if let Some(url) = &self.base_url {
            ctx.base_url = url.clone();
        }
        if let Some(secs) = self.timeout {
            ctx.timeout = secs;
        }
        if let Some(secs) = self.polling_interval {
            ctx.polling_interval = secs;
        }
        if let Some(dir) = &self.output_dir {
            ctx.output_dir = dir.clone();
        }
    }

    fn is_empty(&self) -> bool {
        self.api_key.is_none()
            && self.base_url.is_none()
            && self.timeout.is_none()
            && self.polling_interval.is_none()
            && self.output_dir.is_none()
    }
}

/// Printable form of the configuration.
#[derive(Serialize)]
struct ConfigView {
    config_file: String,
    current_context: String,
    contexts: Vec<ContextView>,
}

#[derive(Serialize)]
struct ContextView {
    name: String,
    current: bool,
    api_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    polling_interval: Option<u64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    output_dir: String,
}

impl ConfigView {
    fn new(cfg: &Config) -> Self {
        let contexts = cfg
            .list_contexts()
            .into_iter()
            .filter_map(|name| cfg.get_context(name))
            .map(|ctx| ContextView {
                name: ctx.name.clone(),
                current: ctx.name == cfg.current_context,
                api_key: mask_api_key(&ctx.api_key),
                base_url: ctx.base_url.clone(),
                timeout: Some(ctx.timeout).filter(|s| *s > 0),
                polling_interval: Some(ctx.polling_interval).filter(|s| *s > 0),
                output_dir: ctx.output_dir.clone(),
            })
            .collect();

        Self {
            config_file: cfg.path().display().to_string(),
            current_context: cfg.current_context.clone(),
            contexts,
        }
    }
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mut cfg = get_config(cli)?;

        match &self.command {
            ConfigSubcommand::AddContext { name, fields } => {
                if fields.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
                    anyhow::bail!("--api-key is required when adding a context");
                }
                let mut ctx = CliContext::default();
                fields.apply(&mut ctx);
                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" added", name));
            }

            ConfigSubcommand::SetContext { name, fields } => {
                if fields.is_empty() {
                    anyhow::bail!("nothing to change, pass at least one setting");
                }
                let mut ctx = cfg
                    .get_context(name)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("context '{}' not found", name))?;
                fields.apply(&mut ctx);
                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" updated", name));
            }

            ConfigSubcommand::DeleteContext { name } => {
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
            }

            ConfigSubcommand::UseContext { name } => {
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
            }

            ConfigSubcommand::GetContext => match cfg.get_current_context() {
                Some(ctx) => println!("{}", ctx.name),
                None => println!("No current context set (falling back to CAMB_API_KEY)"),
            },

            ConfigSubcommand::ListContexts => {
                let view = ConfigView::new(&cfg);
                if view.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!("{:<8} {:<20} {:<16} {}", "CURRENT", "NAME", "API_KEY", "BASE_URL");
                for ctx in &view.contexts {
                    let base_url = if ctx.base_url.is_empty() {
                        camb::DEFAULT_BASE_URL
                    } else {
                        ctx.base_url.as_str()
                    };
                    println!(
                        "{:<8} {:<20} {:<16} {}",
                        if ctx.current { "*" } else { "" },
                        ctx.name,
                        ctx.api_key,
                        base_url
                    );
                }
            }

            ConfigSubcommand::View => output_result(cli, &ConfigView::new(&cfg))?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_apply_only_given_values() {
        let mut ctx = CliContext {
            name: "prod".to_string(),
            api_key: "old-key".to_string(),
            base_url: "https://old.example.com".to_string(),
            polling_interval: 5,
            ..Default::default()
        };

        let fields = ContextFields {
            api_key: Some("new-key".to_string()),
            output_dir: Some("audio".to_string()),
            ..Default::default()
        };
        assert!(!fields.is_empty());
        fields.apply(&mut ctx);

        assert_eq!(ctx.api_key, "new-key");
        assert_eq!(ctx.base_url, "https://old.example.com");
        assert_eq!(ctx.polling_interval, 5);
        assert_eq!(ctx.output_dir, "audio");
        assert!(ContextFields::default().is_empty());
    }

    #[test]
    fn test_view_masks_keys_and_marks_current() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut cfg = camb_cli_core::load_config(path.to_str()).unwrap();
        cfg.add_context(
            "prod",
            CliContext {
                api_key: "abcd1234efgh".to_string(),
                timeout: 60,
                ..Default::default()
            },
        )
        .unwrap();
        cfg.add_context("dev", CliContext::default()).unwrap();
        cfg.use_context("prod").unwrap();

        let view = ConfigView::new(&cfg);

        assert_eq!(view.current_context, "prod");
        let names: Vec<_> = view.contexts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["dev", "prod"]);
        let prod = &view.contexts[1];
        assert!(prod.current);
        assert_eq!(prod.api_key, "abcd****efgh");
        assert_eq!(prod.timeout, Some(60));
        assert_eq!(prod.polling_interval, None);
        assert!(!view.contexts[0].current);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("abcd1234efgh"));
    }
}
