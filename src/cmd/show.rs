use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use dapc::config::Config;
use dapc::policy::factory::PolicyFactory;
use dapc::policy::union::UnionPolicy;
use dapc::types::view::AuthorizedKeys;

use super::init_config;

/// Show the effective policy built from the config file
#[derive(Args)]
pub struct ShowArgs {
    /// The config file to use, defaults to `dapc.toml` in the current directory
    #[clap(short, long)]
    pub config: Option<String>,
}

impl ShowArgs {
    pub fn run(&self) -> Result<ExitCode> {
        let cfg = init_config(self.config.as_deref())?;

        let policy = PolicyFactory::new()
            .build_policy(&cfg.policy)
            .context("build policy")?;

        for line in render(&policy, &cfg) {
            println!("{line}");
        }

        Ok(ExitCode::SUCCESS)
    }
}

/// Output lines of `show`. Authorized keys are only counted, never printed.
fn render(policy: &UnionPolicy, cfg: &Config) -> Vec<String> {
    let mut lines = vec![format!("{} {}", style("kind:").bold(), policy.kind())];

    for (field, list) in policy.lists() {
        let names = list.names();
        let names = if names.is_empty() {
            style(String::from("(empty)")).red()
        } else {
            style(names.join(", "))
        };
        lines.push(format!("{} {}", style(format!("{field}:")).bold(), names));
    }

    let mut views: Vec<_> = cfg.views.values().collect();
    views.sort_by(|a, b| a.name.cmp(&b.name));
    for view in views {
        let keys = match view.authorized_keys.as_ref() {
            Some(AuthorizedKeys::List(keys)) => format!("{} authorized keys", keys.len()),
            Some(AuthorizedKeys::Scalar(_)) => {
                style(String::from("invalid authorized_keys, must be a list"))
                    .red()
                    .to_string()
            }
            None => String::from("no authorized keys"),
        };
        lines.push(format!("{} {}: {keys}", style("view").bold(), view.name));
    }

    lines
}
