use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dapc::config::{CommonConfig, Config};
use dapc::logs;
use log::warn;

mod check;
mod show;

pub const DEFAULT_CONFIG_PATH: &str = "dapc.toml";

#[derive(Parser)]
#[command(author, version, about)]
pub struct App {
    #[command(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Check(check::CheckArgs),
    Show(show::ShowArgs),
}

impl App {
    pub fn run(&self) -> Result<ExitCode> {
        match &self.commands {
            Commands::Check(args) => args.run(),
            Commands::Show(args) => args.run(),
        }
    }
}

/// Reads the config file and returns whether it was found.
///
/// A path given on the command line must exist. Without one,
/// [`DEFAULT_CONFIG_PATH`] is tried and a missing file yields the defaults,
/// where every list denies.
fn read_config(path: Option<&str>) -> Result<(Config, bool)> {
    match path {
        Some(path) => {
            let cfg = Config::load(path).context("load config")?;
            Ok((cfg, true))
        }
        None => match Config::read(Path::new(DEFAULT_CONFIG_PATH)).context("load config")? {
            Some(cfg) => Ok((cfg, true)),
            None => Ok((<Config as CommonConfig>::default(), false)),
        },
    }
}

/// Loads the config and installs the logger it asks for.
fn init_config(path: Option<&str>) -> Result<Config> {
    let (cfg, found) = read_config(path)?;
    logs::init(&cfg.logs)?;
    if !found {
        warn!("Config file '{DEFAULT_CONFIG_PATH}' not found, every permission list denies");
    }
    Ok(cfg)
}
