mod api;
mod cli;
mod client;
mod commands;
mod config;
mod console;
mod dto;
mod poller;
mod transcript;

use clap::Parser;
use log::{debug, error};

use cli::Cli;
use client::HttpSpeechApi;
use commands::Session;
use config::ApiConfig;
use console::StdConsole;
use poller::ExitSignal;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = ApiConfig::from_env().with_overrides(cli.key, cli.region, cli.endpoint);
    debug!("Using API at {}", config.base_url());

    let api = match HttpSpeechApi::new(&config) {
        Ok(api) => api,
        Err(e) => {
            error!("Failed to initialize client: {e}");
            eprintln!("{e}");
            std::process::exit(ExitSignal::Failure.code());
        }
    };

    let mut console = StdConsole;
    let mut session = Session::new(&api, &mut console);

    let signal = match commands::run(cli.command, &mut session) {
        Ok(signal) => signal,
        Err(e) => {
            eprintln!("{e:#}");
            ExitSignal::Failure
        }
    };
    std::process::exit(signal.code());
}
