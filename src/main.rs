//! deskburst: fireworks over every screen of the desktop
//!
//! A show opens a borderless window on each display and runs one fireworks
//! simulation per window until its display time runs out. Escape or the
//! configured hotkey dismisses it early. With `--resident` the process stays
//! up between shows and is toggled from outside via a Unix socket.

// Accessors read only by tests
#![allow(dead_code)]

mod cli;
mod config;
mod control;
mod display;
mod error;
mod fireworks;
mod math;
mod random;
mod session;
mod util;

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use crate::cli::Cli;
use crate::config::{AppConfig, Hotkey};
use crate::control::Command;
use crate::display::{Display, InputEvent};
use crate::error::Result;
use crate::random::Rng;
use crate::session::{SessionEnd, SessionOptions};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    // RUST_LOG still wins when set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> Result<()> {
    if cli.toggle {
        return send_toggle();
    }

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(ms) = cli.duration_ms {
        config.session.display_time_ms = ms;
    }
    let hotkey = Hotkey::from_config(&config.hotkey)?;
    info!("dismiss hotkey: {}", hotkey.description());

    let options = SessionOptions {
        display_time: config.session.display_time(),
        tick_interval: config.session.tick_interval(),
        seed: cli.seed.unwrap_or_else(Rng::seed_from_time),
        windowed: cli.windowed,
    };

    let mut display = Display::init()?;
    if cli.resident {
        run_resident(&mut display, options, &hotkey, cli.seed.is_some())
    } else {
        session::run(&mut display, &options, &hotkey, &mut Vec::<Command>::new)?;
        Ok(())
    }
}

#[cfg(unix)]
fn send_toggle() -> Result<()> {
    control::Controller::send(Command::Toggle)?;
    info!("toggle sent to {}", control::Controller::socket_path());
    Ok(())
}

#[cfg(not(unix))]
fn send_toggle() -> Result<()> {
    Err(error::DeskburstError::Control(
        "remote toggle needs Unix domain sockets".to_string(),
    ))
}

#[cfg(unix)]
fn run_resident(
    display: &mut Display,
    mut options: SessionOptions,
    hotkey: &Hotkey,
    fixed_seed: bool,
) -> Result<()> {
    let controller = control::Controller::new()?;
    info!(
        "resident; send `toggle` to {} or run `deskburst --toggle`",
        control::Controller::socket_path()
    );

    let base_seed = options.seed;
    for show in 0u64.. {
        if !wait_for_toggle(display, &mut || controller.poll()) {
            break;
        }
        options.seed = if fixed_seed {
            base_seed.wrapping_add(show)
        } else {
            Rng::seed_from_time()
        };
        if session::run(display, &options, hotkey, &mut || controller.poll())? == SessionEnd::Quit {
            break;
        }
    }
    info!("resident instance exiting");
    Ok(())
}

#[cfg(not(unix))]
fn run_resident(
    _display: &mut Display,
    _options: SessionOptions,
    _hotkey: &Hotkey,
    _fixed_seed: bool,
) -> Result<()> {
    Err(error::DeskburstError::Control(
        "resident mode needs Unix domain sockets".to_string(),
    ))
}

/// Idle between shows. Returns false when the process should exit.
#[cfg(unix)]
fn wait_for_toggle(display: &mut Display, remote: &mut dyn FnMut() -> Vec<Command>) -> bool {
    loop {
        if display
            .poll_events()
            .iter()
            .any(|e| matches!(e, InputEvent::Quit))
        {
            return false;
        }
        for cmd in remote() {
            match cmd {
                Command::Toggle => return true,
                Command::Quit => return false,
            }
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }
}
