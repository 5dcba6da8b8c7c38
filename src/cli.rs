//! Command line interface

use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "deskburst", version, about = "Fireworks over every screen of your desktop")]
pub struct Cli {
    /// Settings file (hotkey and session timing)
    #[arg(short, long, value_name = "PATH", default_value = "appsettings.json")]
    pub config: PathBuf,

    /// Seed for the show; the same seed replays the same fireworks
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override how long a show lasts
    #[arg(long, value_name = "MS")]
    pub duration_ms: Option<u64>,

    /// Run in a single window instead of covering every display
    #[arg(long, value_name = "WxH", value_parser = parse_resolution)]
    pub windowed: Option<(u32, u32)>,

    /// Stay running between shows and wait for remote toggles
    #[arg(long, conflicts_with = "toggle")]
    pub resident: bool,

    /// Ask a resident instance to start or dismiss a show, then exit
    #[arg(long)]
    pub toggle: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Parse WxH format (e.g., 1920x1080)
pub fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(&['x', 'X'][..])
        .ok_or_else(|| format!("expected WxH, got {:?}", s))?;
    let width = w.trim().parse::<u32>().map_err(|e| format!("bad width {:?}: {}", w, e))?;
    let height = h.trim().parse::<u32>().map_err(|e| format!("bad height {:?}: {}", h, e))?;
    if width == 0 || height == 0 {
        return Err("resolution must be non-zero".to_string());
    }
    Ok((width, height))
}
