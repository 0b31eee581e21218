mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use keybed::{Key, KeyClass, KeyShape, KeyboardConfig, KeyboardLayout, NoteSink, Point};
use keybed_midi::{MidiNoteSink, MidiOutputManager, MidiSettings};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::script::PrintSink;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Layout(args) => execute_layout(args),
        Commands::Ports => execute_ports(),
        Commands::Play(args) => execute_play(args),
    }
}

#[derive(Parser)]
#[command(author, version, about = "Inspect and play an on-screen piano keyboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every key's outline, class and pitch as JSON.
    Layout(LayoutArgs),
    /// List available MIDI output ports.
    Ports,
    /// Replay a pointer gesture script against the keyboard.
    Play(PlayArgs),
}

#[derive(Args)]
struct KeyboardArgs {
    /// Settings file to read instead of the one in the user config directory.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Override the number of octaves.
    #[arg(long)]
    octaves: Option<i32>,
    /// Override the pitch of the leftmost key.
    #[arg(long)]
    start_pitch: Option<i32>,
}

impl KeyboardArgs {
    fn load_settings(&self) -> Result<MidiSettings> {
        let mut settings = match &self.settings {
            Some(path) => MidiSettings::load_from(path)?,
            None => MidiSettings::load(),
        };
        if let Some(octaves) = self.octaves {
            settings.keyboard = settings.keyboard.with_octaves(octaves);
        }
        if let Some(start_pitch) = self.start_pitch {
            settings.keyboard = settings.keyboard.with_start_pitch(start_pitch);
        }
        Ok(settings)
    }
}

#[derive(Args)]
struct LayoutArgs {
    #[command(flatten)]
    keyboard: KeyboardArgs,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct PlayArgs {
    #[command(flatten)]
    keyboard: KeyboardArgs,
    /// JSON array of pointer events, e.g. `[{"press": {"x": 0, "y": 1}}]`.
    #[arg(long)]
    script: PathBuf,
    /// Output port index; defaults to the port named in the settings file.
    #[arg(long, conflicts_with = "dry_run")]
    port: Option<usize>,
    /// Print note commands instead of sending them.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Serialize)]
struct KeyRecord<'a> {
    pitch: u8,
    name: String,
    class: KeyClass,
    shape: KeyShape,
    vertices: &'a [Point],
}

impl<'a> From<&'a Key> for KeyRecord<'a> {
    fn from(key: &'a Key) -> Self {
        Self {
            pitch: key.pitch(),
            name: key.note_name(),
            class: key.class(),
            shape: key.shape(),
            vertices: key.boundary().vertices(),
        }
    }
}

fn build_keyboard(config: &KeyboardConfig) -> Result<keybed::Keyboard> {
    KeyboardLayout::build(config).context("invalid keyboard configuration")
}

fn execute_layout(args: LayoutArgs) -> Result<()> {
    let settings = args.keyboard.load_settings()?;
    let keyboard = build_keyboard(&settings.keyboard)?;
    let records: Vec<KeyRecord> = keyboard.keys().iter().map(KeyRecord::from).collect();
    let json = if args.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{json}");
    Ok(())
}

fn execute_ports() -> Result<()> {
    let ports = MidiOutputManager::new()
        .enumerate()
        .context("failed to list MIDI outputs")?;
    if ports.is_empty() {
        println!("No MIDI output ports detected.");
    } else {
        println!("Available MIDI outputs:");
        for (index, port) in ports.iter().enumerate() {
            println!("  {index}: {port}");
        }
    }
    Ok(())
}

fn execute_play(args: PlayArgs) -> Result<()> {
    let settings = args.keyboard.load_settings()?;
    let keyboard = build_keyboard(&settings.keyboard)?;
    let events = script::load(&args.script)?;

    let sink: Box<dyn NoteSink> = if args.dry_run {
        Box::new(PrintSink::stdout())
    } else {
        let manager = MidiOutputManager::new();
        let handle = match (args.port, settings.port.as_deref()) {
            (Some(index), _) => manager.open_port(index),
            (None, Some(name)) => manager.open_named(name),
            (None, None) => manager.open_port(0),
        }
        .context("failed to open MIDI output")?;
        info!(port = handle.name(), "sending to MIDI output");
        Box::new(
            MidiNoteSink::new(handle)
                .with_channel(settings.channel_index())
                .with_velocity(settings.velocity),
        )
    };

    script::run(&keyboard, &events, sink);
    Ok(())
}
