use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "msftool")]
#[command(about = "A tool to unpack/pack Max Payne Mobile's MSF files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Pack a directory with .MP3 files to .MSF
    Pack {
        /// Path to the directory to pack
        path: PathBuf,

        /// Output file name
        #[arg(short, long, default_value = "MaxPayneSoundsv2.msf", value_name = "file")]
        output: PathBuf,
    },

    /// Unpack a .MSF file to a directory
    Unpack {
        /// Path to the .MSF file to unpack
        path: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "mpm_sounds", value_name = "dir")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Pack { path, output } => msftool::pack(&path, &output)
            .with_context(|| format!("failed to pack '{}'", path.display())),
        Cmd::Unpack { path, output } => msftool::unpack(&path, &output)
            .with_context(|| format!("failed to unpack '{}'", path.display())),
    }
}
