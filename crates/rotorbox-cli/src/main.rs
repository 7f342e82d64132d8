//! Rotorbox CLI - generate printable enclosure parts for a brake-rotor hub

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rotorbox_design::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Largest accepted `--resolution`. The mesher still rejects grids past its
/// sample limit.
const MAX_RESOLUTION: i64 = 4096;

#[derive(Parser)]
#[command(name = "rotorbox")]
#[command(about = "Parametric enclosure for a brake-rotor hub", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every part and write its mesh
    Build {
        #[command(flatten)]
        design: DesignArgs,

        /// Cells along each part's longest axis
        #[arg(
            short,
            long,
            default_value = "300",
            value_parser = clap::value_parser!(u32).range(1..=MAX_RESOLUTION)
        )]
        resolution: u32,

        /// Directory the mesh files are written to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Mesh file format
        #[arg(short, long, value_enum, default_value = "stl")]
        format: Format,
    },

    /// Print the derived dimensions without meshing
    Dimensions {
        #[command(flatten)]
        design: DesignArgs,
    },

    /// Print the default parameters as JSON
    Params {
        /// Revision whose defaults to print
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        revision: Option<u8>,
    },
}

#[derive(clap::Args)]
struct DesignArgs {
    /// JSON parameter file; missing fields take their defaults
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Design revision, overriding the parameter file
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    revision: Option<u8>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Stl,
    Obj,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Stl => ExportFormat::Stl,
            Format::Obj => ExportFormat::Obj,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            design,
            resolution,
            out_dir,
            format,
        } => {
            run_build(&design, resolution, &out_dir, format.into())?;
        }
        Commands::Dimensions { design } => {
            let assembly = load_assembly(&design)?;
            print!("{}", assembly.dimensions());
        }
        Commands::Params { revision } => {
            let params = DesignParams::for_revision(parse_revision(revision)?.unwrap_or_default());
            println!("{}", params.to_json().context("Failed to serialize parameters")?);
        }
    }

    Ok(())
}

fn run_build(
    design: &DesignArgs,
    resolution: u32,
    out_dir: &Path,
    format: ExportFormat,
) -> Result<()> {
    let assembly = load_assembly(design)?;
    print!("{}", assembly.dimensions());

    let written = assembly
        .run(out_dir, resolution, format)
        .with_context(|| format!("Failed to build parts into {}", out_dir.display()))?;

    for part in &written {
        println!(
            "Exported {} to {} ({} triangles)",
            part.part,
            part.path.display(),
            part.triangles
        );
    }
    Ok(())
}

fn load_assembly(design: &DesignArgs) -> Result<Assembly> {
    let mut params = match &design.params {
        Some(path) => DesignParams::from_json_file(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
        None => DesignParams::default(),
    };
    if let Some(revision) = parse_revision(design.revision)? {
        params.revision = revision;
    }
    tracing::debug!(?params, "Loaded parameters");

    Assembly::new(params).context("Invalid design")
}

fn parse_revision(number: Option<u8>) -> Result<Option<Revision>> {
    number
        .map(Revision::try_from)
        .transpose()
        .context("Invalid revision")
}
