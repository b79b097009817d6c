//! Schematic Layout CLI
//!
//! Render Minecraft structures into per-layer build diagrams.

use clap::{Parser, Subcommand, ValueEnum};
use schematic_layout::{
    load_asset_pack, load_structure, Axis, LayoutConfig, LegendPosition, Schematizer,
};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "schematic-layout")]
#[command(author, version, about = "Render Minecraft structures into per-layer build diagrams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every layer of a structure to PNG images
    Render {
        /// Input structure JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the sprite asset pack (ZIP or directory)
        #[arg(short, long)]
        assets: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Run name used for file names (defaults to the input file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Axis to slice the structure along
        #[arg(long, value_enum, default_value = "y")]
        axis: AxisArg,

        /// Block sprite edge length in pixels (16, 32, 64 or 128)
        #[arg(long, default_value = "64")]
        scale: u32,

        /// Grid line thickness in pixels
        #[arg(long, default_value = "2")]
        grid: u32,

        /// Margin around the grid in pixels
        #[arg(long, default_value = "50")]
        margin: u32,

        /// Where the legend goes
        #[arg(long, value_enum, default_value = "right")]
        legend: LegendArg,

        /// Write into the output directory directly instead of a
        /// subdirectory named after the run
        #[arg(long)]
        no_subdirectory: bool,

        /// Write a CSV table of block counts
        #[arg(long)]
        count_report: bool,

        /// Write a list of sprites missing from the asset pack
        #[arg(long)]
        missing_report: bool,
    },

    /// Show information about a structure file and asset pack
    Info {
        /// Input structure JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the sprite asset pack (ZIP or directory)
        #[arg(short, long)]
        assets: Option<PathBuf>,
    },

    /// Cut a new block sprite out of an existing one using a mask
    MakeTexture {
        /// Path to the asset pack directory (the new sprite is written
        /// into its blocks/ root)
        #[arg(short, long)]
        assets: PathBuf,

        /// Name of the source block sprite
        #[arg(short, long)]
        block: String,

        /// Name of the mask sprite
        #[arg(short, long)]
        mask: String,

        /// Name of the new block sprite
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
            AxisArg::Z => Axis::Z,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LegendArg {
    Left,
    Right,
    Top,
    Bottom,
}

impl From<LegendArg> for LegendPosition {
    fn from(arg: LegendArg) -> Self {
        match arg {
            LegendArg::Left => LegendPosition::Left,
            LegendArg::Right => LegendPosition::Right,
            LegendArg::Top => LegendPosition::Top,
            LegendArg::Bottom => LegendPosition::Bottom,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            assets,
            output,
            name,
            axis,
            scale,
            grid,
            margin,
            legend,
            no_subdirectory,
            count_report,
            missing_report,
        } => {
            let config = LayoutConfig {
                scale,
                grid_thickness: grid,
                margin,
                legend_position: legend.into(),
                axis: axis.into(),
                create_subdirectory: !no_subdirectory,
                write_count_report: count_report,
                write_missing_report: missing_report,
            };
            render(&input, &assets, &output, name, config)?;
        }
        Commands::Info { input, assets } => {
            show_info(&input, assets.as_deref())?;
        }
        Commands::MakeTexture {
            assets,
            block,
            mask,
            name,
        } => {
            make_texture(&assets, &block, &mask, &name)?;
        }
    }

    Ok(())
}

fn run_name(input: &Path, name: Option<String>) -> String {
    name.unwrap_or_else(|| {
        input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "structure".to_string())
    })
}

fn render(
    input: &Path,
    assets_path: &Path,
    output: &Path,
    name: Option<String>,
    config: LayoutConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading asset pack from {:?}...", assets_path);
    let pack = load_asset_pack(assets_path)?;
    println!(
        "  Found {} block sprites, {} property sprites",
        pack.block_count(),
        pack.property_count()
    );

    println!("Loading structure from {:?}...", input);
    let structure = load_structure(input)?;
    println!(
        "  {}x{}x{}, {} blocks, {} palette entries",
        structure.size.x,
        structure.size.y,
        structure.size.z,
        structure.blocks.len(),
        structure.palette.len()
    );

    let name = run_name(input, name);
    let schematizer = Schematizer::with_config(pack, config);
    let run = schematizer.schematize_with_progress(&structure, output, &name, |pct| {
        print!("\rRendering... {pct}%");
        let _ = std::io::stdout().flush();
    })?;
    println!();

    println!(
        "Wrote {} layer images to {:?}",
        run.layer_files.len(),
        run.out_dir
    );
    if !run.missing.is_empty() {
        println!("  {} sprites missing from the asset pack:", run.missing.len());
        for entry in &run.missing {
            println!("    {}", entry);
        }
    }

    Ok(())
}

fn show_info(input: &Path, assets_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let structure = load_structure(input)?;

    println!("Structure Info:");
    println!(
        "  Size: {}x{}x{}",
        structure.size.x, structure.size.y, structure.size.z
    );
    println!("  Blocks: {}", structure.blocks.len());
    println!("  Palette entries: {}", structure.palette.len());
    for state in &structure.palette {
        println!("    {}", state.display_name());
    }

    if let Some(assets_path) = assets_path {
        let pack = load_asset_pack(assets_path)?;
        println!("\nAsset Pack Info:");
        println!("  Block sprites: {}", pack.block_count());
        println!("  Property sprites: {}", pack.property_count());
        println!("  Mask sprites: {}", pack.mask_count());
        println!("  Font sprites: {}", pack.font_count());
    }

    Ok(())
}

fn make_texture(
    assets_path: &Path,
    block: &str,
    mask: &str,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !assets_path.is_dir() {
        return Err("make-texture needs a directory asset pack to write into".into());
    }

    println!("Loading asset pack from {:?}...", assets_path);
    let pack = load_asset_pack(assets_path)?;

    let Some(base) = pack.block_sprite(block) else {
        return Err(format!("no block sprite named '{}' in the pack", block).into());
    };
    let Some(mask_sprite) = pack.mask_sprite(mask) else {
        return Err(format!(
            "no mask sprite named '{}' in the pack (available: {:?})",
            mask,
            pack.mask_names()
        )
        .into());
    };

    let cut = base.masked(mask_sprite);
    let out_path = assets_path.join("blocks").join(format!("{}.png", name));
    std::fs::create_dir_all(assets_path.join("blocks"))?;
    cut.save(&out_path)?;
    println!("Wrote {:?}", out_path);

    Ok(())
}
