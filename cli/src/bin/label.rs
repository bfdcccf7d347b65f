use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use labeling::{load_gray, Connectivity, LabelCommand};
use labeling_cli::{LabelBatch, LabelSettings};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Label connected components in binary images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label a single image and write a colorized result
    Label {
        /// Path to the input image
        #[arg(short, long)]
        input: PathBuf,
        /// Path of the colorized output image
        #[arg(short, long)]
        output: PathBuf,
        /// Pixels strictly above this value are foreground
        #[arg(long, default_value_t = 127)]
        threshold: u8,
        /// Neighborhood used to connect pixels (four or eight)
        #[arg(long, default_value_t = Connectivity::Four)]
        connectivity: Connectivity,
        /// Seed for reproducible random colors (fixed palette if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Drop components smaller than this many pixels
        #[arg(long)]
        min_area: Option<usize>,
        /// Treat dark pixels as foreground
        #[arg(long)]
        invert: bool,
        /// Write a JSON summary of the components to this path
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// Label every image listed in a batch configuration file
    Process {
        /// Path to the TOML or JSON configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Generate a batch configuration covering a directory of images
    GenerateSkeleton {
        /// Directory containing the source images
        #[arg(short, long)]
        input_dir: PathBuf,
        /// Output directory recorded in the configuration
        #[arg(short, long)]
        output_dir: PathBuf,
        /// Where to save the configuration (.toml or .json)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the JSON schemas of the batch configuration and label commands
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Label {
            input,
            output,
            threshold,
            connectivity,
            seed,
            min_area,
            invert,
            summary,
        } => {
            let settings = LabelSettings {
                threshold,
                connectivity,
                seed,
                invert,
                min_area,
                write_summary: summary.is_some(),
                ..LabelSettings::default()
            };
            label_image(&input, &output, summary.as_deref(), &settings)?;
        }
        Commands::Process { config } => {
            process_batch(&config)?;
        }
        Commands::GenerateSkeleton {
            input_dir,
            output_dir,
            config,
        } => {
            let batch = LabelBatch::skeleton(&input_dir, &output_dir, LabelSettings::default())?;
            batch.to_file(&config)?;
            info!("Generated configuration with {} images", batch.images.len());
            info!("Configuration saved to: {:?}", config);
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&LabelBatch::schema())?);
            println!("{}", serde_json::to_string_pretty(&LabelCommand::schema())?);
        }
    }

    Ok(())
}

fn label_image(
    input: &Path,
    output: &Path,
    summary: Option<&Path>,
    settings: &LabelSettings,
) -> Result<()> {
    let image = load_gray(input)?;
    let pipeline = settings.pipeline();
    info!("{} ({:?})", pipeline.info(), input);

    let result = pipeline.process(&image)?;
    info!("Found {} connected components", result.component_count());

    result.save_colorized(output, settings.color_source().as_ref())?;
    if let Some(summary) = summary {
        result.save_summary(summary)?;
        info!("Summary saved to: {:?}", summary);
    }
    Ok(())
}

fn process_batch(config_path: &Path) -> Result<()> {
    let batch = LabelBatch::from_file(config_path)?;
    info!("Batch: {} images -> {}", batch.images.len(), batch.output_dir);

    // Create output directory if it doesn't exist
    std::fs::create_dir_all(&batch.output_dir)?;

    if batch.images.is_empty() {
        warn!("No images listed in {:?}", config_path);
        return Ok(());
    }

    let output_dir = Path::new(&batch.output_dir);
    for entry in &batch.images {
        let stem = entry.output_stem();
        let output = output_dir.join(format!("{stem}.png"));
        let summary = batch
            .settings
            .write_summary
            .then(|| output_dir.join(format!("{stem}.json")));

        info!("Processing '{}' -> {:?}", entry.path, output);
        label_image(Path::new(&entry.path), &output, summary.as_deref(), &batch.settings)?;
    }

    info!("✅ Batch labeling completed!");
    Ok(())
}
