use augment_brief::{DescriptorModel, ModelGenerator};
use augment_cli::{AugmentConfig, AugmenterBuilder, Frame};
use clap::{Args, Parser, Subcommand};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "augment")]
#[command(about = "Replace a planar object in a sequence of images with another image")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random descriptor model and write it to disk.
    GenerateModel(GenerateModelArgs),

    /// Augment every image of a target list.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct GenerateModelArgs {
    /// Output model path.
    out: PathBuf,

    /// Template width in pixels.
    #[arg(long, default_value_t = ModelGenerator::DEFAULT_TEMPLATE_SIDE)]
    width: u32,

    /// Template height in pixels.
    #[arg(long, default_value_t = ModelGenerator::DEFAULT_TEMPLATE_SIDE)]
    height: u32,

    /// Number of orientation buckets.
    #[arg(long, default_value_t = ModelGenerator::DEFAULT_BUCKETS)]
    buckets: usize,

    /// Seed for the sampling pairs.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Image containing the planar object to replace.
    #[arg(long)]
    source: PathBuf,

    /// Image painted over the object.
    #[arg(long)]
    replacement: PathBuf,

    /// Text file with one target image path per line.
    #[arg(long)]
    targets: PathBuf,

    /// Descriptor model file.
    #[arg(long)]
    model: PathBuf,

    /// Output directory, created if missing.
    #[arg(long)]
    output: PathBuf,

    /// Pipeline configuration (.toml or .json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the source image with its keypoints circled.
    #[arg(long)]
    draw_keypoints: bool,
}

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::GenerateModel(args) => run_generate_model(&args),
        Commands::Run(args) => run_augment(&args),
    }
}

fn run_generate_model(args: &GenerateModelArgs) -> CliResult<()> {
    let model = ModelGenerator::new(args.width, args.height, args.buckets, args.seed)?.generate()?;
    model.write(&args.out)?;
    info!(
        "Wrote {}x{} model with {} buckets to {}",
        args.width,
        args.height,
        args.buckets,
        args.out.display()
    );
    Ok(())
}

fn run_augment(args: &RunArgs) -> CliResult<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AugmentConfig::default(),
    };
    info!("{}", config.summary());

    let model = Arc::new(DescriptorModel::load(&args.model)?);
    let mut augmenter = AugmenterBuilder::from_config(model, config).build()?;

    let source = load_frame(&args.source)?;
    augmenter.set_source_image(&source)?;
    augmenter.set_replacement_image(&load_frame(&args.replacement)?)?;

    std::fs::create_dir_all(&args.output)?;

    if args.draw_keypoints {
        if let Some(description) = augmenter.source_description() {
            let path = args.output.join("source_keypoints.png");
            draw_keypoints(&source, description.keypoints()).save(&path)?;
            info!("Saved {} source keypoints to {}", description.len(), path.display());
        }
    }

    let targets = read_lines(&args.targets)?;
    for (i, target_path) in targets.iter().enumerate() {
        info!("{}", target_path.display());

        let t0 = Instant::now();
        let target = load_frame(target_path)?;
        let augmented = augmenter.execute(&target)?;

        let out_path = args.output.join(format!("{}.png", i));
        encodable(&augmented).save(&out_path)?;
        info!("Wrote {} in {:.2?}", out_path.display(), t0.elapsed());
    }

    Ok(())
}

/// Decode an image into a frame, widening unsupported layouts to 8-bit RGB
fn load_frame(path: &Path) -> CliResult<Frame> {
    let img = image::open(path).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", path.display(), e).into()
    })?;
    let img = match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgb32F(_) => img,
        other => DynamicImage::ImageRgb8(other.into_rgb8()),
    };
    Ok(Frame::try_from(img)?)
}

#[cfg(feature = "serde")]
fn load_config(path: &Path) -> CliResult<AugmentConfig> {
    Ok(AugmentConfig::load(path)?)
}

#[cfg(not(feature = "serde"))]
fn load_config(path: &Path) -> CliResult<AugmentConfig> {
    Err(format!("Cannot read {}: built without the serde feature", path.display()).into())
}

/// PNG has no float layout, so float colour frames are quantized to 8 bits
fn encodable(frame: &Frame) -> DynamicImage {
    match frame.to_dynamic() {
        float @ DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb8(float.into_rgb8()),
        other => other,
    }
}

fn read_lines(path: &Path) -> CliResult<Vec<PathBuf>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

fn draw_keypoints(source: &Frame, keypoints: &[augment_core::Point]) -> RgbImage {
    let mut output = source.to_dynamic().into_rgb8();
    for kp in keypoints {
        draw_hollow_circle_mut(&mut output, (kp.x, kp.y), 3, Rgb([255, 0, 0]));
    }
    output
}
