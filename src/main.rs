use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use image::DynamicImage;
use jigsaw_solver::{
    render, CornerMethod, Level, MaskMethod, ProgressSink, RunContext, SolverConfig, Stage,
};

#[derive(Parser)]
#[command(name = "jigsaw", about = "Reassemble a jigsaw puzzle from photos of its pieces")]
struct Cli {
    /// Photo or folder of photos (JPEG, PNG, BMP, TIFF)
    #[arg(short, long)]
    input: PathBuf,

    /// JSON solver preset; command-line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Corner location strategy
    #[arg(long, value_enum)]
    corners: Option<CornerArg>,

    /// Foreground mask strategy
    #[arg(long, value_enum)]
    mask: Option<MaskArg>,

    /// Color distance that still counts as background (color mask only)
    #[arg(long, default_value = "60")]
    tolerance: f64,

    /// Blobs smaller than this many pixels are ignored
    #[arg(long)]
    min_piece_size: Option<u32>,

    /// Nearest-point search window, percent of the longer edge
    #[arg(long)]
    window_percent: Option<f64>,

    /// Run single-threaded (deterministic)
    #[arg(long)]
    sequential: bool,

    /// Write masks and edge overlays to this folder
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Write a PNG preview of the largest solution
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum CornerArg {
    Features,
    MaxQuad,
    Polar,
}

#[derive(Clone, Copy, ValueEnum)]
enum MaskArg {
    Color,
    Otsu,
}

/// Prints stage lines to stderr and saves diagnostic images.
struct StderrSink {
    debug_dir: Option<PathBuf>,
}

impl ProgressSink for StderrSink {
    fn message(&self, level: Level, text: &str) {
        match level {
            Level::Info => eprintln!("  {}", text),
            Level::Warning => eprintln!("  Warning     {}", text),
            Level::Error => eprintln!("  Error       {}", text),
        }
    }

    fn progress(&self, stage: Stage, percent: f32) {
        log::debug!("{} {:.0}%", stage.label(), percent);
    }

    fn image(&self, name: &str, image: &DynamicImage) {
        let Some(dir) = &self.debug_dir else {
            return;
        };
        let path = dir.join(format!("{name}.png"));
        if let Err(e) = image.save(&path) {
            log::warn!("could not save {}: {}", path.display(), e);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    if let Some(c) = cli.corners {
        config.corners = match c {
            CornerArg::Features => CornerMethod::Features,
            CornerArg::MaxQuad => CornerMethod::MaxQuad,
            CornerArg::Polar => CornerMethod::Polar,
        };
    }
    if let Some(m) = cli.mask {
        config.mask = match m {
            MaskArg::Color => MaskMethod::BackgroundColor { tolerance: cli.tolerance },
            MaskArg::Otsu => MaskMethod::Otsu,
        };
    }
    if let Some(n) = cli.min_piece_size {
        config.min_piece_size = n;
    }
    if let Some(w) = cli.window_percent {
        config.window_percent = w;
    }
    if cli.sequential {
        config.parallel = false;
    }
    if let Some(dir) = &cli.debug_dir {
        std::fs::create_dir_all(dir)?;
        config.debug_images = true;
    }

    eprintln!();
    eprintln!("  jigsaw \u{00b7} {}", cli.input.display());
    eprintln!();

    let ctx = RunContext::new(Box::new(StderrSink {
        debug_dir: cli.debug_dir.clone(),
    }));
    let puzzle = jigsaw_solver::solve(&cli.input, &config, &ctx)?;

    eprintln!();
    for (group, solution) in puzzle.assembly.solutions.iter().enumerate() {
        let grid = &solution.grid;
        eprintln!(
            "  Solution {}  {}x{} grid, {} piece(s)",
            group,
            grid.rows(),
            grid.cols(),
            grid.piece_count()
        );
        for row in 0..grid.rows() {
            let cells: Vec<String> = (0..grid.cols())
                .map(|col| match grid.get(row, col) {
                    Some(i) => format!("{:>4}/{}", puzzle.pieces[i].id, grid.rotation(row, col)),
                    None => "     -".to_string(),
                })
                .collect();
            eprintln!("    {}", cells.join(" "));
        }
    }

    if let (Some(path), Some(best)) = (&cli.output, puzzle.assembly.solutions.first()) {
        let preview = render::solution_preview(&puzzle.pieces, best, config.fill_color);
        render::write_png(&DynamicImage::ImageRgb8(preview).into_rgba8(), path)?;
        eprintln!();
        eprintln!("  \u{2713} {}", path.display());
    }
    eprintln!();

    Ok(())
}
