use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use twain::batch::runner::DEFAULT_BATCH_COUNT;
use twain::encode::ffmpeg::is_ffmpeg_on_path;
use twain::prompts::PromptCatalog;
use twain::{
    BackgroundPool, BatchOutcome, BatchRunner, CardRenderer, DirBatchIds, GcsUploader,
    OpenAiClient, RenderConfig, TwainConfig, VideoAssembler,
};

#[derive(Parser, Debug)]
#[command(name = "twain", version, about = "Generate daily relationship-question reels")]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate new batches (the default when no command is given).
    Run(RunArgs),
    /// Re-encode `daily_video.mp4` from the card images in a batch folder.
    Assemble(AssembleArgs),
    /// Pre-populate the intro background pool.
    Backgrounds(BackgroundsArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Number of batches to generate.
    #[arg(long, default_value_t = DEFAULT_BATCH_COUNT)]
    count: usize,

    /// Skip uploading finished batches.
    #[arg(long, default_value_t = false)]
    no_upload: bool,

    /// Card style JSON (fields not given keep their defaults).
    #[arg(long)]
    style: Option<PathBuf>,

    /// Output directory for batch folders (overrides TWAIN_QUEUE_DIR).
    #[arg(long)]
    queue_dir: Option<PathBuf>,

    /// Seed for theme, hook and background choices.
    #[arg(long)]
    seed: Option<u64>,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            count: DEFAULT_BATCH_COUNT,
            no_upload: false,
            style: None,
            queue_dir: None,
            seed: None,
        }
    }
}

#[derive(Parser, Debug)]
struct AssembleArgs {
    /// Batch folder containing `question_{0..6}.jpg`.
    dir: PathBuf,
}

#[derive(Parser, Debug)]
struct BackgroundsArgs {
    /// Target pool size.
    #[arg(long, default_value_t = twain::assets::backgrounds::DEFAULT_POOL_TARGET)]
    count: usize,

    /// Card style JSON; only the canvas size is used.
    #[arg(long)]
    style: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let cfg = TwainConfig::from_env()?;
    match cli.cmd.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(args) => cmd_run(args, &cfg),
        Command::Assemble(args) => cmd_assemble(args),
        Command::Backgrounds(args) => cmd_backgrounds(args, &cfg),
    }
}

fn load_style(path: Option<&Path>, cfg: &TwainConfig) -> anyhow::Result<RenderConfig> {
    let mut style = match path {
        Some(p) => RenderConfig::from_json_path(p)
            .with_context(|| format!("load style '{}'", p.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(font) = &cfg.font_path {
        style.font_path = font.clone();
    }
    Ok(style)
}

fn cmd_run(args: RunArgs, cfg: &TwainConfig) -> anyhow::Result<()> {
    let style = load_style(args.style.as_deref(), cfg)?;
    let queue_dir = args.queue_dir.clone().unwrap_or_else(|| cfg.queue_dir.clone());

    // Environment problems surface before any batch id is consumed.
    if !is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg is required for MP4 encoding, but was not found on PATH");
    }
    let renderer = CardRenderer::new(style.clone())
        .with_context(|| format!("load font '{}'", style.font_path.display()))?;
    let client = OpenAiClient::new(cfg.openai()?)?;
    let uploader = if args.no_upload {
        None
    } else {
        let (bucket, token) = cfg.gcs_credentials()?;
        Some(GcsUploader::new(bucket, token, cfg.provider_timeout)?)
    };
    let catalog = match &cfg.prompts_path {
        Some(p) => PromptCatalog::from_json_path(p)
            .with_context(|| format!("load prompt catalog '{}'", p.display()))?,
        None => PromptCatalog::builtin()?,
    };

    let pool = BackgroundPool::new(&cfg.background_dir, style.canvas, &client);
    let mut runner = BatchRunner::new(&queue_dir, &client, catalog, renderer, pool);
    if let Some(up) = &uploader {
        runner = runner.with_uploader(up);
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut ids = DirBatchIds::scan(&queue_dir)
        .with_context(|| format!("scan queue dir '{}'", queue_dir.display()))?;
    let report = runner.run(args.count, &mut ids, &mut rng)?;

    for batch in &report.batches {
        match batch {
            BatchOutcome::Completed { id, dir, .. } => {
                eprintln!("[{id}] wrote {}", dir.display());
            }
            BatchOutcome::Skipped { id, reason, .. } => {
                eprintln!("[{id}] skipped: {reason}");
            }
        }
    }
    eprintln!(
        "{} completed, {} skipped, {} upload failures",
        report.completed(),
        report.skipped(),
        report.upload_failures()
    );
    Ok(())
}

fn cmd_assemble(args: AssembleArgs) -> anyhow::Result<()> {
    if !args.dir.is_dir() {
        anyhow::bail!("'{}' is not a directory", args.dir.display());
    }
    match VideoAssembler::default().assemble_folder(&args.dir)? {
        Some(stats) => eprintln!(
            "wrote {} ({} images, {} frames, {:.1}s)",
            args.dir.join(twain::video::assembler::VIDEO_FILE_NAME).display(),
            stats.images,
            stats.frames,
            stats.duration_secs
        ),
        None => eprintln!("no card images in {}", args.dir.display()),
    }
    Ok(())
}

fn cmd_backgrounds(args: BackgroundsArgs, cfg: &TwainConfig) -> anyhow::Result<()> {
    let style = load_style(args.style.as_deref(), cfg)?;
    let client = OpenAiClient::new(cfg.openai()?)?;
    let pool = BackgroundPool::new(&cfg.background_dir, style.canvas, &client);
    let n = pool.ensure_pool(args.count)?;
    eprintln!("{n} backgrounds in {}", pool.dir().display());
    if n < args.count {
        anyhow::bail!("background pool has {n} of {} requested images", args.count);
    }
    Ok(())
}
