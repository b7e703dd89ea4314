use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "symbol-swap", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset of substitution tasks.
    Generate(GenerateArgs),
    /// Render the initial or final still of a single task as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Number of tasks to generate (overrides the config).
    #[arg(long)]
    num_samples: Option<u32>,

    /// Generator config JSON; unspecified fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output root directory (overrides the config).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Base random seed (overrides the config).
    #[arg(long)]
    seed: Option<u64>,

    /// Skip animation frames and MP4 encoding.
    #[arg(long, default_value_t = false)]
    no_videos: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Prompt template family.
    #[arg(long, value_enum, default_value_t = PromptChoice::Default)]
    prompt_style: PromptChoice,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Generator config JSON; unspecified fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Task seed.
    #[arg(long)]
    seed: u64,

    /// Which still to render.
    #[arg(long, value_enum, default_value_t = Which::Initial)]
    which: Which,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Which {
    Initial,
    Final,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PromptChoice {
    Default,
    Simple,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<symbol_swap::GeneratorConfig> {
    match path {
        Some(p) => Ok(symbol_swap::GeneratorConfig::from_path(p)?),
        None => Ok(symbol_swap::GeneratorConfig::default()),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_ref())?;
    if let Some(n) = args.num_samples {
        cfg.num_samples = n;
    }
    if let Some(out) = args.output {
        cfg.output_dir = out;
    }
    if let Some(seed) = args.seed {
        cfg.random_seed = Some(seed);
    }
    if args.no_videos {
        cfg.generate_videos = false;
    }
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }

    let style = match args.prompt_style {
        PromptChoice::Default => symbol_swap::PromptStyle::Default,
        PromptChoice::Simple => symbol_swap::PromptStyle::Simple,
    };
    let runner = symbol_swap::BatchRunner::new(cfg)?.with_prompt_style(style);
    let report = runner.run()?;

    for failure in &report.failures {
        eprintln!("failed {}: {}", failure.task_id, failure.error);
    }
    eprintln!(
        "wrote {} task(s) (base seed {}), {} failed",
        report.written.len(),
        report.base_seed,
        report.failures.len()
    );
    if report.written.is_empty() && !report.failures.is_empty() {
        anyhow::bail!("no tasks were generated");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_ref())?;
    cfg.generate_videos = false;

    let generator = symbol_swap::TaskGenerator::new(cfg)?;
    let task = generator.generate("preview", args.seed)?;
    let frame = match args.which {
        Which::Initial => task.initial_frame(),
        Which::Final => task.final_frame(),
    };

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    symbol_swap::output::write_png(&args.out, frame)?;

    let desc = task.description();
    eprintln!(
        "wrote {} (replace #{} {} with {})",
        args.out.display(),
        desc.target_index,
        desc.target_identity,
        desc.replacement_identity
    );
    Ok(())
}
