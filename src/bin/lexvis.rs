use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "lexvis", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame of a storyboard as a PNG.
    Frame(FrameArgs),
    /// Render a storyboard to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Play a JSON token list over a line of code and print the stamped tokens as JSON.
    Tokens(TokensArgs),
    /// Render a JSON graph definition as a PNG.
    Graph(GraphArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Storyboard to play.
    #[arg(long, value_enum)]
    demo: DemoChoice,

    /// Time of the frame, in seconds from the start.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Background color as `#rrggbb`.
    #[arg(long, default_value = "#2e2e2e")]
    background: lexvis::Color,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Storyboard to play.
    #[arg(long, value_enum)]
    demo: DemoChoice,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Background color as `#rrggbb`.
    #[arg(long, default_value = "#2e2e2e")]
    background: lexvis::Color,
}

#[derive(Parser, Debug)]
struct TokensArgs {
    /// Token list JSON: `[[[gap, len], "COLOR"], ...]` or `[[[gap, len], secs, "COLOR"], ...]`.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Code the tokens walk over.
    #[arg(long)]
    code: String,
}

#[derive(Parser, Debug)]
struct GraphArgs {
    /// Graph definition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Background color as `#rrggbb`.
    #[arg(long, default_value = "#2e2e2e")]
    background: lexvis::Color,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DemoChoice {
    Tokens,
    Parser,
}

impl From<DemoChoice> for lexvis::Demo {
    fn from(choice: DemoChoice) -> Self {
        match choice {
            DemoChoice::Tokens => Self::Tokens,
            DemoChoice::Parser => Self::Parser,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Tokens(args) => cmd_tokens(args),
        Command::Graph(args) => cmd_graph(args),
    }
}

fn read_to_string(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let settings = lexvis::RenderSettings {
        background: args.background,
        ..lexvis::RenderSettings::default()
    };
    let rasterizer = lexvis::Rasterizer::new();
    let frame = lexvis::demo::render_frame(args.demo.into(), &settings, &rasterizer, args.time)?;
    lexvis::save_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let settings = lexvis::RenderSettings {
        fps: lexvis::Fps::new(args.fps, 1)?,
        background: args.background,
        ..lexvis::RenderSettings::default()
    };
    let rasterizer = lexvis::Rasterizer::new();
    let mut sink = lexvis::FfmpegSink::new(lexvis::FfmpegSinkOpts {
        background: settings.background,
        ..lexvis::FfmpegSinkOpts::new(&args.out)
    });
    let frames =
        lexvis::demo::render_video(args.demo.into(), &settings, &rasterizer, &mut sink)?;

    eprintln!("wrote {} ({frames} frames)", args.out.display());
    Ok(())
}

fn cmd_tokens(args: TokensArgs) -> anyhow::Result<()> {
    let list: lexvis::TokenList = serde_json::from_str(&read_to_string(&args.in_path)?)
        .with_context(|| "parse token list JSON")?;
    let fps = lexvis::RenderSettings::default().fps;
    let tokens = lexvis::demo::stamp_tokens(&args.code, list, fps)?;

    let json = serde_json::to_string_pretty(&tokens).context("serialize tokens")?;
    println!("{json}");
    Ok(())
}

fn cmd_graph(args: GraphArgs) -> anyhow::Result<()> {
    let def = lexvis::demo::GraphDef::from_json(&read_to_string(&args.in_path)?)?;

    let mut scene = lexvis::Scene::default();
    let root = scene.root();
    def.build(&mut scene, root, (0.0, 0.0))?;

    let settings = lexvis::RenderSettings {
        background: args.background,
        ..lexvis::RenderSettings::default()
    };
    let frame = lexvis::Rasterizer::new().render_scene(&scene, &settings)?;
    lexvis::save_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
