use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tilemux", version)]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset (e.g. `debug`, `tilemux=trace`).
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a layout headlessly and write every surface as a PNG.
    Compose(ComposeArgs),
    /// Print the computed tile layout as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input layout JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving `offscreen.png` and one `<viewport>.png` per viewport.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of render requests to pump.
    #[arg(long, default_value_t = 1)]
    frames: u32,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input layout JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_logging(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_layout_json(path: &Path) -> anyhow::Result<tilemux::LayoutDoc> {
    let f = File::open(path).with_context(|| format!("open layout '{}'", path.display()))?;
    let doc = tilemux::LayoutDoc::from_json_reader(BufReader::new(f))
        .with_context(|| "parse layout JSON")?;
    Ok(doc)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let doc = read_layout_json(&args.in_path)?;
    let composed = tilemux::compose_layout(&doc, args.frames)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    if let Some(frame) = &composed.offscreen {
        write_png(&args.out_dir.join("offscreen.png"), frame)?;
    }
    for (id, frame) in &composed.outputs {
        let path = args.out_dir.join(format!("{}.png", file_stem(id)));
        write_png(&path, frame)?;
    }
    eprintln!(
        "composed {} viewport(s) in {} tick(s)",
        composed.outputs.len(),
        composed.ticks
    );
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let doc = read_layout_json(&args.in_path)?;
    let layout = tilemux::plan_layout(&doc)?;
    let json = serde_json::to_string_pretty(&layout).with_context(|| "serialize layout")?;
    println!("{json}");
    Ok(())
}

fn write_png(path: &Path, frame: &tilemux::FrameRGBA) -> anyhow::Result<()> {
    if frame.is_empty() {
        eprintln!("skipped {} (empty surface)", path.display());
        return Ok(());
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

// Viewport ids are free-form; keep file names portable.
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
