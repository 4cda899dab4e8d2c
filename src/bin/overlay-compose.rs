use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "overlay-compose", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the background's size and how it fits the container.
    Info(InfoArgs),
    /// Place an overlay on a background and export the result as PNG.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Background image.
    #[arg(long)]
    background: PathBuf,

    /// Available display area as `WxH`. Defaults to the background's size plus the fit margin.
    #[arg(long, value_parser = parse_container)]
    container: Option<(f64, f64)>,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Background image.
    #[arg(long)]
    background: PathBuf,

    /// Overlay image (raster or SVG).
    #[arg(long)]
    overlay: PathBuf,

    /// Overlay content type. Guessed from the file extension when omitted.
    #[arg(long)]
    overlay_type: Option<String>,

    /// Available display area as `WxH`. Defaults to the background's size plus the fit margin.
    #[arg(long, value_parser = parse_container)]
    container: Option<(f64, f64)>,

    /// Overlay scale factor, as set with the size slider.
    #[arg(long)]
    size: Option<f64>,

    /// Overlay center in background pixels as `X,Y`.
    #[arg(long = "move", value_parser = parse_point, allow_hyphen_values = true)]
    move_to: Option<(f64, f64)>,

    /// Overlay rotation in degrees.
    #[arg(long, allow_hyphen_values = true)]
    angle: Option<f64>,

    /// Enable padding with this padding-field text.
    #[arg(long, allow_hyphen_values = true)]
    padding: Option<String>,

    /// Export quality relative to the background's native size, one of the configured menu
    /// entries. Defaults to the configured default quality.
    #[arg(long)]
    quality: Option<String>,

    /// Output PNG path. Defaults to the configured export file name.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn parse_container(s: &str) -> Result<(f64, f64), String> {
    parse_pair(s, 'x')
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    parse_pair(s, ',')
}

fn parse_pair(s: &str, sep: char) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(sep)
        .ok_or_else(|| format!("expected two numbers separated by '{sep}', got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{v}': {e}"))
    };
    Ok((parse(a)?, parse(b)?))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<overlay_compose::EditorConfig> {
    match path {
        Some(p) => Ok(overlay_compose::EditorConfig::from_json_path(p)?),
        None => Ok(overlay_compose::EditorConfig::default()),
    }
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read '{}'", path.display()))
}

/// Content type the host's file picker would report.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("svg") => "image/svg+xml",
        _ => "image/*",
    }
}

/// Attach the user-facing notice to a core error.
fn with_notice(err: overlay_compose::ComposeError) -> anyhow::Error {
    let notice = err.user_message();
    anyhow::Error::new(err).context(notice)
}

/// Load the background and fit it into the requested (or a 100%-zoom) container.
fn open_editor(
    background: &Path,
    container: Option<(f64, f64)>,
    config: Option<&Path>,
) -> anyhow::Result<overlay_compose::Editor> {
    let cfg = load_config(config)?;
    let margin = cfg.fit_margin_px;
    let mut editor = overlay_compose::Editor::new(cfg)?;

    editor
        .load_background(&read_file(background)?)
        .map_err(with_notice)
        .with_context(|| format!("load background '{}'", background.display()))?;

    let (w, h) = match container {
        Some(c) => c,
        None => {
            let native = editor
                .scene()
                .background()
                .map(|bg| bg.native_size())
                .context("background missing after load")?;
            (native.width + margin, native.height + margin)
        }
    };
    editor.resize_container(w, h);
    Ok(editor)
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let editor = open_editor(&args.background, args.container, args.config.as_deref())?;
    let fit = editor.viewport();

    println!("{}", editor.canvas_info());
    println!("display_scale: {}", fit.display_scale);
    println!(
        "canvas:        {} x {}",
        fit.canvas_size.width, fit.canvas_size.height
    );
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut editor = open_editor(&args.background, args.container, args.config.as_deref())?;

    let content_type = args
        .overlay_type
        .as_deref()
        .unwrap_or_else(|| guess_content_type(&args.overlay));
    editor
        .add_overlay(content_type, &read_file(&args.overlay)?)
        .map_err(with_notice)
        .with_context(|| format!("load overlay '{}'", args.overlay.display()))?;

    if let Some(scale) = args.size {
        editor.set_overlay_size(scale).map_err(with_notice)?;
    }
    if let Some((x, y)) = args.move_to {
        editor.move_selected(x, y).map_err(with_notice)?;
    }
    if let Some(angle) = args.angle {
        editor.rotate_selected(angle).map_err(with_notice)?;
    }
    if let Some(text) = args.padding.as_deref() {
        editor.set_padding_enabled(true).map_err(with_notice)?;
        editor.set_padding_input(text).map_err(with_notice)?;
    }
    eprintln!("{}", editor.canvas_info());

    let kind = match args.backend {
        BackendChoice::Cpu => overlay_compose::BackendKind::Cpu,
    };
    let mut rasterizer = overlay_compose::create_rasterizer(kind);
    let quality = editor
        .export_quality(args.quality.as_deref())
        .map_err(with_notice)?;
    let exported = editor
        .export(quality, rasterizer.as_mut())
        .map_err(with_notice)?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(&exported.file_name));
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &exported.png)
        .with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        out.display(),
        exported.width,
        exported.height
    );
    Ok(())
}
