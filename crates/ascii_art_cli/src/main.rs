use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ascii_art::config::ConfigFile;
use ascii_art::{
    AsciiArtElement, AsciiHook, AsciiRenderer, FsLoader, HookOptions, HookOutcome, RenderConfig,
    RenderOutput, RenderTarget, Rendering,
};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use notify::{RecursiveMode, Watcher};
use walkdir::WalkDir;

/// Display refresh interval used by `watch`.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert images to ASCII text or colored glyph grids")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render ASCII art to stdout for a quick preview
    Preview(PreviewArgs),
    /// Convert an image to ASCII and write the result to disk
    Convert(ConvertArgs),
    /// Convert every image below a directory to text files
    Batch(BatchArgs),
    /// Re-render an image whenever the file changes
    Watch(WatchArgs),
    /// Render at an exact cell size without scaling or aspect fit
    Hook(HookArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input image path
    input: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input image path
    input: PathBuf,
    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Directory searched recursively for images
    input: PathBuf,
    /// Output directory for text files
    #[arg(short, long)]
    out_dir: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct WatchArgs {
    /// Input image path
    input: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct HookArgs {
    /// Input image path
    input: PathBuf,
    /// Output columns
    #[arg(long)]
    width: u32,
    /// Output rows
    #[arg(long)]
    height: u32,
    /// Characters from darkest to lightest
    #[arg(long, default_value = ascii_art::DEFAULT_CHARSET)]
    charset: String,
    /// Use the charset in configured order instead of reversed
    #[arg(long, default_value_t = false)]
    invert: bool,
}

#[derive(Parser, Debug, Clone)]
struct RenderSettings {
    /// TOML file with a [render] table; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Characters from darkest to lightest
    #[arg(long)]
    charset: Option<String>,
    /// Sampling density (0.05 - 1.0)
    #[arg(long)]
    scale: Option<f64>,
    /// Use the charset in configured order instead of reversed
    #[arg(long, default_value_t = false)]
    invert: bool,
    /// Keep per-cell colors
    #[arg(long, default_value_t = false)]
    color: bool,
    /// Host box width in pixels before scaling
    #[arg(long)]
    max_width: Option<u32>,
    /// Host box height in pixels before scaling
    #[arg(long)]
    max_height: Option<u32>,
    /// Luminance multiplier
    #[arg(long, allow_hyphen_values = true)]
    contrast: Option<f64>,
    /// Luminance offset (-255..255)
    #[arg(long, allow_hyphen_values = true)]
    brightness: Option<f64>,
    /// Container width in pixels, used when no max width is set
    #[arg(long, default_value_t = 0)]
    container_width: u32,
    /// Container height in pixels, used when no max height is set
    #[arg(long, default_value_t = 0)]
    container_height: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Ansi,
    Html,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Preview(args) => preview(args),
        Commands::Convert(args) => convert(args),
        Commands::Batch(args) => batch(args),
        Commands::Watch(args) => watch(args),
        Commands::Hook(args) => hook(args),
    }
}

fn preview(args: PreviewArgs) -> Result<()> {
    let config = args.settings.to_config()?;
    let output = AsciiRenderer
        .render_path(&args.input, &config, args.settings.container())
        .with_context(|| format!("failed to render {:?}", args.input))?;

    println!("{}", format_output(&output, OutputFormat::Ansi));
    Ok(())
}

fn convert(args: ConvertArgs) -> Result<()> {
    let config = args.settings.to_config()?;
    let output = AsciiRenderer
        .render_path(&args.input, &config, args.settings.container())
        .with_context(|| format!("failed to render {:?}", args.input))?;

    let mut file = File::create(&args.output)
        .with_context(|| format!("failed to create {:?}", args.output))?;
    writeln!(file, "{}", format_output(&output, args.format))?;
    Ok(())
}

fn batch(args: BatchArgs) -> Result<()> {
    let config = args.settings.to_config()?;
    let container = args.settings.container();
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let inputs = collect_images(&args.input)?;
    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images",
        )?
        .progress_chars("=> "),
    );

    let mut failed = 0;
    for input in &inputs {
        match AsciiRenderer.render_path(input, &config, container) {
            Ok(output) => {
                let relative = input.strip_prefix(&args.input).unwrap_or(input);
                let target = args.out_dir.join(relative).with_extension("txt");
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {:?}", parent))?;
                }
                fs::write(&target, output.rendering.to_text())
                    .with_context(|| format!("failed to write {:?}", target))?;
            },
            Err(err) => {
                warn!("skipping {}: {err}", input.display());
                failed += 1;
            },
        }
        progress.inc(1);
    }

    progress.finish_with_message(format!(
        "{} of {} images written to {:?}",
        inputs.len() - failed,
        inputs.len(),
        args.out_dir
    ));
    Ok(())
}

fn collect_images(path: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| image::ImageFormat::from_path(path).is_ok())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no image files found in {:?}", path);
    }
    Ok(entries)
}

fn watch(args: WatchArgs) -> Result<()> {
    let config = args.settings.to_config()?;
    let (container_width, container_height) = args.settings.container();

    let mut element = AsciiArtElement::new(FsLoader::new());
    for (key, value) in config.to_attributes().iter() {
        element.set_attribute(key.as_str(), value);
    }
    let src = args.input.to_string_lossy();
    element.set_src(Some(&*src));
    element.resize(container_width, container_height);
    element.connect();

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("failed to create file watcher")?;
    let watched_dir = match args.input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    watcher
        .watch(&watched_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {:?}", watched_dir))?;

    let file_name = args.input.file_name().map(|name| name.to_os_string());
    let mut reload = false;
    let mut shown_failure = false;
    let mut next_frame = Instant::now() + FRAME_INTERVAL;

    loop {
        let wait = next_frame.saturating_duration_since(Instant::now());
        match rx.recv_timeout(wait) {
            Ok(Ok(event)) => {
                let touches_input = event
                    .paths
                    .iter()
                    .any(|path| path.file_name().map(|name| name.to_os_string()) == file_name);
                if touches_input && (event.kind.is_modify() || event.kind.is_create()) {
                    debug!("source changed: {:?}", event.kind);
                    reload = true;
                }
            },
            Ok(Err(err)) => warn!("watch error: {err}"),
            Err(RecvTimeoutError::Timeout) => (),
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if Instant::now() < next_frame {
            continue;
        }
        next_frame = Instant::now() + FRAME_INTERVAL;

        // One reload and at most one render per refresh.
        if std::mem::take(&mut reload) {
            element.load_image();
        }

        if element.animation_frame() {
            shown_failure = false;
            print!("\x1b[2J\x1b[H{}", format_target(element.target()));
            std::io::stdout().flush()?;
        } else if let RenderTarget::Failed(text) = element.target() {
            if !shown_failure {
                eprintln!("{text}");
                shown_failure = true;
            }
        }
    }

    Ok(())
}

fn hook(args: HookArgs) -> Result<()> {
    let options = HookOptions::new(args.input.to_string_lossy(), args.width, args.height)
        .charset(args.charset)
        .invert(args.invert);

    let mut out = String::new();
    match AsciiHook::default().update(&options, &mut out) {
        HookOutcome::LoadFailed => anyhow::bail!("failed to load {:?}", args.input),
        HookOutcome::Rendered | HookOutcome::Unchanged => println!("{out}"),
    }
    Ok(())
}

fn format_output(output: &RenderOutput, format: OutputFormat) -> String {
    match (&output.rendering, format) {
        (Rendering::Text(text), OutputFormat::Html) => html_document(&escape_html(text)),
        (Rendering::Text(text), _) => text.clone(),
        (Rendering::Colored(grid), OutputFormat::Text) => grid.to_text(),
        (Rendering::Colored(grid), OutputFormat::Ansi) => grid.to_ansi(),
        (Rendering::Colored(grid), OutputFormat::Html) => html_document(&grid.to_html()),
    }
}

fn format_target(target: &RenderTarget) -> String {
    match target {
        RenderTarget::Empty => String::new(),
        RenderTarget::Text(text) | RenderTarget::Failed(text) => text.clone(),
        RenderTarget::Colored(grid) => grid.to_ansi(),
    }
}

const PRE_STYLE: &str = "margin:0;white-space:pre;line-height:1;font-family:ui-monospace,monospace";

fn html_document(body: &str) -> String {
    format!("<pre style=\"{PRE_STYLE}\">{body}</pre>")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

impl RenderSettings {
    fn to_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                ConfigFile::load(path)
                    .with_context(|| format!("failed to load config {:?}", path))?
                    .render
            },
            None => RenderConfig::default(),
        };

        if let Some(charset) = &self.charset {
            config.charset = charset.clone();
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        config.invert |= self.invert;
        config.color |= self.color;
        if self.max_width.is_some() {
            config.max_width = self.max_width;
        }
        if self.max_height.is_some() {
            config.max_height = self.max_height;
        }
        if let Some(contrast) = self.contrast {
            config.contrast = contrast;
        }
        if let Some(brightness) = self.brightness {
            config.brightness = brightness;
        }
        Ok(config)
    }

    fn container(&self) -> (u32, u32) {
        (self.container_width, self.container_height)
    }
}
