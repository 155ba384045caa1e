use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use grid_quant::Palette;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pixgrid::api;
use pixgrid::error::ParameterError;
use pixgrid::models::{
    AppConfig, DitherMode, GridSpec, InputBounds, PaletteMode, RenderOptions, ResampleFilter,
    SessionSettings,
};
use pixgrid::rendering::LabelFont;
use pixgrid::server;
use pixgrid::services::{quantizer, PixelArtPipeline};

#[derive(Parser)]
#[command(name = "pixgrid")]
#[command(about = "Turn photos into numbered pixel-grid art with an editable palette")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Render an image directly to a PNG file
    Render(RenderArgs),
    /// Print the palette derived from an image, one hex color per line
    Palette(PaletteArgs),
}

#[derive(Args)]
struct GridArgs {
    /// Grid columns
    #[arg(long)]
    width: Option<u32>,

    /// Grid rows
    #[arg(long)]
    height: Option<u32>,

    /// Number of palette colors
    #[arg(long)]
    colors: Option<u32>,

    /// Resampling filter: "lanczos" or "nearest"
    #[arg(long)]
    resample: Option<ResampleFilter>,
}

#[derive(Args)]
struct RenderArgs {
    /// Input image (JPEG, PNG or TIFF)
    input: PathBuf,

    /// Output PNG file path
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    grid: GridArgs,

    /// Palette colors as comma-separated hex (e.g. "#000000,#ffffff,#ff0000").
    /// Replaces the first derived colors; remaining slots keep derived colors.
    #[arg(long)]
    palette: Option<String>,

    /// Palette mode: "custom" or "auto"
    #[arg(long)]
    mode: Option<PaletteMode>,

    /// Dithering: "floyd-steinberg", "atkinson" or "none"
    #[arg(long)]
    dither: Option<DitherMode>,

    /// Do not draw cell outlines
    #[arg(long)]
    no_outline: bool,
}

#[derive(Args)]
struct PaletteArgs {
    /// Input image (JPEG, PNG or TIFF)
    input: PathBuf,

    #[command(flatten)]
    grid: GridArgs,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pixgrid API",
        description = "Turn photos into numbered pixel-grid art with an editable palette",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::create_session,
        api::get_session,
        api::update_settings,
        api::delete_session,
        api::set_palette_color,
        api::reset_palette,
        api::handle_image,
    ),
    components(schemas(
        api::SessionResponse,
        api::UpdateSettingsRequest,
        api::SetColorRequest,
        InputBounds,
        PaletteMode,
        ResampleFilter,
        DitherMode,
    )),
    tags(
        (name = "Sessions", description = "Image upload and render settings"),
        (name = "Palette", description = "Palette editing"),
        (name = "Image", description = "Rendered PNG download")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render(args)) => run_render_command(args),
        Some(Commands::Palette(args)) => run_palette_command(args),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for CLI commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixgrid=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Load config from CONFIG_FILE; FONTS_DIR overrides the configured font dir.
fn load_config() -> AppConfig {
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let mut config = AppConfig::load(config_file.as_deref());
    if let Ok(dir) = std::env::var("FONTS_DIR") {
        config.fonts.dir = Some(PathBuf::from(dir));
    }
    config
}

fn read_source(path: &Path, config: &AppConfig) -> anyhow::Result<image::RgbImage> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    quantizer::decode_image(&bytes, config.max_image_dimension)
        .with_context(|| format!("decoding {}", path.display()))
}

fn settings_from_args(
    config: &AppConfig,
    grid: &GridArgs,
    colors: u32,
    options: RenderOptions,
) -> Result<SessionSettings, ParameterError> {
    let spec = GridSpec::new(
        grid.width.unwrap_or(config.defaults.width),
        grid.height.unwrap_or(config.defaults.height),
    )?;
    let settings = SessionSettings::new(spec, colors, options);
    settings.validate(&config.bounds_for(options.palette_mode))?;
    Ok(settings)
}

/// Render an image directly to a PNG file (no server needed)
fn run_render_command(args: RenderArgs) -> anyhow::Result<()> {
    init_cli_tracing();
    let config = load_config();

    let palette = args
        .palette
        .as_deref()
        .map(|list| {
            let entries: Vec<&str> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            Palette::from_hex(&entries).map_err(ParameterError::from)
        })
        .transpose()?;
    let given = palette.as_ref().map_or(0, Palette::len);

    let colors = args
        .grid
        .colors
        .or(palette.as_ref().map(|p| p.len() as u32))
        .unwrap_or(config.defaults.colors);
    if given > colors as usize {
        return Err(ParameterError::PaletteTooLong { given, colors }.into());
    }

    let options = RenderOptions {
        outline: config.render.outline && !args.no_outline,
        resample: args.grid.resample.unwrap_or(config.render.resample),
        dither: args.dither.or(config.render.dither),
        palette_mode: args.mode.unwrap_or(config.render.palette_mode),
    };
    let settings = settings_from_args(&config, &args.grid, colors, options)?;

    let overrides: BTreeMap<usize, _> = palette
        .map(|p| p.colors().iter().copied().enumerate().collect())
        .unwrap_or_default();

    let source = read_source(&args.input, &config)?;
    let font = LabelFont::resolve(&config.fonts.families, config.fonts.dir.as_deref());
    let pipeline = PixelArtPipeline::from_config(&config, Arc::new(font));

    let png_bytes = pipeline
        .render_png(&source, &settings, &overrides)
        .map_err(|e| anyhow::anyhow!("Render error: {e}"))?;

    std::fs::write(&args.output, &png_bytes)?;
    println!(
        "Rendered {} ({}x{} grid, {} colors, {} bytes)",
        args.output.display(),
        settings.grid.width,
        settings.grid.height,
        settings.color_count,
        png_bytes.len()
    );

    Ok(())
}

/// Print the derived palette of an image
fn run_palette_command(args: PaletteArgs) -> anyhow::Result<()> {
    init_cli_tracing();
    let config = load_config();

    let colors = args.grid.colors.unwrap_or(config.defaults.colors);
    let options = RenderOptions {
        resample: args.grid.resample.unwrap_or(config.render.resample),
        palette_mode: PaletteMode::Custom,
        ..config.render
    };
    let settings = settings_from_args(&config, &args.grid, colors, options)?;

    let source = read_source(&args.input, &config)?;
    let palette = quantizer::derive_palette(
        &source,
        settings.grid,
        settings.color_count,
        settings.options.resample,
    );

    for hex in palette.to_hex() {
        println!("{hex}");
    }

    Ok(())
}

/// Display status information: version, environment, commands
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Read environment variables
    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let fonts_dir = std::env::var("FONTS_DIR").ok();

    // Header
    println!("Pixgrid v{VERSION}");
    println!("Numbered pixel-grid art from photos\n");

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  FONTS_DIR   = {}",
        fonts_dir.as_deref().unwrap_or("(not set)")
    );

    // Config section
    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    let config = load_config();
    let layout = config.layout;
    println!("\nConfiguration:");
    println!("  Source:  {config_source}");
    println!(
        "  Layout:  cell {} / spacing {} / header {}",
        layout.cell_size, layout.spacing, layout.header_size
    );
    println!(
        "  Default: {}x{} grid, {} colors",
        config.defaults.width, config.defaults.height, config.defaults.colors
    );
    println!(
        "  Sessions: idle {}s / max {}",
        config.session_idle_secs, config.max_sessions
    );

    // Commands section
    println!("\nCommands:");
    println!("  pixgrid serve                   Start the HTTP server");
    println!("  pixgrid render <IMG> -o <PNG>   Render an image to PNG");
    println!("  pixgrid palette <IMG>           Print the derived palette");
    println!("  pixgrid --help                  Show all options");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixgrid=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let config = load_config();

    tracing::info!(
        config = ?std::env::var("CONFIG_FILE").unwrap_or_else(|_| "defaults".to_string()),
        fonts_dir = ?config.fonts.dir.as_ref().map(|p| p.display().to_string()),
        max_upload_bytes = config.max_upload_bytes,
        "Configuration loaded"
    );

    // Create application state using shared server module
    let state = server::create_app_state(config);
    tracing::info!(
        label_font = state.pipeline.renderer().font().family().unwrap_or("built-in bitmap"),
        "Label font resolved"
    );

    // Drop idle sessions in the background
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            sessions.purge_expired().await;
        }
    });

    // Build router: shared API routes plus OpenAPI documentation
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Pixgrid server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
