use std::path::PathBuf;

use clap::{Parser, Subcommand};

use checkin_qr::{
    CheckinIdentity, CheckinRenderer, EngineConfig, LocationId, ResourceLogoSource, checkin_url,
    export_png, generate_token,
};

#[derive(Parser, Debug)]
#[command(name = "checkin-qr", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a branded check-in QR code as a PNG.
    Render(RenderArgs),
    /// Print the check-in URL a token encodes to.
    Url(UrlArgs),
    /// Print a freshly generated check-in token.
    Token,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Check-in token to encode.
    #[arg(long)]
    token: String,

    /// Location display name (monogram and output file name).
    #[arg(long)]
    name: String,

    /// Location id recorded in logs.
    #[arg(long, default_value = "cli")]
    location: String,

    /// Primary brand color (hex or "H S% L%").
    #[arg(long)]
    primary: Option<String>,

    /// Accent color; derived from the primary when omitted.
    #[arg(long)]
    accent: Option<String>,

    /// Logo path or http(s) URL.
    #[arg(long)]
    logo: Option<String>,

    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the application origin.
    #[arg(long)]
    origin: Option<String>,

    /// Override the output side in pixels.
    #[arg(long)]
    size: Option<u32>,

    /// Directory the PNG is written to.
    #[arg(long = "out", default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct UrlArgs {
    /// Check-in token.
    #[arg(long)]
    token: String,

    /// Override the application origin.
    #[arg(long)]
    origin: Option<String>,

    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Url(args) => cmd_url(args),
        Command::Token => {
            println!("{}", generate_token());
            Ok(())
        }
    }
}

fn load_config(
    path: Option<&PathBuf>,
    origin: Option<String>,
    size: Option<u32>,
) -> anyhow::Result<EngineConfig> {
    let mut cfg = match path {
        Some(p) => EngineConfig::from_path(p)?,
        None => EngineConfig::default(),
    }
    .with_env_overrides()?;
    if let Some(origin) = origin {
        cfg.app_origin = origin;
    }
    if let Some(size) = size {
        cfg.surface_size = size;
    }
    cfg.validate()?;
    Ok(cfg)
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref(), args.origin, args.size)?;
    let assets_root = args
        .config
        .as_ref()
        .and_then(|p| p.parent())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut identity = CheckinIdentity::new(LocationId::new(args.location), args.token, args.name);
    identity.primary_color = args.primary;
    identity.accent_color = args.accent;
    identity.logo_resource = args.logo;

    let renderer = CheckinRenderer::new(cfg, ResourceLogoSource::new(assets_root))?;
    let rendered = renderer.render_complete(&identity).await?;
    let exported = export_png(&rendered.surface, &identity.display_name)?;
    let path = exported.save(&args.out_dir)?;

    eprintln!(
        "wrote {} (version {}, {:.1}% of dark modules dropped)",
        path.display(),
        rendered.version,
        rendered.stats.dropped_fraction() * 100.0
    );
    Ok(())
}

fn cmd_url(args: UrlArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref(), args.origin, None)?;
    println!("{}", checkin_url(&cfg.app_origin, &args.token)?);
    Ok(())
}
