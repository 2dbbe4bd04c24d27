//! CLI for ImageWeaver - text-to-image generation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use imageweaver::providers::{GeminiProvider, StabilityProvider};
use imageweaver::{
    decode_data_url, AspectRatio, GenerationSession, ProviderRegistry, SessionState, StylePreset,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "imageweaver")]
#[command(about = "Generate images from text prompts via AI providers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate images from a text prompt
    Generate(GenerateArgs),

    /// List registered providers
    Providers,

    /// List style presets and their prompt modifiers
    Styles,
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the image
    prompt: String,

    /// Things the image should avoid
    #[arg(short, long)]
    negative_prompt: Option<String>,

    /// Provider identifier (known: gemini, stability)
    #[arg(short, long, default_value = "gemini")]
    provider: String,

    /// Style preset appended to the prompt
    #[arg(short, long, value_enum, default_value = "none")]
    style: StyleArg,

    /// Aspect ratio
    #[arg(long, value_enum, default_value = "1:1")]
    aspect_ratio: AspectRatioArg,

    /// Seed for deterministic generation (empty = random)
    #[arg(long)]
    seed: Option<String>,

    /// Number of images to generate (1-4)
    #[arg(short, long, default_value_t = 1)]
    count: u8,

    /// Directory to write the images into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    None,
    Photographic,
    Cinematic,
    Anime,
    Fantasy,
    #[value(name = "3d-render")]
    ThreeDRender,
    Watercolor,
}

impl From<StyleArg> for StylePreset {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::None => StylePreset::None,
            StyleArg::Photographic => StylePreset::Photographic,
            StyleArg::Cinematic => StylePreset::Cinematic,
            StyleArg::Anime => StylePreset::Anime,
            StyleArg::Fantasy => StylePreset::Fantasy,
            StyleArg::ThreeDRender => StylePreset::ThreeDRender,
            StyleArg::Watercolor => StylePreset::Watercolor,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AspectRatioArg {
    #[value(name = "1:1")]
    Square,
    #[value(name = "3:4")]
    StandardPortrait,
    #[value(name = "4:3")]
    Standard,
    #[value(name = "9:16")]
    Portrait,
    #[value(name = "16:9")]
    Landscape,
}

impl From<AspectRatioArg> for AspectRatio {
    fn from(arg: AspectRatioArg) -> Self {
        match arg {
            AspectRatioArg::Square => AspectRatio::Square,
            AspectRatioArg::StandardPortrait => AspectRatio::StandardPortrait,
            AspectRatioArg::Standard => AspectRatio::Standard,
            AspectRatioArg::Portrait => AspectRatio::Portrait,
            AspectRatioArg::Landscape => AspectRatio::Landscape,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate(args, cli.json).await,
        Commands::Providers => list_providers(cli.json),
        Commands::Styles => list_styles(cli.json),
    }
}

fn build_registry(need_gemini: bool) -> anyhow::Result<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    match GeminiProvider::builder().build() {
        Ok(provider) => registry.register("gemini", Arc::new(provider)),
        // Only fatal when this run actually targets Gemini.
        Err(e) if need_gemini => return Err(e.into()),
        Err(e) => tracing::debug!("gemini not registered: {e}"),
    }
    registry.register("stability", Arc::new(StabilityProvider::new()));
    Ok(registry)
}

async fn generate(args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let registry = build_registry(args.provider == "gemini")?;

    let mut session = GenerationSession::new();
    session.prompt = args.prompt;
    session.negative_prompt = args.negative_prompt.unwrap_or_default();
    session.provider_id = args.provider;
    session.style = args.style.into();
    session.aspect_ratio = args.aspect_ratio.into();
    session.seed_input = args.seed.unwrap_or_default();
    session.set_image_count(args.count);

    session.submit(&registry).await;

    let snapshot = session.snapshot();
    match session.state() {
        SessionState::Succeeded(locators) => {
            if json_output {
                let out = serde_json::json!({
                    "prompt": snapshot.map(|s| s.final_prompt.as_str()),
                    "aspectRatio": snapshot.map(|s| s.aspect_ratio.as_str()),
                    "images": locators,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            std::fs::create_dir_all(&args.output)?;
            for (i, locator) in locators.iter().enumerate() {
                let (format, data) = decode_data_url(locator)?;
                let path = args
                    .output
                    .join(format!("image-{}.{}", i + 1, format.extension()));
                std::fs::write(&path, data)?;
                println!("Saved {}", path.display());
            }
            Ok(())
        }
        SessionState::Failed(message) => anyhow::bail!("{message}"),
        // submit returned without dispatch (empty prompt)
        _ => anyhow::bail!("nothing to generate: prompt is empty"),
    }
}

fn list_providers(json_output: bool) -> anyhow::Result<()> {
    let providers = [
        ("gemini", "Gemini (Google)", true),
        ("stability", "Stability AI", false),
    ];

    if json_output {
        let out: Vec<_> = providers
            .iter()
            .map(|(id, name, available)| {
                serde_json::json!({ "id": id, "name": name, "available": available })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for (id, name, available) in providers {
        let status = if available { "" } else { " (not yet available)" };
        println!("{id:<12} {name}{status}");
    }
    Ok(())
}

fn list_styles(json_output: bool) -> anyhow::Result<()> {
    if json_output {
        let out: Vec<_> = StylePreset::ALL
            .iter()
            .map(|s| serde_json::json!({ "id": s.as_str(), "modifier": s.modifier() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for style in StylePreset::ALL {
        println!("{:<14} {}", style.as_str(), style.modifier());
    }
    Ok(())
}
