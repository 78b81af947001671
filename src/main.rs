//! prosody-rs CLI entry point.

use anyhow::{Context, Result, bail};
use clap::Parser;
use prosody_rs::cli::{Args, OutputFormat};
use prosody_rs::config::select_source;
use prosody_rs::resolver::{ProsodyConfig, ResolvedParameters, Resolver};
use prosody_rs::ssml::{Composer, parse_script};
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    parameters: &'a ResolvedParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssml: Option<&'a str>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let source = select_source(args.config_dir.as_deref());
    let config = ProsodyConfig::load(&*source)
        .with_context(|| format!("Failed to load prosody configuration from {}", source.describe()))?;
    let resolver = Resolver::new(config);

    // Handle utility commands first
    if args.list_styles {
        return list_styles(&resolver);
    }

    if let Some(name) = &args.style_info {
        return style_info(&resolver, name);
    }

    let params = resolver
        .resolve_or_default(args.style.as_deref(), args.intensity, args.voice.as_deref())
        .with_context(|| {
            format!(
                "Failed to resolve style '{}' at intensity {} for voice '{}'",
                args.style.as_deref().unwrap_or("<default>"),
                args.intensity
                    .map_or_else(|| "<default>".to_string(), |i| i.to_string()),
                args.voice.as_deref().unwrap_or("<none>")
            )
        })?;

    let ssml = if args.wants_markup() {
        Some(compose(&args, &params)?)
    } else {
        None
    };

    match args.format {
        OutputFormat::Text => {
            println!("Style: {} (intensity {})", params.style, params.intensity);
            if let Some(voice) = &params.voice {
                println!("  Voice: {voice}");
            }
            for (name, value) in params.engine_params() {
                println!("  {name}: {value}");
            }
            if let Some(ssml) = &ssml {
                println!("{ssml}");
            }
        }
        OutputFormat::Json => {
            let report = Report {
                parameters: &params,
                ssml: ssml.as_deref(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Ssml => match &ssml {
            Some(ssml) => println!("{ssml}"),
            None => bail!("SSML output needs --text or --script"),
        },
    }

    Ok(())
}

fn compose(args: &Args, params: &ResolvedParameters) -> Result<String> {
    let composer = Composer::new(&args.lang);

    if let Some(path) = &args.script {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        let segments = parse_script(&script);
        return composer
            .compose_script(&segments, params)
            .with_context(|| format!("Failed to compose SSML for {}", path.display()));
    }

    let text = args.text.as_deref().unwrap_or_default();
    composer
        .compose(text, params)
        .context("Failed to compose SSML for text")
}

fn list_styles(resolver: &Resolver) -> Result<()> {
    let catalog = resolver.config().catalog();
    let default = catalog.defaults().map(|d| d.style.as_str());

    println!("Available styles:");
    for style in catalog.styles() {
        let marker = if Some(style.name.as_str()) == default {
            " (default)"
        } else {
            ""
        };
        match &style.description {
            Some(description) => println!("  {}{marker}: {description}", style.name),
            None => println!("  {}{marker}", style.name),
        }
    }

    Ok(())
}

fn style_info(resolver: &Resolver, name: &str) -> Result<()> {
    let style = resolver
        .config()
        .catalog()
        .get(name)
        .with_context(|| format!("Style '{}' not found", name))?;

    println!("{}", serde_json::to_string_pretty(style)?);
    Ok(())
}
