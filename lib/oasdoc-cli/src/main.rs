#![allow(missing_docs)]
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use oasdoc_core::{
    ConversionOutput, ConvertConfig, ConvertSettings, JsonRenderer, Renderer, YamlRenderer,
    convert,
};
use serde::de::DeserializeOwned;
use tracing::{Level, debug, info, warn};
use utoipa::openapi::OpenApi;

fn main() -> Result<()> {
    let AppArgs {
        input,
        settings,
        output,
        format,
        verbose,
        remaining,
    } = AppArgs::parse().context("parsing arguments")?;

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().pretty().with_max_level(level).init();
    if !remaining.is_empty() {
        warn!(?remaining, "Warning: unused arguments left");
    }

    let api = load::<OpenApi>(&input).context("loading OpenAPI document")?;
    let mut loaded = match &settings {
        Some(path) => load::<ConvertSettings>(path).context("loading settings")?,
        None => ConvertSettings::default(),
    };
    if let Some(output) = &output {
        loaded = loaded.merge(ConvertSettings {
            output_directory: Some(output.clone()),
            ..ConvertSettings::default()
        });
    }
    let directory = loaded
        .output_directory
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let config = ConvertConfig::try_from(loaded).context("invalid settings")?;

    let converted = convert(&api, &config).context("converting OpenAPI document")?;
    let count = match format {
        OutputFormat::Json => write(&JsonRenderer::pretty(), &converted, &directory)?,
        OutputFormat::Yaml => write(&YamlRenderer, &converted, &directory)?,
    };

    info!(count, directory = %directory.display(), "documentation written");
    Ok(())
}

#[derive(Debug)]
struct AppArgs {
    input: PathBuf,
    settings: Option<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
    remaining: Vec<OsString>,
}

impl AppArgs {
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let verbose = pargs.contains(["-v", "--verbose"]);

        let input = pargs
            .value_from_os_str(["-i", "--input"], |value| {
                Ok::<_, std::convert::Infallible>(PathBuf::from(value))
            })
            .context("parsing input argument")?;

        let settings = pargs
            .opt_value_from_os_str(["-c", "--config"], |value| {
                Ok::<_, std::convert::Infallible>(PathBuf::from(value))
            })
            .context("parsing config argument")?;

        let output = pargs
            .opt_value_from_os_str(["-o", "--output"], |value| {
                Ok::<_, std::convert::Infallible>(PathBuf::from(value))
            })
            .context("parsing output argument")?;

        let format = pargs
            .opt_value_from_str(["-f", "--format"])
            .context("parsing format argument")?;

        Ok(Self {
            input,
            settings,
            output,
            format: format.unwrap_or_default(),
            verbose,
            remaining: pargs.finish(),
        })
    }
}

/// Serialization of the written documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!("unsupported format '{other}', expected json or yaml")),
        }
    }
}

/// Reads a JSON or YAML file, chosen by its extension.
fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse(&content, path.extension().and_then(|ext| ext.to_str()))
        .with_context(|| format!("parsing {}", path.display()))
}

fn parse<T: DeserializeOwned>(content: &str, extension: Option<&str>) -> Result<T> {
    match extension {
        Some("yaml" | "yml") => Ok(serde_saphyr::from_str(content)?),
        Some("json") | None => Ok(serde_json::from_str(content)?),
        Some(other) => bail!("unsupported file extension '{other}'"),
    }
}

/// Writes every non-empty document under `directory`; returns the number of files.
fn write<R>(renderer: &R, output: &ConversionOutput, directory: &Path) -> Result<usize>
where
    R: Renderer,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let mut count = 0;
    for (path, document) in output.files() {
        let target = target_path(directory, path, renderer.extension());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let rendered = renderer
            .render(document)
            .with_context(|| format!("rendering {}", path.display()))?;
        fs::write(&target, rendered).with_context(|| format!("writing {}", target.display()))?;
        debug!(path = %target.display(), "document written");
        count += 1;
    }
    Ok(count)
}

/// `overview.adoc` rendered as JSON lands in `overview.adoc.json`.
fn target_path(directory: &Path, path: &Path, extension: &str) -> PathBuf {
    let mut target = OsString::from(directory.join(path));
    target.push(extension);
    PathBuf::from(target)
}
