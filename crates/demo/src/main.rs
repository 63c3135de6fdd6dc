// File: crates/demo/src/main.rs
// Summary: Demo loads JSON quote feeds through a chart session and writes one SVG chart per feed.

mod svg;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use quotechart_core::{ChartConfig, ChartSession, DatasetId, DatasetSpec, FeedSource, Period, RawFeed};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::svg::SvgRenderer;

/// Reads feeds from the local filesystem; `DatasetSpec::location` is a path.
struct FileFeedSource;

impl FeedSource for FileFeedSource {
    async fn load(&self, spec: &DatasetSpec) -> quotechart_core::Result<RawFeed> {
        let bytes = tokio::fs::read(&spec.location)
            .await
            .map_err(|e| quotechart_core::ChartError::Load(format!("reading {}: {e}", spec.location)))?;
        RawFeed::from_slice(&bytes)
    }
}

struct Args {
    config: Option<PathBuf>,
    period: Option<Period>,
    crosshair: Option<f64>,
    feeds: Vec<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { config: None, period: None, crosshair: None, feeds: Vec::new() };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                let v = it.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(v));
            }
            "--period" => {
                let v = it.next().context("--period needs a value")?;
                args.period = Some(v.parse()?);
            }
            "--crosshair" => {
                let v = it.next().context("--crosshair needs an x position")?;
                args.crosshair = Some(v.parse().with_context(|| format!("bad --crosshair value '{v}'"))?);
            }
            "-h" | "--help" => {
                println!(
                    "usage: quotechart-demo [--config cfg.json] [--period 1y|6m|3m|1m|ytd|all] [--crosshair <x>] <feed.json>..."
                );
                std::process::exit(0);
            }
            _ => args.feeds.push(PathBuf::from(arg)),
        }
    }
    Ok(args)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;
    let mut config = match &args.config {
        Some(path) => ChartConfig::from_path(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => ChartConfig::default(),
    };
    if let Some(period) = args.period {
        config.initial_period = period;
    }
    for path in &args.feeds {
        let id = stem(path);
        config.datasets.push(DatasetSpec::new(id, path.to_string_lossy()));
    }
    if config.datasets.is_empty() {
        bail!("no feeds given; pass one or more feed JSON files or a config with datasets");
    }

    let renderer = SvgRenderer::new(config.insets);
    let mut session = ChartSession::new(config, renderer);
    let ids: Vec<(DatasetId, String)> = session.datasets().map(|d| (d.id.clone(), d.label.clone())).collect();

    let out_dir = PathBuf::from("target/out");
    tokio::fs::create_dir_all(&out_dir)
        .await
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let source = FileFeedSource;
    let mut written = 0usize;
    for (id, label) in ids {
        session.renderer_mut().set_title(label);
        if let Err(e) = session.select_dataset(&source, &id).await {
            warn!(dataset = %id, error = %e, "skipping dataset");
            continue;
        }
        let shown = session.quotes().map_or(0, |q| q.len());
        info!(dataset = %id, points = shown, "rendering");

        let out = out_dir.join(format!("{id}.svg"));
        write_svg(&out, &session.renderer().to_svg_string()).await?;
        println!("Wrote {}", out.display());
        written += 1;

        if let Some(x) = args.crosshair {
            match session.on_pointer_move(x) {
                Ok(point) => {
                    info!(dataset = %id, date = %point.date, close = point.close, "crosshair");
                    let out = out_dir.join(format!("{id}-crosshair.svg"));
                    write_svg(&out, &session.renderer().to_svg_string()).await?;
                    println!("Wrote {}", out.display());
                }
                Err(e) => warn!(dataset = %id, error = %e, "no crosshair frame"),
            }
            session.on_pointer_leave();
        }
    }

    if written == 0 {
        bail!("no dataset could be rendered");
    }
    Ok(())
}

async fn write_svg(path: &Path, svg: &str) -> Result<()> {
    tokio::fs::write(path, svg).await.with_context(|| format!("writing {}", path.display()))
}

fn stem(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("chart").to_string()
}
