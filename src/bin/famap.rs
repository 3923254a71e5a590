use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "famap", version, about = "Render the family travel map")]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Family dataset JSON.
    #[arg(long)]
    family: Option<PathBuf>,

    /// Persisted geocode cache file.
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Directory for generated pin images.
    #[arg(long)]
    pins_dir: Option<PathBuf>,

    /// Output HTML page.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Nominatim base URL.
    #[arg(long)]
    geocoder_url: Option<String>,

    /// User-Agent sent to the geocoder.
    #[arg(long)]
    user_agent: Option<String>,

    /// Minimum milliseconds between geocoder requests.
    #[arg(long)]
    min_interval_ms: Option<u64>,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<famap::MapConfig> {
        let mut cfg = match &self.config {
            Some(path) => famap::MapConfig::from_path(path)
                .with_context(|| format!("load config '{}'", path.display()))?,
            None => famap::MapConfig::default(),
        };

        if let Some(v) = self.family {
            cfg.family = v;
        }
        if let Some(v) = self.cache {
            cfg.cache = v;
        }
        if let Some(v) = self.pins_dir {
            cfg.pins_dir = v;
        }
        if let Some(v) = self.out {
            cfg.out = v;
        }
        if let Some(v) = self.geocoder_url {
            cfg.geocoder.url = v;
        }
        if let Some(v) = self.user_agent {
            cfg.geocoder.user_agent = v;
        }
        if let Some(v) = self.min_interval_ms {
            cfg.geocoder.min_interval_ms = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "famap=debug" } else { "famap=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let cfg = cli.into_config()?;

    let dataset = famap::FamilyDataset::from_path(&cfg.family)
        .with_context(|| format!("load family dataset '{}'", cfg.family.display()))?;
    tracing::info!(
        members = dataset.entities().len(),
        places = dataset.place_count(),
        "loaded family"
    );

    std::fs::create_dir_all(&cfg.pins_dir)
        .with_context(|| format!("create pins dir '{}'", cfg.pins_dir.display()))?;

    let geocoder = famap::NominatimGeocoder::new(
        &cfg.geocoder.url,
        &cfg.geocoder.user_agent,
        cfg.geocoder.timeout(),
    )?;
    let mut cache = famap::GeocodeCache::load(
        geocoder,
        famap::JsonFileStore::new(&cfg.cache),
        famap::RateLimiter::new(cfg.geocoder.min_interval()),
    )
    .with_context(|| format!("load geocode cache '{}'", cfg.cache.display()))?;
    let compositor = famap::IconCompositor::new(&cfg.pins_dir, cfg.palette());

    let map = famap::build_map(&dataset, &mut cache, &compositor)?;
    tracing::info!(
        lookups = cache.lookups(),
        cached = cache.len(),
        "resolved places"
    );

    let out = famap::write_html(&map, &cfg.out)?;
    println!("Map saved to {}", out.display());
    Ok(())
}
