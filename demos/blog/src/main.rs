use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pennant::config::SiteConfig;
use pennant::content::ContentRepository;
use pennant::newsletter::{ConvertKit, NewsletterForm, SubscriptionStatus};
use pennant::routes::{self, RouteTable};
use pennant::{DiskStorage, Site};
use tracing_subscriber::EnvFilter;

/// Builds the demo blog.
#[derive(Parser)]
#[command(name = "blog", about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every route into `<root>/public`.
    Build {
        /// The directory containing `site.toml` and `content/`.
        #[arg(long, default_value = "demos/blog")]
        root: PathBuf,
    },
    /// Sign an email address up for the newsletter.
    Subscribe {
        #[arg(long, default_value = "demos/blog")]
        root: PathBuf,
        email: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Build { root } => build(&root),
        Commands::Subscribe { root, email } => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(subscribe(&root, &email))
        }
    }
}

fn load_config(root: &Path) -> Result<SiteConfig> {
    let config_path = root.join("site.toml");

    SiteConfig::from_path(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))
}

fn build(root: &Path) -> Result<()> {
    let config = load_config(root)?;
    let routes: &RouteTable = routes::install(RouteTable::for_scheme(config.routes))?;

    let content = ContentRepository::load(root.join("content"), config.words_per_minute)
        .context("failed to load content")?;

    let site = Site::builder()
        .config(config)
        .content(content)
        .routes(*routes)
        .build()?;

    let output_path = root.join("public");
    let report = site
        .render_to(&DiskStorage::new(output_path.clone()))
        .context("failed to render site")?;

    tracing::info!(
        routes = report.paths.len(),
        warnings = report.warnings.len(),
        output = %output_path.display(),
        "Wrote site"
    );

    Ok(())
}

async fn subscribe(root: &Path, email: &str) -> Result<()> {
    let config = load_config(root)?;
    let Some(newsletter) = config.newsletter.as_ref() else {
        bail!("site.toml has no [newsletter] section");
    };

    let convertkit = ConvertKit::from_config(newsletter)?;
    let mut form = NewsletterForm::new();

    match form.submit(&convertkit, email).await {
        SubscriptionStatus::Success => {
            tracing::info!(email, "Subscribed");
            Ok(())
        }
        SubscriptionStatus::Failed => bail!("the subscription request failed"),
        SubscriptionStatus::Idle => match form.error() {
            Some(err) => bail!("{err}"),
            None => bail!("the form was not submitted"),
        },
    }
}
