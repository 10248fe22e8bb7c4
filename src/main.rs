//! Platform Versioner
//!
//! Prints the platform a cluster runs (Kubernetes or OpenShift) together with
//! its versions, or a bare `true`/`false` OpenShift answer with `--bool`.

use anyhow::Context;
use backoff::ExponentialBackoff;
use clap::Parser;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Config;
use std::future::Future;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use platform_versioner::{detect_openshift, Error, K8sBasedPlatformVersioner, PlatformVersioner};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Platform Versioner - Kubernetes/OpenShift platform detection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kubeconfig file (defaults to $KUBECONFIG, ~/.kube/config, then in-cluster)
    #[arg(long, env = "KUBECONFIG_PATH")]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, env = "KUBE_CONTEXT")]
    context: Option<String>,

    /// Retries of the whole detection pass on transient failures
    #[arg(long, env = "DETECT_RETRIES", default_value = "0")]
    retries: u32,

    /// Only print whether the cluster is OpenShift
    #[arg(long = "bool")]
    bool_only: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args);

    info!("Starting Platform Versioner {}", platform_versioner::VERSION);

    let config = load_config(&args).await?;
    let versioner = K8sBasedPlatformVersioner::new();
    let versioner: &dyn PlatformVersioner = &versioner;

    if args.bool_only {
        let result = retrying(args.retries, Error::is_retryable, move || {
            detect_openshift(Some(versioner), config.clone())
        })
        .await;

        println!("{}", matches!(result, Ok(true)));
        result?;
        return Ok(());
    }

    let info = retrying(
        args.retries,
        |err: &platform_versioner::DetectionError| err.source.is_retryable(),
        move || versioner.platform_info(None, config.clone()),
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

// =============================================================================
// Configuration
// =============================================================================

/// Build a connection config from CLI flags, or leave it to the library's defaulting
async fn load_config(args: &Args) -> anyhow::Result<Option<Config>> {
    if args.kubeconfig.is_none() && args.context.is_none() {
        return Ok(None);
    }

    let options = KubeConfigOptions {
        context: args.context.clone(),
        ..Default::default()
    };

    let config = match &args.kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path)
                .with_context(|| format!("Invalid kubeconfig: {}", path.display()))?;
            Config::from_custom_kubeconfig(kubeconfig, &options).await?
        }
        None => Config::from_kubeconfig(&options).await?,
    };

    info!("Using cluster {}", config.cluster_url);
    Ok(Some(config))
}

// =============================================================================
// Retries
// =============================================================================

/// Re-run `op` with exponential backoff while `retryable` allows and attempts remain
async fn retrying<T, E, F, Fut>(
    retries: u32,
    retryable: fn(&E) -> bool,
    mut op: F,
) -> std::result::Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let policy = ExponentialBackoff {
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempt = 0u32;
    backoff::future::retry(policy, move || {
        attempt += 1;
        let current = attempt;
        let fut = op();
        async move {
            fut.await.map_err(|err| {
                if current <= retries && retryable(&err) {
                    warn!("Detection attempt {} failed: {}, retrying", current, err);
                    backoff::Error::transient(err)
                } else {
                    backoff::Error::permanent(err)
                }
            })
        }
    })
    .await
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "kube=info", "tower=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    // Logs go to stderr so stdout stays machine-readable
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
