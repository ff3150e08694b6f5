// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! CRPT document submission tool
//!
//! Submits one LP_INTRODUCE_GOODS document to GIS MT and prints the
//! identifier of the created document.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured):
//!
//! - `CRPT_TOKEN`: bearer token
//! - `CRPT_BASE_URL`: API base URL (default: https://ismp.crpt.ru)
//! - `CRPT_PRODUCT_GROUP`: default product group
//! - `CRPT_RATE_LIMIT`: requests per window (default: 100)
//! - `CRPT_RATE_WINDOW_MS`: window length in milliseconds (default: 60000)
//! - `CRPT_CONNECT_TIMEOUT_MS`: connect timeout (default: 20000)
//! - `CRPT_USER_AGENT`: User-Agent header (default: crpt-client/<version>)

use anyhow::Context;
use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crpt_client::{
    config::Config,
    document::{Document, ProductGroup},
    CancelSignal, CrptClient, FixedTokenProvider,
};

#[derive(Parser)]
#[command(name = "crpt-submit", about = "Submit an LP_INTRODUCE_GOODS document to GIS MT")]
struct Args {
    /// Path to the document JSON
    #[arg(long)]
    document: PathBuf,

    /// Path to the detached signature (Base64 text)
    #[arg(long)]
    signature: PathBuf,

    /// Product group, overriding CRPT_PRODUCT_GROUP
    #[arg(long)]
    product_group: Option<ProductGroup>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env().context("loading configuration")?;
    info!(
        base_url = %config.base_url,
        rate_limit = config.rate_limit.limit,
        window_ms = config.rate_limit.window_ms,
        "Starting CRPT submission"
    );

    let raw = std::fs::read_to_string(&args.document)
        .with_context(|| format!("reading {}", args.document.display()))?;
    let document: Document = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.document.display()))?;
    let signature = std::fs::read_to_string(&args.signature)
        .with_context(|| format!("reading {}", args.signature.display()))?;

    let tokens = Arc::new(FixedTokenProvider::from(config.token.clone()));
    let client = CrptClient::from_config(&config, tokens)?;

    let cancel = CancelSignal::new();
    let group = args.product_group.map(|g| g.as_str());
    let submission =
        client.create_document_with_cancel(&document, signature.trim(), group, &cancel);
    let id = run_interruptible(submission, interrupted(), &cancel).await?;

    println!("{id}");
    Ok(())
}

/// Resolve on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Drive `submission` to completion unless `interrupt` fires first.
///
/// An interrupt cancels a pending rate limit wait through `cancel` and
/// abandons the submission at whatever stage it has reached, including a
/// request already on the wire.
async fn run_interruptible<T, S, I>(
    submission: S,
    interrupt: I,
    cancel: &CancelSignal,
) -> anyhow::Result<T>
where
    S: Future<Output = crpt_client::Result<T>>,
    I: Future<Output = ()>,
{
    tokio::select! {
        result = submission => Ok(result?),
        _ = interrupt => {
            warn!("Interrupted, abandoning submission");
            cancel.cancel();
            anyhow::bail!("interrupted before the document was created")
        }
    }
}
