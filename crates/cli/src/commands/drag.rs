//! `lengthwise drag`: Replay panel heights from stdin, one per line.
//!
//! Heights are debounced like a live resize. Each settled height becomes a
//! rewrite; a response that arrives after a newer rewrite began is dropped.

use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use lengthwise_client::{ResizeDebouncer, RewriteSession};
use lengthwise_config::AppConfig;
use tracing::warn;

use super::rewrite::{StyleArgs, print_enhanced};

#[derive(Debug, Clone, clap::Args)]
pub struct DragArgs {
    #[command(flatten)]
    pub style: StyleArgs,

    /// Print settled targets without calling the gateway
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: DragArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let content = match (&args.style.file, args.dry_run) {
        (Some(path), _) => super::read_source(Some(path.as_path()))?,
        (None, true) => String::new(),
        (None, false) => return Err("drag reads heights from stdin; pass the draft with --file".into()),
    };

    let quiet = Duration::from_millis(config.client.debounce_ms);
    let (debouncer, mut targets) = ResizeDebouncer::spawn(quiet);

    // Dropping the debouncer at EOF flushes the last height.
    let reader = tokio::task::spawn_blocking(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<u32>() {
                Ok(height) => {
                    if !debouncer.push(height) {
                        break;
                    }
                }
                Err(_) => warn!(line = %line, "Ignoring non-numeric height"),
            }
        }
    });

    let client = Arc::new(args.style.client(&config));
    let policy = args.style.retry_policy(&config);
    let session = Arc::new(RewriteSession::new());
    let mut jobs = Vec::new();

    while let Some(target) = targets.recv().await {
        if args.dry_run {
            println!("{target}");
            continue;
        }
        eprintln!("Settled at {target} words, rewriting...");

        let request = args.style.request(&config, &content, target);
        let ticket = session.begin();
        let client = client.clone();
        let session = session.clone();
        jobs.push(tokio::spawn(async move {
            let result = client.enhance_with_retry(&request, &policy).await;
            match session.accept(ticket, result) {
                Some(Ok(enhanced)) => print_enhanced(&enhanced, target),
                Some(Err(err)) => eprintln!("Rewrite to {target} words failed: {err}"),
                None => eprintln!("Discarded stale rewrite for {target} words"),
            }
        }));
    }

    for job in jobs {
        job.await?;
    }
    reader.await?;

    Ok(())
}
