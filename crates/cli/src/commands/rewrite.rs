//! `lengthwise rewrite`: Rewrite a draft to a target length via the gateway.

use std::path::PathBuf;

use lengthwise_client::{ClientError, EnhanceClient, Enhanced, RetryPolicy};
use lengthwise_config::AppConfig;
use lengthwise_core::rewrite::{DocumentType, LengthPreset, RewriteRequest, ToneDescriptor};
use lengthwise_core::text;

/// Options shared by `rewrite` and `drag`.
#[derive(Debug, Clone, clap::Args)]
pub struct StyleArgs {
    /// Read the draft from a file instead of stdin
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Tone of the rewrite
    #[arg(short, long, default_value = ToneDescriptor::DEFAULT)]
    pub tone: String,

    /// Fold the configured persona into the tone
    #[arg(long)]
    pub persona: bool,

    /// Document type; `email` adds a subject line
    #[arg(long = "type", default_value = "email")]
    pub doc_type: String,

    /// Gateway base URL (overrides config)
    #[arg(long)]
    pub backend: Option<String>,

    /// Do not retry rewrites that come back too long
    #[arg(long)]
    pub no_retry: bool,
}

impl StyleArgs {
    pub fn tone(&self, config: &AppConfig) -> ToneDescriptor {
        if self.persona {
            ToneDescriptor::with_persona(&self.tone, &config.persona)
        } else {
            ToneDescriptor::new(&self.tone)
        }
    }

    pub fn client(&self, config: &AppConfig) -> EnhanceClient {
        let mut client_config = config.client.clone();
        if let Some(url) = &self.backend {
            client_config.backend_url = url.clone();
        }
        EnhanceClient::from_config(&client_config)
    }

    pub fn retry_policy(&self, config: &AppConfig) -> RetryPolicy {
        if self.no_retry {
            RetryPolicy::once()
        } else {
            RetryPolicy::from_config(&config.client)
        }
    }

    pub fn request(&self, config: &AppConfig, content: &str, target_words: u32) -> RewriteRequest {
        RewriteRequest::new(
            content,
            self.tone(config),
            target_words,
            DocumentType::from(self.doc_type.as_str()),
        )
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct RewriteArgs {
    #[command(flatten)]
    pub style: StyleArgs,

    /// Exact target word count
    #[arg(short, long, conflicts_with_all = ["preset", "height"])]
    pub words: Option<u32>,

    /// Length preset: concise, balanced or detailed
    #[arg(short, long, conflicts_with = "height")]
    pub preset: Option<LengthPreset>,

    /// Derive the target from a panel height in pixels
    #[arg(long)]
    pub height: Option<u32>,
}

impl RewriteArgs {
    /// Explicit words win, then height, then preset (balanced by default).
    pub fn target_words(&self, content: &str) -> u32 {
        if let Some(words) = self.words {
            return words;
        }
        if let Some(height) = self.height {
            return text::words_for_height(height);
        }
        self.preset.unwrap_or_default().target_words(content)
    }
}

pub async fn run(args: RewriteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let content = super::read_source(args.style.file.as_deref())?;

    let target = args.target_words(&content);
    let request = args.style.request(&config, &content, target);
    let client = args.style.client(&config);
    let policy = args.style.retry_policy(&config);

    eprintln!(
        "Rewriting {} words to {target} words ({} tone)...",
        request.current_words(),
        request.tone
    );

    match client.enhance_with_retry(&request, &policy).await {
        Ok(enhanced) => {
            print_enhanced(&enhanced, target);
            Ok(())
        }
        Err(err) => Err(report_failure(err)),
    }
}

pub fn print_enhanced(enhanced: &Enhanced, target: u32) {
    if let Some(subject) = &enhanced.subject {
        println!("Subject: {subject}\n");
    }
    println!("{}", enhanced.content);
    eprintln!("\n({} words, target {target})", enhanced.word_count);
}

/// Show the rejected draft, if any, and turn the failure into a CLI error.
pub fn report_failure(err: ClientError) -> Box<dyn std::error::Error> {
    if let Some(draft) = err.draft() {
        eprintln!("Rejected draft ({} words):", text::count_words(draft));
        if let Some(subject) = err.draft_subject() {
            eprintln!("Subject: {subject}\n");
        }
        eprintln!("{draft}\n");
    }
    Box::new(err)
}
