use std::path::Path;
use std::sync::Arc;

use mail_triage::cache;
use mail_triage::config::Config;
use mail_triage::llm::HttpModel;
use mail_triage::pipeline::{Classifier, Pipeline};
use mail_triage::source::GmailSource;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export MODEL_API_KEY=sk-...");
        eprintln!("  export GMAIL_TOKEN=ya29....");
        std::process::exit(1);
    });

    eprintln!("📬 mail-triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model_id);
    eprintln!("   Cache: {}", config.cache_path);
    eprintln!("   Limit: {} messages\n", config.limit);

    let cache = cache::open_or_null(Path::new(&config.cache_path)).await;

    let model = Arc::new(HttpModel::new(
        config.model_endpoint.clone(),
        config.model_id.clone(),
        config.model_api_key.clone(),
        config.model_verbose,
    )?);

    let source = Arc::new(GmailSource::new(config.gmail_token.clone()));

    let classifier = Classifier::new(model, Arc::clone(&cache));
    let pipeline = Pipeline::new(source, cache, classifier);

    let enriched = pipeline.run(config.limit).await?;

    if enriched.is_empty() {
        println!("No recent messages found.");
        return Ok(());
    }

    for (i, item) in enriched.iter().enumerate() {
        println!("[{}] {}", i + 1, item.message.subject);
        println!("    From: {}", item.message.sender);
        println!("    Date: {}", item.message.date);
        println!(
            "    Triage: {:?} / {:?} / respond: {:?}",
            item.analysis.category, item.analysis.priority, item.analysis.needs_response
        );
        println!();
    }

    Ok(())
}
