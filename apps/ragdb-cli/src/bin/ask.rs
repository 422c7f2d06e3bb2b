use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};

use ragdb_core::config::{Config, EngineOptions};
use ragdb_core::traits::Generator;
use ragdb_core::types::{QueryMode, QueryRequest};
use ragdb_embed::{get_default_embedder, DEFAULT_DIM};
use ragdb_engine::{MemoryPassageStore, RagEngine};
use ragdb_llm::OpenAiGenerator;

/// Placeholder for retrieval-only runs; never invoked on that path.
struct UnavailableGenerator;

#[async_trait]
impl Generator for UnavailableGenerator {
    async fn complete(&self, _system: &str, _user: &str) -> anyhow::Result<String> {
        anyhow::bail!("no generator configured, set OPENAI_API_KEY")
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    ).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <data_dir> <query> [--mode concise|detailed|research]", args[0]);
        eprintln!("Example: {} ./docs 'how do I rotate crops?' --mode concise", args[0]);
        eprintln!("Set APP_USE_FAKE_EMBEDDINGS=1 for offline embeddings;");
        eprintln!("set OPENAI_API_KEY to enable answer generation.");
        std::process::exit(1);
    }
    let data_dir = PathBuf::from(&args[1]);
    let query_text = args[2].clone();
    let mut mode = QueryMode::Detailed;
    let mut i = 3;
    while i < args.len() {
        if args[i] == "--mode" && i + 1 < args.len() {
            mode = match args[i + 1].as_str() {
                "concise" => QueryMode::Concise,
                "detailed" => QueryMode::Detailed,
                "research" => QueryMode::Research,
                other => { eprintln!("Unknown mode '{}'", other); std::process::exit(1); }
            };
            i += 1;
        }
        i += 1;
    }

    let options = match Config::load() {
        Ok(cfg) => EngineOptions::from_config(&cfg),
        Err(_) => EngineOptions::default(),
    };
    let embedder = get_default_embedder(DEFAULT_DIM)?;
    let generator: Option<Arc<dyn Generator>> =
        OpenAiGenerator::from_env().ok().map(|g| Arc::new(g) as Arc<dyn Generator>);
    let retrieval_only = generator.is_none();

    println!("🔍 ragdb-ask\n============");
    println!("Corpus: {}", data_dir.display());
    println!("Query: {}", query_text);

    let generator = generator.unwrap_or_else(|| Arc::new(UnavailableGenerator));
    let engine = RagEngine::new(Arc::new(MemoryPassageStore::new()), embedder, generator, options);

    // Ingest every .txt/.md file under the corpus directory.
    let files: Vec<PathBuf> = walkdir::WalkDir::new(&data_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| matches!(p.extension().and_then(|s| s.to_str()), Some("txt") | Some("md")))
        .collect();
    if files.is_empty() {
        eprintln!("No .txt or .md files found under {}", data_dir.display());
        std::process::exit(1);
    }
    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")?);
    for file in &files {
        let name = file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        bar.set_message(name.clone());
        let text = std::fs::read_to_string(file)?;
        match engine.ingest(&name, &text).await {
            Ok(doc) => bar.println(format!("  📄 {} -> {} passages", name, doc.total_passages)),
            Err(e) => bar.println(format!("  ⚠️  {} skipped: {}", name, e)),
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let request = QueryRequest { query: query_text, mode, document_scope: None };

    if retrieval_only {
        println!("\nℹ️  OPENAI_API_KEY not set, showing retrieval results only.\n");
        let results = engine.retrieve(&request).await?;
        if results.is_empty() {
            println!("No relevant passages found.");
            return Ok(());
        }
        for (i, r) in results.iter().enumerate() {
            println!(
                "  {}. similarity={:.4} distance={:.4} doc={}",
                i + 1, r.similarity, r.distance, r.document_name
            );
            println!("     📝 {}", r.text);
        }
        return Ok(());
    }

    let response = engine.query(&request).await?;
    println!("\n💬 Answer (faithfulness {:.2}{}):\n", response.faithfulness,
        if response.refused { ", refused" } else { "" });
    println!("{}", response.answer);
    if !response.citations.is_empty() {
        println!("\n📚 Citations:");
        for (i, c) in response.citations.iter().enumerate() {
            println!("  [{}] {} (similarity {:.4})", i + 1, c.document_name, c.similarity);
            println!("      {}", c.text);
        }
    }
    println!(
        "\n🔎 Retrieval: {} passages considered",
        response.retrieval.count
    );
    Ok(())
}
