use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead, Read};
use std::path::PathBuf;
use std::sync::Arc;
use wordpack_lexicon::LexicalFilter;
use wordpack_llm::{build_client, LlmMode, LlmSettings, NoopRetriever, Retriever, StaticRetriever};
use wordpack_protocol::{
    normalize_lemma, schema_document, serialize_json, serialize_json_pretty, ExampleCategory,
    RegenerateScope, SynthesisRequest, WordPack,
};
use wordpack_synth::{
    build_example_prompt, SynthConfig, SynthesisReport, WordPackStore, WordPackSynthesizer,
};

mod errors;

#[derive(Parser)]
#[command(name = "wordpack")]
#[command(about = "Synthesize vocabulary study packs with an LLM", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for output)
    #[arg(long, global = true)]
    quiet: bool,

    /// Override the LLM backend (WORDPACK_LLM_MODE)
    #[arg(long, global = true, value_enum)]
    llm_mode: Option<LlmModeArg>,

    /// Override the chat model id (WORDPACK_LLM_MODEL)
    #[arg(long, global = true)]
    llm_model: Option<String>,

    /// Override the OpenAI-compatible base URL (WORDPACK_LLM_BASE_URL)
    #[arg(long, global = true)]
    llm_base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a word pack from a JSON request
    Synth(SynthArgs),

    /// Keep only terms worth studying from imported article vocabulary
    Filter(FilterArgs),

    /// Print the example-generation prompt for one category
    Prompt(PromptArgs),

    /// Print the JSON Schema of requests and word packs
    Schema,
}

#[derive(Args)]
struct SynthArgs {
    /// Inline JSON request (mutually exclusive with --file)
    #[arg(long, conflicts_with = "file")]
    json: Option<String>,

    /// Path to file containing the JSON request
    #[arg(long)]
    file: Option<PathBuf>,

    /// TOML synthesis config
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON corpus of `{"text", "source"}` snippets used for citations
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Pack store; supplies the previous pack for scoped regeneration and receives the result
    #[arg(long)]
    store: Option<PathBuf>,

    /// Expand example categories concurrently
    #[arg(long)]
    parallel: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Emit `{"pack", "report"}` instead of the bare pack
    #[arg(long)]
    report: bool,
}

#[derive(Args)]
struct FilterArgs {
    /// Candidate terms (reads one per line from stdin when omitted)
    words: Vec<String>,

    /// Output a JSON array instead of one term per line
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PromptArgs {
    #[arg(long)]
    lemma: String,

    /// Dev, CS, LLM, Business or Common
    #[arg(long)]
    category: ExampleCategory,

    #[arg(long, default_value_t = 5)]
    count: usize,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LlmModeArg {
    Openai,
    Offline,
}

impl From<LlmModeArg> for LlmMode {
    fn from(value: LlmModeArg) -> Self {
        match value {
            LlmModeArg::Openai => Self::OpenAi,
            LlmModeArg::Offline => Self::Offline,
        }
    }
}

#[derive(Serialize)]
struct SynthOutput<'a> {
    pack: &'a WordPack,
    report: &'a SynthesisReport,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    if !cli.verbose {
        builder.filter_module("reqwest", log::LevelFilter::Warn);
        builder.filter_module("hyper_util", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();

    if let Err(err) = run(cli).await {
        log::error!("{err:#}");
        let envelope = errors::envelope_for(&err);
        match serialize_json(&envelope) {
            Ok(body) => println!("{body}"),
            Err(_) => eprintln!("Error: {err:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Synth(ref args) => run_synth(&cli, args).await,
        Commands::Filter(ref args) => run_filter(args),
        Commands::Prompt(ref args) => {
            let lemma = normalize_lemma(&args.lemma);
            println!("{}", build_example_prompt(&lemma, args.category, args.count));
            Ok(())
        }
        Commands::Schema => {
            println!("{}", serialize_json_pretty(&schema_document()?)?);
            Ok(())
        }
    }
}

fn llm_settings(cli: &Cli) -> Result<LlmSettings> {
    let mut settings = LlmSettings::from_env().context("Invalid LLM settings in environment")?;
    if let Some(mode) = cli.llm_mode {
        settings.mode = mode.into();
    }
    if let Some(model) = &cli.llm_model {
        settings.model = model.clone();
    }
    if let Some(base_url) = &cli.llm_base_url {
        settings.base_url = base_url.clone();
    }
    Ok(settings)
}

async fn run_synth(cli: &Cli, args: &SynthArgs) -> Result<()> {
    let raw = read_payload(args)?;
    let mut request: SynthesisRequest =
        serde_json::from_str(&raw).context("Invalid JSON passed to --json/--file")?;

    let mut config = match &args.config {
        Some(path) => SynthConfig::load(path)
            .await
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SynthConfig::default(),
    };
    if args.parallel {
        config.parallel_examples = true;
    }

    let settings = llm_settings(cli)?;
    let llm = build_client(&settings).context("Failed to build LLM backend")?;
    log::info!("Using LLM backend '{}' ({})", llm.name(), settings.mode.as_str());

    let retriever: Arc<dyn Retriever> = match &args.corpus {
        Some(path) => Arc::new(
            StaticRetriever::load(path)
                .await
                .with_context(|| format!("Failed to load corpus from {}", path.display()))?,
        ),
        None => Arc::new(NoopRetriever),
    };

    let mut store = match &args.store {
        Some(path) => Some(
            WordPackStore::open(path)
                .await
                .with_context(|| format!("Failed to open pack store {}", path.display()))?,
        ),
        None => None,
    };
    if request.previous.is_none() && request.regenerate_scope != RegenerateScope::All {
        if let Some(previous) = store.as_ref().and_then(|s| s.get(&request.lemma)) {
            log::info!("Using stored pack for '{}' as the previous pack", previous.lemma);
            request.previous = Some(previous.clone());
        }
    }

    let synthesizer = WordPackSynthesizer::new(llm, retriever, config)?;
    let outcome = synthesizer.synthesize(request).await;
    if outcome.report.is_degraded() {
        log::warn!("Word pack for '{}' was built in degraded mode", outcome.pack.lemma);
    }

    if let Some(store) = store.as_mut() {
        store.upsert(outcome.pack.clone());
        store.save().await.context("Failed to save pack store")?;
    }

    let body = if args.report {
        let output = SynthOutput {
            pack: &outcome.pack,
            report: &outcome.report,
        };
        render(&output, args.pretty)?
    } else {
        render(&outcome.pack, args.pretty)?
    };
    println!("{body}");
    Ok(())
}

fn run_filter(args: &FilterArgs) -> Result<()> {
    let candidates = if args.words.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<String>>>()
            .context("Failed to read terms from stdin")?
    } else {
        args.words.clone()
    };

    let kept = LexicalFilter::new().filter(&candidates);
    log::debug!("Kept {} of {} candidate terms", kept.len(), candidates.len());
    if args.json {
        println!("{}", serialize_json(&kept)?);
    } else {
        for term in kept {
            println!("{term}");
        }
    }
    Ok(())
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serialize_json_pretty(value)
    } else {
        serialize_json(value)
    }
}

fn read_payload(args: &SynthArgs) -> Result<String> {
    if let Some(raw) = &args.json {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read JSON from stdin")?;

    if buffer.trim().is_empty() {
        anyhow::bail!("Synthesis request is empty. Provide --json, --file, or pipe JSON via stdin.");
    }

    Ok(buffer)
}
