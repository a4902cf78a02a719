use anyhow::{anyhow, Context, Result};
use ask_opentargets::config::{
    AskConfig, DEFAULT_COMPLETION_ENDPOINT, DEFAULT_GRAPH_ENDPOINT, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_USER_AGENT,
};
use ask_opentargets::error::AskError;
use ask_opentargets::extract::{ExtractionScope, ResultExtractor, EXTRACTION_MARKER};
use ask_opentargets::graph::{HttpGraphEndpoint, SchemaIntrospector};
use ask_opentargets::synthesis::AskPipeline;
use ask_opentargets::utils::enumerate_values;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ask-opentargets", version, about = "Ask the Open Targets Platform in plain English", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
    #[arg(long, default_value = DEFAULT_GRAPH_ENDPOINT, global = true)]
    graph_endpoint: String,
    #[arg(long, default_value_t = 120, global = true)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    Ask {
        /// Read from standard input when omitted.
        question: Option<String>,
        #[command(flatten)]
        completion: CompletionArgs,
        /// Only extract from the first search hit.
        #[arg(long)]
        first_hit: bool,
        /// Print the executed query and the raw response on stderr, or the
        /// last rejected query on failure.
        #[arg(long)]
        show_query: bool,
    },
    Types,
    Fields {
        type_name: String,
    },
    Extract {
        file: PathBuf,
        #[arg(long, default_value = EXTRACTION_MARKER)]
        marker: String,
        #[arg(long)]
        first_hit: bool,
    },
}

#[derive(Args)]
struct CompletionArgs {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,
    #[arg(long, default_value = DEFAULT_COMPLETION_ENDPOINT)]
    completion_endpoint: String,
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS, value_parser = clap::value_parser!(u32).range(1..))]
    max_tokens: u32,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn scope(first_hit: bool) -> ExtractionScope {
    if first_hit {
        ExtractionScope::FirstHit
    } else {
        ExtractionScope::Body
    }
}

fn read_question() -> Result<String> {
    eprintln!("How can I help you today?");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("impossible de lire la question sur l'entrée standard")?;
    Ok(line)
}

fn print_values(values: &[impl std::fmt::Display]) {
    if !values.is_empty() {
        println!("{}", enumerate_values(values));
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let timeout = Duration::from_secs(cli.timeout_secs);

    match cli.command {
        Commands::Ask {
            question,
            completion,
            first_hit,
            show_query,
        } => {
            let question = match question {
                Some(question) => question,
                None => read_question()?,
            };
            let question = question.trim();
            if question.is_empty() {
                return Err(anyhow!("question vide"));
            }

            let config = AskConfig::new(completion.api_key)?
                .with_graph_endpoint(cli.graph_endpoint)
                .with_completion_endpoint(completion.completion_endpoint)
                .with_model(completion.model)
                .with_max_tokens(completion.max_tokens)
                .with_timeout(timeout);
            let pipeline = AskPipeline::from_config(&config)?;
            let answer = match pipeline.run(question) {
                Ok(answer) => answer,
                Err(err) => {
                    if show_query {
                        if let Some(query) = err
                            .downcast_ref::<AskError>()
                            .and_then(AskError::rejected_query)
                        {
                            eprintln!("# requête rejetée:\n{}", query);
                        }
                    }
                    return Err(err);
                }
            };

            if show_query {
                eprintln!("# chemin: {}", answer.path);
                eprintln!("{}", answer.executed.query);
                eprintln!("# réponse brute:\n{}", answer.executed.raw_body);
            }

            let values = ResultExtractor::default()
                .with_scope(scope(first_hit))
                .extract(&answer.executed.body);
            info!("chemin" = %answer.path, count = values.len(), "message" = "question traitée");
            print_values(&values);
        }
        Commands::Types => {
            let endpoint = HttpGraphEndpoint::new(cli.graph_endpoint, DEFAULT_USER_AGENT, timeout)?;
            let introspector = SchemaIntrospector::new(Arc::new(endpoint));
            let catalog = introspector.list_types()?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        Commands::Fields { type_name } => {
            let endpoint = HttpGraphEndpoint::new(cli.graph_endpoint, DEFAULT_USER_AGENT, timeout)?;
            let introspector = SchemaIntrospector::new(Arc::new(endpoint));
            println!("{}", introspector.list_fields(&type_name));
        }
        Commands::Extract {
            file,
            marker,
            first_hit,
        } => {
            let data = std::fs::read_to_string(&file)
                .with_context(|| format!("impossible de lire le fichier {:?}", file))?;
            let body: serde_json::Value = serde_json::from_str(&data)
                .with_context(|| format!("JSON invalide dans {:?}", file))?;
            let values = ResultExtractor::new(marker)
                .with_scope(scope(first_hit))
                .extract(&body);
            print_values(&values);
        }
    }

    Ok(())
}
