//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_knowledge_adapter::JsonKnowledgeAdapter;
use crate::domain::analyzer::Analyzer;
use crate::domain::config_validation::{AppConfig, build_app_config};
use crate::domain::error::HeliosError;
use crate::domain::graph::KnowledgeBase;
use crate::domain::recommendation::{Recommendation, RecommendationEngine};
use crate::ports::knowledge_port::KnowledgeSource;

#[derive(Parser, Debug)]
#[command(name = "helios", about = "Headline impact analysis and paper trading")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Explain the causal impact of a headline
    Explain {
        #[arg(required = true, num_args = 1..)]
        headline: Vec<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },
    /// Suggest trades for a story
    Recommend {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Ticker mentioned by the story, if any
        #[arg(short, long)]
        symbol: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },
    /// Load and check a knowledge base
    Validate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        graph: Option<PathBuf>,
    },
    /// Start the HTTP API
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Explain {
            headline,
            config,
            graph,
        } => run_explain(&headline.join(" "), config.as_ref(), graph.as_ref()),
        Command::Recommend {
            text,
            symbol,
            config,
            graph,
        } => run_recommend(
            &text.join(" "),
            symbol.as_deref(),
            config.as_ref(),
            graph.as_ref(),
        ),
        Command::Validate { config, graph } => run_validate(config.as_ref(), graph.as_ref()),
        Command::Serve { config } => run_serve(&config),
    };

    match result {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, HeliosError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| HeliosError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Validated settings from an optional INI file; no file means all defaults.
pub fn resolve_app_config(config_path: Option<&PathBuf>) -> Result<AppConfig, HeliosError> {
    let adapter = match config_path {
        Some(path) => load_config(path)?,
        None => FileConfigAdapter::empty(),
    };
    build_app_config(&adapter)
}

/// A `--graph` flag wins over `[knowledge] graph_path`; neither means the built-in graph.
pub fn load_knowledge(
    app_config: &AppConfig,
    graph_override: Option<&PathBuf>,
) -> Result<KnowledgeBase, HeliosError> {
    let path = graph_override.or(app_config.graph_path.as_ref());
    JsonKnowledgeAdapter::from_optional_path(path.map(PathBuf::as_path)).load()
}

pub fn explain(headline: &str, knowledge: KnowledgeBase) -> Result<String, HeliosError> {
    let headline = headline.trim();
    if headline.is_empty() {
        return Err(HeliosError::MissingInput {
            field: "headline".into(),
        });
    }
    let analyzer = Analyzer::from_knowledge_base(knowledge)?;
    Ok(analyzer.analyze(headline).explanation)
}

pub fn format_recommendations(recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        return "No recommendations.\n".to_string();
    }
    recommendations
        .iter()
        .map(|r| {
            format!(
                "{:<5} {:<8} {} (confidence {:.2}): {}\n",
                r.action.to_string(),
                r.suggested_symbol,
                r.entity,
                r.confidence,
                r.rationale
            )
        })
        .collect()
}

fn run_explain(
    headline: &str,
    config_path: Option<&PathBuf>,
    graph_path: Option<&PathBuf>,
) -> Result<String, HeliosError> {
    let app_config = resolve_app_config(config_path)?;
    let knowledge = load_knowledge(&app_config, graph_path)?;
    explain(headline, knowledge)
}

fn run_recommend(
    text: &str,
    symbol: Option<&str>,
    config_path: Option<&PathBuf>,
    graph_path: Option<&PathBuf>,
) -> Result<String, HeliosError> {
    let app_config = resolve_app_config(config_path)?;
    let analyzer = Analyzer::from_knowledge_base(load_knowledge(&app_config, graph_path)?)?;
    let engine = RecommendationEngine::with_overrides(app_config.symbols);
    let report = analyzer.analyze(text.trim());
    Ok(format_recommendations(&engine.recommend(&report, symbol)))
}

fn run_validate(
    config_path: Option<&PathBuf>,
    graph_path: Option<&PathBuf>,
) -> Result<String, HeliosError> {
    let app_config = resolve_app_config(config_path)?;
    let knowledge = load_knowledge(&app_config, graph_path)?;
    let entities = knowledge.graph.entity_count();
    let links = knowledge.graph.link_count();
    let aliases = knowledge.keyword_aliases.len();
    // Builds the classifier too, which resolves every keyword alias.
    Analyzer::from_knowledge_base(knowledge)?;
    Ok(format!(
        "Knowledge base OK: {entities} entities, {links} links, {aliases} keyword aliases\n"
    ))
}

fn run_serve(config_path: &Path) -> Result<String, HeliosError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};

        let app_config = resolve_app_config(Some(&config_path.to_path_buf()))?;
        let knowledge = load_knowledge(&app_config, None)?;
        let state = AppState::new(&app_config, knowledge)?;
        let router = build_router(state);
        let addr = app_config.listen;

        info!("Starting web server on {}", addr);
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        })?;
        Ok(String::new())
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        Err(HeliosError::ConfigInvalid {
            section: "web".into(),
            key: "feature".into(),
            reason: "helios was built without the web feature".into(),
        })
    }
}
