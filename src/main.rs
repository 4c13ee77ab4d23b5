//! # cognitive-layer — CLI
//!
//! Cada invocação carrega grafo e estado do `data_dir`, executa um comando
//! e persiste o resultado. A saída é sempre JSON em stdout; logs vão para
//! stderr, controlados por `RUST_LOG`.
//!
//! ```bash
//! cognitive-layer init-config > cognitive.toml
//! cognitive-layer cycle --input stimulus.json
//! cognitive-layer feedback --outcome failure --grounding 0.7
//! RUST_LOG=debug cognitive-layer status
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cognitive_layer::cognition::{CognitiveState, Feedback, FeedbackOutcome};
use cognitive_layer::config::CognitiveConfig;
use cognitive_layer::core::ConceptGraph;
use cognitive_layer::orchestrator::{CycleInput, Orchestrator};
use cognitive_layer::persistence::{self, StateFile};

#[derive(Parser)]
#[command(name = "cognitive-layer", version, about = "Síntese dialética sobre um grafo de conceitos")]
struct Cli {
    /// Arquivo de configuração TOML
    #[arg(long, global = true, default_value = "cognitive.toml")]
    config: PathBuf,

    /// Sobrescreve `storage.data_dir`
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Executa um ciclo cognitivo sobre um estímulo JSON (`-` lê de stdin)
    Cycle {
        #[arg(long, short)]
        input: PathBuf,
    },
    /// Aplica feedback sobre a última decisão
    Feedback {
        #[arg(long, value_enum)]
        outcome: OutcomeArg,
        #[arg(long)]
        grounding: Option<f64>,
        #[arg(long)]
        context: Option<String>,
    },
    /// Mostra o estado do sistema
    Status,
    /// Inicia uma nova era cognitiva
    Era { name: String },
    /// Busca conceitos próximos de um embedding JSON (`-` lê de stdin)
    Similar {
        #[arg(long, short)]
        input: PathBuf,
        #[arg(long, default_value_t = 0.5)]
        threshold: f32,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Imprime a configuração padrão em TOML
    InitConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutcomeArg {
    Success,
    Failure,
    Unknown,
}

impl From<OutcomeArg> for FeedbackOutcome {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Success => FeedbackOutcome::Success,
            OutcomeArg::Failure => FeedbackOutcome::Failure,
            OutcomeArg::Unknown => FeedbackOutcome::Unknown,
        }
    }
}

/// Grafo, estado e orquestrador carregados do disco.
struct Session {
    orchestrator: Orchestrator,
    graph: ConceptGraph,
    state: CognitiveState,
}

impl Session {
    fn open(config: CognitiveConfig) -> Result<Self> {
        let graph = persistence::load_graph(&config.graph_path())?;
        let StateFile { awareness, violations } = persistence::load_state(&config.state_path())?;
        tracing::info!(
            concepts = graph.len(),
            era = graph.era(),
            cycles = awareness.cycles,
            "Sessão carregada"
        );

        let mut orchestrator = Orchestrator::new(config);
        orchestrator.gate_mut().restore_log(violations);
        Ok(Self {
            orchestrator,
            graph,
            state: awareness,
        })
    }

    fn save(&self) -> Result<()> {
        let config = self.orchestrator.config();
        persistence::save_graph(&config.graph_path(), &self.graph)?;
        persistence::save_state(
            &config.state_path(),
            &StateFile {
                awareness: self.state.clone(),
                violations: self.orchestrator.gate().violations().to_vec(),
            },
        )
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = CognitiveConfig::load(&cli.config)
        .with_context(|| format!("Configuração inválida em {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    match cli.command {
        Command::InitConfig => {
            print!("{}", config.to_toml());
        }
        Command::Cycle { input } => {
            let stimulus = CycleInput::from_json(&read_input(&input)?)
                .with_context(|| format!("Estímulo inválido em {}", input.display()))?;
            let mut session = Session::open(config)?;
            let report = session
                .orchestrator
                .run_cycle(&mut session.graph, &mut session.state, stimulus);
            session.save()?;
            print_json(&report)?;
        }
        Command::Feedback {
            outcome,
            grounding,
            context,
        } => {
            let feedback = Feedback {
                outcome: outcome.into(),
                context,
                shared_grounding: grounding,
            };
            let mut session = Session::open(config)?;
            let report = session
                .orchestrator
                .learn_from_feedback(&mut session.graph, &mut session.state, &feedback);
            session.save()?;
            print_json(&report)?;
        }
        Command::Status => {
            let session = Session::open(config)?;
            print_json(&session.orchestrator.status(&session.graph, &session.state))?;
        }
        Command::Era { name } => {
            let mut session = Session::open(config)?;
            let pruned = session.orchestrator.evolve_era(&mut session.graph, &name);
            session.save()?;
            print_json(&serde_json::json!({
                "era": session.graph.era(),
                "pruned": pruned,
                "remaining": session.graph.len(),
            }))?;
        }
        Command::Similar {
            input,
            threshold,
            limit,
        } => {
            let query: Vec<f32> = serde_json::from_str(&read_input(&input)?)
                .with_context(|| format!("Embedding inválido em {}", input.display()))?;
            let session = Session::open(config)?;
            let hits: Vec<_> = session
                .graph
                .find_similar(&query, threshold, limit)
                .into_iter()
                .filter_map(|(id, score)| {
                    session
                        .graph
                        .get(id)
                        .map(|c| serde_json::json!({ "id": id, "name": c.name, "similarity": score }))
                })
                .collect();
            print_json(&hits)?;
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Falha ao ler stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Falha ao ler {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
