//! # Camada Cognitiva — Síntese Dialética sobre um Grafo de Conceitos
//!
//! Uma camada de raciocínio que mantém um grafo de conceitos com pesos,
//! propaga ativação, detecta **dualidades** (pares opostos da mesma
//! categoria sob tensão) e resolve a mais aguda num conceito emergente,
//! desde que ele passe por um portão de segurança.
//!
//! ## Arquitetura
//!
//! ```text
//! main (CLI) ──► Orchestrator ──► MetaController   (atenção)
//!                     │      ├──► DualProcessingEngine (síntese)
//!                     │      └──► SafetyGate       (invariantes)
//!                     ▼
//!              ConceptGraph + CognitiveState ◄──► persistence (JSON)
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```
//! use cognitive_layer::cognition::CognitiveState;
//! use cognitive_layer::config::CognitiveConfig;
//! use cognitive_layer::core::{ConceptGraph, ConceptSpec};
//! use cognitive_layer::orchestrator::{CycleInput, Orchestrator};
//!
//! let mut orchestrator = Orchestrator::new(CognitiveConfig::default());
//! let mut graph = ConceptGraph::new();
//! let mut state = CognitiveState::default();
//!
//! let input = CycleInput {
//!     context: "a tense conversation".into(),
//!     concepts: vec![
//!         ConceptSpec::named("FEAR").with_category("emotional"),
//!         ConceptSpec::named("CALM").with_category("emotional"),
//!     ],
//! };
//! let report = orchestrator.run_cycle(&mut graph, &mut state, input);
//! assert_eq!(report.outcome.status(), "success");
//! assert!(graph.find_by_name("COURAGE").is_some());
//! ```

/// Módulo `cognition` — atenção, síntese dual e consciência.
pub mod cognition;

/// Módulo `config` — configuração TOML com padrões por seção.
pub mod config;

/// Módulo `core` — conceitos, links, dualidades, grafo e jardineiro.
pub mod core;

/// Módulo `error` — erros tipados da biblioteca.
pub mod error;

/// Módulo `keywords` — casamento de palavras-chave sem distinção de caixa.
pub mod keywords;

/// Módulo `orchestrator` — o ciclo cognitivo completo.
pub mod orchestrator;

/// Módulo `persistence` — grafo e estado em JSON.
pub mod persistence;

/// Módulo `safety` — invariantes e portão de segurança.
pub mod safety;
