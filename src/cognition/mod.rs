//! # Módulo Cognition — Atenção, Síntese e Consciência
//!
//! Os componentes que operam **sobre** o grafo durante um ciclo:
//!
//! | Componente | Pergunta que responde |
//! |------------|-----------------------|
//! | [`MetaController`] | em quais conceitos focar, e com que urgência? |
//! | [`DualProcessingEngine`] | qual tensão resolver, e em que conceito novo? |
//! | [`synthesis_rules`] | existe uma síntese conhecida para este par? |
//! | [`CognitiveState`] | como o sistema está: vitalidade, atrito, grounding? |
//!
//! Nenhum deles insere conceitos no grafo; isso é papel do
//! [`Orchestrator`](crate::orchestrator::Orchestrator), depois do portão de segurança.

pub mod awareness;
pub mod dual_processing;
pub mod meta_controller;
pub mod synthesis_rules;

pub use awareness::{
    apply_feedback, detect_emergent_emotion, AwarenessSnapshot, CognitiveState, EmergentEmotion,
    Feedback, FeedbackOutcome, FeedbackReport,
};
pub use dual_processing::{CognitiveSynthesis, DualProcessingEngine, NoSynthesis};
pub use meta_controller::{AttentionAllocation, AttentionMode, MetaController, ProcessingDepth};
pub use synthesis_rules::SynthesisType;
