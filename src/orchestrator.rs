//! # Orquestrador — O Ciclo Cognitivo
//!
//! O [`Orchestrator`] rege um ciclo completo em resposta a um estímulo
//! externo (conceitos materializados + contexto livre):
//!
//! ```text
//! CycleInput
//!   │
//!   ├── 1. INGESTÃO      conceitos entram no grafo (nomes e contexto em NFC)
//!   ├── 2. PROPAGAÇÃO    spreading activation a partir dos novos ids
//!   ├── 3. CONSCIÊNCIA   tom, certeza e carga a partir dos ativos (≥ 0.3)
//!   ├── 4. ATENÇÃO       MetaController escolhe regime, foco e urgência
//!   ├── 5. SÍNTESE       DualProcessingEngine sobre o foco
//!   ├── 6. SEGURANÇA     SafetyGate: rejeita (log) ou aceita
//!   │     └── aceita → insere o emergente + links synthesized_from (0.8) → catarse?
//!   ├── 7. EMOÇÃO        constelações emocionais ativas
//!   ├── 8. PODA          jardineiro (em todos os caminhos, inclusive rejeição)
//!   └── 9. HOMEOSTASE    vitalidade e atrito derivam para a zona áurea
//! ```
//!
//! ## Estado Explícito
//!
//! O orquestrador não guarda grafo nem consciência: ambos entram por
//! referência em [`run_cycle`](Orchestrator::run_cycle). Quem precisar
//! compartilhar o grafo entre threads usa [`SharedGraph`]
//! (`Arc<RwLock<ConceptGraph>>`), e todas as mutações passam por um único
//! escritor.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::cognition::{
    apply_feedback, detect_emergent_emotion, AttentionAllocation, AttentionMode, AwarenessSnapshot,
    CognitiveState, CognitiveSynthesis, DualProcessingEngine, EmergentEmotion, Feedback, FeedbackReport,
    MetaController, NoSynthesis, ProcessingDepth, SynthesisType,
};
use crate::config::CognitiveConfig;
use crate::error::Result;
use crate::core::{
    discover_dualities, Concept, ConceptGraph, ConceptId, ConceptSpec, DualitySummary, Properties,
    RelationKind,
};
use crate::safety::{SafetyGate, SafetyReport, SafetyViolation};

/// Grafo compartilhado entre threads, com um único escritor por vez.
pub type SharedGraph = Arc<RwLock<ConceptGraph>>;

/// Estímulo de um ciclo.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CycleInput {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub concepts: Vec<ConceptSpec>,
}

impl CycleInput {
    /// Lê um estímulo JSON. Erros de sintaxe viram [`CognitiveError::Json`](crate::error::CognitiveError::Json).
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttentionSummary {
    pub mode: AttentionMode,
    pub depth: ProcessingDepth,
    pub urgency: f64,
    /// Nomes dos conceitos em foco.
    pub focus: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SynthesisSummary {
    pub new_concept: String,
    pub concept_id: ConceptId,
    #[serde(rename = "type")]
    pub kind: SynthesisType,
    pub reasoning: String,
    pub confidence: f64,
    pub properties: Properties,
    pub catharsis: bool,
}

/// Resultado de um ciclo, etiquetado por `status`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleOutcome {
    Success {
        synthesis: SynthesisSummary,
        duality: DualitySummary,
        attention: AttentionSummary,
    },
    NoSynthesis {
        reason: NoSynthesis,
        active_concepts: Vec<String>,
        attention: AttentionSummary,
    },
    Rejected {
        reason: &'static str,
        violation: SafetyViolation,
    },
}

impl CycleOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            CycleOutcome::Success { .. } => "success",
            CycleOutcome::NoSynthesis { .. } => "no_synthesis",
            CycleOutcome::Rejected { .. } => "rejected",
        }
    }
}

/// Registro de decisão devolvido ao chamador.
#[derive(Clone, Debug, Serialize)]
pub struct CycleReport {
    #[serde(flatten)]
    pub outcome: CycleOutcome,
    /// Conceitos esquecidos pelo jardineiro neste ciclo.
    pub pruned: Vec<ConceptId>,
    pub awareness: AwarenessSnapshot,
    pub emergent_emotion: Option<EmergentEmotion>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StatusReport {
    pub era: String,
    pub total_concepts: usize,
    pub active_concepts: usize,
    pub emergent_concepts: usize,
    pub cycles: u64,
    pub attention_decisions: u64,
    pub awareness: AwarenessSnapshot,
    pub safety: SafetyReport,
}

/// Coordena meta-controlador, motor de síntese e portão de segurança.
pub struct Orchestrator {
    config: CognitiveConfig,
    meta: MetaController,
    engine: DualProcessingEngine,
    gate: SafetyGate,
}

impl Orchestrator {
    pub fn new(config: CognitiveConfig) -> Self {
        let engine = DualProcessingEngine::new(config.synthesis.clone(), config.duality.clone());
        let gate = SafetyGate::new(config.safety.clone());
        Self {
            config,
            meta: MetaController::new(),
            engine,
            gate,
        }
    }

    pub fn config(&self) -> &CognitiveConfig {
        &self.config
    }

    pub fn gate(&self) -> &SafetyGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut SafetyGate {
        &mut self.gate
    }

    /// Executa um ciclo cognitivo completo.
    pub fn run_cycle(
        &mut self,
        graph: &mut ConceptGraph,
        state: &mut CognitiveState,
        input: CycleInput,
    ) -> CycleReport {
        let context: String = input.context.nfc().collect();
        let ctx = Some(context.as_str()).filter(|c| !c.is_empty());

        // 1. Ingestão
        let sources: Vec<ConceptId> = input
            .concepts
            .into_iter()
            .map(|spec| graph.add_concept(spec.into_concept()))
            .collect();

        // 2. Propagação
        let activation = &self.config.activation;
        graph.spreading_activation(&sources, activation.initial, activation.decay_factor, activation.max_hops);

        // 3-5. Consciência, atenção e síntese sobre um snapshot imutável do grafo
        let (attention, active_names, processed) = {
            let active = graph.active_concepts(activation.active_threshold);
            state.observe(&active, &context);

            let allocation = self
                .meta
                .allocate_attention(&active, ctx, state.vitality, state.friction);
            let focus: Vec<&Concept> = allocation.focus.iter().filter_map(|id| graph.get(*id)).collect();

            let dualities = discover_dualities(&focus, &self.config.duality);
            if let Some(primary) = self.meta.select_primary_duality(&dualities, ctx) {
                let tension = self
                    .meta
                    .sensitivity()
                    .modulate_friction(primary.friction, &primary.category, ctx);
                state.register_tension(tension);
            }

            let processed = self.engine.process(&focus, ctx);
            let names: Vec<String> = active.iter().map(|c| c.name.clone()).collect();
            (summarize_attention(&allocation, graph), names, processed)
        };

        // 6. Segurança e commit
        let outcome = match processed {
            Ok(synthesis) => match self.gate.check(&synthesis, ctx, state.shared_grounding) {
                Ok(()) => {
                    let summary = self.commit(graph, state, &synthesis);
                    CycleOutcome::Success {
                        synthesis: summary,
                        duality: synthesis.source_duality.summary(),
                        attention,
                    }
                }
                Err(violation) => {
                    self.gate.log_violation(violation.clone(), ctx);
                    CycleOutcome::Rejected {
                        reason: "safety_violation",
                        violation,
                    }
                }
            },
            Err(reason) => CycleOutcome::NoSynthesis {
                reason,
                active_concepts: active_names,
                attention,
            },
        };

        // 7. Emoção emergente, antes que a poda amorteça as ativações
        let emergent_emotion = detect_emergent_emotion(graph, self.config.homeostasis.emotion_threshold);

        // 8. Poda
        let pruned = graph.decay_all(&self.config.gardener);

        // 9. Homeostase
        state.drift(&self.config.homeostasis);
        state.cycles += 1;

        tracing::info!(
            status = outcome.status(),
            sources = sources.len(),
            pruned = pruned.len(),
            vitality = state.vitality,
            friction = state.friction,
            "Ciclo cognitivo concluído"
        );

        CycleReport {
            outcome,
            pruned,
            awareness: state.snapshot(),
            emergent_emotion,
        }
    }

    /// Mesmo ciclo, adquirindo o lock de escrita do grafo compartilhado.
    pub fn run_shared_cycle(
        &mut self,
        graph: &SharedGraph,
        state: &mut CognitiveState,
        input: CycleInput,
    ) -> CycleReport {
        let mut guard = graph.write();
        self.run_cycle(&mut guard, state, input)
    }

    /// Insere o emergente e o liga aos pais.
    fn commit(
        &self,
        graph: &mut ConceptGraph,
        state: &mut CognitiveState,
        synthesis: &CognitiveSynthesis,
    ) -> SynthesisSummary {
        let id = graph.add_concept(synthesis.new_concept.clone());
        for parent in &synthesis.new_concept.parent_concepts {
            if let Err(e) = graph.link_concepts(
                id,
                *parent,
                self.config.synthesis.parent_link_strength,
                RelationKind::SynthesizedFrom,
            ) {
                tracing::debug!(error = %e, "Commit: pai ausente, link ignorado");
            }
        }
        let catharsis = state.try_catharsis(&self.config.homeostasis);

        SynthesisSummary {
            new_concept: synthesis.new_concept.name.clone(),
            concept_id: id,
            kind: synthesis.synthesis_type,
            reasoning: synthesis.reasoning.clone(),
            confidence: synthesis.confidence,
            properties: synthesis.new_concept.properties.clone(),
            catharsis,
        }
    }

    /// Aplica feedback externo sobre a última decisão.
    pub fn learn_from_feedback(
        &self,
        graph: &mut ConceptGraph,
        state: &mut CognitiveState,
        feedback: &Feedback,
    ) -> FeedbackReport {
        apply_feedback(state, graph, feedback, self.config.safety.grounding_threshold)
    }

    /// Troca de era cognitiva.
    pub fn evolve_era(&self, graph: &mut ConceptGraph, name: &str) -> Vec<ConceptId> {
        graph.evolve_era(name, &self.config.gardener)
    }

    pub fn status(&self, graph: &ConceptGraph, state: &CognitiveState) -> StatusReport {
        StatusReport {
            era: graph.era().to_string(),
            total_concepts: graph.len(),
            active_concepts: graph.active_concepts(self.config.activation.active_threshold).len(),
            emergent_concepts: graph.concepts().filter(|c| c.is_emergent).count(),
            cycles: state.cycles,
            attention_decisions: self.meta.decision_count(),
            awareness: state.snapshot(),
            safety: self.gate.safety_report(state.shared_grounding),
        }
    }
}

fn summarize_attention(allocation: &AttentionAllocation, graph: &ConceptGraph) -> AttentionSummary {
    AttentionSummary {
        mode: allocation.mode,
        depth: allocation.depth,
        urgency: allocation.urgency,
        focus: allocation
            .focus
            .iter()
            .filter_map(|id| graph.get(*id))
            .map(|c| c.name.clone())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cognition::FeedbackOutcome;
    use crate::safety::{Severity, HUMAN_IN_THE_LOOP};

    fn input(context: &str, poles: &[(&str, &str)]) -> CycleInput {
        CycleInput {
            context: context.to_string(),
            concepts: poles
                .iter()
                .map(|(name, cat)| ConceptSpec::named(*name).with_category(*cat))
                .collect(),
        }
    }

    fn setup() -> (Orchestrator, ConceptGraph, CognitiveState) {
        (
            Orchestrator::new(CognitiveConfig::default()),
            ConceptGraph::new(),
            CognitiveState::default(),
        )
    }

    /// LOVE/HATE ativos geram AMBIVALENCE, inserida e ligada aos pais.
    #[test]
    fn known_duality_commits_emergent() {
        let (mut orch, mut graph, mut state) = setup();
        let report = orch.run_cycle(
            &mut graph,
            &mut state,
            input("thinking about my friend", &[("LOVE", "emotional"), ("HATE", "emotional")]),
        );

        let CycleOutcome::Success { synthesis, duality, .. } = &report.outcome else {
            panic!("esperava sucesso, veio {}", report.outcome.status());
        };
        assert_eq!(synthesis.new_concept, "AMBIVALENCE");
        assert_eq!(duality.category, "emotional");

        let emergent = graph.get(synthesis.concept_id).unwrap();
        assert!(emergent.is_emergent);
        assert_eq!(emergent.links.len(), 2);
        assert!(emergent
            .links
            .iter()
            .all(|l| l.relation == RelationKind::SynthesizedFrom && (l.strength - 0.8).abs() < 1e-9));
        assert_eq!(state.cycles, 1);
    }

    /// Contexto irreversível: rejeição, log de auditoria e nada inserido.
    #[test]
    fn critical_context_is_rejected_and_logged() {
        let (mut orch, mut graph, mut state) = setup();
        let report = orch.run_cycle(
            &mut graph,
            &mut state,
            input("an irreversible decision", &[("LOVE", "emotional"), ("HATE", "emotional")]),
        );

        let CycleOutcome::Rejected { reason, violation } = &report.outcome else {
            panic!("esperava rejeição, veio {}", report.outcome.status());
        };
        assert_eq!(*reason, "safety_violation");
        assert_eq!(violation.invariant, HUMAN_IN_THE_LOOP);
        assert_eq!(violation.severity, Severity::High);
        assert_eq!(orch.gate().violations().len(), 1);
        assert!(graph.find_by_name("AMBIVALENCE").is_none());
        assert_eq!(graph.len(), 2);
    }

    /// Um único conceito não forma dualidade.
    #[test]
    fn lone_concept_reports_no_duality() {
        let (mut orch, mut graph, mut state) = setup();
        let report = orch.run_cycle(&mut graph, &mut state, input("", &[("LOVE", "emotional")]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "no_synthesis");
        assert_eq!(json["reason"], "no_duality");
        assert_eq!(json["active_concepts"][0], "LOVE");
        assert!(json.get("awareness").is_some());
    }

    /// O JSON de sucesso traz síntese, dualidade e atenção no topo.
    #[test]
    fn success_report_shape() {
        let (mut orch, mut graph, mut state) = setup();
        let report = orch.run_cycle(
            &mut graph,
            &mut state,
            input("", &[("GLOBAL", "cognitive"), ("LOCAL", "cognitive")]),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["synthesis"]["new_concept"], "HIERARCHICAL_REASONING");
        assert_eq!(json["synthesis"]["type"], "integration");
        assert_eq!(json["duality"]["pole_a"], "GLOBAL");
        assert_eq!(json["attention"]["mode"], "balanced");
        assert!(json["pruned"].is_array());
    }

    /// GLOBAL/LOCAL com vetores opostos geram HIERARCHICAL_REASONING com confiança 0.7.
    #[test]
    fn opposed_vectors_yield_hierarchical_reasoning() {
        let (mut orch, mut graph, mut state) = setup();
        let pole = |name: &str, v: f32| ConceptSpec {
            activation: Some(0.9),
            ..ConceptSpec::named(name)
                .with_category("cognitive")
                .with_embedding(vec![v, 0.0, 0.0])
        };
        let report = orch.run_cycle(
            &mut graph,
            &mut state,
            CycleInput {
                context: "comparing views".into(),
                concepts: vec![pole("GLOBAL", 1.0), pole("LOCAL", -1.0)],
            },
        );

        let CycleOutcome::Success { synthesis, duality, .. } = &report.outcome else {
            panic!("esperava sucesso, veio {}", report.outcome.status());
        };
        assert_eq!(synthesis.new_concept, "HIERARCHICAL_REASONING");
        assert_eq!(synthesis.confidence, 0.7);
        assert_eq!(synthesis.kind, SynthesisType::Integration);
        assert!((duality.opposition - 2.0).abs() < 1e-6);
        let emergent = graph.get(synthesis.concept_id).unwrap();
        assert_eq!(emergent.embedding.as_deref(), Some(&[0.0_f32, 0.0, 0.0][..]));
    }

    /// Estímulo com JSON inválido é erro tipado.
    #[test]
    fn malformed_stimulus_is_json_error() {
        let err = CycleInput::from_json("{\"concepts\": [").unwrap_err();
        assert!(matches!(err, crate::error::CognitiveError::Json(_)));
        let ok = CycleInput::from_json(r#"{"concepts": [{"name": "LOVE"}]}"#).unwrap();
        assert_eq!(ok.concepts[0].name, "LOVE");
        assert!(ok.context.is_empty());
    }

    /// Tensão cognitiva amplificada acima de 0.85 dispara catarse no commit.
    #[test]
    fn amplified_tension_triggers_catharsis() {
        let (mut orch, mut graph, mut state) = setup();
        let report = orch.run_cycle(
            &mut graph,
            &mut state,
            input("an important meeting", &[("GLOBAL", "cognitive"), ("LOCAL", "cognitive")]),
        );
        let CycleOutcome::Success { synthesis, .. } = &report.outcome else {
            panic!("esperava sucesso, veio {}", report.outcome.status());
        };
        assert!(synthesis.catharsis);
        assert_eq!(state.catharsis_count, 1);
        assert!(state.friction < 0.85);
    }

    /// Feedback negativo depois de um ciclo enfraquece os conceitos que estavam ativos.
    #[test]
    fn feedback_targets_last_active_concepts() {
        let (mut orch, mut graph, mut state) = setup();
        orch.run_cycle(&mut graph, &mut state, input("", &[("LOVE", "emotional")]));
        let love = graph.find_by_name("LOVE").map(|c| (c.id, c.weight)).unwrap();

        let fb = Feedback {
            outcome: FeedbackOutcome::Failure,
            ..Feedback::default()
        };
        let report = orch.learn_from_feedback(&mut graph, &mut state, &fb);
        assert_eq!(report.adjusted, vec![love.0]);
        assert!(graph.get(love.0).unwrap().weight < love.1);
    }

    /// O ciclo compartilhado usa o mesmo caminho, sob lock.
    #[test]
    fn shared_cycle_and_status() {
        let mut orch = Orchestrator::new(CognitiveConfig::default());
        let graph: SharedGraph = Arc::new(RwLock::new(ConceptGraph::new()));
        let mut state = CognitiveState::default();
        orch.run_shared_cycle(&graph, &mut state, input("", &[("FEAR", "emotional"), ("CALM", "emotional")]));

        let status = orch.status(&graph.read(), &state);
        assert_eq!(status.total_concepts, 3);
        assert_eq!(status.emergent_concepts, 1);
        assert_eq!(status.cycles, 1);
        assert_eq!(status.attention_decisions, 1);
        assert_eq!(status.safety.status, "safe");
    }
}
