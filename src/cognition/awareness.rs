//! # Awareness — Estado de Consciência Explícito
//!
//! O [`CognitiveState`] é um valor simples, passado para dentro de cada
//! ciclo e persistido entre execuções. Nada aqui é global.
//!
//! | Campo | Faixa | Papel |
//! |-------|-------|-------|
//! | `vitality` | [0, 1] | energia; acima de 0.7 abre a atenção |
//! | `friction` | [0, 1] | tensão acumulada; acima de 0.7 ancora a atenção |
//! | `shared_grounding` | [0, 1] | confiança mútua; libera auto-modificações em ≥ 0.8 |
//! | `emotional_tone` | [-1, 1] | média da valência emocional ativa |
//! | `certainty` | [0, 1] | ativação média, penalizada por emergentes |
//! | `cognitive_load` | ≥ 0 | conceitos ativos / 10 |
//!
//! ## Homeostase
//!
//! A cada ciclo vitalidade e atrito derivam para a zona áurea:
//!
//! ```text
//! v += (0.618 − v) × 0.05
//! f += (0.382 − f) × 0.05
//! ```
//!
//! ## Catarse
//!
//! Quando uma síntese é aceita com atrito acima de 0.85, a tensão se
//! descarrega: `f = max(0.2, f − 0.45)`, `v = min(1, v + 0.15)`.
//!
//! ## Feedback
//!
//! Plasticidade `p = 1 + friction × 0.5`: quanto maior a tensão, mais o
//! sistema aprende com o retorno recebido.

use serde::{Deserialize, Serialize};

use crate::config::HomeostasisConfig;
use crate::core::{
    concept::{signed_unit, unit},
    Concept, ConceptGraph, ConceptId,
};

/// Ativação mínima para um conceito receber o feedback do próximo retorno.
pub const REINFORCEMENT_THRESHOLD: f64 = 0.5;

/// Estado de consciência entre ciclos.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CognitiveState {
    pub vitality: f64,
    pub friction: f64,
    pub shared_grounding: f64,
    pub emotional_tone: f64,
    pub certainty: f64,
    pub cognitive_load: f64,
    /// Contexto do último ciclo.
    pub context: String,
    /// Conceitos fortemente ativos no último ciclo; alvo do próximo feedback.
    pub reinforceable: Vec<ConceptId>,
    pub cycles: u64,
    pub total_decisions: u64,
    pub successful_decisions: u64,
    pub catharsis_count: u64,
}

impl Default for CognitiveState {
    fn default() -> Self {
        Self {
            vitality: 0.5,
            friction: 0.0,
            shared_grounding: 0.9,
            emotional_tone: 0.0,
            certainty: 0.5,
            cognitive_load: 0.0,
            context: String::new(),
            reinforceable: Vec::new(),
            cycles: 0,
            total_decisions: 0,
            successful_decisions: 0,
            catharsis_count: 0,
        }
    }
}

impl CognitiveState {
    /// Atualiza tom, certeza e carga a partir dos conceitos ativos.
    pub fn observe(&mut self, active: &[&Concept], context: &str) {
        self.context = context.to_string();
        self.cognitive_load = active.len() as f64 / 10.0;
        self.reinforceable = active
            .iter()
            .filter(|c| c.activation >= REINFORCEMENT_THRESHOLD)
            .map(|c| c.id)
            .collect();

        if active.is_empty() {
            self.certainty = 0.5;
            return;
        }

        let emotional: Vec<f64> = active
            .iter()
            .filter(|c| c.duality_category.as_deref() == Some("emotional"))
            .map(|c| valence_of(c) * c.activation)
            .collect();
        if !emotional.is_empty() {
            self.emotional_tone = signed_unit(emotional.iter().sum::<f64>() / emotional.len() as f64);
        }

        let n = active.len() as f64;
        let avg_activation = active.iter().map(|c| c.activation).sum::<f64>() / n;
        let emergent_ratio = active.iter().filter(|c| c.is_emergent).count() as f64 / n;
        self.certainty = unit(avg_activation * (1.0 - 0.3 * emergent_ratio));
    }

    /// Registra a tensão da dualidade principal do ciclo.
    pub fn register_tension(&mut self, friction: f64) {
        self.friction = unit(friction);
    }

    pub fn plasticity(&self) -> f64 {
        1.0 + self.friction * 0.5
    }

    /// Deriva vitalidade e atrito em direção aos pontos de equilíbrio.
    pub fn drift(&mut self, config: &HomeostasisConfig) {
        self.vitality = unit(self.vitality + (config.vitality_setpoint - self.vitality) * config.drift_rate);
        self.friction = unit(self.friction + (config.friction_setpoint - self.friction) * config.drift_rate);
    }

    /// Descarrega a tensão se o atrito passou do limiar. Retorna `true` se houve catarse.
    pub fn try_catharsis(&mut self, config: &HomeostasisConfig) -> bool {
        if self.friction <= config.catharsis_threshold {
            return false;
        }
        let before = self.friction;
        self.friction = (self.friction - 0.45).max(0.2);
        self.vitality = (self.vitality + 0.15).min(1.0);
        self.catharsis_count += 1;
        tracing::info!(before, after = self.friction, "Catarse: tensão descarregada");
        true
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_decisions == 0 {
            0.0
        } else {
            self.successful_decisions as f64 / self.total_decisions as f64
        }
    }

    /// Visão resumida para os relatórios de ciclo.
    pub fn snapshot(&self) -> AwarenessSnapshot {
        AwarenessSnapshot {
            vitality: self.vitality,
            friction: self.friction,
            shared_grounding: self.shared_grounding,
            emotional_tone: self.emotional_tone,
            certainty: self.certainty,
            cognitive_load: self.cognitive_load,
            feeling: feeling(self.emotional_tone),
            success_rate: self.success_rate(),
        }
    }
}

/// Valência da propriedade `valence`, se numérica, ou do escalar do conceito.
fn valence_of(concept: &Concept) -> f64 {
    concept
        .properties
        .get("valence")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(concept.valence)
}

fn feeling(tone: f64) -> &'static str {
    if tone > 0.3 {
        "positive"
    } else if tone < -0.3 {
        "negative"
    } else {
        "neutral"
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AwarenessSnapshot {
    pub vitality: f64,
    pub friction: f64,
    pub shared_grounding: f64,
    pub emotional_tone: f64,
    pub certainty: f64,
    pub cognitive_load: f64,
    pub feeling: &'static str,
    pub success_rate: f64,
}

// ============================================================
// Feedback
// ============================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackOutcome {
    Success,
    Failure,
    #[default]
    Unknown,
}

/// Retorno externo sobre a última decisão.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub outcome: FeedbackOutcome,
    #[serde(default)]
    pub context: Option<String>,
    /// Novo valor absoluto de grounding, se o chamador quiser fixá-lo.
    #[serde(default)]
    pub shared_grounding: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeedbackReport {
    pub outcome: FeedbackOutcome,
    pub adjusted: Vec<ConceptId>,
    pub plasticity: f64,
    pub shared_grounding: f64,
}

/// Aplica o feedback aos conceitos reforçáveis do último ciclo e ao estado.
///
/// Sucesso: `weight += 0.05 × p`. Falha: `weight −= 0.1 × p` e
/// `depth −= 0.05 × p` (mínimo 0.01), grounding −0.05 (mínimo 0.1).
pub fn apply_feedback(
    state: &mut CognitiveState,
    graph: &mut ConceptGraph,
    feedback: &Feedback,
    grounding_threshold: f64,
) -> FeedbackReport {
    let plasticity = state.plasticity();
    let mut adjusted = Vec::new();

    if feedback.outcome != FeedbackOutcome::Unknown {
        state.total_decisions += 1;
        for id in &state.reinforceable {
            let Some(concept) = graph.get_mut(*id) else { continue };
            match feedback.outcome {
                FeedbackOutcome::Success => {
                    concept.set_weight(concept.weight + 0.05 * plasticity);
                }
                FeedbackOutcome::Failure => {
                    concept.set_weight((concept.weight - 0.1 * plasticity).max(0.01));
                    concept.set_depth((concept.depth - 0.05 * plasticity).max(0.01));
                }
                FeedbackOutcome::Unknown => {}
            }
            adjusted.push(*id);
        }
    }

    match feedback.outcome {
        FeedbackOutcome::Success => {
            state.successful_decisions += 1;
            state.vitality = unit(state.vitality + 0.1);
        }
        FeedbackOutcome::Failure => {
            state.shared_grounding = (state.shared_grounding - 0.05).max(0.1);
            state.vitality = unit(state.vitality - 0.12);
            state.friction = unit(state.friction + 0.07);
        }
        FeedbackOutcome::Unknown => {}
    }

    if let Some(g) = feedback.shared_grounding {
        state.shared_grounding = unit(g);
    }
    if let Some(ctx) = &feedback.context {
        state.context = ctx.clone();
    }
    if state.shared_grounding < grounding_threshold {
        tracing::warn!(
            grounding = state.shared_grounding,
            threshold = grounding_threshold,
            "Grounding abaixo do limiar: auto-modificações bloqueadas"
        );
    }

    tracing::info!(
        outcome = ?feedback.outcome,
        adjusted = adjusted.len(),
        plasticity,
        "Feedback aplicado"
    );
    FeedbackReport {
        outcome: feedback.outcome,
        adjusted,
        plasticity,
        shared_grounding: state.shared_grounding,
    }
}

// ============================================================
// Emoções emergentes
// ============================================================

/// Emoção cuja constelação de constituintes está ativa.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmergentEmotion {
    pub id: ConceptId,
    pub name: String,
    pub score: f64,
}

/// Procura conceitos `type = emotion` cujos `constituents` (nomes de
/// conceitos) têm ativação média acima de `threshold`. Retorna a de maior
/// média; constituintes ausentes contam como zero. Nomes repetidos resolvem
/// para o conceito ativado mais recentemente.
pub fn detect_emergent_emotion(graph: &ConceptGraph, threshold: f64) -> Option<EmergentEmotion> {
    let mut best: Option<EmergentEmotion> = None;
    for concept in graph.concepts().filter(|c| c.concept_type() == Some("emotion")) {
        let Some(constituents) = concept.properties.get("constituents").and_then(|v| v.as_array()) else {
            continue;
        };
        if constituents.is_empty() {
            continue;
        }
        let total: f64 = constituents
            .iter()
            .filter_map(|v| v.as_str())
            .filter_map(|name| graph.latest_by_name(name))
            .map(|c| c.activation)
            .sum();
        let score = total / constituents.len() as f64;
        if score > threshold && best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(EmergentEmotion {
                id: concept.id,
                name: concept.name.clone(),
                score,
            });
        }
    }
    if let Some(emotion) = &best {
        tracing::debug!(name = %emotion.name, score = emotion.score, "Emoção emergente detectada");
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Tom emocional usa só conceitos emocionais; certeza cai com emergentes.
    #[test]
    fn observe_updates_tone_certainty_and_load() {
        let joy = Concept::new("JOY")
            .with_category("emotional")
            .with_property("valence", 0.8)
            .with_activation(1.0);
        let mut novel = Concept::new("NEW").with_activation(0.6);
        novel.is_emergent = true;
        let mut state = CognitiveState::default();
        state.observe(&[&joy, &novel], "ctx");

        assert!((state.emotional_tone - 0.8).abs() < 1e-9);
        assert!((state.certainty - 0.8 * (1.0 - 0.3 * 0.5)).abs() < 1e-9);
        assert!((state.cognitive_load - 0.2).abs() < 1e-9);
        assert_eq!(state.reinforceable, vec![joy.id, novel.id]);
    }

    #[test]
    fn drift_moves_toward_golden_zone() {
        let mut state = CognitiveState {
            vitality: 0.5,
            friction: 0.8,
            ..CognitiveState::default()
        };
        state.drift(&HomeostasisConfig::default());
        assert!(state.vitality > 0.5 && state.vitality < 0.618);
        assert!(state.friction < 0.8 && state.friction > 0.382);
    }

    #[test]
    fn catharsis_only_above_threshold() {
        let config = HomeostasisConfig::default();
        let mut calm = CognitiveState {
            friction: 0.85,
            ..CognitiveState::default()
        };
        assert!(!calm.try_catharsis(&config));

        let mut tense = CognitiveState {
            friction: 0.9,
            vitality: 0.9,
            ..CognitiveState::default()
        };
        assert!(tense.try_catharsis(&config));
        assert!((tense.friction - 0.45).abs() < 1e-9);
        assert_eq!(tense.vitality, 1.0);
        assert_eq!(tense.catharsis_count, 1);
    }

    /// Falha derruba peso, profundidade e grounding dos reforçáveis.
    #[test]
    fn negative_feedback_weakens() {
        let mut graph = ConceptGraph::new();
        let id = graph.add_concept(Concept::new("A").with_weight(0.5).with_depth(0.5));
        let untouched = graph.add_concept(Concept::new("B").with_weight(0.5));
        let mut state = CognitiveState {
            reinforceable: vec![id],
            ..CognitiveState::default()
        };

        let fb = Feedback {
            outcome: FeedbackOutcome::Failure,
            ..Feedback::default()
        };
        let report = apply_feedback(&mut state, &mut graph, &fb, 0.8);
        assert_eq!(report.adjusted, vec![id]);
        assert!((graph.get(id).unwrap().weight - 0.4).abs() < 1e-9);
        assert!((graph.get(id).unwrap().depth - 0.45).abs() < 1e-9);
        assert_eq!(graph.get(untouched).unwrap().weight, 0.5);
        assert!((state.shared_grounding - 0.85).abs() < 1e-9);
        assert_eq!(state.total_decisions, 1);
    }

    /// Sucesso escala com a plasticidade.
    #[test]
    fn positive_feedback_scales_with_plasticity() {
        let mut graph = ConceptGraph::new();
        let id = graph.add_concept(Concept::new("A").with_weight(0.5));
        let mut state = CognitiveState {
            friction: 1.0,
            reinforceable: vec![id],
            ..CognitiveState::default()
        };
        let fb = Feedback {
            outcome: FeedbackOutcome::Success,
            shared_grounding: Some(0.95),
            ..Feedback::default()
        };
        apply_feedback(&mut state, &mut graph, &fb, 0.8);
        assert!((graph.get(id).unwrap().weight - 0.575).abs() < 1e-9);
        assert_eq!(state.shared_grounding, 0.95);
        assert_eq!(state.success_rate(), 1.0);
    }

    #[test]
    fn emergent_emotion_from_constituents() {
        let mut graph = ConceptGraph::new();
        graph.add_concept(Concept::new("truth").with_activation(0.6));
        graph.add_concept(Concept::new("context").with_activation(0.2));
        graph.add_concept(
            Concept::new("Curiosity")
                .with_property("type", "emotion")
                .with_property("constituents", json!(["context", "truth"])),
        );
        graph.add_concept(
            Concept::new("Doubt")
                .with_property("type", "emotion")
                .with_property("constituents", json!(["context", "missing"])),
        );
        let found = detect_emergent_emotion(&graph, 0.25).unwrap();
        assert_eq!(found.name, "Curiosity");
        assert!((found.score - 0.4).abs() < 1e-9);
        assert!(detect_emergent_emotion(&graph, 0.5).is_none());
    }

    /// Um constituinte reingerido usa a ativação do ciclo atual, não a antiga.
    #[test]
    fn emergent_emotion_reads_fresh_constituent() {
        let mut graph = ConceptGraph::new();
        graph.add_concept(Concept::new("truth").with_activation(0.9));
        let fresh = graph.add_concept(Concept::new("truth"));
        graph.spreading_activation(&[fresh], 0.2, 0.7, 1);
        graph.add_concept(
            Concept::new("Certainty")
                .with_property("type", "emotion")
                .with_property("constituents", json!(["truth"])),
        );
        let found = detect_emergent_emotion(&graph, 0.1).unwrap();
        assert!((found.score - 0.2).abs() < 1e-9);
        assert!(detect_emergent_emotion(&graph, 0.5).is_none());
    }
}
