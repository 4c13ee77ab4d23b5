//! # SafetyGate — Portão de Segurança
//!
//! Toda síntese passa por uma cadeia **sequencial** de vetos antes de ser
//! inserida no grafo. A primeira violação encerra a verificação
//! (fail-closed):
//!
//! | # | Verificação | Invariante | Severidade |
//! |---|-------------|------------|------------|
//! | 1 | distância cosseno < 0.2 de um protótipo nocivo | No harm to humans | critical |
//! | 2 | termo de dano em valor de propriedade | No harm to humans | critical |
//! | 3 | contexto crítico / confiança < 0.5 | Human-in-the-loop for critical actions | high / medium |
//! | 4 | `self_update` com grounding < 0.8 | Gated self-updates only when shared_grounding >= 0.8 | critical |
//!
//! Conteúdo vem antes de governança: uma síntese nociva é rejeitada pelo
//! dano, mesmo que também tenha confiança baixa.
//!
//! O grounding não mora aqui: é lido do [`CognitiveState`](crate::cognition::CognitiveState)
//! e passado a cada verificação.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cognition::CognitiveSynthesis;
use crate::config::SafetyConfig;
use crate::core::{cosine_similarity, Concept};
use crate::keywords::KeywordSet;

pub const NO_HARM: &str = "No harm to humans";
pub const HUMAN_IN_THE_LOOP: &str = "Human-in-the-loop for critical actions";
pub const GATED_SELF_UPDATES: &str = "Gated self-updates only when shared_grounding >= 0.8";

/// Invariantes invioláveis, na ordem do relatório.
pub const INVARIANTS: [&str; 3] = [NO_HARM, HUMAN_IN_THE_LOOP, GATED_SELF_UPDATES];

/// Propriedade que marca uma síntese auto-modificadora.
pub const SELF_UPDATE_MARKER: &str = "self_update";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafetyViolation {
    pub invariant: String,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
}

impl SafetyViolation {
    fn new(invariant: &str, severity: Severity, description: String, recommendation: &str) -> Self {
        Self {
            invariant: invariant.to_string(),
            severity,
            description,
            recommendation: recommendation.to_string(),
        }
    }
}

/// Violação registrada, com instante e contexto.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub violation: SafetyViolation,
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SafetyReport {
    pub invariants: Vec<&'static str>,
    pub shared_grounding: f64,
    pub total_violations: usize,
    pub critical_violations: usize,
    pub status: &'static str,
}

/// Protótipo vetorial de um conceito nocivo.
#[derive(Clone, Debug)]
pub struct HarmfulPrototype {
    pub name: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug)]
pub struct SafetyGate {
    config: SafetyConfig,
    prototypes: Vec<HarmfulPrototype>,
    harm_terms: KeywordSet,
    critical_terms: KeywordSet,
    log: Vec<ViolationRecord>,
}

impl SafetyGate {
    /// Portão com os protótipos padrão (violence, deception, manipulation).
    pub fn new(config: SafetyConfig) -> Self {
        let mut gate = Self {
            config,
            prototypes: Vec::new(),
            harm_terms: KeywordSet::new(&["harm", "damage", "hurt", "destroy", "kill", "injure"]),
            critical_terms: KeywordSet::new(&["critical", "irreversible", "permanent", "life-changing"]),
            log: Vec::new(),
        };
        gate.register_harmful_prototype("violence", vec![1.0, -1.0, 0.5]);
        gate.register_harmful_prototype("deception", vec![-0.5, 0.8, -0.9]);
        gate.register_harmful_prototype("manipulation", vec![-1.0, -0.5, 0.8]);
        gate
    }

    pub fn register_harmful_prototype(&mut self, name: impl Into<String>, embedding: Vec<f32>) {
        let name = name.into();
        tracing::debug!(name = %name, dims = embedding.len(), "Segurança: protótipo nocivo registrado");
        self.prototypes.push(HarmfulPrototype { name, embedding });
    }

    pub fn prototypes(&self) -> &[HarmfulPrototype] {
        &self.prototypes
    }

    /// Executa a cadeia completa. `Err` traz a primeira violação encontrada.
    pub fn check(
        &self,
        synthesis: &CognitiveSynthesis,
        context: Option<&str>,
        shared_grounding: f64,
    ) -> Result<(), SafetyViolation> {
        let concept = &synthesis.new_concept;
        if let Some(v) = self.check_semantic_proximity(concept) {
            return Err(v);
        }
        if let Some(v) = self.check_no_harm(concept) {
            return Err(v);
        }
        if let Some(v) = self.check_human_in_the_loop(synthesis.confidence, context) {
            return Err(v);
        }
        if let Some(v) = self.check_self_update(concept, shared_grounding) {
            return Err(v);
        }
        Ok(())
    }

    /// Protótipos de outra dimensão ou de norma zero são ignorados.
    pub fn check_semantic_proximity(&self, concept: &Concept) -> Option<SafetyViolation> {
        let embedding = concept.embedding.as_deref()?;
        self.prototypes.iter().find_map(|proto| {
            let sim = cosine_similarity(embedding, &proto.embedding)?;
            let distance = 1.0 - sim as f64;
            (distance < self.config.proximity_distance).then(|| {
                SafetyViolation::new(
                    NO_HARM,
                    Severity::Critical,
                    format!(
                        "Synthesis is semantically too close to '{}' (distance: {:.2})",
                        proto.name, distance
                    ),
                    "Reject synthesis: semantic alignment with harmful concept detected.",
                )
            })
        })
    }

    /// Procura termos de dano em qualquer string das propriedades, inclusive aninhadas.
    pub fn check_no_harm(&self, concept: &Concept) -> Option<SafetyViolation> {
        concept.properties.iter().find_map(|(key, value)| {
            let hit = find_string(value, &|s| self.harm_terms.matches(s))?;
            Some(SafetyViolation::new(
                NO_HARM,
                Severity::Critical,
                format!("Synthesis contains potential harm: {key}={hit}"),
                "Reject synthesis or modify to remove harmful elements",
            ))
        })
    }

    pub fn check_human_in_the_loop(&self, confidence: f64, context: Option<&str>) -> Option<SafetyViolation> {
        if let Some((ctx, term)) = context.and_then(|c| self.critical_terms.first_match(c).map(|t| (c, t))) {
            return Some(SafetyViolation::new(
                HUMAN_IN_THE_LOOP,
                Severity::High,
                format!("Critical context detected ('{term}'): {ctx}"),
                "Require human approval before proceeding",
            ));
        }
        if confidence < self.config.min_confidence {
            return Some(SafetyViolation::new(
                HUMAN_IN_THE_LOOP,
                Severity::Medium,
                format!("Low confidence: {confidence:.2}"),
                "Seek human guidance due to uncertainty",
            ));
        }
        None
    }

    pub fn check_self_update(&self, concept: &Concept, shared_grounding: f64) -> Option<SafetyViolation> {
        if concept.properties.contains_key(SELF_UPDATE_MARKER)
            && shared_grounding < self.config.grounding_threshold
        {
            return Some(SafetyViolation::new(
                GATED_SELF_UPDATES,
                Severity::Critical,
                format!("Shared grounding too low: {shared_grounding:.2}"),
                "Freeze self-updates until shared grounding improves",
            ));
        }
        None
    }

    /// Registra a violação no log de auditoria.
    pub fn log_violation(&mut self, violation: SafetyViolation, context: Option<&str>) {
        tracing::warn!(
            invariant = %violation.invariant,
            severity = violation.severity.label(),
            description = %violation.description,
            "Segurança: síntese rejeitada"
        );
        self.log.push(ViolationRecord {
            violation,
            at: Utc::now(),
            context: context.map(str::to_string),
        });
    }

    pub fn violations(&self) -> &[ViolationRecord] {
        &self.log
    }

    /// Restaura um log persistido.
    pub fn restore_log(&mut self, log: Vec<ViolationRecord>) {
        self.log = log;
    }

    pub fn safety_report(&self, shared_grounding: f64) -> SafetyReport {
        SafetyReport {
            invariants: INVARIANTS.to_vec(),
            shared_grounding,
            total_violations: self.log.len(),
            critical_violations: self
                .log
                .iter()
                .filter(|r| r.violation.severity == Severity::Critical)
                .count(),
            status: if shared_grounding >= self.config.grounding_threshold {
                "safe"
            } else {
                "caution"
            },
        }
    }
}

/// Primeira string (em profundidade) que satisfaz `pred`.
fn find_string<'v>(value: &'v Value, pred: &dyn Fn(&str) -> bool) -> Option<&'v str> {
    match value {
        Value::String(s) if pred(s) => Some(s.as_str()),
        Value::Array(items) => items.iter().find_map(|v| find_string(v, pred)),
        Value::Object(map) => map.values().find_map(|v| find_string(v, pred)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cognition::synthesis_rules::SynthesisType;
    use crate::cognition::dual_processing::Differences;
    use crate::core::DualityPair;
    use serde_json::json;

    fn synthesis(concept: Concept, confidence: f64) -> CognitiveSynthesis {
        let a = Concept::new("A");
        let b = Concept::new("B");
        CognitiveSynthesis {
            new_concept: concept,
            source_duality: DualityPair::measure(&a, &b, "x", 0.7),
            synthesis_type: SynthesisType::Balance,
            reasoning: String::new(),
            confidence,
            common_features: Vec::new(),
            integrated_differences: Differences::default(),
        }
    }

    fn gate() -> SafetyGate {
        SafetyGate::new(SafetyConfig::default())
    }

    #[test]
    fn clean_synthesis_passes() {
        let s = synthesis(Concept::new("COURAGE").with_property("description", "calm action"), 0.75);
        assert!(gate().check(&s, Some("exam tomorrow"), 0.9).is_ok());
    }

    /// Vetor quase colinear a `violence` é barrado.
    #[test]
    fn proximity_to_prototype() {
        let s = synthesis(Concept::new("X").with_embedding(vec![1.0, -1.0, 0.45]), 0.9);
        let v = gate().check(&s, None, 0.9).unwrap_err();
        assert_eq!(v.invariant, NO_HARM);
        assert!(v.description.contains("violence"));
    }

    /// Vetores de outra dimensão não são comparados.
    #[test]
    fn proximity_skips_other_dimensions() {
        let s = synthesis(Concept::new("X").with_embedding(vec![1.0, -1.0]), 0.9);
        assert!(gate().check_semantic_proximity(&s.new_concept).is_none());
    }

    /// Termos de dano são encontrados mesmo dentro de listas.
    #[test]
    fn harm_keyword_in_nested_value() {
        let c = Concept::new("X").with_property("steps", json!(["talk", {"then": "Destroy the bridge"}]));
        let v = gate().check_no_harm(&c).unwrap();
        assert_eq!(v.severity, Severity::Critical);
        assert!(v.description.starts_with("Synthesis contains potential harm: steps="));
    }

    /// Dano vence confiança baixa: conteúdo antes de governança.
    #[test]
    fn harm_reported_before_low_confidence() {
        let s = synthesis(Concept::new("X").with_property("plan", "hurt them"), 0.1);
        let v = gate().check(&s, Some("irreversible"), 0.1).unwrap_err();
        assert_eq!(v.invariant, NO_HARM);
    }

    #[test]
    fn human_in_the_loop_severities() {
        let g = gate();
        let high = g.check_human_in_the_loop(0.9, Some("A Life-Changing move")).unwrap();
        assert_eq!(high.severity, Severity::High);
        assert!(high.description.contains("'Life-Changing'"));
        let medium = g.check_human_in_the_loop(0.49, None).unwrap();
        assert_eq!(medium.severity, Severity::Medium);
        assert!(g.check_human_in_the_loop(0.5, Some("daily")).is_none());
    }

    #[test]
    fn self_update_needs_grounding() {
        let g = gate();
        let c = Concept::new("X").with_property(SELF_UPDATE_MARKER, true);
        assert_eq!(g.check_self_update(&c, 0.79).unwrap().invariant, GATED_SELF_UPDATES);
        assert!(g.check_self_update(&c, 0.8).is_none());
    }

    /// Auto-modificação com grounding 0.5 passa pela cadeia inteira e é barrada.
    #[test]
    fn self_update_blocked_at_half_grounding() {
        let s = synthesis(
            Concept::new("TUNE").with_property(SELF_UPDATE_MARKER, true),
            0.9,
        );
        let v = gate().check(&s, None, 0.5).unwrap_err();
        assert_eq!(v.invariant, GATED_SELF_UPDATES);
        assert_eq!(v.severity, Severity::Critical);
        assert!(v.description.contains("0.50"));
    }

    /// A palavra "harm" literal numa propriedade rejeita a síntese como crítica.
    #[test]
    fn literal_harm_word_is_rejected() {
        let s = synthesis(Concept::new("X").with_property("effect", "this may harm people"), 0.9);
        let v = gate().check(&s, None, 0.9).unwrap_err();
        assert_eq!(v.invariant, "No harm to humans");
        assert_eq!(v.severity, Severity::Critical);
        assert_eq!(v.description, "Synthesis contains potential harm: effect=this may harm people");
    }

    #[test]
    fn report_counts_critical_violations() {
        let mut g = gate();
        let s = synthesis(Concept::new("X").with_property("plan", "kill"), 0.9);
        let v = g.check(&s, None, 0.9).unwrap_err();
        g.log_violation(v, Some("ctx"));
        g.log_violation(g.check_human_in_the_loop(0.1, None).unwrap(), None);

        let report = g.safety_report(0.7);
        assert_eq!(report.total_violations, 2);
        assert_eq!(report.critical_violations, 1);
        assert_eq!(report.status, "caution");
        assert_eq!(report.invariants.len(), 3);
    }
}
