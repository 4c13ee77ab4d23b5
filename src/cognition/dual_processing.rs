//! # DualProcessingEngine — Da Tensão ao Conceito Emergente
//!
//! O motor recebe os conceitos em foco, descobre dualidades e transforma a
//! mais **bela** delas num conceito novo.
//!
//! ## Seleção pelo Índice de Beleza
//!
//! ```text
//! candidatos = dualidades com friction ≥ 0.3
//! beauty     = média(depth_A, depth_B) / (friction + 0.05 × n + 0.1)
//! ```
//!
//! `n` é o número de conceitos entregues ao motor (a "desordem" da cena).
//! Polos profundos e estáveis vencem tensões rasas e ruidosas. A seleção é
//! gulosa: só o vencedor vira síntese, e em empate fica o primeiro (o de
//! maior atrito, pela ordenação da descoberta).
//!
//! ## Construção
//!
//! 1. Propriedades comuns com valores iguais → `common_features` (`chave=valor`)
//! 2. Diferença simétrica por polo → `integrated_differences`
//! 3. Regra conhecida (ver [`synthesis_rules`](super::synthesis_rules)) ou fusão genérica
//! 4. Vetor = média elemento a elemento, quando ambos os polos têm vetores do mesmo tamanho
//!
//! O motor **nunca** insere nada no grafo.

use serde::Serialize;
use serde_json::Value;

use crate::config::{DualityConfig, SynthesisConfig};
use crate::core::{discover_dualities, Concept, DualityPair, Properties};
use crate::error::{CognitiveError, Result};

use super::synthesis_rules::{self, display_value, SynthesisType, GENERIC_CONFIDENCE};

/// Motivo tipado para a ausência de síntese.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoSynthesis {
    /// Nenhum par de mesma categoria com oposição suficiente.
    NoDuality,
    /// Havia dualidades, mas nenhuma com atrito acima do piso.
    InsufficientFriction,
}

impl NoSynthesis {
    pub fn label(&self) -> &'static str {
        match self {
            NoSynthesis::NoDuality => "no_duality",
            NoSynthesis::InsufficientFriction => "insufficient_friction",
        }
    }
}

/// Diferença simétrica entre as propriedades dos polos.
///
/// Cada lado traz seu valor (ou `null`) para toda chave que difere.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Differences {
    pub pole_a: Properties,
    pub pole_b: Properties,
}

/// Registro efêmero de uma síntese.
#[derive(Clone, Debug)]
pub struct CognitiveSynthesis {
    pub new_concept: Concept,
    pub source_duality: DualityPair,
    pub synthesis_type: SynthesisType,
    pub reasoning: String,
    pub confidence: f64,
    pub common_features: Vec<String>,
    pub integrated_differences: Differences,
}

/// Motor de processamento dual. Sem estado além dos parâmetros.
#[derive(Clone, Debug)]
pub struct DualProcessingEngine {
    synthesis: SynthesisConfig,
    duality: DualityConfig,
}

impl DualProcessingEngine {
    pub fn new(synthesis: SynthesisConfig, duality: DualityConfig) -> Self {
        Self { synthesis, duality }
    }

    /// Índice de beleza de uma dualidade numa cena com `concept_count` conceitos.
    pub fn beauty(&self, pair: &DualityPair, concept_count: usize) -> f64 {
        let depth = (pair.pole_a.depth + pair.pole_b.depth) / 2.0;
        let complexity = pair.friction
            + self.synthesis.clutter_per_concept * concept_count as f64
            + self.synthesis.complexity_offset;
        depth / complexity
    }

    /// Descobre dualidades entre `concepts` e sintetiza a de maior beleza.
    pub fn process(
        &self,
        concepts: &[&Concept],
        context: Option<&str>,
    ) -> std::result::Result<CognitiveSynthesis, NoSynthesis> {
        let dualities = discover_dualities(concepts, &self.duality);
        if dualities.is_empty() {
            tracing::debug!(concepts = concepts.len(), "Síntese: nenhuma dualidade");
            return Err(NoSynthesis::NoDuality);
        }

        let mut best: Option<(&DualityPair, f64)> = None;
        for pair in dualities.iter().filter(|p| p.friction >= self.synthesis.friction_floor) {
            let beauty = self.beauty(pair, concepts.len());
            tracing::debug!(
                pole_a = %pair.pole_a.name,
                pole_b = %pair.pole_b.name,
                friction = pair.friction,
                beauty,
                "Síntese: candidata"
            );
            if best.map_or(true, |(_, b)| beauty > b) {
                best = Some((pair, beauty));
            }
        }

        match best {
            Some((pair, _)) => Ok(self.synthesize(pair, context)),
            None => Err(NoSynthesis::InsufficientFriction),
        }
    }

    /// Constrói a síntese de uma dualidade.
    pub fn synthesize(&self, duality: &DualityPair, context: Option<&str>) -> CognitiveSynthesis {
        let a = &duality.pole_a;
        let b = &duality.pole_b;
        let common_features = common_features(a, b);
        let integrated_differences = differences(a, b);

        let (mut concept, synthesis_type, reasoning, confidence) =
            match synthesis_rules::lookup(&duality.category, &a.name, &b.name) {
                Some(rule) => {
                    let mut concept = Concept::new(rule.emergent).with_weight(rule.weight);
                    concept.properties = rule.properties(a, b);
                    if let Some(valence) = concept.properties.get("valence").and_then(Value::as_f64) {
                        concept = concept.with_valence(valence);
                    }
                    (concept, rule.kind, rule.reasoning(a, b), rule.confidence)
                }
                None => {
                    let props = synthesis_rules::generic_properties(a, b);
                    let fused = synthesis_rules::generic_merge(a, b).len();
                    let mut concept = Concept::new(synthesis_rules::generic_name(a, b))
                        .with_weight((a.weight + b.weight) / 2.0);
                    concept.properties = props;
                    (
                        concept,
                        SynthesisType::Balance,
                        synthesis_rules::generic_reasoning(a, b, fused),
                        GENERIC_CONFIDENCE,
                    )
                }
            };

        concept.is_emergent = true;
        concept.parent_concepts = vec![a.id, b.id];
        concept.emergence_context = context.map(str::to_string);
        concept.duality_category = Some(duality.category.clone());
        concept.embedding = match (&a.embedding, &b.embedding) {
            (Some(ea), Some(eb)) => match mean_embedding(ea, eb) {
                Ok(mean) => Some(mean),
                Err(e) => {
                    tracing::debug!(error = %e, "Síntese: vetores incompatíveis, emergente sem vetor");
                    None
                }
            },
            _ => None,
        };

        tracing::info!(
            emergent = %concept.name,
            kind = synthesis_type.label(),
            confidence,
            "Síntese: conceito emergente construído"
        );

        CognitiveSynthesis {
            new_concept: concept,
            source_duality: duality.clone(),
            synthesis_type,
            reasoning,
            confidence,
            common_features,
            integrated_differences,
        }
    }
}

/// Média elemento a elemento de dois vetores do mesmo tamanho.
pub fn mean_embedding(a: &[f32], b: &[f32]) -> Result<Vec<f32>> {
    if a.len() != b.len() {
        return Err(CognitiveError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| (x + y) / 2.0).collect())
}

/// Propriedades presentes nos dois polos com o mesmo valor, como `chave=valor`.
pub fn common_features(a: &Concept, b: &Concept) -> Vec<String> {
    a.properties
        .iter()
        .filter(|(k, v)| b.properties.get(*k) == Some(*v))
        .map(|(k, v)| format!("{k}={}", display_value(v)))
        .collect()
}

/// Diferença simétrica entre as propriedades dos polos.
pub fn differences(a: &Concept, b: &Concept) -> Differences {
    let mut diff = Differences::default();
    let keys: std::collections::BTreeSet<&String> =
        a.properties.keys().chain(b.properties.keys()).collect();
    for key in keys {
        let va = a.properties.get(key).cloned().unwrap_or_default();
        let vb = b.properties.get(key).cloned().unwrap_or_default();
        if va != vb {
            diff.pole_a.insert(key.clone(), va);
            diff.pole_b.insert(key.clone(), vb);
        }
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> DualProcessingEngine {
        DualProcessingEngine::new(SynthesisConfig::default(), DualityConfig::default())
    }

    fn pole(name: &str, category: &str, activation: f64) -> Concept {
        Concept::new(name).with_category(category).with_activation(activation)
    }

    /// Sem dualidade e com atrito baixo, os motivos são distintos.
    #[test]
    fn typed_no_synthesis_reasons() {
        let e = engine();
        let lone = pole("LOVE", "emotional", 1.0);
        assert_eq!(e.process(&[&lone], None).unwrap_err(), NoSynthesis::NoDuality);

        let quiet_a = pole("LOVE", "emotional", 0.5);
        let quiet_b = pole("HATE", "emotional", 0.5);
        // 0.5 × 0.5 × 0.7 = 0.175 < 0.3
        assert_eq!(
            e.process(&[&quiet_a, &quiet_b], None).unwrap_err(),
            NoSynthesis::InsufficientFriction
        );
    }

    /// Par conhecido, em ordem invertida, gera o emergente curado.
    #[test]
    fn known_pair_builds_template() {
        let fear = pole("CALM", "emotional", 0.9).with_embedding(vec![1.0, 0.0]);
        let calm = pole("FEAR", "emotional", 0.9).with_embedding(vec![-1.0, 0.2]);
        let s = engine().process(&[&fear, &calm], Some("exam tomorrow")).unwrap();
        assert_eq!(s.new_concept.name, "COURAGE");
        assert_eq!(s.synthesis_type, SynthesisType::Transcendence);
        assert_eq!(s.confidence, 0.75);
        assert_eq!(s.new_concept.weight, 0.8);
        assert!(s.new_concept.is_emergent);
        assert_eq!(s.new_concept.parent_concepts, vec![fear.id, calm.id]);
        assert_eq!(s.new_concept.emergence_context.as_deref(), Some("exam tomorrow"));
        assert_eq!(s.new_concept.embedding, Some(vec![0.0, 0.1]));
        assert_eq!(s.new_concept.duality_category.as_deref(), Some("emotional"));
    }

    /// Valência do template vai para o escalar do emergente.
    #[test]
    fn template_valence_sets_scalar() {
        let fear = pole("FEAR", "emotional", 1.0);
        let calm = pole("CALM", "emotional", 1.0);
        let s = engine().process(&[&fear, &calm], None).unwrap();
        assert!((s.new_concept.valence - 0.3).abs() < 1e-9);
    }

    /// Confiança de cada família de templates.
    #[test]
    fn template_confidences_by_category() {
        let e = engine();
        let global = pole("GLOBAL", "cognitive", 0.9).with_embedding(vec![1.0, 0.0, 0.0]);
        let local = pole("LOCAL", "cognitive", 0.9).with_embedding(vec![-1.0, 0.0, 0.0]);
        let s = e.process(&[&global, &local], None).unwrap();
        assert_eq!(s.new_concept.name, "HIERARCHICAL_REASONING");
        assert_eq!(s.confidence, 0.7);
        assert_eq!(s.synthesis_type, SynthesisType::Integration);

        let intuitive = pole("INTUITIVE", "cognitive", 1.0);
        let analytical = pole("ANALYTICAL", "cognitive", 1.0);
        let s = e.process(&[&intuitive, &analytical], None).unwrap();
        assert_eq!((s.new_concept.name.as_str(), s.confidence), ("INTEGRATED_THINKING", 0.7));

        let altruistic = pole("ALTRUISTIC", "moral", 1.0);
        let egoistic = pole("EGOISTIC", "moral", 1.0);
        let s = e.process(&[&altruistic, &egoistic], None).unwrap();
        assert_eq!((s.new_concept.name.as_str(), s.confidence), ("ENLIGHTENED_SELF_INTEREST", 0.8));
    }

    /// Par desconhecido numa categoria conhecida cai na fusão genérica.
    #[test]
    fn unknown_pair_uses_generic_merge() {
        let a = pole("SADNESS", "emotional", 1.0).with_weight(0.4).with_property("intensity", 0.2);
        let b = pole("JOY", "emotional", 1.0).with_weight(0.6).with_property("intensity", 0.6);
        let s = engine().process(&[&a, &b], None).unwrap();
        assert_eq!(s.new_concept.name, "SADNESS_JOY_INTEGRATION");
        assert_eq!(s.synthesis_type, SynthesisType::Balance);
        assert_eq!(s.confidence, GENERIC_CONFIDENCE);
        assert!((s.new_concept.weight - 0.5).abs() < 1e-9);
        assert_eq!(s.new_concept.properties["balanced_intensity"], json!(0.4));
        assert!(s.reasoning.contains("Fused 1 properties"));
    }

    /// A maior beleza vence mesmo com atrito menor.
    #[test]
    fn deepest_pair_wins_over_loudest() {
        let loud_a = pole("LOVE", "emotional", 1.0).with_depth(0.1);
        let loud_b = pole("HATE", "emotional", 1.0).with_depth(0.1);
        let deep_a = pole("UNIVERSAL", "moral", 0.8).with_depth(1.0);
        let deep_b = pole("CONTEXTUAL", "moral", 0.8).with_depth(1.0);
        let s = engine()
            .process(&[&loud_a, &loud_b, &deep_a, &deep_b], None)
            .unwrap();
        assert_eq!(s.new_concept.name, "CONTEXTUAL_ETHICS");
    }

    /// Vetores de tamanhos diferentes: emergente sem vetor.
    #[test]
    fn mismatched_vectors_leave_no_embedding() {
        assert!(matches!(
            mean_embedding(&[1.0, 2.0], &[1.0]),
            Err(CognitiveError::DimensionMismatch { expected: 2, found: 1 })
        ));
        let a = pole("A", "x", 1.0).with_embedding(vec![1.0, 0.0, 0.0]);
        let b = pole("B", "x", 1.0).with_embedding(vec![0.0, 1.0]);
        let pair = DualityPair::measure(&a, &b, "x", 0.7);
        assert!(engine().synthesize(&pair, None).new_concept.embedding.is_none());
    }

    /// Comuns e diferenças por polo.
    #[test]
    fn features_and_differences() {
        let a = Concept::new("A").with_property("domain", "mind").with_property("tone", "cold");
        let b = Concept::new("B").with_property("domain", "mind").with_property("speed", 1);
        assert_eq!(common_features(&a, &b), vec!["domain=mind".to_string()]);
        let diff = differences(&a, &b);
        assert_eq!(diff.pole_a["tone"], json!("cold"));
        assert_eq!(diff.pole_b["tone"], json!(null));
        assert_eq!(diff.pole_a["speed"], json!(null));
        assert!(!diff.pole_a.contains_key("domain"));
    }
}
