//! # Tabela de Regras de Síntese
//!
//! Pares de polos conhecidos produzem conceitos emergentes escritos à mão.
//! A busca é feita por `(categoria, {polo A, polo B})` sem depender da ordem
//! dos polos: `LOCAL/GLOBAL` encontra a mesma regra que `GLOBAL/LOCAL`.
//!
//! | Categoria | Polos | Emergente | Peso | Tipo | Confiança |
//! |-----------|-------|-----------|------|------|-----------|
//! | cognitive | GLOBAL / LOCAL | HIERARCHICAL_REASONING | 0.7 | integration | 0.7 |
//! | cognitive | ANALYTICAL / INTUITIVE | INTEGRATED_THINKING | 0.7 | integration | 0.7 |
//! | emotional | LOVE / HATE | AMBIVALENCE | 0.8 | transcendence | 0.75 |
//! | emotional | FEAR / CALM | COURAGE | 0.8 | transcendence | 0.75 |
//! | moral | UNIVERSAL / CONTEXTUAL | CONTEXTUAL_ETHICS | 0.85 | integration | 0.8 |
//! | moral | ALTRUISTIC / EGOISTIC | ENLIGHTENED_SELF_INTEREST | 0.8 | integration | 0.8 |
//!
//! ## Fusão Genérica
//!
//! Qualquer outro par cai em [`generic_merge`]:
//!
//! ```text
//! numérico + numérico      → balanced_<chave> = média
//! iguais (não numéricos)   → <chave> = valor
//! diferentes               → spectrum_<chave> = "A <-> B"
//! só de um lado            → <chave> = valor
//! ```
//!
//! Os prefixos `balanced_` e `spectrum_` fazem parte do contrato de saída.

use serde::Serialize;
use serde_json::{json, Value};

use crate::core::{Concept, Properties};

/// Confiança fixa das sínteses sem regra conhecida.
pub const GENERIC_CONFIDENCE: f64 = 0.5;

/// Natureza da síntese.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisType {
    Integration,
    Transcendence,
    Balance,
}

impl SynthesisType {
    pub fn label(&self) -> &'static str {
        match self {
            SynthesisType::Integration => "integration",
            SynthesisType::Transcendence => "transcendence",
            SynthesisType::Balance => "balance",
        }
    }
}

/// Regra para um par de polos conhecido.
pub struct SynthesisTemplate {
    pub category: &'static str,
    pub poles: (&'static str, &'static str),
    pub emergent: &'static str,
    pub weight: f64,
    pub kind: SynthesisType,
    pub confidence: f64,
    properties: fn() -> Value,
    reasoning: fn(&Concept, &Concept) -> String,
}

impl SynthesisTemplate {
    /// `true` se a regra cobre este par, em qualquer ordem.
    pub fn covers(&self, category: &str, a: &str, b: &str) -> bool {
        self.category == category
            && ((self.poles.0 == a && self.poles.1 == b) || (self.poles.0 == b && self.poles.1 == a))
    }

    /// Propriedades curadas mais `integrates` com os nomes dos polos.
    pub fn properties(&self, a: &Concept, b: &Concept) -> Properties {
        let mut props = into_properties((self.properties)());
        props.insert("integrates".into(), json!([a.name, b.name]));
        props
    }

    pub fn reasoning(&self, a: &Concept, b: &Concept) -> String {
        (self.reasoning)(a, b)
    }
}

fn into_properties(value: Value) -> Properties {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => Properties::new(),
    }
}

/// Regras conhecidas, na ordem da tabela acima.
pub static SYNTHESIS_RULES: [SynthesisTemplate; 6] = [
    SynthesisTemplate {
        category: "cognitive",
        poles: ("GLOBAL", "LOCAL"),
        emergent: "HIERARCHICAL_REASONING",
        weight: 0.7,
        kind: SynthesisType::Integration,
        confidence: 0.7,
        properties: || {
            json!({
                "mechanism": "multi_scale_analysis",
                "strategy": [
                    "Start with global overview",
                    "Identify critical local areas",
                    "Zoom into details",
                    "Validate against global context",
                    "Iterate between scales"
                ],
                "type": "cognitive_synthesis"
            })
        },
        reasoning: |a, b| {
            format!(
                "Detected tension between {} (activation={:.2}) and {} (activation={:.2}). \
                 Created HIERARCHICAL_REASONING to integrate both perspectives: \
                 use global view to guide, local view to validate.",
                a.name, a.activation, b.name, b.activation
            )
        },
    },
    SynthesisTemplate {
        category: "cognitive",
        poles: ("ANALYTICAL", "INTUITIVE"),
        emergent: "INTEGRATED_THINKING",
        weight: 0.7,
        kind: SynthesisType::Integration,
        confidence: 0.7,
        properties: || {
            json!({
                "mechanism": "dual_mode_cognition",
                "strategy": [
                    "Use intuition for hypothesis generation",
                    "Use analysis for validation",
                    "Iterate between modes",
                    "Trust intuition when time-constrained",
                    "Trust analysis when stakes are high"
                ],
                "type": "cognitive_synthesis"
            })
        },
        reasoning: |a, b| {
            format!(
                "Synthesized {} and {} into INTEGRATED_THINKING: \
                 use both modes complementarily based on context.",
                a.name, b.name
            )
        },
    },
    SynthesisTemplate {
        category: "emotional",
        poles: ("LOVE", "HATE"),
        emergent: "AMBIVALENCE",
        weight: 0.8,
        kind: SynthesisType::Transcendence,
        confidence: 0.75,
        properties: || {
            json!({
                "valence": 0.0,
                "arousal": 1.0,
                "complexity": "high",
                "description": "Simultaneous conflicting emotions toward same target",
                "coping_strategies": [
                    "Acknowledge both feelings",
                    "Understand context of each",
                    "Accept complexity",
                    "Avoid forced resolution"
                ],
                "type": "emotional_synthesis"
            })
        },
        reasoning: |a, b| {
            format!(
                "Detected simultaneous {} and {} toward same target. \
                 This is AMBIVALENCE - a complex emotional state that integrates both. \
                 Not a compromise, but a higher-order emotional understanding.",
                a.name, b.name
            )
        },
    },
    SynthesisTemplate {
        category: "emotional",
        poles: ("FEAR", "CALM"),
        emergent: "COURAGE",
        weight: 0.8,
        kind: SynthesisType::Transcendence,
        confidence: 0.75,
        properties: || {
            json!({
                "valence": 0.3,
                "arousal": 0.6,
                "description": "Acting despite fear, not absence of fear",
                "mechanism": "Acknowledge fear but choose calm action",
                "type": "emotional_synthesis"
            })
        },
        reasoning: |a, b| {
            format!(
                "COURAGE emerges from tension between {} and {}. \
                 It's not absence of fear, but calm action despite fear.",
                a.name, b.name
            )
        },
    },
    SynthesisTemplate {
        category: "moral",
        poles: ("UNIVERSAL", "CONTEXTUAL"),
        emergent: "CONTEXTUAL_ETHICS",
        weight: 0.85,
        kind: SynthesisType::Integration,
        confidence: 0.8,
        properties: || {
            json!({
                "principle": "Universal values applied with contextual wisdom",
                "mechanism": [
                    "Start with universal principles",
                    "Examine specific context",
                    "Weigh competing values",
                    "Make situated judgment",
                    "Remain accountable to principles"
                ],
                "type": "moral_synthesis"
            })
        },
        reasoning: |a, b| {
            format!(
                "Synthesized {} and {} ethics into CONTEXTUAL_ETHICS: \
                 universal principles guide, but context determines application.",
                a.name, b.name
            )
        },
    },
    SynthesisTemplate {
        category: "moral",
        poles: ("ALTRUISTIC", "EGOISTIC"),
        emergent: "ENLIGHTENED_SELF_INTEREST",
        weight: 0.8,
        kind: SynthesisType::Integration,
        confidence: 0.8,
        properties: || {
            json!({
                "principle": "Helping others serves long-term self-interest",
                "mechanisms": [
                    "Build social capital",
                    "Create reciprocity networks",
                    "Gain reputation",
                    "Psychological rewards",
                    "Sustainable communities"
                ],
                "type": "moral_synthesis"
            })
        },
        reasoning: |a, b| {
            format!(
                "Resolved tension between {} and {} through ENLIGHTENED_SELF_INTEREST: \
                 altruism and self-interest align in long term.",
                a.name, b.name
            )
        },
    },
];

/// Regra para o par, se houver.
pub fn lookup(category: &str, a: &str, b: &str) -> Option<&'static SynthesisTemplate> {
    SYNTHESIS_RULES.iter().find(|rule| rule.covers(category, a, b))
}

/// Texto de um valor para `spectrum_` e `key=value`: strings sem aspas, o resto em JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn present(props: &Properties, key: &str) -> Option<Value> {
    props.get(key).filter(|v| !v.is_null()).cloned()
}

/// Funde as propriedades de dois polos sem regra conhecida.
///
/// Booleanos não são numéricos. `null` conta como ausente.
pub fn generic_merge(a: &Concept, b: &Concept) -> Properties {
    let mut merged = Properties::new();
    let keys: std::collections::BTreeSet<&String> =
        a.properties.keys().chain(b.properties.keys()).collect();

    for key in keys {
        match (present(&a.properties, key), present(&b.properties, key)) {
            (Some(va), Some(vb)) => match (va.as_f64(), vb.as_f64()) {
                (Some(x), Some(y)) => {
                    merged.insert(format!("balanced_{key}"), json!((x + y) / 2.0));
                }
                _ if va == vb => {
                    merged.insert(key.clone(), va);
                }
                _ => {
                    merged.insert(
                        format!("spectrum_{key}"),
                        Value::String(format!("{} <-> {}", display_value(&va), display_value(&vb))),
                    );
                }
            },
            (Some(v), None) | (None, Some(v)) => {
                merged.insert(key.clone(), v);
            }
            (None, None) => {
                merged.insert(key.clone(), Value::Null);
            }
        }
    }
    merged
}

/// Nome determinístico da síntese genérica.
pub fn generic_name(a: &Concept, b: &Concept) -> String {
    format!("{}_{}_INTEGRATION", a.name, b.name)
}

/// Propriedades completas da síntese genérica.
pub fn generic_properties(a: &Concept, b: &Concept) -> Properties {
    let mut props = generic_merge(a, b);
    props.insert("integrates".into(), json!([a.name, b.name]));
    props.insert("type".into(), json!("dynamic_synthesis"));
    props.insert("emergence_reason".into(), json!("unrecognized_duality"));
    props
}

pub fn generic_reasoning(a: &Concept, b: &Concept, fused: usize) -> String {
    format!(
        "Dynamic synthesis created {} from {} and {}. Fused {} properties. \
         This represents a novel balance between the two poles.",
        generic_name(a, b),
        a.name,
        b.name,
        fused
    )
}
