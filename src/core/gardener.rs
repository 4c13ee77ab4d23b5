//! # Jardineiro — Decaimento e Poda do Grafo
//!
//! Uma vez por ciclo cognitivo o jardineiro percorre todos os conceitos e
//! aplica uma lista **ordenada** de regras. A primeira regra que decide
//! encerra a avaliação daquele conceito:
//!
//! ```text
//! 1. Protected      → tipo dna/core_value/emotion ou weight > 0.8   → intocado
//! 2. Incubation     → (≥2 links ou já incubando) e weight < 0.3     → rega (+0.02, teto 0.3)
//! 3. Bridge         → weight > 0.15 e link para vizinho com weight > 0.8 → protegido neste ciclo
//! 4. StandardDecay  → eff = base + (1 − base) × depth
//!                     weight *= eff; activation *= eff × 0.6
//!                     weight < 0.12 → esquecido
//! ```
//!
//! Remoções são aplicadas **depois** da passada completa, pelo grafo.

use std::collections::HashSet;

use crate::config::GardenerConfig;

use super::concept::{unit, Concept, ConceptId};

/// Regras do jardineiro, na ordem de avaliação.
pub const GARDENER_RULES: [GardenerRule; 4] = [
    GardenerRule::Protected,
    GardenerRule::Incubation,
    GardenerRule::Bridge,
    GardenerRule::StandardDecay,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GardenerRule {
    Protected,
    Incubation,
    Bridge,
    StandardDecay,
}

/// O que uma regra fez com o conceito.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// Regra de proteção decidiu: nada muda.
    Spared(GardenerRule),
    /// Peso regado pela incubação.
    Nurtured,
    /// Decaimento padrão aplicado; `forgotten` se caiu abaixo do limiar.
    Decayed { forgotten: bool },
}

/// Contexto imutável de uma passada.
pub struct Pass<'a> {
    pub config: &'a GardenerConfig,
    /// Conceitos com peso acima do limiar de proteção no início da passada.
    pub anchors: &'a HashSet<ConceptId>,
}

impl GardenerRule {
    /// Avalia a regra. `None` passa o conceito para a próxima regra.
    pub fn apply(&self, concept: &mut Concept, pass: &Pass<'_>) -> Option<Outcome> {
        let config = pass.config;
        match self {
            GardenerRule::Protected => {
                let protected = concept.is_foundational(&config.protected_types)
                    || concept.weight > config.protected_weight;
                protected.then_some(Outcome::Spared(*self))
            }
            GardenerRule::Incubation => {
                let promising = concept.links.len() >= config.incubation_min_links
                    || concept.is_incubating;
                if promising && concept.weight < config.incubation_ceiling {
                    concept.weight =
                        unit((concept.weight + config.incubation_step).min(config.incubation_ceiling));
                    concept.is_incubating = true;
                    Some(Outcome::Nurtured)
                } else {
                    None
                }
            }
            GardenerRule::Bridge => {
                let bridges = concept.weight > config.bridge_min_weight
                    && concept.links.iter().any(|l| pass.anchors.contains(&l.target));
                bridges.then_some(Outcome::Spared(*self))
            }
            GardenerRule::StandardDecay => {
                let base = unit(config.base_decay);
                let effective = base + (1.0 - base) * concept.depth;
                concept.weight = unit(concept.weight * effective);
                concept.activation =
                    unit(concept.activation * effective * config.activation_damping);
                Some(Outcome::Decayed {
                    forgotten: concept.weight < config.forgetting_threshold,
                })
            }
        }
    }
}

/// Contagem de decisões de uma passada.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GardenerReport {
    pub protected: usize,
    pub incubated: usize,
    pub bridged: usize,
    pub decayed: usize,
    /// Conceitos esquecidos, a remover do grafo.
    pub forgotten: Vec<ConceptId>,
}

/// Avalia um único conceito contra a lista de regras.
pub fn evaluate(concept: &mut Concept, pass: &Pass<'_>) -> Outcome {
    GARDENER_RULES
        .iter()
        .find_map(|rule| rule.apply(concept, pass))
        .unwrap_or(Outcome::Spared(GardenerRule::Protected))
}

/// Executa uma passada completa sobre `concepts` sem remover nada.
pub fn tend(concepts: &mut [Concept], config: &GardenerConfig) -> GardenerReport {
    let anchors: HashSet<ConceptId> = concepts
        .iter()
        .filter(|c| c.weight > config.protected_weight)
        .map(|c| c.id)
        .collect();
    let pass = Pass {
        config,
        anchors: &anchors,
    };

    let mut report = GardenerReport::default();
    for concept in concepts.iter_mut() {
        match evaluate(concept, &pass) {
            Outcome::Spared(GardenerRule::Bridge) => report.bridged += 1,
            Outcome::Spared(_) => report.protected += 1,
            Outcome::Nurtured => report.incubated += 1,
            Outcome::Decayed { forgotten } => {
                report.decayed += 1;
                if forgotten {
                    report.forgotten.push(concept.id);
                }
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RelationKind;
    use uuid::Uuid;

    fn run(rule: GardenerRule, concept: &mut Concept, anchors: &HashSet<ConceptId>) -> Option<Outcome> {
        let config = GardenerConfig::default();
        rule.apply(concept, &Pass { config: &config, anchors })
    }

    /// DNA e conceitos de peso alto são intocáveis.
    #[test]
    fn protected_rule() {
        let none = HashSet::new();
        let mut dna = Concept::new("Prawda").with_property("type", "dna").with_weight(0.1);
        let mut heavy = Concept::new("X").with_weight(0.81);
        let mut light = Concept::new("Y").with_weight(0.5);
        assert!(run(GardenerRule::Protected, &mut dna, &none).is_some());
        assert!(run(GardenerRule::Protected, &mut heavy, &none).is_some());
        assert!(run(GardenerRule::Protected, &mut light, &none).is_none());
    }

    /// Incubação rega até o teto de 0.3 e marca o conceito.
    #[test]
    fn incubation_rule() {
        let none = HashSet::new();
        let mut c = Concept::new("Ideia").with_weight(0.29);
        c.link_to(Uuid::new_v4(), 0.5, RelationKind::Generic);
        c.link_to(Uuid::new_v4(), 0.5, RelationKind::Generic);
        assert_eq!(run(GardenerRule::Incubation, &mut c, &none), Some(Outcome::Nurtured));
        assert!((c.weight - 0.3).abs() < 1e-9);
        assert!(c.is_incubating);

        let mut lonely = Concept::new("Solta").with_weight(0.2);
        assert!(run(GardenerRule::Incubation, &mut lonely, &none).is_none());
    }

    /// Já incubando basta, mesmo sem links.
    #[test]
    fn incubation_keeps_flagged_concepts() {
        let none = HashSet::new();
        let mut c = Concept::new("Broto").with_weight(0.1);
        c.is_incubating = true;
        assert_eq!(run(GardenerRule::Incubation, &mut c, &none), Some(Outcome::Nurtured));
        assert!((c.weight - 0.12).abs() < 1e-9);
    }

    /// Ponte para um conceito âncora é poupada.
    #[test]
    fn bridge_rule() {
        let anchor = Uuid::new_v4();
        let anchors: HashSet<ConceptId> = [anchor].into_iter().collect();
        let mut bridge = Concept::new("Ponte").with_weight(0.2);
        bridge.link_to(anchor, 0.5, RelationKind::Generic);
        assert_eq!(
            run(GardenerRule::Bridge, &mut bridge, &anchors),
            Some(Outcome::Spared(GardenerRule::Bridge))
        );

        let mut weak = Concept::new("Fraca").with_weight(0.15);
        weak.link_to(anchor, 0.5, RelationKind::Generic);
        assert!(run(GardenerRule::Bridge, &mut weak, &anchors).is_none());
    }

    /// Depth 1.0 é imune ao decaimento, qualquer que seja a taxa.
    #[test]
    fn full_depth_never_loses_weight() {
        let none = HashSet::new();
        for base in [0.0, 0.3, 0.95] {
            let config = GardenerConfig {
                base_decay: base,
                ..GardenerConfig::default()
            };
            let mut c = Concept::new("Raiz").with_weight(0.5).with_depth(1.0);
            GardenerRule::StandardDecay.apply(&mut c, &Pass { config: &config, anchors: &none });
            assert_eq!(c.weight, 0.5);
        }
    }

    /// Depth 0 sofre o decaimento base completo e a ativação cai mais rápido.
    #[test]
    fn zero_depth_full_decay() {
        let none = HashSet::new();
        let mut c = Concept::new("Raso").with_weight(0.5).with_depth(0.0).with_activation(1.0);
        let outcome = run(GardenerRule::StandardDecay, &mut c, &none);
        assert_eq!(outcome, Some(Outcome::Decayed { forgotten: false }));
        assert!((c.weight - 0.475).abs() < 1e-9);
        assert!((c.activation - 0.95 * 0.6).abs() < 1e-9);
    }

    /// Abaixo de 0.12 após o decaimento o conceito é esquecido.
    #[test]
    fn forgetting_threshold() {
        let none = HashSet::new();
        let mut c = Concept::new("Quase").with_weight(0.125).with_depth(0.0);
        assert_eq!(
            run(GardenerRule::StandardDecay, &mut c, &none),
            Some(Outcome::Decayed { forgotten: true })
        );
    }

    /// A passada completa respeita a ordem e conta cada decisão.
    #[test]
    fn tend_reports_each_rule() {
        let config = GardenerConfig::default();
        let anchor = Concept::new("Âncora").with_weight(0.9);
        let mut bridge = Concept::new("Ponte").with_weight(0.5);
        bridge.link_to(anchor.id, 0.7, RelationKind::Generic);
        let incubating = {
            let mut c = Concept::new("Broto").with_weight(0.2);
            c.is_incubating = true;
            c
        };
        let doomed = Concept::new("Fim").with_weight(0.1).with_depth(0.0);
        let doomed_id = doomed.id;

        let mut concepts = vec![anchor, bridge, incubating, doomed];
        let report = tend(&mut concepts, &config);
        assert_eq!(report.protected, 1);
        assert_eq!(report.bridged, 1);
        assert_eq!(report.incubated, 1);
        assert_eq!(report.decayed, 1);
        assert_eq!(report.forgotten, vec![doomed_id]);
    }
}
