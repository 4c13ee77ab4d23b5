//! # DualityPair — Dois Polos em Tensão
//!
//! Uma dualidade é um par de conceitos da mesma categoria que o grafo
//! julga semanticamente opostos. É um valor **efêmero**: calculado sob
//! demanda pela descoberta de dualidades e nunca persistido.
//!
//! ```text
//! opposition = 1 − cos(embedding_A, embedding_B)     (ambos com vetor)
//!            = fallback (0.7)                         (caso contrário)
//! friction   = activation_A × activation_B × opposition
//! ```
//!
//! O atrito só é alto quando os **dois** polos estão salientes ao mesmo
//! tempo e são de fato opostos.

use serde::Serialize;

use super::concept::{Concept, ConceptId};
use super::graph::cosine_similarity;

/// Par de conceitos em relação de dualidade.
///
/// Os polos são cópias do estado no momento da descoberta.
#[derive(Clone, Debug)]
pub struct DualityPair {
    pub pole_a: Concept,
    pub pole_b: Concept,
    pub category: String,
    /// Distância semântica entre os polos (`1 − cos`, pode passar de 1.0
    /// quando os vetores apontam em sentidos contrários).
    pub opposition: f64,
    /// Tensão cognitiva.
    pub friction: f64,
}

impl DualityPair {
    /// Mede oposição e atrito de dois polos.
    pub fn measure(
        pole_a: &Concept,
        pole_b: &Concept,
        category: impl Into<String>,
        fallback_opposition: f64,
    ) -> Self {
        let opposition = opposition_between(pole_a, pole_b, fallback_opposition);
        Self {
            pole_a: pole_a.clone(),
            pole_b: pole_b.clone(),
            category: category.into(),
            opposition,
            friction: friction_of(pole_a.activation, pole_b.activation, opposition),
        }
    }

    /// Resumo serializável para o registro de decisão.
    pub fn summary(&self) -> DualitySummary {
        DualitySummary {
            pole_a: self.pole_a.name.clone(),
            pole_b: self.pole_b.name.clone(),
            pole_a_id: self.pole_a.id,
            pole_b_id: self.pole_b.id,
            category: self.category.clone(),
            opposition: self.opposition,
            friction: self.friction,
        }
    }
}

/// Oposição entre dois conceitos.
///
/// Vetores ausentes, de dimensões diferentes ou de norma zero caem no
/// valor heurístico `fallback`.
pub fn opposition_between(a: &Concept, b: &Concept, fallback: f64) -> f64 {
    match (&a.embedding, &b.embedding) {
        (Some(ea), Some(eb)) => cosine_similarity(ea, eb)
            .map(|sim| 1.0 - sim as f64)
            .unwrap_or(fallback),
        _ => fallback,
    }
}

/// `friction = activation_a × activation_b × opposition`
pub fn friction_of(activation_a: f64, activation_b: f64, opposition: f64) -> f64 {
    activation_a * activation_b * opposition
}

/// Visão serializável de uma [`DualityPair`].
#[derive(Clone, Debug, Serialize)]
pub struct DualitySummary {
    pub pole_a: String,
    pub pole_b: String,
    pub pole_a_id: ConceptId,
    pub pole_b_id: ConceptId,
    pub category: String,
    pub opposition: f64,
    pub friction: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sem vetores, a oposição é o valor heurístico.
    #[test]
    fn fallback_without_embeddings() {
        let a = Concept::new("A");
        let b = Concept::new("B").with_embedding(vec![1.0, 0.0]);
        assert_eq!(opposition_between(&a, &b, 0.7), 0.7);
    }

    /// Vetores opostos dão oposição 2.0.
    #[test]
    fn opposite_vectors() {
        let a = Concept::new("A").with_embedding(vec![1.0, 0.0]);
        let b = Concept::new("B").with_embedding(vec![-1.0, 0.0]);
        assert!((opposition_between(&a, &b, 0.7) - 2.0).abs() < 1e-6);
    }

    /// Dimensões diferentes também caem no heurístico.
    #[test]
    fn mismatched_dimensions_fall_back() {
        let a = Concept::new("A").with_embedding(vec![1.0, 0.0, 0.0]);
        let b = Concept::new("B").with_embedding(vec![-1.0, 0.0]);
        assert_eq!(opposition_between(&a, &b, 0.7), 0.7);
    }

    /// O atrito cresce com a ativação de cada polo, mantido o outro fixo.
    #[test]
    fn friction_is_monotonic_in_each_pole() {
        let opposition = 0.8;
        let mut previous = -1.0;
        for step in 0..=10 {
            let act = step as f64 / 10.0;
            let f = friction_of(act, 0.6, opposition);
            assert!(f >= previous);
            assert_eq!(f, friction_of(0.6, act, opposition));
            previous = f;
        }
    }

    /// `measure` combina ativação e oposição.
    #[test]
    fn measure_computes_friction() {
        let a = Concept::new("A").with_activation(0.5);
        let b = Concept::new("B").with_activation(0.8);
        let pair = DualityPair::measure(&a, &b, "moral", 0.7);
        assert!((pair.friction - 0.5 * 0.8 * 0.7).abs() < 1e-9);
        assert_eq!(pair.summary().pole_b, "B");
    }
}
