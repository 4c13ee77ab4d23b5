//! # Link — Aresta Dirigida, Ponderada e Tipada
//!
//! Um [`Link`] liga o conceito dono a um `target` com uma força em [0, 1]
//! e um tipo de relação ([`RelationKind`]). O link pertence ao conceito de
//! origem: o grafo é uma lista de adjacência, sem entidade de aresta própria.
//!
//! ## Tipos de Relação
//!
//! | Tipo | Significado | Exemplo |
//! |------|-------------|---------|
//! | `Generic` | associação genérica | "Chuva" — "Guarda-chuva" |
//! | `IsA` | "é um" | "Gato é um Animal" |
//! | `Causes` | causalidade | "Chuva causa Enchente" |
//! | `Inhibits` | inibição | "Medo inibe Ação" |
//! | `SynthesizedFrom` | emergente → polo de origem | "COURAGE ← FEAR" |
//! | `Antonym` | oposição declarada | "LOVE ↔ HATE" |

use serde::{Deserialize, Serialize};

use super::concept::{unit, ConceptId};

/// Tipo de relação semântica de um [`Link`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    #[default]
    Generic,
    IsA,
    Causes,
    Inhibits,
    SynthesizedFrom,
    Antonym,
}

impl RelationKind {
    /// Rótulo curto usado em logs e na saída da CLI.
    pub fn label(&self) -> &'static str {
        match self {
            RelationKind::Generic => "generic",
            RelationKind::IsA => "is_a",
            RelationKind::Causes => "causes",
            RelationKind::Inhibits => "inhibits",
            RelationKind::SynthesizedFrom => "synthesized_from",
            RelationKind::Antonym => "antonym",
        }
    }
}

/// Aresta de saída de um conceito.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Conceito de destino.
    pub target: ConceptId,
    /// Força da associação, limitada a [0, 1].
    pub strength: f64,
    /// Tipo de relação.
    #[serde(default)]
    pub relation: RelationKind,
}

impl Link {
    pub fn new(target: ConceptId, strength: f64, relation: RelationKind) -> Self {
        Self {
            target,
            strength: unit(strength),
            relation,
        }
    }
}
