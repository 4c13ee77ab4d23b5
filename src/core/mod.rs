//! # Módulo Core — Tipos Fundamentais do Espaço Cognitivo
//!
//! Tudo na camada cognitiva gira em torno destes tipos:
//!
//! - [`Concept`] — unidade atômica (nome, vetor, propriedades, quatro escalares)
//! - [`Link`] / [`RelationKind`] — aresta dirigida, ponderada e tipada
//! - [`ConceptGraph`] — contêiner em memória com propagação de ativação
//! - [`DualityPair`] — dois polos da mesma categoria em tensão
//! - [`gardener`] — política de decaimento e poda
//!
//! ## Analogia: O Jardim
//!
//! - Cada [`Concept`] é uma **planta**: brota, ganha peso, pode murchar
//! - Cada [`Link`] é uma **raiz** ligando plantas
//! - O [`gardener`] **poda** o que murchou e **rega** o que está brotando
//!
//! ```rust
//! use cognitive_layer::core::{Concept, ConceptGraph, RelationKind};
//!
//! let mut grafo = ConceptGraph::new();
//! let medo = grafo.add_concept(Concept::new("FEAR"));
//! let calma = grafo.add_concept(Concept::new("CALM"));
//! grafo.link_concepts(medo, calma, 0.6, RelationKind::Antonym).unwrap();
//!
//! let ativacoes = grafo.spreading_activation(&[medo], 1.0, 0.7, 3);
//! assert!(ativacoes[&calma] > 0.0);
//! ```

pub mod concept;
pub mod duality;
pub mod gardener;
pub mod graph;
pub mod link;

pub use concept::{Concept, ConceptId, ConceptSpec, Properties, GENESIS_ERA};
pub use duality::{DualityPair, DualitySummary};
pub use graph::{cosine_similarity, discover_dualities, ConceptGraph};
pub use link::{Link, RelationKind};
