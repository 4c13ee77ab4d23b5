//! # ConceptGraph — O Espaço Cognitivo
//!
//! O [`ConceptGraph`] armazena todos os conceitos em memória, na ordem de
//! inserção, e oferece as operações que o ciclo cognitivo usa:
//!
//! | Operação | Papel no ciclo |
//! |----------|----------------|
//! | [`add_concept`](ConceptGraph::add_concept) / [`remove_concept`](ConceptGraph::remove_concept) | ingestão e poda |
//! | [`find_similar`](ConceptGraph::find_similar) | busca por similaridade cosseno |
//! | [`spreading_activation`](ConceptGraph::spreading_activation) | propagação do estímulo |
//! | [`find_dualities`](ConceptGraph::find_dualities) | descoberta de polos em tensão |
//! | [`decay_all`](ConceptGraph::decay_all) | jardinagem (ver [`gardener`](super::gardener)) |
//! | [`evolve_era`](ConceptGraph::evolve_era) | transição de era cognitiva |
//!
//! ## Ordem e Índice
//!
//! Os conceitos vivem num `Vec` para que a enumeração de pares (e portanto
//! a escolha de sínteses) seja determinística. O índice `id → posição` é
//! `#[serde(skip)]` e precisa ser reconstruído via
//! [`rebuild_index()`](ConceptGraph::rebuild_index) após desserialização.
//!
//! ## Propagação de Ativação
//!
//! ```text
//! rodada h (1..=max_hops), sobre o snapshot da rodada anterior:
//!   para cada conceito com ativação > 0.01
//!     para cada link → vizinho
//!       proposta = ativação × strength × decay_factor^h
//!   vizinho = max(valor anterior, todas as propostas)
//! ```
//!
//! O máximo (e não a soma) impede que nós de alto fan-in acumulem ativação
//! sem limite: vence a associação individual mais forte.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::{DualityConfig, GardenerConfig};
use crate::error::{CognitiveError, Result};

use super::concept::{unit, Concept, ConceptId, GENESIS_ERA};
use super::duality::DualityPair;
use super::gardener;
use super::link::RelationKind;

/// Ativação abaixo da qual um conceito não propaga.
pub const PROPAGATION_EPSILON: f64 = 0.01;

/// Similaridade cosseno entre dois vetores.
///
/// Retorna `None` quando as dimensões diferem, algum vetor está vazio ou
/// tem norma zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a * norm_b))
}

/// Grafo de conceitos com links de saída embutidos em cada conceito.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptGraph {
    /// Era cognitiva corrente, carimbada em cada conceito inserido.
    #[serde(default = "genesis_era")]
    era: String,

    /// Conceitos em ordem de inserção.
    #[serde(default)]
    concepts: Vec<Concept>,

    /// `id → posição em concepts`. Não serializado.
    #[serde(skip, default)]
    index: HashMap<ConceptId, usize>,
}

fn genesis_era() -> String {
    GENESIS_ERA.to_string()
}

impl Default for ConceptGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptGraph {
    pub fn new() -> Self {
        Self {
            era: genesis_era(),
            concepts: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Reconstrói o índice `id → posição`. Chamar após desserialização.
    pub fn rebuild_index(&mut self) {
        self.index = self
            .concepts
            .iter()
            .enumerate()
            .map(|(pos, c)| (c.id, pos))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn era(&self) -> &str {
        &self.era
    }

    /// Todos os conceitos, em ordem de inserção.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    pub fn contains(&self, id: ConceptId) -> bool {
        self.index.contains_key(&id)
    }

    /// Insere o conceito (sobrescrevendo um de mesmo id) e carimba a era corrente.
    pub fn add_concept(&mut self, mut concept: Concept) -> ConceptId {
        let id = concept.id;
        concept.era = self.era.clone();
        tracing::debug!(id = %id, name = %concept.name, era = %self.era, "Grafo: conceito armazenado");
        match self.index.get(&id) {
            Some(&pos) => self.concepts[pos] = concept,
            None => {
                self.index.insert(id, self.concepts.len());
                self.concepts.push(concept);
            }
        }
        id
    }

    /// Remove o conceito e todos os links que apontam para ele.
    pub fn remove_concept(&mut self, id: ConceptId) -> Option<Concept> {
        let pos = *self.index.get(&id)?;
        let removed = self.concepts.remove(pos);
        self.strip_links_to(&HashSet::from([id]));
        self.rebuild_index();
        tracing::debug!(id = %id, name = %removed.name, "Grafo: conceito removido");
        Some(removed)
    }

    /// Remove vários conceitos de uma vez. Retorna os ids efetivamente removidos.
    pub fn remove_many(&mut self, ids: &[ConceptId]) -> Vec<ConceptId> {
        let doomed: HashSet<ConceptId> = ids.iter().copied().filter(|id| self.contains(*id)).collect();
        if doomed.is_empty() {
            return Vec::new();
        }
        let removed: Vec<ConceptId> = self
            .concepts
            .iter()
            .filter(|c| doomed.contains(&c.id))
            .map(|c| c.id)
            .collect();
        self.concepts.retain(|c| !doomed.contains(&c.id));
        self.strip_links_to(&doomed);
        self.rebuild_index();
        removed
    }

    fn strip_links_to(&mut self, gone: &HashSet<ConceptId>) {
        for concept in &mut self.concepts {
            concept.links.retain(|l| !gone.contains(&l.target));
        }
    }

    pub fn get(&self, id: ConceptId) -> Option<&Concept> {
        self.index.get(&id).map(|&pos| &self.concepts[pos])
    }

    pub fn get_mut(&mut self, id: ConceptId) -> Option<&mut Concept> {
        let pos = *self.index.get(&id)?;
        self.concepts.get_mut(pos)
    }

    /// Primeiro conceito (em ordem de inserção) com nome exatamente igual.
    pub fn find_by_name(&self, name: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.name == name)
    }

    /// Entre os conceitos com este nome, o ativado mais recentemente.
    /// Empates (inclusive nunca ativados) ficam com o inserido por último.
    pub fn latest_by_name(&self, name: &str) -> Option<&Concept> {
        self.concepts
            .iter()
            .filter(|c| c.name == name)
            .max_by_key(|c| c.last_activated)
    }

    /// Conceitos com similaridade cosseno ≥ `threshold`, do mais ao menos
    /// similar, truncados em `limit`.
    ///
    /// Conceitos sem vetor, de dimensão diferente ou de norma zero são
    /// ignorados.
    pub fn find_similar(&self, query: &[f32], threshold: f32, limit: usize) -> Vec<(ConceptId, f32)> {
        let mut hits: Vec<(ConceptId, f32)> = self
            .concepts
            .iter()
            .filter_map(|c| {
                let emb = c.embedding.as_deref()?;
                match cosine_similarity(query, emb) {
                    Some(sim) => Some((c.id, sim)),
                    None => {
                        tracing::debug!(id = %c.id, "Grafo: vetor incompatível ignorado na busca");
                        None
                    }
                }
            })
            .filter(|(_, sim)| *sim >= threshold)
            .collect();
        hits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        hits
    }

    /// Cria (ou sobrescreve) o link `from → to`.
    pub fn link_concepts(
        &mut self,
        from: ConceptId,
        to: ConceptId,
        strength: f64,
        relation: RelationKind,
    ) -> Result<()> {
        if !self.contains(to) {
            return Err(CognitiveError::UnknownConcept(to));
        }
        let source = self.get_mut(from).ok_or(CognitiveError::UnknownConcept(from))?;
        source.link_to(to, strength, relation);
        tracing::debug!(from = %from, to = %to, relation = relation.label(), "Grafo: link criado");
        Ok(())
    }

    /// Propaga ativação a partir de `sources` por exatamente `max_hops` rodadas.
    ///
    /// Ids desconhecidos e links para conceitos ausentes são ignorados.
    /// Ao final, todo conceito visitado tem sua ativação sobrescrita; os
    /// demais mantêm o valor anterior.
    pub fn spreading_activation(
        &mut self,
        sources: &[ConceptId],
        initial: f64,
        decay_factor: f64,
        max_hops: usize,
    ) -> HashMap<ConceptId, f64> {
        let initial = unit(initial);
        let decay_factor = unit(decay_factor);

        let mut activations: HashMap<ConceptId, f64> = HashMap::new();
        for id in sources {
            if self.contains(*id) {
                activations.insert(*id, initial);
            } else {
                tracing::debug!(id = %id, "Grafo: fonte desconhecida ignorada");
            }
        }

        for hop in 1..=max_hops {
            let attenuation = decay_factor.powi(hop as i32);
            let mut next = activations.clone();
            for (id, &act) in &activations {
                if act <= PROPAGATION_EPSILON {
                    continue;
                }
                let Some(concept) = self.get(*id) else { continue };
                for link in &concept.links {
                    if !self.contains(link.target) {
                        continue;
                    }
                    let proposed = act * link.strength * attenuation;
                    let slot = next.entry(link.target).or_insert(0.0);
                    if proposed > *slot {
                        *slot = proposed;
                    }
                }
            }
            activations = next;
        }

        for (id, act) in &activations {
            if let Some(concept) = self.get_mut(*id) {
                concept.set_activation(*act);
            }
        }
        tracing::debug!(sources = sources.len(), reached = activations.len(), "Grafo: ativação propagada");
        activations
    }

    /// Conceitos com ativação ≥ `threshold`, em ordem de inserção.
    pub fn active_concepts(&self, threshold: f64) -> Vec<&Concept> {
        self.concepts.iter().filter(|c| c.activation >= threshold).collect()
    }

    /// Dualidades entre os conceitos ativos acima de `threshold`.
    pub fn find_dualities(&self, threshold: f64, config: &DualityConfig) -> Vec<DualityPair> {
        discover_dualities(&self.active_concepts(threshold), config)
    }

    /// Uma passada do jardineiro. Retorna os ids esquecidos e removidos.
    pub fn decay_all(&mut self, config: &GardenerConfig) -> Vec<ConceptId> {
        let report = gardener::tend(&mut self.concepts, config);
        let removed = self.remove_many(&report.forgotten);
        tracing::info!(
            protected = report.protected,
            incubated = report.incubated,
            bridged = report.bridged,
            decayed = report.decayed,
            removed = removed.len(),
            "Jardineiro: passada concluída"
        );
        removed
    }

    /// Inicia uma nova era e descarta conceitos dormentes e leves.
    ///
    /// Tipos fundamentais sobrevivem sempre.
    pub fn evolve_era(&mut self, name: impl Into<String>, config: &GardenerConfig) -> Vec<ConceptId> {
        let name = name.into();
        let stale: Vec<ConceptId> = self
            .concepts
            .iter()
            .filter(|c| {
                c.activation < config.era_activation_floor
                    && c.weight < config.era_weight_floor
                    && !c.is_foundational(&config.protected_types)
            })
            .map(|c| c.id)
            .collect();
        let removed = self.remove_many(&stale);
        tracing::info!(from = %self.era, to = %name, removed = removed.len(), "Grafo: nova era");
        self.era = name;
        removed
    }

    /// Caminho de abstração seguindo o primeiro link `is_a` de cada conceito.
    pub fn hierarchical_path(&self, start: ConceptId) -> Vec<ConceptId> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.get(start);
        while let Some(concept) = current {
            if !seen.insert(concept.id) {
                break;
            }
            path.push(concept.id);
            current = concept
                .links
                .iter()
                .find(|l| l.relation == RelationKind::IsA)
                .and_then(|l| self.get(l.target));
        }
        path
    }

    /// Ids alcançáveis a partir de `seeds` em até `depth` saltos, em ordem de inserção.
    pub fn neighbourhood(&self, seeds: &[ConceptId], depth: usize) -> Vec<ConceptId> {
        let mut reached: HashSet<ConceptId> =
            seeds.iter().copied().filter(|id| self.contains(*id)).collect();
        let mut frontier: Vec<ConceptId> = reached.iter().copied().collect();
        for _ in 0..depth {
            let mut next = Vec::new();
            for id in &frontier {
                let Some(concept) = self.get(*id) else { continue };
                for link in &concept.links {
                    if self.contains(link.target) && reached.insert(link.target) {
                        next.push(link.target);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        self.concepts
            .iter()
            .filter(|c| reached.contains(&c.id))
            .map(|c| c.id)
            .collect()
    }
}

/// Enumera pares `i < j` de mesma categoria não nula, filtra pela oposição
/// mínima e ordena por atrito decrescente (ordenação estável).
pub fn discover_dualities(concepts: &[&Concept], config: &DualityConfig) -> Vec<DualityPair> {
    let mut pairs = Vec::new();
    for (i, a) in concepts.iter().enumerate() {
        let Some(category) = a.duality_category.as_deref() else { continue };
        for b in &concepts[i + 1..] {
            if b.duality_category.as_deref() != Some(category) {
                continue;
            }
            let pair = DualityPair::measure(a, b, category, config.fallback_opposition);
            if pair.opposition >= config.min_opposition {
                pairs.push(pair);
            }
        }
    }
    pairs.sort_by(|x, y| {
        y.friction
            .partial_cmp(&x.friction)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pairs
}
