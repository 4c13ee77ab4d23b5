//! # Concept — Unidade Atômica do Espaço Cognitivo
//!
//! Um [`Concept`] é a menor unidade da camada cognitiva. Não é apenas um
//! embedding: é uma estrutura semântica com identidade, representação,
//! estado dinâmico, relações e história.
//!
//! ## Quatro Escalares Independentes
//!
//! | Campo | Faixa | Semântica |
//! |-------|-------|-----------|
//! | `activation` | [0, 1] | Quão ativo **agora** — transitório, decai todo ciclo, nunca é persistido |
//! | `weight` | [0, 1] | Importância geral (saliência) — decide quem sobrevive à poda |
//! | `depth` | [0, 1] | Resistência ao decaimento — `1.0` é imune |
//! | `valence` | [-1, 1] | Carga emocional |
//!
//! Todos os escalares são mantidos dentro da faixa após qualquer mutação
//! feita pelos métodos deste módulo.
//!
//! ## Entrada do Chamador
//!
//! Quem está fora do núcleo descreve conceitos com um [`ConceptSpec`]
//! (nome, vetor opcional, propriedades, escalares opcionais). O núcleo
//! nunca gera embeddings: eles chegam prontos ou não chegam.
//!
//! ```rust
//! use cognitive_layer::core::{ConceptSpec, RelationKind};
//!
//! let spec = ConceptSpec::named("GLOBAL").with_category("cognitive");
//! let mut conceito = spec.into_concept();
//! assert_eq!(conceito.activation, 0.0);
//! conceito.link_to(uuid::Uuid::new_v4(), 1.7, RelationKind::IsA);
//! assert_eq!(conceito.links[0].strength, 1.0);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use super::link::{Link, RelationKind};

/// Alias de tipo para o identificador de um [Concept].
pub type ConceptId = Uuid;

/// Mapa de propriedades arbitrárias de um conceito.
///
/// `BTreeMap` para que a serialização e a iteração sejam determinísticas.
pub type Properties = BTreeMap<String, Value>;

/// Era atribuída a conceitos criados antes de qualquer transição.
pub const GENESIS_ERA: &str = "genesis";

fn genesis() -> String {
    GENESIS_ERA.to_string()
}

/// Limita um valor a [0, 1]. `NaN` vira 0.
pub(crate) fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Limita um valor a [-1, 1]. `NaN` vira 0.
pub(crate) fn signed_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Um conceito no grafo cognitivo.
///
/// Os links de saída pertencem ao próprio conceito (lista de adjacência);
/// não existe entidade de aresta separada.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Concept {
    /// Identificador único e estável durante toda a vida do conceito.
    pub id: ConceptId,

    /// Nome legível. Não precisa ser único.
    pub name: String,

    /// Vetor semântico opcional, fornecido pelo chamador.
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,

    /// Propriedades livres. `type` marca conceitos fundamentais
    /// (`dna`, `core_value`, `emotion`).
    #[serde(default)]
    pub properties: Properties,

    /// Ativação transitória. **Não serializada**: após recarregar vale 0.
    #[serde(skip)]
    pub activation: f64,

    /// Saliência persistente.
    pub weight: f64,

    /// Resistência ao decaimento.
    pub depth: f64,

    /// Carga emocional.
    #[serde(default)]
    pub valence: f64,

    /// Links de saída, no máximo um por alvo.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Conceito nascente protegido pelo jardineiro.
    #[serde(default)]
    pub is_incubating: bool,

    /// Produzido por síntese.
    #[serde(default)]
    pub is_emergent: bool,

    /// IDs dos polos que originaram este conceito (apenas emergentes).
    #[serde(default)]
    pub parent_concepts: Vec<ConceptId>,

    /// Contexto situacional em que o conceito emergiu.
    #[serde(default)]
    pub emergence_context: Option<String>,

    /// Categoria usada para agrupar conceitos opostos.
    #[serde(default)]
    pub duality_category: Option<String>,

    /// Era cognitiva em que o conceito foi inserido no grafo.
    #[serde(default = "genesis")]
    pub era: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub last_activated: Option<DateTime<Utc>>,

    #[serde(default)]
    pub activation_count: u32,
}

impl Concept {
    /// Cria um conceito com os valores iniciais padrão
    /// (`activation = 0`, `weight = 0.5`, `depth = 0.5`, `valence = 0`).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            embedding: None,
            properties: Properties::new(),
            activation: 0.0,
            weight: 0.5,
            depth: 0.5,
            valence: 0.0,
            links: Vec::new(),
            is_incubating: false,
            is_emergent: false,
            parent_concepts: Vec::new(),
            emergence_context: None,
            duality_category: None,
            era: genesis(),
            created_at: Utc::now(),
            last_activated: None,
            activation_count: 0,
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.duality_category = Some(category.into());
        self
    }

    pub fn with_activation(mut self, activation: f64) -> Self {
        self.activation = unit(activation);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = unit(weight);
        self
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = unit(depth);
        self
    }

    pub fn with_valence(mut self, valence: f64) -> Self {
        self.valence = signed_unit(valence);
        self
    }

    /// Soma `strength` à ativação atual (limitada a 1.0) e registra o evento.
    pub fn activate(&mut self, strength: f64) {
        self.set_activation(self.activation + strength);
    }

    /// Sobrescreve a ativação (limitada) e registra o evento.
    pub fn set_activation(&mut self, activation: f64) {
        self.activation = unit(activation);
        self.last_activated = Some(Utc::now());
        self.activation_count = self.activation_count.saturating_add(1);
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = unit(weight);
    }

    pub fn set_depth(&mut self, depth: f64) {
        self.depth = unit(depth);
    }

    /// Cria ou sobrescreve o link para `target`.
    pub fn link_to(&mut self, target: ConceptId, strength: f64, relation: RelationKind) {
        let link = Link::new(target, strength, relation);
        match self.links.iter_mut().find(|l| l.target == target) {
            Some(existing) => *existing = link,
            None => self.links.push(link),
        }
    }

    /// Força do link para `target`, ou 0.0 se não houver.
    pub fn link_strength(&self, target: ConceptId) -> f64 {
        self.link(target).map(|l| l.strength).unwrap_or(0.0)
    }

    pub fn link(&self, target: ConceptId) -> Option<&Link> {
        self.links.iter().find(|l| l.target == target)
    }

    /// Valor da propriedade `type`, se for string.
    pub fn concept_type(&self) -> Option<&str> {
        self.properties.get("type").and_then(Value::as_str)
    }

    /// `true` se o `type` do conceito estiver na lista de tipos fundamentais.
    pub fn is_foundational(&self, protected_types: &[String]) -> bool {
        self.concept_type()
            .map(|t| protected_types.iter().any(|p| p == t))
            .unwrap_or(false)
    }
}

/// Descrição de um conceito fornecida pelo chamador.
///
/// Campos numéricos ausentes assumem os padrões de [`Concept::new`];
/// valores fora da faixa são limitados.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConceptSpec {
    pub name: String,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub activation: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub depth: Option<f64>,
    #[serde(default)]
    pub valence: Option<f64>,
    #[serde(default)]
    pub is_incubating: bool,
    #[serde(default)]
    pub duality_category: Option<String>,
}

impl ConceptSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.duality_category = Some(category.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Materializa o conceito. O nome passa por normalização Unicode NFC.
    pub fn into_concept(self) -> Concept {
        let name: String = self.name.nfc().collect();
        let mut concept = Concept::new(name);
        concept.embedding = self.embedding;
        concept.properties = self.properties;
        concept.is_incubating = self.is_incubating;
        concept.duality_category = self.duality_category;
        if let Some(a) = self.activation {
            concept.activation = unit(a);
        }
        if let Some(w) = self.weight {
            concept.weight = unit(w);
        }
        if let Some(d) = self.depth {
            concept.depth = unit(d);
        }
        if let Some(v) = self.valence {
            concept.valence = signed_unit(v);
        }
        concept
    }
}
