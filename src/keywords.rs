//! # Conjuntos de Palavras-Chave
//!
//! Vários pontos do ciclo reagem a termos no contexto livre ou nas
//! propriedades de um conceito: urgência, rotina, criticidade, dano.
//! A semântica é sempre a mesma: **substring, sem diferenciar maiúsculas**
//! (`"URGENT"` casa com `"urgent"`, `"harmful"` casa com `"harm"`).
//!
//! Cada [`KeywordSet`] compila os termos numa única alternância regex
//! (`(?i)(?:harm|damage|...)`), com os termos escapados.

use regex::Regex;

/// Conjunto de termos testado por substring, sem diferenciar maiúsculas.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    pattern: Option<Regex>,
}

impl KeywordSet {
    pub fn new(terms: &[&str]) -> Self {
        let alternation = terms
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        // Termos escapados sempre formam uma regex válida; conjunto vazio nunca casa.
        let pattern = if alternation.is_empty() {
            None
        } else {
            Regex::new(&format!("(?i)(?:{alternation})")).ok()
        };
        Self { pattern }
    }

    /// `true` se algum termo aparece em `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Trecho de `text` que casou com o primeiro termo encontrado.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.as_ref()?.find(text).map(|m| m.as_str())
    }
}
