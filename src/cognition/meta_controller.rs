//! # MetaController — Alocação de Atenção
//!
//! Decide **em que** o ciclo se concentra e **com que urgência**.
//!
//! ## Regimes (avaliados em ordem)
//!
//! | Condição | Modo | Profundidade | Foco |
//! |----------|------|--------------|------|
//! | `friction > 0.7` | local | deep | 3 maiores `depth + weight` |
//! | `vitality > 0.7` | global | shallow | 7 maiores ativações |
//! | caso contrário | balanced | medium | 5 maiores ativações |
//!
//! Sob tensão alta o sistema se ancora nos conceitos fundamentais; com
//! vitalidade alta, abre-se à novidade.
//!
//! ## Urgência
//!
//! ```text
//! urgency = 0.5 + média(ativação) × 0.3 + (emergentes / 10) × 0.2
//!         + 0.3  se o contexto contém urgent/critical/emergency
//!         − 0.2  senão, se contém routine/normal
//! ```
//!
//! ## Modulação de Atrito
//!
//! Para escolher entre várias dualidades, o atrito bruto é multiplicado pela
//! sensibilidade da categoria e por um modificador de intensidade extraído
//! do contexto (ver [`CognitiveSensitivity`]).

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{concept::unit, Concept, ConceptId, DualityPair};
use crate::keywords::KeywordSet;

/// Quantas alocações o histórico guarda.
pub const HISTORY_CAPACITY: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttentionMode {
    Local,
    Global,
    Balanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingDepth {
    Shallow,
    Medium,
    Deep,
}

/// Resultado da alocação: ids em foco, na ordem de prioridade.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttentionAllocation {
    pub focus: Vec<ConceptId>,
    pub mode: AttentionMode,
    pub depth: ProcessingDepth,
    pub urgency: f64,
}

impl AttentionAllocation {
    fn idle() -> Self {
        Self {
            focus: Vec::new(),
            mode: AttentionMode::Balanced,
            depth: ProcessingDepth::Shallow,
            urgency: 0.0,
        }
    }
}

/// Entrada do histórico de decisões.
#[derive(Clone, Debug, Serialize)]
pub struct AttentionRecord {
    pub allocation: AttentionAllocation,
    pub context: Option<String>,
    pub concept_count: usize,
    pub at: DateTime<Utc>,
}

/// Sensibilidade por categoria e intensidade por contexto.
#[derive(Clone, Debug)]
pub struct CognitiveSensitivity {
    amplify: KeywordSet,
    dampen: KeywordSet,
}

impl Default for CognitiveSensitivity {
    fn default() -> Self {
        Self {
            amplify: KeywordSet::new(&["critical", "urgent", "important", "life"]),
            dampen: KeywordSet::new(&["routine", "minor", "trivial"]),
        }
    }
}

impl CognitiveSensitivity {
    pub fn category_sensitivity(category: &str) -> f64 {
        match category {
            "emotional" => 0.7,
            "cognitive" => 0.9,
            "moral" => 0.8,
            _ => 0.5,
        }
    }

    /// ×1.5 para contextos críticos, ×0.5 para rotineiros, ×1.0 caso contrário.
    pub fn intensity(&self, context: Option<&str>) -> f64 {
        match context {
            Some(c) if self.amplify.matches(c) => 1.5,
            Some(c) if self.dampen.matches(c) => 0.5,
            _ => 1.0,
        }
    }

    /// Atrito modulado, limitado a 1.0.
    pub fn modulate_friction(&self, friction: f64, category: &str, context: Option<&str>) -> f64 {
        (friction * Self::category_sensitivity(category) * self.intensity(context)).min(1.0)
    }
}

/// Controlador de atenção com histórico limitado.
#[derive(Debug)]
pub struct MetaController {
    sensitivity: CognitiveSensitivity,
    urgent: KeywordSet,
    routine: KeywordSet,
    history: VecDeque<AttentionRecord>,
    decisions: u64,
}

impl Default for MetaController {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaController {
    pub fn new() -> Self {
        Self {
            sensitivity: CognitiveSensitivity::default(),
            urgent: KeywordSet::new(&["urgent", "critical", "emergency"]),
            routine: KeywordSet::new(&["routine", "normal"]),
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            decisions: 0,
        }
    }

    /// Escolhe regime, foco e urgência para os conceitos ativos.
    pub fn allocate_attention(
        &mut self,
        active: &[&Concept],
        context: Option<&str>,
        vitality: f64,
        friction: f64,
    ) -> AttentionAllocation {
        if active.is_empty() {
            return AttentionAllocation::idle();
        }

        let mut ranked: Vec<&Concept> = active.to_vec();
        let (mode, depth, take) = if friction > 0.7 {
            ranked.sort_by(|a, b| {
                (b.depth + b.weight)
                    .partial_cmp(&(a.depth + a.weight))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            (AttentionMode::Local, ProcessingDepth::Deep, 3)
        } else {
            ranked.sort_by(|a, b| {
                b.activation
                    .partial_cmp(&a.activation)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            if vitality > 0.7 {
                (AttentionMode::Global, ProcessingDepth::Shallow, 7)
            } else {
                (AttentionMode::Balanced, ProcessingDepth::Medium, 5)
            }
        };
        ranked.truncate(take);

        let avg_activation = active.iter().map(|c| c.activation).sum::<f64>() / active.len() as f64;
        let emergent = active.iter().filter(|c| c.is_emergent).count();
        let allocation = AttentionAllocation {
            focus: ranked.iter().map(|c| c.id).collect(),
            mode,
            depth,
            urgency: self.urgency(context, avg_activation, emergent),
        };

        tracing::debug!(
            mode = ?allocation.mode,
            depth = ?allocation.depth,
            focus = allocation.focus.len(),
            urgency = allocation.urgency,
            "Atenção alocada"
        );
        self.remember(&allocation, context, active.len());
        allocation
    }

    pub fn urgency(&self, context: Option<&str>, avg_activation: f64, emergent: usize) -> f64 {
        let mut urgency = 0.5 + avg_activation * 0.3 + (emergent as f64 / 10.0) * 0.2;
        if let Some(c) = context {
            if self.urgent.matches(c) {
                urgency += 0.3;
            } else if self.routine.matches(c) {
                urgency -= 0.2;
            }
        }
        unit(urgency)
    }

    /// Dualidade de maior atrito modulado. Em empate fica a primeira.
    pub fn select_primary_duality<'a>(
        &self,
        dualities: &'a [DualityPair],
        context: Option<&str>,
    ) -> Option<&'a DualityPair> {
        let mut best: Option<(&DualityPair, f64)> = None;
        for pair in dualities {
            let score = self.sensitivity.modulate_friction(pair.friction, &pair.category, context);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((pair, score));
            }
        }
        best.map(|(pair, _)| pair)
    }

    pub fn sensitivity(&self) -> &CognitiveSensitivity {
        &self.sensitivity
    }

    fn remember(&mut self, allocation: &AttentionAllocation, context: Option<&str>, concept_count: usize) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(AttentionRecord {
            allocation: allocation.clone(),
            context: context.map(str::to_string),
            concept_count,
            at: Utc::now(),
        });
        self.decisions += 1;
    }

    /// Últimas alocações, da mais antiga para a mais recente.
    pub fn history(&self) -> impl Iterator<Item = &AttentionRecord> {
        self.history.iter()
    }

    /// Total de alocações desde a criação (inclusive as que saíram do histórico).
    pub fn decision_count(&self) -> u64 {
        self.decisions
    }
}
