//! # Persistência — Grafo e Consciência em Disco
//!
//! Dois arquivos JSON "pretty-printed" sob o `data_dir` da configuração:
//!
//! | Arquivo | Conteúdo |
//! |---------|----------|
//! | `graph.json` | [`ConceptGraph`]: era, conceitos, links |
//! | `state.json` | [`StateFile`]: [`CognitiveState`] + log de violações |
//!
//! O índice por id do grafo é `#[serde(skip)]` e reconstruído após o
//! carregamento. Ativações também não são gravadas: cada processo começa
//! com o grafo "em repouso".
//!
//! ## Atomicidade
//!
//! A escrita vai para `<arquivo>.tmp` e depois é renomeada, então um crash
//! no meio da escrita nunca deixa JSON truncado no lugar do original.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cognition::CognitiveState;
use crate::core::ConceptGraph;
use crate::safety::ViolationRecord;

/// Tudo o que sobrevive entre ciclos além do grafo.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    pub awareness: CognitiveState,
    #[serde(default)]
    pub violations: Vec<ViolationRecord>,
}

pub fn save_graph(path: &Path, graph: &ConceptGraph) -> Result<()> {
    let json = serde_json::to_string_pretty(graph).context("Falha ao serializar ConceptGraph")?;
    write_atomic(path, &json)?;
    tracing::debug!(path = %path.display(), concepts = graph.len(), "Grafo salvo");
    Ok(())
}

/// Carrega o grafo, ou cria um vazio (era `genesis`) se o arquivo não existir.
///
/// # Erros
///
/// Retorna erro se o arquivo existir mas estiver corrompido
/// ou incompatível com a struct atual.
pub fn load_graph(path: &Path) -> Result<ConceptGraph> {
    if !path.exists() {
        tracing::info!("Nenhum {} encontrado, iniciando grafo vazio", path.display());
        return Ok(ConceptGraph::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let mut graph: ConceptGraph = serde_json::from_str(&json)
        .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
    graph.rebuild_index();
    Ok(graph)
}

pub fn save_state(path: &Path, state: &StateFile) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("Falha ao serializar estado cognitivo")?;
    write_atomic(path, &json)
}

pub fn load_state(path: &Path) -> Result<StateFile> {
    if !path.exists() {
        tracing::info!("Nenhum {} encontrado, iniciando estado padrão", path.display());
        return Ok(StateFile::default());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Falha ao desserializar {}", path.display()))
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Falha ao criar diretório {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents).with_context(|| format!("Falha ao escrever {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("Falha ao renomear para {}", path.display()))?;
    Ok(())
}
