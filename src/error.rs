//! # Erros da Camada Cognitiva
//!
//! A camada cognitiva quase não tem erros "de verdade": ausência de dualidade,
//! síntese de baixa confiança ou violação de segurança são **dados** retornados
//! ao chamador, não erros. O que sobra aqui é entrada malformada e I/O.
//!
//! | Variante | Quando ocorre |
//! |----------|---------------|
//! | `UnknownConcept` | Link ou operação referenciando um ID ausente do grafo |
//! | `DimensionMismatch` | Vetor com dimensionalidade incompatível onde ela é obrigatória |
//! | `Config` | Arquivo TOML de configuração inválido |
//! | `Io` / `Json` | Falhas de persistência |

use thiserror::Error;

use crate::core::ConceptId;

/// Erro da camada cognitiva.
#[derive(Error, Debug)]
pub enum CognitiveError {
    #[error("conceito desconhecido: {0}")]
    UnknownConcept(ConceptId),

    #[error("dimensionalidade incompatível: esperado {expected}, recebido {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("erro de configuração: {0}")]
    Config(String),

    #[error("erro de io: {0}")]
    Io(#[from] std::io::Error),

    #[error("erro de json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias de resultado usado em toda a biblioteca.
pub type Result<T> = std::result::Result<T, CognitiveError>;
