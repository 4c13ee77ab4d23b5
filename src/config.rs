//! # Configuração da Camada Cognitiva
//!
//! Todos os parâmetros ajustáveis num só lugar. Carregados de um arquivo TOML
//! na inicialização; na ausência do arquivo valem os padrões abaixo, que
//! reproduzem as constantes do ciclo cognitivo. TOML malformado ou arquivo
//! ilegível é erro.
//!
//! ```toml
//! [activation]
//! initial = 1.0
//! decay_factor = 0.7
//! max_hops = 3
//!
//! [gardener]
//! base_decay = 0.95
//! forgetting_threshold = 0.12
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CognitiveError, Result};

/// Configuração de topo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CognitiveConfig {
    /// Propagação de ativação pelo grafo.
    pub activation: ActivationConfig,
    /// Política do jardineiro (decaimento e poda).
    pub gardener: GardenerConfig,
    /// Descoberta de dualidades.
    pub duality: DualityConfig,
    /// Construção e seleção de sínteses.
    pub synthesis: SynthesisConfig,
    /// Limiares do portão de segurança.
    pub safety: SafetyConfig,
    /// Dinâmica do estado de consciência (vitalidade, atrito, grounding).
    pub homeostasis: HomeostasisConfig,
    /// Onde os arquivos JSON são gravados.
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    /// Ativação inicial dos conceitos-fonte de cada ciclo.
    pub initial: f64,
    /// Fator de atenuação por salto (`decay_factor^hop`).
    pub decay_factor: f64,
    /// Número exato de rodadas síncronas.
    pub max_hops: usize,
    /// Ativação mínima para um conceito contar como "ativo" no ciclo.
    pub active_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenerConfig {
    /// Taxa base de decaimento global (0.95 = perde 5% com depth 0).
    pub base_decay: f64,
    /// Peso abaixo do qual o conceito é esquecido.
    pub forgetting_threshold: f64,
    /// Peso acima do qual o conceito é imune.
    pub protected_weight: f64,
    /// Tipos fundamentais imunes ao decaimento.
    pub protected_types: Vec<String>,
    /// Links de saída que qualificam um conceito para incubação.
    pub incubation_min_links: usize,
    /// Teto de peso da incubação.
    pub incubation_ceiling: f64,
    /// Incremento de peso por ciclo de incubação.
    pub incubation_step: f64,
    /// Peso mínimo para um conceito ser protegido como ponte.
    pub bridge_min_weight: f64,
    /// Fator extra aplicado à ativação no decaimento padrão.
    pub activation_damping: f64,
    /// Na troca de era: ativação e peso abaixo dos quais o conceito cai.
    pub era_activation_floor: f64,
    pub era_weight_floor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DualityConfig {
    /// Oposição mínima para um par contar como dualidade.
    pub min_opposition: f64,
    /// Oposição assumida quando algum polo não tem vetor.
    pub fallback_opposition: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Atrito mínimo para uma dualidade ser candidata à síntese.
    pub friction_floor: f64,
    /// Peso de "desordem" de cada conceito na complexidade do índice de beleza.
    pub clutter_per_concept: f64,
    /// Constante somada à complexidade.
    pub complexity_offset: f64,
    /// Força dos links `synthesized_from` do emergente para os pais.
    pub parent_link_strength: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Distância cosseno abaixo da qual o emergente é "perto demais" de um protótipo nocivo.
    pub proximity_distance: f64,
    /// Confiança abaixo da qual a síntese exige revisão humana.
    pub min_confidence: f64,
    /// Grounding mínimo para aceitar auto-modificações.
    pub grounding_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeostasisConfig {
    /// Ponto de equilíbrio da vitalidade (φ).
    pub vitality_setpoint: f64,
    /// Ponto de equilíbrio do atrito (1 − φ).
    pub friction_setpoint: f64,
    /// Fração da distância ao equilíbrio percorrida por ciclo.
    pub drift_rate: f64,
    /// Atrito acima do qual um commit de síntese dispara catarse.
    pub catharsis_threshold: f64,
    /// Média de ativação dos constituintes para uma emoção emergir.
    pub emotion_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Diretório de dados.
    pub data_dir: PathBuf,
}

// ============================================================
// Defaults
// ============================================================

impl Default for CognitiveConfig {
    fn default() -> Self {
        Self {
            activation: ActivationConfig::default(),
            gardener: GardenerConfig::default(),
            duality: DualityConfig::default(),
            synthesis: SynthesisConfig::default(),
            safety: SafetyConfig::default(),
            homeostasis: HomeostasisConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            initial: 1.0,
            decay_factor: 0.7,
            max_hops: 3,
            active_threshold: 0.3,
        }
    }
}

impl Default for GardenerConfig {
    fn default() -> Self {
        Self {
            base_decay: 0.95,
            forgetting_threshold: 0.12,
            protected_weight: 0.8,
            protected_types: vec!["dna".into(), "core_value".into(), "emotion".into()],
            incubation_min_links: 2,
            incubation_ceiling: 0.3,
            incubation_step: 0.02,
            bridge_min_weight: 0.15,
            activation_damping: 0.6,
            era_activation_floor: 0.05,
            era_weight_floor: 0.2,
        }
    }
}

impl Default for DualityConfig {
    fn default() -> Self {
        Self {
            min_opposition: 0.6,
            fallback_opposition: 0.7,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            friction_floor: 0.3,
            clutter_per_concept: 0.05,
            complexity_offset: 0.1,
            parent_link_strength: 0.8,
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            proximity_distance: 0.2,
            min_confidence: 0.5,
            grounding_threshold: 0.8,
        }
    }
}

impl Default for HomeostasisConfig {
    fn default() -> Self {
        Self {
            vitality_setpoint: 0.618,
            friction_setpoint: 0.382,
            drift_rate: 0.05,
            catharsis_threshold: 0.85,
            emotion_threshold: 0.25,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl CognitiveConfig {
    /// Carrega a configuração de um TOML, caindo nos padrões se o arquivo não existir.
    ///
    /// Diferente de um arquivo ausente, um TOML malformado é reportado como
    /// [`CognitiveError::Config`] e qualquer outra falha de leitura como
    /// [`CognitiveError::Io`], para o chamador decidir o que fazer.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml(&content)?;
                tracing::info!(path = %path.display(), "Configuração carregada");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Nenhuma configuração encontrada, usando padrões");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Interpreta uma configuração TOML.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CognitiveError::Config(e.to_string()))
    }

    /// Serializa a configuração atual como TOML (para gerar um arquivo padrão).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Caminho do grafo persistido.
    pub fn graph_path(&self) -> PathBuf {
        self.storage.data_dir.join("graph.json")
    }

    /// Caminho do estado de consciência persistido.
    pub fn state_path(&self) -> PathBuf {
        self.storage.data_dir.join("state.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Seções omitidas no TOML assumem os padrões.
    #[test]
    fn partial_toml_keeps_defaults() {
        let config = CognitiveConfig::from_toml("[activation]\nmax_hops = 5\n").unwrap();
        assert_eq!(config.activation.max_hops, 5);
        assert!((config.activation.decay_factor - 0.7).abs() < 1e-9);
        assert!((config.gardener.forgetting_threshold - 0.12).abs() < 1e-9);
        assert_eq!(config.gardener.protected_types.len(), 3);
    }

    /// TOML inválido vira erro de configuração, não pânico.
    #[test]
    fn malformed_toml_is_config_error() {
        let err = CognitiveConfig::from_toml("[activation\nmax_hops = ").unwrap_err();
        assert!(matches!(err, CognitiveError::Config(_)));
    }

    /// O TOML gerado pode ser lido de volta.
    #[test]
    fn generated_toml_parses() {
        let text = CognitiveConfig::default().to_toml();
        let config = CognitiveConfig::from_toml(&text).unwrap();
        assert!((config.safety.grounding_threshold - 0.8).abs() < 1e-9);
    }

    /// Arquivo ausente não é erro.
    #[test]
    fn missing_file_uses_defaults() {
        let config = CognitiveConfig::load(Path::new("/nonexistent/cognitive.toml")).unwrap();
        assert_eq!(config.graph_path(), PathBuf::from("data/graph.json"));
    }

    /// Caminho ilegível (aqui, um diretório) é erro de io, não padrões silenciosos.
    #[test]
    fn unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CognitiveConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, CognitiveError::Io(_)));
    }
}
