//! # Persistência — A Base de Depositantes em Disco
//!
//! Serializa/desserializa o mapa de [`ApplicantBehavior`] como JSON
//! pretty-printed. O arquivo é a memória de longo prazo do motor: cada
//! execução carrega o que as execuções anteriores aprenderam.
//!
//! ## Caminho do Arquivo
//!
//! `data/applicant_kb.json` por padrão; a variável de ambiente
//! [`DB_PATH_ENV`] sobrepõe (útil em testes e em instalações com
//! diretório de dados próprio).
//!
//! ## Política de Carga Fail-Soft
//!
//! O carregamento **nunca falha**: arquivo ausente é a primeira execução
//! (info + base vazia); arquivo corrompido é degradação (warn + base
//! vazia — o aprendizado recomeça, as predições seguem com taxa neutra).
//! Só a **escrita** propaga erro, porque perder silenciosamente o
//! aprendizado de uma execução é inaceitável.
//!
//! ## Atomicidade
//!
//! A escrita usa o padrão write-rename: serializa para `<path>.tmp` e
//! renomeia sobre o destino. Um crash no meio da escrita deixa o arquivo
//! anterior intacto.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::ApplicantBehavior;

/// Caminho padrão da base de depositantes (relativo ao diretório atual).
pub const DEFAULT_DB_PATH: &str = "data/applicant_kb.json";

/// Variável de ambiente que sobrepõe o caminho padrão.
pub const DB_PATH_ENV: &str = "PREVISOR_DB";

/// Erros de escrita da base de depositantes.
///
/// A leitura é fail-soft e não produz erros; só a escrita importa.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Falha de E/S (criar diretório, escrever tmp, renomear).
    #[error("falha de E/S em {path}: {source}")]
    Io {
        /// Caminho envolvido na operação que falhou.
        path: PathBuf,
        /// Erro de E/S subjacente.
        #[source]
        source: std::io::Error,
    },

    /// Falha ao serializar a base para JSON.
    #[error("falha ao serializar a base de depositantes: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Resolve o caminho efetivo da base: env var [`DB_PATH_ENV`] ou padrão.
pub fn resolve_db_path() -> PathBuf {
    env::var(DB_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH))
}

/// Carrega a base de depositantes do disco. **Nunca falha.**
///
/// - Arquivo ausente → primeira execução, base vazia (info);
/// - JSON corrompido/incompatível → base vazia (warn, aprendizado
///   recomeça do zero).
pub fn load_behaviors(path: &Path) -> HashMap<String, ApplicantBehavior> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "base de depositantes ausente, iniciando vazia");
        return HashMap::new();
    }
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(path = %path.display(), erro = %e, "falha ao ler a base, iniciando vazia");
            return HashMap::new();
        }
    };
    match serde_json::from_str::<HashMap<String, ApplicantBehavior>>(&json) {
        Ok(behaviors) => {
            tracing::info!(
                depositantes = behaviors.len(),
                path = %path.display(),
                "base de depositantes carregada"
            );
            behaviors
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), erro = %e, "base corrompida, iniciando vazia");
            HashMap::new()
        }
    }
}

/// Salva a base de depositantes como JSON pretty-printed, atomicamente.
///
/// Cria o diretório pai se não existir; escreve em `<path>.tmp` e
/// renomeia sobre o destino.
pub fn save_behaviors(
    path: &Path,
    behaviors: &HashMap<String, ApplicantBehavior>,
) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let json = serde_json::to_string_pretty(behaviors)?;

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json).map_err(|source| PersistenceError::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        depositantes = behaviors.len(),
        path = %path.display(),
        "base de depositantes salva"
    );
    Ok(())
}
