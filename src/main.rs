#![allow(dead_code)]
//! # Previsor BR — Motor Preditivo de Fase Nacional Brasileira
//!
//! **Ponto de entrada** do Previsor BR: lê o resultado de uma busca de
//! patentes (WOs + patentes BR já encontradas), aprende com ele e emite as
//! predições de entrada em fase nacional brasileira.
//!
//! ## Fluxo de Execução
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging
//!   ├── Lê resultados.json (WOs + BRs encontrados)
//!   ├── Abre o store de depositantes (data/applicant_kb.json)
//!   ├── Semeia priors sintéticos (preenche lacunas apenas)
//!   ├── LearningUpdater — aprende com o lote e persiste
//!   ├── PredictiveEngine — infere eventos em paralelo (rayon)
//!   ├── DistributionCalibrator — recalibra o lote por ranking
//!   └── Escreve o relatório JSON enriquecido
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # saída padrão em previsao_br.json
//! cargo run -- resultados.json
//!
//! # saída explícita + logs detalhados
//! RUST_LOG=debug cargo run -- resultados.json saida.json
//!
//! # base de depositantes em caminho próprio
//! PREVISOR_DB=/var/lib/previsor/kb.json cargo run -- resultados.json
//! ```

// Declaração dos módulos da aplicação.
// Cada módulo corresponde a uma camada da arquitetura:

/// Módulo `core` — tipos fundamentais: WOFiling, CertaintyTier, InferredEvent.
mod core;

/// Módulo `timeline` — prazos estatutários PCT (30 meses).
mod timeline;

/// Módulo `market` — relevância para o mercado brasileiro (ANVISA/SUS).
mod market;

/// Módulo `confidence` — modelo híbrido ponderado de confiança.
mod confidence;

/// Módulo `store` — memória de longo prazo de comportamento de depositantes.
mod store;

/// Módulo `persistence` — serialização/desserialização da base em JSON.
mod persistence;

/// Módulo `inference` — gate de aceitação + motor de montagem de eventos.
mod inference;

/// Módulo `calibration` — distribuição forçada por ranking do lote.
mod calibration;

/// Módulo `learning` — aprendizado por lote de busca.
mod learning;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::calibration::DistributionCalibrator;
use crate::core::{parse_date_soft, BRFiling, InferredEvent, WOFiling};
use crate::inference::{PredictiveEngine, TierSummary};
use crate::learning::LearningUpdater;
use crate::store::ApplicantBehaviorStore;

/// Versão da metodologia gravada em todo relatório, para auditoria.
const METHODOLOGY_VERSION: &str = "v1-hibrida";

/// Caminho padrão do relatório de saída.
const DEFAULT_OUTPUT: &str = "previsao_br.json";

/// Resultado bruto de busca, como entregue pela camada de crawlers.
///
/// As datas chegam como **strings** em formatos variados; a conversão para
/// os tipos do motor é fail-soft ([`parse_date_soft`]).
#[derive(Debug, Deserialize)]
struct SearchResults {
    /// Molécula/princípio ativo que originou a busca, se houver.
    #[serde(default)]
    molecule: Option<String>,

    /// Área terapêutica do lote — default para WOs que vieram sem a sua.
    #[serde(default)]
    therapeutic_area: Option<String>,

    /// Depósitos internacionais encontrados pela busca.
    #[serde(default)]
    wo_patents: Vec<RawWOFiling>,

    /// Patentes BR já localizadas (INPI ou bases comerciais).
    #[serde(default)]
    br_patents: Vec<RawBRFiling>,

    /// Data de referência da busca (`YYYY-MM-DD`). Ausente → hoje (UTC).
    #[serde(default)]
    reference_date: Option<String>,
}

/// WO como veio do crawler, antes do parse de datas.
#[derive(Debug, Deserialize)]
struct RawWOFiling {
    wo_number: String,
    #[serde(default)]
    priority_date: Option<String>,
    #[serde(default)]
    publication_date: Option<String>,
    #[serde(default)]
    applicant: String,
    #[serde(default)]
    ipc_codes: Vec<String>,
    #[serde(default)]
    therapeutic_area: String,
    #[serde(default)]
    inventors: Vec<String>,
    #[serde(default)]
    family_size: u32,
    #[serde(default)]
    brazil_designated: bool,
}

impl RawWOFiling {
    /// Converte para o tipo do motor, com parse soft das datas.
    ///
    /// `default_area` é a área do lote — só entra quando o WO veio sem a
    /// sua própria.
    fn into_filing(self, default_area: Option<&str>) -> WOFiling {
        let therapeutic_area = if self.therapeutic_area.trim().is_empty() {
            default_area.unwrap_or_default().to_string()
        } else {
            self.therapeutic_area
        };
        WOFiling {
            wo_number: self.wo_number,
            priority_date: self.priority_date.as_deref().and_then(parse_date_soft),
            publication_date: self.publication_date.as_deref().and_then(parse_date_soft),
            applicant: self.applicant,
            ipc_codes: self.ipc_codes,
            therapeutic_area,
            inventors: self.inventors,
            family_size: self.family_size,
            brazil_designated: self.brazil_designated,
        }
    }
}

/// Patente BR como veio do crawler.
#[derive(Debug, Deserialize)]
struct RawBRFiling {
    patent_number: String,
    #[serde(default)]
    wo_reference: Option<String>,
    #[serde(default)]
    applicant: String,
}

impl RawBRFiling {
    fn into_filing(self) -> BRFiling {
        BRFiling {
            patent_number: self.patent_number,
            wo_reference: self.wo_reference,
            applicant: self.applicant,
        }
    }
}

/// Relatório final, escrito como JSON pretty-printed.
#[derive(Debug, Serialize)]
struct PredictiveReport {
    /// Quando o relatório foi gerado.
    generated_at: DateTime<Utc>,
    /// Versão da metodologia ([`METHODOLOGY_VERSION`]).
    methodology_version: &'static str,
    /// Molécula da busca de origem, quando informada.
    molecule: Option<String>,
    /// Área terapêutica do lote, quando informada.
    therapeutic_area: Option<String>,
    /// Data de referência usada nos cálculos de prazo.
    reference_date: NaiveDate,
    /// Depositantes conhecidos pelo store após o aprendizado.
    known_applicants: usize,
    /// Quantos WOs entraram como candidatos.
    wo_candidates: usize,
    /// Bloco de inteligência preditiva: sumário + eventos.
    predictive_intelligence: PredictiveIntelligence,
}

/// Sumário por tier e a lista completa de eventos inferidos.
#[derive(Debug, Serialize)]
struct PredictiveIntelligence {
    summary: TierSummary,
    inferred_events: Vec<InferredEvent>,
}

fn main() -> Result<()> {
    // Aceita a variável de ambiente RUST_LOG para configurar o nível.
    // Exemplo: RUST_LOG=debug cargo run -- resultados.json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🇧🇷 Previsor BR — Starting...");

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .context("uso: previsor-br <resultados.json> [saida.json]")?;
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let json = std::fs::read_to_string(&input)
        .with_context(|| format!("falha ao ler {}", input.display()))?;
    let results: SearchResults = serde_json::from_str(&json)
        .with_context(|| format!("falha ao desserializar {}", input.display()))?;

    let reference_date = results
        .reference_date
        .as_deref()
        .and_then(parse_date_soft)
        .unwrap_or_else(|| Utc::now().date_naive());

    let default_area = results.therapeutic_area.as_deref();
    let wos: Vec<WOFiling> = results
        .wo_patents
        .into_iter()
        .map(|raw| raw.into_filing(default_area))
        .collect();
    let brs: Vec<BRFiling> = results
        .br_patents
        .into_iter()
        .map(RawBRFiling::into_filing)
        .collect();

    tracing::info!(
        wos = wos.len(),
        brs = brs.len(),
        referencia = %reference_date,
        "resultados de busca carregados"
    );

    // Memória de longo prazo: carrega o aprendido + priors sintéticos.
    let store = ApplicantBehaviorStore::open_default();
    store.seed();

    // Aprende com o lote ANTES de inferir — a predição de hoje já usa o
    // que a busca de hoje ensinou. Falha de gravação não aborta: os merges
    // em memória já aconteceram e a inferência segue em modo degradado.
    match LearningUpdater::learn(&store, &wos, &brs) {
        Ok(alterados) => tracing::info!(
            depositantes_alterados = alterados,
            conhecidos = store.len(),
            "aprendizado concluído"
        ),
        Err(e) => tracing::error!(
            erro = %e,
            "aprendizado não persistido, seguindo em modo degradado"
        ),
    }

    // Inferência em paralelo + recalibração por ranking do lote.
    let engine = PredictiveEngine::new(&store);
    let events = engine.infer(&wos, &brs, reference_date);
    let events = DistributionCalibrator::recalibrate(&events);

    let summary = TierSummary::of(&events);
    tracing::info!(eventos = summary.total, "predições emitidas");

    let report = PredictiveReport {
        generated_at: Utc::now(),
        methodology_version: METHODOLOGY_VERSION,
        molecule: results.molecule,
        therapeutic_area: results.therapeutic_area,
        reference_date,
        known_applicants: store.len(),
        wo_candidates: wos.len(),
        predictive_intelligence: PredictiveIntelligence {
            summary,
            inferred_events: events,
        },
    };

    let pretty = serde_json::to_string_pretty(&report)
        .context("falha ao serializar o relatório")?;
    std::fs::write(&output, pretty)
        .with_context(|| format!("falha ao escrever {}", output.display()))?;

    tracing::info!(saida = %output.display(), "✅ relatório gravado");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_wo_converts_with_soft_dates() {
        let raw: RawWOFiling = serde_json::from_str(
            r#"{
                "wo_number": "WO2024/123456",
                "priority_date": "2024-01-15T00:00:00Z",
                "publication_date": "corrompida",
                "applicant": "Bayer AG",
                "brazil_designated": true
            }"#,
        )
        .unwrap();
        let wo = raw.into_filing(Some("Oncology"));
        assert!(wo.priority_date.is_some());
        assert!(wo.publication_date.is_none());
        assert!(wo.brazil_designated);
        assert_eq!(wo.family_size, 0);
        // área do lote preenche a lacuna do WO
        assert_eq!(wo.therapeutic_area, "Oncology");
    }

    #[test]
    fn wo_own_area_wins_over_batch_default() {
        let raw = RawWOFiling {
            wo_number: "WO2024/000001".to_string(),
            priority_date: None,
            publication_date: None,
            applicant: String::new(),
            ipc_codes: vec![],
            therapeutic_area: "CNS".to_string(),
            inventors: vec![],
            family_size: 0,
            brazil_designated: true,
        };
        assert_eq!(raw.into_filing(Some("Oncology")).therapeutic_area, "CNS");
    }

    #[test]
    fn search_results_accept_missing_sections() {
        let results: SearchResults = serde_json::from_str("{}").unwrap();
        assert!(results.wo_patents.is_empty());
        assert!(results.br_patents.is_empty());
        assert!(results.molecule.is_none());
        assert!(results.reference_date.is_none());
    }
}
