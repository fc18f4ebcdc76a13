//! # InferredEvent — Evento de Entrada BR Inferida
//!
//! Estrutura de saída do motor: a predição completa de que um WO entrou (ou
//! entrará) em fase nacional brasileira, com toda a análise de confiança
//! anexada para auditabilidade.
//!
//! ## O Invariante Central: `br_number` é Sempre `None`
//!
//! O número BR é atribuído sequencialmente pelo INPI no momento da entrada em
//! fase nacional — **não é derivável** do número WO. O campo existe na
//! estrutura justamente para tornar a ausência explícita e auditável:
//! `br_number: None` acompanhado do formato esperado
//! ([`BR_NUMBER_FORMAT`]). Nenhum caminho do motor, inclusive caminhos de
//! erro, escreve neste campo.
//!
//! ## Anatomia do Evento
//!
//! | Bloco | Conteúdo |
//! |-------|----------|
//! | identidade | `event_id` (derivado do WO), `wo_number`, depositante |
//! | análise | [`ConfidenceAnalysis`] — score, tier e os 4 fatores |
//! | janela de depósito | [`FilingWindow`] — prazo de 30 meses e status |
//! | janela de publicação | [`PublicationWindow`] — estimativa 18m + backlog |
//! | calibração | ano de publicação e nº de inventores (desempate) |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::tier::CertaintyTier;
use crate::timeline::DeadlineStatus;

/// Formato esperado do número BR quando o INPI publicar a entrada.
///
/// Placeholder documental — jamais preenchido com um número concreto.
pub const BR_NUMBER_FORMAT: &str = "BR11YYYYNNNNNNC";

/// Como o tier do evento foi atribuído.
///
/// A distinção importa juridicamente: o método absoluto é uma probabilidade
/// por item; o método por ranking é **relativo ao lote** e não deve ser lido
/// como probabilidade absoluta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Limiar absoluto por item ([`CertaintyTier::classify`]).
    AbsoluteThreshold,
    /// Distribuição forçada por percentil de ranking, relativa ao lote
    /// ([`DistributionCalibrator`](crate::calibration)).
    RankBasedForcedDistribution,
}

impl ClassificationMethod {
    /// Label canônico gravado no JSON de auditoria.
    pub fn label(&self) -> &'static str {
        match self {
            ClassificationMethod::AbsoluteThreshold => "absolute_threshold",
            ClassificationMethod::RankBasedForcedDistribution => {
                "rank_based_forced_distribution"
            }
        }
    }
}

/// Score individual de um dos quatro fatores do modelo híbrido.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FactorScore {
    /// Score do fator, em [0, 1].
    pub score: f64,
    /// Peso do fator na combinação (os quatro somam 1.0).
    pub weight: f64,
    /// Justificativa legível em PT-BR — apresentada no relatório.
    pub rationale: String,
}

/// Decomposição por fator da análise de confiança.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FactorBreakdown {
    /// Prazo PCT de 30 meses (peso 0.30).
    pub pct_timeline: FactorScore,
    /// Comportamento histórico do depositante (peso 0.40).
    pub applicant_behavior: FactorScore,
    /// Relevância para o mercado brasileiro (peso 0.20).
    pub market_relevance: FactorScore,
    /// Força da família de patentes (peso 0.10).
    pub family_strength: FactorScore,
}

/// Análise de confiança completa de uma predição.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfidenceAnalysis {
    /// Score combinado final, em [0, 0.95].
    pub overall_confidence: f64,
    /// Tier de certeza correspondente.
    pub tier: CertaintyTier,
    /// Decomposição por fator, com rationale de cada um.
    pub factors: FactorBreakdown,
    /// Método que atribuiu o tier atual.
    pub classification_method: ClassificationMethod,
    /// Percentil do item no ranking do lote (0–100), quando o tier veio
    /// da distribuição forçada. `None` no caminho absoluto.
    pub rank_percentile: Option<f64>,
}

/// Janela de depósito: do início possível até o prazo estatutário.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilingWindow {
    /// Primeiro dia possível de entrada (a própria data de prioridade).
    pub earliest_possible: NaiveDate,
    /// Prazo de 30 meses (Artigos PCT 22/39).
    pub deadline: NaiveDate,
    /// Status do prazo na data de referência.
    pub status: DeadlineStatus,
    /// Dias até o prazo, **com sinal** — negativo quando já passou.
    pub days_until_deadline: i64,
    /// O depósito provavelmente já foi feito?
    /// `true` quando o prazo passou (teria que ter sido feito) ou quando a
    /// confiança combinada é ≥ 0.70 dentro da janela.
    pub likely_filed: bool,
}

/// Estimativa da janela de publicação do BR na RPI do INPI.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicationWindow {
    /// Mais cedo possível: 18 meses da prioridade (depósito imediato).
    pub earliest: NaiveDate,
    /// Mais tarde: 18 meses do prazo de 30 meses + folga de backlog do INPI.
    pub latest: NaiveDate,
}

/// Evento de entrada em fase nacional BR inferida — saída do motor.
///
/// Identidade: `wo_number`. Eventos são independentes entre si (podem ser
/// produzidos em paralelo) e imutáveis após emitidos — a recalibração produz
/// **cópias** rotuladas, nunca muta o original.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InferredEvent {
    /// Id do evento: `"INF-" + wo_number` com `/` trocado por `-`.
    pub event_id: String,

    /// Número WO de origem — a identidade da predição.
    pub wo_number: String,

    /// Depositante (nome normalizado usado no lookup).
    pub applicant: String,

    /// Análise de confiança completa.
    pub analysis: ConfidenceAnalysis,

    /// Janela de depósito e status do prazo.
    pub filing_window: FilingWindow,

    /// Estimativa da janela de publicação na RPI.
    pub publication_window: PublicationWindow,

    /// **Invariante: sempre `None`.** O número BR só existe após atribuição
    /// pelo INPI; o motor jamais o fabrica.
    pub br_number: Option<String>,

    /// Formato esperado do número quando publicado ([`BR_NUMBER_FORMAT`]).
    pub br_number_format_expected: String,

    /// Ano de publicação do WO — característica secundária de calibração.
    pub publication_year: i32,

    /// Número de inventores — característica secundária de calibração.
    pub inventor_count: usize,
}

impl InferredEvent {
    /// Monta o id do evento a partir do número WO.
    ///
    /// `"WO2024/123456"` → `"INF-WO2024-123456"`.
    pub fn event_id_for(wo_number: &str) -> String {
        format!("INF-{}", wo_number.replace('/', "-"))
    }
}
