//! # TimelineModel — Prazos Estatutários PCT
//!
//! Cálculo do **prazo de 30 meses** para entrada em fase nacional brasileira
//! (Artigos PCT 22/39) e do status desse prazo em relação a uma data de
//! referência.
//!
//! ## As Datas-Chave de um PCT
//!
//! ```text
//! prioridade ──── 18 meses ────► publicação WO
//!     │
//!     └───────── 30 meses ─────────► prazo de entrada em fase nacional BR
//!                                        │
//!                                        └── 18 meses + backlog ──► publicação BR
//! ```
//!
//! O prazo usa a aproximação fixa de **900 dias** (30 × 30), a mesma adotada
//! em análises de FTO — a diferença para o cálculo calendário exato é de
//! poucos dias e irrelevante frente à incerteza do backlog do INPI.
//!
//! ## Fail-Soft em Datas Ausentes
//!
//! Registros com `priority_date` malformada/ausente **não geram erro**: o
//! modelo substitui `referência − 540 dias` (um WO "típico", publicado há
//! pouco) e segue. A mesma política vale para `publication_date` → data de
//! referência. O chamador nunca precisa tratar erro de data.
//!
//! ## Sinal de `days_remaining`
//!
//! `days_remaining` é **com sinal**: negativo indica há quantos dias o prazo
//! passou. O [`InferenceGate`](crate::inference) decide pelo *status*, não
//! pela magnitude; quem exibe contagens não-negativas faz o clamp
//! explicitamente.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::WOFiling;

/// Prazo de 30 meses em dias (aproximação fixa 30 × 30).
pub const NATIONAL_PHASE_DEADLINE_DAYS: i64 = 900;

/// Fallback para prioridade ausente: 18 meses antes da referência.
const PRIORITY_FALLBACK_DAYS: i64 = 540;

/// Publicação estatutária: 18 meses da prioridade.
const PUBLICATION_DELAY_DAYS: i64 = 540;

/// Folga de backlog do INPI sobre a publicação estatutária.
const INPI_BACKLOG_DAYS: i64 = 180;

/// Status do prazo de fase nacional na data de referência.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineStatus {
    /// Ainda dentro da janela de 30 meses.
    Open,
    /// Prazo vencido — um depósito feito a tempo ainda pode estar
    /// aguardando publicação.
    Passed,
}

/// Linha do tempo PCT derivada de um [`WOFiling`]. Não é persistida.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PCTTimeline {
    /// Data de prioridade (real ou fallback sintético).
    pub priority_date: NaiveDate,
    /// Data de publicação internacional (real ou fallback).
    pub publication_date: NaiveDate,
    /// Prazo de 30 meses: `priority_date + 900 dias`.
    pub deadline: NaiveDate,
    /// Status do prazo na data de referência.
    pub status: DeadlineStatus,
    /// Dias até o prazo, com sinal (negativo = vencido).
    pub days_remaining: i64,
}

impl PCTTimeline {
    /// Deriva a linha do tempo de um WO em relação a `reference_date`.
    ///
    /// Datas ausentes recebem os fallbacks sintéticos documentados no
    /// cabeçalho do módulo — esta função **nunca falha**.
    pub fn from_filing(wo: &WOFiling, reference_date: NaiveDate) -> Self {
        let priority = wo
            .priority_date
            .unwrap_or(reference_date - Duration::days(PRIORITY_FALLBACK_DAYS));
        let publication = wo.publication_date.unwrap_or(reference_date);

        let deadline = priority + Duration::days(NATIONAL_PHASE_DEADLINE_DAYS);
        let days_remaining = (deadline - reference_date).num_days();
        let status = if reference_date <= deadline {
            DeadlineStatus::Open
        } else {
            DeadlineStatus::Passed
        };

        Self {
            priority_date: priority,
            publication_date: publication,
            deadline,
            status,
            days_remaining,
        }
    }

    /// Conveniência: linha do tempo em relação a hoje (UTC).
    pub fn from_filing_today(wo: &WOFiling) -> Self {
        Self::from_filing(wo, Utc::now().date_naive())
    }

    /// O prazo de 30 meses ainda está aberto?
    pub fn is_open(&self) -> bool {
        self.status == DeadlineStatus::Open
    }

    /// Janela esperada de publicação do BR na RPI do INPI.
    ///
    /// - **Mais cedo**: 18 meses da prioridade (depósito imediato);
    /// - **Mais tarde**: 18 meses contados do prazo de 30 meses, mais a
    ///   folga de backlog do INPI.
    pub fn expected_br_publication_window(&self) -> (NaiveDate, NaiveDate) {
        let earliest = self.priority_date + Duration::days(PUBLICATION_DELAY_DAYS);
        let latest =
            self.deadline + Duration::days(PUBLICATION_DELAY_DAYS + INPI_BACKLOG_DAYS);
        (earliest, latest)
    }
}
