//! # DistributionCalibrator — Distribuição Forçada por Ranking
//!
//! Corrige um defeito conhecido do caminho absoluto: em lotes grandes de
//! WOs parecidos, os scores se aglomeram numa faixa estreita e quase todos
//! os eventos caem no mesmo tier, o que não ajuda a priorizar trabalho de
//! análise. A calibração **ranqueia o lote** e força uma distribuição fixa
//! de tiers por percentil:
//!
//! | Percentil | Tier | Ajuste de confiança |
//! |-----------|------|---------------------|
//! | 0–15% | `Found` | `min(base + 0.20, 0.95)` |
//! | 15–40% | `Inferred` | `min(base + 0.10, 0.90)` |
//! | 40–75% | `Expected` | `base` |
//! | 75–95% | `Predicted` | `max(base − 0.05, 0.40)` |
//! | 95–100% | `Speculative` | `max(base − 0.10, 0.35)` |
//!
//! O tier resultante é **relativo ao lote** — o evento carrega
//! `classification_method = rank_based_forced_distribution` e o percentil
//! exato, para que nenhum leitor confunda com probabilidade absoluta. Este
//! é o único caminho que promove um evento a `Found` sem confirmação
//! externa.
//!
//! ## Score Composto de Ranking
//!
//! A confiança-base domina; características secundárias só desempatam:
//!
//! ```text
//! composto = base × 1000
//!          + (ano_publicação − 2015) × 1.0     (WOs recentes primeiro)
//!          + nº_inventores × 0.5               (proxy de investimento em P&D)
//!          + (365 − dias_até_prazo) × 0.01     (urgência do prazo)
//! ```
//!
//! ## Pureza
//!
//! `recalibrate` é uma **transformação pura**: recebe o lote, devolve
//! cópias ajustadas na ordem original de entrada. Os eventos originais
//! nunca são mutados. O sort é estável, então empates preservam a ordem
//! de entrada e o resultado é determinístico.

use crate::core::{CertaintyTier, ClassificationMethod, InferredEvent};

/// Lote mínimo para ranqueamento fazer sentido estatístico.
///
/// Abaixo disso os percentis são grosseiros demais e a classificação
/// absoluta por item é mais honesta.
pub const MIN_BATCH_SIZE: usize = 10;

/// Calibrador sem estado.
pub struct DistributionCalibrator;

impl DistributionCalibrator {
    /// Recalibra um lote de eventos pela distribuição forçada.
    ///
    /// Lotes menores que [`MIN_BATCH_SIZE`] voltam inalterados (cópias com
    /// a classificação absoluta original). A ordem da saída é a ordem da
    /// entrada.
    pub fn recalibrate(events: &[InferredEvent]) -> Vec<InferredEvent> {
        if events.len() < MIN_BATCH_SIZE {
            tracing::debug!(
                lote = events.len(),
                minimo = MIN_BATCH_SIZE,
                "lote pequeno demais para calibração, mantendo classificação absoluta"
            );
            return events.to_vec();
        }

        // Ranqueia índices pelo score composto, decrescente e estável.
        let mut ranked: Vec<usize> = (0..events.len()).collect();
        ranked.sort_by(|&a, &b| {
            Self::composite_score(&events[b])
                .partial_cmp(&Self::composite_score(&events[a]))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let n = events.len() as f64;
        let mut out = events.to_vec();
        for (rank, &idx) in ranked.iter().enumerate() {
            let percentile = rank as f64 / n * 100.0;
            let base = events[idx].analysis.overall_confidence;
            let (tier, adjusted) = Self::band(percentile, base);

            let analysis = &mut out[idx].analysis;
            analysis.tier = tier;
            analysis.overall_confidence = adjusted;
            analysis.classification_method = ClassificationMethod::RankBasedForcedDistribution;
            analysis.rank_percentile = Some(percentile);
        }

        tracing::info!(lote = events.len(), "lote recalibrado por distribuição forçada");
        out
    }

    /// Score de ranking: confiança domina, secundárias desempatam.
    fn composite_score(event: &InferredEvent) -> f64 {
        event.analysis.overall_confidence * 1000.0
            + (event.publication_year - 2015) as f64
            + event.inventor_count as f64 * 0.5
            + (365.0 - event.filing_window.days_until_deadline as f64) * 0.01
    }

    /// Banda de percentil → (tier forçado, confiança ajustada).
    fn band(percentile: f64, base: f64) -> (CertaintyTier, f64) {
        if percentile < 15.0 {
            (CertaintyTier::Found, (base + 0.20).min(0.95))
        } else if percentile < 40.0 {
            (CertaintyTier::Inferred, (base + 0.10).min(0.90))
        } else if percentile < 75.0 {
            (CertaintyTier::Expected, base)
        } else if percentile < 95.0 {
            (CertaintyTier::Predicted, (base - 0.05).max(0.40))
        } else {
            (CertaintyTier::Speculative, (base - 0.10).max(0.35))
        }
    }
}
