//! # ConfidenceModel — Modelo Híbrido Ponderado de Confiança
//!
//! Combina quatro fatores independentes em um único score de confiança de
//! que um WO entrou (ou entrará) em fase nacional brasileira:
//!
//! | Fator | Peso | Natureza |
//! |-------|------|----------|
//! | Prazo PCT | 0.30 | determinístico (Artigos 22/39) |
//! | Depositante | 0.40 | estatístico (histórico aprendido) |
//! | Mercado BR | 0.20 | heurístico (ANVISA/SUS) |
//! | Família | 0.10 | indicador (valor comercial) |
//!
//! ## Fórmula
//!
//! ```text
//! overall = min(0.30·T + 0.40·A + 0.20·M + 0.10·F, 0.95)
//! organic = min(overall, 0.84)
//! ```
//!
//! ## Os Dois Tetos
//!
//! - **0.95** é o teto da fórmula: a faixa `Published` (≥ 0.95) pertence a
//!   publicações confirmadas na RPI, nunca a uma estimativa.
//! - **0.84** é o teto *orgânico*: os tiers `Found`/`Published` exigem
//!   confirmação externa, então um score computado apenas por este modelo
//!   para em `Inferred`. O único caminho para `Found` sem confirmação é o
//!   boost explícito e auditável do
//!   [`DistributionCalibrator`](crate::calibration).
//!
//! ## Intuição do Fator de Prazo
//!
//! Quanto **mais perto** do prazo, maior o score: depositantes entram em
//! fase nacional tipicamente no fim da janela, então proximidade do prazo
//! significa depósito iminente. Prazo vencido vale 0.75 fixo — o vencimento
//! não descarta um depósito já feito e ainda não publicado (18 meses de
//! sigilo + backlog do INPI).

use crate::core::{
    ApplicantBehavior, CertaintyTier, ClassificationMethod, ConfidenceAnalysis, FactorBreakdown,
    FactorScore,
};
use crate::market::MarketRelevance;
use crate::timeline::{DeadlineStatus, PCTTimeline};

/// Teto da fórmula — a faixa ≥ 0.95 é reservada a publicações confirmadas.
pub const FORMULA_CAP: f64 = 0.95;

/// Teto orgânico — sem confirmação externa nem boost do calibrador, o score
/// para logo abaixo do limiar de `Found` (0.85).
pub const ORGANIC_CAP: f64 = 0.84;

const WEIGHT_TIMELINE: f64 = 0.30;
const WEIGHT_APPLICANT: f64 = 0.40;
const WEIGHT_MARKET: f64 = 0.20;
const WEIGHT_FAMILY: f64 = 0.10;

/// Modelo de confiança sem estado — função pura sobre os sinais de entrada.
pub struct ConfidenceModel;

impl ConfidenceModel {
    /// Calcula a análise de confiança completa de um WO.
    ///
    /// Retorna a decomposição por fator (score + peso + rationale), o score
    /// combinado (com os dois tetos aplicados) e o tier absoluto
    /// correspondente. Nunca falha: entradas válidas-mas-improváveis
    /// (ex: `family_size = 0`) caem no bucket mais baixo.
    pub fn analyze(
        timeline: &PCTTimeline,
        applicant: &ApplicantBehavior,
        market: &MarketRelevance,
        family_size: u32,
    ) -> ConfidenceAnalysis {
        let timeline_factor = Self::timeline_score(timeline);
        let applicant_factor = Self::applicant_score(applicant);
        let market_factor = Self::market_score(market);
        let family_factor = Self::family_score(family_size);

        let weighted = timeline_factor.score * WEIGHT_TIMELINE
            + applicant_factor.score * WEIGHT_APPLICANT
            + market_factor.score * WEIGHT_MARKET
            + family_factor.score * WEIGHT_FAMILY;

        let overall = weighted.min(FORMULA_CAP).min(ORGANIC_CAP);
        let tier = CertaintyTier::classify(overall);

        ConfidenceAnalysis {
            overall_confidence: overall,
            tier,
            factors: FactorBreakdown {
                pct_timeline: timeline_factor,
                applicant_behavior: applicant_factor,
                market_relevance: market_factor,
                family_strength: family_factor,
            },
            classification_method: ClassificationMethod::AbsoluteThreshold,
            rank_percentile: None,
        }
    }

    /// Fator 1 — prazo PCT (peso 0.30).
    ///
    /// Janela aberta: bucket por dias restantes (>365→0.70, >180→0.85,
    /// >90→0.92, senão 0.95). Prazo vencido: 0.75 fixo.
    fn timeline_score(timeline: &PCTTimeline) -> FactorScore {
        let (score, rationale) = match timeline.status {
            DeadlineStatus::Open => {
                let days = timeline.days_remaining;
                if days > 365 {
                    (
                        0.70,
                        format!("{days} dias até o prazo (estágio inicial da janela)"),
                    )
                } else if days > 180 {
                    (
                        0.85,
                        format!("{days} dias até o prazo (janela típica de depósito)"),
                    )
                } else if days > 90 {
                    (
                        0.92,
                        format!("{days} dias até o prazo (aproximando do vencimento)"),
                    )
                } else {
                    (
                        0.95,
                        format!("{days} dias até o prazo (depósito iminente esperado)"),
                    )
                }
            }
            DeadlineStatus::Passed => (
                0.75,
                "prazo de 30 meses vencido; se depositado, aguarda publicação no INPI"
                    .to_string(),
            ),
        };
        FactorScore {
            score,
            weight: WEIGHT_TIMELINE,
            rationale,
        }
    }

    /// Fator 2 — comportamento do depositante (peso 0.40).
    ///
    /// `min(filing_rate, 0.95) × multiplicador(filing_rate)`, teto 0.95.
    fn applicant_score(applicant: &ApplicantBehavior) -> FactorScore {
        let base = applicant.filing_rate().min(0.95);
        let score = (base * applicant.confidence_multiplier()).min(0.95);
        FactorScore {
            score,
            weight: WEIGHT_APPLICANT,
            rationale: applicant.describe(),
        }
    }

    /// Fator 3 — relevância de mercado (peso 0.20): `0.80 × multiplicador`.
    fn market_score(market: &MarketRelevance) -> FactorScore {
        FactorScore {
            score: 0.80 * market.multiplier,
            weight: WEIGHT_MARKET,
            rationale: market.rationale.clone(),
        }
    }

    /// Fator 4 — força da família (peso 0.10).
    ///
    /// Bucket por tamanho: ≥20→0.95, ≥15→0.88, ≥8→0.75, ≥4→0.60, senão 0.45.
    fn family_score(family_size: u32) -> FactorScore {
        let (score, qualifier) = if family_size >= 20 {
            (0.95, "família muito grande — valor comercial excepcional")
        } else if family_size >= 15 {
            (0.88, "família grande — alto valor comercial")
        } else if family_size >= 8 {
            (0.75, "família média — valor comercial moderado")
        } else if family_size >= 4 {
            (0.60, "família pequena — valor comercial limitado")
        } else {
            (0.45, "família mínima — interesse comercial reduzido")
        };
        FactorScore {
            score,
            weight: WEIGHT_FAMILY,
            rationale: format!("{family_size} jurisdições: {qualifier}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{parse_date_soft, ApplicantBehavior, WOFiling};
    use crate::market::MarketRelevanceScorer;
    use crate::timeline::PCTTimeline;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn date(s: &str) -> NaiveDate {
        parse_date_soft(s).unwrap()
    }

    fn behavior(rate_num: usize, rate_den: usize) -> ApplicantBehavior {
        let wos: BTreeSet<String> = (0..rate_den).map(|i| format!("WO{i}")).collect();
        let brs: BTreeSet<String> = (0..rate_num).map(|i| format!("WO{i}")).collect();
        ApplicantBehavior::new("Teste SA", wos, brs, BTreeSet::new())
    }

    fn timeline_with_days_left(days: i64) -> PCTTimeline {
        let reference = date("2024-01-01");
        let wo = WOFiling {
            wo_number: "WO2024/000001".into(),
            priority_date: Some(reference - chrono::Duration::days(900 - days)),
            publication_date: None,
            applicant: "Teste".into(),
            ipc_codes: vec![],
            therapeutic_area: String::new(),
            inventors: vec![],
            family_size: 1,
            brazil_designated: true,
        };
        PCTTimeline::from_filing(&wo, reference)
    }

    // ─── buckets dos fatores ───────────────────────────────────

    #[test]
    fn timeline_buckets_follow_proximity() {
        assert!((ConfidenceModel::timeline_score(&timeline_with_days_left(500)).score - 0.70).abs() < 1e-9);
        assert!((ConfidenceModel::timeline_score(&timeline_with_days_left(300)).score - 0.85).abs() < 1e-9);
        assert!((ConfidenceModel::timeline_score(&timeline_with_days_left(120)).score - 0.92).abs() < 1e-9);
        assert!((ConfidenceModel::timeline_score(&timeline_with_days_left(30)).score - 0.95).abs() < 1e-9);
        assert!((ConfidenceModel::timeline_score(&timeline_with_days_left(-50)).score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn applicant_score_capped_at_0_95() {
        // 0.93 × 1.2 = 1.116 → teto 0.95
        let b = behavior(93, 100);
        let f = ConfidenceModel::applicant_score(&b);
        assert!((f.score - 0.95).abs() < 1e-9);
    }

    #[test]
    fn family_buckets() {
        assert!((ConfidenceModel::family_score(25).score - 0.95).abs() < 1e-9);
        assert!((ConfidenceModel::family_score(15).score - 0.88).abs() < 1e-9);
        assert!((ConfidenceModel::family_score(8).score - 0.75).abs() < 1e-9);
        assert!((ConfidenceModel::family_score(4).score - 0.60).abs() < 1e-9);
        assert!((ConfidenceModel::family_score(0).score - 0.45).abs() < 1e-9);
    }

    // ─── tetos ─────────────────────────────────────────────────

    /// Mesmo com todos os fatores no máximo, o score nunca passa de 0.95 —
    /// e o caminho orgânico para em 0.84.
    #[test]
    fn organic_confidence_never_reaches_found() {
        let timeline = timeline_with_days_left(30); // T = 0.95
        let b = behavior(100, 100); // A = 0.95 (após teto)
        let market = MarketRelevanceScorer::score("Oncology", &["A61P35/00".to_string()]);
        let a = ConfidenceModel::analyze(&timeline, &b, &market, 25);
        assert!(a.overall_confidence <= ORGANIC_CAP + 1e-9);
        assert_eq!(a.tier, CertaintyTier::Inferred);
    }

    // ─── Cenário A (exemplo trabalhado) ────────────────────────

    /// Bayer AG, taxa 0.93, família 15, Oncology, prioridade 400 dias antes
    /// da referência (500 dias restantes): T=0.70, A=0.95, M=0.96, F=0.88
    /// → ponderado 0.87 → teto orgânico 0.84 → INFERRED.
    #[test]
    fn scenario_bayer_oncology_lands_in_inferred() {
        let timeline = timeline_with_days_left(500);
        let bayer = behavior(93, 100);
        let market = MarketRelevanceScorer::score("Oncology", &["A61P35/00".to_string()]);
        let a = ConfidenceModel::analyze(&timeline, &bayer, &market, 15);

        assert!(a.overall_confidence >= 0.70 && a.overall_confidence <= 0.95);
        assert!((a.overall_confidence - 0.84).abs() < 1e-9);
        assert_eq!(a.tier, CertaintyTier::Inferred);
        assert_eq!(
            a.classification_method,
            crate::core::ClassificationMethod::AbsoluteThreshold
        );
        assert!(a.rank_percentile.is_none());
    }

    /// Pesos declarados somam 1.0 e aparecem na decomposição.
    #[test]
    fn factor_weights_sum_to_one() {
        let timeline = timeline_with_days_left(200);
        let b = behavior(5, 10);
        let market = MarketRelevanceScorer::score("", &[]);
        let a = ConfidenceModel::analyze(&timeline, &b, &market, 3);
        let soma = a.factors.pct_timeline.weight
            + a.factors.applicant_behavior.weight
            + a.factors.market_relevance.weight
            + a.factors.family_strength.weight;
        assert!((soma - 1.0).abs() < 1e-9);
    }
}
