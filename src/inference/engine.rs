//! # PredictiveEngine — Montagem dos Eventos Inferidos
//!
//! Para cada WO aceito pelo [`InferenceGate`](super::gate), o motor:
//!
//! 1. deriva a linha do tempo PCT ([`PCTTimeline`]);
//! 2. busca o histórico do depositante no store (read-only);
//! 3. calcula a análise de confiança ([`ConfidenceModel`]);
//! 4. monta o [`InferredEvent`] com as janelas de depósito e publicação.
//!
//! ## Paralelismo
//!
//! Cada WO é independente dos demais, então o lote inteiro roda em
//! `par_iter` (rayon). O `collect` do rayon preserva a ordem de entrada —
//! a saída é determinística independente do número de threads.
//!
//! ## `likely_filed`
//!
//! O flag responde "o depósito provavelmente **já** aconteceu?":
//! - prazo vencido → `true` (se entrou, foi dentro do prazo);
//! - janela aberta → `true` sse a confiança combinada ≥ 0.70.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use crate::confidence::ConfidenceModel;
use crate::core::{
    normalize_applicant, BRFiling, FilingWindow, InferredEvent, PublicationWindow, WOFiling,
    BR_NUMBER_FORMAT,
};
use crate::inference::gate::{GateDecision, InferenceGate};
use crate::market::MarketRelevanceScorer;
use crate::store::ApplicantBehaviorStore;
use crate::timeline::{DeadlineStatus, PCTTimeline};

/// Confiança mínima para `likely_filed` com a janela ainda aberta.
pub const LIKELY_FILED_MIN_CONFIDENCE: f64 = 0.70;

/// Sumário de um lote de eventos, por tier.
#[derive(Clone, Debug, Serialize)]
pub struct TierSummary {
    /// Total de eventos emitidos.
    pub total: usize,
    /// Confiança média do lote (0.0 para lote vazio).
    pub mean_confidence: f64,
    /// Contagem por tier, em ordem de força probatória decrescente.
    pub by_tier: BTreeMap<String, usize>,
}

impl TierSummary {
    /// Conta os eventos de um lote por tier e tira a confiança média.
    ///
    /// Todos os seis tiers aparecem no mapa, mesmo com contagem zero — o
    /// relatório fica com formato estável entre execuções.
    pub fn of(events: &[InferredEvent]) -> Self {
        let mut by_tier: BTreeMap<String, usize> = crate::core::CertaintyTier::all()
            .into_iter()
            .map(|t| (t.label().to_string(), 0))
            .collect();
        let mut soma = 0.0;
        for event in events {
            *by_tier.entry(event.analysis.tier.label().to_string()).or_default() += 1;
            soma += event.analysis.overall_confidence;
        }
        let mean_confidence = if events.is_empty() {
            0.0
        } else {
            soma / events.len() as f64
        };
        Self {
            total: events.len(),
            mean_confidence,
            by_tier,
        }
    }
}

/// Motor de inferência. Lê o store de depositantes; nunca o muta.
pub struct PredictiveEngine<'a> {
    store: &'a ApplicantBehaviorStore,
}

impl<'a> PredictiveEngine<'a> {
    /// Cria o motor sobre um store já carregado (e, idealmente, já
    /// atualizado pelo aprendizado desta execução).
    pub fn new(store: &'a ApplicantBehaviorStore) -> Self {
        Self { store }
    }

    /// Infere eventos de entrada BR para um lote de WOs.
    ///
    /// `known_brs` são as patentes BR que a camada de busca **já
    /// encontrou** — seus WOs de referência não geram inferência. A ordem
    /// da saída segue a ordem da entrada (menos os rejeitados).
    pub fn infer(
        &self,
        wos: &[WOFiling],
        known_brs: &[BRFiling],
        reference_date: NaiveDate,
    ) -> Vec<InferredEvent> {
        let known_refs: HashSet<String> = known_brs
            .iter()
            .filter_map(|br| br.wo_reference.clone())
            .collect();

        let events: Vec<InferredEvent> = wos
            .par_iter()
            .filter_map(|wo| self.infer_one(wo, &known_refs, reference_date))
            .collect();

        tracing::info!(
            candidatos = wos.len(),
            emitidos = events.len(),
            rejeitados = wos.len() - events.len(),
            "inferência do lote concluída"
        );
        events
    }

    fn infer_one(
        &self,
        wo: &WOFiling,
        known_refs: &HashSet<String>,
        reference_date: NaiveDate,
    ) -> Option<InferredEvent> {
        let timeline = PCTTimeline::from_filing(wo, reference_date);
        let behavior = self.store.lookup(&wo.applicant);

        match InferenceGate::evaluate(wo, &timeline, &behavior, known_refs) {
            GateDecision::Accepted => {}
            GateDecision::Rejected(_) => return None,
        }

        let market = MarketRelevanceScorer::score(&wo.therapeutic_area, &wo.ipc_codes);
        let analysis = ConfidenceModel::analyze(&timeline, &behavior, &market, wo.family_size);

        let likely_filed = match timeline.status {
            DeadlineStatus::Passed => true,
            DeadlineStatus::Open => analysis.overall_confidence >= LIKELY_FILED_MIN_CONFIDENCE,
        };

        let (pub_earliest, pub_latest) = timeline.expected_br_publication_window();

        Some(InferredEvent {
            event_id: InferredEvent::event_id_for(&wo.wo_number),
            wo_number: wo.wo_number.clone(),
            applicant: normalize_applicant(&wo.applicant),
            analysis,
            filing_window: FilingWindow {
                earliest_possible: timeline.priority_date,
                deadline: timeline.deadline,
                status: timeline.status,
                days_until_deadline: timeline.days_remaining,
                likely_filed,
            },
            publication_window: PublicationWindow {
                earliest: pub_earliest,
                latest: pub_latest,
            },
            br_number: None,
            br_number_format_expected: BR_NUMBER_FORMAT.to_string(),
            publication_year: wo.publication_year(),
            inventor_count: wo.inventors.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{parse_date_soft, CertaintyTier};
    use std::collections::BTreeSet;

    fn date(s: &str) -> NaiveDate {
        parse_date_soft(s).unwrap()
    }

    fn wo(number: &str, applicant: &str, priority: &str) -> WOFiling {
        WOFiling {
            wo_number: number.to_string(),
            priority_date: parse_date_soft(priority),
            publication_date: parse_date_soft("2024-01-04"),
            applicant: applicant.to_string(),
            ipc_codes: vec!["A61P35/00".to_string()],
            therapeutic_area: "Oncology".to_string(),
            inventors: vec!["A".to_string(), "B".to_string()],
            family_size: 15,
            brazil_designated: true,
        }
    }

    fn seeded_store(dir: &tempfile::TempDir) -> ApplicantBehaviorStore {
        let store = ApplicantBehaviorStore::open(dir.path().join("kb.json"));
        store.seed();
        store
    }

    #[test]
    fn emits_event_for_accepted_wo() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let engine = PredictiveEngine::new(&store);

        let wos = vec![wo("WO2023/111111", "Bayer AG", "2023-06-01")];
        let events = engine.infer(&wos, &[], date("2024-07-01"));

        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.event_id, "INF-WO2023-111111");
        assert_eq!(e.applicant, "Bayer AG");
        assert!(e.br_number.is_none());
        assert_eq!(e.br_number_format_expected, BR_NUMBER_FORMAT);
        assert_eq!(e.inventor_count, 2);
        assert_eq!(e.publication_year, 2024);
        // seed do Bayer (taxa 0.93) + família 15 + Oncology ≥ INFERRED
        assert_eq!(e.analysis.tier, CertaintyTier::Inferred);
        assert!(e.filing_window.likely_filed);
    }

    /// WO cujo BR a busca já encontrou não vira evento.
    #[test]
    fn known_br_reference_suppresses_inference() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let engine = PredictiveEngine::new(&store);

        let wos = vec![
            wo("WO2023/111111", "Bayer AG", "2023-06-01"),
            wo("WO2023/222222", "Bayer AG", "2023-06-01"),
        ];
        let brs = vec![BRFiling {
            patent_number: "BR112023011111".to_string(),
            wo_reference: Some("WO2023/111111".to_string()),
            applicant: "Bayer AG".to_string(),
        }];

        let events = engine.infer(&wos, &brs, date("2024-07-01"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].wo_number, "WO2023/222222");
    }

    #[test]
    fn output_preserves_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let engine = PredictiveEngine::new(&store);

        let wos: Vec<WOFiling> = (0..50)
            .map(|i| wo(&format!("WO2023/{i:06}"), "Novartis AG", "2023-06-01"))
            .collect();
        let events = engine.infer(&wos, &[], date("2024-07-01"));

        assert_eq!(events.len(), 50);
        for (i, e) in events.iter().enumerate() {
            assert_eq!(e.wo_number, format!("WO2023/{i:06}"));
        }
    }

    #[test]
    fn passed_deadline_event_is_likely_filed() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let engine = PredictiveEngine::new(&store);

        // prioridade 2020, referência 2024: prazo vencido; Bayer é
        // consistente (0.93 ≥ 0.70), então passa no gate
        let wos = vec![wo("WO2020/999999", "Bayer AG", "2020-01-01")];
        let events = engine.infer(&wos, &[], date("2024-01-01"));

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].filing_window.status, DeadlineStatus::Passed);
        assert!(events[0].filing_window.likely_filed);
        assert!(events[0].filing_window.days_until_deadline < 0);
    }

    #[test]
    fn tier_summary_has_stable_shape() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir);
        let engine = PredictiveEngine::new(&store);

        let wos = vec![wo("WO2023/111111", "Bayer AG", "2023-06-01")];
        let events = engine.infer(&wos, &[], date("2024-07-01"));
        let summary = TierSummary::of(&events);

        assert_eq!(summary.total, 1);
        assert!(summary.mean_confidence > 0.0);
        assert_eq!(summary.by_tier.len(), 6);
        assert_eq!(summary.by_tier["INFERRED"], 1);
        assert_eq!(summary.by_tier["PUBLISHED"], 0);
    }
}
