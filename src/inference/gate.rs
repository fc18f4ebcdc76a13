//! # InferenceGate — O Porteiro da Inferência
//!
//! Decide, por WO, se vale emitir um evento de entrada BR inferida. A
//! predição só faz sentido quando há **possibilidade real** de um depósito
//! ainda não publicado; o gate corta os casos em que não há:
//!
//! 1. **Brasil não designado** — entrada em fase nacional é juridicamente
//!    impossível;
//! 2. **BR já encontrado** — a camada de busca já localizou a patente BR
//!    deste WO; inferir seria duplicar um fato conhecido;
//! 3. **Prazo vencido + depositante inconsistente** — com o prazo de 30
//!    meses passado, só vale apostar em "depositado e aguardando
//!    publicação" para depositantes que historicamente entram no Brasil
//!    (taxa ≥ 0.70).
//!
//! Com o prazo **aberto**, todo WO designando o Brasil passa: a janela
//! ainda está correndo e qualquer depositante pode entrar.
//!
//! Rejeições não são erros: são logadas em `debug` e o WO simplesmente não
//! gera evento.

use std::collections::HashSet;

use crate::core::{ApplicantBehavior, WOFiling};
use crate::timeline::PCTTimeline;

/// Taxa histórica mínima para inferir depósito após o prazo vencido.
pub const PASSED_DEADLINE_MIN_RATE: f64 = 0.70;

/// Motivo de rejeição de um candidato.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    /// O WO não designa o Brasil.
    BrazilNotDesignated,
    /// Já existe patente BR encontrada referenciando este WO.
    AlreadyFound,
    /// Prazo vencido e o depositante raramente entra no Brasil.
    PassedDeadlineInconsistentApplicant,
}

impl RejectionReason {
    /// Descrição curta para logs.
    pub fn describe(&self) -> &'static str {
        match self {
            RejectionReason::BrazilNotDesignated => "Brasil não designado",
            RejectionReason::AlreadyFound => "BR já encontrado pela busca",
            RejectionReason::PassedDeadlineInconsistentApplicant => {
                "prazo vencido e depositante sem histórico consistente"
            }
        }
    }
}

/// Veredito do gate para um candidato.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Segue para o modelo de confiança.
    Accepted,
    /// Descartado, com o motivo.
    Rejected(RejectionReason),
}

/// Porteiro sem estado — função pura sobre (WO, linha do tempo, histórico).
pub struct InferenceGate;

impl InferenceGate {
    /// Avalia um candidato contra os três critérios de corte.
    ///
    /// `known_br_refs` é o conjunto de números WO referenciados por
    /// patentes BR **já encontradas** pela camada de busca.
    pub fn evaluate(
        wo: &WOFiling,
        timeline: &PCTTimeline,
        behavior: &ApplicantBehavior,
        known_br_refs: &HashSet<String>,
    ) -> GateDecision {
        if !wo.brazil_designated {
            return Self::reject(wo, RejectionReason::BrazilNotDesignated);
        }

        if known_br_refs.contains(&wo.wo_number) {
            return Self::reject(wo, RejectionReason::AlreadyFound);
        }

        if !timeline.is_open() && behavior.filing_rate() < PASSED_DEADLINE_MIN_RATE {
            return Self::reject(
                wo,
                RejectionReason::PassedDeadlineInconsistentApplicant,
            );
        }

        GateDecision::Accepted
    }

    fn reject(wo: &WOFiling, reason: RejectionReason) -> GateDecision {
        tracing::debug!(wo = %wo.wo_number, motivo = reason.describe(), "candidato rejeitado");
        GateDecision::Rejected(reason)
    }
}
