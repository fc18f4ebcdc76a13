//! # Inferência — Do WO Bruto ao Evento Predito
//!
//! Pipeline central do motor, em dois estágios:
//!
//! ```text
//! WOFiling ──► InferenceGate ──► ConfidenceModel ──► InferredEvent
//!                  │ (rejeita)
//!                  └──► nada (rejeições são logadas, não emitidas)
//! ```
//!
//! - [`gate`] — o porteiro: decide **se** vale inferir uma entrada BR para
//!   o WO (designação, duplicidade com BRs já encontrados, prazo);
//! - [`engine`] — o montador: para cada WO aceito, calcula confiança e
//!   emite o [`InferredEvent`](crate::core::InferredEvent) completo.
//!
//! O motor é **read-only** sobre o store de depositantes: aprendizado
//! acontece antes, em [`learning`](crate::learning).

/// Critérios de aceitação/rejeição de candidatos à inferência.
pub mod gate;

/// Motor de inferência: monta os eventos preditos em paralelo.
pub mod engine;

pub use engine::{PredictiveEngine, TierSummary};
pub use gate::{GateDecision, InferenceGate, RejectionReason};
