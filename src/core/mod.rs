//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Este módulo agrupa os **tipos fundamentais** do motor preditivo de fase
//! nacional brasileira. Tudo no Previsor BR gira em torno destes tipos:
//!
//! - [`WOFiling`] / [`BRFiling`] — registros brutos vindos da camada de busca
//! - [`CertaintyTier`] — os seis níveis de certeza da metodologia jurídica
//! - [`ApplicantBehavior`] — estatísticas históricas por depositante
//! - [`InferredEvent`] — a predição completa emitida pelo motor
//!
//! ## Fluxo dos Tipos
//!
//! ```text
//! WOFiling + BRFiling ──► InferenceGate ──► ConfidenceModel ──► InferredEvent
//!                              │                   ▲
//!                              └── ApplicantBehavior (do store)
//! ```
//!
//! A fronteira é rígida: `WOFiling`/`BRFiling` são imutáveis (entrada),
//! `InferredEvent` é só-saída, e `ApplicantBehavior` só é mutado pelo
//! [`ApplicantBehaviorStore`](crate::store).

/// Sub-módulo com [`WOFiling`], [`BRFiling`] e o parse soft de datas.
pub mod filing;

/// Sub-módulo com o enum fechado [`CertaintyTier`].
pub mod tier;

/// Sub-módulo com [`ApplicantBehavior`] e a normalização de nomes.
pub mod behavior;

/// Sub-módulo com [`InferredEvent`] e a análise de confiança.
pub mod event;

// Re-exports para conveniência — permite `crate::core::WOFiling` etc.
pub use behavior::{normalize_applicant, ApplicantBehavior, EvidenceLevel, UNKNOWN_APPLICANT};
pub use event::{
    ClassificationMethod, ConfidenceAnalysis, FactorBreakdown, FactorScore, FilingWindow,
    InferredEvent, PublicationWindow, BR_NUMBER_FORMAT,
};
pub use filing::{parse_date_soft, BRFiling, WOFiling};
pub use tier::CertaintyTier;
