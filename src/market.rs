//! # MarketRelevanceScorer — Relevância para o Mercado Brasileiro
//!
//! Avalia o alinhamento da área terapêutica e das classes IPC de um WO com
//! as **prioridades regulatórias e de mercado do Brasil** (vias ANVISA,
//! padrões de compra do SUS).
//!
//! ## Heurística
//!
//! Dois sinais booleanos independentes:
//!
//! - **IPC relevante** — alguma classe começa com um prefixo da lista de
//!   alta prioridade (oncológicos, anti-infecciosos, vacinas, SNC,
//!   cardiovasculares, metabólicos);
//! - **Área relevante** — a área terapêutica contém (case-insensitive) um
//!   termo da lista priorizada pelo SUS.
//!
//! | IPC | Área | Multiplicador |
//! |-----|------|---------------|
//! | ✓ | ✓ | 1.2 |
//! | ✓ | ✗ (ou ✗/✓) | 1.1 |
//! | ✗ | ✗ | 0.9 |
//!
//! O multiplicador ajusta o score-base de mercado (0.80) no
//! [`ConfidenceModel`](crate::confidence).

/// Prefixos IPC com alta relevância para o mercado farmacêutico brasileiro.
///
/// A61K31: preparações farmacêuticas de natureza química específica;
/// A61K39: antígenos/anticorpos (vacinas); A61P31: anti-infecciosos;
/// A61P35: antineoplásicos; A61P25: SNC; A61P9: cardiovasculares;
/// A61P3: distúrbios metabólicos (diabetes).
const HIGH_PRIORITY_IPC: [&str; 7] = [
    "A61K31", "A61K39", "A61P31", "A61P35", "A61P25", "A61P9", "A61P3",
];

/// Áreas terapêuticas priorizadas pelo SUS.
const HIGH_PRIORITY_AREAS: [&str; 7] = [
    "oncology",
    "hiv/aids",
    "tuberculosis",
    "neglected diseases",
    "vaccines",
    "cns",
    "diabetes",
];

/// Resultado do scoring de relevância de mercado.
#[derive(Clone, Debug)]
pub struct MarketRelevance {
    /// Multiplicador ∈ {0.9, 1.1, 1.2}.
    pub multiplier: f64,
    /// Justificativa legível para o rationale do fator.
    pub rationale: String,
}

/// Scorer sem estado — função pura sobre (área, classes IPC).
pub struct MarketRelevanceScorer;

impl MarketRelevanceScorer {
    /// Calcula o multiplicador de relevância de mercado.
    pub fn score(therapeutic_area: &str, ipc_codes: &[String]) -> MarketRelevance {
        let ipc_relevant = ipc_codes
            .iter()
            .any(|ipc| HIGH_PRIORITY_IPC.iter().any(|p| ipc.starts_with(p)));

        let area_lower = therapeutic_area.to_lowercase();
        let area_relevant = HIGH_PRIORITY_AREAS
            .iter()
            .any(|prio| area_lower.contains(prio));

        let (multiplier, rationale) = match (ipc_relevant, area_relevant) {
            (true, true) => (
                1.2,
                format!(
                    "{therapeutic_area}: relevância muito alta para o mercado BR (prioridade SUS + IPC prioritária)"
                ),
            ),
            (true, false) | (false, true) => (
                1.1,
                format!("{therapeutic_area}: relevância alta para o mercado BR"),
            ),
            (false, false) => (
                0.9,
                format!("{therapeutic_area}: relevância padrão para o mercado BR"),
            ),
        };

        MarketRelevance {
            multiplier,
            rationale,
        }
    }
}
