//! # CertaintyTier — Níveis de Certeza da Metodologia Jurídica
//!
//! Implementação dos **seis níveis de certeza** usados para classificar
//! predições de entrada em fase nacional brasileira.
//!
//! ## Por que Tiers?
//!
//! Um score contínuo (0.0 a 1.0) é preciso demais para uso jurídico —
//! advogados e analistas de FTO raciocinam em **categorias de evidência**.
//! Cada tier comunica de onde veio a certeza, não apenas quanto dela existe:
//!
//! | Tier | Faixa | Origem da evidência |
//! |------|-------|---------------------|
//! | `Published` | ≥ 0.95 | Publicação oficial na RPI do INPI |
//! | `Found` | ≥ 0.85 | Localizada em bases comerciais |
//! | `Inferred` | ≥ 0.72 | Família PCT + prazo estatutário |
//! | `Expected` | ≥ 0.58 | Padrão histórico do depositante |
//! | `Predicted` | ≥ 0.40 | Saída do modelo estatístico |
//! | `Speculative` | < 0.40 | Puramente prospectivo |
//!
//! ## Invariante de Partição
//!
//! Os limites **particionam [0,1] sem lacunas**: para todo score válido,
//! exatamente um tier corresponde. As comparações são inclusivas no limite
//! inferior. O enum é fechado e todo `match` é exaustivo — adicionar um tier
//! sem atualizar os matches é erro de compilação.
//!
//! ## Reserva dos Tiers Superiores
//!
//! `Published` e `Found` são reservados para dados confirmados externamente.
//! O motor de confiança nunca os produz organicamente (ver
//! [`ConfidenceModel`](crate::confidence)); apenas o
//! [`DistributionCalibrator`](crate::calibration) pode promover um evento a
//! `Found` via seu caminho explícito de boost.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nível de certeza de uma predição, ordenado por força probatória decrescente.
///
/// A ordem de declaração importa: `Published` é a evidência mais forte,
/// `Speculative` a mais fraca. `PartialOrd`/`Ord` derivados seguem essa ordem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertaintyTier {
    /// Publicação oficial verificada na RPI do INPI (score ≥ 0.95).
    Published,
    /// Localizada em bases comerciais, aguardando confirmação INPI (≥ 0.85).
    Found,
    /// Derivada de família PCT + regras de prazo estatutário (≥ 0.72).
    Inferred,
    /// Antecipada pelo padrão histórico do depositante (≥ 0.58).
    Expected,
    /// Saída de modelo estatístico sem corroboração forte (≥ 0.40).
    Predicted,
    /// Predição puramente prospectiva, sem base histórica (< 0.40).
    Speculative,
}

impl CertaintyTier {
    /// Classifica um score de confiança no tier correspondente.
    ///
    /// Os limites são **inclusivos no limite inferior** e particionam [0,1]
    /// exatamente — todo score cai em um e apenas um tier.
    ///
    /// # Exemplo
    ///
    /// ```text
    /// classify(0.95) → Published   (limite inferior inclusivo)
    /// classify(0.84) → Inferred
    /// classify(0.72) → Inferred    (limite inferior inclusivo)
    /// classify(0.00) → Speculative
    /// ```
    pub fn classify(confidence: f64) -> Self {
        if confidence >= 0.95 {
            CertaintyTier::Published
        } else if confidence >= 0.85 {
            CertaintyTier::Found
        } else if confidence >= 0.72 {
            CertaintyTier::Inferred
        } else if confidence >= 0.58 {
            CertaintyTier::Expected
        } else if confidence >= 0.40 {
            CertaintyTier::Predicted
        } else {
            CertaintyTier::Speculative
        }
    }

    /// Label canônico em inglês, usado no JSON de saída.
    pub fn label(&self) -> &'static str {
        match self {
            CertaintyTier::Published => "PUBLISHED",
            CertaintyTier::Found => "FOUND",
            CertaintyTier::Inferred => "INFERRED",
            CertaintyTier::Expected => "EXPECTED",
            CertaintyTier::Predicted => "PREDICTED",
            CertaintyTier::Speculative => "SPECULATIVE",
        }
    }

    /// Termo jurídico em PT-BR, usado em relatórios para o mercado brasileiro.
    pub fn label_pt(&self) -> &'static str {
        match self {
            CertaintyTier::Published => "publicado",
            CertaintyTier::Found => "encontrado",
            CertaintyTier::Inferred => "inferido",
            CertaintyTier::Expected => "esperado",
            CertaintyTier::Predicted => "previsto",
            CertaintyTier::Speculative => "especulativo",
        }
    }

    /// Todos os tiers, em ordem de força probatória decrescente.
    ///
    /// Usado para montar sumários por tier com ordem estável.
    pub fn all() -> [CertaintyTier; 6] {
        [
            CertaintyTier::Published,
            CertaintyTier::Found,
            CertaintyTier::Inferred,
            CertaintyTier::Expected,
            CertaintyTier::Predicted,
            CertaintyTier::Speculative,
        ]
    }
}

impl fmt::Display for CertaintyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
