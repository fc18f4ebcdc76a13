//! # Filing — Registros Brutos de Patentes WO e BR
//!
//! Tipos de entrada do motor preditivo: o depósito internacional
//! ([`WOFiling`]) e a entrada em fase nacional brasileira já confirmada
//! ([`BRFiling`]).
//!
//! ## Imutabilidade
//!
//! Ambos os registros são **imutáveis após observados** — pertencem à sessão
//! de busca que os coletou. O motor nunca os modifica; toda informação
//! derivada vive em tipos próprios ([`PCTTimeline`](crate::timeline),
//! [`InferredEvent`](crate::core::event)).
//!
//! ## Datas Tolerantes a Falha
//!
//! Os crawlers externos entregam datas como strings em formatos variados
//! (ISO com ou sem hora, sufixo `Z`, lixo ocasional). O parse é **soft**:
//! strings malformadas viram `None`, nunca erro — o
//! [`TimelineModel`](crate::timeline) substitui defaults sintéticos quando
//! necessário (§ fallback de 540 dias).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Depósito internacional PCT ("WO"), como observado pela camada de busca.
///
/// Campos de data são `Option` porque a fonte pode omiti-los ou entregá-los
/// malformados; o parse soft ([`parse_date_soft`]) converte lixo em `None`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WOFiling {
    /// Número de publicação WO (ex: "WO2024/123456") — identidade do registro.
    pub wo_number: String,

    /// Data de prioridade mais antiga da família PCT.
    pub priority_date: Option<NaiveDate>,

    /// Data de publicação internacional (18 meses da prioridade).
    pub publication_date: Option<NaiveDate>,

    /// Nome bruto do depositante, como veio da fonte
    /// (ex: "Bayer AG; Orion Corporation" ou "NOVARTIS AG [CH]").
    pub applicant: String,

    /// Classificações IPC, em ordem de relevância conforme a fonte.
    #[serde(default)]
    pub ipc_codes: Vec<String>,

    /// Área terapêutica atribuída pela camada de busca (ex: "Oncology").
    #[serde(default)]
    pub therapeutic_area: String,

    /// Inventores listados na publicação — usado apenas como característica
    /// secundária de desempate na calibração.
    #[serde(default)]
    pub inventors: Vec<String>,

    /// Número de jurisdições na família — proxy de valor comercial.
    #[serde(default)]
    pub family_size: u32,

    /// Brasil foi designado no pedido PCT?
    #[serde(default)]
    pub brazil_designated: bool,
}

impl WOFiling {
    /// Ano de publicação, para a chave composta de calibração.
    ///
    /// Fallback 2020 quando a data de publicação está ausente — mesmo
    /// default neutro usado para as demais características secundárias.
    pub fn publication_year(&self) -> i32 {
        self.publication_date
            .map(|d| {
                use chrono::Datelike;
                d.year()
            })
            .unwrap_or(2020)
    }
}

/// Patente BR já confirmada (publicada ou localizada em base comercial).
///
/// Usada **somente** pelo gate como teste de "já encontrada" — o motor
/// jamais cria um `BRFiling`: o número é atribuído pelo INPI e não é
/// derivável algoritmicamente.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BRFiling {
    /// Número do pedido/patente BR, como publicado pelo INPI.
    pub patent_number: String,

    /// Número WO de origem, quando a fonte informa a ligação PCT.
    #[serde(default)]
    pub wo_reference: Option<String>,

    /// Nome bruto do depositante.
    #[serde(default)]
    pub applicant: String,
}

/// Parse tolerante de datas vindas dos crawlers.
///
/// Aceita, nesta ordem:
/// 1. `YYYY-MM-DD` puro;
/// 2. prefixo de 10 caracteres de timestamps ISO (`2023-06-15T00:00:00Z`);
///
/// Qualquer outra coisa (string vazia, lixo, formatos exóticos) vira `None`.
/// **Nunca retorna erro** — a política de datas malformadas é fail-soft em
/// todo o motor.
pub fn parse_date_soft(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(d);
    }
    // Timestamps ISO completos: aproveita só a parte da data
    if trimmed.len() >= 10 {
        if let Ok(d) = NaiveDate::parse_from_str(&trimmed[..10], "%Y-%m-%d") {
            return Some(d);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── parse_date_soft ───────────────────────────────────────

    #[test]
    fn parse_plain_iso_date() {
        assert_eq!(
            parse_date_soft("2023-06-15"),
            NaiveDate::from_ymd_opt(2023, 6, 15)
        );
    }

    #[test]
    fn parse_iso_timestamp_with_zulu() {
        assert_eq!(
            parse_date_soft("2023-06-15T12:30:00Z"),
            NaiveDate::from_ymd_opt(2023, 6, 15)
        );
    }

    #[test]
    fn parse_garbage_is_none() {
        assert_eq!(parse_date_soft("not-a-date"), None);
        assert_eq!(parse_date_soft(""), None);
        assert_eq!(parse_date_soft("   "), None);
        assert_eq!(parse_date_soft("15/06/2023"), None);
    }

    // ─── WOFiling ──────────────────────────────────────────────

    #[test]
    fn publication_year_with_fallback() {
        let mut wo = WOFiling {
            wo_number: "WO2024/000001".into(),
            priority_date: None,
            publication_date: parse_date_soft("2024-03-01"),
            applicant: "Teste".into(),
            ipc_codes: vec![],
            therapeutic_area: String::new(),
            inventors: vec![],
            family_size: 1,
            brazil_designated: true,
        };
        assert_eq!(wo.publication_year(), 2024);
        wo.publication_date = None;
        assert_eq!(wo.publication_year(), 2020);
    }
}
