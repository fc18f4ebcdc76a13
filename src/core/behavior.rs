//! # ApplicantBehavior — Comportamento Histórico do Depositante
//!
//! Registro **vivo** do padrão de depósito de cada depositante: quantos WOs
//! com Brasil designado já observamos, quantos efetivamente entraram em fase
//! nacional, e a taxa resultante.
//!
//! ## Por que Guardar os Conjuntos de IDs?
//!
//! O aprendizado é **monotônico por união de conjuntos**: cada busca pode
//! reobservar os mesmos WOs/BRs, e contar duplicatas inflaria a taxa. Por
//! isso o registro persiste os próprios conjuntos (`observed_wos`,
//! `observed_brs`) em vez de contadores — a união é idempotente por
//! construção, e os totais são derivados (`len()` dos conjuntos).
//!
//! `BTreeSet` (e não `HashSet`) para que a serialização JSON seja estável
//! entre execuções — diffs legíveis no arquivo persistido.
//!
//! ## Ciclo de Vida
//!
//! 1. Criado na primeira observação do depositante;
//! 2. Mutado a cada busca que observa o mesmo nome (normalizado);
//! 3. **Nunca deletado** — conhecimento acumulado não expira.
//!
//! O único escritor é o [`ApplicantBehaviorStore`](crate::store).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Nome-sentinela para depositante ausente/vazio — nunca persistido.
pub const UNKNOWN_APPLICANT: &str = "Unknown";

/// Nível de evidência do registro, derivado do tamanho da amostra.
///
/// Comunica ao consumidor o quanto a `filing_rate` é estatisticamente
/// estável: uma taxa de 100% sobre 2 WOs vale pouco; sobre 40, vale muito.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceLevel {
    /// Menos de 15 WOs observados.
    Low,
    /// 15 a 29 WOs observados.
    Medium,
    /// 30 ou mais WOs observados.
    High,
}

impl EvidenceLevel {
    /// Deriva o nível a partir do total de WOs observados.
    ///
    /// Limites: `high` ≥ 30, `medium` ≥ 15, senão `low`.
    pub fn from_sample_size(total_wo: usize) -> Self {
        if total_wo >= 30 {
            EvidenceLevel::High
        } else if total_wo >= 15 {
            EvidenceLevel::Medium
        } else {
            EvidenceLevel::Low
        }
    }
}

/// Estatísticas históricas de depósito BR de um depositante.
///
/// Chaveado pelo nome **normalizado** (ver [`normalize_applicant`]).
/// Propriedade exclusiva do store — todo o resto do motor só lê.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApplicantBehavior {
    /// Nome normalizado do depositante (chave do store).
    pub applicant_name: String,

    /// WOs com Brasil designado já observados para este depositante.
    pub observed_wos: BTreeSet<String>,

    /// WOs que comprovadamente entraram em fase nacional BR
    /// (identificados pela referência WO da patente BR encontrada).
    pub observed_brs: BTreeSet<String>,

    /// Áreas terapêuticas em que o depositante atua.
    pub therapeutic_areas: BTreeSet<String>,

    /// Última mutação do registro. Não muda em merges no-op.
    pub last_updated: DateTime<Utc>,
}

impl ApplicantBehavior {
    /// Cria um registro novo a partir da primeira observação.
    pub fn new(
        name: &str,
        wos: BTreeSet<String>,
        brs: BTreeSet<String>,
        areas: BTreeSet<String>,
    ) -> Self {
        Self {
            applicant_name: name.to_string(),
            observed_wos: wos,
            observed_brs: brs,
            therapeutic_areas: areas,
            last_updated: Utc::now(),
        }
    }

    /// Registro sintético para depositante desconhecido.
    ///
    /// Taxa neutra de 0.5 e evidência `Low`. **Nunca é persistido** — existe
    /// só para que lookups de nomes nunca vistos não precisem errar.
    pub fn unknown(name: &str) -> Self {
        Self::new(name, BTreeSet::new(), BTreeSet::new(), BTreeSet::new())
    }

    /// Total de WOs (Brasil designado) observados.
    pub fn total_wo_observed(&self) -> usize {
        self.observed_wos.len()
    }

    /// Total de entradas BR atribuíveis a um WO observado.
    pub fn total_br_observed(&self) -> usize {
        self.observed_brs.len()
    }

    /// Taxa histórica de entrada em fase nacional BR.
    ///
    /// `total_br / total_wo`; **0.5 (neutro)** quando não há WOs observados —
    /// a ausência de histórico não deve puxar a predição para nenhum lado.
    pub fn filing_rate(&self) -> f64 {
        let wos = self.total_wo_observed();
        if wos == 0 {
            0.5
        } else {
            self.total_br_observed() as f64 / wos as f64
        }
    }

    /// Nível de evidência derivado do tamanho da amostra.
    pub fn evidence_level(&self) -> EvidenceLevel {
        EvidenceLevel::from_sample_size(self.total_wo_observed())
    }

    /// Multiplicador de consistência usado pelo fator "depositante"
    /// do modelo de confiança.
    ///
    /// | filing_rate | multiplicador | perfil |
    /// |-------------|---------------|--------|
    /// | ≥ 0.90 | 1.2 | deposita quase sempre |
    /// | ≥ 0.70 | 1.0 | depositante típico |
    /// | ≥ 0.40 | 0.8 | depositante seletivo |
    /// | < 0.40 | 0.6 | raramente deposita |
    pub fn confidence_multiplier(&self) -> f64 {
        let rate = self.filing_rate();
        if rate >= 0.90 {
            1.2
        } else if rate >= 0.70 {
            1.0
        } else if rate >= 0.40 {
            0.8
        } else {
            0.6
        }
    }

    /// Descrição legível do padrão de depósito, para o rationale do fator.
    ///
    /// Ex: `"Bayer AG: depositante BR altamente consistente (93% = 39/42)"`.
    pub fn describe(&self) -> String {
        let rate = self.filing_rate();
        let perfil = if rate >= 0.90 {
            "altamente consistente"
        } else if rate >= 0.70 {
            "consistente"
        } else if rate >= 0.40 {
            "seletivo"
        } else {
            "raro"
        };
        format!(
            "{}: depositante BR {} ({:.0}% = {}/{})",
            self.applicant_name,
            perfil,
            rate * 100.0,
            self.total_br_observed(),
            self.total_wo_observed()
        )
    }
}

/// Normaliza o nome bruto de um depositante para a chave canônica do store.
///
/// Passos, na ordem:
/// 1. Normalização Unicode NFC (fontes misturam formas compostas/decompostas);
/// 2. Remove códigos de país entre colchetes: `"NOVARTIS AG [CH]"` → `"NOVARTIS AG"`;
/// 3. Mantém só o **primeiro** depositante quando há vários
///    (`"Bayer AG; Orion Corporation"` → `"Bayer AG"`) — separadores `;` e `,`;
/// 4. Unifica variantes de pontuação de sufixos corporativos
///    (`Inc.`→`Inc`, `Ltd.`→`Ltd`, `S.A.`→`SA`, `Co.`→`Co`, `Corp.`→`Corp`);
/// 5. Trim de espaços.
///
/// Entrada vazia (ou que se reduz a vazio) normaliza para o sentinela
/// [`UNKNOWN_APPLICANT`], que nunca é persistido como registro.
pub fn normalize_applicant(raw: &str) -> String {
    let nfc: String = raw.nfc().collect();

    // Remove código de país entre colchetes
    let sem_pais = match nfc.find('[') {
        Some(idx) => &nfc[..idx],
        None => &nfc,
    };

    // Primeiro depositante apenas
    let primeiro = sem_pais
        .split(';')
        .next()
        .unwrap_or("")
        .split(',')
        .next()
        .unwrap_or("");

    let mut nome = primeiro.trim().to_string();
    for (de, para) in [
        ("Inc.", "Inc"),
        ("Ltd.", "Ltd"),
        ("S.A.", "SA"),
        ("Co.", "Co"),
        ("Corp.", "Corp"),
    ] {
        nome = nome.replace(de, para);
    }

    let nome = nome.trim();
    if nome.is_empty() {
        UNKNOWN_APPLICANT.to_string()
    } else {
        nome.to_string()
    }
}
