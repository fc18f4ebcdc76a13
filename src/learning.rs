//! # LearningUpdater — Aprendizado por Lote de Busca
//!
//! Converte o resultado bruto de uma busca (WOs + patentes BR encontradas)
//! em observações por depositante e as funde no
//! [`ApplicantBehaviorStore`](crate::store).
//!
//! ## O que Conta como Observação
//!
//! - **WO**: só entra no denominador da taxa se **designa o Brasil** e tem
//!   número no formato `WOyyyy/nnnnnn` (a taxa mede "dos WOs que *podiam*
//!   entrar no Brasil, quantos entraram");
//! - **BR**: só entra no numerador se sua `wo_reference` aponta para um WO
//!   observado **neste lote** — o vínculo WO→BR é a evidência. BRs sem
//!   vínculo são logados e descartados: contá-los inflaria o numerador sem
//!   crescer o denominador.
//!
//! ## Ordem no Pipeline
//!
//! O aprendizado roda **antes** da inferência: a predição de um lote já usa
//! o que o próprio lote ensinou (um BR encontrado hoje melhora a taxa do
//! depositante hoje).
//!
//! O flush acontece **uma vez**, ao final, e só se algo mudou de fato.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::core::{normalize_applicant, BRFiling, WOFiling, UNKNOWN_APPLICANT};
use crate::persistence::PersistenceError;
use crate::store::ApplicantBehaviorStore;

/// Formato canônico de número WO: `WO` + ano + 6 dígitos, `/` opcional.
static WO_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^WO\d{4}/?\d{6}$").expect("regex de número WO"));

/// Observações acumuladas de um depositante dentro de um lote.
#[derive(Default)]
struct Observations {
    wos: BTreeSet<String>,
    brs: BTreeSet<String>,
    areas: BTreeSet<String>,
}

/// Atualizador de aprendizado. Sem estado próprio; escreve no store.
pub struct LearningUpdater;

impl LearningUpdater {
    /// Aprende com um lote de busca e persiste o resultado.
    ///
    /// Retorna quantos depositantes tiveram o registro **de fato**
    /// alterado. Reprocessar o mesmo lote retorna 0 e não reescreve o
    /// arquivo (merge monotônico + flush condicional).
    pub fn learn(
        store: &ApplicantBehaviorStore,
        wos: &[WOFiling],
        brs: &[BRFiling],
    ) -> Result<usize, PersistenceError> {
        let mut por_depositante: HashMap<String, Observations> = HashMap::new();
        // vincula wo_number → depositante para atribuir os BRs
        let mut dono_do_wo: HashMap<&str, String> = HashMap::new();

        for wo in wos {
            if !wo.brazil_designated {
                continue;
            }
            if !WO_NUMBER_RE.is_match(&wo.wo_number) {
                tracing::debug!(wo = %wo.wo_number, "número WO fora do formato, ignorado");
                continue;
            }
            let nome = normalize_applicant(&wo.applicant);
            if nome == UNKNOWN_APPLICANT {
                continue;
            }
            let obs = por_depositante.entry(nome.clone()).or_default();
            obs.wos.insert(wo.wo_number.clone());
            if !wo.therapeutic_area.trim().is_empty() {
                obs.areas.insert(wo.therapeutic_area.trim().to_string());
            }
            dono_do_wo.insert(wo.wo_number.as_str(), nome);
        }

        let mut brs_sem_vinculo = 0usize;
        for br in brs {
            let Some(wo_ref) = br.wo_reference.as_deref() else {
                tracing::debug!(br = %br.patent_number, "BR sem referência WO, descartado");
                brs_sem_vinculo += 1;
                continue;
            };
            match dono_do_wo.get(wo_ref) {
                Some(nome) => {
                    // entry existe: dono_do_wo só aponta para quem tem WOs
                    if let Some(obs) = por_depositante.get_mut(nome) {
                        obs.brs.insert(wo_ref.to_string());
                    }
                }
                None => {
                    tracing::debug!(
                        br = %br.patent_number,
                        wo_ref,
                        "BR referencia WO fora do lote, descartado"
                    );
                    brs_sem_vinculo += 1;
                }
            }
        }

        let mut alterados = 0;
        for (nome, obs) in &por_depositante {
            if store.merge(nome, &obs.wos, &obs.brs, &obs.areas) {
                alterados += 1;
            }
        }

        if alterados > 0 {
            store.flush()?;
        }
        tracing::info!(
            depositantes = por_depositante.len(),
            alterados,
            brs_sem_vinculo,
            "aprendizado do lote concluído"
        );
        Ok(alterados)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_date_soft;

    fn wo(number: &str, applicant: &str, designated: bool) -> WOFiling {
        WOFiling {
            wo_number: number.to_string(),
            priority_date: parse_date_soft("2023-01-01"),
            publication_date: None,
            applicant: applicant.to_string(),
            ipc_codes: vec![],
            therapeutic_area: "Oncology".to_string(),
            inventors: vec![],
            family_size: 1,
            brazil_designated: designated,
        }
    }

    fn br(patent: &str, wo_ref: Option<&str>) -> BRFiling {
        BRFiling {
            patent_number: patent.to_string(),
            wo_reference: wo_ref.map(str::to_string),
            applicant: "Teste SA".to_string(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> ApplicantBehaviorStore {
        ApplicantBehaviorStore::open(dir.path().join("kb.json"))
    }

    #[test]
    fn learns_rate_from_linked_brs() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let wos = vec![
            wo("WO2023/000001", "Bayer AG", true),
            wo("WO2023/000002", "Bayer AG", true),
            wo("WO2023/000003", "Bayer AG", true),
            wo("WO2023/000004", "Bayer AG", true),
        ];
        let brs = vec![
            br("BR112023000001", Some("WO2023/000001")),
            br("BR112023000002", Some("WO2023/000002")),
            br("BR112023000003", Some("WO2023/000003")),
        ];

        let alterados = LearningUpdater::learn(&store, &wos, &brs).unwrap();
        assert_eq!(alterados, 1);

        let bayer = store.lookup("Bayer AG");
        assert_eq!(bayer.total_wo_observed(), 4);
        assert_eq!(bayer.total_br_observed(), 3);
        assert!((bayer.filing_rate() - 0.75).abs() < 1e-9);
        assert!(bayer.therapeutic_areas.contains("Oncology"));
    }

    /// Reprocessar o mesmo lote não muda nada (merge monotônico).
    #[test]
    fn relearning_same_batch_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let wos = vec![wo("WO2023/000001", "Bayer AG", true)];
        assert_eq!(LearningUpdater::learn(&store, &wos, &[]).unwrap(), 1);
        assert_eq!(LearningUpdater::learn(&store, &wos, &[]).unwrap(), 0);

        let bayer = store.lookup("Bayer AG");
        assert_eq!(bayer.total_wo_observed(), 1);
    }

    #[test]
    fn unlinked_brs_are_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let wos = vec![wo("WO2023/000001", "Bayer AG", true)];
        let brs = vec![
            br("BR112023000009", None),
            br("BR112023000010", Some("WO2019/999999")), // fora do lote
        ];
        LearningUpdater::learn(&store, &wos, &brs).unwrap();

        let bayer = store.lookup("Bayer AG");
        assert_eq!(bayer.total_br_observed(), 0);
    }

    #[test]
    fn non_designated_and_malformed_wos_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let wos = vec![
            wo("WO2023/000001", "Bayer AG", false), // não designa BR
            wo("PCT/US23/12345", "Bayer AG", true), // formato inválido
        ];
        assert_eq!(LearningUpdater::learn(&store, &wos, &[]).unwrap(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn wo_number_format_accepts_both_variants() {
        assert!(WO_NUMBER_RE.is_match("WO2023/123456"));
        assert!(WO_NUMBER_RE.is_match("WO2023123456"));
        assert!(!WO_NUMBER_RE.is_match("WO23/123456"));
        assert!(!WO_NUMBER_RE.is_match("WO2023/12345"));
    }

    #[test]
    fn applicants_accumulate_separately() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let wos = vec![
            wo("WO2023/000001", "Bayer AG", true),
            wo("WO2023/000002", "Novartis AG", true),
        ];
        let brs = vec![br("BR112023000001", Some("WO2023/000002"))];
        assert_eq!(LearningUpdater::learn(&store, &wos, &brs).unwrap(), 2);

        assert_eq!(store.lookup("Bayer AG").total_br_observed(), 0);
        assert_eq!(store.lookup("Novartis AG").total_br_observed(), 1);
    }
}
