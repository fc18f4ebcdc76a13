//! # ApplicantBehaviorStore — A Memória de Longo Prazo do Motor
//!
//! Dono único do mapa `nome normalizado → ApplicantBehavior`. Todo o resto
//! do motor só lê; toda mutação passa pelos métodos deste store.
//!
//! ## Concorrência
//!
//! O mapa vive atrás de um `parking_lot::RwLock` — o pipeline de inferência
//! lê em paralelo (rayon) enquanto o aprendizado, que roda antes, escreve
//! serializado. Locks são de curtíssima duração; nenhum método segura o
//! lock através de E/S de disco (o `flush` clona sob read lock).
//!
//! ## Lookup em Três Estágios
//!
//! 1. **Exato** pelo nome normalizado;
//! 2. **Fuzzy**: containment case-insensitive em qualquer direção
//!    (`"Bayer"` acha `"Bayer AG"`; `"Bayer AG [DE]"` normalizado acha
//!    `"Bayer AG"`). Empates resolvidos pelo nome mais longo, depois
//!    lexicográfico, para que o resultado seja determinístico;
//! 3. **Sintético**: registro [`ApplicantBehavior::unknown`] com taxa
//!    neutra 0.5 — lookups nunca falham e o sintético nunca é persistido.
//!
//! ## Merge Monotônico
//!
//! [`merge`](ApplicantBehaviorStore::merge) só faz **união de conjuntos**:
//! reprocessar a mesma busca dez vezes produz o mesmo registro que
//! processá-la uma vez. O retorno indica se algo mudou de fato, para que o
//! chamador decida se vale um `flush`.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::core::{normalize_applicant, ApplicantBehavior, UNKNOWN_APPLICANT};
use crate::persistence::{self, PersistenceError};

/// Priors sintéticos de grandes depositantes farmacêuticos.
///
/// `(nome, total_wo, total_br, áreas)` — convertidos em conjuntos de ids
/// placeholder `seed:<nome>:<n>` para caber no modelo de união de
/// conjuntos. Usados apenas para preencher lacunas: um registro aprendido
/// de verdade nunca é sobrescrito por um seed.
const SEED_APPLICANTS: &[(&str, usize, usize, &[&str])] = &[
    ("Pfizer Inc", 45, 40, &["Oncology", "Vaccines"]),
    ("Novartis AG", 42, 38, &["Oncology", "CNS"]),
    ("F. Hoffmann-La Roche AG", 38, 34, &["Oncology"]),
    ("Bayer AG", 42, 39, &["Oncology", "Cardiology"]),
    ("Merck Sharp & Dohme", 36, 30, &["Oncology", "Vaccines"]),
    ("AstraZeneca AB", 34, 29, &["Oncology", "Diabetes"]),
    ("GlaxoSmithKline", 32, 27, &["Vaccines", "HIV/AIDS"]),
    ("Sanofi", 35, 30, &["Diabetes", "Vaccines"]),
    ("Johnson & Johnson", 30, 25, &["Oncology", "CNS"]),
    ("Boehringer Ingelheim", 28, 23, &["Diabetes", "Cardiology"]),
    ("Gilead Sciences Inc", 25, 19, &["HIV/AIDS"]),
    ("Eurofarma SA", 18, 16, &["Oncology"]),
    ("Aché Laboratórios", 12, 11, &["CNS"]),
];

/// Store thread-safe de comportamento de depositantes, com persistência.
pub struct ApplicantBehaviorStore {
    path: PathBuf,
    behaviors: RwLock<HashMap<String, ApplicantBehavior>>,
}

impl ApplicantBehaviorStore {
    /// Abre o store carregando a base do caminho dado (fail-soft).
    pub fn open(path: PathBuf) -> Self {
        let behaviors = persistence::load_behaviors(&path);
        Self {
            path,
            behaviors: RwLock::new(behaviors),
        }
    }

    /// Abre o store no caminho padrão (ou no da env var `PREVISOR_DB`).
    pub fn open_default() -> Self {
        Self::open(persistence::resolve_db_path())
    }

    /// Número de depositantes conhecidos.
    pub fn len(&self) -> usize {
        self.behaviors.read().len()
    }

    /// O store está vazio?
    pub fn is_empty(&self) -> bool {
        self.behaviors.read().is_empty()
    }

    /// Busca o comportamento de um depositante pelo nome **bruto**.
    ///
    /// Normaliza, tenta os três estágios (exato, fuzzy, sintético) e
    /// devolve uma cópia — o chamador nunca segura o lock.
    pub fn lookup(&self, raw_name: &str) -> ApplicantBehavior {
        let name = normalize_applicant(raw_name);
        let behaviors = self.behaviors.read();

        if let Some(exact) = behaviors.get(&name) {
            return exact.clone();
        }

        // Fuzzy: containment case-insensitive nas duas direções.
        let query = name.to_lowercase();
        let fuzzy = behaviors
            .values()
            .filter(|b| {
                let known = b.applicant_name.to_lowercase();
                known.contains(&query) || query.contains(&known)
            })
            .max_by(|a, b| {
                a.applicant_name
                    .len()
                    .cmp(&b.applicant_name.len())
                    .then_with(|| a.applicant_name.cmp(&b.applicant_name))
            });

        if let Some(hit) = fuzzy {
            tracing::debug!(consulta = %name, encontrado = %hit.applicant_name, "lookup fuzzy");
            return hit.clone();
        }

        ApplicantBehavior::unknown(&name)
    }

    /// Funde novas observações no registro de um depositante.
    ///
    /// União de conjuntos, monotônica e idempotente. Retorna `true` sse o
    /// registro mudou de fato (merges no-op não tocam `last_updated`).
    /// O sentinela de depositante desconhecido é descartado.
    pub fn merge(
        &self,
        raw_name: &str,
        wos: &BTreeSet<String>,
        brs: &BTreeSet<String>,
        areas: &BTreeSet<String>,
    ) -> bool {
        let name = normalize_applicant(raw_name);
        if name == UNKNOWN_APPLICANT {
            tracing::debug!("observações sem depositante identificável descartadas");
            return false;
        }

        let mut behaviors = self.behaviors.write();
        match behaviors.get_mut(&name) {
            Some(existing) => {
                let mut changed = false;
                for wo in wos {
                    changed |= existing.observed_wos.insert(wo.clone());
                }
                for br in brs {
                    changed |= existing.observed_brs.insert(br.clone());
                }
                for area in areas {
                    changed |= existing.therapeutic_areas.insert(area.clone());
                }
                if changed {
                    existing.last_updated = chrono::Utc::now();
                }
                changed
            }
            None => {
                behaviors.insert(
                    name.clone(),
                    ApplicantBehavior::new(&name, wos.clone(), brs.clone(), areas.clone()),
                );
                tracing::debug!(depositante = %name, "novo depositante registrado");
                true
            }
        }
    }

    /// Semeia os priors sintéticos, **preenchendo lacunas apenas**.
    ///
    /// Retorna quantos depositantes foram semeados. Registros já aprendidos
    /// nunca são tocados.
    pub fn seed(&self) -> usize {
        let mut behaviors = self.behaviors.write();
        let mut inseridos = 0;
        for (name, total_wo, total_br, areas) in SEED_APPLICANTS {
            if behaviors.contains_key(*name) {
                continue;
            }
            let wos: BTreeSet<String> =
                (0..*total_wo).map(|i| format!("seed:{name}:{i}")).collect();
            let brs: BTreeSet<String> =
                (0..*total_br).map(|i| format!("seed:{name}:{i}")).collect();
            let areas: BTreeSet<String> = areas.iter().map(|a| a.to_string()).collect();
            behaviors.insert(
                name.to_string(),
                ApplicantBehavior::new(name, wos, brs, areas),
            );
            inseridos += 1;
        }
        if inseridos > 0 {
            tracing::info!(semeados = inseridos, "priors sintéticos de depositantes");
        }
        inseridos
    }

    /// Persiste o estado atual em disco (write-rename atômico).
    pub fn flush(&self) -> Result<(), PersistenceError> {
        let snapshot = self.behaviors.read().clone();
        persistence::save_behaviors(&self.path, &snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn store_in(dir: &tempfile::TempDir) -> ApplicantBehaviorStore {
        ApplicantBehaviorStore::open(dir.path().join("kb.json"))
    }

    // ─── merge ─────────────────────────────────────────────────

    #[test]
    fn merge_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let wos = set(&["WO2024/000001", "WO2024/000002"]);
        let brs = set(&["WO2024/000001"]);
        assert!(store.merge("Bayer AG", &wos, &brs, &set(&["Oncology"])));
        // reprocessar as mesmas observações não muda nada
        assert!(!store.merge("Bayer AG", &wos, &brs, &set(&["Oncology"])));

        let b = store.lookup("Bayer AG");
        assert_eq!(b.total_wo_observed(), 2);
        assert_eq!(b.total_br_observed(), 1);
    }

    #[test]
    fn merge_only_grows_sets() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.merge("Pfizer Inc", &set(&["WO1", "WO2"]), &set(&[]), &set(&[]));
        // segunda busca observa um subconjunto mais um novo
        store.merge("Pfizer Inc", &set(&["WO2", "WO3"]), &set(&["WO2"]), &set(&[]));

        let b = store.lookup("Pfizer Inc");
        assert_eq!(b.total_wo_observed(), 3);
        assert_eq!(b.total_br_observed(), 1);
    }

    #[test]
    fn unknown_sentinel_is_never_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.merge("", &set(&["WO1"]), &set(&[]), &set(&[])));
        assert!(store.is_empty());
    }

    // ─── lookup ────────────────────────────────────────────────

    #[test]
    fn lookup_normalizes_before_matching() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.merge("Bayer AG", &set(&["WO1"]), &set(&["WO1"]), &set(&[]));

        // variantes brutas do mesmo nome acertam o mesmo registro
        let b = store.lookup("Bayer AG [DE]; Orion Corporation");
        assert_eq!(b.applicant_name, "Bayer AG");
        assert_eq!(b.total_wo_observed(), 1);
    }

    #[test]
    fn lookup_falls_back_to_fuzzy_containment() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.merge("Gilead Sciences Inc", &set(&["WO1"]), &set(&[]), &set(&[]));

        let b = store.lookup("Gilead Sciences");
        assert_eq!(b.applicant_name, "Gilead Sciences Inc");
    }

    #[test]
    fn lookup_unknown_yields_neutral_synthetic() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let b = store.lookup("Nunca Visto Ltda");
        assert!((b.filing_rate() - 0.5).abs() < 1e-9);
        // sintético não entrou no store
        assert!(store.is_empty());
    }

    // ─── seed ──────────────────────────────────────────────────

    #[test]
    fn seed_fills_gaps_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        // registro aprendido antes do seed não é sobrescrito
        store.merge("Bayer AG", &set(&["WO-real"]), &set(&[]), &set(&[]));
        let semeados = store.seed();
        assert_eq!(semeados, SEED_APPLICANTS.len() - 1);

        let bayer = store.lookup("Bayer AG");
        assert_eq!(bayer.total_wo_observed(), 1);

        // seed é idempotente
        assert_eq!(store.seed(), 0);
    }

    #[test]
    fn seeded_bayer_is_highly_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.seed();
        let bayer = store.lookup("Bayer AG");
        assert!((bayer.filing_rate() - 39.0 / 42.0).abs() < 1e-9);
        assert!((bayer.confidence_multiplier() - 1.2).abs() < 1e-9);
    }

    // ─── persistência ──────────────────────────────────────────

    #[test]
    fn flush_then_reopen_preserves_learning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.json");

        let store = ApplicantBehaviorStore::open(path.clone());
        store.merge(
            "Novartis AG",
            &set(&["WO1", "WO2"]),
            &set(&["WO1"]),
            &set(&["CNS"]),
        );
        store.flush().unwrap();

        let reaberto = ApplicantBehaviorStore::open(path);
        let b = reaberto.lookup("Novartis AG");
        assert_eq!(b.total_wo_observed(), 2);
        assert_eq!(b.total_br_observed(), 1);
        assert!(b.therapeutic_areas.contains("CNS"));
    }
}
