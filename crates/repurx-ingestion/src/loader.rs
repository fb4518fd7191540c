//! Seed CSV loader.
//!
//! Expects four files in the data directory:
//!
//! | file | columns |
//! |---|---|
//! | `seed_drugs.csv` | `drug_id,drug_name,atc,indications_text` |
//! | `seed_diseases.csv` | `disease_id,disease_name,synonyms` (`;`-separated) |
//! | `seed_drug_disease.csv` | `drug_id,disease_id,evidence` |
//! | `seed_drug_gene.csv` | `drug_id,gene_symbol,note` |

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use repurx_common::{
    Disease, Drug, DrugDiseaseRelation, DrugGeneRelation, EntityStore, RepurxError,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::{IngestError, Result};

pub const DRUGS_FILE: &str = "seed_drugs.csv";
pub const DISEASES_FILE: &str = "seed_diseases.csv";
pub const DRUG_DISEASE_FILE: &str = "seed_drug_disease.csv";
pub const DRUG_GENE_FILE: &str = "seed_drug_gene.csv";

// Required columns default to "" so an absent column surfaces as MissingField.

#[derive(Debug, Deserialize)]
struct DrugRow {
    #[serde(default)]
    drug_id: String,
    #[serde(default)]
    drug_name: String,
    #[serde(default)]
    atc: Option<String>,
    #[serde(default)]
    indications_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiseaseRow {
    #[serde(default)]
    disease_id: String,
    #[serde(default)]
    disease_name: String,
    #[serde(default)]
    synonyms: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DrugDiseaseRow {
    #[serde(default)]
    drug_id: String,
    #[serde(default)]
    disease_id: String,
    #[serde(default)]
    evidence: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DrugGeneRow {
    #[serde(default)]
    drug_id: String,
    #[serde(default)]
    gene_symbol: String,
    #[serde(default)]
    note: Option<String>,
}

/// Reads and validates the seed CSV files under one directory.
#[derive(Debug, Clone)]
pub struct SeedLoader {
    data_dir: PathBuf,
}

impl SeedLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load all four files and assemble an [`EntityStore`].
    ///
    /// Relations that reference an unknown drug or disease are rejected here
    /// as [`IngestError::Integrity`], before any graph is built.
    #[instrument(skip(self), fields(data_dir = %self.data_dir.display()))]
    pub fn load(&self) -> Result<EntityStore> {
        let drugs = self.load_drugs()?;
        let diseases = self.load_diseases()?;
        let drug_disease = self.load_drug_disease()?;
        let drug_gene = self.load_drug_gene()?;

        let drug_ids: HashSet<&str> = drugs.iter().map(|d| d.drug_id.as_str()).collect();
        let disease_ids: HashSet<&str> = diseases.iter().map(|d| d.disease_id.as_str()).collect();
        for rel in &drug_disease {
            check_reference("drug_disease", "drug", &drug_ids, &rel.drug_id)?;
            check_reference("drug_disease", "disease", &disease_ids, &rel.disease_id)?;
        }
        for rel in &drug_gene {
            check_reference("drug_gene", "drug", &drug_ids, &rel.drug_id)?;
        }

        let store = EntityStore::new(drugs, diseases, drug_disease, drug_gene)?;
        info!(
            drugs = store.drugs().len(),
            diseases = store.diseases().len(),
            genes = store.genes().len(),
            drug_disease = store.drug_disease().len(),
            drug_gene = store.drug_gene().len(),
            "Seed data loaded"
        );
        Ok(store)
    }

    pub fn load_drugs(&self) -> Result<Vec<Drug>> {
        let mut seen = HashSet::new();
        read_rows(&self.path(DRUGS_FILE), |line, row: DrugRow| {
            let drug_id = required(DRUGS_FILE, line, "drug_id", row.drug_id)?;
            let name = required(DRUGS_FILE, line, "drug_name", row.drug_name)?;
            if !seen.insert(drug_id.clone()) {
                return Err(IngestError::DuplicateId { file: DRUGS_FILE.to_string(), id: drug_id });
            }
            Ok(Drug {
                drug_id,
                name,
                atc_code: optional(row.atc),
                indications_text: optional(row.indications_text).unwrap_or_default(),
            })
        })
    }

    pub fn load_diseases(&self) -> Result<Vec<Disease>> {
        let mut seen = HashSet::new();
        read_rows(&self.path(DISEASES_FILE), |line, row: DiseaseRow| {
            let disease_id = required(DISEASES_FILE, line, "disease_id", row.disease_id)?;
            let name = required(DISEASES_FILE, line, "disease_name", row.disease_name)?;
            if !seen.insert(disease_id.clone()) {
                return Err(IngestError::DuplicateId { file: DISEASES_FILE.to_string(), id: disease_id });
            }
            Ok(Disease {
                disease_id,
                name,
                synonyms: split_synonyms(row.synonyms.as_deref().unwrap_or("")),
            })
        })
    }

    pub fn load_drug_disease(&self) -> Result<Vec<DrugDiseaseRelation>> {
        read_rows(&self.path(DRUG_DISEASE_FILE), |line, row: DrugDiseaseRow| {
            Ok(DrugDiseaseRelation {
                drug_id: required(DRUG_DISEASE_FILE, line, "drug_id", row.drug_id)?,
                disease_id: required(DRUG_DISEASE_FILE, line, "disease_id", row.disease_id)?,
                evidence: optional(row.evidence),
            })
        })
    }

    pub fn load_drug_gene(&self) -> Result<Vec<DrugGeneRelation>> {
        read_rows(&self.path(DRUG_GENE_FILE), |line, row: DrugGeneRow| {
            Ok(DrugGeneRelation {
                drug_id: required(DRUG_GENE_FILE, line, "drug_id", row.drug_id)?,
                gene_symbol: required(DRUG_GENE_FILE, line, "gene_symbol", row.gene_symbol)?
                    .to_uppercase(),
                note: optional(row.note),
            })
        })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}

/// Deserialize every record of a headed CSV file and map it through `f`,
/// which receives the 1-based line number of the record.
fn read_rows<R, T, F>(path: &Path, mut f: F) -> Result<Vec<T>>
where
    R: DeserializeOwned,
    F: FnMut(u64, R) -> Result<T>,
{
    if !path.is_file() {
        return Err(IngestError::MissingFile(path.to_path_buf()));
    }
    debug!("Reading {:?}", path);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut out = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 2);
        let row: R = record.deserialize(Some(&headers))?;
        out.push(f(line, row)?);
    }
    debug!("Read {} rows from {:?}", out.len(), path);
    Ok(out)
}

fn required(file: &str, line: u64, field: &'static str, value: String) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(IngestError::MissingField { file: file.to_string(), line, field });
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_synonyms(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_reference(
    relation: &'static str,
    kind: &'static str,
    known: &HashSet<&str>,
    id: &str,
) -> Result<()> {
    if known.contains(id) {
        Ok(())
    } else {
        Err(RepurxError::DataIntegrity { relation, kind, id: id.to_string() }.into())
    }
}
