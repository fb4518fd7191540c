//! Shared fixtures for repurx tests.
//!
//! [`seed_store`] mirrors the CSV files shipped under `data/`, so unit tests
//! in the graph, index and ranker crates see the same universe as the loader
//! and HTTP tests.

use repurx_common::{Disease, Drug, DrugDiseaseRelation, DrugGeneRelation, EntityStore};

pub use pretty_assertions;

pub fn drug(id: &str, name: &str, atc: Option<&str>, indications: &str) -> Drug {
    Drug {
        drug_id: id.to_string(),
        name: name.to_string(),
        atc_code: atc.map(str::to_string),
        indications_text: indications.to_string(),
    }
}

pub fn disease(id: &str, name: &str, synonyms: &[&str]) -> Disease {
    Disease {
        disease_id: id.to_string(),
        name: name.to_string(),
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn treats(drug_id: &str, disease_id: &str, evidence: &str) -> DrugDiseaseRelation {
    DrugDiseaseRelation {
        drug_id: drug_id.to_string(),
        disease_id: disease_id.to_string(),
        evidence: Some(evidence.to_string()),
    }
}

pub fn targets(drug_id: &str, gene: &str, note: &str) -> DrugGeneRelation {
    DrugGeneRelation {
        drug_id: drug_id.to_string(),
        gene_symbol: gene.to_string(),
        note: Some(note.to_string()),
    }
}

pub fn seed_drugs() -> Vec<Drug> {
    vec![
        drug("D001", "metformin", Some("A10BA02"),
             "type 2 diabetes mellitus, insulin resistance, polycystic ovary syndrome"),
        drug("D002", "aspirin", Some("B01AC06"),
             "pain, fever, inflammation, secondary prevention of myocardial infarction and stroke"),
        drug("D003", "levodopa", Some("N04BA01"),
             "parkinson's disease, dopamine replacement for motor symptoms"),
        drug("D004", "pramipexole", Some("N04BC05"),
             "parkinson's disease, restless legs syndrome"),
        drug("D005", "rasagiline", Some("N04BD02"),
             "early and advanced parkinson's disease as monotherapy or adjunct"),
        drug("D006", "donepezil", Some("N06DA02"),
             "mild to severe alzheimer's dementia, cognitive impairment"),
        drug("D007", "resveratrol", None,
             "investigational neuroprotection, mitochondrial dysfunction, neurodegeneration"),
        drug("D008", "simvastatin", Some("C10AA01"),
             "hypercholesterolemia, cardiovascular risk reduction after myocardial infarction"),
        drug("D009", "pioglitazone", Some("A10BG03"),
             "type 2 diabetes, insulin sensitizer"),
        drug("D010", "sildenafil", Some("G04BE03"),
             "erectile dysfunction, pulmonary arterial hypertension"),
    ]
}

pub fn seed_diseases() -> Vec<Disease> {
    vec![
        disease("DI001", "parkinson's disease", &[
            "pd", "paralysis agitans", "idiopathic parkinsonism",
            "diabetes-associated neurodegeneration", "neuronal insulin resistance",
        ]),
        disease("DI002", "type 2 diabetes", &[
            "t2d", "adult-onset diabetes", "non-insulin-dependent diabetes mellitus",
        ]),
        disease("DI003", "alzheimer's disease", &["ad", "senile dementia", "alzheimer dementia"]),
        disease("DI004", "myocardial infarction", &["heart attack", "acute coronary syndrome"]),
        disease("DI005", "pulmonary arterial hypertension", &["pah"]),
        disease("DI006", "polycystic ovary syndrome", &["pcos", "stein-leventhal syndrome"]),
        disease("DI007", "huntington's disease", &["huntington chorea"]),
    ]
}

pub fn seed_drug_disease() -> Vec<DrugDiseaseRelation> {
    vec![
        treats("D001", "DI002", "approved"),
        treats("D001", "DI006", "off-label"),
        treats("D002", "DI004", "approved"),
        treats("D003", "DI001", "approved"),
        treats("D004", "DI001", "approved"),
        treats("D005", "DI001", "approved"),
        treats("D006", "DI003", "approved"),
        treats("D007", "DI001", "phase 2 trial"),
        treats("D007", "DI003", "preclinical"),
        treats("D008", "DI004", "approved"),
        treats("D009", "DI002", "approved"),
        treats("D010", "DI005", "approved"),
    ]
}

pub fn seed_drug_gene() -> Vec<DrugGeneRelation> {
    vec![
        targets("D001", "AMPK", "activator"),
        targets("D001", "SLC22A1", "uptake transporter"),
        targets("D002", "PTGS1", "irreversible inhibitor"),
        targets("D002", "PTGS2", "irreversible inhibitor"),
        targets("D003", "DDC", "substrate"),
        targets("D004", "DRD2", "agonist"),
        targets("D004", "DRD3", "agonist"),
        targets("D005", "MAOB", "irreversible inhibitor"),
        targets("D006", "ACHE", "inhibitor"),
        targets("D007", "AMPK", "activator"),
        targets("D007", "SIRT1", "activator"),
        targets("D008", "HMGCR", "inhibitor"),
        targets("D009", "PPARG", "agonist"),
        targets("D010", "PDE5A", "inhibitor"),
    ]
}

/// The full seed universe: 10 drugs, 7 diseases, 13 genes.
pub fn seed_store() -> EntityStore {
    EntityStore::new(seed_drugs(), seed_diseases(), seed_drug_disease(), seed_drug_gene())
        .expect("seed fixture has unique ids")
}

/// Two drugs, two diseases, one gene. Useful when exact scores matter.
pub fn tiny_store() -> EntityStore {
    EntityStore::new(
        vec![
            drug("A", "alpha", None, "tremor rigidity"),
            drug("B", "beta", None, ""),
        ],
        vec![
            disease("X", "tremor syndrome", &["rigidity"]),
            disease("Y", "unrelated condition", &[]),
        ],
        vec![treats("B", "X", "approved")],
        vec![targets("A", "G1", "agonist"), targets("B", "G1", "antagonist")],
    )
    .expect("tiny fixture has unique ids")
}
