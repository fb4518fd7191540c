//! The shipped `data/` directory loads and matches the shared fixtures.

use std::path::PathBuf;

use repurx_ingestion::SeedLoader;
use repurx_test_utils::pretty_assertions::assert_eq;
use repurx_test_utils::{seed_diseases, seed_drug_disease, seed_drug_gene, seed_drugs};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

#[test]
fn shipped_seed_matches_fixtures() {
    let store = SeedLoader::new(data_dir()).load().expect("shipped seed data loads");
    assert_eq!(store.drugs(), seed_drugs().as_slice());
    assert_eq!(store.diseases(), seed_diseases().as_slice());
    assert_eq!(store.drug_disease(), seed_drug_disease().as_slice());
    assert_eq!(store.drug_gene(), seed_drug_gene().as_slice());
    assert_eq!(store.genes().len(), 13);
}

#[test]
fn missing_directory_reports_first_file() {
    let err = SeedLoader::new(data_dir().join("does-not-exist")).load().unwrap_err();
    assert!(err.to_string().contains("seed_drugs.csv"), "{err}");
}
