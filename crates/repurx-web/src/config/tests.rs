use super::*;
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn test_default_server_settings() {
    let config = Config::default();
    assert_eq!(config.server.bind, "127.0.0.1:8000");
    assert_eq!(config.server.default_k, 10);
    assert_eq!(config.server.max_k, 50);
    assert_eq!(config.data.dir, PathBuf::from("data"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config: Config = toml::from_str(
        r#"
        [server]
        max_k = 20

        [engine]
        graph_weight = 0.7
        text_weight = 0.3
        "#,
    )
    .unwrap();
    assert_eq!(config.server.max_k, 20);
    assert_eq!(config.server.default_k, default_k());
    assert_eq!(config.engine.graph_weight, 0.7);
    assert_eq!(config.engine.max_path_length, 3);
    assert_eq!(config.data, DataConfig::default());
}

#[test]
fn test_default_k_above_max_rejected() {
    let mut config = Config::default();
    config.server.default_k = 60;
    assert!(config.validate().is_err());
}

#[test]
fn test_yaml_file_accepted() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "server:\n  bind: 0.0.0.0:9000\ndata:\n  dir: /srv/repurx").unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.server.bind, "0.0.0.0:9000");
    assert_eq!(config.data.dir, PathBuf::from("/srv/repurx"));
}

#[test]
fn test_invalid_engine_section_rejected() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[engine]\nmax_paths = 0").unwrap();
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_example_file_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../repurx.example.toml");
    let config = Config::from_file(path).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_embedder_table() {
    let config: Config = toml::from_str(
        r#"
        [embedder]
        kind = "bert"

        [embedder.bert]
        model_id = "NeuML/pubmedbert-base-embeddings"
        pooling = "cls"
        "#,
    )
    .unwrap();
    assert_eq!(config.embedder.kind, repurx_embed::EmbedderKind::Bert);
    assert_eq!(config.embedder.bert.model_id, "NeuML/pubmedbert-base-embeddings");
    assert_eq!(config.embedder.bert.pooling, repurx_embed::PoolingStrategy::Cls);
    assert_eq!(config.embedder.bert.batch_size, 32);
    assert_eq!(config.server, ServerConfig::default());
}
