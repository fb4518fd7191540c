//! BERT sentence embedder using Candle.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, HiddenAct, PositionEmbeddingType};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use repurx_common::Result;
use tokenizers::models::wordpiece::WordPieceBuilder;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::config::BertConfig;
use crate::embedder::TextEmbedder;
use crate::error::EmbedError;
use crate::pooling::normalize_rows;

/// Sentence embeddings from a BERT checkpoint on the Hugging Face Hub.
pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
    config: BertConfig,
}

impl BertEmbedder {
    /// Download (or reuse from the local hub cache) and load the model.
    /// Blocking; call from a worker thread inside async code.
    pub fn load(config: BertConfig) -> std::result::Result<Self, EmbedError> {
        let start = Instant::now();
        info!("Loading BERT model: {}", config.model_id);

        let device = select_device(config.use_gpu);
        debug!("Using device: {:?}", device);

        let api = Api::new()?;
        let repo = api.repo(Repo::new(config.model_id.clone(), RepoType::Model));

        let config_path = repo.get("config.json")?;
        let bert_config = read_bert_config(&config_path)?;

        let tokenizer = match repo.get("tokenizer.json") {
            Ok(path) => Tokenizer::from_file(&path)?,
            Err(_) => {
                debug!("tokenizer.json not found, building WordPiece from vocab.txt");
                wordpiece_from_vocab(&repo.get("vocab.txt")?)?
            }
        };

        let weights = repo
            .get("model.safetensors")
            .or_else(|_| repo.get("pytorch_model.bin"))?;
        let vb = if weights.extension().is_some_and(|e| e == "safetensors") {
            // SAFETY: the hub cache file is not modified while mapped
            unsafe { VarBuilder::from_mmaped_safetensors(&[&weights], DType::F32, &device)? }
        } else {
            VarBuilder::from_pth(&weights, DType::F32, &device)?
        };
        let model = BertModel::load(vb, &bert_config)
            .map_err(|e| EmbedError::ModelLoad(e.to_string()))?;

        info!("Model loaded in {:.2}s", start.elapsed().as_secs_f32());
        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size: bert_config.hidden_size,
            config,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.config.model_id
    }

    fn forward(&self, texts: &[&str]) -> std::result::Result<Vec<Vec<f32>>, EmbedError> {
        let encodings = self.tokenizer.encode_batch(texts.to_vec(), true)?;
        let cap = self.config.max_length.min(512);

        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len().min(cap))
            .max()
            .unwrap_or(0)
            .max(1);

        let mut ids = Vec::with_capacity(texts.len() * seq_len);
        let mut mask = Vec::with_capacity(texts.len() * seq_len);
        let mut types = Vec::with_capacity(texts.len() * seq_len);
        for encoding in &encodings {
            let len = encoding.get_ids().len().min(cap);
            ids.extend_from_slice(&encoding.get_ids()[..len]);
            mask.extend(encoding.get_attention_mask()[..len].iter().map(|&m| m as f32));
            types.extend_from_slice(&encoding.get_type_ids()[..len]);
            let pad = seq_len - len;
            ids.extend(std::iter::repeat(0u32).take(pad));
            mask.extend(std::iter::repeat(0f32).take(pad));
            types.extend(std::iter::repeat(0u32).take(pad));
        }

        let shape = (texts.len(), seq_len);
        let input_ids = Tensor::from_vec(ids, shape, &self.device)?;
        let attention = Tensor::from_vec(mask, shape, &self.device)?;
        let token_types = Tensor::from_vec(types, shape, &self.device)?;

        let states = self.model.forward(&input_ids, &token_types, Some(&attention))?;
        let mut pooled = self.config.pooling.pool(&states, &attention)?;
        if self.config.normalize {
            pooled = normalize_rows(&pooled)?;
        }
        Ok(pooled.to_vec2::<f32>()?)
    }
}

impl TextEmbedder for BertEmbedder {
    fn dimension(&self) -> usize {
        self.hidden_size
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut rows = self.forward(&[text])?;
        rows.pop()
            .ok_or_else(|| EmbedError::Inference("model returned no rows".to_string()).into())
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.config.batch_size.max(1)) {
            out.extend(self.forward(chunk)?);
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "bert"
    }
}

fn select_device(use_gpu: bool) -> Device {
    if !use_gpu {
        return Device::Cpu;
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => return device,
        Err(e) => debug!("CUDA not available: {}, falling back to CPU", e),
    }

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => return device,
        Err(e) => debug!("Metal not available: {}, falling back to CPU", e),
    }

    Device::Cpu
}

/// Parse a Hugging Face `config.json`, filling the usual BERT-base values for
/// any missing field.
fn read_bert_config(path: &Path) -> std::result::Result<Config, EmbedError> {
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let int = |key: &str, default: u64| json.get(key).and_then(|v| v.as_u64()).unwrap_or(default) as usize;
    let float = |key: &str, default: f64| json.get(key).and_then(|v| v.as_f64()).unwrap_or(default);

    let hidden_act = match json.get("hidden_act").and_then(|v| v.as_str()) {
        Some("relu") => HiddenAct::Relu,
        Some("gelu_new") | Some("gelu_approximate") => HiddenAct::GeluApproximate,
        _ => HiddenAct::Gelu,
    };

    Ok(Config {
        vocab_size: int("vocab_size", 30522),
        hidden_size: int("hidden_size", 768),
        num_hidden_layers: int("num_hidden_layers", 12),
        num_attention_heads: int("num_attention_heads", 12),
        intermediate_size: int("intermediate_size", 3072),
        hidden_act,
        hidden_dropout_prob: float("hidden_dropout_prob", 0.1),
        max_position_embeddings: int("max_position_embeddings", 512),
        type_vocab_size: int("type_vocab_size", 2),
        initializer_range: float("initializer_range", 0.02),
        layer_norm_eps: float("layer_norm_eps", 1e-12),
        pad_token_id: int("pad_token_id", 0),
        position_embedding_type: PositionEmbeddingType::Absolute,
        use_cache: true,
        classifier_dropout: None,
        model_type: None,
    })
}

/// Older checkpoints ship only `vocab.txt`.
fn wordpiece_from_vocab(path: &Path) -> std::result::Result<Tokenizer, EmbedError> {
    let vocab: HashMap<String, u32> = std::fs::read_to_string(path)?
        .lines()
        .enumerate()
        .map(|(i, token)| (token.to_string(), i as u32))
        .collect();
    let wordpiece = WordPieceBuilder::new()
        .vocab(vocab)
        .continuing_subword_prefix("##".to_string())
        .max_input_chars_per_word(100)
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| EmbedError::Tokenizer(format!("WordPiece build: {e}")))?;
    Ok(Tokenizer::new(wordpiece))
}
