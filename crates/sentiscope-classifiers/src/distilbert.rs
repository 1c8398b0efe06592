//! DistilBERT sequence classification with Candle
//!
//! Loads a fine-tuned DistilBERT checkpoint from the Hugging Face Hub (or a
//! local directory laid out the same way) and runs it on CPU, CUDA or Metal.
//! The classification head is `pre_classifier -> ReLU -> classifier`, as in
//! `DistilBertForSequenceClassification`.

use crate::classifier::{rank, Classifier};
use crate::config::ClassifierConfig;
use async_trait::async_trait;
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use hf_hub::{api::sync::Api, Repo, RepoType};
use sentiscope_core::{Candidate, Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokenizers::{Tokenizer, TruncationParams};

pub struct DistilBertClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    device: Device,
    labels: Vec<String>,
}

impl DistilBertClassifier {
    /// Download (if needed) and load the configured model.
    ///
    /// Blocks on network and disk; call from a blocking context.
    pub fn load(config: &ClassifierConfig) -> Result<Self> {
        let start = Instant::now();
        let files = ModelFiles::locate(&config.model, &config.revision)?;
        let model = Self::from_files(&config.model, &files, &config.device, config.max_length)?;

        tracing::info!(
            model = %config.model,
            labels = ?model.labels,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Sentiment model loaded"
        );
        Ok(model)
    }

    /// Load from a directory holding `config.json`, `model.safetensors` and a tokenizer
    pub fn load_from_dir(
        name: &str,
        model_path: &Path,
        device: &str,
        max_length: usize,
    ) -> Result<Self> {
        let files = ModelFiles::in_dir(model_path)?;
        Self::from_files(name, &files, device, max_length)
    }

    fn from_files(name: &str, files: &ModelFiles, device: &str, max_length: usize) -> Result<Self> {
        let config_str = std::fs::read_to_string(&files.config)
            .map_err(|e| Error::classification(format!("Failed to read config: {}", e)))?;

        let config_json: Value = serde_json::from_str(&config_str).map_err(|e| {
            Error::classification(format!("Failed to parse config JSON: {}", e))
        })?;

        let hidden_size = config_json
            .get("dim")
            .or_else(|| config_json.get("hidden_size"))
            .and_then(|v| v.as_u64())
            .unwrap_or(768) as usize;

        let labels = id2label(&config_json);

        let distilbert_config: DistilBertConfig = serde_json::from_str(&config_str)
            .map_err(|e| Error::classification(format!("Failed to parse config: {}", e)))?;

        let tokenizer = files.tokenizer(max_length)?;
        let device = parse_device(device)?;
        let vb = files.var_builder(&device)?;

        let model = DistilBertModel::load(vb.pp("distilbert"), &distilbert_config)
            .map_err(candle_err("Failed to load DistilBERT model"))?;

        let pre_classifier = candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier"))
            .map_err(candle_err("Failed to load pre_classifier"))?;

        let classifier = candle_nn::linear(hidden_size, labels.len(), vb.pp("classifier"))
            .map_err(candle_err("Failed to load classification head"))?;

        Ok(Self {
            name: name.to_string(),
            tokenizer,
            model,
            pre_classifier,
            classifier,
            device,
            labels,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn logits(&self, text: &str) -> Result<Tensor> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::classification(format!("Tokenization failed: {}", e)))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let input_ids = Tensor::new(input_ids.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(candle_err("Failed to create input tensor"))?;

        // Candle's DistilBERT masks positions where the mask is 1
        let mask: Vec<u8> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| u8::from(x == 0))
            .collect();
        let mask = Tensor::new(mask.as_slice(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(candle_err("Failed to create attention mask"))?;

        let hidden_states = self
            .model
            .forward(&input_ids, &mask)
            .map_err(candle_err("Model forward pass failed"))?;

        let cls_embedding = hidden_states
            .i((.., 0, ..))
            .map_err(candle_err("Failed to get CLS token"))?;

        let pooled = self
            .pre_classifier
            .forward(&cls_embedding)
            .and_then(|t| t.relu())
            .map_err(candle_err("Pre-classifier failed"))?;

        self.classifier
            .forward(&pooled)
            .map_err(candle_err("Classification head failed"))
    }
}

#[async_trait]
impl Classifier for DistilBertClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Candidate>> {
        let start = Instant::now();
        let logits = self.logits(text)?;

        let probs: Vec<f32> = candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1())
            .map_err(candle_err("Softmax failed"))?;

        let candidates = self
            .labels
            .iter()
            .zip(probs)
            .map(|(label, score)| Candidate::new(label.clone(), score))
            .collect();

        tracing::debug!(
            latency_us = start.elapsed().as_micros() as u64,
            "DistilBERT inference complete"
        );

        Ok(rank(candidates))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn candle_err(context: &'static str) -> impl Fn(candle_core::Error) -> Error {
    move |e| Error::classification(format!("{}: {}", context, e))
}

/// Labels ordered by class index, from `id2label` in `config.json`
fn id2label(config_json: &Value) -> Vec<String> {
    let mut pairs: Vec<(usize, String)> = config_json
        .get("id2label")
        .and_then(|v| v.as_object())
        .map(|map| {
            map.iter()
                .filter_map(|(idx, label)| {
                    Some((idx.parse().ok()?, label.as_str()?.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    if pairs.is_empty() {
        return vec!["NEGATIVE".to_string(), "POSITIVE".to_string()];
    }

    pairs.sort_by_key(|(idx, _)| *idx);
    pairs.into_iter().map(|(_, label)| label).collect()
}

/// Tokenizer definition shipped with a checkpoint
#[derive(Debug, PartialEq)]
enum Vocab {
    /// Full `tokenizer.json` pipeline
    Tokenizer(PathBuf),
    /// Bare `vocab.txt`; the BERT pipeline is rebuilt around it
    WordPiece(PathBuf),
}

/// Files making up a DistilBERT checkpoint
#[derive(Debug)]
struct ModelFiles {
    config: PathBuf,
    weights: PathBuf,
    vocab: Vocab,
}

impl ModelFiles {
    /// Use `model` as a local directory if it is one, else fetch it from the Hub
    fn locate(model: &str, revision: &str) -> Result<Self> {
        let local = Path::new(model);
        if local.is_dir() {
            Self::in_dir(local)
        } else {
            Self::fetch(model, revision)
        }
    }

    fn in_dir(dir: &Path) -> Result<Self> {
        let existing = |file: &str| Some(dir.join(file)).filter(|p| p.is_file());
        let missing = |file: &str| {
            Error::classification(format!("{} not found in {}", file, dir.display()))
        };

        let config = existing("config.json").ok_or_else(|| missing("config.json"))?;
        let weights = existing("model.safetensors").ok_or_else(|| missing("model.safetensors"))?;
        let vocab = existing("tokenizer.json")
            .map(Vocab::Tokenizer)
            .or_else(|| existing("vocab.txt").map(Vocab::WordPiece))
            .ok_or_else(|| missing("tokenizer.json or vocab.txt"))?;

        Ok(Self {
            config,
            weights,
            vocab,
        })
    }

    fn fetch(model: &str, revision: &str) -> Result<Self> {
        tracing::info!(model, revision, "Fetching model from the Hugging Face Hub");

        let api = Api::new()
            .map_err(|e| Error::classification(format!("Hugging Face Hub unavailable: {}", e)))?;
        let repo = api.repo(Repo::with_revision(
            model.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));
        let get = |file: &str| {
            repo.get(file)
                .map_err(|e| Error::classification(format!("Failed to fetch {}: {}", file, e)))
        };

        let config = get("config.json")?;
        let weights = get("model.safetensors")?;
        let vocab = match get("tokenizer.json") {
            Ok(path) => Vocab::Tokenizer(path),
            Err(e) => {
                tracing::debug!(error = %e, "No tokenizer.json, falling back to vocab.txt");
                Vocab::WordPiece(get("vocab.txt")?)
            }
        };

        Ok(Self {
            config,
            weights,
            vocab,
        })
    }

    fn var_builder(&self, device: &Device) -> Result<VarBuilder<'static>> {
        // Safety: the weights file is not modified while the model is alive
        unsafe {
            VarBuilder::from_mmaped_safetensors(&[&self.weights], DType::F32, device)
                .map_err(candle_err("Failed to map model weights"))
        }
    }

    fn tokenizer(&self, max_length: usize) -> Result<Tokenizer> {
        let mut tokenizer = match &self.vocab {
            Vocab::Tokenizer(path) => Tokenizer::from_file(path).map_err(|e| {
                Error::classification(format!("Invalid {}: {}", path.display(), e))
            })?,
            Vocab::WordPiece(path) => bert_tokenizer(path)?,
        };

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::classification(format!("Invalid truncation: {}", e)))?;
        Ok(tokenizer)
    }
}

/// Uncased BERT pipeline over a WordPiece vocabulary
fn bert_tokenizer(vocab: &Path) -> Result<Tokenizer> {
    use tokenizers::models::wordpiece::WordPiece;
    use tokenizers::normalizers::BertNormalizer;
    use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
    use tokenizers::processors::bert::BertProcessing;
    use tokenizers::Model;

    let wordpiece = WordPiece::from_file(&vocab.to_string_lossy())
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| Error::classification(format!("Invalid vocabulary: {}", e)))?;

    let special = |token: &str| {
        wordpiece
            .token_to_id(token)
            .map(|id| (token.to_string(), id))
            .ok_or_else(|| Error::classification(format!("Vocabulary has no {} token", token)))
    };
    let cls = special("[CLS]")?;
    let sep = special("[SEP]")?;

    let mut tokenizer = Tokenizer::new(wordpiece);
    tokenizer.with_normalizer(Some(BertNormalizer::default()));
    tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
    tokenizer.with_post_processor(Some(BertProcessing::new(sep, cls)));
    Ok(tokenizer)
}

/// Parse `cpu`, `cuda[:N]` or `metal[:N]` (alias `mps`)
fn parse_device(device: &str) -> Result<Device> {
    let device = device.trim().to_ascii_lowercase();
    let (kind, ordinal) = match device.split_once(':') {
        Some((kind, n)) => {
            let n = n
                .parse::<usize>()
                .map_err(|_| Error::config(format!("Invalid device ordinal in '{}'", device)))?;
            (kind, n)
        }
        None => (device.as_str(), 0),
    };

    match kind {
        "cpu" => Ok(Device::Cpu),
        "cuda" => Device::new_cuda(ordinal).map_err(candle_err("CUDA device unavailable")),
        "metal" | "mps" => Device::new_metal(ordinal).map_err(candle_err("Metal device unavailable")),
        other => Err(Error::config(format!("Unknown device '{}'", other))),
    }
}
