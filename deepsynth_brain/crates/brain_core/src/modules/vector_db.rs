use crate::modules::features::PatchFeatures;
use crate::modules::preset_scan::{load_preset, scan_preset_dir, PresetError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetVector {
    pub name: String,
    pub category: String,
    pub author: String,
    pub description: String,
    pub parameter_vector: Vec<f32>,
    /// Reserved for a text embedding model; nothing fills it yet.
    pub text_embedding: Vec<f32>,
    pub file_path: Option<PathBuf>,
    pub tags: BTreeMap<String, String>,
}

impl PresetVector {
    pub fn from_features(features: &PatchFeatures, file_path: Option<PathBuf>) -> Self {
        let mut tags = BTreeMap::new();
        if !features.comment.trim().is_empty() {
            tags.insert("comment".to_string(), features.comment.clone());
        }
        Self {
            name: features.name.clone(),
            category: features.category.clone(),
            author: features.author.clone(),
            description: features.semantic_description(),
            parameter_vector: features.to_normalized_vector(),
            text_embedding: Vec::new(),
            file_path,
            tags,
        }
    }

    /// Query-only vector with no metadata.
    pub fn from_parameters(params: &[f32]) -> Self {
        Self {
            parameter_vector: params.to_vec(),
            ..Self::default()
        }
    }

    pub fn cosine_similarity(&self, other: &PresetVector) -> f32 {
        cosine(&self.parameter_vector, &other.parameter_vector)
    }

    pub fn euclidean_distance(&self, other: &PresetVector) -> f32 {
        let (a, b) = (&self.parameter_vector, &other.parameter_vector);
        if a.len() != b.len() {
            return f32::MAX;
        }
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Name-match score: whole-query containment first, then a bonus per word.
fn text_score(query_lower: &str, name: &str) -> f32 {
    let name_lower = name.to_lowercase();
    let mut score = if name_lower.contains(query_lower) {
        1.0
    } else if !name_lower.is_empty() && query_lower.contains(name_lower.as_str()) {
        0.8
    } else {
        0.0
    };
    for word in query_lower.split_whitespace() {
        if name_lower.contains(word) {
            score += 0.3;
        }
    }
    score
}

/// In-memory preset index. Searches are linear scans.
#[derive(Debug, Default)]
pub struct VectorDatabase {
    patches: Vec<PresetVector>,
}

impl VectorDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn patches(&self) -> &[PresetVector] {
        &self.patches
    }

    pub fn add(&mut self, preset: PresetVector) {
        self.patches.push(preset);
    }

    pub fn add_features(&mut self, features: &PatchFeatures, file_path: Option<PathBuf>) {
        self.add(PresetVector::from_features(features, file_path));
    }

    pub fn add_preset_file(&mut self, path: &Path) -> Result<(), PresetError> {
        let features = load_preset(path)?;
        self.add_features(&features, Some(path.to_path_buf()));
        Ok(())
    }

    /// Replaces the contents with every preset found under `dirs`. Missing
    /// directories are skipped.
    pub fn build_from_dirs<P: AsRef<Path>>(&mut self, dirs: &[P]) -> usize {
        self.patches.clear();
        for dir in dirs {
            let dir = dir.as_ref();
            if !dir.is_dir() {
                log::warn!("preset directory does not exist: {}", dir.display());
                continue;
            }
            let found = scan_preset_dir(dir);
            log::info!("extracted {} presets from {}", found.len(), dir.display());
            for (path, features) in found {
                self.add_features(&features, Some(path));
            }
        }
        log::info!("loaded {} presets into vector database", self.patches.len());
        self.patches.len()
    }

    pub fn find_similar_patches(&self, query: &PresetVector, top_k: usize) -> Vec<PresetVector> {
        let scored = self
            .patches
            .iter()
            .enumerate()
            .map(|(i, p)| (query.cosine_similarity(p), i))
            .collect();
        self.top_k(scored, top_k)
    }

    pub fn find_similar_by_parameters(&self, params: &[f32], top_k: usize) -> Vec<PresetVector> {
        self.find_similar_patches(&PresetVector::from_parameters(params), top_k)
    }

    pub fn find_similar_by_text(&self, text: &str, top_k: usize) -> Vec<PresetVector> {
        let query = text.to_lowercase();
        let scored = self
            .patches
            .iter()
            .enumerate()
            .map(|(i, p)| (text_score(&query, &p.name), i))
            .filter(|(score, _)| *score > 0.0)
            .collect();
        self.top_k(scored, top_k)
    }

    /// Blends the name-match score (scaled so the best match is 1.0) with
    /// cosine similarity. `text_weight` is clamped to `[0, 1]`.
    pub fn hybrid_search(
        &self,
        text: &str,
        params: &[f32],
        text_weight: f32,
        top_k: usize,
    ) -> Vec<PresetVector> {
        let w = if text_weight.is_finite() {
            text_weight.clamp(0.0, 1.0)
        } else {
            0.5
        };
        let query_text = text.to_lowercase();
        let text_scores: Vec<f32> = self
            .patches
            .iter()
            .map(|p| text_score(&query_text, &p.name))
            .collect();
        let best = text_scores.iter().copied().fold(0.0f32, f32::max);

        let scored = self
            .patches
            .iter()
            .zip(text_scores)
            .enumerate()
            .map(|(i, (p, t))| {
                let t = if best > 0.0 { t / best } else { 0.0 };
                let c = cosine(params, &p.parameter_vector);
                (w * t + (1.0 - w) * c, i)
            })
            .collect();
        self.top_k(scored, top_k)
    }

    pub fn patches_by_category(&self, category: &str) -> Vec<PresetVector> {
        self.patches
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }

    fn top_k(&self, mut scored: Vec<(f32, usize)>, top_k: usize) -> Vec<PresetVector> {
        for (score, _) in scored.iter_mut() {
            if !score.is_finite() {
                *score = f32::NEG_INFINITY;
            }
        }
        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(top_k)
            .map(|(_, i)| self.patches[i].clone())
            .collect()
    }
}
