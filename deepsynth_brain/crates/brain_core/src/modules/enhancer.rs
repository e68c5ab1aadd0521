use crate::modules::vector_db::{PresetVector, VectorDatabase};

const SEARCH_KEYWORDS: &[&str] = &[
    "bass", "lead", "pad", "pluck", "arp", "chord", "string", "brass", "bell", "organ", "piano",
    "ep", "electric", "ambient", "atmospheric", "warm", "bright", "dark", "soft", "hard",
    "aggressive", "gentle", "smooth", "rough", "clean", "distorted", "filtered", "resonant", "fm",
    "wavetable", "analog", "digital", "vintage", "modern", "classic",
];

const PER_TERM_RESULTS: usize = 3;
const MAX_REFERENCE_PATCHES: usize = 5;

/// Sound-design keywords present in `prompt` (plain substring match, so
/// "deep" also yields "ep"). Falls back to the whole prompt.
pub fn extract_search_terms(prompt: &str) -> Vec<String> {
    let lower = prompt.to_lowercase();
    let terms: Vec<String> = SEARCH_KEYWORDS
        .iter()
        .filter(|k| lower.contains(*k))
        .map(|k| k.to_string())
        .collect();
    if terms.is_empty() {
        vec![prompt.to_string()]
    } else {
        terms
    }
}

pub fn format_similar_patches(patches: &[PresetVector]) -> String {
    let mut out = String::new();
    for p in patches {
        out.push_str(&format!("- {} ({})", p.name, p.category));
        if !p.description.is_empty() {
            out.push_str(": ");
            out.push_str(&p.description);
        }
        out.push('\n');
    }
    out
}

/// Appends a short list of library presets related to the prompt.
pub fn enhance_prompt(db: &VectorDatabase, prompt: &str) -> String {
    let mut similar: Vec<PresetVector> = extract_search_terms(prompt)
        .iter()
        .flat_map(|term| db.find_similar_by_text(term, PER_TERM_RESULTS))
        .collect();

    similar.sort_by(|a, b| a.name.cmp(&b.name));
    similar.dedup_by(|a, b| a.name == b.name);
    similar.truncate(MAX_REFERENCE_PATCHES);

    if similar.is_empty() {
        return prompt.to_string();
    }
    log::debug!("enhancing prompt with {} reference presets", similar.len());

    format!(
        "{prompt}\n\nFor reference, here are some similar patches from the factory library:\n{}\nUse these as inspiration but create something new based on the user's request.",
        format_similar_patches(&similar)
    )
}
