use serde::{Deserialize, Serialize};

pub const FEATURE_DIM: usize = 50;
pub const MAX_FX_SLOTS: usize = 8;

const OSC_TYPE_SCALE: f32 = 15.0;
const FILTER_TYPE_SCALE: f32 = 12.0;
const LFO_SHAPE_SCALE: f32 = 8.0;
const PITCH_OFFSET: f32 = 60.0;
const PITCH_SPAN: f32 = 120.0;

/// Relative importance of parameter families when comparing sounds.
pub const PARAMETER_WEIGHTS: &[(&str, f32)] = &[
    ("osc_type", 2.0),
    ("filter_cutoff", 1.8),
    ("filter_type", 1.5),
    ("amp_attack", 1.2),
    ("amp_release", 1.2),
    ("filter_resonance", 1.0),
    ("lfo_rate", 0.8),
    ("pitch", 0.5),
    ("volume", 0.3),
];

pub fn parameter_weight(name: &str) -> Option<f32> {
    PARAMETER_WEIGHTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, w)| *w)
}

/// Per-scene values. Types are engine enum indices, pitches are semitones,
/// everything else is already normalized to `[0, 1]`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SceneFeatures {
    pub osc1_type: i32,
    pub osc2_type: i32,
    pub osc3_type: i32,
    pub osc1_pitch: f32,
    pub osc2_pitch: f32,
    pub osc3_pitch: f32,

    pub filter1_type: i32,
    pub filter2_type: i32,
    pub filter1_cutoff: f32,
    pub filter2_cutoff: f32,
    pub filter1_resonance: f32,
    pub filter2_resonance: f32,

    pub amp_attack: f32,
    pub amp_decay: f32,
    pub amp_sustain: f32,
    pub amp_release: f32,

    pub filter_attack: f32,
    pub filter_decay: f32,
    pub filter_sustain: f32,
    pub filter_release: f32,

    pub lfo1_rate: f32,
    pub lfo2_rate: f32,
    pub lfo1_shape: i32,
    pub lfo2_shape: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FxSlot {
    pub enabled: bool,
    pub fx_type: i32,
    pub params: Vec<f32>,
}

/// The slice of a patch used for similarity search. This is also the JSON
/// preset file format.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PatchFeatures {
    pub name: String,
    pub category: String,
    pub author: String,
    pub comment: String,
    pub scene_a: SceneFeatures,
    pub scene_b: SceneFeatures,
    pub volume: f32,
    pub fx: Vec<FxSlot>,
}

impl PatchFeatures {
    /// Fixed-length (`FEATURE_DIM`) vector of normalized values.
    pub fn to_normalized_vector(&self) -> Vec<f32> {
        let a = &self.scene_a;
        let b = &self.scene_b;
        let mut v = Vec::with_capacity(FEATURE_DIM);

        v.extend([a.osc1_type, a.osc2_type, a.osc3_type].map(|t| t as f32 / OSC_TYPE_SCALE));
        v.extend(
            [a.osc1_pitch, a.osc2_pitch, a.osc3_pitch].map(|p| (p + PITCH_OFFSET) / PITCH_SPAN),
        );

        v.extend([a.filter1_type, a.filter2_type].map(|t| t as f32 / FILTER_TYPE_SCALE));
        v.extend([
            a.filter1_cutoff,
            a.filter2_cutoff,
            a.filter1_resonance,
            a.filter2_resonance,
        ]);

        v.extend([a.amp_attack, a.amp_decay, a.amp_sustain, a.amp_release]);
        v.extend([
            a.filter_attack,
            a.filter_decay,
            a.filter_sustain,
            a.filter_release,
        ]);

        v.extend([a.lfo1_rate, a.lfo2_rate]);
        v.extend([a.lfo1_shape, a.lfo2_shape].map(|s| s as f32 / LFO_SHAPE_SCALE));

        // Scene B only contributes the values that most change its character.
        v.push(b.osc1_type as f32 / OSC_TYPE_SCALE);
        v.extend([b.filter1_cutoff, b.amp_attack, b.amp_release]);

        v.push(self.volume);

        for slot in self.fx.iter().take(MAX_FX_SLOTS) {
            v.push(if slot.enabled { 1.0 } else { 0.0 });
            v.push(slot.params.first().copied().unwrap_or(0.0));
        }

        v.resize(FEATURE_DIM, 0.0);
        v
    }

    pub fn semantic_description(&self) -> String {
        let a = &self.scene_a;
        let mut desc = format!("A {} sound", self.category);

        if a.osc1_type == 2 {
            desc.push_str(" using wavetable synthesis");
        } else if a.osc1_type >= 4 {
            desc.push_str(" with FM synthesis");
        } else {
            desc.push_str(" with classic oscillators");
        }

        if a.filter1_cutoff < 0.3 {
            desc.push_str(", heavily filtered");
        } else if a.filter1_cutoff > 0.8 {
            desc.push_str(", bright and open");
        }
        if a.filter1_resonance > 0.7 {
            desc.push_str(" with high resonance");
        }

        if a.amp_attack < 0.05 && a.amp_release < 0.3 {
            desc.push_str(", percussive");
        } else if a.amp_attack > 0.3 {
            desc.push_str(", with slow attack");
        }
        if a.amp_release > 0.7 {
            desc.push_str(" and long release");
        }

        if a.lfo1_rate > 0.5 {
            desc.push_str(", with fast modulation");
        } else if a.lfo1_rate > 0.1 {
            desc.push_str(", with gentle modulation");
        }

        desc
    }
}
