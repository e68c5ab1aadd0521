use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ValueType {
    Int { min: i32, max: i32 },
    Float { min: f32, max: f32 },
}

impl ValueType {
    pub fn is_discrete(&self) -> bool {
        matches!(self, ValueType::Int { .. })
    }

    fn range(&self) -> (f32, f32) {
        match *self {
            ValueType::Int { min, max } => (min as f32, max as f32),
            ValueType::Float { min, max } => (min, max),
        }
    }

    /// Linear map of a plain value into `[0, 1]` space. Not clamped.
    pub fn value_to_normalized(&self, plain: f32) -> f32 {
        let (min, max) = self.range();
        if max > min {
            (plain - min) / (max - min)
        } else {
            0.0
        }
    }

    pub fn normalized_to_value(&self, v01: f32) -> f32 {
        let (min, max) = self.range();
        let plain = min + v01.clamp(0.0, 1.0) * (max - min);
        if self.is_discrete() {
            plain.round()
        } else {
            plain
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParamGroup {
    Global,
    Oscillators,
    Mixer,
    Filters,
    Envelopes,
    Modulators,
    Fx,
    Other,
}

impl ParamGroup {
    /// Section order used when describing a patch.
    pub const EXPORT_ORDER: [ParamGroup; 7] = [
        ParamGroup::Global,
        ParamGroup::Oscillators,
        ParamGroup::Mixer,
        ParamGroup::Filters,
        ParamGroup::Envelopes,
        ParamGroup::Modulators,
        ParamGroup::Fx,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ParamGroup::Global => "Global",
            ParamGroup::Oscillators => "Oscillators",
            ParamGroup::Mixer => "Mixer",
            ParamGroup::Filters => "Filters",
            ParamGroup::Envelopes => "Envelopes",
            ParamGroup::Modulators => "Modulators",
            ParamGroup::Fx => "FX",
            ParamGroup::Other => "Other",
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ParamInfo {
    pub display_name: String,
    pub internal_name: String,
    /// Short control-surface address; may be empty.
    pub osc_name: String,
    pub value_type: ValueType,
    pub group: ParamGroup,
}

/// The synth engine as seen from the prompt pipeline. Values crossing this
/// boundary are normalized to `[0, 1]`.
pub trait SynthHost {
    fn param_count(&self) -> usize;
    fn param_info(&self, index: usize) -> Option<ParamInfo>;
    fn get_value01(&self, index: usize) -> Option<f32>;
    fn set_value01(&mut self, index: usize, value: f32) -> Result<(), String>;
    fn mark_dirty(&mut self);

    fn patch_name(&self) -> String;
    fn patch_category(&self) -> String;
}

/// Stand-alone patch with a Surge-like parameter layout.
#[derive(Debug, Clone)]
pub struct InMemorySynth {
    params: Vec<ParamInfo>,
    values: Vec<f32>,
    dirty: bool,
    name: String,
    category: String,
}

impl InMemorySynth {
    pub fn new(params: Vec<(ParamInfo, f32)>) -> Self {
        let (params, values) = params
            .into_iter()
            .map(|(p, v)| (p, v.clamp(0.0, 1.0)))
            .unzip();
        Self {
            params,
            values,
            dirty: false,
            name: "Init".to_string(),
            category: "Templates".to_string(),
        }
    }

    pub fn with_default_layout() -> Self {
        Self::new(default_layout())
    }

    pub fn set_patch_meta(&mut self, name: &str, category: &str) {
        self.name = name.to_string();
        self.category = category.to_string();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn index_of(&self, display_name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.display_name == display_name)
    }

    pub fn value_of(&self, display_name: &str) -> Option<f32> {
        self.index_of(display_name).map(|i| self.values[i])
    }

    pub fn plain_value_of(&self, display_name: &str) -> Option<f32> {
        let i = self.index_of(display_name)?;
        Some(self.params[i].value_type.normalized_to_value(self.values[i]))
    }

    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }
}

impl SynthHost for InMemorySynth {
    fn param_count(&self) -> usize {
        self.params.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamInfo> {
        self.params.get(index).cloned()
    }

    fn get_value01(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    fn set_value01(&mut self, index: usize, value: f32) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("non-finite value at index {index}"));
        }
        let slot = self
            .values
            .get_mut(index)
            .ok_or_else(|| format!("param index out of range: {index}"))?;
        *slot = value.clamp(0.0, 1.0);
        Ok(())
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn patch_name(&self) -> String {
        self.name.clone()
    }

    fn patch_category(&self) -> String {
        self.category.clone()
    }
}

struct LayoutBuilder {
    out: Vec<(ParamInfo, f32)>,
}

impl LayoutBuilder {
    fn push(
        &mut self,
        display_name: String,
        internal_name: String,
        osc_name: String,
        value_type: ValueType,
        group: ParamGroup,
        default01: f32,
    ) {
        self.out.push((
            ParamInfo {
                display_name,
                internal_name,
                osc_name,
                value_type,
                group,
            },
            default01,
        ));
    }
}

const UNIT: ValueType = ValueType::Float { min: 0.0, max: 1.0 };
const BIPOLAR: ValueType = ValueType::Float { min: -1.0, max: 1.0 };
const PITCH: ValueType = ValueType::Float {
    min: -60.0,
    max: 60.0,
};
const CUTOFF: ValueType = ValueType::Float {
    min: -60.0,
    max: 70.0,
};
const HIGHPASS: ValueType = ValueType::Float {
    min: -72.0,
    max: 15.0,
};
const ENV_TIME: ValueType = ValueType::Float { min: -8.0, max: 5.0 };
const LFO_RATE: ValueType = ValueType::Float { min: -7.0, max: 9.0 };
const GAIN_DB: ValueType = ValueType::Float {
    min: -48.0,
    max: 48.0,
};

fn default_layout() -> Vec<(ParamInfo, f32)> {
    use ParamGroup::*;

    let mut b = LayoutBuilder { out: Vec::new() };

    b.push(
        "Global Volume".into(),
        "volume".into(),
        "/param/global/volume".into(),
        ValueType::Float {
            min: -48.0,
            max: 0.0,
        },
        Global,
        0.9,
    );
    b.push(
        "FM Depth".into(),
        "fm_depth".into(),
        "/param/global/fm/depth".into(),
        UNIT,
        Oscillators,
        0.0,
    );
    b.push(
        "Osc Drift".into(),
        "osc_drift".into(),
        "/param/global/osc/drift".into(),
        UNIT,
        Oscillators,
        0.0,
    );

    for scene in ["A", "B"] {
        let s = scene.to_ascii_lowercase();
        let mut push = |label: &str, key: &str, vt: ValueType, group: ParamGroup, def: f32| {
            b.push(
                format!("{scene} {label}"),
                format!("{s}_{key}"),
                format!("/param/{s}/{}", key.replace('_', "/")),
                vt,
                group,
                def,
            );
        };

        for n in 1..=3 {
            push(
                &format!("Osc {n} Type"),
                &format!("osc{n}_type"),
                ValueType::Int { min: 0, max: 15 },
                Oscillators,
                0.0,
            );
            push(&format!("Osc {n} Pitch"), &format!("osc{n}_pitch"), PITCH, Oscillators, 0.5);
        }

        for n in 1..=3 {
            let def = if n == 1 { 1.0 } else { 0.0 };
            push(&format!("Osc {n} Volume"), &format!("osc{n}_volume"), UNIT, Mixer, def);
        }

        for n in 1..=2 {
            push(
                &format!("Filter {n} Type"),
                &format!("filter{n}_type"),
                ValueType::Int { min: 0, max: 12 },
                Filters,
                0.0,
            );
            push(&format!("Filter {n} Cutoff"), &format!("filter{n}_cutoff"), CUTOFF, Filters, 0.8);
            push(
                &format!("Filter {n} Resonance"),
                &format!("filter{n}_resonance"),
                UNIT,
                Filters,
                0.0,
            );
        }
        push("Highpass", "highpass", HIGHPASS, Filters, 0.0);
        push("Feedback", "feedback", BIPOLAR, Filters, 0.5);

        for (eg, key) in [("Amp EG", "env1"), ("Filter EG", "env2")] {
            push(&format!("{eg} Attack"), &format!("{key}_attack"), ENV_TIME, Envelopes, 0.1);
            push(&format!("{eg} Decay"), &format!("{key}_decay"), ENV_TIME, Envelopes, 0.4);
            push(&format!("{eg} Sustain"), &format!("{key}_sustain"), UNIT, Envelopes, 1.0);
            push(&format!("{eg} Release"), &format!("{key}_release"), ENV_TIME, Envelopes, 0.3);
        }

        for n in 1..=2 {
            push(&format!("LFO {n} Rate"), &format!("lfo{n}_rate"), LFO_RATE, Modulators, 0.0);
            push(
                &format!("LFO {n} Type"),
                &format!("lfo{n}_shape"),
                ValueType::Int { min: 0, max: 8 },
                Modulators,
                0.0,
            );
            push(
                &format!("LFO {n} Amplitude"),
                &format!("lfo{n}_amplitude"),
                UNIT,
                Modulators,
                1.0,
            );
        }

        push("Volume", "volume", UNIT, Mixer, 0.8);
        push("VCA Gain", "vca_gain", GAIN_DB, Mixer, 0.5);
        push("Pan", "pan", BIPOLAR, Mixer, 0.5);
        push("Width", "width", BIPOLAR, Mixer, 1.0);
    }

    for n in 1..=2 {
        b.push(
            format!("Send FX {n} Return"),
            format!("send_fx_{n}_return"),
            format!("/param/fx/send/{n}/return"),
            UNIT,
            Fx,
            0.0,
        );
    }

    for n in 1..=8 {
        b.push(
            format!("FX {n} Type"),
            format!("fx{n}_type"),
            format!("/param/fx/{n}/type"),
            ValueType::Int { min: 0, max: 30 },
            Fx,
            0.0,
        );
        for k in 1..=4 {
            b.push(
                format!("FX {n} Param {k}"),
                format!("fx{n}_param{k}"),
                format!("/param/fx/{n}/param/{k}"),
                UNIT,
                Fx,
                0.0,
            );
        }
    }

    b.out
}
