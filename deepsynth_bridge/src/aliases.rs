//! Short parameter names a language model tends to produce, mapped onto the
//! verbose display names of the synth. Targets without a scene prefix are
//! found by substring and land on scene A.

pub const PARAMETER_ALIASES: &[(&str, &str)] = &[
    // oscillators
    ("osc1_type", "A Osc 1 Type"),
    ("osc1_pitch", "A Osc 1 Pitch"),
    ("osc1_volume", "A Osc 1 Volume"),
    ("osc2_type", "A Osc 2 Type"),
    ("osc2_pitch", "A Osc 2 Pitch"),
    ("osc2_volume", "A Osc 2 Volume"),
    ("osc3_type", "A Osc 3 Type"),
    ("osc3_pitch", "A Osc 3 Pitch"),
    ("osc3_volume", "A Osc 3 Volume"),
    ("oscillator_drift", "Osc Drift"),
    ("fm_depth", "FM Depth"),
    // filters
    ("filter1_type", "A Filter 1 Type"),
    ("filter1_cutoff", "A Filter 1 Cutoff"),
    ("filter1_resonance", "A Filter 1 Resonance"),
    ("filter2_type", "A Filter 2 Type"),
    ("filter2_cutoff", "A Filter 2 Cutoff"),
    ("filter2_resonance", "A Filter 2 Resonance"),
    ("filter_cutoff", "A Filter 1 Cutoff"),
    ("filter_resonance", "A Filter 1 Resonance"),
    ("filter_type", "A Filter 1 Type"),
    ("highpass", "A Highpass"),
    ("filter_feedback", "A Feedback"),
    // envelopes
    ("amp_attack", "A Amp EG Attack"),
    ("amp_decay", "A Amp EG Decay"),
    ("amp_sustain", "A Amp EG Sustain"),
    ("amp_release", "A Amp EG Release"),
    ("filter_attack", "A Filter EG Attack"),
    ("filter_decay", "A Filter EG Decay"),
    ("filter_sustain", "A Filter EG Sustain"),
    ("filter_release", "A Filter EG Release"),
    // lfos
    ("lfo1_rate", "A LFO 1 Rate"),
    ("lfo1_shape", "A LFO 1 Type"),
    ("lfo1_amount", "A LFO 1 Amplitude"),
    ("lfo2_rate", "A LFO 2 Rate"),
    ("lfo2_shape", "A LFO 2 Type"),
    ("lfo2_amount", "A LFO 2 Amplitude"),
    // global
    ("master_volume", "Global Volume"),
    ("volume", "A Volume"),
    ("amp_gain", "A VCA Gain"),
    ("pan", "A Pan"),
    ("width", "A Width"),
    // fx
    ("fx_reverb_mix", "Send FX 1 Return"),
    ("fx_chorus_mix", "Send FX 1 Return"),
    ("reverb_mix", "Send FX 1 Return"),
    ("fx_delay_mix", "Send FX 2 Return"),
    ("delay_mix", "Send FX 2 Return"),
    // short forms
    ("cutoff", "Filter 1 Cutoff"),
    ("resonance", "Filter 1 Resonance"),
    ("attack", "Amp EG Attack"),
    ("decay", "Amp EG Decay"),
    ("sustain", "Amp EG Sustain"),
    ("release", "Amp EG Release"),
    // scene b
    ("scene_b_osc1_type", "B Osc 1 Type"),
    ("scene_b_osc2_type", "B Osc 2 Type"),
    ("scene_b_osc3_type", "B Osc 3 Type"),
    ("scene_b_filter1_cutoff", "B Filter 1 Cutoff"),
    ("scene_b_filter1_resonance", "B Filter 1 Resonance"),
    ("scene_b_filter2_cutoff", "B Filter 2 Cutoff"),
    ("scene_b_filter2_resonance", "B Filter 2 Resonance"),
    ("scene_b_amp_attack", "B Amp EG Attack"),
    ("scene_b_amp_decay", "B Amp EG Decay"),
    ("scene_b_amp_sustain", "B Amp EG Sustain"),
    ("scene_b_amp_release", "B Amp EG Release"),
];
