use deepsynth_bridge::host::{InMemorySynth, ParamGroup, ParamInfo, SynthHost, ValueType};
use deepsynth_bridge::mapper::{export_current_patch_info, ApplyError, ParameterMapper};
use deepsynth_bridge::protocol::ParameterModification;
use deepsynth_bridge::resolver::ParameterResolver;
use deepsynth_bridge::snapshot::snapshot_features;
use deepsynth_bridge::validator::{missing_aliases, validate_alias_map};

struct RecordingHost {
    params: Vec<ParamInfo>,
    values: Vec<f32>,
    sets: Vec<(usize, f32)>,
    dirty_marks: usize,
    reject: Option<usize>,
}

impl RecordingHost {
    fn new(names: &[(&str, ValueType)]) -> Self {
        let params = names
            .iter()
            .map(|(name, value_type)| ParamInfo {
                display_name: name.to_string(),
                internal_name: String::new(),
                osc_name: String::new(),
                value_type: *value_type,
                group: ParamGroup::Other,
            })
            .collect::<Vec<_>>();
        Self {
            values: vec![0.0; params.len()],
            params,
            sets: Vec::new(),
            dirty_marks: 0,
            reject: None,
        }
    }
}

impl SynthHost for RecordingHost {
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
        if self.reject == Some(index) {
            return Err("locked".to_string());
        }
        self.sets.push((index, value));
        self.values[index] = value;
        Ok(())
    }
    fn mark_dirty(&mut self) {
        self.dirty_marks += 1;
    }
    fn patch_name(&self) -> String {
        "Mock".to_string()
    }
    fn patch_category(&self) -> String {
        "Test".to_string()
    }
}

const UNIT: ValueType = ValueType::Float { min: 0.0, max: 1.0 };

fn resolved_name(synth: &InMemorySynth, resolver: &ParameterResolver, query: &str) -> Option<String> {
    resolver
        .find_with_variations(query)
        .and_then(|i| synth.param_info(i))
        .map(|p| p.display_name)
}

#[test]
fn aliases_land_on_scene_a_unless_scene_b_is_named() {
    let synth = InMemorySynth::with_default_layout();
    let resolver = ParameterResolver::build(&synth);
    assert!(resolver.unresolved_aliases().is_empty());

    let cases = [
        ("cutoff", "A Filter 1 Cutoff"),
        ("CUTOFF", "A Filter 1 Cutoff"),
        ("resonance", "A Filter 1 Resonance"),
        ("attack", "A Amp EG Attack"),
        ("release", "A Amp EG Release"),
        ("volume", "A Volume"),
        ("master_volume", "Global Volume"),
        ("oscillator_drift", "Osc Drift"),
        ("fm_depth", "FM Depth"),
        ("reverb_mix", "Send FX 1 Return"),
        ("delay_mix", "Send FX 2 Return"),
        ("lfo2_shape", "A LFO 2 Type"),
        ("scene_b_filter1_cutoff", "B Filter 1 Cutoff"),
        ("scene_b_amp_release", "B Amp EG Release"),
    ];
    for (query, expected) in cases {
        assert_eq!(
            resolved_name(&synth, &resolver, query).as_deref(),
            Some(expected),
            "query {query}"
        );
    }
}

#[test]
fn exact_internal_short_and_substring_tiers() {
    let synth = InMemorySynth::with_default_layout();
    let resolver = ParameterResolver::build(&synth);

    let cases = [
        ("B Pan", "B Pan"),
        ("b pan", "B Pan"),
        ("b_osc2_pitch", "B Osc 2 Pitch"),
        ("/param/b/lfo1/rate", "B LFO 1 Rate"),
        ("LFO 2 Amplitude", "A LFO 2 Amplitude"),
        ("fx 3 param 2", "FX 3 Param 2"),
    ];
    for (query, expected) in cases {
        assert_eq!(
            resolved_name(&synth, &resolver, query).as_deref(),
            Some(expected),
            "query {query}"
        );
    }

    assert_eq!(resolver.find_index("invalid_parameter"), None);
    assert_eq!(resolver.find_with_variations("invalid_parameter"), None);
    assert_eq!(resolver.find_with_variations("   "), None);
}

#[test]
fn substring_scan_prefers_non_scene_b_then_falls_back() {
    let host = RecordingHost::new(&[
        ("B Drive", UNIT),
        ("Scene B Tone", UNIT),
        ("A Tone", UNIT),
    ]);
    let resolver = ParameterResolver::build(&host);

    assert_eq!(resolver.find_index("tone"), Some(2));
    assert_eq!(resolver.find_index("drive"), Some(0));
    assert_eq!(resolver.find_exact("b DRIVE"), Some(0));

    let mut host = RecordingHost::new(&[("Grit", UNIT), ("Crunch", UNIT)]);
    host.params[0].internal_name = "b_drive".to_string();
    host.params[1].internal_name = "a_drive".to_string();
    let resolver = ParameterResolver::build(&host);
    assert_eq!(resolver.find_index("drive"), Some(1));
}

#[test]
fn aliases_without_targets_are_reported_missing() {
    let host = RecordingHost::new(&[("A Filter 1 Cutoff", UNIT), ("A Volume", UNIT)]);
    let resolver = ParameterResolver::build(&host);

    let report = validate_alias_map(&resolver);
    assert_eq!(report["cutoff"], "mapped to 'A Filter 1 Cutoff' at 0");
    assert_eq!(report["filter_cutoff"], "mapped to 'A Filter 1 Cutoff' at 0");
    assert_eq!(report["volume"], "mapped to 'A Volume' at 1");
    assert_eq!(report["scene_b_osc1_type"], "missing (wanted 'B Osc 1 Type')");
    assert!(missing_aliases(&report) > 0);
    assert_eq!(missing_aliases(&report), resolver.unresolved_aliases().len());
}

#[test]
fn default_layout_validates_cleanly() {
    let synth = InMemorySynth::with_default_layout();
    let resolver = ParameterResolver::build(&synth);
    let report = validate_alias_map(&resolver);

    assert_eq!(missing_aliases(&report), 0);
    let idx = synth.index_of("A Filter 1 Cutoff").expect("cutoff present");
    assert_eq!(
        report["filter1_cutoff"],
        format!("mapped to 'A Filter 1 Cutoff' at {idx}")
    );
}

#[test]
fn continuous_values_set_directly_or_converted_from_plain() {
    let mut synth = InMemorySynth::with_default_layout();
    let mapper = ParameterMapper::new(&synth);

    let applied = mapper
        .set_parameter_from_name(&mut synth, "filter1_cutoff", 0.5)
        .expect("cutoff");
    assert_eq!(applied.requested, "filter1_cutoff");
    assert_eq!(applied.resolved, "A Filter 1 Cutoff");
    assert!((applied.old_value - 0.8).abs() < 1e-6);
    assert_eq!(applied.new_value, 0.5);
    assert!(synth.is_dirty());

    // Outside [0, 1] is a plain value in the parameter's own range.
    mapper
        .set_parameter_from_name(&mut synth, "A Osc 1 Pitch", 12.0)
        .expect("pitch");
    assert!((synth.value_of("A Osc 1 Pitch").unwrap_or_default() - 0.6).abs() < 1e-6);

    mapper
        .set_parameter_from_name(&mut synth, "pan", -0.5)
        .expect("pan");
    assert!((synth.value_of("A Pan").unwrap_or_default() - 0.25).abs() < 1e-6);

    mapper
        .set_parameter_from_name(&mut synth, "resonance", 1.5)
        .expect("resonance");
    assert_eq!(synth.value_of("A Filter 1 Resonance"), Some(1.0));
}

#[test]
fn discrete_values_truncate_and_clamp() {
    let mut synth = InMemorySynth::with_default_layout();
    let mapper = ParameterMapper::new(&synth);

    mapper
        .set_parameter_from_name(&mut synth, "osc1_type", 2.7)
        .expect("type");
    assert_eq!(synth.plain_value_of("A Osc 1 Type"), Some(2.0));

    mapper
        .set_parameter_from_name(&mut synth, "osc1_type", 99.0)
        .expect("type");
    assert_eq!(synth.value_of("A Osc 1 Type"), Some(1.0));

    mapper
        .set_parameter_from_name(&mut synth, "filter1_type", -3.0)
        .expect("type");
    assert_eq!(synth.value_of("A Filter 1 Type"), Some(0.0));
}

#[test]
fn type_suffix_forces_discrete_handling() {
    let mut host = RecordingHost::new(&[("Wave_Type", ValueType::Float { min: 0.0, max: 4.0 })]);
    let mapper = ParameterMapper::new(&host);

    mapper
        .set_parameter_from_name(&mut host, "wave_type", 2.6)
        .expect("set");
    assert_eq!(host.sets, vec![(0, 0.5)]);
    assert_eq!(host.dirty_marks, 1);
}

#[test]
fn unknown_non_finite_and_rejected_values_fail() {
    let mut host = RecordingHost::new(&[("A Volume", UNIT)]);
    host.reject = Some(0);
    let mapper = ParameterMapper::new(&host);

    assert!(matches!(
        mapper.set_parameter_from_name(&mut host, "invalid_parameter", 0.5),
        Err(ApplyError::UnknownParameter(_))
    ));
    assert!(matches!(
        mapper.set_parameter_from_name(&mut host, "volume", f32::NAN),
        Err(ApplyError::InvalidValue { .. })
    ));
    match mapper.set_parameter_from_name(&mut host, "volume", 0.5) {
        Err(ApplyError::Host { name, msg }) => {
            assert_eq!(name, "A Volume");
            assert_eq!(msg, "locked");
        }
        other => panic!("expected host error, got: {other:?}"),
    }
    assert!(host.sets.is_empty());
    assert_eq!(host.dirty_marks, 0);
}

#[test]
fn apply_report_collects_successes_and_failures() {
    let mut synth = InMemorySynth::with_default_layout();
    let mapper = ParameterMapper::new(&synth);

    let mods = vec![
        ParameterModification::new("cutoff", 0.3),
        ParameterModification::new("bogus_knob", 0.5),
        ParameterModification::new("osc2_type", 3.0),
    ];
    let report = mapper.apply_modifications(&mut synth, &mods);

    assert_eq!(report.applied_count(), 2);
    assert!(!report.all_applied());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "bogus_knob");
    assert!(report.failed[0].reason.contains("unknown parameter"));
    assert_eq!(report.applied[1].resolved, "A Osc 2 Type");
    assert!(synth.is_dirty());

    let mut fresh = InMemorySynth::with_default_layout();
    let report = mapper.apply_modifications(&mut fresh, &[]);
    assert!(report.all_applied());
    assert!(!fresh.is_dirty());
}

#[test]
fn export_lists_grouped_parameters_in_section_order() {
    let param = |name: &str, group: ParamGroup| ParamInfo {
        display_name: name.to_string(),
        internal_name: String::new(),
        osc_name: String::new(),
        value_type: UNIT,
        group,
    };
    let synth = InMemorySynth::new(vec![
        (param("Master", ParamGroup::Global), 0.5),
        (param("Cut", ParamGroup::Filters), 0.25),
        (param("Odd", ParamGroup::Other), 1.0),
        (param("Saw", ParamGroup::Oscillators), 0.125),
    ]);

    assert_eq!(
        export_current_patch_info(&synth),
        "Current Patch Parameters:\n\n\
         === Global ===\n- Master: 0.500\n\n\
         === Oscillators ===\n- Saw: 0.125\n\n\
         === Mixer ===\n\n\
         === Filters ===\n- Cut: 0.250\n\n\
         === Envelopes ===\n\n\
         === Modulators ===\n\n\
         === FX ===\n\n"
    );
}

#[test]
fn snapshot_reads_loaded_patch_into_features() {
    let mut synth = InMemorySynth::with_default_layout();
    synth.set_patch_meta("Glass", "Pads");
    let mapper = ParameterMapper::new(&synth);

    let mods = vec![
        ParameterModification::new("osc1_type", 2.0),
        ParameterModification::new("filter1_cutoff", 0.9),
        ParameterModification::new("amp_attack", 0.5),
        ParameterModification::new("amp_release", 0.8),
        ParameterModification::new("lfo1_rate", 0.2),
        ParameterModification::new("FX 1 Type", 4.0),
    ];
    assert!(mapper.apply_modifications(&mut synth, &mods).all_applied());

    let features = snapshot_features(&synth, mapper.resolver());
    assert_eq!(features.name, "Glass");
    assert_eq!(features.scene_a.osc1_type, 2);
    assert_eq!(features.scene_a.osc1_pitch, 0.0);
    assert!((features.volume - 0.9).abs() < 1e-6);
    assert_eq!(features.fx.len(), 8);
    assert!(features.fx[0].enabled);
    assert_eq!(features.fx[0].fx_type, 4);
    assert_eq!(features.fx[0].params.len(), 4);
    assert!(!features.fx[1].enabled);
    assert_eq!(
        features.semantic_description(),
        "A Pads sound using wavetable synthesis, bright and open, with slow attack and long release, with gentle modulation"
    );
}
