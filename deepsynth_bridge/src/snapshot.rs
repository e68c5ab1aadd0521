use crate::host::SynthHost;
use crate::resolver::ParameterResolver;
use brain_core::features::{FxSlot, PatchFeatures, SceneFeatures, MAX_FX_SLOTS};

struct Reader<'a> {
    host: &'a dyn SynthHost,
    resolver: &'a ParameterResolver,
}

impl Reader<'_> {
    fn index(&self, name: &str) -> Option<usize> {
        self.resolver.find_exact(name)
    }

    fn norm(&self, name: &str) -> Option<f32> {
        self.host.get_value01(self.index(name)?)
    }

    fn plain(&self, name: &str) -> Option<f32> {
        let i = self.index(name)?;
        let info = self.host.param_info(i)?;
        Some(info.value_type.normalized_to_value(self.host.get_value01(i)?))
    }

    fn int(&self, name: &str) -> Option<i32> {
        self.plain(name).map(|v| v.round() as i32)
    }

    fn scene(&self, scene: &str) -> SceneFeatures {
        let n = |label: &str| self.norm(&format!("{scene} {label}")).unwrap_or_default();
        let p = |label: &str| self.plain(&format!("{scene} {label}")).unwrap_or_default();
        let t = |label: &str| self.int(&format!("{scene} {label}")).unwrap_or_default();

        SceneFeatures {
            osc1_type: t("Osc 1 Type"),
            osc2_type: t("Osc 2 Type"),
            osc3_type: t("Osc 3 Type"),
            osc1_pitch: p("Osc 1 Pitch"),
            osc2_pitch: p("Osc 2 Pitch"),
            osc3_pitch: p("Osc 3 Pitch"),
            filter1_type: t("Filter 1 Type"),
            filter2_type: t("Filter 2 Type"),
            filter1_cutoff: n("Filter 1 Cutoff"),
            filter2_cutoff: n("Filter 2 Cutoff"),
            filter1_resonance: n("Filter 1 Resonance"),
            filter2_resonance: n("Filter 2 Resonance"),
            amp_attack: n("Amp EG Attack"),
            amp_decay: n("Amp EG Decay"),
            amp_sustain: n("Amp EG Sustain"),
            amp_release: n("Amp EG Release"),
            filter_attack: n("Filter EG Attack"),
            filter_decay: n("Filter EG Decay"),
            filter_sustain: n("Filter EG Sustain"),
            filter_release: n("Filter EG Release"),
            lfo1_rate: n("LFO 1 Rate"),
            lfo2_rate: n("LFO 2 Rate"),
            lfo1_shape: t("LFO 1 Type"),
            lfo2_shape: t("LFO 2 Type"),
        }
    }

    fn fx(&self) -> Vec<FxSlot> {
        (1..=MAX_FX_SLOTS)
            .map_while(|n| {
                let fx_type = self.int(&format!("FX {n} Type"))?;
                let params = (1..=4)
                    .filter_map(|k| self.norm(&format!("FX {n} Param {k}")))
                    .collect();
                Some(FxSlot {
                    enabled: fx_type > 0,
                    fx_type,
                    params,
                })
            })
            .collect()
    }
}

/// Reads the loaded patch into the feature model used by the preset search.
/// Parameters the host does not expose read as zero.
pub fn snapshot_features(host: &dyn SynthHost, resolver: &ParameterResolver) -> PatchFeatures {
    let r = Reader { host, resolver };
    PatchFeatures {
        name: host.patch_name(),
        category: host.patch_category(),
        author: String::new(),
        comment: String::new(),
        scene_a: r.scene("A"),
        scene_b: r.scene("B"),
        volume: r.norm("Global Volume").unwrap_or_default(),
        fx: r.fx(),
    }
}
