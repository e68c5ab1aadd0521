use crate::aliases::PARAMETER_ALIASES;
use crate::host::SynthHost;
use std::collections::HashMap;

/// Name-to-index tables for one host parameter layout. Rebuild when the
/// layout changes.
#[derive(Debug, Clone, Default)]
pub struct ParameterResolver {
    display_names: Vec<String>,
    exact: HashMap<String, usize>,
    lowered: HashMap<String, usize>,
    osc: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
    /// Lower-cased display and internal names in index order.
    scan: Vec<(String, usize)>,
    unresolved: Vec<(&'static str, &'static str)>,
}

impl ParameterResolver {
    pub fn build(host: &dyn SynthHost) -> Self {
        let mut r = Self::default();

        for index in 0..host.param_count() {
            let Some(info) = host.param_info(index) else {
                r.display_names.push(String::new());
                continue;
            };

            for name in [&info.display_name, &info.internal_name] {
                if name.is_empty() {
                    continue;
                }
                r.exact.entry(name.clone()).or_insert(index);
                let lower = name.to_lowercase();
                r.lowered.entry(lower.clone()).or_insert(index);
                r.scan.push((lower, index));
            }
            if !info.osc_name.is_empty() {
                r.osc.entry(info.osc_name.to_lowercase()).or_insert(index);
            }
            r.display_names.push(info.display_name);
        }

        for &(alias, target) in PARAMETER_ALIASES {
            match r.locate_alias_target(target) {
                Some(index) => {
                    r.aliases.insert(alias.to_string(), index);
                }
                None => {
                    log::warn!("alias {alias} -> '{target}' has no matching parameter");
                    r.unresolved.push((alias, target));
                }
            }
        }

        log::debug!(
            "resolver built: {} params, {} aliases, {} unresolved",
            r.display_names.len(),
            r.aliases.len(),
            r.unresolved.len()
        );
        r
    }

    fn locate_alias_target(&self, target: &str) -> Option<usize> {
        if let Some(i) = self.exact.get(target) {
            return Some(*i);
        }
        let lower = target.to_lowercase();
        if let Some(i) = self.lowered.get(&lower) {
            return Some(*i);
        }
        self.scan
            .iter()
            .find(|(name, _)| name.contains(&lower))
            .map(|(_, i)| *i)
    }

    pub fn param_count(&self) -> usize {
        self.display_names.len()
    }

    pub fn display_name(&self, index: usize) -> Option<&str> {
        self.display_names.get(index).map(String::as_str)
    }

    pub fn alias_index(&self, alias: &str) -> Option<usize> {
        self.aliases.get(&alias.to_lowercase()).copied()
    }

    /// Aliases whose target was not present when the tables were built.
    pub fn unresolved_aliases(&self) -> &[(&'static str, &'static str)] {
        &self.unresolved
    }

    /// Exact then case-insensitive match on display or internal name.
    pub fn find_exact(&self, name: &str) -> Option<usize> {
        if let Some(i) = self.exact.get(name) {
            return Some(*i);
        }
        self.lowered.get(&name.to_lowercase()).copied()
    }

    pub fn find_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let lower = name.to_lowercase();

        if let Some(i) = self.aliases.get(&lower) {
            log::debug!("'{name}' resolved by alias to {i}");
            return Some(*i);
        }
        if let Some(i) = self.find_exact(name) {
            return Some(i);
        }
        if let Some(i) = self.osc.get(&lower) {
            return Some(*i);
        }

        let hit = self
            .scan
            .iter()
            .find(|(n, _)| !is_scene_b(n) && n.contains(&lower))
            .or_else(|| self.scan.iter().find(|(n, _)| n.contains(&lower)));
        if let Some((n, i)) = hit {
            log::debug!("'{name}' resolved by substring to '{n}' ({i})");
            return Some(*i);
        }
        None
    }

    pub fn find_with_variations(&self, name: &str) -> Option<usize> {
        if let Some(i) = self.find_index(name) {
            return Some(i);
        }
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let variations = [
            format!("A {name}"),
            format!("B {name}"),
            format!("{name} 1"),
            format!("{name} 2"),
            format!("A {name} 1"),
            format!("A {name} 2"),
        ];
        variations.iter().find_map(|v| self.find_index(v))
    }
}

fn is_scene_b(lower: &str) -> bool {
    lower.starts_with("b ")
        || lower.starts_with("b_")
        || lower.contains(" b ")
        || lower.contains("scene b")
}
