//! Connection profiles: load/save simple JSON mapping of profile name -> { base_url, tls_ca }
//! Stored under XDG config dir: $XDG_CONFIG_HOME/launerdash/profiles.json (fallback ~/.config/launerdash/profiles.json)

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileEntry {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_ca: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileEntry>,
    #[serde(default)]
    pub version: u32,
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("launerdash")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("launerdash")
    }
}

pub fn profiles_path() -> PathBuf {
    config_dir().join("profiles.json")
}

pub fn load_profiles() -> ProfilesFile {
    let path = profiles_path();
    match fs::read_to_string(&path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => ProfilesFile::default(),
    }
}

pub fn save_profiles(p: &ProfilesFile) -> std::io::Result<()> {
    let path = profiles_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p)?;
    fs::write(path, data)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveProfile {
    /// Use the provided runtime inputs (not persisted). (base_url, tls_ca)
    Direct(String, Option<String>),
    /// Loaded from existing profile entry (base_url, tls_ca)
    Loaded(String, Option<String>),
    /// Should prompt user to select among profile names
    PromptSelect(Vec<String>),
    /// Should prompt user to create a new profile (name)
    PromptCreate(String),
    /// No profile could be resolved (e.g., missing arguments)
    None,
}

pub struct ProfileRequest {
    pub profile_name: Option<String>,
    pub base_url: Option<String>,
    pub tls_ca: Option<String>,
}

impl ProfileRequest {
    pub fn resolve(self, pf: &ProfilesFile) -> ResolveProfile {
        match (self.profile_name, self.base_url) {
            // Only a profile name: load it, or offer to create it
            (Some(name), None) => match pf.profiles.get(&name) {
                Some(entry) => ResolveProfile::Loaded(entry.base_url.clone(), entry.tls_ca.clone()),
                None => ResolveProfile::PromptCreate(name),
            },
            // URL given -> direct (maybe later saved by caller)
            (_, Some(u)) => ResolveProfile::Direct(u, self.tls_ca),
            // Nothing provided -> maybe prompt select if profiles exist
            (None, None) if pf.profiles.is_empty() => ResolveProfile::None,
            (None, None) => ResolveProfile::PromptSelect(pf.profiles.keys().cloned().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with(name: &str, url: &str) -> ProfilesFile {
        let mut pf = ProfilesFile::default();
        pf.profiles.insert(
            name.into(),
            ProfileEntry {
                base_url: url.into(),
                tls_ca: None,
            },
        );
        pf
    }

    #[test]
    fn name_only_loads_or_prompts_create() {
        let pf = file_with("prod", "http://prod:8000/api");
        let req = ProfileRequest {
            profile_name: Some("prod".into()),
            base_url: None,
            tls_ca: None,
        };
        assert_eq!(
            req.resolve(&pf),
            ResolveProfile::Loaded("http://prod:8000/api".into(), None)
        );
        let req = ProfileRequest {
            profile_name: Some("dev".into()),
            base_url: None,
            tls_ca: None,
        };
        assert_eq!(req.resolve(&pf), ResolveProfile::PromptCreate("dev".into()));
    }

    #[test]
    fn nothing_given_selects_when_profiles_exist() {
        let empty = ProfilesFile::default();
        let none = ProfileRequest {
            profile_name: None,
            base_url: None,
            tls_ca: None,
        };
        assert_eq!(none.resolve(&empty), ResolveProfile::None);
        let pf = file_with("a", "http://a/api");
        let none = ProfileRequest {
            profile_name: None,
            base_url: None,
            tls_ca: None,
        };
        assert_eq!(none.resolve(&pf), ResolveProfile::PromptSelect(vec!["a".into()]));
    }
}
