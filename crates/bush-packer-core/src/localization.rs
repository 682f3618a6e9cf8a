// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::error::LoadError;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Language used for text that comes without a language tag (legacy sub-leg files).
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Language tag → text.
pub type Alternatives = BTreeMap<String, String>;

/// A translatable string. The generated game files only ever carry its `TT:` token,
/// the texts themselves go to the `.locPak` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedString {
    id: String,
    alternatives: Alternatives,
}

impl LocalizedString {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn alternatives(&self) -> &Alternatives {
        &self.alternatives
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.alternatives.get(language).map(String::as_str)
    }

    /// Language-neutral token resolved by the simulator at runtime.
    pub fn render_default(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TT:{}", self.id)
    }
}

/// Interning table for every translatable string of one pack.
///
/// The first `intern` call for an identifier decides its texts; later calls get the
/// stored instance back and their alternatives are dropped. The table is shared by
/// reference across the loaders, which may run on several threads.
#[derive(Debug, Default)]
pub struct LocalizationRegistry {
    strings: Mutex<BTreeMap<String, Arc<LocalizedString>>>,
}

impl LocalizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Arc<LocalizedString>>> {
        // A panic while holding the lock cannot leave the map half-updated
        self.strings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn intern(&self, id: impl Into<String>, alternatives: Alternatives) -> Arc<LocalizedString> {
        let id = id.into();
        let mut strings = self.lock();
        if let Some(existing) = strings.get(&id) {
            log::debug!("[Localization] {} already interned, keeping first texts", id);
            return Arc::clone(existing);
        }
        let instance = Arc::new(LocalizedString {
            id: id.clone(),
            alternatives,
        });
        strings.insert(id, Arc::clone(&instance));
        instance
    }

    pub fn get(&self, id: &str) -> Option<Arc<LocalizedString>> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Language → (identifier → text), both levels sorted.
    pub fn dump_all(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        let mut packs: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for instance in self.lock().values() {
            for (language, text) in &instance.alternatives {
                packs
                    .entry(language.clone())
                    .or_default()
                    .insert(instance.id.clone(), text.clone());
            }
        }
        packs
    }
}

/// Companion text files that come in one copy per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LanguageFile {
    Description,
    Briefing,
}

impl LanguageFile {
    fn stem(self) -> &'static str {
        match self {
            LanguageFile::Description => "description",
            LanguageFile::Briefing => "briefing",
        }
    }

    fn pattern(self) -> &'static Regex {
        static DESCRIPTION: OnceLock<Regex> = OnceLock::new();
        static BRIEFING: OnceLock<Regex> = OnceLock::new();
        match self {
            LanguageFile::Description => DESCRIPTION.get_or_init(|| {
                Regex::new(r"(?i)^description\.(?P<lang>\w{2}-\w{2})\.txt$")
                    .expect("valid description pattern")
            }),
            LanguageFile::Briefing => BRIEFING.get_or_init(|| {
                Regex::new(r"(?i)^briefing\.(?P<lang>\w{2}-\w{2})\.txt$")
                    .expect("valid briefing pattern")
            }),
        }
    }
}

/// Collects `<stem>.<xx-yy>.txt` files in `dir` into per-language texts.
/// Files that do not carry a language tag are skipped.
pub(crate) fn read_language_files(dir: &Path, kind: LanguageFile) -> Result<Alternatives, LoadError> {
    let re = kind.pattern();
    let mut alternatives = Alternatives::new();

    let entries = std::fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        let lower = name.to_lowercase();
        if !lower.starts_with(kind.stem()) || !lower.ends_with(".txt") {
            continue;
        }
        match re.captures(&name) {
            Some(cap) => {
                let path = entry.path();
                let text = std::fs::read_to_string(&path).map_err(|e| LoadError::io(&path, e))?;
                alternatives.insert(cap["lang"].to_string(), text);
            }
            None => log::warn!("[Localization] Ignoring {:?}: no language tag", entry.path()),
        }
    }

    Ok(alternatives)
}
