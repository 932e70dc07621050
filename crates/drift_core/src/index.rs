use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::device::{DeviceDirName, DeviceKey};

/// Device key → locale → directory holding that device's screenshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleDirectoryIndex {
    devices: BTreeMap<DeviceKey, BTreeMap<String, PathBuf>>,
}

impl LocaleDirectoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `dir` for the device and locale named by `name`.
    /// A later entry for the same device and locale replaces the earlier one.
    pub fn insert(&mut self, name: DeviceDirName, dir: PathBuf) {
        self.devices
            .entry(name.key)
            .or_default()
            .insert(name.locale, dir);
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Devices in key order.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceKey> {
        self.devices.keys()
    }

    pub fn locale_dir(&self, device: &DeviceKey, locale: &str) -> Option<&Path> {
        self.devices
            .get(device)
            .and_then(|locales| locales.get(locale))
            .map(PathBuf::as_path)
    }

    pub fn locales(&self, device: &DeviceKey) -> impl Iterator<Item = &str> {
        self.devices
            .get(device)
            .into_iter()
            .flat_map(|locales| locales.keys().map(String::as_str))
    }
}

/// Outcome of joining two screenshot directories on exact filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMatch {
    /// Present on both sides; these get compared.
    pub matched: BTreeSet<String>,
    /// Present on one side only; never compared.
    pub skipped: BTreeSet<String>,
}

pub fn match_filenames(source: &BTreeSet<String>, target: &BTreeSet<String>) -> FileMatch {
    FileMatch {
        matched: source.intersection(target).cloned().collect(),
        skipped: source.symmetric_difference(target).cloned().collect(),
    }
}

/// Whether `name` carries a `.png` extension, in any letter case.
pub fn is_png_filename(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}
