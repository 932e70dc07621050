use std::fmt;

use serde::Serialize;

/// Minimum number of hyphen-separated segments in a device directory name:
/// model, version, locale and at least one orientation segment.
const MIN_SEGMENTS: usize = 4;

/// Device identity with the locale excised, e.g. `starlte-29-portrait`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct DeviceKey {
    pub model: String,
    pub version: String,
    pub orientation: String,
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.model, self.version, self.orientation)
    }
}

impl From<DeviceKey> for String {
    fn from(key: DeviceKey) -> Self {
        key.to_string()
    }
}

/// Device directory name split into its device key and locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDirName {
    pub key: DeviceKey,
    pub locale: String,
}

/// Parse `<model>-<version>-<locale>-<orientation...>`.
///
/// The orientation is everything after the third segment and may itself
/// contain hyphens. Names with fewer than four segments yield `None`.
pub fn parse_device_dir(name: &str) -> Option<DeviceDirName> {
    let parts: Vec<&str> = name.split('-').collect();
    if parts.len() < MIN_SEGMENTS {
        return None;
    }
    Some(DeviceDirName {
        key: DeviceKey {
            model: parts[0].to_string(),
            version: parts[1].to_string(),
            orientation: parts[3..].join("-"),
        },
        locale: parts[2].to_string(),
    })
}
