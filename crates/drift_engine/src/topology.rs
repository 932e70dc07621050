use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use drift_core::{is_png_filename, parse_device_dir, LocaleDirectoryIndex};
use drift_logging::{drift_debug, drift_trace};

/// Name of the subdirectory some test-farm runs store their screenshots in.
const ARTIFACTS_DIR: &str = "artifacts";

/// One on-disk layout of a test-farm screenshot tree.
pub trait TopologyStrategy {
    fn name(&self) -> &'static str;

    /// Index every device directory this layout recognizes under `root`.
    fn detect(&self, root: &Path) -> io::Result<LocaleDirectoryIndex>;
}

/// `root/<model>-<version>-<locale>-<orientation>/*.png`
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatTopology;

impl TopologyStrategy for FlatTopology {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn detect(&self, root: &Path) -> io::Result<LocaleDirectoryIndex> {
        let mut index = LocaleDirectoryIndex::new();
        for (name, dir) in subdirectories(root)? {
            match parse_device_dir(&name) {
                Some(parsed) => index.insert(parsed, dir),
                None => drift_trace!("Ignoring directory {:?}", dir),
            }
        }
        Ok(index)
    }
}

/// `root/<locale>/<run>/<model>-<version>-<locale>-<orientation>[/artifacts]/*.png`
///
/// The locale recorded for each entry comes from the device directory name.
#[derive(Debug, Default, Clone, Copy)]
pub struct NestedTopology;

impl TopologyStrategy for NestedTopology {
    fn name(&self) -> &'static str {
        "nested"
    }

    fn detect(&self, root: &Path) -> io::Result<LocaleDirectoryIndex> {
        let mut index = LocaleDirectoryIndex::new();
        for (_, locale_dir) in subdirectories(root)? {
            for (_, run_dir) in subdirectories(&locale_dir)? {
                for (name, device_dir) in subdirectories(&run_dir)? {
                    let Some(parsed) = parse_device_dir(&name) else {
                        drift_trace!("Ignoring directory {:?}", device_dir);
                        continue;
                    };
                    let artifacts = device_dir.join(ARTIFACTS_DIR);
                    let dir = if artifacts.is_dir() {
                        artifacts
                    } else {
                        device_dir
                    };
                    index.insert(parsed, dir);
                }
            }
        }
        Ok(index)
    }
}

/// Strategies in the order they are tried.
pub fn default_strategies() -> Vec<Box<dyn TopologyStrategy>> {
    vec![Box::new(FlatTopology), Box::new(NestedTopology)]
}

/// Index of the first strategy that finds any device, with that strategy's name.
/// An empty index and `None` when no strategy recognizes the tree.
pub fn detect_index(
    root: &Path,
    strategies: &[Box<dyn TopologyStrategy>],
) -> io::Result<(LocaleDirectoryIndex, Option<&'static str>)> {
    for strategy in strategies {
        let index = strategy.detect(root)?;
        if !index.is_empty() {
            drift_debug!(
                "Detected {} layout with {} device(s) under {:?}",
                strategy.name(),
                index.device_count(),
                root
            );
            return Ok((index, Some(strategy.name())));
        }
    }
    Ok((LocaleDirectoryIndex::new(), None))
}

/// `.png` file names directly inside `dir`.
pub fn list_png_files(dir: &Path) -> io::Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_png_filename(name) {
                names.insert(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Immediate subdirectories of `dir` as `(name, path)`, sorted by name.
/// Entries whose names are not valid UTF-8 are ignored.
fn subdirectories(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut dirs: Vec<(String, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            Some((name, entry.path()))
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}
