use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use drift_core::{
    is_png_filename, match_filenames, parse_device_dir, DeviceKey, LocaleDirectoryIndex,
};
use pretty_assertions::assert_eq;

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn device_dir_name_excises_locale() {
    let parsed = parse_device_dir("starlte-29-en-portrait").unwrap();
    assert_eq!(parsed.key.to_string(), "starlte-29-portrait");
    assert_eq!(parsed.locale, "en");
}

#[test]
fn orientation_keeps_its_own_hyphens() {
    let parsed = parse_device_dir("Pixel6-33-fr-landscape-left").unwrap();
    assert_eq!(
        parsed.key,
        DeviceKey {
            model: "Pixel6".into(),
            version: "33".into(),
            orientation: "landscape-left".into(),
        }
    );
    assert_eq!(parsed.locale, "fr");
}

#[test]
fn short_names_yield_no_device() {
    assert!(parse_device_dir("starlte-29-en").is_none());
    assert!(parse_device_dir("logs").is_none());
    assert!(parse_device_dir("").is_none());
}

#[test]
fn index_groups_locales_under_one_device() {
    let mut index = LocaleDirectoryIndex::new();
    for name in ["starlte-29-en-portrait", "starlte-29-fr-portrait", "a10-30-en-portrait"] {
        index.insert(parse_device_dir(name).unwrap(), PathBuf::from(name));
    }
    assert_eq!(index.device_count(), 2);

    let key = parse_device_dir("starlte-29-de-portrait").unwrap().key;
    assert_eq!(index.locales(&key).collect::<Vec<_>>(), vec!["en", "fr"]);
    assert_eq!(
        index.locale_dir(&key, "fr"),
        Some(Path::new("starlte-29-fr-portrait"))
    );
    assert_eq!(index.locale_dir(&key, "de"), None);
}

#[test]
fn matching_uses_intersection_and_symmetric_difference() {
    let result = match_filenames(&set(&["a.png", "b.png"]), &set(&["b.png", "c.png"]));
    assert_eq!(result.matched, set(&["b.png"]));
    assert_eq!(result.skipped, set(&["a.png", "c.png"]));
}

#[test]
fn filename_matching_is_exact() {
    let result = match_filenames(&set(&["Home.png"]), &set(&["home.png"]));
    assert!(result.matched.is_empty());
    assert_eq!(result.skipped.len(), 2);
}

#[test]
fn png_extension_check_ignores_case() {
    assert!(is_png_filename("shot.png"));
    assert!(is_png_filename("shot.PNG"));
    assert!(!is_png_filename("shot.jpg"));
    assert!(!is_png_filename("png"));
}
