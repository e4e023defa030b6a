//! Item image resolution
//!
//! Each item gets at most one image, found by a cascade:
//!
//! 1. An explicit reference in one of [`IMAGE_FIELDS`], matched by basename
//!    against the primary image directory, then against every subdirectory
//!    of the image root.
//! 2. Name heuristics: candidate slugs built from the source file, id and
//!    display name, tried as filename prefixes and then as substrings.
//!
//! A resolved image is copied into the servable tree and recorded by URL.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::fs_utils::{list_file_names, list_subdirs};
use crate::item::Item;
use crate::layout::DataLayout;
use crate::locale::localized_opt;
use crate::Result;

/// Item fields that may name an image, in priority order
pub const IMAGE_FIELDS: &[&str] = &[
    "image",
    "icon",
    "sprite",
    "imagePath",
    "iconPath",
    "texture",
    "imageUrl",
    "thumbnail",
    "imageFilename",
];

// "Shield - II"
static DASH_ROMAN_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[-–—]\s*[ivx]{1,5}$").expect("valid regex"));
// "Mk 1", "Mk.3", "mk ii", "ferro_mk2"
static MK_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[\s_-]+)mk\.?[\s_-]*(?:\d+|[ivx]+)$").expect("valid regex"));
// standalone trailing "III", "(II)" or "_ii"
static ROMAN_WORD_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[\s_-]+)\(?[ivx]{1,5}\)?$").expect("valid regex"));
static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Slug a name for filename matching, dropping any tier suffix.
///
/// `"Pulse Rifle Mk III"` → `"pulse_rifle"`, `"Shield - II"` → `"shield"`
pub fn normalize_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let stripped = DASH_ROMAN_SUFFIX.replace(&lower, "");
    let stripped = MK_SUFFIX.replace(&stripped, "");
    let stripped = ROMAN_WORD_SUFFIX.replace(&stripped, "");
    underscore_runs(&stripped).trim_matches('_').to_string()
}

fn underscore_runs(text: &str) -> String {
    NON_ALNUM.replace_all(text, "_").into_owned()
}

/// Last path segment of a path or URL
fn basename(reference: &str) -> &str {
    reference.rsplit(['/', '\\']).next().unwrap_or(reference)
}

/// Explicit image reference carried by the item, if any
pub fn explicit_reference(raw: &Value) -> Option<String> {
    IMAGE_FIELDS.iter().find_map(|field| match raw.get(*field)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        obj @ Value::Object(_) => localized_opt(Some(obj)),
        _ => None,
    })
}

/// Name-derived candidate slugs, in the order they are tried
pub fn heuristic_candidates(item: &Item) -> Vec<String> {
    let file_stem = strip_json_ext(&item.source_file).to_lowercase();
    let raw_name = item.display_name().to_lowercase();

    let ordered = [
        file_stem.clone(),
        item.id.to_lowercase(),
        raw_name.clone(),
        underscore_runs(&raw_name),
        normalize_name(&raw_name),
        normalize_name(&file_stem),
    ];

    let mut candidates: Vec<String> = Vec::new();
    for candidate in ordered {
        if !candidate.is_empty() && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

fn strip_json_ext(file: &str) -> &str {
    let cut = file.len().saturating_sub(".json".len());
    match file.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(".json") => &file[..cut],
        _ => file,
    }
}

/// A located source image
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageHit {
    /// Directory name below the image root
    subdir: String,
    file: String,
}

/// One image directory listing
#[derive(Debug, Clone)]
struct ImageDir {
    name: String,
    files: Vec<String>,
    lower: Vec<String>,
}

impl ImageDir {
    fn load(root: &Path, name: &str) -> Result<Self> {
        let files = list_file_names(&root.join(name))?;
        let lower = files.iter().map(|f| f.to_lowercase()).collect();
        Ok(ImageDir {
            name: name.to_string(),
            files,
            lower,
        })
    }

    fn hit(&self, index: usize) -> ImageHit {
        ImageHit {
            subdir: self.name.clone(),
            file: self.files[index].clone(),
        }
    }

    fn find(&self, pred: impl Fn(&str) -> bool) -> Option<ImageHit> {
        self.lower.iter().position(|f| pred(f.as_str())).map(|i| self.hit(i))
    }
}

/// Image listings for one run, plus where servable copies go
#[derive(Debug, Clone)]
pub struct ImageIndex {
    root: PathBuf,
    primary: ImageDir,
    others: Vec<ImageDir>,
    public_root: PathBuf,
    url_prefix: String,
}

impl ImageIndex {
    /// List the primary image directory and every other image subdirectory
    pub fn load(layout: &DataLayout) -> Result<Self> {
        let root = layout.images_root.clone();
        let primary = ImageDir::load(&root, &layout.primary_images)?;

        let mut others = Vec::new();
        for dir in list_subdirs(&root)? {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name != layout.primary_images {
                others.push(ImageDir::load(&root, name)?);
            }
        }

        debug!(
            "Indexed {} primary images and {} other image directories",
            primary.files.len(),
            others.len()
        );

        Ok(ImageIndex {
            root,
            primary,
            others,
            public_root: layout.public_images.clone(),
            url_prefix: layout.image_url_prefix.clone(),
        })
    }

    /// Resolve, copy and return the servable path of an item's image
    pub fn resolve(&self, item: &Item) -> Option<String> {
        let hit = explicit_reference(&item.raw)
            .and_then(|reference| self.find_explicit(&reference))
            .or_else(|| self.find_heuristic(item));

        match hit {
            Some(hit) => self.publish(&hit),
            None => {
                debug!("No image found for item '{}'", item.id);
                None
            }
        }
    }

    fn find_explicit(&self, reference: &str) -> Option<ImageHit> {
        let base = basename(reference).to_lowercase();
        if base.is_empty() {
            return None;
        }

        self.primary
            .find(|f| f == base || f.ends_with(&base))
            .or_else(|| {
                std::iter::once(&self.primary)
                    .chain(&self.others)
                    .find_map(|dir| dir.find(|f| f == base))
            })
    }

    fn find_heuristic(&self, item: &Item) -> Option<ImageHit> {
        let candidates = heuristic_candidates(item);

        candidates
            .iter()
            .find_map(|c| self.primary.find(|f| f.starts_with(c.as_str())))
            .or_else(|| {
                candidates
                    .iter()
                    .find_map(|c| self.primary.find(|f| f.contains(c.as_str())))
            })
    }

    /// Copy into the servable tree; a failed copy leaves the item imageless
    fn publish(&self, hit: &ImageHit) -> Option<String> {
        let src = self.root.join(&hit.subdir).join(&hit.file);
        let dest = self.public_root.join(&hit.subdir).join(&hit.file);

        if let Err(e) = copy_if_changed(&src, &dest) {
            warn!("Failed to copy image {} -> {}: {}", src.display(), dest.display(), e);
            return None;
        }

        Some(format!("{}/{}/{}", self.url_prefix, hit.subdir, hit.file))
    }
}

/// Copy `src` to `dest` unless `dest` already exists with the same size
pub fn copy_if_changed(src: &Path, dest: &Path) -> io::Result<()> {
    let src_len = fs::metadata(src)?.len();
    if let Ok(dest_meta) = fs::metadata(dest) {
        if dest_meta.is_file() && dest_meta.len() == src_len {
            return Ok(());
        }
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixture {
        _temp: tempfile::TempDir,
        layout: DataLayout,
    }

    fn fixture(primary: &[&str], other: &[(&str, &str)]) -> Fixture {
        let temp = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(temp.path().join("arcraiders-data"), temp.path().join("public"));

        let primary_dir = layout.primary_images_dir();
        fs::create_dir_all(&primary_dir).unwrap();
        for file in primary {
            fs::write(primary_dir.join(file), file.as_bytes()).unwrap();
        }
        for (dir, file) in other {
            let dir = layout.images_root.join(dir);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(file), file.as_bytes()).unwrap();
        }

        Fixture {
            _temp: temp,
            layout,
        }
    }

    fn item(raw: Value, source_file: &str) -> Item {
        Item::from_json(raw, source_file).unwrap()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Pulse Rifle Mk III"), "pulse_rifle");
        assert_eq!(normalize_name("Combat Mk. 3"), "combat");
        assert_eq!(normalize_name("Light Shield - II"), "light_shield");
        assert_eq!(normalize_name("Anvil IV"), "anvil");
        assert_eq!(normalize_name("Stitcher (II)"), "stitcher");
        assert_eq!(normalize_name("Adrenaline Shot"), "adrenaline_shot");
    }

    #[test]
    fn test_normalize_slug_suffixes() {
        assert_eq!(normalize_name("ferro_mk2"), "ferro");
        assert_eq!(normalize_name("stitcher_ii"), "stitcher");
        assert_eq!(normalize_name("pulse_rifle_mk_iii"), "pulse_rifle");
        assert_eq!(normalize_name("light-shield-iv"), "light_shield");
        assert_eq!(normalize_name("hammock_3"), "hammock_3");
    }

    #[test]
    fn test_normalize_keeps_words_ending_in_numeral_letters() {
        // Only a standalone numeral is a tier
        assert_eq!(normalize_name("Matrix"), "matrix");
        assert_eq!(normalize_name("Hairpin"), "hairpin");
    }

    #[test]
    fn test_explicit_reference() {
        let raw = json!({"icon": "  https://cdn.example/img/Battery.png  "});
        assert_eq!(
            explicit_reference(&raw).as_deref(),
            Some("https://cdn.example/img/Battery.png")
        );
        assert_eq!(basename("https://cdn.example/img/Battery.png"), "Battery.png");
        assert_eq!(basename(r"art\items\gear.webp"), "gear.webp");

        let raw = json!({"image": "", "thumbnail": {"fr": "vignette.png"}});
        assert_eq!(explicit_reference(&raw).as_deref(), Some("vignette.png"));

        assert!(explicit_reference(&json!({"image": 4})).is_none());
    }

    #[test]
    fn test_candidates_order() {
        let it = item(
            json!({"id": "ITEM_42", "name": "Pulse Rifle Mk III"}),
            "pulse_rifle_mk3.json",
        );
        assert_eq!(
            heuristic_candidates(&it),
            vec![
                "pulse_rifle_mk3",
                "item_42",
                "pulse rifle mk iii",
                "pulse_rifle_mk_iii",
                "pulse_rifle",
            ]
        );
    }

    #[test]
    fn test_explicit_primary_match_and_copy() {
        let fx = fixture(&["Battery.png", "wires.png"], &[]);
        let index = ImageIndex::load(&fx.layout).unwrap();
        let it = item(json!({"id": "b", "image": "/assets/battery.png"}), "b.json");

        let path = index.resolve(&it);
        assert_eq!(path.as_deref(), Some("/arcraiders-data/images/items/Battery.png"));
        assert!(fx.layout.public_images.join("items").join("Battery.png").is_file());
    }

    #[test]
    fn test_explicit_suffix_match() {
        let fx = fixture(&["icon_fabric.png"], &[]);
        let index = ImageIndex::load(&fx.layout).unwrap();
        let it = item(json!({"id": "x", "icon": "fabric.png"}), "x.json");
        assert_eq!(
            index.resolve(&it).as_deref(),
            Some("/arcraiders-data/images/items/icon_fabric.png")
        );
    }

    #[test]
    fn test_explicit_subdirectory_match() {
        let fx = fixture(&[], &[("weapons", "Ferro.webp")]);
        let index = ImageIndex::load(&fx.layout).unwrap();
        let it = item(json!({"id": "w", "sprite": "FERRO.webp"}), "w.json");

        assert_eq!(
            index.resolve(&it).as_deref(),
            Some("/arcraiders-data/images/weapons/Ferro.webp")
        );
        assert!(fx.layout.public_images.join("weapons").join("Ferro.webp").is_file());
    }

    #[test]
    fn test_heuristic_prefix_before_substring() {
        let fx = fixture(&["old_metal_parts.png", "metal_parts.png"], &[]);
        let index = ImageIndex::load(&fx.layout).unwrap();
        let it = item(json!({"id": "metal_parts", "name": "Metal Parts"}), "metal_parts.json");
        assert_eq!(
            index.resolve(&it).as_deref(),
            Some("/arcraiders-data/images/items/metal_parts.png")
        );
    }

    #[test]
    fn test_heuristic_substring_and_tier_strip() {
        let fx = fixture(&["icon_pulse_rifle.png"], &[]);
        let index = ImageIndex::load(&fx.layout).unwrap();
        let it = item(json!({"id": "pr3", "name": "Pulse Rifle Mk III"}), "weapons.json");
        assert_eq!(
            index.resolve(&it).as_deref(),
            Some("/arcraiders-data/images/items/icon_pulse_rifle.png")
        );
    }

    #[test]
    fn test_heuristic_tier_stripped_file_stem() {
        let fx = fixture(&["ferro.png", "stitcher.png"], &[]);
        let index = ImageIndex::load(&fx.layout).unwrap();

        let it = item(json!({"id": "weapon_07"}), "ferro_mk2.json");
        assert_eq!(
            index.resolve(&it).as_deref(),
            Some("/arcraiders-data/images/items/ferro.png")
        );

        let it = item(json!({"id": "weapon_12"}), "stitcher_ii.json");
        assert_eq!(
            index.resolve(&it).as_deref(),
            Some("/arcraiders-data/images/items/stitcher.png")
        );
    }

    #[test]
    fn test_unresolved_explicit_falls_back_to_heuristic() {
        let fx = fixture(&["snap_hook.png"], &[]);
        let index = ImageIndex::load(&fx.layout).unwrap();
        let it = item(json!({"id": "snap_hook", "image": "missing.png"}), "snap_hook.json");
        assert_eq!(
            index.resolve(&it).as_deref(),
            Some("/arcraiders-data/images/items/snap_hook.png")
        );
    }

    #[test]
    fn test_no_image() {
        let fx = fixture(&["battery.png"], &[]);
        let index = ImageIndex::load(&fx.layout).unwrap();
        let it = item(json!({"id": "zipline", "name": "Zipline"}), "zipline.json");
        assert!(index.resolve(&it).is_none());
    }

    #[test]
    fn test_missing_image_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(temp.path().join("data"), temp.path().join("public"));
        let index = ImageIndex::load(&layout).unwrap();
        let it = item(json!({"id": "a"}), "a.json");
        assert!(index.resolve(&it).is_none());
    }

    #[test]
    fn test_copy_if_changed_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src.png");
        let dest = temp.path().join("out").join("dest.png");
        fs::write(&src, b"pixels").unwrap();

        copy_if_changed(&src, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");

        // Same size: left alone
        fs::write(&dest, b"PIXELS").unwrap();
        copy_if_changed(&src, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"PIXELS");

        // Different size: recopied
        fs::write(&dest, b"stale image").unwrap();
        copy_if_changed(&src, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
    }

    #[test]
    fn test_copy_failure_leaves_no_image() {
        let fx = fixture(&["battery.png"], &[]);
        // A file where the servable directory should be
        fs::create_dir_all(fx.layout.public_images.parent().unwrap()).unwrap();
        fs::write(&fx.layout.public_images, b"").unwrap();

        let index = ImageIndex::load(&fx.layout).unwrap();
        let it = item(json!({"id": "battery"}), "battery.json");
        assert!(index.resolve(&it).is_none());
    }
}
