//! Source and output locations for a classification run

use std::path::{Path, PathBuf};

/// URL prefix recorded in resolved image paths by default
pub const DEFAULT_IMAGE_URL_PREFIX: &str = "/arcraiders-data/images";

/// Where a run reads its documents and where it copies servable images.
///
/// Defaults mirror the community data dump layout:
///
/// ```text
/// <data_dir>/items/*.json
/// <data_dir>/images/items/*        (primary image directory)
/// <data_dir>/images/<other>/*
/// <data_dir>/projects.json
/// <data_dir>/hideout/*.json
/// <data_dir>/quests/*.json
/// <data_dir>/deprecated/quests.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub items_dir: PathBuf,
    pub images_root: PathBuf,
    /// Subdirectory of `images_root` searched first
    pub primary_images: String,
    pub projects_file: PathBuf,
    pub hideout_dir: PathBuf,
    pub quests_dir: PathBuf,
    pub legacy_quests_file: PathBuf,
    /// Servable copies land at `<public_images>/<subdir>/<file>`
    pub public_images: PathBuf,
    pub image_url_prefix: String,
}

impl DataLayout {
    /// Standard layout under `data_dir`, copying images below `public_dir`
    pub fn new(data_dir: impl AsRef<Path>, public_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let public_dir = public_dir.as_ref();
        let data_name = data_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "arcraiders-data".to_string());

        DataLayout {
            items_dir: data_dir.join("items"),
            images_root: data_dir.join("images"),
            primary_images: "items".to_string(),
            projects_file: data_dir.join("projects.json"),
            hideout_dir: data_dir.join("hideout"),
            quests_dir: data_dir.join("quests"),
            legacy_quests_file: data_dir.join("deprecated").join("quests.json"),
            public_images: public_dir.join(&data_name).join("images"),
            image_url_prefix: format!("/{}/images", data_name),
        }
    }

    /// Override the URL prefix recorded for resolved images
    pub fn with_image_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_url_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    pub fn primary_images_dir(&self) -> PathBuf {
        self.images_root.join(&self.primary_images)
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        DataLayout::new("arcraiders-data", "public")
    }
}
