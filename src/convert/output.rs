//! The output directory: image files and the manifest.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use regex::Regex;

use crate::error::Result;
use crate::model::Manifest;

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE_NAME: &str = "extracted_content.json";

/// File name of image `index` on page `page` (both 1-indexed).
pub fn image_file_name(page: u32, index: usize) -> String {
    format!("page{}_image{}.png", page, index)
}

/// Directory receiving the images and the manifest of one run.
#[derive(Debug)]
pub struct OutputDir {
    root: PathBuf,
    stale_pattern: Regex,
}

impl OutputDir {
    /// Create the directory (and any missing parents) and remove the outputs
    /// of a previous run.
    ///
    /// Only files named like our images, plus the manifest, are removed.
    pub fn prepare<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let dir = Self {
            root,
            stale_pattern: Regex::new(r"^page\d+_image\d+\.png$").unwrap(),
        };
        dir.remove_stale()?;
        Ok(dir)
    }

    /// The directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where image `index` of page `page` goes.
    pub fn image_path(&self, page: u32, index: usize) -> PathBuf {
        self.root.join(image_file_name(page, index))
    }

    /// Where the manifest goes.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE_NAME)
    }

    /// Encode `image` as PNG at `path`.
    ///
    /// A partially written file is removed on failure.
    pub fn write_image(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        let result = image.save_with_format(path, ImageFormat::Png);
        if let Err(e) = result {
            if path.exists() {
                if let Err(remove_err) = fs::remove_file(path) {
                    log::warn!(
                        "Could not remove partial image {}: {}",
                        path.display(),
                        remove_err
                    );
                }
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Serialize the manifest and write it, replacing any previous one.
    pub fn write_manifest(&self, manifest: &Manifest) -> Result<PathBuf> {
        let path = self.manifest_path();
        fs::write(&path, manifest.to_json()?)?;
        Ok(path)
    }

    fn remove_stale(&self) -> Result<()> {
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name != MANIFEST_FILE_NAME && !self.stale_pattern.is_match(&name) {
                continue;
            }
            if !entry.file_type()?.is_file() {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => log::debug!("Removed stale output {}", name),
                Err(e) => log::warn!("Could not remove stale output {}: {}", name, e),
            }
        }
        Ok(())
    }
}
