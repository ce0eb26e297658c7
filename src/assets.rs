//! Asset loading – logos and fonts arrive as base64 `data:` URIs or file
//! paths. Loading never fails hard; a missing asset is logged and skipped.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};

use crate::template::Quality;

/// Source of binary assets referenced by a template.
pub trait AssetLoader {
    /// Bytes at `location`, or `None` when it cannot be read.
    fn load(&self, location: &str) -> Option<Vec<u8>>;
}

/// Loads `data:` URIs inline and everything else from disk, relative to
/// `root`.
#[derive(Debug, Clone, Default)]
pub struct FsAssetLoader {
    pub root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AssetLoader for FsAssetLoader {
    fn load(&self, location: &str) -> Option<Vec<u8>> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }
        if location.starts_with("data:") {
            return decode_or_warn(location);
        }
        let path = self.resolve(location);
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("Skipping asset {} — {e}", path.display());
                None
            }
        }
    }
}

/// Async variant of [`FsAssetLoader::load`].
#[cfg(feature = "async")]
pub async fn load_asset_async(loader: &FsAssetLoader, location: &str) -> Option<Vec<u8>> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }
    if location.starts_with("data:") {
        return decode_or_warn(location);
    }
    let path = loader.resolve(location);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Skipping asset {} — {e}", path.display());
            None
        }
    }
}

fn decode_or_warn(uri: &str) -> Option<Vec<u8>> {
    match parse_data_uri(uri) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Skipping asset — {e}");
            None
        }
    }
}

/// Decode a `data:<mime>;base64,<data>` URI.
pub fn parse_data_uri(src: &str) -> Result<Vec<u8>, String> {
    let Some(rest) = src.strip_prefix("data:") else {
        let preview: String = src.chars().take(80).collect();
        return Err(format!("not a data URI: {preview:?}"));
    };
    let comma_pos = rest
        .find(',')
        .ok_or_else(|| "Invalid data URI: missing `,` separator between header and data".to_string())?;
    let header = &rest[..comma_pos];
    if !header.contains(";base64") {
        return Err("Only base64-encoded data URIs are supported".to_string());
    }
    BASE64_STD
        .decode(rest[comma_pos + 1..].trim())
        .map_err(|e| format!("Base64 decode error: {e}"))
}

/// Downscale a logo to the raster budget of `quality` and re-encode it as
/// PNG. `High` keeps the source bytes. `None` when the bytes do not decode.
pub fn prepare_logo(bytes: &[u8], quality: Quality) -> Option<Vec<u8>> {
    let img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Skipping logo — decode error: {e}");
            return None;
        }
    };
    let Some(max_edge) = quality.max_image_edge() else {
        return Some(bytes.to_vec());
    };
    let img = if img.width().max(img.height()) > max_edge {
        log::debug!(
            "Downscaling logo {}x{} to fit {max_edge}px",
            img.width(),
            img.height()
        );
        img.thumbnail(max_edge, max_edge)
    } else {
        img
    };
    let mut out = Vec::new();
    match img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png) {
        Ok(()) => Some(out),
        Err(e) => {
            log::warn!("Skipping logo — encode error: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([149, 71, 255])));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png).unwrap();
        out
    }

    #[test]
    fn loads_data_uri() {
        let uri = format!("data:image/png;base64,{}", BASE64_STD.encode(b"hello"));
        assert_eq!(FsAssetLoader::default().load(&uri), Some(b"hello".to_vec()));
    }

    #[test]
    fn rejects_non_base64_data_uri() {
        assert!(parse_data_uri("data:text/plain,hello").is_err());
        assert!(FsAssetLoader::default().load("data:text/plain,hello").is_none());
    }

    #[test]
    fn loads_relative_paths_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.png"), b"bytes").unwrap();
        let loader = FsAssetLoader::new(dir.path());
        assert_eq!(loader.load("logo.png"), Some(b"bytes".to_vec()));
        assert_eq!(loader.load("missing.png"), None);
        assert_eq!(loader.load("  "), None);
    }

    #[test]
    fn logo_respects_quality_budget() {
        let source = png(1024, 512);
        let draft = prepare_logo(&source, Quality::Draft).unwrap();
        let draft = image::load_from_memory(&draft).unwrap();
        assert_eq!((draft.width(), draft.height()), (256, 128));

        let standard = image::load_from_memory(&prepare_logo(&source, Quality::Standard).unwrap()).unwrap();
        assert_eq!(standard.width(), 512);

        assert_eq!(prepare_logo(&source, Quality::High).unwrap(), source);
    }

    #[test]
    fn small_logo_is_not_upscaled() {
        let out = prepare_logo(&png(40, 20), Quality::Draft).unwrap();
        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (40, 20));
    }

    #[test]
    fn undecodable_logo_is_none() {
        assert!(prepare_logo(b"not an image", Quality::Standard).is_none());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn async_loader_matches_sync() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.bin"), [1u8, 2, 3]).unwrap();
        let loader = FsAssetLoader::new(dir.path());
        assert_eq!(load_asset_async(&loader, "a.bin").await, loader.load("a.bin"));
        assert_eq!(load_asset_async(&loader, "nope.bin").await, None);
    }
}
