//! Face textures
//!
//! Images are decoded off the UI thread and collected by the render loop as
//! they arrive. A face whose image fails to load keeps the base color.

use std::path::{Path, PathBuf};

use shared::FaceSlot;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::state::TextureSettings;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// RGBA8 pixels ready for upload, rows ordered bottom to top
#[derive(Debug, Clone)]
pub struct DecodedTexture {
    pub slot: FaceSlot,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode an image file for a face slot.
/// Rows are flipped so that `v = 0` samples the bottom of the image.
pub fn decode_texture(slot: FaceSlot, path: &Path) -> Result<DecodedTexture, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.flipv().to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedTexture {
        slot,
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

type LoadResult = (FaceSlot, Result<DecodedTexture, TextureError>);

/// Background texture decoding for every configured face
pub struct TextureLoader {
    rx: mpsc::UnboundedReceiver<LoadResult>,
    pending: usize,
}

impl TextureLoader {
    pub fn spawn(runtime: &Handle, settings: &TextureSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut pending = 0;
        for (slot, path) in settings.sources() {
            let tx = tx.clone();
            let path = path.to_path_buf();
            runtime.spawn_blocking(move || {
                let result = decode_texture(slot, &path);
                let _ = tx.send((slot, result));
            });
            pending += 1;
        }
        if pending > 0 {
            tracing::info!("Loading {pending} face textures");
        }
        Self { rx, pending }
    }

    /// Textures finished since the last poll. Failures are logged and dropped.
    pub fn poll(&mut self) -> Vec<DecodedTexture> {
        let mut ready = Vec::new();
        while let Ok((slot, result)) = self.rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            match result {
                Ok(texture) => {
                    tracing::info!(
                        "Texture for {} face loaded ({}x{})",
                        slot.label(),
                        texture.width,
                        texture.height
                    );
                    ready.push(texture);
                }
                Err(e) => {
                    tracing::warn!("{e}; {} face stays untextured", slot.label());
                }
            }
        }
        ready
    }

    pub fn pending(&self) -> usize {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut img = image::RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_decode_flips_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "face.png");
        let texture = decode_texture(FaceSlot::Front, &path).unwrap();
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(texture.rgba.len(), 16);
        // top-left red pixel ends up in the last row
        assert_eq!(&texture.rgba[8..12], &[255, 0, 0, 255]);
        assert_eq!(&texture.rgba[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_missing_file() {
        let err = decode_texture(FaceSlot::Top, Path::new("/nonexistent/top.png")).unwrap_err();
        assert!(matches!(err, TextureError::Read { .. }));
    }

    #[test]
    fn test_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = decode_texture(FaceSlot::Top, &path).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_loader_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = TextureSettings::default();
        settings.paths[FaceSlot::Top.index()] = Some(write_png(dir.path(), "top.png"));
        settings.paths[FaceSlot::Left.index()] = Some(dir.path().join("missing.png"));

        let mut loader = TextureLoader::spawn(&Handle::current(), &settings);
        assert_eq!(loader.pending(), 2);

        let mut ready = Vec::new();
        for _ in 0..200 {
            ready.extend(loader.poll());
            if loader.pending() == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(loader.pending(), 0);
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].slot, FaceSlot::Top);
    }
}
