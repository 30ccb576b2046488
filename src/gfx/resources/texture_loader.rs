//! Asynchronous texture loading
//!
//! Image files are decoded off the event-loop thread. The event loop polls
//! for finished images once per frame and uploads them; until then the
//! material renders untextured. Failed loads are logged and dropped, there is
//! no retry and no cancellation.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::thread;

use futures::channel::oneshot;

use crate::error::{Result, SceneError};

/// Decoded RGBA8 pixels ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    /// Returns the image with neither side above `max_dimension`.
    ///
    /// Oversized images are downscaled keeping their aspect ratio. Images
    /// that already fit are borrowed as is. `None` for empty or malformed
    /// pixel data, which no texture can hold.
    pub fn fit_within(&self, max_dimension: u32) -> Option<Cow<'_, DecodedImage>> {
        let expected_len = self.width as usize * self.height as usize * 4;
        if self.width == 0
            || self.height == 0
            || max_dimension == 0
            || self.pixels.len() != expected_len
        {
            return None;
        }
        if self.width <= max_dimension && self.height <= max_dimension {
            return Some(Cow::Borrowed(self));
        }

        let scale = max_dimension as f64 / self.width.max(self.height) as f64;
        let width = ((self.width as f64 * scale).round() as u32).clamp(1, max_dimension);
        let height = ((self.height as f64 * scale).round() as u32).clamp(1, max_dimension);

        let source = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())?;
        let resized =
            image::imageops::resize(&source, width, height, image::imageops::FilterType::Triangle);

        Some(Cow::Owned(DecodedImage {
            pixels: resized.into_raw(),
            width,
            height,
        }))
    }

    /// Full mip chain starting with this image and halving down to 1x1.
    ///
    /// Expects well-formed pixel data, see [`DecodedImage::fit_within`].
    pub fn mip_chain(&self) -> Vec<DecodedImage> {
        let mut levels = vec![self.clone()];
        loop {
            let Some(previous) = levels.last() else {
                break;
            };
            if previous.width == 1 && previous.height == 1 {
                break;
            }
            let Some(source) =
                image::RgbaImage::from_raw(previous.width, previous.height, previous.pixels.clone())
            else {
                break;
            };
            let width = (previous.width / 2).max(1);
            let height = (previous.height / 2).max(1);
            let smaller =
                image::imageops::resize(&source, width, height, image::imageops::FilterType::Triangle);
            levels.push(DecodedImage {
                pixels: smaller.into_raw(),
                width,
                height,
            });
        }
        levels
    }
}

/// Decodes an image file into RGBA8.
pub fn decode_image(path: &Path) -> Result<DecodedImage> {
    let image = image::open(path).map_err(|source| SceneError::TextureDecode {
        path: path.display().to_string(),
        source,
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

struct PendingTexture {
    path: PathBuf,
    receiver: oneshot::Receiver<Result<DecodedImage>>,
}

/// Fire-and-forget texture requests
#[derive(Default)]
pub struct TextureLoader {
    pending: Vec<PendingTexture>,
}

impl TextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts decoding `path` on a worker thread.
    pub fn request(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();
        let worker_path = path.clone();

        let spawned = thread::Builder::new()
            .name("texture-decode".to_string())
            .spawn(move || {
                // The receiver may already be gone; nothing to report then
                let _ = sender.send(decode_image(&worker_path));
            });

        match spawned {
            Ok(_) => {
                log::debug!("Loading texture {}", path.display());
                self.pending.push(PendingTexture { path, receiver });
            }
            Err(err) => {
                log::warn!("Could not start loading {}: {}", path.display(), err);
            }
        }
    }

    /// Number of requests still in flight
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Collects every texture that finished decoding since the last poll.
    ///
    /// Never blocks. Failed decodes are logged and removed.
    pub fn poll(&mut self) -> Vec<(PathBuf, DecodedImage)> {
        let mut ready = Vec::new();

        self.pending.retain_mut(|pending| match pending.receiver.try_recv() {
            Ok(None) => true,
            Ok(Some(Ok(image))) => {
                log::info!(
                    "Loaded texture {} ({}x{})",
                    pending.path.display(),
                    image.width,
                    image.height
                );
                ready.push((pending.path.clone(), image));
                false
            }
            Ok(Some(Err(err))) => {
                log::warn!("{}; rendering untextured", err);
                false
            }
            Err(oneshot::Canceled) => {
                log::warn!(
                    "Texture worker for {} exited without a result",
                    pending.path.display()
                );
                false
            }
        });

        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn poll_until_idle(loader: &mut TextureLoader) -> Vec<(PathBuf, DecodedImage)> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut ready = Vec::new();
        while loader.pending_count() > 0 && Instant::now() < deadline {
            ready.extend(loader.poll());
            thread::sleep(Duration::from_millis(5));
        }
        ready
    }

    #[test]
    fn decodes_png_on_worker_thread() {
        let path = std::env::temp_dir().join(format!("tinyscene-loader-{}.png", std::process::id()));
        image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let mut loader = TextureLoader::new();
        loader.request(&path);
        let ready = poll_until_idle(&mut loader);
        let _ = std::fs::remove_file(&path);

        assert_eq!(ready.len(), 1);
        let (loaded_path, image) = &ready[0];
        assert_eq!(loaded_path, &path);
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.pixels.len(), 4 * 2 * 4);
        assert_eq!(&image.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn missing_file_is_dropped_without_result() {
        let mut loader = TextureLoader::new();
        loader.request("definitely/not/here.jpg");
        let ready = poll_until_idle(&mut loader);

        assert!(ready.is_empty());
        assert_eq!(loader.pending_count(), 0);
    }

    fn solid(width: u32, height: u32) -> DecodedImage {
        DecodedImage {
            pixels: [200, 100, 50, 255].repeat((width * height) as usize),
            width,
            height,
        }
    }

    #[test]
    fn image_within_limit_is_borrowed() {
        let image = solid(512, 512);
        let fitted = image.fit_within(4096).unwrap();
        assert!(matches!(fitted, Cow::Borrowed(_)));
        assert_eq!((fitted.width, fitted.height), (512, 512));

        let edge = solid(4096, 1);
        assert!(matches!(edge.fit_within(4096).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn oversized_image_is_downscaled_to_the_limit() {
        let image = solid(2048, 512);
        let fitted = image.fit_within(1024).unwrap();

        assert!(matches!(fitted, Cow::Owned(_)));
        assert_eq!((fitted.width, fitted.height), (1024, 256));
        assert_eq!(fitted.pixels.len(), 1024 * 256 * 4);
        for (got, want) in fitted.pixels[..4].iter().zip([200u8, 100, 50, 255]) {
            assert!(got.abs_diff(want) <= 1, "{} vs {}", got, want);
        }
    }

    #[test]
    fn tall_image_keeps_at_least_one_pixel_wide() {
        let image = solid(1, 3000);
        let fitted = image.fit_within(1024).unwrap();
        assert_eq!((fitted.width, fitted.height), (1, 1024));
    }

    #[test]
    fn empty_or_malformed_image_cannot_be_uploaded() {
        assert!(solid(0, 0).fit_within(4096).is_none());

        let mut truncated = solid(4, 4);
        truncated.pixels.pop();
        assert!(truncated.fit_within(4096).is_none());
    }

    #[test]
    fn mip_chain_halves_down_to_one_pixel() {
        let levels = solid(512, 128).mip_chain();
        let sizes: Vec<(u32, u32)> = levels.iter().map(|l| (l.width, l.height)).collect();

        assert_eq!(sizes.len(), 10);
        assert_eq!(sizes[0], (512, 128));
        assert_eq!(sizes[1], (256, 64));
        assert_eq!(sizes[7], (4, 1));
        assert_eq!(sizes[9], (1, 1));
        for level in &levels {
            assert_eq!(level.pixels.len(), (level.width * level.height * 4) as usize);
        }
    }

    #[test]
    fn single_pixel_has_one_level() {
        assert_eq!(solid(1, 1).mip_chain().len(), 1);
    }

    #[test]
    fn decode_error_names_the_file() {
        let err = decode_image(Path::new("missing.png")).unwrap_err();
        assert!(err.to_string().contains("missing.png"));
    }
}
