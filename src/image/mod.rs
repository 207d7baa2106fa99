pub mod fft;
pub mod loader;
pub mod preprocess;

use crate::error::Result;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use fft::Spectrum;
pub use loader::{DecodeMode, ImageData, Shape, TestPattern};
pub use preprocess::{Preprocess, ResampleFilter};

/// Where an [`Image`] takes its pixels from.
#[derive(Debug, Clone)]
pub enum ImageSource<'a> {
    /// Decode a file.
    Path(&'a Path, DecodeMode),
    /// Share the logical buffer of an existing container; nothing is re-decoded.
    Image(&'a Image),
    /// Take ownership of an already decoded buffer.
    Data(ImageData),
}

/// A named, immutable image taking part in a comparison.
///
/// The name is provenance only. Two containers with the same name are not
/// considered equal, and cloning is cheap because buffers are shared.
#[derive(Debug, Clone)]
pub struct Image {
    name: String,
    path: Option<PathBuf>,
    source: Arc<ImageData>,
    buffer: Arc<ImageData>,
    preprocess: Option<Preprocess>,
}

impl Image {
    /// Build a container, running `preprocess` once on the source buffer.
    pub fn new(
        source: ImageSource<'_>,
        name: impl Into<String>,
        preprocess: Option<Preprocess>,
    ) -> Result<Self> {
        let name = name.into();
        let (path, source) = match source {
            ImageSource::Path(path, mode) => (
                Some(path.to_path_buf()),
                Arc::new(ImageData::from_file(path, mode)?),
            ),
            ImageSource::Image(other) => (None, Arc::clone(&other.buffer)),
            ImageSource::Data(data) => (None, Arc::new(data)),
        };

        let buffer = match &preprocess {
            Some(step) => Arc::new(step.apply(&source)?),
            None => Arc::clone(&source),
        };

        debug!("Image '{}' ready with shape {}", name, buffer.shape());
        Ok(Self {
            name,
            path,
            source,
            buffer,
            preprocess,
        })
    }

    /// Decode a colour image from file.
    pub fn open<P: AsRef<Path>>(path: P, name: impl Into<String>) -> Result<Self> {
        Self::new(ImageSource::Path(path.as_ref(), DecodeMode::Color), name, None)
    }

    pub fn open_with<P: AsRef<Path>>(
        path: P,
        name: impl Into<String>,
        mode: DecodeMode,
        preprocess: Option<Preprocess>,
    ) -> Result<Self> {
        Self::new(ImageSource::Path(path.as_ref(), mode), name, preprocess)
    }

    /// Derive a new container from another one's logical buffer.
    pub fn derive(other: &Image, name: impl Into<String>, preprocess: Preprocess) -> Result<Self> {
        Self::new(ImageSource::Image(other), name, Some(preprocess))
    }

    pub fn from_data(
        data: ImageData,
        name: impl Into<String>,
        preprocess: Option<Preprocess>,
    ) -> Result<Self> {
        Self::new(ImageSource::Data(data), name, preprocess)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file this image was decoded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The logical buffer (after preprocessing).
    pub fn data(&self) -> &ImageData {
        &self.buffer
    }

    /// The buffer as it was before preprocessing.
    pub fn source(&self) -> &ImageData {
        &self.source
    }

    pub fn preprocess(&self) -> Option<&Preprocess> {
        self.preprocess.as_ref()
    }

    pub fn shape(&self) -> Shape {
        self.buffer.shape()
    }

    /// Spectrum of the logical buffer, recomputed on every call.
    pub fn spectrum(&self) -> Result<Spectrum> {
        fft::transform(&self.buffer)
    }

    /// Encode the logical buffer to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.buffer.save_to_file(path)
    }
}

/// Path of the super-resolved companion of `path`: `name.png` becomes
/// `name_sr.png` in the same directory. Returns `None` for other extensions.
pub fn sr_companion_path<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let path = path.as_ref();
    let stem = path.to_str()?.strip_suffix(".png")?;
    Some(PathBuf::from(format!("{stem}_sr.png")))
}
