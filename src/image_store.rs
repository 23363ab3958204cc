//! Loading the certificate template and writing finished certificates.

use std::path::Path;

use image::{ImageError, ImageFormat, ImageReader, RgbaImage};

use crate::error::{CertError, Result};

/// Decode a raster image (format sniffed from its content) as RGBA8.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let path = path.as_ref();
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| CertError::io(path, e))?;

    let decoded = reader.decode().map_err(|e| match e {
        ImageError::IoError(source) => CertError::io(path, source),
        source => CertError::Decode {
            path: path.to_path_buf(),
            source,
        },
    })?;

    Ok(decoded.into_rgba8())
}

/// Encode `img` as PNG, creating or truncating the file at `path`.
pub fn save_png(path: impl AsRef<Path>, img: &RgbaImage) -> Result<()> {
    let path = path.as_ref();
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| match e {
            ImageError::IoError(source) => CertError::io(path, source),
            source => CertError::Encode {
                path: path.to_path_buf(),
                source,
            },
        })
}
