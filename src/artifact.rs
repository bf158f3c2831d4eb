//! Rendered artifacts: the byte blobs the composers hand back.
//!
//! An artifact is created fresh per request, returned to the caller, and
//! never mutated afterwards. Storage names embed a v4 UUID so concurrent
//! calls cannot collide in a shared output directory; no locking is needed
//! because no artifact is ever rewritten.

use crate::error::ComposeError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Media type of a rendered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Png,
}

impl MediaType {
    /// MIME type string for HTTP responses.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Png => "image/png",
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Pdf => "pdf",
            MediaType::Png => "png",
        }
    }
}

/// A finished document or image, in memory.
///
/// Two names travel with the bytes:
/// * [`download_name`](Self::download_name) — the human-facing suggested
///   filename (`Devis_Awa.pdf`, `Promo_Chez_Awa.png`);
/// * [`storage_name`](Self::storage_name) — prefix + UUID, collision-free
///   for the shared output directory.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    id: Uuid,
    media_type: MediaType,
    prefix: String,
    download_name: String,
    bytes: Vec<u8>,
}

impl RenderedArtifact {
    /// Wrap finished bytes. `prefix` is the human-readable storage prefix
    /// (e.g. "devis", "promo"); `download_stem` becomes the suggested
    /// filename after sanitisation.
    pub fn new(
        media_type: MediaType,
        prefix: impl Into<String>,
        download_stem: &str,
        bytes: Vec<u8>,
    ) -> Self {
        let media = media_type;
        Self {
            id: Uuid::new_v4(),
            media_type: media,
            prefix: prefix.into(),
            download_name: format!("{}.{}", sanitize_stem(download_stem), media.extension()),
            bytes,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Suggested filename for a download response.
    pub fn download_name(&self) -> &str {
        &self.download_name
    }

    /// Collision-free on-disk filename: `<prefix>_<uuid>.<ext>`.
    pub fn storage_name(&self) -> String {
        format!("{}_{}.{}", self.prefix, self.id, self.media_type.extension())
    }

    /// Persist the artifact into `dir` under its storage name.
    ///
    /// Uses atomic write (temp file + rename) so a crash never leaves a
    /// partial artifact behind. Creates `dir` if missing.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ComposeError> {
        std::fs::create_dir_all(dir).map_err(|e| ComposeError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = dir.join(self.storage_name());
        let tmp_path = path.with_extension(format!("{}.tmp", self.media_type.extension()));

        std::fs::write(&tmp_path, &self.bytes).map_err(|e| ComposeError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp_path, &path).map_err(|e| ComposeError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

        Ok(path)
    }
}

/// Replace filesystem-hostile characters in a filename stem.
///
/// Accented letters are kept (they are valid in filenames and common in the
/// client names this tool sees); separators and control characters become
/// underscores, with runs collapsed.
pub(crate) fn sanitize_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut last_was_sep = false;
    for c in stem.chars() {
        let keep = c.is_alphanumeric() || c == '-' || c == '.';
        if keep {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep && !out.is_empty() {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        "document".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_names_are_distinct() {
        let a = RenderedArtifact::new(MediaType::Pdf, "devis", "Devis_Awa", vec![1]);
        let b = RenderedArtifact::new(MediaType::Pdf, "devis", "Devis_Awa", vec![2]);
        assert_ne!(a.storage_name(), b.storage_name());
    }

    #[test]
    fn download_name_is_sanitised() {
        let a = RenderedArtifact::new(MediaType::Png, "promo", "Promo_Chez Awa / fils", vec![]);
        assert_eq!(a.download_name(), "Promo_Chez_Awa_fils.png");
    }

    #[test]
    fn download_name_keeps_accents() {
        let a = RenderedArtifact::new(MediaType::Pdf, "devis", "Devis_Aïcha", vec![]);
        assert_eq!(a.download_name(), "Devis_Aïcha.pdf");
    }

    #[test]
    fn empty_stem_falls_back() {
        let a = RenderedArtifact::new(MediaType::Pdf, "devis", "///", vec![]);
        assert_eq!(a.download_name(), "document.pdf");
    }

    #[test]
    fn write_to_dir_creates_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let a = RenderedArtifact::new(MediaType::Pdf, "devis", "Devis_Awa", b"%PDF-1.7".to_vec());
        let path = a.write_to_dir(&dir.path().join("out")).unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
    }
}
