//! 导出
//!
//! 把名称包还原成用户下载的文件内容和文件名。

use std::fs;
use std::path::{Path, PathBuf};

use super::escaping::reapply_escaping;
use super::package::{NamePackage, SourceIdentifier};
use crate::core::{NamepackError, NamepackResult};
use crate::sites::SiteVariant;

const FILTERED_SUFFIX: &str = "_FILTERED_STV.txt";
const ORIGINAL_SUFFIX: &str = "_ORIGINAL_STV.txt";
const WIKIDICH_FALLBACK_SLUG: &str = "wikidich";

/// 导出文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
}

impl ExportFile {
    pub fn bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Rebuilds the downloadable file for a package.
///
/// Asking for the original of a package that has none yields the filtered content under the
/// original filename.
pub fn export_package(package: &NamePackage, use_original: bool) -> ExportFile {
    match package.site() {
        SiteVariant::Sangtacviet => {
            let selected = if use_original {
                package
                    .original_content()
                    .unwrap_or_else(|| package.filtered_content())
            } else {
                package.filtered_content()
            };
            let suffix = if use_original {
                ORIGINAL_SUFFIX
            } else {
                FILTERED_SUFFIX
            };

            ExportFile {
                filename: format!("{}{}", sanitize_title(package.title()), suffix),
                content: reapply_escaping(selected, SiteVariant::Sangtacviet),
            }
        }
        SiteVariant::Wikidich => {
            let slug = match package.source_identifier() {
                SourceIdentifier::Slug(slug) => sanitize_title(slug),
                SourceIdentifier::Ordinal(index) => index.to_string(),
            };
            let slug = if slug.is_empty() {
                WIKIDICH_FALLBACK_SLUG.to_string()
            } else {
                slug
            };

            ExportFile {
                filename: format!("Names_{slug}_.txt"),
                content: package.filtered_content().to_string(),
            }
        }
    }
}

/// Makes a title safe to use as a file name
pub fn sanitize_title(title: &str) -> String {
    title
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect::<String>()
        .replace(['/', '\\'], "_")
        .replace('<', "[")
        .replace('>', "]")
        .replace(':', "-")
        .replace(['"', '?', '*'], "")
        .replace('|', "-")
        .trim_start_matches('.')
        .to_string()
}

/// 文件保存能力
pub trait FileSink {
    fn save(&self, bytes: &[u8], filename: &str) -> NamepackResult<()>;
}

/// Writes exports into a directory on disk
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl FileSink for DirectorySink {
    fn save(&self, bytes: &[u8], filename: &str) -> NamepackResult<()> {
        let path = self.path_for(filename);
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&path, bytes))
            .map_err(|e| {
                NamepackError::IoError(format!("{}: {e}", path.display()))
            })?;
        tracing::info!("saved {}", path.display());
        Ok(())
    }
}

/// Exports a package and hands it to the sink, returning the file name used
pub fn save_export<S>(sink: &S, package: &NamePackage, use_original: bool) -> NamepackResult<String>
where
    S: FileSink + ?Sized,
{
    let file = export_package(package, use_original);
    sink.save(file.bytes(), &file.filename)?;
    Ok(file.filename)
}
