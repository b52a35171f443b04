//! 转义格式处理
//!
//! Sangtacviet 在一整段文本里用 `$` 标记每个条目的开头，
//! 这里负责去掉这些标记，并在导出时还原成纯换行分隔的文本。
//! Wikidich 的内容本身就是按行分隔的，两个方向都原样返回。

use crate::sites::SiteVariant;

/// 条目标记字符
pub const MARKER: char = '$';

/// Removes the entry markers from a raw content block.
///
/// Every run of markers at the start of a line is dropped, so the operation is idempotent:
/// a block that was already (partially) stripped upstream comes out the same.
pub fn strip_escaping(raw: &str, variant: SiteVariant) -> String {
    if !variant.uses_marker_escaping() {
        return raw.to_string();
    }

    raw.split('\n')
        .map(|line| line.trim_start_matches(MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rebuilds the downloadable text from stored content.
///
/// Drops a leading marker, turns `"\n$"` into a newline and then any remaining bare marker
/// into a newline as well, so entries glued together by markers end up on their own lines.
pub fn reapply_escaping(content: &str, variant: SiteVariant) -> String {
    if !variant.uses_marker_escaping() {
        return content.to_string();
    }

    let body = content.strip_prefix(MARKER).unwrap_or(content);
    body.replace("\n$", "\n").replace(MARKER, "\n")
}
