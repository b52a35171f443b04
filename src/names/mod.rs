//! 名称处理模块
//!
//! - `classifier`: 字符分类（汉字、首字母大写）
//! - `escaping`: `$` 标记的去除与还原
//! - `validator`: 逐行校验
//! - `package`: 名称包组装
//! - `export`: 导出文件

pub mod classifier;
pub mod escaping;
pub mod export;
pub mod package;
pub mod validator;

pub use export::{export_package, save_export, sanitize_title, DirectorySink, ExportFile, FileSink};
pub use package::{assemble_sangtacviet, assemble_wikidich, NamePackage, SourceIdentifier};
pub use validator::{validate_block, validate_line, InvalidEntry, RejectReason, Verdict};
