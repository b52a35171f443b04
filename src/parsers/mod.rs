//! # 解析器模块
//!
//! - `html` - HTML文档解析、按 id 查找元素、提取文本内容

pub mod html;

// Re-export commonly used items for convenience
pub use html::{find_element_by_id, get_text_content, html_to_dom, page_to_dom};
