//! HTML解析和处理模块
//!
//! - `dom`: 解析文档、识别页面编码和基础DOM操作

pub mod dom;

pub use dom::{
    charset_from_content_type, find_element_by_id, get_charset, get_node_attr, get_node_name,
    get_text_content, html_to_dom, page_to_dom,
};
