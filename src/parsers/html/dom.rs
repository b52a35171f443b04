use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::core::{NamepackError, NamepackResult};

/// 将 HTML 字节转换为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> NamepackResult<RcDom> {
    let s: String = if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        string.into_owned()
    } else {
        String::from_utf8_lossy(data).into_owned()
    };

    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())
        .map_err(|e| NamepackError::ParseError(format!("failed to parse HTML: {e}")))
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Extracts the `charset` parameter of a `Content-Type` value
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .map(str::trim)
        .find_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches('"').to_string())
        })
        .filter(|charset| !charset.is_empty())
}

/// 获取文档字符编码
///
/// 支持 `<meta charset="...">` 和 `<meta http-equiv="content-type" content="...; charset=...">`
pub fn get_charset(node: &Handle) -> Option<String> {
    if get_node_name(node) == Some("meta") {
        if let Some(charset) = get_node_attr(node, "charset") {
            return Some(charset);
        }
        if get_node_attr(node, "http-equiv")
            .unwrap_or_default()
            .eq_ignore_ascii_case("content-type")
        {
            if let Some(charset) =
                get_node_attr(node, "content").and_then(|c| charset_from_content_type(&c))
            {
                return Some(charset);
            }
        }
    }

    node.children.borrow().iter().find_map(get_charset)
}

/// 解析抓取到的页面
///
/// A charset declared by the server wins; otherwise the document is parsed as UTF-8 and
/// parsed again when its `<meta>` names another known encoding.
pub fn page_to_dom(data: &[u8], declared_charset: Option<&str>) -> NamepackResult<RcDom> {
    if let Some(encoding) =
        declared_charset.and_then(|label| Encoding::for_label_no_replacement(label.as_bytes()))
    {
        return html_to_dom(data, encoding.name());
    }

    let dom = html_to_dom(data, "utf-8")?;
    match get_charset(&dom.document)
        .and_then(|label| Encoding::for_label_no_replacement(label.as_bytes()))
    {
        Some(encoding) if encoding != encoding_rs::UTF_8 => {
            tracing::debug!("页面声明编码 {}，重新解析", encoding.name());
            html_to_dom(data, encoding.name())
        }
        _ => Ok(dom),
    }
}

/// 按 id 查找元素（深度优先，返回第一个匹配）
pub fn find_element_by_id(node: &Handle, id: &str) -> Option<Handle> {
    if get_node_attr(node, "id").as_deref() == Some(id) {
        return Some(node.clone());
    }

    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element_by_id(child, id))
}

/// Collects the text of every descendant text node, like the DOM's `textContent`
pub fn get_text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }

    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dom(html: &str) -> RcDom {
        html_to_dom(html.as_bytes(), "utf-8").unwrap()
    }

    #[test]
    fn test_find_element_by_id() {
        let dom = dom(r#"<html><body><div id="a"><span id="b">x</span></div></body></html>"#);
        let found = find_element_by_id(&dom.document, "b").unwrap();
        assert_eq!(get_node_name(&found), Some("span"));
        assert!(find_element_by_id(&dom.document, "missing").is_none());
    }

    #[test]
    fn test_text_content_of_nested_nodes() {
        let dom = dom(r#"<div id="list">林风=Lâm Phong<br><b>你好</b>=Xin</div>"#);
        let node = find_element_by_id(&dom.document, "list").unwrap();
        assert_eq!(get_text_content(&node), "林风=Lâm Phong你好=Xin");
    }

    #[test]
    fn test_textarea_keeps_raw_lines() {
        let dom = dom("<textarea id=\"ddListName\">林风=Lâm Phong\n你好=Xin &amp; chào</textarea>");
        let node = find_element_by_id(&dom.document, "ddListName").unwrap();
        assert_eq!(get_text_content(&node), "林风=Lâm Phong\n你好=Xin & chào");
    }

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(
            charset_from_content_type("text/html; charset=GBK").as_deref(),
            Some("GBK")
        );
        assert_eq!(
            charset_from_content_type("text/html;Charset=\"utf-8\"").as_deref(),
            Some("utf-8")
        );
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset="), None);
    }

    #[test]
    fn test_get_charset_from_meta() {
        let html5 = dom(r#"<html><head><meta charset="gb2312"></head></html>"#);
        assert_eq!(get_charset(&html5.document).as_deref(), Some("gb2312"));

        let html4 = dom(
            r#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=big5"></head></html>"#,
        );
        assert_eq!(get_charset(&html4.document).as_deref(), Some("big5"));

        assert_eq!(get_charset(&dom("<p>x</p>").document), None);
    }

    #[test]
    fn test_page_to_dom_follows_meta_charset() {
        let (bytes, _, _) = encoding_rs::GBK
            .encode("<html><head><meta charset=\"gbk\"></head><body><p id=\"x\">林风</p></body></html>");
        let dom = page_to_dom(&bytes, None).unwrap();
        let node = find_element_by_id(&dom.document, "x").unwrap();
        assert_eq!(get_text_content(&node), "林风");
    }

    #[test]
    fn test_page_to_dom_prefers_declared_charset() {
        let (bytes, _, _) = encoding_rs::GBK.encode("<p id=\"x\">你好</p>");
        let dom = page_to_dom(&bytes, Some("GBK")).unwrap();
        let node = find_element_by_id(&dom.document, "x").unwrap();
        assert_eq!(get_text_content(&node), "你好");

        let dom = page_to_dom("<p id=\"x\">你好</p>".as_bytes(), Some("no-such-charset")).unwrap();
        let node = find_element_by_id(&dom.document, "x").unwrap();
        assert_eq!(get_text_content(&node), "你好");
    }

    #[test]
    fn test_decode_with_legacy_encoding() {
        let (bytes, _, _) = encoding_rs::GBK.encode("<p id=\"x\">你好</p>");
        let dom = html_to_dom(&bytes, "gbk").unwrap();
        let node = find_element_by_id(&dom.document, "x").unwrap();
        assert_eq!(get_text_content(&node), "你好");
    }
}
