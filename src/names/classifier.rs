//! 字符分类
//!
//! 判断字符是否属于中文统一表意文字区块，以及单词是否首字母大写。

/// CJK Unified Ideographs block.
const TARGET_SCRIPT_RANGE: std::ops::RangeInclusive<char> = '\u{4e00}'..='\u{9fff}';

/// 检查字符是否为中文字符（U+4E00–U+9FFF）
pub fn is_target_script_char(ch: char) -> bool {
    TARGET_SCRIPT_RANGE.contains(&ch)
}

/// 统计字符串中的中文字符数量
pub fn count_target_script_chars(text: &str) -> usize {
    text.chars().filter(|&c| is_target_script_char(c)).count()
}

/// Checks whether a word starts with an upper-case letter.
///
/// The first character must have distinct upper and lower forms and currently be in the
/// upper form. Digits, punctuation and caseless scripts are never capitalized.
pub fn is_capitalized_word(word: &str) -> bool {
    let Some(first) = word.chars().next() else {
        return false;
    };

    let upper: String = first.to_uppercase().collect();
    let lower: String = first.to_lowercase().collect();

    upper != lower && upper.chars().eq(std::iter::once(first))
}

/// 检查文本中是否至少有一个首字母大写的单词
pub fn has_capitalized_word(text: &str) -> bool {
    text.split_whitespace().any(is_capitalized_word)
}
