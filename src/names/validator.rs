//! 名称行校验
//!
//! 对 `中文=译名` 形式的单行应用启发式规则，决定保留还是过滤。

use std::collections::HashMap;
use std::fmt;

use super::classifier::{count_target_script_chars, has_capitalized_word};

/// 中文与译名之间的分隔符
pub const SEPARATOR: char = '=';

/// 单行校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

/// 过滤原因
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The line does not split into exactly two parts on the separator.
    WrongFormat { line: String },
    /// The source part holds exactly one CJK character.
    SingleTargetScriptChar { source: String },
    /// No word of the translation starts with a capital letter.
    NoCapitalizedWord { translation: String },
}

impl RejectReason {
    /// Short label without the quoted detail.
    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::WrongFormat { .. } => "wrong format",
            RejectReason::SingleTargetScriptChar { .. } => "single target-script character",
            RejectReason::NoCapitalizedWord { .. } => "no capitalized word in the translation",
        }
    }

    /// Stable identifier used for statistics and API payloads.
    pub fn kind(&self) -> RejectKind {
        match self {
            RejectReason::WrongFormat { .. } => RejectKind::WrongFormat,
            RejectReason::SingleTargetScriptChar { .. } => RejectKind::SingleTargetScriptChar,
            RejectReason::NoCapitalizedWord { .. } => RejectKind::NoCapitalizedWord,
        }
    }

    fn detail(&self) -> &str {
        match self {
            RejectReason::WrongFormat { line } => line,
            RejectReason::SingleTargetScriptChar { source } => source,
            RejectReason::NoCapitalizedWord { translation } => translation,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: \"{}\"", self.label(), self.detail())
    }
}

/// 过滤原因类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectKind {
    WrongFormat,
    SingleTargetScriptChar,
    NoCapitalizedWord,
}

impl RejectKind {
    pub const ALL: [RejectKind; 3] = [
        RejectKind::WrongFormat,
        RejectKind::SingleTargetScriptChar,
        RejectKind::NoCapitalizedWord,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectKind::WrongFormat => "wrong_format",
            RejectKind::SingleTargetScriptChar => "single_target_script_char",
            RejectKind::NoCapitalizedWord => "no_capitalized_word",
        }
    }
}

/// 被过滤的行及其原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntry {
    pub line: String,
    pub reason: RejectReason,
}

/// Applies the acceptance rule to one non-blank line.
///
/// Rule order matters: format first, then the single-character rule, then the
/// capitalization rule. A source part with zero CJK characters is not rejected by the
/// single-character rule.
pub fn validate_line(line: &str) -> Verdict {
    let parts: Vec<&str> = line.split(SEPARATOR).collect();
    if parts.len() != 2 {
        return Verdict::Rejected(RejectReason::WrongFormat {
            line: line.to_string(),
        });
    }

    let source = parts[0].trim();
    let translation = parts[1].trim();

    if count_target_script_chars(source) == 1 {
        return Verdict::Rejected(RejectReason::SingleTargetScriptChar {
            source: source.to_string(),
        });
    }

    if !has_capitalized_word(translation) {
        return Verdict::Rejected(RejectReason::NoCapitalizedWord {
            translation: translation.to_string(),
        });
    }

    Verdict::Accepted
}

/// 一个内容块的校验结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockValidation {
    /// Accepted lines, verbatim.
    pub accepted: Vec<String>,
    pub rejected: Vec<InvalidEntry>,
}

/// Splits normalized content into non-blank lines and validates each of them.
pub fn validate_block(content: &str) -> BlockValidation {
    let mut result = BlockValidation::default();

    for line in content.split('\n').filter(|l| !l.trim().is_empty()) {
        match validate_line(line) {
            Verdict::Accepted => result.accepted.push(line.to_string()),
            Verdict::Rejected(reason) => result.rejected.push(InvalidEntry {
                line: line.to_string(),
                reason,
            }),
        }
    }

    result
}

/// 校验统计
#[derive(Debug, Clone, Default)]
pub struct ValidationStats {
    pub total_lines: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub by_reason: HashMap<RejectKind, usize>,
}

impl ValidationStats {
    /// 记录通过数量和被过滤的条目
    pub fn record(&mut self, accepted: usize, rejected: &[InvalidEntry]) {
        self.total_lines += accepted + rejected.len();
        self.accepted += accepted;
        self.rejected += rejected.len();
        for entry in rejected {
            *self.by_reason.entry(entry.reason.kind()).or_insert(0) += 1;
        }
    }

    /// 获取通过率
    pub fn acceptance_rate(&self) -> f32 {
        if self.total_lines == 0 {
            0.0
        } else {
            self.accepted as f32 / self.total_lines as f32
        }
    }

    /// Non-zero rejection counts in rule order
    pub fn reason_counts(&self) -> Vec<(RejectKind, usize)> {
        RejectKind::ALL
            .iter()
            .filter_map(|kind| {
                self.by_reason
                    .get(kind)
                    .filter(|count| **count > 0)
                    .map(|count| (*kind, *count))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason_of(line: &str) -> Option<RejectKind> {
        match validate_line(line) {
            Verdict::Accepted => None,
            Verdict::Rejected(reason) => Some(reason.kind()),
        }
    }

    #[test]
    fn test_accepts_multi_char_name_with_capital() {
        assert_eq!(validate_line("你好=Xin chào"), Verdict::Accepted);
        assert_eq!(validate_line("  林风 = Lâm Phong  "), Verdict::Accepted);
    }

    #[test]
    fn test_wrong_format_for_any_separator_count_but_one() {
        let lines = ["你好", "你好==Xin", "a=b=c", "==", "no separator here", "林风=Lâm=Phong"];
        for line in lines {
            assert_eq!(reason_of(line), Some(RejectKind::WrongFormat), "line {:?}", line);
        }
    }

    #[test]
    fn test_wrong_format_quotes_line() {
        let verdict = validate_line("a=b=c");
        match verdict {
            Verdict::Rejected(reason) => {
                assert_eq!(reason.label(), "wrong format");
                assert_eq!(reason.to_string(), "wrong format: \"a=b=c\"");
            }
            Verdict::Accepted => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_single_target_char_wins_over_translation() {
        let translations = ["tôi", "Tôi", "", "A B C", "123"];
        for t in translations {
            let line = format!("我={}", t);
            assert_eq!(
                reason_of(&line),
                Some(RejectKind::SingleTargetScriptChar),
                "line {:?}",
                line
            );
        }
        assert_eq!(
            reason_of("x我y=Tôi"),
            Some(RejectKind::SingleTargetScriptChar)
        );
    }

    #[test]
    fn test_no_capitalized_word() {
        assert_eq!(
            reason_of("朋友你好=xin chào bạn"),
            Some(RejectKind::NoCapitalizedWord)
        );
        assert_eq!(reason_of("你好="), Some(RejectKind::NoCapitalizedWord));
    }

    #[test]
    fn test_capitalized_translation_never_hits_capitalization_rule() {
        let lines = ["你好=xin Chào", "ab=Lâm", "你好你好=a b C", "=Phong"];
        for line in lines {
            assert_ne!(
                reason_of(line),
                Some(RejectKind::NoCapitalizedWord),
                "line {:?}",
                line
            );
        }
    }

    #[test]
    fn test_zero_target_chars_still_checked_for_capitals() {
        assert_eq!(validate_line("abc=Lâm Phong"), Verdict::Accepted);
        assert_eq!(reason_of("abc=lâm phong"), Some(RejectKind::NoCapitalizedWord));
    }

    #[test]
    fn test_validate_block_scenario() {
        let block = validate_block("你好=Xin chào\n我=tôi\n朋友你好=xin chào bạn");
        assert_eq!(block.accepted, vec!["你好=Xin chào".to_string()]);
        assert_eq!(block.rejected.len(), 2);
        assert_eq!(block.rejected[0].line, "我=tôi");
        assert_eq!(
            block.rejected[0].reason.kind(),
            RejectKind::SingleTargetScriptChar
        );
        assert_eq!(
            block.rejected[1].reason.kind(),
            RejectKind::NoCapitalizedWord
        );
    }

    #[test]
    fn test_validate_block_skips_blank_lines_and_keeps_lines_verbatim() {
        let block = validate_block("\n  \n 你好 = Xin \n\t\n");
        assert!(block.rejected.is_empty());
        assert_eq!(block.accepted, vec![" 你好 = Xin ".to_string()]);
    }

    #[test]
    fn test_validation_stats() {
        let mut stats = ValidationStats::default();
        let block = validate_block("你好=Xin\n我=tôi\na=b=c\n林风=Lâm");
        stats.record(block.accepted.len(), &block.rejected);
        assert_eq!(stats.total_lines, 4);
        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.rejected, 2);
        assert_eq!(stats.by_reason.get(&RejectKind::WrongFormat), Some(&1));
        assert_eq!(
            stats.by_reason.get(&RejectKind::SingleTargetScriptChar),
            Some(&1)
        );
        assert!((stats.acceptance_rate() - 0.5).abs() < f32::EPSILON);
        assert_eq!(
            stats.reason_counts(),
            vec![
                (RejectKind::WrongFormat, 1),
                (RejectKind::SingleTargetScriptChar, 1)
            ]
        );
        assert_eq!(ValidationStats::default().acceptance_rate(), 0.0);
    }
}
