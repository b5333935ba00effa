//! 文本清洗
//! 固定敏感词表的整词替换（大小写不敏感）

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// 需要替换的词表
static PROFANE_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["kerfuffle", "sharbert", "fornax"].into_iter().collect());

const REDACTED: &str = "****";

/// 将敏感词整词替换为 "****"
///
/// 只匹配完整的空白分隔单词；带标点的变体不替换。
pub fn clean(body: &str) -> String {
    body.split_whitespace()
        .map(|word| {
            if PROFANE_WORDS.contains(word.to_lowercase().as_str()) {
                REDACTED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_listed_words() {
        assert_eq!(clean("hello kerfuffle"), "hello ****");
        assert_eq!(clean("sharbert fornax"), "**** ****");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(clean("Kerfuffle opinion"), "**** opinion");
        assert_eq!(clean("SHARBERT"), "****");
    }

    #[test]
    fn test_punctuated_words_kept() {
        assert_eq!(clean("kerfuffle!"), "kerfuffle!");
    }

    #[test]
    fn test_clean_text_unchanged() {
        assert_eq!(clean("I had something interesting for breakfast"),
            "I had something interesting for breakfast");
    }
}
