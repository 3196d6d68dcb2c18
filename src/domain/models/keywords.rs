// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use tracing::warn;

/// 默认关键词：申请、信贷、金融、贷款、报价与电商相关短语
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "apply now",
    "apply online",
    "apply",
    "credit application",
    "credit app",
    "finance application",
    "financing application",
    "get approved",
    "get pre-approved",
    "pre-approved",
    "pre-approval",
    "pre-qualify",
    "prequalify",
    "get prequalified",
    "financing",
    "finance",
    "auto loan",
    "car loan",
    "loan",
    "credit",
    "payment calculator",
    "get a quote",
    "request a quote",
    "quote",
    "buy now",
    "shop now",
    "add to cart",
    "checkout",
];

/// 默认链接触发词：决定首页上哪些链接值得跟进
pub const DEFAULT_LINK_TRIGGERS: &[&str] = &[
    "finance",
    "financing",
    "credit",
    "apply",
    "approval",
    "approved",
    "loan",
    "qualify",
    "inventory",
    "shop",
    "quote",
];

/// 有序短语集合
///
/// 全部小写、去重并保留插入顺序，保证迭代结果确定。集合永不为空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseSet {
    phrases: Vec<String>,
}

impl PhraseSet {
    /// 规范化一组短语；结果为空时返回 `None`
    pub fn new<I, S>(phrases: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .filter(|p| seen.insert(p.clone()))
            .collect();

        if phrases.is_empty() {
            None
        } else {
            Some(Self { phrases })
        }
    }

    /// 内置列表，已是小写且无重复
    fn builtin(defaults: &[&str]) -> Self {
        Self {
            phrases: defaults.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// 使用覆盖列表构建，覆盖为空或缺失时回退到内置默认值
    fn with_override(overrides: Option<&[String]>, defaults: &[&str], label: &str) -> Self {
        let configured = overrides.and_then(|list| {
            let set = Self::new(list);
            if set.is_none() {
                warn!(
                    "Configured {} list is empty after normalization, falling back to defaults",
                    label
                );
            }
            set
        });
        configured.unwrap_or_else(|| Self::builtin(defaults))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.iter().any(|p| p == phrase)
    }

    /// 返回出现在（已小写的）文本中的所有短语
    pub fn found_in<'a>(&'a self, haystack: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |p| haystack.contains(p))
    }

    /// 文本是否包含任一短语
    pub fn any_in(&self, haystack: &str) -> bool {
        self.iter().any(|p| haystack.contains(p))
    }

    /// 按集合顺序排列命中短语，同时去重
    pub fn ordered(&self, hits: &HashSet<String>) -> Vec<String> {
        self.phrases
            .iter()
            .filter(|p| hits.contains(p.as_str()))
            .cloned()
            .collect()
    }
}

/// 关键词集合
pub type KeywordSet = PhraseSet;

/// 链接触发词集合
pub type LinkTriggerSet = PhraseSet;

/// 关键词注册表
///
/// 进程生命周期内不可变，持有关键词与链接触发词两个集合
#[derive(Debug, Clone)]
pub struct KeywordRegistry {
    keywords: KeywordSet,
    link_triggers: LinkTriggerSet,
}

impl KeywordRegistry {
    /// 根据配置构建注册表
    ///
    /// # 参数
    ///
    /// * `keywords` - 关键词覆盖列表
    /// * `link_triggers` - 链接触发词覆盖列表
    pub fn from_overrides(keywords: Option<&[String]>, link_triggers: Option<&[String]>) -> Self {
        Self {
            keywords: PhraseSet::with_override(keywords, DEFAULT_KEYWORDS, "keyword"),
            link_triggers: PhraseSet::with_override(
                link_triggers,
                DEFAULT_LINK_TRIGGERS,
                "link trigger",
            ),
        }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn link_triggers(&self) -> &LinkTriggerSet {
        &self.link_triggers
    }
}

impl Default for KeywordRegistry {
    fn default() -> Self {
        Self::from_overrides(None, None)
    }
}
