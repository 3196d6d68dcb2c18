// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::CrawlSession;
use crate::domain::models::scan_result::PageScanResult;

/// 会话结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionVerdict {
    /// 是否存在任一命中页面
    pub has_credit_app: bool,
    /// 仅包含命中页面，按访问顺序
    pub hits: Vec<PageScanResult>,
}

/// 匹配聚合器
pub struct MatchAggregator;

impl MatchAggregator {
    pub fn aggregate(session: &CrawlSession) -> SessionVerdict {
        let hits: Vec<PageScanResult> = session
            .results()
            .iter()
            .filter(|result| result.has_match())
            .cloned()
            .collect();

        SessionVerdict {
            has_credit_app: !hits.is_empty(),
            hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_positive_results_are_kept() {
        let mut session = CrawlSession::new("dealer.test", "https://dealer.test/");
        session.push_result(PageScanResult::scanned("https://dealer.test/", vec![], true));
        session.push_result(PageScanResult::failed("https://dealer.test/a", "fetch error: boom", false));
        session.push_result(PageScanResult::scanned(
            "https://dealer.test/finance",
            vec!["finance".to_string()],
            false,
        ));

        let verdict = MatchAggregator::aggregate(&session);

        assert!(verdict.has_credit_app);
        assert_eq!(verdict.hits.len(), 1);
        assert_eq!(verdict.hits[0].url(), "https://dealer.test/finance");
    }

    #[test]
    fn test_empty_session_has_no_credit_app() {
        let session = CrawlSession::new("dealer.test", "https://dealer.test/");

        let verdict = MatchAggregator::aggregate(&session);

        assert!(!verdict.has_credit_app);
        assert!(verdict.hits.is_empty());
    }
}
