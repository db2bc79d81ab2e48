use super::PassContext;
use crate::error::Result;
use crate::pagination::{next_page, total_count};
use futures::stream::{self, StreamExt};
use model::github::{Contributor, GitHubUser};
use std::collections::HashSet;
use tracing::debug;

const CONTRIBUTOR_PAGE_SIZE: u32 = 25;
const USER_LOOKUP_CONCURRENCY: usize = 4;

// 按顺序匹配, 单次扫描
const ORG_NOISE: [&str; 4] = ["inc.", "llc", "@", " "];

/// 全部贡献者数量 (含匿名)
pub async fn contributor_count(ctx: &PassContext<'_>) -> Result<u64> {
    let page = ctx
        .api
        .list_paged(
            &ctx.repo_endpoint("contributors"),
            &[("anon", "true".to_owned())],
            1,
            1,
        )
        .await?;
    Ok(total_count(&page))
}

/// 头部贡献者所属组织 (去重后) 的数量
pub async fn org_count(ctx: &PassContext<'_>) -> Result<u64> {
    Ok(contributor_orgs(ctx).await?.len() as u64)
}

pub async fn contributor_orgs(ctx: &PassContext<'_>) -> Result<HashSet<String>> {
    let top = ctx.settings.top_contributor_count;
    let endpoint = ctx.repo_endpoint("contributors");
    let query = [("anon", "false".to_owned())];

    let mut contributors: Vec<Contributor> = Vec::new();
    let mut page_number = 1;
    loop {
        let page = ctx
            .api
            .list_paged(&endpoint, &query, page_number, CONTRIBUTOR_PAGE_SIZE)
            .await?;
        contributors.extend(page.decode::<Contributor>()?);
        match next_page(&page) {
            Some(next) if contributors.len() <= top => page_number = next,
            _ => break,
        }
    }

    if contributors.len() > ctx.settings.contributor_cap {
        debug!(
            "{} contributors exceed the cap, using placeholder org count",
            contributors.len()
        );
        return Ok((0..ctx.settings.placeholder_org_count)
            .map(|i| i.to_string())
            .collect());
    }

    let logins: Vec<String> = contributors
        .into_iter()
        .filter_map(|c| c.login)
        .take(top)
        .collect();

    let companies: Vec<Option<String>> = stream::iter(logins)
        .map(|login| async move {
            let user = ctx.api.fetch_single(&format!("users/{}", login), &[]).await;
            match user.map(serde_json::from_value::<GitHubUser>) {
                Ok(Ok(user)) => user.company,
                Ok(Err(e)) => {
                    debug!("skipping user {}: {}", login, e);
                    None
                }
                Err(e) => {
                    debug!("skipping user {}: {}", login, e);
                    None
                }
            }
        })
        .buffer_unordered(USER_LOOKUP_CONCURRENCY)
        .collect()
        .await;

    // 只跳过未填写的 company; 归一化后为空串的 ("Inc.", "@") 计为同一个组织
    Ok(companies
        .into_iter()
        .flatten()
        .filter(|company| !company.is_empty())
        .map(|company| normalize_org_name(&company))
        .collect())
}

/// 小写, 去掉 `inc.` `llc` `@` 和空格, 再去掉结尾的逗号
pub fn normalize_org_name(org: &str) -> String {
    let lower = org.to_lowercase();
    let mut name = String::with_capacity(lower.len());
    let mut rest = lower.as_str();
    while let Some(c) = rest.chars().next() {
        match ORG_NOISE.iter().find(|noise| rest.starts_with(**noise)) {
            Some(noise) => rest = &rest[noise.len()..],
            None => {
                name.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    name.trim_end_matches(',').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{last_link, repository, MockApi, MockReply};
    use crate::pass::tests::{context, settings};
    use chrono::Utc;
    use serde_json::json;

    fn contributor(login: &str) -> serde_json::Value {
        json!({"login": login, "id": 1, "contributions": 10})
    }

    fn user(login: &str, company: Option<&str>) -> MockReply {
        MockReply::Json(json!({"id": 1, "login": login, "company": company, "type": "User"}))
    }

    #[test]
    fn test_normalize_org_name() {
        for raw in ["Acme Inc.", "ACME, LLC", "@Acme", "Acme "] {
            assert_eq!(normalize_org_name(raw), "acme", "{}", raw);
        }
        assert_eq!(normalize_org_name("Google LLC"), "google");
        assert_eq!(normalize_org_name("@google @microsoft"), "googlemicrosoft");
    }

    #[test]
    fn test_normalize_single_pass() {
        // 删除 `inc.` 后拼出的 `llc` 不再被替换
        assert_eq!(normalize_org_name("linc.lc"), "llc");
    }

    #[tokio::test]
    async fn test_contributor_count() {
        let api = MockApi::new().with_page("repos/o/n/contributors?anon=true", vec![contributor("a")], last_link(321));
        let repo = repository("o", "n", Utc::now());
        let settings = settings();
        assert_eq!(contributor_count(&context(&api, &repo, &settings)).await.unwrap(), 321);
    }

    #[tokio::test]
    async fn test_org_count_distinct() {
        let api = MockApi::new()
            .with_page(
                "repos/o/n/contributors?anon=false",
                vec![
                    contributor("alice"),
                    contributor("bob"),
                    contributor("carol"),
                    contributor("dave"),
                    contributor("erin"),
                ],
                None,
            )
            .with_single("users/alice", user("alice", Some("Acme Inc.")))
            .with_single("users/bob", user("bob", Some("@acme")))
            .with_single("users/carol", user("carol", Some("Globex")))
            .with_single("users/dave", user("dave", None))
            .with_single("users/erin", MockReply::Status(500));
        let repo = repository("o", "n", Utc::now());
        let settings = settings();
        let orgs = contributor_orgs(&context(&api, &repo, &settings)).await.unwrap();
        assert_eq!(orgs, HashSet::from(["acme".to_owned(), "globex".to_owned()]));
    }

    #[tokio::test]
    async fn test_blank_company_skipped_noise_only_counted_once() {
        let api = MockApi::new()
            .with_page(
                "repos/o/n/contributors?anon=false",
                vec![contributor("a"), contributor("b"), contributor("c")],
                None,
            )
            .with_single("users/a", user("a", Some("Inc.")))
            .with_single("users/b", user("b", Some("@")))
            .with_single("users/c", user("c", Some("")));
        let repo = repository("o", "n", Utc::now());
        let settings = settings();
        let orgs = contributor_orgs(&context(&api, &repo, &settings)).await.unwrap();
        assert_eq!(orgs, HashSet::from([String::new()]));
    }

    #[tokio::test]
    async fn test_only_top_contributors_resolved() {
        let mut settings = settings();
        settings.top_contributor_count = 2;
        let api = MockApi::new()
            .with_page(
                "repos/o/n/contributors?anon=false",
                vec![contributor("a"), contributor("b"), contributor("c")],
                None,
            )
            .with_single("users/a", user("a", Some("x")))
            .with_single("users/b", user("b", Some("y")))
            .with_single("users/c", user("c", Some("z")));
        let repo = repository("o", "n", Utc::now());
        assert_eq!(org_count(&context(&api, &repo, &settings)).await.unwrap(), 2);
        assert!(!api.calls().contains(&"users/c".to_owned()));
    }

    #[tokio::test]
    async fn test_contributor_cap_uses_placeholder() {
        let mut settings = settings();
        settings.contributor_cap = 1;
        let api = MockApi::new().with_page(
            "repos/o/n/contributors?anon=false",
            vec![contributor("a"), contributor("b")],
            None,
        );
        let repo = repository("o", "n", Utc::now());
        assert_eq!(org_count(&context(&api, &repo, &settings)).await.unwrap(), 10);
        assert!(api.calls().iter().all(|c| !c.starts_with("users/")));
    }

    #[tokio::test]
    async fn test_listing_failure_propagates() {
        let api = MockApi::new().with_single("repos/o/n/contributors?anon=false", MockReply::Status(502));
        let repo = repository("o", "n", Utc::now());
        let settings = settings();
        assert!(org_count(&context(&api, &repo, &settings)).await.is_err());
    }
}
