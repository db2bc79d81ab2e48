//! 通过 `Link` 响应头推算总数, 不需要拉取全部分页.
//!
//! 以 `per_page=1` 请求时, `rel="last"` 的页码即为条目总数.

use github_handler::Page;
use std::collections::HashMap;
use url::Url;

/// `rel` -> url
pub fn parse_link_header(header: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();
    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let Some(target) = parts.next() else {
            continue;
        };
        let target = target.trim().trim_start_matches('<').trim_end_matches('>');
        for param in parts {
            if let Some(rel) = param.trim().strip_prefix("rel=") {
                for rel in rel.trim_matches('"').split_whitespace() {
                    links.insert(rel.to_owned(), target.to_owned());
                }
            }
        }
    }
    links
}

fn page_number(page: &Page, rel: &str) -> Option<u32> {
    let links = parse_link_header(page.link.as_deref()?);
    let url = Url::parse(links.get(rel)?).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse::<u32>().ok())
}

/// 总数; 没有 last 链接或无法解析时为 0
pub fn total_count(page: &Page) -> u64 {
    page_number(page, "last").map(u64::from).unwrap_or(0)
}

pub fn next_page(page: &Page) -> Option<u32> {
    page_number(page, "next")
}
