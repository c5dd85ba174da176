//! Length-aware paginator view model.

use serde::{Deserialize, Serialize};

/// Pages shown on each side of the current page once links are elided.
const ON_EACH_SIDE: u64 = 3;

pub const PREVIOUS_LABEL: &str = "&laquo; Previous";
pub const NEXT_LABEL: &str = "Next &raquo;";
pub const GAP_LABEL: &str = "...";

/// A navigation entry; `url` is `None` for disabled entries and gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

impl PageLink {
    fn gap() -> Self {
        Self {
            url: None,
            label: GAP_LABEL.to_string(),
            active: false,
        }
    }
}

/// One page of results plus everything needed to render its navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub links: Vec<PageLink>,
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
    /// 1-based position of the first item on this page; `None` when empty.
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub total: u64,
}

impl<T> Paginated<T> {
    /// Build a page. `path` is the listing URL and `query` holds parameters
    /// every link must carry besides `page` (e.g. the active search).
    pub fn new(
        data: Vec<T>,
        total: u64,
        current_page: u64,
        per_page: u64,
        path: &str,
        query: &[(&str, &str)],
    ) -> Self {
        let per_page = per_page.max(1);
        let current_page = current_page.max(1);
        let last_page = total.div_ceil(per_page).max(1);

        let offset = (current_page - 1).saturating_mul(per_page);
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            (
                Some(offset.saturating_add(1)),
                Some(offset.saturating_add(data.len() as u64)),
            )
        };

        let links = build_links(current_page, last_page, |page| page_url(path, query, page));

        Self {
            data,
            links,
            current_page,
            last_page,
            per_page,
            from,
            to,
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            links: self.links,
            current_page: self.current_page,
            last_page: self.last_page,
            per_page: self.per_page,
            from: self.from,
            to: self.to,
            total: self.total,
        }
    }
}

fn page_url(path: &str, query: &[(&str, &str)], page: u64) -> String {
    let page = page.to_string();
    let params: Vec<(&str, &str)> = query
        .iter()
        .copied()
        .filter(|(key, _)| *key != "page")
        .chain(std::iter::once(("page", page.as_str())))
        .collect();

    match serde_urlencoded::to_string(&params) {
        Ok(qs) => format!("{path}?{qs}"),
        Err(_) => format!("{path}?page={page}"),
    }
}

fn build_links(current: u64, last: u64, url: impl Fn(u64) -> String) -> Vec<PageLink> {
    let page_link = |page: u64| PageLink {
        url: Some(url(page)),
        label: page.to_string(),
        active: page == current,
    };

    let mut links = vec![PageLink {
        url: (current > 1).then(|| url(current - 1)),
        label: PREVIOUS_LABEL.to_string(),
        active: false,
    }];

    for element in window(current, last) {
        match element {
            Some(page) => links.push(page_link(page)),
            None => links.push(PageLink::gap()),
        }
    }

    links.push(PageLink {
        url: (current < last).then(|| url(current + 1)),
        label: NEXT_LABEL.to_string(),
        active: false,
    });

    links
}

/// Page numbers to show, `None` marking a gap.
fn window(current: u64, last: u64) -> Vec<Option<u64>> {
    if last < ON_EACH_SIDE * 2 + 8 {
        return (1..=last).map(Some).collect();
    }

    let edge = ON_EACH_SIDE + 4;
    let head = [Some(1), Some(2), None];
    let tail = [None, Some(last - 1), Some(last)];

    if current <= edge {
        (1..=edge + ON_EACH_SIDE).map(Some).chain(tail).collect()
    } else if current > last - edge {
        head.into_iter()
            .chain((last - (edge + ON_EACH_SIDE - 1)..=last).map(Some))
            .collect()
    } else {
        head.into_iter()
            .chain((current - ON_EACH_SIDE..=current + ON_EACH_SIDE).map(Some))
            .chain(tail)
            .collect()
    }
}
