//! Post listing view and its debounced search.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use quire_shared::dto::{PostIndexProps, PostResponse};
use quire_shared::{PageLink, PageView};

use crate::api::{ClientError, PostsClient, listing_url};
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};

/// How a navigation lands in the browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub url: String,
    pub mode: HistoryMode,
}

impl Visit {
    /// Searching replaces the current entry so typing does not flood the history.
    pub fn search(query: &str) -> Self {
        Self {
            url: listing_url(Some(query), 1),
            mode: HistoryMode::Replace,
        }
    }

    /// Following a page link; `None` for disabled entries and gaps.
    pub fn link(link: &PageLink) -> Option<Self> {
        link.url.as_ref().map(|url| Self {
            url: url.clone(),
            mode: HistoryMode::Push,
        })
    }
}

/// State of the listing page: the search box, the last page received and
/// the history entries it produced.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    query: String,
    page: Option<PageView<PostIndexProps>>,
    history: Vec<String>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn page(&self) -> Option<&PageView<PostIndexProps>> {
        self.page.as_ref()
    }

    pub fn posts(&self) -> &[PostResponse] {
        self.page
            .as_ref()
            .map(|page| page.props.posts.data.as_slice())
            .unwrap_or_default()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Take in the page answering `visit`. The typed query is left alone.
    /// Returns the flash message to toast, if the page carried one.
    pub fn apply(&mut self, visit: &Visit, page: PageView<PostIndexProps>) -> Option<String> {
        match (visit.mode, self.history.last_mut()) {
            (HistoryMode::Replace, Some(current)) => *current = page.url.clone(),
            _ => self.history.push(page.url.clone()),
        }

        let toast = page.flash.message.clone();
        self.page = Some(page);
        toast
    }
}

/// Where listing pages come from.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn listing(&self, url: &str) -> Result<PageView<PostIndexProps>, ClientError>;
}

#[async_trait]
impl PageSource for PostsClient {
    async fn listing(&self, url: &str) -> Result<PageView<PostIndexProps>, ClientError> {
        self.visit(url).await
    }
}

/// Wires the search box to the server: input updates the view at once and
/// the request goes out after the debounce period.
pub struct SearchController {
    view: Arc<Mutex<ListView>>,
    debouncer: Debouncer<String>,
}

impl SearchController {
    /// Toasts produced by search responses are sent to `toasts`.
    pub fn new(
        source: Arc<dyn PageSource>,
        view: Arc<Mutex<ListView>>,
        toasts: mpsc::UnboundedSender<String>,
    ) -> Self {
        let target = view.clone();
        let debouncer = Debouncer::new(SEARCH_DEBOUNCE, move |query: String| {
            let source = source.clone();
            let view = target.clone();
            let toasts = toasts.clone();
            async move {
                let visit = Visit::search(&query);
                match source.listing(&visit.url).await {
                    Ok(page) => {
                        if let Some(message) = view.lock().await.apply(&visit, page) {
                            let _ = toasts.send(message);
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, query = %query, "Search request failed"),
                }
            }
        });

        Self { view, debouncer }
    }

    pub fn view(&self) -> Arc<Mutex<ListView>> {
        self.view.clone()
    }

    pub async fn input(&self, query: &str) {
        self.view.lock().await.set_query(query);
        self.debouncer.push(query.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use quire_shared::Paginated;

    fn page(url: &str, flash: Option<&str>) -> PageView<PostIndexProps> {
        let posts = Paginated::new(Vec::new(), 0, 1, 10, "/posts", &[]);
        PageView::new("posts/index", PostIndexProps { posts }, url)
            .with_flash(flash.map(str::to_owned))
    }

    #[test]
    fn test_search_replaces_history_entry() {
        let mut view = ListView::new();
        view.apply(
            &Visit {
                url: "/posts".to_string(),
                mode: HistoryMode::Push,
            },
            page("/posts", None),
        );

        view.set_query("ca");
        view.apply(&Visit::search("ca"), page("/posts?search=ca", None));
        view.set_query("cat");
        view.apply(&Visit::search("cat"), page("/posts?search=cat", None));

        assert_eq!(view.history(), ["/posts?search=cat"]);
        assert_eq!(view.query(), "cat");
    }

    #[test]
    fn test_page_links_push_history() {
        let mut view = ListView::new();
        view.apply(&Visit::search(""), page("/posts", None));

        let link = PageLink {
            url: Some("/posts?page=2".to_string()),
            label: "2".to_string(),
            active: false,
        };
        let visit = Visit::link(&link).unwrap();
        assert_eq!(visit.mode, HistoryMode::Push);
        view.apply(&visit, page("/posts?page=2", None));

        assert_eq!(view.history(), ["/posts", "/posts?page=2"]);
    }

    #[test]
    fn test_disabled_link_is_not_navigable() {
        let gap = PageLink {
            url: None,
            label: "...".to_string(),
            active: false,
        };
        assert!(Visit::link(&gap).is_none());
    }

    #[test]
    fn test_toast_once_per_flash() {
        let mut view = ListView::new();
        let visit = Visit::search("");

        let first = view.apply(&visit, page("/posts", Some("Post created successfully.")));
        let second = view.apply(&visit, page("/posts", None));

        assert_eq!(first.as_deref(), Some("Post created successfully."));
        assert_eq!(second, None);
    }

    #[test]
    fn test_typed_query_survives_responses() {
        let mut view = ListView::new();
        view.set_query("catego");
        view.apply(&Visit::search("cat"), page("/posts?search=cat", None));

        assert_eq!(view.query(), "catego");
        assert!(view.posts().is_empty());
    }

    /// Serves empty listing pages and records every requested URL. The
    /// first response carries a flash.
    #[derive(Default)]
    struct RecordingSource {
        requests: std::sync::Mutex<Vec<String>>,
    }

    impl RecordingSource {
        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for RecordingSource {
        async fn listing(&self, url: &str) -> Result<PageView<PostIndexProps>, ClientError> {
            let mut requests = self.requests.lock().unwrap();
            requests.push(url.to_string());
            let flash = (requests.len() == 1).then_some("Post created successfully.");
            Ok(page(url, flash))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_sends_one_debounced_search() {
        let source = Arc::new(RecordingSource::default());
        let view = Arc::new(Mutex::new(ListView::new()));
        view.lock().await.apply(
            &Visit {
                url: "/posts".to_string(),
                mode: HistoryMode::Push,
            },
            page("/posts", None),
        );
        let (toasts, mut toast_rx) = mpsc::unbounded_channel();
        let controller = SearchController::new(source.clone(), view.clone(), toasts);

        controller.input("c").await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.input("ca").await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.input("cat").await;

        assert_eq!(controller.view().lock().await.query(), "cat");
        assert!(source.requests().is_empty());

        let toast = toast_rx.recv().await;
        assert_eq!(toast.as_deref(), Some("Post created successfully."));

        tokio::time::sleep(SEARCH_DEBOUNCE * 2).await;
        assert_eq!(source.requests(), ["/posts?search=cat"]);
        assert!(toast_rx.try_recv().is_err());

        let view = view.lock().await;
        assert_eq!(view.history(), ["/posts?search=cat"]);
        assert_eq!(view.query(), "cat");
    }
}
