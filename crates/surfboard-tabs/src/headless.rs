//! Headless content view
//!
//! An in-memory stand-in for a rendering engine: it keeps a back/forward
//! list and reports commits synchronously through its signals. Used by the
//! shell and by tests, which can inspect every view a factory created.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use url::Url;

use crate::id::TabId;
use crate::view::{ContentView, ViewFactory, ViewSignals};

#[derive(Debug, Default)]
struct HeadlessPage {
    entries: Vec<String>,
    index: Option<usize>,
    loads: Vec<String>,
    reloads: usize,
    disposed: bool,
}

impl HeadlessPage {
    fn current(&self) -> Option<&String> {
        self.index.and_then(|i| self.entries.get(i))
    }
}

pub struct HeadlessView {
    signals: ViewSignals,
    page: Arc<Mutex<HeadlessPage>>,
    failing: Arc<HashSet<String>>,
}

impl HeadlessView {
    fn commit(&self, uri: &str) {
        self.signals.load_progress(1.0);
        self.signals.uri_changed(uri);
        self.signals.title_changed(title_for(uri));
    }

    fn step(&mut self, forward: bool) {
        let target = {
            let mut page = self.page.lock();
            if page.disposed {
                tracing::warn!(tab_id = %self.signals.tab_id(), "Navigation on disposed view");
                return;
            }
            let Some(index) = page.index else {
                return;
            };
            let next = if forward {
                index + 1
            } else {
                match index.checked_sub(1) {
                    Some(prev) => prev,
                    None => return,
                }
            };
            if next >= page.entries.len() {
                return;
            }
            page.index = Some(next);
            page.entries[next].clone()
        };

        self.commit(&target);
    }
}

impl ContentView for HeadlessView {
    fn load(&mut self, uri: &str) {
        {
            let mut page = self.page.lock();
            if page.disposed {
                tracing::warn!(tab_id = %self.signals.tab_id(), url = %uri, "Load on disposed view");
                return;
            }
            page.loads.push(uri.to_string());

            if !self.failing.contains(uri) {
                let keep = page.index.map_or(0, |i| i + 1);
                page.entries.truncate(keep);
                page.entries.push(uri.to_string());
                page.index = Some(page.entries.len() - 1);
            }
        }

        if self.failing.contains(uri) {
            self.signals.load_failed(uri, "headless view refused the load");
        } else {
            self.commit(uri);
        }
    }

    fn go_back(&mut self) {
        self.step(false);
    }

    fn go_forward(&mut self) {
        self.step(true);
    }

    fn reload(&mut self) {
        let mut page = self.page.lock();
        if page.disposed || page.index.is_none() {
            return;
        }
        page.reloads += 1;
        drop(page);

        self.signals.load_progress(1.0);
    }

    fn current_uri(&self) -> Option<String> {
        let page = self.page.lock();
        if page.disposed {
            return None;
        }
        page.current().cloned()
    }

    fn current_title(&self) -> Option<String> {
        self.current_uri().and_then(|uri| title_for(&uri))
    }

    fn dispose(&mut self) {
        self.page.lock().disposed = true;
    }
}

/// Host name stands in for a page title
fn title_for(uri: &str) -> Option<String> {
    Url::parse(uri)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

/// Creates headless views and keeps a handle on each for inspection
#[derive(Clone, Default)]
pub struct HeadlessFactory {
    pages: Arc<Mutex<HashMap<TabId, Arc<Mutex<HeadlessPage>>>>>,
    failing: Arc<HashSet<String>>,
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Views from this factory report a load failure for these URIs
    pub fn failing_on<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: Arc::default(),
            failing: Arc::new(uris.into_iter().map(Into::into).collect()),
        }
    }

    /// Every URI the tab's view was asked to load, in order
    pub fn loads(&self, tab_id: TabId) -> Vec<String> {
        self.page(tab_id)
            .map(|page| page.lock().loads.clone())
            .unwrap_or_default()
    }

    pub fn reloads(&self, tab_id: TabId) -> usize {
        self.page(tab_id).map_or(0, |page| page.lock().reloads)
    }

    pub fn is_disposed(&self, tab_id: TabId) -> bool {
        self.page(tab_id).is_some_and(|page| page.lock().disposed)
    }

    pub fn view_count(&self) -> usize {
        self.pages.lock().len()
    }

    fn page(&self, tab_id: TabId) -> Option<Arc<Mutex<HeadlessPage>>> {
        self.pages.lock().get(&tab_id).cloned()
    }
}

impl ViewFactory for HeadlessFactory {
    fn create(&self, signals: ViewSignals) -> Box<dyn ContentView> {
        let page = Arc::new(Mutex::new(HeadlessPage::default()));
        self.pages.lock().insert(signals.tab_id(), Arc::clone(&page));

        Box::new(HeadlessView {
            signals,
            page,
            failing: Arc::clone(&self.failing),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{channel, TabEvent, ViewSignal};

    fn signals_of(rx: &mut crate::event::EventReceiver) -> Vec<ViewSignal> {
        let mut out = Vec::new();
        while let Ok(TabEvent::View { signal, .. }) = rx.try_recv() {
            out.push(signal);
        }
        out
    }

    #[test]
    fn test_back_and_forward() {
        let (tx, mut rx) = channel();
        let factory = HeadlessFactory::new();
        let tab_id = TabId::new();
        let mut view = factory.create(ViewSignals::new(tab_id, tx));

        view.load("https://a.example");
        view.load("https://b.example");
        assert_eq!(view.current_uri().as_deref(), Some("https://b.example"));
        assert_eq!(view.current_title().as_deref(), Some("b.example"));

        view.go_back();
        assert_eq!(view.current_uri().as_deref(), Some("https://a.example"));
        view.go_back();
        assert_eq!(view.current_uri().as_deref(), Some("https://a.example"));

        view.go_forward();
        assert_eq!(view.current_uri().as_deref(), Some("https://b.example"));

        let commits: Vec<_> = signals_of(&mut rx)
            .into_iter()
            .filter_map(|s| match s {
                ViewSignal::UriChanged(uri) => Some(uri),
                _ => None,
            })
            .collect();
        assert_eq!(
            commits,
            vec![
                "https://a.example",
                "https://b.example",
                "https://a.example",
                "https://b.example"
            ]
        );
        assert_eq!(factory.loads(tab_id).len(), 2);
    }

    #[test]
    fn test_load_truncates_forward_entries() {
        let (tx, _rx) = channel();
        let factory = HeadlessFactory::new();
        let mut view = factory.create(ViewSignals::new(TabId::new(), tx));

        view.load("https://a.example");
        view.load("https://b.example");
        view.go_back();
        view.load("https://c.example");
        view.go_forward();

        assert_eq!(view.current_uri().as_deref(), Some("https://c.example"));
    }

    #[test]
    fn test_failing_load_keeps_current_page() {
        let (tx, mut rx) = channel();
        let factory = HeadlessFactory::failing_on(["https://down.example"]);
        let mut view = factory.create(ViewSignals::new(TabId::new(), tx));

        view.load("https://up.example");
        signals_of(&mut rx);

        view.load("https://down.example");
        assert_eq!(view.current_uri().as_deref(), Some("https://up.example"));
        assert!(matches!(
            signals_of(&mut rx).as_slice(),
            [ViewSignal::LoadFailed { .. }]
        ));
    }

    #[test]
    fn test_dispose() {
        let (tx, _rx) = channel();
        let factory = HeadlessFactory::new();
        let tab_id = TabId::new();
        let mut view = factory.create(ViewSignals::new(tab_id, tx));

        view.load("https://a.example");
        view.reload();
        assert_eq!(factory.reloads(tab_id), 1);

        view.dispose();
        assert!(factory.is_disposed(tab_id));
        assert!(view.current_uri().is_none());

        view.load("https://b.example");
        assert_eq!(factory.loads(tab_id), vec!["https://a.example"]);
    }
}
