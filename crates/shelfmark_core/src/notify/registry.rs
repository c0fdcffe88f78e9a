//! In-process availability observer registry.

use crate::model::book::Book;
use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Receives a book after each successful loan or return.
pub trait AvailabilityObserver {
    fn update(&self, book: &Book);
}

/// Handle returned by `attach`, used to detach later.
pub type ObserverId = u64;

struct Subscription {
    id: ObserverId,
    observer: Arc<dyn AvailabilityObserver>,
}

/// Title-keyed observer registry owned by one session.
#[derive(Default)]
pub struct AvailabilityRegistry {
    by_title: BTreeMap<String, Vec<Subscription>>,
    global: Vec<Subscription>,
    next_id: ObserverId,
}

impl AvailabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `observer` to transitions of the book titled `title`.
    ///
    /// The book does not need to exist yet.
    pub fn attach(
        &mut self,
        title: impl Into<String>,
        observer: Arc<dyn AvailabilityObserver>,
    ) -> ObserverId {
        let id = self.allocate_id();
        self.by_title
            .entry(title.into())
            .or_default()
            .push(Subscription { id, observer });
        id
    }

    /// Subscribes `observer` to transitions of every book.
    pub fn attach_global(&mut self, observer: Arc<dyn AvailabilityObserver>) -> ObserverId {
        let id = self.allocate_id();
        self.global.push(Subscription { id, observer });
        id
    }

    /// Removes one subscription. Returns `false` for unknown ids.
    pub fn detach(&mut self, id: ObserverId) -> bool {
        if let Some(index) = self.global.iter().position(|sub| sub.id == id) {
            self.global.remove(index);
            return true;
        }

        let mut emptied = None;
        let mut found = false;
        for (title, subs) in &mut self.by_title {
            if let Some(index) = subs.iter().position(|sub| sub.id == id) {
                subs.remove(index);
                found = true;
                if subs.is_empty() {
                    emptied = Some(title.clone());
                }
                break;
            }
        }
        if let Some(title) = emptied {
            self.by_title.remove(&title);
        }
        found
    }

    /// Delivers `book` to its title subscribers, then to global subscribers.
    ///
    /// Returns the number of observers notified.
    pub fn notify(&self, book: &Book) -> usize {
        let titled = self
            .by_title
            .get(book.title.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut delivered = 0;
        for sub in titled.iter().chain(self.global.iter()) {
            sub.observer.update(book);
            delivered += 1;
        }

        debug!(
            "event=availability_notify module=notify status=ok book_id={} delivered={}",
            book.id, delivered
        );
        delivered
    }

    /// Number of live subscriptions, title-keyed and global.
    pub fn len(&self) -> usize {
        self.global.len() + self.by_title.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every subscription. Called when the session closes.
    pub fn clear(&mut self) {
        self.by_title.clear();
        self.global.clear();
    }

    fn allocate_id(&mut self) -> ObserverId {
        self.next_id += 1;
        self.next_id
    }
}
