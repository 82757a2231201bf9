#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use scrollseq::{OrderKey, Publish, ScopeId, ScopeTree, ScrollOptions, Scroller, factory};

/// Every publish received by any recording scroller, tagged with its name.
pub type PublishLog = Rc<RefCell<Vec<(String, Publish<String>)>>>;

/// Scroller that keeps what it was given.
pub struct Recorder {
    name: String,
    log: PublishLog,
}

impl Scroller<String> for Recorder {
    fn sequence_from(&mut self, publish: Publish<String>) {
        self.log.borrow_mut().push((self.name.clone(), publish));
    }

    fn render_handle(&self) -> String {
        format!("view:{}", self.name)
    }
}

/// Tree whose scrollers are named after the `name` option.
pub fn recording_tree() -> (ScopeTree<String>, PublishLog) {
    let log: PublishLog = Rc::new(RefCell::new(Vec::new()));
    let shared = Rc::clone(&log);
    let tree = ScopeTree::new(factory(move |options: &ScrollOptions| Recorder {
        name: options
            .extra
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("anonymous")
            .to_string(),
        log: Rc::clone(&shared),
    }));
    (tree, log)
}

pub fn named(name: &str) -> ScrollOptions {
    ScrollOptions::new().with_extra("name", name)
}

pub fn root_view(tree: &mut ScopeTree<String>, name: &str, start: Option<usize>) -> ScopeId {
    tree.mount_scroll_view(None, named(name), start, OrderKey::Unset)
        .unwrap()
}

/// Publishes received by the scroller called `name`.
pub fn publishes_for(log: &PublishLog, name: &str) -> Vec<Publish<String>> {
    log.borrow()
        .iter()
        .filter(|(n, _)| n == name)
        .map(|(_, p)| p.clone())
        .collect()
}

pub fn handles(publish: &Publish<String>) -> Vec<&str> {
    publish.sequence.iter().map(String::as_str).collect()
}
