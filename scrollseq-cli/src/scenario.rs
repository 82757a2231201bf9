//! Scenario files: named mount/unmount steps grouped into cycles.
//!
//! ```json
//! {
//!   "cycles": [
//!     [
//!       { "op": "view", "name": "outer", "options": { "direction": 0 }, "startIndex": 1 },
//!       { "op": "child", "name": "red", "parent": "outer", "index": 1 },
//!       { "op": "child", "name": "blue", "parent": "outer", "index": 0 }
//!     ],
//!     [
//!       { "op": "unmount", "name": "red" }
//!     ]
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use scrollseq::{OrderKey, ScopeId, ScopeTree, ScrollOptions};

use crate::CliError;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub cycles: Vec<Vec<Step>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Mount a scroll view, nested under `parent` when given.
    #[serde(rename_all = "camelCase")]
    View {
        name: String,
        parent: Option<String>,
        #[serde(default)]
        options: Value,
        start_index: Option<usize>,
        index: Option<i64>,
    },
    /// Mount a plain scope that neither registers nor captures.
    Scope { name: String, parent: Option<String> },
    /// Mount a child whose render handle is its name.
    Child {
        name: String,
        parent: String,
        index: Option<i64>,
    },
    /// Re-register a mounted child under a new index.
    Rebind { name: String, index: Option<i64> },
    /// Unmount a scope and everything below it.
    Unmount { name: String },
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Applies scenario steps to a tree, resolving names to scopes.
pub struct Player {
    tree: ScopeTree<String>,
    scopes: HashMap<String, ScopeId>,
}

impl Player {
    pub fn new(tree: ScopeTree<String>) -> Self {
        Self {
            tree,
            scopes: HashMap::new(),
        }
    }

    /// Play every cycle, flushing after each. Returns the total publish count.
    pub fn play(&mut self, scenario: Scenario) -> Result<usize, CliError> {
        let mut total = 0;
        for (number, steps) in scenario.cycles.into_iter().enumerate() {
            debug!("Cycle {} has {} steps", number, steps.len());
            for step in steps {
                self.apply(step)?;
            }
            let published = self.tree.flush();
            info!("Cycle {} published {} sequences", number, published);
            total += published;
        }
        Ok(total)
    }

    fn apply(&mut self, step: Step) -> Result<(), CliError> {
        let mounted = match &step {
            Step::View { name, .. } | Step::Scope { name, .. } | Step::Child { name, .. } => {
                Some(name)
            }
            Step::Rebind { .. } | Step::Unmount { .. } => None,
        };
        if let Some(name) = mounted.filter(|name| self.scopes.contains_key(*name)) {
            return Err(CliError::DuplicateName(name.clone()));
        }

        match step {
            Step::View {
                name,
                parent,
                options,
                start_index,
                index,
            } => {
                let parent = parent.map(|p| self.lookup(&p)).transpose()?;
                let mut options = ScrollOptions::from_value(options)?;
                options
                    .extra
                    .entry("name")
                    .or_insert_with(|| Value::String(name.clone()));
                let order_key = OrderKey::from(index);
                let scope = self
                    .tree
                    .mount_scroll_view(parent, options, start_index, order_key)?;
                self.bind(name, scope)
            }
            Step::Scope { name, parent } => {
                let parent = parent.map(|p| self.lookup(&p)).transpose()?;
                let scope = self.tree.create_scope(parent)?;
                self.bind(name, scope)
            }
            Step::Child {
                name,
                parent,
                index,
            } => {
                let parent = self.lookup(&parent)?;
                let scope = self
                    .tree
                    .mount_child(parent, OrderKey::from(index), name.clone())?;
                self.bind(name, scope)
            }
            Step::Rebind { name, index } => {
                let scope = self.lookup(&name)?;
                self.tree.rebind(scope, OrderKey::from(index))?;
                Ok(())
            }
            Step::Unmount { name } => {
                let scope = self.lookup(&name)?;
                self.tree.unmount(scope)?;
                self.scopes.retain(|_, id| self.tree.contains(*id));
                Ok(())
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<ScopeId, CliError> {
        self.scopes
            .get(name)
            .copied()
            .ok_or_else(|| CliError::UnknownName(name.to_string()))
    }

    fn bind(&mut self, name: String, scope: ScopeId) -> Result<(), CliError> {
        self.scopes.insert(name, scope);
        Ok(())
    }
}
