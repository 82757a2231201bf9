//! Channel-fed front end for a scope tree.
//!
//! Descendants send commands through a [`DriverHandle`]. The driver waits for
//! the first command, then drains every command already queued without
//! waiting again. That drain is one processing cycle: all of it is applied to
//! the tree before a single flush publishes the result.

use log::{debug, warn};
use tokio::sync::{mpsc, oneshot};

use crate::child::{Notification, OrderKey};
use crate::error::{Error, Result};
use crate::scope::{ScopeId, ScopeTree};

/// Commands accepted by the driver.
pub enum Command<H> {
    /// Route a raw notification from `origin`.
    Notify {
        origin: ScopeId,
        notification: Notification<H>,
    },
    /// Mount a child and reply with its scope.
    MountChild {
        parent: ScopeId,
        order_key: OrderKey,
        handle: H,
        reply: oneshot::Sender<Result<ScopeId>>,
    },
    /// Re-register the child in `scope` under a new order key.
    Rebind { scope: ScopeId, order_key: OrderKey },
    /// Unmount a scope and its subtree.
    Unmount(ScopeId),
    /// Reply with the publish count once the current cycle has flushed.
    Sync(oneshot::Sender<usize>),
}

/// Sender side of the driver.
pub struct DriverHandle<H> {
    tx: mpsc::UnboundedSender<Command<H>>,
}

impl<H> Clone for DriverHandle<H> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<H> DriverHandle<H> {
    fn send(&self, command: Command<H>) -> Result<()> {
        self.tx.send(command).map_err(|_| Error::DriverClosed)
    }

    pub fn notify(&self, origin: ScopeId, notification: Notification<H>) -> Result<()> {
        self.send(Command::Notify {
            origin,
            notification,
        })
    }

    pub fn rebind(&self, scope: ScopeId, order_key: impl Into<OrderKey>) -> Result<()> {
        self.send(Command::Rebind {
            scope,
            order_key: order_key.into(),
        })
    }

    pub fn unmount(&self, scope: ScopeId) -> Result<()> {
        self.send(Command::Unmount(scope))
    }

    /// Mount a child. Resolves once the driver has applied the command.
    pub async fn mount_child(
        &self,
        parent: ScopeId,
        order_key: impl Into<OrderKey>,
        handle: H,
    ) -> Result<ScopeId> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::MountChild {
            parent,
            order_key: order_key.into(),
            handle,
            reply,
        })?;
        rx.await.map_err(|_| Error::DriverClosed)?
    }

    /// Wait until everything sent so far has been published.
    ///
    /// Resolves to the number of publishes made by the flush that ended the
    /// cycle containing this request.
    pub async fn sync(&self) -> Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Sync(reply))?;
        rx.await.map_err(|_| Error::DriverClosed)
    }
}

/// Owns the tree and applies commands one cycle at a time.
pub struct Driver<H> {
    tree: ScopeTree<H>,
    rx: mpsc::UnboundedReceiver<Command<H>>,
}

impl<H: Clone> Driver<H> {
    pub fn new(tree: ScopeTree<H>) -> (Self, DriverHandle<H>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tree, rx }, DriverHandle { tx })
    }

    /// Process commands until every handle is dropped, then return the tree.
    pub async fn run(mut self) -> ScopeTree<H> {
        let mut cycles: u64 = 0;

        while let Some(first) = self.rx.recv().await {
            let mut waiters = Vec::new();
            let mut applied = 1;
            self.apply(first, &mut waiters);

            // Everything already queued belongs to the same cycle
            while let Ok(command) = self.rx.try_recv() {
                self.apply(command, &mut waiters);
                applied += 1;
            }

            let published = self.tree.flush();
            cycles += 1;
            debug!(
                "Cycle {} applied {} commands, {} publishes",
                cycles, applied, published
            );

            for waiter in waiters {
                let _ = waiter.send(published);
            }
        }

        debug!("All driver handles dropped after {} cycles", cycles);
        self.tree
    }

    fn apply(&mut self, command: Command<H>, waiters: &mut Vec<oneshot::Sender<usize>>) {
        let result = match command {
            Command::Notify {
                origin,
                notification,
            } => self.tree.notify(origin, notification).map(|_| ()),
            Command::MountChild {
                parent,
                order_key,
                handle,
                reply,
            } => {
                let _ = reply.send(self.tree.mount_child(parent, order_key, handle));
                Ok(())
            }
            Command::Rebind { scope, order_key } => self.tree.rebind(scope, order_key).map(|_| ()),
            Command::Unmount(scope) => self.tree.unmount(scope),
            Command::Sync(reply) => {
                waiters.push(reply);
                Ok(())
            }
        };

        if let Err(err) = result {
            warn!("Dropping command: {}", err);
        }
    }
}
