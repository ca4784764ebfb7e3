//! Event feed subscriptions.
//!
//! The coordinator listens to three feeds from the host. Each one is
//! subscribed and disposed independently; activating an active feed or
//! deactivating an inactive one does nothing.

use std::fmt;

use tracing::debug;

use crate::host::EditorHost;

/// Event feeds the coordinator can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feed {
    /// Text of a source document changed.
    SourceEdit,
    /// The focused view changed.
    ActiveView,
    /// The set of open views changed, e.g. a tab was closed.
    TabClose,
}

impl Feed {
    pub const ALL: [Feed; 3] = [Feed::SourceEdit, Feed::ActiveView, Feed::TabClose];

    fn index(self) -> usize {
        match self {
            Feed::SourceEdit => 0,
            Feed::ActiveView => 1,
            Feed::TabClose => 2,
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Feed::SourceEdit => "source-edit",
            Feed::ActiveView => "active-view",
            Feed::TabClose => "tab-close",
        })
    }
}

/// Handle to a live host subscription.
pub trait Subscription {
    /// Stop delivering events.
    fn dispose(self: Box<Self>);
}

/// Stands in for a feed the host does not support.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSubscription;

impl Subscription for NoopSubscription {
    fn dispose(self: Box<Self>) {}
}

/// Activation state of the three feeds.
#[derive(Default)]
pub struct SubscriptionManager {
    handles: [Option<Box<dyn Subscription>>; 3],
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, feed: Feed) -> bool {
        self.handles[feed.index()].is_some()
    }

    /// Feeds currently active, in declaration order.
    pub fn active_feeds(&self) -> Vec<Feed> {
        Feed::ALL.into_iter().filter(|f| self.is_active(*f)).collect()
    }

    /// Subscribe to `feed` unless it is already active. A host without the
    /// feed gets a [`NoopSubscription`]. Returns whether a subscription was
    /// made.
    pub fn activate<H: EditorHost + ?Sized>(&mut self, feed: Feed, host: &mut H) -> bool {
        let slot = &mut self.handles[feed.index()];
        if slot.is_some() {
            return false;
        }
        let handle = host.subscribe(feed).unwrap_or_else(|| {
            debug!(%feed, "feed unsupported by host, using no-op subscription");
            Box::new(NoopSubscription)
        });
        *slot = Some(handle);
        debug!(%feed, "subscribed");
        true
    }

    /// Dispose of `feed` if it is active. Returns whether it was.
    pub fn deactivate(&mut self, feed: Feed) -> bool {
        match self.handles[feed.index()].take() {
            Some(handle) => {
                handle.dispose();
                debug!(%feed, "unsubscribed");
                true
            }
            None => false,
        }
    }

    pub fn activate_all<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        for feed in Feed::ALL {
            self.activate(feed, host);
        }
    }

    pub fn deactivate_all(&mut self) {
        for feed in Feed::ALL {
            self.deactivate(feed);
        }
    }
}

impl fmt::Debug for SubscriptionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("active", &self.active_feeds())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/subscription_tests.rs"]
mod subscription_tests;
