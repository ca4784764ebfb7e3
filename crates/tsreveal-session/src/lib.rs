//! Live reveal sessions between source documents and their derived
//! documents.
//!
//! - `uri` - document keys and the policy naming derived documents
//! - `bimap` / `registry` - the source/derived bijection with rendered content
//! - `subscription` - the three event feeds and their activation state
//! - `debounce` - trailing-edge debouncing keyed by document
//! - `host` - what the coordinator needs from an editor
//! - `coordinator` - the state machine tying them together
//!
//! Everything here is single-threaded and sans-IO. Time is passed in as
//! [`std::time::Instant`] values and timers fire from [`Coordinator::poll`].

pub mod bimap;
pub mod coordinator;
pub mod debounce;
pub mod host;
pub mod registry;
pub mod subscription;
pub mod uri;

pub use bimap::BiMap;
pub use coordinator::{
    Coordinator, CoordinatorOptions, RevealError, RevealOutcome, render_document,
    render_document_with,
};
pub use debounce::Debouncer;
pub use host::{EditorHost, SourceDocument};
pub use registry::{Session, SessionRegistry};
pub use subscription::{Feed, NoopSubscription, Subscription, SubscriptionManager};
pub use uri::{DerivedNaming, DocumentUri, REVEAL_SCHEME};
