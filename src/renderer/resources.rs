//! Graphics-resource bookkeeping
//!
//! Scene objects do not talk to a GPU directly. A renderer uploads what it
//! needs and records the upload on the object with [`ResidentContexts`]; when
//! a rendering context goes away every object is asked to release whatever it
//! holds in that context.

use smallvec::SmallVec;
use thiserror::Error;

/// Identifies a rendering context (typically one per window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderContext {
    id: u64,
}

impl RenderContext {
    /// Create a context handle from a renderer-assigned id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    /// Get the raw id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// Errors raised while freeing graphics resources
#[derive(Debug, Clone, Error)]
pub enum ReleaseError {
    /// The collaborator could not free what it holds in the context
    #[error("failed to release resources in context {context}: {reason}")]
    Failed {
        /// Context id
        context: u64,
        /// Human-readable cause
        reason: String,
    },
    /// A shared collaborator is mutably borrowed elsewhere
    #[error("{0} is busy and cannot be released right now")]
    Busy(&'static str),
}

/// Objects that may own resources inside a [`RenderContext`].
///
/// Implementations must tolerate repeated and out-of-order calls: releasing a
/// context the object is not resident in is a no-op.
pub trait GraphicsResources {
    /// Free everything this object holds in `context`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resources could not be freed.
    fn release_graphics_resources(&mut self, context: &RenderContext) -> Result<(), ReleaseError>;
}

/// The set of contexts an object currently has uploads in.
#[derive(Debug, Clone, Default)]
pub struct ResidentContexts {
    contexts: SmallVec<[RenderContext; 2]>,
    /// Release requests received, resident or not
    releases: u32,
}

impl ResidentContexts {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an upload into `context`.
    pub fn insert(&mut self, context: RenderContext) {
        if !self.contexts.contains(&context) {
            self.contexts.push(context);
        }
    }

    /// Forget `context`. Returns `true` if it was present.
    pub fn remove(&mut self, context: &RenderContext) -> bool {
        if let Some(pos) = self.contexts.iter().position(|c| c == context) {
            self.contexts.swap_remove(pos);
            true
        } else {
            false
        }
    }

    /// Handle a release request for `context`: count it and forget the
    /// context. Returns `true` if the object was resident there.
    pub fn release(&mut self, context: &RenderContext) -> bool {
        self.releases = self.releases.saturating_add(1);
        self.remove(context)
    }

    /// Number of release requests handled so far.
    #[must_use]
    pub fn release_requests(&self) -> u32 {
        self.releases
    }

    /// Check if the object is resident in `context`.
    #[must_use]
    pub fn contains(&self, context: &RenderContext) -> bool {
        self.contexts.contains(context)
    }

    /// Check if the object holds nothing anywhere.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Number of contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }
}
