//! Contracts with the host UI layer
//!
//! The core never touches a widget tree directly. It sees elements as opaque
//! [`ElementId`] handles, measures them through a [`MeasureElement`] strategy,
//! and issues scroll commands on a [`ScrollView`].

pub mod memory;

pub use memory::{MemoryScrollView, ScrollCommand, ScrollCommandPath, Size};

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;
use crate::geometry::Rect;

/// Opaque handle to a live element in the host tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Target offset pair handed to the host's scroll primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollParams {
    pub x: f64,
    pub y: f64,
    pub animated: bool,
}

/// Scroll position of a container's content
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentOffset {
    pub x: f64,
    pub y: f64,
}

/// Native scroll notification forwarded by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub content_offset: ContentOffset,
}

/// Richer scroll command some containers expose; preferred over [`ScrollView::scroll_to`]
pub trait ScrollResponder: Send + Sync {
    fn scroll_responder_scroll_to(&self, params: ScrollParams) -> Result<(), PlatformError>;
}

/// A scrollable container provided by the host
#[async_trait::async_trait]
pub trait ScrollView: Send + Sync {
    /// Node handle of the container itself; `None` when it cannot be resolved
    fn node(&self) -> Option<ElementId>;

    /// Bounding rectangle of `node` in window coordinates
    async fn measure_in_window(&self, node: ElementId) -> Result<Rect, PlatformError>;

    fn scroll_responder(&self) -> Option<&dyn ScrollResponder> {
        None
    }

    fn scroll_to(&self, params: ScrollParams) -> Result<(), PlatformError>;
}

/// Measurement strategy, swappable per call through the option set
#[async_trait::async_trait]
pub trait MeasureElement: Send + Sync {
    async fn measure(
        &self,
        view: &dyn ScrollView,
        node: Option<ElementId>,
    ) -> Result<Rect, PlatformError>;
}

/// Default measurement: resolve the node, then ask the host for its window rectangle
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasureInWindow;

#[async_trait::async_trait]
impl MeasureElement for MeasureInWindow {
    async fn measure(
        &self,
        view: &dyn ScrollView,
        node: Option<ElementId>,
    ) -> Result<Rect, PlatformError> {
        let node = node.ok_or(PlatformError::NodeNotFound)?;
        view.measure_in_window(node).await
    }
}
