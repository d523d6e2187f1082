//! In-memory scroll container
//!
//! Lays children out in content coordinates and reports them in window
//! coordinates shifted by the current scroll offset, the way a native list
//! would. Scroll commands are clamped to the scrollable range, since that is
//! the host primitive's job. Used by the CLI simulator and by tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ContentOffset, ElementId, ScrollEvent, ScrollParams, ScrollResponder, ScrollView};
use crate::error::PlatformError;
use crate::geometry::Rect;

/// Content dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Which host command carried a scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollCommandPath {
    ScrollTo,
    Responder,
}

/// Record of one scroll command received by the view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollCommand {
    pub path: ScrollCommandPath,
    pub requested: ScrollParams,
    /// Offset after clamping to the scrollable range
    pub applied: ContentOffset,
}

#[derive(Debug)]
struct MemoryState {
    mounted: bool,
    viewport: Rect,
    content: Size,
    offset: ContentOffset,
    children: HashMap<ElementId, Rect>,
    measurement_failures: HashMap<ElementId, String>,
    scroll_failure: Option<String>,
    commands: Vec<ScrollCommand>,
}

/// Scroll view backed by plain data
#[derive(Debug)]
pub struct MemoryScrollView {
    node: ElementId,
    responder: bool,
    measure_delay: Duration,
    state: Mutex<MemoryState>,
}

impl MemoryScrollView {
    pub fn new(node: ElementId, viewport: Rect, content: Size) -> Self {
        Self {
            node,
            responder: false,
            measure_delay: Duration::ZERO,
            state: Mutex::new(MemoryState {
                mounted: true,
                viewport,
                content,
                offset: ContentOffset::default(),
                children: HashMap::new(),
                measurement_failures: HashMap::new(),
                scroll_failure: None,
                commands: Vec::new(),
            }),
        }
    }

    /// Place a child at `rect`, given in content coordinates
    pub fn with_child(self, id: ElementId, rect: Rect) -> Self {
        self.add_child(id, rect);
        self
    }

    pub fn with_offset(self, offset: ContentOffset) -> Self {
        self.state().offset = offset;
        self
    }

    /// Expose a scroll responder in addition to the plain scroll command
    pub fn with_scroll_responder(mut self, enabled: bool) -> Self {
        self.responder = enabled;
        self
    }

    /// Simulated latency of each measurement
    pub fn with_measure_delay(mut self, delay: Duration) -> Self {
        self.measure_delay = delay;
        self
    }

    pub fn add_child(&self, id: ElementId, rect: Rect) {
        self.state().children.insert(id, rect);
    }

    pub fn remove_child(&self, id: ElementId) {
        self.state().children.remove(&id);
    }

    /// Make every later measurement of `id` fail with `message`
    pub fn fail_measurement(&self, id: ElementId, message: impl Into<String>) {
        self.state().measurement_failures.insert(id, message.into());
    }

    /// Make every later scroll command fail with `message`
    pub fn fail_scroll(&self, message: impl Into<String>) {
        self.state().scroll_failure = Some(message.into());
    }

    /// Drop the node handle, as a torn-down native view would
    pub fn unmount(&self) {
        self.state().mounted = false;
    }

    pub fn content_offset(&self) -> ContentOffset {
        self.state().offset
    }

    /// Scroll event describing the current offset
    pub fn scroll_event(&self) -> ScrollEvent {
        ScrollEvent {
            content_offset: self.content_offset(),
        }
    }

    pub fn commands(&self) -> Vec<ScrollCommand> {
        self.state().commands.clone()
    }

    /// Largest valid offset on each axis
    pub fn max_offset(&self) -> ContentOffset {
        let state = self.state();
        ContentOffset {
            x: (state.content.width - state.viewport.width).max(0.0),
            y: (state.content.height - state.viewport.height).max(0.0),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply(&self, path: ScrollCommandPath, params: ScrollParams) -> Result<(), PlatformError> {
        let max = self.max_offset();
        let mut state = self.state();
        if let Some(message) = &state.scroll_failure {
            return Err(PlatformError::Scroll(message.clone()));
        }
        let applied = ContentOffset {
            x: params.x.clamp(0.0, max.x),
            y: params.y.clamp(0.0, max.y),
        };
        state.offset = applied;
        state.commands.push(ScrollCommand {
            path,
            requested: params,
            applied,
        });
        Ok(())
    }

    fn window_rect(&self, node: ElementId) -> Result<Rect, PlatformError> {
        let state = self.state();
        if let Some(message) = state.measurement_failures.get(&node) {
            return Err(PlatformError::Measurement(message.clone()));
        }
        if node == self.node {
            return if state.mounted {
                Ok(state.viewport)
            } else {
                Err(PlatformError::NodeNotFound)
            };
        }
        let child = state.children.get(&node).ok_or(PlatformError::NodeNotFound)?;
        Ok(Rect {
            x: state.viewport.x + child.x - state.offset.x,
            y: state.viewport.y + child.y - state.offset.y,
            width: child.width,
            height: child.height,
        })
    }
}

#[async_trait::async_trait]
impl ScrollView for MemoryScrollView {
    fn node(&self) -> Option<ElementId> {
        self.state().mounted.then_some(self.node)
    }

    async fn measure_in_window(&self, node: ElementId) -> Result<Rect, PlatformError> {
        if !self.measure_delay.is_zero() {
            tokio::time::sleep(self.measure_delay).await;
        }
        self.window_rect(node)
    }

    fn scroll_responder(&self) -> Option<&dyn ScrollResponder> {
        if self.responder {
            Some(self as &dyn ScrollResponder)
        } else {
            None
        }
    }

    fn scroll_to(&self, params: ScrollParams) -> Result<(), PlatformError> {
        self.apply(ScrollCommandPath::ScrollTo, params)
    }
}

impl ScrollResponder for MemoryScrollView {
    fn scroll_responder_scroll_to(&self, params: ScrollParams) -> Result<(), PlatformError> {
        self.apply(ScrollCommandPath::Responder, params)
    }
}
