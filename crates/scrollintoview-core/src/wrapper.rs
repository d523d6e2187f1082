//! Wrapped scroll view
//!
//! Sits between a host scroll view and the controller. It records the scroll
//! offset from every scroll event, owns the per-instance option layer, and
//! hands the controller accessors that read this state at call time.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::api::{ScrollIntoViewApi, ScrollIntoViewDependencies};
use crate::context::ScrollContext;
use crate::error::Result;
use crate::options::{
    normalize_options, normalize_wrapper_config, PartialOptions, PartialWrapperConfig, WrapperConfig,
};
use crate::platform::{ContentOffset, ScrollEvent, ScrollView};

#[derive(Default)]
struct WrapperState {
    scroll_view: Option<Arc<dyn ScrollView>>,
    offset: ContentOffset,
    options: PartialOptions,
}

type SharedState = Arc<RwLock<WrapperState>>;

/// Scroll view wrapper providing a [`ScrollContext`] to its descendants
pub struct ScrollViewWrapper {
    config: WrapperConfig,
    state: SharedState,
    api: Arc<ScrollIntoViewApi>,
}

impl ScrollViewWrapper {
    pub fn new(config: &PartialWrapperConfig) -> Result<Self> {
        let config = normalize_wrapper_config(config);
        let state: SharedState = Arc::default();
        let api = Arc::new(ScrollIntoViewApi::new(dependencies(&state, &config))?);

        Ok(Self { config, state, api })
    }

    /// Start from the host's initial content offset
    pub fn with_content_offset(self, offset: ContentOffset) -> Self {
        write(&self.state).offset = offset;
        self
    }

    /// Per-instance option layer, between the wrapper config and per-call options
    pub fn with_options(self, options: PartialOptions) -> Self {
        self.set_options(options);
        self
    }

    /// Bind the live scroll view once the host has created it
    pub fn attach(&self, view: Arc<dyn ScrollView>) {
        write(&self.state).scroll_view = Some(view);
    }

    pub fn detach(&self) {
        write(&self.state).scroll_view = None;
    }

    /// Replace the per-instance option layer; later scrolls see it
    pub fn set_options(&self, options: PartialOptions) {
        write(&self.state).options = options;
    }

    /// Record the offset reported by a native scroll event
    pub fn handle_scroll(&self, event: &ScrollEvent) {
        tracing::trace!(
            x = event.content_offset.x,
            y = event.content_offset.y,
            "Scroll offset updated"
        );
        write(&self.state).offset = event.content_offset;
    }

    pub fn content_offset(&self) -> ContentOffset {
        read(&self.state).offset
    }

    /// Interval the host should throttle scroll events to
    pub fn scroll_event_throttle(&self) -> Duration {
        self.config.scroll_event_throttle
    }

    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    pub fn api(&self) -> Arc<ScrollIntoViewApi> {
        self.api.clone()
    }

    /// Context to hand to descendants
    pub fn context(&self) -> ScrollContext {
        ScrollContext::from_api(self.api.clone())
    }
}

fn dependencies(state: &SharedState, config: &WrapperConfig) -> ScrollIntoViewDependencies {
    let view_state = state.clone();
    let y_state = state.clone();
    let x_state = state.clone();
    let options_state = state.clone();
    let wrapper_defaults = config.options.clone();

    ScrollIntoViewDependencies::new()
        .with_scroll_view(move || read(&view_state).scroll_view.clone())
        .with_scroll_y(move || read(&y_state).offset.y)
        .with_scroll_x(move || read(&x_state).offset.x)
        .with_default_options(move || normalize_options(&read(&options_state).options, &wrapper_defaults))
}

fn read(state: &RwLock<WrapperState>) -> RwLockReadGuard<'_, WrapperState> {
    state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(state: &RwLock<WrapperState>) -> RwLockWriteGuard<'_, WrapperState> {
    state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
