//! Dispatch controller
//!
//! Resolves options and live state through injected accessors, then runs the
//! scroll either straight away (`immediate`) or through a per-instance
//! throttle that admits one scroll per animation frame.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::error::{Error, Result};
use crate::options::{normalize_options, FullOptions, PartialOptions};
use crate::platform::{ElementId, ScrollParams, ScrollView};
use crate::scroll;
use crate::throttle::{throttle, Throttled};

/// Minimum interval between throttled scrolls, one frame at 60Hz
pub const SCROLL_THROTTLE_MS: u64 = 16;

pub type GetScrollView = Arc<dyn Fn() -> Option<Arc<dyn ScrollView>> + Send + Sync>;
pub type GetOffset = Arc<dyn Fn() -> f64 + Send + Sync>;
pub type GetDefaultOptions = Arc<dyn Fn() -> FullOptions + Send + Sync>;

/// Pending scroll returned by [`ScrollIntoViewApi::scroll_into_view`]
pub type ScrollRequest = Pin<Box<dyn Future<Output = Result<ScrollOutcome>> + Send>>;

/// What became of a scroll request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    /// The scroll command was issued with these parameters
    Scrolled(ScrollParams),
    /// Dropped by the throttle
    Throttled,
}

/// Accessors a controller reads live state through
#[derive(Clone, Default)]
pub struct ScrollIntoViewDependencies {
    pub get_scroll_view: Option<GetScrollView>,
    pub get_scroll_y: Option<GetOffset>,
    pub get_scroll_x: Option<GetOffset>,
    pub get_default_options: Option<GetDefaultOptions>,
}

impl ScrollIntoViewDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scroll_view<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Option<Arc<dyn ScrollView>> + Send + Sync + 'static,
    {
        self.get_scroll_view = Some(Arc::new(f));
        self
    }

    pub fn with_scroll_y<F>(mut self, f: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.get_scroll_y = Some(Arc::new(f));
        self
    }

    pub fn with_scroll_x<F>(mut self, f: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.get_scroll_x = Some(Arc::new(f));
        self
    }

    pub fn with_default_options<F>(mut self, f: F) -> Self
    where
        F: Fn() -> FullOptions + Send + Sync + 'static,
    {
        self.get_default_options = Some(Arc::new(f));
        self
    }
}

struct Resolved {
    get_scroll_view: GetScrollView,
    get_scroll_y: GetOffset,
    get_scroll_x: GetOffset,
    get_default_options: GetDefaultOptions,
}

impl TryFrom<ScrollIntoViewDependencies> for Resolved {
    type Error = Error;

    fn try_from(deps: ScrollIntoViewDependencies) -> Result<Self> {
        Ok(Self {
            get_scroll_view: deps
                .get_scroll_view
                .ok_or(Error::InvalidDependency("get_scroll_view"))?,
            get_scroll_y: deps
                .get_scroll_y
                .ok_or(Error::InvalidDependency("get_scroll_y"))?,
            get_scroll_x: deps
                .get_scroll_x
                .ok_or(Error::InvalidDependency("get_scroll_x"))?,
            get_default_options: deps
                .get_default_options
                .ok_or(Error::InvalidDependency("get_default_options"))?,
        })
    }
}

type PerformScroll = Box<dyn Fn((Option<ElementId>, FullOptions)) -> ScrollRequest + Send + Sync>;

/// Scrolls targets into view inside one scroll container
pub struct ScrollIntoViewApi {
    deps: Arc<Resolved>,
    throttled_scroll: Throttled<PerformScroll>,
}

impl ScrollIntoViewApi {
    /// Fails if any accessor is missing
    pub fn new(dependencies: ScrollIntoViewDependencies) -> Result<Self> {
        let deps = Arc::new(Resolved::try_from(dependencies)?);
        let shared = deps.clone();
        let perform: PerformScroll = Box::new(move |(target, options): (Option<ElementId>, FullOptions)| {
            perform_scroll(&shared, target, options)
        });

        Ok(Self {
            deps,
            throttled_scroll: throttle(perform, Duration::from_millis(SCROLL_THROTTLE_MS)),
        })
    }

    /// `options` over the current defaults
    pub fn normalized_options(&self, options: &PartialOptions) -> FullOptions {
        normalize_options(options, &(self.deps.get_default_options)())
    }

    /// Request a scroll bringing `target` into view
    ///
    /// Options and the throttle are resolved when this is called; the
    /// returned future performs measurement and the scroll command.
    pub fn scroll_into_view(
        &self,
        target: impl Into<Option<ElementId>>,
        options: PartialOptions,
    ) -> ScrollRequest {
        let target = target.into();
        let options = self.normalized_options(&options);

        if options.immediate {
            perform_scroll(&self.deps, target, options)
        } else {
            self.throttled_scroll
                .call((target, options))
                .unwrap_or_else(|| {
                    trace!(?target, "Scroll request throttled");
                    Box::pin(async { Ok(ScrollOutcome::Throttled) })
                })
        }
    }
}

fn perform_scroll(deps: &Resolved, target: Option<ElementId>, options: FullOptions) -> ScrollRequest {
    let view = (deps.get_scroll_view)();
    let scroll_y = (deps.get_scroll_y)();
    let scroll_x = (deps.get_scroll_x)();

    Box::pin(async move {
        scroll::scroll_into_view(view, target, scroll_y, scroll_x, options.into())
            .await
            .map(ScrollOutcome::Scrolled)
    })
}
