//! Layered scroll options
//!
//! A scroll call sees one [`FullOptions`] value, produced by merging option
//! layers in order of precedence: per-call over per-wrapper-instance over the
//! global defaults. Layers are merged field by field, insets edge by edge.
//! Nothing is mutated in place.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::geometry::{compute_scroll_x, compute_scroll_y, Align, Insets, Rect};
use crate::platform::{MeasureElement, MeasureInWindow};

/// Per-axis offset strategy: (container, target, current offset, insets, align) -> new offset
pub type ComputeScrollFn = Arc<dyn Fn(&Rect, &Rect, f64, &Insets, Align) -> f64 + Send + Sync>;

/// Scroll-event throttle a wrapped scroll view requests from its host, in ms
pub const DEFAULT_SCROLL_EVENT_THROTTLE_MS: u64 = 16;

/// Fully resolved options for a single scroll
#[derive(Clone)]
pub struct FullOptions {
    pub align: Align,
    pub animated: bool,
    /// Bypass the controller's throttle
    pub immediate: bool,
    pub insets: Insets,
    pub compute_scroll_y: ComputeScrollFn,
    pub compute_scroll_x: ComputeScrollFn,
    pub measure_element: Arc<dyn MeasureElement>,
}

impl Default for FullOptions {
    fn default() -> Self {
        Self {
            align: Align::Auto,
            animated: true,
            immediate: false,
            insets: Insets::zero(),
            compute_scroll_y: Arc::new(compute_scroll_y),
            compute_scroll_x: Arc::new(compute_scroll_x),
            measure_element: Arc::new(MeasureInWindow),
        }
    }
}

impl fmt::Debug for FullOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullOptions")
            .field("align", &self.align)
            .field("animated", &self.animated)
            .field("immediate", &self.immediate)
            .field("insets", &self.insets)
            .finish_non_exhaustive()
    }
}

/// One option layer; unset fields fall through to the layer below
#[derive(Clone, Default)]
pub struct PartialOptions {
    pub align: Option<Align>,
    pub animated: Option<bool>,
    pub immediate: Option<bool>,
    pub insets: Insets,
    pub compute_scroll_y: Option<ComputeScrollFn>,
    pub compute_scroll_x: Option<ComputeScrollFn>,
    pub measure_element: Option<Arc<dyn MeasureElement>>,
}

impl PartialOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = Some(animated);
        self
    }

    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = Some(immediate);
        self
    }

    pub fn insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    pub fn compute_scroll_y<F>(mut self, f: F) -> Self
    where
        F: Fn(&Rect, &Rect, f64, &Insets, Align) -> f64 + Send + Sync + 'static,
    {
        self.compute_scroll_y = Some(Arc::new(f));
        self
    }

    pub fn compute_scroll_x<F>(mut self, f: F) -> Self
    where
        F: Fn(&Rect, &Rect, f64, &Insets, Align) -> f64 + Send + Sync + 'static,
    {
        self.compute_scroll_x = Some(Arc::new(f));
        self
    }

    pub fn measure_element(mut self, measure: impl MeasureElement + 'static) -> Self {
        self.measure_element = Some(Arc::new(measure));
        self
    }

    /// Stack `over` on top of this layer
    pub fn merge(&self, over: &PartialOptions) -> PartialOptions {
        PartialOptions {
            align: over.align.or(self.align),
            animated: over.animated.or(self.animated),
            immediate: over.immediate.or(self.immediate),
            insets: self.insets.merge(&over.insets),
            compute_scroll_y: over
                .compute_scroll_y
                .clone()
                .or_else(|| self.compute_scroll_y.clone()),
            compute_scroll_x: over
                .compute_scroll_x
                .clone()
                .or_else(|| self.compute_scroll_x.clone()),
            measure_element: over
                .measure_element
                .clone()
                .or_else(|| self.measure_element.clone()),
        }
    }
}

impl From<FullOptions> for PartialOptions {
    fn from(full: FullOptions) -> Self {
        Self {
            align: Some(full.align),
            animated: Some(full.animated),
            immediate: Some(full.immediate),
            insets: full.insets,
            compute_scroll_y: Some(full.compute_scroll_y),
            compute_scroll_x: Some(full.compute_scroll_x),
            measure_element: Some(full.measure_element),
        }
    }
}

impl fmt::Debug for PartialOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialOptions")
            .field("align", &self.align)
            .field("animated", &self.animated)
            .field("immediate", &self.immediate)
            .field("insets", &self.insets)
            .field("compute_scroll_y", &self.compute_scroll_y.is_some())
            .field("compute_scroll_x", &self.compute_scroll_x.is_some())
            .field("measure_element", &self.measure_element.is_some())
            .finish()
    }
}

/// Resolve `options` against `fallback`
pub fn normalize_options(options: &PartialOptions, fallback: &FullOptions) -> FullOptions {
    FullOptions {
        align: options.align.unwrap_or(fallback.align),
        animated: options.animated.unwrap_or(fallback.animated),
        immediate: options.immediate.unwrap_or(fallback.immediate),
        insets: fallback.insets.merge(&options.insets),
        compute_scroll_y: options
            .compute_scroll_y
            .clone()
            .unwrap_or_else(|| fallback.compute_scroll_y.clone()),
        compute_scroll_x: options
            .compute_scroll_x
            .clone()
            .unwrap_or_else(|| fallback.compute_scroll_x.clone()),
        measure_element: options
            .measure_element
            .clone()
            .unwrap_or_else(|| fallback.measure_element.clone()),
    }
}

/// Settings of a wrapped scroll view, resolved
#[derive(Debug, Clone)]
pub struct WrapperConfig {
    pub scroll_event_throttle: Duration,
    /// Defaults every controller of this wrapper starts from
    pub options: FullOptions,
}

/// Settings of a wrapped scroll view as supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct PartialWrapperConfig {
    pub scroll_event_throttle: Option<Duration>,
    pub options: PartialOptions,
}

impl PartialWrapperConfig {
    pub fn with_scroll_event_throttle(mut self, throttle: Duration) -> Self {
        self.scroll_event_throttle = Some(throttle);
        self
    }

    pub fn with_options(mut self, options: PartialOptions) -> Self {
        self.options = options;
        self
    }
}

pub fn normalize_wrapper_config(config: &PartialWrapperConfig) -> WrapperConfig {
    WrapperConfig {
        scroll_event_throttle: config
            .scroll_event_throttle
            .unwrap_or(Duration::from_millis(DEFAULT_SCROLL_EVENT_THROTTLE_MS)),
        options: normalize_options(&config.options, &FullOptions::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FullOptions::default();
        assert_eq!(options.align, Align::Auto);
        assert!(options.animated);
        assert!(!options.immediate);
        assert_eq!(options.insets, Insets::zero());
    }

    #[test]
    fn test_normalize_with_no_overrides_keeps_fallback() {
        let fallback = FullOptions {
            align: Align::Center,
            animated: false,
            ..Default::default()
        };
        let options = normalize_options(&PartialOptions::new(), &fallback);
        assert_eq!(options.align, Align::Center);
        assert!(!options.animated);
        assert_eq!(options.insets, Insets::zero());
    }

    #[test]
    fn test_precedence_call_over_instance_over_global() {
        let global = FullOptions::default();
        let instance = PartialOptions::new()
            .align(Align::Start)
            .animated(false)
            .insets(Insets { top: Some(10.0), bottom: Some(4.0), ..Default::default() });
        let call = PartialOptions::new()
            .align(Align::End)
            .insets(Insets { top: Some(20.0), ..Default::default() });

        let instance_defaults = normalize_options(&instance, &global);
        let merged = normalize_options(&call, &instance_defaults);

        assert_eq!(merged.align, Align::End);
        assert!(!merged.animated);
        assert!(!merged.immediate);
        assert_eq!(merged.insets.top, Some(20.0));
        assert_eq!(merged.insets.bottom, Some(4.0));
        assert_eq!(merged.insets.left, Some(0.0));
    }

    #[test]
    fn test_partial_merge_matches_sequential_normalize() {
        let base = PartialOptions::new().align(Align::Start).insets(Insets {
            left: Some(3.0),
            ..Default::default()
        });
        let over = PartialOptions::new().immediate(true).insets(Insets {
            right: Some(5.0),
            ..Default::default()
        });

        let stacked = normalize_options(&base.merge(&over), &FullOptions::default());
        assert_eq!(stacked.align, Align::Start);
        assert!(stacked.immediate);
        assert_eq!(stacked.insets.left, Some(3.0));
        assert_eq!(stacked.insets.right, Some(5.0));
    }

    #[test]
    fn test_strategy_override() {
        let options = normalize_options(
            &PartialOptions::new().compute_scroll_y(|_, _, _, _, _| 42.0),
            &FullOptions::default(),
        );
        let rect = Rect::default();
        assert_eq!((options.compute_scroll_y)(&rect, &rect, 0.0, &Insets::zero(), Align::Auto), 42.0);
        assert_eq!((options.compute_scroll_x)(&rect, &rect, 7.0, &Insets::zero(), Align::Auto), 7.0);
    }

    #[test]
    fn test_wrapper_config_defaults() {
        let config = normalize_wrapper_config(&PartialWrapperConfig::default());
        assert_eq!(config.scroll_event_throttle, Duration::from_millis(16));
        assert_eq!(config.options.align, Align::Auto);

        let config = normalize_wrapper_config(
            &PartialWrapperConfig::default()
                .with_options(PartialOptions::new().align(Align::Center))
                .with_scroll_event_throttle(Duration::from_millis(32)),
        );
        assert_eq!(config.scroll_event_throttle, Duration::from_millis(32));
        assert_eq!(config.options.align, Align::Center);
        assert_eq!(config.options.insets, Insets::zero());
    }
}
