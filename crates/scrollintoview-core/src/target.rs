//! Declarative scroll target
//!
//! A child of a wrapped scroll view that scrolls itself into view on mount
//! and when its props change. The host drives it with [`mount`], [`update`]
//! and [`unmount`] and polls whatever [`ScrollRequest`] comes back.
//!
//! [`mount`]: ScrollIntoViewTarget::mount
//! [`update`]: ScrollIntoViewTarget::update
//! [`unmount`]: ScrollIntoViewTarget::unmount

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tracing::warn;

use crate::api::{ScrollIntoViewApi, ScrollRequest};
use crate::context::ScrollContext;
use crate::geometry::{Align, Insets};
use crate::options::PartialOptions;
use crate::platform::ElementId;
use crate::throttle::{throttle, Throttled};

const NOT_IN_CONTEXT_WARNING_MS: u64 = 5000;

/// Value whose change re-triggers a scroll
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollKey {
    Text(String),
    Number(i64),
    Flag(bool),
}

impl From<&str> for ScrollKey {
    fn from(value: &str) -> Self {
        ScrollKey::Text(value.to_string())
    }
}

impl From<String> for ScrollKey {
    fn from(value: String) -> Self {
        ScrollKey::Text(value)
    }
}

impl From<i64> for ScrollKey {
    fn from(value: i64) -> Self {
        ScrollKey::Number(value)
    }
}

impl From<bool> for ScrollKey {
    fn from(value: bool) -> Self {
        ScrollKey::Flag(value)
    }
}

#[derive(Debug, Clone)]
pub struct TargetProps {
    pub enabled: bool,
    pub scroll_into_view_key: Option<ScrollKey>,
    pub on_mount: bool,
    pub on_update: bool,
    /// Base option layer for this target
    pub options: PartialOptions,
    // Individual option props, overriding `options`
    pub align: Option<Align>,
    pub animated: Option<bool>,
    pub immediate: Option<bool>,
    pub insets: Option<Insets>,
}

impl Default for TargetProps {
    fn default() -> Self {
        Self {
            enabled: true,
            scroll_into_view_key: None,
            on_mount: true,
            on_update: true,
            options: PartialOptions::default(),
            align: None,
            animated: None,
            immediate: None,
            insets: None,
        }
    }
}

impl TargetProps {
    /// Option layer the props describe
    pub fn options(&self) -> PartialOptions {
        let props = PartialOptions {
            align: self.align,
            animated: self.animated,
            immediate: self.immediate,
            insets: self.insets.unwrap_or_default(),
            ..PartialOptions::default()
        };
        self.options.merge(&props)
    }
}

pub struct ScrollIntoViewTarget {
    element: Option<ElementId>,
    props: TargetProps,
    api: Option<Arc<ScrollIntoViewApi>>,
    unmounted: bool,
}

impl ScrollIntoViewTarget {
    pub fn new(element: Option<ElementId>, props: TargetProps, context: &ScrollContext) -> Self {
        Self {
            element,
            props,
            api: context.api().cloned(),
            unmounted: false,
        }
    }

    pub fn props(&self) -> &TargetProps {
        &self.props
    }

    /// Host element this target measures as, once laid out
    pub fn set_element(&mut self, element: Option<ElementId>) {
        self.element = element;
    }

    pub fn mount(&mut self) -> Option<ScrollRequest> {
        if self.props.on_mount && self.props.enabled {
            self.scroll_into_view(PartialOptions::default())
        } else {
            None
        }
    }

    /// Apply new props; scrolls when the target became enabled or its key changed
    pub fn update(&mut self, props: TargetProps) -> Option<ScrollRequest> {
        let previous = std::mem::replace(&mut self.props, props);
        let props = &self.props;
        if !props.on_update {
            return None;
        }

        let has_been_enabled = props.enabled && !previous.enabled;
        let key_has_changed = props.scroll_into_view_key != previous.scroll_into_view_key;
        if has_been_enabled || (props.enabled && key_has_changed) {
            self.scroll_into_view(PartialOptions::default())
        } else {
            None
        }
    }

    /// No request is initiated after this; requests in flight are left alone
    pub fn unmount(&mut self) {
        self.unmounted = true;
    }

    /// Scroll with the props' options, overridden by `provided`
    pub fn scroll_into_view(&self, provided: PartialOptions) -> Option<ScrollRequest> {
        if self.unmounted {
            return None;
        }
        let Some(api) = &self.api else {
            warn_not_in_context();
            return None;
        };
        let options = self.props.options().merge(&provided);
        Some(api.scroll_into_view(self.element, options))
    }
}

type Warning = Throttled<fn(())>;

fn not_in_context_warning() -> Warning {
    let emit: fn(()) = |()| {
        warn!("ScrollIntoView API is not provided in context. Make sure the scroll view is wrapped.");
    };
    throttle(emit, Duration::from_millis(NOT_IN_CONTEXT_WARNING_MS))
}

fn warn_not_in_context() {
    static WARNING: OnceLock<Warning> = OnceLock::new();
    WARNING.get_or_init(not_in_context_warning).call(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ScrollOutcome;
    use crate::geometry::Rect;
    use crate::options::PartialWrapperConfig;
    use crate::platform::{MemoryScrollView, ScrollParams, Size};
    use crate::wrapper::ScrollViewWrapper;

    const LIST: ElementId = ElementId(1);
    const ROW: ElementId = ElementId(3);

    fn wrapped() -> (Arc<MemoryScrollView>, ScrollViewWrapper) {
        let view = Arc::new(
            MemoryScrollView::new(LIST, Rect::new(0.0, 0.0, 300.0, 500.0), Size::new(300.0, 3000.0))
                .with_child(ROW, Rect::new(0.0, 800.0, 300.0, 100.0)),
        );
        let wrapper = ScrollViewWrapper::new(&PartialWrapperConfig::default()).unwrap();
        wrapper.attach(view.clone());
        (view, wrapper)
    }

    fn immediate() -> TargetProps {
        TargetProps {
            immediate: Some(true),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_scrolls_on_mount() {
        let (view, wrapper) = wrapped();
        let mut target = ScrollIntoViewTarget::new(Some(ROW), immediate(), &wrapper.context());

        let outcome = target.mount().expect("mount should scroll").await.unwrap();
        assert_eq!(outcome, ScrollOutcome::Scrolled(ScrollParams { x: 0.0, y: 400.0, animated: true }));
        assert_eq!(view.commands().len(), 1);
    }

    #[test]
    fn test_no_mount_scroll_when_disabled() {
        let (_view, wrapper) = wrapped();
        let props = TargetProps { enabled: false, ..immediate() };
        let mut target = ScrollIntoViewTarget::new(Some(ROW), props, &wrapper.context());
        assert!(target.mount().is_none());

        let props = TargetProps { on_mount: false, ..immediate() };
        let mut target = ScrollIntoViewTarget::new(Some(ROW), props, &wrapper.context());
        assert!(target.mount().is_none());
    }

    #[test]
    fn test_update_triggers() {
        let (_view, wrapper) = wrapped();
        let props = TargetProps { enabled: false, ..immediate() };
        let mut target = ScrollIntoViewTarget::new(Some(ROW), props, &wrapper.context());

        // becoming enabled
        assert!(target.update(immediate()).is_some());
        // unchanged props
        assert!(target.update(immediate()).is_none());
        // key change while enabled
        let keyed = TargetProps { scroll_into_view_key: Some("a".into()), ..immediate() };
        assert!(target.update(keyed.clone()).is_some());
        assert!(target.update(keyed).is_none());
        // key change while disabled
        let disabled = TargetProps {
            enabled: false,
            scroll_into_view_key: Some(2.into()),
            ..immediate()
        };
        assert!(target.update(disabled).is_none());
        // on_update off
        let quiet = TargetProps {
            on_update: false,
            scroll_into_view_key: Some(true.into()),
            ..immediate()
        };
        assert!(target.update(quiet).is_none());
    }

    #[test]
    fn test_nothing_after_unmount() {
        let (view, wrapper) = wrapped();
        let mut target = ScrollIntoViewTarget::new(Some(ROW), immediate(), &wrapper.context());
        target.unmount();
        assert!(target.mount().is_none());
        assert!(target.scroll_into_view(PartialOptions::new()).is_none());
        assert!(view.commands().is_empty());
    }

    #[test]
    fn test_without_context_does_nothing() {
        let target = ScrollIntoViewTarget::new(Some(ROW), immediate(), &ScrollContext::empty());
        assert!(target.scroll_into_view(PartialOptions::new()).is_none());
        assert!(target.scroll_into_view(PartialOptions::new()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_context_warning_is_rate_limited() {
        let warning = not_in_context_warning();
        assert_eq!(warning.limit(), Duration::from_millis(5000));

        assert_eq!(warning.call(()), Some(()));
        tokio::time::advance(Duration::from_millis(4999)).await;
        assert_eq!(warning.call(()), None);
        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(warning.call(()), Some(()));
    }

    #[tokio::test]
    async fn test_element_resolved_after_layout() {
        let (view, wrapper) = wrapped();
        let mut target = ScrollIntoViewTarget::new(None, immediate(), &wrapper.context());
        assert!(target.props().enabled);

        let err = target.mount().unwrap().await.unwrap_err();
        assert!(matches!(err, crate::error::Error::MissingElement));

        target.set_element(Some(ROW));
        let outcome = target.scroll_into_view(PartialOptions::new()).unwrap().await.unwrap();
        assert_eq!(outcome, ScrollOutcome::Scrolled(ScrollParams { x: 0.0, y: 400.0, animated: true }));
        assert_eq!(view.commands().len(), 1);
    }

    #[tokio::test]
    async fn test_option_precedence() {
        let (_view, wrapper) = wrapped();
        let props = TargetProps {
            options: PartialOptions::new()
                .align(Align::Center)
                .insets(Insets { top: Some(30.0), ..Default::default() }),
            align: Some(Align::Start),
            ..immediate()
        };
        assert_eq!(props.options().align, Some(Align::Start));
        assert_eq!(props.options().insets.top, Some(30.0));

        let target = ScrollIntoViewTarget::new(Some(ROW), props, &wrapper.context());
        let outcome = target
            .scroll_into_view(PartialOptions::new().animated(false))
            .unwrap()
            .await
            .unwrap();
        assert_eq!(outcome, ScrollOutcome::Scrolled(ScrollParams { x: 0.0, y: 770.0, animated: false }));
    }
}
