use std::sync::Arc;

use crate::api::{ScrollIntoViewApi, ScrollIntoViewDependencies, ScrollRequest};
use crate::error::{Error, Result};
use crate::options::PartialOptions;
use crate::platform::ElementId;

/// Carries the controller of the nearest wrapped scroll view, if any
#[derive(Clone, Default)]
pub struct ScrollContext {
    api: Option<Arc<ScrollIntoViewApi>>,
}

impl ScrollContext {
    /// Context with no controller
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a controller from `dependencies` and provide it
    pub fn provide(dependencies: ScrollIntoViewDependencies) -> Result<Self> {
        Ok(Self::from_api(Arc::new(ScrollIntoViewApi::new(dependencies)?)))
    }

    pub fn from_api(api: Arc<ScrollIntoViewApi>) -> Self {
        Self { api: Some(api) }
    }

    pub fn api(&self) -> Option<&Arc<ScrollIntoViewApi>> {
        self.api.as_ref()
    }
}

/// The provided controller, or [`Error::MissingContext`]
pub fn use_scroll_into_view_context(context: &ScrollContext) -> Result<Arc<ScrollIntoViewApi>> {
    context.api().cloned().ok_or(Error::MissingContext)
}

/// The provided controller's scroll function
pub fn use_scroll_into_view(
    context: &ScrollContext,
) -> Result<impl Fn(ElementId, PartialOptions) -> ScrollRequest + Clone + Send + Sync> {
    let api = use_scroll_into_view_context(context)?;
    Ok(move |target: ElementId, options: PartialOptions| api.scroll_into_view(target, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ScrollOutcome;
    use crate::geometry::Rect;
    use crate::options::FullOptions;
    use crate::platform::{MemoryScrollView, ScrollView, Size};

    #[test]
    fn test_missing_context() {
        let err = use_scroll_into_view(&ScrollContext::empty()).err().unwrap();
        assert!(matches!(err, Error::MissingContext));
        assert!(err.to_string().starts_with("ScrollIntoView context is missing"));
    }

    #[test]
    fn test_provide_validates_dependencies() {
        let err = ScrollContext::provide(ScrollIntoViewDependencies::new()).err().unwrap();
        assert!(matches!(err, Error::InvalidDependency("get_scroll_view")));
    }

    #[tokio::test]
    async fn test_hook_scrolls_through_provided_api() {
        let view = Arc::new(
            MemoryScrollView::new(ElementId(1), Rect::new(0.0, 0.0, 300.0, 500.0), Size::new(300.0, 2000.0))
                .with_child(ElementId(5), Rect::new(0.0, 900.0, 300.0, 50.0)),
        );
        let handle = view.clone();
        let context = ScrollContext::provide(
            ScrollIntoViewDependencies::new()
                .with_scroll_view(move || Some(handle.clone() as Arc<dyn ScrollView>))
                .with_scroll_y(|| 0.0)
                .with_scroll_x(|| 0.0)
                .with_default_options(FullOptions::default),
        )
        .unwrap();

        let scroll = use_scroll_into_view(&context).unwrap();
        let outcome = scroll(ElementId(5), PartialOptions::new()).await.unwrap();
        assert!(matches!(outcome, ScrollOutcome::Scrolled(p) if p.y == 450.0));
        assert_eq!(view.content_offset().y, 450.0);
    }
}
