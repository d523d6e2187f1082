use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::options::{normalize_options, FullOptions, PartialOptions};
use crate::platform::{ElementId, ScrollParams, ScrollView};

/// Measure `view` and `target`, compute new offsets and issue the scroll command
///
/// Usable without a controller. `options` is resolved against the global
/// defaults. Measurement and scroll failures come back as
/// [`Error::ScrollExecution`] with the platform error as its source.
pub async fn scroll_into_view(
    view: Option<Arc<dyn ScrollView>>,
    target: Option<ElementId>,
    scroll_y: f64,
    scroll_x: f64,
    options: PartialOptions,
) -> Result<ScrollParams> {
    let (view, target) = match (view, target) {
        (Some(view), Some(target)) => (view, target),
        _ => return Err(Error::MissingElement),
    };

    let options = normalize_options(&options, &FullOptions::default());
    let measure = options.measure_element.clone();

    let (container_rect, target_rect) = tokio::try_join!(
        measure.measure(view.as_ref(), view.node()),
        measure.measure(view.as_ref(), Some(target)),
    )
    .map_err(Error::scroll_execution)?;

    let y = (options.compute_scroll_y)(
        &container_rect,
        &target_rect,
        scroll_y,
        &options.insets,
        options.align,
    );
    let x = (options.compute_scroll_x)(
        &container_rect,
        &target_rect,
        scroll_x,
        &options.insets,
        options.align,
    );
    let params = ScrollParams {
        x,
        y,
        animated: options.animated,
    };

    let issued = match view.scroll_responder() {
        Some(responder) => {
            debug!(%target, x, y, align = %options.align, "Scrolling into view via scroll responder");
            responder.scroll_responder_scroll_to(params)
        }
        None => {
            debug!(%target, x, y, align = %options.align, "Scrolling into view");
            view.scroll_to(params)
        }
    };
    issued.map_err(Error::scroll_execution)?;

    Ok(params)
}
