pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod options;
pub mod platform;
pub mod scroll;
pub mod target;
pub mod throttle;
pub mod wrapper;

pub use api::{ScrollIntoViewApi, ScrollIntoViewDependencies, ScrollOutcome, ScrollRequest};
pub use config::AppConfig;
pub use context::{use_scroll_into_view, use_scroll_into_view_context, ScrollContext};
pub use error::{Error, PlatformError, Result};
pub use geometry::{compute_scroll_x, compute_scroll_y, Align, Insets, Rect};
pub use options::{FullOptions, PartialOptions, PartialWrapperConfig, WrapperConfig};
pub use platform::{ElementId, MemoryScrollView, ScrollParams, ScrollView};
pub use scroll::scroll_into_view;
pub use target::{ScrollIntoViewTarget, ScrollKey, TargetProps};
pub use throttle::{throttle, Throttle};
pub use wrapper::ScrollViewWrapper;
