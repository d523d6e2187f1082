//! Offset computation for bringing a target rectangle into a container's visible region.
//!
//! Both axes run the same algorithm on their own slice of the input:
//! the vertical axis reads `y`/`height` and the top/bottom insets, the
//! horizontal axis reads `x`/`width` and the left/right insets. Results are
//! not clamped to the scrollable range; that is left to the host's scroll
//! primitive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Axis-aligned bounding box in window coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Safe-area padding subtracted from the visible region; absent edges count as 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
}

impl Insets {
    /// All four edges explicitly set to 0
    pub const fn zero() -> Self {
        Self::uniform(0.0)
    }

    pub const fn uniform(value: f64) -> Self {
        Self {
            top: Some(value),
            bottom: Some(value),
            left: Some(value),
            right: Some(value),
        }
    }

    /// Key-by-key merge: edges set in `over` win, the rest are kept
    pub fn merge(&self, over: &Insets) -> Insets {
        Insets {
            top: over.top.or(self.top),
            bottom: over.bottom.or(self.bottom),
            left: over.left.or(self.left),
            right: over.right.or(self.right),
        }
    }

    #[inline]
    pub fn top_or_zero(&self) -> f64 {
        self.top.unwrap_or(0.0)
    }

    #[inline]
    pub fn bottom_or_zero(&self) -> f64 {
        self.bottom.unwrap_or(0.0)
    }

    #[inline]
    pub fn left_or_zero(&self) -> f64 {
        self.left.unwrap_or(0.0)
    }

    #[inline]
    pub fn right_or_zero(&self) -> f64 {
        self.right.unwrap_or(0.0)
    }

    /// Reject negative or non-finite edges
    pub fn validate(&self) -> crate::Result<()> {
        let edges = [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
        ];
        for (name, value) in edges {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::Config(format!(
                        "inset \"{}\" must be a non-negative number, got {}",
                        name, v
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Which edge(s) of the target line up with the visible region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Align {
    /// Scroll the minimum amount needed, or not at all if already visible
    #[default]
    Auto,
    Start,
    End,
    Center,
}

impl Align {
    pub const ALL: [Align; 4] = [Align::Auto, Align::Start, Align::End, Align::Center];

    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Auto => "auto",
            Align::Start => "start",
            Align::End => "end",
            Align::Center => "center",
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Align {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Align::Auto),
            "start" => Ok(Align::Start),
            "end" => Ok(Align::End),
            "center" => Ok(Align::Center),
            other => Err(Error::UnsupportedAlignment(other.to_string())),
        }
    }
}

impl TryFrom<String> for Align {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Align> for String {
    fn from(align: Align) -> Self {
        align.as_str().to_string()
    }
}

/// One axis of a container/target pair, relative to the container's origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpan {
    /// Visible extent of the container along this axis
    pub container_extent: f64,
    /// Current scroll offset along this axis
    pub offset: f64,
    /// Target's leading edge relative to the container origin
    pub lead: f64,
    /// Target's trailing edge relative to the container origin
    pub trail: f64,
    pub start_inset: f64,
    pub end_inset: f64,
}

impl AxisSpan {
    pub fn vertical(container: &Rect, target: &Rect, scroll_y: f64, insets: &Insets) -> Self {
        let lead = target.y - container.y;
        Self {
            container_extent: container.height,
            offset: scroll_y,
            lead,
            trail: lead + target.height,
            start_inset: insets.top_or_zero(),
            end_inset: insets.bottom_or_zero(),
        }
    }

    pub fn horizontal(container: &Rect, target: &Rect, scroll_x: f64, insets: &Insets) -> Self {
        let lead = target.x - container.x;
        Self {
            container_extent: container.width,
            offset: scroll_x,
            lead,
            trail: lead + target.width,
            start_inset: insets.left_or_zero(),
            end_inset: insets.right_or_zero(),
        }
    }

    /// Offset placing the target's leading edge at the start of the visible region
    #[inline]
    pub fn start(&self) -> f64 {
        self.offset + self.lead - self.start_inset
    }

    /// Offset placing the target's trailing edge at the end of the visible region
    #[inline]
    pub fn end(&self) -> f64 {
        self.offset + self.trail - self.container_extent + self.end_inset
    }

    #[inline]
    pub fn center(&self) -> f64 {
        (self.start() + self.end()) / 2.0
    }

    /// Leading edge hidden: go to `start`. Trailing edge hidden: go to `end`.
    /// Otherwise keep the current offset. The comparison order is fixed, so a
    /// target larger than the container is resolved by the `start` check first.
    pub fn auto(&self) -> f64 {
        let start = self.start();
        if self.offset > start {
            return start;
        }
        let end = self.end();
        if self.offset < end {
            return end;
        }
        self.offset
    }

    pub fn resolve(&self, align: Align) -> f64 {
        match align {
            Align::Auto => self.auto(),
            Align::Start => self.start(),
            Align::End => self.end(),
            Align::Center => self.center(),
        }
    }
}

/// New vertical offset for `target` inside `container`
pub fn compute_scroll_y(
    container: &Rect,
    target: &Rect,
    scroll_y: f64,
    insets: &Insets,
    align: Align,
) -> f64 {
    AxisSpan::vertical(container, target, scroll_y, insets).resolve(align)
}

/// New horizontal offset for `target` inside `container`
pub fn compute_scroll_x(
    container: &Rect,
    target: &Rect,
    scroll_x: f64,
    insets: &Insets,
    align: Align,
) -> f64 {
    AxisSpan::horizontal(container, target, scroll_x, insets).resolve(align)
}
