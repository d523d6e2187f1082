use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use scrollintoview_core::platform::{ContentOffset, Size};
use scrollintoview_core::{
    Align, AppConfig, ElementId, Insets, MemoryScrollView, PartialOptions, Rect, ScrollOutcome,
    ScrollViewWrapper,
};

/// Scenario file: one scroll view, its children, and the requests to replay
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub view: ViewSpec,
    /// Per-instance option layer of the wrapper
    #[serde(default)]
    pub options: RequestOptions,
    #[serde(default)]
    pub children: Vec<ChildSpec>,
    #[serde(default)]
    pub requests: Vec<RequestSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewSpec {
    #[serde(default = "default_view_id")]
    pub id: ElementId,
    pub viewport: Rect,
    pub content: Size,
    #[serde(default)]
    pub offset: ContentOffset,
    #[serde(default)]
    pub scroll_responder: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildSpec {
    pub id: ElementId,
    /// Layout rect in content coordinates
    pub rect: Rect,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestOptions {
    pub align: Option<Align>,
    pub animated: Option<bool>,
    pub immediate: Option<bool>,
    #[serde(default)]
    pub insets: Insets,
}

impl RequestOptions {
    fn to_partial_options(&self) -> Result<PartialOptions> {
        self.insets.validate()?;
        Ok(PartialOptions {
            align: self.align,
            animated: self.animated,
            immediate: self.immediate,
            insets: self.insets,
            ..PartialOptions::default()
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestSpec {
    /// Child to scroll to; absent means an unresolved target
    pub target: Option<ElementId>,
    /// Pause before issuing the request
    #[serde(default)]
    pub wait_ms: u64,
    #[serde(flatten)]
    pub options: RequestOptions,
}

fn default_view_id() -> ElementId {
    ElementId(1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepResult {
    Scrolled { x: f64, y: f64, animated: bool },
    Throttled,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub index: usize,
    pub target: Option<ElementId>,
    pub at_ms: u64,
    #[serde(flatten)]
    pub result: StepResult,
    /// Content offset once the scroll settled
    pub offset: ContentOffset,
}

pub async fn run(config: &AppConfig, path: &Path, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    let scenario: Scenario = toml::from_str(&content)
        .with_context(|| format!("Failed to parse scenario {}", path.display()))?;

    let steps = replay(config, &scenario).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
        return Ok(());
    }

    if steps.is_empty() {
        println!("Scenario has no requests.");
        return Ok(());
    }

    for step in &steps {
        let target = step
            .target
            .map(|t| t.to_string())
            .unwrap_or_else(|| "(none)".to_string());
        let result = match &step.result {
            StepResult::Scrolled { x, y, animated } => {
                format!("scrolled to ({}, {}){}", x, y, if *animated { " animated" } else { "" })
            }
            StepResult::Throttled => "throttled".to_string(),
            StepResult::Failed { error } => format!("failed: {}", error),
        };
        println!(
            "  [{}] +{}ms {} -> {}; offset ({}, {})",
            step.index, step.at_ms, target, result, step.offset.x, step.offset.y
        );
    }

    Ok(())
}

/// Replay every request of `scenario`, feeding scroll events back to the wrapper
pub async fn replay(config: &AppConfig, scenario: &Scenario) -> Result<Vec<Step>> {
    let layout = &scenario.view;
    let mut view = MemoryScrollView::new(layout.id, layout.viewport, layout.content)
        .with_offset(layout.offset)
        .with_scroll_responder(layout.scroll_responder);
    for child in &scenario.children {
        view = view.with_child(child.id, child.rect);
    }
    let view = Arc::new(view);

    let wrapper = ScrollViewWrapper::new(&config.wrapper_config()?)?
        .with_content_offset(layout.offset)
        .with_options(scenario.options.to_partial_options()?);
    wrapper.attach(view.clone());
    let api = wrapper.api();

    let started = tokio::time::Instant::now();
    let mut steps = Vec::with_capacity(scenario.requests.len());

    for (index, request) in scenario.requests.iter().enumerate() {
        if request.wait_ms > 0 {
            tokio::time::sleep(Duration::from_millis(request.wait_ms)).await;
        }
        let at_ms = started.elapsed().as_millis() as u64;

        let result = match api
            .scroll_into_view(request.target, request.options.to_partial_options()?)
            .await
        {
            Ok(ScrollOutcome::Scrolled(params)) => StepResult::Scrolled {
                x: params.x,
                y: params.y,
                animated: params.animated,
            },
            Ok(ScrollOutcome::Throttled) => StepResult::Throttled,
            Err(e) => {
                tracing::warn!(index, error = %e, "Scroll request failed");
                StepResult::Failed { error: e.to_string() }
            }
        };
        wrapper.handle_scroll(&view.scroll_event());

        steps.push(Step {
            index,
            target: request.target,
            at_ms,
            result,
            offset: wrapper.content_offset(),
        });
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
        [view]
        viewport = { x = 0.0, y = 0.0, width = 300.0, height = 500.0 }
        content = { width = 300.0, height = 3000.0 }

        [[children]]
        id = 2
        rect = { x = 0.0, y = 800.0, width = 300.0, height = 100.0 }

        [[children]]
        id = 3
        rect = { x = 0.0, y = 2000.0, width = 300.0, height = 100.0 }

        [[requests]]
        target = 2

        [[requests]]
        target = 3

        [[requests]]
        target = 3
        wait_ms = 20
        align = "start"
        animated = false

        [[requests]]
        target = 9
        immediate = true

        [[requests]]
        immediate = true
    "#;

    #[tokio::test(start_paused = true)]
    async fn test_replay() {
        let scenario: Scenario = toml::from_str(SCENARIO).unwrap();
        let steps = replay(&AppConfig::default(), &scenario).await.unwrap();

        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].result, StepResult::Scrolled { x: 0.0, y: 400.0, animated: true });
        assert_eq!(steps[0].offset, ContentOffset { x: 0.0, y: 400.0 });

        // inside the 16ms window of the first request
        assert_eq!(steps[1].result, StepResult::Throttled);
        assert_eq!(steps[1].offset.y, 400.0);

        assert_eq!(steps[2].at_ms, 20);
        assert_eq!(steps[2].result, StepResult::Scrolled { x: 0.0, y: 2000.0, animated: false });

        assert_eq!(
            steps[3].result,
            StepResult::Failed { error: "Failed to scroll into view: Unable to find node handle".to_string() }
        );
        assert_eq!(
            steps[4].result,
            StepResult::Failed { error: "ScrollView and target View must be provided".to_string() }
        );
        assert_eq!(steps[4].offset.y, 2000.0);
    }

    #[tokio::test]
    async fn test_wrapper_options_apply() {
        let scenario: Scenario = toml::from_str(
            r#"
            [view]
            viewport = { x = 0.0, y = 0.0, width = 300.0, height = 500.0 }
            content = { width = 300.0, height = 3000.0 }

            [options]
            align = "center"
            immediate = true

            [[children]]
            id = 2
            rect = { x = 0.0, y = 1000.0, width = 300.0, height = 100.0 }

            [[requests]]
            target = 2
            "#,
        )
        .unwrap();

        let steps = replay(&AppConfig::default(), &scenario).await.unwrap();
        // midpoint of start 1000 and end 600
        assert_eq!(steps[0].result, StepResult::Scrolled { x: 0.0, y: 800.0, animated: true });
    }
}
