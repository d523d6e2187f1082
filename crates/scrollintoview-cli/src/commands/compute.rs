use anyhow::Result;
use serde::Serialize;

use scrollintoview_core::options::normalize_options;
use scrollintoview_core::{Align, AppConfig, FullOptions, Insets, PartialOptions, Rect};

pub struct ComputeRequest {
    pub container: Rect,
    pub target: Rect,
    pub scroll_y: f64,
    pub scroll_x: f64,
    pub align: Option<Align>,
    pub insets: Option<Insets>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ComputeResult {
    pub x: f64,
    pub y: f64,
    pub align: Align,
    pub insets: Insets,
}

pub fn run(config: &AppConfig, request: &ComputeRequest, json: bool) -> Result<()> {
    let result = compute(config, request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("align: {}", result.align);
        println!("x: {} -> {}", request.scroll_x, result.x);
        println!("y: {} -> {}", request.scroll_y, result.y);
    }

    Ok(())
}

pub fn compute(config: &AppConfig, request: &ComputeRequest) -> Result<ComputeResult> {
    let mut overrides = PartialOptions::new();
    if let Some(align) = request.align {
        overrides = overrides.align(align);
    }
    if let Some(insets) = request.insets {
        insets.validate()?;
        overrides = overrides.insets(insets);
    }

    let layered = config.options.to_partial_options()?.merge(&overrides);
    let options = normalize_options(&layered, &FullOptions::default());

    let y = (options.compute_scroll_y)(
        &request.container,
        &request.target,
        request.scroll_y,
        &options.insets,
        options.align,
    );
    let x = (options.compute_scroll_x)(
        &request.container,
        &request.target,
        request.scroll_x,
        &options.insets,
        options.align,
    );

    Ok(ComputeResult {
        x,
        y,
        align: options.align,
        insets: options.insets,
    })
}

/// Parse `X,Y,W,H`
pub fn parse_rect(value: &str) -> std::result::Result<Rect, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid rect \"{}\": {}", value, e))?;

    match parts.as_slice() {
        [x, y, width, height] => Ok(Rect::new(*x, *y, *width, *height)),
        _ => Err(format!("invalid rect \"{}\": expected X,Y,W,H", value)),
    }
}

/// Parse `top=N,bottom=N,left=N,right=N`; any edge may be left out
pub fn parse_insets(value: &str) -> std::result::Result<Insets, String> {
    let mut insets = Insets::default();
    for pair in value.split(',').filter(|p| !p.trim().is_empty()) {
        let (edge, amount) = pair
            .split_once('=')
            .ok_or_else(|| format!("invalid inset \"{}\": expected EDGE=N", pair))?;
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|e| format!("invalid inset \"{}\": {}", pair, e))?;
        match edge.trim() {
            "top" => insets.top = Some(amount),
            "bottom" => insets.bottom = Some(amount),
            "left" => insets.left = Some(amount),
            "right" => insets.right = Some(amount),
            other => return Err(format!("unknown inset edge \"{}\"", other)),
        }
    }
    Ok(insets)
}
