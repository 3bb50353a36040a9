//! heatgrid - class-boundary heatmap renderer
//!
//! Reads a delimited dataset, reshapes it into long-format
//! (group, variable, value, class) tuples and renders them as a
//! color-encoded heatmap with a separator line at the first class change.

mod charts;
mod config;
mod data;

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use charts::HeatmapRenderer;
use config::ChartSpec;
use data::Reshaper;

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // One optional argument: a JSON chart spec. Everything else is defaults.
    let spec = match std::env::args().nth(1) {
        Some(path) => ChartSpec::from_file(Path::new(&path))
            .with_context(|| format!("failed to load chart spec from {path}"))?,
        None => ChartSpec::default(),
    };

    info!("loading dataset from {}", spec.input.display());
    let dataset = data::load_in_background(spec.input.clone())
        .wait()
        .with_context(|| format!("failed to load dataset {}", spec.input.display()))?;
    info!(
        "loaded {} records with {} columns",
        dataset.records.len(),
        dataset.columns.len()
    );

    let mut tuples = Reshaper::stack_to_long(
        &dataset,
        &spec.class_column,
        &spec.group_label,
        spec.features.as_deref(),
    );
    Reshaper::sort_by_class(&mut tuples);
    info!("reshaped into {} long-format tuples", tuples.len());

    HeatmapRenderer::new(&spec)
        .render_to_file(&tuples, &spec.output)
        .with_context(|| format!("failed to render {}", spec.output.display()))?;
    info!("wrote heatmap to {}", spec.output.display());

    if spec.open_after_render {
        open::that(&spec.output)
            .with_context(|| format!("failed to open {}", spec.output.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::boundary_group;
    use std::fs;
    use tempfile::TempDir;

    // The worked example from the design note: two records, class -1 then 1.
    #[test]
    fn pipeline_orders_tuples_and_finds_the_boundary() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("data.csv");
        fs::write(&csv, "y,f1,f2\n-1,0.2,-0.5\n1,1.0,0.9\n").unwrap();

        let spec = ChartSpec::default();
        let dataset = data::load(&csv).unwrap();
        let mut tuples = Reshaper::stack_to_long(
            &dataset,
            &spec.class_column,
            &spec.group_label,
            spec.features.as_deref(),
        );
        Reshaper::sort_by_class(&mut tuples);

        // 2 records x 2 non-class features.
        assert_eq!(tuples.len(), 4);

        // All class -1 tuples (group 0) precede the class 1 tuples (group 1).
        assert!(tuples[..2].iter().all(|t| t.group == 0 && t.class == "-1"));
        assert!(tuples[2..].iter().all(|t| t.group == 1 && t.class == "1"));
        assert_eq!(tuples[0].variable, "f1");
        assert_eq!(tuples[1].variable, "f2");

        // The separator belongs at the first group of the second class.
        assert_eq!(boundary_group(&tuples), Some(1));
    }

    #[test]
    fn background_load_feeds_the_reshaper() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("data.csv");
        fs::write(&csv, "y,a,b,c\n-1,1,2,3\n-1,4,5,6\n1,7,8,9\n").unwrap();

        let dataset = data::load_in_background(csv).wait().unwrap();
        let tuples = Reshaper::stack_to_long(&dataset, "y", "group", None);

        // 3 records x 3 non-class features.
        assert_eq!(tuples.len(), 9);
    }
}
