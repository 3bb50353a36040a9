//! Static Heatmap Renderer
//! Draws the long-format tuples as a color-encoded grid.
//!
//! Layout:
//! 1. Title and subtitle in the top margin
//! 2. Grid of cells: x = group id, y = variable, fill = Viridis(value)
//! 3. Green vertical separator at the first class change
//! 4. Axis tick labels: group ids below, variable names at the left edge

use crate::charts::{first_occurrence, BandScale, SequentialScale};
use crate::config::ChartSpec;
use crate::data::LongTuple;
use image::RgbImage;
use log::warn;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

const BOUNDARY_COLOR: RGBColor = GREEN;
const SUBTITLE_COLOR: RGBColor = RGBColor(128, 128, 128);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Render buffer size mismatch")]
    BufferSize,
}

/// Group id of the first tuple, in sorted order, whose class is not -1.
///
/// Relies on the class-sorted ordering: all -1 tuples precede the rest, so a
/// linear scan finds the boundary. `None` when the scan exhausts the
/// sequence (every class is -1, or there are no tuples).
pub fn boundary_group(tuples: &[LongTuple]) -> Option<usize> {
    tuples
        .iter()
        .find(|t| t.class_key() != -1.0)
        .map(|t| t.group)
}

/// Renders one heatmap from a class-sorted tuple sequence.
pub struct HeatmapRenderer<'a> {
    spec: &'a ChartSpec,
}

impl<'a> HeatmapRenderer<'a> {
    pub fn new(spec: &'a ChartSpec) -> Self {
        Self { spec }
    }

    /// Render into an in-memory RGB image of the configured canvas size.
    pub fn render_to_image(&self, tuples: &[LongTuple]) -> Result<RgbImage, RenderError> {
        let (w, h) = (self.spec.width, self.spec.height);
        let mut buf = vec![0u8; w as usize * h as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
            self.render(&root, tuples)?;
            root.present()
                .map_err(|e| RenderError::Draw(e.to_string()))?;
        }
        RgbImage::from_raw(w, h, buf).ok_or(RenderError::BufferSize)
    }

    /// Render and encode to `path` (format chosen by extension).
    pub fn render_to_file(&self, tuples: &[LongTuple], path: &Path) -> Result<(), RenderError> {
        let img = self.render_to_image(tuples)?;
        img.save(path)?;
        Ok(())
    }

    /// Single render pass: background, cells, boundary, labels, titles.
    fn render<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        tuples: &[LongTuple],
    ) -> Result<(), RenderError> {
        root.fill(&WHITE)
            .map_err(|e| RenderError::Draw(e.to_string()))?;

        let (x, y, color) = self.build_scales(tuples);
        self.draw_cells(root, tuples, &x, &y, &color)?;
        self.draw_boundary(root, tuples, &x)?;
        self.draw_axis_labels(root, &x, &y)?;
        self.draw_titles(root)?;
        Ok(())
    }

    /// Scales for the render pass. Both band domains come from the sorted
    /// tuples in first-occurrence order; the y range is inverted.
    fn build_scales(
        &self,
        tuples: &[LongTuple],
    ) -> (BandScale<usize>, BandScale<String>, SequentialScale) {
        let groups = first_occurrence(tuples.iter().map(|t| t.group));
        let variables = first_occurrence(tuples.iter().map(|t| t.variable.clone()));

        let x = BandScale::new(
            groups,
            (0.0, self.spec.plot_width() as f64),
            self.spec.band_padding,
        );
        let y = BandScale::new(
            variables,
            (self.spec.plot_height() as f64, 0.0),
            self.spec.band_padding,
        );
        let color = SequentialScale::new(self.spec.color_domain);
        (x, y, color)
    }

    /// One rectangle per tuple. Tuples whose value has no color (raw cell
    /// did not parse to a finite number) draw nothing.
    fn draw_cells<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        tuples: &[LongTuple],
        x: &BandScale<usize>,
        y: &BandScale<String>,
        color: &SequentialScale,
    ) -> Result<(), RenderError> {
        let ox = self.spec.margins.left as f64;
        let oy = self.spec.margins.top as f64;
        let bw = x.bandwidth();
        let bh = y.bandwidth();

        for tuple in tuples {
            let (Some(cx), Some(cy)) = (x.position(&tuple.group), y.position(&tuple.variable))
            else {
                continue;
            };
            let Some(fill) = color.color(tuple.numeric_value()) else {
                continue;
            };

            let corner0 = ((ox + cx).round() as i32, (oy + cy).round() as i32);
            let corner1 = (
                (ox + cx + bw).round() as i32,
                (oy + cy + bh).round() as i32,
            );
            root.draw(&Rectangle::new(
                [corner0, corner1],
                fill.mix(self.spec.cell_opacity).filled(),
            ))
            .map_err(|e| RenderError::Draw(e.to_string()))?;
        }
        Ok(())
    }

    /// Vertical separator spanning the plot height at the first class change.
    fn draw_boundary<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        tuples: &[LongTuple],
        x: &BandScale<usize>,
    ) -> Result<(), RenderError> {
        let Some(group) = boundary_group(tuples) else {
            warn!("no class boundary found; separator line skipped");
            return Ok(());
        };
        let Some(bx) = x.position(&group) else {
            return Ok(());
        };

        let px = (self.spec.margins.left as f64 + bx).round() as i32;
        let top = self.spec.margins.top as i32;
        let bottom = top + self.spec.plot_height() as i32;
        root.draw(&PathElement::new(
            vec![(px, top), (px, bottom)],
            BOUNDARY_COLOR.stroke_width(2),
        ))
        .map_err(|e| RenderError::Draw(e.to_string()))?;
        Ok(())
    }

    fn draw_axis_labels<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        x: &BandScale<usize>,
        y: &BandScale<String>,
    ) -> Result<(), RenderError> {
        let ox = self.spec.margins.left as f64;
        let oy = self.spec.margins.top as f64;
        let plot_h = self.spec.plot_height() as f64;

        // Group ids centered below each x band, in the bottom margin.
        let x_style = TextStyle::from(("sans-serif", 8).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        for group in x.domain() {
            if let Some(pos) = x.position(group) {
                let px = (ox + pos + x.bandwidth() / 2.0).round() as i32;
                let py = (oy + plot_h + 4.0).round() as i32;
                root.draw(&Text::new(group.to_string(), (px, py), x_style.clone()))
                    .map_err(|e| RenderError::Draw(e.to_string()))?;
            }
        }

        // Variable names at the left edge, centered on each y band.
        let y_style = TextStyle::from(("sans-serif", 10).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for variable in y.domain() {
            if let Some(pos) = y.position(variable) {
                let px = (ox + 4.0).round() as i32;
                let py = (oy + pos + y.bandwidth() / 2.0).round() as i32;
                root.draw(&Text::new(variable.clone(), (px, py), y_style.clone()))
                    .map_err(|e| RenderError::Draw(e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Fixed title and subtitle in the top margin, independent of the data.
    fn draw_titles<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), RenderError> {
        let left = self.spec.margins.left as i32;
        let title_style = TextStyle::from(("sans-serif", 22).into_font()).color(&BLACK);
        root.draw(&Text::new(
            self.spec.title.clone(),
            (left, 12),
            title_style,
        ))
        .map_err(|e| RenderError::Draw(e.to_string()))?;

        let subtitle_style =
            TextStyle::from(("sans-serif", 14).into_font()).color(&SUBTITLE_COLOR);
        root.draw(&Text::new(
            self.spec.subtitle.clone(),
            (left, 44),
            subtitle_style,
        ))
        .map_err(|e| RenderError::Draw(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Margins;

    fn tuple(group: usize, variable: &str, value: &str, class: &str) -> LongTuple {
        LongTuple {
            group,
            variable: variable.to_string(),
            value: value.to_string(),
            class: class.to_string(),
        }
    }

    fn test_spec() -> ChartSpec {
        ChartSpec {
            width: 120,
            height: 100,
            margins: Margins {
                top: 10,
                right: 0,
                bottom: 10,
                left: 0,
            },
            ..ChartSpec::default()
        }
    }

    #[test]
    fn boundary_is_group_of_first_non_negative_one_class() {
        let tuples = vec![
            tuple(0, "f1", "0.1", "-1"),
            tuple(0, "f2", "0.2", "-1"),
            tuple(1, "f1", "0.3", "1"),
            tuple(1, "f2", "0.4", "1"),
        ];
        assert_eq!(boundary_group(&tuples), Some(1));
    }

    #[test]
    fn boundary_is_none_when_every_class_is_negative_one() {
        let tuples = vec![tuple(0, "f1", "0.1", "-1"), tuple(1, "f1", "0.2", "-1")];
        assert_eq!(boundary_group(&tuples), None);
    }

    #[test]
    fn boundary_is_first_group_when_no_class_is_negative_one() {
        let tuples = vec![tuple(3, "f1", "0.1", "1"), tuple(4, "f1", "0.2", "2")];
        assert_eq!(boundary_group(&tuples), Some(3));
    }

    #[test]
    fn boundary_of_empty_sequence_is_none() {
        assert_eq!(boundary_group(&[]), None);
    }

    #[test]
    fn unparseable_class_counts_as_a_class_change() {
        let tuples = vec![tuple(0, "f1", "0.1", "-1"), tuple(1, "f1", "0.2", "oops")];
        assert_eq!(boundary_group(&tuples), Some(1));
    }

    fn pixel(buf: &[u8], width: u32, x: i32, y: i32) -> [u8; 3] {
        let i = (y as usize * width as usize + x as usize) * 3;
        [buf[i], buf[i + 1], buf[i + 2]]
    }

    #[test]
    fn extreme_values_paint_distinct_non_background_cells() {
        let spec = test_spec();
        let renderer = HeatmapRenderer::new(&spec);
        let tuples = vec![
            tuple(0, "f1", "-1.5", "-1"),
            tuple(1, "f1", "1.5", "1"),
        ];

        let mut buf = vec![0u8; spec.width as usize * spec.height as usize * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buf, (spec.width, spec.height)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            let (x, y, color) = renderer.build_scales(&tuples);
            renderer.draw_cells(&root, &tuples, &x, &y, &color).unwrap();
            root.present().unwrap();
        }

        let (x, y, _) = renderer.build_scales(&tuples);
        let cy = (spec.margins.top as f64 + y.position(&"f1".to_string()).unwrap()
            + y.bandwidth() / 2.0) as i32;
        let low_x = (x.position(&0).unwrap() + x.bandwidth() / 2.0) as i32;
        let high_x = (x.position(&1).unwrap() + x.bandwidth() / 2.0) as i32;

        let low = pixel(&buf, spec.width, low_x, cy);
        let high = pixel(&buf, spec.width, high_x, cy);
        assert_ne!(low, [255, 255, 255]);
        assert_ne!(high, [255, 255, 255]);
        assert_ne!(low, high);
    }

    #[test]
    fn unparseable_value_leaves_the_cell_unpainted() {
        let spec = test_spec();
        let renderer = HeatmapRenderer::new(&spec);
        let tuples = vec![tuple(0, "f1", "not-a-number", "-1")];

        let mut buf = vec![0u8; spec.width as usize * spec.height as usize * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buf, (spec.width, spec.height)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            let (x, y, color) = renderer.build_scales(&tuples);
            renderer.draw_cells(&root, &tuples, &x, &y, &color).unwrap();
            root.present().unwrap();
        }

        let (x, y, _) = renderer.build_scales(&tuples);
        let cx = (x.position(&0).unwrap() + x.bandwidth() / 2.0) as i32;
        let cy = (spec.margins.top as f64 + y.position(&"f1".to_string()).unwrap()
            + y.bandwidth() / 2.0) as i32;
        assert_eq!(pixel(&buf, spec.width, cx, cy), [255, 255, 255]);
    }

    #[test]
    fn boundary_line_paints_green_at_the_boundary_band() {
        let spec = test_spec();
        let renderer = HeatmapRenderer::new(&spec);
        let tuples = vec![tuple(0, "f1", "0.1", "-1"), tuple(1, "f1", "0.2", "1")];

        let mut buf = vec![0u8; spec.width as usize * spec.height as usize * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buf, (spec.width, spec.height)).into_drawing_area();
            root.fill(&WHITE).unwrap();
            let (x, _, _) = renderer.build_scales(&tuples);
            renderer.draw_boundary(&root, &tuples, &x).unwrap();
            root.present().unwrap();
        }

        let (x, _, _) = renderer.build_scales(&tuples);
        let px = x.position(&1).unwrap().round() as i32;
        let py = (spec.height / 2) as i32;
        let found = (px - 1..=px + 1)
            .filter(|&c| c >= 0 && (c as u32) < spec.width)
            .any(|c| pixel(&buf, spec.width, c, py) == [0, 255, 0]);
        assert!(found, "expected a green separator pixel near x={px}");
    }
}
