use crate::config::toml_config::{FigureConfig, MarkerConfig};
use crate::core::pdf::{text_width, Color, ContentStream, PdfDocument, TextAnchor};
use crate::core::{ArtifactSink, Marker, Rect};
use crate::utils::error::{Result, ToolError};
use crate::utils::validation::Validate;
use std::f64::consts::PI;
use std::path::Path;

const POINTS_PER_INCH: f64 = 72.0;
pub const PAGE_WIDTH_IN: f64 = 6.4;
pub const PAGE_HEIGHT_IN: f64 = 4.8;

/// 座標軸在整張圖中的位置
pub const AXES_RECT: Rect = Rect {
    left: 0.125,
    bottom: 0.11,
    right: 0.9,
    top: 0.88,
};

/// 資料範圍兩側各留 5%
const AXIS_MARGIN: f64 = 0.05;
const TARGET_TICKS: f64 = 8.0;

const TICK_LENGTH: f64 = 3.5;
const TICK_PAD: f64 = 3.5;
const TICK_FONT_SIZE: f64 = 10.0;
const LABEL_FONT_SIZE: f64 = 10.0;
const LABEL_PAD: f64 = 4.0;
const TITLE_FONT_SIZE: f64 = 12.0;
const TITLE_PAD: f64 = 6.0;
const CURVE_WIDTH: f64 = 1.5;
const FRAME_WIDTH: f64 = 0.8;

/// 數字在 Helvetica 中大約的字高比例
const DIGIT_HEIGHT: f64 = 0.7;

fn curve_color() -> Color {
    Color::from_hex(0x1f77b4)
}

/// 編號圓圈的預設位置
pub fn artists_markers() -> Vec<Marker> {
    vec![
        Marker::new("1", 0.91, 0.9),
        Marker::new("2", 0.81, 0.8),
        Marker::new("3", 0.81, 0.52),
        Marker::new("4", 0.62, 0.91),
        Marker::new("5", 0.01, 0.3),
        Marker::new("6", 0.58, 0.01),
    ]
}

/// `n` 個在 `[start, end]` 之間等距的點，包含兩端
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// 一條座標軸：顯示範圍與刻度
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub ticks: Vec<f64>,
}

impl Axis {
    pub fn from_data(values: &[f64]) -> Result<Self> {
        let (lo, hi) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .ok_or_else(|| ToolError::render("no finite data to plot"))?;

        let (lo, hi) = if lo == hi { (lo - 1.0, hi + 1.0) } else { (lo, hi) };
        let margin = (hi - lo) * AXIS_MARGIN;
        Ok(Self::with_limits(lo - margin, hi + margin))
    }

    pub fn with_limits(min: f64, max: f64) -> Self {
        let step = nice_step((max - min) / TARGET_TICKS);
        let first = (min / step).ceil() as i64;
        let last = (max / step).floor() as i64;
        let ticks = (first..=last).map(|k| k as f64 * step + 0.0).collect();
        Self {
            min,
            max,
            step,
            ticks,
        }
    }

    /// 資料值轉成 0..1 的軸內位置
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    pub fn tick_label(&self, value: f64) -> String {
        let decimals = decimals_for(self.step);
        let label = format!("{:.*}", decimals, value + 0.0);
        if label.starts_with('-') && label[1..].chars().all(|c| c == '0' || c == '.') {
            label[1..].to_string()
        } else {
            label
        }
    }
}

/// 取 1, 2, 2.5, 5 乘以 10 的次方中不小於 `raw` 的最小值
fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let factor = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|f| *f >= normalized - 1e-9)
        .unwrap_or(10.0);
    factor * magnitude
}

fn decimals_for(step: f64) -> usize {
    (0..=6)
        .find(|d| {
            let scaled = step * 10f64.powi(*d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(6)
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub width: f64,
    pub height: f64,
    pub axes: Rect,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub markers: Vec<Marker>,
    pub marker_size: f64,
}

impl Figure {
    /// 文件用的示意圖：0 到 2π 的正弦曲線加上六個編號圓圈
    pub fn artists() -> Self {
        let config = FigureConfig::default();
        let xs = linspace(0.0, 2.0 * PI, config.samples);
        let ys = xs.iter().map(|x| x.sin()).collect();
        Self {
            width: PAGE_WIDTH_IN * POINTS_PER_INCH,
            height: PAGE_HEIGHT_IN * POINTS_PER_INCH,
            axes: AXES_RECT,
            xs,
            ys,
            title: config.title,
            x_label: config.x_label,
            y_label: config.y_label,
            markers: artists_markers(),
            marker_size: config.marker_size,
        }
    }

    pub fn from_config(config: &FigureConfig) -> Result<Self> {
        config.validate()?;

        let xs = linspace(0.0, 2.0 * PI, config.samples);
        let ys = xs.iter().map(|x| x.sin()).collect();
        let markers = match &config.markers {
            Some(markers) => markers
                .iter()
                .map(|MarkerConfig { label, x, y }| Marker::new(label.clone(), *x, *y))
                .collect(),
            None => artists_markers(),
        };

        Ok(Self {
            width: PAGE_WIDTH_IN * POINTS_PER_INCH,
            height: PAGE_HEIGHT_IN * POINTS_PER_INCH,
            axes: AXES_RECT,
            xs,
            ys,
            title: config.title.clone(),
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
            markers,
            marker_size: config.marker_size,
        })
    }

    fn axes_points(&self) -> (f64, f64, f64, f64) {
        (
            self.axes.left * self.width,
            self.axes.bottom * self.height,
            self.axes.width() * self.width,
            self.axes.height() * self.height,
        )
    }

    pub fn render(&self) -> Result<ContentStream> {
        let x_axis = Axis::from_data(&self.xs)?;
        let y_axis = Axis::from_data(&self.ys)?;
        let (left, bottom, width, height) = self.axes_points();
        let mut content = ContentStream::new();

        content.set_line_join(1).set_line_cap(1);

        // 曲線
        content
            .save_state()
            .clip_rect(left, bottom, width, height)
            .set_stroke_color(curve_color())
            .set_line_width(CURVE_WIDTH);
        for (i, (x, y)) in self.xs.iter().zip(&self.ys).enumerate() {
            let px = left + x_axis.normalize(*x) * width;
            let py = bottom + y_axis.normalize(*y) * height;
            if i == 0 {
                content.move_to(px, py);
            } else {
                content.line_to(px, py);
            }
        }
        content.stroke().restore_state();

        // 外框
        content
            .set_stroke_color(Color::BLACK)
            .set_fill_color(Color::BLACK)
            .set_line_width(FRAME_WIDTH)
            .rect(left, bottom, width, height)
            .stroke();

        // x 軸刻度
        let x_label_baseline = bottom - TICK_LENGTH - TICK_PAD - TICK_FONT_SIZE * DIGIT_HEIGHT;
        for tick in &x_axis.ticks {
            let px = left + x_axis.normalize(*tick) * width;
            content
                .move_to(px, bottom)
                .line_to(px, bottom - TICK_LENGTH)
                .stroke()
                .text(
                    px,
                    x_label_baseline,
                    TICK_FONT_SIZE,
                    TextAnchor::Middle,
                    &x_axis.tick_label(*tick),
                );
        }

        // y 軸刻度
        let mut widest_label: f64 = 0.0;
        for tick in &y_axis.ticks {
            let py = bottom + y_axis.normalize(*tick) * height;
            let label = y_axis.tick_label(*tick);
            widest_label = widest_label.max(text_width(&label, TICK_FONT_SIZE));
            content
                .move_to(left, py)
                .line_to(left - TICK_LENGTH, py)
                .stroke()
                .text(
                    left - TICK_LENGTH - TICK_PAD,
                    py - TICK_FONT_SIZE * DIGIT_HEIGHT / 2.0,
                    TICK_FONT_SIZE,
                    TextAnchor::End,
                    &label,
                );
        }

        // 標題與軸標籤
        content.text(
            left + width / 2.0,
            bottom + height + TITLE_PAD,
            TITLE_FONT_SIZE,
            TextAnchor::Middle,
            &self.title,
        );
        content.text(
            left + width / 2.0,
            x_label_baseline - LABEL_PAD - LABEL_FONT_SIZE,
            LABEL_FONT_SIZE,
            TextAnchor::Middle,
            &self.x_label,
        );
        content.text_vertical(
            left - TICK_LENGTH - TICK_PAD - widest_label - LABEL_PAD,
            bottom + height / 2.0,
            LABEL_FONT_SIZE,
            &self.y_label,
        );

        for marker in &self.markers {
            self.render_marker(&mut content, marker);
        }

        Ok(content)
    }

    /// 圓圈內放編號，(x, y) 是圓圈外接方框的左下角
    fn render_marker(&self, content: &mut ContentStream, marker: &Marker) {
        let diameter = self.marker_size * 0.75;
        let radius = diameter / 2.0;
        let cx = marker.x * self.width + radius;
        let cy = marker.y * self.height + radius;
        let digit_size = self.marker_size * 0.45;

        content
            .set_line_width(self.marker_size / 32.0)
            .circle(cx, cy, radius)
            .stroke()
            .text(
                cx,
                cy - digit_size * DIGIT_HEIGHT / 2.0,
                digit_size,
                TextAnchor::Middle,
                &marker.label,
            );
    }

    pub fn render_pdf(&self) -> Result<Vec<u8>> {
        let mut document = PdfDocument::new(self.width, self.height).with_title(&self.title);
        *document.content_mut() = self.render()?;
        document.to_bytes()
    }

    pub fn save<K: ArtifactSink>(&self, sink: &K, path: &Path) -> Result<usize> {
        let bytes = self.render_pdf()?;
        sink.write_file(path, &bytes)?;
        tracing::info!("🖼️ Figure written to {} ({} bytes)", path.display(), bytes.len());
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(0.0, 2.0 * PI, 1000);
        assert_eq!(xs.len(), 1000);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[999], 2.0 * PI);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
    }

    #[test]
    fn test_artists_figure_layout() {
        let figure = Figure::artists();

        assert!((figure.width - 460.8).abs() < 1e-9);
        assert!((figure.height - 345.6).abs() < 1e-9);
        assert_eq!(figure.title, "A simple plot");
        assert_eq!(figure.x_label, "time (s)");
        assert_eq!(figure.y_label, "voltage (mV)");
        assert_eq!(figure.xs.len(), 1000);
        assert_eq!(figure.markers.len(), 6);
        assert_eq!(figure.markers[0], Marker::new("1", 0.91, 0.9));
        assert_eq!(figure.markers[5], Marker::new("6", 0.58, 0.01));
        for (x, y) in figure.xs.iter().zip(&figure.ys) {
            assert!((y - x.sin()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(0.86), 1.0);
        assert_eq!(nice_step(0.275), 0.5);
        assert_eq!(nice_step(0.2), 0.2);
        assert_eq!(nice_step(23.0), 25.0);
        assert_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn test_axis_ticks_for_sine() {
        let figure = Figure::artists();
        let x_axis = Axis::from_data(&figure.xs).unwrap();
        let y_axis = Axis::from_data(&figure.ys).unwrap();

        assert_eq!(x_axis.ticks, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(x_axis.min < 0.0 && x_axis.max > 2.0 * PI);
        let labels: Vec<String> = y_axis.ticks.iter().map(|t| y_axis.tick_label(*t)).collect();
        assert_eq!(labels, vec!["-1.0", "-0.5", "0.0", "0.5", "1.0"]);
    }

    #[test]
    fn test_axis_rejects_empty_data() {
        assert!(Axis::from_data(&[]).is_err());
        assert!(Axis::from_data(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_render_contains_text_and_markers() {
        let content = Figure::artists().render().unwrap();
        let ops = content.as_str();

        assert!(ops.contains("(A simple plot) Tj"));
        assert!(ops.contains("(time \\(s\\)) Tj"));
        assert!(ops.contains("(voltage \\(mV\\)) Tj"));
        for digit in 1..=6 {
            assert!(ops.contains(&format!("({}) Tj", digit)));
        }
        // 6 個圓，每個 4 段曲線
        assert_eq!(ops.matches(" c\n").count(), 24);
    }

    #[test]
    fn test_from_config_overrides() {
        let config = FigureConfig {
            title: "Custom".to_string(),
            samples: 10,
            markers: Some(vec![MarkerConfig {
                label: "A".to_string(),
                x: 0.5,
                y: 0.5,
            }]),
            ..FigureConfig::default()
        };
        let figure = Figure::from_config(&config).unwrap();

        assert_eq!(figure.title, "Custom");
        assert_eq!(figure.xs.len(), 10);
        assert_eq!(figure.ys.len(), 10);
        assert!((figure.width - 460.8).abs() < 1e-9);
        assert!((figure.height - 345.6).abs() < 1e-9);
        assert_eq!(figure.axes, AXES_RECT);
        assert_eq!(figure.markers, vec![Marker::new("A", 0.5, 0.5)]);
    }

    #[test]
    fn test_from_config_validates() {
        let config = FigureConfig {
            samples: 1,
            ..FigureConfig::default()
        };
        assert!(Figure::from_config(&config).is_err());
    }

    #[test]
    fn test_render_pdf_is_complete_document() {
        let bytes = Figure::artists().render_pdf().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }
}
