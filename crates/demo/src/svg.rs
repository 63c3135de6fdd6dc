// File: crates/demo/src/svg.rs
// Summary: SVG implementation of the core Renderer; one <g> per layer plus axes, crosshair and status line.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use quotechart_core::{
    ChartScales, Crosshair, DividendEvent, Insets, Layer, PlotArea, PlotData, Renderer, Scale, Viewport,
    VolumeBar, VolumeClass,
};

const BACKGROUND: &str = "#121214";
const GRID: &str = "#28282d";
const AXIS: &str = "#b4b4be";
const TEXT: &str = "#d2d2dc";
const CLOSE: &str = "#e04848";
const AVERAGE: &str = "#a060e0";
const UP: &str = "#28c878";
const DOWN: &str = "#dc5050";
const DIVIDEND: &str = "#f0c040";

/// Document size is the last plot area drawn plus the insets.
pub struct SvgRenderer {
    plot: PlotArea,
    insets: Insets,
    axes: String,
    layers: BTreeMap<Layer, String>,
    crosshair: Option<String>,
    status: String,
    title: String,
}

impl SvgRenderer {
    pub fn new(insets: Insets) -> Self {
        Self {
            plot: Viewport::default().plot_area(&insets),
            insets,
            axes: String::new(),
            layers: BTreeMap::new(),
            crosshair: None,
            status: String::new(),
            title: String::new(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn has_layer(&self, layer: Layer) -> bool {
        self.layers.contains_key(&layer)
    }

    /// Full document; plot content is translated by the left/top insets.
    pub fn to_svg_string(&self) -> String {
        let w = (self.plot.width as u32).saturating_add(self.insets.hsum());
        let h = (self.plot.height as u32).saturating_add(self.insets.vsum());
        let mut out = String::with_capacity(4096);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#
        );
        let _ = writeln!(out, r#"<rect width="{w}" height="{h}" fill="{BACKGROUND}"/>"#);
        if !self.title.is_empty() {
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}" fill="{TEXT}" font-size="16">{}</text>"#,
                self.insets.left,
                self.insets.top / 2 + 6,
                escape(&self.title)
            );
        }
        let _ = writeln!(out, r#"<g transform="translate({},{})">"#, self.insets.left, self.insets.top);
        out.push_str(&self.axes);
        for (layer, body) in &self.layers {
            let _ = writeln!(out, r#"<g id="{}">"#, layer.id());
            out.push_str(body);
            out.push_str("</g>\n");
        }
        if let Some(cross) = &self.crosshair {
            out.push_str(cross);
        }
        out.push_str("</g>\n");
        if !self.status.is_empty() {
            let _ = writeln!(
                out,
                r#"<text id="status" x="{}" y="{}" fill="{DOWN}">{}</text>"#,
                self.insets.left,
                h.saturating_sub(12),
                escape(&self.status)
            );
        }
        out.push_str("</svg>\n");
        out
    }
}

impl Renderer for SvgRenderer {
    fn draw_series(&mut self, layer: Layer, data: PlotData<'_>, scales: &ChartScales) {
        self.plot = scales.plot;
        let body = match data {
            PlotData::Line(points) => {
                let color = if layer == Layer::MovingAverage { AVERAGE } else { CLOSE };
                let mut d = String::new();
                for (i, p) in points.iter().enumerate() {
                    let cmd = if i == 0 { 'M' } else { 'L' };
                    let _ = write!(d, "{cmd}{:.2},{:.2} ", scales.time.to_px(p.date), scales.price.to_px(p.value));
                }
                format!(r#"<path d="{}" fill="none" stroke="{color}" stroke-width="1.5"/>"#, d.trim_end()) + "\n"
            }
            PlotData::Ohlc(points) => {
                let bar_px = (scales.plot.width / points.len().max(1) as f64).max(3.0) * 0.7;
                let half = bar_px * 0.5;
                let mut s = String::new();
                for p in points {
                    let x = scales.time.to_px(p.date);
                    let (y_o, y_h, y_l, y_c) = (
                        scales.price.to_px(p.open),
                        scales.price.to_px(p.high),
                        scales.price.to_px(p.low),
                        scales.price.to_px(p.close),
                    );
                    let color = if p.close >= p.open { UP } else { DOWN };
                    let _ = writeln!(
                        s,
                        r#"<line x1="{x:.2}" y1="{y_h:.2}" x2="{x:.2}" y2="{y_l:.2}" stroke="{color}"/>"#
                    );
                    if layer == Layer::Candlesticks {
                        let top = y_o.min(y_c);
                        let height = (y_o.max(y_c) - top).max(1.0);
                        let _ = writeln!(
                            s,
                            r#"<rect x="{:.2}" y="{top:.2}" width="{bar_px:.2}" height="{height:.2}" fill="{color}"/>"#,
                            x - half
                        );
                    } else {
                        // open tick left, close tick right
                        let _ = writeln!(
                            s,
                            r#"<line x1="{:.2}" y1="{y_o:.2}" x2="{x:.2}" y2="{y_o:.2}" stroke="{color}"/>"#,
                            x - half
                        );
                        let _ = writeln!(
                            s,
                            r#"<line x1="{x:.2}" y1="{y_c:.2}" x2="{:.2}" y2="{y_c:.2}" stroke="{color}"/>"#,
                            x + half
                        );
                    }
                }
                s
            }
        };
        self.layers.insert(layer, body);
    }

    fn draw_bars(&mut self, layer: Layer, bars: &[VolumeBar], scales: &ChartScales) {
        self.plot = scales.plot;
        let Some(volume) = &scales.volume else {
            self.layers.remove(&layer);
            return;
        };
        let bar_px = (scales.plot.width / bars.len().max(1) as f64).max(2.0) * 0.7;
        let bottom = volume.to_px(0.0);
        let mut s = String::new();
        for bar in bars {
            let x = scales.time.to_px(bar.date) - bar_px * 0.5;
            let top = volume.to_px(bar.volume);
            let color = match bar.class {
                VolumeClass::Up => UP,
                VolumeClass::Down => DOWN,
            };
            let _ = writeln!(
                s,
                r#"<rect x="{x:.2}" y="{top:.2}" width="{bar_px:.2}" height="{:.2}" fill="{color}" fill-opacity="0.5"/>"#,
                (bottom - top).max(0.0)
            );
        }
        self.layers.insert(layer, s);
    }

    fn draw_markers(
        &mut self,
        layer: Layer,
        events: &[DividendEvent],
        position: &dyn Fn(&DividendEvent) -> (f64, f64),
    ) {
        let mut s = String::new();
        for ev in events {
            let (x, y) = position(ev);
            let _ = writeln!(
                s,
                r#"<circle cx="{x:.2}" cy="{y:.2}" r="4" fill="{DIVIDEND}"><title>dividend {:.4} on {}</title></circle>"#,
                ev.amount,
                ev.date.format("%Y-%m-%d")
            );
        }
        self.layers.insert(layer, s);
    }

    fn update_crosshair(&mut self, crosshair: &Crosshair) {
        let (plot_w, plot_h) = (self.plot.width, self.plot.height);
        let (x, y) = (crosshair.x, crosshair.y);
        let mut s = String::from("<g id=\"crosshair\">\n");
        let _ = writeln!(s, r#"<line x1="{x:.2}" y1="0" x2="{x:.2}" y2="{plot_h:.2}" stroke="{AXIS}" stroke-dasharray="3,3"/>"#);
        let _ = writeln!(s, r#"<line x1="0" y1="{y:.2}" x2="{plot_w:.2}" y2="{y:.2}" stroke="{AXIS}" stroke-dasharray="3,3"/>"#);
        let _ = writeln!(s, r#"<circle cx="{x:.2}" cy="{y:.2}" r="3" fill="{CLOSE}"/>"#);
        for (i, entry) in crosshair.legend.iter().enumerate() {
            let _ = writeln!(
                s,
                r#"<text x="8" y="{}" fill="{TEXT}">{}: {}</text>"#,
                16 + i * 15,
                entry.label,
                escape(&entry.value)
            );
        }
        s.push_str("</g>\n");
        self.crosshair = Some(s);
    }

    fn remove_layer(&mut self, layer: Layer) {
        self.layers.remove(&layer);
    }

    /// Grid, bottom time axis and right price axis.
    fn draw_axes(&mut self, scales: &ChartScales) {
        self.plot = scales.plot;
        let (w, h) = (scales.plot.width, scales.plot.height);
        let mut s = String::from("<g id=\"axes\">\n");
        for t in scales.time.ticks(6) {
            let x = scales.time.to_px(t);
            let _ = writeln!(s, r#"<line x1="{x:.2}" y1="0" x2="{x:.2}" y2="{h:.2}" stroke="{GRID}"/>"#);
            let _ = writeln!(
                s,
                r#"<text x="{x:.2}" y="{:.2}" fill="{TEXT}" text-anchor="middle">{}</text>"#,
                h + 18.0,
                t.format("%b %d %Y")
            );
        }
        for v in scales.price.ticks(6) {
            let y = scales.price.to_px(v);
            let _ = writeln!(s, r#"<line x1="0" y1="{y:.2}" x2="{w:.2}" y2="{y:.2}" stroke="{GRID}"/>"#);
            let _ = writeln!(s, r#"<text x="{:.2}" y="{:.2}" fill="{TEXT}">{v:.2}</text>"#, w + 6.0, y + 4.0);
        }
        let _ = writeln!(s, r#"<line x1="0" y1="{h:.2}" x2="{w:.2}" y2="{h:.2}" stroke="{AXIS}" stroke-width="1.5"/>"#);
        let _ = writeln!(s, r#"<line x1="{w:.2}" y1="0" x2="{w:.2}" y2="{h:.2}" stroke="{AXIS}" stroke-width="1.5"/>"#);
        s.push_str("</g>\n");
        self.axes = s;
    }

    fn hide_crosshair(&mut self) {
        self.crosshair = None;
    }

    fn show_status(&mut self, message: &str) {
        self.status = message.to_string();
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
