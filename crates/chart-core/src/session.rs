// File: crates/chart-core/src/session.rs
// Summary: Chart session; owns view state, the loaded dataset and its derived series/scales, and drives a Renderer.
// Notes:
// - Loads are split into `begin_load` / `complete_load` so several selections can be in
//   flight on one thread. Only the most recent ticket is applied; older ones are discarded.
// - Period filtering always starts from the canonical loaded series.
// - Derived series and scales are rebuilt, never patched, when their inputs change.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::{ChartConfig, DatasetId, DatasetSpec};
use crate::error::{ChartError, Result};
use crate::feed::RawFeed;
use crate::indicators::{moving_average, volume_bars};
use crate::locate::nearest_index;
use crate::normalize::{normalize, NormalizedFeed};
use crate::period::{filter_by_period, Period};
use crate::renderer::{Crosshair, Layer, PlotData, Renderer};
use crate::scale::{ChartScales, Scale};
use crate::series::{DividendEvent, MovingAveragePoint, PricePoint, Series};
use crate::types::Viewport;
use crate::view::{ViewFlag, ViewState};

/// Fetches raw feeds for registered datasets. The only asynchronous seam of the core.
#[allow(async_fn_in_trait)]
pub trait FeedSource {
    async fn load(&self, spec: &DatasetSpec) -> Result<RawFeed>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Ready,
}

/// Handle for one in-flight load, returned by [`ChartSession::begin_load`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    spec: DatasetSpec,
}

impl LoadTicket {
    pub fn spec(&self) -> &DatasetSpec {
        &self.spec
    }
    pub fn dataset(&self) -> &DatasetId {
        &self.spec.id
    }
}

/// What is on screen for the active dataset + period.
#[derive(Clone, Debug)]
struct Display {
    quotes: Series<PricePoint>,
    dividends: Series<DividendEvent>,
    moving_average: Option<Series<MovingAveragePoint>>,
    scales: ChartScales,
}

#[derive(Clone, Debug)]
struct Loaded {
    canonical: NormalizedFeed,
    display: Display,
}

pub struct ChartSession<R: Renderer> {
    config: ChartConfig,
    renderer: R,
    registry: BTreeMap<DatasetId, DatasetSpec>,
    view: ViewState,
    generation: u64,
    pending: Option<LoadTicket>,
    loaded: Option<Loaded>,
    last_error: Option<String>,
}

impl<R: Renderer> ChartSession<R> {
    pub fn new(config: ChartConfig, renderer: R) -> Self {
        let registry = config.datasets.iter().map(|d| (d.id.clone(), d.clone())).collect();
        let view = ViewState { flags: config.initial_view, dataset: None, period: config.initial_period };
        Self {
            config,
            renderer,
            registry,
            view,
            generation: 0,
            pending: None,
            loaded: None,
            last_error: None,
        }
    }

    /// Add or replace a selectable dataset.
    pub fn register(&mut self, spec: DatasetSpec) -> Option<DatasetSpec> {
        self.registry.insert(spec.id.clone(), spec)
    }

    pub fn datasets(&self) -> impl Iterator<Item = &DatasetSpec> {
        self.registry.values()
    }

    pub fn status(&self) -> SessionStatus {
        if self.pending.is_some() {
            SessionStatus::Loading
        } else if self.loaded.is_some() {
            SessionStatus::Ready
        } else {
            SessionStatus::Idle
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn quotes(&self) -> Option<&Series<PricePoint>> {
        self.loaded.as_ref().map(|l| &l.display.quotes)
    }

    pub fn dividends(&self) -> Option<&Series<DividendEvent>> {
        self.loaded.as_ref().map(|l| &l.display.dividends)
    }

    pub fn moving_average(&self) -> Option<&Series<MovingAveragePoint>> {
        self.loaded.as_ref().and_then(|l| l.display.moving_average.as_ref())
    }

    pub fn scales(&self) -> Option<&ChartScales> {
        self.loaded.as_ref().map(|l| &l.display.scales)
    }

    /// Start selecting `id`. Any load started earlier becomes stale.
    pub fn begin_load(&mut self, id: &DatasetId) -> Result<LoadTicket> {
        let Some(spec) = self.registry.get(id).cloned() else {
            return Err(self.fail(ChartError::UnknownDataset(id.clone())));
        };
        self.generation += 1;
        let ticket = LoadTicket { generation: self.generation, spec };
        if let Some(prev) = self.pending.replace(ticket.clone()) {
            debug!(superseded = %prev.spec.id, by = %id, "superseding in-flight load");
        }
        info!(dataset = %id, generation = self.generation, "loading dataset");
        Ok(ticket)
    }

    /// Apply the outcome of a load. Results for superseded tickets are dropped with
    /// `StaleLoadDiscarded` and never touch the session.
    pub fn complete_load(&mut self, ticket: LoadTicket, feed: Result<RawFeed>) -> Result<()> {
        let current = match &self.pending {
            Some(p) if p.generation == ticket.generation => None,
            Some(p) => Some(Some(p.spec.id.clone())),
            None => Some(self.view.dataset.clone()),
        };
        if let Some(current) = current {
            warn!(dataset = %ticket.spec.id, ?current, "discarding stale load result");
            return Err(ChartError::StaleLoadDiscarded { requested: ticket.spec.id, current });
        }
        self.pending = None;

        let built = feed
            .and_then(|raw| normalize(&raw))
            .and_then(|canonical| {
                let display = self.build_display(&canonical, self.view.period)?;
                Ok(Loaded { canonical, display })
            });
        match built {
            Ok(loaded) => {
                info!(
                    dataset = %ticket.spec.id,
                    quotes = loaded.canonical.quotes.len(),
                    shown = loaded.display.quotes.len(),
                    "dataset ready"
                );
                self.loaded = Some(loaded);
                self.view.dataset = Some(ticket.spec.id);
                self.clear_error();
                self.redraw();
                Ok(())
            }
            Err(e) => {
                warn!(dataset = %ticket.spec.id, error = %e, "dataset load failed");
                Err(self.fail(e))
            }
        }
    }

    /// Select `id` and wait for it. For overlapping selections use
    /// [`begin_load`](Self::begin_load) / [`complete_load`](Self::complete_load).
    pub async fn select_dataset<S: FeedSource>(&mut self, source: &S, id: &DatasetId) -> Result<()> {
        let ticket = self.begin_load(id)?;
        let feed = source.load(ticket.spec()).await;
        self.complete_load(ticket, feed)
    }

    /// Change the displayed period, filtering from the full loaded dataset. Before the first
    /// load the period is only recorded. A period with no data leaves the view unchanged.
    pub fn set_period(&mut self, period: Period) -> Result<()> {
        let Some(loaded) = &self.loaded else {
            self.view.period = period;
            return Ok(());
        };
        match self.build_display(&loaded.canonical, period) {
            Ok(next) => {
                info!(?period, shown = next.quotes.len(), "period changed");
                self.view.period = period;
                if let Some(loaded) = &mut self.loaded {
                    loaded.display = next;
                }
                self.clear_error();
                self.redraw();
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Turn one layer on or off. Setting a layer to its current state does nothing.
    pub fn set_view(&mut self, flag: ViewFlag, on: bool) -> Result<()> {
        let mut flags = self.view.flags;
        if !flags.set(flag, on) {
            return Ok(());
        }
        let Some(loaded) = &self.loaded else {
            self.view.flags = flags;
            return Ok(());
        };
        let display = &loaded.display;

        // Some(..) only when the moving average itself is toggled.
        let recomputed = (flag == ViewFlag::MovingAverage).then(|| {
            on.then(|| {
                let window = self.config.moving_average_window;
                debug!(window, "computing moving average");
                moving_average(&display.quotes, window)
            })
        });
        let average = match &recomputed {
            Some(ma) => ma.as_deref(),
            None => display.moving_average.as_deref(),
        };
        let scales = ChartScales::build(
            &display.quotes,
            average,
            &flags,
            self.config.viewport.plot_area(&self.config.insets),
            self.config.price_pad,
            self.config.volume_ratio,
        );
        let scales = match scales {
            Ok(scales) => scales,
            Err(e) => return Err(self.fail(e)),
        };

        self.view.flags = flags;
        if let Some(loaded) = &mut self.loaded {
            if let Some(ma) = recomputed {
                loaded.display.moving_average = ma;
            }
            loaded.display.scales = scales;
        }
        if !on {
            self.renderer.remove_layer(Layer::from(flag));
        }
        self.redraw();
        Ok(())
    }

    /// Flip a layer; returns its new state.
    pub fn toggle_view(&mut self, flag: ViewFlag) -> Result<bool> {
        let on = !self.view.flags.get(flag);
        self.set_view(flag, on)?;
        Ok(on)
    }

    /// New surface size: rebuild scales and redraw; data is untouched.
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        let Some(loaded) = &self.loaded else {
            self.config.viewport = viewport;
            return Ok(());
        };
        let display = &loaded.display;
        let scales = ChartScales::build(
            &display.quotes,
            display.moving_average.as_deref(),
            &self.view.flags,
            viewport.plot_area(&self.config.insets),
            self.config.price_pad,
            self.config.volume_ratio,
        );
        let scales = match scales {
            Ok(scales) => scales,
            Err(e) => return Err(self.fail(e)),
        };
        self.config.viewport = viewport;
        if let Some(loaded) = &mut self.loaded {
            loaded.display.scales = scales;
        }
        self.redraw();
        Ok(())
    }

    /// Move the crosshair to the sample nearest plot-relative `pixel_x`.
    pub fn on_pointer_move(&mut self, pixel_x: f64) -> Result<PricePoint> {
        let Some(loaded) = &self.loaded else { return Err(ChartError::NotReady) };
        let display = &loaded.display;
        let scales = &display.scales;
        let i = match nearest_index(&display.quotes, scales.time.from_px(pixel_x)) {
            Ok(i) => i,
            Err(e) => {
                self.renderer.hide_crosshair();
                return Err(e);
            }
        };
        let point = display.quotes[i];
        let average = display
            .moving_average
            .as_ref()
            .filter(|_| self.view.flags.show_moving_average)
            .and_then(|ma| ma.get(i))
            .map(|m| m.average);
        let crosshair = Crosshair::new(
            scales.time.to_px(point.date),
            scales.price.to_px(point.close),
            point,
            average,
            &self.config.legend_date_format,
        );
        self.renderer.update_crosshair(&crosshair);
        Ok(point)
    }

    pub fn on_pointer_leave(&mut self) {
        self.renderer.hide_crosshair();
    }

    fn build_display(&self, canonical: &NormalizedFeed, period: Period) -> Result<Display> {
        let (first, last) = canonical.quotes.date_bounds().ok_or(ChartError::EmptyDataset)?;
        let (start, end) = period.window(first, last);
        let quotes = filter_by_period(&canonical.quotes, start, end);
        if quotes.is_empty() {
            return Err(ChartError::EmptyDataset);
        }
        let dividends = filter_by_period(&canonical.dividends, start, end);
        let flags = &self.view.flags;
        let moving_average = flags
            .show_moving_average
            .then(|| moving_average(&quotes, self.config.moving_average_window));
        let scales = ChartScales::build(
            &quotes,
            moving_average.as_deref(),
            flags,
            self.config.viewport.plot_area(&self.config.insets),
            self.config.price_pad,
            self.config.volume_ratio,
        )?;
        debug!(quotes = quotes.len(), dividends = dividends.len(), "rebuilt display series");
        Ok(Display { quotes, dividends, moving_average, scales })
    }

    /// Push every enabled layer for the current display to the renderer.
    fn redraw(&mut self) {
        let Self { loaded, renderer, view, .. } = self;
        let Some(loaded) = loaded else { return };
        let d = &loaded.display;
        let s = &d.scales;

        renderer.hide_crosshair();
        renderer.draw_axes(s);

        if s.volume.is_some() {
            renderer.draw_bars(Layer::Volume, &volume_bars(&d.quotes), s);
        } else {
            renderer.remove_layer(Layer::Volume);
        }

        for flag in view.flags.enabled() {
            match flag {
                ViewFlag::Close => {
                    renderer.draw_series(Layer::Close, PlotData::Line(&d.quotes.close_line()), s)
                }
                ViewFlag::MovingAverage => {
                    if let Some(ma) = &d.moving_average {
                        renderer.draw_series(Layer::MovingAverage, PlotData::Line(&ma.average_line()), s);
                    }
                }
                ViewFlag::Ohlc => renderer.draw_series(Layer::Ohlc, PlotData::Ohlc(&d.quotes), s),
                ViewFlag::Candlesticks => {
                    renderer.draw_series(Layer::Candlesticks, PlotData::Ohlc(&d.quotes), s)
                }
            }
        }

        if d.dividends.is_empty() {
            renderer.remove_layer(Layer::Dividends);
        } else {
            let position = |ev: &DividendEvent| (s.time.to_px(ev.date), s.plot.height);
            renderer.draw_markers(Layer::Dividends, &d.dividends, &position);
        }
    }

    /// Record and surface a user-visible failure; hands the error back for propagation.
    fn fail(&mut self, err: ChartError) -> ChartError {
        if err.is_user_visible() {
            let msg = err.to_string();
            self.renderer.show_status(&msg);
            self.last_error = Some(msg);
        }
        err
    }

    fn clear_error(&mut self) {
        if self.last_error.take().is_some() {
            self.renderer.show_status("");
        }
    }
}
