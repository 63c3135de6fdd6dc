// File: crates/chart-core/src/lib.rs
// Summary: Core library entry point; exports the feed model, series transforms, scales, locator and chart session.

pub mod config;
pub mod error;
pub mod feed;
pub mod indicators;
pub mod locate;
pub mod normalize;
pub mod period;
pub mod renderer;
pub mod scale;
pub mod series;
pub mod session;
pub mod types;
pub mod view;

pub use config::{ChartConfig, DatasetId, DatasetSpec};
pub use error::{ChartError, Result};
pub use feed::RawFeed;
pub use indicators::{classify_volume, moving_average, volume_bars, VolumeBar, VolumeClass};
pub use locate::{locate, nearest_index};
pub use normalize::{normalize, NormalizedFeed};
pub use period::{filter_by_period, Period};
pub use renderer::{Crosshair, Layer, LegendEntry, PlotData, Renderer};
pub use scale::{compute_linear_scale, compute_time_scale, ChartScales, LinearScale, Scale, TimeScale};
pub use series::{Dated, DividendEvent, LinePoint, MovingAveragePoint, PricePoint, Series, Timestamp};
pub use session::{ChartSession, FeedSource, LoadTicket, SessionStatus};
pub use types::{Insets, PlotArea, Viewport};
pub use view::{ViewFlag, ViewFlags, ViewState};
