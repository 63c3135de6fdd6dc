// File: crates/chart-core/src/view.rs
// Summary: Toggle flags for the price layers and the session's selected dataset and period.

use serde::{Deserialize, Serialize};

use crate::config::DatasetId;
use crate::period::Period;

/// Independently toggled price layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewFlag {
    Close,
    MovingAverage,
    Ohlc,
    Candlesticks,
}

impl ViewFlag {
    pub const ALL: [ViewFlag; 4] =
        [ViewFlag::Close, ViewFlag::MovingAverage, ViewFlag::Ohlc, ViewFlag::Candlesticks];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewFlags {
    pub show_close: bool,
    pub show_moving_average: bool,
    pub show_ohlc: bool,
    pub show_candlesticks: bool,
}

impl ViewFlags {
    pub fn get(&self, flag: ViewFlag) -> bool {
        match flag {
            ViewFlag::Close => self.show_close,
            ViewFlag::MovingAverage => self.show_moving_average,
            ViewFlag::Ohlc => self.show_ohlc,
            ViewFlag::Candlesticks => self.show_candlesticks,
        }
    }

    /// Returns whether the value changed.
    pub fn set(&mut self, flag: ViewFlag, on: bool) -> bool {
        let slot = match flag {
            ViewFlag::Close => &mut self.show_close,
            ViewFlag::MovingAverage => &mut self.show_moving_average,
            ViewFlag::Ohlc => &mut self.show_ohlc,
            ViewFlag::Candlesticks => &mut self.show_candlesticks,
        };
        let changed = *slot != on;
        *slot = on;
        changed
    }

    /// Layers needing high/low in the price domain.
    pub fn shows_ranges(&self) -> bool {
        self.show_ohlc || self.show_candlesticks
    }

    pub fn enabled(&self) -> impl Iterator<Item = ViewFlag> + '_ {
        ViewFlag::ALL.into_iter().filter(|f| self.get(*f))
    }
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self { show_close: true, show_moving_average: true, show_ohlc: false, show_candlesticks: false }
    }
}

/// Everything the user can change; owned by the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub flags: ViewFlags,
    pub dataset: Option<DatasetId>,
    pub period: Period,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_reports_change_only_once() {
        let mut f = ViewFlags::default();
        assert!(f.set(ViewFlag::Ohlc, true));
        assert!(!f.set(ViewFlag::Ohlc, true));
        assert!(f.get(ViewFlag::Ohlc));
        assert!(f.shows_ranges());
        assert!(!f.set(ViewFlag::Candlesticks, false));
    }

    #[test]
    fn flags_are_independent() {
        let mut f = ViewFlags::default();
        f.set(ViewFlag::Close, false);
        assert!(f.get(ViewFlag::MovingAverage));
        assert_eq!(f.enabled().collect::<Vec<_>>(), vec![ViewFlag::MovingAverage]);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let f: ViewFlags = serde_json::from_str(r#"{ "show_ohlc": true }"#).unwrap();
        assert!(f.show_close && f.show_moving_average && f.show_ohlc && !f.show_candlesticks);
    }
}
