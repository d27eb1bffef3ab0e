//! マウス入力
//!
//! 端末はダブルクリックを通知しないため、同じ対象への連続クリックを
//! 時間間隔で判定する。

use crate::table::{Gesture, Target};
use std::time::{Duration, Instant};

/// ダブルクリック判定の既定間隔
pub const DEFAULT_DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(400);

/// クリック履歴
#[derive(Debug, Clone)]
pub struct ClickTracker {
    interval: Duration,
    last: Option<(Target, Instant)>,
}

impl ClickTracker {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// クリックを記録し、2回目のクリックなら `DoubleClick` を返す
    pub fn register(&mut self, target: Target, at: Instant) -> Gesture {
        match self.last.take() {
            Some((previous, when))
                if previous == target && at.saturating_duration_since(when) <= self.interval =>
            {
                Gesture::DoubleClick
            }
            _ => {
                self.last = Some((target, at));
                Gesture::Click
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_CLICK_INTERVAL)
    }
}
