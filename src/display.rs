//! Drawing buffer sizing and the double click fullscreen toggle.

use instant::{Duration, Instant};
use winit::{
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    window::{Fullscreen, Window},
};

use crate::context::capped_pixel_ratio;

/// Surface size for a window of `logical` size on a display with
/// `scale_factor`, rendering at most two device pixels per logical pixel.
pub fn surface_size(logical: LogicalSize<f64>, scale_factor: f64) -> PhysicalSize<u32> {
    let size: PhysicalSize<u32> = logical.to_physical(capped_pixel_ratio(scale_factor));
    PhysicalSize::new(size.width.max(1), size.height.max(1))
}

/// How the drawing buffer follows the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Native swapchains must match the window's physical size.
    Swapchain,
    /// The web canvas takes any size, so it renders at the capped ratio.
    Canvas,
}

impl SurfaceKind {
    pub const CURRENT: Self = if cfg!(target_arch = "wasm32") {
        SurfaceKind::Canvas
    } else {
        SurfaceKind::Swapchain
    };

    /// Drawing buffer size for a window whose inner size is `physical`.
    /// `None` while the window has no area, e.g. when minimised.
    pub fn buffer_size(
        self,
        physical: PhysicalSize<u32>,
        scale_factor: f64,
        pixel_ratio: f64,
    ) -> Option<PhysicalSize<u32>> {
        if physical.width == 0 || physical.height == 0 {
            return None;
        }
        Some(match self {
            SurfaceKind::Swapchain => physical,
            SurfaceKind::Canvas => surface_size(physical.to_logical(scale_factor), pixel_ratio),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenAction {
    Enter,
    Exit,
}

/// Enter fullscreen from a window, leave it otherwise.
pub fn fullscreen_toggle(is_fullscreen: bool) -> FullscreenAction {
    if is_fullscreen {
        FullscreenAction::Exit
    } else {
        FullscreenAction::Enter
    }
}

pub(crate) fn toggle_fullscreen(window: &Window) {
    match fullscreen_toggle(window.fullscreen().is_some()) {
        FullscreenAction::Enter => {
            log::debug!("Entering fullscreen");
            window.set_fullscreen(Some(Fullscreen::Borderless(None)))
        }
        FullscreenAction::Exit => {
            log::debug!("Leaving fullscreen");
            window.set_fullscreen(None)
        }
    }
}

/// Recognises two presses close together in time and space.
#[derive(Debug, Clone)]
pub struct DoubleClick {
    pub interval: Duration,
    pub max_distance: f64,
    last: Option<(Instant, PhysicalPosition<f64>)>,
}

impl Default for DoubleClick {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), 6.0)
    }
}

impl DoubleClick {
    pub fn new(interval: Duration, max_distance: f64) -> Self {
        Self {
            interval,
            max_distance,
            last: None,
        }
    }

    /// Register a press. Returns `true` when it completes a double click; the
    /// press after that starts a new pair.
    pub fn press(&mut self, at: Instant, position: PhysicalPosition<f64>) -> bool {
        let completes = self.last.is_some_and(|(last_at, last_position)| {
            let in_time = at
                .checked_duration_since(last_at)
                .is_some_and(|elapsed| elapsed <= self.interval);
            let (dx, dy) = (position.x - last_position.x, position.y - last_position.y);
            in_time && dx.hypot(dy) <= self.max_distance
        });
        self.last = if completes { None } else { Some((at, position)) };
        completes
    }
}
