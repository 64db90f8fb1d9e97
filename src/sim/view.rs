//! Fixed-zoom map camera
//!
//! Screen space is CSS pixels with y growing downward; the view center sits
//! at the middle of the canvas.

use glam::DVec2;

use super::geo::{LatLng, LatLngBounds};
use crate::pixels_per_degree;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    /// Canvas size in CSS pixels
    pub size: DVec2,
}

impl MapView {
    pub fn new(center: LatLng, zoom: u8, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            size: DVec2::new(width.max(1.0), height.max(1.0)),
        }
    }

    pub fn pixels_per_degree(&self) -> f64 {
        pixels_per_degree(self.zoom)
    }

    /// Everything currently on screen
    pub fn bounds(&self) -> LatLngBounds {
        let half = self.size / (2.0 * self.pixels_per_degree());
        LatLngBounds::from_corners(
            self.center.offset(-half.y, -half.x),
            self.center.offset(half.y, half.x),
        )
    }

    pub fn latlng_to_screen(&self, p: LatLng) -> DVec2 {
        let ppd = self.pixels_per_degree();
        DVec2::new(
            (p.lng - self.center.lng) * ppd + self.size.x * 0.5,
            self.size.y * 0.5 - (p.lat - self.center.lat) * ppd,
        )
    }

    pub fn screen_to_latlng(&self, px: DVec2) -> LatLng {
        let ppd = self.pixels_per_degree();
        LatLng::new(
            self.center.lat - (px.y - self.size.y * 0.5) / ppd,
            self.center.lng + (px.x - self.size.x * 0.5) / ppd,
        )
    }

    /// Drag the map by a screen delta (content follows the pointer)
    pub fn pan_by_pixels(&mut self, delta: DVec2) {
        let ppd = self.pixels_per_degree();
        self.center = self.center.offset(delta.y / ppd, -delta.x / ppd);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = DVec2::new(width.max(1.0), height.max(1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GAME_ZOOM, START_LAT, START_LNG};

    fn view() -> MapView {
        MapView::new(LatLng::new(START_LAT, START_LNG), GAME_ZOOM, 800.0, 600.0)
    }

    #[test]
    fn test_center_projects_to_canvas_middle() {
        let view = view();
        let px = view.latlng_to_screen(view.center);
        assert!((px - DVec2::new(400.0, 300.0)).length() < 1e-6);
    }

    #[test]
    fn test_projection_round_trip() {
        let view = view();
        let p = view.screen_to_latlng(DVec2::new(123.0, 456.0));
        let back = view.latlng_to_screen(p);
        assert!((back - DVec2::new(123.0, 456.0)).length() < 1e-6);
    }

    #[test]
    fn test_north_is_up() {
        let view = view();
        let north = view.latlng_to_screen(view.center.offset(1e-4, 0.0));
        assert!(north.y < 300.0);
    }

    #[test]
    fn test_bounds_match_canvas_corners() {
        let view = view();
        let bounds = view.bounds();
        let sw = view.latlng_to_screen(bounds.south_west);
        let ne = view.latlng_to_screen(bounds.north_east);
        assert!((sw - DVec2::new(0.0, 600.0)).length() < 1e-6);
        assert!((ne - DVec2::new(800.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_pan_moves_content_with_pointer() {
        let mut view = view();
        let landmark = view.screen_to_latlng(DVec2::new(100.0, 100.0));
        view.pan_by_pixels(DVec2::new(30.0, -20.0));
        let moved = view.latlng_to_screen(landmark);
        assert!((moved - DVec2::new(130.0, 80.0)).length() < 1e-6);
    }
}
