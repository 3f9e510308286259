//! Driving the external map renderer.
//!
//! [`MapLayer`] turns a [`DashboardView`] into draw calls: one polygon per
//! region with a registered boundary, styled by its encoding and carrying
//! its popup. Pointer events only ever change transient emphasis or issue a
//! filter update through the coordinator; they never touch the view.

use invest_map_encoding::{EmphasisState, EncodingConfig, PopupContent, RegionStyle, popup_content};
use invest_map_geography::RegionRegistry;
use invest_map_geography_models::{GeoBounds, RegionGeometry};

use crate::coordinator::{FilterCoordinator, FilterSnapshot};
use crate::view::DashboardView;

/// The map collaborator. Implementations draw onto whatever tile map the
/// application embeds.
pub trait MapRenderer {
    /// Removes every region polygon.
    fn clear(&mut self);

    /// Draws one region polygon.
    fn draw_region(&mut self, geometry: &RegionGeometry, style: &RegionStyle, popup: &PopupContent);

    /// Changes the style of an already drawn region.
    fn restyle_region(&mut self, region: &str, style: &RegionStyle);

    /// Moves the viewport to show `bounds`.
    fn fit_bounds(&mut self, bounds: GeoBounds);
}

/// Result of one [`MapLayer::render`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Regions drawn, in rank order.
    pub drawn: Vec<String>,
    /// Regions with data but no registered boundary.
    pub skipped: Vec<String>,
}

/// Map overlay state between renders.
#[derive(Debug)]
pub struct MapLayer {
    registry: &'static RegionRegistry,
    config: EncodingConfig,
    emphasis: EmphasisState,
    styles: Vec<(String, RegionStyle)>,
    bounds: Option<GeoBounds>,
}

impl MapLayer {
    /// Creates a layer over `registry`.
    #[must_use]
    pub const fn new(registry: &'static RegionRegistry, config: EncodingConfig) -> Self {
        Self {
            registry,
            config,
            emphasis: EmphasisState::new(),
            styles: Vec::new(),
            bounds: None,
        }
    }

    /// Redraws every region of `view`.
    ///
    /// Regions without a registered boundary are logged and skipped; the
    /// rest of the map still renders.
    pub fn render(&mut self, view: &DashboardView, renderer: &mut impl MapRenderer) -> RenderSummary {
        renderer.clear();
        self.emphasis.clear();
        self.styles.clear();
        self.bounds = None;

        let mut summary = RenderSummary::default();
        for (metric, encoding) in view.ranked() {
            let Some(geometry) = self.registry.geometry(&encoding.region) else {
                log::warn!("No boundary registered for region '{}'; skipping", encoding.region);
                summary.skipped.push(encoding.region.clone());
                continue;
            };

            renderer.draw_region(geometry, &encoding.style, &popup_content(metric));

            if let Some(b) = geometry.bounds() {
                self.bounds = Some(self.bounds.map_or(b, |acc| acc.union(b)));
            }
            self.styles
                .push((geometry.name.clone(), encoding.style.clone()));
            summary.drawn.push(geometry.name.clone());
        }

        if let Some(bounds) = self.bounds {
            renderer.fit_bounds(bounds);
        }
        log::debug!(
            "Rendered {} regions ({} skipped)",
            summary.drawn.len(),
            summary.skipped.len()
        );
        summary
    }

    fn resting_style(&self, region: &str) -> Option<&RegionStyle> {
        self.styles
            .iter()
            .find(|(name, _)| name == region)
            .map(|(_, style)| style)
    }

    /// Resolves any spelling of `region` to the name it was drawn under.
    fn drawn_name(&self, region: &str) -> Option<&'static str> {
        self.registry.geometry(region).map(|g| g.name.as_str())
    }

    /// Emphasizes `region`. Returns `false` if it is not drawn.
    pub fn on_hover(&mut self, region: &str, renderer: &mut impl MapRenderer) -> bool {
        let Some(region) = self.drawn_name(region) else {
            return false;
        };
        let Some(style) = self.resting_style(region).cloned() else {
            return false;
        };
        if let Some(previous) = self.emphasis.focused().map(str::to_string)
            && previous != region
            && let Some(resting) = self.resting_style(&previous)
        {
            renderer.restyle_region(&previous, resting);
        }
        if self.emphasis.focus(region) {
            renderer.restyle_region(region, &style.emphasized(&self.config));
        }
        true
    }

    /// Restores `region`'s resting style if it is the emphasized one.
    pub fn on_leave(&mut self, region: &str, renderer: &mut impl MapRenderer) {
        let Some(region) = self.drawn_name(region) else {
            return;
        };
        if self.emphasis.focused() != Some(region) {
            return;
        }
        self.emphasis.clear();
        if let Some(style) = self.resting_style(region) {
            renderer.restyle_region(region, style);
        }
    }

    /// Filters the dashboard to a clicked region.
    pub fn on_click<'a>(
        &self,
        region: &str,
        coordinator: &'a mut FilterCoordinator,
    ) -> &'a FilterSnapshot {
        coordinator.select_region(region)
    }

    /// Filters the dashboard to the region containing a clicked point.
    /// Returns `None` when the point is outside every registered boundary.
    pub fn on_map_click<'a>(
        &self,
        lat: f64,
        lon: f64,
        coordinator: &'a mut FilterCoordinator,
    ) -> Option<&'a FilterSnapshot> {
        let region = self.registry.locate(lat, lon)?;
        Some(coordinator.select_region(region))
    }

    /// Currently emphasized region.
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.emphasis.focused()
    }

    /// Bounds of every region drawn by the last render.
    #[must_use]
    pub const fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }
}
