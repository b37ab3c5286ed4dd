/// Raw scroll measurements in CSS pixels, as reported by the browser.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub document_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn max_offset(&self) -> f64 {
        self.document_height - self.viewport_height
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// Progress through the scrollable range, in [0, 100].
    pub percentage: f64,
    pub raw_offset: f64,
}

impl ScrollState {
    pub fn from_metrics(metrics: ScrollMetrics) -> Self {
        let raw_offset = metrics.scroll_y.max(0.0);
        Self {
            percentage: scroll_percentage(raw_offset, metrics.max_offset()),
            raw_offset,
        }
    }
}

pub fn scroll_percentage(raw_offset: f64, max_offset: f64) -> f64 {
    if max_offset.is_nan() || max_offset <= 0.0 {
        return 0.0;
    }
    // elastic overscroll can report offsets past either end
    (raw_offset / max_offset * 100.0).clamp(0.0, 100.0)
}

pub fn progress_width(percentage: f64) -> String {
    format!("{:.2}%", percentage.clamp(0.0, 100.0))
}

pub fn parallax_offset(raw_offset: f64, depth: f64) -> f64 {
    raw_offset * depth
}

pub fn parallax_transform(raw_offset: f64, depth: f64) -> String {
    format!("translate3d(0, {:.2}px, 0)", parallax_offset(raw_offset, depth))
}

/// Elements that move with scroll, each with its own depth factor.
///
/// Negative depths are valid and move the element against the scroll
/// direction.
#[derive(Debug)]
pub struct ParallaxRegistry<H> {
    targets: Vec<(H, f64)>,
}

impl<H> Default for ParallaxRegistry<H> {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
        }
    }
}

impl<H> ParallaxRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handle: H, depth: f64) {
        self.targets.push((handle, depth));
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn transforms(&self, raw_offset: f64) -> impl Iterator<Item = (&H, String)> + '_ {
        self.targets
            .iter()
            .map(move |(handle, depth)| (handle, parallax_transform(raw_offset, *depth)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(scroll_y: f64, document_height: f64, viewport_height: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y,
            document_height,
            viewport_height,
        }
    }

    #[test]
    fn halfway_down_a_two_screen_document_is_fifty_percent() {
        let state = ScrollState::from_metrics(metrics(500.0, 2000.0, 1000.0));
        assert_eq!(state.percentage, 50.0);
        assert_eq!(state.raw_offset, 500.0);
        assert_eq!(progress_width(state.percentage), "50.00%");
    }

    #[test]
    fn percentage_is_linear_and_monotonic() {
        let max_offset = 1375.0;
        let mut previous = -1.0;
        for step in 0..=55 {
            let s = step as f64 * 25.0;
            let p = scroll_percentage(s, max_offset);
            assert!((p - s / max_offset * 100.0).abs() < 1e-9);
            assert!(p >= previous);
            previous = p;
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn short_documents_report_zero() {
        for s in [0.0, 10.0, 900.0] {
            assert_eq!(ScrollState::from_metrics(metrics(s, 800.0, 800.0)).percentage, 0.0);
            assert_eq!(ScrollState::from_metrics(metrics(s, 600.0, 800.0)).percentage, 0.0);
        }
        assert_eq!(scroll_percentage(10.0, f64::NAN), 0.0);
    }

    #[test]
    fn overscroll_is_clamped() {
        assert_eq!(ScrollState::from_metrics(metrics(-40.0, 2000.0, 1000.0)).percentage, 0.0);
        assert_eq!(ScrollState::from_metrics(metrics(1100.0, 2000.0, 1000.0)).percentage, 100.0);
        assert_eq!(ScrollState::from_metrics(metrics(-40.0, 2000.0, 1000.0)).raw_offset, 0.0);
    }

    #[test]
    fn parallax_multiplies_offset_by_depth() {
        let mut registry = ParallaxRegistry::new();
        registry.register("hero", 0.2);
        registry.register("tile", -0.05);
        registry.register("still", 0.0);

        let transforms: Vec<_> = registry.transforms(400.0).collect();
        assert_eq!(
            transforms,
            vec![
                (&"hero", "translate3d(0, 80.00px, 0)".to_string()),
                (&"tile", "translate3d(0, -20.00px, 0)".to_string()),
                (&"still", "translate3d(0, 0.00px, 0)".to_string()),
            ]
        );
    }

    #[test]
    fn cleared_registry_produces_nothing() {
        let mut registry = ParallaxRegistry::new();
        registry.register(1_u32, 0.1);
        assert_eq!(registry.len(), 1);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.transforms(100.0).count(), 0);
    }
}
