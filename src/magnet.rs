pub const MAGNET_RADIUS: f64 = 250.0;
pub const MAGNET_PULL: f64 = 0.12;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Visual displacement of a magnet target, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn to_transform(self) -> String {
        format!("translate({:.2}px, {:.2}px)", self.x, self.y)
    }
}

pub fn magnet_strength(distance: f64) -> f64 {
    (1.0 - distance / MAGNET_RADIUS).max(0.0)
}

/// Pulls an element centred at `center` toward `pointer`.
pub fn magnet_offset(pointer: Point, center: Point) -> Offset {
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    let strength = magnet_strength(dx.hypot(dy));

    if strength == 0.0 {
        return Offset::ZERO;
    }

    Offset {
        x: dx * MAGNET_PULL * strength,
        y: dy * MAGNET_PULL * strength,
    }
}

#[derive(Debug)]
pub struct MagnetTarget<H> {
    pub handle: H,
    pub offset: Offset,
}

#[derive(Debug)]
pub struct MagnetRegistry<H> {
    targets: Vec<MagnetTarget<H>>,
}

impl<H> Default for MagnetRegistry<H> {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
        }
    }
}

impl<H> MagnetRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handle: H) {
        self.targets.push(MagnetTarget {
            handle,
            offset: Offset::ZERO,
        });
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn targets(&self) -> &[MagnetTarget<H>] {
        &self.targets
    }

    /// Recomputes every target's offset for the given pointer position.
    ///
    /// Offsets are measured from the untransformed centre returned by
    /// `center_of`; targets that cannot be measured keep their offset.
    pub fn update<F>(&mut self, pointer: Point, mut center_of: F)
    where
        F: FnMut(&H) -> Option<Point>,
    {
        for target in &mut self.targets {
            if let Some(center) = center_of(&target.handle) {
                target.offset = magnet_offset(pointer, center);
            }
        }
    }

    pub fn reset(&mut self) {
        for target in &mut self.targets {
            target.offset = Offset::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_is_full_at_the_centre_and_zero_past_the_radius() {
        assert_eq!(magnet_strength(0.0), 1.0);
        assert_eq!(magnet_strength(125.0), 0.5);
        assert_eq!(magnet_strength(250.0), 0.0);
        assert_eq!(magnet_strength(900.0), 0.0);
    }

    #[test]
    fn strength_never_increases_with_distance() {
        let mut previous = f64::INFINITY;
        for step in 0..=50 {
            let strength = magnet_strength(step as f64 * 5.0);
            assert!(strength <= previous);
            assert!((0.0..=1.0).contains(&strength));
            previous = strength;
        }
    }

    #[test]
    fn far_pointers_leave_targets_in_place() {
        let center = Point::new(500.0, 300.0);
        for pointer in [Point::new(750.0, 300.0), Point::new(500.0, 30.0), Point::new(0.0, 0.0)] {
            assert_eq!(magnet_offset(pointer, center), Offset::ZERO);
        }
    }

    #[test]
    fn targets_are_pulled_toward_the_pointer() {
        let offset = magnet_offset(Point::new(200.0, 100.0), Point::new(100.0, 100.0));
        // distance 100 -> strength 0.6 -> 100 * 0.12 * 0.6
        assert!((offset.x - 7.2).abs() < 1e-9);
        assert_eq!(offset.y, 0.0);

        let offset = magnet_offset(Point::new(100.0, 40.0), Point::new(100.0, 100.0));
        assert!(offset.y < 0.0);
        assert_eq!(offset.to_transform(), "translate(0.00px, -5.47px)");
    }

    #[test]
    fn pointer_on_the_centre_does_not_move_the_target() {
        let center = Point::new(10.0, 10.0);
        assert_eq!(magnet_offset(center, center), Offset::ZERO);
    }

    #[test]
    fn registry_updates_measurable_targets_and_resets() {
        let mut registry = MagnetRegistry::new();
        registry.register("primary");
        registry.register("secondary");
        registry.register("detached");

        let center_of = |handle: &&str| match *handle {
            "primary" => Some(Point::new(100.0, 100.0)),
            "secondary" => Some(Point::new(1000.0, 100.0)),
            _ => None,
        };

        let pointer = Point::new(150.0, 100.0);
        registry.update(pointer, center_of);
        let first: Vec<_> = registry.targets().iter().map(|t| t.offset).collect();
        registry.update(pointer, center_of);
        let second: Vec<_> = registry.targets().iter().map(|t| t.offset).collect();

        assert_eq!(first, second);
        assert!(first[0].x > 0.0);
        assert_eq!(first[1], Offset::ZERO);
        assert_eq!(first[2], Offset::ZERO);

        registry.reset();
        assert!(registry.targets().iter().all(|t| t.offset == Offset::ZERO));
    }
}
