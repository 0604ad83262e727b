use crate::math::Vec2;

/// Screen position of a graphic anchored at `anchor`. A scroll factor of 1
/// tracks the camera fully, 0 pins the graphic to the screen, values in
/// between give parallax. Factors outside [0, 1] are clamped.
pub fn world_to_screen(anchor: Vec2, offset: Vec2, camera: Vec2, scroll: Vec2) -> Vec2 {
    anchor + offset - camera.mul_components(clamp_scroll(scroll))
}

pub(crate) fn clamp_scroll(scroll: Vec2) -> Vec2 {
    Vec2::new(scroll.x.clamp(0.0, 1.0), scroll.y.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scroll_subtracts_camera() {
        let screen = world_to_screen(
            Vec2::new(120.0, 80.0),
            Vec2::ZERO,
            Vec2::new(100.0, 10.0),
            Vec2::new(1.0, 1.0),
        );
        assert_eq!(screen, Vec2::new(20.0, 70.0));
    }

    #[test]
    fn zero_scroll_ignores_camera() {
        let screen = world_to_screen(
            Vec2::new(4.0, 6.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(500.0, 500.0),
            Vec2::ZERO,
        );
        assert_eq!(screen, Vec2::new(5.0, 7.0));
    }

    #[test]
    fn out_of_range_scroll_is_clamped() {
        let screen = world_to_screen(
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(100.0, 100.0),
            Vec2::new(3.0, -2.0),
        );
        assert_eq!(screen, Vec2::new(-100.0, 0.0));
    }

    #[test]
    fn half_scroll_moves_at_half_speed() {
        let screen = world_to_screen(
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(200.0, 0.0),
            Vec2::new(0.5, 1.0),
        );
        assert_eq!(screen, Vec2::new(-100.0, 0.0));
    }
}
