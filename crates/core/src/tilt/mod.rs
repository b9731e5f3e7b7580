//! Pointer-driven card tilt. Stateless: each pointer move maps a card's
//! bounds and the pointer position to the styling variables for that card.

use crate::surface::Point;

const SHADOW_DIVISOR: f32 = 20.0;
const REACH_DIVISOR: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CardRect {
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltVars {
    /// Direction from card centre to pointer, rotated so 0 means "above".
    pub degrees: f32,
    /// Pointer distance in `[0, 1]`, saturating at the card's reach.
    pub distance: f32,
    pub shadow_x: f32,
    pub shadow_y: f32,
}

impl TiltVars {
    /// Values applied when the pointer leaves the page. The angle is kept
    /// by the caller.
    pub fn rest(degrees: f32) -> Self {
        Self {
            degrees,
            distance: 0.0,
            shadow_x: 0.0,
            shadow_y: 0.0,
        }
    }
}

pub fn tilt_for(card: &CardRect, pointer: Point) -> TiltVars {
    let center = card.center();
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    let reach = card.width.min(card.height) / REACH_DIVISOR;
    let distance = if reach > 0.0 {
        dx.hypot(dy).min(reach) / reach
    } else {
        0.0
    };

    TiltVars {
        degrees: dy.atan2(dx).to_degrees() + 90.0,
        distance,
        shadow_x: dx / SHADOW_DIVISOR,
        shadow_y: dy / SHADOW_DIVISOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: CardRect = CardRect {
        left: 0.0,
        top: 0.0,
        width: 300.0,
        height: 150.0,
    };

    #[test]
    fn pointer_to_the_right_points_at_ninety_degrees() {
        let vars = tilt_for(&CARD, Point::new(200.0, 75.0));
        assert!((vars.degrees - 90.0).abs() < 1e-4);
        assert!((vars.distance - 0.5).abs() < 1e-6);
        assert!((vars.shadow_x - 2.5).abs() < 1e-6);
        assert_eq!(vars.shadow_y, 0.0);
    }

    #[test]
    fn distance_saturates_at_reach() {
        let vars = tilt_for(&CARD, Point::new(2_000.0, 2_000.0));
        assert_eq!(vars.distance, 1.0);
    }

    #[test]
    fn degenerate_card_has_zero_distance() {
        let card = CardRect {
            width: 0.0,
            ..CARD
        };
        assert_eq!(tilt_for(&card, Point::new(10.0, 10.0)).distance, 0.0);
    }
}
