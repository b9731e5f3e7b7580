//! Paint targets for the particle layer.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Result, ShelfError};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 8-bit colour, (de)serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const FIREWORK_PALETTE: [Rgb; 6] = [
        Rgb::new(0xff, 0x4d, 0x4d),
        Rgb::new(0xff, 0xd2, 0x4d),
        Rgb::new(0x4d, 0x94, 0xff),
        Rgb::new(0x4d, 0xff, 0x88),
        Rgb::new(0xb8, 0x4d, 0xff),
        Rgb::new(0xff, 0x7f, 0xbf),
    ];

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ShelfError::msg(format!("invalid colour `{s}`")));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ShelfError::msg(format!("invalid colour `{s}`")))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ShelfError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Logical (CSS pixel) size of the paint surface plus its pixel density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Backing store size in device pixels. A non-positive ratio counts as 1.
    pub fn backing_size(&self) -> (u32, u32) {
        let ratio = if self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        (
            (self.width * ratio).floor().max(0.0) as u32,
            (self.height * ratio).floor().max(0.0) as u32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Immediate-mode fill operations in logical coordinates. `alpha` is
/// already clamped to `[0, 1]` by callers.
pub trait Surface {
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgb, alpha: f32);
    fn fill_rect(&mut self, origin: Point, width: f32, height: f32, color: Rgb, alpha: f32);
    fn fill_polygon(&mut self, points: &[Point], color: Rgb, alpha: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle {
        center: Point,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
    Rect {
        origin: Point,
        width: f32,
        height: f32,
        color: Rgb,
        alpha: f32,
    },
    Polygon {
        points: Vec<Point>,
        color: Rgb,
        alpha: f32,
    },
}

/// Surface that records commands instead of rasterizing them.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands issued since the last clear.
    pub fn current_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Clear))
            .map_or(0, |index| index + 1);
        &self.commands[start..]
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl Surface for DrawList {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn fill_rect(&mut self, origin: Point, width: f32, height: f32, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Rect {
            origin,
            width,
            height,
            color,
            alpha,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
            alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_hex_colours() {
        let color: Rgb = "#ffd24d".parse().unwrap();
        assert_eq!(color, Rgb::new(0xff, 0xd2, 0x4d));
        assert_eq!(color.to_string(), "#ffd24d");
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn backing_size_scales_by_density() {
        let viewport = Viewport::new(100.5, 50.0).with_device_pixel_ratio(2.0);
        assert_eq!(viewport.backing_size(), (201, 100));
        assert_eq!(
            Viewport::new(10.0, 10.0).with_device_pixel_ratio(0.0).backing_size(),
            (10, 10)
        );
    }

    #[test]
    fn current_frame_starts_after_last_clear() {
        let mut list = DrawList::new();
        list.fill_circle(Point::default(), 1.0, Rgb::new(0, 0, 0), 1.0);
        list.clear();
        list.fill_rect(Point::default(), 1.0, 1.0, Rgb::new(0, 0, 0), 0.5);

        assert_eq!(list.commands().len(), 3);
        assert_eq!(list.current_frame().len(), 1);
    }
}
