// mask.rs
use bevy::math::{IVec2, UVec2};

/// Opaque-pixel bitmap used for pixel-exact collision between sprites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    size: UVec2,
    bits: Vec<bool>,
}

impl Mask {
    /// A mask with every pixel set, matching a solid rectangular sprite.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            size: UVec2::new(width, height),
            bits: vec![true; (width * height) as usize],
        }
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            size: UVec2::new(width, height),
            bits: vec![false; (width * height) as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.size.x || y >= self.size.y {
            return false;
        }
        self.bits[(y * self.size.x + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.size.x && y < self.size.y {
            let index = (y * self.size.x + x) as usize;
            self.bits[index] = value;
        }
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    /// First pixel where `other`, placed at `offset` relative to this mask's
    /// top-left corner, overlaps a set pixel of this mask.
    ///
    /// The scan is row-major over the intersection of both rectangles, and
    /// the returned point is in this mask's coordinates.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let x_start = offset.x.max(0);
        let y_start = offset.y.max(0);
        let x_end = (offset.x + other.size.x as i32).min(self.size.x as i32);
        let y_end = (offset.y + other.size.y as i32).min(self.size.y as i32);

        if x_start >= x_end || y_start >= y_end {
            return None;
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                let ours = self.get(x as u32, y as u32);
                let theirs = other.get((x - offset.x) as u32, (y - offset.y) as u32);
                if ours && theirs {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }
}
