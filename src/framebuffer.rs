//! 64×32 monochrome framebuffer.
//!
//! Every pixel is a whole `u32`, either all bits set or zero, so a host can
//! upload the buffer as an RGBA texture without converting it.

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

pub const PIXEL_ON: u32 = 0xffff_ffff;
pub const PIXEL_OFF: u32 = 0;

pub struct Framebuffer {
    pixels: Box<[u32]>,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: vec![PIXEL_OFF; WIDTH * HEIGHT].into_boxed_slice(),
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(PIXEL_OFF);
    }

    /// row-major pixels
    pub fn as_slice(&self) -> &[u32] {
        &self.pixels
    }

    /// bytes per row
    pub fn pitch(&self) -> usize {
        WIDTH * std::mem::size_of::<u32>()
    }

    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.pixels[y * WIDTH + x] == PIXEL_ON
    }

    /// XOR an 8-pixel-wide sprite onto the screen, one byte per row, with the
    /// top-left corner at (x, y) taken modulo the screen size. Pixels past an
    /// edge wrap to the other side, or are dropped when `clip` is set.
    /// Returns true if any pixel that was on got turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8], clip: bool) -> bool {
        let x0 = x as usize % WIDTH;
        let y0 = y as usize % HEIGHT;
        let mut collision = false;

        for (row, bits) in sprite.iter().enumerate() {
            let py = y0 + row;
            if clip && py >= HEIGHT {
                break;
            }
            let py = py % HEIGHT;
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let px = x0 + col;
                if clip && px >= WIDTH {
                    break;
                }
                let pixel = &mut self.pixels[py * WIDTH + px % WIDTH];
                if *pixel == PIXEL_ON {
                    collision = true;
                }
                *pixel ^= PIXEL_ON;
            }
        }
        collision
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(fb: &Framebuffer) -> usize {
        fb.as_slice().iter().filter(|&&p| p == PIXEL_ON).count()
    }

    #[test]
    fn test_new_is_blank() {
        let fb = Framebuffer::new();
        assert_eq!(fb.as_slice().len(), 2048);
        assert_eq!(lit(&fb), 0);
        assert_eq!(fb.pitch(), 256);
    }

    #[test]
    fn test_draw_row() {
        let mut fb = Framebuffer::new();
        assert!(!fb.draw_sprite(2, 3, &[0b1010_0001], false));
        assert!(fb.is_on(2, 3));
        assert!(!fb.is_on(3, 3));
        assert!(fb.is_on(4, 3));
        assert!(fb.is_on(9, 3));
        assert_eq!(lit(&fb), 3);
    }

    #[test]
    fn test_draw_twice_restores() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(60, 30, &[0xff, 0x81, 0xff], false);
        let before: Vec<u32> = fb.as_slice().to_vec();

        let glyph = [0xF0, 0x90, 0xF0, 0x90, 0xF0];
        assert!(!fb.draw_sprite(10, 10, &glyph, false));
        assert!(fb.draw_sprite(10, 10, &glyph, false));
        assert_eq!(fb.as_slice(), before.as_slice());
    }

    #[test]
    fn test_collision_only_on_overlap() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0xf0], false);
        // adjacent, no overlap
        assert!(!fb.draw_sprite(4, 0, &[0xf0], false));
        // one pixel overlap
        assert!(fb.draw_sprite(7, 0, &[0x80], false));
        assert!(!fb.is_on(7, 0));
    }

    #[test]
    fn test_origin_wraps() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(64 + 5, 32 + 6, &[0x80], false);
        assert!(fb.is_on(5, 6));
    }

    #[test]
    fn test_pixels_wrap_at_edges() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(62, 31, &[0xf0, 0xf0], false);
        for (x, y) in [(62, 31), (63, 31), (0, 31), (1, 31), (62, 0), (63, 0), (0, 0), (1, 0)] {
            assert!(fb.is_on(x, y), "({}, {}) should be on", x, y);
        }
        assert_eq!(lit(&fb), 8);
    }

    #[test]
    fn test_clip_at_edges() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(62, 31, &[0xf0, 0xf0], true);
        assert!(fb.is_on(62, 31));
        assert!(fb.is_on(63, 31));
        assert_eq!(lit(&fb), 2);
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0xff; 15], false);
        fb.draw_sprite(40, 20, &[0xff; 15], false);
        assert!(lit(&fb) > 0);
        fb.clear();
        assert_eq!(lit(&fb), 0);
    }
}
