//! Deterministic Rorschach generator executed inside the guest.
//!
//! Walks run on a virtual 64×64 canvas confined to its central region and are
//! folded onto the stored 32×64 half at write time, so the pattern meets at the
//! mirror axis. All arithmetic is integer fixed-point.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    identity::PrivateKey,
    image::{BinaryImage, HEIGHT, WIDTH},
};

const VIRTUAL_WIDTH: u64 = 2 * WIDTH;
const QUARTER: u64 = VIRTUAL_WIDTH / 4;
const SCALE: u64 = 1_000_000;

// Walk region, upper bounds exclusive.
const LEFT: u64 = QUARTER;
const RIGHT: u64 = 3 * QUARTER;
const TOP: u64 = HEIGHT / 4;
const BOTTOM: u64 = 3 * HEIGHT / 4;

/// Inputs of the walk besides the seed. Committed verbatim in the journal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationParameters {
    pub walks: u64,
    pub steps: u64,
}

impl GenerationParameters {
    /// `walks` in 3..=10 from key bytes 0..4, `steps` in 100..=300 from bytes 4..8.
    pub fn derive(key: &PrivateKey) -> Self {
        let pk = key.as_bytes();
        let walks_raw = u32::from_le_bytes([pk[0], pk[1], pk[2], pk[3]]);
        let steps_raw = u32::from_le_bytes([pk[4], pk[5], pk[6], pk[7]]);

        Self {
            walks: 3 + u64::from(walks_raw % 8),
            steps: 100 + u64::from(steps_raw % 201),
        }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Left,
    Right,
    Up,
    Down,
}

struct Walker {
    rng: ChaCha8Rng,
    x: u64,
    y: u64,
}

impl Walker {
    fn place(&mut self) {
        self.x = self.rng.gen_range(LEFT..RIGHT);
        self.y = self.rng.gen_range(TOP..BOTTOM);
    }

    fn step(&mut self) {
        match self.decide() {
            Direction::Left if self.x > LEFT => self.x -= 1,
            Direction::Right if self.x < RIGHT - 1 => self.x += 1,
            Direction::Up if self.y > TOP => self.y -= 1,
            Direction::Down if self.y < BOTTOM - 1 => self.y += 1,
            _ => {}
        }
    }

    /// Picks a direction with weights that fade towards the region edges.
    fn decide(&mut self) -> Direction {
        let left = weight(self.x.saturating_sub(LEFT), QUARTER);
        let right = weight(RIGHT.saturating_sub(self.x), QUARTER);
        let up = weight(self.y.saturating_sub(TOP), HEIGHT / 4);
        let down = weight(BOTTOM.saturating_sub(self.y), HEIGHT / 4);

        // right and down never reach zero inside the region
        let total = left + right + up + down;
        let roll = self.rng.gen::<u32>() % total;

        if roll < left {
            Direction::Left
        } else if roll < left + right {
            Direction::Right
        } else if roll < left + right + up {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    fn draw(&self, image: &mut BinaryImage) {
        let x = if self.x >= WIDTH {
            VIRTUAL_WIDTH - self.x - 1
        } else {
            self.x
        };
        image.set_pixel(x, self.y, true);
    }
}

fn weight(distance: u64, span: u64) -> u32 {
    if distance >= span {
        SCALE as u32
    } else {
        (distance * SCALE / span) as u32
    }
}

/// Generates the binary half-canvas for `key`. Pure function of its inputs.
pub fn generate_rorschach(key: &PrivateKey, params: GenerationParameters) -> BinaryImage {
    let mut image = BinaryImage::new();
    let mut walker = Walker {
        rng: ChaCha8Rng::from_seed(*key.as_bytes()),
        x: LEFT,
        y: TOP,
    };

    for _ in 0..params.walks {
        walker.place();
        walker.draw(&mut image);
        for _ in 0..params.steps {
            walker.step();
            walker.draw(&mut image);
        }
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> PrivateKey {
        PrivateKey::from_bytes([byte; 32])
    }

    #[test]
    fn parameters_stay_in_range() {
        for byte in [0x00, 0x11, 0x7f, 0xff] {
            let params = GenerationParameters::derive(&key(byte));
            assert!((3..=10).contains(&params.walks));
            assert!((100..=300).contains(&params.steps));
        }
    }

    #[test]
    fn parameters_from_little_endian_words() {
        let mut bytes = [0u8; 32];
        bytes[0] = 5;
        bytes[4] = 0xc9; // 201
        let params = GenerationParameters::derive(&PrivateKey::from_bytes(bytes));
        assert_eq!(params, GenerationParameters { walks: 8, steps: 100 });
    }

    #[test]
    fn generation_is_deterministic() {
        let params = GenerationParameters { walks: 5, steps: 150 };
        assert_eq!(
            generate_rorschach(&key(0x11), params),
            generate_rorschach(&key(0x11), params)
        );
        assert_ne!(
            generate_rorschach(&key(0x11), params),
            generate_rorschach(&key(0x22), params)
        );
    }

    #[test]
    fn pattern_stays_in_central_band() {
        let image = generate_rorschach(&key(0x42), GenerationParameters { walks: 10, steps: 300 });
        assert!(image.count_foreground() > 0);
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if image.get_pixel(x, y) {
                    assert!(x >= LEFT, "pixel left of region at ({x}, {y})");
                    assert!((TOP..BOTTOM).contains(&y), "pixel outside band at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn zero_walks_leave_blank_canvas() {
        let image = generate_rorschach(&key(0x42), GenerationParameters { walks: 0, steps: 300 });
        assert_eq!(image, BinaryImage::new());
    }
}
