use serde::{Deserialize, Serialize};

/// Rectangle in pixel space (always u32 coordinates)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// Row-major pixel indices covered by this rectangle on a canvas
    /// `canvas_width` pixels wide.
    pub fn indices(&self, canvas_width: u32) -> impl Iterator<Item = u32> + '_ {
        (self.y..self.y + self.height).flat_map(move |row| {
            (self.x..self.x + self.width).map(move |col| row * canvas_width + col)
        })
    }
}

/// Split a canvas into tiles of at most `tile_size` pixels per side,
/// ordered from the center outwards so the interesting region fills first.
pub fn generate_tiles(canvas_size: (u32, u32), tile_size: u32) -> Vec<PixelRect> {
    let (width, height) = canvas_size;
    let tile_size = tile_size.max(1);
    let mut tiles = Vec::new();

    let mut y = 0;
    while y < height {
        let tile_height = tile_size.min(height - y);
        let mut x = 0;
        while x < width {
            let tile_width = tile_size.min(width - x);
            tiles.push(PixelRect::new(x, y, tile_width, tile_height));
            x += tile_size;
        }
        y += tile_size;
    }

    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    tiles.sort_by(|a, b| {
        let da = tile_distance_sq(a, center_x, center_y);
        let db = tile_distance_sq(b, center_x, center_y);
        da.total_cmp(&db)
    });
    tiles
}

fn tile_distance_sq(tile: &PixelRect, center_x: f64, center_y: f64) -> f64 {
    let tx = tile.x as f64 + tile.width as f64 / 2.0;
    let ty = tile.y as f64 + tile.height as f64 / 2.0;
    (tx - center_x).powi(2) + (ty - center_y).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_rect_area() {
        let rect = PixelRect::new(0, 0, 1920, 1080);
        assert_eq!(rect.area(), 1920 * 1080);
    }

    #[test]
    fn test_pixel_rect_contains_point() {
        let rect = PixelRect::new(10, 20, 100, 50);

        assert!(rect.contains(50, 40));
        assert!(rect.contains(10, 20)); // Top-left corner
        assert!(rect.contains(109, 69)); // Bottom-right corner
        assert!(!rect.contains(110, 70)); // Just outside
        assert!(!rect.contains(9, 20)); // Just left
    }

    #[test]
    fn indices_are_row_major() {
        let rect = PixelRect::new(1, 2, 2, 2);
        let indices: Vec<u32> = rect.indices(10).collect();
        assert_eq!(indices, vec![21, 22, 31, 32]);
    }

    #[test]
    fn tiles_cover_canvas_exactly_once() {
        let size = (100, 70);
        let tiles = generate_tiles(size, 32);
        let mut seen = vec![0u8; (size.0 * size.1) as usize];
        for tile in &tiles {
            for index in tile.indices(size.0) {
                seen[index as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn center_tile_comes_first() {
        let tiles = generate_tiles((96, 96), 32);
        assert_eq!(tiles.len(), 9);
        assert_eq!(tiles[0], PixelRect::new(32, 32, 32, 32));
    }

    #[test]
    fn empty_canvas_has_no_tiles() {
        assert!(generate_tiles((0, 10), 16).is_empty());
    }
}
