//! Named seed patterns stamped onto the grid at startup.

use serde::Serialize;

/// A fixed set of live-cell offsets relative to a top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

const GLIDER_CELLS: &[(usize, usize)] = &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

// Gosper glider gun
const GUN_CELLS: &[(usize, usize)] = &[
    (0, 4), (1, 4), (0, 5), (1, 5), (10, 4), (10, 5), (10, 6),
    (11, 3), (11, 7), (12, 2), (12, 8), (13, 2), (13, 8), (14, 5),
    (15, 3), (15, 7), (16, 4), (16, 5), (16, 6), (17, 5), (20, 2),
    (20, 3), (20, 4), (21, 2), (21, 3), (21, 4), (22, 1), (22, 5),
    (24, 0), (24, 1), (24, 5), (24, 6), (34, 2), (34, 3), (35, 2),
    (35, 3),
];

const SMALL_GLIDER_CELLS: &[(usize, usize)] = &[(0, 0), (1, 0), (2, 0), (0, 1), (1, 2)];

impl Pattern {
    pub const GLIDER: Pattern = Pattern {
        name: "glider",
        cells: GLIDER_CELLS,
    };

    pub const GUN: Pattern = Pattern {
        name: "gun",
        cells: GUN_CELLS,
    };

    pub const SMALL_GLIDER: Pattern = Pattern {
        name: "small-glider",
        cells: SMALL_GLIDER_CELLS,
    };

    pub fn all() -> [Pattern; 3] {
        [Self::GLIDER, Self::GUN, Self::SMALL_GLIDER]
    }

    pub fn by_name(name: &str) -> Option<Pattern> {
        Self::all().into_iter().find(|p| p.name == name)
    }

    /// Bounding width/height of the pattern, in cells
    pub fn extent(&self) -> (usize, usize) {
        let width = self.cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
        let height = self.cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
        (width, height)
    }

    pub fn fits_in(&self, width: usize, height: usize) -> bool {
        let (w, h) = self.extent();
        w <= width && h <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extents() {
        assert_eq!(Pattern::GLIDER.extent(), (3, 3));
        assert_eq!(Pattern::SMALL_GLIDER.extent(), (3, 3));
        assert_eq!(Pattern::GUN.extent(), (36, 9));
        assert_eq!(Pattern::GUN.cells.len(), 36);
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Pattern::by_name("gun"), Some(Pattern::GUN));
        assert_eq!(Pattern::by_name("small-glider"), Some(Pattern::SMALL_GLIDER));
        assert_eq!(Pattern::by_name("spaceship"), None);
    }

    #[test]
    fn test_fits_in() {
        assert!(Pattern::GLIDER.fits_in(3, 3));
        assert!(!Pattern::GLIDER.fits_in(2, 10));
        assert!(!Pattern::GUN.fits_in(35, 100));
    }
}
