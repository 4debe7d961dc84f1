//! Topology-preserving thinning.
//!
//! Passes alternate the two Zhang–Suen sub-iterations. A foreground pixel
//! `P1` with neighbours `P2..P9` (clockwise from north) is a candidate when
//!
//! - it has between 2 and 6 foreground neighbours,
//! - it is a simple point (8-connectivity number of exactly one),
//! - sub-iteration 1: `P2·P4·P6 = 0` and `P4·P6·P8 = 0`,
//! - sub-iteration 2: `P2·P4·P8 = 0` and `P2·P6·P8 = 0`.
//!
//! Candidates are then removed one at a time in raster order, each re-checked
//! against the partially thinned mask: it must still be simple and must not be
//! a stroke tip (one neighbour, or two touching neighbours). Removing only
//! simple points keeps every foreground component and every hole, so 2×2
//! blobs and 2-px diagonals survive. Passes repeat until nothing changes.
//! Pixels outside the image are background.
use crate::image::{ImageView, Mask, SkeletonMask};

/// Neighbour offsets `P2..P9`, clockwise from north.
const NEIGHBOURS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

#[inline]
fn neighbourhood(mask: &Mask, x: usize, y: usize) -> [bool; 8] {
    let (xi, yi) = (x as isize, y as isize);
    NEIGHBOURS.map(|(dx, dy)| mask.get_or_background(xi + dx, yi + dy))
}

#[inline]
fn neighbour_count(p: &[bool; 8]) -> usize {
    p.iter().filter(|&&v| v).count()
}

/// Yokoi 8-connectivity number. A pixel is simple when this is 1.
fn connectivity_number(p: &[bool; 8]) -> usize {
    (0..8)
        .step_by(2)
        .filter(|&k| !p[k] && (p[(k + 1) % 8] || p[(k + 2) % 8]))
        .count()
}

/// Stroke end: a lone neighbour, or two neighbours that touch each other.
fn is_tip(p: &[bool; 8]) -> bool {
    match neighbour_count(p) {
        0 | 1 => true,
        2 => {
            let mut set = (0..8).filter(|&i| p[i]);
            match (set.next(), set.next()) {
                (Some(a), Some(b)) => matches!(b - a, 1 | 7),
                _ => false,
            }
        }
        _ => false,
    }
}

fn is_candidate(p: &[bool; 8], first_pass: bool) -> bool {
    if !(2..=6).contains(&neighbour_count(p)) || connectivity_number(p) != 1 {
        return false;
    }
    let [p2, _, p4, _, p6, _, p8, _] = *p;
    if first_pass {
        !(p2 && p4 && p6) && !(p4 && p6 && p8)
    } else {
        !(p2 && p4 && p8) && !(p2 && p6 && p8)
    }
}

fn still_removable(p: &[bool; 8]) -> bool {
    connectivity_number(p) == 1 && !is_tip(p)
}

/// Thin `mask` to unit-width centerlines without changing its topology.
pub fn skeletonize(mask: &Mask) -> SkeletonMask {
    let mut skel = mask.clone();
    let mut candidates = Vec::new();
    loop {
        let mut changed = false;
        for first_pass in [true, false] {
            candidates.clear();
            for y in 0..skel.height() {
                for x in 0..skel.width() {
                    if skel.get(x, y) && is_candidate(&neighbourhood(&skel, x, y), first_pass) {
                        candidates.push((x, y));
                    }
                }
            }
            for &(x, y) in &candidates {
                if still_removable(&neighbourhood(&skel, x, y)) {
                    skel.set(x, y, false);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    skel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_rect(w: usize, h: usize, x0: usize, y0: usize, rw: usize, rh: usize) -> Mask {
        Mask::from_fn(w, h, |x, y| x >= x0 && x < x0 + rw && y >= y0 && y < y0 + rh)
    }

    fn annulus(size: usize, inner: f64, outer: f64) -> Mask {
        let c = size as f64 / 2.0;
        Mask::from_fn(size, size, |x, y| {
            let d2 = (x as f64 - c).powi(2) + (y as f64 - c).powi(2);
            d2 >= inner * inner && d2 <= outer * outer
        })
    }

    fn flood(w: usize, h: usize, mut inside: impl FnMut(isize, isize) -> bool, eight: bool) -> usize {
        let steps: &[(isize, isize)] = if eight {
            &NEIGHBOURS
        } else {
            &[(0, -1), (1, 0), (0, 1), (-1, 0)]
        };
        let (w, h) = (w as isize, h as isize);
        let mut seen = vec![false; (w * h) as usize];
        let mut components = 0;
        for start in 0..w * h {
            let (sx, sy) = (start % w, start / w);
            if seen[start as usize] || !inside(sx, sy) {
                continue;
            }
            components += 1;
            seen[start as usize] = true;
            let mut stack = vec![(sx, sy)];
            while let Some((x, y)) = stack.pop() {
                for &(dx, dy) in steps {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let idx = (ny * w + nx) as usize;
                    if !seen[idx] && inside(nx, ny) {
                        seen[idx] = true;
                        stack.push((nx, ny));
                    }
                }
            }
        }
        components
    }

    /// 8-connected foreground components.
    fn components(mask: &Mask) -> usize {
        flood(mask.width(), mask.height(), |x, y| mask.get_or_background(x, y), true)
    }

    /// 4-connected background components, counting the outside as one.
    fn background_components(mask: &Mask) -> usize {
        flood(
            mask.width() + 2,
            mask.height() + 2,
            |x, y| !mask.get_or_background(x - 1, y - 1),
            false,
        )
    }

    fn noise(w: usize, h: usize, seed: u64) -> Mask {
        let mut s = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).max(1);
        Mask::from_fn(w, h, |_, _| {
            s ^= s << 13;
            s ^= s >> 7;
            s ^= s << 17;
            (s >> 32) & 1 == 1
        })
    }

    #[test]
    fn empty_mask_stays_empty() {
        assert!(skeletonize(&Mask::new(10, 10)).is_empty());
    }

    #[test]
    fn thick_horizontal_bar_thins_to_a_line() {
        let mask = filled_rect(40, 15, 5, 5, 30, 5);
        let skel = skeletonize(&mask);
        assert!(!skel.is_empty());
        // At most one pixel per column in the bar's interior.
        for x in 8..32 {
            let column = (0..15).filter(|&y| skel.get(x, y)).count();
            assert_eq!(column, 1, "column {x} has {column} skeleton pixels");
        }
        // Skeleton never leaves the original shape.
        assert!(skel.iter_set().all(|(x, y)| mask.get(x, y)));
    }

    #[test]
    fn single_pixel_lines_are_preserved() {
        let mut mask = Mask::new(20, 5);
        for x in 3..17 {
            mask.set(x, 2, true);
        }
        let skel = skeletonize(&mask);
        assert_eq!(skel, mask);
    }

    #[test]
    fn separate_blobs_stay_separate() {
        let mut mask = filled_rect(40, 20, 2, 2, 10, 10);
        for y in 4..10 {
            for x in 25..35 {
                mask.set(x, y, true);
            }
        }
        let skel = skeletonize(&mask);
        assert!(skel.iter_set().any(|(x, _)| x < 15));
        assert!(skel.iter_set().any(|(x, _)| x >= 25));
        assert!(skel.iter_set().all(|(x, _)| x < 15 || x >= 25));
        assert_eq!(components(&skel), 2);
    }

    #[test]
    fn two_by_two_blob_keeps_a_pixel() {
        let skel = skeletonize(&filled_rect(6, 6, 2, 2, 2, 2));
        assert!(!skel.is_empty());
        assert_eq!(components(&skel), 1);
    }

    #[test]
    fn two_pixel_diagonal_thins_to_one_pixel_per_row() {
        let mask = Mask::from_fn(30, 30, |x, y| (3..27).contains(&y) && (x == y || x == y + 1));
        assert_eq!(mask.count(), 48);
        let skel = skeletonize(&mask);
        for y in 3..27 {
            let row = (0..30).filter(|&x| skel.get(x, y)).count();
            assert!((1..=2).contains(&row), "row {y} has {row} skeleton pixels");
        }
        assert!(skel.count() <= 30, "{} pixels left", skel.count());
        assert_eq!(components(&skel), 1);
    }

    #[test]
    fn ring_stays_one_closed_loop() {
        let mask = annulus(40, 10.5, 14.5);
        assert_eq!(components(&mask), 1);
        assert_eq!(background_components(&mask), 2);
        let skel = skeletonize(&mask);
        assert!(skel.count() < mask.count() / 3);
        assert_eq!(components(&skel), 1);
        assert_eq!(background_components(&skel), 2);
    }

    #[test]
    fn thinning_keeps_components_and_holes() {
        for seed in 1..=8 {
            let mask = noise(24, 24, seed);
            let skel = skeletonize(&mask);
            assert!(skel.iter_set().all(|(x, y)| mask.get(x, y)));
            assert_eq!(components(&skel), components(&mask), "seed {seed}");
            assert_eq!(
                background_components(&skel),
                background_components(&mask),
                "seed {seed}"
            );
        }
    }

    #[test]
    fn thinning_is_deterministic() {
        let mask = filled_rect(30, 30, 4, 6, 17, 9);
        assert_eq!(skeletonize(&mask), skeletonize(&mask));
    }
}
