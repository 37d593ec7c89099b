//! マンデルブロ集合計算（脱出時間法・逐次更新版）
//!
//! 反復ごとに「まだ脱出していない点」だけを計算し、その反復で脱出した点の色を
//! 疎な更新として返す。

use crate::common::colors::{blend, ColorRamp};
use crate::common::error::{check_dimension, ViewerError};
use num_complex::Complex64;
use std::iter::FusedIterator;

/// 複素平面上の矩形領域
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Region {
    /// 幅と高さが正の有限な領域だけを受け付ける
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, ViewerError> {
        let finite = [x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite());
        if !finite || x_max <= x_min || y_max <= y_min {
            return Err(ViewerError::InvalidRegion {
                x_min,
                x_max,
                y_min,
                y_max,
            });
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// 両端を含む等間隔の n 点
fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![min];
    }
    let step = (max - min) / (n - 1) as f64;
    (0..n).map(|i| min + step * i as f64).collect()
}

/// 1反復で脱出した1ピクセル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapedPixel {
    pub x: usize,
    pub y: usize,
    pub color: u32,
}

/// 1反復分の描画更新
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGridUpdate {
    /// 反復番号（1始まり）
    pub iteration: usize,
    /// この反復で脱出したピクセル
    pub pixels: Vec<EscapedPixel>,
    /// 反復後に残っている点の数
    pub remaining: usize,
}

/// 未脱出の点
#[derive(Debug, Clone, Copy)]
struct Point {
    x: usize,
    y: usize,
    z: Complex64,
    c: Complex64,
}

/// 脱出時間法のイテレータ
///
/// `next()` を呼ぶたびに1反復進める。全点が脱出するか反復上限に達すると終了し、
/// 再開はできない。
pub struct EscapeTime<'a> {
    ramp: &'a ColorRamp,
    escape_radius: f64,
    points: Vec<Point>,
    iteration: usize,
}

impl<'a> EscapeTime<'a> {
    pub fn new(
        width: usize,
        height: usize,
        region: Region,
        ramp: &'a ColorRamp,
        escape_radius: f64,
    ) -> Result<Self, ViewerError> {
        check_dimension(width, height)?;

        let xs = linspace(region.x_min, region.x_max, width);
        let ys = linspace(region.y_min, region.y_max, height);

        let mut points = Vec::with_capacity(width * height);
        for (y, &cy) in ys.iter().enumerate() {
            for (x, &cx) in xs.iter().enumerate() {
                let c = Complex64::new(cx, cy);
                points.push(Point { x, y, z: c, c });
            }
        }

        Ok(Self {
            ramp,
            escape_radius,
            points,
            iteration: 0,
        })
    }

    /// 現在の未脱出点の数
    pub fn remaining(&self) -> usize {
        self.points.len()
    }

    /// 最後に完了した反復番号
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    fn is_finished(&self) -> bool {
        self.points.is_empty() || self.iteration >= self.ramp.len()
    }
}

impl Iterator for EscapeTime<'_> {
    type Item = PixelGridUpdate;

    fn next(&mut self) -> Option<PixelGridUpdate> {
        if self.is_finished() {
            return None;
        }
        self.iteration += 1;

        let (previous, current) = self.ramp.band(self.iteration);
        let radius = self.escape_radius;
        let mut escaped = Vec::new();

        self.points.retain_mut(|p| {
            p.z = p.z * p.z + p.c;
            let norm = p.z.norm();
            // 境界上の点は未脱出として扱う
            if norm > radius {
                let nu = norm.log2().log2().rem_euclid(1.0);
                escaped.push(EscapedPixel {
                    x: p.x,
                    y: p.y,
                    color: blend(previous, current, nu),
                });
                false
            } else {
                true
            }
        });

        Some(PixelGridUpdate {
            iteration: self.iteration,
            pixels: escaped,
            remaining: self.points.len(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_finished() {
            (0, Some(0))
        } else {
            (1, Some(self.ramp.len() - self.iteration))
        }
    }
}

impl FusedIterator for EscapeTime<'_> {}

/// 指定領域を描画する更新列を作る
pub fn render(
    width: usize,
    height: usize,
    region: Region,
    ramp: &ColorRamp,
    escape_radius: f64,
) -> Result<EscapeTime<'_>, ViewerError> {
    EscapeTime::new(width, height, region, ramp, escape_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::{BACKGROUND_COLOR, ESCAPE_RADIUS};
    use std::collections::HashMap;

    fn square() -> Region {
        Region::new(-2.0, 2.0, -2.0, 2.0).unwrap()
    }

    /// 各ピクセルの脱出反復を集める
    fn escape_iterations(
        width: usize,
        height: usize,
        region: Region,
        max_iterations: usize,
        radius: f64,
    ) -> HashMap<(usize, usize), usize> {
        let ramp = ColorRamp::new(max_iterations);
        let mut result = HashMap::new();
        for update in render(width, height, region, &ramp, radius).unwrap() {
            for p in update.pixels {
                assert!(result.insert((p.x, p.y), update.iteration).is_none());
            }
        }
        result
    }

    fn rasterize(width: usize, height: usize, region: Region) -> Vec<u32> {
        let ramp = ColorRamp::new(100);
        let mut grid = vec![BACKGROUND_COLOR; width * height];
        for update in render(width, height, region, &ramp, ESCAPE_RADIUS).unwrap() {
            for p in update.pixels {
                grid[p.y * width + p.x] = p.color;
            }
        }
        grid
    }

    #[test]
    fn rejects_empty_grid() {
        let ramp = ColorRamp::new(10);
        assert_eq!(
            render(0, 4, square(), &ramp, ESCAPE_RADIUS).err(),
            Some(ViewerError::InvalidDimension { width: 0, height: 4 })
        );
        assert!(render(4, 0, square(), &ramp, ESCAPE_RADIUS).is_err());
    }

    #[test]
    fn region_rejects_collapsed_or_infinite_bounds() {
        assert!(Region::new(0.75, 0.75, -1.0, 1.0).is_err());
        assert!(Region::new(-1.0, 1.0, 0.5, 0.25).is_err());
        assert!(Region::new(f64::NEG_INFINITY, f64::INFINITY, -1.0, 1.0).is_err());
        assert!(Region::new(-1.0, 1.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn linspace_includes_both_ends() {
        assert_eq!(linspace(-2.0, 2.0, 5), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(linspace(3.0, 4.0, 1), vec![3.0]);
    }

    #[test]
    fn four_by_four_scenario() {
        let escaped = escape_iterations(4, 4, square(), 10, ESCAPE_RADIUS);

        // 四隅 (c = ±2±2i) は3反復目に脱出する
        for corner in [(0, 0), (3, 0), (0, 3), (3, 3)] {
            assert_eq!(escaped[&corner], 3, "corner {:?}", corner);
        }
        // 原点に近い中央 2x2 が最も遅く脱出する
        let latest_edge = (0..4)
            .flat_map(|x| (0..4).map(move |y| (x, y)))
            .filter(|&(x, y)| x == 0 || x == 3 || y == 0 || y == 3)
            .map(|p| escaped[&p])
            .max()
            .unwrap();
        for center in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            assert!(escaped[&center] > latest_edge);
        }
    }

    #[test]
    fn corners_escape_first_with_classical_radius() {
        let escaped = escape_iterations(4, 4, square(), 10, 2.0);
        for corner in [(0, 0), (3, 0), (0, 3), (3, 3)] {
            assert_eq!(escaped[&corner], 1);
        }
    }

    #[test]
    fn origin_never_escapes() {
        // 5x5 の中央は c = 0、その周りは c = -1, ±i、左端中央は c = -2
        let escaped = escape_iterations(5, 5, square(), 100, ESCAPE_RADIUS);
        for inside in [(2, 2), (1, 2), (2, 1), (2, 3), (0, 2)] {
            assert!(!escaped.contains_key(&inside), "{:?} escaped", inside);
        }
        // c = 1 は発散する
        assert!(escaped.contains_key(&(3, 2)));
        assert_eq!(escaped.len(), 25 - 5);
    }

    #[test]
    fn working_set_shrinks_monotonically() {
        let ramp = ColorRamp::new(100);
        let region = Region::new(-2.5, 1.0, -1.5, 1.5).unwrap();
        let mut engine = render(64, 48, region, &ramp, ESCAPE_RADIUS).unwrap();
        let mut previous = engine.remaining();
        assert_eq!(previous, 64 * 48);

        for update in engine.by_ref() {
            assert_eq!(previous - update.pixels.len(), update.remaining);
            assert!(update.remaining <= previous);
            previous = update.remaining;
        }
        assert!(engine.iteration() <= 100);
        assert!(engine.next().is_none());
    }

    #[test]
    fn far_points_empty_the_working_set() {
        // |c| > 2 の点だけの領域は途中で打ち切られる
        let ramp = ColorRamp::new(100);
        let region = Region::new(3.0, 5.0, 3.0, 5.0).unwrap();
        let updates: Vec<_> = render(16, 16, region, &ramp, ESCAPE_RADIUS)
            .unwrap()
            .collect();
        assert!(updates.len() < 100);
        assert_eq!(updates.last().unwrap().remaining, 0);
        let total: usize = updates.iter().map(|u| u.pixels.len()).sum();
        assert_eq!(total, 256);
    }

    #[test]
    fn rendering_is_deterministic() {
        let region = Region::new(-0.8, -0.7, 0.05, 0.15).unwrap();
        assert_eq!(rasterize(40, 30, region), rasterize(40, 30, region));
    }

    #[test]
    fn updates_stay_inside_the_grid() {
        let ramp = ColorRamp::new(50);
        for update in render(7, 3, square(), &ramp, ESCAPE_RADIUS).unwrap() {
            for p in update.pixels {
                assert!(p.x < 7 && p.y < 3);
                assert!(p.color <= 0xFFFFFF);
            }
        }
    }

    #[test]
    fn budget_bounds_the_sequence() {
        let ramp = ColorRamp::new(5);
        let region = Region::new(-0.1, 0.1, -0.1, 0.1).unwrap();
        let engine = render(3, 3, region, &ramp, ESCAPE_RADIUS).unwrap();
        assert_eq!(engine.size_hint(), (1, Some(5)));
        let updates: Vec<_> = engine.collect();
        assert_eq!(updates.len(), 5);
        assert!(updates.iter().all(|u| u.pixels.is_empty()));
        assert_eq!(updates.last().unwrap().remaining, 9);
    }
}
