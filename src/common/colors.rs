//! カラーランプと色変換関数

/// 8bit RGB 色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// u32形式 (0xRRGGBB) に変換
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }
}

/// HSV (各成分 0.0〜1.0) を RGB (各成分 0.0〜1.0) に変換
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// 反復回数ごとの色テーブル
///
/// 色相を一周させつつ明度を 0.5 から 1.0 へ上げていく。起動時に一度だけ作る。
#[derive(Debug, Clone)]
pub struct ColorRamp {
    colors: Vec<Rgb>,
}

impl ColorRamp {
    pub fn new(max_iterations: usize) -> Self {
        let n = max_iterations as f64;
        let colors = (0..max_iterations)
            .map(|i| {
                let i = i as f64;
                let (r, g, b) = hsv_to_rgb(i / n, 1.0, 0.5 + i / (2.0 * n));
                Rgb::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
            })
            .collect();
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// 反復 `iteration` (1始まり) に割り当てられた色と、その一つ前の色
    ///
    /// 最初の反復では一つ前の色として自分自身を返す。
    pub fn band(&self, iteration: usize) -> (Rgb, Rgb) {
        let current = self.colors[iteration - 1];
        let previous = self.colors[iteration.saturating_sub(2)];
        (previous, current)
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

/// スムーズカラーリングの線形補間
///
/// `nu` は [0, 1) の小数部。`nu = 0` で `current`、`nu → 1` で `previous` に一致する。
/// 各チャンネルは切り捨てで整数化する。
pub fn blend(previous: Rgb, current: Rgb, nu: f64) -> u32 {
    let mix = |p: u8, c: u8| (nu * p as f64 + (1.0 - nu) * c as f64) as u32;
    (mix(previous.r, current.r) << 16)
        | (mix(previous.g, current.g) << 8)
        | mix(previous.b, current.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_has_one_color_per_iteration() {
        let ramp = ColorRamp::new(100);
        assert_eq!(ramp.len(), 100);
        // 色相0・明度0.5 → 暗い赤
        assert_eq!(ramp.colors()[0], Rgb::new(127, 0, 0));
        // 色相0.5・明度0.75 → シアン
        assert_eq!(ramp.colors()[50], Rgb::new(0, 191, 191));
    }

    #[test]
    fn first_band_repeats_its_own_color() {
        let ramp = ColorRamp::new(10);
        let (previous, current) = ramp.band(1);
        assert_eq!(previous, current);

        let (previous, current) = ramp.band(5);
        assert_eq!(previous, ramp.colors()[3]);
        assert_eq!(current, ramp.colors()[4]);
    }

    #[test]
    fn blend_agrees_with_band_edges() {
        let previous = Rgb::new(200, 100, 50);
        let current = Rgb::new(10, 20, 30);

        assert_eq!(blend(previous, current, 0.0), current.to_u32());

        let near_one = blend(previous, current, 1.0 - 1e-12);
        let expected_near_one = Rgb::new(199, 99, 49).to_u32();
        // 切り捨てのため 1 未満の差は下側に落ちる
        assert!(near_one == previous.to_u32() || near_one == expected_near_one);
    }

    #[test]
    fn blend_stays_within_channel_range() {
        let white = Rgb::new(255, 255, 255);
        for step in 0..100 {
            let nu = step as f64 / 100.0;
            assert_eq!(blend(white, white, nu) & !0xFFFFFF, 0);
            let c = blend(white, Rgb::new(0, 0, 0), nu);
            assert!(c <= 0xFFFFFF);
        }
    }

    #[test]
    fn hsv_grey_when_unsaturated() {
        assert_eq!(hsv_to_rgb(0.3, 0.0, 0.4), (0.4, 0.4, 0.4));
    }
}
