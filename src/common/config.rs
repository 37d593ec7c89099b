//! 起動設定（コマンドライン引数）

use crate::common::constants::*;
use crate::common::error::{check_dimension, ViewerError};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "mandelbrot-explorer", version, about = "マンデルブロ集合エクスプローラ")]
pub struct Cli {
    /// ウィンドウの幅（ピクセル）
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// ウィンドウの高さ（ピクセル）
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// 最大反復回数
    #[arg(long, default_value_t = MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// 脱出半径
    #[arg(long, default_value_t = ESCAPE_RADIUS)]
    pub escape_radius: f64,

    /// 初期表示の中心（実部）
    #[arg(long, default_value_t = INITIAL_CENTER_X, allow_hyphen_values = true)]
    pub center_x: f64,

    /// 初期表示の中心（虚部）
    #[arg(long, default_value_t = INITIAL_CENTER_Y, allow_hyphen_values = true)]
    pub center_y: f64,

    /// 初期ズーム（表示領域の高さの半分）
    #[arg(long, default_value_t = INITIAL_ZOOM, allow_hyphen_values = true)]
    pub zoom: f64,
}

/// 検証済みの設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub width: usize,
    pub height: usize,
    pub max_iterations: usize,
    pub escape_radius: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_iterations: MAX_ITERATIONS,
            escape_radius: ESCAPE_RADIUS,
            center_x: INITIAL_CENTER_X,
            center_y: INITIAL_CENTER_Y,
            zoom: INITIAL_ZOOM,
        }
    }
}

impl Settings {
    pub fn validate(self) -> Result<Self, ViewerError> {
        check_dimension(self.width, self.height)?;
        if self.max_iterations == 0 {
            return Err(ViewerError::InvalidSetting(
                "max-iterations は 1 以上が必要です".into(),
            ));
        }
        // log2(log2(|z|)) を定義域内に保つ
        if !self.escape_radius.is_finite() || self.escape_radius <= 1.0 {
            return Err(ViewerError::InvalidSetting(format!(
                "escape-radius は 1 より大きい有限値が必要です: {}",
                self.escape_radius
            )));
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(ViewerError::InvalidSetting(format!(
                "zoom は正の有限値が必要です: {}",
                self.zoom
            )));
        }
        if !self.center_x.is_finite() || !self.center_y.is_finite() {
            return Err(ViewerError::InvalidSetting("中心座標が有限ではありません".into()));
        }
        Ok(self)
    }
}

impl TryFrom<Cli> for Settings {
    type Error = ViewerError;

    fn try_from(cli: Cli) -> Result<Self, ViewerError> {
        Settings {
            width: cli.width,
            height: cli.height,
            max_iterations: cli.max_iterations,
            escape_radius: cli.escape_radius,
            center_x: cli.center_x,
            center_y: cli.center_y,
            zoom: cli.zoom,
        }
        .validate()
    }
}
