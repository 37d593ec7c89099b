//! エラー型

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ViewerError {
    /// 幅または高さが 0 のビューポート
    #[error("不正なサイズです: {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    /// 幅か高さが 0 以下になる複素平面上の領域
    #[error("表示領域を表現できません: x=[{x_min}, {x_max}] y=[{y_min}, {y_max}]")]
    InvalidRegion {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },

    #[error("不正な設定値です: {0}")]
    InvalidSetting(String),

    #[error("ウィンドウ操作に失敗しました: {0}")]
    Window(String),
}

/// 幅と高さがともに正であることを確認する
pub fn check_dimension(width: usize, height: usize) -> Result<(), ViewerError> {
    if width == 0 || height == 0 {
        return Err(ViewerError::InvalidDimension { width, height });
    }
    Ok(())
}
