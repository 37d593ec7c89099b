//! 表示用バッファ
//!
//! フラクタル部分 (`grid`) と、そこに文字を重ねた表示用フレーム (`frame`) を分けて持つ。
//! 疎な更新は `grid` にだけ書き込むので、オーバーレイ文字が画像に焼き付かない。

use crate::common::constants::{BACKGROUND_COLOR, TEXT_SCALE};
use crate::common::error::{check_dimension, ViewerError};
use crate::common::font::draw_text;
use crate::common::mandelbrot::PixelGridUpdate;

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    grid: Vec<u32>,
    frame: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, ViewerError> {
        check_dimension(width, height)?;
        Ok(Self {
            width,
            height,
            grid: vec![BACKGROUND_COLOR; width * height],
            frame: vec![BACKGROUND_COLOR; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// バッファを作り直す（内容は背景色に戻る）
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), ViewerError> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    pub fn clear(&mut self, color: u32) {
        self.grid.fill(color);
        self.frame.fill(color);
    }

    /// 1反復分の脱出ピクセルを書き込む
    pub fn apply_update(&mut self, update: &PixelGridUpdate) {
        for p in &update.pixels {
            if p.x < self.width && p.y < self.height {
                self.grid[p.y * self.width + p.x] = p.color;
            }
        }
    }

    /// 現在のフラクタル画像を表示用フレームへ転送
    pub fn compose(&mut self) {
        self.frame.copy_from_slice(&self.grid);
    }

    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, color: u32) {
        draw_text(
            &mut self.frame,
            self.width,
            self.height,
            x,
            y,
            text,
            color,
            TEXT_SCALE,
        );
    }

    /// フラクタル画像（文字なし）
    pub fn grid(&self) -> &[u32] {
        &self.grid
    }

    /// 表示用フレーム（文字あり）
    pub fn frame(&self) -> &[u32] {
        &self.frame
    }
}
