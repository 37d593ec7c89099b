//! ビューアの状態とコマンド

use crate::common::constants::PAN_DIVISOR;
use crate::common::error::{check_dimension, ViewerError};
use crate::common::mandelbrot::Region;

/// パンの方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// 入力から得られる抽象コマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pan(Direction),
    ZoomIn,
    ZoomOut,
    Resize { width: usize, height: usize },
    Reset,
    Quit,
}

/// 表示中の中心・ズーム・ビューポート
///
/// `zoom` は表示領域の高さの半分（複素平面上の長さ）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerState {
    center_x: f64,
    center_y: f64,
    zoom: f64,
    width: usize,
    height: usize,
}

impl ViewerState {
    pub fn new(
        center_x: f64,
        center_y: f64,
        zoom: f64,
        width: usize,
        height: usize,
    ) -> Result<Self, ViewerError> {
        check_dimension(width, height)?;
        let state = Self {
            center_x,
            center_y,
            zoom,
            width,
            height,
        };
        state.region()?;
        Ok(state)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn viewport(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// 現在の表示領域
    ///
    /// 状態を変える操作はすべてこの領域が作れることを確認してから反映するので、
    /// 構築済みの状態では失敗しない。
    pub fn region(&self) -> Result<Region, ViewerError> {
        let half_width = self.zoom * self.aspect_ratio();
        Region::new(
            self.center_x - half_width,
            self.center_x + half_width,
            self.center_y - self.zoom,
            self.center_y + self.zoom,
        )
    }

    /// 変更後の状態で領域が作れるときだけ反映する
    fn commit(&mut self, next: ViewerState) -> Result<(), ViewerError> {
        next.region()?;
        *self = next;
        Ok(())
    }

    /// ズームに比例した量だけ移動（画面の上が y の小さい側）
    pub fn pan(&mut self, direction: Direction) -> Result<(), ViewerError> {
        let step = self.zoom / PAN_DIVISOR;
        let mut next = *self;
        match direction {
            Direction::Left => next.center_x -= step * self.aspect_ratio(),
            Direction::Right => next.center_x += step * self.aspect_ratio(),
            Direction::Up => next.center_y -= step,
            Direction::Down => next.center_y += step,
        }
        self.commit(next)
    }

    /// 倍精度で幅が潰れる手前で拡大を止める
    pub fn zoom_in(&mut self) -> Result<(), ViewerError> {
        self.commit(Self {
            zoom: self.zoom / 2.0,
            ..*self
        })
    }

    pub fn zoom_out(&mut self) -> Result<(), ViewerError> {
        self.commit(Self {
            zoom: self.zoom * 2.0,
            ..*self
        })
    }

    /// ビューポートを変更する。不正なサイズなら状態は変えない。
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), ViewerError> {
        check_dimension(width, height)?;
        self.commit(Self {
            width,
            height,
            ..*self
        })
    }

    /// 中心とズームを戻す（ビューポートはそのまま）
    pub fn reset(&mut self, center_x: f64, center_y: f64, zoom: f64) -> Result<(), ViewerError> {
        self.commit(Self {
            center_x,
            center_y,
            zoom,
            ..*self
        })
    }
}
