//! 描画ループとコマンド処理
//!
//! 1反復ごとに表示を更新し、その合間に入力をポーリングする。新しいコマンドが来たら
//! キャンセルフラグを立てて描画を打ち切り、溜まったコマンドをすべて適用してから描き直す。

use crate::common::cancel::CancelFlag;
use crate::common::colors::ColorRamp;
use crate::common::config::Settings;
use crate::common::constants::*;
use crate::common::display::FrameBuffer;
use crate::common::error::ViewerError;
use crate::common::font::format_general;
use crate::common::mandelbrot::render;
use crate::common::viewer::{Command, ViewerState};
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// 表示と入力を担当する外部コンポーネント
pub trait Frontend {
    /// 表示用フレームを画面に出す
    fn present(&mut self, frame: &FrameBuffer, state: &ViewerState) -> Result<(), ViewerError>;

    /// 溜まっている入力をコマンドとして取り出す（ブロックしない）
    fn poll(&mut self) -> Vec<Command>;

    /// 入力待ちの間に呼ばれる
    fn idle(&mut self) {}
}

/// 1回の描画の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// 全点が脱出したか反復上限に達した
    Completed { iterations: usize, escaped: usize },
    /// 新しい入力で打ち切られた
    Cancelled { iterations: usize },
}

pub struct Explorer<F: Frontend> {
    settings: Settings,
    state: ViewerState,
    surface: FrameBuffer,
    ramp: ColorRamp,
    cancel: CancelFlag,
    pending: VecDeque<Command>,
    frontend: F,
}

impl<F: Frontend> Explorer<F> {
    pub fn new(settings: Settings, frontend: F) -> Result<Self, ViewerError> {
        let settings = settings.validate()?;
        let state = ViewerState::new(
            settings.center_x,
            settings.center_y,
            settings.zoom,
            settings.width,
            settings.height,
        )?;
        Ok(Self {
            surface: FrameBuffer::new(settings.width, settings.height)?,
            ramp: ColorRamp::new(settings.max_iterations),
            cancel: CancelFlag::new(),
            pending: VecDeque::new(),
            settings,
            state,
            frontend,
        })
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn surface(&self) -> &FrameBuffer {
        &self.surface
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    /// 別スレッドから描画を止めるためのハンドル
    pub fn cancel_handle(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// 終了コマンドが来るまで描画とコマンド処理を繰り返す
    pub fn run(&mut self) -> Result<(), ViewerError> {
        self.render()?;
        loop {
            let Some(command) = self.next_command()? else {
                continue;
            };
            if command == Command::Quit {
                info!("終了します");
                return Ok(());
            }
            let mut redraw = self.apply(command);
            // 溜まっているコマンドはまとめて反映し、途中の表示は描かない
            while let Some(&next) = self.pending.front() {
                if next == Command::Quit {
                    break;
                }
                self.pending.pop_front();
                redraw |= self.apply(next);
            }
            if redraw && self.pending.is_empty() {
                self.render()?;
            }
        }
    }

    fn next_command(&mut self) -> Result<Option<Command>, ViewerError> {
        if let Some(command) = self.pending.pop_front() {
            return Ok(Some(command));
        }
        self.frontend.present(&self.surface, &self.state)?;
        self.pending.extend(self.frontend.poll());
        if self.pending.is_empty() {
            self.frontend.idle();
        }
        Ok(self.pending.pop_front())
    }

    /// コマンドを状態に反映する。再描画が必要なら true。
    pub fn apply(&mut self, command: Command) -> bool {
        self.cancel.set();
        debug!("コマンド: {:?}", command);
        let result = match command {
            Command::Pan(direction) => self.state.pan(direction),
            Command::ZoomIn => self.state.zoom_in(),
            Command::ZoomOut => self.state.zoom_out(),
            Command::Resize { width, height } => {
                if self.state.viewport() == (width, height) {
                    return false;
                }
                self.resize(width, height)
            }
            Command::Reset => self.state.reset(
                self.settings.center_x,
                self.settings.center_y,
                self.settings.zoom,
            ),
            Command::Quit => return false,
        };
        match result {
            Ok(()) => true,
            Err(e @ ViewerError::InvalidRegion { .. }) => {
                info!("倍精度の限界のため {:?} を無視しました: {}", command, e);
                false
            }
            Err(e) => {
                warn!("{:?} を無視しました: {}", command, e);
                false
            }
        }
    }

    fn resize(&mut self, width: usize, height: usize) -> Result<(), ViewerError> {
        // 先に検証してから表示バッファを作り直す
        let mut state = self.state;
        state.resize(width, height)?;
        self.surface.resize(width, height)?;
        self.state = state;
        Ok(())
    }

    /// 現在の状態で1フレーム描画する
    ///
    /// 反復ごとに表示を更新し、途中で入力があれば打ち切る。
    pub fn render(&mut self) -> Result<RenderOutcome, ViewerError> {
        self.cancel.clear();
        let start = Instant::now();
        let (width, height) = self.state.viewport();
        let engine = render(
            width,
            height,
            self.state.region()?,
            &self.ramp,
            self.settings.escape_radius,
        )?;

        self.surface.clear(BACKGROUND_COLOR);
        let mut iterations = 0;
        let mut escaped = 0;

        for update in engine {
            iterations = update.iteration;
            escaped += update.pixels.len();
            self.surface.apply_update(&update);
            draw_overlay(&mut self.surface, &self.state, start.elapsed(), iterations);
            self.frontend.present(&self.surface, &self.state)?;

            let commands = self.frontend.poll();
            self.pending.extend(commands);
            // 未処理のコマンドがあればこの表示はもう古い
            if !self.pending.is_empty() {
                self.cancel.set();
            }
            if self.cancel.is_set() {
                debug!("反復 {} で描画を打ち切りました", iterations);
                return Ok(RenderOutcome::Cancelled { iterations });
            }
        }

        // 1点も脱出しなかった場合も文字は出す
        draw_overlay(&mut self.surface, &self.state, start.elapsed(), iterations);
        let (cx, cy) = self.state.center();
        info!(
            "再描画: {:.2?} | 反復: {} | 中心: ({}, {}i) | ズーム: {}",
            start.elapsed(),
            iterations,
            format_general(cx),
            format_general(cy),
            format_general(self.state.zoom())
        );
        Ok(RenderOutcome::Completed {
            iterations,
            escaped,
        })
    }
}

/// 座標・ズーム・経過時間・反復番号を重ねて描く
fn draw_overlay(
    surface: &mut FrameBuffer,
    state: &ViewerState,
    elapsed: Duration,
    iteration: usize,
) {
    let (cx, cy) = state.center();
    surface.compose();
    surface.draw_text(
        OVERLAY_MARGIN_X,
        OVERLAY_TOP_Y,
        &format!(
            "x={} y={} zoom={}",
            format_general(cx),
            format_general(cy),
            format_general(state.zoom())
        ),
        TEXT_COLOR,
    );
    surface.draw_text(
        OVERLAY_MARGIN_X,
        surface.height().saturating_sub(OVERLAY_BOTTOM_OFFSET),
        &format!("render={:.3}s iteration={}", elapsed.as_secs_f64(), iteration),
        TEXT_COLOR,
    );
}
