//! マンデルブロ集合インタラクティブビューア (逐次描画版)
//!
//! 反復ごとに脱出した点だけを描き足していくので、重い描画でも途中経過が見える。
//! 描画中にキーを押すと、その場で打ち切って新しい表示で描き直す。
//!
//! 操作方法:
//!   - 矢印キー: 移動（パン）
//!   - + / = キー: 拡大
//!   - - キー: 縮小
//!   - R キー: 初期表示にリセット
//!   - Q / Escape キー: 終了

use clap::Parser;
use log::{error, info};
use mandelbrot_explorer::common::{
    config::{Cli, Settings},
    constants::IDLE_POLL_MS,
    display::FrameBuffer,
    explorer::{Explorer, Frontend},
    font::format_general,
    viewer::{Command, Direction, ViewerState},
};
use mandelbrot_explorer::ViewerError;
use minifb::{Key, KeyRepeat, ScaleMode, Window, WindowOptions};
use std::time::Duration;

const TITLE: &str = "マンデルブロ集合エクスプローラ";

/// minifb のウィンドウを表示先・入力元として使う
struct WindowFrontend {
    window: Window,
    /// 最後に確認したウィンドウサイズ
    window_size: (usize, usize),
    title_zoom: Option<f64>,
}

impl WindowFrontend {
    fn open(settings: &Settings) -> Result<Self, ViewerError> {
        let mut window = Window::new(
            TITLE,
            settings.width,
            settings.height,
            WindowOptions {
                resize: true,
                scale_mode: ScaleMode::UpperLeft,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| ViewerError::Window(e.to_string()))?;

        // 反復ごとの更新を待たせない
        window.set_target_fps(0);

        Ok(Self {
            window,
            window_size: (settings.width, settings.height),
            title_zoom: None,
        })
    }

    /// ウィンドウサイズが変わっていればリサイズコマンドを返す
    fn needs_resize(&mut self) -> Option<Command> {
        let size = self.window.get_size();
        if size == self.window_size {
            return None;
        }
        self.window_size = size;
        Some(Command::Resize {
            width: size.0,
            height: size.1,
        })
    }
}

fn key_to_command(key: Key) -> Option<Command> {
    let command = match key {
        Key::Left => Command::Pan(Direction::Left),
        Key::Right => Command::Pan(Direction::Right),
        Key::Up => Command::Pan(Direction::Up),
        Key::Down => Command::Pan(Direction::Down),
        Key::Equal | Key::NumPadPlus => Command::ZoomIn,
        Key::Minus | Key::NumPadMinus => Command::ZoomOut,
        Key::R => Command::Reset,
        Key::Escape | Key::Q => Command::Quit,
        _ => return None,
    };
    Some(command)
}

impl Frontend for WindowFrontend {
    fn present(&mut self, frame: &FrameBuffer, state: &ViewerState) -> Result<(), ViewerError> {
        // ウィンドウタイトルにズームを表示
        if self.title_zoom != Some(state.zoom()) {
            self.window
                .set_title(&format!("{} [zoom={}]", TITLE, format_general(state.zoom())));
            self.title_zoom = Some(state.zoom());
        }
        self.window
            .update_with_buffer(frame.frame(), frame.width(), frame.height())
            .map_err(|e| ViewerError::Window(e.to_string()))
    }

    fn poll(&mut self) -> Vec<Command> {
        if !self.window.is_open() {
            return vec![Command::Quit];
        }
        let mut commands: Vec<Command> = self
            .window
            .get_keys_pressed(KeyRepeat::Yes)
            .into_iter()
            .filter_map(key_to_command)
            .collect();
        commands.extend(self.needs_resize());
        commands
    }

    fn idle(&mut self) {
        std::thread::sleep(Duration::from_millis(IDLE_POLL_MS));
    }
}

fn run() -> Result<(), ViewerError> {
    let settings = Settings::try_from(Cli::parse())?;

    println!("操作方法:");
    println!("  - 矢印キー: 移動（パン）");
    println!("  - + / = キー: 拡大");
    println!("  - - キー: 縮小");
    println!("  - R キー: 初期表示にリセット");
    println!("  - Q / Escape キー: 終了");
    println!();

    info!(
        "起動: {}x{} | 最大反復: {} | 脱出半径: {} | 中心: ({}, {}i) | ズーム: {}",
        settings.width,
        settings.height,
        settings.max_iterations,
        settings.escape_radius,
        settings.center_x,
        settings.center_y,
        settings.zoom
    );

    let frontend = WindowFrontend::open(&settings)?;
    let mut explorer = Explorer::new(settings, frontend)?;
    explorer.run()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
