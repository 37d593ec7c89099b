//! 共通定数

/// 初期ウィンドウの幅
pub const DEFAULT_WIDTH: usize = 800;
/// 初期ウィンドウの高さ
pub const DEFAULT_HEIGHT: usize = 600;

/// 最大反復回数（カラーランプの長さ）
pub const MAX_ITERATIONS: usize = 100;

/// 脱出半径
///
/// 2.0 ではなく 256.0 を使うのはスムーズカラーリングの補間精度のため
pub const ESCAPE_RADIUS: f64 = 256.0;

/// 初期表示の中心座標
pub const INITIAL_CENTER_X: f64 = -0.75;
pub const INITIAL_CENTER_Y: f64 = 0.0;

/// 初期ズーム（表示領域の高さの半分）
pub const INITIAL_ZOOM: f64 = 1.0;

/// パン1回あたりの移動量 = zoom / PAN_DIVISOR
pub const PAN_DIVISOR: f64 = 8.0;

/// 集合内部（未脱出）の背景色
pub const BACKGROUND_COLOR: u32 = 0x000000;

/// オーバーレイ文字の色
pub const TEXT_COLOR: u32 = 0xFFFFFF;
/// オーバーレイ文字の拡大率
pub const TEXT_SCALE: usize = 2;
/// オーバーレイの左余白
pub const OVERLAY_MARGIN_X: usize = 12;
/// 上段テキストの y 座標
pub const OVERLAY_TOP_Y: usize = 8;
/// 下段テキストの画面下端からの距離
pub const OVERLAY_BOTTOM_OFFSET: usize = 32;

/// 待機中のポーリング間隔（ミリ秒）
pub const IDLE_POLL_MS: u64 = 16;
