//! マンデルブロ集合エクスプローラ
//!
//! 脱出時間法による逐次描画エンジンと、キーボード操作によるビューア制御を提供する。

pub mod common;

pub use common::error::ViewerError;
