//! 描画キャンセル用フラグ

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 描画中に新しい入力が来たことを知らせるフラグ
///
/// セッション中に1つだけ作って使い回す。複製しても同じフラグを共有する。
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_set());

        handle.set();
        assert!(flag.is_set());

        flag.clear();
        assert!(!handle.is_set());
    }

    #[test]
    fn can_be_set_from_another_thread() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        std::thread::spawn(move || handle.set())
            .join()
            .unwrap();
        assert!(flag.is_set());
    }
}
