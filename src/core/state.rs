use tokio::sync::watch;

/// 保存最新值的狀態容器，訂閱者一訂閱就能看到目前的值
///
/// 所有寫入都是同步的：`set`/`update` 回傳前，所有 `Receiver` 都已能看到新值。
#[derive(Debug)]
pub struct StateCell<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    pub fn new(initial: T) -> Self {
        // 沒有任何 receiver 時 watch::Sender 仍可寫入（send_replace / send_modify）
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// 以閉包讀取目前的值，避免整份複製
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.sender.borrow())
    }

    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_sees_current_value() {
        let cell = StateCell::new(vec![1, 2, 3]);
        let rx = cell.subscribe();
        assert_eq!(*rx.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_set_and_update_without_subscribers() {
        let cell = StateCell::new(String::from("reddit-r-all"));
        cell.set("bbc-news".to_string());
        assert_eq!(cell.get(), "bbc-news");

        cell.update(|s| s.push_str("-uk"));
        assert_eq!(cell.get(), "bbc-news-uk");
        assert_eq!(cell.with(|s| s.len()), 11);
    }

    #[tokio::test]
    async fn test_subscriber_is_notified_of_changes() {
        let cell = StateCell::new(0u32);
        let mut rx = cell.subscribe();

        cell.set(7);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 7);
        assert!(!rx.has_changed().unwrap());
    }
}
