//! ページの共有状態

use std::sync::Arc;
use std::sync::atomic::{
    AtomicBool,
    AtomicU64,
    Ordering,
};

use tokio::sync::{
    Mutex,
    MutexGuard,
};

use crate::locale::LocaleDataset;

/// Sequence number handed to one language load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(pub u64);

/// ページの共有状態
///
/// 読み込み済みのロケールデータと、言語切替リクエストの通し番号を保持します。
/// 後から発行されたリクエストが常に優先され、古いリクエストの結果は破棄されます。
#[derive(Clone)]
pub struct PageState {
    /// 最後に適用されたロケールデータ（未読み込みなら `None`）
    dataset: Arc<Mutex<Option<LocaleDataset>>>,
    /// 最後に発行されたリクエスト番号
    latest_request: Arc<AtomicU64>,
    /// 診断フォームが接続済みか
    form_attached: Arc<AtomicBool>,
}

impl PageState {
    /// 新しい `PageState` を作成
    #[must_use]
    pub fn new() -> Self {
        Self {
            dataset: Arc::new(Mutex::new(None)),
            latest_request: Arc::new(AtomicU64::new(0)),
            form_attached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 新しいリクエスト番号を発行
    pub fn begin_request(&self) -> RequestTicket {
        RequestTicket(self.latest_request.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// `ticket` が最新のリクエストか
    #[must_use]
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest_request.load(Ordering::SeqCst) == ticket.0
    }

    /// ロケールデータのロックを取得
    pub async fn dataset(&self) -> MutexGuard<'_, Option<LocaleDataset>> {
        self.dataset.lock().await
    }

    pub fn mark_form_attached(&self) {
        self.form_attached.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_form_attached(&self) -> bool {
        self.form_attached.load(Ordering::SeqCst)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageState")
            .field("dataset", &"<Option<LocaleDataset>>")
            .field("latest_request", &self.latest_request.load(Ordering::SeqCst))
            .field("form_attached", &self.is_form_attached())
            .finish()
    }
}
