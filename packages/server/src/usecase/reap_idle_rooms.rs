//! UseCase: アイドルルーム回収処理
//!
//! ルームは最初の参加で暗黙に生成され、退出では削除されない。
//! 参加者ゼロのまま猶予期間を過ぎたルームをこのユースケースが回収する。
//! Leave に畳み込まず、独立したポリシーとして実装している。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ReapIdleRoomsUseCase::execute() メソッド
//! - 猶予期間経過後の空ルームの削除と、それ以外のルームの保持
//!
//! ### なぜこのテストが必要か
//! - ルームの削除はこのユースケースだけが行う唯一の経路
//! - 再参加されたルームが誤って回収されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：猶予期間を過ぎた空ルームの回収
//! - エッジケース：猶予期間内の空ルーム、参加者のいるルーム、再参加

use std::sync::Arc;

use chrono::Duration;
use dojo_shared::time::Clock;

use crate::domain::{RoomId, RoomRepository, Timestamp};

/// Sweep 間隔のデフォルト（秒）
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// 回収までの猶予期間のデフォルト（秒）
pub const DEFAULT_GRACE_SECS: i64 = 300;

/// アイドルルーム回収のユースケース
pub struct ReapIdleRoomsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// Clock（現在時刻の抽象化、テスト時は FixedClock を注入）
    clock: Arc<dyn Clock>,
    /// 空ルームを回収するまでの猶予期間
    grace: Duration,
}

impl ReapIdleRoomsUseCase {
    /// 新しい ReapIdleRoomsUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>, grace: Duration) -> Self {
        Self {
            repository,
            clock,
            grace,
        }
    }

    /// アイドルルーム回収を実行
    ///
    /// # Returns
    ///
    /// 回収されたルーム ID のリスト
    pub async fn execute(&self) -> Vec<RoomId> {
        let cutoff = Timestamp::new(self.clock.now_jst_millis() - self.grace.num_milliseconds());
        let removed = self.repository.remove_rooms_idle_since(cutoff).await;
        for room_id in &removed {
            tracing::info!("Reaped idle room '{}'", room_id.as_str());
        }
        removed
    }
}
