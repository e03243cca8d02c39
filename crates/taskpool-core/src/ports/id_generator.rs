//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（デフォルト）
//! - **SequentialIdGenerator**: 単調増加（テスト・再現可能なデモ用）

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::TaskId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は submit ごとに新しい TaskId を割り当てる
///
/// dispatcher は複数スレッドから submit されるので `Send + Sync` を要求します。
pub trait IdGenerator: Send + Sync {
    fn generate_task_id(&self) -> TaskId;
}

/// UlidGenerator は Clock を使って現在時刻ベースの ULID を生成
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_task_id(&self) -> TaskId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        TaskId::from(ulid)
    }
}

/// Hands out ids 1, 2, 3, ... (timestamp part zero, counter in the random part).
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The id this generator hands out as its `n`-th value when started at 1.
    pub fn id_for(n: u64) -> TaskId {
        TaskId::from(Ulid::from_parts(0, u128::from(n)))
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_task_id(&self) -> TaskId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        Self::id_for(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn ulid_generator_generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);

        let id1 = id_gen.generate_task_id();
        let id2 = id_gen.generate_task_id();
        let id3 = id_gen.generate_task_id();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn ulid_generator_with_fixed_clock_shares_timestamp() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let id1 = id_gen.generate_task_id();
        let id2 = id_gen.generate_task_id();

        // ランダム部分があるので ID は異なるが、timestamp 部分は同じ
        assert_ne!(id1, id2);
        assert_eq!(id1.as_ulid().timestamp_ms(), id2.as_ulid().timestamp_ms());
        assert_eq!(
            id1.as_ulid().timestamp_ms(),
            fixed_time.timestamp_millis() as u64
        );
    }

    #[test]
    fn sequential_generator_counts_up() {
        let id_gen = SequentialIdGenerator::new();

        let ids: Vec<TaskId> = (0..3).map(|_| id_gen.generate_task_id()).collect();

        assert_eq!(ids[0], SequentialIdGenerator::id_for(1));
        assert_eq!(ids[1], SequentialIdGenerator::id_for(2));
        assert_eq!(ids[2], SequentialIdGenerator::id_for(3));
        assert!(ids[0] < ids[1] && ids[1] < ids[2]);
    }
}
