//! SimulatedWork - 計算の前にランダムな待ち時間を入れる handler ラッパー
//!
//! worker ごとに処理時間がばらつくので、完了順が submit 順と一致しないことを
//! 目で見て確認できます。

use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::app::WorkDelay;
use crate::domain::{FailureReason, Task};
use crate::ports::TaskHandler;

pub struct SimulatedWork<H> {
    inner: H,
    delay: WorkDelay,
}

impl<H: TaskHandler> SimulatedWork<H> {
    pub fn new(inner: H, delay: WorkDelay) -> Self {
        Self { inner, delay }
    }

    fn pick_delay(&self) -> Duration {
        let (min, max) = self.delay.bounds();
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

impl<H: TaskHandler> TaskHandler for SimulatedWork<H> {
    fn handle(&self, task: &Task) -> Result<i64, FailureReason> {
        thread::sleep(self.pick_delay());
        self.inner.handle(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Operation, TaskId};
    use crate::impls::ArithmeticHandler;
    use chrono::Utc;
    use std::time::Instant;
    use ulid::Ulid;

    #[test]
    fn delays_then_delegates() {
        let handler = SimulatedWork::new(
            ArithmeticHandler,
            WorkDelay {
                min_ms: 20,
                max_ms: 40,
            },
        );
        let task = Task::new(
            TaskId::from_ulid(Ulid::new()),
            Operation::Add,
            1,
            2,
            Utc::now(),
        );

        let start = Instant::now();
        assert_eq!(handler.handle(&task), Ok(3));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn picked_delay_stays_in_range() {
        let handler = SimulatedWork::new(
            ArithmeticHandler,
            WorkDelay {
                min_ms: 5,
                max_ms: 9,
            },
        );
        for _ in 0..100 {
            let d = handler.pick_delay();
            assert!(d >= Duration::from_millis(5) && d <= Duration::from_millis(9));
        }
    }
}
