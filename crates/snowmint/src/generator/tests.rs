use crate::{
    AtomicSnowflakeGenerator, BasicSnowflakeGenerator, Error, IdGenStatus, LockSnowflakeGenerator,
    RandSource, SnowflakeGenerator, SnowflakeId, ThreadRandom, TimeSource, WallClock,
};
use core::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::scope;

struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

/// A clock that replays a scripted sequence of readings; the cursor is
/// shared so a test can step time forward mid-run.
#[derive(Clone)]
struct SharedStepTime {
    clock: Rc<StepTime>,
}

struct StepTime {
    values: Vec<u64>,
    index: Cell<usize>,
}

impl SharedStepTime {
    fn new(values: Vec<u64>) -> Self {
        Self {
            clock: Rc::new(StepTime {
                values,
                index: Cell::new(0),
            }),
        }
    }

    fn step_to(&self, index: usize) {
        self.clock.index.set(index);
    }
}

impl TimeSource for SharedStepTime {
    fn current_millis(&self) -> u64 {
        self.clock.values[self.clock.index.get()]
    }
}

/// Always returns the same entropy, pinning the datacenter/worker draw.
struct FixedRand {
    value: u64,
}

impl RandSource for FixedRand {
    fn rand(&self) -> u64 {
        self.value
    }
}

/// Replays a scripted sequence of draws, repeating the last one.
struct ScriptedRand {
    values: Vec<u64>,
    index: Cell<usize>,
}

impl ScriptedRand {
    fn new(values: Vec<u64>) -> Self {
        Self {
            values,
            index: Cell::new(0),
        }
    }
}

impl RandSource for ScriptedRand {
    fn rand(&self) -> u64 {
        let i = self.index.get();
        self.index.set((i + 1).min(self.values.len() - 1));
        self.values[i]
    }
}

trait IdGenStatusExt {
    fn unwrap_ready(self) -> SnowflakeId;
    fn unwrap_pending(self) -> u64;
}

impl IdGenStatusExt for IdGenStatus {
    fn unwrap_ready(self) -> SnowflakeId {
        match self {
            Self::Ready { id } => id,
            Self::Pending { yield_for } => {
                panic!("unexpected pending (yield for: {yield_for})")
            }
        }
    }

    fn unwrap_pending(self) -> u64 {
        match self {
            Self::Ready { id } => panic!("unexpected ready ({id})"),
            Self::Pending { yield_for } => yield_for,
        }
    }
}

fn run_sequence_increments_within_same_tick<G: SnowflakeGenerator>(generator: &G) {
    let id1 = generator.try_poll_id().unwrap().unwrap_ready();
    let id2 = generator.try_poll_id().unwrap().unwrap_ready();
    let id3 = generator.try_poll_id().unwrap().unwrap_ready();

    assert_eq!(id1.timestamp(), 42);
    assert_eq!(id2.timestamp(), 42);
    assert_eq!(id3.timestamp(), 42);
    assert_eq!(id1.sequence(), 0);
    assert_eq!(id2.sequence(), 1);
    assert_eq!(id3.sequence(), 2);
    // With the random draw held fixed, raw values sort strictly.
    assert!(id1 < id2 && id2 < id3);
}

fn run_pending_when_sequence_exhausted<G: SnowflakeGenerator>(generator: &G) {
    let yield_for = generator.try_poll_id().unwrap().unwrap_pending();
    assert_eq!(yield_for, 1);
}

fn run_rollover<G: SnowflakeGenerator>(generator: &G, time: &SharedStepTime) {
    // First call rolls the state forward to tick 42; the full sequence space
    // is 0..=4095 within that tick.
    for i in 0..=SnowflakeId::max_sequence() {
        let id = generator.try_poll_id().unwrap().unwrap_ready();
        assert_eq!(id.sequence(), i);
        assert_eq!(id.timestamp(), 42);
    }

    // 4097th call in the same millisecond must stall, not wrap.
    let yield_for = generator.try_poll_id().unwrap().unwrap_pending();
    assert_eq!(yield_for, 1);

    time.step_to(1);

    let id = generator.try_poll_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
}

fn run_clock_skew_is_fatal<G: SnowflakeGenerator>(generator: &G, time: &SharedStepTime) {
    let id = generator.try_poll_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), 42);

    time.step_to(1);

    let err = generator.try_poll_id().unwrap_err();
    assert_eq!(
        err,
        Error::ClockSkew {
            last_ms: 42,
            observed_ms: 41,
        }
    );

    // The error is not sticky: once the clock recovers, minting resumes.
    time.step_to(2);
    let id = generator.try_poll_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), 44);
    assert_eq!(id.sequence(), 0);
}

fn run_monotonic_against_wall_clock<G: SnowflakeGenerator>(generator: &G) {
    const TOTAL_IDS: usize = 4096 * 8;

    let mut last = None;
    for _ in 0..TOTAL_IDS {
        let id = generator.next_id().unwrap();
        if let Some(prev) = last {
            assert!(id > prev, "ids must strictly increase: {prev:?} -> {id:?}");
        }
        last = Some(id);
    }
}

fn run_threaded_unique<G>(make_generator: impl Fn() -> G)
where
    G: SnowflakeGenerator + Send + Sync,
{
    const THREADS: usize = 8;
    const TOTAL_IDS: usize = 4096 * 16;
    const IDS_PER_THREAD: usize = TOTAL_IDS / THREADS;

    let generator = Arc::new(make_generator());
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                for _ in 0..IDS_PER_THREAD {
                    let id = generator
                        .next_id_with(|_| std::thread::yield_now())
                        .unwrap();
                    assert!(seen_ids.lock().unwrap().insert(id));
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, TOTAL_IDS, "expected {TOTAL_IDS} unique IDs");
}

#[test]
fn basic_generator_sequence() {
    let generator =
        BasicSnowflakeGenerator::new(MockTime { millis: 42 }, FixedRand { value: 9 });
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn lock_generator_sequence() {
    let generator = LockSnowflakeGenerator::new(MockTime { millis: 42 }, FixedRand { value: 9 });
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn atomic_generator_sequence() {
    let generator =
        AtomicSnowflakeGenerator::new(MockTime { millis: 42 }, FixedRand { value: 9 });
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn basic_generator_pending() {
    let exhausted = SnowflakeId::from_components(0, 0, 0, SnowflakeId::max_sequence());
    let generator =
        BasicSnowflakeGenerator::from_state(exhausted, MockTime { millis: 0 }, ThreadRandom);
    run_pending_when_sequence_exhausted(&generator);
}

#[test]
fn lock_generator_pending() {
    let exhausted = SnowflakeId::from_components(0, 0, 0, SnowflakeId::max_sequence());
    let generator =
        LockSnowflakeGenerator::from_state(exhausted, MockTime { millis: 0 }, ThreadRandom);
    run_pending_when_sequence_exhausted(&generator);
}

#[test]
fn atomic_generator_pending() {
    let exhausted = SnowflakeId::from_components(0, 0, 0, SnowflakeId::max_sequence());
    let generator =
        AtomicSnowflakeGenerator::from_state(exhausted, MockTime { millis: 0 }, ThreadRandom);
    run_pending_when_sequence_exhausted(&generator);
}

#[test]
fn basic_generator_rollover() {
    let time = SharedStepTime::new(vec![42, 43]);
    let generator = BasicSnowflakeGenerator::new(time.clone(), ThreadRandom);
    run_rollover(&generator, &time);
}

#[test]
fn lock_generator_rollover() {
    let time = SharedStepTime::new(vec![42, 43]);
    let generator = LockSnowflakeGenerator::new(time.clone(), ThreadRandom);
    run_rollover(&generator, &time);
}

#[test]
fn atomic_generator_rollover() {
    let time = SharedStepTime::new(vec![42, 43]);
    let generator = AtomicSnowflakeGenerator::new(time.clone(), ThreadRandom);
    run_rollover(&generator, &time);
}

#[test]
fn basic_generator_clock_skew() {
    let time = SharedStepTime::new(vec![42, 41, 44]);
    let generator = BasicSnowflakeGenerator::new(time.clone(), ThreadRandom);
    run_clock_skew_is_fatal(&generator, &time);
}

#[test]
fn lock_generator_clock_skew() {
    let time = SharedStepTime::new(vec![42, 41, 44]);
    let generator = LockSnowflakeGenerator::new(time.clone(), ThreadRandom);
    run_clock_skew_is_fatal(&generator, &time);
}

#[test]
fn atomic_generator_clock_skew() {
    let time = SharedStepTime::new(vec![42, 41, 44]);
    let generator = AtomicSnowflakeGenerator::new(time.clone(), ThreadRandom);
    run_clock_skew_is_fatal(&generator, &time);
}

#[test]
fn mints_the_documented_bit_pattern() {
    // 123ms after the epoch, datacenter 5 then worker 7 drawn, first call in
    // that millisecond.
    let generator = BasicSnowflakeGenerator::new(
        MockTime { millis: 123 },
        ScriptedRand::new(vec![5, 7]),
    );
    let id = generator.next_id().unwrap();
    assert_eq!(id.to_raw(), (123 << 22) | (5 << 17) | (7 << 12));
}

#[test]
fn next_id_with_waits_out_exhaustion() {
    let time = SharedStepTime::new(vec![42, 43]);
    let exhausted = SnowflakeId::from_components(42, 0, 0, SnowflakeId::max_sequence());
    let generator =
        BasicSnowflakeGenerator::from_state(exhausted, time.clone(), ThreadRandom);

    // The backoff callback stands in for the clock ticking over.
    let id = generator.next_id_with(|_| time.step_to(1)).unwrap();
    assert_eq!(id.timestamp(), 43);
    assert_eq!(id.sequence(), 0);
}

#[test]
fn timestamp_tracks_the_time_source() {
    let clock = WallClock::default();
    let generator = BasicSnowflakeGenerator::new(clock.clone(), ThreadRandom);

    let before = clock.current_millis();
    let id = generator.next_id().unwrap();
    let after = clock.current_millis();

    assert!(id.timestamp() >= before);
    assert!(id.timestamp() <= after);
}

#[test]
fn basic_generator_monotonic_wall_clock() {
    // Pin the random draw so raw ordering is meaningful across the run.
    let generator = BasicSnowflakeGenerator::new(WallClock::default(), FixedRand { value: 7 });
    run_monotonic_against_wall_clock(&generator);
}

#[test]
fn lock_generator_monotonic_wall_clock() {
    let generator = LockSnowflakeGenerator::new(WallClock::default(), FixedRand { value: 7 });
    run_monotonic_against_wall_clock(&generator);
}

#[test]
fn atomic_generator_monotonic_wall_clock() {
    let generator = AtomicSnowflakeGenerator::new(WallClock::default(), FixedRand { value: 7 });
    run_monotonic_against_wall_clock(&generator);
}

#[test]
fn lock_generator_threaded_unique() {
    run_threaded_unique(|| LockSnowflakeGenerator::new(WallClock::default(), ThreadRandom));
}

#[test]
fn atomic_generator_threaded_unique() {
    run_threaded_unique(|| AtomicSnowflakeGenerator::new(WallClock::default(), ThreadRandom));
}
