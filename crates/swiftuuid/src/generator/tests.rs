use crate::{
    COUNTER_LIMIT, CachedClock, EntropySource, Error, GeneratorConfig, LazyV7Generator,
    OsEntropy, Result, ShardedV7Generator, SystemClock, ThreadEntropy, TimeSource, Uuid,
    UuidGenerator, V4Generator, Variant,
};
use portable_atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread::scope;

const FIXED_MS: u64 = 1_700_000_000_000;

struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

/// Cached reads never move; fresh reads step one millisecond per call.
struct MockStuckTime {
    cached: u64,
    fresh: AtomicU64,
}

impl MockStuckTime {
    fn at(millis: u64) -> Self {
        Self {
            cached: millis,
            fresh: AtomicU64::new(millis),
        }
    }
}

impl TimeSource for MockStuckTime {
    fn current_millis(&self) -> u64 {
        self.cached
    }

    fn fresh_millis(&self) -> u64 {
        self.fresh.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Fills every buffer with `byte`, counts fills and can be switched to fail.
#[derive(Default)]
struct MockEntropy {
    byte: u8,
    fills: AtomicUsize,
    fail: AtomicBool,
}

impl MockEntropy {
    fn with_byte(byte: u8) -> Self {
        Self {
            byte,
            ..Self::default()
        }
    }

    fn failing() -> Self {
        let entropy = Self::default();
        entropy.fail.store(true, Ordering::Relaxed);
        entropy
    }

    fn fills(&self) -> usize {
        self.fills.load(Ordering::Relaxed)
    }
}

impl EntropySource for MockEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(Error::entropy("mock entropy offline"));
        }
        self.fills.fetch_add(1, Ordering::Relaxed);
        dest.fill(self.byte);
        Ok(())
    }
}

fn run_version_and_variant<G>(generator: G, version: u8)
where
    G: UuidGenerator,
{
    for _ in 0..1_000 {
        let id = generator.generate().unwrap();
        assert_eq!(id.version(), version);
        assert_eq!(id.variant(), Variant::Rfc9562);

        let parsed = uuid::Uuid::from_bytes(*id.as_bytes());
        assert_eq!(parsed.get_version_num(), usize::from(version));
        assert_eq!(parsed.get_variant(), uuid::Variant::RFC4122);
        assert_eq!(parsed.to_string(), id.to_string());
    }
}

fn run_generator_fails_without_entropy<G>(generator: G)
where
    G: UuidGenerator,
{
    let err = generator.generate().unwrap_err();
    assert!(matches!(err, Error::EntropyUnavailable { .. }), "{err:?}");
}

fn run_unique_threaded<G>(generator: G)
where
    G: UuidGenerator + Sync,
{
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 10_000;

    let seen = Mutex::new(HashSet::with_capacity(THREADS * IDS_PER_THREAD));

    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let local: Vec<Uuid> = (0..IDS_PER_THREAD)
                    .map(|_| generator.generate().unwrap())
                    .collect();
                seen.lock().unwrap().extend(local);
            });
        }
    });

    let total = seen.lock().unwrap().len();
    assert_eq!(total, THREADS * IDS_PER_THREAD, "duplicate identifiers");
}

#[test]
fn sharded_counts_within_fixed_millisecond() {
    let generator =
        ShardedV7Generator::new(MockTime { millis: FIXED_MS }, MockEntropy::default());

    let ids: Vec<Uuid> = (0..3).map(|_| generator.generate().unwrap()).collect();

    let expected_prefix = &FIXED_MS.to_be_bytes()[2..];
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(&id.as_bytes()[..6], expected_prefix);
        assert_eq!(id.timestamp_ms(), FIXED_MS);
        assert_eq!(id.as_bytes()[6], 0x70);
        assert_eq!(id.as_bytes()[7], i as u8);
        assert_eq!(id.counter(), i as u16);
    }
    assert!(ids[0] < ids[1] && ids[1] < ids[2]);
    assert_eq!(generator.shards().snapshot(0), (FIXED_MS, 2));
}

#[test]
fn sharded_tail_comes_from_worker_buffer() {
    let generator = ShardedV7Generator::new(MockTime { millis: 5 }, MockEntropy::with_byte(0xff));
    let id = generator.generate().unwrap();
    let bytes = id.as_bytes();
    assert_eq!(bytes[6], 0x70);
    assert_eq!(bytes[7], 0x00);
    assert_eq!(bytes[8], 0xbf);
    assert!(bytes[9..].iter().all(|&b| b == 0xff));
}

#[test]
fn sharded_version_and_variant() {
    run_version_and_variant(ShardedV7Generator::new(CachedClock::start(), OsEntropy), 7);
}

#[test]
fn lazy_version_and_variant() {
    run_version_and_variant(LazyV7Generator::<SystemClock, OsEntropy>::default(), 7);
}

#[test]
fn v4_version_and_variant() {
    run_version_and_variant(V4Generator::<OsEntropy>::default(), 4);
}

#[test]
fn generators_are_usable_as_trait_objects() {
    let generators: [Box<dyn UuidGenerator>; 3] = [
        Box::new(ShardedV7Generator::new(SystemClock, ThreadEntropy)),
        Box::new(LazyV7Generator::new(SystemClock, ThreadEntropy)),
        Box::new(V4Generator::new(ThreadEntropy)),
    ];
    let versions: Vec<u8> = generators
        .iter()
        .map(|g| g.generate().unwrap().version())
        .collect();
    assert_eq!(versions, [7, 7, 4]);
}

#[test]
fn sharded_moves_to_next_millisecond_after_counter_wraps() {
    let generator = ShardedV7Generator::new(MockStuckTime::at(1_000), MockEntropy::default());

    let mut prev = Uuid::NIL;
    for expected in 0..COUNTER_LIMIT {
        let id = generator.generate().unwrap();
        assert_eq!(id.timestamp_ms(), 1_000);
        assert_eq!(id.counter(), expected);
        assert!(id > prev);
        prev = id;
    }

    let id = generator.generate().unwrap();
    assert_eq!(id.timestamp_ms(), 1_001);
    assert_eq!(id.counter(), 0);
    assert!(id > prev);
}

#[test]
fn sharded_reports_stalled_clock() {
    let config = GeneratorConfig::default().with_max_saturation_retries(2);
    let generator =
        ShardedV7Generator::with_config(MockTime { millis: 9 }, MockEntropy::default(), &config)
            .unwrap();

    for _ in 0..COUNTER_LIMIT {
        generator.generate().unwrap();
    }
    let err = generator.generate().unwrap_err();
    assert_eq!(err, Error::ClockStalled { shard: 0, retries: 2 });
    assert_eq!(generator.pool().available(), 1);
}

#[test]
fn sharded_refills_once_per_buffer() {
    let entropy = Arc::new(MockEntropy::default());
    let generator = ShardedV7Generator::new(SystemClock, Arc::clone(&entropy));

    // 8192-byte buffer / 10 bytes per id
    for _ in 0..819 {
        generator.generate().unwrap();
    }
    assert_eq!(entropy.fills(), 1);

    generator.generate().unwrap();
    assert_eq!(entropy.fills(), 2);
}

#[test]
fn sharded_entropy_failure_returns_state_to_pool() {
    let entropy = Arc::new(MockEntropy::default());
    let config = GeneratorConfig::default().with_buffer_size(10);
    let generator =
        ShardedV7Generator::with_config(SystemClock, Arc::clone(&entropy), &config).unwrap();

    // Drains the single buffer exactly.
    generator.generate().unwrap();
    assert_eq!(generator.pool().available(), 1);

    entropy.fail.store(true, Ordering::Relaxed);
    let err = generator.generate().unwrap_err();
    assert!(matches!(err, Error::EntropyUnavailable { .. }));
    assert_eq!(generator.pool().available(), 1);
    assert_eq!(generator.pool().created(), 1);

    // The same state recovers once the source does.
    entropy.fail.store(false, Ordering::Relaxed);
    generator.generate().unwrap();
    assert_eq!(entropy.fills(), 2);
    assert_eq!(generator.pool().created(), 1);
}

#[test]
fn sharded_fails_on_fresh_pool_without_entropy() {
    let generator = ShardedV7Generator::new(SystemClock, MockEntropy::failing());
    run_generator_fails_without_entropy(&generator);
    assert_eq!(generator.pool().available(), generator.pool().created());
}

#[test]
fn lazy_fails_without_entropy() {
    run_generator_fails_without_entropy(LazyV7Generator::new(SystemClock, MockEntropy::failing()));
}

#[test]
fn v4_fails_without_entropy() {
    run_generator_fails_without_entropy(V4Generator::new(MockEntropy::failing()));
}

#[test]
fn sharded_rejects_invalid_config() {
    let config = GeneratorConfig::default().with_buffer_size(9);
    let err = ShardedV7Generator::with_config(SystemClock, OsEntropy, &config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[test]
fn sharded_single_thread_is_strictly_increasing() {
    let generator = ShardedV7Generator::new(CachedClock::start(), ThreadEntropy);
    let mut prev = generator.generate().unwrap();
    for _ in 0..50_000 {
        let id = generator.generate().unwrap();
        assert!(id > prev, "{id} <= {prev}");
        prev = id;
    }
}

#[test]
fn sharded_threaded_unique() {
    run_unique_threaded(ShardedV7Generator::new(CachedClock::start(), ThreadEntropy));
}

#[test]
fn lazy_threaded_unique() {
    run_unique_threaded(LazyV7Generator::new(SystemClock, ThreadEntropy));
}

#[test]
fn v4_threaded_unique() {
    run_unique_threaded(V4Generator::new(ThreadEntropy));
}

#[test]
fn lazy_uses_fresh_clock_and_random_tail() {
    let generator = LazyV7Generator::new(MockTime { millis: FIXED_MS }, MockEntropy::with_byte(0xff));
    let id = generator.generate().unwrap();
    assert_eq!(id.timestamp_ms(), FIXED_MS);
    assert_eq!(id.as_bytes()[6], 0x7f);
    assert_eq!(id.as_bytes()[8], 0xbf);
}

#[test]
fn v4_keeps_122_random_bits() {
    let id = V4Generator::new(MockEntropy::with_byte(0xff)).generate().unwrap();
    assert_eq!(id.to_string(), "ffffffff-ffff-4fff-bfff-ffffffffffff");
}
