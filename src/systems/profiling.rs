use bevy_ecs::system::IntoSystem;
use bevy_ecs::{resource::Resource, system::System};
use circular_buffer::CircularBuffer;
use num_width::NumberWidth;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use thousands::Separable;

/// Upper bound for the timing map; one slot per profiled system.
const MAX_SYSTEMS: usize = SystemId::COUNT;
/// How many recent frames each buffer remembers.
const TIMING_WINDOW_SIZE: usize = 30;

/// Every profiled system in the schedule, plus `Total` for whole-frame time.
#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum SystemId {
    Total,
    Input,
    PauseManager,
    Clock,
    Ramp,
    Parallax,
    PlayerControl,
    Physics,
    Scroll,
    Spawn,
    Collision,
    Distance,
    Stage,
    Hud,
    Render,
    Audio,
}

impl Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Into::<&'static str>::into(self).to_ascii_lowercase())
    }
}

/// Rolling window of per-frame durations. Frames where the system did not
/// run (paused, skipped by run conditions) are backfilled as zero so the
/// averages reflect wall-clock cost, not per-invocation cost.
#[derive(Debug, Default)]
pub struct TimingBuffer {
    buffer: CircularBuffer<TIMING_WINDOW_SIZE, Duration>,
    last_tick: u64,
}

impl TimingBuffer {
    /// Records a duration for `current_tick`, zero-filling any ticks that
    /// were skipped since the last record.
    ///
    /// # Panics
    ///
    /// Panics if `current_tick` is less than the last recorded tick.
    pub fn add_timing(&mut self, duration: Duration, current_tick: u64) {
        if current_tick < self.last_tick {
            panic!(
                "Tick counter went backwards: current_tick ({}) < last_tick ({})",
                current_tick, self.last_tick
            );
        }

        if current_tick > self.last_tick {
            let skipped = current_tick - self.last_tick - 1;
            for _ in 0..skipped {
                self.buffer.push_back(Duration::ZERO);
            }
        }

        self.buffer.push_back(duration);
        self.last_tick = current_tick;
    }

    pub fn most_recent(&self) -> Duration {
        self.buffer.back().copied().unwrap_or(Duration::ZERO)
    }

    /// Mean and standard deviation over the window, zero-filling skipped
    /// ticks first. Uses Welford's online algorithm.
    pub fn stats(&mut self, current_tick: u64) -> (Duration, Duration) {
        if current_tick > self.last_tick {
            let skipped = current_tick - self.last_tick - 1;
            for _ in 0..skipped {
                self.buffer.push_back(Duration::ZERO);
            }
            self.last_tick = current_tick;
        }

        let mut count = 0u16;
        let mut mean = 0.0;
        let mut sum_squared_diff = 0.0;

        for duration in self.buffer.iter() {
            let secs = duration.as_secs_f32();
            count += 1;

            let diff = secs - mean;
            mean += diff / count as f32;
            sum_squared_diff += diff * (secs - mean);
        }

        if count == 0 {
            return (Duration::ZERO, Duration::ZERO);
        }

        let variance = if count > 1 { sum_squared_diff / (count - 1) as f32 } else { 0.0 };
        (Duration::from_secs_f32(mean), Duration::from_secs_f32(variance.sqrt()))
    }
}

/// Atomic frame counter shared between the loop driver and the profiler.
#[derive(Resource, Debug, Default)]
pub struct Timing {
    current_tick: AtomicU64,
}

impl Timing {
    pub fn current_tick(&self) -> u64 {
        self.current_tick.load(Ordering::Relaxed)
    }

    /// Increments the tick counter and returns the new value.
    pub fn increment_tick(&self) -> u64 {
        self.current_tick.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[derive(Resource, Debug)]
pub struct SystemTimings {
    /// Statically sized map from system id to its timing buffer.
    pub timings: micromap::Map<SystemId, Mutex<TimingBuffer>, MAX_SYSTEMS>,
}

impl Default for SystemTimings {
    fn default() -> Self {
        let mut timings = micromap::Map::new();

        // Pre-populated so the hot path never inserts.
        for id in SystemId::iter() {
            timings.insert(id, Mutex::new(TimingBuffer::default()));
        }

        Self { timings }
    }
}

impl SystemTimings {
    pub fn add_timing(&self, id: SystemId, duration: Duration, current_tick: u64) {
        let buffer = self
            .timings
            .get(&id)
            .expect("SystemId missing from pre-populated map - this is a bug");
        buffer.lock().add_timing(duration, current_tick);
    }

    /// Records whole-frame time, including schedule overhead.
    pub fn add_total_timing(&self, duration: Duration, current_tick: u64) {
        self.add_timing(SystemId::Total, duration, current_tick);
    }

    pub fn get_stats(&self, current_tick: u64) -> micromap::Map<SystemId, (Duration, Duration), MAX_SYSTEMS> {
        let mut stats = micromap::Map::new();

        for id in SystemId::iter() {
            let buffer = self
                .timings
                .get(&id)
                .expect("SystemId missing from pre-populated map - this is a bug");

            stats.insert(id, buffer.lock().stats(current_tick));
        }

        stats
    }

    /// Formats an aligned timing table: effective FPS on the first line,
    /// then the most expensive systems in descending order.
    pub fn format_timing_display(&self, current_tick: u64) -> SmallVec<[String; SystemId::COUNT]> {
        let stats = self.get_stats(current_tick);

        let (total_avg, total_std) = stats
            .get(&SystemId::Total)
            .copied()
            .unwrap_or((Duration::ZERO, Duration::ZERO));

        let effective_fps = match 1.0 / total_avg.as_secs_f64() {
            f if f > 100.0 => format!("{:>5} FPS", (f as u32).separate_with_commas()),
            f if f < 10.0 => format!("{:.1} FPS", f),
            f => format!("{:5.0} FPS", f),
        };

        let mut timing_data = vec![(effective_fps, total_avg, total_std)];

        let mut sorted_stats: Vec<_> = stats.iter().filter(|(id, _)| **id != SystemId::Total).collect();
        sorted_stats.sort_by(|a, b| b.1 .0.cmp(&a.1 .0));

        for (name, (avg, std_dev)) in sorted_stats.iter().take(9) {
            timing_data.push((name.to_string(), *avg, *std_dev));
        }

        format_timing_display(timing_data)
    }

    /// Returns the systems most likely responsible for a slow frame.
    ///
    /// Any system over 2ms on the latest tick is reported directly. Failing
    /// that, systems are accumulated by descending cost until 30% of the
    /// frame total is covered, capped at 5 entries.
    pub fn get_slowest_systems(&self) -> SmallVec<[(SystemId, Duration); 5]> {
        let mut system_timings: Vec<(SystemId, Duration)> = Vec::new();
        let mut total_duration = Duration::ZERO;

        for id in SystemId::iter() {
            if id == SystemId::Total {
                continue;
            }

            if let Some(buffer) = self.timings.get(&id) {
                let recent = buffer.lock().most_recent();
                system_timings.push((id, recent));
                total_duration += recent;
            }
        }

        system_timings.sort_by(|a, b| b.1.cmp(&a.1));

        let over_threshold: SmallVec<[(SystemId, Duration); 5]> = system_timings
            .iter()
            .filter(|(_, duration)| duration.as_millis() >= 2)
            .copied()
            .collect();

        if !over_threshold.is_empty() {
            return over_threshold;
        }

        let threshold = total_duration.as_nanos() as f64 * 0.3;
        let mut accumulated = 0u128;
        let mut result = SmallVec::new();

        for (id, duration) in system_timings.iter().take(5) {
            result.push((*id, *duration));
            accumulated += duration.as_nanos();

            if accumulated as f64 >= threshold {
                break;
            }
        }

        result
    }
}

/// Wraps a system so its run time lands in [`SystemTimings`] under `id`.
pub fn profile<S, M>(id: SystemId, system: S) -> impl FnMut(&mut bevy_ecs::world::World)
where
    S: IntoSystem<(), (), M> + 'static,
{
    let mut system: S::System = IntoSystem::into_system(system);
    let mut is_initialized = false;
    move |world: &mut bevy_ecs::world::World| {
        if !is_initialized {
            system.initialize(world);
            is_initialized = true;
        }

        let start = std::time::Instant::now();
        system.run((), world);
        let duration = start.elapsed();

        if let (Some(timings), Some(timing)) = (world.get_resource::<SystemTimings>(), world.get_resource::<Timing>()) {
            timings.add_timing(id, duration, timing.current_tick());
        }
    }
}

// Splits a duration into integer part, decimal part, and unit.
fn get_value(duration: &Duration) -> (u64, u32, &'static str) {
    match duration {
        n if n >= &Duration::from_secs(1) => {
            let decimal = n.as_millis() as u64 % 1000;
            (n.as_secs(), decimal as u32, "s")
        }
        n if n >= &Duration::from_millis(1) => {
            let decimal = n.as_micros() as u64 % 1000;
            (n.as_millis() as u64, decimal as u32, "ms")
        }
        n if n >= &Duration::from_micros(1) => {
            let decimal = n.as_nanos() as u64 % 1000;
            (n.as_micros() as u64, decimal as u32, "µs")
        }
        n => (n.as_nanos() as u64, 0, "ns"),
    }
}

/// Formats timing rows with the columns aligned across the whole table.
pub fn format_timing_display(
    timing_data: impl IntoIterator<Item = (String, Duration, Duration)>,
) -> SmallVec<[String; SystemId::COUNT]> {
    let mut iter = timing_data.into_iter().peekable();
    if iter.peek().is_none() {
        return SmallVec::new();
    }

    struct Entry {
        name: String,
        avg_int: u64,
        avg_decimal: u32,
        avg_unit: &'static str,
        std_int: u64,
        std_decimal: u32,
        std_unit: &'static str,
    }

    let entries = iter
        .map(|(name, avg, std_dev)| {
            let (avg_int, avg_decimal, avg_unit) = get_value(&avg);
            let (std_int, std_decimal, std_unit) = get_value(&std_dev);

            Entry {
                name,
                avg_int,
                avg_decimal,
                avg_unit,
                std_int,
                std_decimal,
                std_unit,
            }
        })
        .collect::<SmallVec<[Entry; 12]>>();

    let (max_avg_int_width, max_avg_decimal_width, max_std_int_width, max_std_decimal_width) =
        entries
            .iter()
            .fold((0, 3, 0, 3), |(avg_int_w, avg_dec_w, std_int_w, std_dec_w), e| {
                (
                    avg_int_w.max(e.avg_int.width() as usize),
                    avg_dec_w.max(e.avg_decimal.width() as usize),
                    std_int_w.max(e.std_int.width() as usize),
                    std_dec_w.max(e.std_decimal.width() as usize),
                )
            });

    let max_name_width = SystemId::iter()
        .map(|id| id.to_string().len())
        .max()
        .expect("SystemId::iter() returned an empty iterator");

    entries.iter().map(|e| {
            format!(
                "{name:max_name_width$} : {avg_int:max_avg_int_width$}.{avg_decimal:<max_avg_decimal_width$}{avg_unit} ± {std_int:max_std_int_width$}.{std_decimal:<max_std_decimal_width$}{std_unit}",
                name = e.name,
                avg_int = e.avg_int,
                avg_decimal = e.avg_decimal,
                std_int = e.std_int,
                std_decimal = e.std_decimal,
                avg_unit = e.avg_unit,
                std_unit = e.std_unit,
                max_name_width = max_name_width,
                max_avg_int_width = max_avg_int_width,
                max_avg_decimal_width = max_avg_decimal_width,
                max_std_int_width = max_std_int_width,
                max_std_decimal_width = max_std_decimal_width
            )
        }).collect::<SmallVec<[String; SystemId::COUNT]>>()
}
