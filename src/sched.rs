//! Gates the CPU, timers, and display refresh at independent rates
//!
//! The host loop reports elapsed wall-clock (or emulated) time; the
//! scheduler accumulates it against each rate's period and hands back how
//! many cycles and timer ticks are due, so instruction rate, timer rate
//! and refresh rate never have to be multiples of one another or of the
//! host frame rate.

use std::time::Duration;

/// The three configurable rates, in events per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rates {
    /// Instructions per second. 0 = unthrottled: exactly one instruction
    /// per [Scheduler::advance] call, however often the host calls it.
    pub cpu_hz: u32,
    /// Timer ticks per second. 0 = tick once per executed cycle.
    pub timer_hz: u32,
    /// Display refreshes per second. 0 = refresh on every call.
    pub refresh_hz: u32,
}

impl Default for Rates {
    fn default() -> Self {
        Rates {
            cpu_hz: 720,
            timer_hz: 60,
            refresh_hz: 60,
        }
    }
}

/// What fell due over one elapsed span: how many instructions to execute,
/// how many timer ticks to apply, and whether to re-present the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Batch {
    pub cycles: usize,
    pub timer_ticks: usize,
    pub refresh: bool,
}

/// Accumulates elapsed time against each configured rate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scheduler {
    pub rates: Rates,
    cpu_due: f64,
    timer_due: f64,
    refresh_due: f64,
}

impl Scheduler {
    pub fn new(rates: Rates) -> Self {
        Scheduler {
            rates,
            ..Default::default()
        }
    }

    /// Converts an elapsed span into the [Batch] of work it makes due.
    /// Fractional periods carry over to the next call, so uneven host
    /// frames don't drop cycles or ticks.
    pub fn advance(&mut self, elapsed: Duration) -> Batch {
        let dt = elapsed.as_secs_f64();
        let cycles = match self.rates.cpu_hz {
            0 => 1,
            hz => Self::accrue(&mut self.cpu_due, dt, hz),
        };
        let timer_ticks = match self.rates.timer_hz {
            0 => cycles,
            hz => Self::accrue(&mut self.timer_due, dt, hz),
        };
        let refresh = match self.rates.refresh_hz {
            0 => true,
            hz => Self::accrue(&mut self.refresh_due, dt, hz) > 0,
        };
        Batch {
            cycles,
            timer_ticks,
            refresh,
        }
    }

    /// Zeroes the accumulators, e.g. after the machine was paused so the
    /// idle span doesn't land as a burst of catch-up cycles.
    pub fn reset(&mut self) {
        self.cpu_due = 0.0;
        self.timer_due = 0.0;
        self.refresh_due = 0.0;
    }

    fn accrue(due: &mut f64, dt: f64, hz: u32) -> usize {
        *due += dt * hz as f64;
        let whole = due.floor();
        *due -= whole;
        whole as usize
    }
}
