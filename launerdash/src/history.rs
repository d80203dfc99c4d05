//! Small utilities to manage bounded history buffers for sparklines.

use std::collections::VecDeque;

pub const HISTORY_CAP: usize = 600;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

// Rolling CPU/memory totals (0..=100) from the basic dashboard feed
#[derive(Debug, Clone)]
pub struct UsageHistory {
    pub cpu: VecDeque<u64>,
    pub mem: VecDeque<u64>,
    cap: usize,
}

impl UsageHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            cpu: VecDeque::with_capacity(cap),
            mem: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, cpu_pct: f64, mem_pct: f64) {
        push_capped(&mut self.cpu, pct(cpu_pct), self.cap);
        push_capped(&mut self.mem, pct(mem_pct), self.cap);
    }
}

impl Default for UsageHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAP)
    }
}

fn pct(v: f64) -> u64 {
    v.clamp(0.0, 100.0).round() as u64
}
