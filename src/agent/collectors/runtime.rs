//! Process and allocator statistics, plus the poll counter

use super::Collector;
use super::alloc::AllocStats;
use crate::core::metric::Metric;
use crate::utils::error::Result;
use async_trait::async_trait;
use sysinfo::{Pid, ProcessesToUpdate, System};

pub struct RuntimeCollector {
    system: System,
    pid: Option<Pid>,
}

impl Default for RuntimeCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeCollector {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// Resident and virtual memory of this process, zero when unavailable
    fn process_memory(&mut self) -> (u64, u64) {
        let Some(pid) = self.pid else {
            return (0, 0);
        };
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        self.system
            .process(pid)
            .map_or((0, 0), |p| (p.memory(), p.virtual_memory()))
    }
}

#[async_trait]
impl Collector for RuntimeCollector {
    fn name(&self) -> &'static str {
        "runtime"
    }

    async fn collect(&mut self) -> Result<Vec<Metric>> {
        let stats = AllocStats::current();
        let (resident, virtual_memory) = self.process_memory();

        Ok(vec![
            Metric::gauge("Alloc", stats.current_bytes as f64),
            Metric::gauge("HeapAlloc", stats.current_bytes as f64),
            Metric::gauge("TotalAlloc", stats.bytes_allocated as f64),
            Metric::gauge("Mallocs", stats.allocations as f64),
            Metric::gauge("Frees", stats.deallocations as f64),
            Metric::gauge("HeapObjects", stats.live_objects() as f64),
            Metric::gauge("Sys", resident as f64),
            Metric::gauge("VirtualMemory", virtual_memory as f64),
            Metric::gauge("RandomValue", rand::random::<f64>()),
            Metric::counter("PollCount", 1),
        ])
    }
}
