//! Host memory and per-core CPU utilisation

use super::Collector;
use crate::core::metric::Metric;
use crate::utils::error::Result;
use async_trait::async_trait;
use sysinfo::System;

pub struct OsCollector {
    system: System,
}

impl Default for OsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl OsCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_cpu_usage();
        Self { system }
    }
}

#[async_trait]
impl Collector for OsCollector {
    fn name(&self) -> &'static str {
        "os"
    }

    async fn collect(&mut self) -> Result<Vec<Metric>> {
        self.system.refresh_memory();
        self.system.refresh_cpu_usage();

        let mut metrics = vec![
            Metric::gauge("TotalMemory", self.system.total_memory() as f64),
            Metric::gauge("FreeMemory", self.system.free_memory() as f64),
        ];
        metrics.extend(self.system.cpus().iter().enumerate().map(|(i, cpu)| {
            Metric::gauge(format!("CPUutilization{}", i + 1), cpu.cpu_usage() as f64)
        }));

        Ok(metrics)
    }
}
