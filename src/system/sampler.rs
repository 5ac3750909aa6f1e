use sysinfo::System;

use crate::error::{Error, Result};

use super::sample::SystemSample;

/// Reads instantaneous host state through `sysinfo`. Each `sample()` call
/// refreshes and returns current figures; nothing is cached between calls.
pub struct Sampler {
    sys: System,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        Sampler { sys }
    }

    pub fn sample(&mut self) -> Result<SystemSample> {
        self.sys.refresh_memory();
        self.sys.refresh_cpu_all();

        // A host that reports zero total memory gave us nothing usable;
        // the caller skips this tick and retries next period.
        if self.sys.total_memory() == 0 {
            return Err(Error::SamplingUnavailable);
        }

        Ok(SystemSample {
            cpu_percent: self.sys.global_cpu_usage(),
            ram_free: self.sys.free_memory(),
            ram_total: self.sys.total_memory(),
            swap_free: self.sys.free_swap(),
            swap_total: self.sys.total_swap(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_reports_nonzero_totals_on_host() {
        let mut sampler = Sampler::new();
        let sample = sampler.sample().expect("host metrics should be readable");
        assert!(sample.ram_total > 0);
        assert!(sample.ram_free <= sample.ram_total);
    }
}
