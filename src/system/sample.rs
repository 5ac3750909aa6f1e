/// One instantaneous reading of host CPU, RAM, and swap. Byte fields are
/// raw counts; display conversion happens at the formatting boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemSample {
    pub cpu_percent: f32,
    pub ram_free: u64,
    pub ram_total: u64,
    pub swap_free: u64,
    pub swap_total: u64,
}
