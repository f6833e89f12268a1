//! CPU and memory facts read from `/proc`.

use std::fs;

const CPUINFO: &str = "/proc/cpuinfo";
const MEMINFO: &str = "/proc/meminfo";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemInfo {
    pub cpu_model: Option<String>,
    pub mem_total_mb: Option<u64>,
    pub mem_available_mb: Option<u64>,
}

impl SystemInfo {
    pub fn collect() -> Self {
        let cpu_model = fs::read_to_string(CPUINFO)
            .ok()
            .and_then(|s| parse_cpu_model(&s));
        let (mem_total_mb, mem_available_mb) = fs::read_to_string(MEMINFO)
            .map(|s| parse_meminfo(&s))
            .unwrap_or_default();
        Self {
            cpu_model,
            mem_total_mb,
            mem_available_mb,
        }
    }
}

fn parse_cpu_model(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        .find(|l| l.starts_with("model name"))
        .and_then(|l| l.split_once(':'))
        .map(|(_, v)| v.trim().to_string())
}

/// `(MemTotal, MemAvailable)` in MB.
fn parse_meminfo(meminfo: &str) -> (Option<u64>, Option<u64>) {
    let kb_to_mb = |line: &str| -> Option<u64> {
        line.split_whitespace()
            .nth(1)?
            .parse::<u64>()
            .ok()
            .map(|kb| kb / 1024)
    };
    let field = |name: &str| meminfo.lines().find(|l| l.starts_with(name)).and_then(kb_to_mb);
    (field("MemTotal:"), field("MemAvailable:"))
}
