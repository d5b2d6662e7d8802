//! Engine settings sized to the machine the server runs on.

use std::{env, fs};

use serde::Serialize;

const CGROUP_LIMITS: [&str; 2] = [
    "/sys/fs/cgroup/memory/memory.limit_in_bytes", // cgroups v1
    "/sys/fs/cgroup/memory.max",                   // cgroups v2
];

/// Limits at or above this are treated as "no limit".
const UNLIMITED_CGROUP_MB: u64 = 64_000;

const FALLBACK_MEMORY_MB: u64 = 512;

const CLOUD_MARKERS: [&str; 8] = [
    "RENDER",
    "RAILWAY_ENVIRONMENT",
    "HEROKU",
    "DYNO",
    "FLY_APP_NAME",
    "VERCEL",
    "AWS_LAMBDA_FUNCTION_NAME",
    "GOOGLE_CLOUD_PROJECT",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSettings {
    /// Transposition table size in MB.
    pub hash: u32,
    pub threads: u32,
    pub max_depth: u32,
    pub default_depth: u32,
    pub memory_mb: u64,
    pub cloud_mode: bool,
}

impl EngineSettings {
    /// Settings for a machine with `memory_mb` of RAM.
    pub fn for_memory(memory_mb: u64) -> Self {
        let (hash, threads, max_depth, default_depth) = match memory_mb {
            m if m >= 8000 => (256, 4, 30, 22),
            m if m >= 4000 => (128, 2, 25, 20),
            m if m >= 1000 => (64, 1, 22, 18),
            _ => (16, 1, 20, 16),
        };
        Self {
            hash,
            threads,
            max_depth,
            default_depth,
            memory_mb,
            cloud_mode: false,
        }
    }

    /// Smallest tier, used on hosted platforms whose memory reporting is unreliable.
    pub fn cloud() -> Self {
        Self {
            cloud_mode: true,
            ..Self::for_memory(FALLBACK_MEMORY_MB)
        }
    }

    /// Clamp a requested depth to `1..=max_depth`, defaulting when absent.
    pub fn resolve_depth(&self, requested: Option<u32>) -> u32 {
        requested
            .map(|d| d.clamp(1, self.max_depth))
            .unwrap_or(self.default_depth)
    }
}

pub fn optimal_settings() -> EngineSettings {
    let mut settings = if is_cloud_environment() {
        tracing::info!("Cloud environment detected - using conservative memory settings");
        EngineSettings::cloud()
    } else {
        EngineSettings::for_memory(memory_mb())
    };
    settings.threads = settings.threads.min(num_cpus::get().max(1) as u32);
    settings
}

pub fn is_cloud_environment() -> bool {
    CLOUD_MARKERS
        .iter()
        .any(|var| env::var(var).is_ok_and(|v| !v.is_empty()))
}

/// Available memory in MB, honouring container limits.
pub fn memory_mb() -> u64 {
    for path in CGROUP_LIMITS {
        if let Some(limit) = fs::read_to_string(path).ok().and_then(|s| parse_cgroup_limit(&s)) {
            return limit;
        }
    }

    fs::read_to_string("/proc/meminfo")
        .ok()
        .and_then(|s| parse_meminfo_total(&s))
        .unwrap_or(FALLBACK_MEMORY_MB)
}

fn parse_cgroup_limit(contents: &str) -> Option<u64> {
    let bytes: u64 = contents.trim().parse().ok()?;
    let mb = bytes / (1024 * 1024);
    (mb < UNLIMITED_CGROUP_MB).then_some(mb)
}

fn parse_meminfo_total(contents: &str) -> Option<u64> {
    let line = contents.lines().find(|l| l.starts_with("MemTotal:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb / 1024)
}
