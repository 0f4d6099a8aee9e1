//! Run-seed selection: an explicit `--seed` flag wins, otherwise a
//! process-local entropy mix supplies one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedChoice {
    Explicit(u64),
    Generated(u64),
}

impl SeedChoice {
    pub fn value(self) -> u64 {
        match self {
            Self::Explicit(seed) | Self::Generated(seed) => seed,
        }
    }
}

static SEED_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Wall clock, pid, and a per-process counter, stirred through a finalizer
/// so consecutive calls land far apart.
pub fn entropy_seed() -> u64 {
    let nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(std::process::id());
    let sequence = SEED_SEQUENCE.fetch_add(1, Ordering::Relaxed);

    mix((nanos as u64) ^ ((nanos >> 64) as u64) ^ pid.rotate_left(17) ^ sequence.rotate_left(7))
}

/// Accepts `--seed N` and `--seed=N`; a repeated flag is an error rather
/// than a silent override.
pub fn resolve_seed(args: &[String], fallback: u64) -> Result<SeedChoice, String> {
    let mut explicit = None;
    let mut remaining = args.iter().skip(1);

    while let Some(argument) = remaining.next() {
        let value = if argument == "--seed" {
            match remaining.next() {
                Some(value) => value.as_str(),
                None => return Err("missing value for --seed".to_string()),
            }
        } else if let Some(value) = argument.strip_prefix("--seed=") {
            value
        } else {
            continue;
        };

        if explicit.is_some() {
            return Err("--seed given more than once".to_string());
        }
        explicit = Some(
            value
                .parse::<u64>()
                .map_err(|_| format!("seed '{value}' is not an unsigned number"))?,
        );
    }

    Ok(match explicit {
        Some(seed) => SeedChoice::Explicit(seed),
        None => SeedChoice::Generated(fallback),
    })
}

fn mix(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
