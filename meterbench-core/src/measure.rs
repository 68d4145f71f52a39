//! Low-level measurement primitives
//!
//! Cycle counter access (RDTSCP on x86_64, CNTVCT_EL0 on AArch64) and CPU
//! pinning. Probes build on these; nothing here knows about benchmarks.

/// Read the CPU cycle/tick counter.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
pub(crate) fn read_cycles() -> u64 {
    // SAFETY: RDTSCP is available on every x86_64 CPU since ~2006 and waits
    // for all prior instructions to retire before reading the counter.
    unsafe {
        let mut aux: u32 = 0;
        std::arch::x86_64::__rdtscp(&mut aux)
    }
}

/// Read the virtual counter timer on AArch64.
#[cfg(target_arch = "aarch64")]
#[inline(always)]
pub(crate) fn read_cycles() -> u64 {
    let cnt: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 on all AArch64 implementations.
    unsafe {
        std::arch::asm!("mrs {}, cntvct_el0", out(reg) cnt, options(nostack, nomem));
    }
    cnt
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
pub(crate) fn read_cycles() -> u64 {
    0
}

/// Whether this platform provides a hardware cycle counter.
///
/// When `false`, [`CycleProbe`](crate::CycleProbe) records missing samples.
pub const HAS_CYCLE_COUNTER: bool = cfg!(target_arch = "x86_64") || cfg!(target_arch = "aarch64");

/// Pin the current thread to one CPU core.
///
/// Keeps the measured thread off core migrations, which both disturb caches
/// and make cycle counts incomparable.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    // SAFETY: cpu_set_t is plain data; zeroed is a valid empty set and the
    // size passed to sched_setaffinity matches the set we hand over.
    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        libc::CPU_ZERO(set_ref);
        libc::CPU_SET(cpu, set_ref);

        let result = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), set_ref);

        if result == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// CPU pinning is not supported here; always succeeds.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    Ok(())
}
