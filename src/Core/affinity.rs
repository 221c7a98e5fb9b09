use std::io;

/// Number of cores the process may run on; falls back to 1.
pub fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Pin the calling thread to `core`.
#[cfg(target_os = "linux")]
pub fn pin_current_thread(core: usize) -> io::Result<()> {
    use std::mem;

    if core >= libc::CPU_SETSIZE as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("core {core} exceeds CPU_SETSIZE"),
        ));
    }

    unsafe {
        let mut set: libc::cpu_set_t = mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(core, &mut set);

        // pid 0 targets the calling thread
        if libc::sched_setaffinity(0, mem::size_of::<libc::cpu_set_t>(), &set) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn pin_current_thread(_core: usize) -> io::Result<()> {
    // Fallback for non-Linux: leave scheduling to the OS
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "thread pinning only supported on Linux",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_at_least_one_core() {
        assert!(available_cores() >= 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn pins_to_the_core_it_runs_on() {
        // Runs on a throwaway thread so the test harness thread keeps its mask
        let res = std::thread::spawn(|| {
            let core = unsafe { libc::sched_getcpu() };
            assert!(core >= 0);
            pin_current_thread(core as usize)
        })
        .join()
        .unwrap();
        assert!(res.is_ok(), "pinning failed: {res:?}");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn rejects_core_beyond_set_size() {
        let err = pin_current_thread(libc::CPU_SETSIZE as usize).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
