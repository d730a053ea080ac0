// Fri Oct 16 2026 - Alex

//! Native mirrors of the built-in kstats for 64-bit Solaris.
//!
//! Written by hand in idiomatic Rust (`c_uint`, `[c_char; N]`, short
//! field names) rather than generated by `emit`. Their sizes match what
//! the layout builder computes for solaris-amd64, so callers on that
//! platform can copy raw kstat data straight into them.

use crate::decode::c_field_string;
use std::os::raw::{c_char, c_int, c_uint};

use super::layouts::{KNC_STRSIZE, NFS_CALLTYPES, SYS_NMLN};

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MntiTimer {
    pub srtt: u32,
    pub deviate: u32,
    pub rtxcur: u32,
}

/// `struct mntinfo_kstat`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Mntinfo {
    pub proto: [c_char; KNC_STRSIZE],
    pub vers: u32,
    pub flags: c_uint,
    pub secmod: c_uint,
    pub curread: u32,
    pub curwrite: u32,
    pub timeo: c_int,
    pub retrans: c_int,
    pub acregmin: c_uint,
    pub acregmax: c_uint,
    pub acdirmin: c_uint,
    pub acdirmax: c_uint,
    pub timers: [MntiTimer; NFS_CALLTYPES + 1],
    pub noresponse: u32,
    pub failover: u32,
    pub remap: u32,
    pub curserver: [c_char; SYS_NMLN],
}

impl Mntinfo {
    pub fn proto(&self) -> String {
        c_field_string(&as_bytes(&self.proto))
    }

    pub fn curserver(&self) -> String {
        c_field_string(&as_bytes(&self.curserver))
    }
}

fn as_bytes(chars: &[c_char]) -> Vec<u8> {
    chars.iter().map(|&c| c as u8).collect()
}

/// `kstat_io_t`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Io {
    pub nread: u64,
    pub nwritten: u64,
    pub reads: u32,
    pub writes: u32,
    pub wtime: i64,
    pub wlentime: i64,
    pub wlastupdate: i64,
    pub rtime: i64,
    pub rlentime: i64,
    pub rlastupdate: i64,
    pub wcnt: u32,
    pub rcnt: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Sysinfo {
    pub updates: u32,
    pub runque: u32,
    pub runocc: u32,
    pub swpque: u32,
    pub swpocc: u32,
    pub waiting: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Vminfo {
    pub freemem: u64,
    pub swap_resv: u64,
    pub swap_alloc: u64,
    pub swap_avail: u64,
    pub swap_free: u64,
    pub updates: u64,
}

/// `struct var`, the tunable kernel limits.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Var {
    pub v_buf: c_int,
    pub v_call: c_int,
    pub v_proc: c_int,
    pub v_maxupttl: c_int,
    pub v_nglobpris: c_int,
    pub v_maxsyspri: c_int,
    pub v_clist: c_int,
    pub v_maxup: c_int,
    pub v_hbuf: c_int,
    pub v_hmask: c_int,
    pub v_pbuf: c_int,
    pub v_sptmap: c_int,
    pub v_maxpmem: c_int,
    pub v_autoup: c_int,
    pub v_bufhwm: c_int,
}
