// Fri Oct 16 2026 - Alex

//! Built-in Solaris kstat structs, with the sizes the compiler reports.

pub mod layouts;
pub mod mirrors;

pub use layouts::{
    builtin_layouts, find_layout, kstat_io, mntinfo_kstat, sysinfo, var, vminfo, KstatLayout, KNC_STRSIZE, NFS_CALLTYPES, SYS_NMLN,
};
pub use mirrors::{Io, Mntinfo, MntiTimer, Sysinfo, Var, Vminfo};
