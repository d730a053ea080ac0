// Fri Oct 16 2026 - Alex

use crate::catalog::{ForeignAbi, TypeCatalog};
use crate::source::{SourceDecl, SourceField};
use crate::structure::{LayoutBuilder, LayoutDescriptor, ReferenceLayout, StructureError};

/// `KNC_STRSIZE`, the netconfig protocol name buffer.
pub const KNC_STRSIZE: usize = 128;
/// `SYS_NMLN`, the utsname string length.
pub const SYS_NMLN: usize = 257;
/// Lookups, reads, writes.
pub const NFS_CALLTYPES: usize = 3;

/// A raw kstat whose data is a single C struct.
#[derive(Debug, Clone)]
pub struct KstatLayout {
    /// `module:instance:name` as kstat(1) prints it.
    pub kstat: &'static str,
    pub decl: SourceDecl,
    /// Names for anonymous nested structs, by field path.
    pub renames: Vec<(&'static str, &'static str)>,
    /// `sizeof` on solaris-amd64, as cgo reported it.
    pub amd64_size: u64,
    pub amd64_offsets: &'static [(&'static str, u64)],
}

impl KstatLayout {
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn build(&self, catalog: &TypeCatalog) -> Result<LayoutDescriptor, StructureError> {
        LayoutBuilder::new(catalog)
            .with_renames(self.renames.iter().copied())
            .build(&self.decl)
    }

    /// Compiled size on `abi`, with field offsets where they were recorded.
    pub fn reference(&self, abi: ForeignAbi) -> Option<ReferenceLayout> {
        match abi {
            ForeignAbi::SolarisAmd64 if self.amd64_offsets.is_empty() => {
                Some(ReferenceLayout::size_only(self.amd64_size))
            }
            ForeignAbi::SolarisAmd64 => Some(ReferenceLayout::with_offsets(
                self.amd64_size,
                self.amd64_offsets.iter().copied(),
            )),
            ForeignAbi::SolarisI386 | ForeignAbi::SolarisSparcv9 => None,
        }
    }
}

/// `offsetof` for every `mntinfo_kstat` field on solaris-amd64.
const MNTINFO_AMD64_OFFSETS: &[(&str, u64)] = &[
    ("mik_proto", 0),
    ("mik_vers", 128),
    ("mik_flags", 132),
    ("mik_secmod", 136),
    ("mik_curread", 140),
    ("mik_curwrite", 144),
    ("mik_timeo", 148),
    ("mik_retrans", 152),
    ("mik_acregmin", 156),
    ("mik_acregmax", 160),
    ("mik_acdirmin", 164),
    ("mik_acdirmax", 168),
    ("mik_timers", 172),
    ("mik_noresponse", 220),
    ("mik_failover", 224),
    ("mik_remap", 228),
    ("mik_curserver", 232),
];

pub fn builtin_layouts() -> Vec<KstatLayout> {
    vec![mntinfo_kstat(), kstat_io(), sysinfo(), vminfo(), var()]
}

pub fn find_layout(name: &str) -> Option<KstatLayout> {
    builtin_layouts()
        .into_iter()
        .find(|layout| layout.name() == name || layout.kstat == name)
}

fn scalars(names: &[&str], type_name: &str) -> Vec<SourceField> {
    names.iter().map(|name| SourceField::scalar(*name, type_name)).collect()
}

/// `struct mntinfo_kstat`, the read-only part of an NFS mount's mntinfo.
/// `mik_timers` is an anonymous struct in the kernel header.
pub fn mntinfo_kstat() -> KstatLayout {
    let mut fields = vec![
        SourceField::scalar("mik_proto", "char").array(KNC_STRSIZE),
        SourceField::scalar("mik_vers", "uint32_t"),
        SourceField::scalar("mik_flags", "uint_t"),
        SourceField::scalar("mik_secmod", "uint_t"),
        SourceField::scalar("mik_curread", "uint32_t"),
        SourceField::scalar("mik_curwrite", "uint32_t"),
        SourceField::scalar("mik_timeo", "int"),
        SourceField::scalar("mik_retrans", "int"),
    ];
    fields.extend(scalars(&["mik_acregmin", "mik_acregmax", "mik_acdirmin", "mik_acdirmax"], "uint_t"));
    fields.push(
        SourceField::anonymous("mik_timers", scalars(&["srtt", "deviate", "rtxcur"], "uint32_t"))
            .array(NFS_CALLTYPES + 1),
    );
    fields.extend(scalars(&["mik_noresponse", "mik_failover", "mik_remap"], "uint32_t"));
    fields.push(SourceField::scalar("mik_curserver", "char").array(SYS_NMLN));

    KstatLayout {
        kstat: "nfs:*:mntinfo",
        decl: SourceDecl::new("mntinfo_kstat", fields),
        renames: vec![("mik_timers", "mnti_timer")],
        amd64_size: 0x1ec,
        amd64_offsets: MNTINFO_AMD64_OFFSETS,
    }
}

/// `kstat_io_t`, the disk IO kstat.
pub fn kstat_io() -> KstatLayout {
    let mut fields = scalars(&["nread", "nwritten"], "u_longlong_t");
    fields.extend(scalars(&["reads", "writes"], "uint_t"));
    fields.extend(scalars(
        &["wtime", "wlentime", "wlastupdate", "rtime", "rlentime", "rlastupdate"],
        "hrtime_t",
    ));
    fields.extend(scalars(&["wcnt", "rcnt"], "uint_t"));

    KstatLayout {
        kstat: "sd:*:sd*",
        decl: SourceDecl::new("kstat_io", fields),
        renames: Vec::new(),
        amd64_size: 0x50,
        amd64_offsets: &[],
    }
}

/// `sysinfo_t` from `unix:0:sysinfo`.
pub fn sysinfo() -> KstatLayout {
    KstatLayout {
        kstat: "unix:0:sysinfo",
        decl: SourceDecl::new(
            "sysinfo",
            scalars(&["updates", "runque", "runocc", "swpque", "swpocc", "waiting"], "uint_t"),
        ),
        renames: Vec::new(),
        amd64_size: 0x18,
        amd64_offsets: &[],
    }
}

/// `vminfo_t` from `unix:0:vminfo`.
pub fn vminfo() -> KstatLayout {
    KstatLayout {
        kstat: "unix:0:vminfo",
        decl: SourceDecl::new(
            "vminfo",
            scalars(
                &["freemem", "swap_resv", "swap_alloc", "swap_avail", "swap_free", "updates"],
                "uint64_t",
            ),
        ),
        renames: Vec::new(),
        amd64_size: 0x30,
        amd64_offsets: &[],
    }
}

/// `struct var` from `unix:0:var`.
pub fn var() -> KstatLayout {
    KstatLayout {
        kstat: "unix:0:var",
        decl: SourceDecl::new(
            "var",
            scalars(
                &[
                    "v_buf", "v_call", "v_proc", "v_maxupttl", "v_nglobpris", "v_maxsyspri", "v_clist", "v_maxup",
                    "v_hbuf", "v_hmask", "v_pbuf", "v_sptmap", "v_maxpmem", "v_autoup", "v_bufhwm",
                ],
                "int",
            ),
        ),
        renames: Vec::new(),
        amd64_size: 0x3c,
        amd64_offsets: &[],
    }
}
