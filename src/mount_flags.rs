//! Mount option names and the bits they stand for.

/// Bitmask passed to the mount primitive.
pub type MountFlags = u64;

/// Name to bit mapping understood by `mount`.
#[cfg(target_os = "linux")]
pub static MOUNT_FLAGS: &[(&str, MountFlags)] = &[
    ("rdonly", libc::MS_RDONLY as MountFlags),
    ("nosuid", libc::MS_NOSUID as MountFlags),
    ("nodev", libc::MS_NODEV as MountFlags),
    ("noexec", libc::MS_NOEXEC as MountFlags),
    ("sync", libc::MS_SYNCHRONOUS as MountFlags),
    ("remount", libc::MS_REMOUNT as MountFlags),
    ("mandlock", libc::MS_MANDLOCK as MountFlags),
    ("dirsync", libc::MS_DIRSYNC as MountFlags),
    ("noatime", libc::MS_NOATIME as MountFlags),
    ("nodiratime", libc::MS_NODIRATIME as MountFlags),
    ("bind", libc::MS_BIND as MountFlags),
    ("move", libc::MS_MOVE as MountFlags),
    ("rec", libc::MS_REC as MountFlags),
    ("silent", libc::MS_SILENT as MountFlags),
    ("unbindable", libc::MS_UNBINDABLE as MountFlags),
    ("private", libc::MS_PRIVATE as MountFlags),
    ("slave", libc::MS_SLAVE as MountFlags),
    ("shared", libc::MS_SHARED as MountFlags),
    ("relatime", libc::MS_RELATIME as MountFlags),
    ("strictatime", libc::MS_STRICTATIME as MountFlags),
];

#[cfg(not(target_os = "linux"))]
pub static MOUNT_FLAGS: &[(&str, MountFlags)] = &[];

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MountFlagError {
    #[error("unknown mount flag '{0}'")]
    Unknown(String),
}

/// Look up a single flag by name.
pub fn lookup(name: &str) -> Option<MountFlags> {
    MOUNT_FLAGS
        .iter()
        .find(|(flag, _)| *flag == name)
        .map(|&(_, bits)| bits)
}

/// Parse a comma-separated flag list such as `rdonly,noexec`.
///
/// Empty segments are skipped. One unknown name rejects the whole list.
pub fn parse(list: &str) -> Result<MountFlags, MountFlagError> {
    list.split(',')
        .filter(|name| !name.is_empty())
        .try_fold(0, |acc, name| {
            lookup(name)
                .map(|bits| acc | bits)
                .ok_or_else(|| MountFlagError::Unknown(name.to_owned()))
        })
}
