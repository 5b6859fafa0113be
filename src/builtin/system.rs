use crate::command::{ExitCode, Invocation};
use crate::lexer::Line;
use crate::sys;
use anyhow::{Context, Result};

#[cfg(target_os = "linux")]
pub(super) fn mount(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    use crate::mount_flags;
    use anyhow::anyhow;

    let source = args
        .next_token()
        .ok_or_else(|| anyhow!("mount: missing source"))?;
    let target = args
        .next_token()
        .ok_or_else(|| anyhow!("mount: missing target"))?;
    let fstype = args.next_token();
    let flags = match args.next_token() {
        Some(list) => mount_flags::parse(list).context("mount")?,
        None => 0,
    };
    let data = args.next_token();

    log::debug!("mount {source} on {target} type {fstype:?} flags {flags:#x}");
    sys::mount(source, &inv.env.resolve(target), fstype, flags, data)
        .with_context(|| format!("mount: {source} on {target}"))?;
    Ok(0)
}

#[cfg(target_os = "linux")]
pub(super) fn umount(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let env = &*inv.env;
    super::for_each_arg(args, inv.err, |target| {
        sys::umount(&env.resolve(target)).with_context(|| format!("umount: {target}"))
    })
}

#[cfg(target_os = "linux")]
pub(super) fn reboot(_args: &mut Line<'_>, _inv: &mut Invocation<'_>) -> Result<ExitCode> {
    sys::reboot().context("reboot")?;
    Ok(0)
}

#[cfg(not(target_os = "linux"))]
pub(super) fn mount(_args: &mut Line<'_>, _inv: &mut Invocation<'_>) -> Result<ExitCode> {
    anyhow::bail!("mount: not supported on this platform")
}

#[cfg(not(target_os = "linux"))]
pub(super) fn umount(_args: &mut Line<'_>, _inv: &mut Invocation<'_>) -> Result<ExitCode> {
    anyhow::bail!("umount: not supported on this platform")
}

#[cfg(not(target_os = "linux"))]
pub(super) fn reboot(_args: &mut Line<'_>, _inv: &mut Invocation<'_>) -> Result<ExitCode> {
    anyhow::bail!("reboot: not supported on this platform")
}

pub(super) fn uname(_args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let uts = sys::uname().context("uname")?;
    writeln!(
        inv.out,
        "{} {} {} {} {}",
        uts.sysname, uts.nodename, uts.release, uts.version, uts.machine
    )?;
    Ok(0)
}
