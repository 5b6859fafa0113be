use super::for_each_arg;
use crate::command::{ExitCode, Invocation};
use crate::lexer::Line;
use anyhow::{Context, Result, anyhow, bail};
use std::io::Write;

/// Lists variables on the diagnostic stream, not the output target.
pub(super) fn env(_args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    for (key, value) in &inv.env.vars {
        writeln!(inv.err, "{key}={value}")?;
    }
    Ok(0)
}

pub(super) fn get(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let Invocation { out, err, env } = inv;
    for_each_arg(args, &mut **err, |key| {
        let value = env
            .get_var(key)
            .ok_or_else(|| anyhow!("get: {key}: no such variable"))?;
        writeln!(out, "{value}")?;
        Ok(())
    })
}

pub(super) fn set(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    while let Some(key) = args.next_token() {
        let Some(value) = args.next_token() else {
            bail!("set: {key}: missing value");
        };
        inv.env.set_var(key, value).context("set")?;
    }
    Ok(0)
}

pub(super) fn unset(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let env = &mut *inv.env;
    for_each_arg(args, inv.err, |key| env.unset_var(key).context("unset"))
}
