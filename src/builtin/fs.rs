use super::for_each_arg;
use crate::command::{ExitCode, Invocation};
use crate::lexer::Line;
use crate::sys;
use anyhow::{Context, Result, bail};
use flate2::bufread::{MultiGzDecoder, ZlibDecoder};
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::os::unix::fs::{DirBuilderExt, MetadataExt};
use std::path::Path;

/// Chunk size used when streaming file contents.
const CHUNK: usize = 4096;

pub(super) fn ls(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let Some(first) = args.next_token() else {
        let cwd = inv.env.current_dir.clone();
        list_dir(&cwd, ".", &mut *inv.out)?;
        return Ok(0);
    };
    let Some(second) = args.next_token() else {
        list_dir(&inv.env.resolve(first), first, &mut *inv.out)?;
        return Ok(0);
    };

    for (i, path) in [first, second].into_iter().chain(args).enumerate() {
        if i > 0 {
            writeln!(inv.out)?;
        }
        writeln!(inv.out, "{path}:")?;
        list_dir(&inv.env.resolve(path), path, &mut *inv.out)?;
    }
    Ok(0)
}

/// Print the sorted entries of `dir`, one per line, directories marked with `/`.
fn list_dir<W: Write + ?Sized>(dir: &Path, shown: &str, out: &mut W) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("ls: {shown}"))?
        .map(|entry| {
            let entry = entry?;
            let is_dir = entry.file_type()?.is_dir();
            Ok((entry.file_name(), is_dir))
        })
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("ls: {shown}"))?;
    entries.sort();

    for (name, is_dir) in entries {
        let marker = if is_dir { "/" } else { "" };
        writeln!(out, "{}{marker}", name.to_string_lossy())?;
    }
    Ok(())
}

pub(super) fn stat(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    for path in args {
        let meta = fs::metadata(inv.env.resolve(path)).with_context(|| format!("stat: {path}"))?;
        let owner = sys::user_name(meta.uid()).unwrap_or_else(|| meta.uid().to_string());
        let group = sys::group_name(meta.gid()).unwrap_or_else(|| meta.gid().to_string());
        writeln!(inv.out, "{path}: {:04o} {owner} {group}", meta.mode() & 0o7777)?;
    }
    Ok(0)
}

pub(super) fn pwd(_args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let cwd = fs::canonicalize(&inv.env.current_dir).with_context(|| {
        format!("pwd: {}", inv.env.current_dir.display())
    })?;
    writeln!(inv.out, "{}", cwd.display())?;
    Ok(0)
}

pub(super) fn cat(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    for path in args {
        let file = fs::File::open(inv.env.resolve(path)).with_context(|| format!("cat: {path}"))?;
        copy_chunked(file, &mut *inv.out).with_context(|| format!("cat: {path}"))?;
    }
    inv.out.flush()?;
    Ok(0)
}

pub(super) fn zcat(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    for path in args {
        let file = fs::File::open(inv.env.resolve(path)).with_context(|| format!("zcat: {path}"))?;
        let mut input = BufReader::with_capacity(CHUNK, file);
        let gzip = input
            .fill_buf()
            .with_context(|| format!("zcat: {path}"))?
            .starts_with(&[0x1f, 0x8b]);
        let result = if gzip {
            copy_chunked(MultiGzDecoder::new(input), &mut *inv.out)
        } else {
            copy_chunked(ZlibDecoder::new(input), &mut *inv.out)
        };
        result.with_context(|| format!("zcat: {path}"))?;
    }
    inv.out.flush()?;
    Ok(0)
}

/// Stream `input` to `out` in [`CHUNK`]-sized pieces.
fn copy_chunked<W: Write + ?Sized>(mut input: impl Read, out: &mut W) -> std::io::Result<()> {
    let mut buf = [0u8; CHUNK];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        out.write_all(&buf[..n])?;
    }
}

pub(super) fn cd(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let target = args.next_token().unwrap_or("/");
    let new_dir = fs::canonicalize(inv.env.resolve(target)).with_context(|| format!("cd: {target}"))?;
    if !new_dir.is_dir() {
        bail!("cd: {target}: Not a directory");
    }
    std::env::set_current_dir(&new_dir).with_context(|| format!("cd: {target}"))?;
    log::debug!("working directory is now {}", new_dir.display());
    inv.env.current_dir = new_dir;
    Ok(0)
}

pub(super) fn rm(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let env = &*inv.env;
    for_each_arg(args, inv.err, |path| {
        fs::remove_file(env.resolve(path)).with_context(|| format!("rm: {path}"))
    })
}

pub(super) fn rmdir(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let env = &*inv.env;
    for_each_arg(args, inv.err, |path| {
        fs::remove_dir(env.resolve(path)).with_context(|| format!("rmdir: {path}"))
    })
}

pub(super) fn mkdir(args: &mut Line<'_>, inv: &mut Invocation<'_>) -> Result<ExitCode> {
    let env = &*inv.env;
    let mut builder = fs::DirBuilder::new();
    builder.mode(0o755);
    for_each_arg(args, inv.err, |path| {
        builder
            .create(env.resolve(path))
            .with_context(|| format!("mkdir: {path}"))
    })
}
