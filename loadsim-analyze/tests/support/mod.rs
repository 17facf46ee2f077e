//! Fake stress binaries for exercising the process worker without building
//! `loadsim-stress`.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

/// Prints a comma separated table with one row per requested second, instantly.
pub const FAST_TABLE: &str = r#"
printf 'Throughput (ops/s),Latency (ms)\n'
i=0
while [ "$i" -lt "$1" ]; do
    echo "$((i * 10)),$i"
    i=$((i + 1))
done
"#;

pub const EXIT_FOUR: &str = "echo boom >&2\nexit 4\n";

pub const NO_HEADER: &str = "echo hello\n";

pub const HEADER_ONLY: &str = "printf 'Throughput (ops/s),Latency (ms)\\n'\n";

/// Like [`FAST_TABLE`] but fails when asked to run for three seconds.
pub const FAIL_ON_THREE: &str = r#"
if [ "$1" = 3 ]; then
    echo "refusing to run for 3s" >&2
    exit 9
fi
printf 'Throughput (ops/s),Latency (ms)\n'
i=0
while [ "$i" -lt "$1" ]; do
    echo "$i,$i"
    i=$((i + 1))
done
"#;

/// Write `body` as an executable `/bin/sh` script inside `dir`.
pub fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}
