use assert_cmd::cargo::cargo_bin;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Deterministic pseudo-random bytes (xorshift).
fn noise(len: usize, mut seed: u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            (seed >> 3) as u8
        })
        .collect()
}

fn pincopy(args: &[&std::ffi::OsStr]) -> Output {
    let out = Command::new(cargo_bin("pincopy"))
        .args(args)
        .output()
        .expect("spawn binary");
    eprintln!("=== STDERR ===\n{}", String::from_utf8_lossy(&out.stderr));
    out
}

fn run_copy(src: &Path, dst: &Path) -> Output {
    pincopy(&[src.as_os_str(), dst.as_os_str()])
}

#[test]
fn copies_2050_random_bytes_into_new_file() {
    let td = tempdir().unwrap();
    let src = td.path().join("input.bin");
    let dst = td.path().join("output.bin");
    let data = noise(2050, 0xdead_beef);
    fs::write(&src, &data).unwrap();

    let out = run_copy(&src, &dst);
    assert!(out.status.success());
    assert!(out.stdout.is_empty(), "stdout must stay empty");
    assert_eq!(fs::read(&dst).unwrap(), data);
    assert_eq!(fs::read(&src).unwrap(), data, "source must be unchanged");
}

#[test]
fn buffer_size_does_not_change_result() {
    let td = tempdir().unwrap();
    let src = td.path().join("input.bin");
    let data = noise(2050, 17);
    fs::write(&src, &data).unwrap();

    for size in ["1", "13", "1024", "2050", "65536"] {
        let dst = td.path().join(format!("out_{size}"));
        let out = pincopy(&[
            "--buffer-size".as_ref(),
            size.as_ref(),
            src.as_os_str(),
            dst.as_os_str(),
        ]);
        assert!(out.status.success(), "buffer size {size}");
        assert_eq!(fs::read(&dst).unwrap(), data, "buffer size {size}");
    }
}

#[test]
fn zero_buffer_size_is_rejected() {
    let td = tempdir().unwrap();
    let src = td.path().join("a");
    fs::write(&src, "x").unwrap();
    let dst = td.path().join("b");

    let out = pincopy(&[
        "--buffer-size".as_ref(),
        "0".as_ref(),
        src.as_os_str(),
        dst.as_os_str(),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dst.exists());
}

#[test]
fn existing_destination_is_truncated() {
    let td = tempdir().unwrap();
    let src = td.path().join("short.txt");
    let dst = td.path().join("long.txt");
    fs::write(&src, "tiny").unwrap();
    fs::write(&dst, "x".repeat(5000)).unwrap();

    let out = run_copy(&src, &dst);
    assert!(out.status.success());
    assert_eq!(fs::read_to_string(&dst).unwrap(), "tiny");
}

#[test]
fn empty_source_yields_empty_destination() {
    let td = tempdir().unwrap();
    let src = td.path().join("empty");
    let dst = td.path().join("copy");
    fs::write(&src, b"").unwrap();
    fs::write(&dst, "stale").unwrap();

    let out = run_copy(&src, &dst);
    assert!(out.status.success());
    assert_eq!(fs::metadata(&dst).unwrap().len(), 0);
}

#[test]
fn repeated_copy_is_idempotent() {
    let td = tempdir().unwrap();
    let src = td.path().join("a");
    let dst = td.path().join("b");
    let data = noise(4097, 99);
    fs::write(&src, &data).unwrap();

    for _ in 0..3 {
        assert!(run_copy(&src, &dst).status.success());
        assert_eq!(fs::read(&dst).unwrap(), data);
    }
}

#[test]
fn relative_paths_resolve_against_working_directory() {
    let td = tempdir().unwrap();
    fs::create_dir(td.path().join("sub")).unwrap();
    fs::write(td.path().join("here.txt"), "relative").unwrap();

    let out = Command::new(cargo_bin("pincopy"))
        .current_dir(td.path())
        .args(["here.txt", "sub/there.txt"])
        .output()
        .expect("spawn binary");
    assert!(out.status.success());
    assert_eq!(
        fs::read_to_string(td.path().join("sub/there.txt")).unwrap(),
        "relative"
    );
}

#[test]
fn new_destination_uses_requested_mode() {
    let td = tempdir().unwrap();
    let src = td.path().join("a");
    let dst = td.path().join("b");
    fs::write(&src, "secret").unwrap();

    let out = pincopy(&[
        "--mode".as_ref(),
        "600".as_ref(),
        src.as_os_str(),
        dst.as_os_str(),
    ]);
    assert!(out.status.success());
    let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn sync_flag_still_copies() {
    let td = tempdir().unwrap();
    let src = td.path().join("a");
    let dst = td.path().join("b");
    fs::write(&src, "flushed").unwrap();

    let out = pincopy(&["--sync".as_ref(), src.as_os_str(), dst.as_os_str()]);
    assert!(out.status.success());
    assert_eq!(fs::read_to_string(&dst).unwrap(), "flushed");
}
