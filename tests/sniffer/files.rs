use crate::common::fixtures;
use crate::common::test_utils::{builtin_engine_for, create_temp_file, write_file};
use mimemagic::sniffer::{
    MIME_BINARY_UNREADABLE, MIME_BINARY_ZEROSIZE, MIME_INODE_DIR, MIME_INODE_LINK,
    MIME_INODE_LINK_BROKEN,
};
use mimemagic::{MagicConfig, MagicResult, MimeMagic};
use std::fs;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

#[cfg(unix)]
fn following_engine() -> MimeMagic {
    MimeMagic::builtin_with_config(MagicConfig {
        follow_links: true,
        ..Default::default()
    })
}

#[test]
fn zero_length_file() {
    let magic = MimeMagic::builtin();
    let file = create_temp_file(b"");
    let result = magic.classify_file(file.path());
    assert_eq!(result.mime_type, MIME_BINARY_ZEROSIZE);
    assert_eq!(result.accuracy, 100);
}

#[test]
fn missing_file_is_unreadable() {
    let magic = MimeMagic::builtin();
    let dir = TempDir::new().unwrap();
    let result = magic.classify_file(dir.path().join("does-not-exist"));
    assert_eq!(result, MagicResult::new(MIME_BINARY_UNREADABLE, 0));
}

#[cfg(unix)]
#[test]
fn file_that_cannot_be_opened_is_unreadable() {
    use std::os::unix::fs::PermissionsExt;

    let magic = MimeMagic::builtin();
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "secret.bin", b"\x89PNG\r\n\x1a\n");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::File::open(&path).is_ok() {
        // running with privileges that ignore permissions
        return;
    }
    assert_eq!(
        magic.classify_file(&path),
        MagicResult::certain(MIME_BINARY_UNREADABLE)
    );
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
}

#[test]
fn directory() {
    let magic = MimeMagic::builtin();
    let dir = TempDir::new().unwrap();
    assert_eq!(
        magic.classify_file(dir.path()),
        MagicResult::certain(MIME_INODE_DIR)
    );
}

#[cfg(unix)]
#[test]
fn locked_directory() {
    use mimemagic::sniffer::MIME_INODE_DIR_LOCKED;
    use std::os::unix::fs::PermissionsExt;

    let magic = MimeMagic::builtin();
    let dir = TempDir::new().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    let readable = fs::read_dir(&locked).is_ok();
    let result = magic.classify_file(&locked);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
    if readable {
        return;
    }
    assert_eq!(result.mime_type, MIME_INODE_DIR_LOCKED);
}

#[test]
fn content_of_regular_files() {
    let dir = TempDir::new().unwrap();
    let magic = builtin_engine_for(dir.path());

    let png = write_file(&dir, "image", fixtures::PNG);
    assert_eq!(
        magic.classify_file(&png).into_parts(),
        ("image/png".to_string(), 100)
    );

    let java = write_file(&dir, "Hello.java", fixtures::JAVA_SOURCE);
    assert_eq!(magic.classify_file(&java), MagicResult::new("text/x-java", 60));

    let c = write_file(&dir, "point.c", fixtures::C_SOURCE);
    assert_eq!(magic.classify_file(&c).mime_type, "text/x-csrc");
    let h = write_file(&dir, "point.h", fixtures::C_SOURCE);
    assert_eq!(magic.classify_file(&h).mime_type, "text/x-chdr");

    let so = write_file(&dir, "libdemo.so.1", &fixtures::elf_header(3));
    assert_eq!(magic.classify_file(&so).mime_type, "application/x-sharedlib");
    let exe = write_file(&dir, "demo", &fixtures::elf_header(3));
    assert_eq!(magic.classify_file(&exe).mime_type, "application/x-executable");
}

#[test]
fn id3_tag_is_skipped_for_files() {
    let dir = TempDir::new().unwrap();
    let magic = builtin_engine_for(dir.path());

    let ogg = write_file(&dir, "song", &fixtures::id3_tagged(100, b"OggS\0\x02"));
    assert_eq!(magic.classify_file(&ogg).mime_type, "application/ogg");

    let only_tag = write_file(&dir, "tag-only", &fixtures::id3_tagged(100, b""));
    assert_eq!(
        magic.classify_file(&only_tag),
        MagicResult::certain(MIME_BINARY_ZEROSIZE)
    );
}

#[test]
fn only_the_window_is_read() {
    let dir = TempDir::new().unwrap();
    let mut content = vec![b'a'; 100];
    content.push(b'\n');
    content.resize(10_000, b'b');
    content.extend_from_slice(&[0xFFu8; 16]);
    let path = write_file(&dir, "long.txt", &content);

    // the non-ASCII tail lies beyond the 4000 byte window
    let magic = MimeMagic::builtin();
    assert_eq!(magic.classify_file(&path), MagicResult::new("text/plain", 90));
}

#[cfg(unix)]
#[test]
fn symlinks() {
    use std::os::unix::fs::symlink;

    let dir = TempDir::new().unwrap();
    write_file(&dir, "picture", fixtures::PNG);
    let link = dir.path().join("link");
    symlink("picture", &link).unwrap();
    let broken = dir.path().join("broken");
    symlink("nowhere", &broken).unwrap();

    // links are reported as links unless following is switched on
    let not_following = MimeMagic::builtin();
    assert_eq!(
        not_following.classify_file(&link),
        MagicResult::certain(MIME_INODE_LINK)
    );
    assert_eq!(
        not_following.classify_file(&broken).mime_type,
        MIME_INODE_LINK_BROKEN
    );

    let following = following_engine();
    assert_eq!(following.classify_file(&link).mime_type, "image/png");
    assert_eq!(
        following.classify_file(&broken).mime_type,
        MIME_INODE_LINK_BROKEN
    );
}

#[cfg(unix)]
#[test]
fn long_symlink_chains_stop_at_link() {
    use std::os::unix::fs::symlink;

    let dir = TempDir::new().unwrap();
    write_file(&dir, "l0", fixtures::PNG);
    for i in 1..=20 {
        symlink(format!("l{}", i - 1), dir.path().join(format!("l{}", i))).unwrap();
    }
    let magic = following_engine();
    assert_eq!(magic.classify_file(dir.path().join("l5")).mime_type, "image/png");
    assert_eq!(
        magic.classify_file(dir.path().join("l20")).mime_type,
        MIME_INODE_LINK
    );
}

#[test]
fn access_time_is_left_alone_in_subdirectories() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("nested");
    fs::create_dir(&sub).unwrap();
    let path = sub.join("note.txt");
    fs::write(&path, b"remember the milk\n").unwrap();
    let earlier = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_times(fs::FileTimes::new().set_accessed(earlier).set_modified(earlier))
        .unwrap();

    let magic = builtin_engine_for(dir.path());
    assert!(!magic.config().restores_access_time(&path));
    assert_eq!(magic.classify_file(&path).mime_type, "text/plain");
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), earlier);
}

#[test]
fn access_time_is_restored_under_configured_dirs() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "note.txt", b"remember the milk\n");
    let earlier = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
    fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_times(fs::FileTimes::new().set_accessed(earlier).set_modified(earlier))
        .unwrap();

    let magic = builtin_engine_for(dir.path());
    assert_eq!(magic.classify_file(&path).mime_type, "text/plain");

    let meta = fs::metadata(&path).unwrap();
    assert_eq!(meta.accessed().unwrap(), earlier);
    assert_eq!(meta.modified().unwrap(), earlier);
}
