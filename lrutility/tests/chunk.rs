use std::{fs, io::Read as _};

use lrutility::chunk::{ChunkError, chunk_directory};

fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

fn entries(archive: &std::path::Path) -> Vec<(String, Vec<u8>)> {
    let file = fs::File::open(archive).expect("archive exists");
    let mut zip = zip::ZipArchive::new(file).expect("valid zip");

    (0..zip.len())
        .map(|i| {
            let mut entry = zip.by_index(i).expect("entry");
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).expect("readable entry");
            (entry.name().to_owned(), contents)
        })
        .collect()
}

#[test]
fn packs_files_into_numbered_archives() {
    logger();

    let parent = tempfile::tempdir().expect("temp dir");
    let shoot = parent.path().join("shoot");
    fs::create_dir(&shoot).expect("create dir");

    fs::write(shoot.join("a.ARW"), [1_u8; 5]).expect("write");
    fs::write(shoot.join("b.ARW"), [2_u8; 5]).expect("write");
    fs::write(shoot.join("c.ARW"), [3_u8; 5]).expect("write");

    // nested folders aren't packed
    fs::create_dir(shoot.join("exports")).expect("create dir");
    fs::write(shoot.join("exports/d.jpg"), [4_u8; 5]).expect("write");

    let archives = chunk_directory(&shoot, 10).expect("directory exists");

    assert_eq!(
        archives,
        vec![
            parent.path().join("shoot_1.zip"),
            parent.path().join("shoot_2.zip")
        ]
    );

    assert_eq!(
        entries(&archives[0]),
        vec![
            ("a.ARW".to_owned(), vec![1; 5]),
            ("b.ARW".to_owned(), vec![2; 5])
        ]
    );
    assert_eq!(entries(&archives[1]), vec![("c.ARW".to_owned(), vec![3; 5])]);
}

#[test]
fn empty_directory_makes_no_archives() {
    logger();

    let parent = tempfile::tempdir().expect("temp dir");
    let empty = parent.path().join("empty");
    fs::create_dir(&empty).expect("create dir");

    assert!(chunk_directory(&empty, 10).expect("exists").is_empty());
    assert_eq!(
        fs::read_dir(parent.path()).expect("listable").count(),
        1,
        "nothing written next to the folder"
    );
}

#[test]
fn missing_directory() {
    logger();

    let parent = tempfile::tempdir().expect("temp dir");
    let err = chunk_directory(parent.path().join("nope"), 10).expect_err("doesn't exist");

    assert!(matches!(err, ChunkError::MissingDirectory { .. }));
}
