use std::fs;

use slot_io::{Call, Dispatcher, ErrorKind, Node, Outcome, RootResolver, Value, Verb};
use tempfile::{TempDir, tempdir};

fn dispatcher() -> (TempDir, Dispatcher) {
    let td = tempdir().expect("tempdir");
    let root = RootResolver::new(td.path()).expect("root resolver");
    (td, Dispatcher::local(root))
}

fn save(d: &Dispatcher, path: &str, content: &str) {
    d.invoke(
        Call::new(Verb::FileSave)
            .with_value(path)
            .with_child(Node::leaf(content)),
    )
    .expect("file.save");
}

fn exists(d: &Dispatcher, path: &str) -> bool {
    let o = d
        .invoke(Call::new(Verb::FileExists).with_value(path))
        .expect("file.exists");
    o.value == Some(Value::Bool(true))
}

fn load(d: &Dispatcher, path: &str) -> Outcome {
    d.invoke(Call::new(Verb::FileLoad).with_value(path))
        .expect("file.load")
}

#[test]
fn save_exists_load() {
    let (_td, d) = dispatcher();
    save(&d, "a.txt", "hello");
    assert!(exists(&d, "a.txt"));
    assert!(exists(&d, "/a.txt"), "leading slash names the same file");
    assert_eq!(load(&d, "a.txt").value, Some(Value::from("hello")));
}

#[test]
fn save_move_then_only_destination_exists() {
    let (_td, d) = dispatcher();
    save(&d, "a.txt", "x");
    d.invoke(
        Call::new(Verb::FileMove)
            .with_value("a.txt")
            .with_child(Node::leaf("b.txt")),
    )
    .expect("file.move");
    assert!(!exists(&d, "a.txt"));
    assert!(exists(&d, "b.txt"));
    assert_eq!(load(&d, "b.txt").value, Some(Value::from("x")));
}

#[test]
fn binary_content_round_trips_exactly() {
    let (td, d) = dispatcher();
    let bytes: Vec<u8> = (0..=255u8).rev().collect();
    d.invoke(
        Call::new(Verb::FileSaveBinary)
            .with_value("/blob.bin")
            .with_child(Node::leaf(bytes.clone())),
    )
    .unwrap();
    assert_eq!(fs::read(td.path().join("blob.bin")).unwrap(), bytes);
    let o = d
        .invoke(Call::new(Verb::FileLoadBinary).with_value("/blob.bin"))
        .unwrap();
    assert_eq!(o.value, Some(Value::Bytes(bytes)));
}

#[test]
fn last_write_wins() {
    let (_td, d) = dispatcher();
    save(&d, "/note.txt", "first version, longer");
    save(&d, "/note.txt", "second");
    assert_eq!(load(&d, "/note.txt").value, Some(Value::from("second")));
}

#[test]
fn text_save_refuses_binary_content() {
    let (_td, d) = dispatcher();
    let err = d
        .invoke(
            Call::new(Verb::FileSave)
                .with_value("/a.txt")
                .with_child(Node::leaf(vec![1u8, 2])),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    let err = d
        .invoke(Call::new(Verb::FileSave).with_value("/a.txt"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn copy_and_move_reject_same_path_in_any_spelling() {
    let (_td, d) = dispatcher();
    d.invoke(Call::new(Verb::FolderCreate).with_value("/dir"))
        .unwrap();
    save(&d, "/dir/a.txt", "keep");
    for verb in [Verb::FileCopy, Verb::FileMove] {
        for dst in [
            "/dir/a.txt",
            "dir/a.txt",
            "/dir/",
            "\\dir\\a.txt",
            "./dir/a.txt",
            "dir/./a.txt",
            "dir/sub/../a.txt",
            "/other/../dir/",
        ] {
            let err = d
                .invoke(Call::new(verb).with_value("/dir/a.txt").with_child(Node::leaf(dst)))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{verb} -> {dst}");
        }
    }
    assert_eq!(load(&d, "/dir/a.txt").value, Some(Value::from("keep")));
}

#[test]
fn dot_segments_never_destroy_the_source() {
    let (td, d) = dispatcher();
    save(&d, "a.txt", "precious");
    for (verb, dst) in [(Verb::FileCopy, "./a.txt"), (Verb::FileMove, "sub/../a.txt")] {
        let err = d
            .invoke(Call::new(verb).with_value("a.txt").with_child(Node::leaf(dst)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{verb} -> {dst}");
        assert_eq!(
            fs::read_to_string(td.path().join("a.txt")).unwrap(),
            "precious",
            "{verb} -> {dst}"
        );
    }
}

#[test]
fn missing_source_leaves_destination_untouched() {
    let (_td, d) = dispatcher();
    save(&d, "b.txt", "survivor");
    for verb in [Verb::FileCopy, Verb::FileMove] {
        let err = d
            .invoke(Call::new(verb).with_value("missing.txt").with_child(Node::leaf("b.txt")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "{verb}");
        assert!(err.to_string().contains("missing.txt"), "{err}");
        assert_eq!(load(&d, "b.txt").value, Some(Value::from("survivor")));
    }
}

#[test]
fn copy_into_folder_destination_keeps_file_name() {
    let (td, d) = dispatcher();
    save(&d, "/src.txt", "payload");
    d.invoke(Call::new(Verb::FolderCreate).with_value("/backup"))
        .unwrap();
    d.invoke(
        Call::new(Verb::FileCopy)
            .with_value("/src.txt")
            .with_child(Node::leaf("/backup/")),
    )
    .unwrap();
    assert_eq!(
        fs::read_to_string(td.path().join("backup/src.txt")).unwrap(),
        "payload"
    );
    assert!(exists(&d, "/src.txt"), "copy keeps the source");
}

#[test]
fn copy_replaces_existing_destination() {
    let (_td, d) = dispatcher();
    save(&d, "/a.txt", "new");
    save(&d, "/b.txt", "old content that is longer");
    d.invoke(
        Call::new(Verb::FileCopy)
            .with_value("/a.txt")
            .with_child(Node::leaf("/b.txt")),
    )
    .unwrap();
    assert_eq!(load(&d, "/b.txt").value, Some(Value::from("new")));
}

#[test]
fn missing_source_and_missing_destination_arg() {
    let (_td, d) = dispatcher();
    let err = d
        .invoke(
            Call::new(Verb::FileCopy)
                .with_value("/nope.txt")
                .with_child(Node::leaf("/b.txt")),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    save(&d, "/a.txt", "x");
    let err = d
        .invoke(Call::new(Verb::FileMove).with_value("/a.txt"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("No destination provided"));
}

#[test]
fn load_missing_is_not_found_and_delete_missing_is_ok() {
    let (_td, d) = dispatcher();
    let err = d
        .invoke(Call::new(Verb::FileLoad).with_value("/ghost.txt"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    d.invoke(Call::new(Verb::FileDelete).with_value("/ghost.txt"))
        .expect("deleting a missing file is a no-op");
}

#[test]
fn delete_removes_file() {
    let (td, d) = dispatcher();
    save(&d, "/gone.txt", "bye");
    d.invoke(Call::new(Verb::FileDelete).with_value("/gone.txt"))
        .unwrap();
    assert!(!td.path().join("gone.txt").exists());
}

#[test]
fn listing_is_sorted_and_hides_dot_files() {
    let (td, d) = dispatcher();
    for name in ["b.txt", "a.txt", ".hidden", "c.md"] {
        fs::write(td.path().join(name), name).unwrap();
    }
    fs::create_dir(td.path().join("sub")).unwrap();

    let o = d.invoke(Call::new(Verb::FileList).with_value("/")).unwrap();
    assert_eq!(o.entries(), vec!["/a.txt", "/b.txt", "/c.md"]);
    assert!(o.children.iter().all(|c| c.name.is_empty()));

    let o = d
        .invoke(Call::new(Verb::FileList).with_arg("display-hidden", true))
        .unwrap();
    assert_eq!(o.entries(), vec!["/.hidden", "/a.txt", "/b.txt", "/c.md"]);
}

#[test]
fn recursive_listing_returns_nested_relative_paths() {
    let (td, d) = dispatcher();
    fs::create_dir_all(td.path().join("x/y")).unwrap();
    fs::write(td.path().join("top.txt"), "").unwrap();
    fs::write(td.path().join("x/mid.txt"), "").unwrap();
    fs::write(td.path().join("x/y/deep.txt"), "").unwrap();
    fs::write(td.path().join("x/y/.secret"), "").unwrap();

    let o = d
        .invoke(Call::new(Verb::FileListRecursively).with_value("/"))
        .unwrap();
    assert_eq!(o.entries(), vec!["/top.txt", "/x/mid.txt", "/x/y/deep.txt"]);

    let o = d
        .invoke(Call::new(Verb::FileListRecursively).with_value("/x/y"))
        .unwrap();
    assert_eq!(o.entries(), vec!["/x/y/deep.txt"]);
}

#[test]
fn paths_climbing_out_of_the_root_are_refused() {
    let (_td, d) = dispatcher();
    let err = d
        .invoke(Call::new(Verb::FileLoad).with_value("../outside.txt"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = d
        .invoke(
            Call::new(Verb::FileSave)
                .with_value("/a/../../escape.txt")
                .with_child(Node::leaf("x")),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn missing_path_value_is_invalid_argument() {
    let (_td, d) = dispatcher();
    for verb in [Verb::FileLoad, Verb::FileExists, Verb::FileDelete] {
        let err = d.invoke(Call::new(verb)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{verb}");
        assert!(err.to_string().contains("No path provided"));
    }
}
