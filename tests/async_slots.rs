//! The `wait.` variants must behave exactly like their blocking counterparts.

use std::fs;

use slot_io::{Call, Dispatcher, ErrorKind, Node, RootResolver, StreamId, Value, Verb};
use tempfile::{TempDir, tempdir};

fn dispatcher() -> (TempDir, Dispatcher) {
    let td = tempdir().expect("tempdir");
    let root = RootResolver::new(td.path()).expect("root resolver");
    (td, Dispatcher::local(root))
}

async fn run(d: &Dispatcher, call: Call) -> slot_io::Result<slot_io::Outcome> {
    d.invoke_async(call).await
}

#[tokio::test]
async fn save_exists_load() {
    let (_td, d) = dispatcher();
    d.invoke_named(
        "wait.file.save",
        Call::new(Verb::FileSave)
            .with_value("a.txt")
            .with_child(Node::leaf("hello")),
    )
    .await
    .unwrap();
    let o = d
        .invoke_named("wait.file.exists", Call::new(Verb::FileExists).with_value("a.txt"))
        .await
        .unwrap();
    assert_eq!(o.value, Some(Value::Bool(true)));
    let o = run(&d, Call::new(Verb::FileLoad).with_value("a.txt"))
        .await
        .unwrap();
    assert_eq!(o.value, Some(Value::from("hello")));
}

#[tokio::test]
async fn move_and_copy() {
    let (td, d) = dispatcher();
    fs::write(td.path().join("a.txt"), "x").unwrap();
    run(&d, Call::new(Verb::FileMove).with_value("a.txt").with_child(Node::leaf("b.txt")))
        .await
        .unwrap();
    assert!(!td.path().join("a.txt").exists());
    run(&d, Call::new(Verb::FileCopy).with_value("b.txt").with_child(Node::leaf("c.txt")))
        .await
        .unwrap();
    assert_eq!(fs::read_to_string(td.path().join("c.txt")).unwrap(), "x");

    let err = run(&d, Call::new(Verb::FileCopy).with_value("/b.txt").with_child(Node::leaf("b.txt")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn copy_and_move_guard_the_source_and_destination() {
    let (td, d) = dispatcher();
    fs::write(td.path().join("a.txt"), "precious").unwrap();
    fs::write(td.path().join("b.txt"), "survivor").unwrap();

    for (verb, dst) in [(Verb::FileCopy, "./a.txt"), (Verb::FileMove, "sub/../a.txt")] {
        let err = run(&d, Call::new(verb).with_value("a.txt").with_child(Node::leaf(dst)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{verb} -> {dst}");
    }
    assert_eq!(fs::read_to_string(td.path().join("a.txt")).unwrap(), "precious");

    for verb in [Verb::FileCopy, Verb::FileMove] {
        let err = run(&d, Call::new(verb).with_value("missing.txt").with_child(Node::leaf("b.txt")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound, "{verb}");
    }
    assert_eq!(fs::read_to_string(td.path().join("b.txt")).unwrap(), "survivor");
}

#[tokio::test]
async fn binary_round_trip() {
    let (_td, d) = dispatcher();
    let bytes = vec![0xffu8, 0x00, 0x7f];
    run(
        &d,
        Call::new(Verb::FileSaveBinary)
            .with_value("/b.bin")
            .with_child(Node::leaf(bytes.clone())),
    )
    .await
    .unwrap();
    let o = run(&d, Call::new(Verb::FileLoadBinary).with_value("/b.bin"))
        .await
        .unwrap();
    assert_eq!(o.value, Some(Value::Bytes(bytes)));
}

#[tokio::test]
async fn folder_copy_merges_and_move_conflicts() {
    let (td, d) = dispatcher();
    fs::create_dir_all(td.path().join("src/sub")).unwrap();
    fs::write(td.path().join("src/sub/x.txt"), "x").unwrap();
    fs::create_dir_all(td.path().join("dst")).unwrap();
    fs::write(td.path().join("dst/keep.txt"), "k").unwrap();

    run(&d, Call::new(Verb::FolderCopy).with_value("/src").with_child(Node::leaf("/dst")))
        .await
        .unwrap();
    assert!(td.path().join("dst/sub/x.txt").exists());
    assert!(td.path().join("dst/keep.txt").exists());

    let err = run(&d, Call::new(Verb::FolderMove).with_value("/src").with_child(Node::leaf("/dst")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    run(&d, Call::new(Verb::FolderMove).with_value("/src").with_child(Node::leaf("/moved")))
        .await
        .unwrap();
    assert!(td.path().join("moved/sub/x.txt").exists());
    assert!(!td.path().join("src").exists());
}

#[tokio::test]
async fn listings_match_blocking_path() {
    let (td, d) = dispatcher();
    fs::create_dir_all(td.path().join("a/b")).unwrap();
    fs::create_dir_all(td.path().join(".cache")).unwrap();
    fs::write(td.path().join("a/one.txt"), "").unwrap();
    fs::write(td.path().join("a/b/two.txt"), "").unwrap();
    fs::write(td.path().join(".env"), "").unwrap();

    for (verb, show_hidden) in [
        (Verb::FileList, false),
        (Verb::FileListRecursively, false),
        (Verb::FolderList, true),
        (Verb::FolderListRecursively, false),
    ] {
        let call = Call::new(verb).with_value("/").with_arg("display-hidden", show_hidden);
        let blocking = d.invoke(call.clone()).unwrap();
        let awaited = run(&d, call).await.unwrap();
        assert_eq!(blocking, awaited, "{verb}");
    }

    let o = run(&d, Call::new(Verb::FolderListRecursively).with_value("/"))
        .await
        .unwrap();
    assert_eq!(o.entries(), vec!["/a/", "/a/b/"]);
}

#[tokio::test]
async fn stream_read_keeps_handle_registered() {
    let (td, d) = dispatcher();
    fs::write(td.path().join("s.txt"), "streamed").unwrap();
    let id = run(&d, Call::new(Verb::StreamOpenFile).with_value("/s.txt"))
        .await
        .unwrap()
        .value
        .and_then(|v| v.as_stream())
        .unwrap();

    let o = run(&d, Call::new(Verb::StreamRead).with_value(id))
        .await
        .unwrap();
    assert_eq!(o.value, Some(Value::Bytes(b"streamed".to_vec())));
    assert!(d.streams().contains(id));

    run(&d, Call::new(Verb::StreamClose).with_value(id))
        .await
        .unwrap();
    let err = run(&d, Call::new(Verb::StreamRead).with_value(id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn zip_stream_saved_then_unzipped() {
    let (td, d) = dispatcher();
    let mut zip = Call::new(Verb::ContentZipStream);
    zip.children = vec![
        Node::leaf("f1.txt").with_child(Node::leaf("hi")),
        Node::leaf("nested/f2.txt").with_child(Node::leaf("yo")),
    ];
    let id: StreamId = run(&d, zip)
        .await
        .unwrap()
        .value
        .and_then(|v| v.as_stream())
        .unwrap();

    let o = run(
        &d,
        Call::new(Verb::StreamSaveFile)
            .with_value("/pack.zip")
            .with_child(Node::leaf(id)),
    )
    .await
    .unwrap();
    assert!(matches!(o.value, Some(Value::Int(n)) if n > 0));

    run(&d, Call::new(Verb::FolderCreate).with_value("/out"))
        .await
        .unwrap();
    let o = run(
        &d,
        Call::new(Verb::FileUnzip)
            .with_value("/pack.zip")
            .with_arg("folder", "/out"),
    )
    .await
    .unwrap();
    assert_eq!(o.entries(), vec!["/out/f1.txt", "/out/nested/f2.txt"]);
    assert_eq!(fs::read_to_string(td.path().join("out/f1.txt")).unwrap(), "hi");
    assert_eq!(
        fs::read_to_string(td.path().join("out/nested/f2.txt")).unwrap(),
        "yo"
    );
}
