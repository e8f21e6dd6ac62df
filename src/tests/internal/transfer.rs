use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures_util::StreamExt;

use crate::internal::client::structs::client_config::DavClientConfig;
use crate::internal::error::DavError;
use crate::internal::transfer::traits::progress::{SharedProgress, async_progress_fn, progress_fn};
use crate::tests::fake_server::{BASE_URL, FakeDav};
use crate::tests::{random_bytes, write_local};

type Calls = Arc<Mutex<Vec<(u64, u64)>>>;

fn recorder() -> (SharedProgress, Calls) {
    let calls: Calls = Arc::default();
    let sink = calls.clone();
    let hook = progress_fn(move |current, total| sink.lock().unwrap().push((current, total)));
    (hook, calls)
}

fn assert_progress(calls: &[(u64, u64)], total: u64) {
    assert_eq!(calls.first(), Some(&(0, total)));
    assert_eq!(calls.last(), Some(&(total, total)));
    assert!(
        calls.windows(2).all(|w| w[0].0 < w[1].0),
        "进度必须严格递增: {calls:?}"
    );
}

// ═══ 上传 ═══

#[tokio::test]
async fn upload_file_with_progress_sends_whole_payload() {
    let server = FakeDav::new();
    let client = server.client();
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("payload.bin");
    let payload = random_bytes(100_000);
    write_local(&local, &payload);

    let (hook, calls) = recorder();
    client
        .upload_file("/payload.bin", &local, true, Some(hook))
        .await
        .unwrap();

    let stored = server.file("/payload.bin").unwrap();
    assert_eq!(stored.len(), 100_000);
    assert_eq!(stored, payload);

    let calls = calls.lock().unwrap();
    assert_progress(&calls, 100_000);
}

#[tokio::test]
async fn upload_waits_for_async_progress() {
    let server = FakeDav::new();
    let client = server.client_with(DavClientConfig::new(BASE_URL).with_chunk_size(1000));
    let payload = random_bytes(4500);

    let calls: Calls = Arc::default();
    let sink = calls.clone();
    let hook = async_progress_fn(move |current, total| {
        let sink = sink.clone();
        async move {
            tokio::task::yield_now().await;
            sink.lock().unwrap().push((current, total));
        }
    });

    client
        .upload_to("/async.bin", std::io::Cursor::new(payload.clone()), 4500, true, Some(hook))
        .await
        .unwrap();

    assert_eq!(server.file("/async.bin").unwrap(), payload);
    let calls = calls.lock().unwrap();
    assert_progress(&calls, 4500);
    assert_eq!(calls.len(), 6);
}

#[tokio::test]
async fn upload_without_progress() {
    let server = FakeDav::new();
    let client = server.client();

    client
        .upload_to("/plain.txt", std::io::Cursor::new(b"plain".to_vec()), 5, true, None)
        .await
        .unwrap();
    client
        .upload_bytes("/bytes.txt", Bytes::from_static(b"in memory"))
        .await
        .unwrap();

    assert_eq!(server.file("/plain.txt").unwrap(), b"plain");
    assert_eq!(server.file("/bytes.txt").unwrap(), b"in memory");

    let put = server
        .requests()
        .into_iter()
        .find(|r| r.method == "PUT")
        .unwrap();
    assert_eq!(
        put.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
}

#[tokio::test]
async fn upload_precondition_failures() {
    let server = FakeDav::new();
    let client = server.client();

    assert!(matches!(
        client.upload_bytes("/dir/", Bytes::new()).await,
        Err(DavError::OptionNotValid { .. })
    ));
    assert!(matches!(
        client.upload_bytes("/missing/f.txt", Bytes::new()).await,
        Err(DavError::RemoteParentNotFound { .. })
    ));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        client
            .upload_file("/f.txt", &dir.path().join("absent"), true, None)
            .await,
        Err(DavError::LocalResourceNotFound { .. })
    ));
    assert!(matches!(
        client.upload("/f.txt", &dir.path().join("absent"), None).await,
        Err(DavError::LocalResourceNotFound { .. })
    ));
    assert!(!server.methods().contains(&"PUT".to_string()));
}

#[tokio::test]
async fn upload_without_overwrite_keeps_existing() {
    let server = FakeDav::new();
    server.add_file("/keep.txt", b"old");
    let client = server.client();

    client
        .upload_to("/keep.txt", std::io::Cursor::new(b"new".to_vec()), 3, false, None)
        .await
        .unwrap();

    assert_eq!(server.file("/keep.txt").unwrap(), b"old");
    assert_eq!(server.methods(), vec!["HEAD"]);
}

// ═══ 下载 ═══

#[tokio::test]
async fn download_chunks_follow_configured_size() {
    let server = FakeDav::new();
    let payload = random_bytes(2500);
    server.add_file("/blob.bin", &payload);
    let client = server.client_with(DavClientConfig::new(BASE_URL).with_chunk_size(256));

    let chunks: Vec<Bytes> = client
        .download_iter("/blob.bin")
        .await
        .unwrap()
        .map(|chunk| chunk.unwrap())
        .collect()
        .await;

    let (last, full) = chunks.split_last().unwrap();
    assert!(full.iter().all(|c| c.len() == 256));
    assert_eq!(last.len(), 2500 % 256);
    assert_eq!(chunks.concat(), payload);
}

#[tokio::test]
async fn download_to_reports_progress() {
    let server = FakeDav::new();
    let payload = random_bytes(3000);
    server.add_file("/data.bin", &payload);
    let client = server.client_with(DavClientConfig::new(BASE_URL).with_chunk_size(1024));

    let (hook, calls) = recorder();
    let mut sink = Vec::new();
    client
        .download_to("/data.bin", &mut sink, Some(hook))
        .await
        .unwrap();

    assert_eq!(sink, payload);
    let calls = calls.lock().unwrap();
    assert_progress(&calls, 3000);
    assert_eq!(
        *calls,
        vec![(0, 3000), (1024, 3000), (2048, 3000), (3000, 3000)]
    );
}

#[tokio::test]
async fn download_without_content_length_reports_zero_total() {
    let server = FakeDav::new();
    let payload = random_bytes(2500);
    server.add_file("/stream.bin", &payload);
    server.omit_content_length();
    let client = server.client_with(DavClientConfig::new(BASE_URL).with_chunk_size(1024));

    let (hook, calls) = recorder();
    let mut sink = Vec::new();
    client
        .download_to("/stream.bin", &mut sink, Some(hook))
        .await
        .unwrap();

    assert_eq!(sink, payload);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![(0, 0), (1024, 0), (2048, 0), (2500, 0)]
    );
}

#[tokio::test]
async fn download_file_checks_before_creating_local() {
    let server = FakeDav::new();
    server.add_dir("/folder");
    let client = server.client();
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("out.bin");

    assert!(matches!(
        client.download_file("/ghost.bin", &local, None).await,
        Err(DavError::RemoteResourceNotFound { .. })
    ));
    assert!(matches!(
        client.download_file("/folder", &local, None).await,
        Err(DavError::OptionNotValid { .. })
    ));
    assert!(!local.exists());
}

#[tokio::test]
async fn download_directory_replaces_local_tree() {
    let server = FakeDav::new();
    server.add_dir("/a");
    server.add_file("/a/f1.txt", &random_bytes(10));
    server.add_dir("/a/b");
    server.add_file("/a/b/f2.txt", &random_bytes(20));
    let client = server.client();

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("a");
    write_local(&target.join("stale.txt"), b"stale");

    client.download("/a/", &target, None).await.unwrap();

    assert!(!target.join("stale.txt").exists());
    assert_eq!(std::fs::read(target.join("f1.txt")).unwrap().len(), 10);
    assert_eq!(
        std::fs::read(target.join("b").join("f2.txt")).unwrap(),
        server.file("/a/b/f2.txt").unwrap()
    );
}

#[tokio::test]
async fn download_directory_of_file_fails() {
    let server = FakeDav::new();
    server.add_file("/f.txt", b"x");
    let client = server.client();
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(
        client.download_directory("/f.txt", dir.path(), None).await,
        Err(DavError::OptionNotValid { .. })
    ));
}

// ═══ 目录上传 ═══

#[tokio::test]
async fn upload_directory_replaces_remote_tree() {
    let server = FakeDav::new();
    server.add_dir("/up");
    server.add_file("/up/old.txt", b"old");
    let client = server.client();

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("up");
    write_local(&local.join("one.txt"), b"1");
    write_local(&local.join("nested").join("two.txt"), b"22");

    let (hook, calls) = recorder();
    client.upload("/up", &local, Some(hook)).await.unwrap();

    assert!(!server.contains("/up/old.txt"));
    assert_eq!(server.file("/up/one.txt").unwrap(), b"1");
    assert!(server.is_dir("/up/nested"));
    assert_eq!(server.file("/up/nested/two.txt").unwrap(), b"22");

    // 每个文件各自从 0 开始报告
    let calls = calls.lock().unwrap();
    assert_eq!(calls.iter().filter(|(current, _)| *current == 0).count(), 2);
}

#[tokio::test]
async fn upload_directory_without_overwrite_is_noop() {
    let server = FakeDav::new();
    server.add_dir("/exists");
    let client = server.client();

    let dir = tempfile::tempdir().unwrap();
    write_local(&dir.path().join("x.txt"), b"x");

    client
        .upload_directory("/exists", dir.path(), false, None)
        .await
        .unwrap();

    assert!(!server.contains("/exists/x.txt"));
    assert_eq!(server.methods(), vec!["HEAD"]);
}

#[tokio::test]
async fn upload_directory_rejects_local_file() {
    let server = FakeDav::new();
    let client = server.client();

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("file.txt");
    write_local(&file, b"x");

    assert!(matches!(
        client.upload_directory("/d", &file, true, None).await,
        Err(DavError::OptionNotValid { .. })
    ));
}
