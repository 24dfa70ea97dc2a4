//! R2 backend against a local S3 stand-in.

use r2_explorer::{ObjectStoreClient, R2Config};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUCKETS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListAllMyBucketsResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Owner><ID>owner</ID><DisplayName>owner</DisplayName></Owner>
  <Buckets>
    <Bucket><Name>media</Name><CreationDate>2024-01-01T00:00:00.000Z</CreationDate></Bucket>
    <Bucket><Name>backups</Name><CreationDate>2024-02-01T00:00:00.000Z</CreationDate></Bucket>
  </Buckets>
</ListAllMyBucketsResult>"#;

const PAGE_ONE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>media</Name>
  <Prefix></Prefix>
  <KeyCount>2</KeyCount>
  <MaxKeys>1000</MaxKeys>
  <IsTruncated>true</IsTruncated>
  <NextContinuationToken>t1</NextContinuationToken>
  <Contents>
    <Key>a/b.txt</Key>
    <LastModified>2024-03-09T14:05:07.000Z</LastModified>
    <ETag>"etag-b"</ETag>
    <Size>1024</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
  <Contents>
    <Key>a/c.txt</Key>
    <LastModified>2024-03-09T14:05:07.000Z</LastModified>
    <ETag>"etag-c"</ETag>
    <Size>2048</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
</ListBucketResult>"#;

const PAGE_TWO_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>media</Name>
  <Prefix></Prefix>
  <KeyCount>1</KeyCount>
  <MaxKeys>1000</MaxKeys>
  <IsTruncated>false</IsTruncated>
  <Contents>
    <Key>readme.md</Key>
    <LastModified>2024-03-10T08:00:00.000Z</LastModified>
    <ETag>"etag-r"</ETag>
    <Size>10</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
</ListBucketResult>"#;

const EMPTY_LISTING_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>backups</Name>
  <Prefix></Prefix>
  <KeyCount>0</KeyCount>
  <MaxKeys>1000</MaxKeys>
  <IsTruncated>false</IsTruncated>
</ListBucketResult>"#;

const ACCESS_DENIED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>AccessDenied</Code><Message>Access Denied</Message><RequestId>r1</RequestId></Error>"#;

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/xml")
        .set_body_string(body)
}

fn client_for(server: &MockServer) -> ObjectStoreClient {
    let config = R2Config::new("", "AKIDEXAMPLE", "secret").with_endpoint(server.uri());
    ObjectStoreClient::new(&config).unwrap()
}

async fn mount_media_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/media/"))
        .and(query_param("list-type", "2"))
        .and(query_param("continuation-token", "t1"))
        .respond_with(xml(PAGE_TWO_XML))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/media/"))
        .and(query_param("list-type", "2"))
        .respond_with(xml(PAGE_ONE_XML))
        .mount(server)
        .await;
}

#[tokio::test]
async fn lists_bucket_names_in_backend_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(xml(BUCKETS_XML))
        .expect(1)
        .mount(&server)
        .await;

    let names = client_for(&server).list_bucket_names().await.unwrap();
    assert_eq!(names, vec!["media", "backups"]);
}

#[tokio::test]
async fn object_listing_follows_continuation_tokens() {
    let server = MockServer::start().await;
    mount_media_listing(&server).await;

    let objects = client_for(&server).list_objects("media").await.unwrap();

    let keys: Vec<&str> = objects.iter().map(|o| o.key.as_str()).collect();
    assert_eq!(keys, vec!["a/b.txt", "a/c.txt", "readme.md"]);
    assert_eq!(objects[0].size, 1024);
    assert_eq!(objects[1].size, 2048);
    assert_eq!(objects[0].etag.as_deref(), Some("\"etag-b\""));
    assert_eq!(objects[0].last_modified.timestamp(), 1_709_993_107);
}

#[tokio::test]
async fn storage_usage_lists_every_bucket() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(xml(BUCKETS_XML))
        .mount(&server)
        .await;
    mount_media_listing(&server).await;
    Mock::given(method("GET"))
        .and(path("/backups/"))
        .and(query_param("list-type", "2"))
        .respond_with(xml(EMPTY_LISTING_XML))
        .mount(&server)
        .await;

    let report = client_for(&server).compute_storage_usage().await.unwrap();
    assert_eq!(report.get("media"), Some(1024 + 2048 + 10));
    assert_eq!(report.get("backups"), Some(0));
    let order: Vec<&str> = report.iter().map(|(name, _)| name).collect();
    assert_eq!(order, vec!["media", "backups"]);
}

#[tokio::test]
async fn remote_failures_are_transport_errors_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("content-type", "application/xml")
                .set_body_string(ACCESS_DENIED_XML),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).list_bucket_names().await.unwrap_err();
    assert!(err.is_transport());
    assert!(err.to_string().contains("AccessDenied"));
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).list_objects("media").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/media/a/b.txt"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete_object("media", "a/b.txt").await.unwrap();
    client.delete_object("media", "a/b.txt").await.unwrap();
}

#[tokio::test]
async fn upload_sends_file_contents() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/media/docs/report.txt"))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"abc\""))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("report.txt");
    std::fs::write(&source, b"quarterly numbers").unwrap();

    client_for(&server)
        .upload_object("media", "docs/report.txt", &source)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, b"quarterly numbers");
}

#[tokio::test]
async fn upload_of_unreadable_source_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client_for(&server)
        .upload_object("media", "k", &dir.path().join("absent.txt"))
        .await
        .unwrap_err();
    assert!(err.is_io());
}

#[tokio::test]
async fn download_writes_object_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/a/b.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello world".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("nested").join("b.txt");
    client_for(&server)
        .download_object("media", "a/b.txt", &destination)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&destination).unwrap(), b"hello world");
}

#[tokio::test]
async fn download_of_missing_key_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/ghost"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("content-type", "application/xml")
                .set_body_string(
                    "<Error><Code>NoSuchKey</Code><Message>missing</Message></Error>",
                ),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("ghost");
    let err = client_for(&server)
        .download_object("media", "ghost", &destination)
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(!destination.exists());
}

#[tokio::test]
async fn download_replaces_an_existing_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/a/b.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fresh".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("b.txt");
    std::fs::write(&destination, b"stale contents").unwrap();

    client_for(&server)
        .download_object("media", "a/b.txt", &destination)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&destination).unwrap(), b"fresh");
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[tokio::test]
async fn failed_download_keeps_the_previous_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/a/b.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("b.txt");
    std::fs::write(&destination, b"previous").unwrap();

    let err = client_for(&server)
        .download_object("media", "a/b.txt", &destination)
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert_eq!(std::fs::read(&destination).unwrap(), b"previous");
}

#[tokio::test]
async fn unwritable_destination_leaves_no_partial_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/a/b.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"body".to_vec()))
        .mount(&server)
        .await;

    // A non-empty directory cannot be replaced by the downloaded file
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("b.txt");
    std::fs::create_dir(&destination).unwrap();
    std::fs::write(destination.join("keep"), b"x").unwrap();

    let err = client_for(&server)
        .download_object("media", "a/b.txt", &destination)
        .await
        .unwrap_err();

    assert!(err.is_io());
    assert!(destination.join("keep").exists());
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("b.txt")]);
}

#[tokio::test]
async fn presigned_url_is_built_offline_and_expires_in_an_hour() {
    let client = ObjectStoreClient::new(&R2Config::new("acct", "AKIDEXAMPLE", "secret")).unwrap();

    let url = client.generate_presigned_url("photos", "a/b.txt").await.unwrap();

    assert!(url.starts_with("https://acct.r2.cloudflarestorage.com/photos/a/b.txt?"));
    assert!(url.contains("X-Amz-Expires=3600"));
    assert!(url.contains("X-Amz-Signature="));
}
