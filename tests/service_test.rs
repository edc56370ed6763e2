//! 服务启动测试

use mockito::Server;
use slot_watch::config::Config;
use slot_watch::core::ServiceLauncher;
use std::time::Duration;

#[tokio::test]
async fn test_port_in_use_does_not_stop_checks() {
    // 先占用端口，让存活探测服务器绑定失败
    let held = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = held.local_addr().unwrap().port();

    let mut site = Server::new_async().await;
    let page_mock = site
        .mock("GET", "/exams")
        .with_status(200)
        .with_body("<html><body></body></html>")
        .expect_at_least(1)
        .create_async()
        .await;

    let mut config = Config::default();
    config.target.url = format!("{}/exams", site.url());
    config.server.bind_address = "127.0.0.1".to_string();
    config.server.port = port;
    config.snapshot.file_path = None;

    let outcome = tokio::time::timeout(Duration::from_secs(2), ServiceLauncher::run(config)).await;

    assert!(outcome.is_err(), "服务不应提前退出: {:?}", outcome);
    page_mock.assert_async().await;
    drop(held);
}
