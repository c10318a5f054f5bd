use anyhow::Result;
use resultfetch::{pipeline, Config, ErrorKind, ResultError, ResultFetcher, SubjectGrade, Usn};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE: &str = include_str!("fixtures/result_page.html");

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("resultfetch=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn fetcher_for(server: &MockServer) -> Result<ResultFetcher> {
    let config = Config {
        endpoint: Url::parse(&format!("{}/view-results", server.uri()))?,
        ..Config::default()
    };
    Ok(ResultFetcher::new(&config)?)
}

#[tokio::test]
async fn valid_usn_yields_fixture_record() -> Result<()> {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/view-results"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("USN=4JC15CS129"))
        .and(body_string_contains("Action=Fetch%2BResult"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server)?;
    let record = pipeline::fetch_record(&fetcher, "4JC15CS129").await?;

    assert_eq!(record.usn().as_str(), "4JC15CS129");
    assert_eq!(record.name(), "ASHA RAO K");
    let codes: Vec<&str> = record.grades().iter().map(|g| g.code.as_str()).collect();
    assert_eq!(
        codes,
        vec!["15CS51", "15CS52", "15CS53", "15CS54", "15CSL57", "15CSL58", "15HS59"]
    );
    assert_eq!(record.grades()[4], SubjectGrade::new("15CSL57", "A"));
    Ok(())
}

#[tokio::test]
async fn submit_action_plus_is_percent_encoded() -> Result<()> {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server)?;
    let usn: Usn = "4JC15CS129".parse()?;
    fetcher.fetch_page(&usn).await?;

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert_eq!(body, "USN=4JC15CS129&Action=Fetch%2BResult");
    Ok(())
}

#[tokio::test]
async fn full_run_scores_fixture() -> Result<()> {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/view-results"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server)?;
    // lower-case input with padding is normalized before posting
    let report = pipeline::run(&fetcher, "  4jc15cs129 ").await?;

    // 4 theory subjects × 4 credits + 2 labs × 2 credits
    assert_eq!(report.sgpa().total_credits(), 20);
    assert_eq!(report.sgpa().earned_credits(), 178);
    assert!((report.sgpa().value() - 8.9).abs() < 1e-9);
    assert!(report.to_string().ends_with("SGPA : 8.90 (178 / 20 credits)"));

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("USN=4JC15CS129"));
    Ok(())
}

#[tokio::test]
async fn invalid_usn_never_hits_network() -> Result<()> {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server)?;
    let err = pipeline::run(&fetcher, "ABCDEFGHIJ").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidUsn);
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
    Ok(())
}

#[tokio::test]
async fn server_error_is_network_error() -> Result<()> {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string(FIXTURE))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server)?;
    let res = pipeline::fetch_record(&fetcher, "4JC15CS129").await;

    match res {
        Err(ResultError::Network(msg)) => assert!(msg.contains("500"), "{}", msg),
        other => panic!("expected network error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn non_200_success_status_is_network_error() -> Result<()> {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server)?;
    let err = pipeline::run(&fetcher, "4JC15CS129").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    Ok(())
}

#[tokio::test]
async fn error_page_is_parse_error() -> Result<()> {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><h3>Invalid USN or results not announced</h3></body></html>"),
        )
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server)?;
    let err = pipeline::run(&fetcher, "4JC15CS999").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    Ok(())
}

#[tokio::test]
async fn no_creditable_subjects_is_reported() -> Result<()> {
    init_test_logging();
    let page = r#"<html><body>
        <center><h1>Name : RAVI</h1></center>
        <table><tr><td>15HS11</td><td>Constitution of India</td><td>A</td></tr></table>
        </body></html>"#;
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server)?;
    let err = pipeline::run(&fetcher, "4JC15CS129").await.unwrap_err();
    assert_eq!(err, ResultError::DivisionByZero);
    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint_is_network_error() -> Result<()> {
    init_test_logging();
    // bind then drop so nothing is listening on the port
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    let config = Config {
        endpoint: Url::parse(&format!("http://{}/view-results", addr))?,
        ..Config::default()
    };

    let fetcher = ResultFetcher::new(&config)?;
    let err = pipeline::run(&fetcher, "4JC15CS129").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    Ok(())
}

#[tokio::test]
async fn slow_endpoint_hits_deadline() -> Result<()> {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FIXTURE)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server)?;
    let err = pipeline::run_with_timeout(&fetcher, "4JC15CS129", Duration::from_millis(100))
        .await
        .unwrap_err();
    match err {
        ResultError::Network(msg) => assert!(msg.contains("no response within"), "{}", msg),
        other => panic!("expected network error, got {:?}", other),
    }
    Ok(())
}
