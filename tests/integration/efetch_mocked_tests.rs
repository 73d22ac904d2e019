//! efetch, EInfo and PubMed abstract tests against a mocked E-utilities server

mod common;

use std::time::Duration;

use entrez_variants::{EntrezClient, EntrezError, HistoryToken, TransportKind};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{CFTR_VCV_XML, create_mock_client, mock_config};

#[tokio::test]
#[traced_test]
async fn test_fetch_stores_document_and_returns_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("db", "clinvar"))
        .and(query_param("rettype", "vcv"))
        .and(query_param("retmode", "xml"))
        .and(query_param("is_variationid", ""))
        .and(query_param("WebEnv", "MCID_fetch"))
        .and(query_param("query_key", "3"))
        .and(query_param("usehistory", "y"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CFTR_VCV_XML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_mock_client(&mock_server);
    let token = HistoryToken::new("MCID_fetch", "3");

    let status = client
        .fetch(&token, "clinvar", "vcv", "xml", "is_variationid")
        .await
        .expect("fetch should succeed");

    assert_eq!(status, 200);
    let document = client.document().expect("document should be stored");
    assert_eq!(document.status, 200);
    assert_eq!(document.body, CFTR_VCV_XML);

    let records = client.variant_records().unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
#[traced_test]
async fn test_fetch_overwrites_previous_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("query_key", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<first/>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("query_key", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<second/>"))
        .mount(&mock_server)
        .await;

    let mut client = create_mock_client(&mock_server);

    client
        .fetch(&HistoryToken::new("ENV", "1"), "clinvar", "vcv", "xml", "is_variationid")
        .await
        .unwrap();
    assert_eq!(client.document().unwrap().body, "<first/>");

    client
        .fetch(&HistoryToken::new("ENV", "2"), "clinvar", "vcv", "xml", "is_variationid")
        .await
        .unwrap();
    assert_eq!(client.document().unwrap().body, "<second/>");

    let taken = client.take_document().unwrap();
    assert_eq!(taken.body, "<second/>");
    assert!(client.document().is_none());
}

#[tokio::test]
#[traced_test]
async fn test_fetch_failure_keeps_previous_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("query_key", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<kept/>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("query_key", "2"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<discarded/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_mock_client(&mock_server);
    client
        .fetch(&HistoryToken::new("ENV", "1"), "clinvar", "vcv", "xml", "is_variationid")
        .await
        .unwrap();

    let err = client
        .fetch(&HistoryToken::new("ENV", "2"), "clinvar", "vcv", "xml", "is_variationid")
        .await
        .unwrap_err();

    assert!(matches!(err, EntrezError::RemoteStatus { status: 404, .. }));
    assert!(!err.is_transient());
    assert_eq!(client.document().unwrap().body, "<kept/>");
}

#[tokio::test]
#[traced_test]
async fn test_fetch_timeout_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<slow/>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server).with_fetch_timeout(Duration::from_millis(200));
    let mut client = EntrezClient::with_config(config);

    let err = client
        .fetch(&HistoryToken::new("ENV", "1"), "snp", "variation", "xml", "")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EntrezError::Transport {
            kind: TransportKind::Timeout,
            ..
        }
    ));
    assert!(client.document().is_none());
}

#[tokio::test]
#[traced_test]
async fn test_einfo_database_list() {
    let mock_server = MockServer::start().await;

    let einfo_xml = r#"<?xml version="1.0" encoding="UTF-8" ?>
<eInfoResult>
    <DbList>
        <DbName>pubmed</DbName>
        <DbName>clinvar</DbName>
        <DbName>snp</DbName>
    </DbList>
</eInfoResult>"#;

    Mock::given(method("GET"))
        .and(path("/einfo.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(einfo_xml))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let body = client.info().await.unwrap();
    assert!(body.contains("<DbName>clinvar</DbName>"));
}

#[tokio::test]
#[traced_test]
async fn test_einfo_for_database() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/einfo.fcgi"))
        .and(query_param("db", "clinvar"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<eInfoResult><DbInfo><DbName>clinvar</DbName></DbInfo></eInfoResult>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let body = client.database_info("clinvar").await.unwrap();
    assert!(body.contains("<DbInfo>"));
}

#[tokio::test]
#[traced_test]
async fn test_fetch_pubmed_abstract() {
    let mock_server = MockServer::start().await;

    let abstract_text = "1. Nature. 2001 Dec 6;414(6864):Example title.\n\nAuthor A, Author B.\n\nAbstract text.\n\nPMID: 11738358";

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("db", "pubmed"))
        .and(query_param("id", "11738358"))
        .and(query_param("retmode", "text"))
        .and(query_param("rettype", "abstract"))
        .respond_with(ResponseTemplate::new(200).set_body_string(abstract_text))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let text = client.fetch_pubmed_abstract("11738358").await.unwrap();
    assert!(text.contains("PMID: 11738358"));
}
