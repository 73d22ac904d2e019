//! End-to-end ClinVar and dbSNP lookups (search, then fetch, then extract)
//! against a mocked E-utilities server

mod common;

use entrez_variants::EntrezError;
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{CFTR_VCV_XML, create_mock_client, esearch_xml};

const CFTR_VARIANTS: [&str; 2] = ["NM_000492.3:c.79G>T", "NM_000492.3:c.1408G>A"];

#[tokio::test]
#[traced_test]
async fn test_fetch_significance_by_variants() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "clinvar"))
        .and(query_param(
            "term",
            r#""CFTR"[gene] AND ( "NM_000492.3:c.79G>T"[varname] OR "NM_000492.3:c.1408G>A"[varname] )"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_xml(
            Some("MCID_cftr"),
            Some("1"),
            &["7105", "35827"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("db", "clinvar"))
        .and(query_param("rettype", "vcv"))
        .and(query_param("retmode", "xml"))
        .and(query_param("WebEnv", "MCID_cftr"))
        .and(query_param("query_key", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CFTR_VCV_XML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_mock_client(&mock_server);
    let records = client
        .fetch_significance_by_variants("CFTR", &CFTR_VARIANTS)
        .await
        .expect("lookup should succeed");

    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.variation_id.as_deref(), Some("7105"));
    assert_eq!(
        first.variation_name.as_deref(),
        Some("NM_000492.3(CFTR):c.79G>T (p.Gly27Ter)")
    );
    let accessions: Vec<&str> = first
        .interpretations
        .iter()
        .map(|e| e.rcv_accession.as_str())
        .collect();
    assert_eq!(accessions, vec!["RCV000007523", "RCV000627901"]);

    let second = &records[1];
    assert_eq!(second.variation_id.as_deref(), Some("35827"));
    // RCV000384213 has no DateLastEvaluated and is skipped
    assert_eq!(second.interpretations.len(), 2);

    // The fetched document stays available on the client
    assert_eq!(client.document().unwrap().body, CFTR_VCV_XML);
}

#[tokio::test]
#[traced_test]
async fn test_fetch_significance_no_matches_skips_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(esearch_xml(Some("MCID_empty"), Some("1"), &[])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut client = create_mock_client(&mock_server);
    let records = client
        .fetch_significance_by_variants("CFTR", &["NM_000492.3:c.9999A>G"])
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(client.document().is_none());
}

#[tokio::test]
#[traced_test]
async fn test_search_failure_aborts_before_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut client = create_mock_client(&mock_server);
    let err = client
        .fetch_significance_by_variants("CFTR", &CFTR_VARIANTS)
        .await
        .unwrap_err();

    assert!(matches!(err, EntrezError::RemoteStatus { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
#[traced_test]
async fn test_fetch_clinvar_summary_for_gene() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "clinvar"))
        .and(query_param("term", "GAA[gene]"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_xml(
            Some("MCID_gaa"),
            Some("1"),
            &["4027"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("db", "clinvar"))
        .and(query_param("rettype", "vcv"))
        .and(query_param("retmode", "xml"))
        .and(query_param("is_variationid", ""))
        .and(query_param("WebEnv", "MCID_gaa"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CFTR_VCV_XML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_mock_client(&mock_server);
    let xml = client.fetch_clinvar_summary_for_gene("GAA").await.unwrap();

    assert_eq!(xml, CFTR_VCV_XML);
}

#[tokio::test]
#[traced_test]
async fn test_fetch_snp_by_position() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .and(query_param("db", "snp"))
        .and(query_param(
            "term",
            r#"117559590:117559600[Base Position] AND "7" [CHR] AND txid9606"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_xml(
            Some("MCID_snp"),
            Some("1"),
            &["113993960"],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let snp_xml = r#"<?xml version="1.0" ?><ExchangeSet><DocumentSummary uid="113993960"><SNP_ID>113993960</SNP_ID></DocumentSummary></ExchangeSet>"#;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("db", "snp"))
        .and(query_param("rettype", "variation"))
        .and(query_param("retmode", "xml"))
        .and(query_param("WebEnv", "MCID_snp"))
        .and(query_param("query_key", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(snp_xml))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = create_mock_client(&mock_server);
    let xml = client
        .fetch_snp_by_position(117559590, 117559600, "7")
        .await
        .unwrap();

    assert!(xml.contains("<SNP_ID>113993960</SNP_ID>"));
}
