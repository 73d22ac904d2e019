//! Live ClinVar and dbSNP lookups
//!
//! These tests are only run when:
//! 1. The `integration-tests` feature is enabled
//! 2. The `ENTREZ_REAL_API_TESTS` environment variable is set
//!
//! ```bash
//! ENTREZ_REAL_API_TESTS=1 cargo test --features integration-tests --test real_api_tests
//! ```

mod common;

#[cfg(feature = "integration-tests")]
mod integration_tests {
    use tracing::info;
    use tracing_test::traced_test;

    use entrez_variants::SearchTerm;

    use crate::common::{create_real_client, should_run_real_api_tests};

    const SKIP_MESSAGE: &str =
        "Skipping real API test - enable with ENTREZ_REAL_API_TESTS=1 and --features integration-tests";

    #[tokio::test]
    #[traced_test]
    async fn test_real_gene_search_returns_token() {
        if !should_run_real_api_tests() {
            info!("{SKIP_MESSAGE}");
            return;
        }

        let client = create_real_client();
        let result = client
            .search_for_ids(SearchTerm::gene("CFTR"), "clinvar")
            .await
            .unwrap();

        info!(
            ids = result.ids.len(),
            count = ?result.count,
            "ClinVar gene search completed"
        );

        assert!(!result.token.web_env.is_empty());
        assert!(!result.token.query_key.is_empty());
        assert!(!result.ids.is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_real_significance_by_variants() {
        if !should_run_real_api_tests() {
            info!("{SKIP_MESSAGE}");
            return;
        }

        let mut client = create_real_client();
        let records = client
            .fetch_significance_by_variants("CFTR", &["NM_000492.4:c.1521_1523del"])
            .await
            .unwrap();

        info!(records = records.len(), "ClinVar significance lookup completed");

        for record in &records {
            assert!(record.variation_id.is_some());
            for entry in &record.interpretations {
                assert!(entry.rcv_accession.starts_with("RCV"));
            }
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_real_snp_by_position() {
        if !should_run_real_api_tests() {
            info!("{SKIP_MESSAGE}");
            return;
        }

        let mut client = create_real_client();
        let xml = client
            .fetch_snp_by_position(117559590, 117559600, "7")
            .await
            .unwrap();

        info!(bytes = xml.len(), "dbSNP position lookup completed");
        assert!(!xml.is_empty());
    }
}
