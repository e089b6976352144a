//! Integration tests for the OCI HTTP client using wiremock
//!
//! These tests run the real signed client and paginating service client
//! against mocked endpoints.

use ocinv::discovery::validate_credentials;
use ocinv::oci::auth::{KeyFile, RequestSigner, RsaSigner};
use ocinv::oci::client::{ListRequest, OciServiceClient, Service, ServiceApi, ServiceClients};
use ocinv::oci::http::{format_oci_error, OciHttpClient};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = include_str!("fixtures/test_key.pem");

/// Signer returning a fixed signature
struct StaticSigner;

impl RequestSigner for StaticSigner {
    fn key_id(&self) -> &str {
        "ocid1.tenancy.oc1..t/ocid1.user.oc1..u/aa:bb"
    }

    fn sign(&self, _signing_string: &str) -> anyhow::Result<String> {
        Ok("c2lnbmF0dXJl".to_string())
    }
}

fn client_for(server: &MockServer, signer: Arc<dyn RequestSigner>) -> OciServiceClient {
    let http = OciHttpClient::new(signer, Duration::from_secs(5)).unwrap();
    OciServiceClient::new(Service::Compute, http, &server.uri()).unwrap()
}

fn static_client(server: &MockServer) -> OciServiceClient {
    client_for(server, Arc::new(StaticSigner))
}

/// Test module for signed request behavior
mod signing_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_sends_signature_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/tenancies/t1"))
            .and(header_exists("authorization"))
            .and(header_exists("date"))
            .and(header_exists("opc-request-id"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "t1", "name": "acme"})))
            .expect(1)
            .mount(&server)
            .await;

        let body = static_client(&server).get("/20160918/tenancies/t1").await.unwrap();
        assert_eq!(body["name"], "acme");

        let requests = server.received_requests().await.unwrap();
        let auth = requests[0].headers.get("authorization").unwrap().to_str().unwrap();
        assert!(auth.starts_with("Signature version=\"1\""));
        assert!(auth.contains("keyId=\"ocid1.tenancy.oc1..t/ocid1.user.oc1..u/aa:bb\""));
        assert!(auth.contains("headers=\"date (request-target) host\""));
        assert!(auth.contains("signature=\"c2lnbmF0dXJl\""));
    }

    #[tokio::test]
    async fn test_rsa_signer_signs_real_requests() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/instances"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let key_file = KeyFile::materialize(TEST_KEY).unwrap();
        let signer = RsaSigner::from_key_file("t/u/fp".to_string(), key_file.path()).unwrap();
        let client = client_for(&server, Arc::new(signer));

        let items = client
            .list(&ListRequest::new("/20160918/instances"))
            .await
            .unwrap();
        assert!(items.is_empty());

        let requests = server.received_requests().await.unwrap();
        let auth = requests[0].headers.get("authorization").unwrap().to_str().unwrap();
        assert!(auth.contains("algorithm=\"rsa-sha256\""));
        assert!(!auth.contains("signature=\"\""));
    }
}

/// Test module for list pagination and body shapes
mod list_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_follows_next_page_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/vcns"))
            .and(query_param("page", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "v3"}])))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/20160918/vcns"))
            .and(query_param("compartmentId", "c1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("opc-next-page", "p2")
                    .set_body_json(json!([{"id": "v1"}, {"id": "v2"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let items = static_client(&server)
            .list(&ListRequest::new("/20160918/vcns").param("compartmentId", "c1"))
            .await
            .unwrap();

        let ids: Vec<_> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["v1", "v2", "v3"]);
    }

    #[tokio::test]
    async fn test_single_page_ignores_next_page_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/images"))
            .and(query_param("limit", "50"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("opc-next-page", "p2")
                    .set_body_json(json!([{"id": "i1"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let items = static_client(&server)
            .list(
                &ListRequest::new("/20160918/images")
                    .param("limit", "50")
                    .single_page(true),
            )
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_list_unwraps_items_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20181201/vaults"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": [{"id": "a"}, {"id": "b"}]})),
            )
            .mount(&server)
            .await;

        let items = static_client(&server)
            .list(&ListRequest::new("/20181201/vaults"))
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["id"], "b");
    }

    #[tokio::test]
    async fn test_list_rejects_unexpected_shape() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/subnets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": 1})))
            .mount(&server)
            .await;

        let result = static_client(&server)
            .list(&ListRequest::new("/20160918/subnets"))
            .await;

        assert!(result.is_err());
    }
}

/// Test module for error responses
mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_404_maps_to_not_found_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/tenancies/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "NotAuthorizedOrNotFound",
                "message": "Authorization failed or requested resource not found."
            })))
            .mount(&server)
            .await;

        let err = static_client(&server)
            .get("/20160918/tenancies/missing")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("NotAuthorizedOrNotFound"));
        assert!(format_oci_error(&err).starts_with("Resource not found"));
    }

    #[tokio::test]
    async fn test_401_maps_to_authentication_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/20160918/instances"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let err = static_client(&server)
            .list(&ListRequest::new("/20160918/instances"))
            .await
            .unwrap_err();

        assert!(format_oci_error(&err).starts_with("Authentication failed"));
    }

    #[tokio::test]
    async fn test_500_maps_to_unavailable_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = static_client(&server).get("/anything").await.unwrap_err();

        assert!(format_oci_error(&err).contains("temporarily unavailable"));
    }

    /// Endpoint on a local port nothing listens on
    fn refused_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}/20160918", port)
    }

    #[tokio::test]
    async fn test_connection_refused_is_reported_as_network_failure() {
        let http = OciHttpClient::new(Arc::new(StaticSigner), Duration::from_secs(5)).unwrap();
        let client = OciServiceClient::new(Service::Identity, http, &refused_endpoint()).unwrap();

        // Digits in the OCID must not be read as a status code
        let err = client
            .get("/tenancies/ocid1.tenancy.oc1..aaaaaaaa4294abc")
            .await
            .unwrap_err();

        assert!(format_oci_error(&err).starts_with("Could not reach OCI"));
    }

    #[tokio::test]
    async fn test_validate_against_unreachable_endpoint() {
        let http = OciHttpClient::new(Arc::new(StaticSigner), Duration::from_secs(5)).unwrap();
        let client = OciServiceClient::new(Service::Identity, http, &refused_endpoint()).unwrap();
        let clients = ServiceClients::default().with(Service::Identity, Arc::new(client));

        let result = validate_credentials(&clients, "ocid1.tenancy.oc1..aaaaaaaa4294abc").await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Credential validation failed: Could not reach OCI. Check your network connection and region.")
        );
    }
}
