use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rdf_serve::rdf::{read_quads, ConvertResult, RdfFormat};
use rdf_serve::{HttpServer, Pipeline, RdfEngine, ServerConfig};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const JESSE: &str = "@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\n<http://example.org/jesse> foaf:name \"Jesse\" .\n";

const JESSE_QUAD: &str =
    "<http://example.org/jesse> <http://xmlns.com/foaf/0.1/name> \"Jesse\" <http://example.org/graph> .\n";

const PERSON_SHC: &str = "BASE <http://example.com/>\n\nshape <PersonShape> -> <Person> {\n    <name> xsd:string [1..1] .\n}\n";

const RULES_N3: &str = "@prefix : <http://example.org/> .\n\n:socrates a :Human .\n";

fn sample_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("jesse.ttl"), JESSE).unwrap();
    fs::write(root.join("jesse-quad.nq"), JESSE_QUAD).unwrap();
    fs::write(root.join("bad-file.txt"), "this is not rdf").unwrap();
    fs::write(root.join("rules.n3"), RULES_N3).unwrap();
    fs::write(root.join("me.ttl"), "<#me> <http://xmlns.com/foaf/0.1/name> \"Me\" .\n").unwrap();
    fs::create_dir(root.join("nested")).unwrap();
    fs::write(root.join("nested").join("person.shc"), PERSON_SHC).unwrap();
    fs::create_dir_all(root.join("container").join("y")).unwrap();
    fs::write(root.join("container").join("x.ttl"), JESSE).unwrap();
    fs::create_dir(root.join("empty")).unwrap();
    dir
}

fn router_with(dir: &TempDir, config: ServerConfig) -> Router {
    let engine = RdfEngine::new(config.format_registry(), config.transform.clone());
    let pipeline = Pipeline::new(dir.path(), config.containment, Arc::new(engine));
    HttpServer::new(config, pipeline).router()
}

fn router(dir: &TempDir, containment: bool) -> Router {
    router_with(
        dir,
        ServerConfig {
            containment,
            ..ServerConfig::default()
        },
    )
}

async fn get(router: &Router, path: &str, accept: Option<&str>) -> (StatusCode, Option<String>, Vec<u8>) {
    let mut request = Request::builder().uri(path);
    if let Some(accept) = accept {
        request = request.header(header::ACCEPT, accept);
    }
    let response = router
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, content_type, body)
}

fn count_statements(format: RdfFormat, body: &[u8]) -> usize {
    let mut count = 0;
    read_quads(format, body, None, &mut |_| -> ConvertResult<()> {
        count += 1;
        Ok(())
    })
    .unwrap();
    count
}

#[tokio::test]
async fn test_identity_returns_original_bytes() {
    let dir = sample_dir();
    let router = router(&dir, false);

    let (status, content_type, body) = get(&router, "/jesse", Some("text/turtle")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/turtle"));
    assert_eq!(body, JESSE.as_bytes());

    let (status, content_type, body) = get(&router, "/jesse-quad", Some("application/n-quads")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/n-quads"));
    assert_eq!(body, JESSE_QUAD.as_bytes());
}

#[tokio::test]
async fn test_no_accept_header_returns_source_type() {
    let dir = sample_dir();
    let (status, content_type, body) = get(&router(&dir, false), "/jesse", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/turtle"));
    assert_eq!(body, JESSE.as_bytes());
}

#[tokio::test]
async fn test_jsonld_round_trips_one_statement() {
    let dir = sample_dir();
    let (status, content_type, body) = get(&router(&dir, false), "/jesse", Some("application/ld+json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/ld+json"));
    assert!(serde_json::from_slice::<serde_json::Value>(&body).is_ok());
    assert_eq!(count_statements(RdfFormat::JsonLd, &body), 1);
}

#[tokio::test]
async fn test_rdfxml_conversion() {
    let dir = sample_dir();
    let (status, content_type, body) = get(&router(&dir, false), "/jesse", Some("application/rdf+xml")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/rdf+xml"));
    assert_eq!(count_statements(RdfFormat::RdfXml, &body), 1);
}

#[tokio::test]
async fn test_not_acceptable() {
    let dir = sample_dir();
    let (status, content_type, body) = get(&router(&dir, false), "/jesse", Some("text/html")).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(content_type, None);
    assert_eq!(body, b"Not Acceptable");
}

#[tokio::test]
async fn test_not_found() {
    let dir = sample_dir();
    let router = router(&dir, false);
    for path in ["/does-not-exist", "/", "/folder/does/not/exist", "/nested", "/jesse.ttl"] {
        let (status, content_type, body) = get(&router, path, Some("text/turtle")).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert_eq!(content_type, None);
        assert_eq!(body, b"Not Found");
    }
}

#[tokio::test]
async fn test_path_traversal_not_found() {
    let dir = sample_dir();
    let router = router(&dir, true);
    for path in ["/nested/../jesse", "/%2e%2e/jesse", "/nested%2F..%2Fjesse"] {
        let (status, _, _) = get(&router, path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
    }
}

#[tokio::test]
async fn test_unrecognised_extension_is_500() {
    let dir = sample_dir();
    let router = router(&dir, false);
    for accept in [Some("text/turtle"), Some("text/html"), None] {
        let (status, content_type, body) = get(&router, "/bad-file", accept).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type, None);
        assert_eq!(
            body,
            b"Internal Server Error: Requested resource is not a recognised RDF serialization"
        );
    }
}

#[tokio::test]
async fn test_named_graph_as_turtle_is_500() {
    let dir = sample_dir();
    let (status, content_type, body) = get(&router(&dir, false), "/jesse-quad", Some("text/turtle")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type.as_deref(), Some("text/plain"));
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("Internal server error transforming internal resource ["));
    assert!(text.ends_with("]\n"));
}

#[tokio::test]
async fn test_opaque_nested_file_served_as_is() {
    let dir = sample_dir();
    let router = router(&dir, false);

    let (status, content_type, body) = get(&router, "/nested/person", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/shaclc"));
    assert_eq!(body, PERSON_SHC.as_bytes());

    let (status, _, _) = get(&router, "/nested/person", Some("text/turtle")).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn test_n3_served_as_n3_when_acceptable() {
    let dir = sample_dir();
    let router = router(&dir, false);

    let (status, content_type, body) = get(&router, "/rules", Some("text/turtle, text/n3;q=0.5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/n3"));
    assert_eq!(body, RULES_N3.as_bytes());

    let (status, content_type, _) = get(&router, "/rules", Some("text/*")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/n3"));

    let (status, content_type, body) = get(&router, "/rules", Some("application/n-triples")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/n-triples"));
    assert_eq!(count_statements(RdfFormat::NTriples, &body), 1);
}

#[tokio::test]
async fn test_relative_iris_resolved_against_request() {
    let dir = sample_dir();
    let request = Request::builder()
        .uri("/me")
        .header(header::HOST, "data.example.org")
        .header("x-forwarded-proto", "https")
        .header(header::ACCEPT, "application/n-triples")
        .body(Body::empty())
        .unwrap();
    let response = router(&dir, false).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("<https://data.example.org/me#me> "), "{}", text);
}

#[tokio::test]
async fn test_containment_listing() {
    let dir = sample_dir();
    let (status, content_type, body) = get(&router(&dir, true), "/container/", Some("text/turtle")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/turtle"));
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "<> <http://www.w3.org/ns/ldp#contains> <x>, <y/> .\n"
    );
}

#[tokio::test]
async fn test_containment_listing_converted() {
    let dir = sample_dir();
    let (status, _, body) = get(&router(&dir, true), "/container/", Some("application/ld+json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count_statements(RdfFormat::JsonLd, &body), 2);
}

#[tokio::test]
async fn test_empty_container_is_empty_document() {
    let dir = sample_dir();
    let (status, content_type, body) = get(&router(&dir, true), "/empty/", Some("text/turtle")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/turtle"));
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_containment_disabled() {
    let dir = sample_dir();
    let (status, _, _) = get(&router(&dir, false), "/container/", Some("text/turtle")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rate_limit() {
    let dir = sample_dir();
    let mut config = ServerConfig::default();
    config.rate_limit.max_requests = 2;
    let router = router_with(&dir, config);

    assert_eq!(get(&router, "/jesse", None).await.0, StatusCode::OK);
    assert_eq!(get(&router, "/does-not-exist", None).await.0, StatusCode::NOT_FOUND);

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/jesse").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
}

#[tokio::test]
async fn test_config_registers_extra_format() {
    let dir = sample_dir();
    fs::write(dir.path().join("extra.ttlx"), JESSE).unwrap();
    let config = ServerConfig::from_yaml_str(
        "formats:\n  - content_type: text/turtle\n    extensions: [ttl, turtle, ttlx]\n    format: turtle\n",
    )
    .unwrap();
    let (status, content_type, body) = get(&router_with(&dir, config), "/extra", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/turtle"));
    assert_eq!(body, JESSE.as_bytes());
}
