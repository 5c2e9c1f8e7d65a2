use super::*;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::error::ClientError;

fn test_client(base_url: &str) -> ServerClient {
    ServerClient::new(base_url, 5).expect("client construction should not fail")
}

fn envelope(content: &str) -> serde_json::Value {
    json!({
        "model": "llama3-70b-8192",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

fn rankings_body() -> serde_json::Value {
    json!({
        "results": [{
            "id": "mrbeast-youtube",
            "name": "MrBeast",
            "platform": "YouTube",
            "firstAppearanceDate": "2026-01-01T00:00:00Z",
            "timestamp": 1_767_225_600_000_i64,
            "credibilityScore": 8.0,
            "audienceAuthenticityScore": 9.0,
            "contentQualityScore": 9.0,
            "brandAlignmentScore": 7.0,
            "engagementScore": 9.0,
            "overallAnalysis": "Huge.",
            "niche": "Entertainment",
            "audience": "100M+",
            "consistencyScore": 8.5,
            "careerLength": "Established",
            "trendsOverTime": {"dates": [], "scores": []}
        }],
        "timestamp": 1_767_225_600_000_i64,
        "serverUptime": 1234
    })
}

#[test]
fn parses_analyze_command() {
    let cli = Cli::try_parse_from(["infscore", "analyze", "MrBeast", "--platform", "YouTube"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Analyze { ref name, platform: Some(ref p) } if name == "MrBeast" && p == "YouTube"
    ));
}

#[test]
fn parses_rankings_command_with_global_server_url() {
    let cli = Cli::try_parse_from([
        "infscore",
        "rankings",
        "--nocache",
        "--server-url",
        "http://example.test:8080",
    ])
    .expect("expected valid cli args");
    assert_eq!(cli.server_url, "http://example.test:8080");
    assert!(matches!(
        cli.command,
        Commands::Rankings {
            platform: None,
            nocache: true
        }
    ));
}

#[test]
fn analyze_requires_a_name() {
    assert!(Cli::try_parse_from(["infscore", "analyze"]).is_err());
}

#[tokio::test]
async fn analyze_saves_derived_record_and_refreshes() {
    let server = MockServer::start().await;

    let content = json!({
        "credibilityScore": 8.5,
        "audienceAuthenticity": {"score": 9, "analysis": "organic"},
        "contentQuality": {"score": "8", "analysis": "polished"},
        "brandAlignmentPotential": {"score": null, "analysis": "unclear"},
        "engagementMetrics": {"score": 12, "analysis": "huge"},
        "overallAnalysis": "A YouTube giant. Niche: Challenges. 250M subscribers across YouTube channels."
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/analysis-relay"))
        .and(body_partial_json(json!({"structured": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&content)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rankings"))
        .and(body_partial_json(json!({
            "name": "MrBeast",
            "platform": "YouTube",
            "niche": "Challenges",
            "audience": "250M",
            "credibilityScore": 8.5,
            "contentQualityScore": 8.0,
            "engagementScore": 10.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "id": "mrbeast-youtube",
            "timestamp": 1_767_225_600_000_i64,
            "message": "Added new influencer",
            "currentCount": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rankings"))
        .and(query_param("nocache", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rankings_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let report = orchestrator::analyze(&client, "  MrBeast ", None)
        .await
        .expect("analysis should succeed");

    assert_eq!(report.name, "MrBeast");
    assert_eq!(report.draft.brand_alignment_score, None);
    let receipt = report.receipt.as_ref().expect("saved");
    assert_eq!(receipt.message, "Added new influencer");
    let page = report.rankings.as_ref().expect("refreshed");
    assert_eq!(page.results[0].id, "mrbeast-youtube");

    let rendered = render_report(&report);
    assert!(rendered.contains("Credibility: 8.5"));
    assert!(rendered.contains("Added new influencer (mrbeast-youtube); 1 influencers tracked"));
    assert!(rendered.contains("Brand alignment: n/a"));
    assert!(rendered.contains("Leaderboard"));
}

#[tokio::test]
async fn analyze_surfaces_relay_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analysis-relay"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": {"message": "A valid prompt is required"}})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rankings"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = orchestrator::analyze(&client, "Someone", None)
        .await
        .expect_err("relay error should propagate");
    assert!(matches!(err, ClientError::Relay(ref m) if m == "A valid prompt is required"));
}

#[tokio::test]
async fn failed_save_still_refreshes_rankings() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analysis-relay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("Not JSON, just words.")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rankings"))
        .and(body_partial_json(json!({
            "platform": "YouTube",
            "overallAnalysis": "Not JSON, just words."
        })))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"error": "Failed to save analysis: rankings table lock poisoned"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rankings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rankings_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let report = orchestrator::analyze(&client, "Unknown Person", None)
        .await
        .expect("save failure is not fatal");

    assert!(report.receipt.is_none());
    assert!(report.rankings.is_some());
    assert!(report.analysis.has_no_scores());
    assert!(render_report(&report).contains("Could not save"));
}

#[tokio::test]
async fn save_reports_flat_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rankings"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Missing required fields"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .save(&infscore_core::RecordDraft::default())
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        ClientError::Server { status: 400, ref message } if message == "Missing required fields"
    ));
}

#[tokio::test]
async fn rankings_passes_platform_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rankings"))
        .and(query_param("platform", "YouTube"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rankings_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .rankings(Some("YouTube"), false)
        .await
        .expect("rankings");
    assert_eq!(page.server_uptime, 1234);
    assert_eq!(page.results.len(), 1);

    let rendered = render_rankings(&page);
    assert!(rendered.starts_with("Leaderboard (server up 1s)"));
    assert!(rendered.contains("MrBeast"));
    assert!(rendered.contains("8.0"));
}

#[test]
fn empty_rankings_render_placeholder() {
    let page = RankingsPage {
        results: Vec::new(),
        server_uptime: 0,
    };
    assert_eq!(render_rankings(&page), "No ranked influencers yet.\n");
}

#[tokio::test]
async fn empty_envelope_reports_no_results_and_skips_save() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/analysis-relay"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rankings"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = orchestrator::analyze(&client, "Someone", None)
        .await
        .expect_err("empty envelope should fail");
    assert!(matches!(err, ClientError::NoResults));
    assert_eq!(err.to_string(), "No analysis results were returned");
}
