use std::time::Duration;

use serde_json::json;
use ticker_charts::{
    chart::{PanelId, build},
    errors::ErrorKind,
    models::{payload::ProviderPayload, symbol::Symbol},
    providers::{
        DataProvider,
        http::{Endpoint, HttpProvider, HttpProviderConfig, provider::parse_base_url},
    },
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn provider_for(server: &MockServer, endpoint: Endpoint) -> HttpProvider {
    let url = parse_base_url(&server.uri()).unwrap();
    HttpProvider::new(HttpProviderConfig::new(url, endpoint)).unwrap()
}

fn aapl() -> Symbol {
    Symbol::parse("aapl").unwrap()
}

fn bars_json() -> serde_json::Value {
    json!([
        {
            "date": "2024-01-01",
            "open": 100.0, "high": 105.0, "low": 99.0, "close": 103.0,
            "volume": 1000
        },
        {
            "date": "2024-01-02",
            "open": 103.0, "high": 106.0, "low": 101.0, "close": 104.5,
            "volume": 1500
        }
    ])
}

#[tokio::test]
async fn not_found_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stock/BAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = provider_for(&server, Endpoint::Stock)
        .fetch(&Symbol::parse("bad").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "HTTP error! status: 404");
}

#[tokio::test]
async fn server_error_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let err = provider_for(&server, Endpoint::Stock).fetch(&aapl()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn raw_series_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stock/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bars_json()))
        .expect(1)
        .mount(&server)
        .await;

    let payload = provider_for(&server, Endpoint::Stock).fetch(&aapl()).await.unwrap();
    match payload {
        ProviderPayload::RawSeries(bars) => {
            assert_eq!(bars.len(), 2);
            assert_eq!(bars[1].volume, 1500);
        }
        other => panic!("expected raw series, got {}", other.shape_name()),
    }
}

#[tokio::test]
async fn rich_series_with_indicators_is_decoded() {
    let server = MockServer::start().await;
    let body = json!({
        "prices": bars_json(),
        "indicators": {
            "moving_averages": {"MA20": [null, 103.75], "MA5": [103.0, 103.75]},
            "rsi": [null, 55.0],
            "volume_ma": [null, 1250.0]
        }
    });
    Mock::given(method("GET"))
        .and(path("/api/stock/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let payload = provider_for(&server, Endpoint::Stock).fetch(&aapl()).await.unwrap();
    let ProviderPayload::RichSeries { prices, indicators } = payload else {
        panic!("expected rich series");
    };
    assert_eq!(prices.len(), 2);
    let indicators = indicators.unwrap();
    let names: Vec<&str> = indicators.moving_averages.keys().map(String::as_str).collect();
    assert_eq!(names, ["MA20", "MA5"]);
    assert_eq!(indicators.rsi, vec![None, Some(55.0)]);
}

#[tokio::test]
async fn chart_endpoint_figures_pass_through_verbatim() {
    let server = MockServer::start().await;
    let candlestick = json!({
        "data": [{
            "type": "candlestick",
            "x": ["2024-01-01"],
            "open": [1.0],
            "high": [2.0],
            "low": [0.5],
            "close": [1.5],
            "increasing": {"line": {"color": "#26a69a"}},
            "xaxis": "x"
        }],
        "layout": {"title": {"text": "AAPL Stock Price"}, "template": "plotly_dark"}
    });
    let volume = json!({
        "data": [{
            "type": "bar",
            "x": [1, 2],
            "y": {"dtype": "i4", "bdata": "6AMAANAHAAA="},
            "marker": {"color": "gray"}
        }],
        "layout": {"title": {"text": "AAPL Trading Volume"}}
    });
    let body = json!({
        "candlestick": candlestick.to_string(),
        "volume": volume.clone(),
    });
    Mock::given(method("GET"))
        .and(path("/api/chart/AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let payload = provider_for(&server, Endpoint::Chart).fetch(&aapl()).await.unwrap();
    let panels = build(&payload, &aapl()).unwrap();

    let ids: Vec<PanelId> = panels.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, [PanelId::Candlestick, PanelId::Volume]);
    assert_eq!(panels[1].1.title(), Some("AAPL Trading Volume"));
    assert_eq!(serde_json::to_value(panels[0].1.to_figure()).unwrap(), candlestick);
    assert_eq!(serde_json::to_value(panels[1].1.to_figure()).unwrap(), volume);
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server, Endpoint::Stock).fetch(&aapl()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedPayload);
}

#[tokio::test]
async fn unknown_object_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"quotes": []})))
        .mount(&server)
        .await;

    let err = provider_for(&server, Endpoint::Stock).fetch(&aapl()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedPayload);
}

#[tokio::test]
async fn api_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bars_json()))
        .expect(1)
        .mount(&server)
        .await;

    let base = parse_base_url(&server.uri()).unwrap();
    let mut config = HttpProviderConfig::new(base, Endpoint::Stock);
    config.api_token = Some("s3cret".to_string().into());
    let provider = HttpProvider::new(config).unwrap();
    provider.fetch(&aapl()).await.unwrap();
}

#[tokio::test]
async fn slow_response_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(bars_json())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let base = parse_base_url(&server.uri()).unwrap();
    let mut config = HttpProviderConfig::new(base, Endpoint::Stock);
    config.timeout = Duration::from_millis(50);
    let provider = HttpProvider::new(config).unwrap();

    let err = provider.fetch(&aapl()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let provider =
        HttpProvider::new(HttpProviderConfig::new(parse_base_url(&uri).unwrap(), Endpoint::Stock))
            .unwrap();
    let err = provider.fetch(&aapl()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
