use std::{net::SocketAddr, sync::Arc, time::Duration};

use backend::{
    AppState, create_router,
    diversify::{DiversifyConfig, RouteDiversifier},
    nominatim::NominatimClient,
    osrm::OsrmClient,
    overpass::OverpassClient,
    risk::RiskZoneIndex,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";
const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de";
const DEFAULT_GEOCODE_BIAS: &str = "Mumbai, India";
const HTTP_TIMEOUT: Duration = Duration::from_secs(25);

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let http = reqwest::Client::builder()
        .user_agent(concat!("safepath/", env!("CARGO_PKG_VERSION")))
        .timeout(HTTP_TIMEOUT)
        .build()
        .expect("build http client");

    let risk_zones = match std::env::var("RISK_ZONES_JSON") {
        Ok(path) => {
            let zones = RiskZoneIndex::from_file(&path).expect("load risk zones");
            tracing::info!("loaded {} risk zones from {path}", zones.zones().len());
            zones
        }
        Err(_) => RiskZoneIndex::default(),
    };

    let mut config = DiversifyConfig::default();
    if let Ok(raw) = std::env::var("OFFSET_SCALE_DEG") {
        config.offset_scale_deg = raw.parse().expect("OFFSET_SCALE_DEG must be a number");
    }

    let osrm = OsrmClient::new(http.clone(), env_or("OSRM_URL", DEFAULT_OSRM_URL));
    let nominatim =
        NominatimClient::new(http.clone(), env_or("NOMINATIM_URL", DEFAULT_NOMINATIM_URL))
            .with_bias(env_or("GEOCODE_BIAS", DEFAULT_GEOCODE_BIAS));
    let overpass = OverpassClient::new(http, env_or("OVERPASS_URL", DEFAULT_OVERPASS_URL));

    let state = AppState {
        diversifier: Arc::new(RouteDiversifier::new(Arc::new(osrm)).with_config(config)),
        geocoder: Arc::new(nominatim),
        places: Arc::new(overpass),
        risk_zones: Arc::new(risk_zones),
    };
    let app = create_router(state);

    let addr: SocketAddr = env_or("BIND_ADDR", "0.0.0.0:8080")
        .parse()
        .expect("valid socket address");
    tracing::info!("starting backend on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
