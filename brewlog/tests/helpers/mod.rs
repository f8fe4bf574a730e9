#![allow(dead_code)]

use brewlog_client::api_client::SyncClient;
use brewlog_client::domain::OfflineRecipe;
use brewlog_client::metrics::{MetricsCalculator, MetricsInput};
use brewlog_client::offline_store::OfflineStore;
use brewlog_client::service::OfflineRecipeService;
use brewlog_client::session::Session;
use brewlog_client::settings::Settings;
use brewlog_client::store::KvStore;
use brewlog_common::api::HealthCheckResponse;
use brewlog_common::domain::{
    Ingredient, IngredientKind, Recipe, RecipeDraft, RecipeMetrics,
};
use eyre::Result;
use time::OffsetDateTime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER: &str = "user123";

/// Address nothing listens on; the link probe fails fast.
pub const DEAD_ADDRESS: &str = "http://127.0.0.1:1";

pub async fn build_app(
    address: &str,
    offline: bool,
    user: Option<&str>,
) -> Result<OfflineRecipeService> {
    let kv = KvStore::new("sqlite::memory:").await?;
    let store = OfflineStore::new(kv);
    let session = Session {
        user_id: user.map(String::from),
        token: user.map(|_| "test-token".to_string()),
        device_id: "tester@device".into(),
    };
    let client = SyncClient::new(address, session.token.as_deref())?;
    let settings = Settings {
        db_path: "sqlite::memory:".into(),
        session_path: String::new(),
        server_address: address.into(),
        offline,
    };

    Ok(OfflineRecipeService::new(settings, store, client, session))
}

pub async fn offline_app() -> OfflineRecipeService {
    build_app(DEAD_ADDRESS, true, Some(USER)).await.unwrap()
}

pub async fn anonymous_offline_app() -> OfflineRecipeService {
    build_app(DEAD_ADDRESS, true, None).await.unwrap()
}

pub async fn online_app(server: &MockServer) -> OfflineRecipeService {
    build_app(&server.uri(), false, Some(USER)).await.unwrap()
}

/// Remote repository double with a live health endpoint.
pub async fn spawn_remote() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(HealthCheckResponse {
            status: "Ok".to_string(),
            version: "test".to_string(),
        }))
        .mount(&server)
        .await;

    server
}

pub fn recipe(id: &str, name: &str) -> Recipe {
    let now = OffsetDateTime::now_utc();
    Recipe {
        id: id.into(),
        user_id: USER.into(),
        name: name.into(),
        style: Some("Pale Ale".into()),
        batch_size: 5.0,
        batch_size_unit: "gal".into(),
        boil_time: Some(60),
        efficiency: Some(0.72),
        ingredients: vec![Ingredient::new(
            "Pale malt".into(),
            IngredientKind::Fermentable,
            9.0,
            "lb".into(),
        )],
        notes: None,
        metrics: RecipeMetrics::default(),
        created_at: now,
        updated_at: now,
    }
}

pub fn draft(name: &str) -> RecipeDraft {
    RecipeDraft {
        name: name.into(),
        style: Some("Pale Ale".into()),
        batch_size: 5.0,
        batch_size_unit: "gal".into(),
        boil_time: Some(60),
        efficiency: Some(0.72),
        ingredients: vec![Ingredient::new(
            "Cascade".into(),
            IngredientKind::Hop,
            2.0,
            "oz".into(),
        )],
        notes: None,
    }
}

pub async fn seed(service: &OfflineRecipeService, scope: &str, recipes: &[OfflineRecipe]) {
    service.store().save_recipes(scope, recipes).await.unwrap();
}

/// Canned calculator so backfill tests never depend on brewing math.
pub struct CannedCalc;

impl MetricsCalculator for CannedCalc {
    fn compute(&self, _input: MetricsInput<'_>) -> RecipeMetrics {
        RecipeMetrics {
            estimated_og: Some(1.050),
            estimated_fg: Some(1.012),
            estimated_abv: Some(5.0),
            estimated_ibu: Some(35.0),
            estimated_srm: Some(8.0),
        }
    }
}
