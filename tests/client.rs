use serde_json::json;
use tempfile::TempDir;

use stayfinder::client::{ApiClient, ClientError};
use stayfinder::db::{init_db, HotelFilter};
use stayfinder::models::{Coordinates, DestinationDraft, HotelDraft, RoomType};
use stayfinder::server::{router, AppState};

struct TestServer {
    client: ApiClient,
    handle: tokio::task::JoinHandle<()>,
    _temp_dir: TempDir, // Keep alive for duration of test
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn start_server() -> TestServer {
    let temp_dir = TempDir::new().unwrap();
    let pool = init_db(&temp_dir.path().join("client.db")).await.unwrap();
    let app = router(AppState::new(pool));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        client: ApiClient::new(format!("http://{}", addr)),
        handle,
        _temp_dir: temp_dir,
    }
}

fn paris() -> DestinationDraft {
    DestinationDraft::new(
        "Paris",
        "France",
        "The capital city of France",
        Coordinates::new(48.8566, 2.3522),
    )
}

#[tokio::test]
async fn test_health() {
    let server = start_server().await;
    let health = server.client.health().await.unwrap();
    assert_eq!(health.status, "OK");
}

#[tokio::test]
async fn test_destination_lifecycle() {
    let server = start_server().await;
    let client = &server.client;

    let created = client
        .create_destination(&paris().with_field("bestSeason", "spring"))
        .await
        .unwrap();
    assert_eq!(created.extra.get("bestSeason"), Some(&json!("spring")));

    let updated = client
        .update_destination(&created.id, &json!({ "description": "City of light" }))
        .await
        .unwrap();
    assert_eq!(updated.description, "City of light");
    assert_eq!(updated.name, "Paris");

    let found = client.destinations_by_country("france").await.unwrap();
    assert_eq!(found.len(), 1);

    let deleted = client.delete_destination(&created.id).await.unwrap();
    assert_eq!(deleted.message, "Destination deleted successfully");

    let err = client.get_destination(&created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_country_with_space_is_encoded() {
    let server = start_server().await;
    let client = &server.client;

    client
        .create_destination(&DestinationDraft::new(
            "Auckland",
            "New Zealand",
            "City of sails",
            Coordinates::new(-36.85, 174.76),
        ))
        .await
        .unwrap();

    let found = client.destinations_by_country("new zealand").await.unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_hotel_queries() {
    let server = start_server().await;
    let client = &server.client;

    let destination = client.create_destination(&paris()).await.unwrap();
    let draft = HotelDraft::new("Lumière", "1 Rue", 5, 4.7, 200.0, &destination.id)
        .with_room_types(vec![RoomType::new("Deluxe", 250.0), RoomType::new("Suite", 400.0)]);
    let hotel = client.create_hotel(&draft).await.unwrap();
    assert_eq!(
        hotel.destination.as_ref().map(|d| d.id.as_str()),
        Some(destination.id.as_str())
    );

    let summary = client.hotel_summary(&hotel.hotel.id).await.unwrap();
    assert_eq!(summary.average_room_price, 325.0);

    assert_eq!(client.hotels_by_stars(5).await.unwrap().len(), 1);
    assert_eq!(
        client.hotels_by_price_range(200.0, 200.0).await.unwrap().len(),
        1
    );
    assert_eq!(
        client
            .hotels_by_destination(&destination.id)
            .await
            .unwrap()
            .len(),
        1
    );

    let filter = HotelFilter::default()
        .destination(destination.id.clone())
        .rating_at_least(4.8);
    assert!(client.filter_hotels(&filter).await.unwrap().is_empty());

    let updated = client
        .update_hotel(&hotel.hotel.id, &json!({ "rating": 4.9 }))
        .await
        .unwrap();
    assert_eq!(updated.hotel.rating, 4.9);

    client.delete_hotel(&hotel.hotel.id).await.unwrap();
    assert!(client.list_hotels().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_api_error_carries_server_message() {
    let server = start_server().await;

    let draft = HotelDraft::new("Ghost", "Nowhere", 3, 3.0, 50.0, "missing");
    let err = server.client.create_hotel(&draft).await.unwrap_err();

    match err {
        ClientError::Api {
            status, message, ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Destination not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}
