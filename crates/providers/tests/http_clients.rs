use providers::backend::{BackendClient, BackendConfig};
use providers::predict::{PredictClient, PredictConfig};
use providers::{
    AccountService, FoodCollection, FoodRecorder, FoodState, FreshnessClassifier, NewFoodRecord,
    ProfileUpdate, ProviderError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serves one canned response and hands back the raw request it received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if request_complete(&raw) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&raw).into_owned());
    });
    (format!("http://{}", addr), rx)
}

fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}

/// Value of a text field in a multipart body.
fn form_field(request: &str, name: &str) -> Option<String> {
    let start = request.find(&format!("name=\"{name}\""))?;
    let rest = &request[start..];
    let value = &rest[rest.find("\r\n\r\n")? + 4..];
    Some(value[..value.find("\r\n")?].to_string())
}

fn backend(base_url: String) -> BackendClient {
    BackendClient::new(BackendConfig {
        base_url,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn list_food_parses_records() {
    let (base, rx) = serve_once(
        "200 OK",
        r#"[{"image_uri":"/api/food/image/a1","food_state":"Not Rotten"},{"image_uri":"/api/food/image/b2","food_state":"Rotten"}]"#,
    )
    .await;
    let records = backend(base).list_food().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].image_uri, "/api/food/image/a1");
    assert_eq!(records[1].food_state, "Rotten");

    let request = rx.await.unwrap();
    assert!(request.starts_with("GET /api/food HTTP/1.1"));
}

#[tokio::test]
async fn list_food_reports_backend_error_message() {
    let (base, _rx) = serve_once(
        "500 Internal Server Error",
        r#"{"error":"Could not fetch food items"}"#,
    )
    .await;
    let err = backend(base).list_food().await.unwrap_err();
    match err {
        ProviderError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Could not fetch food items");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn list_food_rejects_malformed_payload() {
    let (base, _rx) = serve_once("200 OK", r#"{"not":"a list"}"#).await;
    let err = backend(base).list_food().await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_backend_is_request_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = backend(format!("http://{}", addr)).list_food().await.unwrap_err();
    assert!(matches!(err, ProviderError::RequestFailed(_)));
}

#[tokio::test]
async fn classify_posts_base64_image() {
    let (base, rx) = serve_once("200 OK", r#"{"predicted_class": 1}"#).await;
    let client = PredictClient::new(PredictConfig {
        predict_url: base,
        timeout_secs: 5,
    })
    .unwrap();
    let state = client.classify(b"jpeg").await.unwrap();
    assert_eq!(state, FoodState::Rotten);

    let request = rx.await.unwrap();
    assert!(request.starts_with("POST /predict/ HTTP/1.1"));
    // base64("jpeg")
    assert!(request.contains(r#"{"image":"anBlZw=="}"#));
}

#[tokio::test]
async fn add_food_sends_multipart_fields() {
    let (base, rx) = serve_once(
        "200 OK",
        r#"{"id":4,"_id":"f-4","food_name":"Apple","food_type":"Fruit","food_state":"Rotten","image_path":"uploads/f-4.jpg","created_at":"2024-05-01T10:00:00Z"}"#,
    )
    .await;
    let item = backend(base)
        .add_food(NewFoodRecord {
            image: b"jpeg".to_vec(),
            file_name: "photo.jpg".into(),
            food_state: FoodState::Rotten,
            food_name: "Apple".into(),
            food_type: "Fruit".into(),
        })
        .await
        .unwrap();
    assert_eq!(item.unique_id, "f-4");
    assert_eq!(item.food_state, "Rotten");

    let request = rx.await.unwrap();
    assert!(request.starts_with("POST /api/food/add HTTP/1.1"));
    assert!(request.contains(r#"name="image"; filename="photo.jpg""#));
    assert_eq!(form_field(&request, "food_state").as_deref(), Some("Rotten"));
    assert_eq!(form_field(&request, "food_name").as_deref(), Some("Apple"));
    assert_eq!(form_field(&request, "food_type").as_deref(), Some("Fruit"));
}

#[tokio::test]
async fn signup_and_login_post_credentials() {
    let (base, rx) = serve_once("201 Created", r#"{"id":3,"_id":"u-3"}"#).await;
    let resp = backend(base)
        .signup("Ada", "ada@example.com", "pw")
        .await
        .unwrap();
    assert_eq!(resp.unique_id.as_deref(), Some("u-3"));
    let request = rx.await.unwrap();
    assert!(request.starts_with("POST /signup HTTP/1.1"));
    assert!(request.contains(r#""name":"Ada""#));
    assert!(request.contains(r#""email":"ada@example.com""#));

    let (base, rx) = serve_once("200 OK", r#"{"id":3,"_id":"u-3"}"#).await;
    let resp = backend(base).login("ada@example.com", "pw").await.unwrap();
    assert_eq!(resp.id, 3);
    let request = rx.await.unwrap();
    assert!(request.starts_with("POST /login HTTP/1.1"));
    assert!(request.contains(r#""password":"pw""#));
}

#[tokio::test]
async fn user_accepts_full_backend_record() {
    let (base, rx) = serve_once(
        "200 OK",
        r#"{"id":3,"_id":"u-3","name":"Ada","email":"ada@example.com","password":"hash","salt":"s","verify_status":false,"pfp":"iVBORw==","pfp_ext":"png","profession":"Chef","username":"","date_of_birth":"0001-01-01T00:00:00Z","created_at":"2024-05-01T10:00:00Z"}"#,
    )
    .await;
    let profile = backend(base).user("u-3").await.unwrap();
    assert_eq!(profile.name, "Ada");
    assert_eq!(profile.profession, "Chef");
    assert_eq!(profile.pfp_ext, "png");

    let request = rx.await.unwrap();
    assert!(request.starts_with("GET /api/user/u-3 HTTP/1.1"));
}

#[tokio::test]
async fn date_of_birth_update_uses_dob_route() {
    let (base, rx) = serve_once("200 OK", r#"{"message":"Date of birth updated"}"#).await;
    let dob = chrono::NaiveDate::from_ymd_opt(1990, 2, 1).unwrap();
    backend(base)
        .update_user("tok", ProfileUpdate::DateOfBirth(dob))
        .await
        .unwrap();

    let request = rx.await.unwrap();
    assert!(request.starts_with("PUT /api/user/tok/dob HTTP/1.1"));
    assert!(request.contains(r#"{"date_of_birth":"1990-02-01"}"#));
}

#[tokio::test]
async fn picture_upload_sends_pfp_field() {
    let (base, rx) = serve_once(
        "200 OK",
        r#"{"message":"Profile picture updated successfully","pfp_ext":"png"}"#,
    )
    .await;
    backend(base)
        .update_picture("tok", b"png".to_vec(), "me.png")
        .await
        .unwrap();

    let request = rx.await.unwrap();
    assert!(request.starts_with("PUT /api/user/tok/pfp HTTP/1.1"));
    assert!(request.contains(r#"name="pfp"; filename="me.png""#));
}

#[tokio::test]
async fn picture_fetch_returns_bytes_or_not_set() {
    let (base, rx) = serve_once("200 OK", "PNGDATA").await;
    let bytes = backend(base).fetch_picture("tok").await.unwrap();
    assert_eq!(bytes, b"PNGDATA".to_vec());
    let request = rx.await.unwrap();
    assert!(request.starts_with("GET /api/user/image/tok HTTP/1.1"));

    let (base, _rx) = serve_once("404 Not Found", r#"{"error":"Profile picture not set"}"#).await;
    let err = backend(base).fetch_picture("tok").await.unwrap_err();
    match err {
        ProviderError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Profile picture not set");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
