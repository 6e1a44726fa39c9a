use bytes::Buf;
use futures::TryStreamExt;
use parking_lot::Mutex;
use pet_admin_core::{
    build_payload, ApiSettings, FormValues, ImageField, RecordId, RecordStore, Sex, StoreError,
    TaxonomyError, TaxonomySource, WeightClass,
};
use pet_admin_http::{HttpRecordStore, HttpTaxonomySource};
use pet_admin_test_utils::{photo_png, sample_record};
use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::multipart::FormData;
use warp::{Filter, Rejection, Reply};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CapturedPart {
    name: String,
    file_name: Option<String>,
    data: Vec<u8>,
}

impl CapturedPart {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

async fn read_parts(form: FormData) -> Result<Vec<CapturedPart>, Rejection> {
    let mut form = Box::pin(form);
    let mut parts = Vec::new();
    while let Some(mut part) = form.try_next().await.map_err(|_| warp::reject())? {
        let name = part.name().to_string();
        let file_name = part.filename().map(str::to_string);
        let mut data = Vec::new();
        while let Some(chunk) = part.data().await {
            let chunk = chunk.map_err(|_| warp::reject())?;
            data.extend_from_slice(chunk.chunk());
        }
        parts.push(CapturedPart { name, file_name, data });
    }
    Ok(parts)
}

macro_rules! serve {
    ($routes:expr) => {{
        let (addr, server) = warp::serve($routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }};
}

fn settings(addr: SocketAddr) -> ApiSettings {
    ApiSettings {
        base_url: format!("http://{addr}"),
        taxonomy_url: format!("http://{addr}/breeds/list/all"),
        request_timeout_secs: Some(5),
    }
}

fn record_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "body": {
            "id": id,
            "name": "Rex",
            "age": 3,
            "description": "Muito dócil",
            "breed": "hound/afghan",
            "type": "Macho",
            "weight": "Grande",
            "image": "dog.jpg"
        }
    })
}

/// Fake storage API capturing every multipart update
fn storage_api(
    update_status: StatusCode,
    captured: Arc<Mutex<Vec<CapturedPart>>>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let get = warp::get()
        .and(warp::path!("api" / "pet" / String))
        .map(|id: String| warp::reply::json(&record_json(&id)));

    let put = warp::put()
        .and(warp::path!("api" / "pet" / String))
        .and(warp::multipart::form())
        .and_then(move |_id: String, form: FormData| {
            let captured = Arc::clone(&captured);
            async move {
                let parts = read_parts(form).await?;
                captured.lock().extend(parts);
                Ok::<_, Rejection>(warp::reply::with_status(warp::reply(), update_status))
            }
        });

    get.or(put)
}

#[tokio::test]
async fn fetch_decodes_record_envelope() {
    let addr = serve!(storage_api(StatusCode::OK, Arc::default()));
    let store = HttpRecordStore::new(&settings(addr)).unwrap();

    let record = store.fetch(&RecordId::new("5")).await.unwrap();
    assert_eq!(record, sample_record());
}

#[tokio::test]
async fn fetch_maps_missing_record_to_status() {
    let routes = warp::path!("api" / "pet" / String)
        .map(|_id: String| warp::reply::with_status("gone", StatusCode::NOT_FOUND));
    let store = HttpRecordStore::new(&settings(serve!(routes))).unwrap();

    let err = store.fetch(&RecordId::new("5")).await.unwrap_err();
    assert_eq!(err, StoreError::Status { status: 404 });
}

#[tokio::test]
async fn fetch_maps_malformed_body_to_decode() {
    let routes = warp::path!("api" / "pet" / String).map(|_id: String| "not json");
    let store = HttpRecordStore::new(&settings(serve!(routes))).unwrap();

    let err = store.fetch(&RecordId::new("5")).await.unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[tokio::test]
async fn update_sends_stored_reference_when_no_file_picked() {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let addr = serve!(storage_api(StatusCode::OK, Arc::clone(&captured)));
    let store = HttpRecordStore::new(&settings(addr)).unwrap();

    let record = sample_record();
    let payload = build_payload(&FormValues::from_record(&record), Some(&record)).unwrap();
    store.update(&record.id, &payload).await.unwrap();

    let parts = captured.lock().clone();
    let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["name", "age", "description", "breed", "type", "weight", "image"]);

    let image = parts.iter().find(|p| p.name == "image").unwrap();
    assert_eq!(image.file_name, None);
    assert_eq!(image.text(), "dog.jpg");

    let sex = parts.iter().find(|p| p.name == "type").unwrap();
    assert_eq!(sex.text(), Sex::Male.as_str());
}

#[tokio::test]
async fn update_sends_picked_file_bytes() {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let addr = serve!(storage_api(StatusCode::OK, Arc::clone(&captured)));
    let store = HttpRecordStore::new(&settings(addr)).unwrap();

    let record = sample_record();
    let mut values = FormValues::from_record(&record);
    values.image = ImageField::Picked(vec![photo_png()]);
    values.weight = Some(WeightClass::Small);
    let payload = build_payload(&values, Some(&record)).unwrap();
    store.update(&record.id, &payload).await.unwrap();

    let parts = captured.lock().clone();
    let image = parts.iter().find(|p| p.name == "image").unwrap();
    assert_eq!(image.file_name.as_deref(), Some("photo.png"));
    assert_eq!(image.data, photo_png().bytes);

    let weight = parts.iter().find(|p| p.name == "weight").unwrap();
    assert_eq!(weight.text(), "Pequeno");
}

#[tokio::test]
async fn update_treats_non_ok_status_as_failure() {
    let addr = serve!(storage_api(StatusCode::INTERNAL_SERVER_ERROR, Arc::default()));
    let store = HttpRecordStore::new(&settings(addr)).unwrap();

    let record = sample_record();
    let payload = build_payload(&FormValues::from_record(&record), Some(&record)).unwrap();
    let err = store.update(&record.id, &payload).await.unwrap_err();

    assert_eq!(err, StoreError::Status { status: 500 });
    assert!(err.is_retryable());
}

#[tokio::test]
async fn update_treats_no_content_as_failure() {
    let addr = serve!(storage_api(StatusCode::NO_CONTENT, Arc::default()));
    let store = HttpRecordStore::new(&settings(addr)).unwrap();

    let record = sample_record();
    let payload = build_payload(&FormValues::from_record(&record), Some(&record)).unwrap();
    let err = store.update(&record.id, &payload).await.unwrap_err();
    assert_eq!(err, StoreError::Status { status: 204 });
}

#[tokio::test]
async fn taxonomy_decodes_breed_mapping() {
    let routes = warp::path!("breeds" / "list" / "all").map(|| {
        warp::reply::json(&serde_json::json!({
            "message": { "hound": ["afghan", "basset"], "pug": [] },
            "status": "success"
        }))
    });
    let source = HttpTaxonomySource::new(&settings(serve!(routes))).unwrap();

    let breeds = source.fetch_breeds().await.unwrap();
    assert_eq!(breeds.status, "success");
    assert_eq!(breeds.message["hound"], vec!["afghan".to_string(), "basset".to_string()]);
    assert!(breeds.message["pug"].is_empty());
}

#[tokio::test]
async fn taxonomy_maps_garbage_to_decode() {
    let routes = warp::path!("breeds" / "list" / "all").map(|| "<html>");
    let source = HttpTaxonomySource::new(&settings(serve!(routes))).unwrap();

    let err = source.fetch_breeds().await.unwrap_err();
    assert!(matches!(err, TaxonomyError::Decode(_)));
}

#[tokio::test]
async fn taxonomy_maps_unreachable_host_to_transport() {
    // Bind and drop to get a port nothing listens on
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let source = HttpTaxonomySource::new(&settings(addr)).unwrap();

    let err = source.fetch_breeds().await.unwrap_err();
    assert!(err.is_retryable());
}
